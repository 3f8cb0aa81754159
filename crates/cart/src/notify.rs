//! Notifying surface over [`CartStore`].
//!
//! UI layers call this instead of the store directly: every operation returns
//! `()`, and failures are turned into user-facing messages on a [`Notifier`].

use std::sync::Arc;

use rocketcart_core::ProductId;

use crate::cart::Cart;
use crate::error::CartError;
use crate::ports::Notifier;
use crate::store::{CartStore, UpdateProductAmount};

pub const OUT_OF_STOCK_MESSAGE: &str = "Requested quantity out of stock";
pub const ADD_PRODUCT_FAILED_MESSAGE: &str = "Error adding product";
pub const REMOVE_PRODUCT_FAILED_MESSAGE: &str = "Error removing product";
pub const UPDATE_AMOUNT_FAILED_MESSAGE: &str = "Error changing product quantity";

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CartOperation {
    AddProduct,
    RemoveProduct,
    UpdateProductAmount,
}

impl CartOperation {
    pub fn as_str(&self) -> &'static str {
        match self {
            CartOperation::AddProduct => "add_product",
            CartOperation::RemoveProduct => "remove_product",
            CartOperation::UpdateProductAmount => "update_product_amount",
        }
    }

    fn failure_message(self) -> &'static str {
        match self {
            CartOperation::AddProduct => ADD_PRODUCT_FAILED_MESSAGE,
            CartOperation::RemoveProduct => REMOVE_PRODUCT_FAILED_MESSAGE,
            CartOperation::UpdateProductAmount => UPDATE_AMOUNT_FAILED_MESSAGE,
        }
    }
}

/// Message shown to the user when `operation` fails with `error`.
pub fn user_message(operation: CartOperation, error: &CartError) -> &'static str {
    if error.is_out_of_stock() {
        OUT_OF_STOCK_MESSAGE
    } else {
        operation.failure_message()
    }
}

/// [`CartStore`] wrapper that never returns an error.
pub struct NotifyingCartStore {
    store: CartStore,
    notifier: Arc<dyn Notifier>,
}

impl NotifyingCartStore {
    pub fn new(store: CartStore, notifier: Arc<dyn Notifier>) -> Self {
        Self { store, notifier }
    }

    pub fn cart(&self) -> &Cart {
        self.store.cart()
    }

    pub async fn add_product(&mut self, product_id: ProductId) {
        let result = self.store.add_product(product_id).await;
        self.report(CartOperation::AddProduct, result);
    }

    pub async fn remove_product(&mut self, product_id: ProductId) {
        let result = self.store.remove_product(product_id).await;
        self.report(CartOperation::RemoveProduct, result);
    }

    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) {
        let result = self.store.update_product_amount(update).await;
        self.report(CartOperation::UpdateProductAmount, result);
    }

    fn report(&self, operation: CartOperation, result: Result<(), CartError>) {
        if let Err(err) = result {
            tracing::debug!(operation = operation.as_str(), "cart operation failed: {err}");
            self.notifier.error(user_message(operation, &err));
        }
    }
}
