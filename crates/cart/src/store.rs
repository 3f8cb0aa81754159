//! The cart store: in-memory cart + stock-checked mutations + durable snapshot.

use std::sync::Arc;

use rocketcart_core::ProductId;

use crate::cart::Cart;
use crate::error::{CartError, CartResult};
use crate::line_item::{LineItem, Quantity};
use crate::ports::{DurableStore, ProductCatalog, StockLookup};

/// Durable-store key under which the cart snapshot lives.
pub const CART_STORAGE_KEY: &str = "@RocketShoes:cart";

/// Request to set a line's quantity to an absolute amount.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    pub amount: i64,
}

/// Collaborators a [`CartStore`] is built from.
#[derive(Clone)]
pub struct CartDependencies {
    pub stock: Arc<dyn StockLookup>,
    pub catalog: Arc<dyn ProductCatalog>,
    pub storage: Arc<dyn DurableStore>,
}

/// Owner of the authoritative cart.
///
/// Every successful mutation is persisted before the in-memory cart is
/// replaced; a failed operation leaves both untouched. Mutations take
/// `&mut self`, so calls on one store never interleave.
pub struct CartStore {
    cart: Cart,
    storage_key: String,
    stock: Arc<dyn StockLookup>,
    catalog: Arc<dyn ProductCatalog>,
    storage: Arc<dyn DurableStore>,
}

impl core::fmt::Debug for CartStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("CartStore")
            .field("cart", &self.cart)
            .field("storage_key", &self.storage_key)
            .finish_non_exhaustive()
    }
}

impl CartStore {
    /// Load the cart stored under [`CART_STORAGE_KEY`].
    pub async fn load(deps: CartDependencies) -> Self {
        Self::load_with_key(deps, CART_STORAGE_KEY).await
    }

    /// Load the cart stored under `storage_key`.
    ///
    /// A missing snapshot, an unreadable store, or a snapshot that does not
    /// parse all start the session with an empty cart.
    pub async fn load_with_key(deps: CartDependencies, storage_key: impl Into<String>) -> Self {
        let storage_key = storage_key.into();

        let cart = match deps.storage.get(&storage_key).await {
            Ok(Some(snapshot)) => match Cart::from_snapshot(&snapshot) {
                Ok(cart) => cart,
                Err(err) => {
                    tracing::warn!(key = %storage_key, "discarding unparsable cart snapshot: {err}");
                    Cart::new()
                }
            },
            Ok(None) => Cart::new(),
            Err(err) => {
                tracing::warn!(key = %storage_key, "failed to read cart snapshot: {err}");
                Cart::new()
            }
        };

        tracing::debug!(key = %storage_key, lines = cart.len(), "cart loaded");

        Self {
            cart,
            storage_key,
            stock: deps.stock,
            catalog: deps.catalog,
            storage: deps.storage,
        }
    }

    pub fn cart(&self) -> &Cart {
        &self.cart
    }

    pub fn storage_key(&self) -> &str {
        &self.storage_key
    }

    /// Add one unit of `product_id`.
    ///
    /// Present lines are incremented; absent products are fetched from the
    /// catalog and appended with quantity 1.
    pub async fn add_product(&mut self, product_id: ProductId) -> CartResult<()> {
        let stock = self.stock.stock(product_id).await.map_err(CartError::Stock)?;
        let desired = u64::from(self.cart.quantity_of(product_id)) + 1;

        if !stock.covers(desired) {
            return Err(CartError::OutOfStock {
                product_id,
                requested: desired,
                available: stock.amount,
            });
        }

        let next = if self.cart.contains(product_id) {
            self.cart.with_incremented(product_id)?
        } else {
            let product = self
                .catalog
                .product(product_id)
                .await
                .map_err(CartError::Catalog)?;
            self.cart.with_appended(LineItem::from_product(product))?
        };

        self.commit(next).await?;
        tracing::debug!(product_id = %product_id, quantity = desired, "product added to cart");
        Ok(())
    }

    /// Remove the line for `product_id`.
    pub async fn remove_product(&mut self, product_id: ProductId) -> CartResult<()> {
        if !self.cart.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }
        let next = self.cart.without(product_id)?;

        self.commit(next).await?;
        tracing::debug!(product_id = %product_id, "product removed from cart");
        Ok(())
    }

    /// Set the line for `product_id` to exactly `amount` units.
    pub async fn update_product_amount(&mut self, update: UpdateProductAmount) -> CartResult<()> {
        let UpdateProductAmount { product_id, amount } = update;

        if amount <= 0 {
            return Err(CartError::InvalidAmount(amount));
        }
        let quantity =
            Quantity::try_from_amount(amount).map_err(|_| CartError::InvalidAmount(amount))?;

        if !self.cart.contains(product_id) {
            return Err(CartError::NotInCart(product_id));
        }

        let stock = self.stock.stock(product_id).await.map_err(CartError::Stock)?;
        let requested = u64::from(quantity.get());
        if !stock.covers(requested) {
            return Err(CartError::OutOfStock {
                product_id,
                requested,
                available: stock.amount,
            });
        }

        let next = self.cart.with_quantity(product_id, quantity)?;

        self.commit(next).await?;
        tracing::debug!(product_id = %product_id, quantity = requested, "product quantity updated");
        Ok(())
    }

    /// Persist `next` in full, then make it the current cart.
    async fn commit(&mut self, next: Cart) -> CartResult<()> {
        let snapshot = next
            .to_snapshot()
            .map_err(|e| CartError::Snapshot(e.to_string()))?;

        if let Err(err) = self.storage.set(&self.storage_key, snapshot).await {
            tracing::error!(key = %self.storage_key, "failed to persist cart: {err}");
            return Err(CartError::Storage(err));
        }

        self.cart = next;
        Ok(())
    }
}
