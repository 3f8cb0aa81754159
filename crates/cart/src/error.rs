//! Cart operation errors.

use rocketcart_core::{DomainError, ProductId};

use crate::ports::{LookupError, StorageError};

/// Result type returned by [`crate::CartStore`] operations.
pub type CartResult<T> = Result<T, CartError>;

/// Why a cart operation left the cart unchanged.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CartError {
    /// Not enough stock for the requested quantity.
    #[error("requested {requested} units of product {product_id}, only {available} in stock")]
    OutOfStock {
        product_id: ProductId,
        requested: u64,
        available: u32,
    },

    #[error("product {0} is not in the cart")]
    NotInCart(ProductId),

    /// Requested amount is zero, negative or out of range.
    #[error("invalid amount {0}")]
    InvalidAmount(i64),

    #[error("stock lookup failed: {0}")]
    Stock(#[source] LookupError),

    #[error("catalog lookup failed: {0}")]
    Catalog(#[source] LookupError),

    #[error("failed to serialize cart: {0}")]
    Snapshot(String),

    #[error("failed to persist cart: {0}")]
    Storage(#[source] StorageError),

    #[error(transparent)]
    Domain(#[from] DomainError),
}

/// The two outcome classes a caller distinguishes when reporting failures.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FailureKind {
    /// Normal business outcome: insufficient stock.
    Rejection,
    /// Missing entity, invalid input, or collaborator failure.
    Operational,
}

impl CartError {
    pub fn kind(&self) -> FailureKind {
        match self {
            CartError::OutOfStock { .. } => FailureKind::Rejection,
            _ => FailureKind::Operational,
        }
    }

    pub fn is_out_of_stock(&self) -> bool {
        self.kind() == FailureKind::Rejection
    }
}
