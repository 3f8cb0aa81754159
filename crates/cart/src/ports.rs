//! Collaborator ports consumed by the cart store.
//!
//! Adapters live elsewhere (`rocketcart-infra` for HTTP/SQLite, [`crate::memory`]
//! for tests and demos); the store only sees these traits.

use async_trait::async_trait;

use rocketcart_core::ProductId;

use crate::line_item::{ProductDetails, StockLevel};

/// Failure of a remote lookup (stock or catalog).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    #[error("product {0} not found")]
    NotFound(ProductId),
    #[error("network error: {0}")]
    Network(String),
    #[error("API error ({0}): {1}")]
    Api(u16, String),
    #[error("parse error: {0}")]
    Parse(String),
}

/// Failure of the durable key-value store.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StorageError {
    #[error("storage unavailable: {0}")]
    Unavailable(String),
    #[error("storage write failed: {0}")]
    Write(String),
    #[error("storage read failed: {0}")]
    Read(String),
}

/// Remote stock levels.
#[async_trait]
pub trait StockLookup: Send + Sync {
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, LookupError>;
}

/// Remote product metadata.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, LookupError>;
}

/// Persistent key-value blob store surviving across sessions.
#[async_trait]
pub trait DurableStore: Send + Sync {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    /// Overwrite the value stored under `key`.
    async fn set(&self, key: &str, value: String) -> Result<(), StorageError>;
}

/// User-facing transient messages. Fire-and-forget.
pub trait Notifier: Send + Sync {
    fn error(&self, message: &str);
}
