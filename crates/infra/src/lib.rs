//! `rocketcart-infra` — concrete collaborators for the cart store.
//!
//! - [`HttpStorefrontClient`]: stock + catalog over the storefront REST API
//! - [`SqliteDurableStore`]: durable key-value store for the cart snapshot
//! - [`TracingNotifier`]: user notifications as tracing events
//! - [`CartConfig`]: environment configuration

pub mod config;
pub mod http;
pub mod notifier;
pub mod sqlite;

use std::sync::Arc;

use rocketcart_cart::{CartDependencies, CartStore};

pub use config::{CartConfig, ConfigError};
pub use http::HttpStorefrontClient;
pub use notifier::TracingNotifier;
pub use sqlite::SqliteDurableStore;

/// Collaborators for `config`: one HTTP client serving both stock and catalog,
/// and the SQLite store at the configured path.
pub fn cart_dependencies(config: &CartConfig) -> CartDependencies {
    let client = Arc::new(HttpStorefrontClient::new(config.api_url.clone()));
    CartDependencies {
        stock: client.clone(),
        catalog: client,
        storage: Arc::new(SqliteDurableStore::open(config.database_path.clone())),
    }
}

/// Build and load a [`CartStore`] for `config`.
pub async fn build_cart_store(config: &CartConfig) -> CartStore {
    tracing::info!(
        api_url = %config.api_url,
        database = %config.database_path.display(),
        "opening cart"
    );
    CartStore::load_with_key(cart_dependencies(config), config.storage_key.clone()).await
}
