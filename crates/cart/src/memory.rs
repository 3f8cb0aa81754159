//! In-memory collaborators.
//!
//! Intended for tests/dev. Each one records enough about its calls for tests
//! to assert on them. Setters recover poisoned locks; the port methods report
//! them as errors.

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Mutex, PoisonError, RwLock};

use async_trait::async_trait;

use rocketcart_core::ProductId;

use crate::line_item::{ProductDetails, StockLevel};
use crate::ports::{DurableStore, LookupError, Notifier, ProductCatalog, StockLookup, StorageError};

fn poisoned() -> LookupError {
    LookupError::Network("lock poisoned".to_string())
}

/// Stock levels held in a map. Unknown products are `NotFound`.
#[derive(Debug, Default)]
pub struct InMemoryStock {
    levels: RwLock<HashMap<ProductId, u32>>,
    unreachable: RwLock<HashSet<ProductId>>,
    lookups: AtomicUsize,
}

impl InMemoryStock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_levels(levels: impl IntoIterator<Item = (u64, u32)>) -> Self {
        let stock = Self::new();
        for (id, amount) in levels {
            stock.set(ProductId::new(id), amount);
        }
        stock
    }

    pub fn set(&self, product_id: ProductId, amount: u32) {
        self.levels
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id, amount);
    }

    /// Make lookups for `product_id` fail with a network error.
    pub fn make_unreachable(&self, product_id: ProductId) {
        self.unreachable
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product_id);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl StockLookup for InMemoryStock {
    async fn stock(&self, product_id: ProductId) -> Result<StockLevel, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        if self.unreachable.read().map_err(|_| poisoned())?.contains(&product_id) {
            return Err(LookupError::Network(format!("stock service unreachable for {product_id}")));
        }

        let levels = self.levels.read().map_err(|_| poisoned())?;
        levels
            .get(&product_id)
            .map(|amount| StockLevel {
                id: product_id,
                amount: *amount,
            })
            .ok_or(LookupError::NotFound(product_id))
    }
}

/// Product records held in a map. Unknown products are `NotFound`.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    products: RwLock<HashMap<ProductId, ProductDetails>>,
    lookups: AtomicUsize,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_products(products: impl IntoIterator<Item = ProductDetails>) -> Self {
        let catalog = Self::new();
        for product in products {
            catalog.insert(product);
        }
        catalog
    }

    pub fn insert(&self, product: ProductDetails) {
        self.products
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(product.id, product);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ProductCatalog for InMemoryCatalog {
    async fn product(&self, product_id: ProductId) -> Result<ProductDetails, LookupError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);

        let products = self.products.read().map_err(|_| poisoned())?;
        products
            .get(&product_id)
            .cloned()
            .ok_or(LookupError::NotFound(product_id))
    }
}

/// Key-value blobs held in a map, with switchable write failures.
#[derive(Debug, Default)]
pub struct InMemoryDurableStore {
    values: RwLock<HashMap<String, String>>,
    fail_writes: AtomicBool,
    writes: AtomicUsize,
}

impl InMemoryDurableStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with `value` under `key`.
    pub fn seeded(key: &str, value: impl Into<String>) -> Self {
        let store = Self::new();
        store
            .values
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.to_string(), value.into());
        store
    }

    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful writes.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Current value under `key`, bypassing the async port.
    pub fn value(&self, key: &str) -> Option<String> {
        self.values.read().ok()?.get(key).cloned()
    }
}

#[async_trait]
impl DurableStore for InMemoryDurableStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let values = self
            .values
            .read()
            .map_err(|_| StorageError::Read("lock poisoned".to_string()))?;
        Ok(values.get(key).cloned())
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::Write("writes disabled".to_string()));
        }
        let mut values = self
            .values
            .write()
            .map_err(|_| StorageError::Write("lock poisoned".to_string()))?;
        values.insert(key.to_string(), value);
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// Notifier that keeps every message it was given.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().map(|m| m.clone()).unwrap_or_default()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(message.to_string());
    }
}
