//! SQLite-backed durable key-value store for the cart snapshot.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tokio::sync::Mutex;

use rocketcart_cart::{DurableStore, StorageError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Location {
    File(PathBuf),
    Memory,
}

/// Durable store over a single `kv_store` table.
///
/// The database is opened lazily on first use, so constructing the store never
/// fails; an unusable path surfaces as [`StorageError::Unavailable`] on the
/// first read or write.
#[derive(Debug, Clone)]
pub struct SqliteDurableStore {
    location: Location,
    pool: Arc<Mutex<Option<SqlitePool>>>,
}

impl SqliteDurableStore {
    /// Store backed by the database file at `path` (created if missing).
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self::at(Location::File(path.into()))
    }

    /// Private in-memory database, gone when the store is dropped.
    pub fn in_memory() -> Self {
        Self::at(Location::Memory)
    }

    fn at(location: Location) -> Self {
        Self {
            location,
            pool: Arc::new(Mutex::new(None)),
        }
    }

    /// Get the pool, connecting and creating the table on first use.
    async fn get_pool(&self) -> anyhow::Result<SqlitePool> {
        let mut pool_guard = self.pool.lock().await;
        if let Some(pool) = pool_guard.as_ref() {
            return Ok(pool.clone());
        }

        let pool = match &self.location {
            Location::File(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create cart database directory at {parent:?}")
                    })?;
                }
                let options = SqliteConnectOptions::new()
                    .filename(path)
                    .create_if_missing(true);
                SqlitePoolOptions::new()
                    .connect_with(options)
                    .await
                    .with_context(|| format!("failed to open cart database at {path:?}"))?
            }
            Location::Memory => {
                // One connection that never expires: each SQLite in-memory
                // connection is its own database.
                let options = SqliteConnectOptions::new().in_memory(true);
                SqlitePoolOptions::new()
                    .max_connections(1)
                    .idle_timeout(None)
                    .max_lifetime(None)
                    .connect_with(options)
                    .await
                    .context("failed to open in-memory cart database")?
            }
        };

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS kv_store (
                key        TEXT NOT NULL PRIMARY KEY,
                value      TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await
        .context("failed to create kv_store table")?;

        *pool_guard = Some(pool.clone());
        Ok(pool)
    }

    async fn read(&self, pool: &SqlitePool, key: &str) -> anyhow::Result<Option<String>> {
        sqlx::query_scalar::<_, String>(
            r#"
            SELECT value
            FROM kv_store
            WHERE key = ?1
            "#,
        )
        .bind(key)
        .fetch_optional(pool)
        .await
        .with_context(|| format!("failed to read key {key:?}"))
    }

    async fn write(&self, pool: &SqlitePool, key: &str, value: &str) -> anyhow::Result<()> {
        let now = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO kv_store (key, value, updated_at)
            VALUES (?1, ?2, ?3)
            ON CONFLICT(key)
            DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(key)
        .bind(value)
        .bind(&now)
        .execute(pool)
        .await
        .with_context(|| format!("failed to write key {key:?}"))?;

        Ok(())
    }
}

fn unavailable(err: anyhow::Error) -> StorageError {
    StorageError::Unavailable(format!("{err:#}"))
}

#[async_trait]
impl DurableStore for SqliteDurableStore {
    async fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let pool = self.get_pool().await.map_err(unavailable)?;
        self.read(&pool, key)
            .await
            .map_err(|e| StorageError::Read(format!("{e:#}")))
    }

    async fn set(&self, key: &str, value: String) -> Result<(), StorageError> {
        let pool = self.get_pool().await.map_err(unavailable)?;
        self.write(&pool, key, &value)
            .await
            .map_err(|e| StorageError::Write(format!("{e:#}")))
    }
}

/// Resolve the default cart database path:
/// `{app_data_dir}/rocketcart/cart.db`.
pub fn default_database_path() -> anyhow::Result<PathBuf> {
    let base = dirs::data_dir()
        .or_else(|| {
            dirs::home_dir().map(|mut h| {
                h.push(".local");
                h.push("share");
                h
            })
        })
        .context("failed to resolve OS app data directory - tried data_dir() and home_dir()/.local/share")?;

    let mut path = base;
    path.push("rocketcart");
    path.push("cart.db");
    Ok(path)
}
