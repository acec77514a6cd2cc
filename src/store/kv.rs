//! Persistent key-value store with change notifications.
//!
//! Values are JSON documents keyed by name. Every write publishes a
//! [`StorageChange`] to subscribers; there are no transactions and the last
//! write wins.

use std::path::Path;
use std::sync::Arc;

use chrono::Utc;
use log::{debug, warn};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use sqlx::{Pool, Row, Sqlite};
use tokio::sync::broadcast;

use crate::error_handling::StoreError;

use super::migrations::run_migrations;
use super::pool::init_db_pool_with_path;

const CHANGE_CHANNEL_CAPACITY: usize = 64;

/// Namespace reported on every change (single local area).
pub const LOCAL_NAMESPACE: &str = "local";

/// A single key change published to subscribers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StorageChange {
    /// Storage area, always [`LOCAL_NAMESPACE`]
    pub namespace: String,
    /// Changed key
    pub key: String,
    /// Value before the change, if any
    pub old_value: Option<Value>,
    /// Value after the change; `None` on removal
    pub new_value: Option<Value>,
}

/// Handle to the key-value store. Cheap to clone.
#[derive(Clone)]
pub struct Store {
    pool: Arc<Pool<Sqlite>>,
    changes: broadcast::Sender<StorageChange>,
}

impl Store {
    /// Opens (creating if needed) the store at `db_path` and applies migrations.
    pub async fn open(db_path: &Path) -> Result<Self, StoreError> {
        let pool = init_db_pool_with_path(db_path).await?;
        Self::from_pool(pool).await
    }

    /// Wraps an existing pool, applying migrations.
    pub async fn from_pool(pool: Arc<Pool<Sqlite>>) -> Result<Self, StoreError> {
        run_migrations(pool.as_ref()).await?;
        let (changes, _) = broadcast::channel(CHANGE_CHANNEL_CAPACITY);
        Ok(Self { pool, changes })
    }

    /// Subscribes to change notifications.
    pub fn subscribe(&self) -> broadcast::Receiver<StorageChange> {
        self.changes.subscribe()
    }

    /// Reads a raw value.
    pub async fn get(&self, key: &str) -> Result<Option<Value>, StoreError> {
        let row = sqlx::query("SELECT value FROM kv_entries WHERE key = ?")
            .bind(key)
            .fetch_optional(self.pool.as_ref())
            .await?;
        match row {
            Some(row) => {
                let text: String = row.try_get("value")?;
                Ok(Some(serde_json::from_str(&text)?))
            }
            None => Ok(None),
        }
    }

    /// Reads and decodes a value, falling back to `default` when absent.
    pub async fn get_or<T: DeserializeOwned>(&self, key: &str, default: T) -> Result<T, StoreError> {
        match self.get(key).await? {
            Some(Value::Null) | None => Ok(default),
            Some(value) => Ok(serde_json::from_value(value)?),
        }
    }

    /// Reads and decodes a value.
    pub async fn get_typed<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key).await? {
            Some(Value::Null) | None => Ok(None),
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
        }
    }

    /// Writes a raw value and notifies subscribers.
    pub async fn set(&self, key: &str, value: Value) -> Result<(), StoreError> {
        let old_value = self.get(key).await?;
        let text = serde_json::to_string(&value)?;
        sqlx::query(
            "INSERT INTO kv_entries (key, value, updated_at_ms) VALUES (?, ?, ?)
             ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at_ms = excluded.updated_at_ms",
        )
        .bind(key)
        .bind(text)
        .bind(Utc::now().timestamp_millis())
        .execute(self.pool.as_ref())
        .await?;
        debug!("Stored key {}", key);
        self.notify(key, old_value, Some(value));
        Ok(())
    }

    /// Encodes and writes a value.
    pub async fn set_typed<T: Serialize>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        self.set(key, serde_json::to_value(value)?).await
    }

    /// Removes keys; absent keys are ignored.
    pub async fn remove(&self, keys: &[&str]) -> Result<(), StoreError> {
        for key in keys {
            let Some(old_value) = self.get(key).await? else {
                continue;
            };
            sqlx::query("DELETE FROM kv_entries WHERE key = ?")
                .bind(*key)
                .execute(self.pool.as_ref())
                .await?;
            self.notify(key, Some(old_value), None);
        }
        Ok(())
    }

    /// Removes every key.
    pub async fn clear(&self) -> Result<(), StoreError> {
        let all = self.all().await?;
        sqlx::query("DELETE FROM kv_entries")
            .execute(self.pool.as_ref())
            .await?;
        for (key, old_value) in all {
            self.notify(&key, Some(old_value), None);
        }
        Ok(())
    }

    /// Returns every stored key and value.
    pub async fn all(&self) -> Result<Map<String, Value>, StoreError> {
        let rows = sqlx::query("SELECT key, value FROM kv_entries ORDER BY key")
            .fetch_all(self.pool.as_ref())
            .await?;
        let mut map = Map::new();
        for row in rows {
            let key: String = row.try_get("key")?;
            let text: String = row.try_get("value")?;
            match serde_json::from_str(&text) {
                Ok(value) => {
                    map.insert(key, value);
                }
                Err(e) => warn!("Skipping undecodable value for key {}: {}", key, e),
            }
        }
        Ok(map)
    }

    fn notify(&self, key: &str, old_value: Option<Value>, new_value: Option<Value>) {
        // No subscribers is fine.
        let _ = self.changes.send(StorageChange {
            namespace: LOCAL_NAMESPACE.to_string(),
            key: key.to_string(),
            old_value,
            new_value,
        });
    }
}
