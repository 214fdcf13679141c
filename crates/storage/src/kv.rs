//! Key-value store for credentials and device flags
//!
//! This module provides the async `KeyValueStore` contract the reconciler depends on,
//! and a durable implementation backed by sled.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use sled::Db;
use std::sync::Arc;
use thiserror::Error;

/// Key-value store error types
#[derive(Debug, Error)]
pub enum KvError {
    /// Sled database error
    #[error("Database error: {0}")]
    Database(#[from] sled::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Invalid key
    #[error("Invalid key: {0}")]
    InvalidKey(String),
}

/// Result type for key-value operations
pub type Result<T> = std::result::Result<T, KvError>;

/// Durable string key-value storage
///
/// All operations are asynchronous and independent; there is no transactional
/// guarantee across keys. Deleting a missing key is not an error.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value
    async fn set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove `key` from the store
    async fn delete(&self, key: &str) -> Result<()>;
}

pub(crate) fn validate_key(key: &str) -> Result<()> {
    if key.is_empty() {
        return Err(KvError::InvalidKey("key must not be empty".to_string()));
    }
    Ok(())
}

/// Key-value store configuration
#[derive(Debug, Clone)]
pub struct KvConfig {
    /// Database path
    pub path: String,
    /// Cache capacity in bytes
    pub cache_capacity: u64,
    /// Enable compression
    pub use_compression: bool,
    /// Flush interval in milliseconds (None flushes after every write)
    pub flush_every_ms: Option<u64>,
}

impl Default for KvConfig {
    fn default() -> Self {
        Self {
            path: "brain_kv.db".to_string(),
            cache_capacity: 8 * 1024 * 1024, // 8MB
            use_compression: true,
            flush_every_ms: Some(500),
        }
    }
}

impl KvConfig {
    /// Create a new configuration with a custom path
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Default::default()
        }
    }

    /// Set cache capacity in bytes
    pub fn cache_capacity(mut self, bytes: u64) -> Self {
        self.cache_capacity = bytes;
        self
    }

    /// Enable or disable compression
    pub fn use_compression(mut self, enabled: bool) -> Self {
        self.use_compression = enabled;
        self
    }

    /// Set flush interval in milliseconds
    pub fn flush_every_ms(mut self, ms: Option<u64>) -> Self {
        self.flush_every_ms = ms;
        self
    }
}

/// Sled-backed key-value store
///
/// Values are stored JSON-encoded so typed values and plain strings share one layout.
pub struct KvStore {
    db: Arc<Db>,
    flush_on_write: bool,
}

impl KvStore {
    /// Open a key-value store with configuration
    pub fn new(config: KvConfig) -> Result<Self> {
        let mut db_config = sled::Config::new()
            .path(&config.path)
            .cache_capacity(config.cache_capacity)
            .use_compression(config.use_compression);

        if let Some(ms) = config.flush_every_ms {
            db_config = db_config.flush_every_ms(Some(ms));
        }

        let db = db_config.open()?;
        tracing::debug!(path = %config.path, "opened key-value store");

        Ok(Self {
            db: Arc::new(db),
            flush_on_write: config.flush_every_ms.is_none(),
        })
    }

    /// Create a temporary key-value store (for testing)
    pub fn in_memory() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;

        Ok(Self {
            db: Arc::new(db),
            flush_on_write: false,
        })
    }

    /// Get a typed value by key
    pub fn get_value<T>(&self, key: &str) -> Result<Option<T>>
    where
        T: DeserializeOwned,
    {
        match self.db.get(key.as_bytes())? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Set a typed value by key
    pub fn set_value<T>(&self, key: &str, value: &T) -> Result<()>
    where
        T: Serialize,
    {
        let bytes = serde_json::to_vec(value)?;
        self.db.insert(key.as_bytes(), bytes)?;
        Ok(())
    }

    /// Remove a value by key, returning whether it existed
    pub fn remove(&self, key: &str) -> Result<bool> {
        Ok(self.db.remove(key.as_bytes())?.is_some())
    }

    /// Check if a key exists
    pub fn contains(&self, key: &str) -> Result<bool> {
        Ok(self.db.contains_key(key.as_bytes())?)
    }

    /// Flush pending writes to disk
    pub fn flush(&self) -> Result<()> {
        self.db.flush()?;
        Ok(())
    }

    /// Get the number of keys in the store
    pub fn len(&self) -> usize {
        self.db.len()
    }

    /// Check if the store is empty
    pub fn is_empty(&self) -> bool {
        self.db.is_empty()
    }

    fn after_write(&self) -> Result<()> {
        if self.flush_on_write {
            self.flush()?;
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for KvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        validate_key(key)?;
        self.get_value(key)
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        validate_key(key)?;
        self.set_value(key, &value)?;
        self.after_write()
    }

    async fn delete(&self, key: &str) -> Result<()> {
        validate_key(key)?;
        if self.remove(key)? {
            self.after_write()?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use tempfile::TempDir;

    #[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
    struct Flags {
        intro_seen: bool,
    }

    #[tokio::test]
    async fn test_set_get_delete() {
        let kv = KvStore::in_memory().unwrap();
        assert!(kv.is_empty());

        kv.set("userId", "u1").await.unwrap();
        assert_eq!(kv.get("userId").await.unwrap(), Some("u1".to_string()));
        assert_eq!(kv.len(), 1);

        kv.delete("userId").await.unwrap();
        assert_eq!(kv.get("userId").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let kv = KvStore::in_memory().unwrap();
        kv.delete("accessToken").await.unwrap();
        assert!(!kv.contains("accessToken").unwrap());
    }

    #[tokio::test]
    async fn test_empty_key_rejected() {
        let kv = KvStore::in_memory().unwrap();
        let err = kv.set("", "value").await.unwrap_err();
        assert!(matches!(err, KvError::InvalidKey(_)));
    }

    #[test]
    fn test_typed_values() {
        let kv = KvStore::in_memory().unwrap();
        let flags = Flags { intro_seen: true };

        kv.set_value("flags", &flags).unwrap();
        let read: Option<Flags> = kv.get_value("flags").unwrap();
        assert_eq!(read, Some(flags));
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("kv.db");
        let config = KvConfig::new(path.to_string_lossy()).flush_every_ms(None);

        {
            let kv = KvStore::new(config.clone()).unwrap();
            kv.set("accessToken", "tok-1").await.unwrap();
        }

        let kv = KvStore::new(config).unwrap();
        assert_eq!(
            kv.get("accessToken").await.unwrap(),
            Some("tok-1".to_string())
        );
    }

    #[test]
    fn test_config_builder() {
        let config = KvConfig::new("custom.db")
            .cache_capacity(1024)
            .use_compression(false)
            .flush_every_ms(None);

        assert_eq!(config.path, "custom.db");
        assert_eq!(config.cache_capacity, 1024);
        assert!(!config.use_compression);
        assert!(config.flush_every_ms.is_none());
    }
}
