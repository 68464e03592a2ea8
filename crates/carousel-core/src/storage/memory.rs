//! In-memory storage implementation.

use super::{BoxFuture, KeyValueStore, StorageError, StorageResult};
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory store for tests and ephemeral sessions.
///
/// An optional byte quota mimics the size limit of browser storage.
#[derive(Default)]
pub struct MemoryStore {
    values: RwLock<HashMap<String, String>>,
    quota: Option<usize>,
}

impl MemoryStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store that rejects writes once keys plus values exceed `bytes`.
    pub fn with_quota(bytes: usize) -> Self {
        Self {
            values: RwLock::default(),
            quota: Some(bytes),
        }
    }

    fn lock_error(e: impl std::fmt::Display) -> StorageError {
        StorageError::Other(format!("Lock error: {}", e))
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> BoxFuture<'_, StorageResult<Option<String>>> {
        let key = key.to_string();
        Box::pin(async move {
            let values = self.values.read().map_err(Self::lock_error)?;
            Ok(values.get(&key).cloned())
        })
    }

    fn set(&self, key: &str, value: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        let value = value.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(Self::lock_error)?;
            if let Some(quota) = self.quota {
                let others: usize = values
                    .iter()
                    .filter(|(k, _)| **k != key)
                    .map(|(k, v)| k.len() + v.len())
                    .sum();
                let needed = others + key.len() + value.len();
                if needed > quota {
                    return Err(StorageError::QuotaExceeded { needed, quota });
                }
            }
            values.insert(key, value);
            Ok(())
        })
    }

    fn remove(&self, key: &str) -> BoxFuture<'_, StorageResult<()>> {
        let key = key.to_string();
        Box::pin(async move {
            let mut values = self.values.write().map_err(Self::lock_error)?;
            values.remove(&key);
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pollster::block_on;

    #[test]
    fn test_set_and_get() {
        let store = MemoryStore::new();
        block_on(store.set("a", "1")).unwrap();
        assert_eq!(block_on(store.get("a")).unwrap().as_deref(), Some("1"));
    }

    #[test]
    fn test_missing_key() {
        let store = MemoryStore::new();
        assert_eq!(block_on(store.get("missing")).unwrap(), None);
    }

    #[test]
    fn test_remove() {
        let store = MemoryStore::new();
        block_on(store.set("a", "1")).unwrap();
        block_on(store.remove("a")).unwrap();
        block_on(store.remove("a")).unwrap();
        assert_eq!(block_on(store.get("a")).unwrap(), None);
    }

    #[test]
    fn test_quota() {
        let store = MemoryStore::with_quota(10);
        block_on(store.set("k", "12345")).unwrap();
        // Overwriting the same key only counts the new value.
        block_on(store.set("k", "123456789")).unwrap();
        let result = block_on(store.set("other", "123456"));
        assert!(matches!(result, Err(StorageError::QuotaExceeded { .. })));
        assert_eq!(block_on(store.get("other")).unwrap(), None);
    }
}
