//! The key-value store contract and an in-memory implementation.

use std::collections::BTreeMap;
use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::Result;

/// A string-keyed store of string values.
///
/// This is the single source of truth shared by all relay invocations.
/// Values are opaque to the store; callers serialize before `put` and
/// deserialize after `get`. Writes are full-value overwrites: there is no
/// partial update and no compare-and-swap, so overlapping writers are
/// last-writer-wins.
#[async_trait]
pub trait KvStore: Send + Sync {
    /// Returns the value for `key`, or `None` if absent.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Stores `value` under `key`, overwriting any existing value.
    async fn put(&self, key: &str, value: &str) -> Result<()>;

    /// Removes `key`. Deleting an absent key is not an error.
    async fn delete(&self, key: &str) -> Result<()>;

    /// Lists all keys starting with `prefix`, sorted.
    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>>;
}

/// In-memory store for tests and ephemeral runs.
#[derive(Default)]
pub struct MemoryKvStore {
    entries: RwLock<BTreeMap<String, String>>,
}

impl MemoryKvStore {
    /// Creates an empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner).len()
    }

    /// Returns true when the store holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl KvStore for MemoryKvStore {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    async fn put(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn delete(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().unwrap_or_else(std::sync::PoisonError::into_inner);
        entries.remove(key);
        Ok(())
    }

    async fn list_keys(&self, prefix: &str) -> Result<Vec<String>> {
        let entries = self.entries.read().unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(entries
            .keys()
            .filter(|k| k.starts_with(prefix))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_roundtrip() {
        let store = MemoryKvStore::new();
        store.put("trigger:abc", "value").await.unwrap();
        assert_eq!(store.get("trigger:abc").await.unwrap().as_deref(), Some("value"));
    }

    #[tokio::test]
    async fn test_get_absent() {
        let store = MemoryKvStore::new();
        assert!(store.get("missing").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_put_overwrites() {
        let store = MemoryKvStore::new();
        store.put("k", "one").await.unwrap();
        store.put("k", "two").await.unwrap();
        assert_eq!(store.get("k").await.unwrap().as_deref(), Some("two"));
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let store = MemoryKvStore::new();
        store.put("k", "v").await.unwrap();
        store.delete("k").await.unwrap();
        // Second delete of an absent key must not error.
        store.delete("k").await.unwrap();
        assert!(store.get("k").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_keys_by_prefix() {
        let store = MemoryKvStore::new();
        store.put("trigger:a", "1").await.unwrap();
        store.put("trigger:b", "2").await.unwrap();
        store.put("other:c", "3").await.unwrap();

        let keys = store.list_keys("trigger:").await.unwrap();
        assert_eq!(keys, vec!["trigger:a".to_string(), "trigger:b".to_string()]);
    }
}
