//! Trigger record access over the key-value store.

use std::sync::Arc;

use relay_models::{EntityId, TriggerRecord};
use relay_persistence::KvStore;
use tracing::warn;

use crate::error::Result;

/// Key prefix for trigger records.
pub const TRIGGER_KEY_PREFIX: &str = "trigger:";

/// Reads and writes per-entity trigger records.
///
/// Keys are `trigger:` plus the normalized entity id, so differently
/// formatted ids for the same entity collide to the same record. Reads
/// fail soft: a transport or deserialization error is logged and treated
/// as "no record", favoring eventually re-arming a trigger over silently
/// losing track of it. Writes propagate store errors to the caller.
pub struct TriggerStore {
    store: Arc<dyn KvStore>,
}

impl TriggerStore {
    /// Creates a new TriggerStore over the given key-value store.
    pub fn new(store: Arc<dyn KvStore>) -> Self {
        Self { store }
    }

    /// Returns the store key for an entity.
    fn key(entity_id: &EntityId) -> String {
        format!("{}{}", TRIGGER_KEY_PREFIX, entity_id)
    }

    /// Loads the trigger record for an entity, or `None` if absent.
    ///
    /// Never returns an error: read and parse failures are logged and
    /// reported as absent.
    pub async fn get(&self, entity_id: &EntityId) -> Option<TriggerRecord> {
        let key = Self::key(entity_id);
        let raw = match self.store.get(&key).await {
            Ok(raw) => raw?,
            Err(e) => {
                warn!(key = %key, error = %e, "Trigger record read failed; treating as absent");
                return None;
            }
        };

        match serde_json::from_str(&raw) {
            Ok(record) => Some(record),
            Err(e) => {
                warn!(key = %key, error = %e, "Trigger record unparseable; treating as absent");
                None
            }
        }
    }

    /// Stores a trigger record, overwriting any existing one.
    pub async fn put(&self, record: &TriggerRecord) -> Result<()> {
        let key = Self::key(&record.entity_id);
        let json = serde_json::to_string(record)?;
        self.store.put(&key, &json).await?;
        Ok(())
    }

    /// Deletes the trigger record for an entity. Idempotent.
    pub async fn delete(&self, entity_id: &EntityId) -> Result<()> {
        self.store.delete(&Self::key(entity_id)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use relay_persistence::{MemoryKvStore, PersistenceError};

    fn entity(raw: &str) -> EntityId {
        EntityId::new(raw).unwrap()
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let store = TriggerStore::new(Arc::new(MemoryKvStore::new()));
        let record = TriggerRecord::pending(entity("abc123"), 5_000, 1_000);

        store.put(&record).await.unwrap();
        let loaded = store.get(&entity("abc123")).await.unwrap();
        assert_eq!(loaded, record);
    }

    #[tokio::test]
    async fn test_get_absent_is_none() {
        let store = TriggerStore::new(Arc::new(MemoryKvStore::new()));
        assert!(store.get(&entity("missing")).await.is_none());
    }

    #[tokio::test]
    async fn test_normalized_ids_share_a_record() {
        // Ids differing only by separators map to the same record.
        let store = TriggerStore::new(Arc::new(MemoryKvStore::new()));
        let record = TriggerRecord::pending(entity("abcd-1234"), 5_000, 1_000);

        store.put(&record).await.unwrap();
        let loaded = store.get(&entity("abcd1234")).await;
        assert!(loaded.is_some());
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        // Deleting an absent record is not an error.
        let store = TriggerStore::new(Arc::new(MemoryKvStore::new()));
        store.delete(&entity("never-existed")).await.unwrap();

        let record = TriggerRecord::pending(entity("abc123"), 5_000, 1_000);
        store.put(&record).await.unwrap();
        store.delete(&entity("abc123")).await.unwrap();
        store.delete(&entity("abc123")).await.unwrap();
        assert!(store.get(&entity("abc123")).await.is_none());
    }

    #[tokio::test]
    async fn test_get_corrupt_record_is_absent() {
        let kv = Arc::new(MemoryKvStore::new());
        kv.put("trigger:abc123", "not json").await.unwrap();

        let store = TriggerStore::new(kv);
        assert!(store.get(&entity("abc123")).await.is_none());
    }

    /// Store whose reads always fail, to exercise the soft-fail path.
    struct BrokenKvStore;

    #[async_trait]
    impl KvStore for BrokenKvStore {
        async fn get(&self, key: &str) -> relay_persistence::Result<Option<String>> {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
        async fn put(&self, key: &str, _value: &str) -> relay_persistence::Result<()> {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
        async fn delete(&self, key: &str) -> relay_persistence::Result<()> {
            Err(PersistenceError::InvalidKey(key.to_string()))
        }
        async fn list_keys(&self, _prefix: &str) -> relay_persistence::Result<Vec<String>> {
            Ok(Vec::new())
        }
    }

    #[tokio::test]
    async fn test_get_transport_failure_is_absent() {
        let store = TriggerStore::new(Arc::new(BrokenKvStore));
        assert!(store.get(&entity("abc123")).await.is_none());
    }

    #[tokio::test]
    async fn test_put_failure_propagates() {
        let store = TriggerStore::new(Arc::new(BrokenKvStore));
        let record = TriggerRecord::pending(entity("abc123"), 5_000, 1_000);
        assert!(store.put(&record).await.is_err());
    }
}
