//! Delayed-trigger state stored per tracked entity.

use serde::{Deserialize, Serialize};

use crate::entity::EntityId;

/// Debounce state for one tracked entity.
///
/// One record exists per entity id while a trigger is scheduled. The
/// record is a full-overwrite value in the key-value store: writes never
/// merge fields, and the record is deleted outright once the downstream
/// dispatch has been confirmed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerRecord {
    /// Normalized id of the watched entity.
    pub entity_id: EntityId,
    /// Earliest time (epoch milliseconds) the debounced action may fire.
    pub next_trigger_time: i64,
    /// True while an action is scheduled and not yet fired or cleared.
    pub pending: bool,
    /// Last time (epoch milliseconds) this record was written.
    pub updated_at: i64,
}

impl TriggerRecord {
    /// Creates a pending record that may fire at `next_trigger_time`.
    pub fn pending(entity_id: EntityId, next_trigger_time: i64, now: i64) -> Self {
        Self {
            entity_id,
            next_trigger_time,
            pending: true,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_constructor() {
        let id = EntityId::new("abc123").unwrap();
        let record = TriggerRecord::pending(id.clone(), 5_000, 1_000);
        assert_eq!(record.entity_id, id);
        assert_eq!(record.next_trigger_time, 5_000);
        assert!(record.pending);
        assert_eq!(record.updated_at, 1_000);
    }

    #[test]
    fn test_record_json_roundtrip() {
        let id = EntityId::new("abcd-1234").unwrap();
        let record = TriggerRecord::pending(id, 42, 40);
        let json = serde_json::to_string(&record).unwrap();
        let back: TriggerRecord = serde_json::from_str(&json).unwrap();
        assert_eq!(record, back);
        // Normalized form is what gets serialized.
        assert!(json.contains("abcd1234"));
    }
}
