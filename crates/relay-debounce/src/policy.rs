//! Pure debounce decision logic.

use relay_models::{EntityId, TriggerRecord};

/// Decides when a debounced trigger is due and how new events reschedule
/// it. Pure logic over a record and a timestamp; no I/O.
///
/// The policy is reset-on-retrigger: every qualifying event sets the
/// deadline to `now + delay`, regardless of prior state, so the trigger
/// fires one full delay window after the *last* event in a burst. (The
/// alternative, extending the previous deadline by another delay window
/// on each event, lets a sustained burst postpone firing indefinitely and
/// is deliberately not implemented.)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DebouncePolicy {
    delay_ms: i64,
}

impl DebouncePolicy {
    /// Default debounce window in minutes.
    pub const DEFAULT_DELAY_MINUTES: u32 = 5;

    /// Creates a policy with the given delay window in minutes.
    pub fn from_minutes(minutes: u32) -> Self {
        Self {
            delay_ms: i64::from(minutes) * 60_000,
        }
    }

    /// Returns the delay window in milliseconds.
    pub fn delay_ms(&self) -> i64 {
        self.delay_ms
    }

    /// Computes the record for a qualifying event arriving at `now`.
    ///
    /// The previous record (if any) does not influence the new deadline.
    pub fn reschedule(&self, entity_id: EntityId, now: i64) -> TriggerRecord {
        TriggerRecord::pending(entity_id, now + self.delay_ms, now)
    }

    /// Returns true when the record's trigger should fire at `now`.
    ///
    /// No record, or a record that is not pending, is never due.
    pub fn is_due(record: Option<&TriggerRecord>, now: i64) -> bool {
        match record {
            Some(r) => r.pending && now >= r.next_trigger_time,
            None => false,
        }
    }
}

impl Default for DebouncePolicy {
    fn default() -> Self {
        Self::from_minutes(Self::DEFAULT_DELAY_MINUTES)
    }
}
