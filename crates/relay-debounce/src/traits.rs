//! Collaborator seams for the coordinator.
//!
//! Each external system the coordinator talks to sits behind a trait, and
//! instances are passed in at construction time. No module-level
//! singletons: tests get fresh fakes per case.

use async_trait::async_trait;
use relay_models::{DispatchTarget, EntityId, TrackedEntity};

/// Error type collaborators return across the seam.
pub type CollabError = Box<dyn std::error::Error + Send + Sync>;

/// Triggers the downstream action for a dispatch target.
#[async_trait]
pub trait Dispatcher: Send + Sync {
    /// Fires the downstream dispatch for `target`.
    async fn dispatch(&self, target: &DispatchTarget) -> Result<(), CollabError>;
}

/// Outcome of a best-effort notification send.
///
/// The coordinator inspects this only for logging; a failed notification
/// never changes control flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotifyOutcome {
    /// The message was delivered.
    Sent,
    /// Delivery failed; the reason is recorded for the log line.
    Failed(String),
}

/// Best-effort notification channel (Telegram in production).
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Sends `message`, swallowing any delivery failure into the outcome.
    async fn notify(&self, message: &str) -> NotifyOutcome;
}

/// Registry of tracked entities (Notion databases in production).
#[async_trait]
pub trait EntityRegistry: Send + Sync {
    /// Lists every entity known to the system.
    async fn list_tracked_entities(&self) -> Result<Vec<TrackedEntity>, CollabError>;

    /// Looks up a single entity by normalized id.
    async fn find_entity(&self, id: &EntityId) -> Result<Option<TrackedEntity>, CollabError>;
}

/// Time source, injected so debounce behavior is testable without
/// sleeping.
pub trait Clock: Send + Sync {
    /// Current time in epoch milliseconds.
    fn now_ms(&self) -> i64;
}

/// Wall-clock time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_ms(&self) -> i64 {
        chrono::Utc::now().timestamp_millis()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock_advances() {
        let clock = SystemClock;
        let a = clock.now_ms();
        let b = clock.now_ms();
        assert!(b >= a);
        // Sanity: later than 2020-01-01.
        assert!(a > 1_577_836_800_000);
    }
}
