//! Delayed-trigger debounce for Relay.
//!
//! This crate is the heart of the relay: it coalesces bursts of update
//! events for a tracked entity into a single downstream dispatch, fired
//! once a quiet period has elapsed after the most recent event.
//!
//! Three pieces:
//! - [`DebouncePolicy`]: pure decision logic over a trigger record and
//!   the current time, no I/O.
//! - [`TriggerStore`]: per-entity trigger records in the key-value store.
//! - [`Coordinator`]: orchestration of inbound updates, immediate-due
//!   firing, and the periodic sweep.
//!
//! Collaborators (GitHub dispatch, Telegram notifications, the Notion
//! entity registry, the clock) are injected behind the traits in
//! [`traits`], so every test gets fresh, isolated instances.

pub mod coordinator;
pub mod error;
pub mod policy;
pub mod store;
pub mod traits;

pub use coordinator::{Coordinator, SweepSummary, UpdateOutcome};
pub use error::{DebounceError, Result};
pub use policy::DebouncePolicy;
pub use store::{TriggerStore, TRIGGER_KEY_PREFIX};
pub use traits::{Clock, CollabError, Dispatcher, EntityRegistry, Notifier, NotifyOutcome, SystemClock};
