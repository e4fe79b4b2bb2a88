//! Error types for the debounce subsystem.

use thiserror::Error;

/// Result type for debounce operations.
pub type Result<T> = std::result::Result<T, DebounceError>;

/// Errors that can occur in the debounce subsystem.
#[derive(Debug, Error)]
pub enum DebounceError {
    /// The key-value store failed on a write or delete.
    #[error("store error: {0}")]
    Store(#[from] relay_persistence::PersistenceError),

    /// A trigger record could not be serialized.
    #[error("serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// The entity registry could not be queried.
    #[error("registry error: {0}")]
    Registry(String),
}
