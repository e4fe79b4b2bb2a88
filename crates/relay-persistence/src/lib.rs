//! Key-value persistence for Relay.
//!
//! This crate defines the store contract the relay keeps its trigger
//! state in, plus two implementations: a crash-safe file-backed store
//! (write to temp file, then rename) and an in-memory store for tests.
//!
//! # Example
//!
//! ```no_run
//! use relay_persistence::{FileKvStore, KvStore};
//!
//! # async fn demo() -> relay_persistence::Result<()> {
//! let store = FileKvStore::new("/var/lib/relay");
//! store.put("trigger:abc123", r#"{"pending":true}"#).await?;
//! let value = store.get("trigger:abc123").await?;
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod file_store;
pub mod kv;

pub use error::{PersistenceError, Result};
pub use file_store::FileKvStore;
pub use kv::{KvStore, MemoryKvStore};
