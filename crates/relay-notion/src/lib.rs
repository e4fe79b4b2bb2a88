//! Notion API client and entity registry.
//!
//! Watched databases live in Notion; this crate fetches their metadata
//! and exposes them to the coordinator as tracked entities with optional
//! dispatch targets. Implements the [`EntityRegistry`] seam.
//!
//! [`EntityRegistry`]: relay_debounce::EntityRegistry

pub mod client;
pub mod error;
pub mod registry;

pub use client::{DatabaseMeta, NotionClient};
pub use error::{NotionError, Result};
pub use registry::NotionRegistry;
