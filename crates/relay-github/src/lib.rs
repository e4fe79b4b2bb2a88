//! GitHub Actions trigger client.
//!
//! Fires `repository_dispatch` events against the GitHub REST API so
//! workflows listening for the relay's event type run. Implements the
//! coordinator's [`Dispatcher`] seam.

pub mod client;
pub mod error;

pub use client::GithubClient;
pub use error::{GithubError, Result};
