//! HTTP surface for Relay.
//!
//! Routes:
//! - `POST /webhook/notion`: inbound change notifications and the
//!   endpoint-verification handshake.
//! - `POST /api/sweep`: fire due triggers now (same code path as the
//!   periodic tick, for external schedulers).
//! - `GET /api/health`: status/version/uptime.
//! - `GET /`: HTML status page.

pub mod config;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod types;

pub use config::ApiConfig;
pub use error::{ApiError, Result};
pub use router::{create_router, serve};
pub use state::AppState;
