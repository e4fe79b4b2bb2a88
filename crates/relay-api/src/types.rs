//! Response types for the API.

use serde::Serialize;

/// Response for `GET /api/health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always "ok" when the server responds.
    pub status: String,
    /// Crate version.
    pub version: String,
    /// Seconds since the server started.
    pub uptime_seconds: u64,
}

/// Acknowledgment for `POST /webhook/notion`.
#[derive(Debug, Serialize)]
pub struct WebhookAck {
    /// Whether the update resulted in trigger state.
    pub ok: bool,
    /// What the relay did: `scheduled`, `fired`, `dispatch_failed`,
    /// `no_target`, `unknown_entity`, or `ignored`.
    pub outcome: String,
}

/// Response for `POST /api/sweep`.
#[derive(Debug, Serialize)]
pub struct SweepResponse {
    pub scanned: usize,
    pub skipped: usize,
    pub fired: usize,
    pub failed: usize,
}
