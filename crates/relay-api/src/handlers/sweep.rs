//! Manual sweep trigger.

use axum::{extract::State, Json};

use crate::error::Result;
use crate::state::AppState;
use crate::types::SweepResponse;

/// POST /api/sweep - run one sweep over all tracked entities.
///
/// Same code path as the periodic tick; exposed so an external scheduler
/// can drive the cadence instead of the built-in interval.
pub async fn run_sweep(State(state): State<AppState>) -> Result<Json<SweepResponse>> {
    let summary = state.coordinator.run_sweep().await?;
    Ok(Json(SweepResponse {
        scanned: summary.scanned,
        skipped: summary.skipped,
        fired: summary.fired,
        failed: summary.failed,
    }))
}
