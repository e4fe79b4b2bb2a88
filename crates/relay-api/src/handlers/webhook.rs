//! Inbound Notion webhook handler.

use axum::response::{IntoResponse, Response};
use axum::{extract::State, Json};
use relay_debounce::UpdateOutcome;
use relay_models::{EntityId, WebhookPayload};
use serde_json::json;
use tracing::{info, warn};

use crate::error::Result;
use crate::state::AppState;
use crate::types::WebhookAck;

/// POST /webhook/notion - verification handshake and change notifications.
///
/// Updates carrying an unusable entity id are acknowledged with 200 and
/// an `ignored` outcome rather than rejected: the sender retries on
/// error statuses, and there is nothing a retry would fix.
pub async fn notion_webhook(
    State(state): State<AppState>,
    Json(payload): Json<WebhookPayload>,
) -> Result<Response> {
    match payload {
        WebhookPayload::Verification { verification_token } => {
            info!("Webhook verification handshake received");
            Ok(Json(json!({ "verification_token": verification_token })).into_response())
        }
        WebhookPayload::Update(update) => {
            let entity_id = match EntityId::new(&update.entity.id) {
                Ok(id) => id,
                Err(e) => {
                    warn!(raw_id = %update.entity.id, error = %e, "Update with unusable entity id");
                    return Ok(ack(false, "ignored"));
                }
            };

            info!(
                entity = %entity_id,
                event_type = ?update.event_type,
                "Update notification received"
            );

            let outcome = state.coordinator.notify_update(&entity_id).await?;
            let (ok, outcome) = match outcome {
                UpdateOutcome::Scheduled { .. } => (true, "scheduled"),
                UpdateOutcome::Fired => (true, "fired"),
                UpdateOutcome::DispatchFailed => (true, "dispatch_failed"),
                UpdateOutcome::NoTarget => (false, "no_target"),
                UpdateOutcome::Unknown => (false, "unknown_entity"),
            };
            Ok(ack(ok, outcome))
        }
    }
}

fn ack(ok: bool, outcome: &str) -> Response {
    Json(WebhookAck {
        ok,
        outcome: outcome.to_string(),
    })
    .into_response()
}
