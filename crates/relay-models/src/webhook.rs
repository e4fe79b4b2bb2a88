//! Inbound webhook payload shapes.
//!
//! Notion delivers two payload shapes on the same endpoint: a one-time
//! verification handshake carrying `verification_token`, and regular
//! change notifications carrying the affected entity. They are modeled as
//! a tagged union discriminated by which fields are present, instead of
//! probing optional properties at the call sites.

use serde::{Deserialize, Serialize};

/// A payload delivered to the webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WebhookPayload {
    /// Endpoint-verification handshake; the token must be echoed back.
    Verification {
        /// Token to echo in the response body.
        verification_token: String,
    },
    /// A change notification for a watched entity.
    Update(UpdateNotification),
}

/// A change notification for a watched entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateNotification {
    /// The entity the notification refers to.
    pub entity: WebhookEntity,
    /// Event type string as sent by the source (e.g. `page.content_updated`).
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    /// Delivery timestamp as sent by the source.
    #[serde(default)]
    pub timestamp: Option<String>,
}

/// Entity reference inside an update notification.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookEntity {
    /// Raw (possibly hyphenated) entity id.
    pub id: String,
    /// Entity kind (`database`, `page`, ...).
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verification_payload() {
        let json = r#"{"verification_token": "secret-token"}"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match payload {
            WebhookPayload::Verification { verification_token } => {
                assert_eq!(verification_token, "secret-token");
            }
            WebhookPayload::Update(_) => panic!("expected verification variant"),
        }
    }

    #[test]
    fn test_update_payload() {
        let json = r#"{
            "entity": {"id": "abcd-1234", "type": "database"},
            "type": "page.content_updated",
            "timestamp": "2024-06-01T12:00:00.000Z"
        }"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        match payload {
            WebhookPayload::Update(update) => {
                assert_eq!(update.entity.id, "abcd-1234");
                assert_eq!(update.entity.kind.as_deref(), Some("database"));
                assert_eq!(update.event_type.as_deref(), Some("page.content_updated"));
            }
            WebhookPayload::Verification { .. } => panic!("expected update variant"),
        }
    }

    #[test]
    fn test_update_payload_minimal() {
        // Only the entity reference is required.
        let json = r#"{"entity": {"id": "abcd1234"}}"#;
        let payload: WebhookPayload = serde_json::from_str(json).unwrap();
        assert!(matches!(payload, WebhookPayload::Update(_)));
    }
}
