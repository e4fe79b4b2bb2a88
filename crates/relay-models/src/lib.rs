//! Core data models for Relay.
//!
//! This crate provides the fundamental data types used throughout the
//! relay: entity identifiers, trigger records, dispatch targets, and the
//! inbound webhook payload shapes.

pub mod entity;
pub mod trigger;
pub mod webhook;

// Re-export main types
pub use entity::{DispatchTarget, EntityId, IdError, TrackedEntity};
pub use trigger::TriggerRecord;
pub use webhook::{UpdateNotification, WebhookEntity, WebhookPayload};
