//! Telegram control surface for Relay.
//!
//! The bot is both a control surface (list tracked databases, inspect
//! pending triggers, fire a workflow by hand) and the notification
//! channel the coordinator reports through.

pub mod bot;
pub mod error;
pub mod handlers;
pub mod notifier;

pub use bot::RelayBot;
pub use error::{Result, TelegramError};
pub use handlers::Command;
pub use notifier::{SilentNotifier, TelegramNotifier};
