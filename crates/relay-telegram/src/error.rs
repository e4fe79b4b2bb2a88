//! Error types for the Telegram bot.

use thiserror::Error;

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;

/// Errors that can occur in the Telegram bot.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Bot token not provided.
    #[error("Telegram bot token not set. Set TELEGRAM_BOT_TOKEN environment variable.")]
    NoToken,

    /// Chat id for notifications not provided or unparseable.
    #[error("Notification chat id invalid: {0}")]
    BadChatId(String),

    /// Failed to start the bot.
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),
}
