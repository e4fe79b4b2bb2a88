//! Best-effort notification channel over Telegram.

use async_trait::async_trait;
use relay_debounce::{Notifier, NotifyOutcome};
use teloxide::prelude::*;
use tracing::debug;

/// Sends coordinator notifications to a fixed chat.
///
/// Delivery is best-effort: send errors become a [`NotifyOutcome::Failed`]
/// the coordinator logs, never an error that propagates into trigger
/// handling.
pub struct TelegramNotifier {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramNotifier {
    /// Creates a notifier for the given bot and chat.
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    async fn notify(&self, message: &str) -> NotifyOutcome {
        match self.bot.send_message(self.chat_id, message).await {
            Ok(_) => {
                debug!(chat_id = %self.chat_id.0, "Notification delivered");
                NotifyOutcome::Sent
            }
            Err(e) => NotifyOutcome::Failed(e.to_string()),
        }
    }
}

/// Notifier used when no chat is configured; every message is dropped
/// with a debug log.
#[derive(Debug, Default, Clone, Copy)]
pub struct SilentNotifier;

#[async_trait]
impl Notifier for SilentNotifier {
    async fn notify(&self, message: &str) -> NotifyOutcome {
        debug!(message = %message, "No notification chat configured; dropping");
        NotifyOutcome::Sent
    }
}
