//! Main Telegram bot implementation.

use std::sync::Arc;

use teloxide::dispatching::UpdateFilterExt;
use teloxide::prelude::*;
use tracing::{info, warn};

use crate::error::{Result, TelegramError};
use crate::handlers::{handle_callback, handle_command, BotContext, Command};

/// The Telegram bot for Relay.
pub struct RelayBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Shared context across handlers.
    ctx: Arc<BotContext>,
}

impl RelayBot {
    /// Creates a new RelayBot instance.
    ///
    /// Requires `TELEGRAM_BOT_TOKEN` environment variable to be set.
    pub fn new(ctx: Arc<BotContext>) -> Result<Self> {
        let token = std::env::var("TELEGRAM_BOT_TOKEN").map_err(|_| TelegramError::NoToken)?;
        Ok(Self::with_bot(Bot::new(token), ctx))
    }

    /// Creates a RelayBot over an existing bot instance.
    pub fn with_bot(bot: Bot, ctx: Arc<BotContext>) -> Self {
        Self { bot, ctx }
    }

    /// Returns a clone of the underlying bot, for the notifier.
    pub fn bot(&self) -> Bot {
        self.bot.clone()
    }

    /// Gets the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Starts the bot in polling mode.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let bot = self.bot.clone();
        let ctx_for_commands = Arc::clone(&self.ctx);
        let ctx_for_callbacks = Arc::clone(&self.ctx);

        let handler = dptree::entry()
            .branch(
                Update::filter_callback_query().endpoint(
                    move |bot: Bot, q: teloxide::types::CallbackQuery| {
                        let ctx = Arc::clone(&ctx_for_callbacks);
                        async move { handle_callback(bot, q, ctx).await }
                    },
                ),
            )
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let ctx = Arc::clone(&ctx_for_commands);
                        info!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, ctx).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| {
                        msg.text().map(|t| t.starts_with('/')).unwrap_or(false)
                    })
                    .endpoint(move |bot: Bot, msg: Message| async move {
                        if let Some(text) = msg.text() {
                            bot.send_message(
                                msg.chat.id,
                                format!(
                                    "Unknown command: {}\n\nUse /help to see available commands.",
                                    text.split_whitespace().next().unwrap_or(text)
                                ),
                            )
                            .await?;
                        }
                        Ok(())
                    }),
            );

        info!("Bot is running! Send /start to begin.");

        Dispatcher::builder(bot, handler)
            .default_handler(|upd| async move {
                warn!("Unhandled update: {:?}", upd);
            })
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        Ok(())
    }
}
