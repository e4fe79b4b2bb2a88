//! Command handlers for the Telegram bot.

use std::sync::Arc;

use chrono::{TimeZone, Utc};
use relay_debounce::{Coordinator, EntityRegistry, UpdateOutcome};
use relay_models::{EntityId, TrackedEntity};
use teloxide::prelude::*;
use teloxide::types::{InlineKeyboardButton, InlineKeyboardMarkup};
use teloxide::utils::command::BotCommands;
use tracing::{info, warn};

/// Shared context passed into every handler.
pub struct BotContext {
    /// The trigger coordinator.
    pub coordinator: Arc<Coordinator>,
    /// The tracked-entity registry.
    pub registry: Arc<dyn EntityRegistry>,
}

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Start the bot and get help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "List tracked databases and their linked repositories")]
    List,

    #[command(description = "Show pending triggers")]
    Status,

    #[command(description = "Trigger a workflow now: /run <database>")]
    Run(String),

    #[command(description = "Show the configured debounce window")]
    Delay,
}

/// Handle a parsed command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    ctx: Arc<BotContext>,
) -> ResponseResult<()> {
    match cmd {
        Command::Start => handle_start(bot, msg).await,
        Command::Help => handle_help(bot, msg).await,
        Command::List => handle_list(bot, msg, ctx).await,
        Command::Status => handle_status(bot, msg, ctx).await,
        Command::Run(arg) => handle_run(bot, msg, ctx, arg).await,
        Command::Delay => handle_delay(bot, msg, ctx).await,
    }
}

/// Handle the /start command.
async fn handle_start(bot: Bot, msg: Message) -> ResponseResult<()> {
    let welcome = "Welcome to Relay! \u{1F680}\n\n\
        I watch your Notion databases and trigger GitHub Actions workflows \
        when they change.\n\n\
        Use /list to see tracked databases, /status for pending triggers, \
        and /run <database> to fire a workflow right now.\n\n\
        Type /help for all commands.";

    bot.send_message(msg.chat.id, welcome).await?;
    info!(chat_id = %msg.chat.id, "User started bot");
    Ok(())
}

/// Handle the /help command.
async fn handle_help(bot: Bot, msg: Message) -> ResponseResult<()> {
    bot.send_message(msg.chat.id, Command::descriptions().to_string())
        .await?;
    Ok(())
}

/// Handle the /list command.
async fn handle_list(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let entities = match ctx.registry.list_tracked_entities().await {
        Ok(entities) => entities,
        Err(e) => {
            warn!(error = %e, "Failed to list tracked databases");
            bot.send_message(msg.chat.id, format!("Could not reach Notion: {e}"))
                .await?;
            return Ok(());
        }
    };

    if entities.is_empty() {
        bot.send_message(msg.chat.id, "No databases are shared with the relay yet.")
            .await?;
        return Ok(());
    }

    let keyboard = run_keyboard(&entities);
    bot.send_message(msg.chat.id, format_entity_list(&entities))
        .reply_markup(keyboard)
        .await?;
    Ok(())
}

/// Handle the /status command.
async fn handle_status(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let entities = match ctx.registry.list_tracked_entities().await {
        Ok(entities) => entities,
        Err(e) => {
            bot.send_message(msg.chat.id, format!("Could not reach Notion: {e}"))
                .await?;
            return Ok(());
        }
    };

    let mut pending = Vec::new();
    for entity in &entities {
        if let Some(record) = ctx.coordinator.trigger_state(&entity.id).await {
            if record.pending {
                pending.push((entity.title.clone(), record.next_trigger_time));
            }
        }
    }

    bot.send_message(msg.chat.id, format_status(&pending)).await?;
    Ok(())
}

/// Handle the /run command.
async fn handle_run(
    bot: Bot,
    msg: Message,
    ctx: Arc<BotContext>,
    arg: String,
) -> ResponseResult<()> {
    let arg = arg.trim();
    if arg.is_empty() {
        bot.send_message(msg.chat.id, "Usage: /run <database name or id>")
            .await?;
        return Ok(());
    }

    let entities = match ctx.registry.list_tracked_entities().await {
        Ok(entities) => entities,
        Err(e) => {
            bot.send_message(msg.chat.id, format!("Could not reach Notion: {e}"))
                .await?;
            return Ok(());
        }
    };

    let Some(entity) = match_entity(&entities, arg) else {
        bot.send_message(msg.chat.id, format!("No tracked database matches \"{arg}\"."))
            .await?;
        return Ok(());
    };

    run_entity(&bot, msg.chat.id, &ctx, &entity.id).await
}

/// Handle the /delay command.
async fn handle_delay(bot: Bot, msg: Message, ctx: Arc<BotContext>) -> ResponseResult<()> {
    let minutes = ctx.coordinator.policy().delay_ms() / 60_000;
    bot.send_message(
        msg.chat.id,
        format!("Debounce window: {minutes} minute(s) after the last update."),
    )
    .await?;
    Ok(())
}

/// Handle an inline-keyboard callback (`run:<id>`).
pub async fn handle_callback(
    bot: Bot,
    query: teloxide::types::CallbackQuery,
    ctx: Arc<BotContext>,
) -> ResponseResult<()> {
    bot.answer_callback_query(query.id.clone()).await?;

    let Some(data) = query.data.as_deref() else {
        return Ok(());
    };
    let Some(raw_id) = data.strip_prefix("run:") else {
        return Ok(());
    };
    let Ok(entity_id) = EntityId::new(raw_id) else {
        return Ok(());
    };

    if let Some(message) = query.regular_message() {
        run_entity(&bot, message.chat.id, &ctx, &entity_id).await?;
    }
    Ok(())
}

/// Fires the workflow for an entity and reports the outcome to the chat.
async fn run_entity(
    bot: &Bot,
    chat_id: ChatId,
    ctx: &BotContext,
    entity_id: &EntityId,
) -> ResponseResult<()> {
    let reply = match ctx.coordinator.force_fire(entity_id).await {
        Ok(outcome) => run_reply(&outcome),
        Err(e) => {
            warn!(entity = %entity_id, error = %e, "Manual run failed");
            format!("Could not trigger: {e}")
        }
    };
    bot.send_message(chat_id, reply).await?;
    Ok(())
}

/// Maps a manual-run outcome to the chat reply. Total over the outcome
/// enum so a new coordinator outcome can never panic the handler.
fn run_reply(outcome: &UpdateOutcome) -> String {
    match outcome {
        UpdateOutcome::Fired => "Workflow triggered. \u{2705}".to_string(),
        UpdateOutcome::DispatchFailed => {
            "Dispatch failed; the relay will retry on the next sweep.".to_string()
        }
        UpdateOutcome::NoTarget => "That database has no linked repository.".to_string(),
        UpdateOutcome::Unknown => "That database is not tracked.".to_string(),
        UpdateOutcome::Scheduled { .. } => "Trigger scheduled.".to_string(),
    }
}

/// Picks an entity by normalized id or case-insensitive title.
fn match_entity<'a>(entities: &'a [TrackedEntity], arg: &str) -> Option<&'a TrackedEntity> {
    if let Ok(id) = EntityId::new(arg) {
        if let Some(entity) = entities.iter().find(|e| e.id == id) {
            return Some(entity);
        }
    }
    entities
        .iter()
        .find(|e| e.title.eq_ignore_ascii_case(arg))
}

/// Builds one "Run" button per linked database.
fn run_keyboard(entities: &[TrackedEntity]) -> InlineKeyboardMarkup {
    let rows: Vec<Vec<InlineKeyboardButton>> = entities
        .iter()
        .filter(|e| e.dispatch_target.is_some())
        .map(|e| {
            vec![InlineKeyboardButton::callback(
                format!("Run {}", e.title),
                format!("run:{}", e.id),
            )]
        })
        .collect();
    InlineKeyboardMarkup::new(rows)
}

/// Formats the /list reply.
fn format_entity_list(entities: &[TrackedEntity]) -> String {
    let mut lines = vec!["Tracked databases:".to_string()];
    for entity in entities {
        let link = match &entity.dispatch_target {
            Some(target) => format!("\u{2192} {target}"),
            None => "(no repository linked)".to_string(),
        };
        lines.push(format!("\u{2022} {} {}", entity.title, link));
    }
    lines.join("\n")
}

/// Formats the /status reply from (title, next_trigger_time) pairs.
fn format_status(pending: &[(String, i64)]) -> String {
    if pending.is_empty() {
        return "No pending triggers.".to_string();
    }

    let mut lines = vec!["Pending triggers:".to_string()];
    for (title, next_ms) in pending {
        let when = Utc
            .timestamp_millis_opt(*next_ms)
            .single()
            .map(|t| t.format("%H:%M:%S UTC").to_string())
            .unwrap_or_else(|| format!("{next_ms} ms"));
        lines.push(format!("\u{2022} {title} fires at {when}"));
    }
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_models::DispatchTarget;

    fn entities() -> Vec<TrackedEntity> {
        vec![
            TrackedEntity::new(EntityId::new("aaa111").unwrap(), "Tasks")
                .with_target(DispatchTarget::new("octocat", "tasks-repo")),
            TrackedEntity::new(EntityId::new("bbb222").unwrap(), "Scratchpad"),
        ]
    }

    #[test]
    fn test_match_entity_by_id() {
        let entities = entities();
        // Hyphenated form normalizes to the same id.
        let found = match_entity(&entities, "aaa-111").unwrap();
        assert_eq!(found.title, "Tasks");
    }

    #[test]
    fn test_match_entity_by_title() {
        let entities = entities();
        let found = match_entity(&entities, "scratchpad").unwrap();
        assert_eq!(found.title, "Scratchpad");
    }

    #[test]
    fn test_match_entity_none() {
        assert!(match_entity(&entities(), "nope").is_none());
    }

    #[test]
    fn test_format_entity_list() {
        let text = format_entity_list(&entities());
        assert!(text.contains("Tasks"));
        assert!(text.contains("octocat/tasks-repo"));
        assert!(text.contains("no repository linked"));
    }

    #[test]
    fn test_format_status_empty() {
        assert_eq!(format_status(&[]), "No pending triggers.");
    }

    #[test]
    fn test_format_status_pending() {
        let text = format_status(&[("Tasks".to_string(), 0)]);
        assert!(text.contains("Tasks"));
        assert!(text.contains("00:00:00 UTC"));
    }

    #[test]
    fn test_run_reply_total_over_outcomes() {
        // Every coordinator outcome gets a reply; none may panic, even
        // ones a manual run is not expected to produce.
        let outcomes = [
            UpdateOutcome::Fired,
            UpdateOutcome::DispatchFailed,
            UpdateOutcome::NoTarget,
            UpdateOutcome::Unknown,
            UpdateOutcome::Scheduled { next_trigger_time: 0 },
        ];
        for outcome in &outcomes {
            assert!(!run_reply(outcome).is_empty());
        }
    }

    #[test]
    fn test_run_keyboard_only_linked() {
        let keyboard = run_keyboard(&entities());
        // Only "Tasks" is linked; "Scratchpad" gets no button.
        assert_eq!(keyboard.inline_keyboard.len(), 1);
    }
}
