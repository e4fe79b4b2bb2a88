//! Relay server binary.
//!
//! Start the relay with:
//! ```bash
//! RELAY_NOTION_TOKEN=xxx RELAY_GITHUB_TOKEN=yyy TELEGRAM_BOT_TOKEN=zzz cargo run -p relay
//! ```

mod config;

use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use relay_api::{ApiConfig, AppState};
use relay_debounce::{Coordinator, DebouncePolicy, Notifier, SystemClock, TriggerStore};
use relay_github::GithubClient;
use relay_notion::{NotionClient, NotionRegistry};
use relay_persistence::FileKvStore;
use relay_telegram::{handlers::BotContext, RelayBot, SilentNotifier, TelegramNotifier};
use teloxide::types::ChatId;
use tokio::time::interval;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::RelayConfig;

/// Relay - trigger GitHub Actions from Notion changes, with Telegram control
#[derive(Parser, Debug)]
#[command(name = "relay")]
#[command(about = "Webhook relay: Notion database changes trigger GitHub Actions workflows")]
struct Args {
    /// HTTP bind host (overrides RELAY_HOST)
    #[arg(long)]
    host: Option<String>,

    /// HTTP bind port (overrides RELAY_PORT)
    #[arg(long)]
    port: Option<u16>,

    /// Verbose logging (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    let _ = dotenvy::dotenv();

    let filter = match args.verbose {
        0 => "relay=info,teloxide=warn",
        1 => "relay=debug,teloxide=info",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut config = RelayConfig::from_env()?;
    if let Some(host) = args.host {
        config.host = host;
    }
    if let Some(port) = args.port {
        config.port = port;
    }

    // Collaborators.
    let notion = NotionClient::from_env()?;
    let registry = Arc::new(
        NotionRegistry::new(notion).with_overrides(config.dispatch_map.clone()),
    );

    let mut github = GithubClient::from_env()?;
    if let Some(event_type) = &config.github_event_type {
        github = github.with_event_type(event_type);
    }

    // Telegram is optional: without a token the relay still relays, it
    // just has no control surface and drops notifications.
    let telegram_bot = match std::env::var("TELEGRAM_BOT_TOKEN") {
        Ok(token) => Some(teloxide::Bot::new(token)),
        Err(_) => {
            warn!("TELEGRAM_BOT_TOKEN not set; running without Telegram");
            None
        }
    };

    let notifier: Arc<dyn Notifier> = match (&telegram_bot, config.telegram_chat_id) {
        (Some(bot), Some(chat_id)) => {
            Arc::new(TelegramNotifier::new(bot.clone(), ChatId(chat_id)))
        }
        _ => Arc::new(SilentNotifier),
    };

    // The coordinator and its trigger state.
    let store = Arc::new(FileKvStore::new(&config.state_dir));
    let coordinator = Arc::new(Coordinator::new(
        TriggerStore::new(store),
        DebouncePolicy::from_minutes(config.debounce_delay_minutes),
        registry.clone(),
        Arc::new(github),
        notifier,
        Arc::new(SystemClock),
    ));

    info!(
        delay_minutes = config.debounce_delay_minutes,
        state_dir = %config.state_dir.display(),
        "Relay configured"
    );

    // Periodic sweep.
    let sweep_coordinator = Arc::clone(&coordinator);
    let sweep_interval_secs = config.sweep_interval_secs;
    tokio::spawn(async move {
        let mut tick = interval(Duration::from_secs(sweep_interval_secs));
        loop {
            tick.tick().await;
            if let Err(e) = sweep_coordinator.run_sweep().await {
                error!(error = %e, "Sweep failed");
            }
        }
    });

    // Telegram bot.
    if let Some(bot) = telegram_bot {
        let ctx = Arc::new(BotContext {
            coordinator: Arc::clone(&coordinator),
            registry: registry.clone(),
        });
        let relay_bot = RelayBot::with_bot(bot, ctx);
        match relay_bot.get_me().await {
            Ok(username) => info!(username = %username, "Telegram bot initialized"),
            Err(e) => warn!(error = %e, "Could not fetch Telegram bot info"),
        }
        tokio::spawn(async move {
            if let Err(e) = relay_bot.start_polling().await {
                error!(error = %e, "Telegram bot stopped");
            }
        });
    }

    // HTTP surface.
    let api_config = ApiConfig::new(config.host.clone(), config.port);
    let state = AppState::new(api_config.clone(), coordinator, registry);
    relay_api::serve(api_config, state).await?;

    Ok(())
}
