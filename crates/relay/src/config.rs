//! Runtime configuration from environment variables.
//!
//! All settings use a `RELAY_` prefix (the Telegram token keeps the
//! conventional `TELEGRAM_BOT_TOKEN` name teloxide expects):
//!
//! - `RELAY_HOST` / `RELAY_PORT`: HTTP bind address (default 127.0.0.1:8787)
//! - `RELAY_STATE_DIR`: trigger-state directory (default `./relay-state`)
//! - `RELAY_DEBOUNCE_DELAY_MINUTES`: quiet period before a trigger fires
//!   (default 5)
//! - `RELAY_SWEEP_INTERVAL_SECS`: built-in sweep cadence (default 60)
//! - `RELAY_DISPATCH_MAP`: `db_id=owner/repo` pairs, comma separated,
//!   overriding targets found in Notion database descriptions
//! - `RELAY_TELEGRAM_CHAT_ID`: chat that receives notifications
//! - `RELAY_GITHUB_EVENT_TYPE`: event type for repository_dispatch

use std::collections::HashMap;
use std::path::PathBuf;

use relay_models::{DispatchTarget, EntityId};
use thiserror::Error;

/// Environment variable for the HTTP host.
pub const HOST_ENV: &str = "RELAY_HOST";

/// Environment variable for the HTTP port.
pub const PORT_ENV: &str = "RELAY_PORT";

/// Environment variable for the state directory.
pub const STATE_DIR_ENV: &str = "RELAY_STATE_DIR";

/// Environment variable for the debounce window in minutes.
pub const DELAY_ENV: &str = "RELAY_DEBOUNCE_DELAY_MINUTES";

/// Environment variable for the sweep cadence in seconds.
pub const SWEEP_INTERVAL_ENV: &str = "RELAY_SWEEP_INTERVAL_SECS";

/// Environment variable for the dispatch-target override map.
pub const DISPATCH_MAP_ENV: &str = "RELAY_DISPATCH_MAP";

/// Environment variable for the notification chat id.
pub const CHAT_ID_ENV: &str = "RELAY_TELEGRAM_CHAT_ID";

/// Environment variable for the repository_dispatch event type.
pub const EVENT_TYPE_ENV: &str = "RELAY_GITHUB_EVENT_TYPE";

const DEFAULT_HOST: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8787;
const DEFAULT_STATE_DIR: &str = "relay-state";
const DEFAULT_DELAY_MINUTES: u32 = 5;
const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 60;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A `RELAY_DISPATCH_MAP` entry was not `db_id=owner/repo`.
    #[error("invalid {DISPATCH_MAP_ENV} entry: {0}")]
    InvalidDispatchMapEntry(String),
}

/// Resolved runtime configuration.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// HTTP bind host.
    pub host: String,
    /// HTTP bind port.
    pub port: u16,
    /// Directory the file-backed trigger store lives in.
    pub state_dir: PathBuf,
    /// Debounce window in minutes.
    pub debounce_delay_minutes: u32,
    /// Cadence of the built-in sweep, in seconds.
    pub sweep_interval_secs: u64,
    /// Per-database dispatch-target overrides.
    pub dispatch_map: HashMap<EntityId, DispatchTarget>,
    /// Chat that receives notifications, if configured.
    pub telegram_chat_id: Option<i64>,
    /// Event type carried by repository_dispatch, if overridden.
    pub github_event_type: Option<String>,
}

impl RelayConfig {
    /// Loads configuration from the environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        let dispatch_map = match std::env::var(DISPATCH_MAP_ENV) {
            Ok(raw) => parse_dispatch_map(&raw)?,
            Err(_) => HashMap::new(),
        };

        Ok(Self {
            host: std::env::var(HOST_ENV).unwrap_or_else(|_| DEFAULT_HOST.to_string()),
            port: env_parsed(PORT_ENV, DEFAULT_PORT),
            state_dir: std::env::var(STATE_DIR_ENV)
                .map(PathBuf::from)
                .unwrap_or_else(|_| PathBuf::from(DEFAULT_STATE_DIR)),
            debounce_delay_minutes: env_parsed(DELAY_ENV, DEFAULT_DELAY_MINUTES),
            sweep_interval_secs: env_parsed(SWEEP_INTERVAL_ENV, DEFAULT_SWEEP_INTERVAL_SECS),
            dispatch_map,
            telegram_chat_id: std::env::var(CHAT_ID_ENV).ok().and_then(|v| v.parse().ok()),
            github_event_type: std::env::var(EVENT_TYPE_ENV).ok(),
        })
    }
}

/// Reads an env var and parses it, falling back to the default when
/// unset or unparseable.
fn env_parsed<T: std::str::FromStr>(name: &str, default: T) -> T {
    std::env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}

/// Parses `db_id=owner/repo` pairs, comma separated.
fn parse_dispatch_map(raw: &str) -> Result<HashMap<EntityId, DispatchTarget>, ConfigError> {
    let mut map = HashMap::new();
    for entry in raw.split(',') {
        let entry = entry.trim();
        if entry.is_empty() {
            continue;
        }
        let (id, target) = entry
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidDispatchMapEntry(entry.to_string()))?;
        let id = EntityId::new(id.trim())
            .map_err(|_| ConfigError::InvalidDispatchMapEntry(entry.to_string()))?;
        let target = target
            .trim()
            .parse::<DispatchTarget>()
            .map_err(|_| ConfigError::InvalidDispatchMapEntry(entry.to_string()))?;
        map.insert(id, target);
    }
    Ok(map)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_dispatch_map() {
        let map = parse_dispatch_map("abcd-1234=octocat/hello, efef5678=org/other").unwrap();
        assert_eq!(map.len(), 2);
        assert_eq!(
            map[&EntityId::new("abcd1234").unwrap()],
            DispatchTarget::new("octocat", "hello")
        );
        assert_eq!(
            map[&EntityId::new("efef5678").unwrap()],
            DispatchTarget::new("org", "other")
        );
    }

    #[test]
    fn test_parse_dispatch_map_empty() {
        assert!(parse_dispatch_map("").unwrap().is_empty());
        assert!(parse_dispatch_map(" , ").unwrap().is_empty());
    }

    #[test]
    fn test_parse_dispatch_map_invalid() {
        assert!(parse_dispatch_map("missing-equals").is_err());
        assert!(parse_dispatch_map("abcd=not-a-repo").is_err());
        assert!(parse_dispatch_map("---=owner/repo").is_err());
    }
}
