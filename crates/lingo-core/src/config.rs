//! Runtime configuration for Lingo Relay.
//!
//! Everything comes from environment variables, optionally loaded from a
//! `.env` file first:
//!
//! - `TELEGRAM_TOKEN` (or `TELEGRAM_BOT_TOKEN`): bot token, required
//! - `LINGO_STATE_FILE`: path of the chat flag file
//! - `LINGO_STATE_DIR`: directory holding `chats.json` and `.env` (default `~/.lingo-relay`)
//! - `LINGO_TRANSLATE_URL`: translation endpoint host
//! - `LINGO_CALL_TIMEOUT_SECS`: deadline for each detection/translation call

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use crate::google::DEFAULT_BASE_URL;
use crate::pipeline::DEFAULT_CALL_TIMEOUT;

/// Bot token variable.
pub const TOKEN_ENV: &str = "TELEGRAM_TOKEN";

/// Alternate bot token variable, checked when `TELEGRAM_TOKEN` is unset.
pub const BOT_TOKEN_ENV: &str = "TELEGRAM_BOT_TOKEN";

/// Override for the state directory.
pub const STATE_DIR_ENV: &str = "LINGO_STATE_DIR";

/// Override for the state file path.
pub const STATE_FILE_ENV: &str = "LINGO_STATE_FILE";

/// Override for the translation endpoint host.
pub const TRANSLATE_URL_ENV: &str = "LINGO_TRANSLATE_URL";

/// Override for the per-call deadline, in whole seconds.
pub const CALL_TIMEOUT_ENV: &str = "LINGO_CALL_TIMEOUT_SECS";

const DEFAULT_STATE_DIR: &str = ".lingo-relay";
const STATE_FILE_NAME: &str = "chats.json";
const ENV_FILE_NAME: &str = ".env";

/// Configuration problems that stop startup.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Telegram token not set. Set TELEGRAM_TOKEN in the environment or a .env file.")]
    MissingToken,

    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: &'static str, value: String },
}

/// Resolved settings for one run of the bot.
#[derive(Debug, Clone)]
pub struct RelayConfig {
    pub token: String,
    pub state_file: PathBuf,
    pub translate_url: String,
    pub call_timeout: Duration,
}

impl RelayConfig {
    /// Reads the configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let non_blank = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let token = non_blank(TOKEN_ENV)
            .or_else(|| non_blank(BOT_TOKEN_ENV))
            .map(|t| t.trim().to_string())
            .ok_or(ConfigError::MissingToken)?;

        let state_file = match non_blank(STATE_FILE_ENV) {
            Some(path) => expand_path(&path),
            None => state_dir_from(non_blank(STATE_DIR_ENV)).join(STATE_FILE_NAME),
        };

        let translate_url = non_blank(TRANSLATE_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let call_timeout = match non_blank(CALL_TIMEOUT_ENV) {
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: CALL_TIMEOUT_ENV,
                        value: raw,
                    })
                }
            },
            None => DEFAULT_CALL_TIMEOUT,
        };

        Ok(Self {
            token,
            state_file,
            translate_url,
            call_timeout,
        })
    }
}

/// The state directory.
///
/// Determined by:
/// 1. `LINGO_STATE_DIR` if set
/// 2. `~/.lingo-relay` if a home directory is available
/// 3. `.lingo-relay` in the current directory
pub fn state_dir() -> PathBuf {
    state_dir_from(std::env::var(STATE_DIR_ENV).ok().filter(|v| !v.trim().is_empty()))
}

/// Optional `.env` file inside the state directory.
pub fn env_file() -> PathBuf {
    state_dir().join(ENV_FILE_NAME)
}

fn state_dir_from(dir_override: Option<String>) -> PathBuf {
    match dir_override {
        Some(dir) => expand_path(&dir),
        None => dirs::home_dir()
            .map(|h| h.join(DEFAULT_STATE_DIR))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STATE_DIR)),
    }
}

/// Expands a leading `~` in a user-supplied path.
pub fn expand_path(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path.trim()).into_owned())
}
