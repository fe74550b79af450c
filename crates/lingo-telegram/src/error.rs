//! Error types for the Telegram bot.

use thiserror::Error;

use lingo_core::{ConfigError, ServiceError};

/// Errors that stop the bot from starting.
#[derive(Debug, Error)]
pub enum TelegramError {
    /// Missing or invalid configuration.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Telegram rejected the bot (bad token, network down).
    #[error("Failed to start bot: {0}")]
    BotStartFailed(String),

    /// The translation client could not be built.
    #[error("Translation client error: {0}")]
    Service(#[from] ServiceError),
}

/// Result type for Telegram operations.
pub type Result<T> = std::result::Result<T, TelegramError>;
