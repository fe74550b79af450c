//! Telegram bot that auto-translates between Indonesian and Thai.
//!
//! Every text message in a chat is run through language detection. Indonesian
//! messages get a Thai translation as a reply, Thai messages an Indonesian
//! one. Auto-translate can be switched off per chat.
//!
//! # Environment Variables
//!
//! Required:
//! - `TELEGRAM_TOKEN` (or `TELEGRAM_BOT_TOKEN`): Bot token from @BotFather
//!
//! Optional:
//! - `LINGO_STATE_FILE` / `LINGO_STATE_DIR`: where per-chat flags are saved
//! - `LINGO_TRANSLATE_URL`: translation endpoint host
//! - `LINGO_CALL_TIMEOUT_SECS`: deadline per detection/translation call (default: 15)
//!
//! # Example
//!
//! ```no_run
//! use lingo_core::RelayConfig;
//! use lingo_telegram::TranslatorBot;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::from_env()?;
//!     let bot = TranslatorBot::new(&config)?;
//!     bot.start_polling().await?;
//!     Ok(())
//! }
//! ```
//!
//! # Commands
//!
//! - `/start`, `/help` - Introduction
//! - `/status` - Show whether auto-translate is on
//! - `/enable`, `/auto_on` - Turn auto-translate on
//! - `/disable`, `/auto_off` - Turn auto-translate off

pub mod bot;
pub mod delivery;
pub mod error;
pub mod handlers;

pub use bot::TranslatorBot;
pub use delivery::TelegramReplySink;
pub use error::{Result, TelegramError};
pub use handlers::Command;
