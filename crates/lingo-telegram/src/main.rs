//! Lingo Relay Telegram bot binary.
//!
//! Start the bot with:
//! ```bash
//! TELEGRAM_TOKEN=xxx cargo run -p lingo-telegram
//! ```

use clap::Parser;
use lingo_core::config;
use lingo_core::RelayConfig;
use lingo_telegram::TranslatorBot;
use tracing_subscriber::EnvFilter;

/// Lingo Relay - auto-translate Indonesian and Thai in Telegram chats
#[derive(Parser, Debug)]
#[command(name = "lingo-telegram")]
#[command(about = "Telegram bot that translates Indonesian <-> Thai messages automatically")]
struct Args {
    /// Where per-chat auto-translate flags are stored (overrides LINGO_STATE_FILE)
    #[arg(long)]
    state_file: Option<String>,

    /// Verbose logging (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables from the state directory first
    let env_path = config::env_file();
    if env_path.exists() {
        let _ = dotenvy::from_path(&env_path);
    }
    let _ = dotenvy::from_filename(".env.local").or_else(|_| dotenvy::dotenv());

    let filter = match args.verbose {
        0 => "lingo_telegram=info,lingo_core=info,lingo_persistence=info,teloxide=warn",
        1 => "lingo_telegram=debug,lingo_core=debug,lingo_persistence=debug,teloxide=info",
        2 => "lingo_telegram=trace,lingo_core=trace,lingo_persistence=trace,teloxide=debug",
        _ => "trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut relay_config = match RelayConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!(error = %e, "Invalid configuration");
            return Err(e.into());
        }
    };
    if let Some(path) = args.state_file {
        relay_config.state_file = config::expand_path(&path);
    }

    tracing::info!(
        state_file = %relay_config.state_file.display(),
        timeout_secs = relay_config.call_timeout.as_secs(),
        "Configuration loaded"
    );

    let bot = TranslatorBot::new(&relay_config)?;

    match bot.get_me().await {
        Ok(username) => {
            tracing::info!(username = %username, "Bot initialized successfully");
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to get bot info");
            return Err(e.into());
        }
    }

    bot.register_commands().await;
    bot.start_polling().await?;

    Ok(())
}
