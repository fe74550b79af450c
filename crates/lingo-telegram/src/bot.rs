//! Main Telegram bot implementation.

use std::sync::Arc;

use teloxide::error_handlers::LoggingErrorHandler;
use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info, warn};

use lingo_core::{CommandSurface, GoogleTranslate, MessagePipeline, RelayConfig};
use lingo_persistence::ChatStateStore;

use crate::error::{Result, TelegramError};
use crate::handlers::{
    handle_command, handle_message, handle_unknown_command, is_command_like, Command,
};

/// The auto-translating Telegram bot.
pub struct TranslatorBot {
    /// The teloxide bot instance.
    bot: Bot,
    /// Translation pipeline shared by all message handlers.
    pipeline: Arc<MessagePipeline>,
    /// Command replies, sharing the pipeline's chat store.
    commands: Arc<CommandSurface>,
}

impl TranslatorBot {
    /// Builds the bot from resolved configuration.
    ///
    /// Loads the chat state file and sets up the Google Translate client.
    pub fn new(config: &RelayConfig) -> Result<Self> {
        let store = Arc::new(ChatStateStore::load(&config.state_file));
        let google = Arc::new(GoogleTranslate::new(config.translate_url.as_str())?);

        let pipeline = MessagePipeline::new(Arc::clone(&store), google.clone(), google)
            .with_call_timeout(config.call_timeout);

        Ok(Self::with_parts(
            Bot::new(&config.token),
            Arc::new(pipeline),
            Arc::new(CommandSurface::new(store)),
        ))
    }

    /// Assembles a bot from already built parts.
    pub fn with_parts(bot: Bot, pipeline: Arc<MessagePipeline>, commands: Arc<CommandSurface>) -> Self {
        Self {
            bot,
            pipeline,
            commands,
        }
    }

    /// Get the bot's username.
    pub async fn get_me(&self) -> Result<String> {
        let me = self
            .bot
            .get_me()
            .await
            .map_err(|e| TelegramError::BotStartFailed(e.to_string()))?;
        Ok(me.username().to_string())
    }

    /// Publish the command list shown in Telegram's command menu.
    pub async fn register_commands(&self) {
        match self.bot.set_my_commands(Command::bot_commands()).await {
            Ok(_) => debug!("Registered bot commands"),
            Err(e) => warn!(error = %e, "Failed to register bot commands"),
        }
    }

    /// Start the bot in long polling mode. Returns on Ctrl+C.
    pub async fn start_polling(&self) -> Result<()> {
        info!("Starting Telegram bot in polling mode...");

        let commands = Arc::clone(&self.commands);
        let pipeline = Arc::clone(&self.pipeline);

        let handler = dptree::entry()
            .branch(
                Update::filter_message()
                    .filter_command::<Command>()
                    .endpoint(move |bot: Bot, msg: Message, cmd: Command| {
                        let commands = Arc::clone(&commands);
                        debug!(chat_id = %msg.chat.id, "Command matched: {:?}", cmd);
                        async move { handle_command(bot, msg, cmd, commands).await }
                    }),
            )
            .branch(
                Update::filter_message()
                    .filter(|msg: Message| msg.text().is_some_and(is_command_like))
                    .endpoint(|bot: Bot, msg: Message| async move {
                        handle_unknown_command(bot, msg).await
                    }),
            )
            .branch(Update::filter_message().endpoint(move |bot: Bot, msg: Message| {
                let pipeline = Arc::clone(&pipeline);
                async move { handle_message(bot, msg, pipeline).await }
            }));

        info!("Bot started. Polling...");

        Dispatcher::builder(self.bot.clone(), handler)
            .default_handler(|upd| async move {
                debug!("Unhandled update: {:?}", upd);
            })
            .error_handler(LoggingErrorHandler::with_custom_text(
                "An error occurred while handling an update",
            ))
            .enable_ctrlc_handler()
            .build()
            .dispatch()
            .await;

        info!("Bot stopped");
        Ok(())
    }
}
