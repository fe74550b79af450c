//! Command and message handlers for the Telegram bot.

use std::sync::Arc;

use teloxide::prelude::*;
use teloxide::utils::command::BotCommands;
use tracing::{debug, info};

use lingo_core::{CommandSurface, InboundMessage, MessagePipeline};

use crate::delivery::TelegramReplySink;

/// Bot commands that can be invoked with /.
#[derive(BotCommands, Clone, Debug, PartialEq, Eq)]
#[command(rename_rule = "lowercase", description = "Available commands:")]
pub enum Command {
    #[command(description = "Introduction and help")]
    Start,

    #[command(description = "Show help message")]
    Help,

    #[command(description = "Show whether auto-translate is on in this chat")]
    Status,

    #[command(description = "Turn auto-translate on in this chat")]
    Enable,

    #[command(description = "Turn auto-translate off in this chat")]
    Disable,

    #[command(rename = "auto_on", description = "Same as /enable")]
    AutoOn,

    #[command(rename = "auto_off", description = "Same as /disable")]
    AutoOff,
}

/// Key under which a chat's flag is stored.
pub fn chat_key(chat_id: ChatId) -> String {
    chat_id.0.to_string()
}

/// Handle a parsed command.
pub async fn handle_command(
    bot: Bot,
    msg: Message,
    cmd: Command,
    commands: Arc<CommandSurface>,
) -> ResponseResult<()> {
    let chat = chat_key(msg.chat.id);

    let reply = match cmd {
        Command::Start => CommandSurface::help().to_string(),
        Command::Help => format!("{}\n\n{}", CommandSurface::help(), Command::descriptions()),
        Command::Status => commands.status(&chat).await,
        Command::Enable | Command::AutoOn => commands.enable(&chat).await,
        Command::Disable | Command::AutoOff => commands.disable(&chat).await,
    };

    bot.send_message(msg.chat.id, reply).await?;

    info!(chat_id = %msg.chat.id, command = ?cmd, "Command handled");
    Ok(())
}

/// Handle a `/something` the command parser did not recognize.
///
/// Only private chats get an answer; in groups the command is probably meant
/// for another bot.
pub async fn handle_unknown_command(bot: Bot, msg: Message) -> ResponseResult<()> {
    let Some(text) = msg.text() else {
        return Ok(());
    };

    if !msg.chat.is_private() {
        debug!(chat_id = %msg.chat.id, "Ignoring unrecognized command in group");
        return Ok(());
    }

    let name = text.split_whitespace().next().unwrap_or(text);
    bot.send_message(
        msg.chat.id,
        format!("Unknown command: {}\n\nUse /help to see available commands.", name),
    )
    .await?;
    Ok(())
}

/// Run a regular message through the translation pipeline.
pub async fn handle_message(
    bot: Bot,
    msg: Message,
    pipeline: Arc<MessagePipeline>,
) -> ResponseResult<()> {
    let inbound = inbound_message(&msg);
    let sink = TelegramReplySink::new(bot, msg.chat.id);

    let outcome = pipeline.process(&inbound, &sink).await;
    debug!(chat_id = %msg.chat.id, outcome = ?outcome, "Message processed");

    Ok(())
}

/// Converts a Telegram message into the pipeline's view of it.
pub fn inbound_message(msg: &Message) -> InboundMessage {
    InboundMessage {
        chat_id: chat_key(msg.chat.id),
        message_id: Some(msg.id.0),
        from_automated: msg.from.as_ref().is_some_and(|user| user.is_bot),
        text: msg.text().map(str::to_string),
    }
}

/// Whether the message looks like a bot command.
pub fn is_command_like(text: &str) -> bool {
    text.starts_with('/')
}
