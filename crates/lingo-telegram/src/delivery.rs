//! Sends pipeline replies through the Telegram Bot API.

use async_trait::async_trait;
use teloxide::prelude::*;
use teloxide::types::{MessageId, ReplyParameters};

use lingo_core::{DeliveryError, ReplySink};

/// Delivers replies into one Telegram chat.
pub struct TelegramReplySink {
    bot: Bot,
    chat_id: ChatId,
}

impl TelegramReplySink {
    pub fn new(bot: Bot, chat_id: ChatId) -> Self {
        Self { bot, chat_id }
    }
}

#[async_trait]
impl ReplySink for TelegramReplySink {
    async fn reply(&self, reply_to: i32, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, text)
            .reply_parameters(ReplyParameters::new(MessageId(reply_to)))
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }

    async fn send(&self, text: &str) -> Result<(), DeliveryError> {
        self.bot
            .send_message(self.chat_id, text)
            .await
            .map(|_| ())
            .map_err(|e| DeliveryError(e.to_string()))
    }
}
