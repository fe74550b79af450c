//! Chat command behavior, independent of the chat platform.

use std::sync::Arc;

use lingo_persistence::ChatStateStore;

/// Introduction shown for `/start` and `/help`.
pub const HELP_TEXT: &str = "Hello! I translate between Indonesian and Thai.\n\n\
Features:\n\
- Messages detected as Indonesian are translated to Thai, and Thai messages to Indonesian.\n\
- /disable (or /auto_off) turns auto-translate off in this chat.\n\
- /enable (or /auto_on) turns it back on.\n\
- /status shows whether auto-translate is on in this chat.\n\n\
Note: only messages detected as 'id' or 'th' are translated.";

/// Reply texts for the per-chat commands.
pub struct CommandSurface {
    store: Arc<ChatStateStore>,
}

impl CommandSurface {
    pub fn new(store: Arc<ChatStateStore>) -> Self {
        Self { store }
    }

    /// Reports the chat's auto-translate flag.
    pub async fn status(&self, chat_id: &str) -> String {
        let enabled = self.store.is_enabled(chat_id).await;
        format!(
            "Auto-translate is {} for this chat.",
            if enabled { "ON" } else { "OFF" }
        )
    }

    /// Turns auto-translate on for the chat.
    pub async fn enable(&self, chat_id: &str) -> String {
        self.store.set_enabled(chat_id, true).await;
        "Auto-translate enabled for this chat.".to_string()
    }

    /// Turns auto-translate off for the chat.
    pub async fn disable(&self, chat_id: &str) -> String {
        self.store.set_enabled(chat_id, false).await;
        "Auto-translate disabled for this chat.".to_string()
    }

    pub fn help() -> &'static str {
        HELP_TEXT
    }
}
