//! Capabilities the pipeline depends on but does not implement.

use async_trait::async_trait;

use crate::error::{DeliveryError, ServiceResult};
use crate::router::Language;

/// Guesses the language of a piece of text.
#[async_trait]
pub trait LanguageDetector: Send + Sync {
    /// Returns the detected language code (e.g. `"id"`, `"th"`, `"en"`).
    async fn detect(&self, text: &str) -> ServiceResult<String>;
}

/// Machine-translates text.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translates `text` into `target`.
    async fn translate(&self, text: &str, target: Language) -> ServiceResult<String>;
}

/// Sends messages back into the chat a message came from.
#[async_trait]
pub trait ReplySink: Send + Sync {
    /// Sends `text` as a reply linked to message `reply_to`.
    async fn reply(&self, reply_to: i32, text: &str) -> Result<(), DeliveryError>;

    /// Sends `text` as a plain message, without reply linkage.
    async fn send(&self, text: &str) -> Result<(), DeliveryError>;
}
