//! Lingo Relay core: decides which chat messages to translate and
//! translates them.
//!
//! - **router**: the Indonesian/Thai pair and the detected-code routing
//! - **pipeline**: per-message filter, detect, translate, deliver flow
//! - **commands**: replies for `/status`, `/enable`, `/disable`, `/help`
//! - **service**: traits for the detection, translation and delivery capabilities
//! - **google**: Google Translate HTTP implementation of detection and translation
//! - **config**: environment-based configuration

pub mod commands;
pub mod config;
pub mod error;
pub mod google;
pub mod pipeline;
pub mod router;
pub mod service;

pub use commands::{CommandSurface, HELP_TEXT};
pub use config::{ConfigError, RelayConfig};
pub use error::{DeliveryError, ServiceError, ServiceResult};
pub use google::GoogleTranslate;
pub use pipeline::{format_reply, InboundMessage, MessagePipeline, Outcome};
pub use router::{route, Language, Route, TranslationDecision};
pub use service::{LanguageDetector, ReplySink, Translator};
