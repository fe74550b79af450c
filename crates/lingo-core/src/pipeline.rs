//! Inbound message handling: filter, check the chat flag, detect, route,
//! translate, deliver.
//!
//! Each step either hands its result to the next one or ends the run with an
//! [`Outcome`]. Nothing is sent or stored before the delivery step, so an
//! early exit never leaves anything to undo.

use std::sync::Arc;
use std::time::Duration;

use lingo_persistence::ChatStateStore;
use tracing::{debug, error, info, warn};

use crate::error::{ServiceError, ServiceResult};
use crate::router::{Language, TranslationDecision};
use crate::service::{LanguageDetector, ReplySink, Translator};

/// Deadline applied to each detection and translation call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(15);

/// A chat message as seen by the pipeline.
#[derive(Debug, Clone, Default)]
pub struct InboundMessage {
    /// Chat the message was posted in, as a decimal string.
    pub chat_id: String,
    /// Platform message id, used to link the reply.
    pub message_id: Option<i32>,
    /// Sent by a bot or other automated account.
    pub from_automated: bool,
    /// Message text, if the message has any.
    pub text: Option<String>,
}

impl InboundMessage {
    /// Trimmed text, or `None` when the message should not be looked at.
    fn accepted_text(&self) -> Option<&str> {
        if self.from_automated {
            return None;
        }
        self.text
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }
}

/// How a single pipeline run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// No text, blank text, or an automated sender.
    Ignored,
    /// Auto-translate is off for the chat.
    Disabled,
    /// The detection service failed or timed out.
    DetectionFailed,
    /// Detected language is outside the translated pair.
    Skipped { detected: String },
    /// The translation service failed or timed out.
    TranslationFailed,
    /// The translation was sent; `linked` is false when the fallback plain send was used.
    Delivered { reply: String, linked: bool },
    /// Both delivery attempts were rejected.
    Undelivered,
}

/// Formats the reply posted for a translated message.
pub fn format_reply(detected: &str, target: Language, translated: &str) -> String {
    format!("Translation ({} → {}):\n{}", detected, target.code(), translated)
}

/// Runs inbound messages through detection and translation.
pub struct MessagePipeline {
    store: Arc<ChatStateStore>,
    detector: Arc<dyn LanguageDetector>,
    translator: Arc<dyn Translator>,
    call_timeout: Duration,
}

impl MessagePipeline {
    pub fn new(
        store: Arc<ChatStateStore>,
        detector: Arc<dyn LanguageDetector>,
        translator: Arc<dyn Translator>,
    ) -> Self {
        Self {
            store,
            detector,
            translator,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }

    /// Overrides the per-call deadline for detection and translation.
    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn store(&self) -> &Arc<ChatStateStore> {
        &self.store
    }

    /// Processes one message, replying through `sink` when it gets translated.
    ///
    /// Never fails: every problem ends the run with a logged [`Outcome`].
    pub async fn process(&self, message: &InboundMessage, sink: &dyn ReplySink) -> Outcome {
        let Some(text) = message.accepted_text() else {
            return Outcome::Ignored;
        };

        if !self.store.is_enabled(&message.chat_id).await {
            return Outcome::Disabled;
        }

        let detected = match self.detect(text).await {
            Ok(code) => code,
            Err(e) => {
                warn!(chat_id = %message.chat_id, error = %e, "Language detection failed");
                return Outcome::DetectionFailed;
            }
        };

        let decision = TranslationDecision::decide(detected);
        let Some(target) = decision.target() else {
            debug!(chat_id = %message.chat_id, detected = %decision.detected, "Language not translated, skipping");
            return Outcome::Skipped {
                detected: decision.detected,
            };
        };

        let translated = match self.translate(text, target).await {
            Ok(translated) => translated,
            Err(e) => {
                error!(
                    chat_id = %message.chat_id,
                    detected = %decision.detected,
                    target = %target,
                    error = %e,
                    "Translation failed"
                );
                return Outcome::TranslationFailed;
            }
        };

        let reply = format_reply(&decision.detected, target, &translated);
        self.deliver(message, sink, reply).await
    }

    async fn detect(&self, text: &str) -> ServiceResult<String> {
        tokio::time::timeout(self.call_timeout, self.detector.detect(text))
            .await
            .unwrap_or_else(|_| Err(ServiceError::Timeout(self.call_timeout)))
    }

    async fn translate(&self, text: &str, target: Language) -> ServiceResult<String> {
        tokio::time::timeout(self.call_timeout, self.translator.translate(text, target))
            .await
            .unwrap_or_else(|_| Err(ServiceError::Timeout(self.call_timeout)))
    }

    /// Replies to the original message, falling back to a plain send.
    async fn deliver(&self, message: &InboundMessage, sink: &dyn ReplySink, reply: String) -> Outcome {
        if let Some(message_id) = message.message_id {
            match sink.reply(message_id, &reply).await {
                Ok(()) => {
                    info!(chat_id = %message.chat_id, "Translation sent");
                    return Outcome::Delivered { reply, linked: true };
                }
                Err(e) => {
                    warn!(chat_id = %message.chat_id, error = %e, "Reply rejected, sending without reply link");
                }
            }
        }

        match sink.send(&reply).await {
            Ok(()) => {
                info!(chat_id = %message.chat_id, "Translation sent without reply link");
                Outcome::Delivered {
                    reply,
                    linked: false,
                }
            }
            Err(e) => {
                error!(chat_id = %message.chat_id, error = %e, "Failed to send translation");
                Outcome::Undelivered
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;
    use tempfile::{tempdir, TempDir};

    const THAI_GOOD_MORNING: &str = "สวัสดีตอนเช้า";

    enum Detect {
        Code(&'static str),
        Fail,
        Hang,
    }

    struct MockDetector {
        behavior: Detect,
        calls: Mutex<Vec<String>>,
    }

    impl MockDetector {
        fn new(behavior: Detect) -> Arc<Self> {
            Arc::new(Self {
                behavior,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl LanguageDetector for MockDetector {
        async fn detect(&self, text: &str) -> ServiceResult<String> {
            self.calls.lock().unwrap().push(text.to_string());
            match self.behavior {
                Detect::Code(code) => Ok(code.to_string()),
                Detect::Fail => Err(ServiceError::RequestFailed("connection reset".to_string())),
                Detect::Hang => {
                    std::future::pending::<()>().await;
                    unreachable!()
                }
            }
        }
    }

    struct MockTranslator {
        output: Option<&'static str>,
        calls: Mutex<Vec<(String, Language)>>,
    }

    impl MockTranslator {
        fn returning(output: &'static str) -> Arc<Self> {
            Arc::new(Self {
                output: Some(output),
                calls: Mutex::new(Vec::new()),
            })
        }

        fn failing() -> Arc<Self> {
            Arc::new(Self {
                output: None,
                calls: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl Translator for MockTranslator {
        async fn translate(&self, text: &str, target: Language) -> ServiceResult<String> {
            self.calls.lock().unwrap().push((text.to_string(), target));
            self.output
                .map(str::to_string)
                .ok_or_else(|| ServiceError::Status {
                    status: 429,
                    body: "Too Many Requests".to_string(),
                })
        }
    }

    #[derive(Default)]
    struct RecordingSink {
        reject_reply: bool,
        reject_send: bool,
        attempts: AtomicUsize,
        delivered: Mutex<Vec<(Option<i32>, String)>>,
    }

    #[async_trait]
    impl ReplySink for RecordingSink {
        async fn reply(&self, reply_to: i32, text: &str) -> Result<(), DeliveryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.reject_reply {
                return Err(DeliveryError("message to reply not found".to_string()));
            }
            self.delivered.lock().unwrap().push((Some(reply_to), text.to_string()));
            Ok(())
        }

        async fn send(&self, text: &str) -> Result<(), DeliveryError> {
            self.attempts.fetch_add(1, Ordering::SeqCst);
            if self.reject_send {
                return Err(DeliveryError("bot was kicked from the group chat".to_string()));
            }
            self.delivered.lock().unwrap().push((None, text.to_string()));
            Ok(())
        }
    }

    fn message(chat_id: &str, text: &str) -> InboundMessage {
        InboundMessage {
            chat_id: chat_id.to_string(),
            message_id: Some(7),
            from_automated: false,
            text: Some(text.to_string()),
        }
    }

    fn pipeline(
        detector: Arc<MockDetector>,
        translator: Arc<MockTranslator>,
    ) -> (MessagePipeline, TempDir) {
        let dir = tempdir().unwrap();
        let store = Arc::new(ChatStateStore::load(dir.path().join("chats.json")));
        (MessagePipeline::new(store, detector, translator), dir)
    }

    #[tokio::test]
    async fn test_indonesian_message_is_translated_to_thai() {
        let translator = MockTranslator::returning(THAI_GOOD_MORNING);
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Code("id")), translator.clone());
        let sink = RecordingSink::default();

        let outcome = pipeline.process(&message("42", "Selamat pagi"), &sink).await;

        let expected = format!("Translation (id → th):\n{}", THAI_GOOD_MORNING);
        assert_eq!(
            outcome,
            Outcome::Delivered {
                reply: expected.clone(),
                linked: true
            }
        );
        assert_eq!(*sink.delivered.lock().unwrap(), vec![(Some(7), expected)]);
        assert_eq!(
            *translator.calls.lock().unwrap(),
            vec![("Selamat pagi".to_string(), Language::Thai)]
        );
    }

    #[tokio::test]
    async fn test_thai_message_is_translated_to_indonesian() {
        let translator = MockTranslator::returning("Selamat pagi");
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Code("th")), translator.clone());
        let sink = RecordingSink::default();

        let outcome = pipeline.process(&message("42", THAI_GOOD_MORNING), &sink).await;

        assert_eq!(
            outcome,
            Outcome::Delivered {
                reply: "Translation (th → id):\nSelamat pagi".to_string(),
                linked: true
            }
        );
        assert_eq!(translator.calls.lock().unwrap()[0].1, Language::Indonesian);
    }

    #[tokio::test]
    async fn test_text_is_trimmed_before_detection() {
        let detector = MockDetector::new(Detect::Code("id"));
        let (pipeline, _dir) = pipeline(detector.clone(), MockTranslator::returning("x"));

        pipeline
            .process(&message("42", "  Apa kabar?\n"), &RecordingSink::default())
            .await;

        assert_eq!(*detector.calls.lock().unwrap(), vec!["Apa kabar?".to_string()]);
    }

    #[tokio::test]
    async fn test_messages_without_text_are_ignored() {
        let detector = MockDetector::new(Detect::Code("id"));
        let (pipeline, _dir) = pipeline(detector.clone(), MockTranslator::returning("x"));
        let sink = RecordingSink::default();

        let mut photo = message("42", "");
        photo.text = None;
        assert_eq!(pipeline.process(&photo, &sink).await, Outcome::Ignored);
        assert_eq!(pipeline.process(&message("42", "   "), &sink).await, Outcome::Ignored);

        assert!(detector.calls.lock().unwrap().is_empty());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_automated_senders_are_ignored() {
        let detector = MockDetector::new(Detect::Code("id"));
        let (pipeline, _dir) = pipeline(detector.clone(), MockTranslator::returning("x"));
        let sink = RecordingSink::default();

        let mut from_bot = message("42", "Selamat pagi");
        from_bot.from_automated = true;

        assert_eq!(pipeline.process(&from_bot, &sink).await, Outcome::Ignored);
        assert!(detector.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_disabled_chat_gets_no_reply() {
        let detector = MockDetector::new(Detect::Code("id"));
        let (pipeline, _dir) = pipeline(detector.clone(), MockTranslator::returning("x"));
        let sink = RecordingSink::default();
        pipeline.store().set_enabled("42", false).await;

        for text in ["Selamat pagi", "Terima kasih banyak", "Apa kabar?"] {
            assert_eq!(pipeline.process(&message("42", text), &sink).await, Outcome::Disabled);
        }

        assert!(detector.calls.lock().unwrap().is_empty());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);

        // Other chats are unaffected.
        let outcome = pipeline.process(&message("43", "Selamat pagi"), &sink).await;
        assert!(matches!(outcome, Outcome::Delivered { .. }));
    }

    #[tokio::test]
    async fn test_other_languages_are_skipped() {
        let translator = MockTranslator::returning("x");
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Code("en")), translator.clone());
        let sink = RecordingSink::default();

        let outcome = pipeline.process(&message("42", "Good morning"), &sink).await;

        assert_eq!(
            outcome,
            Outcome::Skipped {
                detected: "en".to_string()
            }
        );
        assert!(translator.calls.lock().unwrap().is_empty());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_detection_failure_drops_message_only() {
        let translator = MockTranslator::returning("x");
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Fail), translator.clone());
        let sink = RecordingSink::default();

        assert_eq!(
            pipeline.process(&message("42", "Selamat pagi"), &sink).await,
            Outcome::DetectionFailed
        );
        assert_eq!(
            pipeline.process(&message("42", "Selamat malam"), &sink).await,
            Outcome::DetectionFailed
        );

        assert!(translator.calls.lock().unwrap().is_empty());
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_translation_failure_sends_nothing() {
        let translator = MockTranslator::failing();
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Code("id")), translator.clone());
        let sink = RecordingSink::default();

        let outcome = pipeline.process(&message("42", "Selamat pagi"), &sink).await;

        assert_eq!(outcome, Outcome::TranslationFailed);
        assert_eq!(translator.calls.lock().unwrap().len(), 1);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_rejected_reply_falls_back_to_plain_send() {
        let (pipeline, _dir) = pipeline(
            MockDetector::new(Detect::Code("id")),
            MockTranslator::returning(THAI_GOOD_MORNING),
        );
        let sink = RecordingSink {
            reject_reply: true,
            ..Default::default()
        };

        let outcome = pipeline.process(&message("42", "Selamat pagi"), &sink).await;

        assert!(matches!(outcome, Outcome::Delivered { linked: false, .. }));
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
        let delivered = sink.delivered.lock().unwrap();
        assert_eq!(delivered.len(), 1);
        assert_eq!(delivered[0].0, None);
    }

    #[tokio::test]
    async fn test_missing_message_id_sends_plain() {
        let (pipeline, _dir) = pipeline(
            MockDetector::new(Detect::Code("id")),
            MockTranslator::returning(THAI_GOOD_MORNING),
        );
        let sink = RecordingSink::default();
        let mut msg = message("42", "Selamat pagi");
        msg.message_id = None;

        let outcome = pipeline.process(&msg, &sink).await;

        assert!(matches!(outcome, Outcome::Delivered { linked: false, .. }));
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_double_delivery_failure_is_contained() {
        let (pipeline, _dir) = pipeline(
            MockDetector::new(Detect::Code("id")),
            MockTranslator::returning(THAI_GOOD_MORNING),
        );
        let sink = RecordingSink {
            reject_reply: true,
            reject_send: true,
            ..Default::default()
        };

        let outcome = pipeline.process(&message("42", "Selamat pagi"), &sink).await;

        assert_eq!(outcome, Outcome::Undelivered);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 2);
        assert!(sink.delivered.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_hung_detector_hits_deadline() {
        let (pipeline, _dir) = pipeline(MockDetector::new(Detect::Hang), MockTranslator::returning("x"));
        let pipeline = pipeline.with_call_timeout(Duration::from_secs(3));
        let sink = RecordingSink::default();

        let outcome = pipeline.process(&message("42", "Selamat pagi"), &sink).await;

        assert_eq!(outcome, Outcome::DetectionFailed);
        assert_eq!(sink.attempts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_format_reply() {
        assert_eq!(
            format_reply("th", Language::Indonesian, "Terima kasih"),
            "Translation (th → id):\nTerima kasih"
        );
    }
}
