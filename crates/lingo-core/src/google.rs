//! Language detection and translation through the Google Translate web endpoint.
//!
//! Uses the keyless `translate_a/single` endpoint:
//!
//! ```text
//! GET {base}/translate_a/single?client=gtx&sl=auto&tl=th&dt=t&q=Selamat%20pagi
//! ```
//!
//! The response is a nested JSON array. Element 0 holds the translated
//! segments (each segment's element 0 is its translated text) and element 2
//! is the detected source language.

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::error::{ServiceError, ServiceResult};
use crate::router::Language;
use crate::service::{LanguageDetector, Translator};

/// Default endpoint host.
pub const DEFAULT_BASE_URL: &str = "https://translate.googleapis.com";

/// Target used when only the detected language is wanted.
const DETECT_TARGET: &str = "en";

const USER_AGENT: &str = concat!("lingo-relay/", env!("CARGO_PKG_VERSION"));

/// HTTP client for the Google Translate endpoint.
///
/// One instance serves as both the [`LanguageDetector`] and the
/// [`Translator`], sharing a connection pool.
#[derive(Debug, Clone)]
pub struct GoogleTranslate {
    client: reqwest::Client,
    base_url: String,
}

impl GoogleTranslate {
    /// Creates a client against `base_url` (see [`DEFAULT_BASE_URL`]).
    pub fn new(base_url: impl Into<String>) -> ServiceResult<Self> {
        let client = reqwest::Client::builder().user_agent(USER_AGENT).build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// The configured endpoint host.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn request(&self, text: &str, target: &str) -> ServiceResult<Value> {
        let url = format!("{}/translate_a/single", self.base_url.trim_end_matches('/'));

        let response = self
            .client
            .get(&url)
            .query(&[
                ("client", "gtx"),
                ("sl", "auto"),
                ("tl", target),
                ("dt", "t"),
                ("q", text),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ServiceError::Status {
                status: status.as_u16(),
                body,
            });
        }

        response
            .json()
            .await
            .map_err(|e| ServiceError::ParseError(e.to_string()))
    }
}

#[async_trait]
impl LanguageDetector for GoogleTranslate {
    async fn detect(&self, text: &str) -> ServiceResult<String> {
        let json = self.request(text, DETECT_TARGET).await?;
        let detected = parse_detected(&json)?;
        debug!(detected = %detected, "Language detected");
        Ok(detected)
    }
}

#[async_trait]
impl Translator for GoogleTranslate {
    async fn translate(&self, text: &str, target: Language) -> ServiceResult<String> {
        let json = self.request(text, target.code()).await?;
        parse_translation(&json)
    }
}

/// Extracts the detected source language from a response.
pub fn parse_detected(json: &Value) -> ServiceResult<String> {
    json.get(2)
        .and_then(Value::as_str)
        .filter(|code| !code.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ServiceError::ParseError("no detected language in response".to_string()))
}

/// Joins the translated segments of a response.
///
/// Long texts come back split into one segment per sentence.
pub fn parse_translation(json: &Value) -> ServiceResult<String> {
    let segments = json
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ServiceError::ParseError("no translation segments in response".to_string()))?;

    let translated: String = segments
        .iter()
        .filter_map(|segment| segment.get(0).and_then(Value::as_str))
        .collect();

    if translated.is_empty() {
        return Err(ServiceError::ParseError("empty translation".to_string()));
    }
    Ok(translated)
}
