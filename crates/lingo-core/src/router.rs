//! Which detected languages get translated, and into what.
//!
//! The relay works on one fixed pair: Indonesian and Thai. Everything that
//! decides about the pair lives here.

use std::fmt;

/// A language the relay translates between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    Indonesian,
    Thai,
}

impl Language {
    /// ISO 639-1 code as reported by the detection service.
    pub fn code(self) -> &'static str {
        match self {
            Language::Indonesian => "id",
            Language::Thai => "th",
        }
    }

    /// The other language of the pair.
    pub fn counterpart(self) -> Language {
        match self {
            Language::Indonesian => Language::Thai,
            Language::Thai => Language::Indonesian,
        }
    }

    /// Parses an exact language code. Unsupported codes yield `None`.
    pub fn from_code(code: &str) -> Option<Language> {
        match code {
            "id" => Some(Language::Indonesian),
            "th" => Some(Language::Thai),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Result of routing a detected language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Translate the message into this language.
    Translate(Language),
    /// Leave the message alone.
    Skip,
}

/// Maps a detected language code to the translation target.
///
/// `"id"` goes to Thai, `"th"` goes to Indonesian, every other code is
/// skipped.
pub fn route(detected: &str) -> Route {
    match Language::from_code(detected) {
        Some(source) => Route::Translate(source.counterpart()),
        None => Route::Skip,
    }
}

/// A detected code together with its route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDecision {
    pub detected: String,
    pub route: Route,
}

impl TranslationDecision {
    pub fn decide(detected: impl Into<String>) -> Self {
        let detected = detected.into();
        let route = route(&detected);
        Self { detected, route }
    }

    /// Target language, or `None` when the message is skipped.
    pub fn target(&self) -> Option<Language> {
        match self.route {
            Route::Translate(target) => Some(target),
            Route::Skip => None,
        }
    }
}
