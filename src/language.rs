use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};

/// Language handling for the closed en/ru/ja set
///
/// This module provides the languages the OCR and translation stages work
/// with, their display names for prompt construction, and the codes the
/// tesseract backend expects.
/// The languages supported by recognition and translation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English
    En,
    /// Russian
    Ru,
    /// Japanese
    Ja,
}

/// Fixed priority order used by OCR auto-detection.
///
/// Recognition runs once per entry; a later language only wins with a
/// strictly greater non-whitespace character count.
pub const AUTO_DETECT_ORDER: [Language; 3] = [Language::En, Language::Ru, Language::Ja];

impl Language {
    /// Two-letter code used in configuration and the history store
    pub fn code(&self) -> &'static str {
        match self {
            Self::En => "en",
            Self::Ru => "ru",
            Self::Ja => "ja",
        }
    }

    /// Full English name, used when building translation prompts
    pub fn full_name(&self) -> &'static str {
        match self {
            Self::En => "English",
            Self::Ru => "Russian",
            Self::Ja => "Japanese",
        }
    }

    /// Language code understood by the tesseract binary
    pub fn tesseract_code(&self) -> &'static str {
        match self {
            Self::En => "eng",
            Self::Ru => "rus",
            Self::Ja => "jpn",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl std::str::FromStr for Language {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "en" => Ok(Self::En),
            "ru" => Ok(Self::Ru),
            "ja" => Ok(Self::Ja),
            _ => Err(anyhow!("Invalid language code: {}", s)),
        }
    }
}

/// Recognition language hint: a concrete language or auto-detection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LanguageHint {
    /// Run recognition under every supported language and pick the best
    #[default]
    Auto,
    /// Recognize under exactly this language
    Exact(Language),
}

impl std::fmt::Display for LanguageHint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Exact(lang) => write!(f, "{}", lang),
        }
    }
}

impl std::str::FromStr for LanguageHint {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.trim().eq_ignore_ascii_case("auto") {
            return Ok(Self::Auto);
        }
        Ok(Self::Exact(s.parse()?))
    }
}
