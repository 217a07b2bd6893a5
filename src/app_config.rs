use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use crate::language::{Language, LanguageHint};

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Default translation provider id
    #[serde(default = "default_provider_id")]
    pub default_provider: String,

    /// Source language code, or "auto" for OCR auto-detection
    #[serde(default = "default_source_language")]
    pub source_language: String,

    /// Target language code
    #[serde(default = "default_target_language")]
    pub target_language: String,

    /// OCR settings
    #[serde(default)]
    pub ocr: OcrConfig,

    /// Available translation providers
    #[serde(default = "default_providers")]
    pub providers: Vec<ProviderConfig>,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Per-provider connection settings
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    /// Provider identifier (e.g. "openai", "deepseek")
    pub provider_id: String,

    /// API key; while empty the provider is unusable
    #[serde(default = "String::new")]
    pub api_key: String,

    /// Endpoint root
    #[serde(default = "String::new")]
    pub base_url: String,

    /// Model name
    #[serde(default = "String::new")]
    pub model: String,
}

impl ProviderConfig {
    /// Create provider settings with the given connection values
    pub fn new(
        provider_id: impl Into<String>,
        base_url: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            provider_id: provider_id.into(),
            api_key: String::new(),
            base_url: base_url.into(),
            model: model.into(),
        }
    }

    /// Stock OpenAI settings (API key left empty)
    pub fn openai() -> Self {
        Self::new("openai", default_openai_base_url(), default_openai_model())
    }

    /// Stock DeepSeek settings (API key left empty)
    pub fn deepseek() -> Self {
        Self::new(
            "deepseek",
            default_deepseek_base_url(),
            default_deepseek_model(),
        )
    }
}

/// OCR engine settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct OcrConfig {
    /// Explicit tesseract executable path; None resolves from PATH
    #[serde(default)]
    pub tesseract_path: Option<std::path::PathBuf>,

    /// Recognition language: "en", "ru", "ja", or "auto"
    #[serde(default = "default_ocr_language")]
    pub language: String,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self {
            tesseract_path: None,
            language: default_ocr_language(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    /// Convert to the log crate's filter type
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            Self::Error => log::LevelFilter::Error,
            Self::Warn => log::LevelFilter::Warn,
            Self::Info => log::LevelFilter::Info,
            Self::Debug => log::LevelFilter::Debug,
            Self::Trace => log::LevelFilter::Trace,
        }
    }
}

fn default_provider_id() -> String {
    "openai".to_string()
}

fn default_source_language() -> String {
    "auto".to_string()
}

fn default_target_language() -> String {
    "en".to_string()
}

fn default_ocr_language() -> String {
    "auto".to_string()
}

fn default_openai_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_openai_model() -> String {
    "gpt-4".to_string()
}

fn default_deepseek_base_url() -> String {
    "https://api.aiguoguo199.com/v1".to_string()
}

fn default_deepseek_model() -> String {
    "deepseek-chat".to_string()
}

fn default_providers() -> Vec<ProviderConfig> {
    vec![ProviderConfig::openai(), ProviderConfig::deepseek()]
}

impl Config {
    /// Load configuration from a JSON file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)
            .with_context(|| format!("Failed to open config file: {}", path.display()))?;
        let reader = BufReader::new(file);
        let config: Config = serde_json::from_reader(reader)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        Ok(config)
    }

    /// Write configuration to a JSON file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create config directory: {}", parent.display())
                })?;
            }
        }

        let json = serde_json::to_string_pretty(self).context("Failed to serialize config")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Load an existing config file, or create a default one at the path
    pub fn load_or_create<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            Self::from_file(path)
        } else {
            let config = Self::default();
            config.to_file(path)?;
            Ok(config)
        }
    }

    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        // Source may be a concrete language or auto; target must be concrete
        self.source_language
            .parse::<LanguageHint>()
            .with_context(|| format!("Invalid source language: {}", self.source_language))?;
        self.target_language
            .parse::<Language>()
            .with_context(|| format!("Invalid target language: {}", self.target_language))?;
        self.ocr
            .language
            .parse::<LanguageHint>()
            .with_context(|| format!("Invalid OCR language: {}", self.ocr.language))?;

        if self.provider_config(&self.default_provider).is_none() {
            return Err(anyhow!(
                "Default provider '{}' is not configured",
                self.default_provider
            ));
        }

        Ok(())
    }

    /// Get a provider's settings by id
    pub fn provider_config(&self, provider_id: &str) -> Option<&ProviderConfig> {
        self.providers
            .iter()
            .find(|p| p.provider_id == provider_id)
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            default_provider: default_provider_id(),
            source_language: default_source_language(),
            target_language: default_target_language(),
            ocr: OcrConfig::default(),
            providers: default_providers(),
            log_level: LogLevel::default(),
        }
    }
}
