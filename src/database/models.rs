/*!
 * Database entity models.
 *
 * These structures map directly to the translations table and provide
 * type-safe access to persisted history rows.
 */

use serde::{Deserialize, Serialize};

/// One completed translation, as stored in the history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationRecord {
    /// Unique id, assigned monotonically by the store
    pub id: i64,
    /// Original recognized (or provided) text
    pub source_text: String,
    /// Translated text
    pub target_text: String,
    /// Source language code (en/ru/ja)
    pub source_lang: String,
    /// Target language code (en/ru/ja)
    pub target_lang: String,
    /// Identifier of the provider that produced the translation
    pub provider: String,
    /// Creation time (RFC 3339), immutable
    pub created_at: String,
}

/// Insert form of a translation record; id and timestamp are assigned by
/// the repository at insert time
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTranslation {
    pub source_text: String,
    pub target_text: String,
    pub source_lang: String,
    pub target_lang: String,
    pub provider: String,
}

impl NewTranslation {
    /// Create a new insert form
    pub fn new(
        source_text: impl Into<String>,
        target_text: impl Into<String>,
        source_lang: impl Into<String>,
        target_lang: impl Into<String>,
        provider: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target_text: target_text.into(),
            source_lang: source_lang.into(),
            target_lang: target_lang.into(),
            provider: provider.into(),
        }
    }
}
