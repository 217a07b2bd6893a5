/*!
 * Core translation service implementation.
 *
 * This module contains the TranslationService struct, which dispatches
 * translation requests to a configured provider: cache lookup first, then
 * a credentials check, then one backend call. Successful results are
 * appended to the history; failures are returned verbatim and never
 * cached or retried.
 */

use std::collections::HashMap;
use std::sync::Arc;

use log::{debug, info};
use parking_lot::RwLock;

use super::prompts::build_translation_prompt;
use crate::database::{HistoryRepository, NewTranslation};
use crate::errors::{ProviderError, TranslationError};
use crate::language::Language;
use crate::providers::{ChatBackend, ChatRequest, OpenAiCompatClient, ProviderRegistry};

/// Decoding temperature: low, to favor literal, reproducible translations
const TRANSLATION_TEMPERATURE: f32 = 0.3;

/// Output token ceiling per translation request
const TRANSLATION_MAX_TOKENS: u32 = 2048;

/// Cache-first translation dispatcher
pub struct TranslationService {
    /// Provider id to connection settings
    registry: ProviderRegistry,

    /// Durable history store, doubling as the cache
    repository: HistoryRepository,

    /// Provider used when a request carries no override
    default_provider: String,

    /// Injected backends keyed by provider id; production requests build
    /// an OpenAI-compatible client from the registry instead
    backends: RwLock<HashMap<String, Arc<dyn ChatBackend>>>,
}

impl TranslationService {
    /// Create a new service
    pub fn new(
        registry: ProviderRegistry,
        repository: HistoryRepository,
        default_provider: impl Into<String>,
    ) -> Self {
        Self {
            registry,
            repository,
            default_provider: default_provider.into(),
            backends: RwLock::new(HashMap::new()),
        }
    }

    /// Inject a backend for a provider id, bypassing client construction.
    /// Tests use this to substitute call-counting stubs.
    pub fn with_backend(self, provider_id: impl Into<String>, backend: Arc<dyn ChatBackend>) -> Self {
        self.backends.write().insert(provider_id.into(), backend);
        self
    }

    /// The provider used when no override is given
    pub fn default_provider(&self) -> &str {
        &self.default_provider
    }

    /// The history store backing this service
    pub fn repository(&self) -> &HistoryRepository {
        &self.repository
    }

    /// Translate text between two languages.
    ///
    /// When `provider` is None the configured default is used. A cache hit
    /// returns without any network call; a cache miss requires configured
    /// credentials before the backend is invoked. The result is inserted
    /// into the history only after the provider call succeeded.
    pub async fn translate(
        &self,
        text: &str,
        source: Language,
        target: Language,
        provider: Option<&str>,
    ) -> Result<String, TranslationError> {
        if text.is_empty() {
            return Err(TranslationError::EmptySourceText);
        }

        let provider_id = provider.unwrap_or(&self.default_provider);
        let config = self
            .registry
            .get(provider_id)
            .ok_or_else(|| TranslationError::UnknownProvider(provider_id.to_string()))?;

        if let Some(cached) = self
            .repository
            .find_translation(text, source.code(), target.code(), provider_id)
            .await
            .map_err(|e| TranslationError::Storage(e.to_string()))?
        {
            debug!(
                "Translation cache hit ({} -> {}, provider {})",
                source, target, provider_id
            );
            return Ok(cached);
        }

        if config.api_key.trim().is_empty() {
            return Err(TranslationError::MissingCredentials(provider_id.to_string()));
        }

        let backend: Arc<dyn ChatBackend> = match self.backends.read().get(provider_id) {
            Some(backend) => backend.clone(),
            // Built per call so credential or endpoint edits apply to the
            // next request, not a stale client
            None => Arc::new(OpenAiCompatClient::new(&config.api_key, &config.base_url)?),
        };

        let prompt = build_translation_prompt(text, source, target);
        let request = ChatRequest::new(&config.model)
            .add_message("user", prompt)
            .temperature(TRANSLATION_TEMPERATURE)
            .max_tokens(TRANSLATION_MAX_TOKENS);

        let response = backend.complete(request).await?;
        let translated = response
            .first_text()
            .ok_or_else(|| {
                ProviderError::ParseError("response contained no choices".to_string())
            })?
            .trim()
            .to_string();

        self.repository
            .insert_translation(NewTranslation::new(
                text,
                &translated,
                source.code(),
                target.code(),
                provider_id,
            ))
            .await
            .map_err(|e| TranslationError::Storage(e.to_string()))?;

        info!(
            "Translated {} chars {} -> {} via {}",
            text.chars().count(),
            source,
            target,
            provider_id
        );
        Ok(translated)
    }
}
