/*!
 * Provider plumbing for translation backends.
 *
 * Every supported provider speaks the OpenAI-compatible chat-completion
 * protocol, so there is a single client parameterized by endpoint and
 * model, plus a registry mapping provider ids to their connection
 * settings. New OpenAI-compatible backends are added by registration,
 * not by new client code.
 */

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::app_config::ProviderConfig;
use crate::errors::ProviderError;

pub mod openai;

pub use openai::OpenAiCompatClient;

/// Chat message format
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Role of the message sender (user, assistant, system)
    pub role: String,

    /// Content of the message
    pub content: String,
}

/// Chat completion request (OpenAI-compatible wire shape)
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<ChatMessage>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl ChatRequest {
    /// Create a new chat request for the given model
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            temperature: None,
            max_tokens: None,
        }
    }

    /// Add a message to the request
    pub fn add_message(mut self, role: impl Into<String>, content: impl Into<String>) -> Self {
        self.messages.push(ChatMessage {
            role: role.into(),
            content: content.into(),
        });
        self
    }

    /// Set the temperature
    pub fn temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// Set the output token limit
    pub fn max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// The model this request targets
    pub fn model(&self) -> &str {
        &self.model
    }

    /// The conversation messages
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }
}

/// Token usage information
#[derive(Debug, Clone, Deserialize)]
pub struct TokenUsage {
    /// Number of prompt tokens
    pub prompt_tokens: u64,
    /// Number of completion tokens
    pub completion_tokens: u64,
    /// Total number of tokens
    pub total_tokens: u64,
}

/// Individual choice in a chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatChoice {
    /// The message produced for this choice
    pub message: ChatMessage,
}

/// Chat completion response
#[derive(Debug, Clone, Deserialize)]
pub struct ChatResponse {
    /// Response choices; the first one carries the answer
    pub choices: Vec<ChatChoice>,

    /// Token usage information, when the backend reports it
    #[serde(default)]
    pub usage: Option<TokenUsage>,
}

impl ChatResponse {
    /// Text content of the first choice, if any
    pub fn first_text(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }

    /// Build a response carrying the given text (used by stub backends)
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            choices: vec![ChatChoice {
                message: ChatMessage {
                    role: "assistant".to_string(),
                    content: text.into(),
                },
            }],
            usage: None,
        }
    }
}

/// Common trait for chat-completion backends
///
/// This trait defines the interface all backends must follow, allowing
/// them to be used interchangeably in the translation service. Tests
/// substitute call-counting stubs through it.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Complete a chat request
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;
}

/// Registry mapping provider ids to their connection settings.
///
/// Settings are read at pipeline-start time; updating an entry only
/// affects requests issued afterwards.
pub struct ProviderRegistry {
    providers: RwLock<HashMap<String, ProviderConfig>>,
}

impl ProviderRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            providers: RwLock::new(HashMap::new()),
        }
    }

    /// Create a registry with the stock providers registered
    pub fn with_defaults() -> Self {
        Self::from_configs(&[ProviderConfig::openai(), ProviderConfig::deepseek()])
    }

    /// Create a registry from configured providers
    pub fn from_configs(configs: &[ProviderConfig]) -> Self {
        let registry = Self::new();
        for config in configs {
            registry.register(config.clone());
        }
        registry
    }

    /// Register or replace a provider
    pub fn register(&self, config: ProviderConfig) {
        self.providers
            .write()
            .insert(config.provider_id.clone(), config);
    }

    /// Look up a provider's settings by id
    pub fn get(&self, provider_id: &str) -> Option<ProviderConfig> {
        self.providers.read().get(provider_id).cloned()
    }

    /// Registered provider ids
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.providers.read().keys().cloned().collect();
        ids.sort();
        ids
    }
}

impl Default for ProviderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
