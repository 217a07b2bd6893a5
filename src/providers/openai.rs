use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use url::Url;

use super::{ChatBackend, ChatRequest, ChatResponse};
use crate::errors::ProviderError;

/// Request timeout for chat completion calls
const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for OpenAI-compatible chat-completion endpoints.
///
/// Both stock providers (OpenAI and DeepSeek) and any self-hosted
/// compatible server are driven through this one client; only the base
/// URL, model, and API key differ.
pub struct OpenAiCompatClient {
    /// HTTP client for API requests
    client: Client,
    /// API key for bearer authentication
    api_key: String,
    /// Endpoint root, e.g. "https://api.openai.com/v1"
    base_url: String,
}

impl OpenAiCompatClient {
    /// Create a new client for the given endpoint root
    pub fn new(
        api_key: impl Into<String>,
        base_url: impl Into<String>,
    ) -> Result<Self, ProviderError> {
        let base_url = base_url.into();
        Url::parse(&base_url).map_err(|e| {
            ProviderError::RequestFailed(format!("invalid base URL '{}': {}", base_url, e))
        })?;

        Ok(Self {
            client: Client::builder()
                .timeout(REQUEST_TIMEOUT)
                .build()
                .unwrap_or_default(),
            api_key: api_key.into(),
            base_url,
        })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatClient {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let response = self
            .client
            .post(self.completions_url())
            .header("Content-Type", "application/json")
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| ProviderError::ConnectionError(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Chat completion error ({}): {}", status, message);

            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(message),
                429 => ProviderError::RateLimitExceeded(message),
                code => ProviderError::ApiError {
                    status_code: code,
                    message,
                },
            });
        }

        response
            .json::<ChatResponse>()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))
    }
}
