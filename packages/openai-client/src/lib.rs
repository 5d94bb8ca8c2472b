//! OpenAI-compatible chat completion client
//!
//! A minimal client for `/chat/completions` with no domain-specific logic.
//! Works against OpenAI and any provider exposing the same API (Perplexity).
//!
//! # Example
//!
//! ```rust,ignore
//! use openai_client::{ChatRequest, Message, OpenAIClient, OpenAIConfig};
//!
//! let client = OpenAIClient::from_env()?;
//!
//! let response = client.chat_completion(
//!     ChatRequest::new("gpt-4o")
//!         .message(Message::user("Hello!"))
//!         .temperature(0.2),
//! ).await?;
//!
//! // Same client, Perplexity endpoint
//! let perplexity = OpenAIClient::new(OpenAIConfig::perplexity(key))?;
//! ```

pub mod config;
pub mod error;
pub mod types;

pub use config::OpenAIConfig;
pub use error::{OpenAIError, Result};
pub use types::*;

use registry_common::{HttpTransport, RetryPolicy};
use reqwest::header;
use tracing::{debug, warn};

const USER_AGENT: &str = concat!("openai-client/", env!("CARGO_PKG_VERSION"));

/// Chat completion client.
#[derive(Clone)]
pub struct OpenAIClient {
    transport: HttpTransport,
    config: OpenAIConfig,
}

impl OpenAIClient {
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        let transport = HttpTransport::new(USER_AGENT, config.timeout)?;
        Ok(Self { transport, config })
    }

    /// Create from `OPENAI_API_KEY` (and `OPENAI_BASE_URL` if set).
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig::from_env()?)
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.transport = self.transport.with_retry_policy(policy);
        self
    }

    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    pub fn base_url(&self) -> &str {
        &self.config.base_url
    }

    /// Chat completion.
    ///
    /// Returns the first choice's content; a missing or null content is an
    /// empty string.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();
        let service = self.config.service;
        let url = self.config.completions_url();
        let api_key = self.config.api_key.expose();

        let response = self
            .transport
            .send(service, |client| {
                client
                    .post(&url)
                    .header(header::AUTHORIZATION, format!("Bearer {api_key}"))
                    .header(header::CONTENT_TYPE, "application/json")
                    .json(&request)
            })
            .await?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(service, status = %status, error = %error_text, "Chat completion API error");
            return Err(OpenAIError::Api(format!(
                "HTTP {}: {}",
                status.as_u16(),
                error_text
            )));
        }

        let raw: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| OpenAIError::Parse(e.to_string()))?;

        let content = match raw.choices.into_iter().next() {
            Some(choice) => choice.message.content.unwrap_or_default(),
            None => {
                warn!(service, model = %request.model, "Chat completion without choices");
                String::new()
            }
        };

        debug!(
            service,
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            chars = content.len(),
            "Chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: raw.usage,
            citations: raw.citations,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client =
            OpenAIClient::new(OpenAIConfig::new("sk-test").with_base_url("https://custom.api.com"))
                .unwrap();

        assert_eq!(client.config().api_key.expose(), "sk-test");
        assert_eq!(client.base_url(), "https://custom.api.com");
    }
}
