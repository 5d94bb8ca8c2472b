//! Error types for the chat completion client.

use registry_common::ApiError;
use thiserror::Error;

/// Result type for chat client operations.
pub type Result<T> = std::result::Result<T, OpenAIError>;

#[derive(Debug, Error)]
pub enum OpenAIError {
    /// Configuration error (missing API key, invalid settings)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network error (connection failed, timeout)
    #[error("Network error: {0}")]
    Network(String),

    /// API error (non-2xx response, rate limit, invalid request)
    #[error("API error: {0}")]
    Api(String),

    /// Parse error (invalid JSON, unexpected response format)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl From<ApiError> for OpenAIError {
    fn from(error: ApiError) -> Self {
        match error {
            ApiError::Config(message) => OpenAIError::Config(message),
            ApiError::Transport { .. } => OpenAIError::Network(error.to_string()),
            ApiError::Remote { status, body, .. } => {
                OpenAIError::Api(format!("HTTP {status}: {body}"))
            }
            ApiError::Parse(message) => OpenAIError::Parse(message),
            ApiError::Validation(e) => OpenAIError::Config(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remote_becomes_api_error() {
        let err: OpenAIError = ApiError::Remote {
            service: "perplexity",
            status: 401,
            body: r#"{"error":"invalid key"}"#.into(),
        }
        .into();
        assert_eq!(
            err.to_string(),
            r#"API error: HTTP 401: {"error":"invalid key"}"#
        );
    }
}
