//! Typed errors shared by the registry API clients.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can branch
//! on the failure kind.

use thiserror::Error;

use crate::siren::SirenError;

/// Errors that can occur while talking to a registry API.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed identifier. Raised before any network call.
    #[error("validation error: {0}")]
    Validation(#[from] SirenError),

    /// Missing credential or endpoint configuration
    #[error("configuration error: {0}")]
    Config(String),

    /// Non-2xx response from the remote API
    #[error("{service} HTTP {status}: {body}")]
    Remote {
        service: &'static str,
        status: u16,
        body: String,
    },

    /// Timeout or connection failure, after retries were exhausted
    #[error("{service} transport error: {source}")]
    Transport {
        service: &'static str,
        #[source]
        source: reqwest::Error,
    },

    /// Response could not be decoded into the expected shape
    #[error("parse error: {0}")]
    Parse(String),
}

impl ApiError {
    /// Build a configuration error naming the missing variable.
    pub fn missing_var(service: &str, var: &str) -> Self {
        ApiError::Config(format!("{service}: {var} must be set"))
    }

    /// HTTP status of a remote failure, if any.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::Remote { status, .. } => Some(*status),
            _ => None,
        }
    }
}

/// Result type alias for registry API operations.
pub type Result<T> = std::result::Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_var_names_the_variable() {
        let err = ApiError::missing_var("LegalMap", "LEGALMAP_API_TOKEN");
        assert!(err.to_string().contains("LEGALMAP_API_TOKEN"));
        assert!(err.to_string().contains("LegalMap"));
    }

    #[test]
    fn test_remote_display_carries_status_and_body() {
        let err = ApiError::Remote {
            service: "pappers",
            status: 404,
            body: r#"{"error":"not found"}"#.into(),
        };
        assert_eq!(err.status(), Some(404));
        assert_eq!(err.to_string(), r#"pappers HTTP 404: {"error":"not found"}"#);
    }
}
