use std::time::Duration;

use registry_common::env::{first_set, process_env};
use registry_common::SecretString;

use crate::error::{OpenAIError, Result};

pub const OPENAI_BASE_URL: &str = "https://api.openai.com/v1";
pub const PERPLEXITY_BASE_URL: &str = "https://api.perplexity.ai";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Credentials and endpoint of an OpenAI-compatible provider.
#[derive(Debug, Clone)]
pub struct OpenAIConfig {
    pub api_key: SecretString,
    pub base_url: String,
    pub timeout: Duration,

    /// Name used in logs and errors
    pub service: &'static str,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: SecretString::new(api_key),
            base_url: OPENAI_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
            service: "openai",
        }
    }

    /// Perplexity's OpenAI-compatible endpoint.
    pub fn perplexity(api_key: impl Into<String>) -> Self {
        Self {
            base_url: PERPLEXITY_BASE_URL.to_string(),
            service: "perplexity",
            ..Self::new(api_key)
        }
    }

    /// `OPENAI_API_KEY` and optional `OPENAI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::openai_from_lookup(&process_env)
    }

    pub fn openai_from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let key = first_set(lookup, &["OPENAI_API_KEY"])
            .ok_or_else(|| OpenAIError::Config("OPENAI_API_KEY not set".into()))?;

        let mut config = Self::new(key);
        if let Some(base_url) = first_set(lookup, &["OPENAI_BASE_URL"]) {
            config = config.with_base_url(base_url);
        }
        Ok(config)
    }

    /// `PERPLEXITY_API_KEY`.
    pub fn perplexity_from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let key = first_set(lookup, &["PERPLEXITY_API_KEY"])
            .ok_or_else(|| OpenAIError::Config("PERPLEXITY_API_KEY not set".into()))?;
        Ok(Self::perplexity(key))
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openai_from_lookup() {
        let config = OpenAIConfig::openai_from_lookup(&|key: &str| match key {
            "OPENAI_API_KEY" => Some("sk-test".into()),
            "OPENAI_BASE_URL" => Some("https://proxy.example.com/v1/".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_key.expose(), "sk-test");
        assert_eq!(config.completions_url(), "https://proxy.example.com/v1/chat/completions");
        assert_eq!(config.service, "openai");
    }

    #[test]
    fn test_missing_keys() {
        let err = OpenAIConfig::openai_from_lookup(&|_: &str| None).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));

        let err = OpenAIConfig::perplexity_from_lookup(&|_: &str| None).unwrap_err();
        assert!(err.to_string().contains("PERPLEXITY_API_KEY"));
    }

    #[test]
    fn test_perplexity_defaults() {
        let config = OpenAIConfig::perplexity("pplx").with_timeout(Duration::from_secs(45));
        assert_eq!(config.completions_url(), "https://api.perplexity.ai/chat/completions");
        assert_eq!(config.timeout, Duration::from_secs(45));
        assert_eq!(config.service, "perplexity");
    }
}
