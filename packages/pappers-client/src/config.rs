use std::time::Duration;

use registry_common::env::{first_set, process_env};
use registry_common::{ApiError, Result, SecretString};

pub const DEFAULT_BASE_URL: &str = "https://api.pappers.fr/v2";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Accepted names for the API token, in order of preference.
pub const TOKEN_VARS: [&str; 2] = ["PAPPERS_API_TOKEN", "PAPPERS_API_KEY"];

#[derive(Debug, Clone)]
pub struct PappersConfig {
    /// Sent as the `api_token` query parameter
    pub api_token: SecretString,
    pub base_url: String,
    pub timeout: Duration,
}

impl PappersConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from `PAPPERS_API_TOKEN` (or `PAPPERS_API_KEY`) and `PAPPERS_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let token = first_set(lookup, &TOKEN_VARS)
            .ok_or_else(|| ApiError::missing_var("Pappers", "PAPPERS_API_TOKEN"))?;

        let mut config = Self::new(token);
        if let Some(base_url) = first_set(lookup, &["PAPPERS_BASE_URL"]) {
            config = config.with_base_url(base_url);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(ApiError::missing_var("Pappers", "PAPPERS_API_TOKEN"));
        }
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ApiError::Config(format!(
                "Pappers: PAPPERS_BASE_URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        Ok(())
    }

    pub fn company_url(&self) -> String {
        format!("{}/entreprise", self.base_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_aliases_and_base_url() {
        let config = PappersConfig::from_lookup(&|key: &str| match key {
            "PAPPERS_API_KEY" => Some("k".to_string()),
            "PAPPERS_BASE_URL" => Some("https://pappers.example.com/v2/".to_string()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.api_token.expose(), "k");
        assert_eq!(config.company_url(), "https://pappers.example.com/v2/entreprise");
    }

    #[test]
    fn test_missing_token() {
        let err = PappersConfig::from_lookup(&|_: &str| None).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains("PAPPERS_API_TOKEN"));
    }

    #[test]
    fn test_default_base_url() {
        assert_eq!(
            PappersConfig::new("t").company_url(),
            "https://api.pappers.fr/v2/entreprise"
        );
    }
}
