//! LegalMap client configuration.

use std::time::Duration;

use registry_common::env::{first_set, process_env};
use registry_common::{ApiError, Result, SecretString, Siren};

pub const DEFAULT_BASE_URL: &str =
    "https://7agsqhzcd0.execute-api.eu-west-3.amazonaws.com/master-api/";

/// Company route, relative to the base URL.
pub const DEFAULT_COMPANY_PATH: &str = "rne/{siren}";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(20);

/// Accepted names for the API token, in order of preference.
pub const TOKEN_VARS: [&str; 2] = ["LEGALMAP_API_TOKEN", "LEGALMAP_API_KEY"];

/// Where and how to reach the LegalMap API.
#[derive(Debug, Clone)]
pub struct LegalMapConfig {
    /// Sent as the `x-api-key` header
    pub api_token: SecretString,

    /// Base URL for relative routes (`search`, `pdfs/{id}`, company path)
    pub base_url: String,

    /// Full company URL with a `{siren}` or `{identifier}` placeholder.
    /// Takes precedence over `company_path` when set.
    pub company_url_template: Option<String>,

    /// Company route relative to `base_url`
    pub company_path: String,

    pub timeout: Duration,
}

impl LegalMapConfig {
    pub fn new(api_token: impl Into<String>) -> Self {
        Self {
            api_token: SecretString::new(api_token),
            base_url: DEFAULT_BASE_URL.trim_end_matches('/').to_string(),
            company_url_template: None,
            company_path: DEFAULT_COMPANY_PATH.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Load from the process environment.
    ///
    /// - `LEGALMAP_API_TOKEN` (or `LEGALMAP_API_KEY`): required
    /// - `LEGALMAP_API_BASE_URL`
    /// - `LEGALMAP_COMPANY_URL_TEMPLATE`
    /// - `LEGALMAP_COMPANY_PATH`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(&process_env)
    }

    /// Load from an arbitrary variable source.
    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Result<Self> {
        let token = first_set(lookup, &TOKEN_VARS)
            .ok_or_else(|| ApiError::missing_var("LegalMap", "LEGALMAP_API_TOKEN"))?;

        let mut config = Self::new(token);
        if let Some(base_url) = first_set(lookup, &["LEGALMAP_API_BASE_URL"]) {
            config = config.with_base_url(base_url);
        }
        if let Some(template) = first_set(lookup, &["LEGALMAP_COMPANY_URL_TEMPLATE"]) {
            config = config.with_company_url_template(template);
        }
        if let Some(path) = first_set(lookup, &["LEGALMAP_COMPANY_PATH"]) {
            config = config.with_company_path(path);
        }

        config.validate()?;
        Ok(config)
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_company_url_template(mut self, template: impl Into<String>) -> Self {
        self.company_url_template = Some(template.into());
        self
    }

    pub fn with_company_path(mut self, path: impl Into<String>) -> Self {
        self.company_path = path.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Check the settings without touching the network.
    pub fn validate(&self) -> Result<()> {
        if self.api_token.is_empty() {
            return Err(ApiError::missing_var("LegalMap", "LEGALMAP_API_TOKEN"));
        }
        if !is_absolute(&self.base_url) {
            return Err(ApiError::Config(format!(
                "LegalMap: LEGALMAP_API_BASE_URL must be an http(s) URL, got {:?}",
                self.base_url
            )));
        }
        if let Some(template) = &self.company_url_template {
            if !is_absolute(template) {
                return Err(ApiError::Config(format!(
                    "LegalMap: LEGALMAP_COMPANY_URL_TEMPLATE must be an http(s) URL, got {template:?}"
                )));
            }
        }
        Ok(())
    }

    /// URL of the company record for `siren`.
    pub fn company_url(&self, siren: &Siren) -> String {
        match &self.company_url_template {
            Some(template) => fill_placeholders(template, siren),
            None => self.route_url(&fill_placeholders(&self.company_path, siren)),
        }
    }

    /// Resolve a route against the base URL; absolute URLs pass through.
    pub fn route_url(&self, route: &str) -> String {
        if is_absolute(route) {
            return route.to_string();
        }
        format!("{}/{}", self.base_url, route.trim_start_matches('/'))
    }
}

fn is_absolute(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

fn fill_placeholders(template: &str, siren: &Siren) -> String {
    template
        .replace("{siren}", siren.as_str())
        .replace("{identifier}", siren.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    fn siren() -> Siren {
        Siren::parse("552100554").unwrap()
    }

    #[test]
    fn test_missing_token_names_variable() {
        let err = LegalMapConfig::from_lookup(&lookup_from(&[])).unwrap_err();
        assert!(matches!(err, ApiError::Config(_)));
        assert!(err.to_string().contains("LEGALMAP_API_TOKEN"));
    }

    #[test]
    fn test_blank_token_is_missing() {
        let err = LegalMapConfig::from_lookup(&lookup_from(&[("LEGALMAP_API_TOKEN", "  ")]))
            .unwrap_err();
        assert!(err.to_string().contains("LEGALMAP_API_TOKEN"));
    }

    #[test]
    fn test_api_key_alias() {
        let config =
            LegalMapConfig::from_lookup(&lookup_from(&[("LEGALMAP_API_KEY", "abc")])).unwrap();
        assert_eq!(config.api_token.expose(), "abc");
    }

    #[test]
    fn test_default_company_url() {
        let config = LegalMapConfig::new("t");
        assert_eq!(
            config.company_url(&siren()),
            "https://7agsqhzcd0.execute-api.eu-west-3.amazonaws.com/master-api/rne/552100554"
        );
    }

    #[test]
    fn test_base_url_and_path_from_env() {
        let config = LegalMapConfig::from_lookup(&lookup_from(&[
            ("LEGALMAP_API_TOKEN", "t"),
            ("LEGALMAP_API_BASE_URL", "https://api.example.com/v1/"),
            ("LEGALMAP_COMPANY_PATH", "/companies/{identifier}"),
        ]))
        .unwrap();
        assert_eq!(
            config.company_url(&siren()),
            "https://api.example.com/v1/companies/552100554"
        );
        assert_eq!(config.route_url("search"), "https://api.example.com/v1/search");
    }

    #[test]
    fn test_template_takes_precedence() {
        let config = LegalMapConfig::new("t")
            .with_company_path("ignored/{siren}")
            .with_company_url_template("https://other.example.com/v2/companies/{siren}?full=1");
        assert_eq!(
            config.company_url(&siren()),
            "https://other.example.com/v2/companies/552100554?full=1"
        );
    }

    #[test]
    fn test_relative_base_url_rejected() {
        let err = LegalMapConfig::new("t").with_base_url("api.example.com").validate().unwrap_err();
        assert!(err.to_string().contains("LEGALMAP_API_BASE_URL"));
    }
}
