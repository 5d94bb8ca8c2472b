//! Application configuration.
//!
//! Every collaborator is resolved on its own: a missing credential disables
//! that source or summarizer and is reported in its place, the rest still
//! runs.

use std::time::Duration;

use legalmap_client::LegalMapConfig;
use openai_client::OpenAIConfig;
use pappers_client::PappersConfig;
use registry_common::env::{first_set, process_env};
use registry_common::ApiError;

pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4o";
pub const DEFAULT_PERPLEXITY_MODEL: &str = "sonar-pro";

pub const OPENAI_TIMEOUT: Duration = Duration::from_secs(60);
pub const PERPLEXITY_SUMMARY_TIMEOUT: Duration = Duration::from_secs(45);
pub const PERPLEXITY_RESEARCH_TIMEOUT: Duration = Duration::from_secs(60);

/// Provider endpoint plus the model to ask for.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub provider: OpenAIConfig,
    pub model: String,
}

#[derive(Debug, Clone)]
pub struct PerplexityConfig {
    /// Summaries of a JSON payload
    pub summary: ModelConfig,

    /// Web research from the SIREN alone
    pub research: ModelConfig,
}

#[derive(Debug)]
pub struct AppConfig {
    pub legalmap: Result<LegalMapConfig, ApiError>,
    pub pappers: Result<PappersConfig, ApiError>,
    pub openai: Option<ModelConfig>,
    pub perplexity: Option<PerplexityConfig>,
}

impl AppConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file is read first when present; variables already set in
    /// the environment win.
    pub fn from_env() -> Self {
        // Load .env file if present (development)
        let _ = dotenvy::dotenv();

        Self::from_lookup(&process_env)
    }

    pub fn from_lookup(lookup: &dyn Fn(&str) -> Option<String>) -> Self {
        Self {
            legalmap: LegalMapConfig::from_lookup(lookup),
            pappers: PappersConfig::from_lookup(lookup),
            openai: openai_config(lookup),
            perplexity: perplexity_config(lookup),
        }
    }
}

fn openai_config(lookup: &dyn Fn(&str) -> Option<String>) -> Option<ModelConfig> {
    let provider = OpenAIConfig::openai_from_lookup(lookup)
        .ok()?
        .with_timeout(OPENAI_TIMEOUT);
    let model =
        first_set(lookup, &["OPENAI_MODEL"]).unwrap_or_else(|| DEFAULT_OPENAI_MODEL.to_string());
    Some(ModelConfig { provider, model })
}

fn perplexity_config(lookup: &dyn Fn(&str) -> Option<String>) -> Option<PerplexityConfig> {
    let provider = OpenAIConfig::perplexity_from_lookup(lookup).ok()?;

    let model = first_set(lookup, &["PERPLEXITY_MODEL"])
        .unwrap_or_else(|| DEFAULT_PERPLEXITY_MODEL.to_string());
    let research_model = first_set(lookup, &["PERPLEXITY_MODEL_RESEARCH", "PERPLEXITY_MODEL"])
        .unwrap_or_else(|| DEFAULT_PERPLEXITY_MODEL.to_string());

    Some(PerplexityConfig {
        summary: ModelConfig {
            provider: provider.clone().with_timeout(PERPLEXITY_SUMMARY_TIMEOUT),
            model,
        },
        research: ModelConfig {
            provider: provider.with_timeout(PERPLEXITY_RESEARCH_TIMEOUT),
            model: research_model,
        },
    })
}
