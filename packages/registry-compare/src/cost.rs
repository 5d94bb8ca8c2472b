//! Rough per-run cost estimate.

use serde::Serialize;

use crate::config::DEFAULT_PERPLEXITY_MODEL;
use crate::summarize::REPORT_OUTLINE;

/// Pappers sells 500 credits for 40 €, one credit per record.
pub const PAPPERS_EUR_PER_REQUEST: f64 = 40.0 / 500.0;

/// USD per million tokens.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Pricing {
    pub input: f64,
    pub output: f64,
}

/// Perplexity price list; unknown models are priced as `sonar-pro`.
pub fn perplexity_pricing(model: &str) -> Pricing {
    let (input, output) = match model {
        "sonar" => (1.0, 1.0),
        "sonar-reasoning" => (1.0, 5.0),
        "sonar-reasoning-pro" | "sonar-deep-research" => (2.0, 8.0),
        _ => (3.0, 15.0),
    };
    Pricing { input, output }
}

/// About four characters per token, never less than one.
pub fn approx_tokens(text: &str) -> u64 {
    (text.chars().count() as u64 / 4).max(1)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CostEstimate {
    pub pappers_eur: f64,
    pub perplexity_model: String,
    pub perplexity_tokens_in: u64,
    pub perplexity_tokens_out: u64,
    pub perplexity_usd: f64,

    /// Output tokens of the source summaries (priced by the provider's own plan)
    pub summary_tokens_out: u64,
}

impl CostEstimate {
    /// Estimate from the texts a run produced.
    pub fn estimate(
        siren: &str,
        research_model: Option<&str>,
        research_text: &str,
        summaries: &[&str],
    ) -> Self {
        let model = research_model.unwrap_or(DEFAULT_PERPLEXITY_MODEL);
        let pricing = perplexity_pricing(model);

        let tokens_in = approx_tokens(siren) + approx_tokens(REPORT_OUTLINE);
        let tokens_out = approx_tokens(research_text);
        let usd = (tokens_in as f64 / 1_000_000.0) * pricing.input
            + (tokens_out as f64 / 1_000_000.0) * pricing.output;

        Self {
            pappers_eur: PAPPERS_EUR_PER_REQUEST,
            perplexity_model: model.to_string(),
            perplexity_tokens_in: tokens_in,
            perplexity_tokens_out: tokens_out,
            perplexity_usd: usd,
            summary_tokens_out: summaries.iter().map(|s| approx_tokens(s)).sum(),
        }
    }
}
