//! Isolated LLM summaries and web research.
//!
//! Every call builds a fresh two-message conversation (system prompt plus
//! one payload). Nothing is carried from one call to the next, so a summary
//! of one source can never see another source's data.

use async_trait::async_trait;
use openai_client::{ChatRequest, Message, OpenAIClient};
use registry_common::Siren;
use serde_json::{json, Value};
use tracing::{debug, info};

use crate::config::{AppConfig, ModelConfig};
use crate::error::SummarizeResult;
use crate::flatten::truncate_chars;

/// Longest payload text sent to a model.
pub const PAYLOAD_LIMIT: usize = 15_000;

pub const TEMPERATURE: f32 = 0.2;
pub const TOP_P: f32 = 0.9;

/// Section outline shared by summaries and research.
pub const REPORT_OUTLINE: &str = "Identification; Activité; Dirigeants/Associés; Capital/Finances; \
Établissements/Adresse; Documents/Actes marquants; Dates clés; Alertes/Points sensibles.";

pub const SUMMARY_SYSTEM_PROMPT: &str = "Tu es un analyste légal. Tu produis une synthèse claire \
et LA PLUS détaillée POSSIBLE d'une société à partir EXCLUSIVEMENT du JSON fourni. N'invente rien. \
Si une information n'est pas présente, indique 'Non disponible'. Ne fais AUCUNE référence à \
d'autres API, sources, ou contextes. Structure recommandée: Identification; Activité; \
Dirigeants/Associés; Capital/Finances; Établissements/Adresse; Documents/Actes marquants; \
Dates clés; Alertes/Points sensibles.";

const SUMMARY_INSTRUCTIONS: &str = "Voici les données JSON (exclusives à cette synthèse). \
Analyse et synthétise en français, sans redondance et sans spéculation.";

pub const RESEARCH_SYSTEM_PROMPT: &str = "Tu es un analyste légal. Recherche sur le web pour \
établir un profil d'entreprise français. Travaille uniquement à partir des informations \
publiques retournées par la recherche. Ne fabrique pas d'information. Structure recommandée: \
Identification; Activité; Dirigeants/Associés; Capital/Finances; Établissements/Adresse; \
Documents/Actes marquants; Dates clés; Alertes/Points sensibles.";

const RESEARCH_INSTRUCTIONS: &str = "Effectue une recherche web (France) pour retrouver et \
synthétiser les informations clés sur une société à partir des indices suivants. Fournis une \
synthèse en français, la plus détaillée possible, comparable aux autres rapports.";

/// Compact JSON text of `payload`, cut at [`PAYLOAD_LIMIT`] characters.
pub fn compact_json(payload: &Value) -> String {
    truncate_chars(&payload.to_string(), PAYLOAD_LIMIT)
}

/// Request summarizing `payload` and nothing else.
pub fn summary_request(model: &str, payload: &Value) -> ChatRequest {
    ChatRequest::new(model)
        .message(Message::system(SUMMARY_SYSTEM_PROMPT))
        .message(Message::user(format!(
            "{SUMMARY_INSTRUCTIONS}\n\n{}",
            compact_json(payload)
        )))
        .temperature(TEMPERATURE)
        .top_p(TOP_P)
}

/// Request researching a company from its SIREN and optional name.
pub fn research_request(
    model: &str,
    siren: &Siren,
    name_hint: Option<&str>,
    return_citations: bool,
) -> ChatRequest {
    let mut hints = vec![format!("SIREN: {siren}")];
    if let Some(name) = name_hint.map(str::trim).filter(|n| !n.is_empty()) {
        hints.push(format!("Dénomination: {name}"));
    }

    let request = ChatRequest::new(model)
        .message(Message::system(RESEARCH_SYSTEM_PROMPT))
        .message(Message::user(format!(
            "{RESEARCH_INSTRUCTIONS}\n\n{}",
            hints.join("\n")
        )))
        .temperature(TEMPERATURE)
        .top_p(TOP_P);

    if return_citations {
        request.extra("return_citations", json!(true))
    } else {
        request
    }
}

/// Summarizes one JSON payload.
#[async_trait]
pub trait Summarizer: Send + Sync {
    /// Provider name, for display
    fn provider(&self) -> &str;

    fn model(&self) -> &str;

    async fn summarize(&self, payload: &Value) -> SummarizeResult<String>;
}

/// Researches a company on the web, without any payload.
#[async_trait]
pub trait WebResearcher: Send + Sync {
    fn model(&self) -> &str;

    async fn research(&self, siren: &Siren, name_hint: Option<&str>) -> SummarizeResult<String>;
}

/// [`Summarizer`] over any OpenAI-compatible chat endpoint.
pub struct ChatSummarizer {
    client: OpenAIClient,
    model: String,
}

impl ChatSummarizer {
    pub fn new(config: &ModelConfig) -> SummarizeResult<Self> {
        Ok(Self::with_client(
            OpenAIClient::new(config.provider.clone())?,
            config.model.clone(),
        ))
    }

    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }
}

#[async_trait]
impl Summarizer for ChatSummarizer {
    fn provider(&self) -> &str {
        self.client.config().service
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn summarize(&self, payload: &Value) -> SummarizeResult<String> {
        let request = summary_request(&self.model, payload);
        debug!(provider = self.provider(), model = %self.model, "Requesting summary");

        let response = self.client.chat_completion(request).await?;
        info!(
            provider = self.provider(),
            chars = response.content.len(),
            "Summary received"
        );
        Ok(response.content)
    }
}

/// [`WebResearcher`] backed by Perplexity's search-grounded models.
pub struct PerplexityResearcher {
    client: OpenAIClient,
    model: String,
    return_citations: bool,
}

impl PerplexityResearcher {
    pub fn new(config: &ModelConfig) -> SummarizeResult<Self> {
        Ok(Self::with_client(
            OpenAIClient::new(config.provider.clone())?,
            config.model.clone(),
        ))
    }

    pub fn with_client(client: OpenAIClient, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
            return_citations: false,
        }
    }

    /// Ask for source URLs and list them under the report.
    pub fn with_citations(mut self, enabled: bool) -> Self {
        self.return_citations = enabled;
        self
    }
}

#[async_trait]
impl WebResearcher for PerplexityResearcher {
    fn model(&self) -> &str {
        &self.model
    }

    async fn research(&self, siren: &Siren, name_hint: Option<&str>) -> SummarizeResult<String> {
        let request = research_request(&self.model, siren, name_hint, self.return_citations);
        debug!(%siren, model = %self.model, "Requesting web research");

        let response = self.client.chat_completion(request).await?;
        let mut report = response.content;
        if !response.citations.is_empty() {
            report.push_str("\n\nSources :");
            for url in &response.citations {
                report.push_str("\n- ");
                report.push_str(url);
            }
        }
        Ok(report)
    }
}

/// Pick the summarizer once: OpenAI when configured, else Perplexity.
pub fn select_summarizer(config: &AppConfig) -> SummarizeResult<Option<Box<dyn Summarizer>>> {
    let chosen = match (&config.openai, &config.perplexity) {
        (Some(openai), _) => openai,
        (None, Some(perplexity)) => &perplexity.summary,
        (None, None) => return Ok(None),
    };
    let summarizer: Box<dyn Summarizer> = Box::new(ChatSummarizer::new(chosen)?);
    info!(
        provider = summarizer.provider(),
        model = summarizer.model(),
        "Summarizer selected"
    );
    Ok(Some(summarizer))
}
