//! Per-company comparison run.
//!
//! Sources are fetched, compared and summarized one after the other. Any
//! collaborator may be missing or may fail: its slot in the report then
//! holds an error marker and the rest of the run carries on.

use async_trait::async_trait;
use legalmap_client::{BundleBuilder, BundleOptions, DocumentSearch, LegalMapClient, RegistrySource};
use pappers_client::PappersClient;
use registry_common::{json_path, ApiError, ErrorMarker, Outcome, Siren};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::{info, warn};

use crate::config::AppConfig;
use crate::cost::CostEstimate;
use crate::summarize::{select_summarizer, PerplexityResearcher, Summarizer, WebResearcher};
use crate::table::ComparisonTable;

/// Something that returns one company's data as JSON.
#[async_trait]
pub trait SourceFetcher: Send + Sync {
    fn name(&self) -> &'static str;

    async fn fetch(&self, siren: &Siren) -> Result<Value, ApiError>;
}

/// LegalMap bundle as a comparison source.
pub struct LegalMapSource<C> {
    builder: BundleBuilder<C>,
    options: BundleOptions,
}

impl<C> LegalMapSource<C>
where
    C: RegistrySource + DocumentSearch,
{
    pub fn new(builder: BundleBuilder<C>, options: BundleOptions) -> Self {
        Self { builder, options }
    }
}

#[async_trait]
impl<C> SourceFetcher for LegalMapSource<C>
where
    C: RegistrySource + DocumentSearch,
{
    fn name(&self) -> &'static str {
        "legalmap"
    }

    async fn fetch(&self, siren: &Siren) -> Result<Value, ApiError> {
        let bundle = self.builder.build(siren, &self.options).await?;
        Ok(bundle.to_value())
    }
}

#[async_trait]
impl SourceFetcher for PappersClient {
    fn name(&self) -> &'static str {
        "pappers"
    }

    async fn fetch(&self, siren: &Siren) -> Result<Value, ApiError> {
        self.fetch_record(siren).await
    }
}

/// A collaborator, or why it could not be set up.
pub type Slot<T> = Result<T, ErrorMarker>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportOptions {
    pub summaries: bool,
    pub research: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            summaries: true,
            research: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CompanyReport {
    pub siren: Siren,
    pub legalmap: Outcome<Value>,
    pub pappers: Outcome<Value>,
    pub table: ComparisonTable,

    /// `None` when summaries were not requested
    pub legalmap_summary: Option<Outcome<String>>,
    pub pappers_summary: Option<Outcome<String>>,

    /// Which provider wrote the summaries
    pub summarizer: Option<String>,

    /// `None` when research was not requested
    pub research: Option<Outcome<String>>,

    pub cost: CostEstimate,
}

/// Drives one comparison run over whatever collaborators are available.
pub struct Comparator {
    legalmap: Slot<Box<dyn SourceFetcher>>,
    pappers: Slot<Box<dyn SourceFetcher>>,
    summarizer: Slot<Box<dyn Summarizer>>,
    researcher: Slot<Box<dyn WebResearcher>>,
    options: ReportOptions,
}

impl Comparator {
    pub fn new(
        legalmap: Slot<Box<dyn SourceFetcher>>,
        pappers: Slot<Box<dyn SourceFetcher>>,
        summarizer: Slot<Box<dyn Summarizer>>,
        researcher: Slot<Box<dyn WebResearcher>>,
        options: ReportOptions,
    ) -> Self {
        Self {
            legalmap,
            pappers,
            summarizer,
            researcher,
            options,
        }
    }

    /// Build every collaborator the configuration allows.
    pub fn from_config(config: &AppConfig, bundle: BundleOptions, options: ReportOptions) -> Self {
        let legalmap = match &config.legalmap {
            Ok(cfg) => LegalMapClient::new(cfg.clone())
                .map(|client| -> Box<dyn SourceFetcher> {
                    Box::new(LegalMapSource::new(BundleBuilder::new(client), bundle))
                })
                .map_err(|e| ErrorMarker::from_error("LegalMap unavailable", &e)),
            Err(e) => Err(ErrorMarker::from_error("LegalMap unavailable", e)),
        };

        let pappers = match &config.pappers {
            Ok(cfg) => PappersClient::new(cfg.clone())
                .map(|client| -> Box<dyn SourceFetcher> { Box::new(client) })
                .map_err(|e| ErrorMarker::from_error("Pappers unavailable", &e)),
            Err(e) => Err(ErrorMarker::from_error("Pappers unavailable", e)),
        };

        let summarizer = match select_summarizer(config) {
            Ok(Some(summarizer)) => Ok(summarizer),
            Ok(None) => Err(ErrorMarker::new(
                "No summarizer configured: set OPENAI_API_KEY or PERPLEXITY_API_KEY",
            )),
            Err(e) => Err(ErrorMarker::from_error("Summarizer unavailable", &e)),
        };

        let researcher = match &config.perplexity {
            Some(perplexity) => PerplexityResearcher::new(&perplexity.research)
                .map(|r| -> Box<dyn WebResearcher> { Box::new(r) })
                .map_err(|e| ErrorMarker::from_error("Research unavailable", &e)),
            None => Err(ErrorMarker::new(
                "Research unavailable: PERPLEXITY_API_KEY not set",
            )),
        };

        Self::new(legalmap, pappers, summarizer, researcher, options)
    }

    pub async fn run(&self, siren: &Siren) -> CompanyReport {
        info!(%siren, "Starting comparison");

        let legalmap = fetch_source(&self.legalmap, siren).await;
        let pappers = fetch_source(&self.pappers, siren).await;

        let legalmap_value = payload(&legalmap);
        let pappers_value = payload(&pappers);
        let table = ComparisonTable::from_payloads(&legalmap_value, &pappers_value);
        info!(%siren, rows = table.len(), matching = table.matching(), "Comparison table built");

        let (legalmap_summary, pappers_summary) = if self.options.summaries {
            (
                Some(self.summarize(&legalmap, "LegalMap").await),
                Some(self.summarize(&pappers, "Pappers").await),
            )
        } else {
            (None, None)
        };

        let research = if self.options.research {
            let name_hint = legalmap
                .ok()
                .and_then(|bundle| bundle.get("rne"))
                .and_then(json_path::denomination);
            Some(self.research(siren, name_hint).await)
        } else {
            None
        };

        let cost = CostEstimate::estimate(
            siren.as_str(),
            self.researcher.as_ref().ok().map(|r| r.model()),
            &research.as_ref().map(outcome_text).unwrap_or_default(),
            &[legalmap_summary.as_ref(), pappers_summary.as_ref()]
                .into_iter()
                .flatten()
                .filter_map(Outcome::ok)
                .map(String::as_str)
                .collect::<Vec<_>>(),
        );

        CompanyReport {
            siren: siren.clone(),
            legalmap,
            pappers,
            table,
            legalmap_summary,
            pappers_summary,
            summarizer: self
                .summarizer
                .as_ref()
                .ok()
                .map(|s| format!("{} ({})", s.provider(), s.model())),
            research,
            cost,
        }
    }

    /// Summarize one source on its own. A degraded source is not summarized.
    async fn summarize(&self, source: &Outcome<Value>, label: &str) -> Outcome<String> {
        let summarizer = match &self.summarizer {
            Ok(summarizer) => summarizer,
            Err(marker) => return Outcome::Degraded(marker.clone()),
        };
        let payload = match source {
            Outcome::Ok(payload) => payload,
            Outcome::Degraded(_) => {
                return Outcome::degraded(format!("{label} data unavailable, summary skipped"))
            }
        };

        let summary = Outcome::from_result(
            summarizer.summarize(payload).await,
            &format!("{label} summary failed"),
        );
        if let Some(marker) = summary.marker() {
            warn!(source = label, error = %marker, "Summary degraded");
        }
        summary
    }

    async fn research(&self, siren: &Siren, name_hint: Option<&str>) -> Outcome<String> {
        let researcher = match &self.researcher {
            Ok(researcher) => researcher,
            Err(marker) => return Outcome::Degraded(marker.clone()),
        };

        let research = Outcome::from_result(
            researcher.research(siren, name_hint).await,
            "Research failed",
        );
        if let Some(marker) = research.marker() {
            warn!(%siren, error = %marker, "Research degraded");
        }
        research
    }
}

async fn fetch_source(slot: &Slot<Box<dyn SourceFetcher>>, siren: &Siren) -> Outcome<Value> {
    let source = match slot {
        Ok(source) => source,
        Err(marker) => {
            warn!(%siren, error = %marker, "Source not configured");
            return Outcome::Degraded(marker.clone());
        }
    };

    let outcome = Outcome::from_result(
        source.fetch(siren).await,
        &format!("{} fetch failed", source.name()),
    );
    match outcome.marker() {
        Some(marker) => warn!(%siren, source = source.name(), error = %marker, "Source degraded"),
        None => info!(%siren, source = source.name(), "Source fetched"),
    }
    outcome
}

/// What goes into the table for a source: its data, or its error marker.
fn payload(outcome: &Outcome<Value>) -> Value {
    match outcome {
        Outcome::Ok(value) => value.clone(),
        Outcome::Degraded(marker) => json!({ "error": marker.message }),
    }
}

/// Displayed text of a best-effort string.
pub fn outcome_text(outcome: &Outcome<String>) -> String {
    match outcome {
        Outcome::Ok(text) => text.clone(),
        Outcome::Degraded(marker) => marker.message.clone(),
    }
}
