//! Per-company bundle assembly.
//!
//! Record fetch → query expression → paged search → owner filter → detail
//! enrichment. Only the record fetch is fatal: the count degrades to an
//! inline marker and enrichment skips documents it cannot fetch.

use chrono::{Local, NaiveDate};
use registry_common::json_path;
use registry_common::{Outcome, Result, Siren};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::traits::{DocumentSearch, RegistrySource};
use crate::types::{Bundle, DateWindow, DocumentResult, Pagination, SearchParams};

/// Tuning knobs for [`BundleBuilder::build`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOptions {
    /// How far back the document search reaches
    pub lookback_days: u32,

    /// How many owned documents get a detail fetch
    pub enrich_top: usize,

    pub pagination: Pagination,

    /// `pages` parameter for detail fetches
    pub detail_pages: String,
}

impl Default for BundleOptions {
    fn default() -> Self {
        Self {
            lookback_days: 365,
            enrich_top: 3,
            pagination: Pagination::default(),
            detail_pages: "all".to_string(),
        }
    }
}

impl BundleOptions {
    pub fn with_lookback_days(mut self, days: u32) -> Self {
        self.lookback_days = days;
        self
    }

    pub fn with_enrich_top(mut self, count: usize) -> Self {
        self.enrich_top = count;
        self
    }

    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Search expression for a company: its exact legal name, else its SIREN.
pub fn derive_query(record: &Value, siren: &Siren) -> String {
    match json_path::denomination(record) {
        Some(name) => format!("\"{name}\""),
        None => siren.to_string(),
    }
}

/// Builds [`Bundle`]s from any source that can fetch records and search.
pub struct BundleBuilder<C> {
    source: C,
    today: Option<NaiveDate>,
}

impl<C> BundleBuilder<C>
where
    C: RegistrySource + DocumentSearch,
{
    pub fn new(source: C) -> Self {
        Self {
            source,
            today: None,
        }
    }

    /// Pin "today" (defaults to the local date at build time).
    pub fn with_today(mut self, today: NaiveDate) -> Self {
        self.today = Some(today);
        self
    }

    pub fn source(&self) -> &C {
        &self.source
    }

    pub async fn build(&self, siren: &Siren, options: &BundleOptions) -> Result<Bundle> {
        info!(%siren, "Building LegalMap bundle");

        let rne = self.source.fetch_record(siren).await?;

        let query = derive_query(&rne, siren);
        let today = self.today.unwrap_or_else(|| Local::now().date_naive());
        let window = DateWindow::lookback(today, options.lookback_days);
        debug!(%siren, %query, from = %window.from, to = %window.to, "Derived search");

        let params = SearchParams::new(window, query.clone());
        let search_raw = self.source.search_all(&params, &options.pagination).await?;

        let count_results = Outcome::from_result(
            self.source.count_results(&window, &query).await,
            "count_results failed",
        );
        if let Some(marker) = count_results.marker() {
            warn!(%siren, error = %marker, "Count degraded");
        }

        let search_company_results: Vec<DocumentResult> = search_raw
            .results
            .iter()
            .filter(|doc| doc.belongs_to(siren))
            .cloned()
            .collect();

        let pdf_details_top = self
            .enrich(&search_company_results, &query, options)
            .await;

        info!(
            %siren,
            total = search_raw.results.len(),
            owned = search_company_results.len(),
            enriched = pdf_details_top.len(),
            "Bundle built"
        );

        Ok(Bundle {
            rne,
            search_company_results,
            search_raw,
            count_results,
            pdf_details_top,
            query,
            window: Some(window),
        })
    }

    /// Fetch details for the first `enrich_top` documents, skipping any
    /// without an id or whose fetch fails.
    async fn enrich(
        &self,
        documents: &[DocumentResult],
        query: &str,
        options: &BundleOptions,
    ) -> Vec<Value> {
        let mut details = Vec::new();

        for doc in documents.iter().take(options.enrich_top) {
            let Some(document_id) = doc.document_id() else {
                debug!("Skipping document without acte_id/inpi_id");
                continue;
            };

            match self
                .source
                .document_details(&document_id, &options.detail_pages, Some(query))
                .await
            {
                Ok(detail) => details.push(detail),
                Err(e) => {
                    warn!(document_id = %document_id, error = %e, "Skipping document detail");
                }
            }
        }

        details
    }
}
