//! LegalMap registry and legal-document search client.
//!
//! Wraps the LegalMap REST API: RNE company records, paged document search,
//! result counts, and per-document detail. On top of the raw calls,
//! [`BundleBuilder`] assembles everything known about one company.
//!
//! # Example
//!
//! ```rust,ignore
//! use legalmap_client::{BundleBuilder, BundleOptions, LegalMapClient};
//! use registry_common::Siren;
//!
//! let client = LegalMapClient::from_env()?;
//! let siren = Siren::parse("552100554")?;
//!
//! let bundle = BundleBuilder::new(client)
//!     .build(&siren, &BundleOptions::default())
//!     .await?;
//! println!("{} owned documents", bundle.search_company_results.len());
//! ```

pub mod bundle;
pub mod config;
pub mod search;
pub mod testing;
pub mod traits;
pub mod types;

pub use bundle::{derive_query, BundleBuilder, BundleOptions};
pub use config::LegalMapConfig;
pub use traits::{DocumentSearch, RegistrySource};
pub use types::{
    AggregatedSearchResult, Bundle, DateWindow, DocumentResult, Pagination, SearchPage,
    SearchParams,
};

use async_trait::async_trait;
use registry_common::{decode, HttpTransport, Result, RetryPolicy, Siren};
use reqwest::header::ACCEPT;
use serde_json::Value;
use tracing::debug;

const SERVICE: &str = "legalmap";
const USER_AGENT: &str = concat!("legalmap-client/", env!("CARGO_PKG_VERSION"));

const SEARCH_ROUTE: &str = "search";
const COUNT_ROUTE: &str = "search/count_results";

pub struct LegalMapClient {
    transport: HttpTransport,
    config: LegalMapConfig,
}

impl LegalMapClient {
    pub fn new(config: LegalMapConfig) -> Result<Self> {
        config.validate()?;
        let transport = HttpTransport::new(USER_AGENT, config.timeout)?;
        Ok(Self { transport, config })
    }

    pub fn from_env() -> Result<Self> {
        Self::new(LegalMapConfig::from_env()?)
    }

    pub fn with_retry_policy(mut self, policy: RetryPolicy) -> Self {
        self.transport = self.transport.with_retry_policy(policy);
        self
    }

    pub fn config(&self) -> &LegalMapConfig {
        &self.config
    }

    /// RNE company record.
    pub async fn get_company(&self, siren: &Siren) -> Result<Value> {
        let url = self.config.company_url(siren);
        debug!(%siren, %url, "Fetching LegalMap company");
        self.get(&url, &[]).await
    }

    /// One page of the document search.
    pub async fn search_documents(
        &self,
        params: &SearchParams,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage> {
        let url = self.config.route_url(SEARCH_ROUTE);
        let value = self.get(&url, &params.query_pairs(offset, limit)).await?;
        Ok(SearchPage::from_value(value))
    }

    /// Number of documents matching `query` in `window`.
    pub async fn count_results(&self, window: &DateWindow, query: &str) -> Result<Value> {
        let url = self.config.route_url(COUNT_ROUTE);
        let mut params = vec![
            ("search_date_from", window.from_param()),
            ("search_date_to", window.to_param()),
        ];
        if !query.is_empty() {
            params.push(("qe", query.to_string()));
        }
        self.get(&url, &params).await
    }

    /// Detail of one document, optionally highlighting `highlight`.
    pub async fn pdf_details(
        &self,
        document_id: &str,
        pages: &str,
        highlight: Option<&str>,
    ) -> Result<Value> {
        let url = self.config.route_url(&format!("pdfs/{document_id}"));
        let mut params = vec![("pages", pages.to_string())];
        if let Some(highlight) = highlight.filter(|h| !h.is_empty()) {
            params.push(("highlight", highlight.to_string()));
        }
        self.get(&url, &params).await
    }

    async fn get(&self, url: &str, params: &[(&'static str, String)]) -> Result<Value> {
        let token = self.config.api_token.expose();
        let response = self
            .transport
            .send(SERVICE, |client| {
                client
                    .get(url)
                    .header("x-api-key", token)
                    .header(ACCEPT, "application/json")
                    .query(params)
            })
            .await?;

        Ok(decode(SERVICE, response).await?.into_value())
    }
}

#[async_trait]
impl RegistrySource for LegalMapClient {
    async fn fetch_record(&self, siren: &Siren) -> Result<Value> {
        self.get_company(siren).await
    }
}

#[async_trait]
impl DocumentSearch for LegalMapClient {
    async fn search_page(
        &self,
        params: &SearchParams,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage> {
        self.search_documents(params, offset, limit).await
    }

    async fn count_results(&self, window: &DateWindow, query: &str) -> Result<Value> {
        LegalMapClient::count_results(self, window, query).await
    }

    async fn document_details(
        &self,
        document_id: &str,
        pages: &str,
        highlight: Option<&str>,
    ) -> Result<Value> {
        self.pdf_details(document_id, pages, highlight).await
    }
}
