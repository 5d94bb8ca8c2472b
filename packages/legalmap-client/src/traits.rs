//! Source traits.
//!
//! The bundle builder and the search aggregator only need these operations,
//! so they can run against the real [`crate::LegalMapClient`] or the
//! in-memory [`crate::testing::MockLegalMap`].

use async_trait::async_trait;
use registry_common::{Result, Siren};
use serde_json::Value;

use crate::types::{AggregatedSearchResult, DateWindow, Pagination, SearchPage, SearchParams};

/// Fetches one company record by SIREN.
#[async_trait]
pub trait RegistrySource: Send + Sync {
    async fn fetch_record(&self, siren: &Siren) -> Result<Value>;
}

/// Paged search over legal documents.
#[async_trait]
pub trait DocumentSearch: Send + Sync {
    /// Fetch a single page starting at `offset`.
    async fn search_page(
        &self,
        params: &SearchParams,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage>;

    /// Number of documents matching `query` in `window`.
    async fn count_results(&self, window: &DateWindow, query: &str) -> Result<Value>;

    /// Full detail of one document.
    async fn document_details(
        &self,
        document_id: &str,
        pages: &str,
        highlight: Option<&str>,
    ) -> Result<Value>;

    /// Page through the whole search (see [`crate::search::search_all`]).
    async fn search_all(
        &self,
        params: &SearchParams,
        pagination: &Pagination,
    ) -> Result<AggregatedSearchResult> {
        crate::search::search_all(self, params, pagination).await
    }
}
