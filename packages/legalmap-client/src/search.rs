//! Search pagination.

use registry_common::Result;
use serde_json::json;
use tracing::{debug, info};

use crate::traits::DocumentSearch;
use crate::types::{AggregatedSearchResult, Pagination, SearchPage, SearchParams};

/// Page through a search and merge every page.
///
/// The offset starts at 0 and advances by `page_size`. Paging stops at the
/// first empty page, at the first page shorter than requested, or once
/// `max_results` have been fetched. The last request is shrunk so the total
/// never exceeds `max_results`.
pub async fn search_all<S>(
    source: &S,
    params: &SearchParams,
    pagination: &Pagination,
) -> Result<AggregatedSearchResult>
where
    S: DocumentSearch + ?Sized,
{
    let page_size = pagination.page_size.max(1);
    let mut envelope = None;
    let mut results = Vec::new();
    let mut pages_fetched = 0;
    let mut offset = 0;

    while offset < pagination.max_results {
        let limit = page_size.min(pagination.max_results - offset);
        let SearchPage {
            envelope: page_envelope,
            results: page_results,
        } = source.search_page(params, offset, limit).await?;
        pages_fetched += 1;

        let fetched = page_results.len();
        debug!(offset, limit, fetched, "Fetched search page");

        if envelope.is_none() {
            envelope = Some(page_envelope);
        }
        if fetched == 0 {
            break;
        }
        results.extend(page_results.into_iter().take(limit));
        if fetched < limit {
            break;
        }
        offset += page_size;
    }

    info!(
        query = %params.query,
        pages = pages_fetched,
        results = results.len(),
        "Search aggregated"
    );

    Ok(AggregatedSearchResult {
        envelope: envelope.unwrap_or_else(|| json!({})),
        results,
        pages_fetched,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockLegalMap;
    use crate::types::DateWindow;
    use chrono::NaiveDate;
    use serde_json::json;

    fn params() -> SearchParams {
        let today = NaiveDate::from_ymd_opt(2026, 10, 17).unwrap();
        SearchParams::new(DateWindow::lookback(today, 365), "\"EXAMPLE SA\"")
    }

    fn docs(count: usize, start: usize) -> Vec<serde_json::Value> {
        (start..start + count)
            .map(|n| json!({"n": n, "rne": {"siren": "552100554"}}))
            .collect()
    }

    #[tokio::test]
    async fn test_stops_at_short_page() {
        let mock = MockLegalMap::new().with_pages(vec![docs(100, 0), docs(100, 100), docs(37, 200)]);

        let aggregated = mock
            .search_all(&params(), &Pagination::new(100, 1000))
            .await
            .unwrap();

        assert_eq!(aggregated.results.len(), 237);
        assert_eq!(aggregated.pages_fetched, 3);
        assert_eq!(mock.search_offsets(), vec![0, 100, 200]);

        // Arrival order preserved
        let ns: Vec<u64> = aggregated
            .results
            .iter()
            .map(|r| r.as_value()["n"].as_u64().unwrap())
            .collect();
        assert_eq!(ns, (0..237).collect::<Vec<u64>>());
    }

    #[tokio::test]
    async fn test_stops_at_empty_page() {
        let mock = MockLegalMap::new().with_pages(vec![docs(100, 0), vec![]]);

        let aggregated = mock
            .search_all(&params(), &Pagination::new(100, 1000))
            .await
            .unwrap();

        assert_eq!(aggregated.results.len(), 100);
        assert_eq!(mock.search_offsets(), vec![0, 100]);
    }

    #[tokio::test]
    async fn test_max_results_bounds_requests_and_items() {
        let mock = MockLegalMap::new().with_full_pages(100);

        let aggregated = mock
            .search_all(&params(), &Pagination::new(100, 250))
            .await
            .unwrap();

        assert_eq!(mock.search_offsets(), vec![0, 100, 200]);
        assert_eq!(mock.search_limits(), vec![100, 100, 50]);
        assert_eq!(aggregated.results.len(), 250);
    }

    #[tokio::test]
    async fn test_oversized_pages_are_clamped() {
        // A source ignoring `lm` must not push the total past the cap.
        let mock = MockLegalMap::new().with_pages(vec![docs(100, 0), docs(100, 100), docs(100, 200)]);

        let aggregated = mock
            .search_all(&params(), &Pagination::new(100, 250))
            .await
            .unwrap();

        assert_eq!(aggregated.results.len(), 250);
        assert_eq!(mock.search_offsets().len(), 3);
    }

    #[tokio::test]
    async fn test_envelope_comes_from_first_page() {
        let mock = MockLegalMap::new()
            .with_pages(vec![docs(2, 0), docs(1, 2)])
            .with_envelope(json!({"query_id": "first"}));

        let aggregated = mock
            .search_all(&params(), &Pagination::new(2, 10))
            .await
            .unwrap();

        let value = aggregated.to_value();
        assert_eq!(value["query_id"], "first");
        assert_eq!(value["legalmap"]["search_results"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn test_zero_max_results_fetches_nothing() {
        let mock = MockLegalMap::new().with_full_pages(100);

        let aggregated = mock
            .search_all(&params(), &Pagination::new(100, 0))
            .await
            .unwrap();

        assert!(mock.search_offsets().is_empty());
        assert_eq!(aggregated.to_value(), json!({"legalmap": {"search_results": []}}));
    }

    #[tokio::test]
    async fn test_page_error_propagates() {
        let mock = MockLegalMap::new()
            .with_pages(vec![docs(100, 0)])
            .failing_search_at(100);

        let err = mock
            .search_all(&params(), &Pagination::new(100, 1000))
            .await
            .unwrap_err();

        assert_eq!(err.status(), Some(500));
    }
}
