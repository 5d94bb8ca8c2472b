//! Testing utilities including mock implementations.
//!
//! Useful for exercising the aggregator and the bundle builder without
//! making real LegalMap calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use registry_common::{ApiError, Result, Siren};
use serde_json::{json, Value};

use crate::traits::{DocumentSearch, RegistrySource};
use crate::types::{DateWindow, SearchPage, SearchParams};

/// In-memory LegalMap source.
///
/// Search pages are served in call order: the first `search_page` call gets
/// the first configured page, and so on. Once the configured pages run out,
/// pages are empty (or full, see [`MockLegalMap::with_full_pages`]).
#[derive(Default)]
pub struct MockLegalMap {
    /// Record returned by `fetch_record`; `None` answers 404
    record: Option<Value>,

    /// Predefined search pages, in order
    pages: Vec<Vec<Value>>,

    /// Serve endless pages of this size once `pages` is exhausted
    full_pages: Option<usize>,

    /// Extra top-level fields added to every search envelope
    envelope: Option<Value>,

    /// `count_results` answer; `None` fails with 500
    count: Option<Value>,

    /// Detail payloads by document id; unknown ids answer 404
    details: HashMap<String, Value>,

    /// Fail `search_page` at this offset
    search_failure_offset: Option<usize>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockCall>>>,
}

/// Record of a call made to the mock.
#[derive(Debug, Clone, PartialEq)]
pub enum MockCall {
    FetchRecord {
        siren: String,
    },
    SearchPage {
        params: SearchParams,
        offset: usize,
        limit: usize,
    },
    CountResults {
        window: DateWindow,
        query: String,
    },
    DocumentDetails {
        document_id: String,
        pages: String,
        highlight: Option<String>,
    },
}

fn remote(status: u16, body: &str) -> ApiError {
    ApiError::Remote {
        service: "legalmap",
        status,
        body: body.to_string(),
    }
}

impl MockLegalMap {
    pub fn new() -> Self {
        Self {
            count: Some(json!({"count": 0})),
            ..Default::default()
        }
    }

    pub fn with_record(mut self, record: Value) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_pages(mut self, pages: Vec<Vec<Value>>) -> Self {
        self.pages = pages;
        self
    }

    pub fn with_full_pages(mut self, size: usize) -> Self {
        self.full_pages = Some(size);
        self
    }

    pub fn with_envelope(mut self, fields: Value) -> Self {
        self.envelope = Some(fields);
        self
    }

    pub fn with_count(mut self, count: Value) -> Self {
        self.count = Some(count);
        self
    }

    pub fn failing_count(mut self) -> Self {
        self.count = None;
        self
    }

    pub fn with_details(mut self, document_id: impl Into<String>, details: Value) -> Self {
        self.details.insert(document_id.into(), details);
        self
    }

    pub fn failing_search_at(mut self, offset: usize) -> Self {
        self.search_failure_offset = Some(offset);
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.read().unwrap().clone()
    }

    /// Offsets of every `search_page` call, in order.
    pub fn search_offsets(&self) -> Vec<usize> {
        self.search_calls().map(|(offset, _)| offset).collect()
    }

    /// Limits of every `search_page` call, in order.
    pub fn search_limits(&self) -> Vec<usize> {
        self.search_calls().map(|(_, limit)| limit).collect()
    }

    /// Document ids passed to `document_details`, in order.
    pub fn detail_ids(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                MockCall::DocumentDetails { document_id, .. } => Some(document_id),
                _ => None,
            })
            .collect()
    }

    fn search_calls(&self) -> impl Iterator<Item = (usize, usize)> {
        self.calls().into_iter().filter_map(|call| match call {
            MockCall::SearchPage { offset, limit, .. } => Some((offset, limit)),
            _ => None,
        })
    }

    fn record_call(&self, call: MockCall) {
        self.calls.write().unwrap().push(call);
    }

    fn page(&self, index: usize) -> Vec<Value> {
        match self.pages.get(index) {
            Some(page) => page.clone(),
            None => match self.full_pages {
                Some(size) => (0..size)
                    .map(|n| json!({"n": n, "page": index}))
                    .collect(),
                None => Vec::new(),
            },
        }
    }
}

#[async_trait]
impl RegistrySource for MockLegalMap {
    async fn fetch_record(&self, siren: &Siren) -> Result<Value> {
        self.record_call(MockCall::FetchRecord {
            siren: siren.to_string(),
        });
        self.record
            .clone()
            .ok_or_else(|| remote(404, r#"{"message":"company not found"}"#))
    }
}

#[async_trait]
impl DocumentSearch for MockLegalMap {
    async fn search_page(
        &self,
        params: &SearchParams,
        offset: usize,
        limit: usize,
    ) -> Result<SearchPage> {
        let index = self.search_offsets().len();
        self.record_call(MockCall::SearchPage {
            params: params.clone(),
            offset,
            limit,
        });

        if self.search_failure_offset == Some(offset) {
            return Err(remote(500, r#"{"message":"internal error"}"#));
        }

        let mut envelope = match &self.envelope {
            Some(Value::Object(fields)) => Value::Object(fields.clone()),
            _ => json!({}),
        };
        envelope["legalmap"] = json!({
            "search_results": self.page(index),
            "sk": offset,
            "lm": limit,
        });
        Ok(SearchPage::from_value(envelope))
    }

    async fn count_results(&self, window: &DateWindow, query: &str) -> Result<Value> {
        self.record_call(MockCall::CountResults {
            window: *window,
            query: query.to_string(),
        });
        self.count
            .clone()
            .ok_or_else(|| remote(500, r#"{"message":"count unavailable"}"#))
    }

    async fn document_details(
        &self,
        document_id: &str,
        pages: &str,
        highlight: Option<&str>,
    ) -> Result<Value> {
        self.record_call(MockCall::DocumentDetails {
            document_id: document_id.to_string(),
            pages: pages.to_string(),
            highlight: highlight.map(str::to_string),
        });
        self.details
            .get(document_id)
            .cloned()
            .ok_or_else(|| remote(404, r#"{"message":"document not found"}"#))
    }
}
