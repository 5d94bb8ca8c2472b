//! Testing utilities including mock implementations.
//!
//! Lets the comparison run be exercised without any registry or LLM call.

use async_trait::async_trait;
use std::sync::{Arc, RwLock};

use registry_common::{ApiError, Siren};
use serde_json::Value;

use crate::error::{SummarizeError, SummarizeResult};
use crate::report::SourceFetcher;
use crate::summarize::{Summarizer, WebResearcher};

/// Source answering a fixed payload, or a fixed HTTP error.
pub struct MockSource {
    name: &'static str,
    response: Result<Value, u16>,
}

impl MockSource {
    pub fn new(name: &'static str, payload: Value) -> Self {
        Self {
            name,
            response: Ok(payload),
        }
    }

    pub fn failing(name: &'static str, status: u16) -> Self {
        Self {
            name,
            response: Err(status),
        }
    }
}

#[async_trait]
impl SourceFetcher for MockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    async fn fetch(&self, _siren: &Siren) -> Result<Value, ApiError> {
        match &self.response {
            Ok(payload) => Ok(payload.clone()),
            Err(status) => Err(ApiError::Remote {
                service: self.name,
                status: *status,
                body: "mock failure".to_string(),
            }),
        }
    }
}

/// Summarizer that records every payload it is given.
#[derive(Default)]
pub struct MockSummarizer {
    fail: bool,

    /// Payloads received, in call order
    calls: Arc<RwLock<Vec<Value>>>,
}

impl MockSummarizer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Shared view of the recorded payloads, usable after the mock is boxed.
    pub fn calls_handle(&self) -> Arc<RwLock<Vec<Value>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Summarizer for MockSummarizer {
    fn provider(&self) -> &str {
        "mock"
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    async fn summarize(&self, payload: &Value) -> SummarizeResult<String> {
        self.calls.write().unwrap().push(payload.clone());
        if self.fail {
            return Err(SummarizeError::Chat(openai_client::OpenAIError::Api(
                "HTTP 500: mock failure".into(),
            )));
        }
        Ok(format!("Synthèse de {} caractères", payload.to_string().len()))
    }
}

/// Researcher answering a fixed report and recording its hints.
pub struct MockResearcher {
    report: String,

    /// (siren, name hint) per call
    calls: Arc<RwLock<Vec<(String, Option<String>)>>>,
}

impl MockResearcher {
    pub fn new(report: impl Into<String>) -> Self {
        Self {
            report: report.into(),
            calls: Arc::default(),
        }
    }

    pub fn calls_handle(&self) -> Arc<RwLock<Vec<(String, Option<String>)>>> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl WebResearcher for MockResearcher {
    fn model(&self) -> &str {
        "sonar"
    }

    async fn research(&self, siren: &Siren, name_hint: Option<&str>) -> SummarizeResult<String> {
        self.calls
            .write()
            .unwrap()
            .push((siren.to_string(), name_hint.map(str::to_string)));
        Ok(self.report.clone())
    }
}
