//! Search and bundle types.

use chrono::{Days, Months, NaiveDate};
use registry_common::{Outcome, Siren};
use serde::{Serialize, Serializer};
use serde_json::{json, Map, Value};

/// Date format expected by the search API.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

pub const DEFAULT_GROUP_BY: &str = "COMPANIES";
pub const DEFAULT_SORT_BY: &str = "SCORES";

/// Inclusive publication-date range of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

impl DateWindow {
    pub fn new(from: NaiveDate, to: NaiveDate) -> Self {
        Self { from, to }
    }

    /// Window ending `today` and reaching back `lookback_days`.
    ///
    /// A year or more reaches back to the same calendar date one year
    /// earlier (Feb 29 becomes Feb 28). Shorter lookbacks subtract days.
    pub fn lookback(today: NaiveDate, lookback_days: u32) -> Self {
        let from = if lookback_days >= 365 {
            today.checked_sub_months(Months::new(12))
        } else {
            today.checked_sub_days(Days::new(lookback_days.into()))
        };
        Self::new(from.unwrap_or(today), today)
    }

    pub fn from_param(&self) -> String {
        self.from.format(DATE_FORMAT).to_string()
    }

    pub fn to_param(&self) -> String {
        self.to.format(DATE_FORMAT).to_string()
    }
}

/// Filters for one search over the document API.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub window: DateWindow,

    /// Query expression (`qe`); omitted from the request when empty
    pub query: String,

    pub group_by: String,
    pub sort_by: String,
}

impl SearchParams {
    pub fn new(window: DateWindow, query: impl Into<String>) -> Self {
        Self {
            window,
            query: query.into(),
            group_by: DEFAULT_GROUP_BY.to_string(),
            sort_by: DEFAULT_SORT_BY.to_string(),
        }
    }

    pub fn with_group_by(mut self, group_by: impl Into<String>) -> Self {
        self.group_by = group_by.into();
        self
    }

    pub fn with_sort_by(mut self, sort_by: impl Into<String>) -> Self {
        self.sort_by = sort_by.into();
        self
    }

    /// Query-string pairs for the `search` endpoint.
    pub fn query_pairs(&self, offset: usize, limit: usize) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("search_date_from", self.window.from_param()),
            ("search_date_to", self.window.to_param()),
            ("results_group_by", self.group_by.clone()),
            ("results_sort_by", self.sort_by.clone()),
            ("sk", offset.to_string()),
            ("lm", limit.to_string()),
        ];
        if !self.query.is_empty() {
            pairs.push(("qe", self.query.clone()));
        }
        pairs
    }
}

/// Page size and overall cap for [`crate::search::search_all`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page_size: usize,

    /// Never fetch more than this many results in total
    pub max_results: usize,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page_size: 100,
            max_results: 1000,
        }
    }
}

impl Pagination {
    pub fn new(page_size: usize, max_results: usize) -> Self {
        Self {
            page_size,
            max_results,
        }
    }
}

/// One matched filing, kept as the API returned it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct DocumentResult(Value);

impl DocumentResult {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    pub fn into_value(self) -> Value {
        self.0
    }

    /// Owning SIREN as printed by the API (`rne.siren`, string or number).
    pub fn owner_siren(&self) -> Option<String> {
        match self.0.get("rne")?.get("siren")? {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }

    pub fn belongs_to(&self, siren: &Siren) -> bool {
        self.owner_siren()
            .is_some_and(|owner| siren.matches_padded(&owner))
    }

    /// Id usable with the document detail endpoint: `acte_id`, else `inpi_id`.
    pub fn document_id(&self) -> Option<String> {
        ["acte_id", "inpi_id"]
            .iter()
            .find_map(|field| match self.0.get(*field)? {
                Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
                Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
    }
}

/// Results of `envelope.legalmap.search_results`; anything else is empty.
fn search_results(envelope: &Value) -> Vec<DocumentResult> {
    envelope
        .get("legalmap")
        .and_then(|lm| lm.get("search_results"))
        .and_then(Value::as_array)
        .map(|items| items.iter().cloned().map(DocumentResult::new).collect())
        .unwrap_or_default()
}

/// One page returned by the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchPage {
    /// Whole response, including pagination metadata
    pub envelope: Value,
    pub results: Vec<DocumentResult>,
}

impl SearchPage {
    pub fn from_value(envelope: Value) -> Self {
        let results = search_results(&envelope);
        Self { envelope, results }
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}

/// All pages of a search merged together.
///
/// Serializes as the first page's envelope with `legalmap.search_results`
/// replaced by the concatenation of every fetched page.
#[derive(Debug, Clone, PartialEq)]
pub struct AggregatedSearchResult {
    pub envelope: Value,
    pub results: Vec<DocumentResult>,
    pub pages_fetched: usize,
}

impl AggregatedSearchResult {
    pub fn to_value(&self) -> Value {
        let mut merged = match &self.envelope {
            Value::Object(map) => map.clone(),
            _ => Map::new(),
        };

        let legalmap = merged
            .entry("legalmap")
            .or_insert_with(|| json!({}));
        if !legalmap.is_object() {
            *legalmap = json!({});
        }
        legalmap["search_results"] = Value::Array(
            self.results.iter().map(|r| r.as_value().clone()).collect(),
        );

        Value::Object(merged)
    }
}

impl Serialize for AggregatedSearchResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

/// Everything known about one company from LegalMap.
///
/// Raw parts (`_search_raw`, `_count_results`) are kept next to the filtered
/// answer for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Bundle {
    /// RNE company record
    pub rne: Value,

    /// Search hits owned by the queried SIREN
    pub search_company_results: Vec<DocumentResult>,

    #[serde(rename = "_search_raw")]
    pub search_raw: AggregatedSearchResult,

    #[serde(rename = "_count_results")]
    pub count_results: Outcome<Value>,

    /// Detail payloads for the first few owned documents
    #[serde(rename = "_pdf_details_top")]
    pub pdf_details_top: Vec<Value>,

    #[serde(skip)]
    pub query: String,

    #[serde(skip)]
    pub window: Option<DateWindow>,
}

impl Bundle {
    pub fn to_value(&self) -> Value {
        json!({
            "rne": self.rne,
            "search_company_results": self.search_company_results,
            "_search_raw": self.search_raw.to_value(),
            "_count_results": self.count_results,
            "_pdf_details_top": self.pdf_details_top,
        })
    }
}
