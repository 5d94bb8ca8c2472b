//! LegalMap vs Pappers comparison.
//!
//! Fetches one company from both registries, flattens the two payloads into
//! a shared key space, and has each payload summarized on its own. A web
//! research report, built from the SIREN alone, sits next to them.
//!
//! # Example
//!
//! ```rust,ignore
//! use legalmap_client::BundleOptions;
//! use registry_common::Siren;
//! use registry_compare::{AppConfig, Comparator, ReportOptions};
//!
//! let config = AppConfig::from_env();
//! let comparator = Comparator::from_config(&config, BundleOptions::default(), ReportOptions::default());
//!
//! let report = comparator.run(&Siren::parse("552100554")?).await;
//! report.table.save_csv("comparaison_552100554.csv".as_ref())?;
//! ```
//!
//! # Modules
//!
//! - [`flatten`] - JSON flattening and row-wise diff
//! - [`table`] - Comparison table and CSV export
//! - [`summarize`] - Isolated summaries and web research
//! - [`report`] - The comparison run
//! - [`cost`] - Cost estimate
//! - [`config`] - Environment configuration

pub mod config;
pub mod cost;
pub mod error;
pub mod flatten;
pub mod report;
pub mod summarize;
pub mod table;
pub mod testing;

pub use config::AppConfig;
pub use cost::CostEstimate;
pub use error::{SummarizeError, SummarizeResult};
pub use flatten::{compare, display_value, flatten, ComparisonRow, FlatMap};
pub use report::{CompanyReport, Comparator, LegalMapSource, ReportOptions, SourceFetcher};
pub use summarize::{
    select_summarizer, ChatSummarizer, PerplexityResearcher, Summarizer, WebResearcher,
};
pub use table::{default_csv_path, ComparisonTable};
