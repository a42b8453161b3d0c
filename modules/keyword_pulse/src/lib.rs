//! KeywordPulse Module
//!
//! Keyword research backend: synthetic keyword scoring and trend data, report
//! templating, Telegram delivery, feedback storage in Supabase and
//! web-analytics ingestion.

// Public exports
pub mod contract;
pub use contract::{
    client::KeywordPulseApi, error::KeywordPulseError, KeywordMetrics, KeywordTrend,
    Recommendation, ScoredKeyword, TimeRange, TrendCategory,
};

pub mod config;
pub use config::Config;

pub mod module;
pub use module::KeywordPulseModule;

// Internal modules (hidden from public API)
#[doc(hidden)]
pub mod api;
#[doc(hidden)]
pub mod domain;
#[doc(hidden)]
pub mod infra;
