//! Native client trait for in-process callers
//!
//! Other modules use this trait to reach KeywordPulse without going through HTTP.

use super::{
    error::KeywordPulseError,
    model::{
        AnalysisNotification, AnalysisPreferences, KeywordMetrics, KeywordTrend, ReportOptions,
        ScoredKeyword, SentMessage, TimeRange, TrendCategory, TrendingKeyword,
    },
};
use async_trait::async_trait;

/// KeywordPulse API for inter-module communication
#[async_trait]
pub trait KeywordPulseApi: Send + Sync {
    // ===== Keyword research =====

    /// Generate scored keyword suggestions for a search term
    async fn search_keywords(&self, keyword: &str) -> Result<Vec<KeywordMetrics>, KeywordPulseError>;

    /// Build a markdown analysis for a list of keywords
    async fn analyze_keywords(
        &self,
        keywords: &[String],
        preferences: &AnalysisPreferences,
    ) -> Result<String, KeywordPulseError>;

    /// Render a keyword report as Telegram HTML
    async fn render_report(
        &self,
        keywords: &[ScoredKeyword],
        options: &ReportOptions,
    ) -> Result<String, KeywordPulseError>;

    // ===== Trends =====

    /// Trend series for a keyword
    async fn keyword_trend(
        &self,
        keyword: &str,
        time_range: TimeRange,
        geo: &str,
    ) -> Result<KeywordTrend, KeywordPulseError>;

    /// Related search terms
    async fn related_keywords(
        &self,
        keyword: &str,
        count: usize,
    ) -> Result<Vec<String>, KeywordPulseError>;

    /// Trending keywords of a category
    async fn trending_keywords(
        &self,
        category: TrendCategory,
        count: usize,
    ) -> Result<Vec<TrendingKeyword>, KeywordPulseError>;

    // ===== Notifications =====

    /// Send an analysis notification through a caller-supplied bot
    async fn notify_analysis(
        &self,
        token: &str,
        chat_id: &str,
        notification: &AnalysisNotification,
    ) -> Result<SentMessage, KeywordPulseError>;
}
