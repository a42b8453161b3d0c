//! Native client implementation - wraps domain service for in-process calls

use crate::contract::{
    AnalysisNotification, AnalysisPreferences, KeywordMetrics, KeywordPulseApi,
    KeywordPulseError, KeywordTrend, ReportOptions, ScoredKeyword, SentMessage, TimeRange,
    TrendCategory, TrendingKeyword,
};
use crate::domain::Service;
use async_trait::async_trait;
use std::sync::Arc;

/// Native client implementation that directly calls the domain service
///
/// Used by other modules in the same process, without HTTP.
#[derive(Clone)]
pub struct NativeClient {
    service: Arc<Service>,
}

impl NativeClient {
    /// Create a new native client
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl KeywordPulseApi for NativeClient {
    async fn search_keywords(&self, keyword: &str) -> Result<Vec<KeywordMetrics>, KeywordPulseError> {
        self.service.search_keywords(keyword)
    }

    async fn analyze_keywords(
        &self,
        keywords: &[String],
        preferences: &AnalysisPreferences,
    ) -> Result<String, KeywordPulseError> {
        self.service.analyze_keywords(keywords, preferences)
    }

    async fn render_report(
        &self,
        keywords: &[ScoredKeyword],
        options: &ReportOptions,
    ) -> Result<String, KeywordPulseError> {
        Ok(self.service.render_report(keywords, options))
    }

    async fn keyword_trend(
        &self,
        keyword: &str,
        time_range: TimeRange,
        geo: &str,
    ) -> Result<KeywordTrend, KeywordPulseError> {
        self.service.keyword_trend(keyword, time_range, geo)
    }

    async fn related_keywords(
        &self,
        keyword: &str,
        count: usize,
    ) -> Result<Vec<String>, KeywordPulseError> {
        self.service.related_keywords(keyword, count)
    }

    async fn trending_keywords(
        &self,
        category: TrendCategory,
        count: usize,
    ) -> Result<Vec<TrendingKeyword>, KeywordPulseError> {
        Ok(self.service.trending_keywords(category, count))
    }

    async fn notify_analysis(
        &self,
        token: &str,
        chat_id: &str,
        notification: &AnalysisNotification,
    ) -> Result<SentMessage, KeywordPulseError> {
        self.service
            .notify_analysis(token, chat_id, notification)
            .await
    }
}
