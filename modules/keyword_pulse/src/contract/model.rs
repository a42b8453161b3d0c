//! Contract models for KeywordPulse
//!
//! These models are transport-agnostic and used for inter-module communication.
//! NO serde derives - these are pure domain models.

use chrono::{DateTime, Utc};
use std::collections::BTreeMap;

// ===== Keyword research =====

/// A generated keyword result row
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMetrics {
    /// Keyword text
    pub keyword: String,
    /// Assumed monthly search volume
    pub monthly_searches: u64,
    /// Competition rate in 0..1, rounded to two decimals
    pub competition_rate: f64,
    /// Score in 0..=100
    pub score: u8,
    /// Recommendation derived from the score
    pub recommendation: Recommendation,
}

/// Recommendation tier derived from a keyword score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Recommendation {
    Strong,
    Recommended,
    LowPriority,
}

impl Recommendation {
    /// Tier for a score: 80+ strong, 50+ recommended, otherwise low priority
    pub fn from_score(score: u8) -> Self {
        if score >= 80 {
            Self::Strong
        } else if score >= 50 {
            Self::Recommended
        } else {
            Self::LowPriority
        }
    }

    /// Display label used in API responses
    pub fn label(&self) -> &'static str {
        match self {
            Self::Strong => "🟢 강력 추천",
            Self::Recommended => "🟡 추천",
            Self::LowPriority => "⚪ 낮은 우선순위",
        }
    }
}

/// Keyword with externally supplied numbers, used as report input
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredKeyword {
    pub keyword: String,
    pub monthly_searches: u64,
    pub competition_rate: f64,
    pub score: f64,
}

// ===== Trends =====

/// Time window for a keyword trend series
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeRange {
    Day,
    Week,
    Month,
    Year,
}

impl TimeRange {
    pub const ALL: [TimeRange; 4] = [Self::Day, Self::Week, Self::Month, Self::Year];

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "day" => Some(Self::Day),
            "week" => Some(Self::Week),
            "month" => Some(Self::Month),
            "year" => Some(Self::Year),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
        }
    }
}

/// One point of a trend series
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendPoint {
    /// `YYYY-MM-DD`, `YYYY-MM-DD H:00` or `YYYY-MM` depending on the range
    pub date: String,
    pub value: u32,
}

/// Trend series for a keyword
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordTrend {
    pub keyword: String,
    pub time_range: TimeRange,
    pub geo: String,
    pub points: Vec<TrendPoint>,
    pub generated_at: DateTime<Utc>,
}

/// Category of the trending-keyword tables
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrendCategory {
    All,
    Business,
    Technology,
    Entertainment,
    Health,
}

impl TrendCategory {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "all" => Some(Self::All),
            "business" => Some(Self::Business),
            "technology" => Some(Self::Technology),
            "entertainment" => Some(Self::Entertainment),
            "health" => Some(Self::Health),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Business => "business",
            Self::Technology => "technology",
            Self::Entertainment => "entertainment",
            Self::Health => "health",
        }
    }
}

/// Trending keyword with relative search index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingKeyword {
    pub keyword: String,
    pub count: u32,
    /// Change in percent
    pub change: Option<i32>,
}

// ===== Analysis =====

/// Category assigned to a keyword by the analysis engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeywordCategory {
    AiTechnology,
    DigitalMarketing,
    AppDevelopment,
    Education,
    Health,
    Finance,
    Modeling3d,
    General,
}

impl KeywordCategory {
    pub fn label(&self) -> &'static str {
        match self {
            Self::AiTechnology => "AI 기술",
            Self::DigitalMarketing => "디지털 마케팅",
            Self::AppDevelopment => "앱 개발",
            Self::Education => "교육/학습",
            Self::Health => "건강/의료",
            Self::Finance => "금융/투자",
            Self::Modeling3d => "3D 모델링/AI",
            Self::General => "일반",
        }
    }
}

/// Output language of generated analysis text
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Ko,
    En,
}

impl Language {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "ko" => Some(Self::Ko),
            "en" => Some(Self::En),
            _ => None,
        }
    }
}

/// Caller preferences for keyword analysis
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisPreferences {
    pub language: Language,
    /// Overrides the detected category when it names a known industry
    pub industry: Option<String>,
    pub insight_count: Option<usize>,
    pub strategy_count: Option<usize>,
}

/// Template used when rendering a keyword report
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ReportTemplate {
    #[default]
    Basic,
    Detailed,
    Marketing,
}

impl ReportTemplate {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "basic" => Some(Self::Basic),
            "detailed" => Some(Self::Detailed),
            "marketing" => Some(Self::Marketing),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Detailed => "detailed",
            Self::Marketing => "marketing",
        }
    }
}

/// Options for keyword report rendering
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOptions {
    pub template: ReportTemplate,
    pub max_keywords: usize,
    pub score_threshold: f64,
    pub include_stats: bool,
}

impl Default for ReportOptions {
    fn default() -> Self {
        Self {
            template: ReportTemplate::Basic,
            max_keywords: 5,
            score_threshold: 60.0,
            include_stats: true,
        }
    }
}

// ===== Telegram =====

/// Telegram message parse mode
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ParseMode {
    #[default]
    Html,
    Markdown,
    MarkdownV2,
}

impl ParseMode {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "HTML" => Some(Self::Html),
            "Markdown" => Some(Self::Markdown),
            "MarkdownV2" => Some(Self::MarkdownV2),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Html => "HTML",
            Self::Markdown => "Markdown",
            Self::MarkdownV2 => "MarkdownV2",
        }
    }
}

/// Outgoing Telegram message
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TelegramMessage {
    pub chat_id: String,
    pub text: String,
    pub parse_mode: ParseMode,
    pub disable_web_page_preview: bool,
    pub disable_notification: bool,
}

impl TelegramMessage {
    /// HTML message with previews and notifications enabled
    pub fn html(chat_id: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            chat_id: chat_id.into(),
            text: text.into(),
            parse_mode: ParseMode::Html,
            disable_web_page_preview: false,
            disable_notification: false,
        }
    }

    pub fn without_preview(mut self) -> Self {
        self.disable_web_page_preview = true;
        self
    }
}

/// Message accepted by Telegram
#[derive(Debug, Clone, PartialEq)]
pub struct SentMessage {
    pub message_id: i64,
    /// Unix time reported by Telegram
    pub date: i64,
    /// Full `result` object returned by the Bot API
    pub raw: serde_json::Value,
}

/// Keyword report delivered to a chat
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDelivery {
    pub message: SentMessage,
    /// Number of well-formed keyword rows the report was built from
    pub keyword_count: usize,
    pub template: ReportTemplate,
}

/// Chat metadata returned by `getChat`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatInfo {
    pub id: i64,
    /// private, group, supergroup or channel
    pub chat_type: String,
    pub title: Option<String>,
}

/// Result of validating a chat id
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatValidation {
    pub valid: bool,
    pub message: String,
}

/// Per-chat outcome of a broadcast
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BroadcastReport {
    pub results: BTreeMap<String, SentMessage>,
    pub errors: BTreeMap<String, String>,
    pub total: usize,
}

impl BroadcastReport {
    pub fn succeeded(&self) -> usize {
        self.results.len()
    }

    pub fn failed(&self) -> usize {
        self.errors.len()
    }
}

/// Trend change entry of an analysis notification
#[derive(Debug, Clone, PartialEq)]
pub struct TrendChange {
    pub period: String,
    pub change: f64,
}

/// Keyword analysis notification request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalysisNotification {
    pub keyword: Option<String>,
    pub score: f64,
    pub trends: Vec<TrendChange>,
    /// Sent verbatim instead of the formatted notification when present
    pub custom_message: Option<String>,
}

/// Output format of an analysis relay request
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RelayFormat {
    /// Text is sent as-is with the requested parse mode
    #[default]
    Raw,
    /// Inline markdown is converted to Telegram HTML first
    Markdown,
}

/// Analysis text to relay to the configured chat
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AnalysisRelay {
    pub text: String,
    pub format: RelayFormat,
    pub parse_mode: Option<ParseMode>,
    pub disable_preview: bool,
}

// ===== Feedback =====

/// Feedback as submitted by a user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackSubmission {
    pub text: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub rating: Option<u8>,
    pub category: Option<String>,
    pub page: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
}

/// Feedback row ready to be stored
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewFeedback {
    pub text: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub rating: Option<u8>,
    pub category: String,
    pub page: Option<String>,
    pub ip: Option<String>,
    pub user_agent: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Stored feedback row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Feedback {
    /// Identifier assigned by the store, if it returned one
    pub id: Option<String>,
    pub text: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub rating: Option<u8>,
    pub category: String,
    pub page: Option<String>,
    pub created_at: DateTime<Utc>,
}

// ===== Analytics =====

/// Web vital measurement reported by the browser
#[derive(Debug, Clone, PartialEq)]
pub struct WebVitalMetric {
    pub name: String,
    pub value: f64,
    pub id: Option<String>,
    pub delta: Option<f64>,
    pub page: Option<String>,
    /// Milliseconds since the epoch
    pub timestamp: Option<i64>,
}

/// Single API timing measurement
#[derive(Debug, Clone, PartialEq)]
pub struct ApiMetric {
    pub name: String,
    /// Milliseconds
    pub duration: f64,
    pub timestamp: i64,
    pub success: bool,
    pub metadata: Option<serde_json::Value>,
}

/// Batch of API timing measurements
#[derive(Debug, Clone, PartialEq)]
pub struct MetricBatch {
    pub metrics: Vec<ApiMetric>,
    pub source: String,
    pub timestamp: Option<i64>,
}

/// Aggregated numbers for one endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct EndpointStats {
    pub endpoint: String,
    pub request_count: usize,
    pub avg_duration: f64,
    pub error_rate: f64,
    pub max_duration: f64,
}

/// Outcome of processing a metric batch
#[derive(Debug, Clone, PartialEq)]
pub struct BatchReport {
    pub processed: usize,
    pub critical: usize,
    pub stats: Vec<EndpointStats>,
}

/// Kind of tracked user action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventType {
    PageView,
    Search,
    Analyze,
    Auth,
    Content,
    Conversion,
}

impl EventType {
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "page_view" => Some(Self::PageView),
            "search" => Some(Self::Search),
            "analyze" => Some(Self::Analyze),
            "auth" => Some(Self::Auth),
            "content" => Some(Self::Content),
            "conversion" => Some(Self::Conversion),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageView => "page_view",
            Self::Search => "search",
            Self::Analyze => "analyze",
            Self::Auth => "auth",
            Self::Content => "content",
            Self::Conversion => "conversion",
        }
    }
}

/// Tracked user action plus request metadata
#[derive(Debug, Clone, PartialEq)]
pub struct TrackEvent {
    pub event_type: EventType,
    pub action: String,
    pub properties: Option<serde_json::Value>,
    pub path: Option<String>,
    pub timestamp: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub client_ip: Option<String>,
}

// ===== Auth =====

/// User record of the hosted auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthUser {
    pub id: String,
    pub email: Option<String>,
}

/// Session issued by the hosted auth provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    pub access_token: String,
    pub refresh_token: Option<String>,
    pub expires_in: Option<i64>,
    pub user: AuthUser,
}

/// Outcome of a sign-up
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignUpOutcome {
    pub user: Option<AuthUser>,
    pub message: String,
}

/// Authenticated user with their profile row
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user: AuthUser,
    pub profile: Option<serde_json::Value>,
}
