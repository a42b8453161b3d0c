//! Contract layer - public API for inter-module communication
//!
//! This layer contains transport-agnostic models and the native client trait.
//! NO serde derives on models - these are pure domain types.

pub mod client;
pub mod error;
pub mod model;

pub use client::KeywordPulseApi;
pub use error::{KeywordPulseError, UpstreamError};
pub use model::{
    AnalysisNotification, AnalysisPreferences, AnalysisRelay, ApiMetric, AuthSession, AuthUser,
    BatchReport, BroadcastReport, ChatInfo, ChatValidation, EndpointStats, EventType, Feedback,
    FeedbackSubmission, KeywordCategory, KeywordMetrics, KeywordTrend, Language, MetricBatch,
    NewFeedback, ParseMode, Recommendation, RelayFormat, ReportDelivery, ReportOptions,
    ReportTemplate, ScoredKeyword, SentMessage, SignUpOutcome, TelegramMessage, TimeRange,
    TrackEvent, TrendCategory, TrendChange, TrendPoint, TrendingKeyword, UserProfile,
    WebVitalMetric,
};
