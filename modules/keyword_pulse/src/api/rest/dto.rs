//! REST DTOs with serde derives for HTTP API
//!
//! Field names follow the public JSON contract: camelCase, except the Telegram
//! credentials (`token`, `chat_id`, `chat_ids`) which clients send in snake_case.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

// ===== Service DTOs =====

/// Service banner
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BannerResponse {
    #[schema(example = "KeywordPulse")]
    pub name: String,
    pub version: String,
    pub endpoints: Vec<String>,
}

/// Liveness probe
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    #[schema(example = "ok")]
    pub status: String,
}

// ===== Keyword research DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SearchRequest {
    #[schema(example = "AI 마케팅")]
    pub keyword: Option<String>,
}

/// Keyword result row
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct KeywordMetricsDto {
    pub keyword: String,
    pub monthly_searches: u64,
    /// 0.0 to 1.0
    pub competition_rate: f64,
    /// 0 to 100
    pub score: u8,
    pub recommendation: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SearchResponse {
    pub keywords: Vec<KeywordMetricsDto>,
    pub cached: bool,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisPreferencesDto {
    /// `ko` (default) or `en`
    pub language: Option<String>,
    pub industry: Option<String>,
    pub insight_count: Option<usize>,
    pub strategy_count: Option<usize>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AnalyzeRequest {
    pub keywords: Option<Vec<String>>,
    pub preferences: Option<AnalysisPreferencesDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeResponse {
    pub analysis_text: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct TrendQuery {
    pub keyword: Option<String>,
    /// day, week, month (default) or year
    pub time_range: Option<String>,
    /// Region code, default KR
    pub geo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendPointDto {
    pub date: String,
    pub value: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendMetadataDto {
    pub time_range: String,
    pub data_points_count: usize,
    pub geo: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse {
    pub keyword: String,
    pub trend_data: Vec<TrendPointDto>,
    pub metadata: TrendMetadataDto,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RelatedQuery {
    pub keyword: Option<String>,
    /// 1 to 50, default 10
    pub count: Option<String>,
    pub geo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RelatedMetadataDto {
    pub count: usize,
    pub geo: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RelatedResponse {
    pub keyword: String,
    pub related_keywords: Vec<String>,
    pub metadata: RelatedMetadataDto,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct TrendingQuery {
    /// all (default), business, technology, entertainment or health
    pub category: Option<String>,
    pub count: Option<String>,
    pub geo: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingKeywordDto {
    pub keyword: String,
    pub count: u32,
    /// Change in percent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub change: Option<i32>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TrendingResponse {
    pub keywords: Vec<TrendingKeywordDto>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub category: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct SyncRequest {
    pub keywords: Option<Vec<serde_json::Value>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SyncResponse {
    pub success: bool,
    pub spreadsheet_url: String,
}

// ===== Telegram DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyRequest {
    pub analysis_text: Option<String>,
    /// `markdown` converts inline markdown to HTML before sending
    pub format: Option<String>,
    /// HTML (default), Markdown or MarkdownV2
    pub parse_mode: Option<String>,
    #[serde(default)]
    pub disable_preview: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NotifyResponse {
    pub success: bool,
    /// Id of the first message part
    pub message_id: String,
    pub parts: usize,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrendChangeDto {
    pub period: String,
    pub change: f64,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TelegramNotifyRequest {
    pub token: Option<String>,
    #[serde(rename = "chat_id")]
    pub chat_id: Option<String>,
    pub keyword: Option<String>,
    pub score: Option<f64>,
    pub trends: Option<Vec<TrendChangeDto>>,
    pub custom_message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MessageDetailsDto {
    pub message_id: i64,
    pub date: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TelegramNotifyResponse {
    pub success: bool,
    pub message: String,
    pub details: MessageDetailsDto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RagReportRequest {
    pub token: Option<String>,
    #[serde(rename = "chat_id")]
    pub chat_id: Option<String>,
    /// Rows with `keyword`, `score`, `monthlySearches`, `competitionRate`
    pub keywords: Option<Vec<serde_json::Value>>,
    /// basic, detailed (default) or marketing
    pub template_type: Option<String>,
    pub max_keywords: Option<usize>,
    pub score_threshold: Option<f64>,
    pub include_stats: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RagReportResponse {
    pub success: bool,
    pub message: String,
    pub keyword_count: usize,
    pub template_type: String,
    /// Message object returned by Telegram
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct BroadcastRequest {
    pub token: Option<String>,
    pub chat_ids: Option<Vec<String>>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BroadcastSummaryDto {
    pub total: usize,
    pub success: usize,
    pub failed: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BroadcastDataDto {
    /// Telegram message per chat id
    pub results: BTreeMap<String, serde_json::Value>,
    /// Error message per chat id
    pub errors: BTreeMap<String, String>,
    pub summary: BroadcastSummaryDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct BroadcastResponse {
    pub success: bool,
    pub data: BroadcastDataDto,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TestMessageRequest {
    pub token: Option<String>,
    pub chat_id: Option<String>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TestMessageResponse {
    pub success: bool,
    pub message: String,
    pub data: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ValidateChatRequest {
    pub token: Option<String>,
    pub chat_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ValidateChatResponse {
    pub success: bool,
    pub valid: bool,
    pub message: String,
}

// ===== Feedback DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct FeedbackRequest {
    pub text: Option<String>,
    pub email: Option<String>,
    pub name: Option<String>,
    /// 1 to 5
    pub rating: Option<i64>,
    /// Defaults to 일반
    pub category: Option<String>,
    pub page: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackDto {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub rating: Option<u8>,
    pub category: String,
    pub page: Option<String>,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct FeedbackResponse {
    pub success: bool,
    pub message: String,
    pub data: FeedbackDto,
}

// ===== Analytics DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct WebVitalRequest {
    #[schema(example = "LCP")]
    pub name: Option<String>,
    pub value: Option<f64>,
    pub id: Option<String>,
    pub delta: Option<f64>,
    pub page: Option<String>,
    /// Milliseconds since the epoch
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ApiMetricDto {
    #[schema(example = "api_search")]
    pub name: String,
    /// Milliseconds
    pub duration: f64,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default = "default_success")]
    pub success: bool,
    pub metadata: Option<serde_json::Value>,
}

fn default_success() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct MetricBatchRequest {
    pub metrics: Option<Vec<ApiMetricDto>>,
    pub source: Option<String>,
    pub timestamp: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AcceptedResponse {
    pub success: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EndpointStatsDto {
    pub endpoint: String,
    #[serde(rename = "requestCount")]
    pub request_count: usize,
    #[serde(rename = "avgDuration")]
    pub avg_duration: f64,
    #[serde(rename = "errorRate")]
    pub error_rate: f64,
    #[serde(rename = "maxDuration")]
    pub max_duration: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct MetricBatchResponse {
    pub success: bool,
    pub processed: usize,
    pub critical: usize,
    pub stats: Vec<EndpointStatsDto>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TrackRequest {
    /// page_view, search, analyze, auth, content or conversion
    #[serde(rename = "type")]
    pub event_type: Option<String>,
    pub action: Option<String>,
    pub properties: Option<serde_json::Value>,
    pub path: Option<String>,
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TrackResponse {
    pub success: bool,
    pub event_id: Uuid,
}

// ===== Auth DTOs =====

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CredentialsRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AuthUserDto {
    pub id: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SessionDto {
    pub access_token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_in: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignInResponse {
    pub success: bool,
    pub user: AuthUserDto,
    pub session: SessionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SignUpResponse {
    pub success: bool,
    pub user: Option<AuthUserDto>,
    pub message: String,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct AuthCallbackQuery {
    pub code: Option<String>,
    pub code_verifier: Option<String>,
    /// `true` redirects to the development login page
    pub dev: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProfileResponse {
    pub user: AuthUserDto,
    pub profile: Option<serde_json::Value>,
}
