//! OpenAPI document built from the REST DTO schemas

use super::dto::*;
use super::error::Problem;
use axum::Json;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "KeywordPulse API",
        description = "Keyword research, trend data, Telegram notifications, feedback and analytics"
    ),
    components(schemas(
        Problem,
        BannerResponse,
        HealthResponse,
        SearchRequest,
        SearchResponse,
        KeywordMetricsDto,
        AnalyzeRequest,
        AnalyzeResponse,
        AnalysisPreferencesDto,
        TrendResponse,
        TrendPointDto,
        TrendMetadataDto,
        RelatedResponse,
        RelatedMetadataDto,
        TrendingResponse,
        TrendingKeywordDto,
        SyncRequest,
        SyncResponse,
        NotifyRequest,
        NotifyResponse,
        TelegramNotifyRequest,
        TelegramNotifyResponse,
        TrendChangeDto,
        MessageDetailsDto,
        RagReportRequest,
        RagReportResponse,
        BroadcastRequest,
        BroadcastResponse,
        BroadcastDataDto,
        BroadcastSummaryDto,
        TestMessageRequest,
        TestMessageResponse,
        ValidateChatRequest,
        ValidateChatResponse,
        FeedbackRequest,
        FeedbackResponse,
        FeedbackDto,
        WebVitalRequest,
        AcceptedResponse,
        ApiMetricDto,
        MetricBatchRequest,
        MetricBatchResponse,
        EndpointStatsDto,
        TrackRequest,
        TrackResponse,
        CredentialsRequest,
        AuthUserDto,
        SessionDto,
        SignInResponse,
        SignUpResponse,
        ProfileResponse,
    )),
    tags(
        (name = "keywords", description = "Keyword research"),
        (name = "telegram", description = "Telegram notifications"),
        (name = "analytics", description = "Metrics and event tracking"),
        (name = "auth", description = "Supabase authentication")
    )
)]
pub struct ApiDoc;

pub async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}
