//! Route registration and HTTP middleware

use super::{dto::*, error::Problem, handlers, openapi};
use crate::config::ServerConfig;
use crate::domain::Service;
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        DefaultBodyLimit, Query,
    },
    http::{HeaderMap, HeaderValue, StatusCode, Uri},
    response::Redirect,
    routing::{get, post},
    Extension, Json, Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

/// Register all REST routes
pub fn register_routes(router: Router, service: Arc<Service>) -> anyhow::Result<Router> {
    let server = service.config().server.clone();

    let router = router
        .route("/", get(handlers::banner))
        .route("/health", get(handlers::health))
        .route("/api/openapi.json", get(openapi::openapi_json))
        // Keyword research
        .route("/api/search", post(search_handler))
        .route("/api/analyze", post(analyze_handler))
        .route("/api/trend", get(trend_handler))
        .route("/api/related", get(related_handler))
        .route("/api/trending", get(trending_handler))
        .route("/api/sync", post(sync_handler))
        // Telegram
        .route("/api/notify", post(notify_handler))
        .route("/api/notify/telegram", post(notify_telegram_handler))
        .route("/api/notify/telegram/rag", post(notify_report_handler))
        .route("/api/notify/telegram/multi", post(notify_broadcast_handler))
        .route("/api/notify/telegram/test", post(notify_test_handler))
        .route("/api/notify/telegram/validate", post(notify_validate_handler))
        // Feedback and analytics
        .route("/api/feedback", post(feedback_handler))
        .route("/api/metrics", post(web_vital_handler))
        .route("/api/metrics/batch", post(metric_batch_handler))
        .route("/api/track", post(track_handler))
        // Auth
        .route("/api/auth/signin", post(sign_in_handler))
        .route("/api/auth/signup", post(sign_up_handler))
        .route("/auth/callback", get(auth_callback_handler))
        .route("/api/profile", get(profile_handler))
        .fallback(not_found)
        // Add service as extension for handlers
        .layer(Extension(service));

    Ok(apply_middleware(router, &server))
}

/// Body limit, timeout, CORS, request ids and tracing
fn apply_middleware(router: Router, server: &ServerConfig) -> Router {
    router
        .layer(DefaultBodyLimit::max(server.max_body_bytes))
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(TraceLayer::new_for_http())
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(cors_layer(&server.cors_allowed_origins))
                .layer(TimeoutLayer::new(Duration::from_secs(server.request_timeout_secs))),
        )
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match HeaderValue::from_str(origin) {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();
    layer.allow_origin(allowed)
}

async fn not_found(uri: Uri) -> Problem {
    Problem::new(StatusCode::NOT_FOUND, "Not Found")
        .with_detail("요청한 경로를 찾을 수 없습니다.")
        .with_instance(uri.path())
}

// ===== Handler wrappers that extract service from Extension =====

async fn search_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, Problem> {
    handlers::search(service, json).await
}

async fn analyze_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<AnalyzeRequest>, JsonRejection>,
) -> Result<Json<AnalyzeResponse>, Problem> {
    handlers::analyze(service, json).await
}

async fn trend_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<TrendQuery>, QueryRejection>,
) -> Result<Json<TrendResponse>, Problem> {
    handlers::trend(service, query).await
}

async fn related_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<RelatedQuery>, QueryRejection>,
) -> Result<Json<RelatedResponse>, Problem> {
    handlers::related(service, query).await
}

async fn trending_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<TrendingQuery>, QueryRejection>,
) -> Result<Json<TrendingResponse>, Problem> {
    handlers::trending(service, query).await
}

async fn sync_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<SyncRequest>, JsonRejection>,
) -> Result<Json<SyncResponse>, Problem> {
    handlers::sync(service, json).await
}

async fn notify_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<NotifyRequest>, JsonRejection>,
) -> Result<Json<NotifyResponse>, Problem> {
    handlers::notify(service, json).await
}

async fn notify_telegram_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<TelegramNotifyRequest>, JsonRejection>,
) -> Result<Json<TelegramNotifyResponse>, Problem> {
    handlers::notify_telegram(service, json).await
}

async fn notify_report_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<RagReportRequest>, JsonRejection>,
) -> Result<Json<RagReportResponse>, Problem> {
    handlers::notify_report(service, json).await
}

async fn notify_broadcast_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<BroadcastRequest>, JsonRejection>,
) -> Result<Json<BroadcastResponse>, Problem> {
    handlers::notify_broadcast(service, json).await
}

async fn notify_test_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<TestMessageRequest>, JsonRejection>,
) -> Result<Json<TestMessageResponse>, Problem> {
    handlers::notify_test(service, json).await
}

async fn notify_validate_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<ValidateChatRequest>, JsonRejection>,
) -> Result<Json<ValidateChatResponse>, Problem> {
    handlers::notify_validate(service, json).await
}

async fn feedback_handler(
    Extension(service): Extension<Arc<Service>>,
    headers: HeaderMap,
    json: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Result<Json<FeedbackResponse>, Problem> {
    handlers::feedback(service, headers, json).await
}

async fn web_vital_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<WebVitalRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AcceptedResponse>), Problem> {
    handlers::web_vital(service, json).await
}

async fn metric_batch_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<MetricBatchRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<MetricBatchResponse>), Problem> {
    handlers::metric_batch(service, json).await
}

async fn track_handler(
    Extension(service): Extension<Arc<Service>>,
    headers: HeaderMap,
    json: Result<Json<TrackRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<TrackResponse>), Problem> {
    handlers::track(service, headers, json).await
}

async fn sign_in_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignInResponse>, Problem> {
    handlers::sign_in(service, json).await
}

async fn sign_up_handler(
    Extension(service): Extension<Arc<Service>>,
    json: Result<Json<CredentialsRequest>, JsonRejection>,
) -> Result<Json<SignUpResponse>, Problem> {
    handlers::sign_up(service, json).await
}

async fn auth_callback_handler(
    Extension(service): Extension<Arc<Service>>,
    query: Result<Query<AuthCallbackQuery>, QueryRejection>,
) -> Result<Redirect, Problem> {
    handlers::auth_callback(service, query).await
}

async fn profile_handler(
    Extension(service): Extension<Arc<Service>>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, Problem> {
    handlers::profile(service, headers).await
}
