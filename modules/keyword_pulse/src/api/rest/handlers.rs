//! HTTP request handlers - thin layer that delegates to domain service

use super::{
    dto::*,
    error::{map_domain_error, map_json_rejection, map_query_rejection, Problem},
};
use crate::contract::{
    AnalysisNotification, AnalysisPreferences, AnalysisRelay, FeedbackSubmission,
    KeywordPulseError, MetricBatch, RelayFormat, ReportOptions, TrackEvent, WebVitalMetric,
};
use crate::domain::{validation, Service};
use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::{header, HeaderMap, StatusCode},
    response::Redirect,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

const DEFAULT_GEO: &str = "KR";
const MARKDOWN_FORMAT: &str = "markdown";
const NOTIFY_SENT: &str = "알림이 성공적으로 전송되었습니다.";
const REPORT_SENT: &str = "RAG 분석 결과가 성공적으로 전송되었습니다.";
const TEST_SENT: &str = "텔레그램 테스트 메시지가 성공적으로 전송되었습니다.";
const FEEDBACK_STORED: &str = "피드백이 성공적으로 제출되었습니다.";
const SERVICE_NAME: &str = "KeywordPulse";

type JsonBody<T> = Result<Json<T>, JsonRejection>;
type QueryParams<T> = Result<Query<T>, QueryRejection>;

fn body<T>(payload: JsonBody<T>) -> Result<T, Problem> {
    payload.map(|Json(value)| value).map_err(map_json_rejection)
}

/// Body of an ingestion endpoint; malformed payloads report `message`
fn body_or_invalid<T>(payload: JsonBody<T>, message: &str) -> Result<T, Problem> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            map_json_rejection(rejection)
        } else {
            map_domain_error(KeywordPulseError::validation(message))
        }
    })
}

fn query<T>(params: QueryParams<T>) -> Result<T, Problem> {
    params.map(|Query(value)| value).map_err(map_query_rejection)
}

fn header_value(headers: &HeaderMap, name: impl header::AsHeaderName) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn client_ip(headers: &HeaderMap) -> Option<String> {
    header_value(headers, "x-forwarded-for").or_else(|| header_value(headers, "x-real-ip"))
}

fn geo_or_default(geo: Option<String>) -> String {
    geo.filter(|g| !g.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_GEO.to_string())
}

// ===== Service Handlers =====

/// Service banner
pub async fn banner() -> Json<BannerResponse> {
    Json(BannerResponse {
        name: SERVICE_NAME.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        endpoints: [
            "/health",
            "/api/search",
            "/api/analyze",
            "/api/trend",
            "/api/related",
            "/api/trending",
            "/api/sync",
            "/api/notify",
            "/api/notify/telegram",
            "/api/feedback",
            "/api/metrics",
            "/api/track",
            "/api/openapi.json",
        ]
        .iter()
        .map(|e| e.to_string())
        .collect(),
    })
}

/// Liveness probe
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
    })
}

// ===== Keyword research Handlers =====

/// Scored keyword suggestions
pub async fn search(
    service: Arc<Service>,
    payload: JsonBody<SearchRequest>,
) -> Result<Json<SearchResponse>, Problem> {
    let req = body(payload)?;
    let keyword = validation::require(req.keyword.as_deref(), validation::SEARCH_KEYWORD_REQUIRED)
        .map_err(map_domain_error)?;

    let keywords = service.search_keywords(keyword).map_err(map_domain_error)?;
    Ok(Json(SearchResponse {
        keywords: keywords.into_iter().map(Into::into).collect(),
        cached: false,
        timestamp: Utc::now(),
    }))
}

/// Keyword analysis text
pub async fn analyze(
    service: Arc<Service>,
    payload: JsonBody<AnalyzeRequest>,
) -> Result<Json<AnalyzeResponse>, Problem> {
    let req = body(payload)?;
    let keywords = req.keywords.unwrap_or_default();
    let preferences: AnalysisPreferences = req.preferences.unwrap_or_default().into();

    let analysis_text = service
        .analyze_keywords(&keywords, &preferences)
        .map_err(map_domain_error)?;
    Ok(Json(AnalyzeResponse {
        analysis_text,
        timestamp: Utc::now(),
    }))
}

/// Trend series of a keyword
pub async fn trend(
    service: Arc<Service>,
    params: QueryParams<TrendQuery>,
) -> Result<Json<TrendResponse>, Problem> {
    let q = query(params)?;
    let keyword = validation::require(q.keyword.as_deref(), validation::TREND_KEYWORD_REQUIRED)
        .map_err(map_domain_error)?;
    let time_range =
        validation::parse_time_range(q.time_range.as_deref()).map_err(map_domain_error)?;
    let geo = geo_or_default(q.geo);
    tracing::info!(keyword = %keyword, time_range = time_range.as_str(), geo = %geo, "Keyword trend request");

    let trend = service
        .keyword_trend(keyword, time_range, &geo)
        .map_err(map_domain_error)?;
    Ok(Json(trend.into()))
}

/// Related keywords
pub async fn related(
    service: Arc<Service>,
    params: QueryParams<RelatedQuery>,
) -> Result<Json<RelatedResponse>, Problem> {
    let q = query(params)?;
    let keyword = validation::require(q.keyword.as_deref(), validation::RELATED_KEYWORD_REQUIRED)
        .map_err(map_domain_error)?;
    let count = validation::parse_related_count(q.count.as_deref()).map_err(map_domain_error)?;
    let geo = geo_or_default(q.geo);

    let related_keywords = service
        .related_keywords(keyword, count)
        .map_err(map_domain_error)?;
    Ok(Json(RelatedResponse {
        keyword: keyword.to_string(),
        metadata: RelatedMetadataDto {
            count: related_keywords.len(),
            geo,
            timestamp: Utc::now(),
        },
        related_keywords,
    }))
}

/// Trending keywords
pub async fn trending(
    service: Arc<Service>,
    params: QueryParams<TrendingQuery>,
) -> Result<Json<TrendingResponse>, Problem> {
    let q = query(params)?;
    let category = validation::parse_category(q.category.as_deref()).map_err(map_domain_error)?;
    let count = validation::parse_trending_count(q.count.as_deref()).map_err(map_domain_error)?;

    let keywords = service.trending_keywords(category, count);
    Ok(Json(TrendingResponse {
        keywords: keywords.into_iter().map(Into::into).collect(),
        timestamp: Utc::now(),
        category: category.as_str().to_string(),
    }))
}

/// Export keyword rows to Google Sheets
pub async fn sync(
    service: Arc<Service>,
    payload: JsonBody<SyncRequest>,
) -> Result<Json<SyncResponse>, Problem> {
    let req = body(payload)?;
    let rows = req.keywords.unwrap_or_default();

    let spreadsheet_url = service.sync_keywords(&rows).await.map_err(map_domain_error)?;
    Ok(Json(SyncResponse {
        success: true,
        spreadsheet_url,
    }))
}

// ===== Telegram Handlers =====

/// Relay analysis text to the configured chat
pub async fn notify(
    service: Arc<Service>,
    payload: JsonBody<NotifyRequest>,
) -> Result<Json<NotifyResponse>, Problem> {
    let req = body(payload)?;
    let text = validation::require(req.analysis_text.as_deref(), validation::RELAY_TEXT_REQUIRED)
        .map_err(map_domain_error)?;
    let parse_mode = match req.parse_mode.as_deref() {
        None => None,
        Some(mode) => Some(validation::parse_parse_mode(Some(mode)).map_err(map_domain_error)?),
    };
    let relay = AnalysisRelay {
        text: text.to_string(),
        format: match req.format.as_deref() {
            Some(MARKDOWN_FORMAT) => RelayFormat::Markdown,
            _ => RelayFormat::Raw,
        },
        parse_mode,
        disable_preview: req.disable_preview,
    };

    let sent = service.relay_analysis(&relay).await.map_err(map_domain_error)?;
    let message_id = sent
        .first()
        .map(|m| m.message_id.to_string())
        .unwrap_or_default();
    Ok(Json(NotifyResponse {
        success: true,
        message_id,
        parts: sent.len(),
    }))
}

/// Keyword analysis notification
pub async fn notify_telegram(
    service: Arc<Service>,
    payload: JsonBody<TelegramNotifyRequest>,
) -> Result<Json<TelegramNotifyResponse>, Problem> {
    let req = body(payload)?;
    let notification: AnalysisNotification = (&req).into();

    let sent = service
        .notify_analysis(
            req.token.as_deref().unwrap_or_default(),
            req.chat_id.as_deref().unwrap_or_default(),
            &notification,
        )
        .await
        .map_err(map_domain_error)?;
    Ok(Json(TelegramNotifyResponse {
        success: true,
        message: NOTIFY_SENT.to_string(),
        details: sent.into(),
    }))
}

/// Keyword report from scored rows
pub async fn notify_report(
    service: Arc<Service>,
    payload: JsonBody<RagReportRequest>,
) -> Result<Json<RagReportResponse>, Problem> {
    let req = body(payload)?;
    let options: ReportOptions = (&req).into();
    let rows = req.keywords.unwrap_or_default();

    let delivery = service
        .send_report(
            req.token.as_deref().unwrap_or_default(),
            req.chat_id.as_deref().unwrap_or_default(),
            &rows,
            &options,
        )
        .await
        .map_err(map_domain_error)?;
    Ok(Json(RagReportResponse {
        success: true,
        message: REPORT_SENT.to_string(),
        keyword_count: delivery.keyword_count,
        template_type: delivery.template.as_str().to_string(),
        data: delivery.message.raw,
    }))
}

/// Same message to several chats
pub async fn notify_broadcast(
    service: Arc<Service>,
    payload: JsonBody<BroadcastRequest>,
) -> Result<Json<BroadcastResponse>, Problem> {
    let req = body(payload)?;
    let chat_ids = req.chat_ids.unwrap_or_default();

    let report = service
        .broadcast(
            req.token.as_deref().unwrap_or_default(),
            &chat_ids,
            req.message.as_deref(),
        )
        .await
        .map_err(map_domain_error)?;
    Ok(Json(BroadcastResponse {
        success: true,
        data: report.into(),
    }))
}

/// Connection test message
pub async fn notify_test(
    service: Arc<Service>,
    payload: JsonBody<TestMessageRequest>,
) -> Result<Json<TestMessageResponse>, Problem> {
    let req = body(payload)?;

    let sent = service
        .send_test_message(
            req.token.as_deref().unwrap_or_default(),
            req.chat_id.as_deref().unwrap_or_default(),
            req.message.as_deref(),
        )
        .await
        .map_err(map_domain_error)?;
    Ok(Json(TestMessageResponse {
        success: true,
        message: TEST_SENT.to_string(),
        data: sent.raw,
    }))
}

/// Chat id check
pub async fn notify_validate(
    service: Arc<Service>,
    payload: JsonBody<ValidateChatRequest>,
) -> Result<Json<ValidateChatResponse>, Problem> {
    let req = body(payload)?;

    let outcome = service
        .validate_chat(
            req.token.as_deref().unwrap_or_default(),
            req.chat_id.as_deref().unwrap_or_default(),
        )
        .await
        .map_err(map_domain_error)?;
    Ok(Json(ValidateChatResponse {
        success: true,
        valid: outcome.valid,
        message: outcome.message,
    }))
}

// ===== Feedback Handlers =====

/// Store user feedback
pub async fn feedback(
    service: Arc<Service>,
    headers: HeaderMap,
    payload: JsonBody<FeedbackRequest>,
) -> Result<Json<FeedbackResponse>, Problem> {
    let req = body(payload)?;
    let text = validation::require(req.text.as_deref(), validation::FEEDBACK_TEXT_REQUIRED)
        .map_err(map_domain_error)?
        .to_string();
    let rating = validation::validate_rating(req.rating).map_err(map_domain_error)?;

    let stored = service
        .submit_feedback(FeedbackSubmission {
            text,
            email: req.email,
            name: req.name,
            rating,
            category: req.category,
            page: req.page,
            ip: client_ip(&headers),
            user_agent: header_value(&headers, header::USER_AGENT),
        })
        .await
        .map_err(map_domain_error)?;
    Ok(Json(FeedbackResponse {
        success: true,
        message: FEEDBACK_STORED.to_string(),
        data: stored.into(),
    }))
}

// ===== Analytics Handlers =====

/// Web-vital measurement
pub async fn web_vital(
    service: Arc<Service>,
    payload: JsonBody<WebVitalRequest>,
) -> Result<(StatusCode, Json<AcceptedResponse>), Problem> {
    let req = body_or_invalid(payload, validation::INVALID_METRIC)?;
    let (Some(name), Some(value)) = (req.name, req.value) else {
        return Err(map_domain_error(
            KeywordPulseError::validation(validation::INVALID_METRIC),
        ));
    };

    service
        .record_web_vital(&WebVitalMetric {
            name,
            value,
            id: req.id,
            delta: req.delta,
            page: req.page,
            timestamp: req.timestamp,
        })
        .await
        .map_err(map_domain_error)?;
    Ok((StatusCode::ACCEPTED, Json(AcceptedResponse { success: true })))
}

/// Batch of API timings
pub async fn metric_batch(
    service: Arc<Service>,
    payload: JsonBody<MetricBatchRequest>,
) -> Result<(StatusCode, Json<MetricBatchResponse>), Problem> {
    let req = body_or_invalid(payload, validation::INVALID_METRIC_BATCH)?;
    let batch = MetricBatch {
        metrics: req
            .metrics
            .unwrap_or_default()
            .into_iter()
            .map(Into::into)
            .collect(),
        source: req.source.unwrap_or_else(|| "unknown".to_string()),
        timestamp: req.timestamp,
    };

    let report = service
        .record_metric_batch(&batch)
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(MetricBatchResponse {
            success: true,
            processed: report.processed,
            critical: report.critical,
            stats: report.stats.into_iter().map(Into::into).collect(),
        }),
    ))
}

/// Tracked user action
pub async fn track(
    service: Arc<Service>,
    headers: HeaderMap,
    payload: JsonBody<TrackRequest>,
) -> Result<(StatusCode, Json<TrackResponse>), Problem> {
    let req = body_or_invalid(payload, validation::INVALID_EVENT)?;
    let event_type = validation::parse_event_type(req.event_type.as_deref()).map_err(map_domain_error)?;
    let action = req
        .action
        .ok_or_else(|| map_domain_error(KeywordPulseError::validation(validation::INVALID_EVENT)))?;

    let event_id = service
        .track_event(&TrackEvent {
            event_type,
            action,
            properties: req.properties,
            path: req.path,
            timestamp: req.timestamp,
            user_agent: header_value(&headers, header::USER_AGENT),
            referer: header_value(&headers, header::REFERER),
            client_ip: client_ip(&headers),
        })
        .await
        .map_err(map_domain_error)?;
    Ok((
        StatusCode::ACCEPTED,
        Json(TrackResponse {
            success: true,
            event_id,
        }),
    ))
}

// ===== Auth Handlers =====

/// Email/password sign-in
pub async fn sign_in(
    service: Arc<Service>,
    payload: JsonBody<CredentialsRequest>,
) -> Result<Json<SignInResponse>, Problem> {
    let req = body(payload)?;
    let (email, password) =
        validation::validate_credentials(req.email.as_deref(), req.password.as_deref())
            .map_err(map_domain_error)?;

    let session = service
        .sign_in(email, password)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(session.into()))
}

/// Account registration
pub async fn sign_up(
    service: Arc<Service>,
    payload: JsonBody<CredentialsRequest>,
) -> Result<Json<SignUpResponse>, Problem> {
    let req = body(payload)?;
    let (email, password) =
        validation::validate_credentials(req.email.as_deref(), req.password.as_deref())
            .map_err(map_domain_error)?;

    let outcome = service
        .sign_up(email, password)
        .await
        .map_err(map_domain_error)?;
    Ok(Json(SignUpResponse {
        success: true,
        user: outcome.user.map(Into::into),
        message: outcome.message,
    }))
}

/// OAuth code exchange followed by a redirect
pub async fn auth_callback(
    service: Arc<Service>,
    params: QueryParams<AuthCallbackQuery>,
) -> Result<Redirect, Problem> {
    let q = query(params)?;
    let dev = q.dev.as_deref() == Some("true");

    let target = service
        .complete_auth_callback(q.code.as_deref(), q.code_verifier.as_deref(), dev)
        .await;
    Ok(Redirect::temporary(&target))
}

/// Signed-in user and profile
pub async fn profile(
    service: Arc<Service>,
    headers: HeaderMap,
) -> Result<Json<ProfileResponse>, Problem> {
    let token = header_value(&headers, header::AUTHORIZATION)
        .and_then(|v| v.strip_prefix("Bearer ").map(str::to_string));

    let profile = service
        .profile(token.as_deref())
        .await
        .map_err(map_domain_error)?;
    Ok(Json(profile.into()))
}
