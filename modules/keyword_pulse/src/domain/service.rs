//! Domain service - business logic orchestration

use super::analytics::{self, AnalyticsEvent, AnalyticsPublisher};
use super::formatting::{self, DEFAULT_BROADCAST_MESSAGE, SPLIT_PART_CHARS};
use super::repository::{
    AuthProvider, FeedbackRepository, ProfileRepository, SheetsExporter, TelegramGateway,
};
use super::validation::{self, require};
use super::{analysis, scoring, trends};
use crate::config::Config;
use crate::contract::{
    AnalysisNotification, AnalysisPreferences, AnalysisRelay, AuthSession, BatchReport,
    BroadcastReport, ChatValidation, EventType, Feedback, FeedbackSubmission, KeywordMetrics,
    KeywordPulseError, KeywordTrend, MetricBatch, NewFeedback, ParseMode, RelayFormat,
    ReportDelivery, ReportOptions, ScoredKeyword, SentMessage, SignUpOutcome, TelegramMessage,
    TimeRange, TrackEvent, TrendCategory, TrendingKeyword, UpstreamError, UserProfile,
    WebVitalMetric,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use uuid::Uuid;

const TELEGRAM_ENV: &str = "TELEGRAM_BOT_TOKEN 또는 TELEGRAM_CHAT_ID";
const SUPABASE_ENV: &str = "NEXT_PUBLIC_SUPABASE_URL 또는 NEXT_PUBLIC_SUPABASE_ANON_KEY";
const GOOGLE_ENV: &str = "GOOGLE_SERVICE_ACCOUNT";
const SIGNUP_MESSAGE: &str =
    "회원가입이 완료되었습니다! 이메일을 확인하여 계정을 활성화한 후 로그인해주세요.";
const INVALID_ACCESS_TOKEN: &str = "유효하지 않은 인증 토큰입니다.";
const DEFAULT_FEEDBACK_CATEGORY: &str = "일반";
const LCP: &str = "LCP";

/// Redirect targets of the OAuth callback
pub const REDIRECT_HOME: &str = "/";
pub const REDIRECT_DEV_LOGIN: &str = "/dev-login";
pub const REDIRECT_NO_CODE: &str = "/login?error=no_code";
pub const REDIRECT_INVALID_CONFIG: &str = "/login?error=invalid_supabase_config";

/// External systems the service talks to
#[derive(Clone)]
pub struct Ports {
    pub telegram: Arc<dyn TelegramGateway>,
    pub feedback: Arc<dyn FeedbackRepository>,
    pub auth: Arc<dyn AuthProvider>,
    pub profiles: Arc<dyn ProfileRepository>,
    pub sheets: Arc<dyn SheetsExporter>,
    pub analytics: Arc<dyn AnalyticsPublisher>,
}

/// Domain service for keyword research, notifications, feedback and analytics
pub struct Service {
    config: Config,
    telegram: Arc<dyn TelegramGateway>,
    feedback: Arc<dyn FeedbackRepository>,
    auth: Arc<dyn AuthProvider>,
    profiles: Arc<dyn ProfileRepository>,
    sheets: Arc<dyn SheetsExporter>,
    analytics: Arc<dyn AnalyticsPublisher>,
}

impl Service {
    /// Create a new service instance
    pub fn new(config: Config, ports: Ports) -> Self {
        Self {
            config,
            telegram: ports.telegram,
            feedback: ports.feedback,
            auth: ports.auth,
            profiles: ports.profiles,
            sheets: ports.sheets,
            analytics: ports.analytics,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    // ===== Keyword research =====

    /// Scored keyword suggestions for a search term
    pub fn search_keywords(&self, keyword: &str) -> Result<Vec<KeywordMetrics>, KeywordPulseError> {
        let keyword = require(Some(keyword), validation::SEARCH_KEYWORD_REQUIRED)?;
        let keywords = scoring::generate_keywords(keyword, &mut rand::rng());
        tracing::info!(keyword = %keyword, results = keywords.len(), "Keyword search");
        Ok(keywords)
    }

    /// Markdown analysis of a keyword list
    pub fn analyze_keywords(
        &self,
        keywords: &[String],
        preferences: &AnalysisPreferences,
    ) -> Result<String, KeywordPulseError> {
        if keywords.is_empty() {
            return Err(KeywordPulseError::validation(
                validation::ANALYZE_KEYWORDS_REQUIRED,
            ));
        }
        tracing::info!(count = keywords.len(), "Keyword analysis");
        Ok(analysis::generate_keyword_analysis(keywords, preferences))
    }

    /// Keyword report rendered as Telegram HTML
    pub fn render_report(&self, keywords: &[ScoredKeyword], options: &ReportOptions) -> String {
        formatting::wrap_report(&analysis::generate_report(keywords, options))
    }

    /// Synthetic trend series
    pub fn keyword_trend(
        &self,
        keyword: &str,
        time_range: TimeRange,
        geo: &str,
    ) -> Result<KeywordTrend, KeywordPulseError> {
        let keyword = require(Some(keyword), validation::TREND_KEYWORD_REQUIRED)?;
        let now = Utc::now();
        let points = trends::keyword_trend(keyword, time_range, now, &mut rand::rng());
        Ok(KeywordTrend {
            keyword: keyword.to_string(),
            time_range,
            geo: geo.to_string(),
            points,
            generated_at: now,
        })
    }

    /// Related keywords, at most 50
    pub fn related_keywords(&self, keyword: &str, count: usize) -> Result<Vec<String>, KeywordPulseError> {
        let keyword = require(Some(keyword), validation::RELATED_KEYWORD_REQUIRED)?;
        let count = validation::validate_related_count(count as i64)?;
        Ok(trends::related_keywords(keyword, count))
    }

    /// Currently trending keywords of a category
    pub fn trending_keywords(&self, category: TrendCategory, count: usize) -> Vec<TrendingKeyword> {
        trends::trending_keywords(category, count)
    }

    /// Export keyword rows to the configured spreadsheet
    pub async fn sync_keywords(&self, rows: &[serde_json::Value]) -> Result<String, KeywordPulseError> {
        if rows.is_empty() {
            return Err(KeywordPulseError::validation(
                validation::SYNC_KEYWORDS_REQUIRED,
            ));
        }
        if self
            .config
            .google
            .service_account
            .as_deref()
            .is_none_or(str::is_empty)
        {
            return Err(KeywordPulseError::not_configured(GOOGLE_ENV));
        }

        let url = self
            .sheets
            .export(&self.config.google.spreadsheet_id, rows)
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Spreadsheet export failed");
                KeywordPulseError::upstream(
                    "sheets",
                    format!("Google Sheets 저장 중 오류가 발생했습니다: {}", e),
                )
            })?;
        tracing::info!(rows = rows.len(), "Keywords exported");
        Ok(url)
    }

    // ===== Telegram =====

    /// Relay analysis text to the configured chat, split into parts when long
    pub async fn relay_analysis(
        &self,
        relay: &AnalysisRelay,
    ) -> Result<Vec<SentMessage>, KeywordPulseError> {
        if relay.text.trim().is_empty() {
            return Err(KeywordPulseError::validation(validation::RELAY_TEXT_REQUIRED));
        }
        let telegram = &self.config.telegram;
        let (token, chat_id) = match (
            telegram.bot_token.as_deref().filter(|t| !t.is_empty()),
            telegram.chat_id.as_deref().filter(|c| !c.is_empty()),
        ) {
            (Some(token), Some(chat_id)) => (token, chat_id),
            _ => return Err(KeywordPulseError::not_configured(TELEGRAM_ENV)),
        };

        let (text, parse_mode) = match relay.format {
            RelayFormat::Markdown => (
                formatting::markdown_to_html(&formatting::escape_html(&relay.text)),
                ParseMode::Html,
            ),
            RelayFormat::Raw => (relay.text.clone(), relay.parse_mode.unwrap_or_default()),
        };

        let parts = formatting::split_message(&text, SPLIT_PART_CHARS);
        let delay = Duration::from_millis(telegram.part_delay_ms);
        let mut sent = Vec::with_capacity(parts.len());
        for (index, part) in parts.into_iter().enumerate() {
            if index > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            let message = TelegramMessage {
                chat_id: chat_id.to_string(),
                text: part,
                parse_mode,
                disable_web_page_preview: relay.disable_preview,
                disable_notification: false,
            };
            sent.push(
                self.deliver(token, message)
                    .await
                    .map_err(telegram_failure)?,
            );
        }
        tracing::info!(parts = sent.len(), "Analysis relayed to Telegram");
        Ok(sent)
    }

    /// Keyword analysis notification to an explicit chat
    pub async fn notify_analysis(
        &self,
        token: &str,
        chat_id: &str,
        notification: &AnalysisNotification,
    ) -> Result<SentMessage, KeywordPulseError> {
        let token = require(Some(token), validation::NOTIFY_CREDENTIALS_REQUIRED)?;
        let chat_id = require(Some(chat_id), validation::NOTIFY_CREDENTIALS_REQUIRED)?;

        let custom = notification
            .custom_message
            .as_deref()
            .filter(|m| !m.trim().is_empty());
        let keyword = notification
            .keyword
            .as_deref()
            .filter(|k| !k.trim().is_empty());
        let text = match (custom, keyword) {
            (Some(message), _) => message.to_string(),
            (None, Some(keyword)) => formatting::format_analysis_notification(
                keyword,
                notification.score,
                &notification.trends,
            ),
            (None, None) => {
                return Err(KeywordPulseError::validation(
                    validation::NOTIFY_CONTENT_REQUIRED,
                ))
            }
        };

        self.deliver(token, TelegramMessage::html(chat_id, text).without_preview())
            .await
            .map_err(telegram_failure)
    }

    /// Build a keyword report from raw rows and send it
    pub async fn send_report(
        &self,
        token: &str,
        chat_id: &str,
        rows: &[serde_json::Value],
        options: &ReportOptions,
    ) -> Result<ReportDelivery, KeywordPulseError> {
        let token = require(Some(token), validation::BOT_TOKEN_REQUIRED)?;
        let chat_id = require(Some(chat_id), validation::CHAT_ID_REQUIRED)?;
        if rows.is_empty() {
            return Err(KeywordPulseError::validation(
                validation::REPORT_KEYWORDS_REQUIRED,
            ));
        }
        let keywords = validation::scored_keywords(rows);
        if keywords.is_empty() {
            return Err(KeywordPulseError::validation(
                validation::REPORT_KEYWORDS_INVALID,
            ));
        }

        let text = self.render_report(&keywords, options);
        let message = self
            .deliver(token, TelegramMessage::html(chat_id, text).without_preview())
            .await
            .map_err(telegram_failure)?;
        tracing::info!(
            keywords = keywords.len(),
            template = options.template.as_str(),
            "Keyword report sent"
        );
        Ok(ReportDelivery {
            message,
            keyword_count: keywords.len(),
            template: options.template,
        })
    }

    /// Send one message to several chats concurrently
    pub async fn broadcast(
        &self,
        token: &str,
        chat_ids: &[String],
        message: Option<&str>,
    ) -> Result<BroadcastReport, KeywordPulseError> {
        let token = require(Some(token), validation::BOT_TOKEN_REQUIRED)?;
        let mut targets: Vec<&str> = Vec::new();
        for chat_id in chat_ids.iter().map(|c| c.trim()).filter(|c| !c.is_empty()) {
            if !targets.contains(&chat_id) {
                targets.push(chat_id);
            }
        }
        if targets.is_empty() {
            return Err(KeywordPulseError::validation(validation::CHAT_IDS_REQUIRED));
        }

        let text = message
            .filter(|m| !m.trim().is_empty())
            .unwrap_or(DEFAULT_BROADCAST_MESSAGE);
        let sends = targets.iter().map(|chat_id| async move {
            let result = self
                .deliver(token, TelegramMessage::html(*chat_id, text))
                .await;
            (chat_id.to_string(), result)
        });

        let mut report = BroadcastReport {
            total: targets.len(),
            ..Default::default()
        };
        for (chat_id, result) in futures::future::join_all(sends).await {
            match result {
                Ok(sent) => {
                    report.results.insert(chat_id, sent);
                }
                Err(e) => {
                    tracing::warn!(chat_id = %chat_id, error = %e, "Broadcast delivery failed");
                    report.errors.insert(chat_id, telegram_failure(e).user_message());
                }
            }
        }
        tracing::info!(
            total = report.total,
            succeeded = report.succeeded(),
            failed = report.failed(),
            "Broadcast finished"
        );
        Ok(report)
    }

    /// Connection test message
    pub async fn send_test_message(
        &self,
        token: &str,
        chat_id: &str,
        message: Option<&str>,
    ) -> Result<SentMessage, KeywordPulseError> {
        let token = require(Some(token), validation::TEST_CREDENTIALS_REQUIRED)?;
        let chat_id = require(Some(chat_id), validation::TEST_CREDENTIALS_REQUIRED)?;
        let text = match message.filter(|m| !m.trim().is_empty()) {
            Some(message) => message.to_string(),
            None => formatting::default_test_message(Utc::now()),
        };

        self.deliver(token, TelegramMessage::html(chat_id, text))
            .await
            .map_err(|e| match e {
                UpstreamError::Api { status, .. } => KeywordPulseError::upstream(
                    "telegram",
                    formatting::telegram_error_message(status),
                ),
                other => telegram_failure(other),
            })
    }

    /// Check the format of a chat id and whether the bot can see the chat
    pub async fn validate_chat(
        &self,
        token: &str,
        chat_id: &str,
    ) -> Result<ChatValidation, KeywordPulseError> {
        let token = require(Some(token), validation::BOT_TOKEN_REQUIRED)?;
        let chat_id = require(Some(chat_id), validation::VALIDATE_CHAT_ID_REQUIRED)?;
        if !formatting::is_valid_chat_id(chat_id) {
            return Ok(ChatValidation {
                valid: false,
                message: validation::INVALID_CHAT_ID_FORMAT.to_string(),
            });
        }

        match self.telegram.get_chat(token, chat_id).await {
            Ok(chat) => Ok(ChatValidation {
                valid: true,
                message: format!(
                    "유효한 채팅 ID입니다. 채팅 유형: {}",
                    formatting::chat_type_label(&chat.chat_type)
                ),
            }),
            Err(UpstreamError::Api { message, .. }) => Ok(ChatValidation {
                valid: false,
                message: format!("채팅 ID 검증 실패: {}", message),
            }),
            Err(e) => Err(telegram_failure(e)),
        }
    }

    // ===== Feedback =====

    /// Store feedback and alert the admin chat
    pub async fn submit_feedback(
        &self,
        submission: FeedbackSubmission,
    ) -> Result<Feedback, KeywordPulseError> {
        let text = require(Some(submission.text.as_str()), validation::FEEDBACK_TEXT_REQUIRED)?.to_string();
        if let Some(rating) = submission.rating {
            validation::validate_rating(Some(i64::from(rating)))?;
        }
        if !self.config.supabase.is_configured() {
            return Err(KeywordPulseError::not_configured(SUPABASE_ENV));
        }

        let new_feedback = NewFeedback {
            text,
            email: non_blank(submission.email),
            name: non_blank(submission.name),
            rating: submission.rating,
            category: non_blank(submission.category)
                .unwrap_or_else(|| DEFAULT_FEEDBACK_CATEGORY.to_string()),
            page: non_blank(submission.page),
            ip: submission.ip,
            user_agent: submission.user_agent,
            created_at: Utc::now(),
        };

        let stored = self.feedback.insert(&new_feedback).await.map_err(|e| {
            tracing::error!(error = %e, "Failed to store feedback");
            KeywordPulseError::upstream(
                "supabase",
                format!("피드백 저장 중 오류가 발생했습니다: {}", e),
            )
        })?;
        tracing::info!(category = %stored.category, "Feedback stored");

        self.alert_feedback(&new_feedback).await;
        Ok(stored)
    }

    async fn alert_feedback(&self, feedback: &NewFeedback) {
        let telegram = &self.config.telegram;
        let (Some(token), Some(chat_id)) = (
            telegram.bot_token.as_deref().filter(|t| !t.is_empty()),
            telegram.alert_chat_id(),
        ) else {
            tracing::debug!("Feedback alert skipped: Telegram is not configured");
            return;
        };

        let message =
            TelegramMessage::html(chat_id, formatting::format_feedback_alert(feedback)).without_preview();
        if let Err(e) = self.deliver(token, message).await {
            tracing::warn!(error = %e, "Failed to send feedback alert");
        }
    }

    // ===== Analytics =====

    /// Accept a web-vital measurement
    pub async fn record_web_vital(&self, metric: &WebVitalMetric) -> Result<(), KeywordPulseError> {
        if metric.name.trim().is_empty() || !metric.value.is_finite() {
            return Err(KeywordPulseError::validation(validation::INVALID_METRIC));
        }
        let degraded = metric.name == LCP && metric.value > self.config.analytics.lcp_threshold_ms;
        tracing::info!(
            name = %metric.name,
            value = metric.value,
            page = metric.page.as_deref().unwrap_or("-"),
            "Web vital"
        );
        if degraded {
            tracing::warn!(
                value = metric.value,
                threshold = self.config.analytics.lcp_threshold_ms,
                page = metric.page.as_deref().unwrap_or("-"),
                "Slow LCP"
            );
        }

        self.publish(AnalyticsEvent::web_vital(metric, degraded, Utc::now()))
            .await;
        Ok(())
    }

    /// Accept a batch of API timings and aggregate it per endpoint
    pub async fn record_metric_batch(
        &self,
        batch: &MetricBatch,
    ) -> Result<BatchReport, KeywordPulseError> {
        if batch.metrics.is_empty() {
            return Err(KeywordPulseError::validation(
                validation::INVALID_METRIC_BATCH,
            ));
        }

        let critical = analytics::critical_metrics(&batch.metrics, self.config.analytics.slow_metric_ms);
        for metric in &critical {
            tracing::warn!(
                name = %metric.name,
                duration = metric.duration,
                success = metric.success,
                "Critical API metric"
            );
        }
        let stats = analytics::aggregate_endpoints(&batch.metrics);
        for endpoint in &stats {
            tracing::info!(
                endpoint = %endpoint.endpoint,
                requests = endpoint.request_count,
                avg_duration = endpoint.avg_duration,
                error_rate = endpoint.error_rate,
                max_duration = endpoint.max_duration,
                "API endpoint stats"
            );
        }

        let report = BatchReport {
            processed: batch.metrics.len(),
            critical: critical.len(),
            stats,
        };
        self.publish(AnalyticsEvent::api_metrics(
            &batch.source,
            report.processed,
            report.critical,
            &report.stats,
            Utc::now(),
        ))
        .await;
        Ok(report)
    }

    /// Accept a tracked user action and return its event id
    pub async fn track_event(&self, event: &TrackEvent) -> Result<Uuid, KeywordPulseError> {
        require(Some(event.action.as_str()), validation::INVALID_EVENT)?;

        let recorded = AnalyticsEvent::user_action(event, Utc::now());
        let event_id = recorded.event_id();
        tracing::info!(
            event_id = %event_id,
            event_type = event.event_type.as_str(),
            action = %event.action,
            path = event.path.as_deref().unwrap_or("-"),
            "User event"
        );
        match event.event_type {
            EventType::Conversion => {
                tracing::info!(action = %event.action, properties = ?event.properties, "Conversion")
            }
            EventType::Search => {
                tracing::info!(action = %event.action, properties = ?event.properties, "Search activity")
            }
            _ => {}
        }

        self.publish(recorded).await;
        Ok(event_id)
    }

    async fn publish(&self, event: AnalyticsEvent) {
        if let Err(e) = self.analytics.publish(event).await {
            tracing::warn!(error = %e, "Failed to publish analytics event");
        }
    }

    // ===== Auth =====

    /// Email/password sign-in
    pub async fn sign_in(&self, email: &str, password: &str) -> Result<AuthSession, KeywordPulseError> {
        let (email, password) = validation::validate_credentials(Some(email), Some(password))?;
        self.ensure_supabase()?;

        let session = self
            .auth
            .sign_in_with_password(email, password)
            .await
            .map_err(auth_failure)?;
        tracing::info!(user_id = %session.user.id, "User signed in");
        Ok(session)
    }

    /// Register a new account
    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUpOutcome, KeywordPulseError> {
        let (email, password) = validation::validate_credentials(Some(email), Some(password))?;
        validation::validate_new_password(password)?;
        self.ensure_supabase()?;

        let user = self.auth.sign_up(email, password).await.map_err(|e| match e {
            UpstreamError::Api { status, message } if (400..500).contains(&status) => {
                KeywordPulseError::validation(message)
            }
            other => supabase_failure(other),
        })?;
        tracing::info!(confirmed = user.is_some(), "User signed up");
        Ok(SignUpOutcome {
            user,
            message: SIGNUP_MESSAGE.to_string(),
        })
    }

    /// Redirect target of the OAuth callback
    pub async fn complete_auth_callback(
        &self,
        code: Option<&str>,
        code_verifier: Option<&str>,
        dev: bool,
    ) -> String {
        if dev {
            return REDIRECT_DEV_LOGIN.to_string();
        }
        let Some(code) = code.filter(|c| !c.is_empty()) else {
            return REDIRECT_NO_CODE.to_string();
        };
        if !self.config.supabase.is_configured() {
            tracing::warn!("Auth callback received but Supabase is not configured");
            return REDIRECT_INVALID_CONFIG.to_string();
        }

        match self.auth.exchange_code(code, code_verifier).await {
            Ok(session) => {
                tracing::info!(user_id = %session.user.id, "Auth code exchanged");
                REDIRECT_HOME.to_string()
            }
            Err(e) => {
                tracing::warn!(error = %e, "Auth code exchange failed");
                let message = match e {
                    UpstreamError::Api { message, .. } => message,
                    other => other.to_string(),
                };
                format!("/login?error={}", urlencoding::encode(&message))
            }
        }
    }

    /// Authenticated user and their profile row
    pub async fn profile(&self, access_token: Option<&str>) -> Result<UserProfile, KeywordPulseError> {
        let token = access_token
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or_else(|| KeywordPulseError::unauthorized(validation::LOGIN_REQUIRED))?;
        self.ensure_supabase()?;

        let user = self.auth.get_user(token).await.map_err(|e| match e {
            UpstreamError::Api { status: 401 | 403, .. } => {
                KeywordPulseError::unauthorized(INVALID_ACCESS_TOKEN)
            }
            other => supabase_failure(other),
        })?;
        let profile = self
            .profiles
            .find_profile(&user.id, token)
            .await
            .map_err(supabase_failure)?;
        Ok(UserProfile { user, profile })
    }

    fn ensure_supabase(&self) -> Result<(), KeywordPulseError> {
        if self.config.supabase.is_configured() {
            Ok(())
        } else {
            Err(KeywordPulseError::not_configured(SUPABASE_ENV))
        }
    }

    /// Send through the gateway, truncating text above the Bot API limit
    async fn deliver(
        &self,
        token: &str,
        mut message: TelegramMessage,
    ) -> Result<SentMessage, UpstreamError> {
        message.text = formatting::truncate_message(&message.text);
        self.telegram.send_message(token, &message).await
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn telegram_failure(err: UpstreamError) -> KeywordPulseError {
    match err {
        UpstreamError::Api { status, message } => KeywordPulseError::upstream(
            "telegram",
            format!("텔레그램 API 오류: {} ({})", message, status),
        ),
        other => KeywordPulseError::upstream(
            "telegram",
            format!("텔레그램 API 호출 중 오류가 발생했습니다: {}", other),
        ),
    }
}

fn supabase_failure(err: UpstreamError) -> KeywordPulseError {
    tracing::error!(error = %err, "Supabase request failed");
    KeywordPulseError::upstream(
        "supabase",
        format!("Supabase 요청 중 오류가 발생했습니다: {}", err),
    )
}

fn auth_failure(err: UpstreamError) -> KeywordPulseError {
    match err {
        UpstreamError::Api { status, message } if matches!(status, 400 | 401 | 422) => {
            KeywordPulseError::unauthorized(message)
        }
        other => supabase_failure(other),
    }
}
