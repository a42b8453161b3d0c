//! Mapper implementations for converting between DTOs and contract models
//!
//! This module contains all From/Into implementations for bidirectional
//! conversion between REST DTOs and transport-agnostic contract models.

use super::dto::*;
use crate::contract;
use crate::domain::validation;

// ===== Keyword research conversions =====

impl From<contract::KeywordMetrics> for KeywordMetricsDto {
    fn from(metrics: contract::KeywordMetrics) -> Self {
        Self {
            keyword: metrics.keyword,
            monthly_searches: metrics.monthly_searches,
            competition_rate: metrics.competition_rate,
            score: metrics.score,
            recommendation: metrics.recommendation.label().to_string(),
        }
    }
}

impl From<contract::TrendPoint> for TrendPointDto {
    fn from(point: contract::TrendPoint) -> Self {
        Self {
            date: point.date,
            value: point.value,
        }
    }
}

impl From<contract::KeywordTrend> for TrendResponse {
    fn from(trend: contract::KeywordTrend) -> Self {
        let trend_data: Vec<TrendPointDto> = trend.points.into_iter().map(Into::into).collect();
        Self {
            keyword: trend.keyword,
            metadata: TrendMetadataDto {
                time_range: trend.time_range.as_str().to_string(),
                data_points_count: trend_data.len(),
                geo: trend.geo,
                timestamp: trend.generated_at,
            },
            trend_data,
        }
    }
}

impl From<contract::TrendingKeyword> for TrendingKeywordDto {
    fn from(keyword: contract::TrendingKeyword) -> Self {
        Self {
            keyword: keyword.keyword,
            count: keyword.count,
            change: keyword.change,
        }
    }
}

impl From<AnalysisPreferencesDto> for contract::AnalysisPreferences {
    fn from(dto: AnalysisPreferencesDto) -> Self {
        Self {
            language: validation::parse_language(dto.language.as_deref()),
            industry: dto.industry.filter(|i| !i.trim().is_empty()),
            insight_count: dto.insight_count,
            strategy_count: dto.strategy_count,
        }
    }
}

// ===== Telegram conversions =====

impl From<TrendChangeDto> for contract::TrendChange {
    fn from(dto: TrendChangeDto) -> Self {
        Self {
            period: dto.period,
            change: dto.change,
        }
    }
}

impl From<&TelegramNotifyRequest> for contract::AnalysisNotification {
    fn from(req: &TelegramNotifyRequest) -> Self {
        Self {
            keyword: req.keyword.clone(),
            score: req.score.unwrap_or_default(),
            trends: req
                .trends
                .clone()
                .unwrap_or_default()
                .into_iter()
                .map(Into::into)
                .collect(),
            custom_message: req.custom_message.clone(),
        }
    }
}

impl From<&RagReportRequest> for contract::ReportOptions {
    fn from(req: &RagReportRequest) -> Self {
        let defaults = contract::ReportOptions::default();
        Self {
            template: validation::parse_template(
                req.template_type.as_deref(),
                contract::ReportTemplate::Detailed,
            ),
            max_keywords: req.max_keywords.unwrap_or(defaults.max_keywords),
            score_threshold: req.score_threshold.unwrap_or(defaults.score_threshold),
            include_stats: req.include_stats.unwrap_or(defaults.include_stats),
        }
    }
}

impl From<contract::SentMessage> for MessageDetailsDto {
    fn from(sent: contract::SentMessage) -> Self {
        Self {
            message_id: sent.message_id,
            date: sent.date,
        }
    }
}

impl From<contract::BroadcastReport> for BroadcastDataDto {
    fn from(report: contract::BroadcastReport) -> Self {
        let summary = BroadcastSummaryDto {
            total: report.total,
            success: report.succeeded(),
            failed: report.failed(),
        };
        Self {
            results: report
                .results
                .into_iter()
                .map(|(chat_id, sent)| (chat_id, sent.raw))
                .collect(),
            errors: report.errors,
            summary,
        }
    }
}

// ===== Feedback conversions =====

impl From<contract::Feedback> for FeedbackDto {
    fn from(feedback: contract::Feedback) -> Self {
        Self {
            id: feedback.id,
            text: feedback.text,
            email: feedback.email,
            name: feedback.name,
            rating: feedback.rating,
            category: feedback.category,
            page: feedback.page,
            created_at: feedback.created_at,
        }
    }
}

// ===== Analytics conversions =====

impl From<ApiMetricDto> for contract::ApiMetric {
    fn from(dto: ApiMetricDto) -> Self {
        Self {
            name: dto.name,
            duration: dto.duration,
            timestamp: dto.timestamp,
            success: dto.success,
            metadata: dto.metadata,
        }
    }
}

impl From<contract::EndpointStats> for EndpointStatsDto {
    fn from(stats: contract::EndpointStats) -> Self {
        Self {
            endpoint: stats.endpoint,
            request_count: stats.request_count,
            avg_duration: stats.avg_duration,
            error_rate: stats.error_rate,
            max_duration: stats.max_duration,
        }
    }
}

// ===== Auth conversions =====

impl From<contract::AuthUser> for AuthUserDto {
    fn from(user: contract::AuthUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

impl From<contract::AuthSession> for SignInResponse {
    fn from(session: contract::AuthSession) -> Self {
        Self {
            success: true,
            user: session.user.into(),
            session: SessionDto {
                access_token: session.access_token,
                refresh_token: session.refresh_token,
                expires_in: session.expires_in,
            },
        }
    }
}

impl From<contract::UserProfile> for ProfileResponse {
    fn from(profile: contract::UserProfile) -> Self {
        Self {
            user: profile.user.into(),
            profile: profile.profile,
        }
    }
}
