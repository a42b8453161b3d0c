//! Analytics events and metric aggregation
//!
//! Accepted web vitals, API metric batches and user actions are turned into
//! `AnalyticsEvent`s and handed to an `AnalyticsPublisher`. The default publisher
//! writes one structured `tracing` event per record.

use crate::contract::{ApiMetric, EndpointStats, TrackEvent, WebVitalMetric};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::net::IpAddr;
use uuid::Uuid;

/// Analytics event types
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// Browser web-vital measurement
    WebVital(WebVitalRecorded),
    /// Batch of API timings
    ApiMetrics(ApiMetricsRecorded),
    /// Tracked user action
    UserAction(UserActionTracked),
}

impl AnalyticsEvent {
    pub fn event_id(&self) -> Uuid {
        match self {
            Self::WebVital(e) => e.event_id,
            Self::ApiMetrics(e) => e.event_id,
            Self::UserAction(e) => e.event_id,
        }
    }
}

/// Event data for a web vital
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WebVitalRecorded {
    pub event_id: Uuid,
    pub name: String,
    pub value: f64,
    pub page: Option<String>,
    /// Reported timestamp (ms since epoch), or receive time
    pub timestamp: i64,
    /// Value is above the configured alert threshold
    pub degraded: bool,
}

/// Event data for an API metric batch
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiMetricsRecorded {
    pub event_id: Uuid,
    pub source: String,
    pub processed: usize,
    pub critical: usize,
    pub stats: Vec<EndpointStatsRecord>,
    pub timestamp: DateTime<Utc>,
}

/// Serializable per-endpoint numbers
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EndpointStatsRecord {
    pub endpoint: String,
    pub request_count: usize,
    pub avg_duration: f64,
    pub error_rate: f64,
    pub max_duration: f64,
}

impl From<&EndpointStats> for EndpointStatsRecord {
    fn from(stats: &EndpointStats) -> Self {
        Self {
            endpoint: stats.endpoint.clone(),
            request_count: stats.request_count,
            avg_duration: stats.avg_duration,
            error_rate: stats.error_rate,
            max_duration: stats.max_duration,
        }
    }
}

/// Event data for a tracked user action
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserActionTracked {
    pub event_id: Uuid,
    pub event_type: String,
    pub action: String,
    pub path: Option<String>,
    pub properties: Option<serde_json::Value>,
    pub client_timestamp: Option<String>,
    pub user_agent: Option<String>,
    pub referer: Option<String>,
    pub anonymized_ip: String,
    pub timestamp: DateTime<Utc>,
}

impl AnalyticsEvent {
    pub fn web_vital(metric: &WebVitalMetric, degraded: bool, now: DateTime<Utc>) -> Self {
        Self::WebVital(WebVitalRecorded {
            event_id: Uuid::new_v4(),
            name: metric.name.clone(),
            value: metric.value,
            page: metric.page.clone(),
            timestamp: metric.timestamp.unwrap_or_else(|| now.timestamp_millis()),
            degraded,
        })
    }

    pub fn api_metrics(
        source: &str,
        processed: usize,
        critical: usize,
        stats: &[EndpointStats],
        now: DateTime<Utc>,
    ) -> Self {
        Self::ApiMetrics(ApiMetricsRecorded {
            event_id: Uuid::new_v4(),
            source: source.to_string(),
            processed,
            critical,
            stats: stats.iter().map(EndpointStatsRecord::from).collect(),
            timestamp: now,
        })
    }

    pub fn user_action(event: &TrackEvent, now: DateTime<Utc>) -> Self {
        Self::UserAction(UserActionTracked {
            event_id: Uuid::new_v4(),
            event_type: event.event_type.as_str().to_string(),
            action: event.action.clone(),
            path: event.path.clone(),
            properties: event.properties.clone(),
            client_timestamp: event.timestamp.clone(),
            user_agent: event.user_agent.clone(),
            referer: event.referer.clone(),
            anonymized_ip: anonymize_ip(event.client_ip.as_deref()),
            timestamp: now,
        })
    }
}

/// Analytics publisher trait
///
/// Implementations forward events to a log pipeline, a queue or a warehouse.
#[async_trait::async_trait]
pub trait AnalyticsPublisher: Send + Sync {
    /// Publish one analytics event
    async fn publish(&self, event: AnalyticsEvent) -> anyhow::Result<()>;
}

/// Publisher that writes every event as a structured tracing record
pub struct TracingAnalyticsPublisher;

#[async_trait::async_trait]
impl AnalyticsPublisher for TracingAnalyticsPublisher {
    async fn publish(&self, event: AnalyticsEvent) -> anyhow::Result<()> {
        let payload = serde_json::to_string(&event)?;
        tracing::info!(
            target: "keyword_pulse::analytics",
            event_id = %event.event_id(),
            payload = %payload,
            "Analytics event"
        );
        Ok(())
    }
}

/// Endpoint path derived from a metric name: first `api_` removed, `_` becomes `/`
pub fn endpoint_name(metric_name: &str) -> String {
    metric_name.replacen("api_", "", 1).replace('_', "/")
}

/// Failed or slow metrics
pub fn critical_metrics(metrics: &[ApiMetric], slow_ms: f64) -> Vec<&ApiMetric> {
    metrics
        .iter()
        .filter(|m| !m.success || m.duration > slow_ms)
        .collect()
}

/// Per-endpoint aggregation in order of first appearance
pub fn aggregate_endpoints(metrics: &[ApiMetric]) -> Vec<EndpointStats> {
    struct Acc {
        endpoint: String,
        count: usize,
        total: f64,
        errors: usize,
        max: f64,
    }

    let mut accs: Vec<Acc> = Vec::new();
    for metric in metrics {
        let endpoint = endpoint_name(&metric.name);
        let idx = match accs.iter().position(|a| a.endpoint == endpoint) {
            Some(idx) => idx,
            None => {
                accs.push(Acc {
                    endpoint,
                    count: 0,
                    total: 0.0,
                    errors: 0,
                    max: 0.0,
                });
                accs.len() - 1
            }
        };
        let acc = &mut accs[idx];
        acc.count += 1;
        acc.total += metric.duration;
        if !metric.success {
            acc.errors += 1;
        }
        acc.max = acc.max.max(metric.duration);
    }

    accs.into_iter()
        .map(|a| EndpointStats {
            endpoint: a.endpoint,
            request_count: a.count,
            avg_duration: (a.total / a.count as f64).round(),
            error_rate: a.errors as f64 / a.count as f64,
            max_duration: a.max,
        })
        .collect()
}

/// Drop the host part of a client address
///
/// IPv4 keeps three octets (`a.b.c.0`), IPv6 keeps three segments. The first entry
/// of a forwarded-for list is used; anything unparsable becomes `0.0.0.0`.
pub fn anonymize_ip(raw: Option<&str>) -> String {
    let candidate = raw
        .and_then(|value| value.split(',').next())
        .map(str::trim)
        .unwrap_or_default();

    match candidate.parse::<IpAddr>() {
        Ok(IpAddr::V4(v4)) => {
            let [a, b, c, _] = v4.octets();
            format!("{}.{}.{}.0", a, b, c)
        }
        Ok(IpAddr::V6(v6)) => {
            let s = v6.segments();
            format!("{:x}:{:x}:{:x}::", s[0], s[1], s[2])
        }
        Err(_) => "0.0.0.0".to_string(),
    }
}
