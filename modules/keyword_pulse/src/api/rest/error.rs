//! HTTP error mapping to RFC-9457 Problem Details

use crate::contract::KeywordPulseError;
use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use utoipa::ToSchema;

/// RFC-9457 Problem Details for HTTP API errors
///
/// `error` repeats the detail message and `success` is always false, the shape
/// browser clients of the API read.
#[derive(Debug, Serialize, ToSchema)]
pub struct Problem {
    /// A URI reference that identifies the problem type
    #[serde(rename = "type")]
    pub type_uri: String,

    /// A short, human-readable summary of the problem type
    pub title: String,

    /// The HTTP status code
    pub status: u16,

    /// A human-readable explanation specific to this occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,

    /// A URI reference that identifies the specific occurrence
    #[serde(skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,

    pub success: bool,

    /// Localized error message
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Problem {
    /// Create a new Problem Details response
    pub fn new(status: StatusCode, title: impl Into<String>) -> Self {
        Self {
            type_uri: format!("https://httpstatuses.io/{}", status.as_u16()),
            title: title.into(),
            status: status.as_u16(),
            detail: None,
            instance: None,
            success: false,
            error: None,
        }
    }

    /// Add detail message
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        let detail = detail.into();
        self.error = Some(detail.clone());
        self.detail = Some(detail);
        self
    }

    /// Add instance URI
    pub fn with_instance(mut self, instance: impl Into<String>) -> Self {
        self.instance = Some(instance.into());
        self
    }
}

impl IntoResponse for Problem {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/problem+json")],
            Json(self),
        )
            .into_response()
    }
}

/// Map domain errors to HTTP Problem Details
pub fn map_domain_error(error: KeywordPulseError) -> Problem {
    let detail = error.user_message();
    match error {
        KeywordPulseError::Validation { .. } => {
            Problem::new(StatusCode::BAD_REQUEST, "Validation Error").with_detail(detail)
        }

        KeywordPulseError::NotFound { resource, .. } => {
            Problem::new(StatusCode::NOT_FOUND, format!("{} Not Found", resource)).with_detail(detail)
        }

        KeywordPulseError::Unauthorized { .. } => {
            Problem::new(StatusCode::UNAUTHORIZED, "Unauthorized").with_detail(detail)
        }

        KeywordPulseError::NotConfigured { what } => {
            tracing::error!(missing = %what, "Required configuration is missing");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Service Not Configured")
                .with_detail(detail)
        }

        KeywordPulseError::Upstream { service, message } => {
            tracing::error!(service = %service, error = %message, "Upstream call failed");
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Upstream Service Error")
                .with_detail(detail)
        }

        KeywordPulseError::Internal => {
            Problem::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error")
                .with_detail(detail)
        }
    }
}

/// Malformed or mistyped JSON body
pub fn map_json_rejection(rejection: JsonRejection) -> Problem {
    tracing::debug!(error = %rejection.body_text(), "Rejected JSON body");
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        return Problem::new(StatusCode::PAYLOAD_TOO_LARGE, "Payload Too Large")
            .with_detail("요청 본문이 허용된 크기를 초과했습니다.");
    }
    Problem::new(StatusCode::BAD_REQUEST, "Invalid Request Body")
        .with_detail("요청 본문이 올바른 JSON 형식이 아닙니다.")
}

/// Malformed query string
pub fn map_query_rejection(rejection: QueryRejection) -> Problem {
    tracing::debug!(error = %rejection.body_text(), "Rejected query string");
    Problem::new(StatusCode::BAD_REQUEST, "Invalid Query").with_detail(rejection.body_text())
}
