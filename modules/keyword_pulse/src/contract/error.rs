//! Contract error types for KeywordPulse
//!
//! These errors are transport-agnostic and used for inter-module communication.

use thiserror::Error;

/// KeywordPulse domain errors
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordPulseError {
    /// Request failed validation; `message` is shown to the caller as-is
    Validation {
        /// Localized validation message
        message: String,
    },
    /// Resource not found
    NotFound {
        /// Resource type
        resource: String,
        /// Resource identifier
        id: String,
    },
    /// Missing or rejected credentials
    Unauthorized {
        /// Localized reason
        message: String,
    },
    /// A required deployment setting is absent
    NotConfigured {
        /// Environment variable (or config key) that is missing
        what: String,
    },
    /// A third-party API call failed
    Upstream {
        /// Upstream service name (telegram, supabase, sheets)
        service: String,
        /// Localized failure message
        message: String,
    },
    /// Internal error
    Internal,
}

impl KeywordPulseError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::Unauthorized {
            message: message.into(),
        }
    }

    pub fn not_configured(what: impl Into<String>) -> Self {
        Self::NotConfigured { what: what.into() }
    }

    pub fn upstream(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.into(),
            message: message.into(),
        }
    }

    /// Message suitable for the end user
    pub fn user_message(&self) -> String {
        match self {
            Self::Validation { message } | Self::Unauthorized { message } => message.clone(),
            Self::NotFound { resource, id } => format!("{}을(를) 찾을 수 없습니다: {}", resource, id),
            Self::NotConfigured { what } => format!("{} 환경변수가 설정되지 않았습니다.", what),
            Self::Upstream { message, .. } => message.clone(),
            Self::Internal => "알 수 없는 오류가 발생했습니다.".to_string(),
        }
    }
}

impl std::fmt::Display for KeywordPulseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation { message } => {
                write!(f, "Validation error: {}", message)
            }
            Self::NotFound { resource, id } => {
                write!(f, "{} not found: {}", resource, id)
            }
            Self::Unauthorized { message } => {
                write!(f, "Unauthorized: {}", message)
            }
            Self::NotConfigured { what } => {
                write!(f, "Not configured: {}", what)
            }
            Self::Upstream { service, message } => {
                write!(f, "Upstream {} error: {}", service, message)
            }
            Self::Internal => {
                write!(f, "Internal error")
            }
        }
    }
}

impl std::error::Error for KeywordPulseError {}

/// Failure reported by a third-party API adapter
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UpstreamError {
    /// The API answered with an error payload
    #[error("API error {status}: {message}")]
    Api {
        /// Error code reported by the API (HTTP status or Telegram `error_code`)
        status: u16,
        /// Description reported by the API
        message: String,
    },
    /// The request never produced a response
    #[error("transport error: {0}")]
    Transport(String),
    /// The response could not be decoded
    #[error("decode error: {0}")]
    Decode(String),
}
