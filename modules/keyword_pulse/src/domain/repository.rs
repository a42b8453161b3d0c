//! Port traits for external systems
//!
//! These traits define the interface to the third-party services KeywordPulse
//! relays to. Implementations are in infra/.

use crate::contract::{
    AuthSession, AuthUser, ChatInfo, Feedback, NewFeedback, SentMessage, TelegramMessage,
    UpstreamError,
};
use async_trait::async_trait;

/// Telegram Bot API
#[async_trait]
pub trait TelegramGateway: Send + Sync {
    /// Send a message with the given bot token
    async fn send_message(
        &self,
        token: &str,
        message: &TelegramMessage,
    ) -> Result<SentMessage, UpstreamError>;

    /// Look up a chat the bot can see
    async fn get_chat(&self, token: &str, chat_id: &str) -> Result<ChatInfo, UpstreamError>;
}

/// Storage for user feedback
#[async_trait]
pub trait FeedbackRepository: Send + Sync {
    /// Insert a feedback row and return it as stored
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, UpstreamError>;
}

/// Hosted authentication provider
#[async_trait]
pub trait AuthProvider: Send + Sync {
    /// Email/password sign-in
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, UpstreamError>;

    /// Register a new account; the user is `None` when confirmation is pending
    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, UpstreamError>;

    /// Exchange an OAuth/PKCE authorization code for a session
    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, UpstreamError>;

    /// Resolve the user behind an access token
    async fn get_user(&self, access_token: &str) -> Result<AuthUser, UpstreamError>;
}

/// User profile rows
#[async_trait]
pub trait ProfileRepository: Send + Sync {
    /// Profile row of a user, queried with the user's own access token
    async fn find_profile(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError>;
}

/// Spreadsheet export
#[async_trait]
pub trait SheetsExporter: Send + Sync {
    /// Append keyword rows and return the spreadsheet URL
    async fn export(
        &self,
        spreadsheet_id: &str,
        rows: &[serde_json::Value],
    ) -> Result<String, UpstreamError>;
}
