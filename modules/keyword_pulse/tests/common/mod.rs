//! Shared mock ports and service fixtures

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::Utc;
use keyword_pulse::config::{Config, GoogleConfig, SupabaseConfig, TelegramConfig};
use keyword_pulse::contract::{
    AuthSession, AuthUser, ChatInfo, Feedback, NewFeedback, SentMessage, TelegramMessage,
    UpstreamError,
};
use keyword_pulse::domain::{
    AnalyticsEvent, AnalyticsPublisher, AuthProvider, FeedbackRepository, Ports,
    ProfileRepository, Service, SheetsExporter, TelegramGateway,
};
use parking_lot::Mutex;
use serde_json::json;
use std::collections::HashSet;
use std::sync::Arc;

pub const BOT_TOKEN: &str = "123456:test-token";
pub const CHAT_ID: &str = "1001";
pub const ADMIN_CHAT_ID: &str = "-2002";
pub const ACCESS_TOKEN: &str = "user-access-token";

/// Telegram gateway that records every message
#[derive(Default)]
pub struct MockTelegram {
    sent: Mutex<Vec<(String, TelegramMessage)>>,
    failing_chats: Mutex<HashSet<String>>,
    transport_down: Mutex<bool>,
    chat_type: Mutex<Option<String>>,
}

impl MockTelegram {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Messages to `chat_id` fail with a Bot API error
    pub fn fail_chat(&self, chat_id: &str) {
        self.failing_chats.lock().insert(chat_id.to_string());
    }

    /// Every call fails before reaching the API
    pub fn go_offline(&self) {
        *self.transport_down.lock() = true;
    }

    /// `getChat` answers with this chat type
    pub fn set_chat_type(&self, chat_type: &str) {
        *self.chat_type.lock() = Some(chat_type.to_string());
    }

    pub fn sent(&self) -> Vec<(String, TelegramMessage)> {
        self.sent.lock().clone()
    }

    pub fn texts(&self) -> Vec<String> {
        self.sent.lock().iter().map(|(_, m)| m.text.clone()).collect()
    }
}

#[async_trait]
impl TelegramGateway for MockTelegram {
    async fn send_message(
        &self,
        token: &str,
        message: &TelegramMessage,
    ) -> Result<SentMessage, UpstreamError> {
        if *self.transport_down.lock() {
            return Err(UpstreamError::Transport("connection refused".to_string()));
        }
        if self.failing_chats.lock().contains(&message.chat_id) {
            return Err(UpstreamError::Api {
                status: 400,
                message: "Bad Request: chat not found".to_string(),
            });
        }

        let mut sent = self.sent.lock();
        sent.push((token.to_string(), message.clone()));
        let message_id = sent.len() as i64;
        Ok(SentMessage {
            message_id,
            date: 1_700_000_000,
            raw: json!({
                "message_id": message_id,
                "date": 1_700_000_000,
                "chat": {"id": message.chat_id},
                "text": message.text,
            }),
        })
    }

    async fn get_chat(&self, _token: &str, chat_id: &str) -> Result<ChatInfo, UpstreamError> {
        if *self.transport_down.lock() {
            return Err(UpstreamError::Transport("connection refused".to_string()));
        }
        match self.chat_type.lock().clone() {
            Some(chat_type) => Ok(ChatInfo {
                id: chat_id.parse().unwrap_or_default(),
                chat_type,
                title: None,
            }),
            None => Err(UpstreamError::Api {
                status: 400,
                message: "Bad Request: chat not found".to_string(),
            }),
        }
    }
}

/// Feedback store keeping rows in memory
#[derive(Default)]
pub struct MockFeedback {
    rows: Mutex<Vec<NewFeedback>>,
    fail: Mutex<bool>,
}

impl MockFeedback {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail(&self) {
        *self.fail.lock() = true;
    }

    pub fn rows(&self) -> Vec<NewFeedback> {
        self.rows.lock().clone()
    }
}

#[async_trait]
impl FeedbackRepository for MockFeedback {
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, UpstreamError> {
        if *self.fail.lock() {
            return Err(UpstreamError::Api {
                status: 500,
                message: "relation \"feedback\" does not exist".to_string(),
            });
        }
        let mut rows = self.rows.lock();
        rows.push(feedback.clone());
        Ok(Feedback {
            id: Some(rows.len().to_string()),
            text: feedback.text.clone(),
            email: feedback.email.clone(),
            name: feedback.name.clone(),
            rating: feedback.rating,
            category: feedback.category.clone(),
            page: feedback.page.clone(),
            created_at: feedback.created_at,
        })
    }
}

/// Auth provider with one known account
#[derive(Default)]
pub struct MockAuth {
    exchanged: Mutex<Vec<(String, Option<String>)>>,
    existing_emails: Mutex<HashSet<String>>,
}

pub const KNOWN_EMAIL: &str = "user@example.com";
pub const KNOWN_PASSWORD: &str = "secret123";
pub const VALID_CODE: &str = "valid-code";
pub const USER_ID: &str = "b2f0c6b4-3a7c-4f4e-9a55-2f6f0d1c9e01";

impl MockAuth {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn register(&self, email: &str) {
        self.existing_emails.lock().insert(email.to_string());
    }

    pub fn exchanged(&self) -> Vec<(String, Option<String>)> {
        self.exchanged.lock().clone()
    }

    fn session() -> AuthSession {
        AuthSession {
            access_token: ACCESS_TOKEN.to_string(),
            refresh_token: Some("refresh".to_string()),
            expires_in: Some(3600),
            user: user(),
        }
    }
}

pub fn user() -> AuthUser {
    AuthUser {
        id: USER_ID.to_string(),
        email: Some(KNOWN_EMAIL.to_string()),
    }
}

#[async_trait]
impl AuthProvider for MockAuth {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, UpstreamError> {
        if email == KNOWN_EMAIL && password == KNOWN_PASSWORD {
            Ok(Self::session())
        } else {
            Err(UpstreamError::Api {
                status: 400,
                message: "Invalid login credentials".to_string(),
            })
        }
    }

    async fn sign_up(&self, email: &str, _password: &str) -> Result<Option<AuthUser>, UpstreamError> {
        if self.existing_emails.lock().contains(email) {
            return Err(UpstreamError::Api {
                status: 422,
                message: "User already registered".to_string(),
            });
        }
        self.register(email);
        Ok(Some(AuthUser {
            id: "new-user".to_string(),
            email: Some(email.to_string()),
        }))
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, UpstreamError> {
        self.exchanged
            .lock()
            .push((code.to_string(), code_verifier.map(str::to_string)));
        if code == VALID_CODE {
            Ok(Self::session())
        } else {
            Err(UpstreamError::Api {
                status: 400,
                message: "invalid flow state".to_string(),
            })
        }
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, UpstreamError> {
        if access_token == ACCESS_TOKEN {
            Ok(user())
        } else {
            Err(UpstreamError::Api {
                status: 401,
                message: "invalid JWT".to_string(),
            })
        }
    }
}

/// Profile table with a single row for the known user
pub struct MockProfiles;

#[async_trait]
impl ProfileRepository for MockProfiles {
    async fn find_profile(
        &self,
        user_id: &str,
        _access_token: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        Ok((user_id == USER_ID).then(|| json!({"id": USER_ID, "plan": "free"})))
    }
}

/// Sheets exporter recording the exported rows
#[derive(Default)]
pub struct MockSheets {
    exports: Mutex<Vec<(String, usize)>>,
}

impl MockSheets {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn exports(&self) -> Vec<(String, usize)> {
        self.exports.lock().clone()
    }
}

#[async_trait]
impl SheetsExporter for MockSheets {
    async fn export(
        &self,
        spreadsheet_id: &str,
        rows: &[serde_json::Value],
    ) -> Result<String, UpstreamError> {
        self.exports
            .lock()
            .push((spreadsheet_id.to_string(), rows.len()));
        Ok(format!(
            "https://docs.google.com/spreadsheets/d/{}/edit",
            spreadsheet_id
        ))
    }
}

/// Analytics publisher capturing events
#[derive(Default)]
pub struct MockAnalytics {
    events: Mutex<Vec<AnalyticsEvent>>,
}

impl MockAnalytics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.events.lock().clone()
    }
}

#[async_trait]
impl AnalyticsPublisher for MockAnalytics {
    async fn publish(&self, event: AnalyticsEvent) -> anyhow::Result<()> {
        self.events.lock().push(event);
        Ok(())
    }
}

/// Mocks behind a service, kept for assertions
pub struct Harness {
    pub telegram: Arc<MockTelegram>,
    pub feedback: Arc<MockFeedback>,
    pub auth: Arc<MockAuth>,
    pub sheets: Arc<MockSheets>,
    pub analytics: Arc<MockAnalytics>,
    pub service: Arc<Service>,
}

/// Fully configured deployment without part delays
pub fn test_config() -> Config {
    Config {
        telegram: TelegramConfig {
            bot_token: Some(BOT_TOKEN.to_string()),
            chat_id: Some(CHAT_ID.to_string()),
            admin_chat_id: Some(ADMIN_CHAT_ID.to_string()),
            part_delay_ms: 0,
            ..Default::default()
        },
        supabase: SupabaseConfig {
            url: Some("https://project.supabase.co".to_string()),
            anon_key: Some("anon-key".to_string()),
        },
        google: GoogleConfig {
            service_account: Some("{\"type\":\"service_account\"}".to_string()),
            spreadsheet_id: "sheet-1".to_string(),
        },
        ..Default::default()
    }
}

pub fn harness() -> Harness {
    harness_with(test_config())
}

pub fn harness_with(config: Config) -> Harness {
    let telegram = MockTelegram::new();
    let feedback = MockFeedback::new();
    let auth = MockAuth::new();
    let sheets = MockSheets::new();
    let analytics = MockAnalytics::new();

    let ports = Ports {
        telegram: telegram.clone(),
        feedback: feedback.clone(),
        auth: auth.clone(),
        profiles: Arc::new(MockProfiles),
        sheets: sheets.clone(),
        analytics: analytics.clone(),
    };
    let service = Arc::new(Service::new(config, ports));

    Harness {
        telegram,
        feedback,
        auth,
        sheets,
        analytics,
        service,
    }
}

/// Ports wired to fresh mocks, for module-level tests
pub fn mock_ports() -> Ports {
    Ports {
        telegram: MockTelegram::new(),
        feedback: MockFeedback::new(),
        auth: MockAuth::new(),
        profiles: Arc::new(MockProfiles),
        sheets: MockSheets::new(),
        analytics: MockAnalytics::new(),
    }
}

pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}
