//! Configuration for the KeywordPulse module

use serde::{Deserialize, Deserializer};

/// KeywordPulse configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// HTTP server settings
    #[serde(default)]
    pub server: ServerConfig,

    /// Telegram Bot API settings
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Supabase project settings
    #[serde(default)]
    pub supabase: SupabaseConfig,

    /// Google Sheets export settings
    #[serde(default)]
    pub google: GoogleConfig,

    /// Metrics ingestion thresholds
    #[serde(default)]
    pub analytics: AnalyticsConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Per-request timeout (seconds)
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Maximum request body size in bytes
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,

    /// Allowed CORS origins; empty allows any origin
    #[serde(default)]
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_secs: default_request_timeout(),
            max_body_bytes: default_max_body_bytes(),
            cors_allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TelegramConfig {
    /// Bot API base URL
    #[serde(default = "default_telegram_api")]
    pub api_base_url: String,

    /// Bot token used by `/api/notify` and feedback alerts
    #[serde(default, deserialize_with = "lenient_string")]
    pub bot_token: Option<String>,

    /// Default chat for `/api/notify`
    #[serde(default, deserialize_with = "lenient_string")]
    pub chat_id: Option<String>,

    /// Chat receiving feedback alerts; falls back to `chat_id`
    #[serde(default, deserialize_with = "lenient_string")]
    pub admin_chat_id: Option<String>,

    /// Pause between the parts of a split message (milliseconds)
    #[serde(default = "default_part_delay")]
    pub part_delay_ms: u64,

    /// Outbound request timeout (seconds)
    #[serde(default = "default_client_timeout")]
    pub request_timeout_secs: u64,
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            api_base_url: default_telegram_api(),
            bot_token: None,
            chat_id: None,
            admin_chat_id: None,
            part_delay_ms: default_part_delay(),
            request_timeout_secs: default_client_timeout(),
        }
    }
}

impl TelegramConfig {
    /// Chat receiving feedback alerts
    pub fn alert_chat_id(&self) -> Option<&str> {
        self.admin_chat_id
            .as_deref()
            .or(self.chat_id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SupabaseConfig {
    /// Project URL, e.g. `https://xyz.supabase.co`
    #[serde(default)]
    pub url: Option<String>,

    /// Public anon key
    #[serde(default)]
    pub anon_key: Option<String>,
}

impl SupabaseConfig {
    /// Both URL and key are present and are not the placeholder values
    pub fn is_configured(&self) -> bool {
        match (self.url.as_deref(), self.anon_key.as_deref()) {
            (Some(url), Some(key)) => {
                !url.is_empty()
                    && !key.is_empty()
                    && url != PLACEHOLDER_SUPABASE_URL
                    && key != PLACEHOLDER_SUPABASE_KEY
            }
            _ => false,
        }
    }
}

pub const PLACEHOLDER_SUPABASE_URL: &str = "https://example.supabase.co";
pub const PLACEHOLDER_SUPABASE_KEY: &str = "example-anon-key";

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GoogleConfig {
    /// Service account JSON; sheet export is refused without it
    #[serde(default, deserialize_with = "lenient_string")]
    pub service_account: Option<String>,

    #[serde(default = "default_spreadsheet_id")]
    pub spreadsheet_id: String,
}

impl Default for GoogleConfig {
    fn default() -> Self {
        Self {
            service_account: None,
            spreadsheet_id: default_spreadsheet_id(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct AnalyticsConfig {
    /// LCP above this value (milliseconds) is logged as a warning
    #[serde(default = "default_lcp_threshold")]
    pub lcp_threshold_ms: f64,

    /// API metrics slower than this (milliseconds) are critical
    #[serde(default = "default_slow_metric")]
    pub slow_metric_ms: f64,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            lcp_threshold_ms: default_lcp_threshold(),
            slow_metric_ms: default_slow_metric(),
        }
    }
}

/// Optional string that may arrive as a number or a structured value
///
/// Environment providers type `-100123` as an integer and a JSON blob as a map;
/// both are kept in their textual form.
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Lenient {
        Text(String),
        Other(serde_json::Value),
    }

    Ok(Option::<Lenient>::deserialize(deserializer)?.map(|value| match value {
        Lenient::Text(text) => text,
        Lenient::Other(other) => other.to_string(),
    }))
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_request_timeout() -> u64 {
    30
}

fn default_max_body_bytes() -> usize {
    1024 * 1024 // 1MB
}

fn default_telegram_api() -> String {
    "https://api.telegram.org".to_string()
}

fn default_part_delay() -> u64 {
    1000
}

fn default_client_timeout() -> u64 {
    10
}

fn default_spreadsheet_id() -> String {
    "example-sheet-id".to_string()
}

fn default_lcp_threshold() -> f64 {
    2500.0
}

fn default_slow_metric() -> f64 {
    1000.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alert_chat_prefers_admin() {
        let mut cfg = TelegramConfig {
            chat_id: Some("100".to_string()),
            ..Default::default()
        };
        assert_eq!(cfg.alert_chat_id(), Some("100"));

        cfg.admin_chat_id = Some("-200".to_string());
        assert_eq!(cfg.alert_chat_id(), Some("-200"));
    }

    #[test]
    fn test_numeric_chat_ids_are_read_as_text() {
        let config: Config = serde_json::from_value(serde_json::json!({
            "telegram": {"bot_token": 123456, "chat_id": -100123, "admin_chat_id": "@ops_room"},
            "google": {"service_account": {"type": "service_account", "project_id": "kp"}}
        }))
        .unwrap();

        assert_eq!(config.telegram.bot_token.as_deref(), Some("123456"));
        assert_eq!(config.telegram.chat_id.as_deref(), Some("-100123"));
        assert_eq!(config.telegram.admin_chat_id.as_deref(), Some("@ops_room"));
        let account: serde_json::Value =
            serde_json::from_str(config.google.service_account.as_deref().unwrap()).unwrap();
        assert_eq!(account["project_id"], "kp");
    }

    #[test]
    fn test_missing_ids_stay_empty() {
        let config: Config = serde_json::from_value(serde_json::json!({"telegram": {}})).unwrap();
        assert_eq!(config.telegram.chat_id, None);
        assert_eq!(config.telegram.bot_token, None);
    }

    #[test]
    fn test_placeholder_supabase_is_not_configured() {
        let cfg = SupabaseConfig {
            url: Some("https://example.supabase.co".to_string()),
            anon_key: Some("example-anon-key".to_string()),
        };
        assert!(!cfg.is_configured());

        let cfg = SupabaseConfig {
            url: Some("https://abc.supabase.co".to_string()),
            anon_key: Some("key".to_string()),
        };
        assert!(cfg.is_configured());
    }
}
