//! Telegram Bot API adapter

use super::request_error;
use crate::contract::{ChatInfo, SentMessage, TelegramMessage, UpstreamError};
use crate::domain::TelegramGateway;
use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// `TelegramGateway` backed by the HTTP Bot API
pub struct TelegramClient {
    client: Client,
    base_url: String,
}

/// Envelope of every Bot API response
#[derive(Debug, Deserialize)]
struct BotResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
}

#[derive(Debug, Serialize)]
struct SendMessageBody<'a> {
    chat_id: &'a str,
    text: &'a str,
    parse_mode: &'a str,
    disable_web_page_preview: bool,
    disable_notification: bool,
}

#[derive(Debug, Serialize)]
struct GetChatBody<'a> {
    chat_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatDto {
    id: i64,
    #[serde(rename = "type")]
    chat_type: String,
    title: Option<String>,
}

impl TelegramClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        })
    }

    fn method_url(&self, token: &str, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, token, method)
    }

    async fn call<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, UpstreamError> {
        let response = request.send().await.map_err(request_error)?;
        let status = response.status();

        let payload: BotResponse<T> = match response.json().await {
            Ok(payload) => payload,
            Err(e) if status.is_success() => return Err(UpstreamError::Decode(e.to_string())),
            Err(_) => {
                return Err(UpstreamError::Api {
                    status: status.as_u16(),
                    message: status.canonical_reason().unwrap_or("Unknown error").to_string(),
                })
            }
        };

        match payload {
            BotResponse {
                ok: true,
                result: Some(result),
                ..
            } => Ok(result),
            BotResponse {
                description,
                error_code,
                ..
            } => Err(UpstreamError::Api {
                status: error_code.unwrap_or_else(|| status.as_u16()),
                message: description.unwrap_or_else(|| "Unknown error".to_string()),
            }),
        }
    }
}

#[async_trait]
impl TelegramGateway for TelegramClient {
    async fn send_message(
        &self,
        token: &str,
        message: &TelegramMessage,
    ) -> Result<SentMessage, UpstreamError> {
        let body = SendMessageBody {
            chat_id: &message.chat_id,
            text: &message.text,
            parse_mode: message.parse_mode.as_str(),
            disable_web_page_preview: message.disable_web_page_preview,
            disable_notification: message.disable_notification,
        };
        let request = self
            .client
            .post(self.method_url(token, "sendMessage"))
            .json(&body);

        let result: serde_json::Value = self.call(request).await?;
        let message_id = result
            .get("message_id")
            .and_then(serde_json::Value::as_i64)
            .ok_or_else(|| UpstreamError::Decode("sendMessage result has no message_id".to_string()))?;
        let date = result
            .get("date")
            .and_then(serde_json::Value::as_i64)
            .unwrap_or_default();

        tracing::debug!(chat_id = %message.chat_id, message_id, "Telegram message sent");
        Ok(SentMessage {
            message_id,
            date,
            raw: result,
        })
    }

    async fn get_chat(&self, token: &str, chat_id: &str) -> Result<ChatInfo, UpstreamError> {
        let request = self
            .client
            .post(self.method_url(token, "getChat"))
            .json(&GetChatBody { chat_id });

        let chat: ChatDto = self.call(request).await?;
        Ok(ChatInfo {
            id: chat.id,
            chat_type: chat.chat_type,
            title: chat.title,
        })
    }
}
