//! Supabase adapter: PostgREST tables and GoTrue auth

use super::request_error;
use crate::contract::{AuthSession, AuthUser, Feedback, NewFeedback, UpstreamError};
use crate::domain::{AuthProvider, FeedbackRepository, ProfileRepository};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

const FEEDBACK_TABLE: &str = "feedback";
const PROFILES_TABLE: &str = "profiles";

/// Supabase REST client implementing the feedback, auth and profile ports
pub struct SupabaseClient {
    client: Client,
    base_url: Url,
    anon_key: String,
}

#[derive(Debug, Serialize)]
struct FeedbackRow<'a> {
    text: &'a str,
    email: Option<&'a str>,
    name: Option<&'a str>,
    rating: Option<u8>,
    category: &'a str,
    page: Option<&'a str>,
    ip: Option<&'a str>,
    user_agent: Option<&'a str>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct StoredFeedbackRow {
    #[serde(default)]
    id: Option<serde_json::Value>,
    text: String,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    rating: Option<u8>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    page: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Serialize)]
struct PasswordCredentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Serialize)]
struct PkceExchange<'a> {
    auth_code: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    code_verifier: Option<&'a str>,
}

#[derive(Debug, Deserialize)]
struct UserDto {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

impl From<UserDto> for AuthUser {
    fn from(user: UserDto) -> Self {
        Self {
            id: user.id,
            email: user.email,
        }
    }
}

#[derive(Debug, Deserialize)]
struct SessionDto {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    #[serde(default)]
    expires_in: Option<i64>,
    user: UserDto,
}

/// Sign-up answers with the bare user, or with a session when auto-confirm is on
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum SignUpDto {
    User(UserDto),
    Session { user: Option<UserDto> },
}

/// Error payloads of PostgREST (`message`) and GoTrue (`msg`, `error_description`)
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    message: Option<String>,
    msg: Option<String>,
    error_description: Option<String>,
    error: Option<String>,
}

impl ErrorBody {
    fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

impl SupabaseClient {
    pub fn new(url: &str, anon_key: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        let base_url = Url::parse(url)?;
        Ok(Self {
            client,
            base_url,
            anon_key: anon_key.into(),
        })
    }

    fn endpoint(&self, path: &str) -> Result<Url, UpstreamError> {
        self.base_url
            .join(path)
            .map_err(|e| UpstreamError::Transport(format!("invalid Supabase URL: {}", e)))
    }

    /// Request carrying the project key, authorized as `bearer` (anon key by default)
    fn request(&self, method: reqwest::Method, url: Url, bearer: Option<&str>) -> RequestBuilder {
        self.client
            .request(method, url)
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer.unwrap_or(&self.anon_key))
    }

    async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let body: ErrorBody = response.json().await.unwrap_or_default();
            return Err(UpstreamError::Api {
                status: status.as_u16(),
                message: body
                    .into_message()
                    .or_else(|| status.canonical_reason().map(str::to_string))
                    .unwrap_or_else(|| "Unknown error".to_string()),
            });
        }
        response
            .json()
            .await
            .map_err(|e| UpstreamError::Decode(e.to_string()))
    }

    async fn token(&self, grant_type: &str, body: &impl Serialize) -> Result<AuthSession, UpstreamError> {
        let mut url = self.endpoint("/auth/v1/token")?;
        url.query_pairs_mut().append_pair("grant_type", grant_type);

        let response = self
            .request(reqwest::Method::POST, url, None)
            .json(body)
            .send()
            .await
            .map_err(request_error)?;
        let session: SessionDto = Self::decode(response).await?;
        Ok(AuthSession {
            access_token: session.access_token,
            refresh_token: session.refresh_token,
            expires_in: session.expires_in,
            user: session.user.into(),
        })
    }
}

#[async_trait]
impl FeedbackRepository for SupabaseClient {
    async fn insert(&self, feedback: &NewFeedback) -> Result<Feedback, UpstreamError> {
        let row = FeedbackRow {
            text: &feedback.text,
            email: feedback.email.as_deref(),
            name: feedback.name.as_deref(),
            rating: feedback.rating,
            category: &feedback.category,
            page: feedback.page.as_deref(),
            ip: feedback.ip.as_deref(),
            user_agent: feedback.user_agent.as_deref(),
            created_at: feedback.created_at,
        };
        let url = self.endpoint(&format!("/rest/v1/{}", FEEDBACK_TABLE))?;
        let response = self
            .request(reqwest::Method::POST, url, None)
            .header("Prefer", "return=representation")
            .json(&[row])
            .send()
            .await
            .map_err(request_error)?;

        let rows: Vec<StoredFeedbackRow> = Self::decode(response).await?;
        let stored = rows.into_iter().next();
        Ok(match stored {
            Some(row) => Feedback {
                id: row.id.map(|id| match id {
                    serde_json::Value::String(s) => s,
                    other => other.to_string(),
                }),
                text: row.text,
                email: row.email,
                name: row.name,
                rating: row.rating,
                category: row.category.unwrap_or_else(|| feedback.category.clone()),
                page: row.page,
                created_at: row.created_at.unwrap_or(feedback.created_at),
            },
            None => Feedback {
                id: None,
                text: feedback.text.clone(),
                email: feedback.email.clone(),
                name: feedback.name.clone(),
                rating: feedback.rating,
                category: feedback.category.clone(),
                page: feedback.page.clone(),
                created_at: feedback.created_at,
            },
        })
    }
}

#[async_trait]
impl AuthProvider for SupabaseClient {
    async fn sign_in_with_password(
        &self,
        email: &str,
        password: &str,
    ) -> Result<AuthSession, UpstreamError> {
        self.token("password", &PasswordCredentials { email, password })
            .await
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<Option<AuthUser>, UpstreamError> {
        let url = self.endpoint("/auth/v1/signup")?;
        let response = self
            .request(reqwest::Method::POST, url, None)
            .json(&PasswordCredentials { email, password })
            .send()
            .await
            .map_err(request_error)?;

        let outcome: SignUpDto = Self::decode(response).await?;
        Ok(match outcome {
            SignUpDto::User(user) => Some(user.into()),
            SignUpDto::Session { user } => user.map(AuthUser::from),
        })
    }

    async fn exchange_code(
        &self,
        code: &str,
        code_verifier: Option<&str>,
    ) -> Result<AuthSession, UpstreamError> {
        self.token(
            "pkce",
            &PkceExchange {
                auth_code: code,
                code_verifier,
            },
        )
        .await
    }

    async fn get_user(&self, access_token: &str) -> Result<AuthUser, UpstreamError> {
        let url = self.endpoint("/auth/v1/user")?;
        let response = self
            .request(reqwest::Method::GET, url, Some(access_token))
            .send()
            .await
            .map_err(request_error)?;
        let user: UserDto = Self::decode(response).await?;
        Ok(user.into())
    }
}

#[async_trait]
impl ProfileRepository for SupabaseClient {
    async fn find_profile(
        &self,
        user_id: &str,
        access_token: &str,
    ) -> Result<Option<serde_json::Value>, UpstreamError> {
        let mut url = self.endpoint(&format!("/rest/v1/{}", PROFILES_TABLE))?;
        url.query_pairs_mut()
            .append_pair("id", &format!("eq.{}", user_id))
            .append_pair("select", "*");

        let response = self
            .request(reqwest::Method::GET, url, Some(access_token))
            .send()
            .await
            .map_err(request_error)?;
        let rows: Vec<serde_json::Value> = Self::decode(response).await?;
        Ok(rows.into_iter().next())
    }
}
