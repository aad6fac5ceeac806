//! reqwest-backed gateway.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::NotesGateway;
use crate::config::{normalize_api_base_url, ClientConfig};
use crate::models::{
    Credentials, ListFilter, NewNote, Note, NoteId, NotePatch, SignupPayload, TokenResponse,
    UserProfile,
};
use crate::util::compact_text;
use crate::{Error, Result};

#[derive(Clone)]
pub struct HttpGateway {
    base_url: String,
    client: Client,
}

impl HttpGateway {
    pub fn new(config: &ClientConfig) -> Result<Self> {
        let base_url = normalize_api_base_url(&config.api_base_url)?;
        let client = Client::builder()
            .timeout(Duration::from_secs(config.http_timeout_secs))
            .build()?;
        Ok(Self { base_url, client })
    }

    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = ensure_success(request.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl NotesGateway for HttpGateway {
    async fn signup(&self, payload: &SignupPayload) -> Result<UserProfile> {
        tracing::debug!(username = %payload.username, "POST /auth/signup");
        self.send_json(self.client.post(self.url("/auth/signup")).json(payload))
            .await
    }

    async fn login(&self, credentials: &Credentials) -> Result<TokenResponse> {
        tracing::debug!(username = %credentials.username, "POST /auth/login");
        self.send_json(self.client.post(self.url("/auth/login")).json(credentials))
            .await
    }

    async fn fetch_profile(&self, token: &str) -> Result<UserProfile> {
        tracing::debug!("GET /auth/me");
        self.send_json(self.client.get(self.url("/auth/me")).bearer_auth(token))
            .await
    }

    async fn list_notes(&self, token: &str, filter: &ListFilter) -> Result<Vec<Note>> {
        tracing::debug!(
            search = filter.search.as_deref().unwrap_or(""),
            include_archived = filter.include_archived,
            "GET /notes"
        );
        self.send_json(
            self.client
                .get(self.url("/notes"))
                .query(&filter.query_pairs())
                .bearer_auth(token),
        )
        .await
    }

    async fn fetch_note(&self, token: &str, id: NoteId) -> Result<Note> {
        tracing::debug!("GET /notes/{id}");
        self.send_json(
            self.client
                .get(self.url(&format!("/notes/{id}")))
                .bearer_auth(token),
        )
        .await
    }

    async fn create_note(&self, token: &str, payload: &NewNote) -> Result<Note> {
        tracing::debug!(use_ai = payload.use_ai, "POST /notes");
        self.send_json(
            self.client
                .post(self.url("/notes"))
                .bearer_auth(token)
                .json(payload),
        )
        .await
    }

    async fn update_note(&self, token: &str, id: NoteId, patch: &NotePatch) -> Result<Note> {
        tracing::debug!(regenerate_ai = patch.regenerate_ai, "PUT /notes/{id}");
        self.send_json(
            self.client
                .put(self.url(&format!("/notes/{id}")))
                .bearer_auth(token)
                .json(patch),
        )
        .await
    }

    async fn delete_note(&self, token: &str, id: NoteId) -> Result<()> {
        tracing::debug!("DELETE /notes/{id}");
        let request = self
            .client
            .delete(self.url(&format!("/notes/{id}")))
            .bearer_auth(token);
        ensure_success(request.send().await?).await?;
        Ok(())
    }
}

async fn ensure_success(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    tracing::debug!(status = status.as_u16(), body = %compact_text(&body), "backend rejected request");
    Err(error_for_status(status, &body))
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    detail: Option<serde_json::Value>,
    message: Option<String>,
}

/// Classify a non-2xx response and pull out its human-readable message.
pub(crate) fn error_for_status(status: StatusCode, body: &str) -> Error {
    let message = parse_api_error(status, body);
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Error::Authentication(message),
        StatusCode::NOT_FOUND => Error::NotFound(message),
        StatusCode::UNPROCESSABLE_ENTITY => Error::Validation(message),
        _ => Error::Remote(message),
    }
}

fn parse_api_error(status: StatusCode, body: &str) -> String {
    if let Ok(payload) = serde_json::from_str::<ApiErrorBody>(body) {
        let detail = payload.detail.as_ref().and_then(detail_text);
        if let Some(message) = detail.or(payload.message) {
            let message = message.trim();
            if !message.is_empty() {
                return message.to_string();
            }
        }
    }

    status
        .canonical_reason()
        .map_or_else(|| format!("HTTP {}", status.as_u16()), ToString::to_string)
}

fn detail_text(detail: &serde_json::Value) -> Option<String> {
    match detail {
        serde_json::Value::String(text) => Some(text.clone()),
        serde_json::Value::Array(items) => {
            let messages = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect::<Vec<_>>();
            if messages.is_empty() {
                None
            } else {
                Some(messages.join("; "))
            }
        }
        _ => None,
    }
}
