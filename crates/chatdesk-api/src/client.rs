//! HTTP implementation of the backend contract

use async_trait::async_trait;
use reqwest::{RequestBuilder, Response};
use serde::de::DeserializeOwned;
use url::Url;

use crate::backend::{ChatService, HistorySource, SessionStore};
use crate::error::ApiError;
use crate::types::{
    ChatBody, ChatReply, CreatedSession, Health, History, HistoryMessage, RenameBody, Session,
    SessionList,
};
use crate::Result;

/// REST client for the chat backend
///
/// No request timeout is configured: a hung request stays pending until the
/// server answers or the connection drops.
pub struct ApiClient {
    base_url: Url,
    client: reqwest::Client,
}

impl ApiClient {
    pub fn new(base_url: Url) -> Result<Self> {
        if base_url.cannot_be_a_base() {
            return Err(ApiError::InvalidUrl(base_url.to_string()));
        }

        let client = reqwest::Client::builder()
            .user_agent(concat!("chatdesk/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Probe `GET /health`, returning the reported status
    pub async fn health(&self) -> Result<String> {
        let url = self.endpoint(&["health"])?;
        let health: Health = self.fetch_json(self.client.get(url)).await?;
        Ok(health.status)
    }

    /// Append path segments to the base URL, percent-encoding each one
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ApiError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = request.send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::debug!(status = %status, body = %body, "Backend returned an error status");
            return Err(ApiError::Status {
                status: status.as_u16(),
                body,
            });
        }

        Ok(response)
    }

    async fn fetch_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = self.send(request).await?;
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}

#[async_trait]
impl SessionStore for ApiClient {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        let url = self.endpoint(&["api", "sessions"])?;
        let list: SessionList = self.fetch_json(self.client.get(url)).await?;

        tracing::debug!(count = list.sessions.len(), "Fetched sessions");

        Ok(list.sessions)
    }

    async fn create_session(&self) -> Result<String> {
        let url = self.endpoint(&["api", "sessions"])?;
        let created: CreatedSession = self.fetch_json(self.client.post(url)).await?;

        tracing::info!(session_id = %created.session_id, "Backend created session");

        Ok(created.session_id)
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        let url = self.endpoint(&["api", "sessions", session_id, "rename"])?;
        self.send(self.client.put(url).json(&RenameBody { title }))
            .await?;
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        let url = self.endpoint(&["api", "sessions", session_id])?;
        self.send(self.client.delete(url)).await?;
        Ok(())
    }
}

#[async_trait]
impl HistorySource for ApiClient {
    async fn load_history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        let url = self.endpoint(&["api", "history", session_id])?;
        let history: History = self.fetch_json(self.client.get(url)).await?;
        Ok(history.messages)
    }
}

#[async_trait]
impl ChatService for ApiClient {
    async fn send_message(&self, message: &str, session_id: &str) -> Result<String> {
        let url = self.endpoint(&["api", "chat"])?;
        let reply: ChatReply = self
            .fetch_json(self.client.post(url).json(&ChatBody {
                message,
                session_id,
            }))
            .await?;
        Ok(reply.answer)
    }
}
