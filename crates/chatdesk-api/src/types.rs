//! Wire types

use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// Title the backend gives a session that has neither messages nor a custom title
pub const PLACEHOLDER_TITLE: &str = "New Chat";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    /// Opaque identifier issued by the backend
    pub id: String,
    pub title: String,
    /// Seconds since the Unix epoch
    pub created_at: f64,
    /// Seconds since the Unix epoch
    pub updated_at: f64,
    pub message_count: u64,
}

impl Session {
    /// Local stand-in shown until the backend confirms a new session
    pub fn placeholder(id: String) -> Self {
        let now = epoch_seconds(Utc::now());

        Self {
            id,
            title: PLACEHOLDER_TITLE.to_string(),
            created_at: now,
            updated_at: now,
            message_count: 0,
        }
    }

    pub fn updated_at_utc(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.updated_at)
    }

    pub fn created_at_utc(&self) -> DateTime<Utc> {
        from_epoch_seconds(self.created_at)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One stored turn as returned by `GET /api/history/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    pub role: Role,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SessionList {
    pub sessions: Vec<Session>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CreatedSession {
    pub session_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct RenameBody<'a> {
    pub title: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct History {
    #[serde(default)]
    pub messages: Vec<HistoryMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct ChatBody<'a> {
    pub message: &'a str,
    pub session_id: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ChatReply {
    pub answer: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Health {
    pub status: String,
}

fn epoch_seconds(at: DateTime<Utc>) -> f64 {
    at.timestamp_millis() as f64 / 1000.0
}

fn from_epoch_seconds(seconds: f64) -> DateTime<Utc> {
    Utc.timestamp_millis_opt((seconds * 1000.0) as i64)
        .single()
        .unwrap_or_default()
}
