//! Client roles consumed by the session synchronizer

use async_trait::async_trait;

use crate::types::{HistoryMessage, Session};
use crate::Result;

/// Remote session CRUD
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// All sessions, in the order the backend reports them
    async fn list_sessions(&self) -> Result<Vec<Session>>;

    /// Create an empty session and return its id
    async fn create_session(&self) -> Result<String>;

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<()>;

    async fn delete_session(&self, session_id: &str) -> Result<()>;
}

/// Stored conversation history
#[async_trait]
pub trait HistorySource: Send + Sync {
    /// Messages for `session_id`, oldest first
    async fn load_history(&self, session_id: &str) -> Result<Vec<HistoryMessage>>;
}

/// Question/answer exchange
#[async_trait]
pub trait ChatService: Send + Sync {
    /// Send one user message and wait for the full assistant answer
    async fn send_message(&self, message: &str, session_id: &str) -> Result<String>;
}

/// Everything the synchronizer needs from a backend
pub trait ChatBackend: SessionStore + HistorySource + ChatService {}

impl<T> ChatBackend for T where T: SessionStore + HistorySource + ChatService {}
