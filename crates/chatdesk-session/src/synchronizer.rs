//! Session Synchronizer
//!
//! Owns the session list, the message list and the active pointer. Remote
//! calls are awaited without holding any lock, so a second operation can
//! start while the first is still in flight; results are checked against
//! the current state when they land.

use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use uuid::Uuid;

use chatdesk_api::{ChatBackend, ChatService, HistorySource, Session, SessionStore};

use crate::context::ActiveSession;
use crate::message::Message;

/// Rename in progress for one session
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameDraft {
    pub session_id: String,
    pub title: String,
}

/// Point-in-time copy of everything the view renders
#[derive(Debug, Clone)]
pub struct SyncSnapshot {
    pub active_session_id: String,
    pub sessions: Vec<Session>,
    pub messages: Vec<Message>,
    pub status: Option<String>,
    pub editing: Option<RenameDraft>,
}

#[derive(Debug, Default)]
struct SyncState {
    sessions: Vec<Session>,
    messages: Vec<Message>,
    status: Option<String>,
    editing: Option<RenameDraft>,
    /// Placeholder ids with a create in flight, and whether a message has
    /// been sent under the placeholder meanwhile
    creating: HashMap<String, bool>,
}

pub struct SessionSynchronizer {
    backend: Arc<dyn ChatBackend>,
    active: ActiveSession,
    state: Arc<RwLock<SyncState>>,
}

impl SessionSynchronizer {
    pub fn new(backend: Arc<dyn ChatBackend>, active: ActiveSession) -> Self {
        Self {
            backend,
            active,
            state: Arc::new(RwLock::new(SyncState {
                status: Some("Loading...".to_string()),
                ..SyncState::default()
            })),
        }
    }

    /// Startup: fetch the session list, then the active session's history
    pub async fn initialize(&self) {
        let session_id = self.active.id();
        tracing::info!(session_id = %session_id, "Restoring chat session");

        self.list_sessions().await;
        self.load_history(&session_id).await;
    }

    pub fn active_session_id(&self) -> String {
        self.active.id()
    }

    pub fn sessions(&self) -> Vec<Session> {
        self.state.read().sessions.clone()
    }

    pub fn messages(&self) -> Vec<Message> {
        self.state.read().messages.clone()
    }

    pub fn status(&self) -> Option<String> {
        self.state.read().status.clone()
    }

    pub fn editing(&self) -> Option<RenameDraft> {
        self.state.read().editing.clone()
    }

    pub fn snapshot(&self) -> SyncSnapshot {
        let state = self.state.read();
        SyncSnapshot {
            active_session_id: self.active.id(),
            sessions: state.sessions.clone(),
            messages: state.messages.clone(),
            status: state.status.clone(),
            editing: state.editing.clone(),
        }
    }

    /// Replace the local list with the server's. On failure the old list stays.
    pub async fn list_sessions(&self) {
        match self.backend.list_sessions().await {
            Ok(sessions) => {
                tracing::debug!(count = sessions.len(), "Replaced session list");
                self.state.write().sessions = sessions;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to load sessions");
                self.set_status(format!("Failed to load sessions: {e}"));
            }
        }
    }

    /// Start a new chat and make it active.
    ///
    /// A placeholder is shown and selected before the backend is asked. Once
    /// the backend answers, the placeholder takes over the issued id and the
    /// list is re-fetched. If a message was already sent under the
    /// placeholder id, the conversation lives there and the placeholder id is
    /// kept. If the backend fails the placeholder is left in place. Returns
    /// the id the new chat ended up with.
    pub async fn create_session(&self) -> String {
        let placeholder = Session::placeholder(Uuid::new_v4().to_string());
        let local_id = placeholder.id.clone();

        {
            let mut state = self.state.write();
            state.sessions.insert(0, placeholder);
            state.messages.clear();
            state.editing = None;
            state.status = Some("Creating a new chat...".to_string());
            state.creating.insert(local_id.clone(), false);
        }
        self.point_at(&local_id);

        let result = self.backend.create_session().await;
        let used = self
            .state
            .write()
            .creating
            .remove(&local_id)
            .unwrap_or(false);

        match result {
            Ok(session_id) if used => {
                tracing::info!(
                    placeholder_id = %local_id,
                    unused_session_id = %session_id,
                    "Messages already sent under placeholder, keeping its id"
                );

                self.list_sessions().await;
                local_id
            }
            Ok(session_id) => {
                {
                    let mut state = self.state.write();
                    if let Some(entry) = state.sessions.iter_mut().find(|s| s.id == local_id) {
                        entry.id = session_id.clone();
                    }
                    state.status = Some("New chat".to_string());
                }
                if self.active.is(&local_id) {
                    self.point_at(&session_id);
                }

                tracing::info!(session_id = %session_id, "Created session");

                self.list_sessions().await;
                session_id
            }
            Err(e) => {
                tracing::warn!(
                    placeholder_id = %local_id,
                    error = %e,
                    "Failed to create session"
                );
                self.set_status(format!("Failed to create a new chat: {e}"));
                local_id
            }
        }
    }

    /// Make `session_id` active and load its history
    pub async fn switch_session(&self, session_id: &str) {
        {
            let mut state = self.state.write();
            if let Some(draft) = state.editing.take() {
                tracing::debug!(session_id = %draft.session_id, "Abandoned rename");
            }
            state.messages.clear();
        }
        self.point_at(session_id);

        tracing::info!(session_id = %session_id, "Switched to session");

        self.load_history(session_id).await;
    }

    /// Fetch the history of `session_id` and replace the message list with it.
    ///
    /// The response is dropped if another session became active meanwhile.
    pub async fn load_history(&self, session_id: &str) {
        self.set_status("Loading history...");

        let result = self.backend.load_history(session_id).await;

        if !self.active.is(session_id) {
            tracing::debug!(
                session_id = %session_id,
                active_session_id = %self.active.id(),
                "Discarding stale history response"
            );
            return;
        }

        match result {
            Ok(history) => {
                let messages: Vec<Message> = history.into_iter().map(Message::from).collect();
                let count = messages.len();
                {
                    let mut state = self.state.write();
                    state.messages = messages;
                    state.status = Some(if count == 0 {
                        "Ready to chat".to_string()
                    } else {
                        format!("Loaded {count} messages")
                    });
                }

                tracing::debug!(session_id = %session_id, count, "Loaded history");

                self.list_sessions().await;
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to load history");
                self.set_status(format!("Failed to load history: {e}"));
            }
        }
    }

    /// Open edit mode for `session_id`, prefilled with its current title
    pub fn start_rename(&self, session_id: &str) -> Option<RenameDraft> {
        let mut state = self.state.write();
        let title = state
            .sessions
            .iter()
            .find(|s| s.id == session_id)?
            .title
            .clone();

        let draft = RenameDraft {
            session_id: session_id.to_string(),
            title,
        };
        state.editing = Some(draft.clone());
        Some(draft)
    }

    pub fn cancel_rename(&self) {
        self.state.write().editing = None;
    }

    /// Save a new title. A blank title just leaves edit mode.
    ///
    /// Edit mode is closed only after the backend accepts the title, so a
    /// failed rename can be retried.
    pub async fn rename_session(&self, session_id: &str, title: &str) {
        let title = title.trim();
        if title.is_empty() {
            self.cancel_rename();
            return;
        }

        match self.backend.rename_session(session_id, title).await {
            Ok(()) => {
                tracing::info!(session_id = %session_id, title = %title, "Renamed session");

                self.list_sessions().await;

                let mut state = self.state.write();
                if state
                    .editing
                    .as_ref()
                    .is_some_and(|draft| draft.session_id == session_id)
                {
                    state.editing = None;
                }
                state.status = Some("Chat renamed".to_string());
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Failed to rename session");
                self.set_status(format!("Failed to rename chat: {e}"));
            }
        }
    }

    /// Ask to delete `session_id`. Nothing is sent until the request is confirmed.
    pub fn request_delete(&self, session_id: &str) -> DeleteRequest {
        let title = self
            .state
            .read()
            .sessions
            .iter()
            .find(|s| s.id == session_id)
            .map(|s| s.title.clone());

        DeleteRequest {
            synchronizer: self.clone(),
            session_id: session_id.to_string(),
            title,
        }
    }

    async fn delete_confirmed(&self, session_id: &str) {
        if let Err(e) = self.backend.delete_session(session_id).await {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to delete session");
            self.set_status(format!("Failed to delete chat: {e}"));
            return;
        }

        tracing::info!(session_id = %session_id, "Deleted session");

        if self.active.is(session_id) {
            let next = self
                .state
                .read()
                .sessions
                .iter()
                .find(|s| s.id != session_id)
                .map(|s| s.id.clone());

            match next {
                Some(next) => self.switch_session(&next).await,
                None => {
                    self.create_session().await;
                }
            }
        }

        self.list_sessions().await;
        self.set_status("Chat deleted");
    }

    /// Send `text` in the active session.
    ///
    /// The user message and an empty streaming assistant message are shown
    /// right away. The answer fills the assistant message in place. If the
    /// request fails the assistant message keeps streaming and only the
    /// status reports the error.
    pub async fn send_message(&self, text: &str) {
        let question = text.trim();
        if question.is_empty() {
            return;
        }

        let session_id = self.active.id();
        let placeholder = Message::assistant_placeholder();
        let placeholder_id = placeholder.id.clone();

        {
            let mut state = self.state.write();
            state.messages.push(Message::user(question));
            state.messages.push(placeholder);
            state.status = Some("Calling API...".to_string());
            if let Some(sent) = state.creating.get_mut(&session_id) {
                *sent = true;
            }
        }

        match self.backend.send_message(question, &session_id).await {
            Ok(answer) => {
                let resolved = {
                    let mut state = self.state.write();
                    match state.messages.iter_mut().find(|m| m.id == placeholder_id) {
                        Some(message) => {
                            message.resolve(answer);
                            state.status = Some("Done".to_string());
                            true
                        }
                        None => false,
                    }
                };

                if !resolved {
                    tracing::debug!(
                        session_id = %session_id,
                        "Answer arrived after its session was left"
                    );
                }

                self.list_sessions().await;
            }
            Err(e) => {
                tracing::warn!(session_id = %session_id, error = %e, "Chat request failed");
                self.set_status(format!("API call failed: {e}"));
            }
        }
    }

    fn set_status(&self, status: impl Into<String>) {
        self.state.write().status = Some(status.into());
    }

    fn point_at(&self, session_id: &str) {
        if let Err(e) = self.active.set(session_id) {
            tracing::warn!(session_id = %session_id, error = %e, "Failed to persist active session");
        }
    }
}

impl Clone for SessionSynchronizer {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            active: self.active.clone(),
            state: Arc::clone(&self.state),
        }
    }
}

/// Pending deletion awaiting explicit confirmation
#[must_use = "a delete request does nothing until confirmed"]
pub struct DeleteRequest {
    synchronizer: SessionSynchronizer,
    session_id: String,
    title: Option<String>,
}

impl DeleteRequest {
    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    /// Question to put to the user
    pub fn prompt(&self) -> String {
        match &self.title {
            Some(title) => format!("Delete \"{title}\"? This cannot be undone."),
            None => "Delete this chat? This cannot be undone.".to_string(),
        }
    }

    pub async fn confirm(self) {
        self.synchronizer.delete_confirmed(&self.session_id).await;
    }

    pub fn cancel(self) {
        tracing::debug!(session_id = %self.session_id, "Delete cancelled");
    }
}
