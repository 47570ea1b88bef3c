//! In-process backend for synchronizer tests
//!
//! Behaves like the real server for the calls the synchronizer makes, can be
//! told to fail per operation, and can hold a call until released so tests
//! can interleave operations deterministically.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tokio::sync::Notify;

use chatdesk_api::{
    ApiError, ChatService, HistoryMessage, HistorySource, Result, Role, Session, SessionStore,
    PLACEHOLDER_TITLE,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Op {
    List,
    Create,
    Rename,
    Delete,
    History,
    Chat,
}

#[derive(Default)]
struct Server {
    sessions: Vec<Session>,
    histories: HashMap<String, Vec<HistoryMessage>>,
    next_id: usize,
    clock: f64,
    answer: String,
    last_chat: Option<(String, String)>,
    failing: HashSet<Op>,
    calls: HashMap<Op, usize>,
}

impl Server {
    fn tick(&mut self) -> f64 {
        self.clock += 1.0;
        self.clock
    }
}

#[derive(Default)]
pub struct FakeBackend {
    server: Mutex<Server>,
    gates: Mutex<HashMap<(Op, String), Arc<Notify>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        let backend = Self::default();
        backend.server.lock().answer = "ok".to_string();
        backend
    }

    /// Append a stored session with the given history
    pub fn with_session(self, id: &str, title: &str, history: &[(Role, &str)]) -> Self {
        {
            let mut server = self.server.lock();
            let now = server.tick();
            server.sessions.push(Session {
                id: id.to_string(),
                title: title.to_string(),
                created_at: now,
                updated_at: now,
                message_count: history.len() as u64,
            });
            server.histories.insert(
                id.to_string(),
                history
                    .iter()
                    .map(|(role, content)| HistoryMessage {
                        role: *role,
                        content: content.to_string(),
                    })
                    .collect(),
            );
        }
        self
    }

    pub fn fail(&self, op: Op) {
        self.server.lock().failing.insert(op);
    }

    pub fn recover(&self, op: Op) {
        self.server.lock().failing.remove(&op);
    }

    pub fn calls(&self, op: Op) -> usize {
        self.server.lock().calls.get(&op).copied().unwrap_or(0)
    }

    pub fn set_answer(&self, answer: &str) {
        self.server.lock().answer = answer.to_string();
    }

    /// `(message, session_id)` of the most recent chat request
    pub fn last_chat(&self) -> Option<(String, String)> {
        self.server.lock().last_chat.clone()
    }

    pub fn server_sessions(&self) -> Vec<Session> {
        self.server.lock().sessions.clone()
    }

    /// Block the next `op` call for `key` (a session id, or "" for create
    /// and chat) until the returned handle is notified
    pub fn hold(&self, op: Op, key: &str) -> Arc<Notify> {
        let gate = Arc::new(Notify::new());
        self.gates
            .lock()
            .insert((op, key.to_string()), Arc::clone(&gate));
        gate
    }

    async fn enter(&self, op: Op, key: &str) -> Result<()> {
        *self.server.lock().calls.entry(op).or_insert(0) += 1;

        let gate = self.gates.lock().remove(&(op, key.to_string()));
        if let Some(gate) = gate {
            gate.notified().await;
        }

        if self.server.lock().failing.contains(&op) {
            return Err(ApiError::Status {
                status: 500,
                body: "backend unavailable".to_string(),
            });
        }
        Ok(())
    }
}

fn not_found() -> ApiError {
    ApiError::Status {
        status: 404,
        body: "Session not found".to_string(),
    }
}

#[async_trait]
impl SessionStore for FakeBackend {
    async fn list_sessions(&self) -> Result<Vec<Session>> {
        self.enter(Op::List, "").await?;
        Ok(self.server.lock().sessions.clone())
    }

    async fn create_session(&self) -> Result<String> {
        self.enter(Op::Create, "").await?;

        let mut server = self.server.lock();
        server.next_id += 1;
        let id = format!("server-{}", server.next_id);
        let now = server.tick();
        server.sessions.insert(
            0,
            Session {
                id: id.clone(),
                title: PLACEHOLDER_TITLE.to_string(),
                created_at: now,
                updated_at: now,
                message_count: 0,
            },
        );
        server.histories.insert(id.clone(), Vec::new());
        Ok(id)
    }

    async fn rename_session(&self, session_id: &str, title: &str) -> Result<()> {
        self.enter(Op::Rename, session_id).await?;

        let mut server = self.server.lock();
        let session = server
            .sessions
            .iter_mut()
            .find(|s| s.id == session_id)
            .ok_or_else(not_found)?;
        session.title = title.trim().to_string();
        Ok(())
    }

    async fn delete_session(&self, session_id: &str) -> Result<()> {
        self.enter(Op::Delete, session_id).await?;

        let mut server = self.server.lock();
        let index = server
            .sessions
            .iter()
            .position(|s| s.id == session_id)
            .ok_or_else(not_found)?;
        server.sessions.remove(index);
        server.histories.remove(session_id);
        Ok(())
    }
}

#[async_trait]
impl HistorySource for FakeBackend {
    async fn load_history(&self, session_id: &str) -> Result<Vec<HistoryMessage>> {
        self.enter(Op::History, session_id).await?;
        Ok(self
            .server
            .lock()
            .histories
            .get(session_id)
            .cloned()
            .unwrap_or_default())
    }
}

#[async_trait]
impl ChatService for FakeBackend {
    async fn send_message(&self, message: &str, session_id: &str) -> Result<String> {
        self.enter(Op::Chat, "").await?;

        let mut server = self.server.lock();
        let answer = server.answer.clone();
        let now = server.tick();
        server.last_chat = Some((message.to_string(), session_id.to_string()));

        let history = server.histories.entry(session_id.to_string()).or_default();
        history.push(HistoryMessage {
            role: Role::User,
            content: message.to_string(),
        });
        history.push(HistoryMessage {
            role: Role::Assistant,
            content: answer.clone(),
        });
        let count = history.len() as u64;

        let title: String = message.chars().take(50).collect();
        match server.sessions.iter().position(|s| s.id == session_id) {
            Some(index) => {
                let session = &mut server.sessions[index];
                if session.title == PLACEHOLDER_TITLE {
                    session.title = title;
                }
                session.message_count = count;
                session.updated_at = now;
            }
            // Unknown ids are adopted, as the real backend does
            None => server.sessions.insert(
                0,
                Session {
                    id: session_id.to_string(),
                    title,
                    created_at: now,
                    updated_at: now,
                    message_count: count,
                },
            ),
        }

        Ok(answer)
    }
}
