//! ChatDesk API
//!
//! Contract consumed from the chat backend:
//! - `GET /api/sessions`, `POST /api/sessions`
//! - `PUT /api/sessions/{id}/rename`, `DELETE /api/sessions/{id}`
//! - `GET /api/history/{id}`
//! - `POST /api/chat`
//!
//! The three client roles are separate traits so the synchronizer can be
//! driven by any backend; [`ApiClient`] implements all of them over HTTP.

mod backend;
mod client;
mod error;
mod types;

pub use backend::{ChatBackend, ChatService, HistorySource, SessionStore};
pub use client::ApiClient;
pub use error::ApiError;
pub use types::{HistoryMessage, Role, Session, PLACEHOLDER_TITLE};

pub type Result<T> = std::result::Result<T, ApiError>;
