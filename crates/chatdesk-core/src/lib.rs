//! ChatDesk Core
//!
//! Wires configuration, local storage, the HTTP backend and the session
//! synchronizer together. Front ends render from the synchronizer only.

mod chatdesk;
mod config;
mod error;

pub use chatdesk::ChatDesk;
pub use config::Config;
pub use error::CoreError;

pub use chatdesk_api::{ApiClient, ApiError, HistoryMessage, Role, Session};
pub use chatdesk_session::{
    ActiveSession, DeleteRequest, Message, RenameDraft, SessionError, SessionSynchronizer,
    SyncSnapshot,
};
pub use chatdesk_storage::{SettingsStore, StorageError};

pub type Result<T> = std::result::Result<T, CoreError>;

/// Initialize logging
///
/// `RUST_LOG` wins when set; otherwise `default_filter` applies. Output goes
/// to stderr so it stays out of the rendered conversation.
pub fn init_logging(default_filter: &str) {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
