//! ChatDesk Session Synchronization
//!
//! Keeps the local session list, the active session pointer and the
//! in-memory message list consistent with the remote session store:
//! - Changes are applied optimistically and reconciled by re-listing
//! - Remote failures never escape an operation; they become a status line
//! - History responses are tagged with the session they were requested for
//!   and dropped if the user has moved on

mod context;
mod error;
mod message;
mod synchronizer;

#[cfg(test)]
mod testing;

pub use context::{ActiveSession, ACTIVE_SESSION_KEY};
pub use error::SessionError;
pub use message::Message;
pub use synchronizer::{DeleteRequest, RenameDraft, SessionSynchronizer, SyncSnapshot};

pub type Result<T> = std::result::Result<T, SessionError>;
