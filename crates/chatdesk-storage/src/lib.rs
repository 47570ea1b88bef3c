//! ChatDesk Storage Layer
//!
//! SQLite-backed key/value settings. The client keeps almost nothing locally:
//! the only durable value is the id of the last active chat session.

mod error;
mod migrations;
mod settings;

pub use error::StorageError;
pub use settings::SettingsStore;

pub type Result<T> = std::result::Result<T, StorageError>;
