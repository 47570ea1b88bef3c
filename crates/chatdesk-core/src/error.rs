//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Storage error: {0}")]
    Storage(#[from] chatdesk_storage::StorageError),

    #[error("Session error: {0}")]
    Session(#[from] chatdesk_session::SessionError),

    #[error("API error: {0}")]
    Api(#[from] chatdesk_api::ApiError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),
}
