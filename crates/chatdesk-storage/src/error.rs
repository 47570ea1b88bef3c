//! Storage error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Settings database error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}
