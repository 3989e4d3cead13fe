//! Error types for the store module.

use entrychunk_core::WriterError;
use thiserror::Error;

/// Errors that can occur during store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Database error from SQLite.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// I/O error while reading the entry's source.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Chunk writer misuse or a writer left unusable by an earlier failure.
    #[error("chunk writer error: {0}")]
    Writer(String),

    /// Unusable configuration.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// Migration error.
    #[error("migration error: {0}")]
    Migration(String),

    /// A blocking task panicked or was cancelled.
    #[error("blocking task failed: {0}")]
    Task(String),
}

impl From<WriterError<rusqlite::Error>> for StoreError {
    fn from(e: WriterError<rusqlite::Error>) -> Self {
        match e {
            WriterError::Sink(e) => StoreError::Database(e),
            other => StoreError::Writer(other.to_string()),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, StoreError>;
