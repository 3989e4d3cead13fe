//! Error types for the chunk writer.

use std::io;

use thiserror::Error;

/// Errors produced by a [`ChunkWriter`](crate::ChunkWriter).
///
/// `E` is the error type of the underlying [`ChunkSink`](crate::ChunkSink).
/// Sink failures are carried unchanged in [`WriterError::Sink`].
#[derive(Debug, Error)]
pub enum WriterError<E> {
    /// The configured chunk size cannot be used.
    #[error("invalid chunk size {0}: must be at least 1 byte")]
    InvalidChunkSize(usize),

    /// The writer has already been closed.
    #[error("chunk writer is closed")]
    Closed,

    /// An earlier sink insert failed; the stream cannot continue.
    #[error("chunk writer failed on an earlier insert")]
    Failed,

    /// The sink rejected a chunk insert.
    #[error("chunk sink error: {0}")]
    Sink(#[source] E),
}

impl<E> WriterError<E> {
    /// Whether this error came from the sink rather than the writer itself.
    pub fn is_sink(&self) -> bool {
        matches!(self, WriterError::Sink(_))
    }

    /// Take the sink error out, if this is one.
    pub fn into_sink(self) -> Option<E> {
        match self {
            WriterError::Sink(e) => Some(e),
            _ => None,
        }
    }
}

impl<E> From<WriterError<E>> for io::Error
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn from(e: WriterError<E>) -> Self {
        let kind = match &e {
            WriterError::InvalidChunkSize(_) => io::ErrorKind::InvalidInput,
            WriterError::Closed | WriterError::Failed => io::ErrorKind::BrokenPipe,
            WriterError::Sink(_) => io::ErrorKind::Other,
        };
        io::Error::new(kind, e)
    }
}

/// Result type for writer operations over a sink with error `E`.
pub type Result<T, E> = std::result::Result<T, WriterError<E>>;
