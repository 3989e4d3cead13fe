//! ChunkSink trait: the persistence capability a writer flushes into.
//!
//! A sink is usually a thin wrapper over an open database transaction. The
//! writer never commits or rolls back; that belongs to whoever owns the
//! transaction.

use crate::types::EntryId;

/// Persists one chunk row of an entry.
///
/// `chunk` borrows the writer's reusable buffer and is only valid for the
/// duration of the call. Implementations that keep the bytes beyond the
/// call must copy them.
pub trait ChunkSink {
    /// Error returned when an insert fails.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Insert `(entry_id, chunk_index, chunk)`.
    fn insert_chunk(
        &self,
        entry_id: &EntryId,
        chunk_index: u64,
        chunk: &[u8],
    ) -> Result<(), Self::Error>;
}

impl<S: ChunkSink + ?Sized> ChunkSink for &S {
    type Error = S::Error;

    fn insert_chunk(
        &self,
        entry_id: &EntryId,
        chunk_index: u64,
        chunk: &[u8],
    ) -> Result<(), Self::Error> {
        (**self).insert_chunk(entry_id, chunk_index, chunk)
    }
}
