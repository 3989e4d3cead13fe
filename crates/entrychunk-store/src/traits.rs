//! EntryStore trait: the async interface for entry data persistence.

use async_trait::async_trait;
use bytes::Bytes;

use entrychunk_core::EntryId;

use crate::error::Result;

/// Async interface for storing an entry's bytes as chunks.
///
/// Each call runs in its own transaction: a failed `put_entry` leaves no
/// chunks behind. Entry ids are allocated by the caller; putting an id that
/// already has chunks fails with a database constraint error.
#[async_trait]
pub trait EntryStore: Send + Sync {
    /// Store `data` as the bytes of `entry_id`. Returns the bytes written.
    async fn put_entry(&self, entry_id: &EntryId, data: Bytes) -> Result<u64>;

    /// Remove every chunk of an entry. Returns the number of chunks removed.
    async fn delete_entry(&self, entry_id: &EntryId) -> Result<u64>;

    /// Total stored size of an entry, or `None` if it has no chunks.
    async fn entry_size(&self, entry_id: &EntryId) -> Result<Option<u64>>;

    /// Number of chunks stored for an entry.
    async fn chunk_count(&self, entry_id: &EntryId) -> Result<u64>;
}
