//! Strong type definitions for entrychunk.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier of the entry whose bytes are being chunked.
///
/// Opaque to this crate: ids are allocated and validated by the caller.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntryId(String);

impl EntryId {
    /// Create an entry id from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntryId({})", self.0)
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EntryId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

/// One persisted chunk of an entry.
///
/// `chunk_index` is zero-based and gapless within an entry. Every chunk but
/// the last of an entry holds exactly the writer's chunk size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkRecord {
    pub entry_id: EntryId,
    pub chunk_index: u64,
    pub chunk: Bytes,
}

impl ChunkRecord {
    /// Length of the chunk payload in bytes.
    pub fn len(&self) -> usize {
        self.chunk.len()
    }

    /// Whether the chunk payload is empty. Writers never emit empty chunks.
    pub fn is_empty(&self) -> bool {
        self.chunk.is_empty()
    }
}
