//! In-memory implementation of the ChunkSink trait.
//!
//! This is primarily for testing. Like the SQLite table it stands in for, it
//! rejects a second chunk at an existing `(entry_id, chunk_index)`.

use std::collections::HashSet;
use std::sync::{PoisonError, RwLock};

use bytes::Bytes;
use thiserror::Error;

use crate::sink::ChunkSink;
use crate::types::{ChunkRecord, EntryId};

/// Errors from the in-memory sink.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MemorySinkError {
    #[error("chunk {chunk_index} of entry {entry_id} already exists")]
    DuplicateChunk { entry_id: EntryId, chunk_index: u64 },
}

/// In-memory chunk sink.
///
/// Records every insert, in call order. Thread-safe via RwLock.
#[derive(Debug, Default)]
pub struct MemorySink {
    inner: RwLock<MemorySinkInner>,
}

#[derive(Debug, Default)]
struct MemorySinkInner {
    records: Vec<ChunkRecord>,
    positions: HashSet<(EntryId, u64)>,
}

impl MemorySink {
    /// Create a new empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// All records, in the order they were inserted.
    pub fn records(&self) -> Vec<ChunkRecord> {
        self.read(|inner| inner.records.clone())
    }

    /// Records of one entry, ordered by chunk index.
    pub fn chunks(&self, entry_id: &EntryId) -> Vec<ChunkRecord> {
        let mut chunks: Vec<ChunkRecord> = self.read(|inner| {
            inner
                .records
                .iter()
                .filter(|r| &r.entry_id == entry_id)
                .cloned()
                .collect()
        });
        chunks.sort_by_key(|r| r.chunk_index);
        chunks
    }

    /// Concatenated bytes of one entry in chunk index order.
    pub fn concat(&self, entry_id: &EntryId) -> Vec<u8> {
        self.chunks(entry_id)
            .iter()
            .flat_map(|r| r.chunk.iter().copied())
            .collect()
    }

    /// Total number of records across all entries.
    pub fn len(&self) -> usize {
        self.read(|inner| inner.records.len())
    }

    /// Whether nothing has been inserted.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read<T>(&self, f: impl FnOnce(&MemorySinkInner) -> T) -> T {
        let inner = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&inner)
    }
}

impl ChunkSink for MemorySink {
    type Error = MemorySinkError;

    fn insert_chunk(
        &self,
        entry_id: &EntryId,
        chunk_index: u64,
        chunk: &[u8],
    ) -> Result<(), Self::Error> {
        let mut inner = self.inner.write().unwrap_or_else(PoisonError::into_inner);

        if !inner.positions.insert((entry_id.clone(), chunk_index)) {
            return Err(MemorySinkError::DuplicateChunk {
                entry_id: entry_id.clone(),
                chunk_index,
            });
        }

        // The writer reuses its buffer, so keep an owned copy.
        inner.records.push(ChunkRecord {
            entry_id: entry_id.clone(),
            chunk_index,
            chunk: Bytes::copy_from_slice(chunk),
        });
        Ok(())
    }
}
