//! Test fixtures and helpers.
//!
//! Common setup code for writer and store tests.

use std::sync::atomic::{AtomicU64, Ordering};

use rusqlite::Connection;
use thiserror::Error;

use entrychunk_core::{
    ChunkRecord, ChunkSink, ChunkWriter, EntryId, MemorySink, MemorySinkError, WriterError,
};
use entrychunk_store::{migration, SqliteChunkSink};

/// Entry id used by the assemble helpers.
pub const ENTRY: &str = "test-entry";

/// The error a [`FailingSink`] injects.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InjectedFailure {
    #[error("injected failure on insert {0}")]
    Injected(u64),

    #[error(transparent)]
    Memory(#[from] MemorySinkError),
}

/// A memory sink whose `fail_on`-th insert (zero-based) fails.
///
/// Inserts after the failing one succeed again, so tests can check that the
/// writer itself stops issuing them.
pub struct FailingSink {
    pub inner: MemorySink,
    fail_on: u64,
    calls: AtomicU64,
}

impl FailingSink {
    pub fn new(fail_on: u64) -> Self {
        Self {
            inner: MemorySink::new(),
            fail_on,
            calls: AtomicU64::new(0),
        }
    }

    /// Number of inserts attempted so far, including the failed one.
    pub fn calls(&self) -> u64 {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ChunkSink for FailingSink {
    type Error = InjectedFailure;

    fn insert_chunk(
        &self,
        entry_id: &EntryId,
        chunk_index: u64,
        chunk: &[u8],
    ) -> Result<(), Self::Error> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst);
        if call == self.fail_on {
            return Err(InjectedFailure::Injected(call));
        }
        self.inner.insert_chunk(entry_id, chunk_index, chunk)?;
        Ok(())
    }
}

/// Split `data` at the given cut positions.
///
/// Cuts are clamped to `data.len()` and sorted; repeated cuts produce empty
/// parts, so the result always has `cuts.len() + 1` parts.
pub fn split_at<'a>(data: &'a [u8], cuts: &[usize]) -> Vec<&'a [u8]> {
    let mut cuts: Vec<usize> = cuts.iter().map(|&c| c.min(data.len())).collect();
    cuts.sort_unstable();

    let mut parts = Vec::with_capacity(cuts.len() + 1);
    let mut start = 0;
    for cut in cuts {
        parts.push(&data[start..cut]);
        start = cut;
    }
    parts.push(&data[start..]);
    parts
}

/// Write `data` split at `cuts` through a writer into a [`MemorySink`],
/// close it, and return the records in insertion order.
pub fn assemble(
    data: &[u8],
    cuts: &[usize],
    chunk_size: usize,
) -> Result<Vec<ChunkRecord>, WriterError<MemorySinkError>> {
    let sink = MemorySink::new();
    {
        let mut writer = ChunkWriter::new(&sink, EntryId::new(ENTRY), chunk_size)?;
        for part in split_at(data, cuts) {
            writer.write(part)?;
        }
        writer.close()?;
    }
    Ok(sink.records())
}

/// Same as [`assemble`] but through SQLite, reading the rows back ordered by
/// chunk index.
pub fn assemble_sqlite(
    data: &[u8],
    cuts: &[usize],
    chunk_size: usize,
) -> entrychunk_store::Result<Vec<ChunkRecord>> {
    let mut conn = Connection::open_in_memory()?;
    migration::migrate(&mut conn)?;

    let tx = conn.transaction()?;
    {
        let mut writer = ChunkWriter::new(SqliteChunkSink::new(&tx), EntryId::new(ENTRY), chunk_size)?;
        for part in split_at(data, cuts) {
            writer.write(part)?;
        }
        writer.close()?;
    }
    tx.commit()?;

    let mut stmt = conn.prepare(
        "SELECT chunk_index, chunk FROM entries_data WHERE id = ?1 ORDER BY chunk_index",
    )?;
    let records = stmt
        .query_map([ENTRY], |row| {
            let chunk_index: i64 = row.get(0)?;
            let chunk: Vec<u8> = row.get(1)?;
            Ok(ChunkRecord {
                entry_id: EntryId::new(ENTRY),
                chunk_index: chunk_index as u64,
                chunk: chunk.into(),
            })
        })?
        .collect::<rusqlite::Result<Vec<_>>>()?;

    Ok(records)
}
