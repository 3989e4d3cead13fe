//! Entry-level operations over the `entries_data` table.
//!
//! These functions take a borrowed connection and never begin or commit a
//! transaction themselves. Pass a `rusqlite::Transaction` to group them with
//! other statements; [`SqliteStore`](crate::SqliteStore) does this for you.

use std::io::{self, Read};

use rusqlite::{params, Connection};

use entrychunk_core::{ChunkWriter, EntryId, WriterConfig};

use crate::error::Result;
use crate::sink::SqliteChunkSink;

/// Read buffer used when copying a source into a writer.
const COPY_BUF_SIZE: usize = 64 * 1024;

/// Stream `reader` into `entries_data` as chunks of `config.chunk_size`.
///
/// Returns the number of bytes written. On error some chunks may already be
/// inserted; roll back the enclosing transaction to discard them.
pub fn write_entry<R: Read>(
    conn: &Connection,
    entry_id: &EntryId,
    mut reader: R,
    config: &WriterConfig,
) -> Result<u64> {
    let mut writer = ChunkWriter::with_config(SqliteChunkSink::new(conn), entry_id.clone(), config)?;

    let mut buf = vec![0u8; COPY_BUF_SIZE];
    loop {
        let n = match reader.read(&mut buf) {
            Ok(0) => break,
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        };
        writer.write(&buf[..n])?;
    }

    let written = writer.close()?;
    tracing::debug!(
        entry_id = %entry_id,
        written,
        chunks = writer.chunks_flushed(),
        "wrote entry data"
    );
    Ok(written)
}

/// Delete every chunk of an entry. Returns the number of chunks removed.
pub fn delete_entry(conn: &Connection, entry_id: &EntryId) -> Result<u64> {
    let removed = conn.execute(
        "DELETE FROM entries_data WHERE id = ?1",
        params![entry_id.as_str()],
    )?;
    tracing::debug!(entry_id = %entry_id, removed, "deleted entry data");
    Ok(removed as u64)
}

/// Total stored size of an entry, or `None` if it has no chunks.
pub fn entry_size(conn: &Connection, entry_id: &EntryId) -> Result<Option<u64>> {
    let size: Option<i64> = conn.query_row(
        "SELECT SUM(LENGTH(chunk)) FROM entries_data WHERE id = ?1",
        params![entry_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(size.map(|s| s as u64))
}

/// Number of chunk rows stored for an entry.
pub fn chunk_count(conn: &Connection, entry_id: &EntryId) -> Result<u64> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM entries_data WHERE id = ?1",
        params![entry_id.as_str()],
        |row| row.get(0),
    )?;
    Ok(count as u64)
}
