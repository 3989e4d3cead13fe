//! SQLite implementation of the ChunkSink trait.

use rusqlite::{params, Connection};

use entrychunk_core::{ChunkSink, EntryId};

const INSERT_CHUNK: &str =
    "INSERT INTO entries_data (id, chunk_index, chunk) VALUES (?1, ?2, ?3)";

/// Inserts chunks into `entries_data` through a borrowed connection.
///
/// Pass a [`rusqlite::Transaction`] (it derefs to `Connection`) to make the
/// chunks of an entry commit or roll back together. The sink itself never
/// begins, commits or rolls back anything.
#[derive(Clone, Copy)]
pub struct SqliteChunkSink<'c> {
    conn: &'c Connection,
}

impl<'c> SqliteChunkSink<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }
}

impl ChunkSink for SqliteChunkSink<'_> {
    type Error = rusqlite::Error;

    fn insert_chunk(
        &self,
        entry_id: &EntryId,
        chunk_index: u64,
        chunk: &[u8],
    ) -> Result<(), Self::Error> {
        let mut stmt = self.conn.prepare_cached(INSERT_CHUNK)?;
        stmt.execute(params![entry_id.as_str(), chunk_index, chunk])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::migration;
    use entrychunk_core::{ChunkWriter, WriterError};

    fn conn() -> Connection {
        let mut conn = Connection::open_in_memory().unwrap();
        migration::migrate(&mut conn).unwrap();
        conn
    }

    fn rows(conn: &Connection, id: &str) -> Vec<(i64, Vec<u8>)> {
        let mut stmt = conn
            .prepare("SELECT chunk_index, chunk FROM entries_data WHERE id = ?1 ORDER BY chunk_index")
            .unwrap();
        let rows = stmt
            .query_map([id], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<rusqlite::Result<Vec<_>>>()
            .unwrap();
        rows
    }

    #[test]
    fn test_insert_chunk() {
        let conn = conn();
        let sink = SqliteChunkSink::new(&conn);

        sink.insert_chunk(&EntryId::new("abc"), 0, b"hello").unwrap();

        assert_eq!(rows(&conn, "abc"), vec![(0, b"hello".to_vec())]);
    }

    #[test]
    fn test_writer_into_transaction() {
        let mut conn = conn();
        let tx = conn.transaction().unwrap();

        let mut writer = ChunkWriter::new(SqliteChunkSink::new(&tx), EntryId::new("abc"), 4).unwrap();
        writer.write(b"ab").unwrap();
        writer.write(b"cdef").unwrap();
        writer.write(b"gh").unwrap();
        writer.write(b"i").unwrap();
        writer.close().unwrap();
        drop(writer);
        tx.commit().unwrap();

        assert_eq!(
            rows(&conn, "abc"),
            vec![
                (0, b"abcd".to_vec()),
                (1, b"efgh".to_vec()),
                (2, b"i".to_vec()),
            ]
        );
    }

    #[test]
    fn test_rollback_discards_chunks() {
        let mut conn = conn();
        {
            let tx = conn.transaction().unwrap();
            let mut writer = ChunkWriter::new(SqliteChunkSink::new(&tx), EntryId::new("abc"), 2).unwrap();
            writer.write(b"abcdef").unwrap();
            writer.close().unwrap();
            // tx dropped without commit
        }

        assert!(rows(&conn, "abc").is_empty());
    }

    #[test]
    fn test_duplicate_chunk_is_sink_error() {
        let conn = conn();
        let sink = SqliteChunkSink::new(&conn);
        sink.insert_chunk(&EntryId::new("abc"), 0, b"xx").unwrap();

        let mut writer = ChunkWriter::new(sink, EntryId::new("abc"), 2).unwrap();
        let err = writer.write(b"yy").unwrap_err();
        assert!(matches!(
            err,
            WriterError::Sink(rusqlite::Error::SqliteFailure(_, _))
        ));
    }
}
