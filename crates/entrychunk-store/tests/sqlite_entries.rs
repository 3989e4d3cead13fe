//! End-to-end tests against an on-disk SQLite database.

use std::sync::Arc;

use bytes::Bytes;
use proptest::prelude::*;
use rusqlite::Connection;

use entrychunk_core::{ChunkWriter, EntryId, WriterConfig, WriterError};
use entrychunk_store::{
    entries, migration, EntryStore, SqliteChunkSink, SqliteStore, StoreConfig, StoreError,
};

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

fn config(chunk_size: usize) -> StoreConfig {
    StoreConfig {
        writer: WriterConfig::with_chunk_size(chunk_size),
    }
}

/// Read an entry's chunks back, ordered by index.
fn read_chunks(conn: &Connection, id: &EntryId) -> Vec<(i64, Vec<u8>)> {
    let mut stmt = conn
        .prepare("SELECT chunk_index, chunk FROM entries_data WHERE id = ?1 ORDER BY chunk_index")
        .unwrap();
    let chunks = stmt
        .query_map([id.as_str()], |row| Ok((row.get(0)?, row.get(1)?)))
        .unwrap()
        .collect::<rusqlite::Result<Vec<_>>>()
        .unwrap();
    chunks
}

#[test]
fn test_entry_survives_reopen() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("store.db");
    let id = EntryId::new("f00dcafe01");
    let data: Vec<u8> = (0..10_000u32).map(|i| (i % 251) as u8).collect();

    {
        let store = SqliteStore::open_with_config(&path, config(1024)).unwrap();
        assert_eq!(store.write_entry(&id, &data[..]).unwrap(), 10_000);
    }

    let conn = Connection::open(&path).unwrap();
    let chunks = read_chunks(&conn, &id);
    assert_eq!(chunks.len(), 10);
    assert!(chunks[..9].iter().all(|(_, c)| c.len() == 1024));
    assert_eq!(chunks[9].1.len(), 10_000 - 9 * 1024);

    let joined: Vec<u8> = chunks.into_iter().flat_map(|(_, c)| c).collect();
    assert_eq!(joined, data);
}

#[test]
fn test_caller_managed_transaction_rollback() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let mut conn = Connection::open(dir.path().join("store.db")).unwrap();
    migration::migrate(&mut conn).unwrap();
    let id = EntryId::new("abc");

    {
        let tx = conn.transaction().unwrap();
        let mut writer = ChunkWriter::new(SqliteChunkSink::new(&tx), id.clone(), 3).unwrap();
        writer.write(b"partial upload").unwrap();
        // Client disconnects: the writer is dropped unclosed and the
        // transaction is never committed.
    }

    assert!(read_chunks(&conn, &id).is_empty());
    assert_eq!(entries::entry_size(&conn, &id).unwrap(), None);
}

#[test]
fn test_entries_in_one_transaction() {
    init_tracing();
    let mut conn = Connection::open_in_memory().unwrap();
    migration::migrate(&mut conn).unwrap();
    let config = WriterConfig::with_chunk_size(5);
    let a = EntryId::new("a");
    let b = EntryId::new("b");

    let tx = conn.transaction().unwrap();
    entries::write_entry(&tx, &a, &b"first entry"[..], &config).unwrap();
    entries::write_entry(&tx, &b, &b"second"[..], &config).unwrap();
    tx.commit().unwrap();

    assert_eq!(entries::chunk_count(&conn, &a).unwrap(), 3);
    assert_eq!(entries::chunk_count(&conn, &b).unwrap(), 2);
    assert_eq!(read_chunks(&conn, &b), vec![(0, b"secon".to_vec()), (1, b"d".to_vec())]);
}

#[test]
fn test_failed_writer_error_maps_to_store_error() {
    let conn = Connection::open_in_memory().unwrap();
    let mut writer = ChunkWriter::new(SqliteChunkSink::new(&conn), EntryId::new("x"), 4).unwrap();

    // No schema: the insert itself fails on the first full chunk.
    let err = writer.write(b"abcd").unwrap_err();
    assert!(err.is_sink());
    assert!(matches!(StoreError::from(err), StoreError::Database(_)));

    let err = writer.close().unwrap_err();
    assert!(matches!(err, WriterError::Failed));
    assert!(matches!(StoreError::from(err), StoreError::Writer(_)));
}

#[tokio::test]
async fn test_concurrent_puts() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(SqliteStore::open_with_config(dir.path().join("store.db"), config(7)).unwrap());

    let mut handles = Vec::new();
    for i in 0..8u8 {
        let store = store.clone();
        handles.push(tokio::spawn(async move {
            let id = EntryId::new(format!("entry-{}", i));
            let data = Bytes::from(vec![i; 50 + i as usize]);
            store.put_entry(&id, data).await
        }));
    }
    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.await.unwrap().unwrap(), 50 + i as u64);
    }

    for i in 0..8u8 {
        let id = EntryId::new(format!("entry-{}", i));
        let size = 50 + i as u64;
        assert_eq!(store.entry_size(&id).await.unwrap(), Some(size));
        assert_eq!(store.chunk_count(&id).await.unwrap(), size.div_ceil(7));
    }
}

#[tokio::test]
async fn test_put_existing_entry_fails_without_side_effects() {
    let store = SqliteStore::open_memory_with_config(config(4)).unwrap();
    let id = EntryId::new("dup");

    store.put_entry(&id, Bytes::from_static(b"1234")).await.unwrap();
    let err = store
        .put_entry(&id, Bytes::from_static(b"abcdefgh"))
        .await
        .unwrap_err();
    assert!(matches!(err, StoreError::Database(_)));

    assert_eq!(store.entry_size(&id).await.unwrap(), Some(4));
    assert_eq!(store.chunk_count(&id).await.unwrap(), 1);
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(32))]

    #[test]
    fn test_stored_entry_roundtrip(
        data in prop::collection::vec(any::<u8>(), 0..2048),
        chunk_size in 1usize..300,
    ) {
        let store = SqliteStore::open_memory_with_config(config(chunk_size)).unwrap();
        let id = EntryId::new("prop");

        let written = store.write_entry(&id, &data[..]).unwrap();
        prop_assert_eq!(written, data.len() as u64);

        let chunks = store.with_conn(|conn| Ok(read_chunks(conn, &id))).unwrap();
        let expected = data.len().div_ceil(chunk_size);
        prop_assert_eq!(chunks.len(), expected);
        for (i, (index, _)) in chunks.iter().enumerate() {
            prop_assert_eq!(*index, i as i64);
        }

        let joined: Vec<u8> = chunks.into_iter().flat_map(|(_, c)| c).collect();
        prop_assert_eq!(joined, data);
    }
}
