//! SQLite-backed EntryStore.
//!
//! Wraps a single connection in `Arc<Mutex<_>>`; async methods run the
//! blocking work on `tokio::task::spawn_blocking`.

use std::io::Read;
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use bytes::Bytes;
use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use entrychunk_core::{EntryId, WriterConfig};

use crate::entries;
use crate::error::{Result, StoreError};
use crate::migration;
use crate::traits::EntryStore;

/// Store configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreConfig {
    /// Chunking applied to every entry written through the store.
    pub writer: WriterConfig,
}

impl StoreConfig {
    pub fn validate(&self) -> Result<()> {
        self.writer.validate().map_err(|size| {
            StoreError::InvalidConfig(format!("chunk_size must be at least 1, got {}", size))
        })
    }
}

/// SQLite-based entry store.
///
/// Thread-safe via internal Mutex.
pub struct SqliteStore {
    conn: Arc<Mutex<Connection>>,
    config: StoreConfig,
}

impl SqliteStore {
    /// Open a SQLite database at the given path with the default config.
    ///
    /// Creates the file and runs migrations if it doesn't exist.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with_config(path, StoreConfig::default())
    }

    /// Open an in-memory SQLite database.
    ///
    /// Useful for testing.
    pub fn open_memory() -> Result<Self> {
        Self::open_memory_with_config(StoreConfig::default())
    }

    pub fn open_with_config(path: impl AsRef<Path>, config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Self::from_connection(Connection::open(path)?, config)
    }

    pub fn open_memory_with_config(config: StoreConfig) -> Result<Self> {
        config.validate()?;
        Self::from_connection(Connection::open_in_memory()?, config)
    }

    fn from_connection(mut conn: Connection, config: StoreConfig) -> Result<Self> {
        migration::migrate(&mut conn)?;
        tracing::debug!(chunk_size = config.writer.chunk_size, "opened sqlite entry store");
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
            config,
        })
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Stream `reader` into a new entry inside one transaction.
    ///
    /// Blocking. Nothing is committed unless the whole reader is consumed
    /// and the final chunk is flushed.
    pub fn write_entry<R: Read>(&self, entry_id: &EntryId, reader: R) -> Result<u64> {
        let mut conn = lock(&self.conn)?;
        write_in_transaction(&mut conn, entry_id, reader, &self.config.writer)
    }

    /// Execute a blocking operation on the connection.
    pub fn with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&Connection) -> Result<T>,
    {
        let conn = lock(&self.conn)?;
        f(&conn)
    }

    /// Run `f` against the shared connection on the blocking pool.
    async fn spawn_with_conn<F, T>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let conn = self.conn.clone();

        tokio::task::spawn_blocking(move || {
            let mut conn = lock(&conn)?;
            f(&mut conn)
        })
        .await
        .map_err(|e| StoreError::Task(format!("spawn_blocking failed: {}", e)))?
    }
}

fn lock(conn: &Mutex<Connection>) -> Result<MutexGuard<'_, Connection>> {
    conn.lock().map_err(|e| {
        StoreError::Database(rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_LOCKED),
            Some(format!("mutex poisoned: {}", e)),
        ))
    })
}

fn write_in_transaction<R: Read>(
    conn: &mut Connection,
    entry_id: &EntryId,
    reader: R,
    config: &WriterConfig,
) -> Result<u64> {
    // Dropping the transaction on an early return rolls it back.
    let tx = conn.transaction()?;
    let written = entries::write_entry(&tx, entry_id, reader, config)?;
    tx.commit()?;
    Ok(written)
}

#[async_trait]
impl EntryStore for SqliteStore {
    async fn put_entry(&self, entry_id: &EntryId, data: Bytes) -> Result<u64> {
        let entry_id = entry_id.clone();
        let config = self.config.writer.clone();

        self.spawn_with_conn(move |conn| write_in_transaction(conn, &entry_id, &data[..], &config))
            .await
    }

    async fn delete_entry(&self, entry_id: &EntryId) -> Result<u64> {
        let entry_id = entry_id.clone();
        self.spawn_with_conn(move |conn| entries::delete_entry(conn, &entry_id))
            .await
    }

    async fn entry_size(&self, entry_id: &EntryId) -> Result<Option<u64>> {
        let entry_id = entry_id.clone();
        self.spawn_with_conn(move |conn| entries::entry_size(conn, &entry_id))
            .await
    }

    async fn chunk_count(&self, entry_id: &EntryId) -> Result<u64> {
        let entry_id = entry_id.clone();
        self.spawn_with_conn(move |conn| entries::chunk_count(conn, &entry_id))
            .await
    }
}
