//! # entrychunk Store
//!
//! SQLite persistence for entry data. An entry's bytes live in the
//! `entries_data` table as `(id, chunk_index, chunk)` rows written by a
//! [`ChunkWriter`](entrychunk_core::ChunkWriter).
//!
//! ## Key Types
//!
//! - [`SqliteChunkSink`] - `ChunkSink` over a borrowed connection or transaction
//! - [`SqliteStore`] - Owns a connection, writes each entry in one transaction
//! - [`EntryStore`] - The async trait `SqliteStore` implements
//!
//! ## Usage
//!
//! Inside a transaction you manage yourself:
//!
//! ```rust
//! use entrychunk_core::{ChunkWriter, EntryId};
//! use entrychunk_store::{migration, SqliteChunkSink};
//! use rusqlite::Connection;
//!
//! let mut conn = Connection::open_in_memory().unwrap();
//! migration::migrate(&mut conn).unwrap();
//!
//! let tx = conn.transaction().unwrap();
//! let mut writer = ChunkWriter::new(SqliteChunkSink::new(&tx), EntryId::new("abc"), 4).unwrap();
//! writer.write(b"hello world").unwrap();
//! writer.close().unwrap();
//! drop(writer);
//! tx.commit().unwrap();
//! ```
//!
//! Or let the store handle it:
//!
//! ```rust,no_run
//! use entrychunk_core::EntryId;
//! use entrychunk_store::SqliteStore;
//!
//! let store = SqliteStore::open("entries.db").unwrap();
//! let file = std::fs::File::open("upload.bin").unwrap();
//! store.write_entry(&EntryId::new("abc"), file).unwrap();
//! ```

pub mod entries;
pub mod error;
pub mod migration;
pub mod sink;
pub mod sqlite;
pub mod traits;

pub use error::{Result, StoreError};
pub use sink::SqliteChunkSink;
pub use sqlite::{SqliteStore, StoreConfig};
pub use traits::EntryStore;
