//! # entrychunk Core
//!
//! Chunked stream-to-storage primitives.
//!
//! An entry is an arbitrary-length byte stream written incrementally. The
//! [`ChunkWriter`] re-chunks whatever write pattern it receives into
//! fixed-size, zero-indexed chunks and hands each one to a [`ChunkSink`].
//!
//! This crate performs no storage itself. The sink is a caller-supplied
//! capability (typically an open database transaction); see the
//! `entrychunk-store` crate for the SQLite implementation.
//!
//! ## Key Types
//!
//! - [`ChunkWriter`] - Buffers writes and flushes fixed-size chunks
//! - [`ChunkSink`] - The persistence capability a writer flushes into
//! - [`MemorySink`] - In-memory sink for tests
//! - [`EntryId`] - Opaque identifier of the stream being assembled
//! - [`WriterConfig`] - Chunk size configuration
//!
//! ## Usage
//!
//! ```rust
//! use entrychunk_core::{ChunkWriter, EntryId, MemorySink};
//!
//! let sink = MemorySink::new();
//! let mut writer = ChunkWriter::new(&sink, EntryId::new("abc123"), 4).unwrap();
//!
//! writer.write(b"ab").unwrap();
//! writer.write(b"cdef").unwrap();
//! writer.write(b"gh").unwrap();
//! writer.close().unwrap();
//!
//! assert_eq!(sink.concat(&EntryId::new("abc123")), b"abcdefgh");
//! assert_eq!(sink.len(), 2);
//! ```

pub mod config;
pub mod error;
pub mod memory;
pub mod sink;
pub mod types;
pub mod writer;

pub use config::{WriterConfig, DEFAULT_CHUNK_SIZE};
pub use error::{Result, WriterError};
pub use memory::{MemorySink, MemorySinkError};
pub use sink::ChunkSink;
pub use types::{ChunkRecord, EntryId};
pub use writer::{ChunkWriter, WriterState};
