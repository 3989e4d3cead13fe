//! # entrychunk Testkit
//!
//! Testing utilities for entrychunk.
//!
//! ## Overview
//!
//! This crate provides:
//!
//! - **Generators**: Proptest strategies for payloads, chunk sizes and write splits
//! - **Fixtures**: Sinks that fail on demand and helpers that drive a writer
//!   through a split and collect what it persisted
//!
//! ## Property Testing
//!
//! ```rust,ignore
//! use proptest::prelude::*;
//! use entrychunk_testkit::generators::{chunk_size, payload, split_points};
//! use entrychunk_testkit::fixtures::assemble;
//!
//! proptest! {
//!     #[test]
//!     fn roundtrip(data in payload(512), size in chunk_size(64), cuts in split_points(512)) {
//!         let records = assemble(&data, &cuts, size).unwrap();
//!         let joined: Vec<u8> = records.iter().flat_map(|r| r.chunk.to_vec()).collect();
//!         prop_assert_eq!(joined, data);
//!     }
//! }
//! ```
//!
//! ## Test Fixtures
//!
//! ```rust
//! use entrychunk_testkit::fixtures::{assemble, split_at};
//!
//! let parts = split_at(b"abcdefgh", &[2, 6]);
//! assert_eq!(parts, vec![&b"ab"[..], &b"cdef"[..], &b"gh"[..]]);
//!
//! let records = assemble(b"abcdefgh", &[2, 6], 4).unwrap();
//! assert_eq!(records.len(), 2);
//! ```

pub mod fixtures;
pub mod generators;

pub use fixtures::{assemble, assemble_sqlite, split_at, FailingSink, InjectedFailure, ENTRY};
pub use generators::{chunk_size, payload, split_points, WriteParams};
