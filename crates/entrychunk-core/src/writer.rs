//! ChunkWriter: re-chunks an incrementally written byte stream.
//!
//! The writer owns a single buffer of `chunk_size` bytes. The fill offset is
//! always `written % chunk_size`, so partial chunks carry over between write
//! calls of any size. Each time the buffer fills it is flushed to the sink as
//! chunk `written / chunk_size`; `close` flushes the trailing remainder.
//!
//! ```text
//!   chunk_size = 4, writes "ab" "cdef" "gh"
//!
//!   write("ab")    buf=[ab__]                      written=2
//!   write("cdef")  buf=[abcd] -> insert(0, "abcd")
//!                  buf=[ef__]                      written=6
//!   write("gh")    buf=[efgh] -> insert(1, "efgh") written=8
//!   close()        8 % 4 == 0, nothing to flush
//! ```

use std::fmt;
use std::io;

use crate::config::WriterConfig;
use crate::error::{Result, WriterError};
use crate::sink::ChunkSink;
use crate::types::EntryId;

/// Lifecycle of a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WriterState {
    /// Accepting writes.
    Open,
    /// `close` completed; terminal.
    Closed,
    /// A sink insert failed; terminal.
    Failed,
}

/// Buffers writes for one entry and flushes them as fixed-size chunks.
///
/// Not safe for concurrent use: one producer drives a sequence of writes
/// followed by exactly one [`close`](Self::close). The writer never commits
/// or rolls back anything; a failed stream must be discarded by the caller
/// together with whatever transaction backs the sink.
pub struct ChunkWriter<S: ChunkSink> {
    sink: S,
    entry_id: EntryId,
    buf: Box<[u8]>,
    /// Total bytes accepted, including those still buffered.
    written: u64,
    /// Chunks successfully handed to the sink.
    chunks: u64,
    state: WriterState,
}

impl<S: ChunkSink> ChunkWriter<S> {
    /// Create a writer for `entry_id` that flushes `chunk_size`-byte chunks.
    ///
    /// Fails with [`WriterError::InvalidChunkSize`] when `chunk_size` is 0.
    pub fn new(sink: S, entry_id: EntryId, chunk_size: usize) -> Result<Self, S::Error> {
        if chunk_size == 0 {
            return Err(WriterError::InvalidChunkSize(chunk_size));
        }

        Ok(Self {
            sink,
            entry_id,
            buf: vec![0u8; chunk_size].into_boxed_slice(),
            written: 0,
            chunks: 0,
            state: WriterState::Open,
        })
    }

    /// Create a writer using the chunk size from `config`.
    pub fn with_config(sink: S, entry_id: EntryId, config: &WriterConfig) -> Result<Self, S::Error> {
        Self::new(sink, entry_id, config.chunk_size)
    }

    /// Append `data` to the entry, flushing every chunk it completes.
    ///
    /// Returns `data.len()` on success. An empty slice is a no-op.
    pub fn write(&mut self, data: &[u8]) -> Result<usize, S::Error> {
        self.ensure_open()?;

        let mut remaining = data;
        while !remaining.is_empty() {
            let start = self.offset();
            let copy_size = (self.buf.len() - start).min(remaining.len());
            let end = start + copy_size;

            self.buf[start..end].copy_from_slice(&remaining[..copy_size]);
            if end == self.buf.len() {
                self.flush_chunk(end)?;
            }

            self.written += copy_size as u64;
            remaining = &remaining[copy_size..];
        }

        Ok(data.len())
    }

    /// Flush the trailing partial chunk, if any, and finish the entry.
    ///
    /// Returns the total number of bytes written. Calling this a second time,
    /// or after a failed insert, is an error.
    pub fn close(&mut self) -> Result<u64, S::Error> {
        self.ensure_open()?;

        let unflushed = self.offset();
        if unflushed != 0 {
            self.flush_chunk(unflushed)?;
        }
        self.state = WriterState::Closed;

        tracing::debug!(
            entry_id = %self.entry_id,
            written = self.written,
            chunks = self.chunks,
            "closed chunk writer"
        );
        Ok(self.written)
    }

    /// The entry this writer is assembling.
    pub fn entry_id(&self) -> &EntryId {
        &self.entry_id
    }

    /// Size of a full chunk.
    pub fn chunk_size(&self) -> usize {
        self.buf.len()
    }

    /// Total bytes accepted so far.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Number of chunks inserted into the sink so far.
    pub fn chunks_flushed(&self) -> u64 {
        self.chunks
    }

    /// Bytes accepted but not yet flushed.
    pub fn buffered(&self) -> usize {
        match self.state {
            WriterState::Open => self.offset(),
            WriterState::Closed | WriterState::Failed => 0,
        }
    }

    pub fn state(&self) -> WriterState {
        self.state
    }

    pub fn is_closed(&self) -> bool {
        self.state == WriterState::Closed
    }

    /// Borrow the sink.
    pub fn sink(&self) -> &S {
        &self.sink
    }

    fn ensure_open(&self) -> Result<(), S::Error> {
        match self.state {
            WriterState::Open => Ok(()),
            WriterState::Closed => Err(WriterError::Closed),
            WriterState::Failed => Err(WriterError::Failed),
        }
    }

    fn offset(&self) -> usize {
        (self.written % self.buf.len() as u64) as usize
    }

    /// Insert the first `n` buffered bytes. Must run before those bytes are
    /// counted in `written`.
    fn flush_chunk(&mut self, n: usize) -> Result<(), S::Error> {
        let chunk_index = self.written / self.buf.len() as u64;

        if let Err(e) = self
            .sink
            .insert_chunk(&self.entry_id, chunk_index, &self.buf[..n])
        {
            tracing::warn!(
                "Chunk insert failed for entry {} at index {}: {}",
                self.entry_id,
                chunk_index,
                e
            );
            self.state = WriterState::Failed;
            return Err(WriterError::Sink(e));
        }

        self.chunks += 1;
        tracing::debug!(
            entry_id = %self.entry_id,
            chunk_index,
            len = n,
            "flushed chunk"
        );
        Ok(())
    }
}

impl<S: ChunkSink> io::Write for ChunkWriter<S> {
    /// If an insert fails after earlier chunks of `buf` were already handed
    /// to the sink, those bytes are reported as written and the writer is
    /// left `Failed`, so the next call returns the error.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let before = self.written;
        match ChunkWriter::write(self, buf) {
            Ok(n) => Ok(n),
            Err(WriterError::Sink(_)) if self.written > before => {
                Ok((self.written - before) as usize)
            }
            Err(e) => Err(e.into()),
        }
    }

    /// No-op: only full chunks are emitted before `close`.
    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<S: ChunkSink> fmt::Debug for ChunkWriter<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChunkWriter")
            .field("entry_id", &self.entry_id)
            .field("chunk_size", &self.buf.len())
            .field("written", &self.written)
            .field("chunks", &self.chunks)
            .field("state", &self.state)
            .finish()
    }
}

impl<S: ChunkSink> Drop for ChunkWriter<S> {
    fn drop(&mut self) {
        if self.state == WriterState::Open && self.offset() != 0 {
            tracing::warn!(
                "Chunk writer for entry {} dropped without close; {} buffered bytes discarded",
                self.entry_id,
                self.offset()
            );
        }
    }
}
