//! Writer configuration.

use serde::{Deserialize, Serialize};

/// Default chunk size: 32 MiB.
pub const DEFAULT_CHUNK_SIZE: usize = 32 << 20;

/// Configuration for a [`ChunkWriter`](crate::ChunkWriter).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WriterConfig {
    /// Size in bytes of every chunk except possibly an entry's last one.
    pub chunk_size: usize,
}

impl WriterConfig {
    /// Create a config with the given chunk size.
    pub fn with_chunk_size(chunk_size: usize) -> Self {
        Self { chunk_size }
    }

    /// Check the config is usable. Returns the offending chunk size on failure.
    pub fn validate(&self) -> Result<(), usize> {
        if self.chunk_size == 0 {
            return Err(self.chunk_size);
        }
        Ok(())
    }
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
        }
    }
}
