//! Buffer configuration.
//!
//! The only tunable is the buffer capacity. There is no environment lookup:
//! callers that want a different size pass a config explicitly.

use crate::buffer::BUFSIZ;

/// Per-handle buffering configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BufferConfig {
    capacity: usize,
}

impl BufferConfig {
    /// Config with the given capacity, clamped to at least one byte.
    #[must_use]
    pub const fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: if capacity == 0 { 1 } else { capacity },
        }
    }

    /// Buffer capacity in bytes.
    #[must_use]
    pub const fn capacity(self) -> usize {
        self.capacity
    }
}

impl Default for BufferConfig {
    fn default() -> Self {
        Self::with_capacity(BUFSIZ)
    }
}
