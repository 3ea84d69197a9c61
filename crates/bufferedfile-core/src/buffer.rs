//! Fixed-capacity stream buffer.
//!
//! One buffer serves exactly one direction for its whole life: a reader
//! uses the read cursor (`pos` within `filled` valid bytes), a writer uses
//! `pos` as the fill level of pending output. The capacity is chosen at
//! creation and never changes.

/// Default buffer size (POSIX BUFSIZ).
pub const BUFSIZ: usize = 8192;

/// Stream buffer state for a single direction (read or write).
///
/// Invariants:
/// - `pos <= filled <= data.len()` on the read side
/// - `pos <= data.len()` on the write side
/// - `data.len()` is fixed at creation and at least 1
#[derive(Debug)]
pub struct StreamBuffer {
    data: Vec<u8>,
    /// Read cursor (reader) or fill level (writer).
    pos: usize,
    /// Number of valid bytes in the buffer (read side only).
    filled: usize,
}

impl StreamBuffer {
    /// Create a new buffer with the given capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        Self {
            data: vec![0u8; capacity.max(1)],
            pos: 0,
            filled: 0,
        }
    }

    /// Buffer capacity.
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Reset the buffer (discard all pending data).
    pub fn reset(&mut self) {
        self.pos = 0;
        self.filled = 0;
    }

    // -----------------------------------------------------------------------
    // Read-side operations
    // -----------------------------------------------------------------------

    /// Number of buffered bytes available for reading.
    pub fn readable(&self) -> usize {
        self.filled - self.pos
    }

    /// Copy up to `dst.len()` buffered bytes into `dst`, advancing the cursor.
    ///
    /// Returns the number of bytes copied. Zero means the caller must refill.
    pub fn read_into(&mut self, dst: &mut [u8]) -> usize {
        let take = dst.len().min(self.readable());
        dst[..take].copy_from_slice(&self.data[self.pos..self.pos + take]);
        self.pos += take;
        take
    }

    /// Refill the read buffer from `source`, which is handed the whole
    /// backing storage and returns how many bytes it produced.
    ///
    /// Any unread bytes are discarded, so callers only refill once
    /// `readable()` is zero. On error the buffer is left empty.
    pub fn refill<E>(
        &mut self,
        source: impl FnOnce(&mut [u8]) -> Result<usize, E>,
    ) -> Result<usize, E> {
        self.reset();
        let n = source(&mut self.data)?;
        self.filled = n.min(self.data.len());
        Ok(self.filled)
    }

    // -----------------------------------------------------------------------
    // Write-side operations
    // -----------------------------------------------------------------------

    /// Free space left before a flush is forced.
    pub fn write_space(&self) -> usize {
        self.data.len() - self.pos
    }

    /// Whether the write side holds any unflushed bytes.
    pub fn has_pending(&self) -> bool {
        self.pos > 0
    }

    /// Append as much of `data` as fits. Returns the number of bytes taken.
    pub fn buffer_write(&mut self, data: &[u8]) -> usize {
        let take = data.len().min(self.write_space());
        self.data[self.pos..self.pos + take].copy_from_slice(&data[..take]);
        self.pos += take;
        take
    }

    /// Pending buffered write data that needs flushing.
    pub fn pending_write_data(&self) -> &[u8] {
        &self.data[..self.pos]
    }

    /// Drop the first `count` pending bytes after a (possibly partial) flush,
    /// keeping the rest at the front of the buffer in order.
    pub fn consume_flushed(&mut self, count: usize) {
        let count = count.min(self.pos);
        if count == self.pos {
            self.pos = 0;
            return;
        }
        self.data.copy_within(count..self.pos, 0);
        self.pos -= count;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
