//! Buffered write handle.
//!
//! Bytes are copied into the internal buffer while they fit. When a write
//! would overflow it, pending bytes are flushed first; a remainder at least
//! as large as the buffer then goes straight to the descriptor from the
//! caller's slice, a smaller one is buffered. Every byte counted in a
//! return value is either buffered or already handed to the descriptor.

use std::path::Path;

use crate::buffer::StreamBuffer;
use crate::config::BufferConfig;
use crate::errno::{EBADF, EINTR, EIO, Errno};
use crate::error::{CloseError, IoError, OpenError};
use crate::fd::{Descriptor, FileDesc};
use crate::file::{OpenFlags, StreamState};

/// Write-only buffered handle over one descriptor.
///
/// Call [`BufferedWriter::close`] to learn whether the final flush reached
/// the file. Dropping the handle flushes on a best-effort basis and
/// discards any failure.
#[derive(Debug)]
pub struct BufferedWriter<D: Descriptor = FileDesc> {
    /// `None` only after `close` took the descriptor.
    inner: Option<D>,
    buffer: StreamBuffer,
    state: StreamState,
}

impl BufferedWriter<FileDesc> {
    /// Create or truncate `path` with the default buffer capacity.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        Self::open_with(path, BufferConfig::default())
    }

    /// Create or truncate `path` with an explicit configuration.
    pub fn open_with(path: impl AsRef<Path>, config: BufferConfig) -> Result<Self, OpenError> {
        let fd = FileDesc::open(path.as_ref(), OpenFlags::write())?;
        Ok(Self::from_descriptor(fd, config))
    }
}

impl<D: Descriptor> BufferedWriter<D> {
    /// Wrap an already-open descriptor. The buffer starts empty.
    pub fn from_descriptor(inner: D, config: BufferConfig) -> Self {
        Self {
            inner: Some(inner),
            buffer: StreamBuffer::new(config.capacity()),
            state: StreamState::Open,
        }
    }

    /// Accept up to `src.len()` bytes.
    ///
    /// A count below `src.len()` is a short write: the descriptor stopped
    /// accepting bytes. An error is returned only when nothing from `src`
    /// was accepted; an error after partial acceptance is reported by the
    /// next call through [`IoError::Errored`].
    pub fn write(&mut self, src: &[u8]) -> Result<usize, IoError> {
        self.state.check()?;
        if src.is_empty() {
            return Ok(0);
        }

        if src.len() <= self.buffer.write_space() {
            return Ok(self.buffer.buffer_write(src));
        }

        match self.drain_pending() {
            Ok(true) => {}
            // Descriptor is full; keep whatever still fits.
            Ok(false) => return Ok(self.buffer.buffer_write(src)),
            Err(errno) => return Err(self.fail(errno)),
        }

        if src.len() < self.buffer.capacity() {
            return Ok(self.buffer.buffer_write(src));
        }

        let Some(inner) = self.inner.as_mut() else {
            return Err(self.fail(EBADF));
        };
        let (written, error) = write_retrying(inner, src);
        match error {
            Some(errno) if written == 0 => Err(self.fail(errno)),
            Some(errno) => {
                self.fail(errno);
                Ok(written)
            }
            None => Ok(written),
        }
    }

    /// Push all buffered bytes to the descriptor.
    ///
    /// A descriptor that stops accepting bytes yields `EIO` without marking
    /// the handle errored; the unflushed tail stays buffered.
    pub fn flush(&mut self) -> Result<(), IoError> {
        self.state.check()?;
        match self.drain_pending() {
            Ok(true) => Ok(()),
            Ok(false) => Err(IoError::os(EIO)),
            Err(errno) => Err(self.fail(errno)),
        }
    }

    /// Bytes buffered and not yet written.
    pub fn pending(&self) -> usize {
        self.buffer.pending_write_data().len()
    }

    /// Internal buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Current stream state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Flush buffered bytes, then release the descriptor and the buffer.
    ///
    /// The descriptor is released even when the flush fails. A flush
    /// failure takes precedence over a close failure in the result.
    pub fn close(mut self) -> Result<(), CloseError> {
        let flushed = match self.drain_pending() {
            Ok(true) => Ok(()),
            Ok(false) => Err(EIO),
            Err(errno) => Err(errno),
        };
        let closed = self.inner.take().map_or(Ok(()), Descriptor::close);

        match (flushed, closed) {
            (Err(errno), _) => Err(CloseError::Flush {
                errno: Errno(errno),
            }),
            (Ok(()), Err(errno)) => Err(CloseError::Close {
                errno: Errno(errno),
            }),
            (Ok(()), Ok(())) => Ok(()),
        }
    }

    /// Write out as much pending data as the descriptor takes.
    ///
    /// `Ok(true)` when the buffer is empty afterwards.
    fn drain_pending(&mut self) -> Result<bool, i32> {
        if !self.buffer.has_pending() {
            return Ok(true);
        }
        let Some(inner) = self.inner.as_mut() else {
            return Err(EBADF);
        };
        let (written, error) = write_retrying(inner, self.buffer.pending_write_data());
        self.buffer.consume_flushed(written);
        match error {
            Some(errno) => Err(errno),
            None => Ok(!self.buffer.has_pending()),
        }
    }

    fn fail(&mut self, errno: i32) -> IoError {
        self.state = StreamState::Errored {
            errno: Errno(errno),
        };
        IoError::os(errno)
    }
}

impl<D: Descriptor> Drop for BufferedWriter<D> {
    fn drop(&mut self) {
        if self.inner.is_some() {
            let _ = self.drain_pending();
        }
    }
}

impl<D: Descriptor> std::io::Write for BufferedWriter<D> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        BufferedWriter::write(self, buf).map_err(Into::into)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        BufferedWriter::flush(self).map_err(Into::into)
    }
}

/// Hand `data` to the descriptor until it is all written, the descriptor
/// accepts zero bytes, or it fails with something other than `EINTR`.
///
/// Returns the bytes written and the terminating errno, if any.
fn write_retrying<D: Descriptor>(inner: &mut D, data: &[u8]) -> (usize, Option<i32>) {
    let mut written = 0;
    while written < data.len() {
        match inner.write(&data[written..]) {
            Ok(0) => break,
            Ok(n) => written += n.min(data.len() - written),
            Err(EINTR) => continue,
            Err(errno) => return (written, Some(errno)),
        }
    }
    (written, None)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
