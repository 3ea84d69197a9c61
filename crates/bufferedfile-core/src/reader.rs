//! Buffered read handle.
//!
//! A read call is served from buffered bytes when any remain. Otherwise it
//! performs exactly one underlying read: straight into the caller's slice
//! when that slice is at least as large as the internal buffer, into the
//! internal buffer otherwise. Short reads are normal; `Ok(0)` is end of
//! stream.

use std::path::Path;

use crate::buffer::StreamBuffer;
use crate::config::BufferConfig;
use crate::errno::{EINTR, Errno};
use crate::error::{IoError, OpenError};
use crate::fd::{Descriptor, FileDesc};
use crate::file::{OpenFlags, StreamState};

/// Read-only buffered handle over one descriptor.
#[derive(Debug)]
pub struct BufferedReader<D: Descriptor = FileDesc> {
    inner: D,
    buffer: StreamBuffer,
    state: StreamState,
}

impl BufferedReader<FileDesc> {
    /// Open `path` for reading with the default buffer capacity.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, OpenError> {
        Self::open_with(path, BufferConfig::default())
    }

    /// Open `path` for reading with an explicit configuration.
    pub fn open_with(path: impl AsRef<Path>, config: BufferConfig) -> Result<Self, OpenError> {
        let fd = FileDesc::open(path.as_ref(), OpenFlags::read())?;
        Ok(Self::from_descriptor(fd, config))
    }
}

impl<D: Descriptor> BufferedReader<D> {
    /// Wrap an already-open descriptor. The buffer starts empty.
    pub fn from_descriptor(inner: D, config: BufferConfig) -> Self {
        Self {
            inner,
            buffer: StreamBuffer::new(config.capacity()),
            state: StreamState::Open,
        }
    }

    /// Copy up to `dst.len()` bytes into `dst`.
    ///
    /// Returns the number of bytes copied; `Ok(0)` for a non-empty `dst`
    /// means end of stream. After an error the handle stays errored and
    /// every later call fails with [`IoError::Errored`].
    pub fn read(&mut self, dst: &mut [u8]) -> Result<usize, IoError> {
        self.state.check()?;
        if dst.is_empty() {
            return Ok(0);
        }

        let copied = self.buffer.read_into(dst);
        if copied > 0 {
            return Ok(copied);
        }

        // Large request with an empty buffer: skip the intermediate copy.
        if dst.len() >= self.buffer.capacity() {
            return read_retrying(&mut self.inner, dst).map_err(|errno| self.fail(errno));
        }

        let inner = &mut self.inner;
        match self.buffer.refill(|space| read_retrying(inner, space)) {
            Ok(0) => Ok(0),
            Ok(_) => Ok(self.buffer.read_into(dst)),
            Err(errno) => Err(self.fail(errno)),
        }
    }

    /// Bytes currently buffered and not yet handed out.
    pub fn buffered(&self) -> usize {
        self.buffer.readable()
    }

    /// Internal buffer capacity.
    pub fn capacity(&self) -> usize {
        self.buffer.capacity()
    }

    /// Current stream state.
    pub fn state(&self) -> StreamState {
        self.state
    }

    /// Release the descriptor and the buffer.
    ///
    /// Close failures are not reported: a read-only descriptor has nothing
    /// left to lose.
    pub fn close(self) {
        let _ = self.inner.close();
    }

    fn fail(&mut self, errno: i32) -> IoError {
        self.state = StreamState::Errored {
            errno: Errno(errno),
        };
        IoError::os(errno)
    }
}

impl<D: Descriptor> std::io::Read for BufferedReader<D> {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        BufferedReader::read(self, buf).map_err(Into::into)
    }
}

/// One underlying read, reissued only when interrupted.
fn read_retrying<D: Descriptor>(inner: &mut D, buf: &mut [u8]) -> Result<usize, i32> {
    loop {
        match inner.read(buf) {
            Err(EINTR) => continue,
            other => return other,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errno::EIO;
    use std::collections::VecDeque;

    /// Scripted descriptor: each read pops one step.
    #[derive(Debug, Default)]
    struct Script {
        steps: VecDeque<Result<Vec<u8>, i32>>,
        reads: usize,
        largest_request: usize,
    }

    fn ok(bytes: &[u8]) -> Result<Vec<u8>, i32> {
        Ok(bytes.to_vec())
    }

    impl Descriptor for Script {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, i32> {
            self.reads += 1;
            self.largest_request = self.largest_request.max(buf.len());
            match self.steps.pop_front() {
                None => Ok(0),
                Some(Err(errno)) => Err(errno),
                Some(Ok(chunk)) => {
                    let n = chunk.len().min(buf.len());
                    buf[..n].copy_from_slice(&chunk[..n]);
                    if n < chunk.len() {
                        self.steps.push_front(Ok(chunk[n..].to_vec()));
                    }
                    Ok(n)
                }
            }
        }

        fn write(&mut self, _buf: &[u8]) -> Result<usize, i32> {
            Err(crate::errno::EBADF)
        }

        fn close(self) -> Result<(), i32> {
            Ok(())
        }
    }

    fn reader(steps: Vec<Result<Vec<u8>, i32>>, capacity: usize) -> BufferedReader<Script> {
        let script = Script {
            steps: steps.into(),
            ..Default::default()
        };
        BufferedReader::from_descriptor(script, BufferConfig::with_capacity(capacity))
    }

    #[test]
    fn test_four_byte_reads_of_ten_bytes() {
        let data: Vec<u8> = (0..10).collect();
        let mut r = reader(vec![ok(&data)], 64);
        let mut buf = [0u8; 4];

        assert_eq!(r.read(&mut buf).unwrap(), 4);
        assert_eq!(buf, [0, 1, 2, 3]);
        assert_eq!(r.read(&mut buf).unwrap(), 4);
        assert_eq!(buf, [4, 5, 6, 7]);
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], &[8, 9]);
        assert_eq!(r.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_buffered_bytes_served_without_io() {
        let mut r = reader(vec![ok(b"abcdef")], 64);
        let mut one = [0u8; 1];
        r.read(&mut one).unwrap();
        assert_eq!(r.inner.reads, 1);
        assert_eq!(r.buffered(), 5);
        let mut rest = [0u8; 5];
        assert_eq!(r.read(&mut rest).unwrap(), 5);
        assert_eq!(&rest, b"bcdef");
        assert_eq!(r.inner.reads, 1);
    }

    #[test]
    fn test_refill_requests_at_most_capacity() {
        let big = vec![7u8; 100];
        let mut r = reader(vec![ok(&big)], 16);
        let mut buf = [0u8; 4];
        r.read(&mut buf).unwrap();
        assert_eq!(r.inner.largest_request, 16);
        assert_eq!(r.buffered(), 12);
    }

    #[test]
    fn test_large_request_bypasses_buffer() {
        let big = vec![1u8; 40];
        let mut r = reader(vec![ok(&big)], 8);
        let mut dst = [0u8; 32];
        assert_eq!(r.read(&mut dst).unwrap(), 32);
        assert_eq!(r.buffered(), 0);
        assert_eq!(r.inner.largest_request, 32);
    }

    #[test]
    fn test_zero_length_read_does_no_io() {
        let mut r = reader(vec![ok(b"abc")], 8);
        assert_eq!(r.read(&mut []).unwrap(), 0);
        assert_eq!(r.inner.reads, 0);
    }

    #[test]
    fn test_empty_stream_returns_zero() {
        let mut r = reader(vec![], 8);
        let mut buf = [0u8; 8];
        assert_eq!(r.read(&mut buf).unwrap(), 0);
    }

    #[test]
    fn test_eintr_is_retried() {
        let mut r = reader(vec![Err(EINTR), ok(b"xy")], 8);
        let mut buf = [0u8; 8];
        assert_eq!(r.read(&mut buf).unwrap(), 2);
        assert_eq!(&buf[..2], b"xy");
    }

    #[test]
    fn test_error_marks_handle_errored() {
        let mut r = reader(vec![Err(EIO), ok(b"never")], 8);
        let mut buf = [0u8; 4];
        assert_eq!(r.read(&mut buf), Err(IoError::os(EIO)));
        assert!(r.state().is_errored());
        assert_eq!(
            r.read(&mut buf),
            Err(IoError::Errored { errno: Errno(EIO) })
        );
        // The scripted success was never consumed.
        assert_eq!(r.inner.reads, 1);
        r.close();
    }

    #[test]
    fn test_never_returns_more_than_requested() {
        let data = vec![9u8; 50];
        let mut r = reader(vec![ok(&data)], 8);
        for len in [0usize, 1, 3, 7, 8, 9, 20] {
            let mut buf = vec![0u8; len];
            let n = r.read(&mut buf).unwrap();
            assert!(n <= len, "read returned {n} for a {len}-byte buffer");
        }
    }

    #[test]
    fn test_std_read_to_end() {
        use std::io::Read;
        let mut r = reader(vec![ok(b"hello "), ok(b"world")], 4);
        let mut out = Vec::new();
        r.read_to_end(&mut out).unwrap();
        assert_eq!(out, b"hello world");
    }
}
