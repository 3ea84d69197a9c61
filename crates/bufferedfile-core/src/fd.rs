//! Owned file descriptors.
//!
//! [`Descriptor`] is the seam between the buffering logic and the OS: one
//! raw read, one raw write, one close. [`FileDesc`] is the production
//! implementation over a Unix fd; tests substitute scripted descriptors.

use std::ffi::CString;
use std::os::unix::ffi::OsStrExt;
use std::path::Path;

use crate::errno::EINTR;
use crate::error::OpenError;
use crate::file::{CREATE_MODE, OpenFlags};
use crate::syscall;

/// A single-owner byte stream with C-style error reporting (errno values).
pub trait Descriptor {
    /// One underlying read. `Ok(0)` is end of stream.
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, i32>;

    /// One underlying write. May accept fewer bytes than offered.
    fn write(&mut self, buf: &[u8]) -> Result<usize, i32>;

    /// Release the resource.
    fn close(self) -> Result<(), i32>
    where
        Self: Sized;
}

/// An open Unix file descriptor, closed on drop.
#[derive(Debug)]
pub struct FileDesc {
    fd: i32,
}

impl FileDesc {
    /// Open `path` with the given flags.
    ///
    /// Empty paths and paths containing NUL bytes are rejected without a
    /// system call.
    pub fn open(path: &Path, flags: OpenFlags) -> Result<Self, OpenError> {
        let bytes = path.as_os_str().as_bytes();
        if bytes.is_empty() {
            return Err(OpenError::InvalidPath);
        }
        let c_path = CString::new(bytes).map_err(|_| OpenError::InvalidPath)?;
        loop {
            match syscall::sys_open(&c_path, flags.to_oflags(), CREATE_MODE) {
                Ok(fd) => return Ok(Self { fd }),
                Err(EINTR) => continue,
                Err(errno) => return Err(OpenError::from_errno(errno)),
            }
        }
    }

    /// Raw descriptor number.
    pub fn fd(&self) -> i32 {
        self.fd
    }
}

impl Descriptor for FileDesc {
    fn read(&mut self, buf: &mut [u8]) -> Result<usize, i32> {
        syscall::read_into(self.fd, buf)
    }

    fn write(&mut self, buf: &[u8]) -> Result<usize, i32> {
        syscall::write_from(self.fd, buf)
    }

    fn close(self) -> Result<(), i32> {
        let fd = self.fd;
        std::mem::forget(self);
        close_fd(fd)
    }
}

impl Drop for FileDesc {
    fn drop(&mut self) {
        let _ = close_fd(self.fd);
    }
}

/// Close `fd` exactly once.
///
/// `EINTR` is not surfaced and `close(2)` is not reissued: Linux releases the
/// descriptor before reporting the interruption, so a second call could
/// close an unrelated fd opened by another thread.
fn close_fd(fd: i32) -> Result<(), i32> {
    match syscall::sys_close(fd) {
        Ok(()) | Err(EINTR) => Ok(()),
        Err(errno) => Err(errno),
    }
}
