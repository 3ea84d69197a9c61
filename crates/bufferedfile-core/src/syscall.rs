//! Typed syscall veneer over `libc`.
//!
//! Each wrapper issues exactly one system call and converts the C return
//! convention (`-1` plus `errno`) into `Result<_, i32>` carrying the errno.
//! Retrying on `EINTR` is left to the callers, which know whether a retry is
//! meaningful for their operation.
//!
//! # Safety
//!
//! The raw-pointer wrappers are `unsafe` because the kernel trusts the caller
//! to supply valid buffers. Typed wrappers cannot verify pointer validity;
//! that remains the caller's responsibility.

use std::ffi::CStr;

use crate::errno::EIO;

/// Fetch the calling thread's errno after a failed libc call.
#[inline]
fn last_errno() -> i32 {
    std::io::Error::last_os_error()
        .raw_os_error()
        .unwrap_or(EIO)
}

/// Convert a `ssize_t`-style return into `Result<usize, errno>`.
#[inline]
fn size_result(ret: isize) -> Result<usize, i32> {
    if ret < 0 {
        Err(last_errno())
    } else {
        Ok(ret as usize)
    }
}

/// `open(path, flags, mode)`: open a file relative to the working directory.
#[inline]
pub fn sys_open(path: &CStr, flags: i32, mode: u32) -> Result<i32, i32> {
    // SAFETY: `path` is a valid NUL-terminated string for the duration of the call.
    let fd = unsafe { libc::open(path.as_ptr(), flags, mode as libc::c_uint) };
    if fd < 0 { Err(last_errno()) } else { Ok(fd) }
}

/// `read(fd, buf, count)`: read from a file descriptor.
///
/// # Safety
///
/// `buf` must point to a writable region of at least `count` bytes.
#[inline]
pub unsafe fn sys_read(fd: i32, buf: *mut u8, count: usize) -> Result<usize, i32> {
    // SAFETY: caller guarantees buf validity and count bounds.
    let ret = unsafe { libc::read(fd, buf.cast(), count) };
    size_result(ret)
}

/// `write(fd, buf, count)`: write to a file descriptor.
///
/// # Safety
///
/// `buf` must point to a readable region of at least `count` bytes.
#[inline]
pub unsafe fn sys_write(fd: i32, buf: *const u8, count: usize) -> Result<usize, i32> {
    // SAFETY: caller guarantees buf validity and count bounds.
    let ret = unsafe { libc::write(fd, buf.cast(), count) };
    size_result(ret)
}

/// `close(fd)`: close a file descriptor.
#[inline]
pub fn sys_close(fd: i32) -> Result<(), i32> {
    // SAFETY: close is safe to call on any fd value (bad fd just returns EBADF).
    let ret = unsafe { libc::close(fd) };
    if ret < 0 { Err(last_errno()) } else { Ok(()) }
}

/// Slice-based `read`.
#[inline]
pub fn read_into(fd: i32, buf: &mut [u8]) -> Result<usize, i32> {
    // SAFETY: the slice is a valid writable region of exactly `buf.len()` bytes.
    unsafe { sys_read(fd, buf.as_mut_ptr(), buf.len()) }
}

/// Slice-based `write`.
#[inline]
pub fn write_from(fd: i32, buf: &[u8]) -> Result<usize, i32> {
    // SAFETY: the slice is a valid readable region of exactly `buf.len()` bytes.
    unsafe { sys_write(fd, buf.as_ptr(), buf.len()) }
}
