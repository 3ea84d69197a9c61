//! ABI layer for buffered file handles.
//!
//! Handles cross the boundary as opaque pointers to boxed core types. Open
//! boxes a handle and leaks it to the caller; close reclaims the box, which
//! releases the descriptor and buffer exactly once. Failures return a null
//! handle or a negative code and record the error in the last-error slot.

use std::ffi::{CStr, OsStr, c_char};
use std::os::unix::ffi::OsStrExt;
use std::path::Path;
use std::ptr;

use bufferedfile_core::{BufferedReader, BufferedWriter};

use crate::error_abi::{AbiError, set_last_error};

/// Opaque read handle (`FileReader` in the C header).
pub type FileReader = *mut BufferedReader;

/// Opaque write handle (`FileWriter` in the C header).
pub type FileWriter = *mut BufferedWriter;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

#[inline]
fn fail(err: AbiError) -> i64 {
    set_last_error(err).into()
}

/// Borrow a C path as a filesystem path. Bytes are taken as-is; no UTF-8
/// requirement.
///
/// # Safety
///
/// A non-null `path` must be NUL-terminated and valid for the call.
unsafe fn path_arg<'a>(path: *const c_char) -> Result<&'a Path, AbiError> {
    if path.is_null() {
        return Err(AbiError::InvalidPointer);
    }
    // SAFETY: caller guarantees a NUL-terminated string.
    let bytes = unsafe { CStr::from_ptr(path) }.to_bytes();
    if bytes.is_empty() {
        return Err(AbiError::InvalidPath);
    }
    Ok(Path::new(OsStr::from_bytes(bytes)))
}

/// Length must be representable in the `int64_t` result.
#[inline]
fn check_len(len: usize) -> Result<(), AbiError> {
    if i64::try_from(len).is_err() {
        return Err(AbiError::BufferTooLong);
    }
    Ok(())
}

#[inline]
fn transferred(n: usize) -> i64 {
    // n <= buffer_len, which check_len bounded.
    i64::try_from(n).unwrap_or(i64::MAX)
}

// ---------------------------------------------------------------------------
// Open
// ---------------------------------------------------------------------------

/// Open `path` for buffered reading. Null on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_open_read(path: *const c_char) -> FileReader {
    // SAFETY: forwarded caller contract.
    let opened = unsafe { path_arg(path) }
        .and_then(|path| BufferedReader::open(path).map_err(AbiError::from));
    match opened {
        Ok(reader) => Box::into_raw(Box::new(reader)),
        Err(err) => {
            set_last_error(err);
            ptr::null_mut()
        }
    }
}

/// Create or truncate `path` for buffered writing. Null on failure.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_open_write(path: *const c_char) -> FileWriter {
    // SAFETY: forwarded caller contract.
    let opened = unsafe { path_arg(path) }
        .and_then(|path| BufferedWriter::open(path).map_err(AbiError::from));
    match opened {
        Ok(writer) => Box::into_raw(Box::new(writer)),
        Err(err) => {
            set_last_error(err);
            ptr::null_mut()
        }
    }
}

// ---------------------------------------------------------------------------
// Transfer
// ---------------------------------------------------------------------------

/// Read up to `buffer_len` bytes. Returns the count (0 at end of file) or
/// a negative error code.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_read(
    reader: FileReader,
    buffer: *mut u8,
    buffer_len: usize,
) -> i64 {
    if let Err(err) = check_len(buffer_len) {
        return fail(err);
    }
    // SAFETY: a non-null handle came from bufferedfile_open_read and is not closed.
    let Some(reader) = (unsafe { reader.as_mut() }) else {
        return fail(AbiError::InvalidPointer);
    };
    let dst: &mut [u8] = if buffer_len == 0 {
        &mut []
    } else if buffer.is_null() {
        return fail(AbiError::InvalidPointer);
    } else {
        // SAFETY: caller guarantees `buffer` has `buffer_len` writable bytes.
        unsafe { std::slice::from_raw_parts_mut(buffer, buffer_len) }
    };

    match reader.read(dst) {
        Ok(n) => transferred(n),
        Err(err) => fail(err.into()),
    }
}

/// Write up to `buffer_len` bytes. Returns the count accepted (possibly
/// short) or a negative error code.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_write(
    writer: FileWriter,
    buffer: *const u8,
    buffer_len: usize,
) -> i64 {
    if let Err(err) = check_len(buffer_len) {
        return fail(err);
    }
    // SAFETY: a non-null handle came from bufferedfile_open_write and is not closed.
    let Some(writer) = (unsafe { writer.as_mut() }) else {
        return fail(AbiError::InvalidPointer);
    };
    let src: &[u8] = if buffer_len == 0 {
        &[]
    } else if buffer.is_null() {
        return fail(AbiError::InvalidPointer);
    } else {
        // SAFETY: caller guarantees `buffer` has `buffer_len` readable bytes.
        unsafe { std::slice::from_raw_parts(buffer, buffer_len) }
    };

    match writer.write(src) {
        Ok(n) => transferred(n),
        Err(err) => fail(err.into()),
    }
}

// ---------------------------------------------------------------------------
// Close
// ---------------------------------------------------------------------------

/// Release a read handle. Null is a no-op.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_close_read(reader: FileReader) {
    if reader.is_null() {
        return;
    }
    // SAFETY: the pointer came from Box::into_raw in bufferedfile_open_read
    // and ownership returns here exactly once.
    let reader = unsafe { Box::from_raw(reader) };
    reader.close();
}

/// Flush and release a write handle. Returns 0, or a negative code when
/// buffered data may not have reached the file. Null is a no-op.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_close_write(writer: FileWriter) -> i64 {
    if writer.is_null() {
        return 0;
    }
    // SAFETY: the pointer came from Box::into_raw in bufferedfile_open_write
    // and ownership returns here exactly once.
    let writer = unsafe { Box::from_raw(writer) };
    match writer.close() {
        Ok(()) => 0,
        Err(err) => fail(err.into()),
    }
}
