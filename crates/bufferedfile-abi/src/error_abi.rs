//! ABI error codes and the thread-local last-error slot.
//!
//! Every failing export stores its error here before returning a sentinel.
//! Nothing is logged; callers pull the code or message on demand.

use std::cell::RefCell;
use std::ffi::{c_char, c_int};

use bufferedfile_core::{CloseError, IoError, OpenError};
use thiserror::Error;

/// Failure of an ABI call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AbiError {
    #[error("null pointer passed as a handle or buffer")]
    InvalidPointer,
    #[error("buffer length does not fit in int64_t")]
    BufferTooLong,
    #[error("empty path")]
    InvalidPath,
    #[error("open failed: {0}")]
    Open(#[from] OpenError),
    #[error("transfer failed: {0}")]
    Io(#[from] IoError),
    #[error("close failed: {0}")]
    Close(#[from] CloseError),
}

/// Negative sentinels returned across the boundary.
#[repr(i64)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    Success = 0,
    NotFound = -1,
    PermissionDenied = -2,
    Os = -3,
    Errored = -4,
    InvalidPath = -200,
    BufferTooLong = -201,
    InvalidPointer = -202,
}

impl From<&AbiError> for ErrorCode {
    fn from(err: &AbiError) -> Self {
        match err {
            AbiError::InvalidPointer => Self::InvalidPointer,
            AbiError::BufferTooLong => Self::BufferTooLong,
            AbiError::InvalidPath | AbiError::Open(OpenError::InvalidPath) => Self::InvalidPath,
            AbiError::Open(OpenError::NotFound) => Self::NotFound,
            AbiError::Open(OpenError::PermissionDenied) => Self::PermissionDenied,
            AbiError::Io(IoError::Errored { .. }) => Self::Errored,
            AbiError::Open(OpenError::Os { .. }) | AbiError::Io(_) | AbiError::Close(_) => Self::Os,
        }
    }
}

impl From<ErrorCode> for i64 {
    fn from(code: ErrorCode) -> Self {
        code as i64
    }
}

thread_local! {
    static LAST_ERROR: RefCell<Option<AbiError>> = const { RefCell::new(None) };
}

/// Record `err` as this thread's last error and return its code.
pub(crate) fn set_last_error(err: AbiError) -> ErrorCode {
    let code = ErrorCode::from(&err);
    LAST_ERROR.with(|slot| *slot.borrow_mut() = Some(err));
    code
}

/// Take this thread's last error, leaving the slot empty.
pub fn take_last_error() -> Option<AbiError> {
    LAST_ERROR.with(|slot| slot.borrow_mut().take())
}

/// Code of the most recent failure on the calling thread, 0 if none.
#[unsafe(no_mangle)]
pub extern "C" fn bufferedfile_last_error_code() -> i64 {
    LAST_ERROR.with(|slot| {
        slot.borrow()
            .as_ref()
            .map_or(ErrorCode::Success, ErrorCode::from)
            .into()
    })
}

/// Bytes needed for the last error message including the trailing NUL,
/// 0 if there is no error.
#[unsafe(no_mangle)]
pub extern "C" fn bufferedfile_last_error_length() -> c_int {
    LAST_ERROR.with(|slot| match slot.borrow().as_ref() {
        Some(err) => c_int::try_from(err.to_string().len() + 1).unwrap_or(c_int::MAX),
        None => 0,
    })
}

/// Copy the last error message, NUL-terminated, into `buffer`.
///
/// Returns the message length without the NUL and clears the slot. Returns
/// 0 when there is no error, -1 when `buffer` is null or shorter than
/// [`bufferedfile_last_error_length`]; the slot is kept in that case.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn bufferedfile_last_error_message(
    buffer: *mut c_char,
    length: c_int,
) -> c_int {
    if buffer.is_null() {
        return -1;
    }
    let Some(message) = LAST_ERROR.with(|slot| slot.borrow().as_ref().map(ToString::to_string))
    else {
        return 0;
    };
    let capacity = usize::try_from(length).unwrap_or(0);
    if message.len() >= capacity {
        return -1;
    }

    // SAFETY: caller guarantees `buffer` points to `length` writable bytes,
    // and `message.len() + 1 <= length` was checked above.
    unsafe {
        std::ptr::copy_nonoverlapping(message.as_ptr(), buffer.cast::<u8>(), message.len());
        *buffer.add(message.len()) = 0;
    }
    take_last_error();
    c_int::try_from(message.len()).unwrap_or(c_int::MAX)
}
