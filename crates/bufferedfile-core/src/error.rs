//! Error taxonomy for buffered file handles.
//!
//! Open failures produce no handle. Read/write failures leave the handle
//! closeable but errored. Close failures on a writer mean buffered data may
//! not have reached the file. Short transfers are not errors and never
//! appear here.

use thiserror::Error;

use crate::errno::{EACCES, EINVAL, ENAMETOOLONG, ENOENT, EPERM, EROFS, Errno};

/// Failure to open the backing file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum OpenError {
    #[error("file not found")]
    NotFound,
    #[error("permission denied")]
    PermissionDenied,
    #[error("invalid path")]
    InvalidPath,
    #[error("open failed: {errno}")]
    Os { errno: Errno },
}

impl OpenError {
    /// Classify an errno returned by `open(2)`.
    #[must_use]
    pub fn from_errno(errno: i32) -> Self {
        match errno {
            ENOENT => Self::NotFound,
            EACCES | EPERM | EROFS => Self::PermissionDenied,
            EINVAL | ENAMETOOLONG => Self::InvalidPath,
            _ => Self::Os {
                errno: Errno(errno),
            },
        }
    }

    /// Errno equivalent of this error.
    #[must_use]
    pub fn errno(self) -> i32 {
        match self {
            Self::NotFound => ENOENT,
            Self::PermissionDenied => EACCES,
            Self::InvalidPath => EINVAL,
            Self::Os { errno } => errno.get(),
        }
    }
}

impl From<OpenError> for std::io::Error {
    fn from(err: OpenError) -> Self {
        std::io::Error::from_raw_os_error(err.errno())
    }
}

/// Failure of the backing resource during a read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum IoError {
    #[error("I/O error: {errno}")]
    Os { errno: Errno },
    /// An earlier read or write on this handle failed.
    #[error("handle failed earlier: {errno}")]
    Errored { errno: Errno },
}

impl IoError {
    pub(crate) fn os(errno: i32) -> Self {
        Self::Os {
            errno: Errno(errno),
        }
    }

    /// Underlying errno.
    #[must_use]
    pub fn errno(self) -> i32 {
        match self {
            Self::Os { errno } | Self::Errored { errno } => errno.get(),
        }
    }
}

impl From<IoError> for std::io::Error {
    fn from(err: IoError) -> Self {
        std::io::Error::from_raw_os_error(err.errno())
    }
}

/// Failure while closing a writer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum CloseError {
    /// Buffered bytes could not be written; data was lost.
    #[error("final flush failed: {errno}")]
    Flush { errno: Errno },
    /// The descriptor could not be closed cleanly.
    #[error("close failed: {errno}")]
    Close { errno: Errno },
}

impl CloseError {
    /// Underlying errno.
    #[must_use]
    pub fn errno(self) -> i32 {
        match self {
            Self::Flush { errno } | Self::Close { errno } => errno.get(),
        }
    }
}

impl From<CloseError> for std::io::Error {
    fn from(err: CloseError) -> Self {
        std::io::Error::from_raw_os_error(err.errno())
    }
}
