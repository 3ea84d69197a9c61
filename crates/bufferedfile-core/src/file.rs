//! Open flags and per-handle stream state.
//!
//! A reader always opens `O_RDONLY`. A writer always opens
//! `O_WRONLY | O_CREAT | O_TRUNC`: the target is created when absent and
//! truncated when present. Both add `O_CLOEXEC`.

use crate::errno::Errno;
use crate::error::IoError;

/// Permission bits for newly created files, before the umask.
pub const CREATE_MODE: u32 = 0o666;

// ---------------------------------------------------------------------------
// Open flags
// ---------------------------------------------------------------------------

/// File open mode flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OpenFlags {
    pub readable: bool,
    pub writable: bool,
    pub truncate: bool,
    pub create: bool,
}

impl OpenFlags {
    /// Flags used by [`crate::BufferedReader`].
    #[must_use]
    pub const fn read() -> Self {
        Self {
            readable: true,
            writable: false,
            truncate: false,
            create: false,
        }
    }

    /// Flags used by [`crate::BufferedWriter`]: create or truncate.
    #[must_use]
    pub const fn write() -> Self {
        Self {
            readable: false,
            writable: true,
            truncate: true,
            create: true,
        }
    }

    /// Convert to `O_*` flag bits.
    #[must_use]
    pub fn to_oflags(self) -> i32 {
        let mut oflags = libc::O_CLOEXEC;

        if self.readable && self.writable {
            oflags |= libc::O_RDWR;
        } else if self.writable {
            oflags |= libc::O_WRONLY;
        } else {
            oflags |= libc::O_RDONLY;
        }

        if self.create {
            oflags |= libc::O_CREAT;
        }
        if self.truncate {
            oflags |= libc::O_TRUNC;
        }

        oflags
    }
}

// ---------------------------------------------------------------------------
// Stream state
// ---------------------------------------------------------------------------

/// Runtime state of an open handle.
///
/// There is no `Closed` variant: closing consumes the handle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StreamState {
    #[default]
    Open,
    /// A read or write on the backing descriptor failed. Further transfers
    /// fail immediately; closing is still allowed.
    Errored { errno: Errno },
}

impl StreamState {
    /// Fail fast if the handle has already errored.
    pub(crate) fn check(self) -> Result<(), IoError> {
        match self {
            Self::Open => Ok(()),
            Self::Errored { errno } => Err(IoError::Errored { errno }),
        }
    }

    /// Whether a previous transfer failed.
    #[must_use]
    pub fn is_errored(self) -> bool {
        matches!(self, Self::Errored { .. })
    }
}
