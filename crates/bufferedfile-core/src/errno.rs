//! Error number definitions.
//!
//! Only the values the buffered file layer inspects or reports are listed.
//! Values come from the platform `libc` so the table is correct off Linux too.

pub const EPERM: i32 = libc::EPERM;
pub const ENOENT: i32 = libc::ENOENT;
pub const EINTR: i32 = libc::EINTR;
pub const EIO: i32 = libc::EIO;
pub const EBADF: i32 = libc::EBADF;
pub const EAGAIN: i32 = libc::EAGAIN;
pub const ENOMEM: i32 = libc::ENOMEM;
pub const EACCES: i32 = libc::EACCES;
pub const EEXIST: i32 = libc::EEXIST;
pub const ENOTDIR: i32 = libc::ENOTDIR;
pub const EISDIR: i32 = libc::EISDIR;
pub const EINVAL: i32 = libc::EINVAL;
pub const EMFILE: i32 = libc::EMFILE;
pub const EFBIG: i32 = libc::EFBIG;
pub const ENOSPC: i32 = libc::ENOSPC;
pub const EROFS: i32 = libc::EROFS;
pub const EPIPE: i32 = libc::EPIPE;
pub const ENAMETOOLONG: i32 = libc::ENAMETOOLONG;
pub const ELOOP: i32 = libc::ELOOP;
pub const EDQUOT: i32 = libc::EDQUOT;

/// Short human-readable description of an errno value.
#[must_use]
pub fn describe(errno: i32) -> &'static str {
    match errno {
        EPERM => "operation not permitted",
        ENOENT => "no such file or directory",
        EINTR => "interrupted system call",
        EIO => "input/output error",
        EBADF => "bad file descriptor",
        EAGAIN => "resource temporarily unavailable",
        ENOMEM => "cannot allocate memory",
        EACCES => "permission denied",
        EEXIST => "file exists",
        ENOTDIR => "not a directory",
        EISDIR => "is a directory",
        EINVAL => "invalid argument",
        EMFILE => "too many open files",
        EFBIG => "file too large",
        ENOSPC => "no space left on device",
        EROFS => "read-only file system",
        EPIPE => "broken pipe",
        ENAMETOOLONG => "file name too long",
        ELOOP => "too many levels of symbolic links",
        EDQUOT => "disk quota exceeded",
        _ => "unknown error",
    }
}

/// An errno value that displays as `description (errno N)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Errno(pub i32);

impl Errno {
    /// Raw errno value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl std::fmt::Display for Errno {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} (errno {})", describe(self.0), self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_known_and_unknown() {
        assert_eq!(describe(ENOENT), "no such file or directory");
        assert_eq!(describe(EACCES), "permission denied");
        assert_eq!(describe(9999), "unknown error");
    }

    #[test]
    fn test_errno_display() {
        assert_eq!(
            Errno(ENOENT).to_string(),
            format!("no such file or directory (errno {ENOENT})")
        );
    }
}
