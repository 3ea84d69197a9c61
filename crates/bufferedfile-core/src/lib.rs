//! # bufferedfile-core
//!
//! Safe Rust model of buffered file handles.
//!
//! A [`BufferedReader`] or [`BufferedWriter`] owns exactly one file descriptor
//! and one fixed-capacity [`StreamBuffer`]. Handles are move-only: `close`
//! consumes the handle, so double close and use-after-close do not compile.
//! The ABI crate boxes these types and hands opaque pointers to C callers.
//!
//! No `unsafe` code is permitted at the crate level; the syscall veneer is the
//! single exception.

#![deny(unsafe_code)]

pub mod buffer;
pub mod config;
pub mod errno;
pub mod error;
pub mod fd;
pub mod file;
pub mod reader;
#[allow(unsafe_code)]
pub mod syscall;
pub mod writer;

pub use buffer::{BUFSIZ, StreamBuffer};
pub use config::BufferConfig;
pub use error::{CloseError, IoError, OpenError};
pub use fd::{Descriptor, FileDesc};
pub use file::{OpenFlags, StreamState};
pub use reader::BufferedReader;
pub use writer::BufferedWriter;
