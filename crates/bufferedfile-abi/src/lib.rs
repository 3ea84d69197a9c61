//! # bufferedfile-abi
//!
//! `extern "C"` boundary for buffered file handles.
//!
//! This crate produces a `cdylib` exposing the `bufferedfile_*` symbols
//! declared in `include/bufferedfile.h`. Each export validates its pointer
//! arguments, then delegates to the safe types in `bufferedfile-core`.
//!
//! ```text
//! C caller -> ABI entry (this crate) -> BufferedReader / BufferedWriter -> syscalls
//! ```
//!
//! Errors never unwind across the boundary: they become a null handle or a
//! negative code, with details in a thread-local last-error slot.

// Exports take raw pointers from C callers; the contract lives in the header.
#![allow(clippy::missing_safety_doc)]

pub mod error_abi;
pub mod handle_abi;

pub use error_abi::{AbiError, ErrorCode, take_last_error};
pub use handle_abi::{FileReader, FileWriter};
