//! # bufferedfile-harness
//!
//! Tooling around the buffered file handles: streaming transfers with
//! SHA-256 digests, and the structured JSONL log the `bufferedfile` CLI
//! writes.

pub mod structured_log;
pub mod transfer;

pub use structured_log::{LogEmitter, LogEntry, LogLevel, Outcome, Verb};
pub use transfer::{HarnessError, TransferReport, copy_file, read_file, sha256_hex, write_file};
