//! Streaming transfers through buffered handles, with content digests.
//!
//! Each transfer moves bytes in fixed-size chunks and hashes them on the way
//! through, so the CLI can report a SHA-256 that matches the file on disk.

use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use bufferedfile_core::{BufferConfig, BufferedReader, BufferedWriter, CloseError, IoError, OpenError};
use sha2::{Digest, Sha256};
use thiserror::Error;

/// Chunk size used to move bytes between handles.
pub const TRANSFER_CHUNK: usize = 16 * 1024;

/// Failure of a CLI transfer.
#[derive(Debug, Error)]
pub enum HarnessError {
    #[error("cannot open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: OpenError,
    },
    #[error("read from {} failed: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("write to {} failed: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: IoError,
    },
    #[error("{} stopped accepting bytes after {accepted} bytes", path.display())]
    ShortWrite { path: PathBuf, accepted: u64 },
    #[error("closing {} failed: {source}", path.display())]
    Close {
        path: PathBuf,
        #[source]
        source: CloseError,
    },
    #[error(transparent)]
    Stdio(#[from] std::io::Error),
}

impl HarnessError {
    /// Errno behind the failure, when there is one.
    #[must_use]
    pub fn errno(&self) -> Option<i32> {
        match self {
            Self::Open { source, .. } => Some(source.errno()),
            Self::Read { source, .. } | Self::Write { source, .. } => Some(source.errno()),
            Self::Close { source, .. } => Some(source.errno()),
            Self::ShortWrite { .. } => None,
            Self::Stdio(err) => err.raw_os_error(),
        }
    }
}

/// Bytes moved and the SHA-256 of their content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferReport {
    pub bytes: u64,
    /// Lowercase hex digest.
    pub sha256: String,
}

/// Running byte count and digest.
#[derive(Default)]
struct Tally {
    bytes: u64,
    hasher: Sha256,
}

impl Tally {
    fn update(&mut self, chunk: &[u8]) {
        self.bytes += chunk.len() as u64;
        self.hasher.update(chunk);
    }

    fn finish(self) -> TransferReport {
        TransferReport {
            bytes: self.bytes,
            sha256: hex_lower(&self.hasher.finalize()),
        }
    }
}

fn hex_lower(bytes: &[u8]) -> String {
    use std::fmt::Write;
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        let _ = write!(&mut out, "{b:02x}");
    }
    out
}

/// SHA-256 of `data` as lowercase hex.
#[must_use]
pub fn sha256_hex(data: &[u8]) -> String {
    hex_lower(&Sha256::digest(data))
}

fn open_reader(path: &Path, config: BufferConfig) -> Result<BufferedReader, HarnessError> {
    BufferedReader::open_with(path, config).map_err(|source| HarnessError::Open {
        path: path.to_path_buf(),
        source,
    })
}

fn open_writer(path: &Path, config: BufferConfig) -> Result<BufferedWriter, HarnessError> {
    BufferedWriter::open_with(path, config).map_err(|source| HarnessError::Open {
        path: path.to_path_buf(),
        source,
    })
}

/// Offer `data` to the writer until all of it is accepted.
///
/// A call accepting zero bytes means the file cannot take more.
fn write_all(
    writer: &mut BufferedWriter,
    path: &Path,
    mut data: &[u8],
    written_before: u64,
) -> Result<(), HarnessError> {
    let mut accepted = written_before;
    while !data.is_empty() {
        let n = writer.write(data).map_err(|source| HarnessError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            return Err(HarnessError::ShortWrite {
                path: path.to_path_buf(),
                accepted,
            });
        }
        accepted += n as u64;
        data = &data[n..];
    }
    Ok(())
}

fn close_writer(writer: BufferedWriter, path: &Path) -> Result<(), HarnessError> {
    writer.close().map_err(|source| HarnessError::Close {
        path: path.to_path_buf(),
        source,
    })
}

/// Stream `path` into `out` through a [`BufferedReader`].
pub fn read_file(
    path: &Path,
    config: BufferConfig,
    out: &mut impl Write,
) -> Result<TransferReport, HarnessError> {
    let mut reader = open_reader(path, config)?;
    let mut tally = Tally::default();
    let mut chunk = vec![0u8; TRANSFER_CHUNK];
    loop {
        let n = reader.read(&mut chunk).map_err(|source| HarnessError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        out.write_all(&chunk[..n])?;
        tally.update(&chunk[..n]);
    }
    reader.close();
    out.flush()?;
    Ok(tally.finish())
}

/// Stream `input` into `path` through a [`BufferedWriter`], then close it.
///
/// The file is created or truncated. A failed final flush is an error.
pub fn write_file(
    input: &mut impl Read,
    path: &Path,
    config: BufferConfig,
) -> Result<TransferReport, HarnessError> {
    let mut writer = open_writer(path, config)?;
    let mut tally = Tally::default();
    let mut chunk = vec![0u8; TRANSFER_CHUNK];
    loop {
        let n = match input.read(&mut chunk) {
            Ok(0) => break,
            Ok(n) => n,
            Err(err) if err.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err.into()),
        };
        write_all(&mut writer, path, &chunk[..n], tally.bytes)?;
        tally.update(&chunk[..n]);
    }
    close_writer(writer, path)?;
    Ok(tally.finish())
}

/// Copy `src` to `dst` through a reader/writer pair sharing one config.
pub fn copy_file(
    src: &Path,
    dst: &Path,
    config: BufferConfig,
) -> Result<TransferReport, HarnessError> {
    let mut reader = open_reader(src, config)?;
    let mut writer = open_writer(dst, config)?;
    let mut tally = Tally::default();
    let mut chunk = vec![0u8; TRANSFER_CHUNK];
    loop {
        let n = reader.read(&mut chunk).map_err(|source| HarnessError::Read {
            path: src.to_path_buf(),
            source,
        })?;
        if n == 0 {
            break;
        }
        write_all(&mut writer, dst, &chunk[..n], tally.bytes)?;
        tally.update(&chunk[..n]);
    }
    reader.close();
    close_writer(writer, dst)?;
    Ok(tally.finish())
}
