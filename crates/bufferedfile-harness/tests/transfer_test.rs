//! Integration test: streaming transfers and their digests
//!
//! Run: cargo test -p bufferedfile-harness --test transfer_test

use std::fs;
use std::io::Cursor;

use bufferedfile_core::BufferConfig;
use bufferedfile_harness::{HarnessError, copy_file, read_file, sha256_hex, write_file};

fn sample(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i * 7 % 253) as u8).collect()
}

#[test]
fn write_then_read_matches_digest() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let data = sample(100_000);

    let written = write_file(&mut Cursor::new(&data), &path, BufferConfig::default()).unwrap();
    assert_eq!(written.bytes, data.len() as u64);
    assert_eq!(written.sha256, sha256_hex(&data));
    assert_eq!(fs::read(&path).unwrap(), data);

    let mut out = Vec::new();
    let read = read_file(&path, BufferConfig::with_capacity(100), &mut out).unwrap();
    assert_eq!(out, data);
    assert_eq!(read, written);
}

#[test]
fn copy_preserves_content_across_buffer_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let src = dir.path().join("src.bin");
    let data = sample(40_000);
    fs::write(&src, &data).unwrap();

    for capacity in [1usize, 13, 4096, 65_536] {
        let dst = dir.path().join(format!("dst-{capacity}.bin"));
        let report = copy_file(&src, &dst, BufferConfig::with_capacity(capacity)).unwrap();
        assert_eq!(report.bytes, data.len() as u64);
        assert_eq!(fs::read(&dst).unwrap(), data, "capacity {capacity}");
    }
}

#[test]
fn empty_input_produces_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    let report = write_file(&mut std::io::empty(), &path, BufferConfig::default()).unwrap();
    assert_eq!(report.bytes, 0);
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn copy_from_missing_source_fails_without_creating_destination() {
    let dir = tempfile::tempdir().unwrap();
    let dst = dir.path().join("dst");
    let err = copy_file(&dir.path().join("nope"), &dst, BufferConfig::default()).unwrap_err();
    assert!(matches!(err, HarnessError::Open { .. }), "{err:?}");
    assert!(!dst.exists());
}

#[test]
fn write_into_missing_directory_fails() {
    let dir = tempfile::tempdir().unwrap();
    let err = write_file(
        &mut Cursor::new(b"x"),
        &dir.path().join("a/b/c"),
        BufferConfig::default(),
    )
    .unwrap_err();
    assert!(matches!(err, HarnessError::Open { .. }), "{err:?}");
}
