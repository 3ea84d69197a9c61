//! Integration test: buffered handles over real files
//!
//! Opens files in a scratch directory and drives readers and writers
//! through the scenarios callers depend on: exact read chunking, write
//! coalescing, truncation on open, open failures, and data surviving close.
//!
//! Run: cargo test -p bufferedfile-core --test roundtrip_test

use std::fs;

use bufferedfile_core::{BufferConfig, BufferedReader, BufferedWriter, IoError, OpenError};

fn read_all(reader: &mut BufferedReader, chunk: usize) -> Result<Vec<u8>, IoError> {
    let mut out = Vec::new();
    let mut buf = vec![0u8; chunk];
    loop {
        let n = reader.read(&mut buf)?;
        if n == 0 {
            return Ok(out);
        }
        out.extend_from_slice(&buf[..n]);
    }
}

#[test]
fn ten_bytes_in_four_byte_reads() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("ten.bin");
    fs::write(&path, b"0123456789").unwrap();

    let mut reader = BufferedReader::open(&path).unwrap();
    let mut buf = [0u8; 4];
    assert_eq!(reader.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"0123");
    assert_eq!(reader.read(&mut buf).unwrap(), 4);
    assert_eq!(&buf, b"4567");
    assert_eq!(reader.read(&mut buf).unwrap(), 2);
    assert_eq!(&buf[..2], b"89");
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    reader.close();
}

#[test]
fn empty_file_reads_zero() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty");
    fs::write(&path, b"").unwrap();

    let mut reader = BufferedReader::open(&path).unwrap();
    let mut buf = [0u8; 16];
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    assert_eq!(reader.read(&mut buf).unwrap(), 0);
    reader.close();
}

#[test]
fn small_writes_coalesce_into_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.txt");

    let mut writer = BufferedWriter::open(&path).unwrap();
    assert_eq!(writer.write(b"abc").unwrap(), 3);
    assert_eq!(writer.write(b"defgh").unwrap(), 5);
    // Still buffered: nothing on disk before close.
    assert_eq!(fs::read(&path).unwrap(), b"");
    writer.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"abcdefgh");
}

#[test]
fn write_then_read_roundtrip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("data.bin");
    let data: Vec<u8> = (0..50_000u32).map(|i| (i % 251) as u8).collect();

    let mut writer = BufferedWriter::open(&path).unwrap();
    for chunk in data.chunks(777) {
        assert_eq!(writer.write(chunk).unwrap(), chunk.len());
    }
    writer.close().unwrap();

    let mut reader = BufferedReader::open(&path).unwrap();
    assert_eq!(read_all(&mut reader, 1000).unwrap(), data);
    reader.close();
}

#[test]
fn tiny_buffers_preserve_order() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("tiny.bin");
    let data: Vec<u8> = (0..=255u8).cycle().take(3000).collect();

    for capacity in [1usize, 2, 3, 7, 64] {
        let config = BufferConfig::with_capacity(capacity);
        let mut writer = BufferedWriter::open_with(&path, config).unwrap();
        for chunk in data.chunks(5) {
            writer.write(chunk).unwrap();
        }
        writer.close().unwrap();

        let mut reader = BufferedReader::open_with(&path, config).unwrap();
        assert_eq!(
            read_all(&mut reader, 3).unwrap(),
            data,
            "capacity {capacity}"
        );
        reader.close();
    }
}

#[test]
fn open_write_truncates_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.txt");
    fs::write(&path, b"previous contents that are long").unwrap();

    let mut writer = BufferedWriter::open(&path).unwrap();
    writer.write(b"new").unwrap();
    writer.close().unwrap();

    assert_eq!(fs::read(&path).unwrap(), b"new");
}

#[test]
fn open_write_then_close_leaves_empty_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fresh");

    BufferedWriter::open(&path).unwrap().close().unwrap();
    assert_eq!(fs::metadata(&path).unwrap().len(), 0);
}

#[test]
fn tail_is_durable_after_drop() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("dropped");

    {
        let mut writer = BufferedWriter::open(&path).unwrap();
        writer.write(b"kept on drop").unwrap();
    }
    assert_eq!(fs::read(&path).unwrap(), b"kept on drop");
}

#[test]
fn missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let err = BufferedReader::open(dir.path().join("absent")).unwrap_err();
    assert_eq!(err, OpenError::NotFound);
}

#[test]
fn missing_directory_fails_write_open() {
    let dir = tempfile::tempdir().unwrap();
    let err = BufferedWriter::open(dir.path().join("no/such/dir/file")).unwrap_err();
    assert_eq!(err, OpenError::NotFound);
}

#[test]
fn directory_cannot_be_opened_for_write() {
    let dir = tempfile::tempdir().unwrap();
    let err = BufferedWriter::open(dir.path()).unwrap_err();
    assert!(matches!(err, OpenError::Os { .. }), "{err:?}");
}

#[test]
fn std_io_traits_compose() {
    use std::io::{Read, Write};

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("std.txt");

    let mut writer = BufferedWriter::open(&path).unwrap();
    writeln!(writer, "line one").unwrap();
    writeln!(writer, "line two").unwrap();
    writer.close().unwrap();

    let mut reader = BufferedReader::open(&path).unwrap();
    let mut text = String::new();
    reader.read_to_string(&mut text).unwrap();
    assert_eq!(text, "line one\nline two\n");
}
