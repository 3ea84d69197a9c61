//! Buffered read/write throughput by caller chunk size.
//!
//! `std` rows use `std::io::BufWriter`/`BufReader` over `std::fs::File` with
//! the same capacity as a baseline.

use std::ffi::CString;
use std::fs::File;
use std::hint::black_box;
use std::io::{BufReader, BufWriter, Read, Write};
use std::os::unix::ffi::OsStrExt;

use bufferedfile_abi::handle_abi::{
    bufferedfile_close_write, bufferedfile_open_write, bufferedfile_write,
};
use bufferedfile_core::{BUFSIZ, BufferConfig, BufferedReader, BufferedWriter};
use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};

const TOTAL: usize = 1 << 20;
const CHUNKS: &[usize] = &[1, 16, 256, 4096, 65_536];

fn payload() -> Vec<u8> {
    (0..TOTAL).map(|i| (i % 251) as u8).collect()
}

fn bench_write(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("write.bin");
    let data = payload();
    let mut group = c.benchmark_group("write_1MiB");
    group.throughput(Throughput::Bytes(TOTAL as u64));

    for &chunk in CHUNKS {
        group.bench_with_input(BenchmarkId::new("bufferedfile", chunk), &chunk, |b, &sz| {
            b.iter(|| {
                let mut w = BufferedWriter::open(&path).unwrap();
                for piece in data.chunks(sz) {
                    black_box(w.write(piece).unwrap());
                }
                w.close().unwrap();
            });
        });
        group.bench_with_input(BenchmarkId::new("std", chunk), &chunk, |b, &sz| {
            b.iter(|| {
                let mut w = BufWriter::with_capacity(BUFSIZ, File::create(&path).unwrap());
                for piece in data.chunks(sz) {
                    w.write_all(piece).unwrap();
                }
                w.flush().unwrap();
            });
        });
    }
    group.finish();
}

fn bench_write_abi(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = CString::new(dir.path().join("abi.bin").as_os_str().as_bytes()).unwrap();
    let data = payload();
    let mut group = c.benchmark_group("write_1MiB_abi");
    group.throughput(Throughput::Bytes(TOTAL as u64));

    for &chunk in &[16usize, 4096] {
        group.bench_with_input(BenchmarkId::new("bufferedfile_write", chunk), &chunk, |b, &sz| {
            b.iter(|| unsafe {
                let w = bufferedfile_open_write(path.as_ptr());
                for piece in data.chunks(sz) {
                    black_box(bufferedfile_write(w, piece.as_ptr(), piece.len()));
                }
                bufferedfile_close_write(w)
            });
        });
    }
    group.finish();
}

fn bench_read(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("read.bin");
    std::fs::write(&path, payload()).unwrap();
    let mut group = c.benchmark_group("read_1MiB");
    group.throughput(Throughput::Bytes(TOTAL as u64));

    for &chunk in CHUNKS {
        group.bench_with_input(BenchmarkId::new("bufferedfile", chunk), &chunk, |b, &sz| {
            let mut buf = vec![0u8; sz];
            b.iter(|| {
                let mut r = BufferedReader::open(&path).unwrap();
                while r.read(&mut buf).unwrap() > 0 {}
                r.close();
            });
        });
        group.bench_with_input(BenchmarkId::new("std", chunk), &chunk, |b, &sz| {
            let mut buf = vec![0u8; sz];
            b.iter(|| {
                let mut r = BufReader::with_capacity(BUFSIZ, File::open(&path).unwrap());
                while r.read(&mut buf).unwrap() > 0 {}
            });
        });
    }
    group.finish();
}

fn bench_buffer_capacity(c: &mut Criterion) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("capacity.bin");
    let data = payload();
    let mut group = c.benchmark_group("write_1MiB_by_capacity");
    group.throughput(Throughput::Bytes(TOTAL as u64));

    for &capacity in &[512usize, BUFSIZ, 65_536] {
        let config = BufferConfig::with_capacity(capacity);
        group.bench_with_input(BenchmarkId::from_parameter(capacity), &config, |b, &cfg| {
            b.iter(|| {
                let mut w = BufferedWriter::open_with(&path, cfg).unwrap();
                for piece in data.chunks(100) {
                    w.write(piece).unwrap();
                }
                w.close().unwrap();
            });
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_write,
    bench_write_abi,
    bench_read,
    bench_buffer_capacity
);
criterion_main!(benches);
