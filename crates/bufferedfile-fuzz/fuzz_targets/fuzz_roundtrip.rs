#![no_main]
use bufferedfile_core::{BufferConfig, BufferedReader, BufferedWriter};
use libfuzzer_sys::fuzz_target;

// Input layout: [capacity, write_step, read_step, payload...]. Writes and
// reads use different chunkings; the bytes read back must equal the payload.
fuzz_target!(|data: &[u8]| {
    if data.len() < 3 {
        return;
    }
    let config = BufferConfig::with_capacity(usize::from(data[0]) + 1);
    let write_step = usize::from(data[1]) + 1;
    let read_step = usize::from(data[2]) + 1;
    let payload = &data[3..];

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("roundtrip.bin");

    let mut writer = BufferedWriter::open_with(&path, config).unwrap();
    for chunk in payload.chunks(write_step) {
        let mut rest = chunk;
        while !rest.is_empty() {
            let n = writer.write(rest).unwrap();
            assert!(n > 0 && n <= rest.len());
            rest = &rest[n..];
        }
    }
    writer.close().unwrap();

    let mut reader = BufferedReader::open_with(&path, config).unwrap();
    let mut out = Vec::with_capacity(payload.len());
    let mut buf = vec![0u8; read_step];
    loop {
        let n = reader.read(&mut buf).unwrap();
        assert!(n <= read_step);
        if n == 0 {
            break;
        }
        out.extend_from_slice(&buf[..n]);
    }
    reader.close();

    assert_eq!(out, payload);
});
