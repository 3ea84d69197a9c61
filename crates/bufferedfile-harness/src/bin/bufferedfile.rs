//! CLI entrypoint for bufferedfile transfers.

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;

use bufferedfile_core::{BUFSIZ, BufferConfig};
use bufferedfile_harness::{
    HarnessError, LogEmitter, LogEntry, LogLevel, Outcome, TransferReport, Verb, copy_file,
    read_file, write_file,
};
use clap::{Parser, Subcommand};

/// Stream files through buffered read/write handles.
#[derive(Debug, Parser)]
#[command(name = "bufferedfile")]
#[command(about = "Buffered file transfers with SHA-256 reporting")]
struct Cli {
    /// Internal buffer capacity in bytes.
    #[arg(long, global = true, default_value_t = BUFSIZ)]
    buffer_size: usize,
    /// Write a JSONL record of the transfer to this file.
    #[arg(long, global = true)]
    log: Option<PathBuf>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print a file to stdout.
    Read {
        /// File to read.
        path: PathBuf,
    },
    /// Write stdin to a file, creating or truncating it.
    Write {
        /// File to write.
        path: PathBuf,
    },
    /// Copy one file to another.
    Copy {
        /// Source file.
        src: PathBuf,
        /// Destination file, created or truncated.
        dst: PathBuf,
    },
}

impl Command {
    fn verb(&self) -> Verb {
        match self {
            Self::Read { .. } => Verb::Read,
            Self::Write { .. } => Verb::Write,
            Self::Copy { .. } => Verb::Copy,
        }
    }

    fn path_label(&self) -> String {
        match self {
            Self::Read { path } | Self::Write { path } => path.display().to_string(),
            Self::Copy { src, dst } => format!("{} -> {}", src.display(), dst.display()),
        }
    }

    fn run(&self, config: BufferConfig) -> Result<TransferReport, HarnessError> {
        match self {
            Self::Read { path } => read_file(path, config, &mut std::io::stdout().lock()),
            Self::Write { path } => write_file(&mut std::io::stdin().lock(), path, config),
            Self::Copy { src, dst } => copy_file(src, dst, config),
        }
    }
}

fn log_result(
    log: &std::path::Path,
    cli: &Cli,
    result: &Result<TransferReport, HarnessError>,
    elapsed_ms: u64,
) -> std::io::Result<()> {
    let run_id = format!("bufferedfile-{}", std::process::id());
    let mut emitter = LogEmitter::to_file(log, &run_id)?;
    let trace_id = emitter.next_trace_id();
    let entry = LogEntry::new(trace_id, LogLevel::Info, "transfer")
        .with_verb(cli.command.verb())
        .with_path(cli.command.path_label())
        .with_duration_ms(elapsed_ms)
        .with_details(serde_json::json!({ "buffer_size": cli.buffer_size }));
    let entry = match result {
        Ok(report) => entry
            .with_transfer(report.bytes, report.sha256.clone())
            .with_outcome(Outcome::Success),
        Err(err) => {
            let mut entry = entry.with_outcome(Outcome::Failure);
            entry.level = LogLevel::Error;
            entry.event = "transfer_failed".to_string();
            if let Some(errno) = err.errno() {
                entry = entry.with_errno(errno);
            }
            entry
        }
    };
    emitter.emit_entry(entry)?;
    emitter.flush()
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let config = BufferConfig::with_capacity(cli.buffer_size);

    let started = Instant::now();
    let result = cli.command.run(config);
    let elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

    if let Some(log) = &cli.log
        && let Err(err) = log_result(log, &cli, &result, elapsed_ms)
    {
        eprintln!("bufferedfile: cannot write log {}: {err}", log.display());
    }

    match result {
        Ok(report) => {
            eprintln!("{} bytes, sha256 {}", report.bytes, report.sha256);
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("bufferedfile: {err}");
            ExitCode::FAILURE
        }
    }
}
