//! chunkpress
//!
//! Interactive prompt (no arguments) or `compress` / `decompress` / `inspect`
//! subcommands over `chunkpress-core`.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{anyhow, Context, Result};
use clap::{Args, Parser, Subcommand};
use log::{debug, LevelFilter};

use chunkpress_core::prelude::*;

#[derive(Debug, Parser)]
#[command(name = "chunkpress", version, about = "Multithreaded chunked file compressor/decompressor")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Without a subcommand the interactive prompt runs.
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Compress a file into a record container.
    Compress {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        opts: PipelineArgs,
    },
    /// Decompress a record container back into the original file.
    Decompress {
        input: PathBuf,
        output: PathBuf,
        #[command(flatten)]
        opts: PipelineArgs,
    },
    /// List the records of a container without decompressing.
    Inspect {
        input: PathBuf,
        #[command(flatten)]
        opts: PipelineArgs,
    },
}

#[derive(Debug, Clone, Args)]
struct PipelineArgs {
    /// Chunk codec: deflate, zstd or lz4 (or its numeric id). Must match on both sides.
    #[arg(long, default_value = "deflate")]
    codec: CompressionCodec,

    /// Codec level (codec default when omitted).
    #[arg(short = 'l', long)]
    level: Option<i32>,

    /// Chunk size in bytes. Must match on both sides.
    #[arg(long, value_name = "BYTES", default_value_t = CHUNK_SIZE)]
    chunk_size: usize,

    /// Worker threads (hardware threads when omitted).
    #[arg(short = 'j', long, value_name = "THREADS")]
    jobs: Option<usize>,

    /// Print the run report as JSON on stdout.
    #[arg(long)]
    json: bool,
}

impl PipelineArgs {
    fn to_config(&self) -> PipelineConfig {
        PipelineConfig {
            codec: self.codec,
            level: self.level,
            chunk_size: self.chunk_size,
            workers: self.jobs,
        }
    }
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => LevelFilter::Warn,
        1 => LevelFilter::Info,
        _ => LevelFilter::Debug,
    };
    let mut builder = env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(default.as_str()),
    );
    builder.target(env_logger::Target::Stderr);
    let _ = builder.try_init();
}

/// One-line failure message naming the stage that failed and why.
///
/// `action` is the capitalised noun of what was attempted ("Compression").
fn failure_line(action: &str, err: &StreamError) -> String {
    match err {
        StreamError::IoOpen { role: IoRole::Input, .. } => "Error opening input file.".to_string(),
        StreamError::IoOpen { role: IoRole::Output, .. } => "Error opening output file.".to_string(),
        StreamError::Codec { chunk_index, .. } => {
            format!("{action} failed for a chunk (chunk {chunk_index}).")
        }
        StreamError::CorruptContainer { records_ok, source } => {
            format!("Corrupt container after {records_ok} records: {source}.")
        }
        other => format!("{action} failed at stage {}: {other}.", other.stage()),
    }
}

fn action(op: Operation) -> &'static str {
    match op {
        Operation::Compress => "Compression",
        Operation::Decompress => "Decompression",
    }
}

fn success_line(op: Operation) -> &'static str {
    match op {
        Operation::Compress => "File compressed successfully.",
        Operation::Decompress => "File decompressed successfully.",
    }
}

/// Run one file operation and report it on `out` / `err`.
fn run_file_op<O: Write, E: Write>(
    op: Operation,
    input: PathBuf,
    output: PathBuf,
    config: &PipelineConfig,
    json: bool,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    debug!("{} {} -> {}", op, input.display(), output.display());
    let result = match op {
        Operation::Compress => compress_file(&input, &output, config),
        Operation::Decompress => decompress_file(&input, &output, config),
    };

    match result {
        Ok(snapshot) => {
            writeln!(out, "{}", success_line(op))?;
            if json {
                writeln!(out, "{}", snapshot.to_json()?)?;
            }
            Ok(())
        }
        Err(e) => {
            writeln!(err, "{}", failure_line(action(op), &e))?;
            Err(e).with_context(|| format!("{} {}", op, input.display()))
        }
    }
}

/// Read one trimmed line; EOF is an error.
fn prompt_line<R: BufRead, O: Write>(input: &mut R, out: &mut O, prompt: &str) -> Result<String> {
    write!(out, "{prompt}")?;
    out.flush()?;
    let mut line = String::new();
    if input.read_line(&mut line)? == 0 {
        return Err(anyhow!("unexpected end of input"));
    }
    Ok(line.trim().to_string())
}

/// Menu answers in prompt order: choice, input path, output path.
fn read_answers<R: BufRead, O: Write>(input: &mut R, out: &mut O) -> Result<(String, String, String)> {
    writeln!(out, "==== Multithreaded File Compressor/Decompressor ====")?;
    let choice = prompt_line(input, out, "1. Compress a file\n2. Decompress a file\nEnter choice: ")?;
    let in_path = prompt_line(input, out, "Enter input file path: ")?;
    let out_path = prompt_line(input, out, "Enter output file path: ")?;
    Ok((choice, in_path, out_path))
}

/// Menu, choice, input path, output path, then run.
fn run_interactive<R: BufRead, O: Write, E: Write>(
    input: &mut R,
    out: &mut O,
    err: &mut E,
    config: &PipelineConfig,
) -> Result<()> {
    let (choice, in_path, out_path) = match read_answers(input, out) {
        Ok(answers) => answers,
        Err(e) => {
            writeln!(err, "Error reading input: {e}.")?;
            return Err(e);
        }
    };

    let op = match choice.parse::<Operation>() {
        Ok(op) => op,
        Err(reason) => {
            writeln!(err, "Invalid choice.")?;
            return Err(anyhow!(reason));
        }
    };

    run_file_op(op, PathBuf::from(in_path), PathBuf::from(out_path), config, false, out, err)
}

fn run_inspect<O: Write, E: Write>(
    input: PathBuf,
    opts: &PipelineArgs,
    out: &mut O,
    err: &mut E,
) -> Result<()> {
    let summary = match inspect_container(InputSource::File(input.clone()), &opts.to_config()) {
        Ok(summary) => summary,
        Err(e) => {
            writeln!(err, "{}", failure_line("Inspection", &e))?;
            return Err(e).with_context(|| format!("inspect {}", input.display()));
        }
    };

    if opts.json {
        writeln!(out, "{}", serde_json::to_string_pretty(&summary)?)?;
    } else {
        writeln!(out, "records:          {}", summary.records)?;
        writeln!(out, "container bytes:  {}", summary.total_bytes)?;
        writeln!(out, "largest payload:  {}", summary.largest_payload())?;
    }
    Ok(())
}

fn run(cli: Cli) -> Result<()> {
    let stdout = io::stdout();
    let stderr = io::stderr();
    let mut out = stdout.lock();
    let mut err = stderr.lock();

    match cli.command {
        None => {
            let stdin = io::stdin();
            let mut input = stdin.lock();
            run_interactive(&mut input, &mut out, &mut err, &PipelineConfig::default())
        }
        Some(Command::Compress { input, output, opts }) => {
            run_file_op(Operation::Compress, input, output, &opts.to_config(), opts.json, &mut out, &mut err)
        }
        Some(Command::Decompress { input, output, opts }) => {
            run_file_op(Operation::Decompress, input, output, &opts.to_config(), opts.json, &mut out, &mut err)
        }
        Some(Command::Inspect { input, opts }) => run_inspect(input, &opts, &mut out, &mut err),
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            debug!("{e:#}");
            ExitCode::FAILURE
        }
    }
}
