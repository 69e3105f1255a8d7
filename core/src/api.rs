// ## `api.rs` — stable public API

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use log::{info, warn};

use crate::{
    container::{ContainerSummary, RecordReader},
    io::{open_input, open_output, take_buffer, InputSource, OutputSink},
    pipeline::{run_compress_pipeline, run_decompress_pipeline, PipelineConfig},
    telemetry::TelemetrySnapshot,
    types::StreamError,
};

/// The two things the tool can do to a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Compress,
    Decompress,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Compress => f.write_str("compress"),
            Operation::Decompress => f.write_str("decompress"),
        }
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "1" | "compress" | "c" => Ok(Operation::Compress),
            "2" | "decompress" | "d" => Ok(Operation::Decompress),
            other => Err(format!("unknown operation: {other}")),
        }
    }
}

/// Compress `input` into a record container written to `output`.
///
/// Config is validated and the input opened before the output is created,
/// so a bad config or a missing input never leaves an output file behind.
pub fn compress_stream(
    input: InputSource,
    output: OutputSink,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    run_operation(Operation::Compress, input, output, config)
}

/// Reconstruct the original bytes from a record container.
pub fn decompress_stream(
    input: InputSource,
    output: OutputSink,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    run_operation(Operation::Decompress, input, output, config)
}

/// Open both ends and run the selected pipeline.
pub fn run_operation(
    op: Operation,
    input: InputSource,
    output: OutputSink,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    let codec = config.build_codec()?;
    let profile = config.profile();

    let reader = open_input(input)?;
    let (writer, maybe_buf) = open_output(output)?;

    info!(
        "[PIPELINE] {} with codec={} chunk_size={} workers={}",
        op,
        codec.name(),
        config.chunk_size,
        profile.workers
    );

    let result = match op {
        Operation::Compress => {
            run_compress_pipeline(reader, writer, codec.as_ref(), config.chunk_size, profile)
        }
        Operation::Decompress => {
            run_decompress_pipeline(reader, writer, codec.as_ref(), config.chunk_size, profile)
        }
    };

    let mut snapshot = match result {
        Ok(snapshot) => snapshot,
        Err(e) => {
            warn!("[PIPELINE] {} failed at stage {}: {}", op, e.stage(), e);
            return Err(e);
        }
    };

    if let Some(buf) = maybe_buf {
        snapshot.attach_output(take_buffer(&buf));
    }

    Ok(snapshot)
}

/// Compress the file at `input` into a new container at `output`.
pub fn compress_file(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    compress_stream(
        InputSource::File(input.to_path_buf()),
        OutputSink::File(output.to_path_buf()),
        config,
    )
}

/// Decompress the container at `input` into a new file at `output`.
pub fn decompress_file(
    input: &Path,
    output: &Path,
    config: &PipelineConfig,
) -> Result<TelemetrySnapshot, StreamError> {
    decompress_stream(
        InputSource::File(input.to_path_buf()),
        OutputSink::File(output.to_path_buf()),
        config,
    )
}

/// Walk a container without decompressing it.
///
/// Uses the same record size limit as decompression with `config`.
pub fn inspect_container(
    input: InputSource,
    config: &PipelineConfig,
) -> Result<ContainerSummary, StreamError> {
    let codec = config.build_codec()?;
    let reader = open_input(input)?;
    let max_payload = codec.compress_bound(config.chunk_size);

    let mut records = RecordReader::new(reader, max_payload);
    let mut summary = ContainerSummary::default();
    loop {
        match records.next_record() {
            Ok(Some(record)) => summary.push(&record),
            Ok(None) => return Ok(summary),
            Err(e) => return Err(StreamError::from_container(records.next_index(), e)),
        }
    }
}
