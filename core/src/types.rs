use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::{
    compression::CompressionError,
    container::ContainerError,
    pipeline::ConfigError,
};

/// Which end of an operation a file belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoRole {
    Input,
    Output,
}

impl fmt::Display for IoRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IoRole::Input => f.write_str("input"),
            IoRole::Output => f.write_str("output"),
        }
    }
}

/// Unified stream error covering open, I/O, codec, container and config failures.
/// - `From<T>` impls enable `?` across the pipeline.
/// - Chunk-level failures carry the chunk index; container failures carry
///   how many records were fully processed before the fault.
#[derive(Debug, Error)]
pub enum StreamError {
    /// Input or output could not be opened. Nothing was processed.
    #[error("cannot open {role} file {}: {source}", .path.display())]
    IoOpen {
        role: IoRole,
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Compression or decompression of one chunk failed.
    #[error("codec failure on chunk {chunk_index}: {source}")]
    Codec {
        chunk_index: u64,
        #[source]
        source: CompressionError,
    },

    /// A record could not be framed out of the container.
    #[error("corrupt container after {records_ok} records: {source}")]
    CorruptContainer {
        records_ok: u64,
        #[source]
        source: ContainerError,
    },

    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),

    /// Worker panic or lost channel.
    #[error("pipeline error: {0}")]
    Pipeline(&'static str),
}

impl StreamError {
    /// Framing failures become `CorruptContainer`; plain I/O stays `Io`.
    pub fn from_container(records_ok: u64, err: ContainerError) -> Self {
        match err {
            ContainerError::Io(e) => StreamError::Io(e),
            source => StreamError::CorruptContainer { records_ok, source },
        }
    }

    /// Short name of the stage that failed, for one-line status messages.
    pub fn stage(&self) -> &'static str {
        match self {
            StreamError::IoOpen { .. } => "open",
            StreamError::Io(_) => "io",
            StreamError::Codec { .. } => "codec",
            StreamError::CorruptContainer { .. } => "container",
            StreamError::Config(_) => "config",
            StreamError::Pipeline(_) => "pipeline",
        }
    }

    /// Index of the first failing chunk, when the failure is chunk-scoped.
    pub fn chunk_index(&self) -> Option<u64> {
        match self {
            StreamError::Codec { chunk_index, .. } => Some(*chunk_index),
            StreamError::CorruptContainer { records_ok, .. } => Some(*records_ok),
            _ => None,
        }
    }
}
