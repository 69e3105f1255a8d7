use std::io;

use serde::Serialize;
use thiserror::Error;

use crate::constants::RECORD_PREFIX_LEN;

/// One decoded record, tagged with its 0-based position in the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub index: u64,
    pub payload: Vec<u8>,
}

impl Record {
    /// Bytes this record occupies on disk.
    pub fn wire_len(&self) -> usize {
        RECORD_PREFIX_LEN + self.payload.len()
    }
}

/// Shape of a container, gathered without decompressing anything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ContainerSummary {
    pub records: u64,
    pub payload_lens: Vec<u64>,
    pub total_bytes: u64,
}

impl ContainerSummary {
    pub fn push(&mut self, record: &Record) {
        self.records += 1;
        self.payload_lens.push(record.payload.len() as u64);
        self.total_bytes += record.wire_len() as u64;
    }

    pub fn largest_payload(&self) -> u64 {
        self.payload_lens.iter().copied().max().unwrap_or(0)
    }
}

#[derive(Debug, Error)]
pub enum ContainerError {
    #[error("truncated length prefix: got {got} of {} bytes", RECORD_PREFIX_LEN)]
    TruncatedPrefix { got: usize },

    #[error("truncated record: expected {expected} payload bytes, got {actual}")]
    TruncatedRecord { expected: u64, actual: u64 },

    #[error("record length {len} exceeds maximum {max}")]
    OversizedRecord { len: u64, max: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
