//! telemetry/counters.rs
//! Mutable counters used during one compress or decompress run.
//!
//! Converted into an immutable `TelemetrySnapshot` at pipeline end.
use serde::Serialize;

use crate::constants::RECORD_PREFIX_LEN;

/// Deterministic counters collected during stream processing
#[derive(Default, Clone, Debug, PartialEq, Serialize)]
pub struct TelemetryCounters {
    /// Chunks (= records) that made it to the output.
    pub chunks: u64,
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    /// Length-prefix bytes.
    pub bytes_overhead: u64,
}

impl TelemetryCounters {
    /// Record one chunk that was written.
    ///
    /// - `raw_len`: uncompressed chunk length
    /// - `compressed_len`: record payload length
    pub fn add_chunk(&mut self, raw_len: usize, compressed_len: usize) {
        self.chunks += 1;
        self.bytes_raw += raw_len as u64;
        self.bytes_compressed += compressed_len as u64;
        self.bytes_overhead += RECORD_PREFIX_LEN as u64;
    }

    /// Size of the container these counters describe.
    pub fn container_bytes(&self) -> u64 {
        self.bytes_compressed + self.bytes_overhead
    }
}
