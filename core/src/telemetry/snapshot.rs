//! Immutable per-operation report.

use std::time::Duration;

use serde::Serialize;

use crate::telemetry::counters::TelemetryCounters;
use crate::telemetry::timers::{Stage, StageTimes, TelemetryTimer};

/// Counters, ratio, throughput, stage timings and concurrency of one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TelemetrySnapshot {
    pub chunks: u64,
    pub bytes_raw: u64,
    pub bytes_compressed: u64,
    pub bytes_overhead: u64,
    /// compressed / raw; 0.0 for empty input.
    pub compression_ratio: f64,
    pub throughput_raw_bytes_per_sec: f64,
    pub elapsed: Duration,
    pub stage_times: StageTimes,
    /// Worker bound the run was configured with.
    pub workers: usize,
    /// Highest number of chunk tasks observed running at once.
    pub max_in_flight: usize,
    /// Captured output for `OutputSink::Memory`.
    #[serde(skip)]
    pub output: Option<Vec<u8>>,
}

impl TelemetrySnapshot {
    pub fn from(
        counters: &TelemetryCounters,
        timer: &TelemetryTimer,
        workers: usize,
        max_in_flight: usize,
    ) -> Self {
        let elapsed = timer.elapsed();

        let compression_ratio = if counters.bytes_raw > 0 {
            counters.bytes_compressed as f64 / counters.bytes_raw as f64
        } else {
            0.0
        };

        let throughput = if elapsed.as_secs_f64() > 0.0 {
            counters.bytes_raw as f64 / elapsed.as_secs_f64()
        } else {
            0.0
        };

        Self {
            chunks: counters.chunks,
            bytes_raw: counters.bytes_raw,
            bytes_compressed: counters.bytes_compressed,
            bytes_overhead: counters.bytes_overhead,
            compression_ratio,
            throughput_raw_bytes_per_sec: throughput,
            elapsed,
            stage_times: timer.stage_times.clone(),
            workers,
            max_in_flight,
            output: None,
        }
    }

    pub fn attach_output(&mut self, buf: Vec<u8>) {
        self.output = Some(buf);
    }

    /// Size of the container side of the operation.
    pub fn container_bytes(&self) -> u64 {
        self.bytes_compressed + self.bytes_overhead
    }

    pub fn has_all_stages(&self, expected: &[Stage]) -> bool {
        self.stage_times.has_all(expected)
    }

    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}
