//! pipeline/parallelism.rs
//! Worker bound and in-flight accounting.

use std::sync::atomic::{AtomicUsize, Ordering};

use log::debug;

use crate::constants::MAX_WORKERS;

/// Parallelism configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParallelismProfile {
    pub workers: usize,
}

impl ParallelismProfile {
    /// Exactly `workers` (clamped to `1..=MAX_WORKERS`).
    pub fn fixed(workers: usize) -> Self {
        Self { workers: workers.clamp(1, MAX_WORKERS) }
    }

    /// One worker per hardware thread, capped so that in-flight chunks fit in
    /// `mem_fraction` of available memory.
    pub fn dynamic(chunk_size: usize, mem_fraction: f64) -> Self {
        let cores = num_cpus::get();

        let mut sys = sysinfo::System::new();
        sys.refresh_memory();
        let avail_bytes = sys.available_memory();

        // Budget = fraction of available memory; each in-flight chunk holds
        // its input and its output.
        let budget = (avail_bytes as f64 * mem_fraction) as u64;
        let per_chunk = (2 * chunk_size.max(1)) as u64;
        let by_memory = if avail_bytes == 0 {
            cores
        } else {
            (budget / per_chunk) as usize
        };

        let workers = cores.min(by_memory).clamp(1, MAX_WORKERS);
        debug!(
            "[PROFILE] cores={}, avail_bytes={}, by_memory={}, workers={}",
            cores, avail_bytes, by_memory, workers
        );

        Self { workers }
    }
}

/// Tracks how many chunk tasks are running right now and the peak.
#[derive(Debug, Default)]
pub struct InFlightGauge {
    current: AtomicUsize,
    peak: AtomicUsize,
}

impl InFlightGauge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark one task as running until the guard drops.
    pub fn enter(&self) -> InFlightGuard<'_> {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        InFlightGuard { gauge: self }
    }

    pub fn current(&self) -> usize {
        self.current.load(Ordering::SeqCst)
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

pub struct InFlightGuard<'a> {
    gauge: &'a InFlightGauge,
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.gauge.current.fetch_sub(1, Ordering::SeqCst);
    }
}
