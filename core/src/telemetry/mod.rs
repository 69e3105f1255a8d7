//! telemetry/mod.rs
//! Counters, stage timers and the immutable per-operation snapshot.
//!
//! - Counters are collected by the coordinator thread only, no atomics in the hot path.
//! - The snapshot is what an operation reports back to its caller.

pub mod counters;
pub mod timers;
pub mod snapshot;

pub use counters::*;
pub use timers::*;
pub use snapshot::*;
