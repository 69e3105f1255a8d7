//! pipeline/mod.rs
//! Parallel chunk pipelines.
//!
//! - `compress`: batch-synchronous, at most `workers` chunks in flight per batch.
//! - `decompress`: a fixed set of workers pulling records from a shared reader.
//! - Both funnel results through `OrderedWriter`, so output order is chunk
//!   order no matter which worker finishes first.

pub mod config;
pub mod parallelism;
pub mod ordered;
pub mod compress;
pub mod decompress;

pub use config::*;
pub use parallelism::*;
pub use ordered::*;
pub use compress::run_compress_pipeline;
pub use decompress::run_decompress_pipeline;
