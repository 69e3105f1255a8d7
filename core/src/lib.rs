//! chunkpress-core
//!
//! Parallel chunked compression engine.
//! Splits a byte stream into fixed-size chunks, compresses them concurrently
//! and writes length-prefixed records in chunk order. No CLI, no FFI.

#![forbid(unsafe_code)]

// Shared and top level
pub mod constants;
pub mod types;
pub mod io;

// Building blocks
pub mod compression;
pub mod container;
pub mod telemetry;

// Stream layers
pub mod pipeline;
pub mod api;

// -----------------------------------------------------------------------------
// Prelude (Rust users)
// -----------------------------------------------------------------------------
pub mod prelude {
    pub use crate::compression::{ChunkCodec, CompressionCodec, CompressionError};
    pub use crate::constants::CHUNK_SIZE;
    pub use crate::container::{ContainerError, ContainerSummary};
    pub use crate::api::{
        compress_file, compress_stream, decompress_file, decompress_stream, inspect_container,
        run_operation, Operation,
    };
    pub use crate::io::{InputSource, OutputSink};
    pub use crate::pipeline::{ConfigError, PipelineConfig};
    pub use crate::telemetry::TelemetrySnapshot;
    pub use crate::types::{IoRole, StreamError};
}
