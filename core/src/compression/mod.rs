//! compression/mod.rs
//! Codec adapter: per-chunk compress/decompress over byte buffers.
//!
//! - Each chunk is compressed independently, no state spans chunks.
//! - Every codec declares a worst-case output bound for a given input length.
//! - Decompression is always bounded by the caller; overflow is an error.
//! - Registry builds a codec from its enum (names and numeric ids both parse to it).

pub mod constants;
pub mod types;
pub mod registry;
pub mod codecs;

pub use constants::*;
pub use types::*;
pub use registry::*;
