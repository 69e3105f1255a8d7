//! compression/codecs/mod.rs
//! Concrete `ChunkCodec` implementations.

pub mod deflate;
pub mod lz4;
pub mod zstd;

pub use self::deflate::*;
pub use self::lz4::*;
pub use self::zstd::*;
