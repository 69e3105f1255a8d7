//! compression/registry.rs
//! Codec registry and factory functions.

use crate::compression::codecs::{DeflateCodec, Lz4Codec, ZstdCodec};
use crate::compression::types::{ChunkCodec, CompressionCodec, CompressionError};

/// Build a codec by enum, validating the level.
pub fn create_codec(codec: CompressionCodec, level: Option<i32>)
    -> Result<Box<dyn ChunkCodec>, CompressionError>
{
    match codec {
        CompressionCodec::Zstd    => Ok(Box::new(ZstdCodec::new(level)?)),
        CompressionCodec::Lz4     => Ok(Box::new(Lz4Codec::new(level)?)),
        CompressionCodec::Deflate => Ok(Box::new(DeflateCodec::new(level)?)),
    }
}
