//! codecs/lz4.rs
//! LZ4 block codec (no size prefix, no frame). Levels are not supported in block mode.
use lz4_flex::block::{compress_into, decompress_into, get_maximum_output_size, DecompressError};

use crate::compression::types::{ChunkCodec, CompressionError};

const CODEC: &str = "lz4";

#[derive(Debug, Clone, Copy, Default)]
pub struct Lz4Codec;

impl Lz4Codec {
    pub fn new(level: Option<i32>) -> Result<Self, CompressionError> {
        match level {
            None | Some(0) => Ok(Self),
            Some(level) => Err(CompressionError::InvalidLevel { codec: CODEC, level }),
        }
    }
}

impl ChunkCodec for Lz4Codec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn compress_bound(&self, len: usize) -> usize {
        get_maximum_output_size(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let bound = self.compress_bound(raw.len());
        let mut out = vec![0u8; bound];
        let written = compress_into(raw, &mut out)
            .map_err(|_| CompressionError::BoundExceeded { codec: CODEC, bound })?;
        out.truncate(written);
        Ok(out)
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        let mut out = vec![0u8; max_output];
        match decompress_into(compressed, &mut out) {
            Ok(written) => {
                out.truncate(written);
                Ok(out)
            }
            Err(DecompressError::OutputTooSmall { .. }) => {
                Err(CompressionError::OutputOverflow { codec: CODEC, max: max_output })
            }
            Err(e) => Err(CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() }),
        }
    }
}
