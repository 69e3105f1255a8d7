//! src/compression/codecs/zstd.rs
//!
//! Zstd block codec.
//!
//! Design notes:
//! - Uses the bulk API (`zstd::bulk`), each chunk is a standalone zstd frame.
//! - Decompression is read through `take(max_output + 1)`, so any output past
//!   the caller's bound is `OutputOverflow`, declared frame size or not.

use std::io::Read;

use crate::compression::constants::DEFAULT_LEVEL_ZSTD;
use crate::compression::types::{ChunkCodec, CompressionError};

const CODEC: &str = "zstd";

#[derive(Debug, Clone, Copy)]
pub struct ZstdCodec {
    level: i32,
}

impl ZstdCodec {
    pub fn new(level: Option<i32>) -> Result<Self, CompressionError> {
        let level = level.unwrap_or(DEFAULT_LEVEL_ZSTD);
        if !zstd::compression_level_range().contains(&level) {
            return Err(CompressionError::InvalidLevel { codec: CODEC, level });
        }
        Ok(Self { level })
    }
}

impl ChunkCodec for ZstdCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn compress_bound(&self, len: usize) -> usize {
        zstd_safe::compress_bound(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let bound = self.compress_bound(raw.len());
        let compressed = zstd::bulk::compress(raw, self.level)
            .map_err(|e| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() })?;

        if compressed.len() > bound {
            return Err(CompressionError::BoundExceeded { codec: CODEC, bound });
        }
        Ok(compressed)
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        // A frame that declares more than `max_output` is an overflow, not corruption.
        if let Ok(Some(size)) = zstd_safe::get_frame_content_size(compressed) {
            if size > max_output as u64 {
                return Err(CompressionError::OutputOverflow { codec: CODEC, max: max_output });
            }
        }

        let process_failed =
            |e: std::io::Error| CompressionError::CodecProcessFailed { codec: CODEC, msg: e.to_string() };

        let decoder = zstd::stream::read::Decoder::with_buffer(compressed).map_err(process_failed)?;
        let mut out = Vec::with_capacity(max_output);
        decoder
            .take(max_output as u64 + 1)
            .read_to_end(&mut out)
            .map_err(process_failed)?;

        if out.len() > max_output {
            return Err(CompressionError::OutputOverflow { codec: CODEC, max: max_output });
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn declared_size_over_capacity_is_overflow() {
        let codec = ZstdCodec::new(None).unwrap();
        let packed = codec.compress(&vec![7u8; 8192]).unwrap();
        assert!(matches!(
            codec.decompress(&packed, 4096),
            Err(CompressionError::OutputOverflow { max: 4096, .. })
        ));
    }

    #[test]
    fn exact_capacity_fits() {
        let codec = ZstdCodec::new(None).unwrap();
        let data = vec![3u8; 4096];
        let packed = codec.compress(&data).unwrap();
        assert_eq!(codec.decompress(&packed, 4096).unwrap(), data);
    }

    #[test]
    fn truncated_frame_is_process_failure() {
        let codec = ZstdCodec::new(None).unwrap();
        let packed = codec.compress(&vec![5u8; 8192]).unwrap();
        assert!(matches!(
            codec.decompress(&packed[..packed.len() / 2], 8192),
            Err(CompressionError::CodecProcessFailed { .. })
        ));
    }

    #[test]
    fn garbage_is_rejected() {
        let codec = ZstdCodec::new(None).unwrap();
        assert!(codec.decompress(b"definitely not zstd", 1024).is_err());
    }
}
