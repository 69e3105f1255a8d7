//! Deflate (zlib wrapper) via flate2, single-shot into bounded buffers.
//!
//! Output is a plain zlib stream, the same bytes zlib's `compress()` produces,
//! with no extra length prefix or trailer.

use flate2::{Compress, Compression, Decompress, FlushCompress, FlushDecompress, Status};

use crate::compression::constants::{DEFAULT_LEVEL_DEFLATE, MAX_LEVEL_DEFLATE};
use crate::compression::types::{ChunkCodec, CompressionError};

const CODEC: &str = "deflate";

/// zlib's `compressBound`.
#[inline]
pub fn deflate_bound(len: usize) -> usize {
    len + (len >> 12) + (len >> 14) + (len >> 25) + 13
}

#[derive(Debug, Clone, Copy)]
pub struct DeflateCodec {
    level: Compression,
}

impl DeflateCodec {
    pub fn new(level: Option<i32>) -> Result<Self, CompressionError> {
        let level = level.unwrap_or(DEFAULT_LEVEL_DEFLATE);
        if !(0..=MAX_LEVEL_DEFLATE).contains(&level) {
            return Err(CompressionError::InvalidLevel { codec: CODEC, level });
        }
        Ok(Self { level: Compression::new(level as u32) })
    }
}

impl Default for DeflateCodec {
    fn default() -> Self {
        Self { level: Compression::new(DEFAULT_LEVEL_DEFLATE as u32) }
    }
}

fn process_failed(msg: impl ToString) -> CompressionError {
    CompressionError::CodecProcessFailed { codec: CODEC, msg: msg.to_string() }
}

impl ChunkCodec for DeflateCodec {
    fn name(&self) -> &'static str {
        CODEC
    }

    fn compress_bound(&self, len: usize) -> usize {
        deflate_bound(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        let bound = deflate_bound(raw.len());
        let mut out = Vec::with_capacity(bound);
        let mut enc = Compress::new(self.level, true);

        loop {
            let consumed = enc.total_in() as usize;
            let produced = enc.total_out();
            let status = enc
                .compress_vec(&raw[consumed..], &mut out, FlushCompress::Finish)
                .map_err(process_failed)?;

            if status == Status::StreamEnd {
                break;
            }
            if out.len() >= bound {
                return Err(CompressionError::BoundExceeded { codec: CODEC, bound });
            }
            if enc.total_in() as usize == consumed && enc.total_out() == produced {
                return Err(process_failed("encoder made no progress"));
            }
        }

        Ok(out)
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        let mut out = Vec::with_capacity(max_output);
        let mut dec = Decompress::new(true);

        loop {
            let consumed = dec.total_in() as usize;
            let produced = dec.total_out();
            let status = dec
                .decompress_vec(&compressed[consumed..], &mut out, FlushDecompress::Finish)
                .map_err(process_failed)?;

            if status == Status::StreamEnd {
                break;
            }

            if out.len() >= max_output {
                // Buffer is full: the stream may still end without producing more bytes
                // (adler32 trailer). Any further output means the payload is too large.
                let consumed = dec.total_in() as usize;
                let mut tail = Vec::with_capacity(1);
                let status = dec
                    .decompress_vec(&compressed[consumed..], &mut tail, FlushDecompress::Finish)
                    .map_err(process_failed)?;
                if !tail.is_empty() {
                    return Err(CompressionError::OutputOverflow { codec: CODEC, max: max_output });
                }
                if status == Status::StreamEnd {
                    break;
                }
                return Err(process_failed("truncated zlib stream"));
            }

            if dec.total_in() as usize == consumed && dec.total_out() == produced {
                return Err(process_failed("truncated zlib stream"));
            }
        }

        if out.len() > max_output {
            return Err(CompressionError::OutputOverflow { codec: CODEC, max: max_output });
        }
        Ok(out)
    }
}
