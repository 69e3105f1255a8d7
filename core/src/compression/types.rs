//! compression/types.rs
//! Codec identifiers, the codec adapter trait and its error type.
use std::fmt;
use std::str::FromStr;

use num_enum::TryFromPrimitive;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::constants::codec_ids;

/// Codec identifiers. Not written to the container: both directions must agree on it.
#[repr(u16)]
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, TryFromPrimitive, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CompressionCodec {
    Zstd    = codec_ids::ZSTD,
    Lz4     = codec_ids::LZ4,
    Deflate = codec_ids::DEFLATE,
}

impl CompressionCodec {
    pub const ALL: [CompressionCodec; 3] = [
        CompressionCodec::Deflate,
        CompressionCodec::Zstd,
        CompressionCodec::Lz4,
    ];

    pub fn name(self) -> &'static str {
        match self {
            CompressionCodec::Zstd    => "zstd",
            CompressionCodec::Lz4     => "lz4",
            CompressionCodec::Deflate => "deflate",
        }
    }
}

impl Default for CompressionCodec {
    fn default() -> Self {
        CompressionCodec::Deflate
    }
}

impl fmt::Display for CompressionCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CompressionCodec {
    type Err = CompressionError;

    /// Accepts a codec name or its numeric id (`3` is deflate).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Ok(codec_id) = s.trim().parse::<u16>() {
            return CompressionCodec::try_from(codec_id)
                .map_err(|_| CompressionError::UnsupportedCodec { codec_id });
        }
        match s.to_ascii_lowercase().as_str() {
            "zstd"                   => Ok(CompressionCodec::Zstd),
            "lz4"                    => Ok(CompressionCodec::Lz4),
            "deflate" | "zlib"       => Ok(CompressionCodec::Deflate),
            other => Err(CompressionError::UnknownCodecName(other.to_string())),
        }
    }
}

/// Render a raw id as its enum name when known, hex otherwise.
pub fn enum_name_or_hex<T>(raw: T::Primitive) -> String
where
    T: TryFromPrimitive + fmt::Debug,
    T::Primitive: fmt::LowerHex,
{
    match T::try_from_primitive(raw) {
        Ok(variant) => format!("{:?}", variant),
        Err(_) => format!("0x{:x}", raw),
    }
}

fn codec_label(codec_id: &u16) -> String {
    enum_name_or_hex::<CompressionCodec>(*codec_id)
}

#[derive(Debug, Error)]
pub enum CompressionError {
    #[error("unsupported compression codec: {}", codec_label(.codec_id))]
    UnsupportedCodec { codec_id: u16 },

    #[error("unknown codec name: {0}")]
    UnknownCodecName(String),

    #[error("invalid level {level} for codec {codec}")]
    InvalidLevel { codec: &'static str, level: i32 },

    #[error("codec {codec} process failed: {msg}")]
    CodecProcessFailed { codec: &'static str, msg: String },

    /// Compressed output did not fit the declared worst-case bound.
    #[error("codec {codec} output exceeded its bound of {bound} bytes")]
    BoundExceeded { codec: &'static str, bound: usize },

    /// Decompressed payload would be larger than the caller's buffer.
    #[error("codec {codec} decompressed output exceeds {max} bytes")]
    OutputOverflow { codec: &'static str, max: usize },
}

/// Black-box byte transform used by the pipelines.
///
/// Implementations are stateless and shared by reference between workers.
pub trait ChunkCodec: Send + Sync {
    fn name(&self) -> &'static str;

    /// Worst-case compressed size for an input of `len` bytes.
    fn compress_bound(&self, len: usize) -> usize;

    /// Compress one chunk. Output never exceeds `compress_bound(raw.len())`.
    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError>;

    /// Decompress one record payload into at most `max_output` bytes.
    /// Fails with `OutputOverflow` rather than truncating.
    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError>;
}
