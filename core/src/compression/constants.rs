//! compression/constants.rs
//! Stable codec IDs and default levels.

/// Stable codec IDs (u16) used by the registry and config.
pub mod codec_ids {
    pub const ZSTD: u16    = 0x0001;
    pub const LZ4: u16     = 0x0002;
    pub const DEFLATE: u16 = 0x0003;
}

/// Default compression levels (balanced).
pub const DEFAULT_LEVEL_ZSTD: i32 = 3;
pub const DEFAULT_LEVEL_DEFLATE: i32 = 6;

/// zlib accepts 0 (store) ..= 9 (best).
pub const MAX_LEVEL_DEFLATE: i32 = 9;
