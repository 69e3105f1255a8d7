//! Stable sizes and limits shared by the framer, the pipelines and config validation.

/// Default chunk size (1 MiB). Every chunk read from the input is at most this long.
pub const CHUNK_SIZE: usize = 1024 * 1024;

/// Width of the record length prefix on disk.
/// Always a little-endian `u64`, independent of the producing platform.
pub const RECORD_PREFIX_LEN: usize = 8;

/// Chunk sizes accepted by `PipelineConfig::validate`.
pub const ALLOWED_CHUNK_SIZES: &[usize] = &[
    16 * 1024,   // 16 KiB
    32 * 1024,   // 32 KiB
    64 * 1024,   // 64 KiB
    128 * 1024,  // 128 KiB
    256 * 1024,  // 256 KiB
    1024 * 1024, // 1 MiB
    2048 * 1024, // 2 MiB
    4096 * 1024, // 4 MiB
];

/// Hard cap on explicitly requested workers.
pub const MAX_WORKERS: usize = 256;

/// Fraction of available memory the pipelines may budget for in-flight chunks.
pub const DEFAULT_MEM_FRACTION: f64 = 0.50;
