//! pipeline/config.rs
//! Run configuration shared by both pipelines.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::compression::{create_codec, ChunkCodec, CompressionCodec, CompressionError};
use crate::constants::{ALLOWED_CHUNK_SIZES, CHUNK_SIZE, DEFAULT_MEM_FRACTION, MAX_WORKERS};
use crate::pipeline::parallelism::ParallelismProfile;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid chunk size {size}; allowed sizes: {allowed:?}")]
    InvalidChunkSize { size: usize, allowed: &'static [usize] },

    #[error("invalid worker count {workers}; must be within 1..={max}")]
    InvalidWorkers { workers: usize, max: usize },

    #[error(transparent)]
    Codec(#[from] CompressionError),
}

/// Codec choice, chunk size and worker bound for one operation.
///
/// Compression and decompression of the same container must agree on
/// `codec` and `chunk_size`; neither is recorded in the container.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    pub codec: CompressionCodec,
    /// `None` = codec default.
    pub level: Option<i32>,
    pub chunk_size: usize,
    /// `None` = derive from hardware threads and available memory.
    pub workers: Option<usize>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            codec: CompressionCodec::default(),
            level: None,
            chunk_size: CHUNK_SIZE,
            workers: None,
        }
    }
}

impl PipelineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_codec(mut self, codec: CompressionCodec) -> Self {
        self.codec = codec;
        self
    }

    pub fn with_level(mut self, level: i32) -> Self {
        self.level = Some(level);
        self
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if !ALLOWED_CHUNK_SIZES.contains(&self.chunk_size) {
            return Err(ConfigError::InvalidChunkSize {
                size: self.chunk_size,
                allowed: ALLOWED_CHUNK_SIZES,
            });
        }
        if let Some(workers) = self.workers {
            if workers == 0 || workers > MAX_WORKERS {
                return Err(ConfigError::InvalidWorkers { workers, max: MAX_WORKERS });
            }
        }
        Ok(())
    }

    /// Validate, then build the configured codec.
    pub fn build_codec(&self) -> Result<Box<dyn ChunkCodec>, ConfigError> {
        self.validate()?;
        Ok(create_codec(self.codec, self.level)?)
    }

    /// Worker bound for this run.
    pub fn profile(&self) -> ParallelismProfile {
        match self.workers {
            Some(n) => ParallelismProfile::fixed(n),
            None => ParallelismProfile::dynamic(self.chunk_size, DEFAULT_MEM_FRACTION),
        }
    }
}
