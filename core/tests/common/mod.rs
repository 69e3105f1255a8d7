// Shared helpers for the integration tests: payload generators and
// `ChunkCodec` wrappers that delay, count or fail on purpose.
#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use rand::{rngs::StdRng, Rng, SeedableRng};

use chunkpress_core::compression::codecs::DeflateCodec;
use chunkpress_core::compression::{ChunkCodec, CompressionError};

pub const SMALL_CHUNK: usize = 16 * 1024;

/// Compressible but non-trivial bytes.
pub fn text_payload(len: usize) -> Vec<u8> {
    b"the quick brown fox jumps over the lazy dog 0123456789\n"
        .iter()
        .copied()
        .cycle()
        .take(len)
        .collect()
}

/// Incompressible bytes, reproducible from `seed`.
pub fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut buf = vec![0u8; len];
    rng.fill(&mut buf[..]);
    buf
}

/// Chunk `i` is filled with byte `i`, so a codec can tell chunks apart.
pub fn indexed_payload(chunks: usize, chunk_size: usize) -> Vec<u8> {
    (0..chunks).flat_map(|i| std::iter::repeat(i as u8).take(chunk_size)).collect()
}

/// Deflate, but lower chunk ids (first byte) take longer, so completion
/// order is roughly the reverse of chunk order.
pub struct DelayCodec {
    inner: DeflateCodec,
    slowest: u8,
}

impl DelayCodec {
    pub fn new(slowest: u8) -> Self {
        Self { inner: DeflateCodec::default(), slowest }
    }

    fn nap(&self, tag: u8) {
        let steps = self.slowest.saturating_sub(tag) as u64;
        thread::sleep(Duration::from_millis(3 * steps));
    }
}

impl ChunkCodec for DelayCodec {
    fn name(&self) -> &'static str {
        "delay"
    }

    fn compress_bound(&self, len: usize) -> usize {
        self.inner.compress_bound(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        self.nap(raw.first().copied().unwrap_or(0));
        self.inner.compress(raw)
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        let out = self.inner.decompress(compressed, max_output)?;
        self.nap(out.first().copied().unwrap_or(0));
        Ok(out)
    }
}

/// Deflate that records how many calls overlap.
#[derive(Default)]
pub struct CountingCodec {
    inner: DeflateCodec,
    current: AtomicUsize,
    peak: AtomicUsize,
    calls: AtomicUsize,
}

impl CountingCodec {
    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn track<T>(&self, f: impl FnOnce() -> T) -> T {
        let now = self.current.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        self.calls.fetch_add(1, Ordering::SeqCst);
        thread::sleep(Duration::from_millis(2));
        let out = f();
        self.current.fetch_sub(1, Ordering::SeqCst);
        out
    }
}

impl ChunkCodec for CountingCodec {
    fn name(&self) -> &'static str {
        "counting"
    }

    fn compress_bound(&self, len: usize) -> usize {
        self.inner.compress_bound(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        self.track(|| self.inner.compress(raw))
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        self.track(|| self.inner.decompress(compressed, max_output))
    }
}

/// Deflate that fails on every chunk whose first byte is in `poison`.
pub struct FailingCodec {
    inner: DeflateCodec,
    poison: Vec<u8>,
}

impl FailingCodec {
    pub fn new(poison: &[u8]) -> Self {
        Self { inner: DeflateCodec::default(), poison: poison.to_vec() }
    }

    fn check(&self, data: &[u8]) -> Result<(), CompressionError> {
        match data.first() {
            Some(b) if self.poison.contains(b) => Err(CompressionError::CodecProcessFailed {
                codec: "failing",
                msg: format!("poisoned chunk {b}"),
            }),
            _ => Ok(()),
        }
    }
}

impl ChunkCodec for FailingCodec {
    fn name(&self) -> &'static str {
        "failing"
    }

    fn compress_bound(&self, len: usize) -> usize {
        self.inner.compress_bound(len)
    }

    fn compress(&self, raw: &[u8]) -> Result<Vec<u8>, CompressionError> {
        self.check(raw)?;
        self.inner.compress(raw)
    }

    fn decompress(&self, compressed: &[u8], max_output: usize) -> Result<Vec<u8>, CompressionError> {
        let out = self.inner.decompress(compressed, max_output)?;
        self.check(&out)?;
        Ok(out)
    }
}
