// ## 📂 File: `src/pipeline/ordered.rs`
// ## Reorder buffer in front of the single output writer

use std::collections::BTreeMap;
use std::io::Write;
use std::time::{Duration, Instant};

use log::trace;

use crate::constants::RECORD_PREFIX_LEN;
use crate::container::write_record;
use crate::types::StreamError;

/// How a ready chunk is put on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Framing {
    /// Length-prefixed record (compression output).
    Record,
    /// Bytes as-is (decompression output).
    Raw,
}

/// What a worker hands back to the coordinator for one chunk.
#[derive(Debug)]
pub struct ChunkOutcome {
    pub index: u64,
    /// Bytes the worker consumed (raw chunk or record payload).
    pub consumed: usize,
    pub output: Result<Vec<u8>, StreamError>,
    /// Time spent reading the input for this chunk, if the worker did it.
    pub read_time: Duration,
    pub work_time: Duration,
}

/// Buffers out-of-order chunk results and writes them strictly by index.
///
/// A failed result is stored like any other; it is returned from `push`
/// once every lower index has been written, so the reported failure is
/// always the lowest failing index.
pub struct OrderedWriter<'a, W: Write + ?Sized> {
    out: &'a mut W,
    framing: Framing,
    next: u64,
    pending: BTreeMap<u64, Result<Vec<u8>, StreamError>>,
    bytes_written: u64,
    write_time: Duration,
}

impl<'a, W: Write + ?Sized> OrderedWriter<'a, W> {
    pub fn new(out: &'a mut W, framing: Framing) -> Self {
        Self {
            out,
            framing,
            next: 0,
            pending: BTreeMap::new(),
            bytes_written: 0,
            write_time: Duration::ZERO,
        }
    }

    pub fn push(&mut self, index: u64, result: Result<Vec<u8>, StreamError>) -> Result<(), StreamError> {
        if index < self.next || self.pending.contains_key(&index) {
            return Err(StreamError::Pipeline("duplicate chunk index"));
        }
        trace!("[WRITER] queuing chunk {}", index);
        self.pending.insert(index, result);
        self.flush_ready()
    }

    /// Flush what is ready and check that exactly `expected` chunks were written.
    pub fn finish(mut self, expected: u64) -> Result<u64, StreamError> {
        self.flush_ready()?;
        if !self.pending.is_empty() || self.next != expected {
            return Err(StreamError::Pipeline("missing chunk results"));
        }
        self.out.flush()?;
        trace!("[WRITER] finished after {} chunks", self.next);
        Ok(self.next)
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn bytes_written(&self) -> u64 {
        self.bytes_written
    }

    pub fn write_time(&self) -> Duration {
        self.write_time
    }

    fn flush_ready(&mut self) -> Result<(), StreamError> {
        while let Some(result) = self.pending.remove(&self.next) {
            let bytes = result?;
            self.write(&bytes)?;
            self.next += 1;
        }
        Ok(())
    }

    fn write(&mut self, bytes: &[u8]) -> Result<(), StreamError> {
        trace!("[WRITER] writing chunk {} ({} bytes)", self.next, bytes.len());
        let start = Instant::now();
        match self.framing {
            Framing::Record => {
                write_record(&mut *self.out, bytes)?;
                self.bytes_written += (RECORD_PREFIX_LEN + bytes.len()) as u64;
            }
            Framing::Raw => {
                self.out.write_all(bytes)?;
                self.bytes_written += bytes.len() as u64;
            }
        }
        self.write_time += start.elapsed();
        Ok(())
    }
}
