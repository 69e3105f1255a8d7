// ## 📂 File: `src/pipeline/compress.rs`
// ## Batch-synchronous parallel compression

use std::io::{Read, Write};
use std::thread;
use std::time::{Duration, Instant};

use bytes::Bytes;
use crossbeam::channel::unbounded;
use log::{debug, info, trace};

use crate::compression::ChunkCodec;
use crate::io::read_exact_or_eof;
use crate::pipeline::ordered::{ChunkOutcome, Framing, OrderedWriter};
use crate::pipeline::parallelism::{InFlightGauge, ParallelismProfile};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Split `reader` into `chunk_size` chunks, compress them in parallel and
/// write one length-prefixed record per chunk to `writer`, in chunk order.
///
/// Up to `profile.workers` chunks are read into a batch, each compressed on
/// its own scoped thread, and the next batch is read only after every
/// worker of the current one has finished. The first failing chunk (lowest
/// index) aborts the run; records before it are already written.
pub fn run_compress_pipeline<R, W>(
    mut reader: R,
    mut writer: W,
    codec: &dyn ChunkCodec,
    chunk_size: usize,
    profile: ParallelismProfile,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read,
    W: Write,
{
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let gauge = InFlightGauge::new();
    let workers = profile.workers.max(1);
    let mut next_index = 0u64;
    let mut eof = false;

    info!(
        "[PIPELINE] start compress: codec={}, chunk_size={}, workers={}",
        codec.name(),
        chunk_size,
        workers
    );

    let mut ordered = OrderedWriter::new(&mut writer, Framing::Record);

    while !eof {
        // ---- Read one batch ----
        let mut batch: Vec<(u64, Bytes)> = Vec::with_capacity(workers);
        while batch.len() < workers {
            let start = Instant::now();
            let buf = read_exact_or_eof(&mut reader, chunk_size)?;
            timer.add_stage_time(Stage::Read, start.elapsed());

            if buf.is_empty() {
                eof = true;
                break;
            }
            let short = buf.len() < chunk_size;
            trace!("[READER] chunk {} ({} bytes)", next_index, buf.len());
            batch.push((next_index, buf));
            next_index += 1;
            if short {
                eof = true;
                break;
            }
        }

        if batch.is_empty() {
            break;
        }
        debug!("[PIPELINE] batch of {} chunks, first index {}", batch.len(), batch[0].0);

        // ---- Compress the batch, one scoped worker per chunk ----
        let (tx, rx) = unbounded::<ChunkOutcome>();
        let gauge = &gauge;

        thread::scope(|scope| -> Result<(), StreamError> {
            let handles: Vec<_> = batch
                .into_iter()
                .map(|(index, chunk)| {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let _in_flight = gauge.enter();
                        trace!("[WORKER-{index}] compressing {} bytes", chunk.len());
                        let start = Instant::now();
                        let output = codec
                            .compress(&chunk)
                            .map_err(|source| StreamError::Codec { chunk_index: index, source });
                        let outcome = ChunkOutcome {
                            index,
                            consumed: chunk.len(),
                            output,
                            read_time: Duration::ZERO,
                            work_time: start.elapsed(),
                        };
                        // Coordinator holds the receiver until every worker is joined.
                        let _ = tx.send(outcome);
                    })
                })
                .collect();
            drop(tx);

            let mut failure = None;
            for outcome in rx.iter() {
                if failure.is_some() {
                    continue;
                }
                timer.add_stage_time(Stage::Compress, outcome.work_time);
                if let Ok(bytes) = &outcome.output {
                    counters.add_chunk(outcome.consumed, bytes.len());
                }
                if let Err(e) = ordered.push(outcome.index, outcome.output) {
                    failure = Some(e);
                }
            }

            for handle in handles {
                if handle.join().is_err() && failure.is_none() {
                    failure = Some(StreamError::Pipeline("compression worker panicked"));
                }
            }

            match failure {
                Some(e) => Err(e),
                None => Ok(()),
            }
        })?;
    }

    timer.add_stage_time(Stage::Write, ordered.write_time());
    let written = ordered.finish(next_index)?;
    timer.finish();

    info!(
        "[PIPELINE] compress done: {} chunks, {} -> {} bytes",
        written,
        counters.bytes_raw,
        counters.container_bytes()
    );

    Ok(TelemetrySnapshot::from(&counters, &timer, workers, gauge.peak()))
}
