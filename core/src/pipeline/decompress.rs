// ## 📂 File: `src/pipeline/decompress.rs`
// ## Parallel decompression with a shared record reader

use std::io::{Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::{Duration, Instant};

use crossbeam::channel::{unbounded, Receiver, Sender};
use log::{debug, info, trace};

use crate::compression::ChunkCodec;
use crate::container::RecordReader;
use crate::pipeline::ordered::{ChunkOutcome, Framing, OrderedWriter};
use crate::pipeline::parallelism::{InFlightGauge, ParallelismProfile};
use crate::telemetry::{Stage, TelemetryCounters, TelemetrySnapshot, TelemetryTimer};
use crate::types::StreamError;

/// Shared state every decompression worker borrows.
struct WorkerCtx<'a, R> {
    reader: &'a Mutex<RecordReader<R>>,
    codec: &'a dyn ChunkCodec,
    max_output: usize,
    abort: &'a AtomicBool,
    gauge: &'a InFlightGauge,
}

/// Read length-prefixed records from `reader`, decompress them on
/// `profile.workers` threads and write the raw chunks to `writer` in
/// record order.
///
/// Workers take the reader lock, read one record and get its index in the
/// same critical section, then decompress outside the lock into at most
/// `chunk_size` bytes. On the first failure (lowest index) the remaining
/// workers stop, chunks before it are already written.
pub fn run_decompress_pipeline<R, W>(
    reader: R,
    mut writer: W,
    codec: &dyn ChunkCodec,
    chunk_size: usize,
    profile: ParallelismProfile,
) -> Result<TelemetrySnapshot, StreamError>
where
    R: Read + Send,
    W: Write,
{
    let mut counters = TelemetryCounters::default();
    let mut timer = TelemetryTimer::new();
    let gauge = InFlightGauge::new();
    let abort = AtomicBool::new(false);
    let workers = profile.workers.max(1);

    // A valid record can never exceed what the codec may emit for one chunk.
    let max_payload = codec.compress_bound(chunk_size);
    let records = Mutex::new(RecordReader::new(reader, max_payload));

    info!(
        "[PIPELINE] start decompress: codec={}, chunk_size={}, workers={}",
        codec.name(),
        chunk_size,
        workers
    );

    let ctx = WorkerCtx {
        reader: &records,
        codec,
        max_output: chunk_size,
        abort: &abort,
        gauge: &gauge,
    };

    let mut ordered = OrderedWriter::new(&mut writer, Framing::Raw);
    let (tx, rx) = unbounded::<ChunkOutcome>();

    thread::scope(|scope| -> Result<(), StreamError> {
        let handles: Vec<_> = (0..workers)
            .map(|i| {
                let tx = tx.clone();
                let ctx = &ctx;
                scope.spawn(move || {
                    debug!("[WORKER-{i}] starting");
                    decompress_worker(i, ctx, tx);
                    debug!("[WORKER-{i}] finished");
                })
            })
            .collect();
        drop(tx);

        let mut failure = drain_ordered(rx, &mut ordered, &mut counters, &mut timer).err();
        if failure.is_some() {
            abort.store(true, Ordering::SeqCst);
        }

        for handle in handles {
            if handle.join().is_err() && failure.is_none() {
                abort.store(true, Ordering::SeqCst);
                failure = Some(StreamError::Pipeline("decompression worker panicked"));
            }
        }

        match failure {
            Some(e) => Err(e),
            None => Ok(()),
        }
    })?;

    // All workers are joined; the reader knows how many records it produced.
    let total = records
        .lock()
        .map_err(|_| StreamError::Pipeline("record reader lock poisoned"))?
        .next_index();

    timer.add_stage_time(Stage::Write, ordered.write_time());
    let written = ordered.finish(total)?;
    timer.finish();

    info!(
        "[PIPELINE] decompress done: {} records, {} -> {} bytes",
        written,
        counters.container_bytes(),
        counters.bytes_raw
    );

    Ok(TelemetrySnapshot::from(&counters, &timer, workers, gauge.peak()))
}

/// Push outcomes into the reorder buffer until every worker has hung up.
///
/// Returns the first error the buffer surfaces. Dropping `rx` on return
/// makes later sends fail, which stops the remaining workers.
fn drain_ordered<W: Write + ?Sized>(
    rx: Receiver<ChunkOutcome>,
    ordered: &mut OrderedWriter<'_, W>,
    counters: &mut TelemetryCounters,
    timer: &mut TelemetryTimer,
) -> Result<(), StreamError> {
    for outcome in rx.iter() {
        trace!("[WRITER] received record {}", outcome.index);
        timer.add_stage_time(Stage::Read, outcome.read_time);
        timer.add_stage_time(Stage::Decompress, outcome.work_time);
        if let Ok(bytes) = &outcome.output {
            counters.add_chunk(bytes.len(), outcome.consumed);
        }
        ordered.push(outcome.index, outcome.output)?;
    }
    Ok(())
}

fn decompress_worker<R: Read>(id: usize, ctx: &WorkerCtx<'_, R>, tx: Sender<ChunkOutcome>) {
    loop {
        if ctx.abort.load(Ordering::SeqCst) {
            trace!("[WORKER-{id}] abort observed");
            return;
        }

        // ---- Read one record under the input lock ----
        let start = Instant::now();
        let (index, next) = match ctx.reader.lock() {
            Ok(mut guard) => {
                let index = guard.next_index();
                (index, guard.next_record())
            }
            Err(_) => {
                ctx.abort.store(true, Ordering::SeqCst);
                return;
            }
        };
        let read_time = start.elapsed();

        let record = match next {
            Ok(Some(record)) => record,
            Ok(None) => return,
            Err(e) => {
                debug!("[WORKER-{id}] container error at record {}: {}", index, e);
                ctx.abort.store(true, Ordering::SeqCst);
                let _ = tx.send(ChunkOutcome {
                    index,
                    consumed: 0,
                    output: Err(StreamError::from_container(index, e)),
                    read_time,
                    work_time: Duration::ZERO,
                });
                return;
            }
        };

        // ---- Decompress outside the lock ----
        let _in_flight = ctx.gauge.enter();
        trace!("[WORKER-{id}] decompressing record {}", record.index);
        let start = Instant::now();
        let output = ctx
            .codec
            .decompress(&record.payload, ctx.max_output)
            .map_err(|source| StreamError::Codec { chunk_index: record.index, source });
        if output.is_err() {
            // Records below this one are already claimed and will still be sent.
            ctx.abort.store(true, Ordering::SeqCst);
        }
        let outcome = ChunkOutcome {
            index: record.index,
            consumed: record.payload.len(),
            output,
            read_time,
            work_time: start.elapsed(),
        };

        if tx.send(outcome).is_err() {
            return;
        }
    }
}
