// ## 📂 File: `src/io.rs`
// ## Normalized I/O for the chunk pipelines

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Cursor, Read, Write};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use bytes::Bytes;

use crate::types::{IoRole, StreamError};

/// Canonical input abstraction
pub enum InputSource {
    Reader(Box<dyn Read + Send>),
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Canonical output abstraction
pub enum OutputSink {
    Writer(Box<dyn Write + Send>),
    File(PathBuf),
    /// Capture into a buffer that is attached to the returned snapshot.
    Memory,
}

/// Captured bytes of an `OutputSink::Memory`.
pub type SharedBuffer = Arc<Mutex<Vec<u8>>>;

/// Normalize input source into a boxed reader.
///
/// A file that cannot be opened maps to `StreamError::IoOpen` with role `Input`.
pub fn open_input(src: InputSource) -> Result<Box<dyn Read + Send>, StreamError> {
    let reader: Box<dyn Read + Send> = match src {
        InputSource::Reader(r) => r,
        InputSource::File(path) => match File::open(&path) {
            Ok(f) => Box::new(BufReader::new(f)),
            Err(source) => {
                return Err(StreamError::IoOpen { role: IoRole::Input, path, source });
            }
        },
        InputSource::Memory(b) => Box::new(Cursor::new(b)),
    };
    Ok(reader)
}

/// Normalize output sink into a boxed writer.
///
/// Files are created (truncated) and buffered; the pipeline flushes them.
pub fn open_output(
    sink: OutputSink,
) -> Result<(Box<dyn Write + Send>, Option<SharedBuffer>), StreamError> {
    match sink {
        OutputSink::Writer(w) => Ok((w, None)),
        OutputSink::File(path) => match File::create(&path) {
            Ok(f) => Ok((Box::new(BufWriter::new(f)), None)),
            Err(source) => Err(StreamError::IoOpen { role: IoRole::Output, path, source }),
        },
        OutputSink::Memory => {
            let buf = Arc::new(Mutex::new(Vec::new()));
            let writer = SharedBufferWriter { buf: buf.clone() };
            Ok((Box::new(writer), Some(buf)))
        }
    }
}

/// Take the captured bytes out of a shared buffer.
pub fn take_buffer(buf: &SharedBuffer) -> Vec<u8> {
    match buf.lock() {
        Ok(mut guard) => std::mem::take(&mut *guard),
        Err(poisoned) => std::mem::take(&mut *poisoned.into_inner()),
    }
}

pub struct SharedBufferWriter {
    buf: SharedBuffer,
}

impl Write for SharedBufferWriter {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        let mut guard = self
            .buf
            .lock()
            .map_err(|_| io::Error::new(io::ErrorKind::Other, "output buffer poisoned"))?;
        guard.extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Read up to `len` bytes, stopping early only at EOF.
///
/// A result shorter than `len` means the reader is exhausted; empty means
/// nothing was left.
pub fn read_exact_or_eof<R: Read + ?Sized>(r: &mut R, len: usize) -> io::Result<Bytes> {
    let mut buf = vec![0u8; len];
    let mut off = 0;

    while off < len {
        match r.read(&mut buf[off..]) {
            Ok(0) => break,
            Ok(n) => off += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }

    buf.truncate(off);
    Ok(Bytes::from(buf))
}
