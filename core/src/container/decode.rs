use std::io::{ErrorKind, Read};

use byteorder::{ByteOrder, LittleEndian};

use crate::constants::RECORD_PREFIX_LEN;
use crate::container::types::{ContainerError, ContainerSummary, Record};

/// Read one record payload.
///
/// - `Ok(None)`: clean end of container (EOF before any prefix byte)
/// - `TruncatedPrefix`: EOF inside the length prefix
/// - `OversizedRecord`: declared length above `max_payload`
/// - `TruncatedRecord`: EOF inside the payload
pub fn read_record<R: Read + ?Sized>(
    r: &mut R,
    max_payload: usize,
) -> Result<Option<Vec<u8>>, ContainerError> {
    let mut prefix = [0u8; RECORD_PREFIX_LEN];
    let mut got = 0;

    while got < RECORD_PREFIX_LEN {
        match r.read(&mut prefix[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }

    if got == 0 {
        return Ok(None);
    }
    if got < RECORD_PREFIX_LEN {
        return Err(ContainerError::TruncatedPrefix { got });
    }

    let len = LittleEndian::read_u64(&prefix);
    if len > max_payload as u64 {
        return Err(ContainerError::OversizedRecord { len, max: max_payload as u64 });
    }

    let mut payload = Vec::with_capacity(len as usize);
    let actual = Read::take(&mut *r, len).read_to_end(&mut payload)? as u64;
    if actual < len {
        return Err(ContainerError::TruncatedRecord { expected: len, actual });
    }

    Ok(Some(payload))
}

/// Sequential record source that numbers records as it reads them.
///
/// After the first failure or clean EOF it stays exhausted, so concurrent
/// callers behind one lock all observe the end.
#[derive(Debug)]
pub struct RecordReader<R> {
    inner: R,
    max_payload: usize,
    next_index: u64,
    exhausted: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(inner: R, max_payload: usize) -> Self {
        Self { inner, max_payload, next_index: 0, exhausted: false }
    }

    /// Index the next record will get (and the index a failure is reported at).
    pub fn next_index(&self) -> u64 {
        self.next_index
    }

    pub fn is_exhausted(&self) -> bool {
        self.exhausted
    }

    pub fn next_record(&mut self) -> Result<Option<Record>, ContainerError> {
        if self.exhausted {
            return Ok(None);
        }

        match read_record(&mut self.inner, self.max_payload) {
            Ok(Some(payload)) => {
                let index = self.next_index;
                self.next_index += 1;
                Ok(Some(Record { index, payload }))
            }
            Ok(None) => {
                self.exhausted = true;
                Ok(None)
            }
            Err(e) => {
                self.exhausted = true;
                Err(e)
            }
        }
    }
}

/// Walk a whole container, collecting record lengths.
pub fn scan_container<R: Read>(reader: R, max_payload: usize) -> Result<ContainerSummary, ContainerError> {
    let mut records = RecordReader::new(reader, max_payload);
    let mut summary = ContainerSummary::default();

    while let Some(record) = records.next_record()? {
        summary.push(&record);
    }

    Ok(summary)
}
