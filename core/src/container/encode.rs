use std::io::{self, Write};

use byteorder::{LittleEndian, WriteBytesExt};

use crate::constants::RECORD_PREFIX_LEN;

/// Encode a record into canonical wire format.
///
/// Layout:
///
/// ```text
/// [ payload_len (8, u64 LE) ]
/// [ payload     (payload_len) ]
/// ```
pub fn encode_record(payload: &[u8]) -> Vec<u8> {
    let mut wire = Vec::with_capacity(RECORD_PREFIX_LEN + payload.len());
    wire.extend_from_slice(&(payload.len() as u64).to_le_bytes());
    wire.extend_from_slice(payload);
    wire
}

/// Write prefix then payload. Callers that share `out` must hold its lock
/// for the whole call.
pub fn write_record<W: Write + ?Sized>(out: &mut W, payload: &[u8]) -> io::Result<()> {
    out.write_u64::<LittleEndian>(payload.len() as u64)?;
    out.write_all(payload)
}
