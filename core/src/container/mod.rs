//! On-disk container framing.
//!
//! Responsibilities:
//! - Define the record layout (length prefix + payload)
//! - Encode one record onto a sink
//! - Decode one record from a source with strict truncation checks
//!
//! Non-responsibilities:
//! - Compression
//! - Ordering across concurrent callers
//! - Parallelism

pub mod types;
pub mod encode;
pub mod decode;

pub use types::{
    ContainerError,
    ContainerSummary,
    Record,
};
pub use encode::{encode_record, write_record};
pub use decode::{read_record, scan_container, RecordReader};
