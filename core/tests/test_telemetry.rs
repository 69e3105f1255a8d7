mod common;

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chunkpress_core::constants::RECORD_PREFIX_LEN;
    use chunkpress_core::prelude::*;
    use chunkpress_core::telemetry::Stage;

    use crate::common::{text_payload, SMALL_CHUNK};

    fn config() -> PipelineConfig {
        PipelineConfig::new().with_chunk_size(SMALL_CHUNK).with_workers(2)
    }

    #[test]
    fn compress_snapshot_counts() {
        let data = text_payload(SMALL_CHUNK * 4 + 10);
        let snap = compress_stream(InputSource::Memory(data.clone()), OutputSink::Memory, &config()).unwrap();

        assert_eq!(snap.chunks, 5);
        assert_eq!(snap.bytes_raw, data.len() as u64);
        assert_eq!(snap.bytes_overhead, 5 * RECORD_PREFIX_LEN as u64);
        assert!(snap.compression_ratio > 0.0 && snap.compression_ratio < 1.0);
        assert_eq!(snap.workers, 2);
        assert!(snap.max_in_flight >= 1 && snap.max_in_flight <= 2);
        assert!(snap.has_all_stages(&[Stage::Read, Stage::Compress, Stage::Write]));
        assert!(snap.stage_times.get(Stage::Compress) > Duration::ZERO);
        assert_eq!(snap.stage_times.get(Stage::Decompress), Duration::ZERO);
    }

    #[test]
    fn decompress_snapshot_mirrors_compress() {
        let data = text_payload(SMALL_CHUNK * 3);
        let packed = compress_stream(InputSource::Memory(data.clone()), OutputSink::Memory, &config())
            .unwrap();
        let container = packed.output.clone().unwrap();

        let snap = decompress_stream(InputSource::Memory(container), OutputSink::Memory, &config()).unwrap();
        assert_eq!(snap.chunks, packed.chunks);
        assert_eq!(snap.bytes_raw, packed.bytes_raw);
        assert_eq!(snap.bytes_compressed, packed.bytes_compressed);
        assert!(snap.has_all_stages(&[Stage::Read, Stage::Decompress, Stage::Write]));
    }

    #[test]
    fn empty_input_has_zero_ratio() {
        let snap = compress_stream(InputSource::Memory(Vec::new()), OutputSink::Memory, &config()).unwrap();
        assert_eq!(snap.chunks, 0);
        assert_eq!(snap.compression_ratio, 0.0);
        assert_eq!(snap.max_in_flight, 0);
        assert_eq!(snap.output.as_deref(), Some(&[][..]));
    }

    #[test]
    fn snapshot_serializes_without_output() {
        let snap = compress_stream(
            InputSource::Memory(text_payload(1000)),
            OutputSink::Memory,
            &config(),
        )
        .unwrap();
        let json = snap.to_json().unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["chunks"], 1);
        assert_eq!(value["workers"], 2);
        assert!(value.get("output").is_none());
        assert!(value["stage_times"].is_object());
    }
}
