// Codec adapter behaviour shared by every registered codec:
// * ✅ single-chunk round trip
// * ✅ worst-case bound holds for incompressible input
// * ❌ decompression never exceeds the caller's bound
// * ✅ deflate output is a plain zlib stream

mod common;

#[cfg(test)]
mod tests {
    use std::io::Read;

    use chunkpress_core::compression::{
        create_codec, ChunkCodec, CompressionCodec, CompressionError,
    };
    use chunkpress_core::constants::CHUNK_SIZE;

    use crate::common::{random_payload, text_payload};

    fn all_codecs() -> Vec<Box<dyn ChunkCodec>> {
        CompressionCodec::ALL
            .iter()
            .map(|c| create_codec(*c, None).unwrap())
            .collect()
    }

// # ✅ 1. Round trip per codec

    #[test]
    fn round_trip_text_and_random() {
        for codec in all_codecs() {
            for data in [text_payload(100_000), random_payload(70_000, 7), Vec::new()] {
                let packed = codec.compress(&data).unwrap();
                let unpacked = codec.decompress(&packed, data.len().max(1)).unwrap();
                assert_eq!(unpacked, data, "codec {}", codec.name());
            }
        }
    }

// # ✅ 2. Bound holds on a full incompressible chunk

    #[test]
    fn incompressible_chunk_fits_bound() {
        let data = random_payload(CHUNK_SIZE, 99);
        for codec in all_codecs() {
            let packed = codec.compress(&data).unwrap();
            assert!(
                packed.len() <= codec.compress_bound(CHUNK_SIZE),
                "codec {} exceeded its bound",
                codec.name()
            );
        }
    }

// # ❌ 3. Output larger than the bound is an overflow, never truncated

    #[test]
    fn decompress_respects_max_output() {
        let data = text_payload(64 * 1024);
        for codec in all_codecs() {
            let packed = codec.compress(&data).unwrap();
            match codec.decompress(&packed, 16 * 1024) {
                Err(CompressionError::OutputOverflow { max, .. }) => assert_eq!(max, 16 * 1024),
                other => panic!("codec {}: expected overflow, got {:?}", codec.name(), other.map(|v| v.len())),
            }
        }
    }

// # ❌ 4. Garbage payloads are codec errors

    #[test]
    fn garbage_payload_fails() {
        let junk = [0u8, 1, 2, 3, 4, 5, 6, 7, 8, 9];
        for codec in [CompressionCodec::Deflate, CompressionCodec::Zstd] {
            let codec = create_codec(codec, None).unwrap();
            assert!(codec.decompress(&junk, 1024).is_err(), "codec {}", codec.name());
        }
    }

// # ✅ 5. Deflate chunks are readable by any zlib decoder

    #[test]
    fn deflate_is_plain_zlib() {
        let codec = create_codec(CompressionCodec::Deflate, Some(9)).unwrap();
        let data = text_payload(50_000);
        let packed = codec.compress(&data).unwrap();
        assert_eq!(packed[0], 0x78);

        let mut decoded = Vec::new();
        flate2::read::ZlibDecoder::new(&packed[..]).read_to_end(&mut decoded).unwrap();
        assert_eq!(decoded, data);
    }

// # ❌ 6. A zstd frame without a declared size still overflows loudly

    #[test]
    fn zstd_streamed_frame_overflow_is_reported() {
        let codec = create_codec(CompressionCodec::Zstd, None).unwrap();
        let data = text_payload(64 * 1024);

        // Streaming encoder output carries no content size in the frame header.
        let framed = zstd::stream::encode_all(&data[..], 3).unwrap();
        assert_eq!(zstd_safe::get_frame_content_size(&framed).unwrap(), None);

        assert_eq!(codec.decompress(&framed, data.len()).unwrap(), data);
        assert!(matches!(
            codec.decompress(&framed, data.len() - 1),
            Err(CompressionError::OutputOverflow { codec: "zstd", .. })
        ));
    }

// # ✅ 7. Names and levels

    #[test]
    fn codec_names_parse() {
        assert_eq!("deflate".parse::<CompressionCodec>().unwrap(), CompressionCodec::Deflate);
        assert_eq!("ZLIB".parse::<CompressionCodec>().unwrap(), CompressionCodec::Deflate);
        assert_eq!("zstd".parse::<CompressionCodec>().unwrap(), CompressionCodec::Zstd);
        assert!(matches!(
            "brotli".parse::<CompressionCodec>(),
            Err(CompressionError::UnknownCodecName(_))
        ));
        assert_eq!(CompressionCodec::default(), CompressionCodec::Deflate);
    }

    #[test]
    fn codec_ids_parse() {
        assert_eq!("3".parse::<CompressionCodec>().unwrap(), CompressionCodec::Deflate);
        assert_eq!("1".parse::<CompressionCodec>().unwrap(), CompressionCodec::Zstd);
        assert_eq!("2".parse::<CompressionCodec>().unwrap(), CompressionCodec::Lz4);

        let err = "66".parse::<CompressionCodec>().unwrap_err();
        assert!(matches!(err, CompressionError::UnsupportedCodec { codec_id: 0x42 }));
        assert_eq!(err.to_string(), "unsupported compression codec: 0x42");
    }

    #[test]
    fn invalid_levels_are_rejected() {
        assert!(create_codec(CompressionCodec::Deflate, Some(10)).is_err());
        assert!(create_codec(CompressionCodec::Lz4, Some(5)).is_err());
        assert!(create_codec(CompressionCodec::Zstd, Some(1000)).is_err());
        assert!(create_codec(CompressionCodec::Zstd, Some(19)).is_ok());
    }
}
