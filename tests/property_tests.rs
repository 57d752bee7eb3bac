//! Property-based tests for the RetroLZ codecs
//!
//! These tests use randomized inputs to verify correctness across a wide range
//! of data patterns and edge cases.

use proptest::prelude::*;
use retrolz::{compress_bytes, decompress_bytes, ByteOrder, Format};

proptest! {
    #[test]
    fn test_decompression_never_panics(data in prop::collection::vec(any::<u8>(), 0..1000)) {
        // Random data is rarely a valid stream, but decoding must fail gracefully
        for format in Format::ALL {
            let _ = decompress_bytes(format, &data);
        }
    }
}

proptest! {
    #[test]
    fn test_round_trip(data in prop::collection::vec(any::<u8>(), 0..2000)) {
        for format in Format::ALL {
            let compressed = compress_bytes(format, &data)?;
            let decompressed = decompress_bytes(format, &compressed)?;
            prop_assert_eq!(&data[..], &decompressed[..], "{}", format);
        }
    }
}

proptest! {
    #[test]
    fn test_repetitive_patterns(
        pattern in prop::collection::vec(any::<u8>(), 1..20),
        repeat_count in 2..200usize
    ) {
        let data = pattern.repeat(repeat_count);

        for format in Format::ALL {
            let compressed = compress_bytes(format, &data)?;
            let decompressed = decompress_bytes(format, &compressed)?;
            prop_assert_eq!(&data[..], &decompressed[..], "{}", format);

            // Repetitive data should not expand beyond the framing overhead
            prop_assert!(compressed.len() <= data.len() + 40,
                "{} expanded too much: {} -> {}", format, data.len(), compressed.len());
        }
    }
}

proptest! {
    #[test]
    fn test_single_byte_runs(byte_value in any::<u8>(), size in 1..5000usize) {
        let data = vec![byte_value; size];

        for format in Format::ALL {
            let compressed = compress_bytes(format, &data)?;
            let decompressed = decompress_bytes(format, &compressed)?;
            prop_assert_eq!(&data[..], &decompressed[..], "{}", format);
        }
    }
}

proptest! {
    #[test]
    fn test_compression_deterministic(data in prop::collection::vec(any::<u8>(), 10..300)) {
        for format in Format::ALL {
            let compressed1 = compress_bytes(format, &data)?;
            let compressed2 = compress_bytes(format, &data)?;
            // Same input should always produce same output
            prop_assert_eq!(compressed1, compressed2);
        }
    }
}

proptest! {
    #[test]
    fn test_decompression_idempotent(data in prop::collection::vec(any::<u8>(), 0..300)) {
        for format in Format::ALL {
            let compressed = compress_bytes(format, &data)?;
            let first = decompress_bytes(format, &compressed)?;
            let second = decompress_bytes(format, &compressed)?;
            prop_assert_eq!(first, second);
        }
    }
}

proptest! {
    #[test]
    fn test_footer_byte_orders_agree(data in prop::collection::vec(0u8..4, 1..500)) {
        let little = compress_bytes(Format::BackwardLz77(ByteOrder::LittleEndian), &data)?;
        let big = compress_bytes(Format::BackwardLz77(ByteOrder::BigEndian), &data)?;

        // Only the footer words differ
        prop_assert_eq!(little.len(), big.len());
        prop_assert_eq!(&little[..little.len() - 8], &big[..big.len() - 8]);
    }
}
