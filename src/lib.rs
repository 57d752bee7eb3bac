//! RetroLZ - LZ-family codecs for legacy game data
//!
//! This crate implements several incompatible LZ77-style wire formats found in
//! console and arcade game assets. They share two primitives: a greedy
//! hash-chain [`MatchParser`] that finds repetitions for the encoders, and a
//! fixed-capacity [`CircularBuffer`] that replays back-references for the
//! decoders.
//!
//! # Formats
//!
//! - **Backward LZ77** - footer-framed, decoded from the end of the container
//!   toward its start; footer words in little- or big-endian byte order
//! - **Taiko LZ80** - control-byte stream with three reference sizes and an
//!   explicit end marker, 32KB window
//! - **LZ40** - `0x40` header with a 24-bit size, eight units per flag byte,
//!   nibble-tiered match lengths up to 65807 bytes
//!
//! # Example
//!
//! ```no_run
//! use retrolz::{compress_bytes, decompress_bytes, ByteOrder, Format};
//!
//! let data = b"Hello, World! Hello, World! Hello, World!";
//! let compressed = compress_bytes(Format::Lz40, data)?;
//! let decompressed = decompress_bytes(Format::Lz40, &compressed)?;
//! assert_eq!(decompressed, data);
//!
//! // Formats can be selected by name
//! let format: Format = "backward-lz77-be".parse()?;
//! assert_eq!(format, Format::BackwardLz77(ByteOrder::BigEndian));
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Example - Trait objects and statistics
//!
//! ```no_run
//! use retrolz::Format;
//! use std::io::Cursor;
//!
//! let mut encoder = Format::TaikoLz80.encoder();
//! let mut compressed = Vec::new();
//! encoder.encode(&mut Cursor::new(vec![7u8; 1024]), &mut compressed)?;
//! println!("ratio: {:.2}", encoder.stats().ratio());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

// Public modules
pub mod backward;
pub mod buffer;
pub mod codec;
pub mod common;
pub mod error;
pub mod lz40;
pub mod matcher;
pub mod output;
pub mod reverse;
pub mod stream;
pub mod taiko;

mod block;

// Async modules (only available with async feature)
#[cfg(feature = "async")]
pub mod async_batch;
#[cfg(feature = "async")]
pub mod async_convenience;

// Re-export commonly used types
pub use backward::{BackwardLz77Decoder, BackwardLz77Encoder};
pub use buffer::CircularBuffer;
pub use codec::{compress_bytes, decompress_bytes, ByteSink, ByteSource, Decoder, Encoder, Format};
pub use common::{
    ByteOrder, CompressionStats, ErrorKind, Result, RetroLzError, BACKWARD_LZ77_WINDOW,
    LZ40_WINDOW, MAX_FRAMED_SIZE, TAIKO_LZ80_WINDOW,
};
pub use lz40::{Lz40Decoder, Lz40Encoder};
pub use matcher::{HashChainParser, Match, MatchOptions, MatchParser};
pub use reverse::ReverseStream;
pub use taiko::{TaikoLz80Decoder, TaikoLz80Encoder};

// Re-export async types when async feature is enabled
#[cfg(feature = "async")]
pub use async_batch::AsyncBatchProcessor;
#[cfg(feature = "async")]
pub use async_convenience::*;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reexports() {
        let _ = Format::BackwardLz77(ByteOrder::LittleEndian);
        let _ = CircularBuffer::new(LZ40_WINDOW);
        let _ = MatchOptions::new(3, 18, BACKWARD_LZ77_WINDOW);

        let data = b"test";
        let compressed = compress_bytes(Format::TaikoLz80, data).unwrap();
        assert_eq!(decompress_bytes(Format::TaikoLz80, &compressed).unwrap(), data);
    }
}
