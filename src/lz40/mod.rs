//! LZ40 codec
//!
//! Stream layout: a four byte header (`0x40` followed by the decompressed
//! size as a 24-bit little-endian integer), then blocks of one flag byte and
//! up to eight units. A compressed unit stores a 12-bit displacement across
//! the high nibble of its first byte and all of its second byte; the low
//! nibble selects the length encoding:
//!
//! | nibble | extra bytes | length              |
//! |--------|-------------|---------------------|
//! | 0      | 1           | `byte + 0x10`       |
//! | 1      | 2 (LE)      | `value + 0x110`     |
//! | 2..=F  | 0           | nibble              |

mod decoder;
mod encoder;

pub use decoder::Lz40Decoder;
pub use encoder::Lz40Encoder;

use crate::matcher::MatchOptions;
use crate::{Result, LZ40_WINDOW};
use std::io::Cursor;

/// First byte of every LZ40 stream
pub const MAGIC: u8 = 0x40;

/// Header size (magic plus 24-bit length)
pub const HEADER_SIZE: usize = 4;

/// Shortest match worth a compressed unit
pub const MIN_MATCH_LENGTH: usize = 3;

/// Longest match the two-byte length field can describe
pub const MAX_MATCH_LENGTH: usize = 0x110 + 0xFFFF;

/// Lengths up to this value fit in the selector nibble
pub const NIBBLE_LENGTH_MAX: usize = 0xF;

/// Lengths up to this value use the one-byte length field
pub const BYTE_LENGTH_MAX: usize = 0x10F;

/// Largest payload of a compressed unit
pub(crate) const MAX_UNIT_LEN: usize = 4;

/// Hash chain candidates examined per position
pub const MAX_CHAIN: usize = 64;

/// Match parser limits for this format
pub fn match_options() -> MatchOptions {
    MatchOptions::new(MIN_MATCH_LENGTH, MAX_MATCH_LENGTH, LZ40_WINDOW).with_max_chain(MAX_CHAIN)
}

/// Compress data in memory
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    Lz40Encoder::new().encode_slice(data, &mut output)?;
    Ok(output)
}

/// Decompress data in memory
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    Lz40Decoder::new().decode_to(&mut Cursor::new(data), &mut output)?;
    Ok(output)
}
