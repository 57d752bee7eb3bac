//! Taiko LZ80 codec
//!
//! A headerless stream of control bytes. The top two bits of each control
//! byte select the block kind:
//!
//! - `00` literal run: length in the low six bits, or extended by one or two
//!   continuation bytes when the control byte is zero. The sequence
//!   `00 00 00` terminates the stream.
//! - `01` one-byte reference: length 2..=5, displacement 1..=16
//! - `10` two-byte reference: length 3..=18, displacement 1..=0x400
//! - `11` three-byte reference: length 4..=131, displacement 1..=0x8000

mod decoder;
mod encoder;

pub use decoder::TaikoLz80Decoder;
pub use encoder::TaikoLz80Encoder;

use crate::matcher::MatchOptions;
use crate::{Result, TAIKO_LZ80_WINDOW};
use std::io::Cursor;

/// Shortest reference (one-byte form)
pub const MIN_MATCH_LENGTH: usize = 2;

/// Longest reference (three-byte form)
pub const MAX_MATCH_LENGTH: usize = 0x7F + 4;

/// Literal runs up to this length fit in the control byte
pub const SHORT_RUN_MAX: usize = 0x3F;

/// Literal runs up to this length use one continuation byte
pub const MEDIUM_RUN_MAX: usize = 0x40 + 0x7F;

/// Longest literal run a single block can carry
pub const LONG_RUN_MAX: usize = 0xBF + 0x7FFF;

/// Explicit end of stream
pub const END_MARKER: [u8; 3] = [0x00, 0x00, 0x00];

/// Longest match and furthest displacement of the one-byte reference
pub(crate) const SHORT_REF: (usize, usize) = (5, 0x10);

/// Longest match and furthest displacement of the two-byte reference
pub(crate) const MEDIUM_REF: (usize, usize) = (18, 0x400);

/// Whether some reference form can carry this match
pub(crate) fn encodable(length: usize, displacement: usize) -> bool {
    (length <= SHORT_REF.0 && displacement <= SHORT_REF.1)
        || (length >= 3 && length <= MEDIUM_REF.0 && displacement <= MEDIUM_REF.1)
        || (length >= 4 && length <= MAX_MATCH_LENGTH && displacement <= TAIKO_LZ80_WINDOW)
}

/// Hash chain candidates examined per position; the window is eight times LZ40's
pub const MAX_CHAIN: usize = 256;

/// Match parser limits for this format
pub fn match_options() -> MatchOptions {
    MatchOptions::new(MIN_MATCH_LENGTH, MAX_MATCH_LENGTH, TAIKO_LZ80_WINDOW)
        .with_max_chain(MAX_CHAIN)
        .with_admit(encodable)
}

/// Compress data in memory
pub fn compress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    TaikoLz80Encoder::new().encode_slice(data, &mut output)?;
    Ok(output)
}

/// Decompress data in memory
pub fn decompress_bytes(data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    TaikoLz80Decoder::new().decode_to(&mut Cursor::new(data), &mut output)?;
    Ok(output)
}
