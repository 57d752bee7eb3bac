//! Backward LZ77 codec
//!
//! The container is decoded from its end toward its start:
//!
//! ```text
//! [uncompressed prefix][payload (read back to front)][0xFF padding][footer]
//! ```
//!
//! The 8-byte footer holds two 32-bit words in the configured byte order:
//! `(footer_length << 24) | compressed_size`, then the signed distance from
//! the end of the container to the end of the decompressed data. Payload
//! units are grouped eight per flag byte (most significant bit first); a
//! compressed unit is two bytes carrying `length - 3` in the high nibble and
//! a 12-bit `displacement - 3`.

mod decoder;
mod encoder;

pub use decoder::BackwardLz77Decoder;
pub use encoder::BackwardLz77Encoder;

use crate::matcher::MatchOptions;
use crate::{ByteOrder, Result, BACKWARD_LZ77_WINDOW};
use std::io::Cursor;

/// Size of the two footer words
pub const FOOTER_SIZE: usize = 8;

/// Shortest encodable match
pub const MIN_MATCH_LENGTH: usize = 3;

/// Longest encodable match
pub const MAX_MATCH_LENGTH: usize = 0xF + 3;

/// Smallest encodable displacement
pub const MIN_DISPLACEMENT: usize = 3;

/// Upper bound on decompressed size relative to the payload
pub const MAX_EXPANSION: u64 = 9;

/// Payload and padding are aligned to this many bytes
pub(crate) const ALIGNMENT: usize = 4;

/// Hash chain candidates examined per position
pub const MAX_CHAIN: usize = 64;

/// Match parser limits for this format
pub fn match_options() -> MatchOptions {
    MatchOptions::new(MIN_MATCH_LENGTH, MAX_MATCH_LENGTH, BACKWARD_LZ77_WINDOW)
        .with_min_displacement(MIN_DISPLACEMENT)
        .with_max_chain(MAX_CHAIN)
}

/// Compress data in memory
pub fn compress_bytes(data: &[u8], byte_order: ByteOrder) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    BackwardLz77Encoder::new(byte_order).encode_slice(data, &mut output)?;
    Ok(output)
}

/// Decompress data in memory
pub fn decompress_bytes(data: &[u8], byte_order: ByteOrder) -> Result<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    BackwardLz77Decoder::new(byte_order).decode_to(&mut Cursor::new(data), &mut output)?;
    Ok(output.into_inner())
}

/// Decoded footer words
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footer {
    /// Padding plus footer words, counted from the end of the container
    pub footer_length: u32,
    /// Payload plus `footer_length`, counted from the end of the container
    pub compressed_size: u32,
    /// Distance from the container end to the decompressed end
    pub decompressed_offset: i32,
}

impl Footer {
    /// Split the raw footer bytes according to `byte_order`
    pub fn parse(bytes: &[u8; FOOTER_SIZE], byte_order: ByteOrder) -> Self {
        use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

        let (top_and_bottom, decompressed_offset) = match byte_order {
            ByteOrder::LittleEndian => (
                LittleEndian::read_u32(&bytes[..4]),
                LittleEndian::read_i32(&bytes[4..]),
            ),
            ByteOrder::BigEndian => (
                BigEndian::read_u32(&bytes[..4]),
                BigEndian::read_i32(&bytes[4..]),
            ),
        };
        Self {
            footer_length: top_and_bottom >> 24,
            compressed_size: top_and_bottom & 0xFF_FFFF,
            decompressed_offset,
        }
    }

    /// Serialize in `byte_order`
    pub fn to_bytes(&self, byte_order: ByteOrder) -> [u8; FOOTER_SIZE] {
        use byteorder::{BigEndian, ByteOrder as _, LittleEndian};

        let top_and_bottom = (self.footer_length << 24) | (self.compressed_size & 0xFF_FFFF);
        let mut bytes = [0u8; FOOTER_SIZE];
        match byte_order {
            ByteOrder::LittleEndian => {
                LittleEndian::write_u32(&mut bytes[..4], top_and_bottom);
                LittleEndian::write_i32(&mut bytes[4..], self.decompressed_offset);
            }
            ByteOrder::BigEndian => {
                BigEndian::write_u32(&mut bytes[..4], top_and_bottom);
                BigEndian::write_i32(&mut bytes[4..], self.decompressed_offset);
            }
        }
        bytes
    }
}
