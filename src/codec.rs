//! Codec capabilities and format selection
//!
//! Every wire format implements [`Decoder`] and [`Encoder`] over generic
//! byte streams. [`Format`] picks the implementation at runtime.

use crate::backward::{BackwardLz77Decoder, BackwardLz77Encoder};
use crate::lz40::{Lz40Decoder, Lz40Encoder};
use crate::taiko::{TaikoLz80Decoder, TaikoLz80Encoder};
use crate::{ByteOrder, CompressionStats, Result, RetroLzError};
use std::fmt;
use std::io::{Cursor, Read, Seek, SeekFrom, Write};
use std::str::FromStr;

/// Readable, seekable compressed or raw input
pub trait ByteSource: Read + Seek {}

impl<T: Read + Seek + ?Sized> ByteSource for T {}

/// Writable, seekable output
pub trait ByteSink: Write + Seek {}

impl<T: Write + Seek + ?Sized> ByteSink for T {}

/// Decompression half of a codec
pub trait Decoder: fmt::Debug + Send {
    /// Decode all of `input` (from its current position) into `output`
    ///
    /// On failure `output` may hold a partial result.
    fn decode(&mut self, input: &mut dyn ByteSource, output: &mut dyn ByteSink) -> Result<()>;

    /// Statistics of the last conversion
    fn stats(&self) -> &CompressionStats;
}

/// Compression half of a codec
pub trait Encoder: fmt::Debug + Send {
    /// Encode all of `input` (from its current position) into `output`
    fn encode(&mut self, input: &mut dyn ByteSource, output: &mut dyn Write) -> Result<()>;

    /// Statistics of the last conversion
    fn stats(&self) -> &CompressionStats;
}

/// Supported wire formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Format {
    /// Footer-framed LZ77 decoded back to front
    BackwardLz77(ByteOrder),
    /// Control-byte LZ format of the Taiko rhythm game assets
    TaikoLz80,
    /// Flag-byte LZ format with a 0x40 header
    Lz40,
}

impl Format {
    /// Every format, in a stable order
    pub const ALL: [Format; 4] = [
        Format::BackwardLz77(ByteOrder::LittleEndian),
        Format::BackwardLz77(ByteOrder::BigEndian),
        Format::TaikoLz80,
        Format::Lz40,
    ];

    /// Canonical name, accepted back by [`FromStr`]
    pub fn name(&self) -> &'static str {
        match self {
            Format::BackwardLz77(ByteOrder::LittleEndian) => "backward-lz77-le",
            Format::BackwardLz77(ByteOrder::BigEndian) => "backward-lz77-be",
            Format::TaikoLz80 => "taiko-lz80",
            Format::Lz40 => "lz40",
        }
    }

    /// Fresh decoder for this format
    pub fn decoder(&self) -> Box<dyn Decoder> {
        match *self {
            Format::BackwardLz77(byte_order) => Box::new(BackwardLz77Decoder::new(byte_order)),
            Format::TaikoLz80 => Box::new(TaikoLz80Decoder::new()),
            Format::Lz40 => Box::new(Lz40Decoder::new()),
        }
    }

    /// Fresh encoder for this format with its default match parser
    pub fn encoder(&self) -> Box<dyn Encoder> {
        match *self {
            Format::BackwardLz77(byte_order) => Box::new(BackwardLz77Encoder::new(byte_order)),
            Format::TaikoLz80 => Box::new(TaikoLz80Encoder::new()),
            Format::Lz40 => Box::new(Lz40Encoder::new()),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Format {
    type Err = RetroLzError;

    fn from_str(s: &str) -> Result<Self> {
        Format::ALL
            .into_iter()
            .find(|format| format.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| RetroLzError::InvalidFormatName(s.to_string()))
    }
}

/// Compress `data` in memory
pub fn compress_bytes(format: Format, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Vec::new();
    format.encoder().encode(&mut Cursor::new(data), &mut output)?;
    Ok(output)
}

/// Decompress `data` in memory
pub fn decompress_bytes(format: Format, data: &[u8]) -> Result<Vec<u8>> {
    let mut output = Cursor::new(Vec::new());
    format.decoder().decode(&mut Cursor::new(data), &mut output)?;
    Ok(output.into_inner())
}

/// Read the remainder of an encoder input, rejecting it up front if it
/// exceeds `limit` bytes
pub(crate) fn read_source(input: &mut dyn ByteSource, limit: Option<usize>) -> Result<Vec<u8>> {
    let start = input.stream_position()?;
    let end = input.seek(SeekFrom::End(0))?;
    input.seek(SeekFrom::Start(start))?;
    let size = end.saturating_sub(start);
    if let Some(limit) = limit {
        if size > limit as u64 {
            return Err(RetroLzError::InputTooLarge {
                size,
                limit: limit as u64,
            });
        }
    }
    let mut data = Vec::with_capacity(size as usize);
    input.read_to_end(&mut data)?;
    Ok(data)
}
