//! Common types and constants shared by every codec
//!
//! This module defines the error type, the footer byte order, the
//! conversion statistics and the per-format window constants used by the
//! encoders and decoders.

use thiserror::Error;

/// Byte order of multi-byte framing fields (used by the backward LZ77 footer)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ByteOrder {
    /// Least significant byte first
    LittleEndian,
    /// Most significant byte first
    BigEndian,
}

/// Broad classification of a [`RetroLzError`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The request can never succeed as given (size limits, bad parser output)
    Configuration,
    /// The compressed data is malformed
    Corruption,
    /// The input ended in the middle of a block
    StreamBoundary,
    /// The underlying stream failed
    Io,
}

/// Error type for codec operations
#[derive(Debug, Error)]
pub enum RetroLzError {
    /// Input exceeds the hard size limit of the format
    #[error("Input of {size} bytes exceeds the format limit of {limit:#X} bytes")]
    InputTooLarge {
        /// Size of the rejected input
        size: u64,
        /// Largest size the format can describe
        limit: u64,
    },

    /// A match parser produced a match the encoder cannot represent
    #[error("Unencodable match at position {position} (displacement {displacement}, length {length}): {reason}")]
    InvalidMatch {
        /// Source position of the match
        position: usize,
        /// Backward distance of the match
        displacement: usize,
        /// Length of the match
        length: usize,
        /// Which constraint was violated
        reason: &'static str,
    },

    /// A back-reference points outside the decoded history
    #[error("Invalid displacement {displacement} at output offset {offset}: only {available} bytes of history (requested length {length})")]
    InvalidDisplacement {
        /// Number of bytes decoded before the reference
        offset: u64,
        /// Requested backward distance
        displacement: usize,
        /// Requested copy length
        length: usize,
        /// Bytes currently addressable in the window
        available: usize,
    },

    /// The trailing footer of a backward-framed container is malformed
    #[error("Invalid footer: {0}")]
    InvalidFooter(String),

    /// The leading header of a stream is malformed
    #[error("Invalid header: {0}")]
    InvalidHeader(String),

    /// Decoded data would exceed the size announced by the framing
    #[error("Output overflow at offset {offset}: stream declares only {limit} bytes")]
    OutputOverflow {
        /// Number of bytes decoded when the overflow was detected
        offset: u64,
        /// Announced decompressed size
        limit: u64,
    },

    /// Input ended in the middle of a block
    #[error("Unexpected end of input at offset {offset}")]
    UnexpectedEof {
        /// Input offset at which more data was required
        offset: u64,
    },

    /// Unknown codec name
    #[error("Unknown format: {0}")]
    InvalidFormatName(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RetroLzError {
    /// Classify this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RetroLzError::InputTooLarge { .. }
            | RetroLzError::InvalidMatch { .. }
            | RetroLzError::InvalidFormatName(_) => ErrorKind::Configuration,
            RetroLzError::InvalidDisplacement { .. }
            | RetroLzError::InvalidFooter(_)
            | RetroLzError::InvalidHeader(_)
            | RetroLzError::OutputOverflow { .. } => ErrorKind::Corruption,
            RetroLzError::UnexpectedEof { .. } => ErrorKind::StreamBoundary,
            RetroLzError::Io(_) => ErrorKind::Io,
        }
    }

    /// Whether the compressed input itself is malformed
    pub fn is_corruption(&self) -> bool {
        self.kind() == ErrorKind::Corruption
    }
}

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, RetroLzError>;

/// Largest input any of the 24-bit framed formats can describe
pub const MAX_FRAMED_SIZE: usize = 0xFF_FFFF;

/// History window of the backward LZ77 format
pub const BACKWARD_LZ77_WINDOW: usize = 0x1002;

/// History window of the Taiko LZ80 format
pub const TAIKO_LZ80_WINDOW: usize = 0x8000;

/// History window of the LZ40 format (12-bit displacement)
pub const LZ40_WINDOW: usize = 0xFFF;

/// Statistics for one compression or decompression run
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CompressionStats {
    /// Number of literal units encoded/decoded
    pub literal_count: usize,
    /// Number of back-reference units encoded/decoded
    pub match_count: usize,
    /// Longest back-reference seen
    pub longest_match: usize,
    /// Bytes consumed from the input
    pub input_bytes: u64,
    /// Bytes produced on the output
    pub output_bytes: u64,
}

impl CompressionStats {
    /// Record one literal unit
    pub(crate) fn record_literal(&mut self) {
        self.literal_count += 1;
    }

    /// Record one back-reference unit
    pub(crate) fn record_match(&mut self, length: usize) {
        self.match_count += 1;
        self.longest_match = self.longest_match.max(length);
    }

    /// Ratio of output size to input size (0.0 for empty input)
    pub fn ratio(&self) -> f64 {
        if self.input_bytes > 0 {
            self.output_bytes as f64 / self.input_bytes as f64
        } else {
            0.0
        }
    }
}
