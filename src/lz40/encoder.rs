//! LZ40 compression

use super::{
    match_options, BYTE_LENGTH_MAX, HEADER_SIZE, MAGIC, MAX_UNIT_LEN, NIBBLE_LENGTH_MAX,
};
use crate::block::FlagBlock;
use crate::codec::{read_source, ByteSource, Encoder};
use crate::matcher::{HashChainParser, Match, MatchParser};
use crate::{CompressionStats, Result, RetroLzError, MAX_FRAMED_SIZE};
use byteorder::{LittleEndian, WriteBytesExt};
use std::io::Write;

/// LZ40 encoder driven by a match parser
#[derive(Debug)]
pub struct Lz40Encoder<P = HashChainParser> {
    parser: P,
    stats: CompressionStats,
}

impl Lz40Encoder {
    /// Encoder with the default hash-chain parser
    pub fn new() -> Self {
        Self::with_parser(HashChainParser::new(match_options()))
    }
}

impl Default for Lz40Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MatchParser> Lz40Encoder<P> {
    /// Encoder using a custom parser
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            stats: CompressionStats::default(),
        }
    }

    /// Compress `data` into `output`
    ///
    /// Inputs over 0xFFFFFF bytes are rejected before anything is written.
    pub fn encode_slice<W: Write + ?Sized>(&mut self, data: &[u8], output: &mut W) -> Result<()> {
        if data.len() > MAX_FRAMED_SIZE {
            return Err(RetroLzError::InputTooLarge {
                size: data.len() as u64,
                limit: MAX_FRAMED_SIZE as u64,
            });
        }
        self.stats = CompressionStats {
            input_bytes: data.len() as u64,
            ..CompressionStats::default()
        };

        output.write_u8(MAGIC)?;
        output.write_u24::<LittleEndian>(data.len() as u32)?;
        let mut written = HEADER_SIZE as u64;

        let options = *self.parser.options();
        let mut matches = self.parser.find_matches(data).peekable();
        let mut block = FlagBlock::new(MAX_UNIT_LEN);
        let mut position = 0;
        while position < data.len() {
            if block.is_full() {
                written += block.flush(output)? as u64;
            }

            match matches.next_if(|m| m.position == position) {
                Some(lz_match) => {
                    lz_match.validate(data, position, &options)?;
                    let (unit, len) = compressed_unit(&lz_match);
                    block.push_compressed(&unit[..len]);
                    self.stats.record_match(lz_match.length);
                    position = lz_match.end();
                }
                None => {
                    if let Some(skipped) = matches.next_if(|m| m.position < position) {
                        skipped.validate(data, position, &options)?;
                    }
                    block.push_literal(data[position]);
                    self.stats.record_literal();
                    position += 1;
                }
            }
        }
        written += block.flush(output)? as u64;

        if let Some(stray) = matches.next() {
            stray.validate(data, data.len(), &options)?;
        }

        self.stats.output_bytes = written;
        log::debug!(
            "lz40: encoded {} bytes into {} ({} literals, {} matches)",
            data.len(),
            written,
            self.stats.literal_count,
            self.stats.match_count
        );
        Ok(())
    }
}

/// Payload of one compressed unit and its length in bytes
fn compressed_unit(lz_match: &Match) -> ([u8; MAX_UNIT_LEN], usize) {
    let displacement = lz_match.displacement;
    let length = lz_match.length;
    let mut unit = [0u8; MAX_UNIT_LEN];
    unit[0] = ((displacement & 0x0F) << 4) as u8;
    unit[1] = ((displacement >> 4) & 0xFF) as u8;

    if length > BYTE_LENGTH_MAX {
        let extra = (length - (BYTE_LENGTH_MAX + 1)) as u16;
        unit[0] |= 0x01;
        unit[2..4].copy_from_slice(&extra.to_le_bytes());
        (unit, 4)
    } else if length > NIBBLE_LENGTH_MAX {
        unit[2] = (length - (NIBBLE_LENGTH_MAX + 1)) as u8;
        (unit, 3)
    } else {
        unit[0] |= length as u8;
        (unit, 2)
    }
}

impl<P: MatchParser + std::fmt::Debug + Send> Encoder for Lz40Encoder<P> {
    fn encode(&mut self, input: &mut dyn ByteSource, output: &mut dyn Write) -> Result<()> {
        let data = read_source(input, Some(MAX_FRAMED_SIZE))?;
        self.encode_slice(&data, output)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}
