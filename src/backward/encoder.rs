//! Backward LZ77 compression

use super::{match_options, Footer, ALIGNMENT, FOOTER_SIZE, MIN_DISPLACEMENT, MIN_MATCH_LENGTH};
use crate::block::FlagBlock;
use crate::codec::{read_source, ByteSource, Encoder};
use crate::matcher::{HashChainParser, Match, MatchParser};
use crate::{ByteOrder, CompressionStats, Result, RetroLzError, MAX_FRAMED_SIZE};
use std::io::Write;

/// Compressed units take two bytes
const UNIT_LEN: usize = 2;

/// Backward LZ77 encoder for one footer byte order
#[derive(Debug)]
pub struct BackwardLz77Encoder<P = HashChainParser> {
    parser: P,
    byte_order: ByteOrder,
    stats: CompressionStats,
}

impl BackwardLz77Encoder {
    /// Encoder with the default hash-chain parser
    pub fn new(byte_order: ByteOrder) -> Self {
        Self::with_parser(HashChainParser::new(match_options()), byte_order)
    }
}

impl<P: MatchParser> BackwardLz77Encoder<P> {
    /// Encoder using a custom parser
    pub fn with_parser(parser: P, byte_order: ByteOrder) -> Self {
        Self {
            parser,
            byte_order,
            stats: CompressionStats::default(),
        }
    }

    /// Compress `data` into a complete container
    ///
    /// The container is assembled in memory; nothing is written when the
    /// input or the resulting compressed size exceeds 24 bits.
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

        let reversed: Vec<u8> = data.iter().rev().copied().collect();
        let mut payload = self.encode_reversed(&reversed)?;
        payload.reverse();

        let padding = (ALIGNMENT - payload.len() % ALIGNMENT) % ALIGNMENT;
        let footer_length = FOOTER_SIZE + padding;
        let compressed_size = payload.len() + footer_length;
        if compressed_size > MAX_FRAMED_SIZE {
            return Err(RetroLzError::InputTooLarge {
                size: compressed_size as u64,
                limit: MAX_FRAMED_SIZE as u64,
            });
        }
        let footer = Footer {
            footer_length: footer_length as u32,
            compressed_size: compressed_size as u32,
            decompressed_offset: (data.len() as i64 - compressed_size as i64) as i32,
        };
        log::debug!(
            "backward-lz77: payload={} padding={} decompressed_offset={}",
            payload.len(),
            padding,
            footer.decompressed_offset
        );

        payload.resize(payload.len() + padding, 0xFF);
        payload.extend_from_slice(&footer.to_bytes(self.byte_order));
        output.write_all(&payload)?;

        self.stats.output_bytes = payload.len() as u64;
        Ok(())
    }

    /// Flag-block stream over the reversed input, in reading order
    fn encode_reversed(&mut self, reversed: &[u8]) -> Result<Vec<u8>> {
        let mut stream = Vec::with_capacity(reversed.len() + reversed.len() / 8 + 1);
        let options = *self.parser.options();
        let mut matches = self.parser.find_matches(reversed).peekable();
        let mut block = FlagBlock::new(UNIT_LEN);
        let mut position = 0;
        while position < reversed.len() {
            if block.is_full() {
                block.flush(&mut stream)?;
            }

            match matches.next_if(|m| m.position == position) {
                Some(lz_match) => {
                    lz_match.validate(reversed, position, &options)?;
                    block.push_compressed(&compressed_unit(&lz_match));
                    self.stats.record_match(lz_match.length);
                    position = lz_match.end();
                }
                None => {
                    if let Some(skipped) = matches.next_if(|m| m.position < position) {
                        skipped.validate(reversed, position, &options)?;
                    }
                    block.push_literal(reversed[position]);
                    self.stats.record_literal();
                    position += 1;
                }
            }
        }
        block.flush(&mut stream)?;

        if let Some(stray) = matches.next() {
            stray.validate(reversed, reversed.len(), &options)?;
        }
        Ok(stream)
    }

    /// Footer byte order this encoder writes
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }
}

fn compressed_unit(lz_match: &Match) -> [u8; UNIT_LEN] {
    let length = lz_match.length - MIN_MATCH_LENGTH;
    let displacement = lz_match.displacement - MIN_DISPLACEMENT;
    [
        ((length << 4) | (displacement >> 8)) as u8,
        (displacement & 0xFF) as u8,
    ]
}

impl<P: MatchParser + std::fmt::Debug + Send> Encoder for BackwardLz77Encoder<P> {
    fn encode(&mut self, input: &mut dyn ByteSource, output: &mut dyn Write) -> Result<()> {
        let data = read_source(input, Some(MAX_FRAMED_SIZE))?;
        self.encode_slice(&data, output)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}
