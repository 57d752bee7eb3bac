//! Taiko LZ80 compression

use super::{
    match_options, END_MARKER, LONG_RUN_MAX, MEDIUM_REF, MEDIUM_RUN_MAX, SHORT_REF, SHORT_RUN_MAX,
};
use crate::codec::{read_source, ByteSource, Encoder};
use crate::matcher::{HashChainParser, Match, MatchParser};
use crate::{CompressionStats, Result};
use std::io::{BufWriter, Write};

/// Taiko LZ80 encoder driven by a match parser
#[derive(Debug)]
pub struct TaikoLz80Encoder<P = HashChainParser> {
    parser: P,
    stats: CompressionStats,
}

impl TaikoLz80Encoder {
    /// Encoder with the default hash-chain parser
    pub fn new() -> Self {
        Self::with_parser(HashChainParser::new(match_options()))
    }
}

impl Default for TaikoLz80Encoder {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: MatchParser> TaikoLz80Encoder<P> {
    /// Encoder using a custom parser
    pub fn with_parser(parser: P) -> Self {
        Self {
            parser,
            stats: CompressionStats::default(),
        }
    }

    /// Compress `data` into `output`, terminated by the end marker
    pub fn encode_slice<W: Write + ?Sized>(&mut self, data: &[u8], output: &mut W) -> Result<()> {
        self.stats = CompressionStats {
            input_bytes: data.len() as u64,
            ..CompressionStats::default()
        };
        let mut writer = BufWriter::new(output);
        let mut written = 0u64;

        let options = *self.parser.options();
        let mut matches = self.parser.find_matches(data).peekable();
        let mut run_start = 0;
        let mut position = 0;
        while position < data.len() {
            match matches.next_if(|m| m.position == position) {
                Some(lz_match) => {
                    lz_match.validate(data, position, &options)?;
                    written += write_literals(&mut writer, &data[run_start..position])?;

                    let (code, len) = reference_code(&lz_match);
                    writer.write_all(&code[..len])?;
                    written += len as u64;
                    self.stats.record_match(lz_match.length);

                    position = lz_match.end();
                    run_start = position;
                }
                None => {
                    if let Some(skipped) = matches.next_if(|m| m.position < position) {
                        skipped.validate(data, position, &options)?;
                    }
                    self.stats.record_literal();
                    position += 1;
                }
            }
        }
        written += write_literals(&mut writer, &data[run_start..])?;

        if let Some(stray) = matches.next() {
            stray.validate(data, data.len(), &options)?;
        }

        writer.write_all(&END_MARKER)?;
        written += END_MARKER.len() as u64;
        writer.flush()?;

        self.stats.output_bytes = written;
        log::debug!(
            "taiko-lz80: encoded {} bytes into {} ({} literals, {} matches)",
            data.len(),
            written,
            self.stats.literal_count,
            self.stats.match_count
        );
        Ok(())
    }
}

/// Emit a literal run, split into as many blocks as needed
fn write_literals<W: Write>(writer: &mut W, literals: &[u8]) -> Result<u64> {
    let mut written = 0u64;
    for chunk in literals.chunks(LONG_RUN_MAX) {
        let header = run_header(chunk.len());
        writer.write_all(header.as_slice())?;
        writer.write_all(chunk)?;
        written += (header.len() + chunk.len()) as u64;
    }
    Ok(written)
}

/// Control bytes announcing a literal run of 1..=`LONG_RUN_MAX` bytes
fn run_header(length: usize) -> Vec<u8> {
    if length <= SHORT_RUN_MAX {
        vec![length as u8]
    } else if length <= MEDIUM_RUN_MAX {
        vec![0x00, 0x80 | (length - (SHORT_RUN_MAX + 1)) as u8]
    } else {
        let extra = length - MEDIUM_RUN_MAX;
        vec![0x00, (extra >> 8) as u8, (extra & 0xFF) as u8]
    }
}

/// Smallest reference form that can carry the match
fn reference_code(lz_match: &Match) -> ([u8; 3], usize) {
    let length = lz_match.length;
    let distance = lz_match.displacement - 1;

    if length <= SHORT_REF.0 && lz_match.displacement <= SHORT_REF.1 {
        ([0x40 | (((length - 2) << 4) | distance) as u8, 0, 0], 1)
    } else if length >= 3 && length <= MEDIUM_REF.0 && lz_match.displacement <= MEDIUM_REF.1 {
        (
            [
                0x80 | (((length - 3) << 2) | (distance >> 8)) as u8,
                (distance & 0xFF) as u8,
                0,
            ],
            2,
        )
    } else {
        let extra = length - 4;
        (
            [
                0xC0 | (extra >> 1) as u8,
                (((extra & 1) << 7) | (distance >> 8)) as u8,
                (distance & 0xFF) as u8,
            ],
            3,
        )
    }
}

impl<P: MatchParser + std::fmt::Debug + Send> Encoder for TaikoLz80Encoder<P> {
    fn encode(&mut self, input: &mut dyn ByteSource, output: &mut dyn Write) -> Result<()> {
        let data = read_source(input, None)?;
        self.encode_slice(&data, output)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RetroLzError;

    fn encode(data: &[u8]) -> Vec<u8> {
        let mut output = Vec::new();
        TaikoLz80Encoder::new()
            .encode_slice(data, &mut output)
            .unwrap();
        output
    }

    #[test]
    fn test_empty_input_is_end_marker_only() {
        assert_eq!(encode(&[]), END_MARKER.to_vec());
    }

    #[test]
    fn test_run_headers() {
        assert_eq!(run_header(1), vec![0x01]);
        assert_eq!(run_header(0x3F), vec![0x3F]);
        assert_eq!(run_header(0x40), vec![0x00, 0x80]);
        assert_eq!(run_header(0xBF), vec![0x00, 0xFF]);
        assert_eq!(run_header(0xC0), vec![0x00, 0x00, 0x01]);
        assert_eq!(run_header(0x80BE), vec![0x00, 0x7F, 0xFF]);
    }

    #[test]
    fn test_reference_forms() {
        let (code, len) = reference_code(&Match::new(20, 2, 5));
        assert_eq!(&code[..len], &[0x71]);

        let (code, len) = reference_code(&Match::new(20, 4, 8));
        assert_eq!(&code[..len], &[0x94, 0x03]);

        let (code, len) = reference_code(&Match::new(20, 0x400, 18));
        assert_eq!(&code[..len], &[0xBF, 0xFF]);

        let (code, len) = reference_code(&Match::new(0x900, 0x500, 7));
        assert_eq!(&code[..len], &[0xC1, 0x84, 0xFF]);

        let (code, len) = reference_code(&Match::new(0x9000, 0x8000, 131));
        assert_eq!(&code[..len], &[0xFF, 0xFF, 0xFF]);
    }

    #[test]
    fn test_short_text() {
        // "xy" then a displacement-2 copy of five bytes
        assert_eq!(encode(b"xyxyxyx"), vec![0x02, b'x', b'y', 0x71, 0, 0, 0]);
    }

    #[test]
    fn test_long_literal_run_is_split() {
        let data: Vec<u8> = (0..LONG_RUN_MAX + 2)
            .map(|i| (i as u32).wrapping_mul(2_654_435_761).to_le_bytes()[3])
            .collect();
        let mut output = Vec::new();
        let mut encoder = TaikoLz80Encoder::with_parser(HashChainParser::new(
            match_options().with_admit(|_, _| false),
        ));
        encoder.encode_slice(&data, &mut output).unwrap();

        assert_eq!(&output[..3], &[0x00, 0x7F, 0xFF]);
        let second = 3 + LONG_RUN_MAX;
        assert_eq!(output[second], 0x02);
        assert_eq!(&output[output.len() - 3..], &END_MARKER);
        assert_eq!(encoder.stats().match_count, 0);
    }

    #[derive(Debug)]
    struct FixedParser {
        options: crate::matcher::MatchOptions,
        matches: Vec<Match>,
    }

    impl MatchParser for FixedParser {
        fn options(&self) -> &crate::matcher::MatchOptions {
            &self.options
        }

        fn find_matches<'a>(&'a self, _input: &'a [u8]) -> impl Iterator<Item = Match> + 'a {
            self.matches.iter().copied()
        }
    }

    #[test]
    fn test_unadmitted_match_is_rejected() {
        let data = vec![9u8; 40];
        let mut output = Vec::new();
        // length 2 needs a displacement of at most 16
        let parser = FixedParser {
            options: match_options(),
            matches: vec![Match::new(20, 20, 2)],
        };
        let err = TaikoLz80Encoder::with_parser(parser)
            .encode_slice(&data, &mut output)
            .unwrap_err();
        assert!(matches!(err, RetroLzError::InvalidMatch { position: 20, .. }));
    }
}
