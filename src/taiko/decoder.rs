//! Taiko LZ80 decompression

use crate::buffer::CircularBuffer;
use crate::codec::{ByteSink, ByteSource, Decoder};
use crate::stream::ByteReader;
use crate::{CompressionStats, Result, TAIKO_LZ80_WINDOW};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

/// Taiko LZ80 decoder
#[derive(Debug, Default)]
pub struct TaikoLz80Decoder {
    stats: CompressionStats,
}

/// What one control byte asks for
enum Block {
    Literals(usize),
    Reference { displacement: usize, length: usize },
    End,
}

impl TaikoLz80Decoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode until the end marker or the end of input
    pub fn decode_to<R: Read, W: Write + ?Sized>(&mut self, input: R, output: &mut W) -> Result<()> {
        self.stats = CompressionStats::default();
        let mut reader = ByteReader::new(input);
        let mut writer = BufWriter::new(output);
        let mut window = CircularBuffer::new(TAIKO_LZ80_WINDOW);

        while !reader.is_exhausted()? {
            let code = reader.read_u8()?;
            match read_block(&mut reader, code)? {
                Block::End => {
                    log::debug!("taiko-lz80: end marker at input offset {}", reader.position());
                    break;
                }
                Block::Literals(length) => {
                    for _ in 0..length {
                        let byte = reader.read_u8()?;
                        writer.write_all(&[byte])?;
                        window.write_byte(byte);
                    }
                    self.stats.literal_count += length;
                }
                Block::Reference {
                    displacement,
                    length,
                } => {
                    window.copy(&mut writer, displacement, length)?;
                    self.stats.record_match(length);
                }
            }
        }
        writer.flush()?;

        self.stats.input_bytes = reader.position();
        self.stats.output_bytes = window.total_written();
        Ok(())
    }
}

fn read_block<R: Read>(reader: &mut ByteReader<R>, code: u8) -> Result<Block> {
    let code = code as usize;
    let block = match code >> 6 {
        0 => {
            if code != 0 {
                return Ok(Block::Literals(code & 0x3F));
            }
            let byte1 = reader.read_u8()? as usize;
            if byte1 >> 7 == 0 {
                let byte2 = reader.read_u8()? as usize;
                if byte1 == 0 && byte2 == 0 {
                    return Ok(Block::End);
                }
                Block::Literals(0xBF + ((byte1 << 8) | byte2))
            } else {
                Block::Literals(0x40 + (byte1 & 0x7F))
            }
        }
        1 => Block::Reference {
            length: ((code >> 4) & 0x3) + 2,
            displacement: (code & 0xF) + 1,
        },
        2 => {
            let byte1 = reader.read_u8()? as usize;
            Block::Reference {
                length: ((code >> 2) & 0xF) + 3,
                displacement: (((code & 0x3) << 8) | byte1) + 1,
            }
        }
        _ => {
            let byte1 = reader.read_u8()? as usize;
            let byte2 = reader.read_u8()? as usize;
            Block::Reference {
                length: (((code & 0x3F) << 1) | (byte1 >> 7)) + 4,
                displacement: (((byte1 & 0x7F) << 8) | byte2) + 1,
            }
        }
    };
    Ok(block)
}

impl Decoder for TaikoLz80Decoder {
    fn decode(&mut self, input: &mut dyn ByteSource, output: &mut dyn ByteSink) -> Result<()> {
        // leave the cursor right after the stream, not where buffering stopped
        let start = input.stream_position()?;
        self.decode_to(&mut *input, output)?;
        input.seek(SeekFrom::Start(start + self.stats.input_bytes))?;
        Ok(())
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::RetroLzError;
    use std::io::Cursor;

    fn decode(data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Vec::new();
        TaikoLz80Decoder::new().decode_to(Cursor::new(data), &mut output)?;
        Ok(output)
    }

    #[test]
    fn test_short_literal_run() {
        assert_eq!(decode(&[0x03, b'a', b'b', b'c']).unwrap(), b"abc");
    }

    #[test]
    fn test_stops_at_end_marker() {
        let output = decode(&[0x02, b'h', b'i', 0x00, 0x00, 0x00, 0xC5, 0x13, 0x77]).unwrap();
        assert_eq!(output, b"hi");
    }

    #[test]
    fn test_input_exhaustion_ends_stream() {
        assert_eq!(decode(&[0x01, b'k', 0x40]).unwrap(), b"kkk");
        assert!(decode(&[]).unwrap().is_empty());
    }

    #[test]
    fn test_medium_literal_run() {
        // 0x40 + 0x05 literals
        let mut data = vec![0x00, 0x85];
        data.extend((0..0x45u8).map(|i| i.wrapping_mul(3)));
        let output = decode(&data).unwrap();
        assert_eq!(output.len(), 0x45);
        assert_eq!(&output[..], &data[2..]);
    }

    #[test]
    fn test_long_literal_run() {
        // 0xBF + 0x0001 literals
        let mut data = vec![0x00, 0x00, 0x01];
        data.extend(std::iter::repeat(0x5A).take(0xC0));
        assert_eq!(decode(&data).unwrap().len(), 0xC0);

        // 0xBF + 0x0100 literals
        let mut data = vec![0x00, 0x01, 0x00];
        data.extend(std::iter::repeat(0x5A).take(0x1BF));
        assert_eq!(decode(&data).unwrap().len(), 0x1BF);
    }

    #[test]
    fn test_one_byte_reference() {
        // length ((0x3 & 3) + 2) = 5, displacement 2
        assert_eq!(decode(&[0x02, b'x', b'y', 0x71]).unwrap(), b"xyxyxyx");
    }

    #[test]
    fn test_two_byte_reference() {
        // length ((0x5 & 0xF) + 3) = 8, displacement ((0 << 8) | 0x03) + 1 = 4
        assert_eq!(
            decode(&[0x04, b'a', b'b', b'c', b'd', 0x94, 0x03]).unwrap(),
            b"abcdabcdabcd"
        );
    }

    #[test]
    fn test_three_byte_reference() {
        // length ((1 << 1) | 1) + 4 = 7, displacement 1
        assert_eq!(decode(&[0x01, b'r', 0xC1, 0x80, 0x00]).unwrap(), b"rrrrrrrr");
    }

    #[test]
    fn test_truncated_continuation() {
        assert!(matches!(
            decode(&[0x00]),
            Err(RetroLzError::UnexpectedEof { offset: 1 })
        ));
        assert!(matches!(
            decode(&[0x00, 0x00]),
            Err(RetroLzError::UnexpectedEof { offset: 2 })
        ));
        assert!(matches!(
            decode(&[0x01, b'a', 0x80]),
            Err(RetroLzError::UnexpectedEof { offset: 3 })
        ));
    }

    #[test]
    fn test_truncated_literals() {
        assert!(matches!(
            decode(&[0x04, b'a', b'b']),
            Err(RetroLzError::UnexpectedEof { .. })
        ));
    }

    #[test]
    fn test_input_left_after_end_marker() {
        let mut data = vec![0x02, b'h', b'i', 0x00, 0x00, 0x00];
        data.extend_from_slice(b"NEXT-ENTRY");
        // the stream may start part way into a shared handle
        let mut input = Cursor::new([b"hdr".to_vec(), data].concat());
        input.set_position(3);
        let mut output = Cursor::new(Vec::new());

        let mut decoder = TaikoLz80Decoder::new();
        Decoder::decode(&mut decoder, &mut input, &mut output).unwrap();
        assert_eq!(output.into_inner(), b"hi");
        assert_eq!(input.position(), 9);

        let mut rest = Vec::new();
        input.read_to_end(&mut rest).unwrap();
        assert_eq!(rest, b"NEXT-ENTRY");
    }

    #[test]
    fn test_reference_before_start() {
        assert!(decode(&[0x40]).unwrap_err().is_corruption());
        assert!(decode(&[0x01, b'a', 0x41]).unwrap_err().is_corruption());
    }
}
