//! LZ40 decompression

use super::{BYTE_LENGTH_MAX, MAGIC, NIBBLE_LENGTH_MAX};
use crate::buffer::CircularBuffer;
use crate::codec::{ByteSink, ByteSource, Decoder};
use crate::stream::ByteReader;
use crate::{CompressionStats, Result, RetroLzError, LZ40_WINDOW};
use byteorder::{ByteOrder as _, LittleEndian};
use std::io::{BufWriter, Read, Seek, SeekFrom, Write};

/// LZ40 decoder
#[derive(Debug, Default)]
pub struct Lz40Decoder {
    stats: CompressionStats,
}

impl Lz40Decoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode a stream into any writer; LZ40 never needs to seek its output
    pub fn decode_to<R: Read, W: Write + ?Sized>(&mut self, input: R, output: &mut W) -> Result<()> {
        self.stats = CompressionStats::default();
        let mut reader = ByteReader::new(input);

        let magic = reader.read_u8()?;
        if magic != MAGIC {
            return Err(RetroLzError::InvalidHeader(format!(
                "expected magic {MAGIC:#04X}, found {magic:#04X}"
            )));
        }
        let mut size_field = [0u8; 3];
        reader.read_exact(&mut size_field)?;
        let size = LittleEndian::read_u24(&size_field) as u64;
        log::debug!("lz40: header declares {size} decompressed bytes");

        let mut writer = BufWriter::new(output);
        let mut window = CircularBuffer::new(LZ40_WINDOW);
        let mut flags = 0u8;
        let mut flag_bits = 0u32;
        while window.total_written() < size {
            if flag_bits == 0 {
                flags = reader.read_u8()?;
                flag_bits = 8;
            }
            flag_bits -= 1;

            if (flags >> flag_bits) & 1 == 0 {
                let byte = reader.read_u8()?;
                writer.write_all(&[byte])?;
                window.write_byte(byte);
                self.stats.record_literal();
                continue;
            }

            let byte1 = reader.read_u8()?;
            let byte2 = reader.read_u8()?;
            let displacement = ((byte2 as usize) << 4) | (byte1 as usize >> 4);
            let length = match byte1 & 0x0F {
                0 => reader.read_u8()? as usize + NIBBLE_LENGTH_MAX + 1,
                1 => reader.read_u16_le()? as usize + BYTE_LENGTH_MAX + 1,
                nibble => nibble as usize,
            };

            let produced = window.total_written();
            if produced + length as u64 > size {
                return Err(RetroLzError::OutputOverflow {
                    offset: produced,
                    limit: size,
                });
            }
            log::trace!("lz40: copy displacement={displacement} length={length} at {produced}");
            window.copy(&mut writer, displacement, length)?;
            self.stats.record_match(length);
        }
        writer.flush()?;

        self.stats.input_bytes = reader.position();
        self.stats.output_bytes = size;
        Ok(())
    }
}

impl Decoder for Lz40Decoder {
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
