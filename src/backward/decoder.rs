//! Backward LZ77 decompression

use super::{Footer, FOOTER_SIZE, MAX_EXPANSION};
use crate::buffer::CircularBuffer;
use crate::codec::{ByteSink, ByteSource, Decoder};
use crate::reverse::ReverseStream;
use crate::stream::ByteReader;
use crate::{ByteOrder, CompressionStats, Result, RetroLzError, BACKWARD_LZ77_WINDOW};
use std::io::{self, BufWriter, Read, Seek, SeekFrom, Write};

/// Backward LZ77 decoder for one footer byte order
#[derive(Debug)]
pub struct BackwardLz77Decoder {
    byte_order: ByteOrder,
    stats: CompressionStats,
}

/// Footer fields resolved against the container
#[derive(Debug)]
struct Layout {
    /// Uncompressed bytes in front of the compressed region
    prefix: u64,
    /// Payload bytes, read back to front
    payload: u64,
    /// End of the payload, relative to the container start
    payload_end: u64,
    /// End of the decompressed data, relative to the output start
    output_end: u64,
}

impl BackwardLz77Decoder {
    /// Create a decoder reading footer words in `byte_order`
    pub fn new(byte_order: ByteOrder) -> Self {
        Self {
            byte_order,
            stats: CompressionStats::default(),
        }
    }

    /// Footer byte order this decoder expects
    pub fn byte_order(&self) -> ByteOrder {
        self.byte_order
    }

    /// Decode the container spanning `input` from its current position to its
    /// end into `output` starting at its current position
    pub fn decode_to<R, W>(&mut self, input: &mut R, output: &mut W) -> Result<()>
    where
        R: Read + Seek + ?Sized,
        W: Write + Seek + ?Sized,
    {
        self.stats = CompressionStats::default();
        let input_start = input.stream_position()?;
        let container_len = input.seek(SeekFrom::End(0))? - input_start;
        let output_start = output.stream_position()?;

        let footer = read_footer(input, input_start, container_len, self.byte_order)?;
        let layout = resolve(&footer, container_len)?;
        log::debug!(
            "backward-lz77: footer_length={} compressed_size={:#X} decompressed_offset={} prefix={}",
            footer.footer_length,
            footer.compressed_size,
            footer.decompressed_offset,
            layout.prefix
        );

        if layout.prefix > 0 {
            input.seek(SeekFrom::Start(input_start))?;
            output.seek(SeekFrom::Start(output_start))?;
            let copied = io::copy(&mut (&mut *input).take(layout.prefix), &mut *output)?;
            if copied != layout.prefix {
                return Err(RetroLzError::UnexpectedEof { offset: copied });
            }
        }

        let source = ReverseStream::new(&mut *input, input_start + layout.payload_end);
        let mut reader = ByteReader::new(source.take(layout.payload));
        let sink = ReverseStream::new(&mut *output, output_start + layout.output_end);
        let mut writer = BufWriter::new(sink);
        let limit = layout.output_end - layout.prefix;
        let mut window = CircularBuffer::new(BACKWARD_LZ77_WINDOW);

        let mut flags = 0u8;
        let mut flag_bits = 0u32;
        while reader.position() < layout.payload {
            if flag_bits == 0 {
                flags = reader.read_u8()?;
                flag_bits = 8;
                continue;
            }
            flag_bits -= 1;

            let produced = window.total_written();
            if (flags >> flag_bits) & 1 == 0 {
                let byte = reader.read_u8()?;
                check_room(produced, 1, limit)?;
                writer.write_all(&[byte])?;
                window.write_byte(byte);
                self.stats.record_literal();
            } else {
                let byte1 = reader.read_u8()? as usize;
                let byte2 = reader.read_u8()? as usize;
                let length = (byte1 >> 4) + 3;
                let displacement = (((byte1 & 0xF) << 8) | byte2) + 3;

                check_room(produced, length, limit)?;
                log::trace!(
                    "backward-lz77: copy displacement={displacement} length={length} at {produced}"
                );
                window.copy(&mut writer, displacement, length)?;
                self.stats.record_match(length);
            }
        }
        writer.flush()?;

        let produced = window.total_written();
        if produced != limit {
            log::debug!("backward-lz77: payload produced {produced} of {limit} announced bytes");
        }
        self.stats.input_bytes = container_len;
        self.stats.output_bytes = layout.prefix + produced;
        Ok(())
    }
}

fn read_footer<R: Read + Seek + ?Sized>(
    input: &mut R,
    start: u64,
    container_len: u64,
    byte_order: ByteOrder,
) -> Result<Footer> {
    if container_len < FOOTER_SIZE as u64 {
        return Err(RetroLzError::InvalidFooter(format!(
            "container of {container_len} bytes cannot hold the {FOOTER_SIZE}-byte footer"
        )));
    }
    input.seek(SeekFrom::Start(start + container_len - FOOTER_SIZE as u64))?;
    let mut bytes = [0u8; FOOTER_SIZE];
    input.read_exact(&mut bytes)?;
    Ok(Footer::parse(&bytes, byte_order))
}

fn resolve(footer: &Footer, container_len: u64) -> Result<Layout> {
    let footer_length = footer.footer_length as u64;
    let compressed_size = footer.compressed_size as u64;

    if footer_length < FOOTER_SIZE as u64 {
        return Err(RetroLzError::InvalidFooter(format!(
            "footer length {footer_length} is shorter than the footer words"
        )));
    }
    if compressed_size < footer_length || compressed_size > container_len {
        return Err(RetroLzError::InvalidFooter(format!(
            "compressed size {compressed_size:#X} outside {footer_length}..={container_len:#X}"
        )));
    }

    let prefix = container_len - compressed_size;
    let payload = compressed_size - footer_length;
    let output_end = container_len as i64 + footer.decompressed_offset as i64;
    if output_end < prefix as i64 {
        return Err(RetroLzError::InvalidFooter(format!(
            "decompressed end {output_end} lies before the {prefix}-byte prefix"
        )));
    }
    let output_end = output_end as u64;
    if output_end - prefix > payload * MAX_EXPANSION {
        return Err(RetroLzError::InvalidFooter(format!(
            "{} decompressed bytes cannot come from a {payload}-byte payload",
            output_end - prefix
        )));
    }

    Ok(Layout {
        prefix,
        payload,
        payload_end: container_len - footer_length,
        output_end,
    })
}

fn check_room(produced: u64, length: usize, limit: u64) -> Result<()> {
    if produced + length as u64 > limit {
        return Err(RetroLzError::OutputOverflow {
            offset: produced,
            limit,
        });
    }
    Ok(())
}

impl Decoder for BackwardLz77Decoder {
    fn decode(&mut self, input: &mut dyn ByteSource, output: &mut dyn ByteSink) -> Result<()> {
        self.decode_to(input, output)
    }

    fn stats(&self) -> &CompressionStats {
        &self.stats
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    fn container(payload: &[u8], prefix: &[u8], decompressed_len: usize) -> Vec<u8> {
        let mut data = prefix.to_vec();
        data.extend_from_slice(payload);
        let footer = Footer {
            footer_length: FOOTER_SIZE as u32,
            compressed_size: (payload.len() + FOOTER_SIZE) as u32,
            decompressed_offset: (prefix.len() + decompressed_len) as i32
                - (data.len() + FOOTER_SIZE) as i32,
        };
        data.extend_from_slice(&footer.to_bytes(ByteOrder::LittleEndian));
        data
    }

    fn decode(data: &[u8]) -> Result<Vec<u8>> {
        let mut output = Cursor::new(Vec::new());
        BackwardLz77Decoder::new(ByteOrder::LittleEndian)
            .decode_to(&mut Cursor::new(data), &mut output)?;
        Ok(output.into_inner())
    }

    #[test]
    fn test_literals_are_written_back_to_front() {
        // read order: flag, 'c', 'b', 'a'
        let data = container(&[b'a', b'b', b'c', 0x00], &[], 3);
        assert_eq!(decode(&data).unwrap(), b"abc");
    }

    #[test]
    fn test_compressed_unit() {
        // read order: flag 0b0001_0000, 'z', 'y', 'x', then length 4 displacement 3
        let data = container(&[0x00, 0x10, b'x', b'y', b'z', 0x10], &[], 7);
        // logical output "zyxzyxz" lands reversed
        assert_eq!(decode(&data).unwrap(), b"zxyzxyz");
    }

    #[test]
    fn test_prefix_is_copied_verbatim() {
        let data = container(&[b'a', b'b', 0x00], b"HEAD", 2);
        assert_eq!(decode(&data).unwrap(), b"HEADab");
    }

    #[test]
    fn test_empty_payload() {
        let data = container(&[], &[], 0);
        assert!(decode(&data).unwrap().is_empty());
    }

    #[test]
    fn test_short_container() {
        let err = decode(&[0u8; 7]).unwrap_err();
        assert!(matches!(err, RetroLzError::InvalidFooter(_)));
    }

    #[test]
    fn test_footer_length_too_small() {
        let mut data = vec![0u8; 4];
        data.extend_from_slice(
            &Footer {
                footer_length: 4,
                compressed_size: 12,
                decompressed_offset: 0,
            }
            .to_bytes(ByteOrder::LittleEndian),
        );
        assert!(decode(&data).unwrap_err().is_corruption());
    }

    #[test]
    fn test_compressed_size_past_container() {
        let mut data = container(&[b'a', 0x00], &[], 1);
        let len = data.len();
        data[len - 8] = 0xFF;
        assert!(matches!(decode(&data), Err(RetroLzError::InvalidFooter(_))));
    }

    #[test]
    fn test_implausible_expansion() {
        let data = container(&[b'a', 0x00], &[], 100);
        assert!(matches!(decode(&data), Err(RetroLzError::InvalidFooter(_))));
    }

    #[test]
    fn test_output_overflow() {
        // two literals announced as one decompressed byte
        let data = container(&[b'a', b'b', 0x00], &[], 1);
        assert!(matches!(
            decode(&data),
            Err(RetroLzError::OutputOverflow { offset: 1, limit: 1 })
        ));
    }

    #[test]
    fn test_displacement_before_start() {
        let data = container(&[0x00, 0x00, 0x80], &[], 3);
        let err = decode(&data).unwrap_err();
        assert!(matches!(
            err,
            RetroLzError::InvalidDisplacement {
                displacement: 3,
                available: 0,
                ..
            }
        ));
    }

    #[test]
    fn test_truncated_unit() {
        // flag marks a compressed unit but only one payload byte follows
        let data = container(&[0x00, 0x80], &[], 3);
        assert!(matches!(
            decode(&data),
            Err(RetroLzError::UnexpectedEof { offset: 2 })
        ));
    }

    #[test]
    fn test_padding_is_skipped() {
        let mut data = vec![b'q', 0x00, 0xFF, 0xFF];
        let container_len = data.len() + FOOTER_SIZE;
        data.extend_from_slice(
            &Footer {
                footer_length: 10,
                compressed_size: 12,
                decompressed_offset: 1 - container_len as i32,
            }
            .to_bytes(ByteOrder::BigEndian),
        );
        let mut output = Cursor::new(Vec::new());
        BackwardLz77Decoder::new(ByteOrder::BigEndian)
            .decode_to(&mut Cursor::new(&data), &mut output)
            .unwrap();
        assert_eq!(output.into_inner(), b"q");
    }
}
