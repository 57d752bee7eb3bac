//! Byte-level cursor over compressed input
//!
//! Decoders pull single bytes from a buffered reader and need to tell
//! "stream ended between blocks" (normal termination) apart from "stream
//! ended inside a block" (a stream-boundary error carrying the offset).

use crate::{Result, RetroLzError};
use byteorder::{ByteOrder as _, LittleEndian};
use std::io::{BufRead, BufReader, Read};

/// Buffered, position-tracking input cursor
#[derive(Debug)]
pub struct ByteReader<R: Read> {
    inner: BufReader<R>,
    position: u64,
}

impl<R: Read> ByteReader<R> {
    /// Wrap a reader; positions are counted from zero
    pub fn new(inner: R) -> Self {
        Self {
            inner: BufReader::new(inner),
            position: 0,
        }
    }

    /// Number of bytes consumed so far
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Whether the underlying reader has no more bytes
    pub fn is_exhausted(&mut self) -> Result<bool> {
        Ok(self.inner.fill_buf()?.is_empty())
    }

    /// Read one byte; end of input is an [`RetroLzError::UnexpectedEof`]
    pub fn read_u8(&mut self) -> Result<u8> {
        let byte = match self.inner.fill_buf()?.first() {
            Some(&byte) => byte,
            None => {
                return Err(RetroLzError::UnexpectedEof {
                    offset: self.position,
                })
            }
        };
        self.inner.consume(1);
        self.position += 1;
        Ok(byte)
    }

    /// Read a little-endian `u16`
    pub fn read_u16_le(&mut self) -> Result<u16> {
        let bytes = [self.read_u8()?, self.read_u8()?];
        Ok(LittleEndian::read_u16(&bytes))
    }

    /// Fill `buf` completely
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<()> {
        for slot in buf.iter_mut() {
            *slot = self.read_u8()?;
        }
        Ok(())
    }
}
