//! Flag-byte block framing
//!
//! Both flag-driven formats group their units eight at a time behind one
//! flag byte whose bits, most significant first, mark each unit as literal
//! (0) or compressed (1).

use std::io::{self, Write};

/// Units described by one flag byte
pub(crate) const UNITS_PER_BLOCK: usize = 8;

/// One flag byte plus the payload of up to eight units
#[derive(Debug)]
pub(crate) struct FlagBlock {
    buffer: Vec<u8>,
    units: usize,
}

impl FlagBlock {
    /// Empty block; `max_unit_len` sizes the buffer for the worst case
    pub(crate) fn new(max_unit_len: usize) -> Self {
        let mut buffer = Vec::with_capacity(1 + UNITS_PER_BLOCK * max_unit_len);
        buffer.push(0);
        Self { buffer, units: 0 }
    }

    pub(crate) fn is_full(&self) -> bool {
        self.units == UNITS_PER_BLOCK
    }

    pub(crate) fn push_literal(&mut self, byte: u8) {
        self.buffer.push(byte);
        self.units += 1;
    }

    pub(crate) fn push_compressed(&mut self, unit: &[u8]) {
        self.buffer[0] |= 0x80 >> self.units;
        self.buffer.extend_from_slice(unit);
        self.units += 1;
    }

    /// Write the block if it holds any unit, then start a new one
    pub(crate) fn flush<W: Write + ?Sized>(&mut self, output: &mut W) -> io::Result<usize> {
        let written = if self.units > 0 {
            output.write_all(&self.buffer)?;
            self.buffer.len()
        } else {
            0
        };
        self.buffer.clear();
        self.buffer.push(0);
        self.units = 0;
        Ok(written)
    }
}
