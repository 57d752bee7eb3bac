//! Sliding history window shared by every decoder
//!
//! The window keeps the most recent `capacity` output bytes. Back-references
//! are replayed one byte at a time so that a copy may read bytes it has just
//! produced (run-length style references with displacement < length).

use crate::{Result, RetroLzError};
use std::io::Write;

/// Fixed-capacity ring of recently emitted bytes
#[derive(Debug, Clone)]
pub struct CircularBuffer {
    storage: Vec<u8>,
    /// Next write index
    position: usize,
    /// Total bytes ever written
    written: u64,
}

impl CircularBuffer {
    /// Create an empty window holding at most `capacity` bytes
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "window capacity must be non-zero");
        Self {
            storage: vec![0; capacity],
            position: 0,
            written: 0,
        }
    }

    /// Maximum number of retrievable bytes
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Number of bytes currently addressable by a displacement
    pub fn len(&self) -> usize {
        self.written.min(self.storage.len() as u64) as usize
    }

    /// Whether nothing has been written yet
    pub fn is_empty(&self) -> bool {
        self.written == 0
    }

    /// Total number of bytes written over the window's lifetime
    pub fn total_written(&self) -> u64 {
        self.written
    }

    /// Append one byte, evicting the oldest once full
    pub fn write_byte(&mut self, byte: u8) {
        self.storage[self.position] = byte;
        self.position += 1;
        if self.position == self.storage.len() {
            self.position = 0;
        }
        self.written += 1;
    }

    /// Append a run of bytes
    pub fn write_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.write_byte(byte);
        }
    }

    /// Byte `displacement` positions behind the write cursor (1 = most recent)
    pub fn peek(&self, displacement: usize) -> Option<u8> {
        if displacement == 0 || displacement > self.len() {
            return None;
        }
        Some(self.storage[self.index_behind(displacement)])
    }

    /// Replay `length` bytes starting `displacement` back into `output`
    ///
    /// Each replayed byte is also appended to the window, so overlapping
    /// references repeat the pattern they start on. Fails before writing
    /// anything if `displacement` is zero or reaches past the history.
    pub fn copy<W: Write + ?Sized>(
        &mut self,
        output: &mut W,
        displacement: usize,
        length: usize,
    ) -> Result<()> {
        let available = self.len();
        if displacement == 0 || displacement > available {
            return Err(RetroLzError::InvalidDisplacement {
                offset: self.written,
                displacement,
                length,
                available,
            });
        }

        let capacity = self.storage.len();
        let mut source = self.index_behind(displacement);
        let mut chunk = [0u8; 64];
        let mut remaining = length;
        while remaining > 0 {
            let take = remaining.min(chunk.len());
            for slot in chunk.iter_mut().take(take) {
                let byte = self.storage[source];
                *slot = byte;
                self.write_byte(byte);
                source += 1;
                if source == capacity {
                    source = 0;
                }
            }
            output.write_all(&chunk[..take])?;
            remaining -= take;
        }
        Ok(())
    }

    fn index_behind(&self, displacement: usize) -> usize {
        let capacity = self.storage.len();
        (self.position + capacity - displacement) % capacity
    }
}
