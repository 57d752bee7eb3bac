//! Reversed view over a seekable byte store
//!
//! Logical position 0 of a [`ReverseStream`] is the byte just before the
//! configured origin; reading or writing advances the logical position
//! while the physical position moves toward the start of the store.
//! Logical byte `p` maps to physical offset `origin - 1 - p`.

use std::io::{self, Read, Seek, SeekFrom, Write};

/// Read/write cursor that walks a seekable store from `origin` down to 0
#[derive(Debug)]
pub struct ReverseStream<S> {
    inner: S,
    origin: u64,
    position: u64,
}

impl<S: Seek> ReverseStream<S> {
    /// Create a reversed view whose logical start sits at physical `origin`
    pub fn new(inner: S, origin: u64) -> Self {
        Self {
            inner,
            origin,
            position: 0,
        }
    }

    /// Physical offset the view starts from
    pub fn origin(&self) -> u64 {
        self.origin
    }

    /// Logical position (bytes already traversed)
    pub fn position(&self) -> u64 {
        self.position
    }

    /// Bytes left before the physical start of the store
    pub fn remaining(&self) -> u64 {
        self.origin.saturating_sub(self.position)
    }

    /// Recover the wrapped store
    pub fn into_inner(self) -> S {
        self.inner
    }

    /// Seek the store to the lowest physical offset of the next `len` logical bytes
    fn seek_block(&mut self, len: u64) -> io::Result<()> {
        let start = self.origin - self.position - len;
        self.inner.seek(SeekFrom::Start(start))?;
        Ok(())
    }
}

impl<S: Read + Seek> Read for ReverseStream<S> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let len = (buf.len() as u64).min(self.remaining()) as usize;
        if len == 0 {
            return Ok(0);
        }
        self.seek_block(len as u64)?;
        self.inner.read_exact(&mut buf[..len])?;
        buf[..len].reverse();
        self.position += len as u64;
        Ok(len)
    }
}

impl<S: Write + Seek> Write for ReverseStream<S> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let len = (buf.len() as u64).min(self.remaining()) as usize;
        if len == 0 {
            return Ok(0);
        }
        let block: Vec<u8> = buf[..len].iter().rev().copied().collect();
        self.seek_block(len as u64)?;
        self.inner.write_all(&block)?;
        self.position += len as u64;
        Ok(len)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }
}

impl<S: Seek> Seek for ReverseStream<S> {
    fn seek(&mut self, pos: SeekFrom) -> io::Result<u64> {
        let target = match pos {
            SeekFrom::Start(offset) => Some(offset),
            SeekFrom::Current(delta) => self.position.checked_add_signed(delta),
            SeekFrom::End(delta) => self.origin.checked_add_signed(delta),
        };
        match target {
            Some(target) if target <= self.origin => {
                self.position = target;
                Ok(target)
            }
            _ => Err(io::Error::new(
                io::ErrorKind::InvalidInput,
                "seek outside of reversed view",
            )),
        }
    }
}
