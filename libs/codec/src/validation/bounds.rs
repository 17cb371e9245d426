//! Bounds Checking for Safe Buffer Reads
//!
//! Every parser in this crate reads through [`ByteCursor`], so a malformed
//! length or offset turns into an error instead of an out-of-bounds access.

use byteorder::{BigEndian, ByteOrder, LittleEndian};
use thiserror::Error;

use crate::error::ProtocolError;

/// A read that would run past the end of the buffer
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("need {need} bytes at offset {offset}, buffer has {available}")]
pub struct BoundsError {
    pub offset: usize,
    pub need: usize,
    pub available: usize,
}

impl BoundsError {
    /// Attach the name of the field being read
    pub fn into_field_error(self, field: &'static str) -> ProtocolError {
        ProtocolError::FieldOutOfBounds {
            field,
            offset: self.offset,
            need: self.need,
            buffer_size: self.available,
        }
    }
}

/// Check if a buffer has enough bytes for a read operation
pub fn check_buffer_bounds(buffer: &[u8], offset: usize, size: usize) -> Result<(), BoundsError> {
    match offset.checked_add(size) {
        Some(end) if end <= buffer.len() => Ok(()),
        _ => Err(BoundsError {
            offset,
            need: size,
            available: buffer.len(),
        }),
    }
}

/// Safely extract a slice from a buffer with bounds checking
pub fn safe_slice(buffer: &[u8], offset: usize, size: usize) -> Result<&[u8], BoundsError> {
    check_buffer_bounds(buffer, offset, size)?;
    Ok(&buffer[offset..offset + size])
}

/// Forward-only reader with fallible fixed-width reads
#[derive(Debug, Clone)]
pub struct ByteCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteCursor<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Cursor positioned at `pos`; fails if `pos` lies past the end
    pub fn at(buf: &'a [u8], pos: usize) -> Result<Self, BoundsError> {
        let mut cursor = Self::new(buf);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Bytes not yet consumed
    pub fn rest(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    pub fn seek(&mut self, pos: usize) -> Result<(), BoundsError> {
        if pos > self.buf.len() {
            return Err(BoundsError {
                offset: pos,
                need: 0,
                available: self.buf.len(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    pub fn skip(&mut self, n: usize) -> Result<(), BoundsError> {
        self.take(n).map(|_| ())
    }

    pub fn take(&mut self, n: usize) -> Result<&'a [u8], BoundsError> {
        let bytes = safe_slice(self.buf, self.pos, n)?;
        self.pos += n;
        Ok(bytes)
    }

    pub fn read_u8(&mut self) -> Result<u8, BoundsError> {
        Ok(self.take(1)?[0])
    }

    pub fn read_u16_be(&mut self) -> Result<u16, BoundsError> {
        self.take(2).map(BigEndian::read_u16)
    }

    pub fn read_i16_be(&mut self) -> Result<i16, BoundsError> {
        self.take(2).map(BigEndian::read_i16)
    }

    pub fn read_u32_be(&mut self) -> Result<u32, BoundsError> {
        self.take(4).map(BigEndian::read_u32)
    }

    pub fn read_i16_le(&mut self) -> Result<i16, BoundsError> {
        self.take(2).map(LittleEndian::read_i16)
    }

    pub fn read_u32_le(&mut self) -> Result<u32, BoundsError> {
        self.take(4).map(LittleEndian::read_u32)
    }
}
