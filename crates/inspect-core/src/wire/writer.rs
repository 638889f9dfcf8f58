//! Growable buffer for writing wire primitives.

use super::{
    zigzag_encode, WireType, MAX_BUFFER_SIZE, MAX_BYTES_LENGTH, MAX_FIELD_NUMBER,
    MAX_UTF8_CHAR_BYTES,
};
use crate::error::{Error, Result};
use bytes::{BufMut, BytesMut};

/// Default starting capacity for a [`WireWriter`]
pub const DEFAULT_CAPACITY: usize = 64;

/// Writes wire primitives into a buffer that doubles its capacity on overflow.
#[derive(Debug, Clone)]
pub struct WireWriter {
    buf: BytesMut,
    max_string_length: usize,
}

impl Default for WireWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl WireWriter {
    /// Creates a writer with [`DEFAULT_CAPACITY`] bytes of backing storage
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    /// Creates a writer seeded with `capacity` bytes of backing storage
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity.max(1)),
            max_string_length: MAX_BUFFER_SIZE,
        }
    }

    /// Caps the character count accepted by [`WireWriter::write_string`]
    pub fn max_string_length(mut self, max: usize) -> Self {
        self.max_string_length = max;
        self
    }

    fn ensure(&mut self, additional: usize) {
        let needed = self.buf.len() + additional;
        if needed > self.buf.capacity() {
            let target = (self.buf.capacity() * 2).max(needed);
            self.buf.reserve(target - self.buf.len());
        }
    }

    fn put(&mut self, bytes: &[u8]) {
        self.ensure(bytes.len());
        self.buf.put_slice(bytes);
    }

    /// Writes a u32 as a base-128 varint
    pub fn write_varint(&mut self, value: u32) -> Result<()> {
        self.write_varint64(u64::from(value))
    }

    /// Writes a u64 as a base-128 varint
    pub fn write_varint64(&mut self, mut value: u64) -> Result<()> {
        self.ensure(super::MAX_VARINT64_BYTES);
        loop {
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buf.put_u8(byte);
                return Ok(());
            }
            self.buf.put_u8(byte | 0x80);
        }
    }

    /// Writes a signed value as a zigzag varint
    pub fn write_sint32(&mut self, value: i32) -> Result<()> {
        self.write_varint(zigzag_encode(value))
    }

    /// Writes a field tag
    pub fn write_tag(&mut self, field_number: u32, wire_type: WireType) -> Result<()> {
        if field_number == 0 || field_number > MAX_FIELD_NUMBER {
            return Err(Error::encoding(format!(
                "invalid field number {}: must be between 1 and {}",
                field_number, MAX_FIELD_NUMBER
            )));
        }
        self.write_varint((field_number << 3) | wire_type as u32)
    }

    /// Writes a finite float as 4 little-endian bytes
    pub fn write_float(&mut self, value: f32) -> Result<()> {
        if !value.is_finite() {
            return Err(Error::encoding(format!(
                "cannot encode non-finite float {}",
                value
            )));
        }
        self.put(&value.to_le_bytes());
        Ok(())
    }

    /// Writes a length-prefixed UTF-8 string
    pub fn write_string(&mut self, value: &str) -> Result<()> {
        let max_bytes = self.max_string_length.saturating_mul(MAX_UTF8_CHAR_BYTES);
        if value.len() > max_bytes {
            return Err(Error::encoding(format!(
                "string of {} bytes exceeds maximum of {}",
                value.len(),
                max_bytes
            )));
        }
        let chars = value.chars().count();
        if chars > self.max_string_length {
            return Err(Error::encoding(format!(
                "string of {} characters exceeds maximum of {}",
                chars, self.max_string_length
            )));
        }
        self.write_varint(value.len() as u32)?;
        self.put(value.as_bytes());
        Ok(())
    }

    /// Writes a length prefix followed by raw bytes
    pub fn write_length_delimited(&mut self, value: &[u8]) -> Result<()> {
        if value.len() > MAX_BYTES_LENGTH {
            return Err(Error::encoding(format!(
                "embedded message of {} bytes exceeds maximum of {}",
                value.len(),
                MAX_BYTES_LENGTH
            )));
        }
        self.write_varint(value.len() as u32)?;
        self.put(value);
        Ok(())
    }

    /// The bytes written so far
    pub fn bytes(&self) -> &[u8] {
        &self.buf
    }

    /// Number of bytes written
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns true if nothing has been written
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Consumes the writer, returning the written bytes
    pub fn into_vec(self) -> Vec<u8> {
        self.buf.to_vec()
    }
}
