//! Bounded cursor for reading wire primitives.

use super::{
    zigzag_decode, WireType, MAX_BUFFER_SIZE, MAX_BYTES_LENGTH, MAX_EXPECTED_FIELD,
    MAX_UTF8_CHAR_BYTES, MAX_VARINT32_BYTES, MAX_VARINT64_BYTES,
};
use crate::error::{Error, Result};
use tracing::trace;

/// Reads wire primitives from an immutable byte buffer.
///
/// Every read checks the remaining length before consuming anything, so
/// truncated or hostile input produces an [`Error`] instead of a panic.
#[derive(Debug, Clone)]
pub struct WireReader<'a> {
    buf: &'a [u8],
    pos: usize,
    max_string_length: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a reader over `buf` with no string length cap beyond the buffer itself
    pub fn new(buf: &'a [u8]) -> Result<Self> {
        Self::with_max_string_length(buf, MAX_BUFFER_SIZE)
    }

    /// Creates a reader whose strings may not exceed `max_string_length` characters
    pub fn with_max_string_length(buf: &'a [u8], max_string_length: usize) -> Result<Self> {
        if buf.is_empty() {
            return Err(Error::decoding(0, "buffer cannot be empty"));
        }
        if buf.len() > MAX_BUFFER_SIZE {
            return Err(Error::decoding(
                0,
                format!(
                    "buffer too large: {} bytes exceeds {} byte limit",
                    buf.len(),
                    MAX_BUFFER_SIZE
                ),
            ));
        }
        Ok(Self {
            buf,
            pos: 0,
            max_string_length,
        })
    }

    /// Current cursor offset
    #[inline]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Bytes left after the cursor
    #[inline]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// Returns true while unread bytes remain
    #[inline]
    pub fn has_more(&self) -> bool {
        self.pos < self.buf.len()
    }

    fn take(&mut self, len: usize) -> Result<&'a [u8]> {
        if len > self.remaining() {
            return Err(Error::truncated(self.pos, len, self.remaining()));
        }
        let start = self.pos;
        self.pos += len;
        Ok(&self.buf[start..self.pos])
    }

    fn read_raw_varint(&mut self, max_bytes: usize) -> Result<u64> {
        let start = self.pos;
        let mut result: u64 = 0;

        for i in 0..max_bytes {
            let Some(&byte) = self.buf.get(self.pos) else {
                return Err(Error::decoding(start, "varint runs past end of buffer"));
            };
            self.pos += 1;
            result |= u64::from(byte & 0x7F) << (7 * i);

            if byte & 0x80 == 0 {
                return Ok(result);
            }
        }

        Err(Error::decoding(
            start,
            format!("varint exceeds {} bytes", max_bytes),
        ))
    }

    /// Reads a varint of at most 5 bytes, truncated to 32 bits
    pub fn read_varint(&mut self) -> Result<u32> {
        self.read_raw_varint(MAX_VARINT32_BYTES).map(|v| v as u32)
    }

    /// Reads a varint of at most 10 bytes
    pub fn read_varint64(&mut self) -> Result<u64> {
        self.read_raw_varint(MAX_VARINT64_BYTES)
    }

    /// Reads a zigzag-encoded signed varint
    pub fn read_sint32(&mut self) -> Result<i32> {
        self.read_varint().map(zigzag_decode)
    }

    /// Reads a 4-byte little-endian IEEE-754 float
    pub fn read_float(&mut self) -> Result<f32> {
        let bytes = self.take(4)?;
        Ok(f32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
    }

    fn read_length(&mut self, max: usize) -> Result<usize> {
        let offset = self.pos;
        let length = self.read_varint()?;
        let len = length as usize;
        if len > max {
            return Err(Error::LengthLimit {
                offset,
                length: u64::from(length),
                max,
            });
        }
        if len > self.remaining() {
            return Err(Error::truncated(self.pos, len, self.remaining()));
        }
        Ok(len)
    }

    /// Reads a length-prefixed, strictly valid UTF-8 string
    ///
    /// The length prefix is checked against the widest possible encoding of
    /// the character limit before anything is consumed; the character count
    /// is checked once the bytes are known to be UTF-8.
    pub fn read_string(&mut self) -> Result<String> {
        let max_bytes = self.max_string_length.saturating_mul(MAX_UTF8_CHAR_BYTES);
        let len = self.read_length(max_bytes)?;
        let offset = self.pos;
        let bytes = self.take(len)?;
        let value = std::str::from_utf8(bytes)
            .map_err(|e| Error::decoding(offset, format!("invalid UTF-8 in string: {}", e)))?;

        let chars = value.chars().count();
        if chars > self.max_string_length {
            return Err(Error::decoding(
                offset,
                format!(
                    "string of {} characters exceeds maximum of {}",
                    chars, self.max_string_length
                ),
            ));
        }
        Ok(value.to_owned())
    }

    /// Reads a length-prefixed byte slice of at most [`MAX_BYTES_LENGTH`] bytes
    pub fn read_bytes(&mut self) -> Result<&'a [u8]> {
        let len = self.read_length(MAX_BYTES_LENGTH)?;
        self.take(len)
    }

    /// Reads a field tag, returning the field number and wire type
    pub fn read_tag(&mut self) -> Result<(u32, WireType)> {
        let offset = self.pos;
        let tag = self.read_varint()?;
        let wire_type = WireType::try_from((tag & 0x07) as u8)
            .ok()
            .filter(|wt| wt.is_supported())
            .ok_or_else(|| {
                Error::decoding(offset, format!("invalid wire type: {}", tag & 0x07))
            })?;
        let field_number = tag >> 3;

        if field_number == 0 || field_number > MAX_EXPECTED_FIELD {
            trace!(
                "Unexpected field number {} at offset {}",
                field_number,
                offset
            );
        }

        Ok((field_number, wire_type))
    }

    /// Advances past the value of a field with the given wire type
    pub fn skip_field(&mut self, wire_type: WireType) -> Result<()> {
        match wire_type {
            WireType::Varint => {
                self.read_varint64()?;
            }
            WireType::I64 => {
                self.take(8)?;
            }
            WireType::Len => {
                let len = self.read_length(usize::MAX)?;
                self.take(len)?;
            }
            WireType::I32 => {
                self.take(4)?;
            }
            WireType::StartGroup | WireType::EndGroup => {
                return Err(Error::decoding(
                    self.pos,
                    format!("cannot skip field with wire type {}", wire_type as u8),
                ));
            }
        }
        Ok(())
    }
}
