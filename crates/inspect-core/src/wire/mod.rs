//! Low-level protobuf-style wire primitives.
//!
//! This module implements the subset of the protobuf wire format used by
//! inspect link payloads: bounded readers and growable writers for varints,
//! zigzag signed integers, little-endian floats and length-delimited data.
//!
//! ## Wire Format Overview
//!
//! Each field is encoded as:
//! - A varint "tag" containing the field number and wire type
//! - The field data (format depends on wire type)
//!
//! Wire types:
//! - 0: VARINT (uint32, uint64, sint32, and the bit pattern of `paintwear`)
//! - 1: I64 (never produced here, skipped when read)
//! - 2: LEN (strings, nested attachment messages)
//! - 5: I32 (attachment floats)

mod reader;
mod writer;

use crate::error::{Error, Result};

pub use reader::WireReader;
pub use writer::{WireWriter, DEFAULT_CAPACITY};

/// Protobuf wire types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum WireType {
    /// Variable-length integer
    Varint = 0,
    /// 64-bit fixed-width
    I64 = 1,
    /// Length-delimited (strings, bytes, embedded messages)
    Len = 2,
    /// Start group (deprecated)
    StartGroup = 3,
    /// End group (deprecated)
    EndGroup = 4,
    /// 32-bit fixed-width
    I32 = 5,
}

impl WireType {
    /// Returns true for the wire types accepted when reading a payload
    pub fn is_supported(self) -> bool {
        !matches!(self, WireType::StartGroup | WireType::EndGroup)
    }
}

impl TryFrom<u8> for WireType {
    type Error = Error;

    fn try_from(value: u8) -> Result<Self> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::I64),
            2 => Ok(WireType::Len),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::I32),
            _ => Err(Error::decoding(0, format!("unknown wire type: {}", value))),
        }
    }
}

/// Maximum valid field number (2^29 - 1)
pub const MAX_FIELD_NUMBER: u32 = 536_870_911;

/// Largest buffer a [`WireReader`] accepts (10 MiB)
pub const MAX_BUFFER_SIZE: usize = 10 * 1024 * 1024;

/// Maximum length of a length-delimited byte field
pub const MAX_BYTES_LENGTH: usize = 1024;

/// Field numbers above this are tolerated but logged as unexpected
pub const MAX_EXPECTED_FIELD: u32 = 50;

/// Widest UTF-8 encoding of a single character
pub const MAX_UTF8_CHAR_BYTES: usize = 4;

/// Bytes needed to store a u32 as a varint
pub const MAX_VARINT32_BYTES: usize = 5;

/// Bytes needed to store a u64 as a varint
pub const MAX_VARINT64_BYTES: usize = 10;

/// ZigZag-encode a signed 32-bit value
#[inline]
pub fn zigzag_encode(value: i32) -> u32 {
    ((value << 1) ^ (value >> 31)) as u32
}

/// ZigZag-decode a signed 32-bit value
#[inline]
pub fn zigzag_decode(value: u32) -> i32 {
    ((value >> 1) as i32) ^ -((value & 1) as i32)
}
