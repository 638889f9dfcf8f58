//! Checksum framing for masked payloads.
//!
//! A framed payload is `0x00 || payload || checksum`, where the checksum is
//! derived from a reflected CRC-32 over the prefix and payload and stored
//! big-endian.

use crate::error::{Error, Result};

/// Leading byte of every framed payload
pub const FRAME_PREFIX: u8 = 0x00;

/// Size of the trailing checksum in bytes
pub const CHECKSUM_LEN: usize = 4;

/// Computes the link checksum for an encoded item payload
///
/// The CRC covers the prefix byte and the payload; the result is
/// `(crc & 0xFFFF) ^ (payload.len() * crc)` in 32-bit arithmetic.
pub fn checksum(payload: &[u8]) -> u32 {
    let mut hasher = crc32fast::Hasher::new();
    hasher.update(&[FRAME_PREFIX]);
    hasher.update(payload);
    let crc = hasher.finalize();

    (crc & 0xFFFF) ^ (payload.len() as u32).wrapping_mul(crc)
}

/// Wraps a payload with the prefix byte and trailing checksum
pub fn frame(payload: &[u8]) -> Vec<u8> {
    let mut framed = Vec::with_capacity(1 + payload.len() + CHECKSUM_LEN);
    framed.push(FRAME_PREFIX);
    framed.extend_from_slice(payload);
    framed.extend_from_slice(&checksum(payload).to_be_bytes());
    framed
}

/// Extracts the payload bytes from framed hex data
///
/// A leading `00` pair is dropped if present and the trailing 8 hex
/// characters are treated as the checksum. The checksum is only compared
/// when `verify` is set.
pub fn unframe(hex_data: &str, verify: bool) -> Result<Vec<u8>> {
    let upper = hex_data.to_ascii_uppercase();
    let body = upper.strip_prefix("00").unwrap_or(&upper);

    if body.len() < CHECKSUM_LEN * 2 {
        return Err(Error::truncated(0, CHECKSUM_LEN * 2, body.len()));
    }
    let (payload_hex, checksum_hex) = body.split_at(body.len() - CHECKSUM_LEN * 2);

    let payload = hex::decode(payload_hex)
        .map_err(|e| Error::decoding(0, format!("invalid payload hex: {}", e)))?;

    if verify {
        let found = u32::from_str_radix(checksum_hex, 16)
            .map_err(|e| Error::decoding(payload.len(), format!("invalid checksum hex: {}", e)))?;
        let expected = checksum(&payload);
        if found != expected {
            return Err(Error::ChecksumMismatch { expected, found });
        }
    }

    Ok(payload)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const MINIMAL_PAYLOAD: [u8; 13] = [
        0x18, 0x07, 0x20, 0x2C, 0x38, 0x9A, 0xB3, 0xE6, 0xF0, 0x03, 0x40, 0x95, 0x05,
    ];

    #[test]
    fn test_checksum_known_value() {
        // crc32(00 || payload) = 0x34B41684
        assert_eq!(checksum(&MINIMAL_PAYLOAD), 0xAD25_3230);
    }

    #[test]
    fn test_frame_layout() {
        let framed = frame(&MINIMAL_PAYLOAD);
        assert_eq!(
            hex::encode_upper(&framed),
            "001807202C389AB3E6F003409505AD253230"
        );
    }

    #[test]
    fn test_unframe_skips_checksum_by_default() {
        let payload = unframe("001807202c389ab3e6f003409505DEADBEEF", false).unwrap();
        assert_eq!(payload, MINIMAL_PAYLOAD.to_vec());
    }

    #[test]
    fn test_unframe_verifies_when_asked() {
        let good = unframe("001807202C389AB3E6F003409505AD253230", true).unwrap();
        assert_eq!(good, MINIMAL_PAYLOAD.to_vec());

        let err = unframe("001807202C389AB3E6F003409505DEADBEEF", true).unwrap_err();
        assert!(matches!(
            err,
            Error::ChecksumMismatch {
                expected: 0xAD25_3230,
                found: 0xDEAD_BEEF
            }
        ));
    }

    #[test]
    fn test_unframe_without_prefix() {
        let payload = unframe("1807202C389AB3E6F003409505AD253230", true).unwrap();
        assert_eq!(payload, MINIMAL_PAYLOAD.to_vec());
    }

    #[test]
    fn test_unframe_errors() {
        assert_eq!(unframe("00ABCD", false).unwrap_err().kind(), ErrorKind::Decoding);
        assert_eq!(
            unframe("00ZZ07202C389AB3E6F0", false).unwrap_err().kind(),
            ErrorKind::Decoding
        );
    }
}
