//! Error types for the inspect-core library.
//!
//! Every fallible operation returns [`Error`], a single `thiserror` enum whose
//! variants carry enough context (byte offsets, field numbers, lengths) to
//! diagnose malformed input without re-parsing it. [`Error::kind`] collapses
//! the variants into the coarse categories callers usually branch on.

use thiserror::Error;

/// Result type alias for inspect operations
pub type Result<T> = std::result::Result<T, Error>;

/// Coarse classification of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// An invariant was violated while writing wire data
    Encoding,
    /// Wire data was malformed, truncated or over-length
    Decoding,
    /// A record was structurally fine but semantically out of range
    Validation,
    /// Text did not match any recognized inspect link grammar
    InvalidUrl,
    /// An injected resolver failed to resolve an unmasked link
    Resolution,
}

/// Comprehensive error type for all inspect operations
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Invariant violated while encoding
    #[error("encoding failed: {details}")]
    Encoding {
        /// Description of the violated invariant
        details: String,
    },

    /// Malformed wire input
    #[error("invalid wire data at offset {offset}: {details}")]
    Decoding {
        /// Byte offset where the error occurred
        offset: usize,
        /// Detailed description of the issue
        details: String,
    },

    /// A read needed more bytes than the buffer holds
    #[error("truncated input at offset {offset}: need {needed} bytes, have {available}")]
    Truncated {
        /// Byte offset where the read started
        offset: usize,
        /// Bytes the read required
        needed: usize,
        /// Bytes left in the buffer
        available: usize,
    },

    /// A length prefix exceeded its configured cap
    #[error("length {length} at offset {offset} exceeds maximum of {max}")]
    LengthLimit {
        /// Byte offset of the length prefix
        offset: usize,
        /// Declared length
        length: u64,
        /// Maximum accepted length
        max: usize,
    },

    /// Failure while decoding a specific field of a message
    #[error("failed to decode field {field} ({name}) after {fields_decoded} fields: {source}")]
    Field {
        /// Field number being decoded
        field: u32,
        /// Schema name of the field, or `unknown`
        name: &'static str,
        /// Number of fields successfully decoded before this one
        fields_decoded: usize,
        /// Underlying primitive error
        #[source]
        source: Box<Error>,
    },

    /// Stored checksum did not match the recomputed one
    #[error("checksum mismatch: expected {expected:08X}, found {found:08X}")]
    ChecksumMismatch {
        /// Checksum computed over the payload
        expected: u32,
        /// Checksum stored in the link
        found: u32,
    },

    /// Record failed semantic validation
    #[error("validation failed: {}", errors.join("; "))]
    Validation {
        /// All validation errors collected for the record
        errors: Vec<String>,
    },

    /// Text is not a recognized inspect link
    #[error("invalid inspect link '{input}': {reason}")]
    InvalidUrl {
        /// The offending input, truncated for display
        input: String,
        /// Why it was rejected
        reason: String,
    },

    /// An injected resolver could not resolve an unmasked link
    #[error("resolution failed: {0}")]
    Resolution(String),
}

/// Longest input echoed back inside an [`Error::InvalidUrl`]
const MAX_ECHOED_INPUT: usize = 120;

impl Error {
    /// Creates a new encoding error
    pub fn encoding(details: impl Into<String>) -> Self {
        Self::Encoding {
            details: details.into(),
        }
    }

    /// Creates a new decoding error
    pub fn decoding(offset: usize, details: impl Into<String>) -> Self {
        Self::Decoding {
            offset,
            details: details.into(),
        }
    }

    /// Creates a new truncation error
    pub fn truncated(offset: usize, needed: usize, available: usize) -> Self {
        Self::Truncated {
            offset,
            needed,
            available,
        }
    }

    /// Creates a new invalid link error
    pub fn invalid_url(input: &str, reason: impl Into<String>) -> Self {
        let input = match input.char_indices().nth(MAX_ECHOED_INPUT) {
            Some((idx, _)) => format!("{}...", &input[..idx]),
            None => input.to_string(),
        };
        Self::InvalidUrl {
            input,
            reason: reason.into(),
        }
    }

    /// Creates a new resolution error
    pub fn resolution(msg: impl Into<String>) -> Self {
        Self::Resolution(msg.into())
    }

    /// Wraps a primitive error with the field it occurred in
    pub fn in_field(self, field: u32, name: &'static str, fields_decoded: usize) -> Self {
        Self::Field {
            field,
            name,
            fields_decoded,
            source: Box::new(self),
        }
    }

    /// Returns the coarse category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Encoding { .. } => ErrorKind::Encoding,
            Self::Decoding { .. }
            | Self::Truncated { .. }
            | Self::LengthLimit { .. }
            | Self::Field { .. }
            | Self::ChecksumMismatch { .. } => ErrorKind::Decoding,
            Self::Validation { .. } => ErrorKind::Validation,
            Self::InvalidUrl { .. } => ErrorKind::InvalidUrl,
            Self::Resolution(_) => ErrorKind::Resolution,
        }
    }
}
