//! High-level encode/decode entry points.
//!
//! [`InspectCodec`] ties the pieces together:
//!
//! ```text
//! encode: Item -> validate -> item codec -> frame + CRC -> hex -> link
//! decode: link -> analyze -> unframe -> item codec -> validate -> Item
//! ```
//!
//! Each call builds its own reader or writer, so one codec can be shared
//! freely between threads.

use crate::error::{Error, Result};
use crate::item::{decode_item, encode_item, Item};
use crate::resolver::Resolver;
use crate::url::{self, AnalyzedUrl, Payload};
use crate::validate::{assert_valid_item, MAX_HEX_LENGTH};
use tracing::debug;

/// Configuration for the codec
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodecConfig {
    /// Validate items before encoding and after decoding
    pub validate_input: bool,
    /// Maximum custom name length in characters
    pub max_custom_name_length: u32,
    /// Maximum accepted link length in bytes
    pub max_url_length: u32,
    /// Recompute and compare the checksum of masked links
    pub verify_checksum: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            validate_input: true,
            max_custom_name_length: 100,
            max_url_length: 2048,
            verify_checksum: false,
        }
    }
}

impl CodecConfig {
    /// Creates a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether items are validated
    pub fn validate_input(mut self, validate: bool) -> Self {
        self.validate_input = validate;
        self
    }

    /// Sets the maximum custom name length
    pub fn max_custom_name_length(mut self, max: u32) -> Self {
        self.max_custom_name_length = max;
        self
    }

    /// Sets the maximum link length
    pub fn max_url_length(mut self, max: u32) -> Self {
        self.max_url_length = max;
        self
    }

    /// Sets whether checksums are verified on decode
    pub fn verify_checksum(mut self, verify: bool) -> Self {
        self.verify_checksum = verify;
        self
    }

    fn max_name_chars(&self) -> usize {
        self.max_custom_name_length as usize
    }
}

/// Encoder and decoder for inspect links
#[derive(Debug, Clone, Default)]
pub struct InspectCodec {
    config: CodecConfig,
}

impl InspectCodec {
    /// Creates a codec with default configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a codec with custom configuration
    pub fn with_config(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    fn check(&self, item: &Item) -> Result<()> {
        if self.config.validate_input {
            let report = assert_valid_item(item, self.config.max_name_chars())?;
            for warning in &report.warnings {
                debug!("Validation warning: {}", warning);
            }
        }
        Ok(())
    }

    /// Encodes an item into its raw wire payload
    pub fn encode_bytes(&self, item: &Item) -> Result<Vec<u8>> {
        self.check(item)?;
        encode_item(item, self.config.max_name_chars())
    }

    /// Decodes an item from its raw wire payload
    pub fn decode_bytes(&self, data: &[u8]) -> Result<Item> {
        let item = decode_item(data, self.config.max_name_chars())?;
        self.check(&item)?;
        Ok(item)
    }

    /// Encodes an item into a canonical masked link
    ///
    /// Fails with [`Error::Encoding`] when the link would be longer than this
    /// codec accepts on decode.
    pub fn encode_url(&self, item: &Item) -> Result<String> {
        let payload = self.encode_bytes(item)?;
        let link = url::masked_url(&payload);

        let hex_len = link.len() - url::INSPECT_URL_PREFIX.len();
        if hex_len > MAX_HEX_LENGTH {
            return Err(Error::encoding(format!(
                "hex data of {} characters exceeds maximum of {}",
                hex_len, MAX_HEX_LENGTH
            )));
        }
        let max_url_length = self.config.max_url_length as usize;
        if link.len() > max_url_length {
            return Err(Error::encoding(format!(
                "link of {} bytes exceeds maximum of {}",
                link.len(),
                max_url_length
            )));
        }
        Ok(link)
    }

    /// Classifies a link in any accepted form
    pub fn analyze(&self, input: &str) -> Result<AnalyzedUrl> {
        url::analyze(input, self.config.max_url_length as usize)
    }

    /// Decodes a masked link
    ///
    /// Unmasked links fail with [`Error::InvalidUrl`]; use
    /// [`InspectCodec::inspect`] with a resolver for those.
    pub fn decode_url(&self, input: &str) -> Result<Item> {
        let analyzed = self.analyze(input)?;
        self.decode_analyzed(&analyzed)
    }

    /// Decodes an already analyzed masked link
    pub fn decode_analyzed(&self, analyzed: &AnalyzedUrl) -> Result<Item> {
        match analyzed.payload() {
            Payload::Masked { hex_data } => {
                let payload = url::unframe(hex_data, self.config.verify_checksum)?;
                self.decode_bytes(&payload)
            }
            Payload::Unmasked(_) => Err(Error::invalid_url(
                analyzed.original(),
                "unmasked links must be resolved by a game-service session",
            )),
        }
    }

    /// Decodes masked links locally and hands unmasked ones to `resolver`
    pub fn inspect(&self, input: &str, resolver: &dyn Resolver) -> Result<Item> {
        let analyzed = self.analyze(input)?;
        match analyzed.payload() {
            Payload::Masked { .. } => self.decode_analyzed(&analyzed),
            Payload::Unmasked(_) => {
                let item = resolver.resolve(&analyzed)?;
                self.check(&item)?;
                Ok(item)
            }
        }
    }
}
