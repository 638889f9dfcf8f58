//! # inspect-core
//!
//! Encoder and decoder for CS2 inspect links.
//!
//! This crate provides the core functionality for:
//! - Reading and writing the protobuf-style wire format of item payloads
//! - Mapping [`Item`] records to and from that format
//! - Framing payloads with the link checksum and hex encoding
//! - Recognizing masked and unmasked links in every common textual form
//! - Validating items independently of the wire format
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`wire`]: Bounded wire primitives ([`WireReader`], [`WireWriter`])
//! - [`item`]: Item records and their field-table codec
//! - [`url`]: Link grammar, normalization and checksum framing
//! - [`validate`]: Semantic range and shape checks
//! - [`known`]: Closed tables of recognized weapons, rarities and qualities
//! - [`resolver`]: Boundary to the external resolver for unmasked links
//! - [`error`]: Error types and handling
//!
//! ## Example
//!
//! ```
//! use inspect_core::{InspectCodec, Item};
//!
//! let codec = InspectCodec::new();
//! let url = codec.encode_url(&Item::new(7, 44, 661, 0.15))?;
//! assert!(url.starts_with("steam://rungame/730/76561202255233023/+csgo_econ_action_preview%20"));
//!
//! let item = codec.decode_url(&url)?;
//! assert_eq!(item.paintseed, 661);
//! # Ok::<(), inspect_core::Error>(())
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, unreachable_pub)]

pub mod codec;
pub mod error;
pub mod item;
pub mod known;
pub mod resolver;
pub mod url;
pub mod validate;
pub mod wire;

// Re-export primary types for convenience
pub use codec::{CodecConfig, InspectCodec};
pub use error::{Error, ErrorKind, Result};
pub use item::{Attachment, AttachmentKind, Item};
pub use known::{Known, Quality, Rarity, Weapon};
pub use resolver::{Resolver, StaticResolver};
pub use url::{AnalyzedUrl, Holder, Payload, UnmaskedRef, UrlFormat, UrlKind};
pub use validate::ValidationReport;
pub use wire::{WireReader, WireType, WireWriter};

/// Crate version for programmatic access
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Encodes an item into a masked link using the default configuration
pub fn encode(item: &Item) -> Result<String> {
    InspectCodec::new().encode_url(item)
}

/// Decodes a masked link using the default configuration
pub fn decode(url: &str) -> Result<Item> {
    InspectCodec::new().decode_url(url)
}

/// Classifies a link using the default configuration
pub fn analyze(url: &str) -> Result<AnalyzedUrl> {
    InspectCodec::new().analyze(url)
}

/// Returns the canonical form of a link using the default configuration
pub fn normalize(url: &str) -> Result<String> {
    analyze(url).map(|analyzed| analyzed.normalized().to_string())
}
