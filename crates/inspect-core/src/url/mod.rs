//! Inspect link parsing, normalization and rendering.
//!
//! An inspect link carries one of two payloads after the
//! `csgo_econ_action_preview` command:
//!
//! - **masked**: hex of a checksum-framed item payload, decoded locally
//! - **unmasked**: `S<owner>A<asset>D<class>` or `M<market>A<asset>D<class>`,
//!   which only a live game-service session can resolve
//!
//! Input may be a full `steam://` link, the bare command (optionally
//! `+`-prefixed) or the payload alone, with `%20` or a space as the
//! separator. [`analyze`] accepts all of them and produces an
//! [`AnalyzedUrl`] whose `normalized` form is the canonical quoted link.

mod checksum;

use crate::error::{Error, Result};
use crate::validate::assert_valid_hex;
use std::fmt;
use tracing::debug;

pub use checksum::{checksum, frame, unframe, CHECKSUM_LEN, FRAME_PREFIX};

/// Steam URI preceding the preview command
pub const STEAM_URI_PREFIX: &str = "steam://rungame/730/76561202255233023/+";

/// The preview command name
pub const PREVIEW_COMMAND: &str = "csgo_econ_action_preview";

/// Canonical prefix of every masked link
pub const INSPECT_URL_PREFIX: &str =
    "steam://rungame/730/76561202255233023/+csgo_econ_action_preview%20";

/// Scheme and app path every full link starts with
const STEAM_APP_PREFIX: &str = "steam://rungame/730/";

/// Longest accepted numeric id in an unmasked payload
pub const MAX_ID_DIGITS: usize = 20;

/// Whether a link embeds its item or only references it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlKind {
    /// Self-contained hex payload
    Masked,
    /// Owner or market reference that must be resolved remotely
    Unmasked,
}

impl fmt::Display for UrlKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UrlKind::Masked => f.write_str("masked"),
            UrlKind::Unmasked => f.write_str("unmasked"),
        }
    }
}

/// Who holds the item an unmasked link refers to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Holder {
    /// A Steam account id (`S` form)
    Owner(String),
    /// A market listing id (`M` form)
    Market(String),
}

/// The reference carried by an unmasked link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnmaskedRef {
    /// Owner or market listing
    pub holder: Holder,
    /// Asset id (`A` group)
    pub asset_id: String,
    /// Class id (`D` group)
    pub class_id: String,
}

impl fmt::Display for UnmaskedRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (letter, id) = match &self.holder {
            Holder::Owner(id) => ('S', id),
            Holder::Market(id) => ('M', id),
        };
        write!(f, "{}{}A{}D{}", letter, id, self.asset_id, self.class_id)
    }
}

/// The payload of an analyzed link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Payload {
    /// Uppercase framed hex, prefix and checksum included
    Masked {
        /// The hex characters after the command
        hex_data: String,
    },
    /// External reference
    Unmasked(UnmaskedRef),
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Payload::Masked { hex_data } => f.write_str(hex_data),
            Payload::Unmasked(reference) => reference.fmt(f),
        }
    }
}

/// Rendering options for [`AnalyzedUrl::format`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UrlFormat {
    /// Separate command and payload with `%20` instead of a space
    pub quoted: bool,
    /// Include the `steam://` URI before the command
    pub include_prefix: bool,
}

impl Default for UrlFormat {
    fn default() -> Self {
        Self {
            quoted: true,
            include_prefix: true,
        }
    }
}

impl UrlFormat {
    /// Creates the canonical format: quoted with the full prefix
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether the separator is `%20`
    pub fn quoted(mut self, quoted: bool) -> Self {
        self.quoted = quoted;
        self
    }

    /// Sets whether the `steam://` URI is included
    pub fn include_prefix(mut self, include: bool) -> Self {
        self.include_prefix = include;
        self
    }

    /// Renders a payload in this format
    pub fn render(&self, payload: &str) -> String {
        let prefix = if self.include_prefix { STEAM_URI_PREFIX } else { "" };
        let sep = if self.quoted { "%20" } else { " " };
        format!("{}{}{}{}", prefix, PREVIEW_COMMAND, sep, payload)
    }
}

/// A classified inspect link
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyzedUrl {
    original: String,
    normalized: String,
    quoted: bool,
    payload: Payload,
}

impl AnalyzedUrl {
    /// The text as supplied
    pub fn original(&self) -> &str {
        &self.original
    }

    /// The canonical quoted link
    pub fn normalized(&self) -> &str {
        &self.normalized
    }

    /// True if the input separated command and payload with `%20`
    pub fn is_quoted(&self) -> bool {
        self.quoted
    }

    /// Masked or unmasked
    pub fn kind(&self) -> UrlKind {
        match self.payload {
            Payload::Masked { .. } => UrlKind::Masked,
            Payload::Unmasked(_) => UrlKind::Unmasked,
        }
    }

    /// The parsed payload
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Hex data of a masked link
    pub fn hex_data(&self) -> Option<&str> {
        match &self.payload {
            Payload::Masked { hex_data } => Some(hex_data.as_str()),
            Payload::Unmasked(_) => None,
        }
    }

    /// Reference of an unmasked link
    pub fn unmasked(&self) -> Option<&UnmaskedRef> {
        match &self.payload {
            Payload::Unmasked(reference) => Some(reference),
            Payload::Masked { .. } => None,
        }
    }

    /// Market listing id, for `M` links
    pub fn market_id(&self) -> Option<&str> {
        match self.unmasked()?.holder {
            Holder::Market(ref id) => Some(id.as_str()),
            Holder::Owner(_) => None,
        }
    }

    /// Owner account id, for `S` links
    pub fn owner_id(&self) -> Option<&str> {
        match self.unmasked()?.holder {
            Holder::Owner(ref id) => Some(id.as_str()),
            Holder::Market(_) => None,
        }
    }

    /// Asset id, for unmasked links
    pub fn asset_id(&self) -> Option<&str> {
        self.unmasked().map(|r| r.asset_id.as_str())
    }

    /// Class id, for unmasked links
    pub fn class_id(&self) -> Option<&str> {
        self.unmasked().map(|r| r.class_id.as_str())
    }

    /// Re-renders the link
    pub fn format(&self, format: UrlFormat) -> String {
        format.render(&self.payload.to_string())
    }

    /// Appends the payload to a caller-chosen prefix
    pub fn with_prefix(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.payload)
    }
}

impl fmt::Display for AnalyzedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.normalized)
    }
}

/// Builds the canonical masked link for an encoded item payload
pub fn masked_url(payload: &[u8]) -> String {
    format!("{}{}", INSPECT_URL_PREFIX, hex::encode_upper(frame(payload)))
}

/// Splits off the separator after the command, returning (quoted, payload)
fn split_separator<'a>(input: &str, rest: &'a str) -> Result<(bool, &'a str)> {
    if let Some(payload) = rest.strip_prefix("%20") {
        Ok((true, payload))
    } else if let Some(payload) = rest.strip_prefix(' ') {
        Ok((false, payload))
    } else {
        Err(Error::invalid_url(
            input,
            "expected '%20' or a space after the preview command",
        ))
    }
}

/// Locates the payload text inside any accepted input form
fn locate_payload(input: &str) -> Result<(bool, &str)> {
    if let Some(rest) = input.strip_prefix(STEAM_APP_PREFIX) {
        let Some(idx) = rest.find(PREVIEW_COMMAND) else {
            return Err(Error::invalid_url(input, "missing csgo_econ_action_preview command"));
        };
        return split_separator(input, &rest[idx + PREVIEW_COMMAND.len()..]);
    }
    if input.starts_with("steam://") {
        return Err(Error::invalid_url(input, "not a CS2 inspect link"));
    }

    let command = input.strip_prefix('+').unwrap_or(input);
    if let Some(rest) = command.strip_prefix(PREVIEW_COMMAND) {
        return split_separator(input, rest);
    }

    Ok((true, input))
}

fn parse_id<'a>(input: &str, group: &str, digits: &'a str) -> Result<&'a str> {
    if digits.is_empty() {
        return Err(Error::invalid_url(input, format!("{} id is empty", group)));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::invalid_url(
            input,
            format!("{} id '{}' is not numeric", group, digits),
        ));
    }
    if digits.len() > MAX_ID_DIGITS {
        return Err(Error::invalid_url(
            input,
            format!("{} id has more than {} digits", group, MAX_ID_DIGITS),
        ));
    }
    Ok(digits)
}

/// Parses `[SM]<digits>A<digits>D<digits>`
fn parse_unmasked(input: &str, payload: &str) -> Result<UnmaskedRef> {
    let (letter, rest) = payload.split_at(1);
    let Some((id, rest)) = rest.split_once('A') else {
        return Err(Error::invalid_url(input, "unmasked payload is missing the 'A' group"));
    };
    let Some((asset_id, class_id)) = rest.split_once('D') else {
        return Err(Error::invalid_url(input, "unmasked payload is missing the 'D' group"));
    };

    let id = parse_id(input, "holder", id)?.to_string();
    let holder = if letter == "M" {
        Holder::Market(id)
    } else {
        Holder::Owner(id)
    };

    Ok(UnmaskedRef {
        holder,
        asset_id: parse_id(input, "asset", asset_id)?.to_string(),
        class_id: parse_id(input, "class", class_id)?.to_string(),
    })
}

/// Classifies an inspect link in any accepted form
///
/// Inputs longer than `max_length` bytes are rejected before parsing.
pub fn analyze(input: &str, max_length: usize) -> Result<AnalyzedUrl> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_url(input, "input is empty"));
    }
    if trimmed.len() > max_length {
        return Err(Error::invalid_url(
            input,
            format!("length {} exceeds maximum of {}", trimmed.len(), max_length),
        ));
    }

    let (quoted, text) = locate_payload(trimmed)?;
    let text = text.trim();

    let payload = if text.starts_with('S') || text.starts_with('M') {
        Payload::Unmasked(parse_unmasked(input, text)?)
    } else if !text.is_empty() && text.bytes().all(|b| b.is_ascii_hexdigit()) {
        assert_valid_hex(text).map_err(|e| match e {
            Error::Validation { errors } => Error::invalid_url(input, errors.join("; ")),
            other => other,
        })?;
        Payload::Masked {
            hex_data: text.to_ascii_uppercase(),
        }
    } else {
        return Err(Error::invalid_url(
            input,
            "payload is neither hex data nor an S/M reference",
        ));
    };

    let normalized = UrlFormat::default().render(&payload.to_string());
    let analyzed = AnalyzedUrl {
        original: input.to_string(),
        normalized,
        quoted,
        payload,
    };
    debug!("Analyzed {} link ({} bytes)", analyzed.kind(), input.len());
    Ok(analyzed)
}

/// Returns the canonical quoted form of any accepted link
pub fn normalize(input: &str, max_length: usize) -> Result<String> {
    analyze(input, max_length).map(|a| a.normalized)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    const MAX: usize = 2048;
    const HEX: &str = "001807202C389AB3E6F003409505AD253230";
    const MARKET: &str = "M123456789A987654321D456789123";

    #[test]
    fn test_masked_url_layout() {
        let payload = [
            0x18, 0x07, 0x20, 0x2C, 0x38, 0x9A, 0xB3, 0xE6, 0xF0, 0x03, 0x40, 0x95, 0x05,
        ];
        assert_eq!(masked_url(&payload), format!("{}{}", INSPECT_URL_PREFIX, HEX));
    }

    #[test]
    fn test_analyze_full_masked_link() {
        let url = format!("{}{}", INSPECT_URL_PREFIX, HEX.to_lowercase());
        let analyzed = analyze(&url, MAX).unwrap();
        assert_eq!(analyzed.kind(), UrlKind::Masked);
        assert_eq!(analyzed.hex_data(), Some(HEX));
        assert!(analyzed.is_quoted());
        assert_eq!(analyzed.original(), url);
        assert_eq!(analyzed.normalized(), format!("{}{}", INSPECT_URL_PREFIX, HEX));
    }

    #[test]
    fn test_analyze_market_link() {
        let url = format!("{}{}", INSPECT_URL_PREFIX, MARKET);
        let analyzed = analyze(&url, MAX).unwrap();
        assert_eq!(analyzed.kind(), UrlKind::Unmasked);
        assert_eq!(analyzed.market_id(), Some("123456789"));
        assert_eq!(analyzed.owner_id(), None);
        assert_eq!(analyzed.asset_id(), Some("987654321"));
        assert_eq!(analyzed.class_id(), Some("456789123"));
        assert_eq!(analyzed.hex_data(), None);
    }

    #[test]
    fn test_analyze_owner_link_with_space() {
        let url = format!(
            "{}{} S76561198084749846A698323590D7935523998312483177",
            STEAM_URI_PREFIX, PREVIEW_COMMAND
        );
        let analyzed = analyze(&url, MAX).unwrap();
        assert!(!analyzed.is_quoted());
        assert_eq!(analyzed.owner_id(), Some("76561198084749846"));
        assert_eq!(analyzed.market_id(), None);
        assert_eq!(analyzed.class_id(), Some("7935523998312483177"));
    }

    #[test]
    fn test_all_input_forms_normalize_alike() {
        let canonical = format!("{}{}", INSPECT_URL_PREFIX, MARKET);
        let forms = [
            canonical.clone(),
            format!("{}{} {}", STEAM_URI_PREFIX, PREVIEW_COMMAND, MARKET),
            format!("+{}%20{}", PREVIEW_COMMAND, MARKET),
            format!("{} {}", PREVIEW_COMMAND, MARKET),
            MARKET.to_string(),
            format!("  {}  ", MARKET),
        ];
        for form in &forms {
            assert_eq!(normalize(form, MAX).unwrap(), canonical, "form {:?}", form);
        }
    }

    #[test]
    fn test_normalize_idempotent() {
        for input in [HEX.to_lowercase(), format!("csgo_econ_action_preview {}", MARKET)] {
            let once = normalize(&input, MAX).unwrap();
            assert_eq!(normalize(&once, MAX).unwrap(), once);
        }
    }

    #[test]
    fn test_format_variants() {
        let analyzed = analyze(MARKET, MAX).unwrap();
        assert_eq!(
            analyzed.format(UrlFormat::new()),
            format!("{}{}", INSPECT_URL_PREFIX, MARKET)
        );
        assert_eq!(
            analyzed.format(UrlFormat::new().quoted(false)),
            format!("{}csgo_econ_action_preview {}", STEAM_URI_PREFIX, MARKET)
        );
        assert_eq!(
            analyzed.format(UrlFormat::new().include_prefix(false)),
            format!("csgo_econ_action_preview%20{}", MARKET)
        );
        assert_eq!(
            analyzed.format(UrlFormat::new().quoted(false).include_prefix(false)),
            format!("csgo_econ_action_preview {}", MARKET)
        );
        assert_eq!(
            analyzed.with_prefix("https://example.test/inspect?link="),
            format!("https://example.test/inspect?link={}", MARKET)
        );
    }

    #[test]
    fn test_rejects_malformed_unmasked() {
        for payload in [
            "M123A456",
            "M123D456A789",
            "MA1D2",
            "M12x3A4D5",
            "S1A2D3x",
            "S123456789012345678901A1D1",
        ] {
            let err = analyze(payload, MAX).unwrap_err();
            assert_eq!(err.kind(), ErrorKind::InvalidUrl, "payload {:?}", payload);
        }
    }

    #[test]
    fn test_rejects_bad_hex() {
        let odd = format!("{}{}", INSPECT_URL_PREFIX, &HEX[..HEX.len() - 1]);
        let err = analyze(&odd, MAX).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidUrl);
        assert!(err.to_string().contains("odd length"));

        let short = format!("{}0018", INSPECT_URL_PREFIX);
        assert_eq!(analyze(&short, MAX).unwrap_err().kind(), ErrorKind::InvalidUrl);

        let bad = format!("{}{}G", INSPECT_URL_PREFIX, &HEX[..HEX.len() - 1]);
        assert_eq!(analyze(&bad, MAX).unwrap_err().kind(), ErrorKind::InvalidUrl);
    }

    #[test]
    fn test_rejects_unrecognized_text() {
        for input in [
            "",
            "   ",
            "hello world",
            "steam://rungame/440/123/+foo%20ABCD",
            "steam://rungame/730/76561202255233023/+csgo_econ_action_previewABCD",
            "csgo_econ_action_preview",
        ] {
            assert_eq!(
                analyze(input, MAX).unwrap_err().kind(),
                ErrorKind::InvalidUrl,
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_rejects_overlong_input() {
        let url = format!("{}{}", INSPECT_URL_PREFIX, HEX);
        assert!(analyze(&url, url.len()).is_ok());
        assert!(analyze(&url, url.len() - 1).is_err());
    }
}
