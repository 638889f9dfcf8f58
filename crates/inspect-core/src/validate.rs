//! Semantic validation of items, attachments and hex payloads.
//!
//! The `validate_*` functions never fail: they collect errors and warnings
//! into a [`ValidationReport`]. The `assert_*` wrappers turn a failing report
//! into [`Error::Validation`] and are what the codec calls at its
//! boundaries.
//!
//! Unrecognized but plausible values (an unknown defindex, a large
//! paintseed) are warnings so newer items still decode.

use crate::error::{Error, Result};
use crate::item::{Attachment, AttachmentKind, Item};
use crate::known::{Quality, Rarity};
use std::collections::HashSet;

/// Highest valid attachment slot
pub const MAX_SLOT: u32 = 4;

/// Paint seeds above this are unusual enough to warn about
pub const MAX_EXPECTED_PAINTSEED: u32 = 1000;

/// Attachment lists longer than this are unusual enough to warn about
pub const MAX_EXPECTED_ATTACHMENTS: usize = 5;

/// Rotations beyond this many degrees are unusual enough to warn about
pub const MAX_EXPECTED_ROTATION: f32 = 360.0;

/// Shortest accepted hex payload in characters
pub const MIN_HEX_LENGTH: usize = 16;

/// Longest accepted hex payload in characters
pub const MAX_HEX_LENGTH: usize = 2000;

/// Outcome of a validation pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// False once any error has been recorded
    pub valid: bool,
    /// Problems that make the record unacceptable
    pub errors: Vec<String>,
    /// Unusual but acceptable values
    pub warnings: Vec<String>,
}

impl Default for ValidationReport {
    fn default() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
            warnings: Vec::new(),
        }
    }
}

impl ValidationReport {
    /// Creates an empty, passing report
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an error
    pub fn error(&mut self, msg: impl Into<String>) {
        self.valid = false;
        self.errors.push(msg.into());
    }

    /// Records a warning
    pub fn warn(&mut self, msg: impl Into<String>) {
        self.warnings.push(msg.into());
    }

    /// Folds another report into this one, prefixing its messages
    pub fn merge(&mut self, prefix: &str, other: ValidationReport) {
        for e in other.errors {
            self.error(format!("{}{}", prefix, e));
        }
        for w in other.warnings {
            self.warn(format!("{}{}", prefix, w));
        }
    }

    /// Converts a failing report into [`Error::Validation`]
    pub fn into_result(self) -> Result<Self> {
        if self.valid {
            Ok(self)
        } else {
            Err(Error::Validation {
                errors: self.errors,
            })
        }
    }
}

fn check_unit_float(report: &mut ValidationReport, name: &str, value: f32) {
    if !value.is_finite() {
        report.error(format!("{} must be a finite number, got {}", name, value));
    } else if !(0.0..=1.0).contains(&value) {
        report.error(format!("{} must be between 0 and 1, got {}", name, value));
    }
}

fn check_finite(report: &mut ValidationReport, name: &str, value: Option<f32>) {
    if let Some(value) = value {
        if !value.is_finite() {
            report.error(format!("{} must be a finite number, got {}", name, value));
        }
    }
}

/// Validates a single attachment
pub fn validate_attachment(attachment: &Attachment) -> ValidationReport {
    let mut report = ValidationReport::new();

    if attachment.slot > MAX_SLOT {
        report.error(format!(
            "slot must be between 0 and {}, got {}",
            MAX_SLOT, attachment.slot
        ));
    }
    if let Some(wear) = attachment.wear {
        check_unit_float(&mut report, "wear", wear);
    }
    if let Some(scale) = attachment.scale {
        if !scale.is_finite() || scale <= 0.0 {
            report.error(format!("scale must be a positive number, got {}", scale));
        }
    }
    if let Some(rotation) = attachment.rotation {
        if !rotation.is_finite() {
            report.error(format!("rotation must be a finite number, got {}", rotation));
        } else if rotation.abs() > MAX_EXPECTED_ROTATION {
            report.warn(format!("rotation of {} degrees exceeds a full turn", rotation));
        }
    }
    check_finite(&mut report, "offset_x", attachment.offset_x);
    check_finite(&mut report, "offset_y", attachment.offset_y);
    check_finite(&mut report, "offset_z", attachment.offset_z);

    report
}

/// Validates one of an item's attachment lists
pub fn validate_attachments(kind: AttachmentKind, attachments: &[Attachment]) -> ValidationReport {
    let mut report = ValidationReport::new();

    if attachments.len() > MAX_EXPECTED_ATTACHMENTS {
        report.warn(format!(
            "{} has {} entries, more than the usual {}",
            kind,
            attachments.len(),
            MAX_EXPECTED_ATTACHMENTS
        ));
    }

    let mut seen = HashSet::new();
    for (i, attachment) in attachments.iter().enumerate() {
        report.merge(&format!("{}[{}]: ", kind, i), validate_attachment(attachment));
        if !seen.insert(attachment.slot) {
            report.warn(format!(
                "{}[{}]: duplicate slot {}",
                kind, i, attachment.slot
            ));
        }
    }

    report
}

/// Validates an item's required and optional fields
pub fn validate_item(item: &Item, max_custom_name_length: usize) -> ValidationReport {
    let mut report = ValidationReport::new();

    check_unit_float(&mut report, "paintwear", item.paintwear);

    if !item.weapon().is_known() {
        report.warn(format!("unrecognized defindex {}", item.defindex));
    }
    if item.paintseed > MAX_EXPECTED_PAINTSEED {
        report.warn(format!(
            "paintseed {} is above the usual maximum of {}",
            item.paintseed, MAX_EXPECTED_PAINTSEED
        ));
    }
    if let Some(rarity) = item.rarity {
        if !Rarity::from_u32(rarity).is_known() {
            report.warn(format!("unrecognized rarity {}", rarity));
        }
    }
    if let Some(quality) = item.quality {
        if !Quality::from_u32(quality).is_known() {
            report.warn(format!("unrecognized quality {}", quality));
        }
    }
    if let Some(name) = &item.customname {
        let len = name.chars().count();
        if len > max_custom_name_length {
            report.error(format!(
                "customname has {} characters, maximum is {}",
                len, max_custom_name_length
            ));
        } else if name.trim().is_empty() {
            report.warn("customname is blank");
        }
    }

    for kind in [
        AttachmentKind::Sticker,
        AttachmentKind::Keychain,
        AttachmentKind::Variation,
    ] {
        report.merge("", validate_attachments(kind, item.attachments(kind)));
    }

    report
}

/// Validates the hex data of a masked link
pub fn validate_hex_data(hex_data: &str) -> ValidationReport {
    let mut report = ValidationReport::new();

    if hex_data.is_empty() {
        report.error("hex data cannot be empty");
        return report;
    }
    if let Some((pos, c)) = hex_data
        .char_indices()
        .find(|(_, c)| !c.is_ascii_hexdigit())
    {
        report.error(format!("invalid hex character {:?} at position {}", c, pos));
    }
    if hex_data.len() % 2 != 0 {
        report.error(format!("hex data has odd length {}", hex_data.len()));
    }
    if hex_data.len() < MIN_HEX_LENGTH {
        report.error(format!(
            "hex data of {} characters is shorter than the minimum of {}",
            hex_data.len(),
            MIN_HEX_LENGTH
        ));
    } else if hex_data.len() > MAX_HEX_LENGTH {
        report.error(format!(
            "hex data of {} characters exceeds the maximum of {}",
            hex_data.len(),
            MAX_HEX_LENGTH
        ));
    }

    report
}

/// Validates an item, failing with [`Error::Validation`] on any error
pub fn assert_valid_item(item: &Item, max_custom_name_length: usize) -> Result<ValidationReport> {
    validate_item(item, max_custom_name_length).into_result()
}

/// Validates hex data, failing with [`Error::Validation`] on any error
pub fn assert_valid_hex(hex_data: &str) -> Result<()> {
    validate_hex_data(hex_data).into_result().map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use pretty_assertions::assert_eq;

    fn item() -> Item {
        Item::new(7, 44, 661, 0.15)
    }

    #[test]
    fn test_valid_item() {
        let report = validate_item(&item(), 100);
        assert!(report.valid);
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_paintwear_bounds() {
        for wear in [0.0, 1.0] {
            assert!(validate_item(&Item::new(7, 44, 661, wear), 100).valid);
        }
        for wear in [1.5, -0.01, f32::NAN, f32::INFINITY] {
            let report = validate_item(&Item::new(7, 44, 661, wear), 100);
            assert!(!report.valid, "paintwear {} accepted", wear);
        }
    }

    #[test]
    fn test_unknown_values_are_warnings() {
        let mut item = item();
        item.defindex = 99_999;
        item.paintseed = 5000;
        item.rarity = Some(42);
        item.quality = Some(11);

        let report = validate_item(&item, 100);
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 4);
        assert!(report.warnings[0].contains("defindex 99999"));
    }

    #[test]
    fn test_customname_length() {
        let mut item = item();
        item.customname = Some("★".repeat(100));
        assert!(validate_item(&item, 100).valid);

        item.customname = Some("★".repeat(101));
        let report = validate_item(&item, 100);
        assert_eq!(
            report.errors,
            vec!["customname has 101 characters, maximum is 100".to_string()]
        );
    }

    #[test]
    fn test_attachment_slot_bounds() {
        assert!(validate_attachment(&Attachment::new(4, 1)).valid);
        assert!(!validate_attachment(&Attachment::new(5, 1)).valid);
    }

    #[test]
    fn test_attachment_floats() {
        assert!(!validate_attachment(&Attachment::new(0, 1).with_wear(1.5)).valid);
        assert!(!validate_attachment(&Attachment::new(0, 1).with_scale(0.0)).valid);
        assert!(!validate_attachment(&Attachment::new(0, 1).with_scale(-1.0)).valid);
        assert!(!validate_attachment(&Attachment::new(0, 1).with_rotation(f32::NAN)).valid);

        let report = validate_attachment(&Attachment::new(0, 1).with_rotation(720.0));
        assert!(report.valid);
        assert_eq!(report.warnings.len(), 1);

        let offset = Attachment {
            offset_y: Some(f32::INFINITY),
            ..Attachment::new(0, 1)
        };
        assert!(!validate_attachment(&offset).valid);
    }

    #[test]
    fn test_duplicate_slots_warn() {
        let stickers = vec![Attachment::new(1, 10), Attachment::new(1, 11)];
        let report = validate_attachments(AttachmentKind::Sticker, &stickers);
        assert!(report.valid);
        assert_eq!(report.warnings, vec!["stickers[1]: duplicate slot 1".to_string()]);
    }

    #[test]
    fn test_item_reports_nested_errors() {
        let mut item = item();
        item.keychains.push(Attachment::new(9, 1));
        let report = validate_item(&item, 100);
        assert!(!report.valid);
        assert!(report.errors[0].starts_with("keychains[0]: slot"));
    }

    #[test]
    fn test_hex_data() {
        assert!(validate_hex_data("001807202C389AB3E6F003409505AD253230").valid);
        assert!(validate_hex_data("001807202c389ab3").valid);
        assert!(!validate_hex_data("").valid);
        assert!(!validate_hex_data("0018").valid);
        assert!(!validate_hex_data("001807202C389AB3E").valid);
        assert!(!validate_hex_data("001807202C389AB3GG").valid);
        assert!(!validate_hex_data(&"A".repeat(2002)).valid);
        assert!(validate_hex_data(&"A".repeat(2000)).valid);
    }

    #[test]
    fn test_asserts() {
        assert!(assert_valid_item(&item(), 100).is_ok());
        let err = assert_valid_item(&Item::new(7, 44, 661, 1.5), 100).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert!(err.to_string().contains("paintwear"));

        assert!(assert_valid_hex("001807202C389AB3").is_ok());
        assert_eq!(
            assert_valid_hex("XYZ").unwrap_err().kind(),
            ErrorKind::Validation
        );
    }
}
