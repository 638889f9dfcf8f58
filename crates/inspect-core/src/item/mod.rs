//! Item records and their binary codec.
//!
//! An [`Item`] describes one weapon skin: its definition, paint, wear and
//! seed plus optional metadata and three ordered lists of [`Attachment`]s
//! (stickers, keychains and style variations). [`encode_item`] and
//! [`decode_item`] map it to and from the wire format using a single
//! declarative field table, so both directions always agree on field
//! numbers and wire types.

mod schema;

use crate::known::{Known, Quality, Rarity, Weapon};
use std::fmt;

pub use schema::{
    decode_attachment, decode_item, encode_attachment, encode_item, MAX_ATTACHMENT_FIELDS,
    MAX_ITEM_FIELDS,
};

/// A sticker, keychain or style variation applied to an item
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Attachment {
    /// Position on the item, 0 through 4
    pub slot: u32,
    /// Definition index of the applied sticker or charm
    pub sticker_id: u32,
    /// Scrape level in [0, 1]
    pub wear: Option<f32>,
    /// Scale factor, strictly positive
    pub scale: Option<f32>,
    /// Rotation in degrees
    pub rotation: Option<f32>,
    pub tint_id: Option<u32>,
    pub offset_x: Option<f32>,
    pub offset_y: Option<f32>,
    pub offset_z: Option<f32>,
    pub pattern: Option<u32>,
    pub highlight_reel: Option<u32>,
    pub wrapped_sticker: Option<u32>,
}

impl Attachment {
    /// Creates an attachment with only the required fields set
    pub fn new(slot: u32, sticker_id: u32) -> Self {
        Self {
            slot,
            sticker_id,
            ..Self::default()
        }
    }

    /// Sets the wear
    pub fn with_wear(mut self, wear: f32) -> Self {
        self.wear = Some(wear);
        self
    }

    /// Sets the scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = Some(scale);
        self
    }

    /// Sets the rotation in degrees
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = Some(rotation);
        self
    }
}

/// Which of the three attachment lists an [`Attachment`] belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentKind {
    /// Applied stickers
    Sticker,
    /// Keychain charms
    Keychain,
    /// Style variations
    Variation,
}

impl AttachmentKind {
    /// Name of the list holding this kind
    pub fn list_name(self) -> &'static str {
        match self {
            AttachmentKind::Sticker => "stickers",
            AttachmentKind::Keychain => "keychains",
            AttachmentKind::Variation => "variations",
        }
    }
}

impl fmt::Display for AttachmentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.list_name())
    }
}

/// A decoded or encodable weapon skin
#[derive(Debug, Clone, Default, PartialEq)]
#[allow(missing_docs)]
pub struct Item {
    pub accountid: Option<u32>,
    pub itemid: Option<u64>,
    pub defindex: u32,
    pub paintindex: u32,
    pub rarity: Option<u32>,
    pub quality: Option<u32>,
    /// Float value in [0, 1]
    pub paintwear: f32,
    pub paintseed: u32,
    pub killeaterscoretype: Option<u32>,
    pub killeatervalue: Option<u32>,
    pub customname: Option<String>,
    pub stickers: Vec<Attachment>,
    pub inventory: Option<u32>,
    pub origin: Option<u32>,
    pub questid: Option<u32>,
    pub dropreason: Option<u32>,
    pub musicindex: Option<u32>,
    pub entindex: Option<i32>,
    pub petindex: Option<u32>,
    pub keychains: Vec<Attachment>,
    pub style: Option<u32>,
    pub variations: Vec<Attachment>,
    pub upgrade_level: Option<u32>,
}

impl Item {
    /// Creates an item with the four required fields set
    pub fn new(defindex: u32, paintindex: u32, paintseed: u32, paintwear: f32) -> Self {
        Self {
            defindex,
            paintindex,
            paintseed,
            paintwear,
            ..Self::default()
        }
    }

    /// The weapon named by `defindex`
    pub fn weapon(&self) -> Known<Weapon> {
        Weapon::from_u32(self.defindex)
    }

    /// The rarity tier, if present
    pub fn rarity_kind(&self) -> Option<Known<Rarity>> {
        self.rarity.map(Rarity::from_u32)
    }

    /// The quality tier, if present
    pub fn quality_kind(&self) -> Option<Known<Quality>> {
        self.quality.map(Quality::from_u32)
    }

    /// The attachment list of the given kind
    pub fn attachments(&self, kind: AttachmentKind) -> &[Attachment] {
        match kind {
            AttachmentKind::Sticker => &self.stickers,
            AttachmentKind::Keychain => &self.keychains,
            AttachmentKind::Variation => &self.variations,
        }
    }

    /// Returns true if the kill-eater (StatTrak) counter is present
    pub fn is_stattrak(&self) -> bool {
        self.killeatervalue.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_item_helpers() {
        let mut item = Item::new(507, 38, 661, 0.01);
        item.rarity = Some(6);
        item.quality = Some(3);
        item.stickers.push(Attachment::new(0, 5).with_wear(0.5));

        assert_eq!(item.weapon(), Known::Known(Weapon::Karambit));
        assert_eq!(item.rarity_kind(), Some(Known::Known(Rarity::Covert)));
        assert_eq!(item.quality_kind(), Some(Known::Known(Quality::Unusual)));
        assert_eq!(item.attachments(AttachmentKind::Sticker).len(), 1);
        assert!(item.attachments(AttachmentKind::Keychain).is_empty());
        assert!(!item.is_stattrak());
    }
}
