//! Declarative field tables for items and attachments.
//!
//! Each message is described by a sorted table of `FieldSpec` rows. Encoding
//! walks the table in order, so fields come out in ascending field-number
//! order. Decoding looks the tag up in the same table. Because the field
//! number, wire type and both accessors live in one entry, the two
//! directions cannot drift apart.

use super::{Attachment, Item};
use crate::error::{Error, Result};
use crate::wire::{WireReader, WireType, WireWriter};
use tracing::{debug, trace};

/// Maximum number of fields decoded from a single item message
pub const MAX_ITEM_FIELDS: usize = 100;

/// Maximum number of fields decoded from a single attachment message
pub const MAX_ATTACHMENT_FIELDS: usize = 20;

/// Writes one field's tag and value using the wire type from its table entry
struct FieldSink<'w> {
    writer: &'w mut WireWriter,
    number: u32,
    wire_type: WireType,
}

impl FieldSink<'_> {
    fn tag(&mut self, value_type: WireType) -> Result<()> {
        debug_assert_eq!(
            self.wire_type, value_type,
            "field {} written with the wrong wire type",
            self.number
        );
        self.writer.write_tag(self.number, self.wire_type)
    }

    fn varint(&mut self, value: u32) -> Result<()> {
        self.tag(WireType::Varint)?;
        self.writer.write_varint(value)
    }

    fn varint64(&mut self, value: u64) -> Result<()> {
        self.tag(WireType::Varint)?;
        self.writer.write_varint64(value)
    }

    fn sint32(&mut self, value: i32) -> Result<()> {
        self.tag(WireType::Varint)?;
        self.writer.write_sint32(value)
    }

    fn float(&mut self, value: f32) -> Result<()> {
        self.tag(WireType::I32)?;
        self.writer.write_float(value)
    }

    fn string(&mut self, value: &str) -> Result<()> {
        self.tag(WireType::Len)?;
        self.writer.write_string(value)
    }

    fn message(&mut self, value: &[u8]) -> Result<()> {
        self.tag(WireType::Len)?;
        self.writer.write_length_delimited(value)
    }
}

type EncodeFn<T> = fn(&T, &mut FieldSink<'_>) -> Result<()>;
type DecodeFn<T> = fn(&mut T, &mut WireReader<'_>) -> Result<()>;

/// One row of a message's field table
struct FieldSpec<T: 'static> {
    number: u32,
    name: &'static str,
    wire_type: WireType,
    encode: EncodeFn<T>,
    decode: DecodeFn<T>,
}

macro_rules! required_varint {
    ($number:literal, $field:ident) => {
        FieldSpec {
            number: $number,
            name: stringify!($field),
            wire_type: WireType::Varint,
            encode: |msg, sink| sink.varint(msg.$field),
            decode: |msg, reader| {
                msg.$field = reader.read_varint()?;
                Ok(())
            },
        }
    };
}

macro_rules! varint {
    ($number:literal, $field:ident) => {
        FieldSpec {
            number: $number,
            name: stringify!($field),
            wire_type: WireType::Varint,
            encode: |msg, sink| match msg.$field {
                Some(value) => sink.varint(value),
                None => Ok(()),
            },
            decode: |msg, reader| {
                msg.$field = Some(reader.read_varint()?);
                Ok(())
            },
        }
    };
}

macro_rules! float {
    ($number:literal, $field:ident) => {
        FieldSpec {
            number: $number,
            name: stringify!($field),
            wire_type: WireType::I32,
            encode: |msg, sink| match msg.$field {
                Some(value) => sink.float(value),
                None => Ok(()),
            },
            decode: |msg, reader| {
                msg.$field = Some(reader.read_float()?);
                Ok(())
            },
        }
    };
}

macro_rules! attachments {
    ($number:literal, $field:ident) => {
        FieldSpec {
            number: $number,
            name: stringify!($field),
            wire_type: WireType::Len,
            encode: |msg, sink| {
                for attachment in &msg.$field {
                    sink.message(&encode_attachment(attachment)?)?;
                }
                Ok(())
            },
            decode: |msg, reader| {
                let attachment = decode_attachment(reader.read_bytes()?)?;
                msg.$field.push(attachment);
                Ok(())
            },
        }
    };
}

static ITEM_FIELDS: [FieldSpec<Item>; 23] = [
    varint!(1, accountid),
    FieldSpec {
        number: 2,
        name: "itemid",
        wire_type: WireType::Varint,
        encode: |msg, sink| match msg.itemid {
            Some(value) => sink.varint64(value),
            None => Ok(()),
        },
        decode: |msg, reader| {
            msg.itemid = Some(reader.read_varint64()?);
            Ok(())
        },
    },
    required_varint!(3, defindex),
    required_varint!(4, paintindex),
    varint!(5, rarity),
    varint!(6, quality),
    // The float's big-endian bit pattern as a plain varint, not wire type 5.
    FieldSpec {
        number: 7,
        name: "paintwear",
        wire_type: WireType::Varint,
        encode: |msg, sink| {
            if !msg.paintwear.is_finite() {
                return Err(Error::encoding(format!(
                    "paintwear must be finite, got {}",
                    msg.paintwear
                )));
            }
            sink.varint(msg.paintwear.to_bits())
        },
        decode: |msg, reader| {
            msg.paintwear = f32::from_bits(reader.read_varint()?);
            Ok(())
        },
    },
    required_varint!(8, paintseed),
    varint!(9, killeaterscoretype),
    varint!(10, killeatervalue),
    FieldSpec {
        number: 11,
        name: "customname",
        wire_type: WireType::Len,
        encode: |msg, sink| match &msg.customname {
            Some(name) => sink.string(name),
            None => Ok(()),
        },
        decode: |msg, reader| {
            msg.customname = Some(reader.read_string()?);
            Ok(())
        },
    },
    attachments!(12, stickers),
    varint!(13, inventory),
    varint!(14, origin),
    varint!(15, questid),
    varint!(16, dropreason),
    varint!(17, musicindex),
    FieldSpec {
        number: 18,
        name: "entindex",
        wire_type: WireType::Varint,
        encode: |msg, sink| match msg.entindex {
            Some(value) => sink.sint32(value),
            None => Ok(()),
        },
        decode: |msg, reader| {
            msg.entindex = Some(reader.read_sint32()?);
            Ok(())
        },
    },
    varint!(19, petindex),
    attachments!(20, keychains),
    varint!(21, style),
    attachments!(22, variations),
    varint!(23, upgrade_level),
];

static ATTACHMENT_FIELDS: [FieldSpec<Attachment>; 12] = [
    required_varint!(1, slot),
    required_varint!(2, sticker_id),
    float!(3, wear),
    float!(4, scale),
    float!(5, rotation),
    varint!(6, tint_id),
    float!(7, offset_x),
    float!(8, offset_y),
    float!(9, offset_z),
    varint!(10, pattern),
    varint!(11, highlight_reel),
    varint!(12, wrapped_sticker),
];

fn encode_fields<T>(msg: &T, fields: &[FieldSpec<T>], writer: &mut WireWriter) -> Result<()> {
    for spec in fields {
        let mut sink = FieldSink {
            writer: &mut *writer,
            number: spec.number,
            wire_type: spec.wire_type,
        };
        (spec.encode)(msg, &mut sink).map_err(|e| match e {
            Error::Encoding { details } => {
                Error::encoding(format!("field {} ({}): {}", spec.number, spec.name, details))
            }
            other => other,
        })?;
    }
    Ok(())
}

fn decode_fields<T: Default>(
    reader: &mut WireReader<'_>,
    fields: &[FieldSpec<T>],
    max_fields: usize,
    message: &str,
) -> Result<T> {
    let mut msg = T::default();
    let mut decoded = 0;

    while reader.has_more() {
        if decoded >= max_fields {
            return Err(Error::decoding(
                reader.position(),
                format!(
                    "{} exceeds safety limit of {} fields",
                    message, max_fields
                ),
            ));
        }

        let offset = reader.position();
        let (number, wire_type) = reader.read_tag()?;

        match fields.binary_search_by_key(&number, |spec| spec.number) {
            Ok(idx) => {
                let spec = &fields[idx];
                if spec.wire_type != wire_type {
                    return Err(Error::decoding(
                        offset,
                        format!(
                            "wire type {} does not match expected {}",
                            wire_type as u8, spec.wire_type as u8
                        ),
                    )
                    .in_field(number, spec.name, decoded));
                }
                (spec.decode)(&mut msg, reader)
                    .map_err(|e| e.in_field(number, spec.name, decoded))?;
            }
            Err(_) => {
                trace!(
                    "Skipping unknown {} field {} (wire type {}) at offset {}",
                    message,
                    number,
                    wire_type as u8,
                    offset
                );
                reader
                    .skip_field(wire_type)
                    .map_err(|e| e.in_field(number, "unknown", decoded))?;
            }
        }

        decoded += 1;
    }

    trace!("Decoded {} {} fields", decoded, message);
    Ok(msg)
}

/// Encodes an attachment sub-message
pub fn encode_attachment(attachment: &Attachment) -> Result<Vec<u8>> {
    let mut writer = WireWriter::with_capacity(32);
    encode_fields(attachment, &ATTACHMENT_FIELDS, &mut writer)?;
    Ok(writer.into_vec())
}

/// Decodes an attachment sub-message
///
/// An empty message decodes to an attachment with every field at its default.
pub fn decode_attachment(data: &[u8]) -> Result<Attachment> {
    if data.is_empty() {
        return Ok(Attachment::default());
    }
    let mut reader = WireReader::new(data)?;
    decode_fields(&mut reader, &ATTACHMENT_FIELDS, MAX_ATTACHMENT_FIELDS, "attachment")
}

/// Encodes an item into its raw wire payload
///
/// `max_string_chars` caps the character count of `customname`.
pub fn encode_item(item: &Item, max_string_chars: usize) -> Result<Vec<u8>> {
    let mut writer = WireWriter::with_capacity(128).max_string_length(max_string_chars);
    encode_fields(item, &ITEM_FIELDS, &mut writer)?;
    debug!("Encoded item {} into {} bytes", item.defindex, writer.len());
    Ok(writer.into_vec())
}

/// Decodes an item from its raw wire payload
///
/// `max_string_chars` caps the character count of `customname`.
pub fn decode_item(data: &[u8], max_string_chars: usize) -> Result<Item> {
    debug!("Decoding item from {} bytes", data.len());
    let mut reader = WireReader::with_max_string_length(data, max_string_chars)?;
    decode_fields(&mut reader, &ITEM_FIELDS, MAX_ITEM_FIELDS, "item")
}
