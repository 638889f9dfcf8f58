use inspect_core::url::INSPECT_URL_PREFIX;
use inspect_core::{
    analyze, decode, encode, normalize, Attachment, CodecConfig, ErrorKind, InspectCodec, Item,
    UrlKind, WireReader,
};
use pretty_assertions::assert_eq;

fn assert_close(a: Option<f32>, b: Option<f32>) {
    match (a, b) {
        (Some(a), Some(b)) => assert!((a - b).abs() < 1e-6, "{} != {}", a, b),
        (a, b) => assert_eq!(a, b),
    }
}

#[test]
fn minimal_item_scenario() {
    let item = Item::new(7, 44, 661, 0.15);
    let url = encode(&item).unwrap();

    let hex = url.strip_prefix(INSPECT_URL_PREFIX).unwrap();
    assert!(!hex.is_empty());
    assert!(hex.bytes().all(|b| b.is_ascii_digit() || (b'A'..=b'F').contains(&b)));

    let decoded = decode(&url).unwrap();
    assert_eq!(decoded.defindex, 7);
    assert_eq!(decoded.paintindex, 44);
    assert_eq!(decoded.paintseed, 661);
    assert_eq!(decoded.paintwear, 0.15);
}

#[test]
fn extreme_values_round_trip() {
    let mut item = Item::new(7, 44, 661, 1.0);
    item.itemid = Some(18_446_744_073_709_551_615);
    item.entindex = Some(-2_147_483_648);
    item.customname = Some("🔥 Fire Serpent 🐍 ★".to_string());

    let decoded = decode(&encode(&item).unwrap()).unwrap();
    assert_eq!(decoded, item);
}

#[test]
fn nested_attachments_scenario() {
    let mut item = Item::new(16, 309, 123, 0.071_234);
    item.stickers = vec![
        Attachment {
            wear: Some(0.123_456),
            scale: Some(1.1),
            rotation: Some(33.3),
            highlight_reel: Some(2),
            ..Attachment::new(0, 4682)
        },
        Attachment {
            offset_x: Some(-0.2),
            offset_y: Some(0.4),
            highlight_reel: Some(0),
            ..Attachment::new(2, 5931)
        },
    ];
    item.keychains = vec![Attachment {
        offset_z: Some(3.25),
        pattern: Some(55_555),
        highlight_reel: Some(7),
        ..Attachment::new(0, 19)
    }];
    item.variations = vec![Attachment {
        tint_id: Some(4),
        highlight_reel: Some(1),
        ..Attachment::new(1, 64)
    }];

    let decoded = decode(&encode(&item).unwrap()).unwrap();

    assert_eq!(decoded.stickers.len(), 2);
    assert_eq!(decoded.keychains.len(), 1);
    assert_eq!(decoded.variations.len(), 1);

    let pairs = item
        .stickers
        .iter()
        .chain(&item.keychains)
        .chain(&item.variations)
        .zip(
            decoded
                .stickers
                .iter()
                .chain(&decoded.keychains)
                .chain(&decoded.variations),
        );
    for (want, got) in pairs {
        assert_eq!(got.slot, want.slot);
        assert_eq!(got.sticker_id, want.sticker_id);
        assert_eq!(got.highlight_reel, want.highlight_reel);
        assert_eq!(got.pattern, want.pattern);
        assert_eq!(got.tint_id, want.tint_id);
        assert_close(got.wear, want.wear);
        assert_close(got.scale, want.scale);
        assert_close(got.rotation, want.rotation);
        assert_close(got.offset_x, want.offset_x);
        assert_close(got.offset_y, want.offset_y);
        assert_close(got.offset_z, want.offset_z);
    }
}

#[test]
fn unmasked_market_link_scenario() {
    let analyzed = analyze(
        "steam://rungame/730/76561202255233023/+csgo_econ_action_preview%20M123456789A987654321D456789123",
    )
    .unwrap();

    assert_eq!(analyzed.kind(), UrlKind::Unmasked);
    assert_eq!(analyzed.market_id(), Some("123456789"));
    assert_eq!(analyzed.asset_id(), Some("987654321"));
    assert_eq!(analyzed.class_id(), Some("456789123"));
    assert_eq!(analyzed.owner_id(), None);
}

#[test]
fn normalization_is_idempotent() {
    let url = encode(&Item::new(7, 44, 661, 0.15)).unwrap();
    let hex = url.strip_prefix(INSPECT_URL_PREFIX).unwrap().to_lowercase();

    for input in [
        url.clone(),
        format!("+csgo_econ_action_preview {}", hex),
        format!("csgo_econ_action_preview%20{}", hex),
        hex.clone(),
        "S76561198084749846A698323590D7935523998312483177".to_string(),
    ] {
        let once = normalize(&input).unwrap();
        assert_eq!(normalize(&once).unwrap(), once);
    }
}

#[test]
fn boundary_values() {
    assert!(encode(&Item::new(7, 44, 661, 1.0)).is_ok());
    assert_eq!(
        encode(&Item::new(7, 44, 661, 1.5)).unwrap_err().kind(),
        ErrorKind::Validation
    );

    let mut item = Item::new(7, 44, 661, 0.5);
    item.stickers.push(Attachment::new(4, 1));
    assert!(encode(&item).is_ok());
    item.stickers[0].slot = 5;
    assert_eq!(encode(&item).unwrap_err().kind(), ErrorKind::Validation);

    let oversized = vec![0u8; 10 * 1024 * 1024 + 1];
    assert!(WireReader::new(&oversized).is_err());
}

#[test]
fn oversized_item_is_rejected_at_encode() {
    let full = |slot: u32| Attachment {
        wear: Some(0.5),
        scale: Some(1.5),
        rotation: Some(90.0),
        tint_id: Some(12),
        offset_x: Some(0.25),
        offset_y: Some(-0.25),
        offset_z: Some(1.0),
        pattern: Some(1_000_000),
        highlight_reel: Some(3),
        wrapped_sticker: Some(70_000),
        ..Attachment::new(slot, 100_000 + slot)
    };
    let mut item = Item::new(7, 44, 661, 0.5);
    item.customname = Some("🐍".repeat(100));
    item.stickers = (0..5).map(full).collect();
    item.keychains = (0..5).map(full).collect();
    item.variations = (0..5).map(full).collect();

    assert!(inspect_core::validate::validate_item(&item, 100).valid);
    assert_eq!(encode(&item).unwrap_err().kind(), ErrorKind::Encoding);
}

#[test]
fn malformed_payloads() {
    let codec = InspectCodec::with_config(CodecConfig::new().validate_input(false));

    // varint with six continuation bytes in the defindex slot
    let long_varint = [0x18, 0xFF, 0xFF, 0xFF, 0xFF, 0xFF, 0x01];
    assert_eq!(
        codec.decode_bytes(&long_varint).unwrap_err().kind(),
        ErrorKind::Decoding
    );

    // customname length prefix beyond the buffer
    let overrun = [0x18, 0x07, 0x5A, 0x40, b'a'];
    assert_eq!(
        codec.decode_bytes(&overrun).unwrap_err().kind(),
        ErrorKind::Decoding
    );

    let url = encode(&Item::new(7, 44, 661, 0.15)).unwrap();
    let corrupted = format!("{}X", &url[..url.len() - 1]);
    assert_eq!(decode(&corrupted).unwrap_err().kind(), ErrorKind::InvalidUrl);
}

#[test]
fn codec_is_shareable_across_threads() {
    let codec = InspectCodec::new();
    std::thread::scope(|scope| {
        for seed in 0..4u32 {
            let codec = &codec;
            scope.spawn(move || {
                let item = Item::new(7, 44, seed, 0.25);
                let url = codec.encode_url(&item).unwrap();
                assert_eq!(codec.decode_url(&url).unwrap(), item);
            });
        }
    });
}
