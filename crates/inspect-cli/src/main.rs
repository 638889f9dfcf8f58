//! inspect - Decode, encode and analyze CS2 inspect links
//!
//! Masked links are decoded locally. Unmasked links only reference an item
//! held by a Steam account or market listing; they are classified but need
//! a game-service session to resolve.

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use inspect_core::{
    Attachment, AttachmentKind, CodecConfig, InspectCodec, Item, Known, Payload, UrlFormat,
    UrlKind,
};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn, Level};
use tracing_subscriber::EnvFilter;

/// Decode, encode and analyze CS2 inspect links
#[derive(Parser, Debug)]
#[command(name = "inspect")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Decode masked links into item fields
    Decode(DecodeArgs),
    /// Encode item fields into a masked link
    Encode(EncodeArgs),
    /// Classify a link and re-render it
    Analyze(AnalyzeArgs),
}

#[derive(Args, Debug)]
struct CodecOptions {
    /// Skip range validation of items
    #[arg(long)]
    no_validate: bool,

    /// Reject masked links whose checksum does not match
    #[arg(long)]
    verify_checksum: bool,

    /// Maximum custom name length in characters
    #[arg(long, default_value = "100")]
    max_name_length: u32,
}

impl CodecOptions {
    fn codec(&self) -> InspectCodec {
        InspectCodec::with_config(
            CodecConfig::new()
                .validate_input(!self.no_validate)
                .verify_checksum(self.verify_checksum)
                .max_custom_name_length(self.max_name_length),
        )
    }
}

#[derive(Args, Debug)]
struct DecodeArgs {
    /// Links to decode
    #[arg(required_unless_present = "file", conflicts_with = "file")]
    urls: Vec<String>,

    /// Read links from a file, one per line
    #[arg(short, long)]
    file: Option<PathBuf>,

    #[command(flatten)]
    options: CodecOptions,
}

#[derive(Args, Debug)]
struct EncodeArgs {
    /// Item definition index
    #[arg(long)]
    defindex: u32,

    /// Paint kit index
    #[arg(long)]
    paintindex: u32,

    /// Pattern seed
    #[arg(long)]
    paintseed: u32,

    /// Float value in [0, 1]
    #[arg(long)]
    paintwear: f32,

    #[arg(long)]
    accountid: Option<u32>,

    #[arg(long)]
    itemid: Option<u64>,

    #[arg(long)]
    rarity: Option<u32>,

    #[arg(long)]
    quality: Option<u32>,

    /// StatTrak counter value
    #[arg(long)]
    killeatervalue: Option<u32>,

    #[arg(long)]
    killeaterscoretype: Option<u32>,

    /// Name tag text
    #[arg(long)]
    customname: Option<String>,

    #[arg(long)]
    inventory: Option<u32>,

    #[arg(long)]
    origin: Option<u32>,

    #[arg(long)]
    questid: Option<u32>,

    #[arg(long)]
    dropreason: Option<u32>,

    #[arg(long)]
    musicindex: Option<u32>,

    /// Entity index (signed)
    #[arg(long, allow_negative_numbers = true)]
    entindex: Option<i32>,

    #[arg(long)]
    petindex: Option<u32>,

    #[arg(long)]
    style: Option<u32>,

    #[arg(long)]
    upgrade_level: Option<u32>,

    /// Sticker as slot:id[:wear[:scale[:rotation]]] (repeatable)
    #[arg(long = "sticker", value_parser = parse_attachment)]
    stickers: Vec<Attachment>,

    /// Keychain as slot:id[:wear[:scale[:rotation]]] (repeatable)
    #[arg(long = "keychain", value_parser = parse_attachment)]
    keychains: Vec<Attachment>,

    /// Style variation as slot:id[:wear[:scale[:rotation]]] (repeatable)
    #[arg(long = "variation", value_parser = parse_attachment)]
    variations: Vec<Attachment>,

    #[command(flatten)]
    options: CodecOptions,
}

impl EncodeArgs {
    fn item(&self) -> Item {
        Item {
            accountid: self.accountid,
            itemid: self.itemid,
            rarity: self.rarity,
            quality: self.quality,
            killeaterscoretype: self.killeaterscoretype,
            killeatervalue: self.killeatervalue,
            customname: self.customname.clone(),
            inventory: self.inventory,
            origin: self.origin,
            questid: self.questid,
            dropreason: self.dropreason,
            musicindex: self.musicindex,
            entindex: self.entindex,
            petindex: self.petindex,
            style: self.style,
            upgrade_level: self.upgrade_level,
            stickers: self.stickers.clone(),
            keychains: self.keychains.clone(),
            variations: self.variations.clone(),
            ..Item::new(self.defindex, self.paintindex, self.paintseed, self.paintwear)
        }
    }
}

#[derive(Args, Debug)]
struct AnalyzeArgs {
    /// Link in any accepted form
    url: String,

    /// Separate command and payload with a space instead of %20
    #[arg(long)]
    space: bool,

    /// Omit the steam:// prefix
    #[arg(long)]
    bare: bool,
}

/// Parses `slot:id[:wear[:scale[:rotation]]]`
fn parse_attachment(spec: &str) -> std::result::Result<Attachment, String> {
    let parts: Vec<&str> = spec.split(':').collect();
    if !(2..=5).contains(&parts.len()) {
        return Err(format!(
            "expected slot:id[:wear[:scale[:rotation]]], got '{}'",
            spec
        ));
    }

    let int = |s: &str| s.parse::<u32>().map_err(|e| format!("'{}': {}", s, e));
    let float = |s: &str| s.parse::<f32>().map_err(|e| format!("'{}': {}", s, e));

    let mut attachment = Attachment::new(int(parts[0])?, int(parts[1])?);
    if let Some(wear) = parts.get(2) {
        attachment.wear = Some(float(wear)?);
    }
    if let Some(scale) = parts.get(3) {
        attachment.scale = Some(float(scale)?);
    }
    if let Some(rotation) = parts.get(4) {
        attachment.rotation = Some(float(rotation)?);
    }
    Ok(attachment)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match &cli.command {
        Command::Decode(args) => run_decode(args),
        Command::Encode(args) => run_encode(args),
        Command::Analyze(args) => run_analyze(args),
    }
}

/// Read links from a file, skipping blank lines and `#` comments
fn read_url_file(path: &Path) -> Result<Vec<String>> {
    if !path.is_file() {
        bail!("Input file does not exist: {}", path.display());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

fn run_decode(args: &DecodeArgs) -> Result<()> {
    let urls = match &args.file {
        Some(path) => read_url_file(path)?,
        None => args.urls.clone(),
    };
    info!("Decoding {} link(s)", urls.len());

    let codec = args.options.codec();
    let mut failures = 0;

    for (i, url) in urls.iter().enumerate() {
        if i > 0 {
            println!();
        }
        match decode_one(&codec, url) {
            Ok(text) => print!("{}", text),
            Err(e) => {
                warn!("Failed to decode link {}: {:#}", i + 1, e);
                failures += 1;
            }
        }
    }

    if failures > 0 {
        bail!("{} of {} link(s) could not be decoded", failures, urls.len());
    }
    Ok(())
}

fn decode_one(codec: &InspectCodec, url: &str) -> Result<String> {
    let analyzed = codec.analyze(url).context("Not a recognized inspect link")?;
    if analyzed.kind() == UrlKind::Unmasked {
        bail!(
            "unmasked link {} needs a game-service session to resolve",
            analyzed.normalized()
        );
    }
    let item = codec
        .decode_analyzed(&analyzed)
        .context("Failed to decode item payload")?;
    debug!("Decoded defindex {} from {}", item.defindex, analyzed);
    Ok(ItemReport(&item).to_string())
}

fn run_encode(args: &EncodeArgs) -> Result<()> {
    let item = args.item();
    let url = args
        .options
        .codec()
        .encode_url(&item)
        .context("Failed to encode item")?;
    println!("{}", url);
    Ok(())
}

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let analyzed = inspect_core::analyze(&args.url).context("Not a recognized inspect link")?;

    println!("kind: {}", analyzed.kind());
    println!("quoted: {}", analyzed.is_quoted());
    match analyzed.payload() {
        Payload::Masked { hex_data } => println!("hex_data: {}", hex_data),
        Payload::Unmasked(_) => {
            if let Some(id) = analyzed.market_id() {
                println!("market_id: {}", id);
            }
            if let Some(id) = analyzed.owner_id() {
                println!("owner_id: {}", id);
            }
            println!("asset_id: {}", analyzed.asset_id().unwrap_or_default());
            println!("class_id: {}", analyzed.class_id().unwrap_or_default());
        }
    }

    let format = UrlFormat::new()
        .quoted(!args.space)
        .include_prefix(!args.bare);
    println!("url: {}", analyzed.format(format));
    Ok(())
}

/// An item rendered as indented `key: value` lines
struct ItemReport<'a>(&'a Item);

impl fmt::Display for ItemReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let item = self.0;

        match item.weapon() {
            Known::Known(weapon) => writeln!(f, "defindex: {} ({})", item.defindex, weapon)?,
            Known::Unrecognized(_) => writeln!(f, "defindex: {} (unknown)", item.defindex)?,
        }
        writeln!(f, "paintindex: {}", item.paintindex)?;
        writeln!(f, "paintseed: {}", item.paintseed)?;
        writeln!(f, "paintwear: {}", item.paintwear)?;

        let optional = [
            ("accountid", item.accountid.map(|v| v.to_string())),
            ("itemid", item.itemid.map(|v| v.to_string())),
            ("rarity", item.rarity_kind().map(|r| r.to_string())),
            ("quality", item.quality_kind().map(|q| q.to_string())),
            ("killeaterscoretype", item.killeaterscoretype.map(|v| v.to_string())),
            ("killeatervalue", item.killeatervalue.map(|v| v.to_string())),
            ("customname", item.customname.clone()),
            ("inventory", item.inventory.map(|v| v.to_string())),
            ("origin", item.origin.map(|v| v.to_string())),
            ("questid", item.questid.map(|v| v.to_string())),
            ("dropreason", item.dropreason.map(|v| v.to_string())),
            ("musicindex", item.musicindex.map(|v| v.to_string())),
            ("entindex", item.entindex.map(|v| v.to_string())),
            ("petindex", item.petindex.map(|v| v.to_string())),
            ("style", item.style.map(|v| v.to_string())),
            ("upgrade_level", item.upgrade_level.map(|v| v.to_string())),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                writeln!(f, "{}: {}", key, value)?;
            }
        }

        for kind in [
            AttachmentKind::Sticker,
            AttachmentKind::Keychain,
            AttachmentKind::Variation,
        ] {
            let list = item.attachments(kind);
            if list.is_empty() {
                continue;
            }
            writeln!(f, "{}:", kind.list_name())?;
            for attachment in list {
                writeln!(f, "  - {}", render_attachment(attachment))?;
            }
        }
        Ok(())
    }
}

fn render_attachment(attachment: &Attachment) -> String {
    let mut parts = vec![
        format!("slot={}", attachment.slot),
        format!("id={}", attachment.sticker_id),
    ];
    let floats = [
        ("wear", attachment.wear),
        ("scale", attachment.scale),
        ("rotation", attachment.rotation),
        ("offset_x", attachment.offset_x),
        ("offset_y", attachment.offset_y),
        ("offset_z", attachment.offset_z),
    ];
    let ints = [
        ("tint_id", attachment.tint_id),
        ("pattern", attachment.pattern),
        ("highlight_reel", attachment.highlight_reel),
        ("wrapped_sticker", attachment.wrapped_sticker),
    ];
    parts.extend(
        floats
            .iter()
            .filter_map(|(k, v)| v.map(|v| format!("{}={}", k, v))),
    );
    parts.extend(
        ints.iter()
            .filter_map(|(k, v)| v.map(|v| format!("{}={}", k, v))),
    );
    parts.join(" ")
}
