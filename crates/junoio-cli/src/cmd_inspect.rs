/// Implementation of `junoio inspect`.
///
/// Decodes the structural tokens at `--at` under the chosen `--layout`
/// and prints them, followed by a hex dump of the record (capped at
/// `--limit` bytes). Useful for working out why a reader tree and a file
/// disagree.
///
/// # Output format
///
/// ```text
/// Record at 0x0000 (object layout)
///   object header  00 00 00 00 00 00 00 00 00 00 00 00 00 00 00 00
///   byte count     0x4000001C  flag=set  length=28
///   version        3
///   body           0x0016..0x0030 (26 bytes)
/// ---
///   0000  00 00 00 00 ...                                     ................
/// ```
use std::fmt::Write as _;
use std::fs;

use anyhow::{Context, Result, bail};
use junoio_wire::BinaryCursor;
use junoio_wire::header::{BYTE_COUNT_FLAG, OBJECT_HEADER_SIZE, PREFIX_PADDING_SIZE};

use crate::{InspectArgs, Layout};

/// Run the `junoio inspect` command.
///
/// # Errors
///
/// Returns an error if the file cannot be read or the tokens at the
/// offset run past the end of the file.
pub fn run(args: &InspectArgs) -> Result<()> {
    let bytes =
        fs::read(&args.data).with_context(|| format!("cannot read {}", args.data.display()))?;
    if args.at > bytes.len() {
        bail!("offset {} is past the end of a {}-byte file", args.at, bytes.len());
    }

    let mut cursor = BinaryCursor::at(&bytes, args.at)?;
    println!("Record at 0x{:04x} ({} layout)", args.at, layout_label(args.layout));

    if args.layout == Layout::Object {
        let header = cursor
            .read_bytes(OBJECT_HEADER_SIZE)
            .context("object header is truncated")?;
        println!("  object header  {}", hex_bytes(header));
    }

    let raw = cursor.read::<u32>().context("byte count is truncated")?;
    let length = raw & !BYTE_COUNT_FLAG;
    let flag = if raw & BYTE_COUNT_FLAG == 0 { "clear" } else { "set" };
    println!("  byte count     0x{raw:08X}  flag={flag}  length={length}");
    let start = cursor.position();

    let version = cursor.read_version().context("version is truncated")?;
    println!("  version        {version}");

    if args.layout == Layout::Prefix {
        let reserved = cursor
            .read_bytes(PREFIX_PADDING_SIZE)
            .context("reserved bytes are truncated")?;
        println!("  reserved       {}", hex_bytes(reserved));
    }

    let end = start + length as usize;
    let body_start = cursor.position();
    if end > bytes.len() {
        println!(
            "  body           0x{body_start:04x}..0x{end:04x} (declared end is {} bytes past the file)",
            end - bytes.len()
        );
    } else {
        println!(
            "  body           0x{body_start:04x}..0x{end:04x} ({} bytes)",
            end.saturating_sub(body_start)
        );
    }

    println!("---");
    let dump_end = end.min(bytes.len()).min(args.at.saturating_add(args.limit));
    print!("{}", hex_dump(&bytes[args.at..dump_end.max(args.at)], args.at));
    Ok(())
}

fn layout_label(layout: Layout) -> &'static str {
    match layout {
        Layout::Object => "object",
        Layout::Prefix => "prefix",
        Layout::Bare => "bare",
    }
}

fn hex_bytes(bytes: &[u8]) -> String {
    bytes.iter().fold(String::with_capacity(bytes.len() * 3), |mut s, b| {
        if !s.is_empty() {
            s.push(' ');
        }
        let _ = write!(s, "{b:02x}");
        s
    })
}

/// 16 bytes per line, offsets relative to the file.
fn hex_dump(bytes: &[u8], base: usize) -> String {
    let mut out = String::new();
    for (i, chunk) in bytes.chunks(16).enumerate() {
        let ascii: String = chunk
            .iter()
            .map(|&b| if b.is_ascii_graphic() { b as char } else { '.' })
            .collect();
        let _ = writeln!(out, "  {:04x}  {:<47}  {ascii}", base + i * 16, hex_bytes(chunk));
    }
    out
}
