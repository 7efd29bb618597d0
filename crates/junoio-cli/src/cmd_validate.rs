/// Implementation of `junoio validate`.
///
/// Loads the description, builds the reader tree and decodes every entry,
/// then reports either a series of `✓` lines or a single `✗` diagnostic.
///
/// # Success output
///
/// ```text
/// ✓ Description: 14 classes
/// ✓ Reader tree: JM::SimEvt built from 23 readers
/// ✓ Entries: 100 entries decoded, 48213 bytes
/// ```
///
/// # Failure output
///
/// ```text
/// ✗ Error: record JM::SimTrack declares 58 bytes but its fields consumed 54
/// ```
use anyhow::{Result, anyhow};
use junoio_reader::ReadError;

use crate::ValidateArgs;
use crate::source::Source;

/// Run the `junoio validate` command.
///
/// # Errors
///
/// Returns an error if any input cannot be loaded or any entry fails to
/// decode. The `✗` line is printed to stdout before returning.
pub fn run(args: &ValidateArgs) -> Result<()> {
    let mut source = match Source::load(&args.source) {
        Ok(source) => source,
        Err(e) => {
            println!("✗ Error: {e:#}");
            return Err(anyhow!("validation failed"));
        }
    };

    println!("✓ Description: {} classes", source.description.classes.len());
    println!(
        "✓ Reader tree: {} built from {} readers",
        source.root_member.type_name,
        source.arena.len()
    );

    match source.decode() {
        Ok(entries) => {
            println!(
                "✓ Entries: {} entr{} decoded, {} bytes",
                entries,
                if entries == 1 { "y" } else { "ies" },
                source.bytes.len()
            );
            Ok(())
        }
        Err(e) => {
            println!("✗ Error: {}", read_error_diagnostic(&e));
            Err(anyhow!("validation failed"))
        }
    }
}

// ── Error formatting ──────────────────────────────────────────────────────────

/// Converts a `ReadError` into a diagnostic that says where to look.
///
/// ```text
/// ┌──────────────────────┬──────────────────────────────────────────────┐
/// │ ReadError variant    │ Diagnostic                                   │
/// ├──────────────────────┼──────────────────────────────────────────────┤
/// │ LengthMismatch       │ "record <name> declares N bytes but ..."     │
/// │ EntryMismatch        │ "entry i ended at X, expected Y (off by d)"  │
/// │ Wire / others        │ "<error Display>"                            │
/// └──────────────────────┴──────────────────────────────────────────────┘
/// ```
fn read_error_diagnostic(e: &ReadError) -> String {
    match e {
        ReadError::LengthMismatch {
            name,
            expected,
            actual,
        } => format!("record {name} declares {expected} bytes but its fields consumed {actual}"),
        ReadError::EntryMismatch {
            entry,
            expected,
            actual,
        } => {
            let (sign, delta) = if actual > expected {
                ('+', actual - expected)
            } else {
                ('-', expected - actual)
            };
            format!("entry {entry} ended at {actual}, expected {expected} (off by {sign}{delta})")
        }
        other => other.to_string(),
    }
}
