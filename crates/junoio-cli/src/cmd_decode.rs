/// Implementation of `junoio decode`.
///
/// Builds the reader tree for `--type` from the class description, runs
/// it over every entry of the data file and writes the named columns as
/// JSON to stdout (or `-o <file>`).
///
/// # Output
///
/// ```text
/// {
///   "name": "m_refs",
///   "type": "vector<JM::SmartRef>",
///   "entries": 2,
///   "values": {"offsets": [0, 1, 3], "element": {"kind": [...], "index": [...]}}
/// }
/// ```
///
/// Columns are accumulated across entries; per-entry boundaries of a
/// container root are its `offsets`.
use std::fs;
use std::io::{self, Write as _};

use anyhow::{Context, Result};
use serde_json::json;

use crate::DecodeArgs;
use crate::render::render;
use crate::source::Source;

/// Run the `junoio decode` command.
///
/// # Errors
///
/// Returns an error if the inputs cannot be loaded, any entry fails to
/// decode, or the output cannot be written.
pub fn run(args: &DecodeArgs) -> Result<()> {
    let mut source = Source::load(&args.source)?;
    let entries = source
        .decode()
        .with_context(|| format!("failed to decode {}", args.source.data.display()))?;

    let document = json!({
        "name": source.root_member.name,
        "type": source.root_member.type_name,
        "entries": entries,
        "values": render(&source.arena, source.root),
    });
    let mut text = if args.pretty {
        serde_json::to_string_pretty(&document)?
    } else {
        serde_json::to_string(&document)?
    };
    text.push('\n');

    match &args.output {
        Some(path) => {
            fs::write(path, &text).with_context(|| format!("cannot write {}", path.display()))?;
        }
        None => {
            io::stdout()
                .write_all(text.as_bytes())
                .context("cannot write to stdout")?;
        }
    }
    Ok(())
}
