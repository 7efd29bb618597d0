//! Loading the inputs shared by `decode` and `validate`.

use std::fs;

use anyhow::{Context, Result};
use junoio_reader::{ReadError, ReadOptions, ReaderArena, ReaderId, read_entries};
use junoio_schema::{MemberInfo, ReaderRegistry, SchemaDescription};

use crate::SourceArgs;

/// A reader tree built for one root member, plus the bytes to run it
/// over.
pub struct Source {
    pub description: SchemaDescription,
    pub root_member: MemberInfo,
    pub arena: ReaderArena,
    pub root: ReaderId,
    pub bytes: Vec<u8>,
    pub offsets: Vec<usize>,
}

impl Source {
    /// Read both files and build the reader tree.
    ///
    /// # Errors
    ///
    /// Returns an error if either file cannot be read, the description
    /// is malformed, or the root type cannot be turned into a reader.
    pub fn load(args: &SourceArgs) -> Result<Self> {
        let description = read_description(args)?;
        let root_member = MemberInfo::new(
            args.name.clone().unwrap_or_else(|| args.type_name.clone()),
            args.type_name.clone(),
        );

        let mut arena = ReaderArena::with_options(read_options(args));
        let root = ReaderRegistry::with_defaults()
            .build(&mut arena, &description, &root_member, &args.path)
            .with_context(|| format!("cannot build a reader for {}", args.type_name))?;
        tracing::info!(root = %root_member.name, readers = arena.len(), "reader tree built");

        let bytes =
            fs::read(&args.data).with_context(|| format!("cannot read {}", args.data.display()))?;
        let offsets = args.offsets.clone().unwrap_or_else(|| vec![0, bytes.len()]);

        Ok(Self {
            description,
            root_member,
            arena,
            root,
            bytes,
            offsets,
        })
    }

    /// Run the root reader over every entry. Returns the entry count.
    ///
    /// # Errors
    ///
    /// Any [`ReadError`] from the entry driver.
    pub fn decode(&mut self) -> Result<usize, ReadError> {
        let entries = read_entries(&mut self.arena, self.root, &self.bytes, &self.offsets)?;
        tracing::info!(entries, bytes = self.bytes.len(), "entries decoded");
        Ok(entries)
    }
}

/// Parse the class description named on the command line.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not a valid
/// description.
pub fn read_description(args: &SourceArgs) -> Result<SchemaDescription> {
    let json = fs::read_to_string(&args.schema)
        .with_context(|| format!("cannot read {}", args.schema.display()))?;
    SchemaDescription::from_json(&json)
        .with_context(|| format!("invalid class description in {}", args.schema.display()))
}

fn read_options(args: &SourceArgs) -> ReadOptions {
    ReadOptions {
        strict_prefix_length: args.strict,
        require_byte_count_flag: args.require_flag,
    }
}
