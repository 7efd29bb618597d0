#![no_main]

use arbitrary::Arbitrary;
use junoio_reader::ReaderArena;
use junoio_schema::{MemberInfo, ReaderRegistry, SchemaDescription};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    description: String,
    root_type: String,
    path: String,
}

// Fuzz target: class description parsing and reader-tree construction.
//
// Catches bugs in:
// - serde deserialization of malformed descriptions
// - Type-name parsing (nested vector<>, pointers, const)
// - Unbounded recursion on self-referencing classes (must be TooDeep)
fuzz_target!(|input: Input| {
    let Ok(description) = SchemaDescription::from_json(&input.description) else {
        return;
    };
    let mut arena = ReaderArena::new();
    let root = MemberInfo::new("root", input.root_type);
    let _ = ReaderRegistry::with_defaults().build(&mut arena, &description, &root, &input.path);
});
