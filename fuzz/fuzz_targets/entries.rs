#![no_main]

use arbitrary::Arbitrary;
use junoio_reader::{read_entries, ReaderArena, ScalarType};
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    offsets: Vec<u16>,
    bytes: Vec<u8>,
}

// Fuzz target: the entry driver with arbitrary host offsets.
//
// Catches bugs in:
// - Offset validation (descending, past the end, empty)
// - Entry boundary checks on records that over- or under-run
// - All-or-nothing rollback across entries
fuzz_target!(|input: Input| {
    let mut arena = ReaderArena::new();
    let s = arena.add_string("s");
    let n = arena.add_primitive("n", ScalarType::I32);
    let root = arena.add_object_class("JM::Entry", vec![s, n]);

    let offsets: Vec<usize> = input.offsets.iter().map(|&o| usize::from(o)).collect();
    match read_entries(&mut arena, root, &input.bytes, &offsets) {
        Ok(entries) => assert_eq!(arena.values(root).rows(), Some(entries)),
        Err(_) => assert_eq!(arena.values(root).rows(), Some(0)),
    }
});
