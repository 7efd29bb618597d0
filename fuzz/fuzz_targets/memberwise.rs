#![no_main]

use arbitrary::Arbitrary;
use junoio_reader::{ReaderArena, ScalarType};
use junoio_wire::BinaryCursor;
use libfuzzer_sys::fuzz_target;

#[derive(Arbitrary, Debug)]
struct Input {
    count: i16,
    bytes: Vec<u8>,
}

// Fuzz target: memberwise `read_many` of a prefix-rooted class.
//
// Catches bugs in:
// - Negative counts (must be InvalidArgument, cursor untouched)
// - Partial memberwise blocks (first field complete, second truncated)
// - Column lengths diverging after a rollback
fuzz_target!(|input: Input| {
    let mut arena = ReaderArena::new();
    let a = arena.add_primitive("a", ScalarType::U16);
    let b = arena.add_reference("b");
    let class = arena.add_prefix_class("CLHEP::Pair", vec![a, b]);

    let mut cursor = BinaryCursor::new(&input.bytes);
    let result = arena.read_many(class, &mut cursor, i64::from(input.count));

    let values = arena.values(class);
    let fields = values.as_record().unwrap();
    let expected = match result {
        Ok(()) => usize::try_from(input.count).unwrap(),
        Err(_) => 0,
    };
    assert_eq!(fields[0].rows(), Some(expected));
    assert_eq!(fields[1].rows(), Some(expected));
});
