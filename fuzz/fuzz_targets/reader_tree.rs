#![no_main]

use junoio_reader::{ReaderArena, ScalarType};
use junoio_wire::BinaryCursor;
use libfuzzer_sys::fuzz_target;

// Fuzz target: one record of a mixed reader tree on arbitrary bytes.
//
// The tree covers every reader variant:
//   JM::Hit { m_ref: SmartRef, m_label: TString,
//             m_hits: vector<CLHEP::Vec { x: f64, y: f32 }>,
//             m_wrapped: [count][version] SmartRef }
//
// Catches bugs in:
// - Header parsing of both class shapes, sequences and wrappers
// - Huge sequence counts (must fail cleanly, not allocate up front)
// - Rollback: a failed read leaves values exactly as before
fuzz_target!(|data: &[u8]| {
    let mut arena = ReaderArena::new();
    let r = arena.add_reference("m_ref");
    let label = arena.add_string("m_label");
    let x = arena.add_primitive("x", ScalarType::F64);
    let y = arena.add_primitive("y", ScalarType::F32);
    let vec = arena.add_prefix_class("CLHEP::Vec", vec![x, y]);
    let hits = arena.add_sequence("m_hits", vec);
    let inner = arena.add_reference("m_wrapped");
    let wrapped = arena.add_object_header("m_wrapped", inner);
    let hit = arena.add_object_class("JM::Hit", vec![r, label, hits, wrapped]);

    let mut cursor = BinaryCursor::new(data);
    let before = arena.values(hit);
    match arena.read(hit, &mut cursor) {
        Ok(()) => assert_eq!(arena.values(hit).rows(), Some(1)),
        Err(_) => assert_eq!(arena.values(hit), before),
    }
});
