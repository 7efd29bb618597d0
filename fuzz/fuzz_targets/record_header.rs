#![no_main]

use junoio_wire::{BinaryCursor, RecordHeader};
use libfuzzer_sys::fuzz_target;

// Fuzz target: `[byte count][version]` header parsing.
//
// Catches bugs in:
// - Truncated headers (fewer than 6 bytes)
// - Declared lengths far past the buffer (end() must not overflow)
fuzz_target!(|data: &[u8]| {
    let mut cursor = BinaryCursor::new(data);
    if let Ok(header) = RecordHeader::read_from(&mut cursor) {
        assert_eq!(header.start, 4);
        assert!(header.end() >= header.start);
        assert_eq!(cursor.position(), 6);
    }
});
