#![no_main]

use junoio_wire::BinaryCursor;
use libfuzzer_sys::fuzz_target;

// Fuzz target: structural token reads on arbitrary bytes.
//
// The first byte picks the token sequence; the rest is the buffer.
// Catches bugs in:
// - Bounds checks of read/skip near the end of the buffer
// - The position invariant (0 <= position <= len) after failures
// - Flag masking of byte counts
fuzz_target!(|data: &[u8]| {
    let Some((&script, buf)) = data.split_first() else {
        return;
    };
    let mut cursor = BinaryCursor::new(buf);
    for step in 0..8 {
        let before = cursor.position();
        let ok = match (script >> step) & 0b11 {
            0 => cursor.skip_object_header().is_ok(),
            1 => cursor
                .read_byte_count()
                .map(|n| assert_eq!(n & 0x4000_0000, 0))
                .is_ok(),
            2 => cursor.read_version().is_ok(),
            _ => cursor.read::<i64>().is_ok(),
        };
        if !ok {
            assert_eq!(cursor.position(), before, "failed read moved the cursor");
        }
        assert!(cursor.position() <= cursor.len());
    }
});
