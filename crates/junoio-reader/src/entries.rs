//! Driving a root reader over the entries of a branch.
//!
//! The host storage layer hands over one decompressed basket as a byte
//! buffer plus the start offset of every entry in it. Each entry holds
//! exactly one record of the root reader:
//!
//! ```text
//!   offsets:  [o0,        o1,          o2,   ...,  on]
//!   bytes:     |─ entry 0 ─|─ entry 1 ──|─ ... ─|
//! ```
//!
//! A reader that stops short of, or runs past, the next offset means the
//! reader tree does not match the data, and is reported as
//! [`ReadError::EntryMismatch`].

use junoio_wire::BinaryCursor;

use crate::error::ReadError;
use crate::reader::{ReaderArena, ReaderId};

/// Decode a single record of `root` starting at `start` and return the
/// position right after it.
///
/// # Errors
///
/// [`ReadError::Wire`] if `start` lies beyond the buffer, otherwise any
/// error raised by the reader tree. Columns are rolled back on error.
///
/// # Panics
///
/// Panics if `root` was not issued by `arena`.
pub fn read_at(
    arena: &mut ReaderArena,
    root: ReaderId,
    bytes: &[u8],
    start: usize,
) -> Result<usize, ReadError> {
    let mut cursor = BinaryCursor::at(bytes, start)?;
    arena.read(root, &mut cursor)?;
    Ok(cursor.position())
}

/// Decode every entry delimited by `offsets` and return the number of
/// entries read.
///
/// `offsets` holds `entries + 1` ascending positions; an empty slice or a
/// single offset means no entries. Either every entry is appended to the
/// arena's columns or, on the first failure, none are.
///
/// # Errors
///
/// - [`ReadError::InvalidOffsets`] if the offsets decrease or point past
///   the end of `bytes`. Nothing is decoded in that case.
/// - [`ReadError::EntryMismatch`] if an entry does not end exactly on the
///   next offset.
/// - Any error raised by the reader tree.
///
/// # Panics
///
/// Panics if `root` was not issued by `arena`.
pub fn read_entries(
    arena: &mut ReaderArena,
    root: ReaderId,
    bytes: &[u8],
    offsets: &[usize],
) -> Result<usize, ReadError> {
    validate_offsets(offsets, bytes.len())?;
    let entries = offsets.len().saturating_sub(1);
    tracing::debug!(name = arena.name(root), entries, "reading entries");

    let marks = arena.marks();
    let result = read_entries_inner(arena, root, bytes, offsets);
    if result.is_err() {
        arena.rewind(&marks);
    }
    result.map(|()| entries)
}

fn read_entries_inner(
    arena: &mut ReaderArena,
    root: ReaderId,
    bytes: &[u8],
    offsets: &[usize],
) -> Result<(), ReadError> {
    for (entry, window) in offsets.windows(2).enumerate() {
        let (start, expected) = (window[0], window[1]);
        let mut cursor = BinaryCursor::at(bytes, start)?;
        arena.read_node(root, &mut cursor)?;
        if cursor.position() != expected {
            tracing::debug!(entry, expected, actual = cursor.position(), "entry mismatch");
            return Err(ReadError::EntryMismatch {
                entry,
                expected,
                actual: cursor.position(),
            });
        }
    }
    Ok(())
}

fn validate_offsets(offsets: &[usize], len: usize) -> Result<(), ReadError> {
    if let Some(i) = offsets.windows(2).position(|w| w[0] > w[1]) {
        return Err(ReadError::InvalidOffsets {
            reason: format!(
                "offset {} ({}) is smaller than offset {} ({})",
                i + 1,
                offsets[i + 1],
                i,
                offsets[i]
            ),
        });
    }
    if let Some(&last) = offsets.last()
        && last > len
    {
        return Err(ReadError::InvalidOffsets {
            reason: format!("last offset {last} is past the end of a {len}-byte buffer"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitive::ScalarType;
    use crate::values::{Column, ReaderValues};

    fn u16_arena() -> (ReaderArena, ReaderId) {
        let mut arena = ReaderArena::new();
        let x = arena.add_primitive("x", ScalarType::U16);
        (arena, x)
    }

    #[test]
    fn entries_read_in_order() {
        let (mut arena, x) = u16_arena();
        let bytes = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03];
        let n = read_entries(&mut arena, x, &bytes, &[0, 2, 4, 6]).unwrap();
        assert_eq!(n, 3);
        assert_eq!(arena.values(x), ReaderValues::Column(Column::U16(vec![1, 2, 3])));
    }

    #[test]
    fn no_entries() {
        let (mut arena, x) = u16_arena();
        assert_eq!(read_entries(&mut arena, x, &[], &[]).unwrap(), 0);
        assert_eq!(read_entries(&mut arena, x, &[], &[0]).unwrap(), 0);
    }

    #[test]
    fn gap_between_entries_is_mismatch() {
        let (mut arena, x) = u16_arena();
        let bytes = [0x00, 0x01, 0xFF, 0x00, 0x02];
        let err = read_entries(&mut arena, x, &bytes, &[0, 3, 5]).unwrap_err();
        assert!(matches!(
            err,
            ReadError::EntryMismatch {
                entry: 0,
                expected: 3,
                actual: 2
            }
        ));
        assert_eq!(arena.values(x).rows(), Some(0));
    }

    #[test]
    fn later_failure_rolls_back_earlier_entries() {
        let (mut arena, x) = u16_arena();
        let bytes = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x09];
        let err = read_entries(&mut arena, x, &bytes, &[0, 2, 4, 7]).unwrap_err();
        assert!(matches!(err, ReadError::EntryMismatch { entry: 2, .. }));
        assert_eq!(arena.values(x).rows(), Some(0));
    }

    #[test]
    fn descending_offsets_rejected() {
        let (mut arena, x) = u16_arena();
        let err = read_entries(&mut arena, x, &[0; 4], &[0, 4, 2]).unwrap_err();
        assert!(matches!(err, ReadError::InvalidOffsets { .. }));
    }

    #[test]
    fn offset_past_end_rejected() {
        let (mut arena, x) = u16_arena();
        let err = read_entries(&mut arena, x, &[0; 4], &[0, 2, 6]).unwrap_err();
        match err {
            ReadError::InvalidOffsets { reason } => assert!(reason.contains("4-byte")),
            other => panic!("expected InvalidOffsets, got {other:?}"),
        }
    }

    #[test]
    fn read_at_returns_end() {
        let (mut arena, x) = u16_arena();
        let bytes = [0xAA, 0xAA, 0x12, 0x34];
        assert_eq!(read_at(&mut arena, x, &bytes, 2).unwrap(), 4);
        assert_eq!(arena.values(x), ReaderValues::Column(Column::U16(vec![0x1234])));
        assert!(read_at(&mut arena, x, &bytes, 9).is_err());
    }
}
