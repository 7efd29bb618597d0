use crate::cursor::BinaryCursor;
use crate::error::WireError;

/// Width of the generic object header that precedes object-rooted records
/// and smart references. Its contents are never interpreted.
pub const OBJECT_HEADER_SIZE: usize = 16;

/// Width of a byte-count prefix.
pub const BYTE_COUNT_SIZE: usize = 4;

/// Width of a version tag.
pub const VERSION_SIZE: usize = 2;

/// Reserved bytes after the version tag of a prefix-rooted record.
pub const PREFIX_PADDING_SIZE: usize = 4;

/// Flag bit carried by every byte-count prefix written by the framework.
pub const BYTE_COUNT_FLAG: u32 = 0x4000_0000;

/// A decoded byte-count prefix.
///
/// ```text
///   bit 31      bit 30          bits 29..0
/// ┌────────┬──────────────┬─────────────────────┐
/// │ unused │ count flag   │ payload length      │
/// └────────┴──────────────┴─────────────────────┘
/// ```
///
/// `length` counts the bytes that follow the prefix itself, so a record
/// ends at `position_after_prefix + length`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ByteCount {
    pub length: u32,
    pub flagged: bool,
}

impl ByteCount {
    #[must_use]
    pub fn from_raw(raw: u32) -> Self {
        Self {
            length: raw & !BYTE_COUNT_FLAG,
            flagged: raw & BYTE_COUNT_FLAG != 0,
        }
    }

    /// The declared length as a `usize`, for offset arithmetic.
    #[must_use]
    pub fn len(self) -> usize {
        self.length as usize
    }

    #[must_use]
    pub fn is_empty(self) -> bool {
        self.length == 0
    }
}

/// The `[byte count][version]` pair that opens every versioned record.
///
/// `start` is the offset immediately after the byte count, which is the
/// origin the declared length is measured from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RecordHeader {
    pub byte_count: ByteCount,
    pub version: u16,
    pub start: usize,
}

impl RecordHeader {
    /// Read a byte count and version tag at the cursor.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if either token is truncated.
    pub fn read_from(cursor: &mut BinaryCursor<'_>) -> Result<Self, WireError> {
        let byte_count = cursor.read_byte_count_token()?;
        let start = cursor.position();
        let version = cursor.read_version()?;
        Ok(Self {
            byte_count,
            version,
            start,
        })
    }

    /// Offset the record is declared to end at.
    #[must_use]
    pub fn end(&self) -> usize {
        self.start.saturating_add(self.byte_count.len())
    }
}
