use junoio_wire::WireError;

/// Errors that can occur while walking a reader tree over a buffer.
///
/// Every variant is fatal for the record being decoded: the arena rolls
/// its columns back to where they were before the failed top-level read
/// and the error propagates unchanged to the caller.
///
/// ```text
///   ReadError
///   ├── Wire(WireError)        ← read/skip ran past the end (OutOfBounds)
///   ├── InvalidArgument        ← negative read_many count
///   ├── LengthMismatch         ← children consumed != declared byte count
///   ├── MissingByteCountFlag   ← strict flag check rejected a prefix
///   ├── EntryMismatch          ← entry did not end at the host offset
///   └── InvalidOffsets         ← host offsets not ascending / out of range
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ReadError {
    /// A cursor operation failed, almost always
    /// [`WireError::OutOfBounds`] on truncated input.
    #[error(transparent)]
    Wire(#[from] WireError),

    /// `read_many` was called with a negative count. This points at a
    /// caller or schema bug rather than corrupt data.
    #[error("invalid argument for {name}: read_many count {count} is negative")]
    InvalidArgument { name: String, count: i64 },

    /// The children of a length-checked record consumed a different
    /// number of bytes than its byte-count prefix declared.
    ///
    /// Both spans are measured from the byte right after the prefix.
    #[error("length mismatch in {name}: declared {expected} bytes, consumed {actual}")]
    LengthMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    /// A byte-count prefix without the count flag, rejected because
    /// `ReadOptions::require_byte_count_flag` is set.
    #[error("byte count of {name} at offset {offset} does not carry the count flag")]
    MissingByteCountFlag { name: String, offset: usize },

    /// A top-level entry did not end where the host's offsets said it
    /// would.
    #[error("entry {entry} should end at offset {expected}, reader stopped at {actual}")]
    EntryMismatch {
        entry: usize,
        expected: usize,
        actual: usize,
    },

    /// The entry offsets handed in by the host are unusable.
    #[error("invalid entry offsets: {reason}")]
    InvalidOffsets { reason: String },
}
