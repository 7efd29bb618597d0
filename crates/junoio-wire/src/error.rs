/// Errors raised by the byte-level cursor.
///
/// The cursor never inspects semantics, so the only thing that can go
/// wrong at this layer is running off the end of the buffer. The variant
/// carries enough context to locate the failure in a hex dump.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum WireError {
    /// A read, skip or seek would move past the end of the byte sequence.
    ///
    /// `offset` is the cursor position when the operation was attempted,
    /// `needed` the number of bytes it required and `available` the
    /// number of bytes left after `offset`.
    #[error("out of bounds at offset {offset}: needed {needed} bytes, {available} available")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        available: usize,
    },
}
