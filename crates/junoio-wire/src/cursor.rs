use byteorder::{BigEndian, ByteOrder};

use crate::error::WireError;
use crate::header::{ByteCount, OBJECT_HEADER_SIZE};

/// A fixed-width value that can be decoded from the front of a byte slice.
///
/// Every multi-byte quantity in the streamer format is big-endian, so the
/// implementations below all go through [`BigEndian`]. `SIZE` is the number
/// of bytes the value occupies on the wire.
pub trait Primitive: Copy {
    const SIZE: usize;

    /// Decode from the first `SIZE` bytes of `buf`.
    ///
    /// Callers guarantee `buf.len() >= SIZE`.
    fn from_be_slice(buf: &[u8]) -> Self;
}

impl Primitive for u8 {
    const SIZE: usize = 1;

    fn from_be_slice(buf: &[u8]) -> Self {
        buf[0]
    }
}

impl Primitive for i8 {
    const SIZE: usize = 1;

    fn from_be_slice(buf: &[u8]) -> Self {
        i8::from_be_bytes([buf[0]])
    }
}

macro_rules! impl_primitive {
    ($($ty:ty => $read:ident),* $(,)?) => {
        $(
            impl Primitive for $ty {
                const SIZE: usize = std::mem::size_of::<$ty>();

                fn from_be_slice(buf: &[u8]) -> Self {
                    BigEndian::$read(buf)
                }
            }
        )*
    };
}

impl_primitive! {
    u16 => read_u16,
    i16 => read_i16,
    u32 => read_u32,
    i32 => read_i32,
    u64 => read_u64,
    i64 => read_i64,
    f32 => read_f32,
    f64 => read_f64,
}

/// Cursor over a fully materialized record buffer.
///
/// `BinaryCursor` borrows the bytes for the duration of one decode and
/// tracks a single offset into them. Every operation either succeeds and
/// advances the offset, or fails with [`WireError::OutOfBounds`] and leaves
/// the offset where it was, so `0 <= position() <= len()` always holds.
///
/// ```text
///   buf:  [ ........ consumed ........ | ....... remaining ....... ]
///         0                          pos                          len
/// ```
///
/// Besides raw fixed-width reads the cursor understands the three
/// structural tokens of the format:
///
/// ```text
/// ┌──────────────────┬─────────┬──────────────────────────────────────┐
/// │ Token            │ Size    │ Decoding                             │
/// ├──────────────────┼─────────┼──────────────────────────────────────┤
/// │ Object header    │ 16      │ skipped uninterpreted                │
/// │ Byte-count       │ 4       │ u32 BE, flag bit 0x4000_0000 removed │
/// │ Version tag      │ 2       │ u16 BE                               │
/// └──────────────────┴─────────┴──────────────────────────────────────┘
/// ```
#[derive(Clone, Debug)]
pub struct BinaryCursor<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> BinaryCursor<'a> {
    /// Create a cursor positioned at the first byte of `buf`.
    #[must_use]
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Create a cursor positioned at `pos`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if `pos > buf.len()`.
    pub fn at(buf: &'a [u8], pos: usize) -> Result<Self, WireError> {
        let mut cursor = Self::new(buf);
        cursor.seek(pos)?;
        Ok(cursor)
    }

    /// Current offset from the start of the buffer.
    #[must_use]
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Total length of the underlying buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Number of bytes left after the current offset.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    /// The unread tail of the buffer.
    #[must_use]
    pub fn remaining_bytes(&self) -> &'a [u8] {
        &self.buf[self.pos..]
    }

    /// Move the cursor to an absolute offset.
    ///
    /// Seeking backwards is allowed; seeking past the end is not.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if `pos > len()`.
    pub fn seek(&mut self, pos: usize) -> Result<(), WireError> {
        if pos > self.buf.len() {
            return Err(WireError::OutOfBounds {
                offset: self.pos,
                needed: pos.saturating_sub(self.pos),
                available: self.remaining(),
            });
        }
        self.pos = pos;
        Ok(())
    }

    /// Consume `n` bytes and return them.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than `n` bytes remain.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], WireError> {
        let end = self
            .pos
            .checked_add(n)
            .filter(|&end| end <= self.buf.len())
            .ok_or(WireError::OutOfBounds {
                offset: self.pos,
                needed: n,
                available: self.remaining(),
            })?;
        let bytes = &self.buf[self.pos..end];
        self.pos = end;
        Ok(bytes)
    }

    /// Read one big-endian fixed-width value.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than `T::SIZE` bytes
    /// remain.
    pub fn read<T: Primitive>(&mut self) -> Result<T, WireError> {
        let bytes = self.read_bytes(T::SIZE)?;
        Ok(T::from_be_slice(bytes))
    }

    /// Read a one-byte boolean; any non-zero byte is `true`.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] at end of input.
    pub fn read_bool(&mut self) -> Result<bool, WireError> {
        Ok(self.read::<u8>()? != 0)
    }

    /// Advance by `n` bytes without interpreting them.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than `n` bytes remain.
    pub fn skip(&mut self, n: usize) -> Result<(), WireError> {
        self.read_bytes(n).map(|_| ())
    }

    /// Skip one generic object header ([`OBJECT_HEADER_SIZE`] bytes).
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if the header is truncated.
    pub fn skip_object_header(&mut self) -> Result<(), WireError> {
        self.skip(OBJECT_HEADER_SIZE)
    }

    /// Read a byte-count prefix and return the declared payload length.
    ///
    /// The flag bit is masked off. Whether the declared length actually
    /// fits in the buffer is not checked here; children discover that
    /// when they run out of bytes.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_byte_count(&mut self) -> Result<u32, WireError> {
        self.read_byte_count_token().map(|bc| bc.length)
    }

    /// Read a byte-count prefix, keeping the flag bit for callers that
    /// want to validate it.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than 4 bytes remain.
    pub fn read_byte_count_token(&mut self) -> Result<ByteCount, WireError> {
        Ok(ByteCount::from_raw(self.read::<u32>()?))
    }

    /// Read the 2-byte version tag that follows a byte-count prefix.
    ///
    /// # Errors
    ///
    /// Returns [`WireError::OutOfBounds`] if fewer than 2 bytes remain.
    pub fn read_version(&mut self) -> Result<u16, WireError> {
        self.read::<u16>()
    }
}
