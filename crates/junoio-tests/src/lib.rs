//! Fixture writer for the integration tests and benches.
//!
//! Nothing in the workspace writes the streamer format, so tests build
//! their inputs with [`RecordWriter`]: a big-endian byte builder that
//! knows the structural tokens and back-patches byte counts once a
//! record's body has been written.
//!
//! ```text
//!   object_record:  [object header 16][count 4][version 2] body
//!   prefix_record:  [count 4][version 2][reserved 4]       body
//!   counted:        [count 4][version 2]                   body
//!   sequence:       [count 4][version 2][n u32]            body
//!                    ^ flag | bytes after the count field
//! ```

use byteorder::{BigEndian, ByteOrder, WriteBytesExt};
use junoio_wire::header::{BYTE_COUNT_FLAG, OBJECT_HEADER_SIZE, PREFIX_PADDING_SIZE};

/// Big-endian builder for streamer fixtures.
///
/// Scalar writers return `&mut Self` for chaining; record writers take
/// a closure that writes the body. Being test tooling, it panics on
/// fixtures too large for a byte count.
#[derive(Debug, Default)]
pub struct RecordWriter {
    buf: Vec<u8>,
    next_skew: i64,
    next_unflagged: bool,
}

impl RecordWriter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes written so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    #[must_use]
    pub fn finish(self) -> Vec<u8> {
        self.buf
    }

    // ── Scalars ──────────────────────────────────────────────────────────

    pub fn bool(&mut self, v: bool) -> &mut Self {
        self.buf.push(u8::from(v));
        self
    }

    pub fn u8(&mut self, v: u8) -> &mut Self {
        self.buf.push(v);
        self
    }

    pub fn i16(&mut self, v: i16) -> &mut Self {
        let _ = self.buf.write_i16::<BigEndian>(v);
        self
    }

    pub fn u16(&mut self, v: u16) -> &mut Self {
        let _ = self.buf.write_u16::<BigEndian>(v);
        self
    }

    pub fn i32(&mut self, v: i32) -> &mut Self {
        let _ = self.buf.write_i32::<BigEndian>(v);
        self
    }

    pub fn u32(&mut self, v: u32) -> &mut Self {
        let _ = self.buf.write_u32::<BigEndian>(v);
        self
    }

    pub fn i64(&mut self, v: i64) -> &mut Self {
        let _ = self.buf.write_i64::<BigEndian>(v);
        self
    }

    pub fn f32(&mut self, v: f32) -> &mut Self {
        let _ = self.buf.write_f32::<BigEndian>(v);
        self
    }

    pub fn f64(&mut self, v: f64) -> &mut Self {
        let _ = self.buf.write_f64::<BigEndian>(v);
        self
    }

    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.buf.extend_from_slice(bytes);
        self
    }

    // ── Structural tokens ────────────────────────────────────────────────

    /// Sixteen zero bytes.
    pub fn object_header(&mut self) -> &mut Self {
        self.buf.extend_from_slice(&[0; OBJECT_HEADER_SIZE]);
        self
    }

    /// A smart reference: object header, kind, index.
    pub fn reference(&mut self, kind: u16, index: i64) -> &mut Self {
        self.object_header().u16(kind).i64(index)
    }

    /// A ROOT string: one length byte, or 255 and a `u32` length.
    ///
    /// # Panics
    ///
    /// Panics if `s` is longer than `u32::MAX` bytes.
    pub fn string(&mut self, s: &str) -> &mut Self {
        match u8::try_from(s.len()) {
            Ok(n) if n < 255 => {
                self.u8(n);
            }
            _ => {
                let n = u32::try_from(s.len()).expect("fixture string too long");
                self.u8(255).u32(n);
            }
        }
        self.raw(s.as_bytes())
    }

    // ── Records ──────────────────────────────────────────────────────────

    /// Make the next record declare `delta` more bytes than it holds.
    pub fn skew_next_length(&mut self, delta: i64) -> &mut Self {
        self.next_skew = delta;
        self
    }

    /// Write the next record's byte count without the flag bit.
    pub fn clear_next_flag(&mut self) -> &mut Self {
        self.next_unflagged = true;
        self
    }

    /// `[object header][byte count][version]` + body.
    pub fn object_record(&mut self, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.object_header();
        self.counted_with(version, body)
    }

    /// `[byte count][version][4 reserved]` + body.
    pub fn prefix_record(&mut self, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.counted_with(version, |w| {
            w.raw(&[0; PREFIX_PADDING_SIZE]);
            body(w);
        })
    }

    /// `[byte count][version]` + body.
    pub fn counted(&mut self, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.counted_with(version, body)
    }

    /// `[byte count][version][count u32]` + body.
    pub fn sequence(&mut self, version: u16, count: u32, body: impl FnOnce(&mut Self)) -> &mut Self {
        self.counted_with(version, |w| {
            w.u32(count);
            body(w);
        })
    }

    fn counted_with(&mut self, version: u16, body: impl FnOnce(&mut Self)) -> &mut Self {
        let skew = std::mem::take(&mut self.next_skew);
        let unflagged = std::mem::take(&mut self.next_unflagged);

        let at = self.buf.len();
        self.u32(0).u16(version);
        body(self);

        let written = i64::try_from(self.buf.len() - at - 4).expect("fixture too large");
        let declared = u32::try_from(written + skew).expect("skew makes length negative");
        let raw = if unflagged {
            declared
        } else {
            declared | BYTE_COUNT_FLAG
        };
        BigEndian::write_u32(&mut self.buf[at..at + 4], raw);
        self
    }
}

/// A synthetic `JM::SimTrack`-like row used by the benches and the
/// memberwise tests: one small integer and three doubles.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrackRow {
    pub pdg: i32,
    pub px: f64,
    pub py: f64,
    pub pz: f64,
}

impl TrackRow {
    /// Deterministic row `i`.
    #[must_use]
    pub fn nth(i: usize) -> Self {
        let x = f64::from(u32::try_from(i % 1000).unwrap_or(0));
        Self {
            pdg: if i % 2 == 0 { 11 } else { -13 },
            px: x,
            py: x * 0.5,
            pz: -x,
        }
    }
}

/// `rows` object-rooted records one after another (row-major).
#[must_use]
pub fn row_major_tracks(rows: &[TrackRow]) -> Vec<u8> {
    let mut w = RecordWriter::new();
    for row in rows {
        w.object_record(1, |w| {
            w.i32(row.pdg).f64(row.px).f64(row.py).f64(row.pz);
        });
    }
    w.finish()
}

/// The same rows laid out memberwise: all `pdg`, then all `px`, ...
#[must_use]
pub fn memberwise_tracks(rows: &[TrackRow]) -> Vec<u8> {
    let mut w = RecordWriter::new();
    for row in rows {
        w.i32(row.pdg);
    }
    for row in rows {
        w.f64(row.px);
    }
    for row in rows {
        w.f64(row.py);
    }
    for row in rows {
        w.f64(row.pz);
    }
    w.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn byte_count_is_back_patched() {
        let mut w = RecordWriter::new();
        w.object_record(3, |w| {
            w.u8(0xAB);
        });
        let bytes = w.finish();
        assert_eq!(bytes.len(), 16 + 4 + 2 + 1);
        assert_eq!(&bytes[16..20], &(BYTE_COUNT_FLAG | 3).to_be_bytes());
        assert_eq!(&bytes[20..22], &[0, 3]);
    }

    #[test]
    fn skew_and_flag_apply_to_next_record_only() {
        let mut w = RecordWriter::new();
        w.skew_next_length(2).clear_next_flag().counted(1, |w| {
            w.counted(1, |_| {});
        });
        let bytes = w.finish();
        // outer: 2 + inner(6) = 8, skewed to 10, no flag
        assert_eq!(&bytes[0..4], &10u32.to_be_bytes());
        // inner: version only, flagged, unskewed
        assert_eq!(&bytes[6..10], &(BYTE_COUNT_FLAG | 2).to_be_bytes());
    }

    #[test]
    fn long_strings_use_escape() {
        let mut w = RecordWriter::new();
        w.string(&"x".repeat(300));
        let bytes = w.finish();
        assert_eq!(bytes[0], 255);
        assert_eq!(&bytes[1..5], &300u32.to_be_bytes());
        assert_eq!(bytes.len(), 5 + 300);
    }
}
