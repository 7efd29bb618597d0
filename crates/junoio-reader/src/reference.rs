use junoio_wire::BinaryCursor;

use crate::error::ReadError;
use crate::values::ReaderValues;

/// Leaf reader for smart-reference fields.
///
/// A smart reference points at an object stored elsewhere in the dataset
/// by a small discriminant and an entry index:
///
/// ```text
/// ┌──────────────────────┬──────────┬──────────────────────────────┐
/// │ Field                │ Size     │ Decoding                     │
/// ├──────────────────────┼──────────┼──────────────────────────────┤
/// │ object header        │ 16 bytes │ skipped                      │
/// │ kind                 │ 2 bytes  │ u16 BE → `kind` column       │
/// │ index                │ 8 bytes  │ i64 BE → `index` column      │
/// └──────────────────────┴──────────┴──────────────────────────────┘
/// ```
///
/// Both columns always have the same length: the whole reference is
/// decoded before either column is touched.
#[derive(Clone, Debug, Default)]
pub struct ReferenceReader {
    kind: Vec<u16>,
    index: Vec<i64>,
}

impl ReferenceReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&mut self, cursor: &mut BinaryCursor<'_>) -> Result<(), ReadError> {
        cursor.skip_object_header()?;
        let kind = cursor.read::<u16>()?;
        let index = cursor.read::<i64>()?;
        self.kind.push(kind);
        self.index.push(index);
        Ok(())
    }

    pub(crate) fn rows(&self) -> usize {
        self.kind.len()
    }

    pub(crate) fn truncate(&mut self, rows: usize) {
        self.kind.truncate(rows);
        self.index.truncate(rows);
    }

    /// `(kind, index)`, in that order.
    pub(crate) fn values(&self) -> ReaderValues {
        ReaderValues::Reference {
            kind: self.kind.clone(),
            index: self.index.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_bytes(kind: u16, index: i64) -> Vec<u8> {
        let mut buf = vec![0u8; 16];
        buf.extend_from_slice(&kind.to_be_bytes());
        buf.extend_from_slice(&index.to_be_bytes());
        buf
    }

    #[test]
    fn decodes_kind_then_index() {
        let buf = hex::decode(concat!(
            "00000000000000000000000000000000",
            "0007",
            "0000000000000042",
        ))
        .unwrap();
        let mut reader = ReferenceReader::new();
        let mut cursor = BinaryCursor::new(&buf);
        reader.read(&mut cursor).unwrap();

        assert_eq!(cursor.position(), 26);
        assert_eq!(
            reader.values(),
            ReaderValues::Reference {
                kind: vec![7],
                index: vec![66],
            }
        );
    }

    #[test]
    fn negative_index() {
        let buf = reference_bytes(1, -1);
        let mut reader = ReferenceReader::new();
        reader.read(&mut BinaryCursor::new(&buf)).unwrap();
        let values = reader.values();
        let (kind, index) = values.as_reference().unwrap();
        assert_eq!(kind, &[1]);
        assert_eq!(index, &[-1]);
    }

    #[test]
    fn truncated_index_leaves_columns_equal() {
        let mut buf = reference_bytes(3, 9);
        buf.truncate(buf.len() - 1);
        let mut reader = ReferenceReader::new();
        assert!(reader.read(&mut BinaryCursor::new(&buf)).is_err());
        assert_eq!(reader.rows(), 0);
        assert_eq!(
            reader.values(),
            ReaderValues::Reference {
                kind: vec![],
                index: vec![],
            }
        );
    }
}
