use junoio_wire::BinaryCursor;

use crate::error::ReadError;
use crate::values::{Column, ReaderValues};

/// Scalar element types a primitive reader can decode.
///
/// All multi-byte types are big-endian on the wire; `Bool` is one byte,
/// non-zero meaning `true`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    Bool,
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    I64,
    U64,
    F32,
    F64,
}

impl ScalarType {
    /// Encoded width in bytes.
    #[must_use]
    pub fn size(self) -> usize {
        match self {
            Self::Bool | Self::I8 | Self::U8 => 1,
            Self::I16 | Self::U16 => 2,
            Self::I32 | Self::U32 | Self::F32 => 4,
            Self::I64 | Self::U64 | Self::F64 => 8,
        }
    }

    fn empty_column(self) -> Column {
        match self {
            Self::Bool => Column::Bool(Vec::new()),
            Self::I8 => Column::I8(Vec::new()),
            Self::U8 => Column::U8(Vec::new()),
            Self::I16 => Column::I16(Vec::new()),
            Self::U16 => Column::U16(Vec::new()),
            Self::I32 => Column::I32(Vec::new()),
            Self::U32 => Column::U32(Vec::new()),
            Self::I64 => Column::I64(Vec::new()),
            Self::U64 => Column::U64(Vec::new()),
            Self::F32 => Column::F32(Vec::new()),
            Self::F64 => Column::F64(Vec::new()),
        }
    }
}

/// Leaf reader for one fixed-width scalar per record.
#[derive(Clone, Debug)]
pub struct PrimitiveReader {
    ty: ScalarType,
    column: Column,
}

impl PrimitiveReader {
    #[must_use]
    pub fn new(ty: ScalarType) -> Self {
        Self {
            ty,
            column: ty.empty_column(),
        }
    }

    #[must_use]
    pub fn scalar_type(&self) -> ScalarType {
        self.ty
    }

    pub(crate) fn read(&mut self, cursor: &mut BinaryCursor<'_>) -> Result<(), ReadError> {
        match &mut self.column {
            Column::Bool(v) => v.push(cursor.read_bool()?),
            Column::I8(v) => v.push(cursor.read()?),
            Column::U8(v) => v.push(cursor.read()?),
            Column::I16(v) => v.push(cursor.read()?),
            Column::U16(v) => v.push(cursor.read()?),
            Column::I32(v) => v.push(cursor.read()?),
            Column::U32(v) => v.push(cursor.read()?),
            Column::I64(v) => v.push(cursor.read()?),
            Column::U64(v) => v.push(cursor.read()?),
            Column::F32(v) => v.push(cursor.read()?),
            Column::F64(v) => v.push(cursor.read()?),
        }
        Ok(())
    }

    pub(crate) fn rows(&self) -> usize {
        self.column.len()
    }

    pub(crate) fn truncate(&mut self, rows: usize) {
        self.column.truncate(rows);
    }

    pub(crate) fn values(&self) -> ReaderValues {
        ReaderValues::Column(self.column.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_one_value_per_call() {
        let buf = [0x00, 0x00, 0x01, 0x00, 0xFF, 0xFF, 0xFF, 0xFE];
        let mut reader = PrimitiveReader::new(ScalarType::I32);
        let mut cursor = BinaryCursor::new(&buf);
        reader.read(&mut cursor).unwrap();
        reader.read(&mut cursor).unwrap();
        assert_eq!(reader.values(), ReaderValues::Column(Column::I32(vec![256, -2])));
        assert_eq!(reader.rows(), 2);
    }

    #[test]
    fn truncated_value_not_appended() {
        let buf = [0x3F, 0xF0, 0x00];
        let mut reader = PrimitiveReader::new(ScalarType::F64);
        let mut cursor = BinaryCursor::new(&buf);
        assert!(reader.read(&mut cursor).is_err());
        assert_eq!(reader.rows(), 0);
    }

    #[test]
    fn empty_before_read() {
        let reader = PrimitiveReader::new(ScalarType::Bool);
        assert_eq!(reader.values(), ReaderValues::Column(Column::Bool(vec![])));
    }

    #[test]
    fn sizes() {
        assert_eq!(ScalarType::U16.size(), 2);
        assert_eq!(ScalarType::F32.size(), 4);
        assert_eq!(ScalarType::U64.size(), 8);
        assert_eq!(ScalarType::Bool.size(), 1);
    }
}
