use junoio_wire::BinaryCursor;
use junoio_wire::header::{PREFIX_PADDING_SIZE, RecordHeader};

use crate::error::ReadError;
use crate::reader::{ReaderArena, ReaderId};

/// Header layout of a class record.
///
/// ```text
/// ObjectRooted:  [object header 16][byte count 4][version 2] fields...
/// PrefixRooted:  [byte count 4][version 2][reserved 4]       fields...
///                              ^
///                              start: declared length counts from here
/// ```
///
/// The two shapes also differ in how they are checked and batched:
///
/// ```text
/// ┌──────────────┬─────────────────────────────┬──────────────────────────┐
/// │ Shape        │ Length assertion            │ read_many                │
/// ├──────────────┼─────────────────────────────┼──────────────────────────┤
/// │ ObjectRooted │ always                      │ one record after another │
/// │ PrefixRooted │ only with strict_prefix_len │ memberwise, per field    │
/// └──────────────┴─────────────────────────────┴──────────────────────────┘
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ClassShape {
    ObjectRooted,
    PrefixRooted,
}

/// A class record decoded by an ordered list of field readers.
#[derive(Clone, Debug)]
pub(crate) struct ClassReader {
    shape: ClassShape,
    children: Vec<ReaderId>,
}

impl ClassReader {
    pub(crate) fn new(shape: ClassShape, children: Vec<ReaderId>) -> Self {
        Self { shape, children }
    }

    pub(crate) fn shape(&self) -> ClassShape {
        self.shape
    }

    pub(crate) fn children(&self) -> &[ReaderId] {
        &self.children
    }
}

impl ReaderArena {
    /// Decode one class record: header, every field in declared order,
    /// then the length assertion where the shape (or strict mode) asks
    /// for one.
    pub(crate) fn read_class(
        &mut self,
        id: ReaderId,
        shape: ClassShape,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<(), ReadError> {
        let header = self.read_class_header(id, shape, cursor)?;
        tracing::trace!(
            name = self.name(id),
            version = header.version,
            length = header.byte_count.length,
            "class record"
        );

        for i in 0..self.children(id).len() {
            let child = self.children(id)[i];
            self.read_node(child, cursor)?;
        }

        // Prefix-rooted fields are trusted to be exact unless strict.
        if shape == ClassShape::ObjectRooted || self.options().strict_prefix_length {
            self.check_length(id, &header, cursor)?;
        }
        Ok(())
    }

    fn read_class_header(
        &self,
        id: ReaderId,
        shape: ClassShape,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<RecordHeader, ReadError> {
        if shape == ClassShape::ObjectRooted {
            cursor.skip_object_header()?;
        }
        let offset = cursor.position();
        let header = RecordHeader::read_from(cursor)?;
        self.check_byte_count(id, header.byte_count, offset)?;
        if shape == ClassShape::PrefixRooted {
            cursor.skip(PREFIX_PADDING_SIZE)?;
        }
        Ok(header)
    }

    /// Memberwise batch of a prefix-rooted class: no per-instance header,
    /// each field reads all `count` of its values before the next field
    /// starts.
    pub(crate) fn read_class_memberwise(
        &mut self,
        id: ReaderId,
        cursor: &mut BinaryCursor<'_>,
        count: i64,
    ) -> Result<(), ReadError> {
        tracing::trace!(name = self.name(id), count, "memberwise class block");
        for i in 0..self.children(id).len() {
            let child = self.children(id)[i];
            self.read_many_node(child, cursor, count)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::options::ReadOptions;
    use crate::primitive::ScalarType;
    use crate::values::{Column, ReaderValues};
    use junoio_wire::WireError;
    use junoio_wire::header::BYTE_COUNT_FLAG;

    fn reference(kind: u16, index: i64) -> Vec<u8> {
        let mut buf = vec![0u8; 16];
        buf.extend_from_slice(&kind.to_be_bytes());
        buf.extend_from_slice(&index.to_be_bytes());
        buf
    }

    /// `[byte count][version][reserved]` around `body`.
    fn prefix_record(body: &[u8]) -> Vec<u8> {
        let len = u32::try_from(2 + 4 + body.len()).unwrap();
        let mut buf = (BYTE_COUNT_FLAG | len).to_be_bytes().to_vec();
        buf.extend_from_slice(&1u16.to_be_bytes());
        buf.extend_from_slice(&[0; 4]);
        buf.extend_from_slice(body);
        buf
    }

    /// `[object header][byte count][version]` around `body`, with the
    /// declared length adjusted by `skew`.
    fn object_record(body: &[u8], skew: i64) -> Vec<u8> {
        let len = u32::try_from(2 + body.len() as i64 + skew).unwrap();
        let mut buf = vec![0u8; 16];
        buf.extend_from_slice(&(BYTE_COUNT_FLAG | len).to_be_bytes());
        buf.extend_from_slice(&4u16.to_be_bytes());
        buf.extend_from_slice(body);
        buf
    }

    fn two_reference_arena(shape: ClassShape) -> (ReaderArena, ReaderId) {
        let mut arena = ReaderArena::new();
        let a = arena.add_reference("m_a");
        let b = arena.add_reference("m_b");
        let class = arena.add_class("JM::Pair", shape, vec![a, b]);
        (arena, class)
    }

    #[test]
    fn prefix_rooted_two_references() {
        let mut body = reference(1, 10);
        body.extend(reference(2, 20));
        let buf = prefix_record(&body);

        let (mut arena, class) = two_reference_arena(ClassShape::PrefixRooted);
        let mut cursor = BinaryCursor::new(&buf);
        arena.read(class, &mut cursor).unwrap();

        assert_eq!(cursor.position(), buf.len());
        assert_eq!(
            arena.values(class),
            ReaderValues::Record(vec![
                ReaderValues::Reference {
                    kind: vec![1],
                    index: vec![10],
                },
                ReaderValues::Reference {
                    kind: vec![2],
                    index: vec![20],
                },
            ])
        );
    }

    #[test]
    fn object_rooted_exact_length() {
        let mut body = reference(5, 50);
        body.extend(reference(6, 60));
        let buf = object_record(&body, 0);

        let (mut arena, class) = two_reference_arena(ClassShape::ObjectRooted);
        let mut cursor = BinaryCursor::new(&buf);
        arena.read(class, &mut cursor).unwrap();
        assert_eq!(cursor.position(), buf.len());
        assert_eq!(arena.values(class).rows(), Some(1));
    }

    #[test]
    fn object_rooted_length_mismatch_names_record() {
        let mut body = reference(5, 50);
        body.extend(reference(6, 60));
        let mut buf = object_record(&body, 1);
        buf.push(0);

        let (mut arena, class) = two_reference_arena(ClassShape::ObjectRooted);
        let err = arena.read(class, &mut BinaryCursor::new(&buf)).unwrap_err();
        match err {
            ReadError::LengthMismatch {
                name,
                expected,
                actual,
            } => {
                assert_eq!(name, "JM::Pair");
                assert_eq!(expected, 2 + body.len() + 1);
                assert_eq!(actual, 2 + body.len());
            }
            other => panic!("expected LengthMismatch, got {other:?}"),
        }
        // rolled back: the failed record left no rows behind
        assert_eq!(arena.values(class).rows(), Some(0));
    }

    #[test]
    fn prefix_rooted_tolerates_wrong_length_by_default() {
        let body = reference(1, 1);
        let mut buf = prefix_record(&body);
        buf[3] += 3;

        let mut arena = ReaderArena::new();
        let r = arena.add_reference("m_r");
        let class = arena.add_prefix_class("CLHEP::Thing", vec![r]);
        arena.read(class, &mut BinaryCursor::new(&buf)).unwrap();
        assert_eq!(arena.values(class).rows(), Some(1));
    }

    #[test]
    fn prefix_rooted_strict_mode_checks_length() {
        let body = reference(1, 1);
        let mut buf = prefix_record(&body);
        buf[3] += 3;

        let mut arena = ReaderArena::with_options(ReadOptions {
            strict_prefix_length: true,
            ..ReadOptions::default()
        });
        let r = arena.add_reference("m_r");
        let class = arena.add_prefix_class("CLHEP::Thing", vec![r]);
        let err = arena.read(class, &mut BinaryCursor::new(&buf)).unwrap_err();
        assert!(matches!(
            err,
            ReadError::LengthMismatch { ref name, .. } if name == "CLHEP::Thing"
        ));
    }

    #[test]
    fn missing_flag_rejected_when_required() {
        let body = 9i32.to_be_bytes();
        let mut buf = prefix_record(&body);
        buf[0] &= 0xBF;

        let mut arena = ReaderArena::with_options(ReadOptions::strict());
        let x = arena.add_primitive("m_x", ScalarType::I32);
        let class = arena.add_prefix_class("CLHEP::Thing", vec![x]);
        let err = arena.read(class, &mut BinaryCursor::new(&buf)).unwrap_err();
        assert!(matches!(
            err,
            ReadError::MissingByteCountFlag { offset: 0, .. }
        ));

        arena.set_options(ReadOptions::default());
        arena.read(class, &mut BinaryCursor::new(&buf)).unwrap();
        assert_eq!(
            arena.values(class),
            ReaderValues::Record(vec![ReaderValues::Column(Column::I32(vec![9]))])
        );
    }

    #[test]
    fn memberwise_reads_field_by_field() {
        let mut arena = ReaderArena::new();
        let x = arena.add_primitive("m_x", ScalarType::I16);
        let y = arena.add_primitive("m_y", ScalarType::U8);
        let class = arena.add_prefix_class("CLHEP::Hep2Vector", vec![x, y]);

        // all three x values, then all three y values
        let buf = [0x00, 0x01, 0x00, 0x02, 0x00, 0x03, 0x0A, 0x0B, 0x0C];
        let mut cursor = BinaryCursor::new(&buf);
        arena.read_many(class, &mut cursor, 3).unwrap();

        assert_eq!(cursor.position(), buf.len());
        assert_eq!(
            arena.values(class),
            ReaderValues::Record(vec![
                ReaderValues::Column(Column::I16(vec![1, 2, 3])),
                ReaderValues::Column(Column::U8(vec![10, 11, 12])),
            ])
        );
    }

    #[test]
    fn object_rooted_read_many_is_row_major() {
        let mut arena = ReaderArena::new();
        let x = arena.add_primitive("m_x", ScalarType::U8);
        let class = arena.add_object_class("JM::Tiny", vec![x]);

        let mut buf = object_record(&[7], 0);
        buf.extend(object_record(&[8], 0));
        let mut cursor = BinaryCursor::new(&buf);
        arena.read_many(class, &mut cursor, 2).unwrap();
        assert_eq!(
            arena.values(class),
            ReaderValues::Record(vec![ReaderValues::Column(Column::U8(vec![7, 8]))])
        );
    }

    #[test]
    fn truncated_record_is_out_of_bounds() {
        let mut body = reference(1, 10);
        body.extend(reference(2, 20));
        let buf = prefix_record(&body);
        let truncated = &buf[..buf.len() - 5];

        let (mut arena, class) = two_reference_arena(ClassShape::PrefixRooted);
        let err = arena.read(class, &mut BinaryCursor::new(truncated)).unwrap_err();
        assert!(matches!(err, ReadError::Wire(WireError::OutOfBounds { .. })));
        // the first child had already appended; rollback removed it
        let values = arena.values(class);
        assert_eq!(values.as_record().unwrap()[0].rows(), Some(0));
    }
}
