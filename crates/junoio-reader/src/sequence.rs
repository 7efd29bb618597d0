use junoio_wire::BinaryCursor;
use junoio_wire::header::RecordHeader;

use crate::error::ReadError;
use crate::reader::{ReaderArena, ReaderId};

/// `[byte count][version]` wrapper around exactly one element record.
///
/// Used where the framework writes a standalone versioned header in
/// front of an element that carries no length of its own, for example
/// the smart references inside the event navigator. The wrapper owns no
/// columns; its values are its element's values.
#[derive(Clone, Debug)]
pub(crate) struct ObjectHeaderReader {
    pub(crate) element: ReaderId,
}

impl ObjectHeaderReader {
    pub(crate) fn new(element: ReaderId) -> Self {
        Self { element }
    }
}

/// Variable-length container of homogeneous elements.
///
/// ```text
///   [byte count 4][version 2][count u32] element × count
/// ```
///
/// The elements are handed to the element reader in one `read_many`
/// call, so an element type stored memberwise is decoded memberwise.
/// Rows are delimited by `offsets` (`rows + 1` entries, starting at 0)
/// into the element's columns.
#[derive(Clone, Debug)]
pub(crate) struct SequenceReader {
    pub(crate) element: ReaderId,
    offsets: Vec<i64>,
}

impl SequenceReader {
    pub(crate) fn new(element: ReaderId) -> Self {
        Self {
            element,
            offsets: vec![0],
        }
    }

    pub(crate) fn offsets(&self) -> &[i64] {
        &self.offsets
    }

    pub(crate) fn rows(&self) -> usize {
        self.offsets.len() - 1
    }

    pub(crate) fn truncate(&mut self, rows: usize) {
        self.offsets.truncate(rows + 1);
    }

    fn push(&mut self, count: i64) {
        let last = self.offsets.last().copied().unwrap_or(0);
        self.offsets.push(last + count);
    }
}

impl ReaderArena {
    pub(crate) fn read_object_header(
        &mut self,
        id: ReaderId,
        element: ReaderId,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<(), ReadError> {
        let offset = cursor.position();
        let header = RecordHeader::read_from(cursor)?;
        self.check_byte_count(id, header.byte_count, offset)?;
        self.read_node(element, cursor)?;
        self.check_length(id, &header, cursor)
    }

    pub(crate) fn read_sequence(
        &mut self,
        id: ReaderId,
        element: ReaderId,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<(), ReadError> {
        let offset = cursor.position();
        let header = RecordHeader::read_from(cursor)?;
        self.check_byte_count(id, header.byte_count, offset)?;
        let count = i64::from(cursor.read::<u32>()?);
        tracing::trace!(name = self.name(id), count, "sequence");

        self.read_many_node(element, cursor, count)?;
        self.check_length(id, &header, cursor)?;

        if let Some(sequence) = self.sequence_mut(id) {
            sequence.push(count);
        }
        Ok(())
    }
}
