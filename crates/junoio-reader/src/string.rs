use junoio_wire::BinaryCursor;

use crate::error::ReadError;
use crate::values::ReaderValues;

/// Length byte announcing that a 4-byte length follows.
const LONG_STRING_MARKER: u8 = 255;

/// Leaf reader for framework strings.
///
/// ```text
///   short:  len (u8, < 255) │ bytes [len]
///   long:   0xFF │ len (u32 BE) │ bytes [len]
/// ```
///
/// Rows are stored as one flat byte buffer plus `rows + 1` offsets.
#[derive(Clone, Debug)]
pub struct StringReader {
    offsets: Vec<i64>,
    bytes: Vec<u8>,
}

impl Default for StringReader {
    fn default() -> Self {
        Self {
            offsets: vec![0],
            bytes: Vec::new(),
        }
    }
}

impl StringReader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn read(&mut self, cursor: &mut BinaryCursor<'_>) -> Result<(), ReadError> {
        let len = match cursor.read::<u8>()? {
            LONG_STRING_MARKER => cursor.read::<u32>()? as usize,
            short => usize::from(short),
        };
        let data = cursor.read_bytes(len)?;
        self.bytes.extend_from_slice(data);
        self.offsets.push(self.bytes.len() as i64);
        Ok(())
    }

    pub(crate) fn rows(&self) -> usize {
        self.offsets.len() - 1
    }

    pub(crate) fn truncate(&mut self, rows: usize) {
        self.offsets.truncate(rows + 1);
        let end = usize::try_from(self.offsets[rows]).unwrap_or(0);
        self.bytes.truncate(end);
    }

    pub(crate) fn values(&self) -> ReaderValues {
        ReaderValues::Strings {
            offsets: self.offsets.clone(),
            bytes: self.bytes.clone(),
        }
    }
}
