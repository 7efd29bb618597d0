use serde::Serialize;

/// One homogeneous numeric column.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Column {
    Bool(Vec<bool>),
    I8(Vec<i8>),
    U8(Vec<u8>),
    I16(Vec<i16>),
    U16(Vec<u16>),
    I32(Vec<i32>),
    U32(Vec<u32>),
    I64(Vec<i64>),
    U64(Vec<u64>),
    F32(Vec<f32>),
    F64(Vec<f64>),
}

macro_rules! for_each_column {
    ($column:expr, $v:ident => $body:expr) => {
        match $column {
            Column::Bool($v) => $body,
            Column::I8($v) => $body,
            Column::U8($v) => $body,
            Column::I16($v) => $body,
            Column::U16($v) => $body,
            Column::I32($v) => $body,
            Column::U32($v) => $body,
            Column::I64($v) => $body,
            Column::U64($v) => $body,
            Column::F32($v) => $body,
            Column::F64($v) => $body,
        }
    };
}

impl Column {
    #[must_use]
    pub fn len(&self) -> usize {
        for_each_column!(self, v => v.len())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn truncate(&mut self, len: usize) {
        for_each_column!(self, v => v.truncate(len));
    }
}

/// Decoded output of a reader node, shaped like the reader tree.
///
/// ```text
/// ┌───────────┬──────────────────────────────────────────────────────┐
/// │ Variant   │ Produced by                                          │
/// ├───────────┼──────────────────────────────────────────────────────┤
/// │ Column    │ primitive readers, one value per row                 │
/// │ Strings   │ string readers, `offsets` has rows + 1 entries       │
/// │ Reference │ smart-reference readers, (kind, index) in that order │
/// │ Record    │ class readers, one entry per child in schema order   │
/// │ Sequence  │ sequence readers, `offsets` has rows + 1 entries     │
/// └───────────┴──────────────────────────────────────────────────────┘
/// ```
///
/// Object-header wrappers are transparent and report their element's
/// values directly.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReaderValues {
    Column(Column),
    Strings {
        offsets: Vec<i64>,
        bytes: Vec<u8>,
    },
    Reference {
        kind: Vec<u16>,
        index: Vec<i64>,
    },
    Record(Vec<ReaderValues>),
    Sequence {
        offsets: Vec<i64>,
        element: Box<ReaderValues>,
    },
}

impl ReaderValues {
    /// Number of rows accumulated, or `None` for a record without
    /// children (which has no rows of its own to count).
    #[must_use]
    pub fn rows(&self) -> Option<usize> {
        match self {
            Self::Column(column) => Some(column.len()),
            Self::Strings { offsets, .. } | Self::Sequence { offsets, .. } => {
                Some(offsets.len().saturating_sub(1))
            }
            Self::Reference { kind, .. } => Some(kind.len()),
            Self::Record(children) => children.first().and_then(Self::rows),
        }
    }

    /// The `(kind, index)` column pair of a reference result.
    #[must_use]
    pub fn as_reference(&self) -> Option<(&[u16], &[i64])> {
        match self {
            Self::Reference { kind, index } => Some((kind.as_slice(), index.as_slice())),
            _ => None,
        }
    }

    /// Child results of a record, in schema order.
    #[must_use]
    pub fn as_record(&self) -> Option<&[ReaderValues]> {
        match self {
            Self::Record(children) => Some(children.as_slice()),
            _ => None,
        }
    }

    /// Decode a string column into owned strings, replacing invalid
    /// UTF-8 sequences.
    #[must_use]
    pub fn to_strings(&self) -> Option<Vec<String>> {
        let Self::Strings { offsets, bytes } = self else {
            return None;
        };
        let strings = offsets
            .windows(2)
            .map(|w| {
                let start = usize::try_from(w[0]).unwrap_or(0);
                let end = usize::try_from(w[1]).unwrap_or(start);
                String::from_utf8_lossy(bytes.get(start..end).unwrap_or_default()).into_owned()
            })
            .collect();
        Some(strings)
    }
}
