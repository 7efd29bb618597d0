use junoio_wire::header::RecordHeader;
use junoio_wire::{BinaryCursor, ByteCount};

use crate::composite::{ClassReader, ClassShape};
use crate::error::ReadError;
use crate::options::ReadOptions;
use crate::primitive::{PrimitiveReader, ScalarType};
use crate::reference::ReferenceReader;
use crate::sequence::{ObjectHeaderReader, SequenceReader};
use crate::string::StringReader;
use crate::values::ReaderValues;

/// Handle to a reader node inside a [`ReaderArena`].
///
/// Handles are only meaningful for the arena that issued them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ReaderId(usize);

impl ReaderId {
    /// Position of the node in its arena.
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// The closed set of reader variants.
#[derive(Clone, Debug)]
pub(crate) enum ReaderKind {
    Primitive(PrimitiveReader),
    String(StringReader),
    Reference(ReferenceReader),
    Class(ClassReader),
    ObjectHeader(ObjectHeaderReader),
    Sequence(SequenceReader),
}

/// Public summary of what a node is, for callers walking the tree.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NodeKind {
    Primitive(ScalarType),
    String,
    Reference,
    Class(ClassShape),
    ObjectHeader,
    Sequence,
}

#[derive(Clone, Debug)]
struct ReaderNode {
    name: String,
    kind: ReaderKind,
}

impl ReaderNode {
    /// Rows held in this node's own columns. Structural nodes that only
    /// delegate to children report 0.
    fn rows(&self) -> usize {
        match &self.kind {
            ReaderKind::Primitive(r) => r.rows(),
            ReaderKind::String(r) => r.rows(),
            ReaderKind::Reference(r) => r.rows(),
            ReaderKind::Sequence(r) => r.rows(),
            ReaderKind::Class(_) | ReaderKind::ObjectHeader(_) => 0,
        }
    }

    fn truncate(&mut self, rows: usize) {
        match &mut self.kind {
            ReaderKind::Primitive(r) => r.truncate(rows),
            ReaderKind::String(r) => r.truncate(rows),
            ReaderKind::Reference(r) => r.truncate(rows),
            ReaderKind::Sequence(r) => r.truncate(rows),
            ReaderKind::Class(_) | ReaderKind::ObjectHeader(_) => {}
        }
    }
}

/// Owner of a reader tree.
///
/// Nodes are appended bottom-up: a composite is built from handles that
/// already exist, so the arena can never contain a cycle. A handle may be
/// listed under several parents; the shared node then accumulates rows
/// from each of them.
///
/// ```text
///   ReaderArena
///   ├── #0 Reference "m_ref"
///   ├── #1 Primitive "m_x" (f64)
///   ├── #2 Class(PrefixRooted) "m_pos"   children [#1]
///   └── #3 Class(ObjectRooted) "JM::Hit" children [#0, #2]
/// ```
///
/// The public [`read`](Self::read) and [`read_many`](Self::read_many)
/// entry points are transactional: if decoding fails anywhere in the
/// tree, every column in the arena is truncated back to its length
/// before the call, so no half-decoded row is ever observable.
///
/// One arena has exactly one writer. To decode in parallel, build one
/// arena per worker.
#[derive(Clone, Debug, Default)]
pub struct ReaderArena {
    nodes: Vec<ReaderNode>,
    options: ReadOptions,
}

impl ReaderArena {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_options(options: ReadOptions) -> Self {
        Self {
            nodes: Vec::new(),
            options,
        }
    }

    #[must_use]
    pub fn options(&self) -> ReadOptions {
        self.options
    }

    pub fn set_options(&mut self, options: ReadOptions) {
        self.options = options;
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ── Construction ─────────────────────────────────────────────────────

    fn push(&mut self, name: impl Into<String>, kind: ReaderKind) -> ReaderId {
        let id = ReaderId(self.nodes.len());
        self.nodes.push(ReaderNode {
            name: name.into(),
            kind,
        });
        id
    }

    fn assert_known(&self, ids: &[ReaderId]) {
        assert!(
            ids.iter().all(|id| id.0 < self.nodes.len()),
            "child handle does not belong to this arena"
        );
    }

    pub fn add_primitive(&mut self, name: impl Into<String>, ty: ScalarType) -> ReaderId {
        self.push(name, ReaderKind::Primitive(PrimitiveReader::new(ty)))
    }

    pub fn add_string(&mut self, name: impl Into<String>) -> ReaderId {
        self.push(name, ReaderKind::String(StringReader::new()))
    }

    pub fn add_reference(&mut self, name: impl Into<String>) -> ReaderId {
        self.push(name, ReaderKind::Reference(ReferenceReader::new()))
    }

    /// Add a class reader with the given header shape.
    ///
    /// # Panics
    ///
    /// Panics if a child handle was not issued by this arena.
    pub fn add_class(
        &mut self,
        name: impl Into<String>,
        shape: ClassShape,
        children: Vec<ReaderId>,
    ) -> ReaderId {
        self.assert_known(&children);
        self.push(name, ReaderKind::Class(ClassReader::new(shape, children)))
    }

    /// Object-rooted class: `[object header][byte count][version]`, length
    /// always asserted.
    ///
    /// # Panics
    ///
    /// Panics if a child handle was not issued by this arena.
    pub fn add_object_class(
        &mut self,
        name: impl Into<String>,
        children: Vec<ReaderId>,
    ) -> ReaderId {
        self.add_class(name, ClassShape::ObjectRooted, children)
    }

    /// Prefix-rooted class: `[byte count][version][4 reserved]`, decoded
    /// memberwise by `read_many`.
    ///
    /// # Panics
    ///
    /// Panics if a child handle was not issued by this arena.
    pub fn add_prefix_class(
        &mut self,
        name: impl Into<String>,
        children: Vec<ReaderId>,
    ) -> ReaderId {
        self.add_class(name, ClassShape::PrefixRooted, children)
    }

    /// # Panics
    ///
    /// Panics if `element` was not issued by this arena.
    pub fn add_object_header(&mut self, name: impl Into<String>, element: ReaderId) -> ReaderId {
        self.assert_known(&[element]);
        self.push(name, ReaderKind::ObjectHeader(ObjectHeaderReader::new(element)))
    }

    /// # Panics
    ///
    /// Panics if `element` was not issued by this arena.
    pub fn add_sequence(&mut self, name: impl Into<String>, element: ReaderId) -> ReaderId {
        self.assert_known(&[element]);
        self.push(name, ReaderKind::Sequence(SequenceReader::new(element)))
    }

    // ── Inspection ───────────────────────────────────────────────────────

    /// Diagnostic name of a node.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn name(&self, id: ReaderId) -> &str {
        &self.nodes[id.0].name
    }

    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn kind(&self, id: ReaderId) -> NodeKind {
        match &self.nodes[id.0].kind {
            ReaderKind::Primitive(r) => NodeKind::Primitive(r.scalar_type()),
            ReaderKind::String(_) => NodeKind::String,
            ReaderKind::Reference(_) => NodeKind::Reference,
            ReaderKind::Class(c) => NodeKind::Class(c.shape()),
            ReaderKind::ObjectHeader(_) => NodeKind::ObjectHeader,
            ReaderKind::Sequence(_) => NodeKind::Sequence,
        }
    }

    /// Ordered child handles: the fields of a class, or the single element
    /// of a wrapper or sequence. Leaves have none.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn children(&self, id: ReaderId) -> &[ReaderId] {
        match &self.nodes[id.0].kind {
            ReaderKind::Class(c) => c.children(),
            ReaderKind::ObjectHeader(w) => std::slice::from_ref(&w.element),
            ReaderKind::Sequence(s) => std::slice::from_ref(&s.element),
            ReaderKind::Primitive(_) | ReaderKind::String(_) | ReaderKind::Reference(_) => &[],
        }
    }

    /// Everything decoded so far under `id`, shaped like the tree.
    ///
    /// Pure: calling it mid-decode or before any read is fine and yields
    /// empty columns of the right shape.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    #[must_use]
    pub fn values(&self, id: ReaderId) -> ReaderValues {
        match &self.nodes[id.0].kind {
            ReaderKind::Primitive(r) => r.values(),
            ReaderKind::String(r) => r.values(),
            ReaderKind::Reference(r) => r.values(),
            ReaderKind::Class(c) => {
                ReaderValues::Record(c.children().iter().map(|&child| self.values(child)).collect())
            }
            ReaderKind::ObjectHeader(w) => self.values(w.element),
            ReaderKind::Sequence(s) => ReaderValues::Sequence {
                offsets: s.offsets().to_vec(),
                element: Box::new(self.values(s.element)),
            },
        }
    }

    // ── Decoding ─────────────────────────────────────────────────────────

    /// Decode one record with the reader `id`, leaving the cursor on the
    /// first byte after it.
    ///
    /// # Errors
    ///
    /// Any [`ReadError`] raised in the subtree. On error every column in
    /// the arena is restored to its length before the call.
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn read(&mut self, id: ReaderId, cursor: &mut BinaryCursor<'_>) -> Result<(), ReadError> {
        let marks = self.marks();
        let result = self.read_node(id, cursor);
        if result.is_err() {
            self.rewind(&marks);
        }
        result
    }

    /// Decode `count` contiguous records with the reader `id`.
    ///
    /// Prefix-rooted classes read these memberwise (all values of the
    /// first field, then all values of the second, ...). Every other
    /// reader reads `count` records one after another.
    ///
    /// # Errors
    ///
    /// [`ReadError::InvalidArgument`] for a negative count, otherwise any
    /// error raised in the subtree. Columns are rolled back as in
    /// [`read`](Self::read).
    ///
    /// # Panics
    ///
    /// Panics if `id` was not issued by this arena.
    pub fn read_many(
        &mut self,
        id: ReaderId,
        cursor: &mut BinaryCursor<'_>,
        count: i64,
    ) -> Result<(), ReadError> {
        let marks = self.marks();
        let result = self.read_many_node(id, cursor, count);
        if result.is_err() {
            self.rewind(&marks);
        }
        result
    }

    pub(crate) fn read_node(
        &mut self,
        id: ReaderId,
        cursor: &mut BinaryCursor<'_>,
    ) -> Result<(), ReadError> {
        match &mut self.nodes[id.0].kind {
            ReaderKind::Primitive(r) => r.read(cursor),
            ReaderKind::String(r) => r.read(cursor),
            ReaderKind::Reference(r) => r.read(cursor),
            ReaderKind::Class(c) => {
                let shape = c.shape();
                self.read_class(id, shape, cursor)
            }
            ReaderKind::ObjectHeader(w) => {
                let element = w.element;
                self.read_object_header(id, element, cursor)
            }
            ReaderKind::Sequence(s) => {
                let element = s.element;
                self.read_sequence(id, element, cursor)
            }
        }
    }

    pub(crate) fn read_many_node(
        &mut self,
        id: ReaderId,
        cursor: &mut BinaryCursor<'_>,
        count: i64,
    ) -> Result<(), ReadError> {
        if count < 0 {
            return Err(ReadError::InvalidArgument {
                name: self.name(id).to_owned(),
                count,
            });
        }
        if let ReaderKind::Class(c) = &self.nodes[id.0].kind
            && c.shape() == ClassShape::PrefixRooted
        {
            return self.read_class_memberwise(id, cursor, count);
        }
        for _ in 0..count {
            self.read_node(id, cursor)?;
        }
        Ok(())
    }

    pub(crate) fn sequence_mut(&mut self, id: ReaderId) -> Option<&mut SequenceReader> {
        match &mut self.nodes[id.0].kind {
            ReaderKind::Sequence(s) => Some(s),
            _ => None,
        }
    }

    // ── Shared header checks ─────────────────────────────────────────────

    /// Enforce `require_byte_count_flag` for a prefix read at `offset`.
    pub(crate) fn check_byte_count(
        &self,
        id: ReaderId,
        byte_count: ByteCount,
        offset: usize,
    ) -> Result<(), ReadError> {
        if self.options.require_byte_count_flag && !byte_count.flagged {
            tracing::debug!(name = self.name(id), offset, "byte count without flag");
            return Err(ReadError::MissingByteCountFlag {
                name: self.name(id).to_owned(),
                offset,
            });
        }
        Ok(())
    }

    /// Assert that the cursor sits exactly on the record's declared end.
    pub(crate) fn check_length(
        &self,
        id: ReaderId,
        header: &RecordHeader,
        cursor: &BinaryCursor<'_>,
    ) -> Result<(), ReadError> {
        if cursor.position() != header.end() {
            let actual = cursor.position() - header.start;
            tracing::debug!(
                name = self.name(id),
                expected = header.byte_count.len(),
                actual,
                "record length mismatch"
            );
            return Err(ReadError::LengthMismatch {
                name: self.name(id).to_owned(),
                expected: header.byte_count.len(),
                actual,
            });
        }
        Ok(())
    }

    // ── Rollback ─────────────────────────────────────────────────────────

    pub(crate) fn marks(&self) -> Vec<usize> {
        self.nodes.iter().map(ReaderNode::rows).collect()
    }

    pub(crate) fn rewind(&mut self, marks: &[usize]) {
        for (node, &rows) in self.nodes.iter_mut().zip(marks) {
            node.truncate(rows);
        }
    }
}
