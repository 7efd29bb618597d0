//! Structural properties of reader trees that hold for any input.
//!
//! - A successful `read` grows every column in the subtree by one row.
//! - Memberwise `read_many(N)` on a prefix-rooted class matches N
//!   row-major reads of the object-rooted equivalent.
//! - `values()` before any read has the right shape and no rows.

use junoio_reader::{ReaderArena, ReaderId, ReaderValues, ScalarType};
use junoio_tests::{RecordWriter, TrackRow, memberwise_tracks, row_major_tracks};
use junoio_wire::BinaryCursor;

/// Row count of every leaf column under `values`, depth-first.
fn leaf_rows(values: &ReaderValues, out: &mut Vec<usize>) {
    match values {
        ReaderValues::Record(children) => {
            for child in children {
                leaf_rows(child, out);
            }
        }
        ReaderValues::Sequence { offsets, element } => {
            out.push(offsets.len() - 1);
            leaf_rows(element, out);
        }
        other => out.push(other.rows().unwrap_or(0)),
    }
}

fn track_children(arena: &mut ReaderArena) -> Vec<ReaderId> {
    vec![
        arena.add_primitive("m_pdgID", ScalarType::I32),
        arena.add_primitive("m_px", ScalarType::F64),
        arena.add_primitive("m_py", ScalarType::F64),
        arena.add_primitive("m_pz", ScalarType::F64),
    ]
}

// ── Row growth ────────────────────────────────────────────────────────────────

#[test]
fn each_read_adds_one_row_everywhere() {
    let mut arena = ReaderArena::new();
    let r = arena.add_reference("m_ref");
    let s = arena.add_string("m_name");
    let e = arena.add_primitive("m_e", ScalarType::F64);
    let inner = arena.add_prefix_class("CLHEP::Scalar", vec![e]);
    let outer = arena.add_object_class("JM::Thing", vec![r, s, inner]);

    let mut w = RecordWriter::new();
    for i in 0..4u8 {
        w.object_record(1, |w| {
            w.reference(u16::from(i), i64::from(i))
                .string(&"n".repeat(usize::from(i)))
                .prefix_record(1, |w| {
                    w.f64(f64::from(i));
                });
        });
    }
    let bytes = w.finish();
    let mut cursor = BinaryCursor::new(&bytes);

    for expected in 1..=4 {
        arena.read(outer, &mut cursor).unwrap();
        let mut rows = Vec::new();
        leaf_rows(&arena.values(outer), &mut rows);
        assert_eq!(rows, vec![expected; 3], "after read {expected}");
    }
    assert_eq!(cursor.position(), bytes.len());
}

// ── Memberwise equivalence ───────────────────────────────────────────────────

#[test]
fn memberwise_matches_row_major() {
    for n in [0usize, 1, 3, 17] {
        let rows: Vec<_> = (0..n).map(TrackRow::nth).collect();

        let mut row_major = ReaderArena::new();
        let children = track_children(&mut row_major);
        let a = row_major.add_object_class("JM::Track", children);
        let bytes = row_major_tracks(&rows);
        let mut cursor = BinaryCursor::new(&bytes);
        for _ in 0..n {
            row_major.read(a, &mut cursor).unwrap();
        }
        assert_eq!(cursor.position(), bytes.len());

        let mut memberwise = ReaderArena::new();
        let children = track_children(&mut memberwise);
        let b = memberwise.add_prefix_class("CLHEP::Track", children);
        let bytes = memberwise_tracks(&rows);
        let mut cursor = BinaryCursor::new(&bytes);
        memberwise.read_many(b, &mut cursor, i64::try_from(n).unwrap()).unwrap();
        assert_eq!(cursor.position(), bytes.len());

        assert_eq!(row_major.values(a), memberwise.values(b), "n = {n}");
    }
}

#[test]
fn memberwise_inside_sequence() {
    // vector<CLHEP::Track>: the sequence hands its count to the element,
    // which then reads memberwise
    let rows: Vec<_> = (0..5).map(TrackRow::nth).collect();
    let body = memberwise_tracks(&rows);
    let mut w = RecordWriter::new();
    w.sequence(6, 5, |w| {
        w.raw(&body);
    });
    let bytes = w.finish();

    let mut arena = ReaderArena::new();
    let children = track_children(&mut arena);
    let track = arena.add_prefix_class("CLHEP::Track", children);
    let tracks = arena.add_sequence("m_tracks", track);
    let mut cursor = BinaryCursor::new(&bytes);
    arena.read(tracks, &mut cursor).unwrap();
    assert_eq!(cursor.position(), bytes.len());

    let ReaderValues::Sequence { offsets, element } = arena.values(tracks) else {
        panic!("expected a sequence");
    };
    assert_eq!(offsets, vec![0, 5]);
    let fields = element.as_record().unwrap();
    assert_eq!(fields[0].rows(), Some(5));
    assert_eq!(
        fields[0],
        ReaderValues::Column(junoio_reader::Column::I32(vec![11, -13, 11, -13, 11]))
    );
}

// ── Shape before reading ─────────────────────────────────────────────────────

#[test]
fn empty_values_have_shape() {
    let mut arena = ReaderArena::new();
    let children = track_children(&mut arena);
    let class = arena.add_prefix_class("CLHEP::Track", children);

    let values = arena.values(class);
    let fields = values.as_record().unwrap();
    assert_eq!(fields.len(), 4);
    assert!(fields.iter().all(|f| f.rows() == Some(0)));
}

#[test]
fn arena_can_move_to_a_worker() {
    fn assert_send<T: Send>() {}
    assert_send::<ReaderArena>();

    let mut arena = ReaderArena::new();
    let x = arena.add_primitive("x", ScalarType::U8);
    let handle = std::thread::spawn(move || {
        arena.read(x, &mut BinaryCursor::new(&[42])).unwrap();
        arena.values(x)
    });
    assert_eq!(
        handle.join().unwrap(),
        ReaderValues::Column(junoio_reader::Column::U8(vec![42]))
    );
}
