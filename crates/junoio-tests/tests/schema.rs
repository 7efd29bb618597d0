//! End-to-end tests: a JSON class description is turned into a reader
//! tree by the default registry and run over fixture entries.

use insta::assert_snapshot;
use junoio_reader::{NodeKind, ReaderArena, ReaderId, ReaderValues, read_entries};
use junoio_schema::{
    MemberInfo, NAVIGATOR_REFS_PATH, ReaderRegistry, SchemaDescription, SchemaError,
};
use junoio_tests::RecordWriter;

const DESCRIPTION: &str = r#"{
  "classes": {
    "JM::SimEvt": [
      {"name": "m_nTrack", "type": "Int_t"},
      {"name": "m_tracks", "type": "vector<JM::SimTrack*>"}
    ],
    "JM::SimTrack": [
      {"name": "m_pdgID", "type": "Int_t"},
      {"name": "m_mom", "type": "CLHEP::Hep3Vector"},
      {"name": "m_creator", "type": "TString"}
    ],
    "CLHEP::Hep3Vector": [
      {"name": "dx", "type": "double"},
      {"name": "dy", "type": "double"},
      {"name": "dz", "type": "double"}
    ],
    "JM::EvtNavigator": [
      {"name": "m_refs", "type": "vector<JM::SmartRef>"}
    ]
  }
}"#;

fn build(root: &MemberInfo, path: &str) -> Result<(ReaderArena, ReaderId), SchemaError> {
    let description = SchemaDescription::from_json(DESCRIPTION)?;
    let mut arena = ReaderArena::new();
    let id = ReaderRegistry::with_defaults().build(&mut arena, &description, root, path)?;
    Ok((arena, id))
}

fn json(values: &ReaderValues) -> String {
    serde_json::to_string(values).unwrap()
}

fn sim_track(w: &mut RecordWriter, pdg: i32, mom: [f64; 3], creator: &str) {
    w.object_record(1, |w| {
        w.i32(pdg)
            .prefix_record(1, |w| {
                w.f64(mom[0]).f64(mom[1]).f64(mom[2]);
            })
            .string(creator);
    });
}

#[test]
fn sim_event_entries() {
    let root = MemberInfo::new("SimEvt", "JM::SimEvt");
    let (mut arena, root) = build(&root, "/Event/Sim").unwrap();
    assert_eq!(arena.len(), 10);

    let mut w = RecordWriter::new();
    let mut offsets = vec![0];
    w.object_record(3, |w| {
        w.i32(2).sequence(7, 2, |w| {
            sim_track(w, 11, [0.5, 0.0, 1.0], "primary");
            sim_track(w, 22, [0.0, -1.0, 0.25], "eBrem");
        });
    });
    offsets.push(w.len());
    w.object_record(3, |w| {
        w.i32(0).sequence(7, 0, |_| {});
    });
    offsets.push(w.len());
    let bytes = w.finish();

    assert_eq!(read_entries(&mut arena, root, &bytes, &offsets).unwrap(), 2);

    let values = arena.values(root);
    let fields = values.as_record().unwrap();
    assert_snapshot!(json(&fields[0]), @r#"{"column":{"i32":[2,0]}}"#);
    assert_snapshot!(
        json(&fields[1]),
        @r#"{"sequence":{"offsets":[0,2,2],"element":{"record":[{"column":{"i32":[11,22]}},{"record":[{"column":{"f64":[0.5,0.0]}},{"column":{"f64":[0.0,-1.0]}},{"column":{"f64":[1.0,0.25]}}]},{"strings":{"offsets":[0,7,12],"bytes":[112,114,105,109,97,114,121,101,66,114,101,109]}}]}}}"#
    );
}

#[test]
fn navigator_refs_carry_their_own_header() {
    let root = MemberInfo::new("m_refs", "vector<JM::SmartRef>");
    let (mut arena, refs) = build(&root, "/Meta/navigator:EvtNavigator/m_refs").unwrap();
    let element = arena.children(refs)[0];
    assert_eq!(arena.kind(element), NodeKind::ObjectHeader);

    let mut w = RecordWriter::new();
    w.sequence(1, 3, |w| {
        for (kind, index) in [(0, 5), (1, -1), (2, 5)] {
            w.counted(1, |w| {
                w.reference(kind, index);
            });
        }
    });
    let bytes = w.finish();
    let offsets = [0, bytes.len()];
    read_entries(&mut arena, refs, &bytes, &offsets).unwrap();

    assert_snapshot!(
        json(&arena.values(refs)),
        @r#"{"sequence":{"offsets":[0,3],"element":{"reference":{"kind":[0,1,2],"index":[5,-1,5]}}}}"#
    );
}

#[test]
fn navigator_path_constant_matches_branch_plus_member() {
    let root = MemberInfo::new("m_refs", "vector<JM::SmartRef>");
    let registry = ReaderRegistry::with_defaults();
    assert!(registry.wraps_references_at(NAVIGATOR_REFS_PATH));

    // same member under another branch: plain references
    let (arena, refs) = build(&root, "/Event/Calib").unwrap();
    assert_eq!(arena.kind(arena.children(refs)[0]), NodeKind::Reference);
}

#[test]
fn unsupported_member_reports_path() {
    let description = SchemaDescription::from_json(
        r#"{"classes": {"JM::Weird": [{"name": "m_table", "type": "map<int,double>"}]}}"#,
    )
    .unwrap();
    let mut arena = ReaderArena::new();
    let err = ReaderRegistry::with_defaults()
        .build(
            &mut arena,
            &description,
            &MemberInfo::new("weird", "JM::Weird"),
            "/Event/X",
        )
        .unwrap_err();
    assert_snapshot!(
        err.to_string(),
        @"no reader for member m_table of type map<int,double> (at /Event/X.weird.m_table)"
    );
}
