//! Named JSON rendering of decoded columns.
//!
//! ```text
//! ┌──────────────┬─────────────────────────────────────────────┐
//! │ Node         │ JSON                                        │
//! ├──────────────┼─────────────────────────────────────────────┤
//! │ Primitive    │ [v0, v1, ...]                               │
//! │ String       │ ["s0", "s1", ...]                           │
//! │ Reference    │ {"kind": [...], "index": [...]}             │
//! │ Class        │ {"<field>": <child>, ...} in wire order     │
//! │ ObjectHeader │ its element                                 │
//! │ Sequence     │ {"offsets": [...], "element": <element>}    │
//! └──────────────┴─────────────────────────────────────────────┘
//! ```

use junoio_reader::{Column, NodeKind, ReaderArena, ReaderId, ReaderValues};
use serde_json::{Map, Value, json};

/// Render everything decoded under `id`.
pub fn render(arena: &ReaderArena, id: ReaderId) -> Value {
    render_values(arena, id, &arena.values(id))
}

fn render_values(arena: &ReaderArena, id: ReaderId, values: &ReaderValues) -> Value {
    if arena.kind(id) == NodeKind::ObjectHeader {
        return render_values(arena, arena.children(id)[0], values);
    }
    match values {
        ReaderValues::Column(column) => render_column(column),
        ReaderValues::Strings { .. } => json!(values.to_strings().unwrap_or_default()),
        ReaderValues::Reference { kind, index } => json!({ "kind": kind, "index": index }),
        ReaderValues::Record(fields) => {
            let object: Map<String, Value> = arena
                .children(id)
                .iter()
                .zip(fields)
                .map(|(&child, field)| {
                    (arena.name(child).to_owned(), render_values(arena, child, field))
                })
                .collect();
            Value::Object(object)
        }
        ReaderValues::Sequence { offsets, element } => json!({
            "offsets": offsets,
            "element": render_values(arena, arena.children(id)[0], element),
        }),
    }
}

fn render_column(column: &Column) -> Value {
    match column {
        Column::Bool(v) => json!(v),
        Column::I8(v) => json!(v),
        Column::U8(v) => json!(v),
        Column::I16(v) => json!(v),
        Column::U16(v) => json!(v),
        Column::I32(v) => json!(v),
        Column::U32(v) => json!(v),
        Column::I64(v) => json!(v),
        Column::U64(v) => json!(v),
        Column::F32(v) => json!(v),
        Column::F64(v) => json!(v),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use junoio_reader::ScalarType;
    use junoio_wire::BinaryCursor;

    #[test]
    fn class_fields_keep_wire_order() {
        let mut arena = ReaderArena::new();
        let z = arena.add_primitive("z", ScalarType::U8);
        let a = arena.add_primitive("a", ScalarType::U8);
        let class = arena.add_prefix_class("CLHEP::Pair", vec![z, a]);
        arena.read_many(class, &mut BinaryCursor::new(&[1, 2, 3, 4]), 2).unwrap();

        let rendered = render(&arena, class).to_string();
        assert_eq!(rendered, r#"{"z":[1,2],"a":[3,4]}"#);
    }

    #[test]
    fn wrapped_reference_renders_as_reference() {
        let mut arena = ReaderArena::new();
        let r = arena.add_reference("m_ref");
        let wrapped = arena.add_object_header("m_ref", r);
        let refs = arena.add_sequence("m_refs", wrapped);
        assert_eq!(
            render(&arena, refs).to_string(),
            r#"{"offsets":[0],"element":{"kind":[],"index":[]}}"#
        );
    }
}
