/// Errors raised while turning a class description into a reader tree.
///
/// Building happens once per branch, before any bytes are decoded, so
/// every variant points at a problem with the description or the
/// registry rather than with the data.
///
/// ```text
///   SchemaError
///   ├── Json             ← description document is not valid JSON
///   ├── UnknownClass     ← a class member names a class with no entry
///   ├── UnsupportedType  ← no registered factory accepted the member
///   └── TooDeep          ← nesting exceeded the depth limit (cycles)
/// ```
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The description could not be parsed.
    #[error("invalid class description: {0}")]
    Json(#[from] serde_json::Error),

    /// A class factory accepted a member but the description has no
    /// member list for its class.
    #[error("class {class} (at {path}) is not in the description")]
    UnknownClass { class: String, path: String },

    /// Every factory declined the member.
    #[error("no reader for member {member} of type {type_name} (at {path})")]
    UnsupportedType {
        member: String,
        type_name: String,
        path: String,
    },

    /// Member nesting went deeper than the registry allows. A class that
    /// contains itself ends up here.
    #[error("class nesting deeper than {depth} levels at {path}")]
    TooDeep { path: String, depth: usize },
}
