use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::SchemaError;

/// One member of a class as recorded in the file's streamer info.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct MemberInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub type_name: String,
}

impl MemberInfo {
    pub fn new(name: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: type_name.into(),
        }
    }

    /// The type name with decorations that do not change the on-disk
    /// layout removed.
    #[must_use]
    pub fn normalized_type(&self) -> &str {
        normalize_type(&self.type_name)
    }
}

/// Class name → ordered member list.
///
/// ```json
/// {
///   "classes": {
///     "JM::SimTrack": [
///       { "name": "m_pdgID", "type": "Int_t" },
///       { "name": "m_initPx", "type": "Float_t" }
///     ]
///   }
/// }
/// ```
///
/// Member order is the order fields appear on the wire.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct SchemaDescription {
    #[serde(default)]
    pub classes: BTreeMap<String, Vec<MemberInfo>>,
}

impl SchemaDescription {
    /// Parse a description document.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::Json`] if `json` is not a valid document.
    pub fn from_json(json: &str) -> Result<Self, SchemaError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Members of `class` in wire order.
    #[must_use]
    pub fn class(&self, class: &str) -> Option<&[MemberInfo]> {
        self.classes.get(class).map(Vec::as_slice)
    }

    /// Add or replace a class. Returns `self` for chaining in tests and
    /// programmatic setups.
    #[must_use]
    pub fn with_class(mut self, class: impl Into<String>, members: Vec<MemberInfo>) -> Self {
        self.classes.insert(class.into(), members);
        self
    }
}

/// Strip whitespace, a leading `const` and trailing pointer stars.
///
/// Pointer members are written as the pointee's record, so
/// `JM::SimTrack*` reads exactly like `JM::SimTrack`.
#[must_use]
pub fn normalize_type(type_name: &str) -> &str {
    let mut ty = type_name.trim();
    if let Some(rest) = ty.strip_prefix("const ") {
        ty = rest.trim_start();
    }
    ty.trim_end_matches(|c: char| c == '*' || c.is_whitespace())
}
