use junoio_reader::{ReaderArena, ReaderId, ScalarType};

use crate::description::{MemberInfo, SchemaDescription};
use crate::error::SchemaError;
use crate::registry::{MAX_DEPTH, ReaderRegistry};

/// A rule that turns one class member into a reader node.
///
/// The registry asks every factory in descending [`priority`] order; the
/// first one that returns `Some` wins. Returning `Ok(None)` declines the
/// member and lets lower-priority factories try.
///
/// ```text
/// ┌──────────────────────┬──────────┬──────────────────────────────────┐
/// │ Factory              │ Priority │ Accepts                          │
/// ├──────────────────────┼──────────┼──────────────────────────────────┤
/// │ SmartRefFactory      │ 50       │ JM::SmartRef                     │
/// │ PrimitiveFactory     │ 10       │ ROOT / C++ scalar type names     │
/// │ StringFactory        │ 10       │ TString, std::string             │
/// │ SequenceFactory      │ 10       │ vector<T>                        │
/// │ JmClassFactory       │ 0        │ JM::* minus the exception list   │
/// │ ClhepClassFactory    │ 0        │ CLHEP::*                         │
/// └──────────────────────┴──────────┴──────────────────────────────────┘
/// ```
///
/// [`priority`]: ReaderFactory::priority
pub trait ReaderFactory: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &'static str;

    /// Higher runs first. Ties keep registration order.
    fn priority(&self) -> i32 {
        0
    }

    /// Build a reader for `member` in `ctx`'s arena, or decline.
    ///
    /// # Errors
    ///
    /// Errors from building nested members propagate; a factory that
    /// does not recognise the member returns `Ok(None)` instead.
    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError>;
}

/// State threaded through one tree build: the target arena, the class
/// description, the current item path and nesting depth.
pub struct BuildContext<'a> {
    registry: &'a ReaderRegistry,
    description: &'a SchemaDescription,
    arena: &'a mut ReaderArena,
    item_path: String,
    depth: usize,
}

impl<'a> BuildContext<'a> {
    pub(crate) fn new(
        registry: &'a ReaderRegistry,
        description: &'a SchemaDescription,
        arena: &'a mut ReaderArena,
        item_path: String,
    ) -> Self {
        Self {
            registry,
            description,
            arena,
            item_path,
            depth: 0,
        }
    }

    pub fn arena(&mut self) -> &mut ReaderArena {
        &mut *self.arena
    }

    #[must_use]
    pub fn description(&self) -> &SchemaDescription {
        self.description
    }

    /// Dotted path of the member being built, e.g.
    /// `/Meta/navigator:EvtNavigator/m_refs.m_refs`.
    #[must_use]
    pub fn item_path(&self) -> &str {
        &self.item_path
    }

    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Whether references at the current path carry their own
    /// `[byte count][version]` header.
    #[must_use]
    pub fn wraps_references(&self) -> bool {
        self.registry.wraps_references_at(&self.item_path)
    }

    /// Build a field of the current class. Its path is the current path
    /// plus `.name`.
    ///
    /// # Errors
    ///
    /// [`SchemaError::TooDeep`] past the depth limit, otherwise whatever
    /// the registry reports for `member`.
    pub fn build_member(&mut self, member: &MemberInfo) -> Result<ReaderId, SchemaError> {
        let path = join_path(&self.item_path, &member.name);
        self.descend(path, member)
    }

    /// Build the element of a container. The element shares the
    /// container's path.
    ///
    /// # Errors
    ///
    /// As for [`build_member`](Self::build_member).
    pub fn build_element(&mut self, member: &MemberInfo) -> Result<ReaderId, SchemaError> {
        let path = self.item_path.clone();
        self.descend(path, member)
    }

    /// Build every field of `class`, in wire order.
    ///
    /// # Errors
    ///
    /// [`SchemaError::UnknownClass`] if the description has no entry for
    /// `class`, otherwise the first error from a field.
    pub fn build_class_members(&mut self, class: &str) -> Result<Vec<ReaderId>, SchemaError> {
        let description = self.description;
        let members = description
            .class(class)
            .ok_or_else(|| SchemaError::UnknownClass {
                class: class.to_owned(),
                path: self.item_path.clone(),
            })?;
        members.iter().map(|m| self.build_member(m)).collect()
    }

    pub(crate) fn resolve(&mut self, member: &MemberInfo) -> Result<ReaderId, SchemaError> {
        let registry = self.registry;
        registry.resolve(member, self)
    }

    fn descend(&mut self, item_path: String, member: &MemberInfo) -> Result<ReaderId, SchemaError> {
        if self.depth >= MAX_DEPTH {
            return Err(SchemaError::TooDeep {
                path: item_path,
                depth: MAX_DEPTH,
            });
        }
        let mut child = BuildContext {
            registry: self.registry,
            description: self.description,
            arena: &mut *self.arena,
            item_path,
            depth: self.depth + 1,
        };
        child.resolve(member)
    }
}

pub(crate) fn join_path(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_owned()
    } else {
        format!("{parent}.{name}")
    }
}

// ── Built-in factories ──────────────────────────────────────────────────

/// `JM::SmartRef` → reference reader, wrapped in an object-header reader
/// where the registry is configured to expect one.
#[derive(Clone, Copy, Debug, Default)]
pub struct SmartRefFactory;

impl ReaderFactory for SmartRefFactory {
    fn name(&self) -> &'static str {
        "smart-ref"
    }

    fn priority(&self) -> i32 {
        50
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        if member.normalized_type() != "JM::SmartRef" {
            return Ok(None);
        }
        let wrapped = ctx.wraps_references();
        let arena = ctx.arena();
        let reference = arena.add_reference(&member.name);
        if wrapped {
            return Ok(Some(arena.add_object_header(&member.name, reference)));
        }
        Ok(Some(reference))
    }
}

/// Fixed-width scalars.
#[derive(Clone, Copy, Debug, Default)]
pub struct PrimitiveFactory;

impl PrimitiveFactory {
    /// Map a ROOT typedef or C++ spelling onto its scalar type.
    ///
    /// `Double32_t` is stored as a 4-byte float when no range is given,
    /// which is the only form the streamer description can express.
    #[must_use]
    pub fn scalar_type(type_name: &str) -> Option<ScalarType> {
        let ty = match type_name {
            "Bool_t" | "bool" => ScalarType::Bool,
            "Char_t" | "char" | "int8_t" => ScalarType::I8,
            "UChar_t" | "unsigned char" | "uint8_t" => ScalarType::U8,
            "Short_t" | "short" | "int16_t" => ScalarType::I16,
            "UShort_t" | "unsigned short" | "uint16_t" => ScalarType::U16,
            "Int_t" | "int" | "int32_t" => ScalarType::I32,
            "UInt_t" | "unsigned int" | "unsigned" | "uint32_t" => ScalarType::U32,
            "Long64_t" | "Long_t" | "long" | "long long" | "int64_t" => ScalarType::I64,
            "ULong64_t" | "ULong_t" | "unsigned long" | "unsigned long long" | "uint64_t" => {
                ScalarType::U64
            }
            "Float_t" | "float" | "Double32_t" => ScalarType::F32,
            "Double_t" | "double" => ScalarType::F64,
            _ => return None,
        };
        Some(ty)
    }
}

impl ReaderFactory for PrimitiveFactory {
    fn name(&self) -> &'static str {
        "primitive"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        Ok(Self::scalar_type(member.normalized_type())
            .map(|ty| ctx.arena().add_primitive(&member.name, ty)))
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct StringFactory;

impl ReaderFactory for StringFactory {
    fn name(&self) -> &'static str {
        "string"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        match member.normalized_type() {
            "TString" | "string" | "std::string" => {
                Ok(Some(ctx.arena().add_string(&member.name)))
            }
            _ => Ok(None),
        }
    }
}

/// `vector<T>` and `std::vector<T>`; `T` is built through the registry
/// like any other member.
#[derive(Clone, Copy, Debug, Default)]
pub struct SequenceFactory;

impl SequenceFactory {
    /// The element type of a vector type name, if it is one.
    #[must_use]
    pub fn element_type(type_name: &str) -> Option<&str> {
        let ty = type_name.strip_prefix("std::").unwrap_or(type_name);
        let inner = ty.strip_prefix("vector<")?.strip_suffix('>')?;
        Some(inner.trim())
    }
}

impl ReaderFactory for SequenceFactory {
    fn name(&self) -> &'static str {
        "sequence"
    }

    fn priority(&self) -> i32 {
        10
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        let Some(element_type) = Self::element_type(member.normalized_type()) else {
            return Ok(None);
        };
        let element = ctx.build_element(&MemberInfo::new(&member.name, element_type))?;
        Ok(Some(ctx.arena().add_sequence(&member.name, element)))
    }
}

/// Event-model classes: object-rooted records.
#[derive(Clone, Copy, Debug, Default)]
pub struct JmClassFactory;

impl JmClassFactory {
    /// `JM::` classes with a dedicated representation that must not be
    /// read as a plain record.
    pub const EXCEPTIONS: [&'static str; 5] = [
        "JM::EventObject",
        "JM::TrackElecTruth",
        "JM::SmartRef",
        "JM::FileMetaData",
        "JM::UniqueIDTable",
    ];
}

impl ReaderFactory for JmClassFactory {
    fn name(&self) -> &'static str {
        "jm-class"
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        let class = member.normalized_type();
        if !class.starts_with("JM::") || Self::EXCEPTIONS.iter().any(|&e| e == class) {
            return Ok(None);
        }
        let children = ctx.build_class_members(class)?;
        Ok(Some(ctx.arena().add_object_class(&member.name, children)))
    }
}

/// Geometry and kinematics classes: prefix-rooted records, memberwise
/// inside containers.
#[derive(Clone, Copy, Debug, Default)]
pub struct ClhepClassFactory;

impl ReaderFactory for ClhepClassFactory {
    fn name(&self) -> &'static str {
        "clhep-class"
    }

    fn build(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<Option<ReaderId>, SchemaError> {
        let class = member.normalized_type();
        if !class.starts_with("CLHEP::") {
            return Ok(None);
        }
        let children = ctx.build_class_members(class)?;
        Ok(Some(ctx.arena().add_prefix_class(&member.name, children)))
    }
}
