use junoio_reader::{ReaderArena, ReaderId};

use crate::description::{MemberInfo, SchemaDescription};
use crate::error::SchemaError;
use crate::factory::{
    BuildContext, ClhepClassFactory, JmClassFactory, PrimitiveFactory, ReaderFactory,
    SequenceFactory, SmartRefFactory, StringFactory, join_path,
};

/// Nesting limit for member resolution. Real event classes stay well
/// below it; a self-referencing class hits it instead of recursing
/// forever.
pub const MAX_DEPTH: usize = 64;

/// Item path of the event navigator's reference vector, whose elements
/// each carry a standalone `[byte count][version]` header.
pub const NAVIGATOR_REFS_PATH: &str = "/Meta/navigator:EvtNavigator/m_refs.m_refs";

/// Ordered set of [`ReaderFactory`] rules that turns a class description
/// into a reader tree.
///
/// # Usage
///
/// ```rust
/// use junoio_reader::ReaderArena;
/// use junoio_schema::{MemberInfo, ReaderRegistry, SchemaDescription};
///
/// let description = SchemaDescription::default().with_class(
///     "JM::Hit",
///     vec![MemberInfo::new("m_t", "Float_t")],
/// );
/// let registry = ReaderRegistry::with_defaults();
/// let mut arena = ReaderArena::new();
/// let root = registry
///     .build(&mut arena, &description, &MemberInfo::new("hit", "JM::Hit"), "")
///     .unwrap();
/// assert_eq!(arena.children(root).len(), 1);
/// ```
pub struct ReaderRegistry {
    factories: Vec<Box<dyn ReaderFactory>>,
    wrap_paths: Vec<String>,
}

impl ReaderRegistry {
    /// A registry with no factories and no wrapped paths.
    #[must_use]
    pub fn new() -> Self {
        Self {
            factories: Vec::new(),
            wrap_paths: Vec::new(),
        }
    }

    /// The built-in factories, with the navigator's reference vector
    /// marked as wrapped.
    #[must_use]
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(SmartRefFactory);
        registry.register(PrimitiveFactory);
        registry.register(StringFactory);
        registry.register(SequenceFactory);
        registry.register(JmClassFactory);
        registry.register(ClhepClassFactory);
        registry.wrap_references_at(NAVIGATOR_REFS_PATH);
        registry
    }

    /// Add a factory. It is consulted after every registered factory of
    /// equal or higher priority.
    pub fn register(&mut self, factory: impl ReaderFactory + 'static) {
        let priority = factory.priority();
        let at = self
            .factories
            .iter()
            .position(|f| f.priority() < priority)
            .unwrap_or(self.factories.len());
        self.factories.insert(at, Box::new(factory));
    }

    /// Expect an object header in front of every smart reference built at
    /// `item_path`.
    pub fn wrap_references_at(&mut self, item_path: impl Into<String>) {
        self.wrap_paths.push(item_path.into());
    }

    #[must_use]
    pub fn wraps_references_at(&self, item_path: &str) -> bool {
        self.wrap_paths.iter().any(|p| p == item_path)
    }

    /// Factory names in consultation order.
    pub fn factory_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.factories.iter().map(|f| f.name())
    }

    /// Build the reader tree for `root` into `arena`.
    ///
    /// `branch_path` is the path of the branch holding `root`; the root's
    /// own item path is `branch_path.root_name`.
    ///
    /// # Errors
    ///
    /// Any [`SchemaError`]. Nodes already added to `arena` by a failed
    /// build stay in it, unreferenced.
    pub fn build(
        &self,
        arena: &mut ReaderArena,
        description: &SchemaDescription,
        root: &MemberInfo,
        branch_path: &str,
    ) -> Result<ReaderId, SchemaError> {
        let item_path = join_path(branch_path, &root.name);
        let mut ctx = BuildContext::new(self, description, arena, item_path);
        ctx.resolve(root)
    }

    pub(crate) fn resolve(
        &self,
        member: &MemberInfo,
        ctx: &mut BuildContext<'_>,
    ) -> Result<ReaderId, SchemaError> {
        for factory in &self.factories {
            if let Some(id) = factory.build(member, ctx)? {
                tracing::debug!(
                    factory = factory.name(),
                    member = %member.name,
                    type_name = %member.type_name,
                    path = ctx.item_path(),
                    "member resolved"
                );
                return Ok(id);
            }
        }
        tracing::debug!(
            member = %member.name,
            type_name = %member.type_name,
            path = ctx.item_path(),
            "no factory accepted member"
        );
        Err(SchemaError::UnsupportedType {
            member: member.name.clone(),
            type_name: member.type_name.clone(),
            path: ctx.item_path().to_owned(),
        })
    }
}

impl Default for ReaderRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}
