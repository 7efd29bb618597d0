#![warn(clippy::pedantic)]

pub mod description;
pub mod error;
pub mod factory;
pub mod registry;

pub use description::{MemberInfo, SchemaDescription};
pub use error::SchemaError;
pub use factory::{
    BuildContext, ClhepClassFactory, JmClassFactory, PrimitiveFactory, ReaderFactory,
    SequenceFactory, SmartRefFactory, StringFactory,
};
pub use registry::{MAX_DEPTH, NAVIGATOR_REFS_PATH, ReaderRegistry};
