#![warn(clippy::pedantic)]

pub mod composite;
pub mod entries;
pub mod error;
pub mod options;
pub mod primitive;
pub mod reader;
pub mod reference;
pub mod sequence;
pub mod string;
pub mod values;

pub use composite::ClassShape;
pub use entries::{read_at, read_entries};
pub use error::ReadError;
pub use options::ReadOptions;
pub use primitive::ScalarType;
pub use reader::{NodeKind, ReaderArena, ReaderId};
pub use values::{Column, ReaderValues};
