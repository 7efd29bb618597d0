#![warn(clippy::pedantic)]

pub mod cursor;
pub mod error;
pub mod header;

pub use cursor::{BinaryCursor, Primitive};
pub use error::WireError;
pub use header::{ByteCount, RecordHeader};
