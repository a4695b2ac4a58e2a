//! Markdown projection of the document tree: `serializer` writes it,
//! `parser` loads it.

pub mod parser;
pub mod serializer;

pub use parser::parse_markdown;
pub use serializer::{serialize, serialize_node};
