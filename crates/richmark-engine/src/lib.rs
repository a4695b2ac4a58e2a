pub mod editing;
pub mod io;
pub mod markdown;
pub mod model;
pub mod normalize;

#[cfg(test)]
pub mod tests;

// Re-export key types for easier usage
pub use editing::{Cmd, Document, Patch, Selection, Stats};
pub use io::*;
pub use markdown::{parse_markdown, serialize};
pub use model::{Cursor, InlineMark, Node, NodeId, NodeKind};
pub use normalize::{Normalized, Repair, normalize};
