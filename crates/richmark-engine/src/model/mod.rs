//! # Document Model
//!
//! The node kinds the editing surface can hold, their stable identifiers and
//! the allowed-child table (`schema`). The model carries no behaviour of its
//! own beyond tree navigation; the normalizer enforces its invariants and the
//! serializer reads it.

pub mod cursor;
pub mod node;
pub mod outline;
pub mod schema;

pub use cursor::Cursor;
pub use node::{InlineMark, Node, NodeId, NodeKind};
pub(crate) use node::byte_index;
pub use outline::outline;
pub use schema::{can_contain, is_block_kind, is_inline_kind, is_root_block, repair_wrapper};
