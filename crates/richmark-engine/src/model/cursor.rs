use serde::{Deserialize, Serialize};

use crate::model::NodeId;

/// A caret position: a node plus an offset inside it.
///
/// For text nodes the offset counts characters; for every other node it is a
/// child slot, `0..=children.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cursor {
    pub node: NodeId,
    pub offset: usize,
}

impl Cursor {
    pub fn new(node: NodeId, offset: usize) -> Self {
        Self { node, offset }
    }
}
