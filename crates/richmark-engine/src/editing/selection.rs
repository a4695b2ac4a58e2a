use serde::{Deserialize, Serialize};

use crate::model::{Cursor, NodeId};

/// A selection inside a single node.
///
/// Offsets are characters for text nodes and child slots for elements, with
/// `start <= end`. A collapsed selection is a caret.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub node: NodeId,
    pub start: usize,
    pub end: usize,
}

impl Selection {
    pub fn caret(node: NodeId, offset: usize) -> Self {
        Self {
            node,
            start: offset,
            end: offset,
        }
    }

    pub fn range(node: NodeId, a: usize, b: usize) -> Self {
        Self {
            node,
            start: a.min(b),
            end: a.max(b),
        }
    }

    pub fn is_collapsed(&self) -> bool {
        self.start == self.end
    }

    /// The caret end the normalizer tracks.
    pub fn cursor(&self) -> Cursor {
        Cursor::new(self.node, self.start)
    }
}
