use crate::editing::Selection;
use crate::model::NodeId;
use crate::normalize::Repair;

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub struct Patch {
    /// Nodes the command created, removed or rewrote
    pub changed: Vec<NodeId>,
    /// Repairs made by the normalize pass that followed the command
    pub repairs: Vec<Repair>,
    pub new_selection: Option<Selection>,
    pub version: u64,
}

impl Patch {
    pub fn is_noop(&self) -> bool {
        self.changed.is_empty() && self.repairs.is_empty()
    }
}
