//! The allowed-parent/allowed-child table.
//!
//! Anything that attaches a node consults [`can_contain`] first. The
//! normalizer uses [`repair_wrapper`] to decide how a disallowed child is
//! wrapped so that it becomes legal.

use crate::model::{Node, NodeKind};

/// Block nodes occupy a full region of the document.
pub fn is_block_kind(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Paragraph
            | NodeKind::Heading(_)
            | NodeKind::BulletList
            | NodeKind::OrderedList
            | NodeKind::ListItem
            | NodeKind::BlockQuote
            | NodeKind::CodeBlock
            | NodeKind::Table
            | NodeKind::TableRow
            | NodeKind::TableCell
            | NodeKind::HorizontalRule
    )
}

pub fn is_inline_kind(kind: &NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::Text(_)
            | NodeKind::Bold
            | NodeKind::Italic
            | NodeKind::Strikethrough
            | NodeKind::InlineCode
            | NodeKind::Link { .. }
            | NodeKind::Image { .. }
            | NodeKind::LineBreak
            | NodeKind::Checkbox { .. }
    )
}

/// Blocks that may sit directly under the root.
pub fn is_root_block(kind: &NodeKind) -> bool {
    is_block_kind(kind)
        && !matches!(
            kind,
            NodeKind::ListItem | NodeKind::TableRow | NodeKind::TableCell
        )
}

/// Whether `child` may be attached directly under `parent`.
pub fn can_contain(parent: &NodeKind, child: &NodeKind) -> bool {
    if *child == NodeKind::Root {
        return false;
    }
    if *child == NodeKind::DragHandle {
        return *parent == NodeKind::Root || is_block_kind(parent);
    }
    match parent {
        NodeKind::Root => is_root_block(child),
        NodeKind::Paragraph
        | NodeKind::Heading(_)
        | NodeKind::TableCell
        | NodeKind::Bold
        | NodeKind::Italic
        | NodeKind::Strikethrough
        | NodeKind::Link { .. } => is_inline_kind(child) || is_element(child),
        NodeKind::BulletList | NodeKind::OrderedList => *child == NodeKind::ListItem,
        NodeKind::ListItem | NodeKind::BlockQuote => {
            is_root_block(child) || is_inline_kind(child) || is_element(child)
        }
        NodeKind::CodeBlock | NodeKind::InlineCode => {
            matches!(child, NodeKind::Text(_) | NodeKind::LineBreak)
        }
        NodeKind::Table => *child == NodeKind::TableRow,
        NodeKind::TableRow => *child == NodeKind::TableCell,
        NodeKind::Element { .. } => true,
        NodeKind::HorizontalRule
        | NodeKind::Text(_)
        | NodeKind::Image { .. }
        | NodeKind::LineBreak
        | NodeKind::Checkbox { .. }
        | NodeKind::DragHandle => false,
    }
}

fn is_element(kind: &NodeKind) -> bool {
    matches!(kind, NodeKind::Element { .. })
}

/// Constructor for the node a disallowed child is moved into.
pub type Wrapper = fn(Vec<Node>) -> Node;

/// Builds the wrapper a disallowed child of `parent` is moved into.
/// `None` means the normalizer has no repair for that container.
pub fn repair_wrapper(parent: &NodeKind) -> Option<Wrapper> {
    let wrap: Wrapper = match parent {
        NodeKind::Root => Node::paragraph,
        NodeKind::BulletList | NodeKind::OrderedList => Node::list_item,
        NodeKind::Table => Node::table_row,
        NodeKind::TableRow => Node::table_cell,
        _ => return None,
    };
    Some(wrap)
}
