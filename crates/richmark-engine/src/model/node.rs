use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable identifier assigned to a node when it is created.
///
/// Identity survives relocation inside the tree; a node that is rebuilt
/// (for example a stray text run copied into a new paragraph) gets a new id.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug, Serialize, Deserialize)]
pub struct NodeId(pub Uuid);

impl NodeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for NodeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Inline marks that can be toggled on a selection
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InlineMark {
    Bold,
    Italic,
    Strikethrough,
    Code,
}

impl InlineMark {
    pub fn kind(self) -> NodeKind {
        match self {
            InlineMark::Bold => NodeKind::Bold,
            InlineMark::Italic => NodeKind::Italic,
            InlineMark::Strikethrough => NodeKind::Strikethrough,
            InlineMark::Code => NodeKind::InlineCode,
        }
    }
}

/// Every kind of node the editing surface can hold.
///
/// Block kinds run from `Paragraph` to `HorizontalRule`, inline kinds from
/// `Text` to `Checkbox`. `Root` is the editing surface itself, `DragHandle`
/// is a decorative marker owned by the UI layer and `Element` stands in for
/// any host element the model has no meaning for (a pasted `div` or `span`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum NodeKind {
    Root,

    Paragraph,
    /// Heading level, 1 to 6
    Heading(u8),
    BulletList,
    OrderedList,
    ListItem,
    BlockQuote,
    CodeBlock,
    Table,
    TableRow,
    TableCell,
    HorizontalRule,

    Text(String),
    Bold,
    Italic,
    Strikethrough,
    InlineCode,
    Link { target: String },
    Image { target: String, alt: String },
    LineBreak,
    Checkbox { checked: bool },

    DragHandle,
    Element { tag: String },
}

impl NodeKind {
    pub fn mark(&self) -> Option<InlineMark> {
        match self {
            NodeKind::Bold => Some(InlineMark::Bold),
            NodeKind::Italic => Some(InlineMark::Italic),
            NodeKind::Strikethrough => Some(InlineMark::Strikethrough),
            NodeKind::InlineCode => Some(InlineMark::Code),
            _ => None,
        }
    }

    pub fn is_list(&self) -> bool {
        matches!(self, NodeKind::BulletList | NodeKind::OrderedList)
    }
}

/// A node of the document tree. The parent exclusively owns its children.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: NodeId,
    pub kind: NodeKind,
    pub children: Vec<Node>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self::with_children(kind, Vec::new())
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            id: NodeId::new(),
            kind,
            children,
        }
    }

    pub fn root(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Root, children)
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Paragraph, children)
    }

    /// The canonical empty block: a paragraph holding a single line break.
    pub fn empty_paragraph() -> Self {
        Self::paragraph(vec![Self::line_break()])
    }

    pub fn heading(level: u8, children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Heading(level.clamp(1, 6)), children)
    }

    pub fn list(ordered: bool, items: Vec<Node>) -> Self {
        let kind = if ordered {
            NodeKind::OrderedList
        } else {
            NodeKind::BulletList
        };
        Self::with_children(kind, items)
    }

    pub fn list_item(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::ListItem, children)
    }

    pub fn blockquote(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::BlockQuote, children)
    }

    pub fn code_block(code: impl Into<String>) -> Self {
        Self::with_children(NodeKind::CodeBlock, vec![Self::text(code)])
    }

    pub fn table(rows: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Table, rows)
    }

    pub fn table_row(cells: Vec<Node>) -> Self {
        Self::with_children(NodeKind::TableRow, cells)
    }

    pub fn table_cell(children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::TableCell, children)
    }

    pub fn horizontal_rule() -> Self {
        Self::new(NodeKind::HorizontalRule)
    }

    pub fn text(text: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(text.into()))
    }

    pub fn mark(mark: InlineMark, children: Vec<Node>) -> Self {
        Self::with_children(mark.kind(), children)
    }

    pub fn bold(children: Vec<Node>) -> Self {
        Self::mark(InlineMark::Bold, children)
    }

    pub fn italic(children: Vec<Node>) -> Self {
        Self::mark(InlineMark::Italic, children)
    }

    pub fn strikethrough(children: Vec<Node>) -> Self {
        Self::mark(InlineMark::Strikethrough, children)
    }

    pub fn inline_code(code: impl Into<String>) -> Self {
        Self::mark(InlineMark::Code, vec![Self::text(code)])
    }

    pub fn link(target: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_children(
            NodeKind::Link {
                target: target.into(),
            },
            children,
        )
    }

    pub fn image(target: impl Into<String>, alt: impl Into<String>) -> Self {
        Self::new(NodeKind::Image {
            target: target.into(),
            alt: alt.into(),
        })
    }

    pub fn line_break() -> Self {
        Self::new(NodeKind::LineBreak)
    }

    pub fn checkbox(checked: bool) -> Self {
        Self::new(NodeKind::Checkbox { checked })
    }

    pub fn drag_handle() -> Self {
        Self::new(NodeKind::DragHandle)
    }

    pub fn element(tag: impl Into<String>, children: Vec<Node>) -> Self {
        Self::with_children(NodeKind::Element { tag: tag.into() }, children)
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Text(text) => Some(text),
            _ => None,
        }
    }

    /// True for `Paragraph[LineBreak]` and for a paragraph with no children.
    pub fn is_empty_paragraph(&self) -> bool {
        self.kind == NodeKind::Paragraph
            && match self.children.as_slice() {
                [] => true,
                [only] => only.kind == NodeKind::LineBreak,
                _ => false,
            }
    }

    /// Concatenated text of this subtree, the way a DOM `textContent` reads.
    /// Drag handles contribute nothing.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(text) => out.push_str(text),
            NodeKind::DragHandle => {}
            _ => {
                for child in &self.children {
                    child.collect_text(out);
                }
            }
        }
    }

    /// Number of caret positions inside the node: characters for text,
    /// child slots for everything else.
    pub fn extent(&self) -> usize {
        match &self.kind {
            NodeKind::Text(text) => text.chars().count(),
            _ => self.children.len(),
        }
    }

    pub fn find(&self, id: NodeId) -> Option<&Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter().find_map(|child| child.find(id))
    }

    pub fn find_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        if self.id == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|child| child.find_mut(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.find(id).is_some()
    }

    /// Child indices leading from `self` to the node with `id`.
    pub fn path_to(&self, id: NodeId) -> Option<Vec<usize>> {
        if self.id == id {
            return Some(Vec::new());
        }
        for (index, child) in self.children.iter().enumerate() {
            if let Some(mut rest) = child.path_to(id) {
                rest.insert(0, index);
                return Some(rest);
            }
        }
        None
    }

    pub fn node_at_path(&self, path: &[usize]) -> Option<&Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get(index))
    }

    pub fn node_at_path_mut(&mut self, path: &[usize]) -> Option<&mut Node> {
        path.iter()
            .try_fold(self, |node, &index| node.children.get_mut(index))
    }

    /// The last text node of the subtree, if any.
    pub fn last_text(&self) -> Option<&Node> {
        if self.as_text().is_some() {
            return Some(self);
        }
        self.children.iter().rev().find_map(Node::last_text)
    }

    /// Structural equality that ignores node identifiers.
    pub fn same_shape(&self, other: &Node) -> bool {
        self.kind == other.kind
            && self.children.len() == other.children.len()
            && self
                .children
                .iter()
                .zip(&other.children)
                .all(|(a, b)| a.same_shape(b))
    }
}

/// Byte index of the `char_offset`-th character, clamped to the end.
pub(crate) fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map(|(index, _)| index)
        .unwrap_or(text.len())
}
