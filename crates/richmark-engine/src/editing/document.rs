use crate::editing::{Cmd, Patch, Selection};
use crate::markdown::{parse_markdown, serialize};
use crate::model::{Node, is_block_kind};
use crate::normalize::{Normalized, normalize};

/// Word and character counts shown in the status bar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Stats {
    pub words: usize,
    pub chars: usize,
}

/// The live document: the tree, the caret and a change counter.
///
/// Every mutation path ends in [`Document::normalize`], so outside of a
/// command the tree always satisfies the block-structure invariants.
#[derive(Debug, Clone)]
pub struct Document {
    pub(crate) root: Node,
    pub(crate) selection: Option<Selection>,
    /// Incremented on each edit that changed something
    pub(crate) version: u64,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    /// An empty document: one placeholder paragraph with the caret in it.
    pub fn new() -> Self {
        let paragraph = Node::empty_paragraph();
        let selection = Selection::caret(paragraph.id, 0);
        Self {
            root: Node::root(vec![paragraph]),
            selection: Some(selection),
            version: 0,
        }
    }

    /// Adopts an arbitrary tree, repairing it first.
    pub fn from_root(root: Node) -> Self {
        let mut doc = Self {
            root,
            selection: None,
            version: 0,
        };
        doc.normalize();
        doc.place_caret_at_end();
        doc
    }

    pub fn from_markdown(markdown: &str) -> Self {
        Self::from_root(parse_markdown(markdown))
    }

    /// Create a new document from raw bytes, which must be UTF-8
    pub fn from_bytes(bytes: &[u8]) -> anyhow::Result<Self> {
        let text = std::str::from_utf8(bytes)?;
        Ok(Self::from_markdown(text))
    }

    /// Replaces the whole content with parsed Markdown.
    pub fn set_markdown(&mut self, markdown: &str) {
        self.root = parse_markdown(markdown);
        self.selection = None;
        self.place_caret_at_end();
        self.version += 1;
    }

    pub fn to_markdown(&self) -> String {
        serialize(&self.root)
    }

    pub fn to_bytes(&self) -> Vec<u8> {
        self.to_markdown().into_bytes()
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn set_selection(&mut self, selection: Option<Selection>) {
        self.selection = selection;
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    /// Apply a command, then normalize.
    pub fn apply(&mut self, cmd: Cmd) -> Patch {
        log::debug!("apply {cmd:?}");
        let changed = self.execute(cmd);
        self.finish_edit(changed)
    }

    /// Runs a raw mutation supplied by the host (paste, drag-drop, a
    /// decoration pass), then normalizes.
    pub fn edit_tree(&mut self, edit: impl FnOnce(&mut Node)) -> Patch {
        let before = self.root.clone();
        edit(&mut self.root);
        let changed = if self.root == before {
            Vec::new()
        } else {
            vec![self.root.id]
        };
        self.finish_edit(changed)
    }

    fn finish_edit(&mut self, changed: Vec<crate::model::NodeId>) -> Patch {
        let normalized = self.normalize();
        if !changed.is_empty() || normalized.changed() {
            self.version += 1;
        }
        Patch {
            changed,
            repairs: normalized.repairs,
            new_selection: self.selection,
            version: self.version,
        }
    }

    /// Repairs the tree and carries the selection through the repair.
    pub fn normalize(&mut self) -> Normalized {
        let previous = self.selection;
        let normalized = normalize(&mut self.root, previous.map(|s| s.cursor()));

        self.selection = match (previous, normalized.cursor) {
            (Some(selection), Some(cursor)) if cursor.node == selection.node => {
                let extent = self
                    .root
                    .find(cursor.node)
                    .map(Node::extent)
                    .unwrap_or(cursor.offset);
                Some(Selection::range(
                    cursor.node,
                    cursor.offset,
                    selection.end.min(extent).max(cursor.offset),
                ))
            }
            (_, Some(cursor)) => Some(Selection::caret(cursor.node, cursor.offset)),
            (_, None) => None,
        };
        normalized
    }

    /// Fallback caret placement: the end of the last text run, or the end of
    /// the last block when the document holds no text.
    pub fn place_caret_at_end(&mut self) {
        self.selection = match self.root.last_text() {
            Some(text) => Some(Selection::caret(text.id, text.extent())),
            None => self
                .root
                .children
                .last()
                .map(|block| Selection::caret(block.id, block.extent())),
        };
    }

    pub fn stats(&self) -> Stats {
        let mut plain = String::new();
        collect_plain_text(&self.root, &mut plain);
        Stats {
            words: plain.split_whitespace().count(),
            chars: self.root.text_content().chars().count(),
        }
    }
}

/// Text content with a separator after each block, so words in adjacent
/// blocks are not glued together.
fn collect_plain_text(node: &Node, out: &mut String) {
    if let Some(text) = node.as_text() {
        out.push_str(text);
        return;
    }
    for child in &node.children {
        collect_plain_text(child, out);
    }
    if is_block_kind(&node.kind) {
        out.push('\n');
    }
}
