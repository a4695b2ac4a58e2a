use crate::editing::{Document, Selection};
use crate::model::{
    InlineMark, Node, NodeId, NodeKind, byte_index, can_contain, is_block_kind, is_inline_kind,
};

/// Commands that can be applied to the document
#[derive(Debug, Clone, PartialEq)]
pub enum Cmd {
    /// Type text at the caret, replacing the selected range
    InsertText {
        text: String,
    },
    /// The Enter key
    NewBlock,
    ToggleFormat {
        mark: InlineMark,
    },
    InsertHeading {
        level: u8,
    },
    InsertList {
        ordered: bool,
    },
    InsertBlockquote,
    InsertCodeBlock,
    InsertHorizontalRule,
    InsertTable {
        rows: usize,
        cols: usize,
    },
    InsertTaskList,
    InsertLink {
        target: String,
    },
    InsertImage {
        target: String,
        alt: Option<String>,
    },
    /// Drag-and-drop reorder of a top-level block
    MoveBlock {
        id: NodeId,
        to: usize,
    },
    /// Click on blank editor area below the content
    CreateParagraph {
        at: usize,
    },
    Clear,
}

const TASK_COUNT: usize = 3;

impl Document {
    /// Runs a command against the tree and returns the ids of the nodes it
    /// created or modified. An empty result means nothing happened.
    pub(crate) fn execute(&mut self, cmd: Cmd) -> Vec<NodeId> {
        match cmd {
            Cmd::InsertText { text } => self.insert_text(&text),
            Cmd::NewBlock => self.new_block(),
            Cmd::ToggleFormat { mark } => self.toggle_format(mark),
            Cmd::InsertHeading { level } => self.insert_heading(level),
            Cmd::InsertList { ordered } => {
                self.delete_selection();
                let text = Node::text("List item");
                let caret = text.id;
                let list = Node::list(ordered, vec![Node::list_item(vec![text])]);
                self.insert_blocks(vec![list], caret)
            }
            Cmd::InsertBlockquote => self.insert_blockquote(),
            Cmd::InsertCodeBlock => {
                let selected = self.delete_selection();
                let code = if selected.is_empty() {
                    "Code block".to_string()
                } else {
                    selected
                };
                let block = Node::code_block(code);
                let caret = block.id;
                self.insert_blocks(vec![block, Node::empty_paragraph()], caret)
            }
            Cmd::InsertHorizontalRule => {
                self.delete_selection();
                let paragraph = Node::empty_paragraph();
                let caret = paragraph.id;
                self.insert_blocks(vec![Node::horizontal_rule(), paragraph], caret)
            }
            Cmd::InsertTable { rows, cols } => {
                self.delete_selection();
                let table = table(rows, cols);
                let caret = table.children[0].children[0].id;
                self.insert_blocks(vec![table, Node::empty_paragraph()], caret)
            }
            Cmd::InsertTaskList => {
                self.delete_selection();
                let items = (1..=TASK_COUNT)
                    .map(|i| {
                        Node::list_item(vec![Node::checkbox(false), Node::text(format!("Task {i}"))])
                    })
                    .collect::<Vec<_>>();
                let caret = items[0].id;
                let list = Node::list(false, items);
                self.insert_blocks(vec![list, Node::empty_paragraph()], caret)
            }
            Cmd::InsertLink { target } => {
                if target.trim().is_empty() {
                    return Vec::new();
                }
                let selected = self.delete_selection();
                let label = if selected.is_empty() {
                    "Link".to_string()
                } else {
                    selected
                };
                self.insert_inline(Node::link(target, vec![Node::text(label)]))
            }
            Cmd::InsertImage { target, alt } => {
                if target.trim().is_empty() {
                    return Vec::new();
                }
                let alt = alt
                    .filter(|alt| !alt.trim().is_empty())
                    .unwrap_or_else(|| "Image".to_string());
                self.delete_selection();
                self.insert_inline(Node::image(target, alt))
            }
            Cmd::MoveBlock { id, to } => self.move_block(id, to),
            Cmd::CreateParagraph { at } => {
                let paragraph = Node::empty_paragraph();
                let id = paragraph.id;
                let at = at.min(self.root.children.len());
                self.root.children.insert(at, paragraph);
                self.selection = Some(Selection::caret(id, 0));
                vec![id]
            }
            Cmd::Clear => {
                let paragraph = Node::empty_paragraph();
                let id = paragraph.id;
                self.root.children = vec![paragraph];
                self.selection = Some(Selection::caret(id, 0));
                vec![id]
            }
        }
    }

    /// The current selection, falling back to the end of the document when
    /// it is unset or points at a node that no longer exists.
    fn caret(&mut self) -> Option<Selection> {
        if !self
            .selection
            .is_some_and(|selection| self.root.contains(selection.node))
        {
            self.place_caret_at_end();
        }
        self.selection
    }

    /// Path of the nearest node, starting at the caret and walking up, whose
    /// kind matches.
    fn enclosing(&self, matches: impl Fn(&NodeKind) -> bool) -> Option<Vec<usize>> {
        let selection = self.selection?;
        let mut path = self.root.path_to(selection.node)?;
        loop {
            let node = self.root.node_at_path(&path)?;
            if matches(&node.kind) {
                return Some(path);
            }
            path.pop()?;
        }
    }

    /// Path of the nearest paragraph, heading or element enclosing the
    /// caret that sits where a block may go. Heading and blockquote commands
    /// act on it in place; an element inside a paragraph is inline markup and
    /// is skipped.
    fn enclosing_block(&self) -> Option<Vec<usize>> {
        let selection = self.selection?;
        let mut path = self.root.path_to(selection.node)?;
        loop {
            let (_, parent_path) = path.split_last()?;
            let parent = self.root.node_at_path(parent_path)?;
            let node = self.root.node_at_path(&path)?;
            let convertible = match node.kind {
                NodeKind::Paragraph | NodeKind::Heading(_) => true,
                NodeKind::Element { .. } => {
                    !node.children.iter().any(|child| is_block_kind(&child.kind))
                }
                _ => false,
            };
            if convertible && can_contain(&parent.kind, &NodeKind::Paragraph) {
                return Some(path);
            }
            path.pop();
        }
    }

    fn caret_at_end(&mut self, id: NodeId) {
        let Some(node) = self.root.find(id) else {
            return;
        };
        self.selection = Some(if node.is_empty_paragraph() {
            Selection::caret(id, 0)
        } else if let Some(text) = node.last_text() {
            Selection::caret(text.id, text.extent())
        } else {
            Selection::caret(id, node.extent())
        });
    }

    /// Removes the selected range and returns its text; the selection
    /// collapses to its start.
    fn delete_selection(&mut self) -> String {
        let Some(selection) = self.selection else {
            return String::new();
        };
        if selection.is_collapsed() {
            return String::new();
        }
        let Some(node) = self.root.find_mut(selection.node) else {
            return String::new();
        };

        let removed: String = match &mut node.kind {
            NodeKind::Text(text) => {
                let start = byte_index(text, selection.start);
                let end = byte_index(text, selection.end);
                text.drain(start..end).collect()
            }
            _ => {
                let end = selection.end.min(node.children.len());
                let start = selection.start.min(end);
                node.children
                    .drain(start..end)
                    .map(|child| child.text_content())
                    .collect()
            }
        };
        self.selection = Some(Selection::caret(selection.node, selection.start));
        removed
    }

    /// Splits the text run under the caret so that the caret falls between
    /// two children, and returns the parent path and child index of that
    /// slot.
    fn open_caret(&mut self) -> Option<(Vec<usize>, usize)> {
        let selection = self.caret()?;
        let mut path = self.root.path_to(selection.node)?;
        let node = self.root.node_at_path_mut(&path)?;

        let NodeKind::Text(text) = &mut node.kind else {
            return Some((path, selection.start.min(node.children.len())));
        };
        let index = path.pop()?;
        if selection.start == 0 {
            return Some((path, index));
        }
        if selection.start >= text.chars().count() {
            return Some((path, index + 1));
        }

        let at = byte_index(text, selection.start);
        let tail = text.split_off(at);
        let parent = self.root.node_at_path_mut(&path)?;
        parent.children.insert(index + 1, Node::text(tail));
        Some((path, index + 1))
    }

    fn insert_text(&mut self, text: &str) -> Vec<NodeId> {
        if text.is_empty() {
            return Vec::new();
        }
        self.delete_selection();
        let Some(selection) = self.caret() else {
            return Vec::new();
        };

        if let Some(node) = self.root.find_mut(selection.node)
            && let NodeKind::Text(existing) = &mut node.kind
        {
            let at = byte_index(existing, selection.start);
            existing.insert_str(at, text);
            let offset = selection.start + text.chars().count();
            self.selection = Some(Selection::caret(selection.node, offset));
            return vec![selection.node];
        }
        self.insert_inline(Node::text(text))
    }

    /// Inserts an inline node at the caret. The placeholder line break of an
    /// empty paragraph is replaced rather than kept; where the caret sits in
    /// a container that cannot hold inline content, the node goes into a new
    /// paragraph instead.
    fn insert_inline(&mut self, inline: Node) -> Vec<NodeId> {
        let Some((path, index)) = self.open_caret() else {
            return Vec::new();
        };
        let Some(parent) = self.root.node_at_path_mut(&path) else {
            return Vec::new();
        };
        let id = inline.id;

        if !can_contain(&parent.kind, &inline.kind) {
            let mut changed = self.insert_blocks(vec![Node::paragraph(vec![inline])], id);
            changed.push(id);
            return changed;
        }

        let text_length = inline.as_text().map(|text| text.chars().count());
        let slot = if parent.is_empty_paragraph() && inline.kind != NodeKind::LineBreak {
            parent.children = vec![inline];
            0
        } else {
            let slot = index.min(parent.children.len());
            parent.children.insert(slot, inline);
            slot
        };

        self.selection = Some(match text_length {
            Some(length) => Selection::caret(id, length),
            None => Selection::caret(parent.id, slot + 1),
        });
        vec![id]
    }

    /// Where new blocks go: the container path, the index, and whether the
    /// child at that index is an empty paragraph to be replaced.
    fn block_slot(&self, blocks: &[Node]) -> (Vec<usize>, usize, bool) {
        let fits = |node: &Node| blocks.iter().all(|block| can_contain(&node.kind, &block.kind));
        let at_end = (Vec::new(), self.root.children.len(), false);

        let Some(selection) = self.selection else {
            return at_end;
        };
        let Some(path) = self.root.path_to(selection.node) else {
            return at_end;
        };

        if let Some(node) = self.root.node_at_path(&path)
            && node.as_text().is_none()
            && fits(node)
        {
            return (path, selection.start.min(node.children.len()), false);
        }

        for depth in (0..path.len()).rev() {
            let Some(container) = self.root.node_at_path(&path[..depth]) else {
                continue;
            };
            if fits(container) {
                let index = path[depth];
                let replace = container
                    .children
                    .get(index)
                    .is_some_and(Node::is_empty_paragraph);
                let index = if replace { index } else { index + 1 };
                return (path[..depth].to_vec(), index, replace);
            }
        }
        at_end
    }

    /// Places blocks after the child holding the caret, in the nearest
    /// ancestor that may contain them, then puts the caret at the end of
    /// `caret_in`.
    fn insert_blocks(&mut self, blocks: Vec<Node>, caret_in: NodeId) -> Vec<NodeId> {
        let ids = blocks.iter().map(|block| block.id).collect();
        let (path, index, replace) = self.block_slot(&blocks);

        let Some(container) = self.root.node_at_path_mut(&path) else {
            return Vec::new();
        };
        let start = index.min(container.children.len());
        let end = if replace {
            (start + 1).min(container.children.len())
        } else {
            start
        };
        container.children.splice(start..end, blocks);

        self.caret_at_end(caret_in);
        ids
    }

    fn new_block(&mut self) -> Vec<NodeId> {
        let Some(item_path) = self.enclosing(|kind| *kind == NodeKind::ListItem) else {
            self.delete_selection();
            return self.insert_inline(Node::line_break());
        };
        let empty = self
            .root
            .node_at_path(&item_path)
            .is_some_and(|item| item.text_content().trim().is_empty());

        if empty {
            self.exit_list(item_path)
        } else {
            self.delete_selection();
            self.split_list_item(item_path)
        }
    }

    /// Leaves the list from an empty item: the item goes away and an empty
    /// paragraph follows the list, with the caret in it.
    fn exit_list(&mut self, mut item_path: Vec<usize>) -> Vec<NodeId> {
        let Some(item_index) = item_path.pop() else {
            return Vec::new();
        };
        let list_path = item_path;
        let Some((&list_index, parent_path)) = list_path.split_last() else {
            return Vec::new();
        };

        let Some(list) = self.root.node_at_path_mut(&list_path) else {
            return Vec::new();
        };
        if item_index < list.children.len() {
            list.children.remove(item_index);
        }
        let list_emptied = !list
            .children
            .iter()
            .any(|child| child.kind == NodeKind::ListItem);

        let paragraph = Node::empty_paragraph();
        let id = paragraph.id;
        let Some(parent) = self.root.node_at_path_mut(parent_path) else {
            return Vec::new();
        };
        if list_emptied && list_index < parent.children.len() {
            log::debug!("new block: list emptied, removing it");
            parent.children[list_index] = paragraph;
        } else {
            let at = (list_index + 1).min(parent.children.len());
            parent.children.insert(at, paragraph);
        }

        self.selection = Some(Selection::caret(id, 0));
        vec![id]
    }

    /// Splits a non-empty item at the caret; everything after it moves into
    /// a new item that follows.
    fn split_list_item(&mut self, item_path: Vec<usize>) -> Vec<NodeId> {
        let Some((slot_path, index)) = self.open_caret() else {
            return Vec::new();
        };
        // A caret nested inside one of the item's children splits after
        // that child.
        let split_at = match slot_path.get(item_path.len()) {
            Some(&child) if slot_path.len() > item_path.len() => child + 1,
            _ => index,
        };

        let Some(item) = self.root.node_at_path_mut(&item_path) else {
            return Vec::new();
        };
        let item_id = item.id;
        let tail = item.children.split_off(split_at.min(item.children.len()));
        let new_item = Node::list_item(tail);
        let new_id = new_item.id;
        let caret = match new_item.children.first() {
            Some(first) if first.as_text().is_some() => Selection::caret(first.id, 0),
            _ => Selection::caret(new_id, 0),
        };

        let Some((&item_index, list_path)) = item_path.split_last() else {
            return Vec::new();
        };
        let Some(list) = self.root.node_at_path_mut(list_path) else {
            return Vec::new();
        };
        list.children.insert(item_index + 1, new_item);

        self.selection = Some(caret);
        vec![item_id, new_id]
    }

    fn toggle_format(&mut self, mark: InlineMark) -> Vec<NodeId> {
        let Some(selection) = self.selection else {
            return Vec::new();
        };
        if selection.is_collapsed() {
            return Vec::new();
        }

        let target = mark.kind();
        if let Some(path) = self.enclosing(|kind| *kind == target) {
            return self.unwrap_mark(&path);
        }

        let Some(node) = self.root.find(selection.node) else {
            return Vec::new();
        };
        if node.as_text().is_some() {
            self.wrap_text_range(mark, selection)
        } else {
            self.wrap_child_range(mark, selection)
        }
    }

    /// Replaces a mark with a plain text run holding its text.
    fn unwrap_mark(&mut self, path: &[usize]) -> Vec<NodeId> {
        let Some(node) = self.root.node_at_path_mut(path) else {
            return Vec::new();
        };
        let text = Node::text(node.text_content());
        let id = text.id;
        let length = text.extent();
        *node = text;

        self.selection = Some(Selection::range(id, 0, length));
        vec![id]
    }

    fn wrap_text_range(&mut self, mark: InlineMark, selection: Selection) -> Vec<NodeId> {
        let Some(mut path) = self.root.path_to(selection.node) else {
            return Vec::new();
        };
        let Some(node) = self.root.node_at_path_mut(&path) else {
            return Vec::new();
        };
        let NodeKind::Text(text) = &mut node.kind else {
            return Vec::new();
        };

        let start = byte_index(text, selection.start);
        let end = byte_index(text, selection.end);
        if start >= end {
            return Vec::new();
        }
        let tail = text[end..].to_string();
        let inner = Node::text(&text[start..end]);
        text.truncate(start);
        let head_empty = text.is_empty();

        let inner_id = inner.id;
        let length = inner.extent();
        let wrapper = Node::mark(mark, vec![inner]);
        let wrapper_id = wrapper.id;

        let Some(index) = path.pop() else {
            return Vec::new();
        };
        let Some(parent) = self.root.node_at_path_mut(&path) else {
            return Vec::new();
        };
        let mut pieces = vec![wrapper];
        if !tail.is_empty() {
            pieces.push(Node::text(tail));
        }
        let range = if head_empty {
            index..index + 1
        } else {
            index + 1..index + 1
        };
        parent.children.splice(range, pieces);

        self.selection = Some(Selection::range(inner_id, 0, length));
        vec![wrapper_id]
    }

    /// Wraps a range of inline children. Inline code holds plain text only,
    /// so the range is flattened for it.
    fn wrap_child_range(&mut self, mark: InlineMark, selection: Selection) -> Vec<NodeId> {
        let Some(node) = self.root.find_mut(selection.node) else {
            return Vec::new();
        };
        let end = selection.end.min(node.children.len());
        let start = selection.start.min(end);
        if start == end
            || !can_contain(&node.kind, &mark.kind())
            || !node.children[start..end]
                .iter()
                .all(|child| is_inline_kind(&child.kind))
        {
            return Vec::new();
        }

        let taken = node.children.drain(start..end).collect::<Vec<_>>();
        let inner = if mark == InlineMark::Code {
            vec![Node::text(taken.iter().map(Node::text_content).collect::<String>())]
        } else {
            taken
        };
        let wrapper = Node::mark(mark, inner);
        let wrapper_id = wrapper.id;
        let slots = wrapper.children.len();
        node.children.insert(start, wrapper);

        self.selection = Some(Selection::range(wrapper_id, 0, slots));
        vec![wrapper_id]
    }

    fn insert_heading(&mut self, level: u8) -> Vec<NodeId> {
        let level = level.clamp(1, 6);
        let placeholder = format!("Heading {level}");

        if let Some(path) = self.enclosing_block()
            && let Some(block) = self.root.node_at_path_mut(&path)
        {
            block.kind = NodeKind::Heading(level);
            if block.text_content().trim().is_empty() {
                block.children.retain(|child| child.kind == NodeKind::DragHandle);
                block.children.push(Node::text(placeholder));
            }
            let id = block.id;
            self.caret_at_end(id);
            return vec![id];
        }

        let heading = Node::heading(level, vec![Node::text(placeholder)]);
        let id = heading.id;
        self.insert_blocks(vec![heading], id)
    }

    fn insert_blockquote(&mut self) -> Vec<NodeId> {
        if let Some(path) = self.enclosing_block()
            && let Some((&index, parent_path)) = path.split_last()
            && let Some(parent) = self.root.node_at_path_mut(parent_path)
            && can_contain(&parent.kind, &NodeKind::BlockQuote)
            && parent
                .children
                .get(index)
                .is_some_and(|block| !block.is_empty_paragraph())
        {
            let block = parent.children.remove(index);
            let quote = Node::blockquote(vec![block]);
            let id = quote.id;
            parent.children.insert(index, quote);
            return vec![id];
        }

        let quote = Node::blockquote(vec![Node::paragraph(vec![Node::text("Quote")])]);
        let id = quote.id;
        self.insert_blocks(vec![quote], id)
    }

    fn move_block(&mut self, id: NodeId, to: usize) -> Vec<NodeId> {
        let Some(from) = self.root.children.iter().position(|block| block.id == id) else {
            log::debug!("move block: {id} is not a top-level block");
            return Vec::new();
        };
        let to = to.min(self.root.children.len() - 1);
        if from == to {
            return Vec::new();
        }
        let block = self.root.children.remove(from);
        self.root.children.insert(to, block);
        vec![id]
    }
}

/// A header row labelled "Header i" and `rows - 1` body rows of "Cell r,c".
fn table(rows: usize, cols: usize) -> Node {
    let cols = cols.max(1);
    let cell = |label: String| Node::table_cell(vec![Node::text(label)]);

    let header = Node::table_row((1..=cols).map(|c| cell(format!("Header {c}"))).collect());
    let body = (1..rows.max(1)).map(|r| {
        Node::table_row((1..=cols).map(|c| cell(format!("Cell {r},{c}"))).collect())
    });

    Node::table(std::iter::once(header).chain(body).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::outline;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    /// A document with the caret at `offset` in the first text run.
    fn doc_with_caret(markdown: &str, offset: usize) -> Document {
        let mut doc = Document::from_markdown(markdown);
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::caret(text, offset)));
        doc
    }

    fn first_text(node: &Node) -> &Node {
        fn walk(node: &Node) -> Option<&Node> {
            if node.as_text().is_some() {
                return Some(node);
            }
            node.children.iter().find_map(walk)
        }
        walk(node).expect("document has text")
    }

    #[test]
    fn test_insert_text_into_text_run() {
        // Given a caret in the middle of a word
        let mut doc = doc_with_caret("Helo", 3);

        // When typing
        doc.apply(Cmd::InsertText { text: "l".into() });

        // Then the text is spliced and the caret moves past it
        assert_eq!(doc.to_markdown(), "Hello");
        let text = first_text(doc.root()).id;
        assert_eq!(doc.selection(), Some(Selection::caret(text, 4)));
    }

    #[test]
    fn test_insert_text_replaces_selection() {
        let mut doc = Document::from_markdown("Hello world");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 6, 11)));

        doc.apply(Cmd::InsertText {
            text: "there".into(),
        });

        assert_eq!(doc.to_markdown(), "Hello there");
    }

    #[test]
    fn test_insert_text_into_empty_document_replaces_placeholder() {
        let mut doc = Document::new();

        let patch = doc.apply(Cmd::InsertText { text: "hi".into() });

        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          Paragraph
            Text "hi"
        "#);
        assert_eq!(patch.version, 1);
    }

    #[test]
    fn test_new_block_in_empty_list_item_exits_list() {
        // Given a list whose last item is empty
        let mut doc = Document::from_root(Node::root(vec![Node::list(
            false,
            vec![
                Node::list_item(vec![Node::text("A")]),
                Node::list_item(vec![]),
            ],
        )]));
        let empty_item = doc.root().children[0].children[1].id;
        doc.set_selection(Some(Selection::caret(empty_item, 0)));

        // When pressing Enter
        doc.apply(Cmd::NewBlock);

        // Then the item is gone and an empty paragraph follows the list
        let root = doc.root();
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].children.len(), 1);
        assert!(root.children[1].is_empty_paragraph());
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(root.children[1].id, 0))
        );
        assert_eq!(doc.to_markdown(), "- A");
    }

    #[test]
    fn test_new_block_in_only_empty_item_removes_list() {
        let mut doc = Document::from_root(Node::root(vec![
            Node::paragraph(vec![Node::text("before")]),
            Node::list(false, vec![Node::list_item(vec![Node::text("  ")])]),
        ]));
        let whitespace = doc.root().children[1].children[0].children[0].id;
        doc.set_selection(Some(Selection::caret(whitespace, 1)));

        doc.apply(Cmd::NewBlock);

        let root = doc.root();
        assert_eq!(root.children.len(), 2);
        assert!(root.children[1].is_empty_paragraph());
        assert!(!root.children.iter().any(|block| block.kind.is_list()));
    }

    #[test]
    fn test_new_block_splits_list_item() {
        let mut doc = doc_with_caret("- Hello world", 5);

        doc.apply(Cmd::NewBlock);

        assert_eq!(doc.to_markdown(), "- Hello\n-  world");
        let list = &doc.root().children[0];
        let second = &list.children[1].children[0];
        assert_eq!(doc.selection(), Some(Selection::caret(second.id, 0)));
    }

    #[test]
    fn test_new_block_outside_list_inserts_line_break() {
        let mut doc = doc_with_caret("abcd", 2);

        doc.apply(Cmd::NewBlock);

        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          Paragraph
            Text "ab"
            LineBreak
            Text "cd"
        "#);
    }

    #[test]
    fn test_toggle_bold_wraps_selection() {
        // Given "x is x" with the last character selected
        let mut doc = Document::from_markdown("x is x");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 5, 6)));

        // When toggling bold
        doc.apply(Cmd::ToggleFormat {
            mark: InlineMark::Bold,
        });

        // Then only the selection is wrapped and stays selected
        assert_eq!(doc.to_markdown(), "x is **x**");
        let selection = doc.selection().unwrap();
        assert_eq!((selection.start, selection.end), (0, 1));
        let bold = &doc.root().children[0].children[1];
        assert_eq!(bold.children[0].id, selection.node);
    }

    #[test]
    fn test_toggle_bold_twice_unwraps() {
        let mut doc = Document::from_markdown("plain");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 0, 5)));

        doc.apply(Cmd::ToggleFormat {
            mark: InlineMark::Bold,
        });
        assert_eq!(doc.to_markdown(), "**plain**");
        doc.apply(Cmd::ToggleFormat {
            mark: InlineMark::Bold,
        });

        assert_eq!(doc.to_markdown(), "plain");
    }

    #[test]
    fn test_toggle_format_on_caret_is_noop() {
        let mut doc = doc_with_caret("text", 2);
        let patch = doc.apply(Cmd::ToggleFormat {
            mark: InlineMark::Italic,
        });
        assert!(patch.is_noop());
        assert_eq!(doc.version(), 0);
    }

    #[rstest]
    #[case(InlineMark::Italic, "a *b* c")]
    #[case(InlineMark::Strikethrough, "a ~~b~~ c")]
    #[case(InlineMark::Code, "a `b` c")]
    fn test_toggle_other_marks(#[case] mark: InlineMark, #[case] expected: &str) {
        let mut doc = Document::from_markdown("a b c");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 2, 3)));

        doc.apply(Cmd::ToggleFormat { mark });

        assert_eq!(doc.to_markdown(), expected);
    }

    #[test]
    fn test_insert_heading_converts_enclosing_paragraph() {
        let mut doc = doc_with_caret("Title", 0);
        let paragraph = doc.root().children[0].id;

        doc.apply(Cmd::InsertHeading { level: 2 });

        assert_eq!(doc.root().children[0].id, paragraph);
        assert_eq!(doc.to_markdown(), "## Title");
    }

    #[test]
    fn test_insert_heading_in_empty_document_uses_placeholder_text() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertHeading { level: 3 });

        assert_eq!(doc.to_markdown(), "### Heading 3");
        let text = first_text(doc.root());
        assert_eq!(doc.selection(), Some(Selection::caret(text.id, 9)));
    }

    #[test]
    fn test_insert_heading_in_list_item_nests_inside_item() {
        let mut doc = doc_with_caret("- item", 2);

        doc.apply(Cmd::InsertHeading { level: 1 });

        // A list item accepts blocks, so the heading nests inside it
        let item = &doc.root().children[0].children[0];
        assert_eq!(item.children[1].kind, NodeKind::Heading(1));
    }

    #[test]
    fn test_insert_list_after_caret_block() {
        let mut doc = doc_with_caret("first\n\nsecond", 0);

        doc.apply(Cmd::InsertList { ordered: true });

        let kinds = doc
            .root()
            .children
            .iter()
            .map(|block| block.kind.clone())
            .collect::<Vec<_>>();
        assert_eq!(
            kinds,
            vec![NodeKind::Paragraph, NodeKind::OrderedList, NodeKind::Paragraph]
        );
        assert_eq!(doc.root().children[1].text_content(), "List item");
    }

    #[test]
    fn test_insert_blockquote_wraps_paragraph() {
        let mut doc = doc_with_caret("quoted", 3);
        let paragraph = doc.root().children[0].id;

        doc.apply(Cmd::InsertBlockquote);

        let quote = &doc.root().children[0];
        assert_eq!(quote.kind, NodeKind::BlockQuote);
        assert_eq!(quote.children[0].id, paragraph);
    }

    #[test]
    fn test_insert_blockquote_into_empty_document() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertBlockquote);

        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          BlockQuote
            Paragraph
              Text "Quote"
        "#);
    }

    #[test]
    fn test_insert_code_block_takes_selected_text() {
        let mut doc = Document::from_markdown("let x = 1;");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 0, 10)));

        doc.apply(Cmd::InsertCodeBlock);

        let code = doc
            .root()
            .children
            .iter()
            .find(|block| block.kind == NodeKind::CodeBlock)
            .unwrap();
        assert_eq!(code.text_content(), "let x = 1;");
        assert!(doc.root().children.last().unwrap().is_empty_paragraph());
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(code.children[0].id, 10))
        );
    }

    #[test]
    fn test_insert_horizontal_rule_puts_caret_in_following_paragraph() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertHorizontalRule);

        let root = doc.root();
        assert_eq!(root.children[0].kind, NodeKind::HorizontalRule);
        assert!(root.children[1].is_empty_paragraph());
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(root.children[1].id, 0))
        );
        assert_eq!(doc.to_markdown(), "---");
    }

    #[test]
    fn test_insert_table() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertTable { rows: 2, cols: 2 });

        assert_eq!(
            doc.to_markdown(),
            "| Header 1 | Header 2 | \n| --- | --- | \n| Cell 1,1 | Cell 1,2 |"
        );
        let first_cell = &doc.root().children[0].children[0].children[0];
        let text = &first_cell.children[0];
        assert_eq!(doc.selection(), Some(Selection::caret(text.id, 8)));
    }

    #[test]
    fn test_insert_task_list() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertTaskList);

        assert_eq!(
            doc.to_markdown(),
            "- [ ] Task 1\n- [ ] Task 2\n- [ ] Task 3"
        );
    }

    #[test]
    fn test_insert_link_around_selection() {
        let mut doc = Document::from_markdown("see docs");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 4, 8)));

        doc.apply(Cmd::InsertLink {
            target: "https://e.com".into(),
        });

        assert_eq!(doc.to_markdown(), "see [docs](https://e.com)");
    }

    #[test]
    fn test_insert_link_with_empty_target_is_noop() {
        let mut doc = doc_with_caret("text", 4);
        let patch = doc.apply(Cmd::InsertLink {
            target: "  ".into(),
        });
        assert!(patch.is_noop());
    }

    #[test]
    fn test_insert_image_defaults_alt() {
        let mut doc = Document::new();

        doc.apply(Cmd::InsertImage {
            target: "a.png".into(),
            alt: None,
        });

        assert_eq!(doc.to_markdown(), "![Image](a.png)");
    }

    #[test]
    fn test_insert_image_after_text() {
        let mut doc = doc_with_caret("pic", 3);

        doc.apply(Cmd::InsertImage {
            target: "a.png".into(),
            alt: Some("Diagram".into()),
        });

        assert_eq!(doc.to_markdown(), "pic![Diagram](a.png)");
    }

    #[test]
    fn test_insert_image_replaces_selection() {
        // Given "world" selected
        let mut doc = Document::from_markdown("Hello world");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 6, 11)));

        // When inserting an image
        doc.apply(Cmd::InsertImage {
            target: "a.png".into(),
            alt: None,
        });

        // Then the image takes the place of the selected text
        assert_eq!(doc.to_markdown(), "Hello ![Image](a.png)");
    }

    #[test]
    fn test_new_block_replaces_selection() {
        let mut doc = Document::from_markdown("Hello world");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 5, 11)));

        doc.apply(Cmd::NewBlock);

        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          Paragraph
            Text "Hello"
            LineBreak
        "#);
    }

    #[test]
    fn test_new_block_in_list_item_replaces_selection() {
        let mut doc = Document::from_markdown("- Hello world");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 5, 11)));

        doc.apply(Cmd::NewBlock);

        let list = &doc.root().children[0];
        assert_eq!(list.children.len(), 2);
        assert_eq!(list.children[0].text_content(), "Hello");
        assert_eq!(list.children[1].text_content(), "");
    }

    #[rstest]
    #[case(Cmd::InsertList { ordered: false })]
    #[case(Cmd::InsertHorizontalRule)]
    #[case(Cmd::InsertTable { rows: 2, cols: 2 })]
    #[case(Cmd::InsertTaskList)]
    fn test_block_insertion_replaces_selection(#[case] cmd: Cmd) {
        // Given "world" selected in a paragraph
        let mut doc = Document::from_markdown("Hello world");
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::range(text, 6, 11)));

        // When inserting a block
        doc.apply(cmd);

        // Then the selected text is gone and the block follows what is left
        let root = doc.root();
        assert_eq!(root.children[0].text_content(), "Hello ");
        assert!(root.children.len() >= 2);
        assert!(!root.text_content().contains("world"));
    }

    #[test]
    fn test_insert_heading_converts_element_block() {
        // Given pasted markup inside a quote with the caret in it
        let mut doc = Document::from_root(Node::root(vec![Node::blockquote(vec![
            Node::element("div", vec![Node::text("pasted")]),
        ])]));
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::caret(text, 3)));

        // When making it a heading
        doc.apply(Cmd::InsertHeading { level: 2 });

        // Then the element itself becomes the heading
        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          BlockQuote
            Heading(2)
              Text "pasted"
        "#);
    }

    #[test]
    fn test_insert_heading_skips_inline_element() {
        let mut doc = Document::from_root(Node::root(vec![Node::paragraph(vec![
            Node::text("a "),
            Node::element("span", vec![Node::text("b")]),
        ])]));
        let span_text = doc.root().children[0].children[1].children[0].id;
        doc.set_selection(Some(Selection::caret(span_text, 1)));

        doc.apply(Cmd::InsertHeading { level: 1 });

        insta::assert_snapshot!(outline(doc.root()), @r#"
        Root
          Heading(1)
            Text "a "
            Element <span>
              Text "b"
        "#);
    }

    #[test]
    fn test_insert_blockquote_wraps_element_block() {
        let mut doc = Document::from_root(Node::root(vec![Node::blockquote(vec![
            Node::element("div", vec![Node::text("pasted")]),
        ])]));
        let element = doc.root().children[0].children[0].id;
        let text = first_text(doc.root()).id;
        doc.set_selection(Some(Selection::caret(text, 0)));

        doc.apply(Cmd::InsertBlockquote);

        let inner = &doc.root().children[0].children[0];
        assert_eq!(inner.kind, NodeKind::BlockQuote);
        assert_eq!(inner.children[0].id, element);
        assert_eq!(inner.children.len(), 1);
    }

    #[test]
    fn test_move_block_reorders_top_level() {
        let mut doc = Document::from_markdown("one\n\ntwo\n\nthree");
        let last = doc.root().children[2].id;

        doc.apply(Cmd::MoveBlock { id: last, to: 0 });

        let texts = doc
            .root()
            .children
            .iter()
            .map(Node::text_content)
            .collect::<Vec<_>>();
        assert_eq!(texts, vec!["three", "one", "two"]);
    }

    #[test]
    fn test_move_unknown_block_is_noop() {
        let mut doc = Document::from_markdown("one");
        let patch = doc.apply(Cmd::MoveBlock {
            id: NodeId::new(),
            to: 0,
        });
        assert!(patch.is_noop());
    }

    #[test]
    fn test_create_paragraph_at_end() {
        let mut doc = Document::from_markdown("# Title");

        doc.apply(Cmd::CreateParagraph { at: usize::MAX });

        let root = doc.root();
        assert_eq!(root.children.len(), 2);
        assert_eq!(
            doc.selection(),
            Some(Selection::caret(root.children[1].id, 0))
        );
    }

    #[test]
    fn test_clear_resets_to_empty_paragraph() {
        let mut doc = Document::from_markdown("# A\n\n- b");

        doc.apply(Cmd::Clear);

        assert_eq!(doc.root().children.len(), 1);
        assert!(doc.root().children[0].is_empty_paragraph());
        assert_eq!(doc.to_markdown(), "");
    }
}
