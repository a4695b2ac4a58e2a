//! # Normalizer
//!
//! Restores the block-structure invariants after an arbitrary mutation of
//! the live tree:
//!
//! - every direct child of the root is a block (stray text is copied into a
//!   new paragraph, any other stray node is relocated into one);
//! - the root always holds at least one block, the canonical empty
//!   paragraph (`Paragraph[LineBreak]`) standing in for an empty document;
//! - lists hold only list items, tables only rows, rows only cells.
//!
//! Drag handles are decorative and never repaired. The pass runs in place,
//! is idempotent and carries the caret through the surgery: a cursor on a
//! copied text run follows the copy, a cursor on a relocated node moves to
//! its start, and a cursor whose node disappeared is dropped.


use crate::model::{Cursor, Node, NodeId, NodeKind, can_contain, is_block_kind, repair_wrapper};

/// One structural repair performed by [`normalize`].
#[derive(Debug, Clone, PartialEq)]
pub enum Repair {
    /// A stray text run was copied into a new wrapper.
    CopiedText {
        original: NodeId,
        copy: NodeId,
        wrapper: NodeId,
    },
    /// A stray node was moved, unchanged, inside a new wrapper.
    Relocated { node: NodeId, wrapper: NodeId },
    /// A whitespace-only stray text run was removed.
    DroppedWhitespace { node: NodeId },
    /// The root held no block and was reset to the empty paragraph.
    ResetRoot { placeholder: NodeId },
}

/// Result of a normalize pass.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Normalized {
    pub repairs: Vec<Repair>,
    /// The caret re-resolved against the repaired tree; `None` when it could
    /// not be placed and the host has to choose a fallback position.
    pub cursor: Option<Cursor>,
}

impl Normalized {
    pub fn changed(&self) -> bool {
        !self.repairs.is_empty()
    }
}

/// Repairs `root` in place and re-resolves `cursor` against the result.
pub fn normalize(root: &mut Node, cursor: Option<Cursor>) -> Normalized {
    let mut pass = Pass {
        repairs: Vec::new(),
        cursor,
    };

    pass.collapse_lone_break(root);
    pass.repair(root);
    pass.ensure_block(root);

    let cursor = pass.resolve_cursor(root);
    if !pass.repairs.is_empty() {
        log::debug!("normalize: {} repair(s)", pass.repairs.len());
    }
    Normalized {
        repairs: pass.repairs,
        cursor,
    }
}

struct Pass {
    repairs: Vec<Repair>,
    cursor: Option<Cursor>,
}

impl Pass {
    /// A root whose only content is a bare line break is the browser's idea
    /// of an empty document.
    fn collapse_lone_break(&mut self, root: &mut Node) {
        if let [only] = root.children.as_slice()
            && only.kind == NodeKind::LineBreak
        {
            self.reset(root);
        }
    }

    fn ensure_block(&mut self, root: &mut Node) {
        if !root.children.iter().any(|child| is_block_kind(&child.kind)) {
            self.reset(root);
        }
    }

    fn reset(&mut self, root: &mut Node) {
        let placeholder = Node::empty_paragraph();
        log::debug!("normalize: root has no block, inserting empty paragraph");
        self.cursor = Some(Cursor::new(placeholder.id, 0));
        self.repairs.push(Repair::ResetRoot {
            placeholder: placeholder.id,
        });
        root.children.retain(|child| child.kind == NodeKind::DragHandle);
        root.children.push(placeholder);
    }

    fn repair(&mut self, node: &mut Node) {
        if let Some(wrap) = repair_wrapper(&node.kind) {
            let children = std::mem::take(&mut node.children);
            let mut repaired = Vec::with_capacity(children.len());

            for child in children {
                if child.kind == NodeKind::DragHandle || can_contain(&node.kind, &child.kind) {
                    repaired.push(child);
                    continue;
                }

                match child.as_text().map(str::to_owned) {
                    Some(text) if text.trim().is_empty() => {
                        log::debug!("normalize: dropping whitespace text {}", child.id);
                        self.repairs
                            .push(Repair::DroppedWhitespace { node: child.id });
                    }
                    Some(text) => {
                        let copy = Node::text(text);
                        if let Some(cursor) = self.cursor.as_mut()
                            && cursor.node == child.id
                        {
                            cursor.node = copy.id;
                        }
                        let copy_id = copy.id;
                        let wrapper = wrap(vec![copy]);
                        self.repairs.push(Repair::CopiedText {
                            original: child.id,
                            copy: copy_id,
                            wrapper: wrapper.id,
                        });
                        repaired.push(wrapper);
                    }
                    None => {
                        if let Some(cursor) = self.cursor.as_mut()
                            && cursor.node == child.id
                        {
                            cursor.offset = 0;
                        }
                        let node_id = child.id;
                        let wrapper = wrap(vec![child]);
                        log::debug!("normalize: relocating {node_id} into {}", wrapper.id);
                        self.repairs.push(Repair::Relocated {
                            node: node_id,
                            wrapper: wrapper.id,
                        });
                        repaired.push(wrapper);
                    }
                }
            }

            node.children = repaired;
        }

        for child in &mut node.children {
            self.repair(child);
        }
    }

    fn resolve_cursor(&self, root: &Node) -> Option<Cursor> {
        let cursor = self.cursor?;
        match root.find(cursor.node) {
            Some(node) => Some(Cursor::new(cursor.node, cursor.offset.min(node.extent()))),
            None => {
                log::debug!("normalize: cursor node {} is gone", cursor.node);
                None
            }
        }
    }
}
