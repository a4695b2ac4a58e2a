//! Tree → Markdown.
//!
//! A depth-first walk in tree order. Each node kind wraps its serialized
//! children in a fixed prefix/suffix; text runs are emitted literally,
//! without escaping. Kinds with no production of their own (the root, an
//! unknown host element, a table row or cell outside a table) contribute
//! only their children, so content is never dropped, only its wrapper.
//! Drag handles contribute nothing.
//!
//! Known gaps:
//! - ordered lists are written with the same `- ` marker as bullet lists;
//! - a `|` inside a table cell is not escaped.

use std::fmt::Write;

use crate::model::{Node, NodeKind};

/// Serializes a tree to Markdown. The result is trimmed of surrounding
/// whitespace.
pub fn serialize(root: &Node) -> String {
    serialize_node(root).trim().to_string()
}

/// The untrimmed production of a single node and its subtree.
pub fn serialize_node(node: &Node) -> String {
    let mut out = String::new();
    write_node(node, &mut out);
    out
}

fn write_node(node: &Node, out: &mut String) {
    match &node.kind {
        NodeKind::Text(text) => out.push_str(text),
        NodeKind::Heading(level) => {
            let hashes = "#".repeat(usize::from((*level).clamp(1, 6)));
            let _ = write!(out, "\n{hashes} ");
            write_children(node, out);
            out.push_str("\n\n");
        }
        NodeKind::Paragraph => wrap(node, "\n", "\n\n", out),
        NodeKind::Bold => wrap(node, "**", "**", out),
        NodeKind::Italic => wrap(node, "*", "*", out),
        NodeKind::Strikethrough => wrap(node, "~~", "~~", out),
        NodeKind::InlineCode => wrap(node, "`", "`", out),
        NodeKind::CodeBlock => wrap(node, "\n```\n", "\n```\n\n", out),
        NodeKind::Link { target } => {
            out.push('[');
            write_children(node, out);
            let _ = write!(out, "]({target})");
        }
        NodeKind::Image { target, alt } => {
            let _ = write!(out, "![{alt}]({target})");
        }
        NodeKind::BulletList | NodeKind::OrderedList => wrap(node, "\n", "\n", out),
        NodeKind::ListItem => wrap(node, "- ", "\n", out),
        NodeKind::BlockQuote => wrap(node, "\n> ", "\n\n", out),
        NodeKind::HorizontalRule => out.push_str("\n---\n\n"),
        NodeKind::LineBreak => out.push('\n'),
        NodeKind::Checkbox { checked: true } => out.push_str("[x] "),
        NodeKind::Checkbox { checked: false } => out.push_str("[ ] "),
        NodeKind::Table => {
            out.push('\n');
            write_table(node, out);
            out.push('\n');
        }
        NodeKind::DragHandle => {}
        NodeKind::Root
        | NodeKind::TableRow
        | NodeKind::TableCell
        | NodeKind::Element { .. } => write_children(node, out),
    }
}

fn wrap(node: &Node, prefix: &str, suffix: &str, out: &mut String) {
    out.push_str(prefix);
    write_children(node, out);
    out.push_str(suffix);
}

fn write_children(node: &Node, out: &mut String) {
    for child in &node.children {
        write_node(child, out);
    }
}

/// Writes the rows of a table: the first row as the header, then a
/// `---` separator per header cell, then the remaining rows.
pub(crate) fn write_table(table: &Node, out: &mut String) {
    let mut rows = table
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::TableRow);

    let Some(header) = rows.next() else {
        return;
    };
    let columns = write_row(header, out);

    out.push_str("| ");
    for _ in 0..columns {
        out.push_str("--- | ");
    }
    out.push('\n');

    for row in rows {
        write_row(row, out);
    }
}

/// Writes one row and returns its cell count.
fn write_row(row: &Node, out: &mut String) -> usize {
    out.push_str("| ");
    let mut cells = 0;
    for cell in row
        .children
        .iter()
        .filter(|child| child.kind == NodeKind::TableCell)
    {
        out.push_str(cell.text_content().trim());
        out.push_str(" | ");
        cells += 1;
    }
    out.push('\n');
    cells
}
