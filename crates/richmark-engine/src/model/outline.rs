use std::fmt::Write;

use crate::model::{Node, NodeKind};

/// Renders a tree as an indented outline, one node per line.
///
/// Ids are left out so the output is stable across runs; it is what the CLI
/// `tree` command prints and what snapshot tests compare against.
pub fn outline(node: &Node) -> String {
    let mut out = String::new();
    write_outline(node, 0, &mut out);
    out
}

fn write_outline(node: &Node, depth: usize, out: &mut String) {
    let indent = "  ".repeat(depth);
    let _ = writeln!(out, "{indent}{}", label(&node.kind));
    for child in &node.children {
        write_outline(child, depth + 1, out);
    }
}

fn label(kind: &NodeKind) -> String {
    match kind {
        NodeKind::Heading(level) => format!("Heading({level})"),
        NodeKind::Text(text) => format!("Text {text:?}"),
        NodeKind::Link { target } => format!("Link {target:?}"),
        NodeKind::Image { target, alt } => format!("Image {target:?} alt={alt:?}"),
        NodeKind::Checkbox { checked: true } => "Checkbox [x]".to_string(),
        NodeKind::Checkbox { checked: false } => "Checkbox [ ]".to_string(),
        NodeKind::Element { tag } => format!("Element <{tag}>"),
        other => format!("{other:?}"),
    }
}
