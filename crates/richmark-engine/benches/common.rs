use richmark_engine::Node;

// Benchmark helper functions - Rust's dead code analysis doesn't understand
// that these are used by benchmark files in the same directory
// See: https://users.rust-lang.org/t/cargo-rustc-benches-awarnings/110111/2
#[allow(dead_code)]
pub fn generate_markdown_content(size: usize) -> String {
    let base = "# Title\n\n## Section\n\nParagraph with **bold**, *italic* and `code`.\n\n- Bullet point\n- Another item\n\n- [ ] Task\n- [x] Done\n\n| A | B |\n| --- | --- |\n| 1 | 2 |\n\n```\nfn example() {}\n```\n\n---\n\n";
    base.repeat(size)
}

/// A root full of stray inline content, the shape left behind by a paste.
#[allow(dead_code)]
pub fn generate_messy_tree(size: usize) -> Node {
    let mut children = Vec::new();
    for i in 0..size {
        children.push(Node::text(format!("stray text {i}")));
        children.push(Node::text("\n  "));
        children.push(Node::bold(vec![Node::text("loose bold")]));
        children.push(Node::list(
            false,
            vec![Node::text("unwrapped item"), Node::list_item(vec![Node::text("ok")])],
        ));
        children.push(Node::element("div", vec![Node::text("pasted div")]));
    }
    Node::root(children)
}
