//! Markdown → tree, the load-side counterpart of the serializer.
//!
//! Parsing is delegated to `pulldown-cmark`; this module only maps its event
//! stream onto document nodes and hands the result to the normalizer.

use pulldown_cmark::{Event, HeadingLevel, Options, Parser, Tag, TagEnd};

use crate::model::{Node, NodeKind};
use crate::normalize::normalize;

/// Parses Markdown into a normalized root node.
pub fn parse_markdown(markdown: &str) -> Node {
    let mut options = Options::empty();
    options.insert(Options::ENABLE_TABLES);
    options.insert(Options::ENABLE_STRIKETHROUGH);
    options.insert(Options::ENABLE_TASKLISTS);

    let mut builder = TreeBuilder::new();
    for event in Parser::new_ext(markdown, options) {
        builder.push(event);
    }

    let mut root = builder.finish();
    normalize(&mut root, None);
    root
}

/// Open nodes, outermost first. The bottom of the stack is the root.
struct TreeBuilder {
    stack: Vec<Node>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            stack: vec![Node::root(Vec::new())],
        }
    }

    fn push(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.open(tag),
            Event::End(end) => self.close(end),
            Event::Text(text) => self.text(&text),
            Event::Code(code) => self.append(Node::inline_code(code.into_string())),
            Event::InlineMath(math) | Event::DisplayMath(math) => self.text(&math),
            Event::Html(html) | Event::InlineHtml(html) => self.text(&html),
            Event::FootnoteReference(label) => self.text(&format!("[^{label}]")),
            Event::SoftBreak => self.text("\n"),
            Event::HardBreak => self.append(Node::line_break()),
            Event::Rule => self.append(Node::horizontal_rule()),
            Event::TaskListMarker(checked) => self.append(Node::checkbox(checked)),
        }
    }

    fn open(&mut self, tag: Tag) {
        let node = match tag {
            Tag::Paragraph => Node::paragraph(Vec::new()),
            Tag::Heading { level, .. } => Node::heading(heading_level(level), Vec::new()),
            Tag::BlockQuote(_) => Node::blockquote(Vec::new()),
            Tag::CodeBlock(_) => Node::new(NodeKind::CodeBlock),
            Tag::List(start) => Node::list(start.is_some(), Vec::new()),
            Tag::Item => Node::list_item(Vec::new()),
            Tag::Table(_) => Node::table(Vec::new()),
            // The head holds its cells directly; it becomes the first row.
            Tag::TableHead | Tag::TableRow => Node::table_row(Vec::new()),
            Tag::TableCell => Node::table_cell(Vec::new()),
            Tag::Emphasis => Node::italic(Vec::new()),
            Tag::Strong => Node::bold(Vec::new()),
            Tag::Strikethrough => Node::strikethrough(Vec::new()),
            Tag::Link { dest_url, .. } => Node::link(dest_url.into_string(), Vec::new()),
            Tag::Image { dest_url, .. } => Node::image(dest_url.into_string(), String::new()),
            other => Node::element(format!("{other:?}"), Vec::new()),
        };
        self.stack.push(node);
    }

    fn close(&mut self, _end: TagEnd) {
        if self.stack.len() < 2 {
            return;
        }
        if let Some(node) = self.stack.pop() {
            let node = finish_node(node);
            self.append(node);
        }
    }

    fn append(&mut self, node: Node) {
        if let Some(top) = self.stack.last_mut() {
            top.children.push(node);
        }
    }

    /// Appends text, merging with a preceding text run.
    fn text(&mut self, text: &str) {
        let Some(top) = self.stack.last_mut() else {
            return;
        };
        if let Some(NodeKind::Text(existing)) = top.children.last_mut().map(|last| &mut last.kind) {
            existing.push_str(text);
        } else {
            top.children.push(Node::text(text));
        }
    }

    fn finish(mut self) -> Node {
        while self.stack.len() > 1 {
            if let Some(node) = self.stack.pop() {
                let node = finish_node(node);
                self.append(node);
            }
        }
        self.stack.pop().unwrap_or_else(|| Node::root(Vec::new()))
    }
}

/// Per-kind fix-ups once all of a node's children are known.
fn finish_node(mut node: Node) -> Node {
    match &mut node.kind {
        NodeKind::Image { alt, .. } => {
            *alt = node.children.iter().map(Node::text_content).collect();
            node.children.clear();
        }
        NodeKind::CodeBlock => {
            let mut code = node.text_content();
            if code.ends_with('\n') {
                code.pop();
            }
            node.children = vec![Node::text(code)];
        }
        _ => {}
    }
    node
}

fn heading_level(level: HeadingLevel) -> u8 {
    match level {
        HeadingLevel::H1 => 1,
        HeadingLevel::H2 => 2,
        HeadingLevel::H3 => 3,
        HeadingLevel::H4 => 4,
        HeadingLevel::H5 => 5,
        HeadingLevel::H6 => 6,
    }
}
