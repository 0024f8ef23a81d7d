//! Structural document tree
//!
//! The tree is fully owned: every node owns an ordered `Vec` of children, so passes that
//! rewrite it do so through `&mut` borrows of a single tree built fresh per call.
//!
//! ## Key Design
//!
//! - **Optional positions**: Nodes created by comrak carry the line/column of their first
//!   character. Synthetic nodes have none.
//! - **Source line is separate from position**: `position` is what the parser saw,
//!   `source_line` is what the annotator decided to expose to the renderer. Only the
//!   annotator writes it, and only once.

use serde::Serialize;
use std::fmt;

/// A 1-based line:column position in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmphasisKind {
    Strong,
    Emphasis,
    Strikethrough,
    Superscript,
    Subscript,
    Underline,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableAlignment {
    None,
    Left,
    Center,
    Right,
}

/// The kind of a structural node, with the data specific to that kind.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    Document,
    FrontMatter(String),
    Heading { level: u8 },
    Paragraph,
    /// Items of a `tight` list hold their text directly, without paragraph spacing
    List {
        ordered: bool,
        start: usize,
        tight: bool,
    },
    /// `checked` is `Some` only for task list items
    ListItem { checked: Option<bool> },
    BlockQuote,
    CodeBlock { language: Option<String>, literal: String },
    InlineCode(String),
    Image { url: String, alt: String, title: String },
    Link { url: String, title: String },
    Table { alignments: Vec<TableAlignment> },
    TableRow { header: bool },
    TableCell,
    Text(String),
    Emphasis(EmphasisKind),
    RawHtml { literal: String, block: bool },
    ThematicBreak,
    DefinitionList,
    DefinitionTerm,
    DefinitionDescription,
    MathBlock(String),
    MathInline { literal: String, display: bool },
    SoftBreak,
    LineBreak,
}

impl NodeKind {
    /// Block-level kinds that receive a source-line annotation.
    pub fn carries_source_line(&self) -> bool {
        matches!(
            self,
            NodeKind::Paragraph
                | NodeKind::Heading { .. }
                | NodeKind::List { .. }
                | NodeKind::ListItem { .. }
                | NodeKind::BlockQuote
                | NodeKind::CodeBlock { .. }
                | NodeKind::Image { .. }
                | NodeKind::Link { .. }
                | NodeKind::Table { .. }
                | NodeKind::RawHtml { .. }
                | NodeKind::ThematicBreak
        )
    }

    pub fn name(&self) -> &'static str {
        match self {
            NodeKind::Document => "document",
            NodeKind::FrontMatter(_) => "front-matter",
            NodeKind::Heading { .. } => "heading",
            NodeKind::Paragraph => "paragraph",
            NodeKind::List { .. } => "list",
            NodeKind::ListItem { .. } => "list-item",
            NodeKind::BlockQuote => "blockquote",
            NodeKind::CodeBlock { .. } => "code-block",
            NodeKind::InlineCode(_) => "inline-code",
            NodeKind::Image { .. } => "image",
            NodeKind::Link { .. } => "link",
            NodeKind::Table { .. } => "table",
            NodeKind::TableRow { .. } => "table-row",
            NodeKind::TableCell => "table-cell",
            NodeKind::Text(_) => "text",
            NodeKind::Emphasis(_) => "emphasis",
            NodeKind::RawHtml { .. } => "raw-html",
            NodeKind::ThematicBreak => "thematic-break",
            NodeKind::DefinitionList => "definition-list",
            NodeKind::DefinitionTerm => "definition-term",
            NodeKind::DefinitionDescription => "definition-description",
            NodeKind::MathBlock(_) => "math-block",
            NodeKind::MathInline { .. } => "math-inline",
            NodeKind::SoftBreak => "soft-break",
            NodeKind::LineBreak => "line-break",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub children: Vec<Node>,
    pub position: Option<Position>,
    /// Set by the source-position annotator; never overwritten once present.
    pub source_line: Option<usize>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            children: Vec::new(),
            position: None,
            source_line: None,
        }
    }

    pub fn with_children(kind: NodeKind, children: Vec<Node>) -> Self {
        Self {
            children,
            ..Self::new(kind)
        }
    }

    pub fn at(mut self, position: Position) -> Self {
        self.position = Some(position);
        self
    }

    pub fn text(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Text(value.into()))
    }

    /// Concatenated text content of this node and its descendants.
    ///
    /// Inline code and math contribute their literal, image alt text is included, breaks
    /// become a single space.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.collect_text(&mut out);
        out
    }

    fn collect_text(&self, out: &mut String) {
        match &self.kind {
            NodeKind::Text(value) | NodeKind::InlineCode(value) => out.push_str(value),
            NodeKind::MathInline { literal, .. } | NodeKind::MathBlock(literal) => {
                out.push_str(literal)
            }
            NodeKind::Image { alt, .. } => out.push_str(alt),
            NodeKind::SoftBreak | NodeKind::LineBreak => out.push(' '),
            _ => {}
        }
        for child in &self.children {
            child.collect_text(out);
        }
    }

    /// Pre-order visit of this node and every descendant.
    pub fn walk<'a>(&'a self, visit: &mut impl FnMut(&'a Node)) {
        visit(self);
        for child in &self.children {
            child.walk(visit);
        }
    }

    /// Pre-order mutable visit of this node and every descendant.
    pub fn walk_mut(&mut self, visit: &mut impl FnMut(&mut Node)) {
        visit(self);
        for child in &mut self.children {
            child.walk_mut(visit);
        }
    }
}

/// The root of a parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub root: Node,
}

impl Document {
    pub fn new(children: Vec<Node>) -> Self {
        Self {
            root: Node::with_children(NodeKind::Document, children),
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.root.children
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_flattens_inlines() {
        let para = Node::with_children(
            NodeKind::Paragraph,
            vec![
                Node::text("Hello "),
                Node::with_children(
                    NodeKind::Emphasis(EmphasisKind::Strong),
                    vec![Node::text("bold")],
                ),
                Node::new(NodeKind::SoftBreak),
                Node::new(NodeKind::InlineCode("x".to_string())),
            ],
        );
        assert_eq!(para.plain_text(), "Hello bold x");
    }

    #[test]
    fn test_walk_is_pre_order() {
        let doc = Document::new(vec![
            Node::with_children(NodeKind::Paragraph, vec![Node::text("a")]),
            Node::new(NodeKind::ThematicBreak),
        ]);
        let mut names = vec![];
        doc.root.walk(&mut |node| names.push(node.kind.name()));
        assert_eq!(names, vec!["document", "paragraph", "text", "thematic-break"]);
    }

    #[test]
    fn test_source_line_allow_list() {
        assert!(NodeKind::Paragraph.carries_source_line());
        assert!(NodeKind::ThematicBreak.carries_source_line());
        assert!(!NodeKind::Text("x".into()).carries_source_line());
        assert!(!NodeKind::DefinitionList.carries_source_line());
        assert!(!NodeKind::TableRow { header: false }.carries_source_line());
    }
}
