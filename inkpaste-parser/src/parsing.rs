//! Markdown parsing (Markdown → structural tree)
//!
//! Pipeline: Markdown string → comrak arena AST → owned [`Node`] tree
//!
//! comrak does the actual parsing with the GitHub-flavoured extensions switched on. This
//! module only adapts its arena tree into our owned tree, keeping the start position of
//! every node. comrak kinds without a counterpart are flattened into their children so no
//! content is lost and nothing can fail.

use crate::ast::{Document, EmphasisKind, Node, NodeKind, Position, TableAlignment};
use crate::front_matter;
use comrak::nodes::{AstNode, ListType, NodeValue};
use comrak::{parse_document as parse_comrak, Arena, Options};

/// Parse Markdown source into a structural document.
///
/// Never fails: malformed syntax ends up as literal text.
pub fn parse_document(source: &str) -> Document {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let arena = Arena::new();
    let options = comrak_options(front_matter::detect_delimiter(source));
    let root = parse_comrak(&arena, source, &options);
    Document::new(convert_children(root))
}

fn comrak_options(front_matter_delimiter: Option<&str>) -> Options<'static> {
    let mut options = Options::default();
    options.extension.table = true;
    options.extension.strikethrough = true;
    options.extension.autolink = true;
    options.extension.tasklist = true;
    options.extension.superscript = true;
    options.extension.subscript = true;
    options.extension.description_lists = true;
    options.extension.shortcodes = true;
    options.extension.math_dollars = true;
    options.extension.math_code = true;
    options.extension.front_matter_delimiter = front_matter_delimiter.map(str::to_string);
    options
}

fn convert_children<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let mut children = Vec::new();
    for child in node.children() {
        children.extend(convert_node(child));
    }
    merge_adjacent_text(children)
}

/// Convert one comrak node. Returns several nodes when the comrak node is flattened.
fn convert_node<'a>(node: &'a AstNode<'a>) -> Vec<Node> {
    let ast = node.data.borrow();
    let start = ast.sourcepos.start;
    let position = Position::new(start.line, start.column);

    let kind = match &ast.value {
        NodeValue::Document | NodeValue::DescriptionItem(_) => return convert_children(node),

        NodeValue::FrontMatter(text) => NodeKind::FrontMatter(text.clone()),

        NodeValue::BlockQuote | NodeValue::MultilineBlockQuote(_) | NodeValue::Alert(_) => {
            NodeKind::BlockQuote
        }

        NodeValue::List(list) => NodeKind::List {
            ordered: matches!(list.list_type, ListType::Ordered),
            start: list.start,
            tight: list.tight,
        },

        NodeValue::Item(_) => NodeKind::ListItem { checked: None },

        NodeValue::TaskItem(mark) => NodeKind::ListItem {
            checked: Some(mark.is_some()),
        },

        NodeValue::DescriptionList => NodeKind::DefinitionList,
        NodeValue::DescriptionTerm => NodeKind::DefinitionTerm,
        NodeValue::DescriptionDetails => NodeKind::DefinitionDescription,

        NodeValue::CodeBlock(block) => {
            let language = block.info.split_whitespace().next().map(str::to_string);
            let kind = if language.as_deref() == Some("math") {
                NodeKind::MathBlock(block.literal.clone())
            } else {
                NodeKind::CodeBlock {
                    language,
                    literal: block.literal.clone(),
                }
            };
            return vec![Node::new(kind).at(position)];
        }

        NodeValue::HtmlBlock(html) => NodeKind::RawHtml {
            literal: html.literal.clone(),
            block: true,
        },

        NodeValue::Paragraph => {
            if let Some(literal) = sole_display_math(node) {
                return vec![Node::new(NodeKind::MathBlock(literal)).at(position)];
            }
            NodeKind::Paragraph
        }

        NodeValue::Heading(heading) => NodeKind::Heading {
            level: heading.level.clamp(1, 6),
        },

        NodeValue::ThematicBreak => NodeKind::ThematicBreak,

        NodeValue::Table(table) => NodeKind::Table {
            alignments: table.alignments.iter().map(convert_alignment).collect(),
        },
        NodeValue::TableRow(header) => NodeKind::TableRow { header: *header },
        NodeValue::TableCell => NodeKind::TableCell,

        NodeValue::Text(text) => NodeKind::Text(text.clone()),
        NodeValue::Raw(text) => NodeKind::Text(text.clone()),
        NodeValue::SoftBreak => NodeKind::SoftBreak,
        NodeValue::LineBreak => NodeKind::LineBreak,

        NodeValue::Code(code) => NodeKind::InlineCode(code.literal.clone()),
        NodeValue::HtmlInline(html) => NodeKind::RawHtml {
            literal: html.clone(),
            block: false,
        },

        NodeValue::Emph => NodeKind::Emphasis(EmphasisKind::Emphasis),
        NodeValue::Strong => NodeKind::Emphasis(EmphasisKind::Strong),
        NodeValue::Strikethrough => NodeKind::Emphasis(EmphasisKind::Strikethrough),
        NodeValue::Superscript => NodeKind::Emphasis(EmphasisKind::Superscript),
        NodeValue::Subscript => NodeKind::Emphasis(EmphasisKind::Subscript),
        NodeValue::Underline => NodeKind::Emphasis(EmphasisKind::Underline),

        NodeValue::Link(link) => NodeKind::Link {
            url: link.url.clone(),
            title: link.title.clone(),
        },
        NodeValue::WikiLink(link) => NodeKind::Link {
            url: link.url.clone(),
            title: String::new(),
        },

        NodeValue::Image(link) => {
            let mut alt = String::new();
            collect_comrak_text(node, &mut alt);
            let kind = NodeKind::Image {
                url: link.url.clone(),
                alt,
                title: link.title.clone(),
            };
            return vec![Node::new(kind).at(position)];
        }

        NodeValue::ShortCode(shortcode) => NodeKind::Text(shortcode.emoji.clone()),

        NodeValue::Math(math) => NodeKind::MathInline {
            literal: math.literal.clone(),
            display: math.display_math,
        },

        // Escaped, spoilers, footnotes: keep whatever text they hold
        _ => return convert_children(node),
    };

    vec![Node::with_children(kind, convert_children(node)).at(position)]
}

fn convert_alignment(alignment: &comrak::nodes::TableAlignment) -> TableAlignment {
    match alignment {
        comrak::nodes::TableAlignment::None => TableAlignment::None,
        comrak::nodes::TableAlignment::Left => TableAlignment::Left,
        comrak::nodes::TableAlignment::Center => TableAlignment::Center,
        comrak::nodes::TableAlignment::Right => TableAlignment::Right,
    }
}

/// `$$...$$` alone in a paragraph is promoted to a math block.
fn sole_display_math<'a>(paragraph: &'a AstNode<'a>) -> Option<String> {
    let mut found = None;
    for child in paragraph.children() {
        let data = child.data.borrow();
        match &data.value {
            NodeValue::Math(math) if math.display_math && found.is_none() => {
                found = Some(math.literal.clone());
            }
            NodeValue::Text(text) if text.trim().is_empty() => {}
            NodeValue::SoftBreak | NodeValue::LineBreak => {}
            _ => return None,
        }
    }
    found
}

fn collect_comrak_text<'a>(node: &'a AstNode<'a>, out: &mut String) {
    for child in node.children() {
        match &child.data.borrow().value {
            NodeValue::Text(text) => out.push_str(text),
            NodeValue::Code(code) => out.push_str(&code.literal),
            NodeValue::SoftBreak | NodeValue::LineBreak => out.push(' '),
            _ => {}
        }
        collect_comrak_text(child, out);
    }
}

/// comrak can split one run of text into several nodes; downstream passes expect one.
fn merge_adjacent_text(nodes: Vec<Node>) -> Vec<Node> {
    let mut merged: Vec<Node> = Vec::with_capacity(nodes.len());
    for node in nodes {
        if let NodeKind::Text(next) = &node.kind {
            if let Some(Node {
                kind: NodeKind::Text(previous),
                ..
            }) = merged.last_mut()
            {
                previous.push_str(next);
                continue;
            }
        }
        merged.push(node);
    }
    merged
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(doc: &Document) -> Vec<&'static str> {
        doc.children().iter().map(|n| n.kind.name()).collect()
    }

    #[test]
    fn test_simple_paragraph() {
        let doc = parse_document("This is a simple paragraph.\n");
        assert_eq!(kinds(&doc), vec!["paragraph"]);
        assert_eq!(doc.children()[0].plain_text(), "This is a simple paragraph.");
        assert_eq!(doc.children()[0].position, Some(Position::new(1, 1)));
    }

    #[test]
    fn test_heading_levels_and_positions() {
        let doc = parse_document("# One\n\ntext\n\n### Three\n");
        assert_eq!(kinds(&doc), vec!["heading", "paragraph", "heading"]);
        assert_eq!(doc.children()[0].kind, NodeKind::Heading { level: 1 });
        assert_eq!(doc.children()[2].kind, NodeKind::Heading { level: 3 });
        assert_eq!(doc.children()[2].position.map(|p| p.line), Some(5));
    }

    #[test]
    fn test_code_block_language() {
        let doc = parse_document("```rust\nfn main() {}\n```\n");
        assert_eq!(
            doc.children()[0].kind,
            NodeKind::CodeBlock {
                language: Some("rust".to_string()),
                literal: "fn main() {}\n".to_string(),
            }
        );
    }

    #[test]
    fn test_image_alt_is_flattened() {
        let doc = parse_document("![a *cat*](cat.png \"t\")\n");
        let image = &doc.children()[0].children[0];
        assert_eq!(
            image.kind,
            NodeKind::Image {
                url: "cat.png".to_string(),
                alt: "a cat".to_string(),
                title: "t".to_string(),
            }
        );
        assert!(image.children.is_empty());
    }

    #[test]
    fn test_front_matter_node_is_produced() {
        let doc = parse_document("---\ntitle: x\n---\n\nBody\n");
        assert_eq!(kinds(&doc), vec!["front-matter", "paragraph"]);
        // line numbers stay relative to the full source
        assert_eq!(doc.children()[1].position.map(|p| p.line), Some(5));
    }

    #[test]
    fn test_toml_front_matter_is_produced() {
        let doc = parse_document("+++\ntitle = \"x\"\n+++\nBody\n");
        assert_eq!(kinds(&doc), vec!["front-matter", "paragraph"]);
    }

    #[test]
    fn test_gfm_extensions() {
        let doc = parse_document("~~gone~~ x^2^ H~2~O :smile: https://example.com\n");
        let para = &doc.children()[0];
        let inline: Vec<_> = para.children.iter().map(|n| n.kind.clone()).collect();
        assert!(inline.contains(&NodeKind::Emphasis(EmphasisKind::Strikethrough)));
        assert!(inline.contains(&NodeKind::Emphasis(EmphasisKind::Superscript)));
        assert!(inline.contains(&NodeKind::Emphasis(EmphasisKind::Subscript)));
        assert!(para.plain_text().contains('😄'));
        assert!(para
            .children
            .iter()
            .any(|n| matches!(&n.kind, NodeKind::Link { url, .. } if url == "https://example.com")));
    }

    #[test]
    fn test_table() {
        let doc = parse_document("| a | b |\n|:--|--:|\n| 1 | 2 |\n");
        let table = &doc.children()[0];
        assert_eq!(
            table.kind,
            NodeKind::Table {
                alignments: vec![TableAlignment::Left, TableAlignment::Right]
            }
        );
        assert_eq!(table.children.len(), 2);
        assert_eq!(table.children[0].kind, NodeKind::TableRow { header: true });
        assert_eq!(table.children[1].children[1].plain_text(), "2");
    }

    #[test]
    fn test_definition_list() {
        let doc = parse_document("Term\n\n: Details here\n");
        let list = &doc.children()[0];
        assert_eq!(list.kind, NodeKind::DefinitionList);
        let kinds: Vec<_> = list.children.iter().map(|n| n.kind.name()).collect();
        assert_eq!(kinds, vec!["definition-term", "definition-description"]);
    }

    #[test]
    fn test_math_spans() {
        let doc = parse_document("Inline $x^2$ here.\n\n$$\ne=mc^2\n$$\n");
        let para = &doc.children()[0];
        assert!(para
            .children
            .iter()
            .any(|n| matches!(&n.kind, NodeKind::MathInline { literal, display: false } if literal == "x^2")));
        assert!(matches!(&doc.children()[1].kind, NodeKind::MathBlock(tex) if tex.contains("e=mc^2")));
    }

    #[test]
    fn test_math_code_fence() {
        let doc = parse_document("```math\na+b\n```\n");
        assert_eq!(doc.children()[0].kind, NodeKind::MathBlock("a+b\n".to_string()));
    }

    #[test]
    fn test_task_list() {
        let doc = parse_document("- [x] done\n- [ ] todo\n- plain\n");
        let items = &doc.children()[0].children;
        assert_eq!(items[0].kind, NodeKind::ListItem { checked: Some(true) });
        assert_eq!(items[1].kind, NodeKind::ListItem { checked: Some(false) });
        assert_eq!(items[2].kind, NodeKind::ListItem { checked: None });
        assert!(matches!(
            doc.children()[0].kind,
            NodeKind::List { ordered: false, tight: true, .. }
        ));
    }

    #[test]
    fn test_raw_html_block() {
        let doc = parse_document("<div>hi</div>\n");
        assert!(matches!(
            &doc.children()[0].kind,
            NodeKind::RawHtml { block: true, literal } if literal.starts_with("<div>")
        ));
    }

    #[test]
    fn test_highlight_delimiters_stay_in_one_text_node() {
        let doc = parse_document("这是 ==重点== 提醒\n");
        let para = &doc.children()[0];
        assert_eq!(para.children.len(), 1);
        assert_eq!(para.children[0].kind, NodeKind::Text("这是 ==重点== 提醒".into()));
    }

    #[test]
    fn test_malformed_input_degrades_to_text() {
        let doc = parse_document("**unclosed [link( ![img\n");
        assert_eq!(kinds(&doc), vec!["paragraph"]);
        assert_eq!(doc.children()[0].plain_text(), "**unclosed [link( ![img");
    }
}
