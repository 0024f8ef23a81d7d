//! Lowering (structural tree → markup tree)
//!
//! Maps every structural node to the HTML element that represents it and carries annotated
//! source lines over as `data-line` attributes. No styling happens here: with styling turned
//! off the lowered tree is what gets serialized, apart from grid layout.
//!
//! | Node | Markup |
//! |------|--------|
//! | Heading | `<h1>`..`<h6>` |
//! | Paragraph | `<p>` (omitted inside tight list items) |
//! | List | `<ul>` / `<ol start>` |
//! | CodeBlock | `<pre><code class="language-x">` |
//! | Table | `<table><thead>/<tbody>` with `<th>` / `<td align>` |
//! | Emphasis | `<strong> <em> <del> <sup> <sub> <u>` |
//! | Math | placeholder `<section>` / `<span>` with `data-math` + `data-tex` |
//! | RawHtml | sanitized fragment |

use crate::markup::{Element, MarkupDocument, MarkupNode};
use crate::sanitize;
use inkpaste_parser::{Document, EmphasisKind, Node, NodeKind, TableAlignment};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MATH_ATTR: &str = "data-math";
pub const TEX_ATTR: &str = "data-tex";

const CHECKED_PREFIX: &str = "☑ ";
const UNCHECKED_PREFIX: &str = "☐ ";

static OPENING_TAG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^<([A-Za-z][A-Za-z0-9-]*)[^>]*>$").unwrap());

/// Lower a prepared document into a markup document
pub fn lower_document(doc: &Document) -> MarkupDocument {
    let context = Context::default();
    MarkupDocument::new(lower_nodes(&doc.root.children, &context))
}

#[derive(Debug, Clone, Copy, Default)]
struct Context {
    /// Direct children of a tight list item: paragraphs are unwrapped
    tight: bool,
}

fn lower_nodes(nodes: &[Node], context: &Context) -> Vec<MarkupNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut i = 0;
    while i < nodes.len() {
        let node = &nodes[i];
        if let NodeKind::RawHtml {
            literal,
            block: false,
        } = &node.kind
        {
            i = lower_inline_html(nodes, i, literal, context, &mut out);
            continue;
        }
        out.extend(lower_node(node, context));
        i += 1;
    }
    out
}

fn lower_node(node: &Node, context: &Context) -> Vec<MarkupNode> {
    let element = match &node.kind {
        NodeKind::Document => return lower_nodes(&node.children, context),
        NodeKind::FrontMatter(_) => return Vec::new(),
        NodeKind::Text(value) => return vec![MarkupNode::text(value.clone())],
        NodeKind::SoftBreak => return vec![MarkupNode::text("\n")],
        NodeKind::LineBreak => Element::new("br"),

        NodeKind::Paragraph if context.tight => {
            return lower_nodes(&node.children, &Context::default())
        }
        NodeKind::Paragraph => Element::new("p"),
        NodeKind::Heading { level } => Element::new(format!("h{}", level)),

        NodeKind::List {
            ordered,
            start,
            tight,
        } => {
            let mut list = Element::new(if *ordered { "ol" } else { "ul" });
            if *ordered && *start != 1 {
                list.set_attr("start", start.to_string());
            }
            let item_context = Context { tight: *tight };
            list.children = node
                .children
                .iter()
                .flat_map(|item| lower_node(item, &item_context))
                .collect();
            return finish(list, node);
        }
        NodeKind::ListItem { checked } => {
            let mut item = Element::new("li");
            item.children = lower_nodes(&node.children, context);
            if let Some(checked) = checked {
                prefix_task_marker(&mut item, *checked);
            }
            return finish(item, node);
        }

        NodeKind::BlockQuote => Element::new("blockquote"),
        NodeKind::ThematicBreak => Element::new("hr"),

        NodeKind::CodeBlock { language, literal } => {
            let mut code = Element::new("code").with_child(MarkupNode::text(literal.clone()));
            if let Some(language) = language {
                code.set_attr("class", format!("language-{}", language));
            }
            return finish(Element::new("pre").with_child(code), node);
        }
        NodeKind::InlineCode(literal) => {
            return vec![Element::new("code")
                .with_child(MarkupNode::text(literal.clone()))
                .into()]
        }

        NodeKind::Image { url, alt, title } => {
            let mut img = Element::new("img").with_attr("alt", alt.clone());
            if !sanitize::is_script_url(url) {
                img.set_attr("src", url.clone());
            }
            if !title.is_empty() {
                img.set_attr("title", title.clone());
            }
            return finish(img, node);
        }
        NodeKind::Link { url, title } => {
            let mut link = Element::new("a");
            if !sanitize::is_script_url(url) {
                link.set_attr("href", url.clone());
            }
            if !title.is_empty() {
                link.set_attr("title", title.clone());
            }
            link
        }

        NodeKind::Table { alignments } => return finish(lower_table(node, alignments), node),
        // Rows and cells are lowered by their table
        NodeKind::TableRow { .. } | NodeKind::TableCell => {
            return lower_nodes(&node.children, context)
        }

        NodeKind::Emphasis(kind) => Element::new(emphasis_tag(*kind)),

        NodeKind::RawHtml { literal, .. } => return lower_block_html(literal, node),

        NodeKind::DefinitionList => Element::new("dl"),
        NodeKind::DefinitionTerm => Element::new("dt"),
        NodeKind::DefinitionDescription => Element::new("dd"),

        NodeKind::MathBlock(tex) => {
            return finish(math_placeholder("section", "block", tex), node);
        }
        NodeKind::MathInline { literal, display } => {
            let mode = if *display { "block" } else { "inline" };
            return vec![math_placeholder("span", mode, literal).into()];
        }
    };

    let mut element = element;
    element.children = lower_nodes(&node.children, &Context::default());
    finish(element, node)
}

fn finish(mut element: Element, node: &Node) -> Vec<MarkupNode> {
    if let Some(line) = node.source_line {
        element.set_source_line(line);
    }
    vec![MarkupNode::Element(element)]
}

fn emphasis_tag(kind: EmphasisKind) -> &'static str {
    match kind {
        EmphasisKind::Strong => "strong",
        EmphasisKind::Emphasis => "em",
        EmphasisKind::Strikethrough => "del",
        EmphasisKind::Superscript => "sup",
        EmphasisKind::Subscript => "sub",
        EmphasisKind::Underline => "u",
    }
}

fn math_placeholder(tag: &str, mode: &str, tex: &str) -> Element {
    Element::new(tag)
        .with_attr(MATH_ATTR, mode)
        .with_attr(TEX_ATTR, tex.trim())
}

/// Put the check box glyph in front of the item's first line of text.
fn prefix_task_marker(item: &mut Element, checked: bool) {
    let marker = MarkupNode::text(if checked {
        CHECKED_PREFIX
    } else {
        UNCHECKED_PREFIX
    });
    match item.children.first_mut() {
        Some(MarkupNode::Element(first)) if first.tag == "p" => first.children.insert(0, marker),
        _ => item.children.insert(0, marker),
    }
}

fn lower_table(table: &Node, alignments: &[TableAlignment]) -> Element {
    let mut head = Element::new("thead");
    let mut body = Element::new("tbody");

    for row in &table.children {
        let header = matches!(row.kind, NodeKind::TableRow { header: true });
        let cell_tag = if header { "th" } else { "td" };
        let mut tr = Element::new("tr");
        for (column, cell) in row.children.iter().enumerate() {
            let mut cell_element = Element::new(cell_tag);
            if let Some(align) = alignments.get(column).and_then(|a| alignment_value(*a)) {
                cell_element.set_attr("align", align);
            }
            cell_element.children = lower_nodes(&cell.children, &Context::default());
            tr.children.push(cell_element.into());
        }
        if header {
            head.children.push(tr.into());
        } else {
            body.children.push(tr.into());
        }
    }

    let mut element = Element::new("table");
    if !head.children.is_empty() {
        element.children.push(head.into());
    }
    if !body.children.is_empty() {
        element.children.push(body.into());
    }
    element
}

fn alignment_value(alignment: TableAlignment) -> Option<&'static str> {
    match alignment {
        TableAlignment::None => None,
        TableAlignment::Left => Some("left"),
        TableAlignment::Center => Some("center"),
        TableAlignment::Right => Some("right"),
    }
}

fn lower_block_html(literal: &str, node: &Node) -> Vec<MarkupNode> {
    let mut nodes = sanitize::sanitize_fragment(literal.trim());
    if let Some(line) = node.source_line {
        for element in nodes.iter_mut().filter_map(MarkupNode::as_element_mut) {
            element.set_source_line(line);
        }
    }
    nodes
}

/// Inline HTML arrives one tag at a time: `<b>`, text, `</b>`. An opening tag is paired with
/// the next sibling that closes it so the text in between ends up inside the element.
/// Returns the index of the next unprocessed sibling.
fn lower_inline_html(
    siblings: &[Node],
    index: usize,
    literal: &str,
    context: &Context,
    out: &mut Vec<MarkupNode>,
) -> usize {
    let opening = OPENING_TAG
        .captures(literal.trim())
        .filter(|_| !literal.trim_end().ends_with("/>"))
        .and_then(|captures| captures.get(1))
        .map(|tag| tag.as_str().to_ascii_lowercase());

    let Some(tag) = opening else {
        out.extend(sanitize::sanitize_fragment(literal));
        return index + 1;
    };

    let closing = format!("</{}>", tag);
    let close_index = siblings[index + 1..]
        .iter()
        .position(|sibling| {
            matches!(&sibling.kind, NodeKind::RawHtml { literal, block: false }
                if literal.trim().eq_ignore_ascii_case(&closing))
        })
        .map(|offset| index + 1 + offset);

    let Some(close_index) = close_index else {
        out.extend(sanitize::sanitize_fragment(literal));
        return index + 1;
    };

    if sanitize::is_dropped_tag(&tag) {
        return close_index + 1;
    }

    let inner = lower_nodes(&siblings[index + 1..close_index], context);
    let mut nodes = sanitize::sanitize_fragment(literal);
    match nodes.last_mut().and_then(MarkupNode::as_element_mut) {
        Some(element) if element.tag == tag && element.children.is_empty() => {
            element.children = inner;
            out.extend(nodes);
        }
        _ => {
            out.extend(nodes);
            out.extend(inner);
        }
    }
    close_index + 1
}
