//! Bridges between the markup tree and html5ever's `RcDom`
//!
//! Output goes markup → `RcDom` handles → `html5ever::serialize`, so escaping and void
//! elements follow the HTML serialization algorithm. Input (raw HTML embeds, rendered
//! output handed to the export normalizer) is parsed as a body fragment and converted back.

use crate::markup::{Element, MarkupNode};
use html5ever::tendril::TendrilSink;
use html5ever::{parse_fragment, Attribute, LocalName, Namespace, ParseOpts, QualName};
use markup5ever_rcdom::{Handle, Node, NodeData, RcDom};
use std::cell::RefCell;

const HTML_NAMESPACE: &str = "http://www.w3.org/1999/xhtml";

fn html_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(HTML_NAMESPACE), LocalName::from(local))
}

fn attribute_name(local: &str) -> QualName {
    QualName::new(None, Namespace::from(""), LocalName::from(local))
}

/// Create an HTML element with attributes
pub(crate) fn create_element<'a>(
    tag: &str,
    attrs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> Handle {
    let attributes = attrs
        .into_iter()
        .map(|(name, value)| Attribute {
            name: attribute_name(name),
            value: value.into(),
        })
        .collect();

    Node::new(NodeData::Element {
        name: html_name(tag),
        attrs: RefCell::new(attributes),
        template_contents: Default::default(),
        mathml_annotation_xml_integration_point: false,
    })
}

/// Create a text node
pub(crate) fn create_text(text: &str) -> Handle {
    Node::new(NodeData::Text {
        contents: RefCell::new(text.into()),
    })
}

/// Build the DOM subtree for one markup node
pub(crate) fn to_handle(node: &MarkupNode) -> Handle {
    match node {
        MarkupNode::Text(value) => create_text(value),
        MarkupNode::Element(element) => element_to_handle(element, &element.children),
    }
}

/// Build a DOM element for `element` holding `children` in place of its own.
pub(crate) fn element_to_handle(element: &Element, children: &[MarkupNode]) -> Handle {
    let handle = create_element(
        &element.tag,
        element
            .attrs
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str())),
    );
    {
        let mut handle_children = handle.children.borrow_mut();
        for child in children {
            handle_children.push(to_handle(child));
        }
    }
    handle
}

/// Convert a parsed DOM node back to markup. Comments, doctypes and processing
/// instructions have no markup counterpart and are dropped.
pub(crate) fn from_handle(handle: &Handle) -> Option<MarkupNode> {
    match &handle.data {
        NodeData::Text { contents } => Some(MarkupNode::Text(contents.borrow().to_string())),
        NodeData::Element { name, attrs, .. } => {
            let mut element = Element::new(name.local.to_string());
            for attr in attrs.borrow().iter() {
                element.set_attr(attr.name.local.to_string(), attr.value.to_string());
            }
            element.children = from_handles(&handle.children.borrow());
            Some(MarkupNode::Element(element))
        }
        _ => None,
    }
}

pub(crate) fn from_handles(handles: &[Handle]) -> Vec<MarkupNode> {
    handles.iter().filter_map(from_handle).collect()
}

/// Parse an HTML fragment as if it appeared inside `<body>`.
pub(crate) fn parse_html_fragment(html: &str) -> Vec<MarkupNode> {
    let dom = parse_fragment(
        RcDom::default(),
        ParseOpts::default(),
        html_name("body"),
        Vec::new(),
    )
    .one(html);

    // The fragment parser puts its output under a synthetic <html> root
    let document_children = dom.document.children.borrow();
    match document_children.first() {
        Some(root) => from_handles(&root.children.borrow()),
        None => Vec::new(),
    }
}
