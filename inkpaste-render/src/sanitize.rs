//! Raw HTML sanitation
//!
//! Embedded HTML is parsed with html5ever and re-emitted as markup nodes. Anything that can
//! execute or pull in outside resources is removed on the way: whole subtrees for the tags
//! below, every event-handler attribute, and script-scheme URLs.

use crate::dom;
use crate::markup::MarkupNode;

const DROPPED_TAGS: &[&str] = &[
    "script", "style", "iframe", "object", "embed", "link", "meta", "base", "form",
];

const URL_ATTRIBUTES: &[&str] = &["href", "src", "action", "formaction", "xlink:href"];

const SCRIPT_SCHEMES: &[&str] = &["javascript:", "vbscript:"];

/// Parse and clean an HTML fragment
pub fn sanitize_fragment(html: &str) -> Vec<MarkupNode> {
    sanitize_nodes(dom::parse_html_fragment(html))
}

pub fn sanitize_nodes(nodes: Vec<MarkupNode>) -> Vec<MarkupNode> {
    nodes.into_iter().filter_map(sanitize_node).collect()
}

pub fn is_dropped_tag(tag: &str) -> bool {
    DROPPED_TAGS.iter().any(|dropped| tag.eq_ignore_ascii_case(dropped))
}

fn sanitize_node(node: MarkupNode) -> Option<MarkupNode> {
    match node {
        MarkupNode::Text(_) => Some(node),
        MarkupNode::Element(mut element) => {
            if is_dropped_tag(&element.tag) {
                return None;
            }
            element
                .attrs
                .retain(|name, value| is_safe_attribute(name, value));
            element.children = sanitize_nodes(element.children);
            Some(MarkupNode::Element(element))
        }
    }
}

fn is_safe_attribute(name: &str, value: &str) -> bool {
    let name = name.to_ascii_lowercase();
    if name.starts_with("on") {
        return false;
    }
    !(URL_ATTRIBUTES.contains(&name.as_str()) && is_script_url(value))
}

/// Browsers ignore whitespace and control characters inside the scheme, so do we.
pub(crate) fn is_script_url(value: &str) -> bool {
    let compact: String = value
        .chars()
        .filter(|c| !c.is_whitespace() && !c.is_control())
        .collect::<String>()
        .to_ascii_lowercase();
    SCRIPT_SCHEMES
        .iter()
        .any(|scheme| compact.starts_with(scheme))
}
