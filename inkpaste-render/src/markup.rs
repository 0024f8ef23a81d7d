//! Renderable markup tree
//!
//! The lowering stage turns the structural tree into this tree and every later pass rewrites
//! it in place. Each pass owns the child vectors it walks for the duration of the pass and
//! only ever replaces a contiguous index range with a new sequence, so sibling order is
//! preserved end to end.
//!
//! Attributes are kept in a `BTreeMap` so serialization is byte-stable across calls.

use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Attribute carrying the annotated source line
pub const SOURCE_LINE_ATTR: &str = "data-line";
pub const STYLE_ATTR: &str = "style";

#[derive(Debug, Clone, PartialEq)]
pub enum MarkupNode {
    Element(Element),
    Text(String),
}

impl MarkupNode {
    pub fn text(value: impl Into<String>) -> Self {
        MarkupNode::Text(value.into())
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        }
    }

    pub fn as_element_mut(&mut self) -> Option<&mut Element> {
        match self {
            MarkupNode::Element(element) => Some(element),
            MarkupNode::Text(_) => None,
        }
    }

    /// True for text nodes holding nothing but whitespace
    pub fn is_whitespace(&self) -> bool {
        matches!(self, MarkupNode::Text(value) if value.trim().is_empty())
    }

    pub fn is_tag(&self, tag: &str) -> bool {
        self.as_element().is_some_and(|element| element.tag == tag)
    }
}

impl From<Element> for MarkupNode {
    fn from(element: Element) -> Self {
        MarkupNode::Element(element)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    pub tag: String,
    pub attrs: BTreeMap<String, String>,
    pub children: Vec<MarkupNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attrs: BTreeMap::new(),
            children: Vec::new(),
        }
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.insert(name.into(), value.into());
        self
    }

    pub fn with_children(mut self, children: Vec<MarkupNode>) -> Self {
        self.children = children;
        self
    }

    pub fn with_child(mut self, child: impl Into<MarkupNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn source_line(&self) -> Option<usize> {
        self.attr(SOURCE_LINE_ATTR)?.parse().ok()
    }

    /// Attach a source line unless one is already present. Returns whether it was written.
    pub fn set_source_line(&mut self, line: usize) -> bool {
        if self.attrs.contains_key(SOURCE_LINE_ATTR) {
            return false;
        }
        self.attrs
            .insert(SOURCE_LINE_ATTR.to_string(), line.to_string());
        true
    }

    /// Append declarations to the `style` attribute, keeping whatever is already there.
    pub fn merge_style(&mut self, style: &Style) {
        if style.is_empty() {
            return;
        }
        let addition = style.to_css();
        match self.attrs.get_mut(STYLE_ATTR) {
            Some(existing) if !existing.trim().is_empty() => {
                if !existing.trim_end().ends_with(';') {
                    existing.push(';');
                }
                existing.push_str(&addition);
            }
            _ => {
                self.attrs.insert(STYLE_ATTR.to_string(), addition);
            }
        }
    }

    pub fn text_content(&self) -> String {
        let mut out = String::new();
        collect_text(&self.children, &mut out);
        out
    }
}

fn collect_text(nodes: &[MarkupNode], out: &mut String) {
    for node in nodes {
        match node {
            MarkupNode::Text(value) => out.push_str(value),
            MarkupNode::Element(element) => collect_text(&element.children, out),
        }
    }
}

/// The lowered document: top-level siblings plus the optional theme wrapper.
///
/// The wrapper is set by the styling pass and rendered around the children at serialization
/// time. It doubles as the marker that the document has already been styled.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MarkupDocument {
    pub children: Vec<MarkupNode>,
    pub wrapper: Option<Element>,
}

impl MarkupDocument {
    pub fn new(children: Vec<MarkupNode>) -> Self {
        Self {
            children,
            wrapper: None,
        }
    }

    pub fn is_styled(&self) -> bool {
        self.wrapper.is_some()
    }
}

/// An ordered inline style declaration.
///
/// Values that are absent or empty are skipped when they are added, so a declaration never
/// contains `color:` with nothing after it. Numbers are written without units.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Style {
    declarations: Vec<(String, String)>,
}

impl Style {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, property: &str, value: impl StyleValue) -> Self {
        if let Some(value) = value.into_css() {
            let value = value.trim().to_string();
            if !value.is_empty() {
                self.declarations.push((property.to_string(), value));
            }
        }
        self
    }

    pub fn extend(mut self, other: Style) -> Self {
        self.declarations.extend(other.declarations);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.declarations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.declarations.len()
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.declarations
            .iter()
            .rev()
            .find(|(name, _)| name == property)
            .map(|(_, value)| value.as_str())
    }

    /// `property:value` pairs joined with `;`
    pub fn to_css(&self) -> String {
        let mut css = String::new();
        for (i, (property, value)) in self.declarations.iter().enumerate() {
            if i > 0 {
                css.push(';');
            }
            let _ = write!(css, "{}:{}", property, value);
        }
        css
    }
}

/// Anything that can be written as a CSS value. `None` means "leave the property out".
pub trait StyleValue {
    fn into_css(self) -> Option<String>;
}

impl StyleValue for &str {
    fn into_css(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl StyleValue for String {
    fn into_css(self) -> Option<String> {
        Some(self)
    }
}

impl StyleValue for &String {
    fn into_css(self) -> Option<String> {
        Some(self.clone())
    }
}

impl StyleValue for f64 {
    fn into_css(self) -> Option<String> {
        self.is_finite().then(|| self.to_string())
    }
}

impl StyleValue for u32 {
    fn into_css(self) -> Option<String> {
        Some(self.to_string())
    }
}

impl<T: StyleValue> StyleValue for Option<T> {
    fn into_css(self) -> Option<String> {
        self.and_then(StyleValue::into_css)
    }
}

/// Format a number of pixels, e.g. `px(16.0)` is `16px`
pub fn px(value: f64) -> String {
    format!("{}px", value)
}
