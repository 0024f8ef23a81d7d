//! Front-matter handling
//!
//! Front matter is recognised by comrak when told which delimiter to expect. We detect the
//! delimiter from the first line (`---` for YAML, `+++` for TOML) so any declared format is
//! removed, then a dedicated pass drops the resulting metadata nodes from the top level.

use crate::ast::{Document, NodeKind};

const DELIMITERS: &[&str] = &["---", "+++"];

/// Detect the front-matter delimiter used on the first line of `source`, if any.
pub fn detect_delimiter(source: &str) -> Option<&'static str> {
    let source = source.trim_start_matches('\u{feff}');
    let first_line = source.lines().next()?;
    DELIMITERS
        .iter()
        .copied()
        .find(|delimiter| first_line.trim_end() == *delimiter)
}

/// Remove every top-level front-matter node. Returns how many were removed.
pub fn strip_front_matter(doc: &mut Document) -> usize {
    let before = doc.root.children.len();
    doc.root
        .children
        .retain(|node| !matches!(node.kind, NodeKind::FrontMatter(_)));
    before - doc.root.children.len()
}
