//! Highlight segmentation (`==text==` → `<mark>`)
//!
//! Runs on the markup tree after lowering. Every text node holding at least one complete
//! delimited span is replaced in its parent by plain text and `<mark>` siblings, in the
//! original character order. Matching is non-greedy and does not nest. A span with nothing
//! between its delimiters consumes them and emits nothing.
//!
//! The compiled pattern is shared but holds no scan position: each text node gets its own
//! iterator, so concurrent renders cannot interfere with each other.

use crate::markup::{Element, MarkupNode};
use once_cell::sync::Lazy;
use regex::Regex;

pub const MARK_TAG: &str = "mark";

/// Subtrees that are never segmented
const SKIPPED_TAGS: &[&str] = &["code", "pre", "kbd", "samp", "script", "style", "textarea"];

static HIGHLIGHT: Lazy<Regex> = Lazy::new(|| Regex::new(r"==(.*?)==").unwrap());

/// Segment every eligible text node under `nodes`. Returns the number of marks emitted.
pub fn segment_highlights(nodes: &mut Vec<MarkupNode>) -> usize {
    let mut marks = 0;
    let mut i = 0;
    while i < nodes.len() {
        let replacement = match &mut nodes[i] {
            MarkupNode::Element(element) => {
                if !is_skipped(element) {
                    marks += segment_highlights(&mut element.children);
                }
                None
            }
            MarkupNode::Text(value) => segment_text(value),
        };

        match replacement {
            Some(segments) => {
                let inserted = segments.len();
                marks += segments
                    .iter()
                    .filter(|segment| segment.is_tag(MARK_TAG))
                    .count();
                nodes.splice(i..i + 1, segments);
                i += inserted;
            }
            None => i += 1,
        }
    }
    marks
}

fn is_skipped(element: &Element) -> bool {
    SKIPPED_TAGS.contains(&element.tag.as_str())
}

/// Split one text value. `None` when it holds no complete delimited span.
pub fn segment_text(value: &str) -> Option<Vec<MarkupNode>> {
    let mut segments = Vec::new();
    let mut cursor = 0;
    let mut matched = false;

    for captures in HIGHLIGHT.captures_iter(value) {
        let (Some(whole), Some(inner)) = (captures.get(0), captures.get(1)) else {
            continue;
        };
        matched = true;
        if whole.start() > cursor {
            segments.push(MarkupNode::text(&value[cursor..whole.start()]));
        }
        if !inner.as_str().is_empty() {
            segments.push(
                Element::new(MARK_TAG)
                    .with_child(MarkupNode::text(inner.as_str()))
                    .into(),
            );
        }
        cursor = whole.end();
    }

    if !matched {
        return None;
    }
    if cursor < value.len() {
        segments.push(MarkupNode::text(&value[cursor..]));
    }
    Some(segments)
}
