//! Source-position annotation
//!
//! Attaches the starting source line to the block-level kinds listed in
//! [`NodeKind::carries_source_line`]. The rendered markup exposes it as an attribute so an
//! editor can scroll its preview in sync with the cursor.
//!
//! The pass is idempotent: a node that already has a source line keeps it.

use crate::ast::{Document, Node};

/// Annotate every eligible node in the document. Returns the number of nodes written.
pub fn annotate_source_lines(doc: &mut Document) -> usize {
    let mut written = 0;
    doc.root.walk_mut(&mut |node| {
        if annotate_node(node) {
            written += 1;
        }
    });
    written
}

fn annotate_node(node: &mut Node) -> bool {
    if !node.kind.carries_source_line() || node.source_line.is_some() {
        return false;
    }
    match node.position {
        Some(position) if position.line > 0 => {
            node.source_line = Some(position.line);
            true
        }
        _ => false,
    }
}
