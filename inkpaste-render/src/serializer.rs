//! HTML serialization (markup tree → HTML string)
//!
//! Pipeline: MarkupDocument → RcDom handles → `html5ever::serialize`
//!
//! A styled document is emitted inside its theme wrapper; an unstyled one is emitted as a bare
//! fragment, top-level siblings back to back.

use crate::dom;
use crate::error::RenderError;
use crate::markup::{MarkupDocument, MarkupNode};
use html5ever::{serialize, serialize::SerializeOpts, serialize::TraversalScope};
use markup5ever_rcdom::{Handle, SerializableHandle};

/// Serialize a lowered document to HTML
pub fn serialize_document(doc: &MarkupDocument) -> Result<String, RenderError> {
    let roots: Vec<Handle> = match &doc.wrapper {
        Some(wrapper) => vec![dom::element_to_handle(wrapper, &doc.children)],
        None => doc.children.iter().map(dom::to_handle).collect(),
    };
    serialize_handles(&roots)
}

/// Serialize a sequence of sibling markup nodes
pub fn serialize_nodes(nodes: &[MarkupNode]) -> Result<String, RenderError> {
    let roots: Vec<Handle> = nodes.iter().map(dom::to_handle).collect();
    serialize_handles(&roots)
}

fn serialize_handles(roots: &[Handle]) -> Result<String, RenderError> {
    let mut output = Vec::new();

    // IncludeNode serializes the element AND its children
    let opts = SerializeOpts {
        traversal_scope: TraversalScope::IncludeNode,
        ..Default::default()
    };

    for root in roots {
        let serializable = SerializableHandle::from(root.clone());
        serialize(&mut output, &serializable, opts.clone())
            .map_err(|e| RenderError::Serialization(e.to_string()))?;
    }

    String::from_utf8(output)
        .map_err(|e| RenderError::Serialization(format!("UTF-8 conversion failed: {}", e)))
}
