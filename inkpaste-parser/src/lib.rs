//! Structural parsing for inkpaste documents
//!
//!     This crate turns Markdown source text into the structural document tree that every other
//!     inkpaste stage consumes. It knows nothing about styling or HTML: the tree is a semantic
//!     description of the document, annotated with the source positions needed to map rendered
//!     output back to the editor.
//!
//! Architecture
//!
//!     - ast: The owned structural tree (Document, Node, NodeKind, Position)
//!     - parsing: The comrak adapter. Markdown string → comrak arena AST → owned Node tree
//!     - front_matter: Delimiter detection and the dedicated stripping pass
//!     - annotate: The source-position annotator (first writer wins)
//!
//!     The file structure :
//!     .
//!     ├── ast.rs              # Node types
//!     ├── parsing.rs          # comrak → Node conversion
//!     ├── front_matter.rs     # front-matter detection + strip pass
//!     ├── annotate.rs         # source-line annotation
//!     └── lib.rs
//!
//! Parsing Never Fails
//!
//!     Any UTF-8 input produces a tree. Syntax that comrak does not recognise is already literal
//!     text in its output, and comrak node kinds we have no counterpart for degrade to their
//!     children. There is therefore no parse error type in this crate.
//!
//! Typical Use
//!
//!     The render pipeline and the quality checker both start from [`parse_and_prepare`], which
//!     parses, strips front matter and annotates source lines in that order.

pub mod annotate;
pub mod ast;
pub mod front_matter;
pub mod parsing;

pub use annotate::annotate_source_lines;
pub use ast::{Document, EmphasisKind, Node, NodeKind, Position, TableAlignment};
pub use front_matter::strip_front_matter;
pub use parsing::parse_document;

/// Parse source text and run the structural passes that precede rendering and checking.
///
/// Parser → strip front-matter → Source-Position Annotator.
pub fn parse_and_prepare(source: &str) -> Document {
    let mut doc = parse_document(source);
    let removed = strip_front_matter(&mut doc);
    let annotated = annotate_source_lines(&mut doc);
    tracing::debug!(removed, annotated, "structural passes complete");
    doc
}
