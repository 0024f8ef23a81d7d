//! Markdown to inline-styled HTML for paste-only publishing platforms
//!
//!     The destination editors this output is pasted into accept no stylesheets and run no
//!     scripts, so every visual property ends up in a `style` attribute and every layout
//!     primitive they cannot handle is emulated. This crate takes a source string through the
//!     whole transformation and hands back a string. It never touches the shell: no printing,
//!     no env vars, no files beyond [`theme::load_theme_file`].
//!
//! Architecture
//!
//!     The structural tree comes from `inkpaste-parser` (comrak underneath). Lowering turns it
//!     into a small owned markup tree ([`markup`]) and every later pass rewrites that tree in
//!     place. Serialization goes through html5ever, so the output is always well formed.
//!
//!     .
//!     ├── markup.rs        # MarkupNode / Element / Style
//!     ├── dom.rs           # markup tree <-> RcDom handles
//!     ├── serializer.rs    # html5ever serialization
//!     ├── sanitize.rs      # raw HTML filtering
//!     ├── lowering.rs      # structural tree -> markup tree
//!     ├── highlight.rs     # ==text== -> <mark>
//!     ├── math.rs          # MathRenderer seam
//!     ├── theme            # definitions, validation, presets, registry
//!     ├── styling          # per-role styles and the styling walk
//!     ├── grouping.rs      # image runs -> grid containers
//!     ├── export.rs        # grid containers -> tables, for the clipboard
//!     └── pipeline.rs      # render / render_document / check
//!
//! Testing
//!
//!     Unit tests sit beside each pass. tests/ holds the end-to-end properties: styled vs
//!     unstyled output, grouping counts, idempotence, export round trips and a proptest that
//!     the pipeline never panics.

pub mod error;
pub mod export;
pub mod grouping;
pub mod highlight;
pub mod lowering;
pub mod markup;
pub mod math;
pub mod pipeline;
pub mod sanitize;
pub mod serializer;
pub mod styling;
pub mod theme;

pub(crate) mod dom;

pub use error::{FieldViolation, RenderError, ThemeError};
pub use export::export_for_clipboard;
pub use grouping::{grid_columns, GridOptions};
pub use math::{MathRenderer, PlainMathRenderer};
pub use pipeline::{check, render, render_document, RenderOptions, RenderedDocument};
pub use theme::{
    builtin_theme, builtin_themes, default_theme, load_theme_file, ThemeDefinition, ThemeRegistry,
};

pub use inkpaste_analysis::{check_source, CheckOptions, IssueKind, QualityIssue};
