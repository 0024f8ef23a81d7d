//! The render pipeline
//!
//! Every call builds its own trees from its own input and runs the passes in a fixed order:
//!
//! 1. parse, strip front matter, annotate source lines
//! 2. lower to the markup tree
//! 3. segment `==highlights==` (optional)
//! 4. render math placeholders
//! 5. apply the theme (optional)
//! 6. group image runs into grids
//! 7. serialize
//!
//! The quality checker reads the same structural tree as step 2 but never feeds back into
//! rendering. The only shared input is the theme, which is read through an `Arc` and never
//! written.

use crate::error::RenderError;
use crate::grouping::{group_images, GridOptions};
use crate::highlight::segment_highlights;
use crate::lowering::lower_document;
use crate::math::{render_math, MathRenderer, PlainMathRenderer};
use crate::serializer::serialize_document;
use crate::styling::apply_theme;
use crate::theme::{default_theme, ThemeDefinition};
use inkpaste_analysis::{check_document, CheckOptions, QualityIssue};
use inkpaste_parser::{parse_and_prepare, Document};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Theme to style with. `None` falls back to the built-in default preset.
    pub theme: Option<Arc<ThemeDefinition>>,
    pub apply_styles: bool,
    pub highlight: bool,
    pub grid: GridOptions,
    pub math: Arc<dyn MathRenderer>,
    pub check: CheckOptions,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            theme: None,
            apply_styles: true,
            highlight: true,
            grid: GridOptions::default(),
            math: Arc::new(PlainMathRenderer),
            check: CheckOptions::default(),
        }
    }
}

impl RenderOptions {
    /// Options that emit bare markup with no inline styles
    pub fn unstyled() -> Self {
        Self {
            apply_styles: false,
            ..Self::default()
        }
    }

    pub fn with_theme(mut self, theme: Arc<ThemeDefinition>) -> Self {
        self.theme = Some(theme);
        self
    }

    fn resolve_theme(&self) -> Result<Arc<ThemeDefinition>, RenderError> {
        match &self.theme {
            Some(theme) => Ok(Arc::clone(theme)),
            None => Ok(default_theme()?),
        }
    }
}

/// Rendered HTML together with the advisory findings for the same source
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedDocument {
    pub html: String,
    pub issues: Vec<QualityIssue>,
}

/// Render `source` to HTML
pub fn render(source: &str, options: &RenderOptions) -> Result<String, RenderError> {
    let doc = parse_and_prepare(source);
    render_prepared(&doc, options)
}

/// Render `source` and run the quality checker on the same structural tree
pub fn render_document(source: &str, options: &RenderOptions) -> Result<RenderedDocument, RenderError> {
    let doc = parse_and_prepare(source);
    let issues = check_document(&doc, &options.check);
    let html = render_prepared(&doc, options)?;
    Ok(RenderedDocument { html, issues })
}

/// Quality issues for `source` with default options
pub fn check(source: &str) -> Vec<QualityIssue> {
    let doc = parse_and_prepare(source);
    check_document(&doc, &CheckOptions::default())
}

fn render_prepared(doc: &Document, options: &RenderOptions) -> Result<String, RenderError> {
    let mut markup = lower_document(doc);
    tracing::debug!(nodes = markup.children.len(), "lowered document");

    if options.highlight {
        let marks = segment_highlights(&mut markup.children);
        tracing::debug!(marks, "segmented highlights");
    }

    let math = render_math(&mut markup.children, options.math.as_ref());
    tracing::debug!(math, "rendered math");

    if options.apply_styles {
        let theme = options.resolve_theme()?;
        apply_theme(&mut markup, &theme);
    }

    let grids = group_images(&mut markup.children, &options.grid);
    tracing::debug!(grids, "grouped images");

    serialize_document(&markup)
}
