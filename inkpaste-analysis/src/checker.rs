//! Document quality checks
//!
//! A single read-only, pre-order traversal of the structural tree. Every violation found is
//! reported once per occurrence, in document order. Nothing here can fail: an empty result
//! means no detectable issue.

use crate::issue::{IssueKind, QualityIssue};
use inkpaste_parser::{Document, Node, NodeKind, Position};

const INSECURE_SCHEME: &str = "http://";

/// Options for configuring the checker
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckOptions {
    /// Headings whose plain text is longer than this (in characters) are reported
    pub max_heading_chars: usize,
}

impl Default for CheckOptions {
    fn default() -> Self {
        Self {
            max_heading_chars: 48,
        }
    }
}

/// Parse `source` and check it. Front matter is stripped first, exactly as for rendering.
pub fn check_source(source: &str, options: &CheckOptions) -> Vec<QualityIssue> {
    let doc = inkpaste_parser::parse_and_prepare(source);
    check_document(&doc, options)
}

/// Check an already parsed document and return its issues in document order
pub fn check_document(document: &Document, options: &CheckOptions) -> Vec<QualityIssue> {
    let mut checker = Checker {
        options,
        previous_heading: None,
        issues: Vec::new(),
    };
    checker.visit(&document.root);
    tracing::debug!(issues = checker.issues.len(), "quality check complete");
    checker.issues
}

struct Checker<'o> {
    options: &'o CheckOptions,
    /// Running heading depth across the whole document, not per subtree
    previous_heading: Option<u8>,
    issues: Vec<QualityIssue>,
}

impl Checker<'_> {
    fn visit(&mut self, node: &Node) {
        match &node.kind {
            NodeKind::Heading { level } => self.check_heading(node, *level),
            NodeKind::Link { url, .. } => {
                self.check_protocol(url, "Link", node.position);
                if node.plain_text().trim().is_empty() {
                    self.report(
                        IssueKind::Accessibility,
                        format!("Link to '{}' has no text content", url),
                        node.position,
                    );
                }
            }
            NodeKind::Image { url, alt, .. } => {
                self.check_protocol(url, "Image", node.position);
                if alt.trim().is_empty() {
                    self.report(
                        IssueKind::Accessibility,
                        format!("Image '{}' is missing alternative text", url),
                        node.position,
                    );
                }
                if looks_like_local_path(url) {
                    self.report(
                        IssueKind::ImageReference,
                        format!(
                            "Image '{}' looks like a local file and will not load after pasting",
                            url
                        ),
                        node.position,
                    );
                }
            }
            NodeKind::RawHtml { .. } => {
                self.report(
                    IssueKind::HtmlEmbed,
                    "Embedded HTML may be altered or removed by the publishing platform",
                    node.position,
                );
            }
            _ => {}
        }

        for child in &node.children {
            self.visit(child);
        }
    }

    fn check_heading(&mut self, node: &Node, level: u8) {
        if let Some(previous) = self.previous_heading {
            if level > previous + 1 {
                self.report(
                    IssueKind::Structure,
                    format!("Heading level jumps from h{} to h{}", previous, level),
                    node.position,
                );
            }
        }
        self.previous_heading = Some(level);

        let text = node.plain_text();
        let length = text.trim().chars().count();
        if length > self.options.max_heading_chars {
            self.report(
                IssueKind::Structure,
                format!(
                    "Heading is {} characters long (limit {})",
                    length, self.options.max_heading_chars
                ),
                node.position,
            );
        }
    }

    fn check_protocol(&mut self, url: &str, what: &str, position: Option<Position>) {
        if starts_with_ignore_case(url.trim_start(), INSECURE_SCHEME) {
            self.report(
                IssueKind::LinkProtocol,
                format!("{} uses insecure http: '{}'", what, url),
                position,
            );
        }
    }

    fn report(&mut self, kind: IssueKind, message: impl Into<String>, position: Option<Position>) {
        self.issues.push(QualityIssue::new(kind, message, position));
    }
}

/// No scheme separator and not inline data: most likely a path on the author's disk.
fn looks_like_local_path(url: &str) -> bool {
    !url.contains("://") && !starts_with_ignore_case(url.trim_start(), "data:")
}

fn starts_with_ignore_case(value: &str, prefix: &str) -> bool {
    value
        .get(..prefix.len())
        .is_some_and(|head| head.eq_ignore_ascii_case(prefix))
}
