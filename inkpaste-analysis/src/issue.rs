use inkpaste_parser::Position;
use serde::Serialize;
use std::fmt;

/// Category of a quality issue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueKind {
    LinkProtocol,
    Structure,
    Accessibility,
    ImageReference,
    HtmlEmbed,
}

impl IssueKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueKind::LinkProtocol => "link-protocol",
            IssueKind::Structure => "structure",
            IssueKind::Accessibility => "accessibility",
            IssueKind::ImageReference => "image-reference",
            IssueKind::HtmlEmbed => "html-embed",
        }
    }
}

impl fmt::Display for IssueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An advisory finding about the document. Never blocks rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct QualityIssue {
    pub kind: IssueKind,

    /// Human-readable message
    pub message: String,

    /// Where the offending node starts, when the parser recorded it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<Position>,
}

impl QualityIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>, location: Option<Position>) -> Self {
        Self {
            kind,
            message: message.into(),
            location,
        }
    }
}

impl fmt::Display for QualityIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(location) => write!(f, "{} [{}] {}", location, self.kind, self.message),
            None => write!(f, "[{}] {}", self.kind, self.message),
        }
    }
}
