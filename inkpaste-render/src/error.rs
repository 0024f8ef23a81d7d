//! Error types for theme loading, rendering and export

use std::fmt;
use thiserror::Error;

/// One offending field in a theme definition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    /// Dotted path to the field, e.g. `tokens.color.primary`
    pub path: String,
    pub message: String,
}

impl FieldViolation {
    pub fn new(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}", self.message)
        } else {
            write!(f, "{}: {}", self.path, self.message)
        }
    }
}

#[derive(Debug, Error)]
pub enum ThemeError {
    /// The definition does not match the theme schema. Every violation is listed.
    #[error("invalid theme definition ({} violation(s))", violations.len())]
    Invalid { violations: Vec<FieldViolation> },

    #[error("theme is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown theme '{0}'")]
    UnknownPreset(String),

    #[error("failed to read theme file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

impl ThemeError {
    pub fn invalid(violations: Vec<FieldViolation>) -> Self {
        ThemeError::Invalid { violations }
    }

    /// Violations carried by an `Invalid` error, empty for every other variant
    pub fn violations(&self) -> &[FieldViolation] {
        match self {
            ThemeError::Invalid { violations } => violations,
            _ => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("HTML serialization failed: {0}")]
    Serialization(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),
}

/// Failures inside the export normalizer. Never escapes [`crate::export_for_clipboard`].
#[derive(Debug, Error)]
pub(crate) enum ExportError {
    #[error("grid container at position {0} holds no images")]
    EmptyGrid(usize),

    #[error(transparent)]
    Render(#[from] RenderError),
}
