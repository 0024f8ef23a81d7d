use inkpaste_render::{RenderError, ThemeError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("cannot read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write {path}: {source}")]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("configuration error: {0}")]
    Config(#[from] inkpaste_config::ConfigError),

    #[error("unknown log level '{0}'")]
    LogLevel(String),

    #[error(transparent)]
    Theme(#[from] ThemeError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("cannot encode issues as JSON: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Extra lines printed under the main message
    pub fn details(&self) -> Vec<String> {
        match self {
            CliError::Theme(err) | CliError::Render(RenderError::Theme(err)) => {
                err.violations().iter().map(|v| v.to_string()).collect()
            }
            _ => Vec::new(),
        }
    }
}
