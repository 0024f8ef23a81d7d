//! Shared configuration loader for inkpaste.
//!
//! `defaults/inkpaste.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files, `INKPASTE__*`
//! environment variables and explicit overrides on top of those defaults via [`Loader`]
//! before deserializing into [`InkpasteConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, Environment, File, FileFormat, Map, ValueKind};
use serde::Deserialize;
use std::path::Path;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/inkpaste.default.toml");

/// Prefix of environment variables read by [`Loader::with_environment`].
///
/// Nested keys are separated by a double underscore, e.g. `INKPASTE__RENDER__THEME`.
pub const ENV_PREFIX: &str = "INKPASTE";
const ENV_SEPARATOR: &str = "__";

/// Project-local configuration picked up from the working directory when present.
pub const LOCAL_CONFIG_FILE: &str = "inkpaste.toml";

/// Top-level configuration consumed by inkpaste applications.
#[derive(Debug, Clone, Deserialize)]
pub struct InkpasteConfig {
    pub render: RenderConfig,
    pub check: CheckConfig,
    pub logging: LoggingConfig,
}

/// Knobs of the render pipeline.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    /// Preset id or path to a theme JSON file
    pub theme: String,
    pub apply_styles: bool,
    pub highlight: bool,
    pub grid: GridConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GridConfig {
    pub gap: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub max_heading_chars: usize,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer `INKPASTE__*` variables from the process environment.
    pub fn with_environment(self) -> Self {
        self.with_environment_source(None)
    }

    fn with_environment_source(mut self, source: Option<Map<String, String>>) -> Self {
        let environment = Environment::with_prefix(ENV_PREFIX)
            .separator(ENV_SEPARATOR)
            .try_parsing(true)
            .source(source);
        self.builder = self.builder.add_source(environment);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<InkpasteConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<InkpasteConfig, ConfigError> {
    Loader::new().build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn loads_default_config() {
        let config = load_defaults().expect("defaults to deserialize");
        assert_eq!(config.render.theme, "default");
        assert!(config.render.apply_styles);
        assert!(config.render.highlight);
        assert_eq!(config.render.grid.gap, 8.0);
        assert_eq!(config.check.max_heading_chars, 48);
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn supports_overrides() {
        let config = Loader::new()
            .set_override("render.theme", "ink")
            .expect("override to apply")
            .set_override("render.apply_styles", false)
            .expect("override to apply")
            .build()
            .expect("config to build");
        assert_eq!(config.render.theme, "ink");
        assert!(!config.render.apply_styles);
    }

    #[test]
    fn layers_user_file() {
        let mut file = tempfile::Builder::new()
            .suffix(".toml")
            .tempfile()
            .expect("temp file");
        writeln!(file, "[render.grid]\ngap = 12\n\n[check]\nmax_heading_chars = 30").unwrap();

        let config = Loader::new().with_file(file.path()).build().expect("config to build");
        assert_eq!(config.render.grid.gap, 12.0);
        assert_eq!(config.check.max_heading_chars, 30);
        // untouched keys keep their defaults
        assert_eq!(config.render.theme, "default");
    }

    #[test]
    fn missing_required_file_is_an_error() {
        let result = Loader::new().with_file("/nonexistent/inkpaste.toml").build();
        assert!(result.is_err());

        let config = Loader::new()
            .with_optional_file("/nonexistent/inkpaste.toml")
            .build()
            .expect("optional file to be skipped");
        assert_eq!(config.render.theme, "default");
    }

    #[test]
    fn reads_prefixed_environment() {
        let mut vars = Map::new();
        vars.insert("INKPASTE__RENDER__THEME".to_string(), "verdant".to_string());
        vars.insert("INKPASTE__LOGGING__LEVEL".to_string(), "debug".to_string());
        vars.insert("UNRELATED".to_string(), "x".to_string());

        let config = Loader::new()
            .with_environment_source(Some(vars))
            .build()
            .expect("config to build");
        assert_eq!(config.render.theme, "verdant");
        assert_eq!(config.logging.level, "debug");
    }
}
