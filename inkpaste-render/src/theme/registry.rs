//! Theme registry for discovery and selection
//!
//! Holds validated themes by id. Callers can register their own next to the built-in presets;
//! registering an id twice replaces the earlier theme.

use crate::error::ThemeError;
use crate::theme::definition::ThemeDefinition;
use crate::theme::presets;
use std::collections::HashMap;
use std::sync::Arc;

/// Registry of theme definitions
///
/// # Examples
///
/// ```ignore
/// let mut registry = ThemeRegistry::with_defaults();
/// registry.register(ThemeDefinition::from_json_str(json)?);
///
/// let theme = registry.get("my-theme")?;
/// ```
#[derive(Debug, Clone)]
pub struct ThemeRegistry {
    themes: HashMap<String, Arc<ThemeDefinition>>,
}

impl ThemeRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        ThemeRegistry {
            themes: HashMap::new(),
        }
    }

    /// Register a theme under its own id
    pub fn register(&mut self, theme: impl Into<Arc<ThemeDefinition>>) {
        let theme = theme.into();
        self.themes.insert(theme.id.clone(), theme);
    }

    /// Get a theme by id
    pub fn get(&self, id: &str) -> Result<Arc<ThemeDefinition>, ThemeError> {
        self.themes
            .get(id)
            .cloned()
            .ok_or_else(|| ThemeError::UnknownPreset(id.to_string()))
    }

    /// Check if a theme exists
    pub fn has(&self, id: &str) -> bool {
        self.themes.contains_key(id)
    }

    /// List all theme ids (sorted)
    pub fn list(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.themes.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Themes in id order
    pub fn themes(&self) -> Vec<Arc<ThemeDefinition>> {
        self.list()
            .iter()
            .filter_map(|id| self.themes.get(id).cloned())
            .collect()
    }

    /// Create a registry holding the built-in presets
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        for theme in presets::builtin_themes() {
            registry.register(Arc::clone(theme));
        }
        registry
    }
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self::with_defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn custom(id: &str) -> ThemeDefinition {
        let mut theme = (*presets::default_theme().unwrap()).clone();
        theme.id = id.to_string();
        theme
    }

    #[test]
    fn test_registry_creation() {
        let registry = ThemeRegistry::new();
        assert!(registry.list().is_empty());
    }

    #[test]
    fn test_registry_defaults() {
        let registry = ThemeRegistry::default();
        assert_eq!(registry.list(), vec!["default", "ink", "verdant"]);
        assert!(registry.has("ink"));
    }

    #[test]
    fn test_register_and_replace() {
        let mut registry = ThemeRegistry::with_defaults();
        registry.register(custom("alpha"));
        assert_eq!(registry.list()[0], "alpha");

        let mut replacement = custom("alpha");
        replacement.metadata.name = "Alpha 2".to_string();
        registry.register(replacement);
        assert_eq!(registry.get("alpha").unwrap().metadata.name, "Alpha 2");
        assert_eq!(registry.list().len(), 4);
    }

    #[test]
    fn test_get_unknown() {
        let registry = ThemeRegistry::new();
        let err = registry.get("missing").unwrap_err();
        assert_eq!(err.to_string(), "unknown theme 'missing'");
    }
}
