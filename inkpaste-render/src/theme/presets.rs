//! Built-in theme presets
//!
//! Presets ship as JSON beside the crate and go through the same validation as any
//! caller-supplied theme. They are parsed once per process and shared read-only.

use crate::error::ThemeError;
use crate::theme::definition::ThemeDefinition;
use once_cell::sync::Lazy;
use std::sync::Arc;

pub const DEFAULT_THEME_ID: &str = "default";

const PRESET_SOURCES: &[(&str, &str)] = &[
    ("default", include_str!("../../presets/default.json")),
    ("ink", include_str!("../../presets/ink.json")),
    ("verdant", include_str!("../../presets/verdant.json")),
];

static PRESETS: Lazy<Vec<Arc<ThemeDefinition>>> = Lazy::new(|| {
    PRESET_SOURCES
        .iter()
        .filter_map(|(id, json)| match ThemeDefinition::from_json_str(json) {
            Ok(theme) => Some(Arc::new(theme)),
            Err(err) => {
                tracing::error!(preset = *id, error = %err, "built-in theme failed validation");
                None
            }
        })
        .collect()
});

/// Every built-in preset, in catalogue order
pub fn builtin_themes() -> &'static [Arc<ThemeDefinition>] {
    &PRESETS
}

pub fn builtin_theme(id: &str) -> Result<Arc<ThemeDefinition>, ThemeError> {
    PRESETS
        .iter()
        .find(|theme| theme.id == id)
        .cloned()
        .ok_or_else(|| ThemeError::UnknownPreset(id.to_string()))
}

/// The preset used when styling is on and no theme was given
pub fn default_theme() -> Result<Arc<ThemeDefinition>, ThemeError> {
    builtin_theme(DEFAULT_THEME_ID)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_presets_validate() {
        let ids: Vec<_> = builtin_themes().iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["default", "ink", "verdant"]);
    }

    #[test]
    fn test_lookup() {
        assert_eq!(default_theme().unwrap().metadata.name, "Default");
        assert!(matches!(
            builtin_theme("nope"),
            Err(ThemeError::UnknownPreset(id)) if id == "nope"
        ));
    }

    #[test]
    fn test_presets_are_shared() {
        let a = builtin_theme("ink").unwrap();
        let b = builtin_theme("ink").unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }
}
