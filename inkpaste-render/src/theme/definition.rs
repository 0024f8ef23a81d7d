//! Theme definition types
//!
//! The JSON shape is:
//!
//! ```json
//! {
//!   "id": "default", "version": "1.0.0",
//!   "metadata": { "name": "Default", "author": "...", "description": "...", "tags": [] },
//!   "tokens": {
//!     "color": { "primary": "#..", "text": "#..", "background": "#.." },
//!     "typography": {
//!       "fontFamily": "...",
//!       "heading": { "lineHeight": 1.4, "weight": 700, "fontFamily": "..." },
//!       "body": { "lineHeight": 1.75, "weight": 400 }
//!     },
//!     "spacing": { "paragraph": 16, "section": 24 },
//!     "border": { "radius": 4, "width": 1 }
//!   },
//!   "components": { "heading": { "h1": { "fontSize": 28 } }, "blockquote": { "accentColor": "primary" } }
//! }
//! ```
//!
//! Known components have typed override structs. Keys nobody knows about yet are kept in
//! `extra` maps and written back out unchanged.

use crate::error::ThemeError;
use crate::theme::validate::validate_theme_value;
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub id: String,
    pub version: String,
    pub metadata: ThemeMetadata,
    pub tokens: ThemeTokens,
    #[serde(default)]
    pub components: Components,
}

impl ThemeDefinition {
    /// Parse and validate a theme from JSON text. Nothing is returned unless the whole
    /// definition is valid.
    pub fn from_json_str(json: &str) -> Result<Self, ThemeError> {
        let value: serde_json::Value = serde_json::from_str(json)?;
        Self::from_json_value(value)
    }

    pub fn from_json_value(value: serde_json::Value) -> Result<Self, ThemeError> {
        validate_theme_value(&value)?;
        Ok(serde_json::from_value(value)?)
    }

    pub fn to_json_string(&self) -> Result<String, ThemeError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Look up a palette entry. Blank entries count as missing.
    pub fn color(&self, name: &str) -> Option<&str> {
        self.tokens
            .color
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.trim().is_empty())
    }

    pub fn spacing(&self, name: &str) -> Option<f64> {
        self.tokens.spacing.get(name).copied()
    }
}

/// An empty or whitespace-only override is the same as leaving it out
fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    Ok(value.filter(|value| !value.trim().is_empty()))
}

/// Load and validate a theme from a JSON file
pub fn load_theme_file(path: impl AsRef<Path>) -> Result<ThemeDefinition, ThemeError> {
    let path = path.as_ref();
    let json = std::fs::read_to_string(path).map_err(|source| ThemeError::Io {
        path: path.display().to_string(),
        source,
    })?;
    ThemeDefinition::from_json_str(&json)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeMetadata {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThemeTokens {
    /// Always holds `primary`, `text` and `background`
    pub color: BTreeMap<String, String>,
    pub typography: Typography,
    pub spacing: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border: Option<BorderTokens>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Typography {
    pub font_family: String,
    pub heading: TypeScale,
    pub body: TypeScale,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TypeScale {
    pub line_height: f64,
    pub weight: CssValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BorderTokens {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub radius: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
}

/// A CSS value given either as a bare number or as text (`700` or `"bold"`)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CssValue {
    Number(f64),
    Text(String),
}

impl CssValue {
    /// Render as CSS, adding `unit` to bare numbers
    pub fn with_unit(&self, unit: &str) -> String {
        match self {
            CssValue::Number(n) => format!("{}{}", n, unit),
            CssValue::Text(text) => text.clone(),
        }
    }
}

impl crate::markup::StyleValue for &CssValue {
    fn into_css(self) -> Option<String> {
        Some(self.with_unit(""))
    }
}

/// Per-component overrides
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Components {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub container: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<HeadingComponents>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paragraph: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub blockquote: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub list: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_block: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inline_code: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub link: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub table: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub highlight: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub math: Option<ComponentStyle>,

    /// Components this version does not know about
    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

/// Component keys with a typed override struct, in JSON spelling
pub const KNOWN_COMPONENTS: &[&str] = &[
    "container",
    "heading",
    "paragraph",
    "blockquote",
    "list",
    "codeBlock",
    "inlineCode",
    "link",
    "image",
    "table",
    "highlight",
    "math",
];

/// Overrides shared by every component. Each styling function reads the fields that make
/// sense for its role and ignores the rest.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStyle {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<CssValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f64>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub background: Option<String>,
    /// Palette key or literal colour
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub accent_color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub padding: Option<CssValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_width: Option<CssValue>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingComponents {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h1: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h2: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h3: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h4: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h5: Option<ComponentStyle>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub h6: Option<ComponentStyle>,
    /// Applies to every level unless the level overrides it
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(default, deserialize_with = "blank_as_none", skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub spacing: Option<f64>,

    #[serde(flatten)]
    pub extra: BTreeMap<String, serde_json::Value>,
}

impl HeadingComponents {
    pub fn level(&self, level: u8) -> Option<&ComponentStyle> {
        match level {
            1 => self.h1.as_ref(),
            2 => self.h2.as_ref(),
            3 => self.h3.as_ref(),
            4 => self.h4.as_ref(),
            5 => self.h5.as_ref(),
            6 => self.h6.as_ref(),
            _ => None,
        }
    }
}
