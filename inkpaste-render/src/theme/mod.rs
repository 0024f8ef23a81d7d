//! Theme definitions, validation, the built-in catalogue and the registry

pub mod definition;
pub mod presets;
pub mod registry;
pub mod validate;

pub use definition::{
    load_theme_file, BorderTokens, ComponentStyle, Components, CssValue, HeadingComponents,
    ThemeDefinition, ThemeMetadata, ThemeTokens, TypeScale, Typography,
};
pub use presets::{builtin_theme, builtin_themes, default_theme, DEFAULT_THEME_ID};
pub use registry::ThemeRegistry;
pub use validate::validate_theme_value;
