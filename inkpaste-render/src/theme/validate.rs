//! Theme schema validation
//!
//! Runs on the raw JSON value before it is deserialized, so every problem can be reported at
//! once with its field path instead of stopping at the first serde error. A definition with
//! any violation is rejected as a whole.

use crate::error::{FieldViolation, ThemeError};
use crate::theme::definition::KNOWN_COMPONENTS;
use serde_json::{Map, Value};

const REQUIRED_COLORS: &[&str] = &["primary", "text", "background"];

const NUMBER_FIELDS: &[&str] = &["fontSize", "lineHeight", "spacing", "borderRadius"];
const STRING_FIELDS: &[&str] = &["fontFamily", "color", "background", "accentColor"];
const NUMBER_OR_STRING_FIELDS: &[&str] = &["fontWeight", "padding", "maxWidth"];
const HEADING_LEVELS: &[&str] = &["h1", "h2", "h3", "h4", "h5", "h6"];

/// Check `value` against the theme schema
pub fn validate_theme_value(value: &Value) -> Result<(), ThemeError> {
    let mut validator = Validator::default();
    validator.theme(value);
    if validator.violations.is_empty() {
        Ok(())
    } else {
        Err(ThemeError::invalid(validator.violations))
    }
}

#[derive(Default)]
struct Validator {
    violations: Vec<FieldViolation>,
}

impl Validator {
    fn report(&mut self, path: &str, message: impl Into<String>) {
        self.violations.push(FieldViolation::new(path, message));
    }

    fn theme(&mut self, value: &Value) {
        let Some(root) = value.as_object() else {
            self.report("", "theme must be a JSON object");
            return;
        };

        self.non_empty_string(root, "id", "id");
        self.non_empty_string(root, "version", "version");

        if let Some(metadata) = self.object(root, "metadata", "metadata") {
            self.non_empty_string(metadata, "name", "metadata.name");
            self.optional_string(metadata, "author", "metadata.author");
            self.optional_string(metadata, "description", "metadata.description");
            if let Some(tags) = metadata.get("tags") {
                match tags.as_array() {
                    Some(tags) => {
                        for (i, tag) in tags.iter().enumerate() {
                            if !tag.is_string() {
                                self.report(&format!("metadata.tags[{}]", i), "must be a string");
                            }
                        }
                    }
                    None => self.report("metadata.tags", "must be an array of strings"),
                }
            }
        }

        if let Some(tokens) = self.object(root, "tokens", "tokens") {
            self.tokens(tokens);
        }

        match root.get("components") {
            None => {}
            Some(Value::Object(components)) => self.components(components),
            Some(_) => self.report("components", "must be an object"),
        }
    }

    fn tokens(&mut self, tokens: &Map<String, Value>) {
        if let Some(color) = self.object(tokens, "color", "tokens.color") {
            for required in REQUIRED_COLORS {
                if !color.contains_key(*required) {
                    self.report(&format!("tokens.color.{}", required), "is required");
                }
            }
            for (name, value) in color {
                match value.as_str() {
                    Some(text) if !text.trim().is_empty() => {}
                    _ => self.report(
                        &format!("tokens.color.{}", name),
                        "must be a non-empty string",
                    ),
                }
            }
        }

        if let Some(typography) = self.object(tokens, "typography", "tokens.typography") {
            self.non_empty_string(typography, "fontFamily", "tokens.typography.fontFamily");
            for scale in ["heading", "body"] {
                let path = format!("tokens.typography.{}", scale);
                if let Some(scale) = self.object(typography, scale, &path) {
                    self.type_scale(scale, &path);
                }
            }
        }

        if let Some(spacing) = self.object(tokens, "spacing", "tokens.spacing") {
            for (name, value) in spacing {
                if !value.as_f64().is_some_and(|n| n >= 0.0) {
                    self.report(
                        &format!("tokens.spacing.{}", name),
                        "must be a non-negative number",
                    );
                }
            }
        }

        match tokens.get("border") {
            None => {}
            Some(Value::Object(border)) => {
                for key in ["radius", "width"] {
                    if let Some(value) = border.get(key) {
                        if !value.as_f64().is_some_and(|n| n >= 0.0) {
                            self.report(
                                &format!("tokens.border.{}", key),
                                "must be a non-negative number",
                            );
                        }
                    }
                }
            }
            Some(_) => self.report("tokens.border", "must be an object"),
        }
    }

    fn type_scale(&mut self, scale: &Map<String, Value>, path: &str) {
        match scale.get("lineHeight") {
            Some(value) if value.as_f64().is_some_and(|n| n > 0.0) => {}
            Some(_) => self.report(&format!("{}.lineHeight", path), "must be a positive number"),
            None => self.report(&format!("{}.lineHeight", path), "is required"),
        }
        match scale.get("weight") {
            Some(Value::Number(_)) | Some(Value::String(_)) => {}
            Some(_) => self.report(&format!("{}.weight", path), "must be a number or a string"),
            None => self.report(&format!("{}.weight", path), "is required"),
        }
        self.optional_string(scale, "fontFamily", &format!("{}.fontFamily", path));
    }

    fn components(&mut self, components: &Map<String, Value>) {
        for (name, value) in components {
            if !KNOWN_COMPONENTS.contains(&name.as_str()) {
                // Unknown components are carried along untouched
                continue;
            }
            let path = format!("components.{}", name);
            let Some(component) = value.as_object() else {
                self.report(&path, "must be an object");
                continue;
            };
            self.component_fields(component, &path);

            if name == "heading" {
                for level in HEADING_LEVELS {
                    let level_path = format!("{}.{}", path, level);
                    match component.get(*level) {
                        None => {}
                        Some(Value::Object(style)) => self.component_fields(style, &level_path),
                        Some(_) => self.report(&level_path, "must be an object"),
                    }
                }
            }
        }
    }

    fn component_fields(&mut self, component: &Map<String, Value>, path: &str) {
        for (key, value) in component {
            let field = format!("{}.{}", path, key);
            let key = key.as_str();
            if NUMBER_FIELDS.contains(&key) && !value.is_number() {
                self.report(&field, "must be a number");
            } else if STRING_FIELDS.contains(&key) && !value.is_string() {
                self.report(&field, "must be a string");
            } else if NUMBER_OR_STRING_FIELDS.contains(&key)
                && !(value.is_number() || value.is_string())
            {
                self.report(&field, "must be a number or a string");
            }
        }
    }

    fn object<'v>(
        &mut self,
        parent: &'v Map<String, Value>,
        key: &str,
        path: &str,
    ) -> Option<&'v Map<String, Value>> {
        match parent.get(key) {
            Some(Value::Object(object)) => Some(object),
            Some(_) => {
                self.report(path, "must be an object");
                None
            }
            None => {
                self.report(path, "is required");
                None
            }
        }
    }

    fn non_empty_string(&mut self, parent: &Map<String, Value>, key: &str, path: &str) {
        match parent.get(key) {
            Some(Value::String(text)) if !text.trim().is_empty() => {}
            Some(_) => self.report(path, "must be a non-empty string"),
            None => self.report(path, "is required"),
        }
    }

    fn optional_string(&mut self, parent: &Map<String, Value>, key: &str, path: &str) {
        if let Some(value) = parent.get(key) {
            if !value.is_string() {
                self.report(path, "must be a string");
            }
        }
    }
}
