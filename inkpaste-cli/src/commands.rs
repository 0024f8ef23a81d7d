//! Subcommand handlers
//!
//! Each handler takes already-parsed arguments plus the loaded configuration and returns the
//! text to emit. Writing to stdout or a file is left to `main`.

use crate::error::CliError;
use inkpaste_config::InkpasteConfig;
use inkpaste_render::{
    builtin_theme, check_source, export_for_clipboard, load_theme_file, render_document,
    CheckOptions, GridOptions, RenderOptions, ThemeDefinition, ThemeRegistry,
};
use std::path::Path;
use std::sync::Arc;

pub fn read_source(path: &str) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::Read {
        path: path.to_string(),
        source,
    })
}

/// A theme argument is a preset id unless it names a JSON file
pub fn resolve_theme(value: &str) -> Result<Arc<ThemeDefinition>, CliError> {
    let path = Path::new(value);
    if value.ends_with(".json") || path.is_file() {
        tracing::info!(path = value, "loading theme file");
        return Ok(Arc::new(load_theme_file(path)?));
    }
    Ok(builtin_theme(value)?)
}

pub fn render_options(config: &InkpasteConfig) -> Result<RenderOptions, CliError> {
    let render = &config.render;
    let theme = if render.apply_styles {
        Some(resolve_theme(&render.theme)?)
    } else {
        None
    };
    Ok(RenderOptions {
        theme,
        apply_styles: render.apply_styles,
        highlight: render.highlight,
        grid: GridOptions {
            gap: render.grid.gap,
        },
        check: check_options(config),
        ..RenderOptions::default()
    })
}

fn check_options(config: &InkpasteConfig) -> CheckOptions {
    CheckOptions {
        max_heading_chars: config.check.max_heading_chars,
    }
}

pub fn handle_render(path: &str, config: &InkpasteConfig) -> Result<String, CliError> {
    let source = read_source(path)?;
    let options = render_options(config)?;
    let rendered = render_document(&source, &options)?;
    for issue in &rendered.issues {
        tracing::warn!(%issue, "quality issue");
    }
    Ok(rendered.html)
}

pub fn handle_check(path: &str, json: bool, config: &InkpasteConfig) -> Result<String, CliError> {
    let source = read_source(path)?;
    let issues = check_source(&source, &check_options(config));
    if json {
        return Ok(serde_json::to_string_pretty(&issues)?);
    }
    if issues.is_empty() {
        return Ok("No issues found\n".to_string());
    }
    let mut out = String::new();
    for issue in &issues {
        out.push_str(&issue.to_string());
        out.push('\n');
    }
    Ok(out)
}

pub fn handle_export(path: &str) -> Result<String, CliError> {
    let html = read_source(path)?;
    Ok(export_for_clipboard(&html))
}

pub fn handle_themes() -> String {
    let registry = ThemeRegistry::with_defaults();
    let mut out = String::new();
    for theme in registry.themes() {
        out.push_str(&theme.id);
        out.push('\t');
        out.push_str(&theme.metadata.name);
        if let Some(description) = &theme.metadata.description {
            out.push_str(" - ");
            out.push_str(description);
        }
        out.push('\n');
    }
    out
}
