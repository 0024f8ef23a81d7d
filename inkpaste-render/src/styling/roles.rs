//! Style functions, one per markup role
//!
//! Each function reads the theme (and for some roles the ancestor context) and builds a new
//! [`Style`]. Themes are only ever borrowed immutably. Every optional override has a
//! deterministic fallback, so any theme that passed validation yields a complete,
//! non-empty declaration for every role.

use crate::markup::{px, Style};
use crate::theme::{ComponentStyle, ThemeDefinition};

pub const DEFAULT_PARAGRAPH_SPACING: f64 = 16.0;
pub const DEFAULT_SECTION_SPACING: f64 = 24.0;
pub const DEFAULT_FONT_SIZE: f64 = 16.0;

const MONOSPACE: &str = "Menlo, Monaco, Consolas, 'Courier New', monospace";
const MATH_FONT: &str = "'Latin Modern Math', 'STIX Two Math', 'Cambria Math', serif";
const FALLBACK_CODE_BACKGROUND: &str = "#f6f8fa";
const FALLBACK_BORDER: &str = "#e5e7eb";
const FALLBACK_HIGHLIGHT: &str = "#fff3a3";

/// Where an element sits, as far as styling cares
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StyleContext {
    pub in_blockquote: bool,
    pub in_list: bool,
    pub in_table: bool,
    pub in_heading: bool,
    pub in_pre: bool,
}

/// Font size used when `components.heading.h{level}.fontSize` is absent
pub fn fallback_heading_size(level: u8) -> f64 {
    let step = f64::from(level.saturating_sub(1)) * 4.0;
    (36.0 - step).max(16.0)
}

pub fn heading_font_size(theme: &ThemeDefinition, level: u8) -> f64 {
    heading_level(theme, level)
        .and_then(|style| style.font_size)
        .unwrap_or_else(|| fallback_heading_size(level))
}

/// `tokens.spacing[key]`, then the component's own spacing, then the fixed default.
pub fn resolve_spacing(
    theme: &ThemeDefinition,
    key: &str,
    component: Option<f64>,
    default: f64,
) -> f64 {
    theme.spacing(key).or(component).unwrap_or(default)
}

/// A palette key resolves through `tokens.color`; anything else is taken as a literal colour.
/// Without an override the primary colour is used.
pub fn resolve_accent_color(theme: &ThemeDefinition) -> String {
    let accent = theme
        .components
        .blockquote
        .as_ref()
        .and_then(|style| style.accent_color.as_deref())
        .filter(|value| !value.trim().is_empty());
    match accent {
        Some(value) => theme.color(value).unwrap_or(value).to_string(),
        None => primary(theme),
    }
}

fn heading_level(theme: &ThemeDefinition, level: u8) -> Option<&ComponentStyle> {
    theme.components.heading.as_ref()?.level(level)
}

fn palette(theme: &ThemeDefinition, key: &str, fallback: &str) -> String {
    theme.color(key).unwrap_or(fallback).to_string()
}

fn text_color(theme: &ThemeDefinition) -> String {
    palette(theme, "text", "#333333")
}

fn primary(theme: &ThemeDefinition) -> String {
    palette(theme, "primary", "#1f6feb")
}

fn muted(theme: &ThemeDefinition) -> String {
    theme
        .color("muted")
        .map(str::to_string)
        .unwrap_or_else(|| text_color(theme))
}

fn border_line(theme: &ThemeDefinition) -> String {
    let width = theme
        .tokens
        .border
        .as_ref()
        .and_then(|border| border.width)
        .unwrap_or(1.0);
    format!("{} solid {}", px(width), palette(theme, "border", FALLBACK_BORDER))
}

fn radius(theme: &ThemeDefinition, component: Option<&ComponentStyle>) -> f64 {
    component
        .and_then(|style| style.border_radius)
        .or_else(|| theme.tokens.border.as_ref().and_then(|border| border.radius))
        .unwrap_or(4.0)
}

fn body_font(theme: &ThemeDefinition, component: Option<&ComponentStyle>) -> String {
    let typography = &theme.tokens.typography;
    component
        .and_then(|style| style.font_family.clone())
        .or_else(|| typography.body.font_family.clone())
        .unwrap_or_else(|| typography.font_family.clone())
}

fn base_font_size(theme: &ThemeDefinition) -> f64 {
    theme
        .components
        .container
        .as_ref()
        .and_then(|style| style.font_size)
        .unwrap_or(DEFAULT_FONT_SIZE)
}

/// Outer wrapper: base font, colours and width
pub fn container_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.container.as_ref();
    let body = &theme.tokens.typography.body;
    Style::new()
        .set("font-family", body_font(theme, component))
        .set("font-size", px(base_font_size(theme)))
        .set("line-height", body.line_height)
        .set("font-weight", &body.weight)
        .set("color", text_color(theme))
        .set("background-color", palette(theme, "background", "#ffffff"))
        .set("padding", component.and_then(|s| s.padding.as_ref()).map(|p| p.with_unit("px")))
        .set("max-width", component.and_then(|s| s.max_width.as_ref()).map(|w| w.with_unit("px")))
        .set("word-wrap", "break-word")
}

pub fn heading_style(theme: &ThemeDefinition, level: u8) -> Style {
    let shared = theme.components.heading.as_ref();
    let own = heading_level(theme, level);
    let typography = &theme.tokens.typography;

    let font_family = own
        .and_then(|s| s.font_family.clone())
        .or_else(|| shared.and_then(|s| s.font_family.clone()))
        .or_else(|| typography.heading.font_family.clone())
        .unwrap_or_else(|| typography.font_family.clone());
    let weight = own
        .and_then(|s| s.font_weight.clone())
        .unwrap_or_else(|| typography.heading.weight.clone());
    let color = own
        .and_then(|s| s.color.clone())
        .or_else(|| shared.and_then(|s| s.color.clone()))
        .unwrap_or_else(|| text_color(theme));
    let spacing = resolve_spacing(
        theme,
        "section",
        own.and_then(|s| s.spacing).or(shared.and_then(|s| s.spacing)),
        DEFAULT_SECTION_SPACING,
    );

    Style::new()
        .set("font-size", px(heading_font_size(theme, level)))
        .set("font-family", font_family)
        .set("font-weight", &weight)
        .set(
            "line-height",
            own.and_then(|s| s.line_height)
                .unwrap_or(typography.heading.line_height),
        )
        .set("color", color)
        .set("margin", format!("{} 0 {}", px(spacing), px(spacing / 2.0)))
        .set("padding", own.and_then(|s| s.padding.as_ref()).map(|p| p.with_unit("px")))
}

pub fn paragraph_style(theme: &ThemeDefinition, context: StyleContext) -> Style {
    let component = theme.components.paragraph.as_ref();
    let spacing = resolve_spacing(
        theme,
        "paragraph",
        component.and_then(|s| s.spacing),
        DEFAULT_PARAGRAPH_SPACING,
    );
    let margin = if context.in_table {
        "0".to_string()
    } else if context.in_list {
        format!("{} 0", px(spacing / 4.0))
    } else {
        format!("{} 0", px(spacing))
    };
    let color = component
        .and_then(|s| s.color.clone())
        .unwrap_or_else(|| {
            if context.in_blockquote {
                muted(theme)
            } else {
                text_color(theme)
            }
        });

    Style::new()
        .set("margin", margin)
        .set(
            "font-size",
            px(component
                .and_then(|s| s.font_size)
                .unwrap_or_else(|| base_font_size(theme))),
        )
        .set(
            "line-height",
            component
                .and_then(|s| s.line_height)
                .unwrap_or(theme.tokens.typography.body.line_height),
        )
        .set("font-family", body_font(theme, component))
        .set("color", color)
        .set("max-width", component.and_then(|s| s.max_width.as_ref()).map(|w| w.with_unit("px")))
}

pub fn blockquote_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.blockquote.as_ref();
    let spacing = resolve_spacing(
        theme,
        "section",
        component.and_then(|s| s.spacing),
        DEFAULT_SECTION_SPACING,
    );
    let background = component
        .and_then(|s| s.background.clone())
        .unwrap_or_else(|| palette(theme, "codeBackground", FALLBACK_CODE_BACKGROUND));

    Style::new()
        .set("margin", format!("{} 0", px(spacing)))
        .set(
            "padding",
            component
                .and_then(|s| s.padding.as_ref())
                .map(|p| p.with_unit("px"))
                .unwrap_or_else(|| "12px 16px".to_string()),
        )
        .set("border-left", format!("4px solid {}", resolve_accent_color(theme)))
        .set("background-color", background)
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| muted(theme)))
        .set("border-radius", px(radius(theme, component)))
}

pub fn list_style(theme: &ThemeDefinition, ordered: bool) -> Style {
    let component = theme.components.list.as_ref();
    let spacing = resolve_spacing(
        theme,
        "paragraph",
        component.and_then(|s| s.spacing),
        DEFAULT_PARAGRAPH_SPACING,
    );
    Style::new()
        .set("margin", format!("{} 0", px(spacing)))
        .set(
            "padding-left",
            component
                .and_then(|s| s.padding.as_ref())
                .map(|p| p.with_unit("px"))
                .unwrap_or_else(|| px(24.0)),
        )
        .set("list-style-type", if ordered { "decimal" } else { "disc" })
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| text_color(theme)))
        .set("line-height", theme.tokens.typography.body.line_height)
}

pub fn list_item_style(theme: &ThemeDefinition) -> Style {
    Style::new()
        .set("margin", "4px 0")
        .set("line-height", theme.tokens.typography.body.line_height)
        .set("color", text_color(theme))
}

/// `<pre>`
pub fn code_block_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.code_block.as_ref();
    let spacing = resolve_spacing(
        theme,
        "paragraph",
        component.and_then(|s| s.spacing),
        DEFAULT_PARAGRAPH_SPACING,
    );
    Style::new()
        .set(
            "background-color",
            component
                .and_then(|s| s.background.clone())
                .unwrap_or_else(|| palette(theme, "codeBackground", FALLBACK_CODE_BACKGROUND)),
        )
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| text_color(theme)))
        .set(
            "padding",
            component
                .and_then(|s| s.padding.as_ref())
                .map(|p| p.with_unit("px"))
                .unwrap_or_else(|| "12px 16px".to_string()),
        )
        .set("margin", format!("{} 0", px(spacing)))
        .set("border-radius", px(radius(theme, component)))
        .set("font-size", px(component.and_then(|s| s.font_size).unwrap_or(14.0)))
        .set("line-height", component.and_then(|s| s.line_height).unwrap_or(1.6))
        .set("overflow-x", "auto")
        .set("white-space", "pre")
}

/// `<code>` directly inside `<pre>`: the block already carries the box
pub fn code_in_pre_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.code_block.as_ref();
    Style::new()
        .set(
            "font-family",
            component
                .and_then(|s| s.font_family.clone())
                .unwrap_or_else(|| MONOSPACE.to_string()),
        )
        .set("font-size", "inherit")
        .set("background", "transparent")
        .set("padding", "0")
        .set("color", "inherit")
}

pub fn inline_code_style(theme: &ThemeDefinition, context: StyleContext) -> Style {
    let component = theme.components.inline_code.as_ref();
    let font_size = if context.in_heading {
        "inherit".to_string()
    } else if context.in_table {
        "0.85em".to_string()
    } else {
        component
            .and_then(|s| s.font_size)
            .map(px)
            .unwrap_or_else(|| "0.9em".to_string())
    };
    let background = if context.in_blockquote {
        palette(theme, "background", "#ffffff")
    } else {
        component
            .and_then(|s| s.background.clone())
            .unwrap_or_else(|| palette(theme, "codeBackground", FALLBACK_CODE_BACKGROUND))
    };

    Style::new()
        .set(
            "font-family",
            component
                .and_then(|s| s.font_family.clone())
                .unwrap_or_else(|| MONOSPACE.to_string()),
        )
        .set("font-size", font_size)
        .set(
            "padding",
            component
                .and_then(|s| s.padding.as_ref())
                .map(|p| p.with_unit("px"))
                .unwrap_or_else(|| "2px 4px".to_string()),
        )
        .set("border-radius", px(radius(theme, component)))
        .set("background-color", background)
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| text_color(theme)))
}

pub fn link_style(theme: &ThemeDefinition, context: StyleContext) -> Style {
    let component = theme.components.link.as_ref();
    let color = if context.in_heading {
        "inherit".to_string()
    } else {
        component
            .and_then(|s| s.color.clone())
            .unwrap_or_else(|| primary(theme))
    };
    let underline = if context.in_heading || context.in_table {
        "none".to_string()
    } else {
        format!("1px solid {}", color)
    };
    Style::new()
        .set("color", color)
        .set("text-decoration", "none")
        .set("border-bottom", underline)
        .set("word-break", "break-all")
}

pub fn strong_style(theme: &ThemeDefinition) -> Style {
    Style::new()
        .set("font-weight", "bold")
        .set("color", theme.color("strong").unwrap_or("inherit"))
}

pub fn emphasis_style(_theme: &ThemeDefinition) -> Style {
    Style::new().set("font-style", "italic")
}

pub fn strikethrough_style(theme: &ThemeDefinition) -> Style {
    Style::new()
        .set("text-decoration", "line-through")
        .set("color", muted(theme))
}

/// `<mark>` emitted by the highlight segmenter
pub fn mark_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.highlight.as_ref();
    Style::new()
        .set(
            "background-color",
            component
                .and_then(|s| s.background.clone())
                .unwrap_or_else(|| palette(theme, "highlight", FALLBACK_HIGHLIGHT)),
        )
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| "inherit".to_string()))
        .set("padding", "0 2px")
        .set("border-radius", px(2.0))
}

pub fn image_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.image.as_ref();
    Style::new()
        .set("max-width", "100%")
        .set("height", "auto")
        .set("display", "block")
        .set("margin", "8px auto")
        .set("border-radius", px(radius(theme, component)))
}

pub fn table_style(theme: &ThemeDefinition) -> Style {
    let component = theme.components.table.as_ref();
    let spacing = resolve_spacing(
        theme,
        "paragraph",
        component.and_then(|s| s.spacing),
        DEFAULT_PARAGRAPH_SPACING,
    );
    Style::new()
        .set("width", "100%")
        .set("border-collapse", "collapse")
        .set("margin", format!("{} 0", px(spacing)))
        .set("font-size", px(component.and_then(|s| s.font_size).unwrap_or(14.0)))
        .set("line-height", component.and_then(|s| s.line_height).unwrap_or(1.6))
        .set("color", text_color(theme))
}

/// `<th>`, aligned per its column when the source gave an alignment
pub fn table_header_style(theme: &ThemeDefinition, align: Option<&str>) -> Style {
    let component = theme.components.table.as_ref();
    Style::new()
        .set(
            "background-color",
            component
                .and_then(|s| s.background.clone())
                .unwrap_or_else(|| palette(theme, "codeBackground", FALLBACK_CODE_BACKGROUND)),
        )
        .set("font-weight", "bold")
        .set("border", border_line(theme))
        .set("padding", "8px 12px")
        .set("text-align", align.unwrap_or("left"))
}

/// `<td>`
pub fn table_cell_style(theme: &ThemeDefinition, align: Option<&str>) -> Style {
    Style::new()
        .set("border", border_line(theme))
        .set("padding", "8px 12px")
        .set("text-align", align.unwrap_or("left"))
        .set("vertical-align", "top")
}

pub fn thematic_break_style(theme: &ThemeDefinition) -> Style {
    let spacing = resolve_spacing(theme, "section", None, DEFAULT_SECTION_SPACING);
    Style::new()
        .set("border", "none")
        .set("border-top", border_line(theme))
        .set("height", "0")
        .set("margin", format!("{} 0", px(spacing)))
}

pub fn definition_list_style(theme: &ThemeDefinition) -> Style {
    let spacing = resolve_spacing(theme, "paragraph", None, DEFAULT_PARAGRAPH_SPACING);
    Style::new()
        .set("margin", format!("{} 0", px(spacing)))
        .set("color", text_color(theme))
}

pub fn definition_term_style(theme: &ThemeDefinition) -> Style {
    Style::new()
        .set("font-weight", "bold")
        .set("margin-top", px(8.0))
        .set("color", text_color(theme))
}

pub fn definition_description_style(theme: &ThemeDefinition) -> Style {
    Style::new()
        .set("margin", "4px 0 8px 24px")
        .set("color", muted(theme))
}

/// Math placeholders; display math gets its own centred line
pub fn math_style(theme: &ThemeDefinition, display: bool) -> Style {
    let component = theme.components.math.as_ref();
    let font = component
        .and_then(|s| s.font_family.clone())
        .unwrap_or_else(|| MATH_FONT.to_string());
    let style = Style::new()
        .set("font-family", font)
        .set("color", component.and_then(|s| s.color.clone()).unwrap_or_else(|| text_color(theme)));
    if display {
        let spacing = resolve_spacing(theme, "paragraph", None, DEFAULT_PARAGRAPH_SPACING);
        style
            .set("display", "block")
            .set("text-align", "center")
            .set("margin", format!("{} 0", px(spacing)))
            .set("overflow-x", "auto")
    } else {
        style.set("font-style", "italic")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::{builtin_theme, default_theme};
    use proptest::prelude::*;
    use rstest::rstest;
    use serde_json::json;

    fn theme_with(components: serde_json::Value, spacing: serde_json::Value) -> ThemeDefinition {
        ThemeDefinition::from_json_value(json!({
            "id": "t",
            "version": "1",
            "metadata": { "name": "T" },
            "tokens": {
                "color": { "primary": "#07c", "text": "#222", "background": "#fff", "accent": "#f60" },
                "typography": {
                    "fontFamily": "Base",
                    "heading": { "lineHeight": 1.4, "weight": 700 },
                    "body": { "lineHeight": 1.8, "weight": 400 }
                },
                "spacing": spacing
            },
            "components": components
        }))
        .unwrap()
    }

    fn bare() -> ThemeDefinition {
        theme_with(json!({}), json!({}))
    }

    #[rstest]
    #[case(1, 36.0)]
    #[case(2, 32.0)]
    #[case(3, 28.0)]
    #[case(4, 24.0)]
    #[case(5, 20.0)]
    #[case(6, 16.0)]
    fn test_heading_size_fallback(#[case] level: u8, #[case] expected: f64) {
        assert_eq!(fallback_heading_size(level), expected);
        assert_eq!(heading_font_size(&bare(), level), expected);
    }

    #[test]
    fn test_heading_size_never_below_16() {
        assert_eq!(fallback_heading_size(9), 16.0);
    }

    #[test]
    fn test_explicit_heading_size_wins() {
        let theme = theme_with(json!({ "heading": { "h2": { "fontSize": 21 } } }), json!({}));
        assert_eq!(heading_style(&theme, 2).get("font-size"), Some("21px"));
        assert_eq!(heading_style(&theme, 3).get("font-size"), Some("28px"));
    }

    #[test]
    fn test_spacing_fallback_chain() {
        // token wins
        let theme = theme_with(
            json!({ "paragraph": { "spacing": 10 } }),
            json!({ "paragraph": 12 }),
        );
        assert_eq!(paragraph_style(&theme, StyleContext::default()).get("margin"), Some("12px 0"));

        // component next
        let theme = theme_with(json!({ "paragraph": { "spacing": 10 } }), json!({}));
        assert_eq!(paragraph_style(&theme, StyleContext::default()).get("margin"), Some("10px 0"));

        // fixed defaults last
        assert_eq!(paragraph_style(&bare(), StyleContext::default()).get("margin"), Some("16px 0"));
        assert_eq!(heading_style(&bare(), 1).get("margin"), Some("24px 0 12px"));
    }

    #[rstest]
    #[case(json!({ "blockquote": { "accentColor": "accent" } }), "#f60")]
    #[case(json!({ "blockquote": { "accentColor": "rgb(1, 2, 3)" } }), "rgb(1, 2, 3)")]
    #[case(json!({}), "#07c")]
    #[case(json!({ "blockquote": { "accentColor": "" } }), "#07c")]
    #[case(json!({ "blockquote": { "accentColor": "   " } }), "#07c")]
    fn test_accent_color_resolution(#[case] components: serde_json::Value, #[case] expected: &str) {
        let theme = theme_with(components, json!({}));
        assert_eq!(resolve_accent_color(&theme), expected);
        assert_eq!(
            blockquote_style(&theme).get("border-left"),
            Some(format!("4px solid {}", expected).as_str())
        );
    }

    #[test]
    fn test_font_family_fallback() {
        let theme = bare();
        assert_eq!(heading_style(&theme, 1).get("font-family"), Some("Base"));
        assert_eq!(paragraph_style(&theme, StyleContext::default()).get("font-family"), Some("Base"));

        let ink = builtin_theme("ink").unwrap();
        assert_eq!(
            heading_style(&ink, 2).get("font-family"),
            Some("'Times New Roman', 'Songti SC', serif")
        );
        assert_eq!(
            paragraph_style(&ink, StyleContext::default()).get("font-family"),
            Some("Georgia, 'Songti SC', 'SimSun', serif")
        );
    }

    #[test]
    fn test_context_adjusts_inline_styles() {
        let theme = default_theme().unwrap();
        let heading = StyleContext {
            in_heading: true,
            ..Default::default()
        };
        assert_eq!(link_style(&theme, heading).get("color"), Some("inherit"));
        assert_eq!(inline_code_style(&theme, heading).get("font-size"), Some("inherit"));

        let list = StyleContext {
            in_list: true,
            ..Default::default()
        };
        assert_eq!(paragraph_style(&theme, list).get("margin"), Some("4px 0"));
    }

    fn every_role(theme: &ThemeDefinition) -> Vec<Style> {
        let context = StyleContext::default();
        let nested = StyleContext {
            in_heading: true,
            in_list: true,
            in_table: true,
            ..Default::default()
        };
        vec![
            container_style(theme),
            heading_style(theme, 1),
            heading_style(theme, 4),
            paragraph_style(theme, context),
            paragraph_style(theme, nested),
            blockquote_style(theme),
            list_style(theme, true),
            list_style(theme, false),
            list_item_style(theme),
            code_block_style(theme),
            code_in_pre_style(theme),
            inline_code_style(theme, context),
            inline_code_style(theme, nested),
            link_style(theme, context),
            link_style(theme, nested),
            strong_style(theme),
            emphasis_style(theme),
            strikethrough_style(theme),
            mark_style(theme),
            image_style(theme),
            table_style(theme),
            table_header_style(theme, None),
            table_cell_style(theme, Some("right")),
            thematic_break_style(theme),
            definition_list_style(theme),
            definition_term_style(theme),
            definition_description_style(theme),
            math_style(theme, true),
            math_style(theme, false),
        ]
    }

    fn assert_well_formed(style: &Style) {
        assert!(!style.is_empty());
        let css = style.to_css();
        for declaration in css.split(';') {
            let (property, value) = declaration
                .split_once(':')
                .unwrap_or_else(|| panic!("malformed declaration {:?} in {}", declaration, css));
            assert!(!property.is_empty(), "{}", css);
            assert!(!value.trim().is_empty(), "{}", css);
            assert!(!value.ends_with("solid"), "border without a colour in {}", css);
        }
    }

    fn override_strategy() -> impl Strategy<Value = serde_json::Value> {
        let text = || {
            prop::option::of(prop::sample::select(vec![
                "", "   ", "accent", "primary", "#123456", "rgb(1, 2, 3)",
            ]))
        };
        let number = || prop::option::of(0u32..48);
        (text(), text(), text(), text(), number(), number(), number()).prop_map(
            |(color, background, accent, family, size, spacing, radius)| {
                let mut map = serde_json::Map::new();
                let pairs = [
                    ("color", color.map(|v| json!(v))),
                    ("background", background.map(|v| json!(v))),
                    ("accentColor", accent.map(|v| json!(v))),
                    ("fontFamily", family.map(|v| json!(v))),
                    ("fontSize", size.map(|v| json!(v))),
                    ("spacing", spacing.map(|v| json!(v))),
                    ("borderRadius", radius.map(|v| json!(v))),
                ];
                for (key, value) in pairs {
                    if let Some(value) = value {
                        map.insert(key.to_string(), value);
                    }
                }
                serde_json::Value::Object(map)
            },
        )
    }

    fn components_strategy() -> impl Strategy<Value = serde_json::Value> {
        let names = crate::theme::definition::KNOWN_COMPONENTS.to_vec();
        prop::collection::vec(
            (prop::sample::select(names), override_strategy(), 1u8..=6),
            0..8,
        )
        .prop_map(|entries| {
            let mut components = serde_json::Map::new();
            for (name, style, level) in entries {
                let value = if name == "heading" {
                    let mut heading = style.as_object().cloned().unwrap_or_default();
                    heading.remove("accentColor");
                    heading.insert(format!("h{}", level), style);
                    serde_json::Value::Object(heading)
                } else {
                    style
                };
                components.insert(name.to_string(), value);
            }
            serde_json::Value::Object(components)
        })
    }

    fn spacing_strategy() -> impl Strategy<Value = serde_json::Value> {
        prop::collection::btree_map(
            prop::sample::select(vec!["paragraph", "section", "list", "heading", "code"]),
            0u32..64,
            0..4,
        )
        .prop_map(|spacing| json!(spacing))
    }

    proptest! {
        #[test]
        fn arbitrary_override_sets_give_well_formed_styles(
            components in components_strategy(),
            spacing in spacing_strategy(),
            border in prop::option::of((prop::option::of(0u32..8), prop::option::of(0u32..4))),
        ) {
            let mut value = json!({
                "id": "t",
                "version": "1",
                "metadata": { "name": "T" },
                "tokens": {
                    "color": { "primary": "#07c", "text": "#222", "background": "#fff", "accent": "#f60" },
                    "typography": {
                        "fontFamily": "Base",
                        "heading": { "lineHeight": 1.4, "weight": 700 },
                        "body": { "lineHeight": 1.8, "weight": 400 }
                    },
                    "spacing": spacing
                },
                "components": components
            });
            if let Some((radius, width)) = border {
                let mut border = serde_json::Map::new();
                if let Some(radius) = radius {
                    border.insert("radius".to_string(), json!(radius));
                }
                if let Some(width) = width {
                    border.insert("width".to_string(), json!(width));
                }
                value["tokens"]["border"] = serde_json::Value::Object(border);
            }

            let theme = ThemeDefinition::from_json_value(value).unwrap();
            for style in every_role(&theme) {
                assert_well_formed(&style);
            }
        }
    }

    #[test]
    fn test_every_role_is_non_empty() {
        let context = StyleContext::default();
        let theme = bare();
        let styles = [
            container_style(&theme),
            heading_style(&theme, 1),
            paragraph_style(&theme, context),
            blockquote_style(&theme),
            list_style(&theme, true),
            list_item_style(&theme),
            code_block_style(&theme),
            code_in_pre_style(&theme),
            inline_code_style(&theme, context),
            link_style(&theme, context),
            strong_style(&theme),
            emphasis_style(&theme),
            strikethrough_style(&theme),
            mark_style(&theme),
            image_style(&theme),
            table_style(&theme),
            table_header_style(&theme, None),
            table_cell_style(&theme, Some("right")),
            thematic_break_style(&theme),
            definition_list_style(&theme),
            definition_term_style(&theme),
            definition_description_style(&theme),
            math_style(&theme, true),
            math_style(&theme, false),
        ];
        for style in styles {
            assert!(!style.is_empty());
            assert!(!style.to_css().contains(":;"));
        }
    }

    #[test]
    fn test_theme_is_not_mutated() {
        let theme = default_theme().unwrap();
        let before = (*theme).clone();
        let _ = heading_style(&theme, 3);
        let _ = blockquote_style(&theme);
        assert_eq!(*theme, before);
    }
}
