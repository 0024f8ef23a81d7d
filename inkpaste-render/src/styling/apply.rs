//! Applying a theme to the markup tree
//!
//! One walk over the tree, carrying the ancestor context down. Each element with a styling
//! role gets its declaration appended to its `style` attribute. The document records the theme
//! in its wrapper, and a document that already has one is left alone, so no element is ever
//! styled twice.

use crate::lowering::MATH_ATTR;
use crate::markup::{Element, MarkupDocument, MarkupNode, Style};
use crate::styling::roles::{self, StyleContext};
use crate::theme::ThemeDefinition;

pub const THEME_ATTR: &str = "data-theme";

/// Style every element of `doc` with `theme`. Returns the number of elements styled.
pub fn apply_theme(doc: &mut MarkupDocument, theme: &ThemeDefinition) -> usize {
    if doc.is_styled() {
        tracing::debug!(theme = %theme.id, "document already styled, skipping");
        return 0;
    }

    let styled = style_nodes(&mut doc.children, theme, StyleContext::default());

    let mut wrapper = Element::new("section").with_attr(THEME_ATTR, theme.id.clone());
    wrapper.merge_style(&roles::container_style(theme));
    doc.wrapper = Some(wrapper);

    tracing::debug!(theme = %theme.id, styled, "theme applied");
    styled
}

fn style_nodes(nodes: &mut [MarkupNode], theme: &ThemeDefinition, context: StyleContext) -> usize {
    let mut styled = 0;
    for element in nodes.iter_mut().filter_map(MarkupNode::as_element_mut) {
        if let Some(display) = element.attr(MATH_ATTR).map(|mode| mode == "block") {
            // Renderer output is styled by the renderer, not by the theme
            element.merge_style(&roles::math_style(theme, display));
            styled += 1;
            continue;
        }

        if let Some(style) = role_style(element, theme, context) {
            element.merge_style(&style);
            styled += 1;
        }
        let child_context = descend(&element.tag, context);
        styled += style_nodes(&mut element.children, theme, child_context);
    }
    styled
}

fn role_style(element: &Element, theme: &ThemeDefinition, context: StyleContext) -> Option<Style> {
    let align = element.attr("align");
    let style = match element.tag.as_str() {
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => {
            let level = element.tag[1..].parse().unwrap_or(1);
            roles::heading_style(theme, level)
        }
        "p" => roles::paragraph_style(theme, context),
        "blockquote" => roles::blockquote_style(theme),
        "ul" => roles::list_style(theme, false),
        "ol" => roles::list_style(theme, true),
        "li" => roles::list_item_style(theme),
        "pre" => roles::code_block_style(theme),
        "code" if context.in_pre => roles::code_in_pre_style(theme),
        "code" => roles::inline_code_style(theme, context),
        "a" => roles::link_style(theme, context),
        "strong" | "b" => roles::strong_style(theme),
        "em" | "i" => roles::emphasis_style(theme),
        "del" | "s" => roles::strikethrough_style(theme),
        "mark" => roles::mark_style(theme),
        "img" => roles::image_style(theme),
        "table" => roles::table_style(theme),
        "th" => roles::table_header_style(theme, align),
        "td" => roles::table_cell_style(theme, align),
        "hr" => roles::thematic_break_style(theme),
        "dl" => roles::definition_list_style(theme),
        "dt" => roles::definition_term_style(theme),
        "dd" => roles::definition_description_style(theme),
        _ => return None,
    };
    Some(style)
}

fn descend(tag: &str, context: StyleContext) -> StyleContext {
    let mut context = context;
    match tag {
        "blockquote" => context.in_blockquote = true,
        "ul" | "ol" | "dl" => context.in_list = true,
        "table" => context.in_table = true,
        "h1" | "h2" | "h3" | "h4" | "h5" | "h6" => context.in_heading = true,
        "pre" => context.in_pre = true,
        _ => {}
    }
    context
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lowering::lower_document;
    use crate::serializer::serialize_document;
    use crate::theme::default_theme;
    use inkpaste_parser::parse_and_prepare;

    fn styled(source: &str) -> MarkupDocument {
        let mut doc = lower_document(&parse_and_prepare(source));
        apply_theme(&mut doc, &default_theme().unwrap());
        doc
    }

    fn first_style(doc: &MarkupDocument) -> String {
        doc.children[0]
            .as_element()
            .and_then(|e| e.attr("style"))
            .unwrap_or_default()
            .to_string()
    }

    #[test]
    fn test_wrapper_carries_theme() {
        let doc = styled("text\n");
        let wrapper = doc.wrapper.as_ref().unwrap();
        assert_eq!(wrapper.attr(THEME_ATTR), Some("default"));
        assert!(wrapper.attr("style").unwrap().contains("color:#24292f"));
    }

    #[test]
    fn test_second_application_is_a_no_op() {
        let mut doc = styled("# Title\n");
        let before = doc.clone();
        assert_eq!(apply_theme(&mut doc, &default_theme().unwrap()), 0);
        assert_eq!(doc, before);
    }

    #[test]
    fn test_heading_uses_component_size() {
        let doc = styled("# Title\n");
        assert!(first_style(&doc).starts_with("font-size:28px;"));
    }

    #[test]
    fn test_code_inside_pre_differs_from_inline_code() {
        let html = serialize_document(&styled("```\nx\n```\n\nuse `y`\n")).unwrap();
        assert!(html.contains("<code style=\"font-family:Menlo, Monaco, Consolas, 'Courier New', monospace;font-size:inherit;"));
        assert!(html.contains("font-size:0.9em"));
    }

    #[test]
    fn test_existing_style_is_kept() {
        let doc = styled("<p style=\"text-align:center\">x</p>\n");
        assert!(first_style(&doc).starts_with("text-align:center;margin:16px 0"));
    }

    #[test]
    fn test_table_cells_follow_alignment() {
        let html = serialize_document(&styled("| a |\n|--:|\n| 1 |\n")).unwrap();
        assert!(html.contains("text-align:right"));
    }

    #[test]
    fn test_math_placeholder_styled_once() {
        let doc = styled("$$\nx\n$$\n");
        let style = first_style(&doc);
        assert!(style.contains("display:block"));
        assert_eq!(style.matches("font-family").count(), 1);
    }
}
