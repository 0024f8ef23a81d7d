//! Clipboard export normalization
//!
//! Paste targets flatten CSS grid, so every grid container produced by
//! [`crate::grouping`] is rewritten into a table: one row per `ceil(count / columns)`, one
//! cell per column slot, row-major. Each image sits inside two nested sections used only for
//! centering and sizing. Unused slots stay as empty cells.
//!
//! This runs on a user action that must never fail, so any error hands back the input.

use crate::dom;
use crate::error::ExportError;
use crate::grouping::{grid_columns, COLUMNS_ATTR, GRID_ATTR};
use crate::markup::{Element, MarkupNode, Style};
use crate::serializer::serialize_nodes;

/// Rewrite grid containers in rendered HTML into table layout.
///
/// Markup without a grid container is returned byte for byte.
pub fn export_for_clipboard(html: &str) -> String {
    if !html.contains(GRID_ATTR) {
        return html.to_string();
    }
    match normalize(html) {
        Ok(output) => output,
        Err(err) => {
            tracing::warn!(error = %err, "export normalization failed, keeping original markup");
            html.to_string()
        }
    }
}

fn normalize(html: &str) -> Result<String, ExportError> {
    let mut nodes = dom::parse_html_fragment(html);
    let mut position = 0;
    let tables = rewrite_grids(&mut nodes, &mut position)?;
    if tables == 0 {
        // the attribute name appeared only as text or in another attribute
        return Ok(html.to_string());
    }
    tracing::debug!(tables, "rewrote image grids as tables");
    Ok(serialize_nodes(&nodes)?)
}

fn rewrite_grids(nodes: &mut [MarkupNode], position: &mut usize) -> Result<usize, ExportError> {
    let mut tables = 0;
    for node in nodes.iter_mut() {
        let MarkupNode::Element(element) = node else {
            continue;
        };
        if element.attr(GRID_ATTR) == Some("true") {
            let table = grid_to_table(element, *position)?;
            *node = table.into();
            *position += 1;
            tables += 1;
        } else {
            tables += rewrite_grids(&mut element.children, position)?;
        }
    }
    Ok(tables)
}

fn grid_to_table(grid: &Element, position: usize) -> Result<Element, ExportError> {
    let mut images = Vec::new();
    collect_images(&grid.children, &mut images);
    if images.is_empty() {
        return Err(ExportError::EmptyGrid(position));
    }

    let columns = grid
        .attr(COLUMNS_ATTR)
        .and_then(|value| value.trim().parse::<usize>().ok())
        .filter(|columns| *columns > 0)
        .unwrap_or_else(|| grid_columns(images.len()));
    let rows = images.len().div_ceil(columns);

    let mut table = Element::new("table");
    table.merge_style(
        &Style::new()
            .set("width", "100%")
            .set("border-collapse", "collapse")
            .set("table-layout", "fixed")
            .set("margin", "16px 0"),
    );
    if let Some(line) = grid.source_line() {
        table.set_source_line(line);
    }

    let width = format!("{}%", 100.0 / columns as f64);
    let mut images = images.into_iter();
    let mut body = Element::new("tbody");
    for _ in 0..rows {
        let mut row = Element::new("tr");
        for _ in 0..columns {
            let mut cell = Element::new("td");
            cell.merge_style(
                &Style::new()
                    .set("width", width.as_str())
                    .set("padding", "4px")
                    .set("vertical-align", "middle"),
            );
            if let Some(image) = images.next() {
                cell.children.push(wrap_image(image).into());
            }
            row.children.push(cell.into());
        }
        body.children.push(row.into());
    }
    table.children.push(body.into());
    Ok(table)
}

fn collect_images(nodes: &[MarkupNode], images: &mut Vec<MarkupNode>) {
    for node in nodes {
        let Some(element) = node.as_element() else {
            continue;
        };
        let linked = element.tag == "a" && element.children.iter().any(|c| c.is_tag("img"));
        if element.tag == "img" || linked {
            images.push(node.clone());
        } else {
            collect_images(&element.children, images);
        }
    }
}

fn wrap_image(mut image: MarkupNode) -> Element {
    let fit = Style::new()
        .set("width", "100%")
        .set("height", "auto")
        .set("max-width", "100%")
        .set("display", "block");
    if let Some(element) = image.as_element_mut() {
        if element.tag == "img" {
            element.merge_style(&fit);
        } else {
            for child in element.children.iter_mut() {
                if let Some(img) = child.as_element_mut().filter(|e| e.tag == "img") {
                    img.merge_style(&fit);
                }
            }
        }
    }

    let mut inner = Element::new("section").with_child(image);
    inner.merge_style(&Style::new().set("width", "100%").set("overflow", "hidden"));
    let mut outer = Element::new("section").with_child(inner);
    outer.merge_style(&Style::new().set("text-align", "center").set("margin", "0 auto"));
    outer
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(count: usize, columns: Option<usize>, line: Option<usize>) -> String {
        let mut html = String::from("<section class=\"image-grid\" data-image-grid=\"true\"");
        if let Some(columns) = columns {
            html.push_str(&format!(" data-columns=\"{}\"", columns));
        }
        if let Some(line) = line {
            html.push_str(&format!(" data-line=\"{}\"", line));
        }
        html.push('>');
        for i in 0..count {
            html.push_str(&format!(
                "<section><img src=\"{}.png\" alt=\"\" style=\"border-radius:4px\"></section>",
                i
            ));
        }
        html.push_str("</section>");
        html
    }

    fn parse_one(html: &str) -> Element {
        let nodes = dom::parse_html_fragment(html);
        nodes
            .into_iter()
            .find_map(|node| match node {
                MarkupNode::Element(element) => Some(element),
                MarkupNode::Text(_) => None,
            })
            .unwrap()
    }

    fn rows(table: &Element) -> Vec<&Element> {
        let body = table.children[0].as_element().unwrap();
        body.children.iter().filter_map(MarkupNode::as_element).collect()
    }

    #[test]
    fn test_attribute_name_in_text_is_not_a_grid() {
        let html = "<p>The data-image-grid attribute</p><br/><img src=a.png>";
        assert_eq!(export_for_clipboard(html), html);

        let html = "<p title=\"data-image-grid\">x</p><IMG SRC=\"b.png\">";
        assert_eq!(export_for_clipboard(html), html);
    }

    #[test]
    fn test_markup_without_grid_is_unchanged() {
        let html = "<p data-line=\"1\">Hello &amp; bye</p>\n<img src=\"a.png\">";
        assert_eq!(export_for_clipboard(html), html);
    }

    #[test]
    fn test_four_image_grid_becomes_two_by_two() {
        let output = export_for_clipboard(&grid(4, Some(2), Some(7)));
        assert!(!output.contains(GRID_ATTR));

        let table = parse_one(&output);
        assert_eq!(table.tag, "table");
        assert_eq!(table.source_line(), Some(7));

        let rows = rows(&table);
        assert_eq!(rows.len(), 2);
        let sources: Vec<String> = rows
            .iter()
            .flat_map(|row| row.children.iter())
            .map(|cell| {
                let outer = cell.as_element().unwrap().children[0].as_element().unwrap();
                let inner = outer.children[0].as_element().unwrap();
                let img = inner.children[0].as_element().unwrap();
                assert!(img.attr("style").unwrap().starts_with("border-radius:4px;width:100%"));
                img.attr("src").unwrap().to_string()
            })
            .collect();
        assert_eq!(sources, vec!["0.png", "1.png", "2.png", "3.png"]);
    }

    #[test]
    fn test_missing_columns_fall_back_to_formula() {
        let table = parse_one(&export_for_clipboard(&grid(5, None, None)));
        let rows = rows(&table);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].children.len(), 3);
        // five images in six slots
        let last = rows[1].children[2].as_element().unwrap();
        assert!(last.children.is_empty());
        assert_eq!(table.source_line(), None);
    }

    #[test]
    fn test_linked_image_keeps_link() {
        let html = "<section data-image-grid=\"true\" data-columns=\"2\">\
            <section><a href=\"https://x.test\"><img src=\"a.png\"></a></section>\
            <section><img src=\"b.png\"></section></section>";
        let output = export_for_clipboard(html);
        assert!(output.contains("<a href=\"https://x.test\"><img src=\"a.png\" style=\"width:100%"));
    }

    #[test]
    fn test_nested_grid_inside_theme_wrapper() {
        let html = format!("<section data-theme=\"default\"><p>x</p>{}</section>", grid(2, Some(2), None));
        let output = export_for_clipboard(&html);
        assert!(output.starts_with("<section data-theme=\"default\"><p>x</p><table"));
    }

    #[test]
    fn test_empty_grid_returns_original() {
        let html = "<section data-image-grid=\"true\" data-columns=\"2\"><p>no images</p></section>";
        assert_eq!(export_for_clipboard(html), html);
    }
}
