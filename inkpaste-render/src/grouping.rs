//! Multi-image grouping
//!
//! Scans the top-level siblings for runs of image-bearing nodes and replaces each run that
//! holds two or more images with a single grid container. Only the top level is scanned:
//! images inside lists or blockquotes are left where they are.
//!
//! A run is a maximal sequence of siblings that are each one of:
//! - whitespace-only text,
//! - a bare image (`<img>`, or `<a>` wrapping exactly one `<img>`),
//! - a paragraph holding nothing but such images, whitespace and line breaks.
//!
//! Whitespace at the end of a run is not consumed. Scanning resumes right after the
//! inserted container.

use crate::markup::{px, Element, MarkupNode, Style};

pub const GRID_ATTR: &str = "data-image-grid";
pub const IMAGE_COUNT_ATTR: &str = "data-image-count";
pub const COLUMNS_ATTR: &str = "data-columns";
pub const GRID_CLASS: &str = "image-grid";

/// Layout knobs for the grid container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridOptions {
    /// Gap between cells in pixels
    pub gap: f64,
}

impl Default for GridOptions {
    fn default() -> Self {
        Self { gap: 8.0 }
    }
}

/// Number of grid columns for `count` images
pub fn grid_columns(count: usize) -> usize {
    match count {
        2 | 4 => 2,
        3 => 3,
        n if n >= 5 => 3,
        _ => 1,
    }
}

/// The images a sibling contributes to a run, or an empty list when it cannot be part of one.
pub fn extract_images(node: &MarkupNode) -> Vec<MarkupNode> {
    let Some(element) = node.as_element() else {
        return Vec::new();
    };
    if is_bare_image(element) {
        return vec![node.clone()];
    }
    if element.tag != "p" {
        return Vec::new();
    }

    let mut images = Vec::new();
    for child in &element.children {
        match child {
            MarkupNode::Text(value) if value.trim().is_empty() => {}
            MarkupNode::Text(_) => return Vec::new(),
            MarkupNode::Element(inner) if inner.tag == "br" => {}
            MarkupNode::Element(inner) if is_bare_image(inner) => images.push(child.clone()),
            MarkupNode::Element(_) => return Vec::new(),
        }
    }
    images
}

fn is_bare_image(element: &Element) -> bool {
    match element.tag.as_str() {
        "img" => true,
        "a" => matches!(element.children.as_slice(), [only] if only.is_tag("img")),
        _ => false,
    }
}

/// Group image runs among `nodes`. Returns the number of containers inserted.
pub fn group_images(nodes: &mut Vec<MarkupNode>, options: &GridOptions) -> usize {
    let mut containers = 0;
    let mut i = 0;
    while i < nodes.len() {
        if extract_images(&nodes[i]).is_empty() {
            i += 1;
            continue;
        }

        let mut images = Vec::new();
        let mut end = i;
        let mut j = i;
        while j < nodes.len() {
            if nodes[j].is_whitespace() {
                j += 1;
                continue;
            }
            let found = extract_images(&nodes[j]);
            if found.is_empty() {
                break;
            }
            images.extend(found);
            j += 1;
            end = j;
        }

        if images.len() < 2 {
            i = end;
            continue;
        }

        let line = earliest_line(&nodes[i..end]);
        let container = build_container(images, line, options);
        nodes.splice(i..end, std::iter::once(container));
        containers += 1;
        i += 1;
    }
    if containers > 0 {
        tracing::debug!(containers, "grouped image runs");
    }
    containers
}

fn earliest_line(nodes: &[MarkupNode]) -> Option<usize> {
    fn visit(node: &MarkupNode, best: &mut Option<usize>) {
        if let MarkupNode::Element(element) = node {
            if let Some(line) = element.source_line() {
                *best = Some(best.map_or(line, |current| current.min(line)));
            }
            for child in &element.children {
                visit(child, best);
            }
        }
    }
    let mut best = None;
    for node in nodes {
        visit(node, &mut best);
    }
    best
}

fn build_container(images: Vec<MarkupNode>, line: Option<usize>, options: &GridOptions) -> MarkupNode {
    let count = images.len();
    let columns = grid_columns(count);

    let mut container = Element::new("section")
        .with_attr("class", GRID_CLASS)
        .with_attr(GRID_ATTR, "true")
        .with_attr(IMAGE_COUNT_ATTR, count.to_string())
        .with_attr(COLUMNS_ATTR, columns.to_string());
    container.merge_style(
        &Style::new()
            .set("display", "grid")
            .set(
                "grid-template-columns",
                format!("repeat({}, minmax(0, 1fr))", columns),
            )
            .set("gap", px(options.gap))
            .set("margin", "16px 0"),
    );
    if let Some(line) = line {
        container.set_source_line(line);
    }

    let cell_style = Style::new()
        .set("display", "flex")
        .set("align-items", "center")
        .set("justify-content", "center")
        .set("overflow", "hidden");
    container.children = images
        .into_iter()
        .map(|image| {
            let mut cell = Element::new("section").with_child(image);
            cell.merge_style(&cell_style);
            cell.into()
        })
        .collect();
    container.into()
}
