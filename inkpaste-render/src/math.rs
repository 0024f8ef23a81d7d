//! Math rendering seam
//!
//! Lowering leaves an empty placeholder for each math span, carrying the TeX source in
//! `data-tex` and the mode in `data-math`. This pass fills each placeholder with whatever a
//! [`MathRenderer`] produces. The renderer is a black box: anything that turns TeX into
//! markup nodes can be plugged in through [`crate::RenderOptions`].

use crate::lowering::{MATH_ATTR, TEX_ATTR};
use crate::markup::{Element, MarkupNode};
use std::fmt;

/// Turns TeX source into markup. Shared across concurrent renders.
pub trait MathRenderer: Send + Sync + fmt::Debug {
    fn render(&self, tex: &str, display: bool) -> Vec<MarkupNode>;
}

/// Emits the TeX source as text, inside `<code>` for display math.
///
/// Paste targets do not run scripts or load fonts, so this is the one rendering that
/// survives everywhere.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainMathRenderer;

impl MathRenderer for PlainMathRenderer {
    fn render(&self, tex: &str, display: bool) -> Vec<MarkupNode> {
        if display {
            vec![Element::new("code")
                .with_child(MarkupNode::text(tex))
                .into()]
        } else {
            vec![MarkupNode::text(tex)]
        }
    }
}

/// Fill every empty math placeholder under `nodes`. Returns how many were rendered.
pub fn render_math(nodes: &mut [MarkupNode], renderer: &dyn MathRenderer) -> usize {
    let mut rendered = 0;
    for element in nodes.iter_mut().filter_map(MarkupNode::as_element_mut) {
        let placeholder = match (element.attr(MATH_ATTR), element.attr(TEX_ATTR)) {
            (Some(mode), Some(tex)) if element.children.is_empty() => {
                Some((mode == "block", tex.to_string()))
            }
            _ => None,
        };
        match placeholder {
            Some((display, tex)) => {
                element.children = renderer.render(&tex, display);
                rendered += 1;
            }
            None => rendered += render_math(&mut element.children, renderer),
        }
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Bracketing;

    impl MathRenderer for Bracketing {
        fn render(&self, tex: &str, display: bool) -> Vec<MarkupNode> {
            let open = if display { "[" } else { "(" };
            vec![MarkupNode::text(format!("{}{}", open, tex))]
        }
    }

    fn placeholder(tag: &str, mode: &str, tex: &str) -> MarkupNode {
        Element::new(tag)
            .with_attr(MATH_ATTR, mode)
            .with_attr(TEX_ATTR, tex)
            .into()
    }

    #[test]
    fn test_placeholders_are_filled() {
        let mut nodes = vec![
            Element::new("p")
                .with_child(placeholder("span", "inline", "x"))
                .into(),
            placeholder("section", "block", "y"),
        ];
        assert_eq!(render_math(&mut nodes, &Bracketing), 2);

        let p = nodes[0].as_element().unwrap();
        assert_eq!(p.text_content(), "(x");
        assert_eq!(nodes[1].as_element().unwrap().text_content(), "[y");
    }

    #[test]
    fn test_plain_renderer() {
        let mut nodes = vec![placeholder("section", "block", "e=mc^2")];
        render_math(&mut nodes, &PlainMathRenderer);
        let section = nodes[0].as_element().unwrap();
        assert!(section.children[0].is_tag("code"));
        assert_eq!(section.text_content(), "e=mc^2");
    }
}
