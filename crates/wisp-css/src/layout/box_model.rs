//! The CSS box model: margin, border, padding edge widths around a content
//! rectangle.
//!
//! [§4.5 Layout engine] "For every element, box geometry is
//! `margin | border | padding | content | padding | border | margin`."

use wisp_dom::{DomTree, NodeId};

use crate::cascade::ComputedStyle;

/// Widths of the four edges of one box-model ring (margin, border, or
/// padding).
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Edges {
    /// Top edge width.
    pub top: f32,
    /// Right edge width.
    pub right: f32,
    /// Bottom edge width.
    pub bottom: f32,
    /// Left edge width.
    pub left: f32,
}

impl Edges {
    /// Sum of the left and right edges.
    #[must_use]
    pub const fn horizontal(self) -> f32 {
        self.left + self.right
    }

    /// Sum of the top and bottom edges.
    #[must_use]
    pub const fn vertical(self) -> f32 {
        self.top + self.bottom
    }
}

/// Resolve the `{prefix}-top/-right/-bottom/-left` properties against
/// `containing_width` (horizontal percentages resolve against it; this
/// engine resolves vertical margin/padding percentages against the same
/// containing width, matching CSS 2.1 §8.3's "both vertical and horizontal
/// paddings/margins ... are calculated with respect to the width").
#[must_use]
pub fn resolve_edges(style: &ComputedStyle, tree: &DomTree, node: NodeId, prefix: &str, containing_width: f32) -> Edges {
    let side = |side: &str| style.length(tree, node, &format!("{prefix}-{side}"), containing_width).unwrap_or(0.0);
    Edges {
        top: side("top"),
        right: side("right"),
        bottom: side("bottom"),
        left: side("left"),
    }
}

/// Resolve `border-{side}-width` for each side, honoring `border-{side}-style:
/// none` by zeroing that side's width regardless of a declared width.
#[must_use]
pub fn resolve_border_edges(style: &ComputedStyle, tree: &DomTree, node: NodeId) -> Edges {
    let side = |side: &str| {
        let suppressed = style.keyword(tree, node, &format!("border-{side}-style")).as_deref() == Some("none");
        if suppressed {
            0.0
        } else {
            style.length(tree, node, &format!("border-{side}-width"), 0.0).unwrap_or(0.0)
        }
    };
    Edges {
        top: side("top"),
        right: side("right"),
        bottom: side("bottom"),
        left: side("left"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Stylesheet;

    #[test]
    fn resolves_margin_percentage_against_containing_width() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "margin-left: 10%");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let edges = resolve_edges(&style, &tree, div, "margin", 200.0);
        assert_eq!(edges.left, 20.0);
        assert_eq!(edges.top, 0.0);
    }

    #[test]
    fn border_style_none_zeroes_width() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "border-top-width: 5px; border-top-style: none");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let edges = resolve_border_edges(&style, &tree, div);
        assert_eq!(edges.top, 0.0);
    }
}
