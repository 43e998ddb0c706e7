//! Style resolution: the cascade from matching stylesheet rules plus the
//! inline `style` attribute, and inheritance resolved at lookup time.
//!
//! [§4.4 Style resolution] "Inherited properties ... propagate from parent
//! at lookup time, not by eager copy, so that DOM mutations are observed on
//! the next layout."

use std::collections::HashMap;

use wisp_dom::{DomTree, Node, NodeId};

use crate::color::Color;
use crate::declarations::{Declarations, parse_declarations};
use crate::length::{DEFAULT_FONT_SIZE_PX, Length};
use crate::stylesheet::Stylesheet;

/// Properties that, absent an own declaration, read from the nearest
/// ancestor that declares them.
const INHERITED_PROPERTIES: &[&str] = &["color", "font-size", "font-family", "font-weight", "text-align", "line-height"];

/// The resolved "own declarations" for every element in a tree, built once
/// per layout pass. Inheritance is *not* baked in here: [`ComputedStyle::get`]
/// walks ancestors on each call.
#[derive(Debug, Default)]
pub struct ComputedStyle {
    own: HashMap<NodeId, Declarations>,
}

impl ComputedStyle {
    /// Resolve the cascade for every element in `root`'s subtree: all
    /// matching stylesheet rules in document order across sheets, then the
    /// inline `style` attribute on top.
    #[must_use]
    pub fn resolve(tree: &DomTree, sheets: &[Stylesheet], root: NodeId) -> Self {
        let mut own = HashMap::new();
        for node in tree.iter_subtree(root) {
            if !tree.get(node).is_some_and(Node::is_element) {
                continue;
            }
            let mut decls = Declarations::new();
            for sheet in sheets {
                for rule in &sheet.rules {
                    if rule.selectors.matches(tree, node) {
                        for (k, v) in &rule.declarations {
                            decls.insert(k.clone(), v.clone());
                        }
                    }
                }
            }
            if let Some(inline) = tree.get_attribute(node, "style") {
                for (k, v) in parse_declarations(inline) {
                    decls.insert(k, v);
                }
            }
            own.insert(node, decls);
        }
        Self { own }
    }

    /// This node's own (non-inherited-through) declaration map, if it is an
    /// element with any matched or inline declarations.
    #[must_use]
    pub fn own_declarations(&self, node: NodeId) -> Option<&Declarations> {
        self.own.get(&node)
    }

    /// Read `prop`'s specified value, falling back to the nearest ancestor's
    /// value if `prop` is inheritable and this node doesn't declare it.
    #[must_use]
    pub fn get<'a>(&'a self, tree: &DomTree, node: NodeId, prop: &str) -> Option<&'a str> {
        if let Some(v) = self.own.get(&node).and_then(|d| d.get(prop)) {
            return Some(v.as_str());
        }
        if INHERITED_PROPERTIES.contains(&prop) {
            let parent = tree.parent(node)?;
            return self.get(tree, parent, prop);
        }
        None
    }

    /// The resolved `font-size` in pixels, climbing ancestors for `em` and
    /// inheritance, bottoming out at [`DEFAULT_FONT_SIZE_PX`].
    #[must_use]
    pub fn font_size(&self, tree: &DomTree, node: NodeId) -> f32 {
        match self.get(tree, node, "font-size").and_then(Length::parse) {
            Some(Length::Em(em)) => {
                let parent_size = tree.parent(node).map_or(DEFAULT_FONT_SIZE_PX, |p| self.font_size(tree, p));
                em * parent_size
            }
            Some(other) => other.resolve_absolute(DEFAULT_FONT_SIZE_PX),
            None => DEFAULT_FONT_SIZE_PX,
        }
    }

    /// Resolve a length-valued property, honoring percentages against
    /// `relative_to` and `em` against this node's font size. `None` means
    /// the property is unset or the literal keyword `auto`.
    #[must_use]
    pub fn length(&self, tree: &DomTree, node: NodeId, prop: &str, relative_to: f32) -> Option<f32> {
        let raw = self.get(tree, node, prop)?;
        if raw.eq_ignore_ascii_case("auto") {
            return None;
        }
        let font_size = self.font_size(tree, node);
        Length::parse(raw).map(|l| l.resolve(relative_to, font_size))
    }

    /// Resolve a color-valued property, falling back to `default`.
    #[must_use]
    pub fn color(&self, tree: &DomTree, node: NodeId, prop: &str, default: Color) -> Color {
        self.get(tree, node, prop).and_then(Color::parse).unwrap_or(default)
    }

    /// Resolve a keyword-valued property as a raw lowercased string slice.
    #[must_use]
    pub fn keyword(&self, tree: &DomTree, node: NodeId, prop: &str) -> Option<String> {
        self.get(tree, node, prop).map(str::to_ascii_lowercase)
    }

    /// `display`, defaulting to [`Display::Block`] (this engine has no UA
    /// stylesheet distinguishing inline elements by tag name beyond what a
    /// stylesheet declares).
    #[must_use]
    pub fn display(&self, tree: &DomTree, node: NodeId) -> Display {
        match self.keyword(tree, node, "display").as_deref() {
            Some("none") => Display::None,
            Some("inline") => Display::Inline,
            Some("inline-block") => Display::InlineBlock,
            _ => default_display_for_tag(tree, node),
        }
    }

    /// `position`, defaulting to [`Position::Static`].
    #[must_use]
    pub fn position(&self, tree: &DomTree, node: NodeId) -> Position {
        match self.keyword(tree, node, "position").as_deref() {
            Some("relative") => Position::Relative,
            Some("absolute") => Position::Absolute,
            Some("fixed") => Position::Fixed,
            _ => Position::Static,
        }
    }

    /// `float`, defaulting to [`Float::None`].
    #[must_use]
    pub fn float(&self, tree: &DomTree, node: NodeId) -> Float {
        match self.keyword(tree, node, "float").as_deref() {
            Some("left") => Float::Left,
            Some("right") => Float::Right,
            _ => Float::None,
        }
    }

    /// `clear`, defaulting to [`Clear::None`].
    #[must_use]
    pub fn clear(&self, tree: &DomTree, node: NodeId) -> Clear {
        match self.keyword(tree, node, "clear").as_deref() {
            Some("left") => Clear::Left,
            Some("right") => Clear::Right,
            Some("both") => Clear::Both,
            _ => Clear::None,
        }
    }

    /// `z-index`, `None` meaning the `auto` sentinel.
    #[must_use]
    pub fn z_index(&self, tree: &DomTree, node: NodeId) -> Option<i32> {
        self.get(tree, node, "z-index").and_then(|v| v.trim().parse::<i32>().ok())
    }

    /// `opacity`, defaulting to fully opaque.
    #[must_use]
    pub fn opacity(&self, tree: &DomTree, node: NodeId) -> f32 {
        self.get(tree, node, "opacity").and_then(|v| v.trim().parse::<f32>().ok()).unwrap_or(1.0).clamp(0.0, 1.0)
    }

    /// Whether this box's own declarations include a non-`none` `transform`.
    #[must_use]
    pub fn has_transform(&self, tree: &DomTree, node: NodeId) -> bool {
        self.get(tree, node, "transform").is_some_and(|v| !v.trim().eq_ignore_ascii_case("none"))
    }

    /// Whether `node` establishes a new stacking context.
    ///
    /// [§4.5 Layout engine] "true for positioned with explicit `z-index`,
    /// for `position: fixed`, for `opacity < 1`, for any `transform`."
    #[must_use]
    pub fn creates_stacking_context(&self, tree: &DomTree, node: NodeId) -> bool {
        let position = self.position(tree, node);
        let positioned_with_z = !matches!(position, Position::Static) && self.z_index(tree, node).is_some();
        positioned_with_z || matches!(position, Position::Fixed) || self.opacity(tree, node) < 1.0 || self.has_transform(tree, node)
    }
}

fn default_display_for_tag(tree: &DomTree, node: NodeId) -> Display {
    let Some(tag) = tree.get(node).and_then(Node::as_element).map(|e| e.tag_name.as_str()) else {
        return Display::Block;
    };
    if matches!(
        tag,
        "span" | "a" | "b" | "i" | "em" | "strong" | "small" | "code" | "label" | "abbr" | "sub" | "sup" | "u" | "s" | "q"
    ) {
        Display::Inline
    } else {
        Display::Block
    }
}

/// The `display` property's value, restricted to the subset this engine
/// distinguishes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    /// Participates in block flow.
    Block,
    /// Participates in inline flow.
    Inline,
    /// Like `Block` geometrically but sits within an inline flow.
    InlineBlock,
    /// Generates no box.
    None,
}

/// The `position` property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    /// Normal flow.
    Static,
    /// Offset from its natural position, normal-flow geometry otherwise
    /// undisturbed.
    Relative,
    /// Removed from flow, positioned against the nearest positioned
    /// ancestor.
    Absolute,
    /// Removed from flow, positioned against the viewport.
    Fixed,
}

/// The `float` property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Float {
    /// Not floated.
    None,
    /// Floated to the containing block's left edge.
    Left,
    /// Floated to the containing block's right edge.
    Right,
}

/// The `clear` property's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clear {
    /// No effect.
    None,
    /// Clears left floats.
    Left,
    /// Clears right floats.
    Right,
    /// Clears both.
    Both,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::parse_stylesheet;

    #[test]
    fn sheet_rules_apply_in_document_order_and_inline_wins() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "color: blue");
        let sheets = vec![parse_stylesheet("div { color: red; } div { color: green; }")];
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(style.get(&tree, div, "color"), Some("blue"));
    }

    #[test]
    fn later_sheet_rule_overrides_earlier_one() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        let sheets = vec![parse_stylesheet("div { color: red; }"), parse_stylesheet("div { color: green; }")];
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(style.get(&tree, div, "color"), Some("green"));
    }

    #[test]
    fn inherited_property_propagates_from_ancestor_at_lookup_time() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "color: blue");
        let span = tree.create_element(div, "span");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(style.get(&tree, span, "color"), Some("blue"));
    }

    #[test]
    fn non_inherited_property_does_not_propagate() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "width: 100px");
        let span = tree.create_element(div, "span");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(style.get(&tree, span, "width"), None);
    }

    #[test]
    fn font_size_em_resolves_against_parent() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "font-size: 20px");
        let span = tree.create_element(div, "span");
        tree.set_attribute(span, "style", "font-size: 2em");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(style.font_size(&tree, span), 40.0);
    }

    #[test]
    fn stacking_context_flags_positioned_with_z_index() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "style", "position: relative; z-index: 2");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert!(style.creates_stacking_context(&tree, div));
    }
}
