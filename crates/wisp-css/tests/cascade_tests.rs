//! Integration tests for stylesheet cascading, inheritance, and computed
//! keyword/length/color resolution.

use wisp_css::{Color, ComputedStyle, Display, Position, Stylesheet, parse_stylesheet};
use wisp_dom::DomTree;

fn sheets(css: &str) -> Vec<Stylesheet> {
    vec![parse_stylesheet(css)]
}

#[test]
fn test_matching_rule_declarations_are_resolved() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let body = tree.create_element(root, "body");
    let style = ComputedStyle::resolve(&tree, &sheets("body { color: #333333; }"), root);
    assert_eq!(style.color(&tree, body, "color", Color::BLACK), Color { r: 0x33, g: 0x33, b: 0x33, a: 1.0 });
}

#[test]
fn test_inline_style_attribute_wins_over_stylesheet() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element(root, "p");
    tree.set_attribute(p, "style", "color: #ff0000");
    let style = ComputedStyle::resolve(&tree, &sheets("p { color: #0000ff; }"), root);
    assert_eq!(style.color(&tree, p, "color", Color::BLACK), Color { r: 0xff, g: 0, b: 0, a: 1.0 });
}

#[test]
fn test_later_rule_overrides_earlier_rule_for_same_property() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element(root, "p");
    let style = ComputedStyle::resolve(&tree, &sheets("p { color: #111111; } p { color: #222222; }"), root);
    assert_eq!(style.color(&tree, p, "color", Color::BLACK), Color { r: 0x22, g: 0x22, b: 0x22, a: 1.0 });
}

#[test]
fn test_color_inherits_from_ancestor_when_undeclared() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    let span = tree.create_element(div, "span");
    let style = ComputedStyle::resolve(&tree, &sheets("div { color: #00ff00; }"), root);
    assert_eq!(style.color(&tree, span, "color", Color::BLACK), Color { r: 0, g: 0xff, b: 0, a: 1.0 });
}

#[test]
fn test_margin_does_not_inherit() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    let span = tree.create_element(div, "span");
    let style = ComputedStyle::resolve(&tree, &sheets("div { margin: 10px; }"), root);
    assert!(style.length(&tree, span, "margin-top", 0.0).is_none());
}

#[test]
fn test_default_display_for_known_inline_tags() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let span = tree.create_element(root, "span");
    let div = tree.create_element(root, "div");
    let style = ComputedStyle::resolve(&tree, &Vec::new(), root);
    assert_eq!(style.display(&tree, span), Display::Inline);
    assert_eq!(style.display(&tree, div), Display::Block);
}

#[test]
fn test_display_none_hides_element() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "display: none");
    let style = ComputedStyle::resolve(&tree, &Vec::new(), root);
    assert_eq!(style.display(&tree, div), Display::None);
}

#[test]
fn test_position_fixed_parses_from_keyword() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "position: fixed");
    let style = ComputedStyle::resolve(&tree, &Vec::new(), root);
    assert_eq!(style.position(&tree, div), Position::Fixed);
}

#[test]
fn test_opacity_below_one_creates_stacking_context() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "opacity: 0.5");
    let style = ComputedStyle::resolve(&tree, &Vec::new(), root);
    assert!(style.creates_stacking_context(&tree, div));
}

#[test]
fn test_static_position_without_special_properties_has_no_stacking_context() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    let style = ComputedStyle::resolve(&tree, &Vec::new(), root);
    assert!(!style.creates_stacking_context(&tree, div));
}
