//! Integration tests for CSS selector matching against a live DOM tree.

use wisp_css::{Selector, SelectorGroup, matches_selector};
use wisp_dom::DomTree;

fn parse(src: &str) -> Selector {
    SelectorGroup::parse(src).0.into_iter().next().unwrap()
}

#[test]
fn test_type_selector_matches_tag() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element(root, "p");
    assert!(matches_selector(&tree, p, &parse("p")));
    assert!(!matches_selector(&tree, p, &parse("div")));
}

#[test]
fn test_class_selector_matches_one_of_several_classes() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "class", "box highlight");
    assert!(matches_selector(&tree, div, &parse(".highlight")));
    assert!(!matches_selector(&tree, div, &parse(".missing")));
}

#[test]
fn test_id_selector_matches_exact_id() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "id", "main");
    assert!(matches_selector(&tree, div, &parse("#main")));
    assert!(!matches_selector(&tree, div, &parse("#other")));
}

#[test]
fn test_descendant_combinator_matches_any_depth() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let article = tree.create_element(root, "article");
    let section = tree.create_element(article, "section");
    let span = tree.create_element(section, "span");
    assert!(matches_selector(&tree, span, &parse("article span")));
}

#[test]
fn test_child_combinator_requires_direct_parent() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let ul = tree.create_element(root, "ul");
    let li = tree.create_element(ul, "li");
    let span = tree.create_element(li, "span");
    assert!(matches_selector(&tree, li, &parse("ul > li")));
    assert!(!matches_selector(&tree, span, &parse("ul > span")));
}

#[test]
fn test_attribute_selector_matches_declared_value() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let input = tree.create_element(root, "input");
    tree.set_attribute(input, "type", "checkbox");
    assert!(matches_selector(&tree, input, &parse("input[type=checkbox]")));
    assert!(!matches_selector(&tree, input, &parse("input[type=text]")));
}

#[test]
fn test_compound_selector_requires_every_simple_selector() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "class", "card");
    assert!(matches_selector(&tree, div, &parse("div.card")));
    assert!(!matches_selector(&tree, div, &parse("span.card")));
}
