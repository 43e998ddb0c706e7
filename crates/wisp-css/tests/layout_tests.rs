//! Integration tests for block/inline layout against the full `layout_document` entry point.

use wisp_css::{ApproximateTextMeasure, ComputedStyle, LayoutContext, Stylesheet, layout_document};
use wisp_dom::DomTree;

fn layout(tree: &DomTree, root: wisp_dom::NodeId, sheets: &[Stylesheet], w: f32, h: f32) -> wisp_css::LayoutBox {
    let style = ComputedStyle::resolve(tree, sheets, root);
    let ctx = LayoutContext {
        tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        fetcher: None,
    };
    layout_document(&ctx, root, w, h)
}

#[test]
fn test_block_children_stack_vertically() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "div");
    tree.set_attribute(a, "style", "height: 40px");
    let b = tree.create_element(root, "div");
    tree.set_attribute(b, "style", "height: 60px");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children.len(), 2);
    assert_eq!(result.children[0].y, 0.0);
    assert_eq!(result.children[1].y, 40.0);
}

#[test]
fn test_block_fills_containing_width_by_default() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.append_text(div, "x");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children[0].width, 800.0);
}

#[test]
fn test_explicit_width_is_honored() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "width: 200px");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children[0].width, 200.0);
}

#[test]
fn test_auto_margins_center_a_fixed_width_block() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "width: 200px; margin-left: auto; margin-right: auto");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children[0].x, 300.0);
}

#[test]
fn test_padding_and_border_offset_content_box() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "padding: 10px; border: 5px solid black");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children[0].x, 15.0);
}

#[test]
fn test_absolute_positioned_box_uses_top_left_offsets() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "position: absolute; top: 10px; left: 20px; width: 30px; height: 15px");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children[0].x, 20.0);
    assert_eq!(result.children[0].y, 10.0);
}

#[test]
fn test_display_none_element_generates_no_box() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let _shown = tree.create_element(root, "div");
    let hidden = tree.create_element(root, "div");
    tree.set_attribute(hidden, "style", "display: none");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    assert_eq!(result.children.len(), 1);
}

#[test]
fn test_inline_siblings_share_a_single_line_box_run() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element(root, "p");
    let a = tree.create_element(p, "span");
    tree.append_text(a, "hello");
    let b = tree.create_element(p, "span");
    tree.append_text(b, "world");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    // p's only child is the anonymous inline-formatting-context wrapper.
    assert_eq!(result.children[0].children.len(), 1);
}

#[test]
fn test_image_without_declared_size_uses_html_default() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let p = tree.create_element(root, "p");
    tree.create_element(p, "img");
    let result = layout(&tree, root, &Vec::new(), 800.0, 600.0);
    let line = &result.children[0].children[0];
    assert_eq!(line.children[0].height, 150.0);
}
