//! Integration tests driving the full layout-then-paint pipeline through the
//! public `wisp-css` API, recording what a [`GraphicsContext`] would draw.

use wisp_css::{ApproximateTextMeasure, Color, ComputedStyle, GraphicsContext, LayoutContext, PaintContext, Stylesheet, layout_document, paint_document};
use wisp_dom::DomTree;

#[derive(Default)]
struct RecordingContext {
    calls: Vec<String>,
}

impl GraphicsContext for RecordingContext {
    fn set_color(&mut self, color: Color) {
        self.calls.push(format!("set_color {} {} {}", color.r, color.g, color.b));
    }
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, _radius: f32) {
        self.calls.push(format!("fill_rect {x} {y} {width} {height}"));
    }
    fn stroke_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32, _line_width: f32, _radius: f32) {}
    fn draw_line(&mut self, _x1: f32, _y1: f32, _x2: f32, _y2: f32, _width: f32) {}
    fn draw_text(&mut self, text: &str, x: f32, y: f32, _font_size: f32, _bold: bool, _italic: bool) {
        self.calls.push(format!("draw_text {text} {x} {y}"));
    }
    fn draw_image(&mut self, src: &str, x: f32, y: f32, width: f32, height: f32) {
        self.calls.push(format!("draw_image {src} {x} {y} {width} {height}"));
    }
    fn push_state(&mut self) {
        self.calls.push("push_state".to_string());
    }
    fn pop_state(&mut self) {
        self.calls.push("pop_state".to_string());
    }
    fn clip_rect(&mut self, _x: f32, _y: f32, _width: f32, _height: f32) {}
    fn translate(&mut self, _dx: f32, _dy: f32) {}
    fn scale(&mut self, _sx: f32, _sy: f32) {}
    fn rotate(&mut self, _radians: f32) {}
}

fn render(html_css_pairs: &[(&str, &str)], css: &str) -> Vec<String> {
    let mut tree = DomTree::new();
    let root = tree.root();
    for &(tag, text) in html_css_pairs {
        let el = tree.create_element(root, tag);
        if !text.is_empty() {
            tree.append_text(el, text);
        }
    }
    let sheets = vec![wisp_css::parse_stylesheet(css)];
    let style = ComputedStyle::resolve(&tree, &sheets, root);
    let layout_ctx = LayoutContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        fetcher: None,
    };
    let root_box = layout_document(&layout_ctx, root, 800.0, 600.0);
    let paint_ctx = PaintContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        scroll_y: 0.0,
    };
    let mut gfx = RecordingContext::default();
    paint_document(&paint_ctx, &root_box, &mut gfx);
    gfx.calls
}

#[test]
fn test_div_with_background_paints_a_fill_rect() {
    let calls = render(&[("div", "")], "div { background-color: #ff0000; width: 100px; height: 50px; }");
    assert!(calls.iter().any(|c| c.starts_with("fill_rect 0 0 100 50")));
}

#[test]
fn test_paragraph_text_is_drawn() {
    let calls = render(&[("p", "hello")], "");
    assert!(calls.iter().any(|c| c.starts_with("draw_text hello")));
}

#[test]
fn test_positive_z_index_sibling_paints_after_default_sibling() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let back = tree.create_element(root, "div");
    tree.set_attribute(back, "style", "background-color: #0000ff; width: 10px; height: 10px;");
    let front = tree.create_element(root, "div");
    tree.set_attribute(front, "style", "position: relative; z-index: 1; background-color: #ff0000; width: 10px; height: 10px;");
    let sheets: Vec<Stylesheet> = Vec::new();
    let style = ComputedStyle::resolve(&tree, &sheets, root);
    let layout_ctx = LayoutContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        fetcher: None,
    };
    let root_box = layout_document(&layout_ctx, root, 800.0, 600.0);
    let paint_ctx = PaintContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        scroll_y: 0.0,
    };
    let mut gfx = RecordingContext::default();
    paint_document(&paint_ctx, &root_box, &mut gfx);
    let blue = gfx.calls.iter().position(|c| c == "set_color 0 0 255").unwrap();
    let red = gfx.calls.iter().position(|c| c == "set_color 255 0 0").unwrap();
    assert!(blue < red);
}

#[test]
fn test_scrolled_non_fixed_box_paints_at_adjusted_y() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let div = tree.create_element(root, "div");
    tree.set_attribute(div, "style", "background-color: #00ff00; width: 10px; height: 10px; margin-top: 50px;");
    let sheets: Vec<Stylesheet> = Vec::new();
    let style = ComputedStyle::resolve(&tree, &sheets, root);
    let layout_ctx = LayoutContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        fetcher: None,
    };
    let root_box = layout_document(&layout_ctx, root, 800.0, 600.0);
    let paint_ctx = PaintContext {
        tree: &tree,
        style: &style,
        text_measure: &ApproximateTextMeasure,
        scroll_y: 20.0,
    };
    let mut gfx = RecordingContext::default();
    paint_document(&paint_ctx, &root_box, &mut gfx);
    assert!(gfx.calls.iter().any(|c| c.starts_with("fill_rect 0 30 10 10")));
}
