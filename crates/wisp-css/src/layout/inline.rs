//! Inline formatting context: flattening inline-level content into words,
//! line breaking, and `text-align`.
//!
//! [§4.5 Layout engine] "Consecutive inline-level content ... is wrapped
//! into a single anonymous inline container that performs line breaking by
//! word ... Whitespace between inline elements is preserved as a single
//! space."

use wisp_common::Fetcher;
use wisp_dom::{DomTree, NodeId, NodeType};

use super::image_size::resolve_with_fetcher;
use super::layout_box::{BoxContent, LayoutBox};
use super::text::TextMeasure;
use crate::cascade::{ComputedStyle, Display};

/// One atomic unit of inline content: a single word, or a replaced element
/// (an image) sized to its own intrinsic/declared dimensions.
enum InlineItem {
    Word { text: String, style_node: NodeId },
    Image { node: NodeId, width: f32, height: f32 },
}

/// Flatten `node`'s inline-level children into a word/image stream. Nested
/// inline elements recurse (so a `<span>` inside another `<span>` resolves
/// its own nearest style ancestor correctly); a nested block element is the
/// caller's responsibility (block-in-inline splitting happens one level up,
/// in [`super::layout_flow`]).
fn flatten_inline(tree: &DomTree, style: &ComputedStyle, node: NodeId, fetcher: Option<&dyn Fetcher>, items: &mut Vec<InlineItem>) {
    for &child in tree.children(node) {
        match &tree.get(child).unwrap().node_type {
            NodeType::Text(text) => {
                for word in text.split_ascii_whitespace() {
                    items.push(InlineItem::Word {
                        text: word.to_string(),
                        style_node: node,
                    });
                }
            }
            NodeType::Comment(_) => {}
            NodeType::Element(data) => {
                if data.tag_name == "img" {
                    let (w, h) = resolve_with_fetcher(tree, style, child, fetcher);
                    items.push(InlineItem::Image { node: child, width: w, height: h });
                } else if style.display(tree, child) != Display::None {
                    flatten_inline(tree, style, child, fetcher, items);
                }
            }
        }
    }
}

fn item_metrics(tree: &DomTree, style: &ComputedStyle, item: &InlineItem, text_measure: &dyn TextMeasure) -> (f32, f32) {
    match item {
        InlineItem::Word { text, style_node } => {
            let font_size = style.font_size(tree, *style_node);
            let bold = style
                .keyword(tree, *style_node, "font-weight")
                .is_some_and(|w| w == "bold" || w.parse::<u32>().is_ok_and(|n| n >= 700));
            let (width, _ascent) = text_measure.measure(text, font_size, bold);
            let line_height = style.length(tree, *style_node, "line-height", font_size).unwrap_or(font_size * 1.2);
            (width, line_height)
        }
        InlineItem::Image { width, height, .. } => (*width, *height),
    }
}

/// Lay out consecutive inline-level children `run` (already extracted by
/// the caller as a single run belonging to block container `node`) into
/// line boxes filling `content_width`, positioned in viewport coordinates
/// with the run's top-left corner at `(origin_x, origin_y)`.
///
/// Returns the line boxes (and their text/image children), already in
/// viewport coordinates, plus their total stacked height.
#[allow(clippy::too_many_arguments)]
pub fn layout_inline_run(
    tree: &DomTree,
    style: &ComputedStyle,
    node: NodeId,
    run: &[NodeId],
    origin_x: f32,
    origin_y: f32,
    content_width: f32,
    text_measure: &dyn TextMeasure,
    fetcher: Option<&dyn Fetcher>,
) -> (Vec<LayoutBox>, f32) {
    let mut items = Vec::new();
    for &child in run {
        match &tree.get(child).unwrap().node_type {
            NodeType::Text(text) => {
                for word in text.split_ascii_whitespace() {
                    items.push(InlineItem::Word {
                        text: word.to_string(),
                        style_node: node,
                    });
                }
            }
            NodeType::Comment(_) => {}
            NodeType::Element(data) => {
                if data.tag_name == "img" {
                    let (w, h) = resolve_with_fetcher(tree, style, child, fetcher);
                    items.push(InlineItem::Image { node: child, width: w, height: h });
                } else {
                    flatten_inline(tree, style, child, fetcher, &mut items);
                }
            }
        }
    }

    let space_width = text_measure.measure(" ", style.font_size(tree, node), false).0;
    let text_align = style.keyword(tree, node, "text-align").unwrap_or_default();

    let mut lines = Vec::new();
    let mut current: Vec<(usize, f32, f32)> = Vec::new(); // item index, x, width
    let mut cursor_x = 0.0_f32;
    let mut line_height_acc = 0.0_f32;
    let mut line_top = 0.0_f32;

    for (i, item) in items.iter().enumerate() {
        let (width, line_height) = item_metrics(tree, style, item, text_measure);
        let needs_space = !current.is_empty();
        let space = if needs_space { space_width } else { 0.0 };
        if needs_space && cursor_x + space + width > content_width {
            line_top += flush_line(tree, &items, &mut current, line_height_acc, origin_x, origin_y + line_top, content_width, &text_align, &mut lines);
            cursor_x = 0.0;
            line_height_acc = 0.0;
        } else if needs_space {
            cursor_x += space;
        }
        current.push((i, cursor_x, width));
        cursor_x += width;
        line_height_acc = line_height_acc.max(line_height);
    }
    line_top += flush_line(tree, &items, &mut current, line_height_acc, origin_x, origin_y + line_top, content_width, &text_align, &mut lines);

    (lines, line_top)
}

/// Emit one line box (and its positioned word/image children) at viewport
/// position `(origin_x, line_y)`. Returns the line's height, `0.0` if
/// `current` was empty (nothing to flush).
#[allow(clippy::too_many_arguments)]
fn flush_line(
    tree: &DomTree,
    items: &[InlineItem],
    current: &mut Vec<(usize, f32, f32)>,
    line_height: f32,
    origin_x: f32,
    line_y: f32,
    content_width: f32,
    text_align: &str,
    lines: &mut Vec<LayoutBox>,
) -> f32 {
    if current.is_empty() {
        return 0.0;
    }
    let used_width = current.last().map_or(0.0, |&(_, x, w)| x + w);
    let align_offset = match text_align {
        "right" => content_width - used_width,
        "center" => (content_width - used_width) / 2.0,
        _ => 0.0,
    };

    let mut line = LayoutBox::anonymous(BoxContent::LineBox);
    line.x = origin_x;
    line.y = line_y;
    line.width = content_width;
    line.height = line_height;
    for &(idx, x, w) in current.iter() {
        let mut child_box = match &items[idx] {
            InlineItem::Word { text, style_node } => {
                let mut b = LayoutBox::anonymous(BoxContent::Text(text.clone()));
                b.node = Some(*style_node);
                b.height = line_height;
                b
            }
            InlineItem::Image { node, height, .. } => {
                let mut b = LayoutBox::anonymous(BoxContent::Image {
                    src: tree.get_attribute(*node, "src").unwrap_or_default().to_string(),
                });
                b.node = Some(*node);
                b.height = *height;
                b
            }
        };
        child_box.x = origin_x + x + align_offset;
        child_box.width = w;
        child_box.y = line_y;
        line.children.push(child_box);
    }
    lines.push(line);
    current.clear();
    line_height
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text::ApproximateTextMeasure;
    use crate::stylesheet::Stylesheet;

    #[test]
    fn single_short_word_fits_on_one_line() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = tree.create_element(root, "p");
        tree.append_text(p, "hi");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let (lines, _) = layout_inline_run(&tree, &style, p, tree.children(p), 0.0, 0.0, 400.0, &ApproximateTextMeasure, None);
        assert_eq!(lines.len(), 1);
    }

    #[test]
    fn long_text_wraps_across_multiple_lines() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = tree.create_element(root, "p");
        tree.append_text(p, "the quick brown fox jumps over the lazy dog repeatedly today");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let (lines, _) = layout_inline_run(&tree, &style, p, tree.children(p), 0.0, 0.0, 80.0, &ApproximateTextMeasure, None);
        assert!(lines.len() > 1);
    }

    #[test]
    fn text_align_center_offsets_short_line() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = tree.create_element(root, "p");
        tree.set_attribute(p, "style", "text-align: center");
        tree.append_text(p, "hi");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let (lines, _) = layout_inline_run(&tree, &style, p, tree.children(p), 0.0, 0.0, 400.0, &ApproximateTextMeasure, None);
        assert!(lines[0].children[0].x > 0.0);
    }

    #[test]
    fn nested_span_text_wraps_into_the_same_line_stream() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = tree.create_element(root, "p");
        tree.append_text(p, "before");
        let span = tree.create_element(p, "span");
        tree.append_text(span, "inside");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let (lines, _) = layout_inline_run(&tree, &style, p, tree.children(p), 0.0, 0.0, 400.0, &ApproximateTextMeasure, None);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].children.len(), 2);
    }
}
