//! The painter: walks a laid-out box tree and drives a [`GraphicsContext`]
//! in CSS 2.1 Appendix E painting order.
//!
//! [CSS 2.1 Appendix E](https://www.w3.org/TR/CSS2/zindex.html#painting-order)
//! "Within each stacking context, the following layers are painted in
//! back-to-front order: 1. background/border of the element forming the
//! stacking context ... 7. child stacking contexts with positive stack
//! levels."

use wisp_dom::{DomTree, NodeId};

use super::GraphicsContext;
use crate::cascade::{ComputedStyle, Position};
use crate::color::Color;
use crate::layout::box_model::Edges;
use crate::layout::layout_box::{BoxContent, LayoutBox};
use crate::layout::text::TextMeasure;
use crate::length::Length;

/// Read-only inputs the painter needs alongside the box tree itself.
pub struct PaintContext<'a> {
    /// The document tree, for attribute/tag lookups the style map doesn't
    /// carry (e.g. `src`).
    pub tree: &'a DomTree,
    /// Resolved styles, for background/border/text/transform properties.
    pub style: &'a ComputedStyle,
    /// Used to size underline/strikethrough decoration lines to the text
    /// run's measured width.
    pub text_measure: &'a dyn TextMeasure,
    /// Vertical scroll offset. [§4.6] "Non-fixed boxes have an effective Y
    /// of `y − scrollY`; fixed boxes use `y` unchanged."
    pub scroll_y: f32,
}

/// Paint `root` (and its subtree) onto `gfx`, starting a new stacking
/// context at the document root.
pub fn paint_document(ctx: &PaintContext<'_>, root: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    paint_stacking_context(ctx, root, gfx);
}

fn scroll_dy(ctx: &PaintContext<'_>, b: &LayoutBox) -> f32 {
    if b.position == Position::Fixed { 0.0 } else { -ctx.scroll_y }
}

/// The descendants of a stacking-context box, partitioned per [§4.6]'s
/// seven-step algorithm. Nested stacking contexts and floats are recorded
/// without descending further into them; everything else is walked fully so
/// text/image content nested arbitrarily deep inside plain block containers
/// is still found.
#[derive(Default)]
struct Collected<'a> {
    negative: Vec<&'a LayoutBox>,
    blocks: Vec<&'a LayoutBox>,
    floats: Vec<&'a LayoutBox>,
    content: Vec<&'a LayoutBox>,
    zero_positioned: Vec<&'a LayoutBox>,
    positive: Vec<&'a LayoutBox>,
}

fn collect<'a>(b: &'a LayoutBox, out: &mut Collected<'a>) {
    for child in &b.children {
        if child.is_float {
            out.floats.push(child);
            continue;
        }
        if child.creates_stacking_context {
            match child.z_index.unwrap_or(0) {
                z if z < 0 => out.negative.push(child),
                z if z > 0 => out.positive.push(child),
                _ => out.zero_positioned.push(child),
            }
            continue;
        }
        match &child.content {
            BoxContent::Element => {
                out.blocks.push(child);
                collect(child, out);
            }
            BoxContent::Text(_) | BoxContent::Image { .. } => out.content.push(child),
            BoxContent::AnonymousBlock | BoxContent::LineBox => collect(child, out),
        }
    }
}

/// Paint `b` as the root of one stacking context: its own background and
/// border, then descendants in the seven-step order, wrapped in `b`'s
/// transform (if any).
fn paint_stacking_context(ctx: &PaintContext<'_>, b: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    let has_transform = b.node.is_some_and(|n| ctx.style.has_transform(ctx.tree, n));
    if has_transform {
        gfx.push_state();
        apply_transform(ctx, b, gfx);
    }

    // Step 1: the stacking-context element's own background and border.
    paint_background_and_border(ctx, b, gfx);

    let mut collected = Collected::default();
    collect(b, &mut collected);

    collected.negative.sort_by_key(|c| c.z_index.unwrap_or(0));
    collected.positive.sort_by_key(|c| c.z_index.unwrap_or(0));

    // Step 2: descendant stacking contexts with z-index < 0.
    for child in &collected.negative {
        paint_stacking_context(ctx, child, gfx);
    }

    // Step 3: in-flow, non-positioned, block-level descendants' backgrounds
    // and borders.
    for block in &collected.blocks {
        paint_background_and_border(ctx, block, gfx);
    }

    // Step 4: non-positioned floats, each its own atomic paint-order subtree.
    for float in &collected.floats {
        paint_stacking_context(ctx, float, gfx);
    }

    // Step 5: inline-level descendant content, plus the content of the
    // step 3 blocks, plus this element's own content (all collected above;
    // `content` walks straight through block boxes so it already includes
    // theirs).
    paint_own_content(ctx, b, gfx);
    for leaf in &collected.content {
        paint_content_leaf(ctx, leaf, gfx);
    }

    // Step 6: positioned descendants with z-index auto or 0.
    for child in &collected.zero_positioned {
        paint_stacking_context(ctx, child, gfx);
    }

    // Step 7: descendant stacking contexts with z-index > 0.
    for child in &collected.positive {
        paint_stacking_context(ctx, child, gfx);
    }

    if has_transform {
        gfx.pop_state();
    }
}

fn paint_own_content(ctx: &PaintContext<'_>, b: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    if matches!(b.content, BoxContent::Text(_) | BoxContent::Image { .. }) {
        paint_content_leaf(ctx, b, gfx);
    }
}

fn paint_content_leaf(ctx: &PaintContext<'_>, b: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    let dy = scroll_dy(ctx, b);
    match &b.content {
        BoxContent::Text(text) => {
            let Some(node) = b.node else { return };
            let font_size = ctx.style.font_size(ctx.tree, node);
            let color = ctx.style.color(ctx.tree, node, "color", Color::BLACK);
            let bold = ctx
                .style
                .keyword(ctx.tree, node, "font-weight")
                .is_some_and(|w| w == "bold" || w.parse::<u32>().is_ok_and(|n| n >= 700));
            let italic = ctx.style.keyword(ctx.tree, node, "font-style").as_deref() == Some("italic");
            gfx.set_color(color);
            // [§4.6] "Draw at (x, y + fontSize) (baseline-approximate)."
            gfx.draw_text(text, b.x, b.y + dy + font_size, font_size, bold, italic);
            paint_text_decoration(ctx, node, text, b, dy, font_size, color, gfx);
        }
        BoxContent::Image { src } => {
            gfx.draw_image(src, b.x, b.y + dy, b.width, b.height);
        }
        _ => {}
    }
}

fn paint_text_decoration(
    ctx: &PaintContext<'_>,
    node: NodeId,
    text: &str,
    b: &LayoutBox,
    dy: f32,
    font_size: f32,
    color: Color,
    gfx: &mut dyn GraphicsContext,
) {
    let Some(decoration) = ctx.style.keyword(ctx.tree, node, "text-decoration") else {
        return;
    };
    let bold = ctx
        .style
        .keyword(ctx.tree, node, "font-weight")
        .is_some_and(|w| w == "bold" || w.parse::<u32>().is_ok_and(|n| n >= 700));
    let (width, ascent) = ctx.text_measure.measure(text, font_size, bold);
    let y = match decoration.as_str() {
        "underline" => b.y + dy + ascent + font_size * 0.1,
        "overline" => b.y + dy,
        "line-through" => b.y + dy + ascent * 0.6,
        _ => return,
    };
    gfx.set_color(color);
    gfx.draw_line(b.x, y, b.x + width, y, 1.0);
}

fn paint_background_and_border(ctx: &PaintContext<'_>, b: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    let Some(node) = b.node else { return };
    let dy = scroll_dy(ctx, b);

    let (px, py, pw, ph) = b.padding_box();
    let (bx, by, bw, bh) = b.border_box();
    let (by, bx) = (by + dy, bx);
    let (py, px) = (py + dy, px);

    let radius = border_radius(ctx, node);

    for shadow in parse_box_shadows(ctx.style.get(ctx.tree, node, "box-shadow")).iter().rev() {
        if !shadow.inset {
            paint_box_shadow(shadow, bx, by, bw, bh, radius, gfx);
        }
    }

    if let Some(color) = ctx.style.get(ctx.tree, node, "background-color").and_then(Color::parse) {
        if color.a > 0.0 {
            gfx.set_color(color);
            gfx.fill_rect(bx, by, bw, bh, radius);
        }
    }
    paint_background_image(ctx, node, bx, by, bw, bh, gfx);

    paint_borders(ctx, node, px, py, pw, ph, radius, gfx);
}

fn border_radius(ctx: &PaintContext<'_>, node: NodeId) -> f32 {
    ctx.style.length(ctx.tree, node, "border-radius", 0.0).unwrap_or(0.0)
}

fn paint_borders(ctx: &PaintContext<'_>, node: NodeId, px: f32, py: f32, pw: f32, ph: f32, radius: f32, gfx: &mut dyn GraphicsContext) {
    let side_width = |side: &str| ctx.style.length(ctx.tree, node, &format!("border-{side}-width"), 0.0).unwrap_or(0.0);
    let side_suppressed = |side: &str| ctx.style.keyword(ctx.tree, node, &format!("border-{side}-style")).as_deref() == Some("none");
    let inherited_color = ctx.style.color(ctx.tree, node, "color", Color::BLACK);
    let side_color =
        |side: &str| ctx.style.get(ctx.tree, node, &format!("border-{side}-color")).and_then(Color::parse).unwrap_or(inherited_color);

    let edges = Edges {
        top: if side_suppressed("top") { 0.0 } else { side_width("top") },
        right: if side_suppressed("right") { 0.0 } else { side_width("right") },
        bottom: if side_suppressed("bottom") { 0.0 } else { side_width("bottom") },
        left: if side_suppressed("left") { 0.0 } else { side_width("left") },
    };

    // Uniform rounded border: a single stroked rounded rectangle centered
    // on the border band.
    if radius > 0.0 && edges.top == edges.right && edges.top == edges.bottom && edges.top == edges.left && edges.top > 0.0 {
        gfx.set_color(side_color("top"));
        gfx.stroke_rect(px - edges.left / 2.0, py - edges.top / 2.0, pw + edges.horizontal(), ph + edges.vertical(), edges.top, radius);
        return;
    }

    // [§4.6] "Borders render as mitered trapezoids ... so that differing
    // widths/colors meet correctly." The underlying graphics primitives
    // here are axis-aligned rect fills only, so this approximates the true
    // diagonal miter with the classic per-side rectangle technique (top and
    // bottom borders span the full width including corners; left and right
    // fill the gap between them), which still meets correctly for the
    // common rectangular case.
    if edges.top > 0.0 {
        gfx.set_color(side_color("top"));
        gfx.fill_rect(px - edges.left, py - edges.top, pw + edges.horizontal(), edges.top, 0.0);
    }
    if edges.bottom > 0.0 {
        gfx.set_color(side_color("bottom"));
        gfx.fill_rect(px - edges.left, py + ph, pw + edges.horizontal(), edges.bottom, 0.0);
    }
    if edges.left > 0.0 {
        gfx.set_color(side_color("left"));
        gfx.fill_rect(px - edges.left, py, edges.left, ph, 0.0);
    }
    if edges.right > 0.0 {
        gfx.set_color(side_color("right"));
        gfx.fill_rect(px + pw, py, edges.right, ph, 0.0);
    }
}

fn paint_background_image(ctx: &PaintContext<'_>, node: NodeId, bx: f32, by: f32, bw: f32, bh: f32, gfx: &mut dyn GraphicsContext) {
    let Some(raw) = ctx.style.get(ctx.tree, node, "background-image") else {
        return;
    };
    let Some(src) = raw.strip_prefix("url(").and_then(|s| s.strip_suffix(')')) else {
        return;
    };
    let src = src.trim_matches(['"', '\'']);

    // Natural tile size: the element's own box if no intrinsic size is
    // known to the painter (image decoding happens in layout's image_size
    // module, not here); callers wanting intrinsic-sized tiling pre-declare
    // `background-size` via CSS, which this engine does not yet parse.
    let tile_w = ctx.style.length(ctx.tree, node, "background-size", bw).unwrap_or(bw).min(bw).max(1.0);
    let tile_h = ctx.style.length(ctx.tree, node, "background-size", bh).unwrap_or(bh).min(bh).max(1.0);

    let repeat = ctx.style.keyword(ctx.tree, node, "background-repeat").unwrap_or_else(|| "repeat".to_string());
    let (pos_x, pos_y) = parse_background_position(ctx.style.get(ctx.tree, node, "background-position"), bw - tile_w, bh - tile_h);
    let fixed = ctx.style.keyword(ctx.tree, node, "background-attachment").as_deref() == Some("fixed");

    gfx.push_state();
    gfx.clip_rect(bx, by, bw, bh);

    let origin_x = if fixed { pos_x } else { bx + pos_x };
    let origin_y = if fixed { pos_y } else { by + pos_y };

    let (repeat_x, repeat_y) = match repeat.as_str() {
        "no-repeat" => (false, false),
        "repeat-x" => (true, false),
        "repeat-y" => (false, true),
        _ => (true, true),
    };

    let mut y = origin_y;
    if !repeat_y {
        draw_background_row(gfx, src, origin_x, y, tile_w, tile_h, bx, bw, repeat_x);
    } else {
        while y > by - tile_h {
            y -= tile_h;
        }
        while y < by + bh {
            draw_background_row(gfx, src, origin_x, y, tile_w, tile_h, bx, bw, repeat_x);
            y += tile_h;
        }
    }
    gfx.pop_state();
}

#[allow(clippy::too_many_arguments)]
fn draw_background_row(gfx: &mut dyn GraphicsContext, src: &str, origin_x: f32, y: f32, tile_w: f32, tile_h: f32, bx: f32, bw: f32, repeat_x: bool) {
    if !repeat_x {
        gfx.draw_image(src, origin_x, y, tile_w, tile_h);
        return;
    }
    let mut x = origin_x;
    while x > bx - tile_w {
        x -= tile_w;
    }
    while x < bx + bw {
        gfx.draw_image(src, x, y, tile_w, tile_h);
        x += tile_w;
    }
}

fn parse_background_position(raw: Option<&str>, slack_x: f32, slack_y: f32) -> (f32, f32) {
    let raw = raw.unwrap_or("0% 0%");
    let mut parts = raw.split_ascii_whitespace();
    let resolve = |token: Option<&str>, slack: f32| -> f32 {
        token
            .and_then(Length::parse)
            .map(|l| match l {
                Length::Percent(pct) => slack * pct / 100.0,
                other => other.resolve_absolute(0.0),
            })
            .unwrap_or(0.0)
    };
    (resolve(parts.next(), slack_x), resolve(parts.next(), slack_y))
}

/// One `box-shadow` layer. [§4.6] "Each shadow produces an outset rectangle
/// offset by `(offsetX, offsetY)`, expanded by `spread` ... Inset shadows
/// are ignored."
struct BoxShadow {
    offset_x: f32,
    offset_y: f32,
    blur: f32,
    spread: f32,
    color: Color,
    inset: bool,
}

fn parse_box_shadows(raw: Option<&str>) -> Vec<BoxShadow> {
    let Some(raw) = raw else { return Vec::new() };
    raw.split(',').filter_map(parse_one_shadow).collect()
}

fn parse_one_shadow(text: &str) -> Option<BoxShadow> {
    let mut inset = false;
    let mut numbers = Vec::new();
    let mut color = Color::BLACK;
    for token in text.split_ascii_whitespace() {
        if token.eq_ignore_ascii_case("inset") {
            inset = true;
        } else if let Some(c) = Color::parse(token) {
            color = c;
        } else if let Some(n) = Length::parse(token) {
            numbers.push(n.resolve_absolute(0.0));
        }
    }
    if numbers.len() < 2 {
        return None;
    }
    Some(BoxShadow {
        offset_x: numbers[0],
        offset_y: numbers[1],
        blur: numbers.get(2).copied().unwrap_or(0.0),
        spread: numbers.get(3).copied().unwrap_or(0.0),
        color,
        inset,
    })
}

fn paint_box_shadow(shadow: &BoxShadow, bx: f32, by: f32, bw: f32, bh: f32, radius: f32, gfx: &mut dyn GraphicsContext) {
    let x = bx + shadow.offset_x - shadow.spread;
    let y = by + shadow.offset_y - shadow.spread;
    let w = bw + shadow.spread * 2.0;
    let h = bh + shadow.spread * 2.0;

    // [§4.6] "Blur is approximated by drawing concentric rectangles of
    // decreasing alpha; the number of layers is clamp(blur/2, 3, 10)."
    let layers = (shadow.blur / 2.0).clamp(3.0, 10.0) as u32;
    for i in 0..layers {
        let t = i as f32 / layers as f32;
        let expand = shadow.blur * (1.0 - t);
        let alpha = shadow.color.a * (1.0 - t) / layers as f32;
        gfx.set_color(Color {
            a: alpha,
            ..shadow.color
        });
        gfx.fill_rect(x - expand, y - expand, w + expand * 2.0, h + expand * 2.0, radius + expand);
    }
}

/// One `transform` function, applied in declared order.
enum TransformOp {
    Translate(f32, f32),
    Rotate(f32),
    Scale(f32, f32),
}

fn parse_transforms(raw: &str) -> Vec<TransformOp> {
    let mut ops = Vec::new();
    let mut rest = raw.trim();
    while let Some(open) = rest.find('(') {
        let name = rest[..open].trim();
        let Some(close) = rest[open..].find(')') else { break };
        let args = &rest[open + 1..open + close];
        let nums: Vec<f32> = args.split(',').filter_map(|a| parse_transform_arg(a.trim())).collect();
        match name {
            "translate" => ops.push(TransformOp::Translate(nums.first().copied().unwrap_or(0.0), nums.get(1).copied().unwrap_or(0.0))),
            "translatex" => ops.push(TransformOp::Translate(nums.first().copied().unwrap_or(0.0), 0.0)),
            "translatey" => ops.push(TransformOp::Translate(0.0, nums.first().copied().unwrap_or(0.0))),
            "rotate" => ops.push(TransformOp::Rotate(nums.first().copied().unwrap_or(0.0))),
            "scale" => {
                let sx = nums.first().copied().unwrap_or(1.0);
                ops.push(TransformOp::Scale(sx, nums.get(1).copied().unwrap_or(sx)));
            }
            _ => {}
        }
        rest = &rest[open + close + 1..];
    }
    ops
}

fn parse_transform_arg(token: &str) -> Option<f32> {
    if let Some(deg) = token.strip_suffix("deg") {
        return deg.trim().parse::<f32>().ok().map(|d| d.to_radians());
    }
    if let Some(rad) = token.strip_suffix("rad") {
        return rad.trim().parse::<f32>().ok();
    }
    Length::parse(token).map(|l| l.resolve_absolute(0.0))
}

/// Resolve one `transform-origin` component (a length or percentage of
/// `dimension`), defaulting to `dimension / 2.0` (the "50%" default).
fn origin_component(token: Option<&str>, dimension: f32) -> f32 {
    token.and_then(Length::parse).map_or(dimension / 2.0, |l| l.resolve(dimension, 0.0))
}

fn apply_transform(ctx: &PaintContext<'_>, b: &LayoutBox, gfx: &mut dyn GraphicsContext) {
    let Some(node) = b.node else { return };
    let (px, py, pw, ph) = b.padding_box();
    let raw_origin = ctx.style.get(ctx.tree, node, "transform-origin").unwrap_or_default();
    let mut parts = raw_origin.split_ascii_whitespace();
    let origin_x = px + origin_component(parts.next(), pw);
    let origin_y = py + origin_component(parts.next(), ph);

    gfx.translate(origin_x, origin_y);
    for op in parse_transforms(ctx.style.get(ctx.tree, node, "transform").unwrap_or("")) {
        match op {
            TransformOp::Translate(dx, dy) => gfx.translate(dx, dy),
            TransformOp::Rotate(rad) => gfx.rotate(rad),
            TransformOp::Scale(sx, sy) => gfx.scale(sx, sy),
        }
    }
    gfx.translate(-origin_x, -origin_y);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::text::ApproximateTextMeasure;
    use crate::stylesheet::Stylesheet;

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
        fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, _line_width: f32, _radius: f32) {
            self.calls.push(format!("stroke_rect {x} {y} {width} {height}"));
        }
        fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, _width: f32) {
            self.calls.push(format!("draw_line {x1} {y1} {x2} {y2}"));
        }
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
        fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
            self.calls.push(format!("clip_rect {x} {y} {width} {height}"));
        }
        fn translate(&mut self, dx: f32, dy: f32) {
            self.calls.push(format!("translate {dx} {dy}"));
        }
        fn scale(&mut self, sx: f32, sy: f32) {
            self.calls.push(format!("scale {sx} {sy}"));
        }
        fn rotate(&mut self, radians: f32) {
            self.calls.push(format!("rotate {radians}"));
        }
    }

    fn leaf_text(node: NodeId, text: &str, x: f32, y: f32) -> LayoutBox {
        let mut b = LayoutBox::anonymous(BoxContent::Text(text.to_string()));
        b.node = Some(node);
        b.x = x;
        b.y = y;
        b
    }

    #[test]
    fn background_color_paints_before_border() {
        let mut tree = DomTree::new();
        let root = tree.root();
        tree.set_attribute(root, "style", "background-color: red; border-top-width: 2px; border-top-color: blue");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let measure = ApproximateTextMeasure;
        let ctx = PaintContext {
            tree: &tree,
            style: &style,
            text_measure: &measure,
            scroll_y: 0.0,
        };
        let mut b = LayoutBox::anonymous(BoxContent::Element);
        b.node = Some(root);
        b.width = 100.0;
        b.height = 50.0;
        b.border.top = 2.0;
        let mut gfx = RecordingContext::default();
        paint_background_and_border(&ctx, &b, &mut gfx);
        let bg_idx = gfx.calls.iter().position(|c| c.starts_with("fill_rect")).unwrap();
        let border_idx = gfx.calls.iter().rposition(|c| c.starts_with("fill_rect")).unwrap();
        assert!(bg_idx < border_idx);
    }

    #[test]
    fn non_fixed_box_paints_at_scrolled_position() {
        let tree = DomTree::new();
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, tree.root());
        let measure = ApproximateTextMeasure;
        let ctx = PaintContext {
            tree: &tree,
            style: &style,
            text_measure: &measure,
            scroll_y: 40.0,
        };
        let b = leaf_text(tree.root(), "hi", 10.0, 100.0);
        let mut gfx = RecordingContext::default();
        paint_content_leaf(&ctx, &b, &mut gfx);
        assert!(gfx.calls.iter().any(|c| c.contains("draw_text hi 10 ") && !c.contains(" 100 ")));
    }

    #[test]
    fn fixed_box_ignores_scroll() {
        let mut tree = DomTree::new();
        let root = tree.root();
        tree.set_attribute(root, "style", "position: fixed");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let measure = ApproximateTextMeasure;
        let ctx = PaintContext {
            tree: &tree,
            style: &style,
            text_measure: &measure,
            scroll_y: 40.0,
        };
        let mut b = leaf_text(root, "hi", 10.0, 100.0);
        b.position = Position::Fixed;
        let mut gfx = RecordingContext::default();
        paint_content_leaf(&ctx, &b, &mut gfx);
        assert!(gfx.calls.iter().any(|c| c == "draw_text hi 10 116"));
    }

    #[test]
    fn inset_shadows_are_skipped() {
        let shadows = parse_box_shadows(Some("2px 2px 4px red, inset 1px 1px 0px blue"));
        assert_eq!(shadows.len(), 2);
        assert!(!shadows[0].inset);
        assert!(shadows[1].inset);
    }

    #[test]
    fn transform_parses_translate_and_rotate_in_order() {
        let ops = parse_transforms("translate(10px, 5px) rotate(90deg)");
        assert_eq!(ops.len(), 2);
        assert!(matches!(ops[0], TransformOp::Translate(x, y) if (x - 10.0).abs() < 0.01 && (y - 5.0).abs() < 0.01));
        assert!(matches!(ops[1], TransformOp::Rotate(r) if (r - std::f32::consts::FRAC_PI_2).abs() < 0.01));
    }

    #[test]
    fn negative_z_index_paints_before_positive() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let back = tree.create_element(root, "div");
        tree.set_attribute(back, "style", "position: relative; z-index: -1; background-color: red");
        let front = tree.create_element(root, "div");
        tree.set_attribute(front, "style", "position: relative; z-index: 1; background-color: blue");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        let measure = ApproximateTextMeasure;
        let ctx = PaintContext {
            tree: &tree,
            style: &style,
            text_measure: &measure,
            scroll_y: 0.0,
        };

        let mut root_box = LayoutBox::anonymous(BoxContent::Element);
        root_box.node = Some(root);
        let mut back_box = LayoutBox::anonymous(BoxContent::Element);
        back_box.node = Some(back);
        back_box.position = Position::Relative;
        back_box.z_index = Some(-1);
        back_box.creates_stacking_context = true;
        back_box.width = 10.0;
        back_box.height = 10.0;
        let mut front_box = LayoutBox::anonymous(BoxContent::Element);
        front_box.node = Some(front);
        front_box.position = Position::Relative;
        front_box.z_index = Some(1);
        front_box.creates_stacking_context = true;
        front_box.width = 10.0;
        front_box.height = 10.0;
        root_box.children = vec![back_box, front_box];

        let mut gfx = RecordingContext::default();
        paint_document(&ctx, &root_box, &mut gfx);
        let colors: Vec<&String> = gfx.calls.iter().filter(|c| c.starts_with("set_color")).collect();
        assert_eq!(colors, vec!["set_color 255 0 0", "set_color 0 0 255"]);
    }
}
