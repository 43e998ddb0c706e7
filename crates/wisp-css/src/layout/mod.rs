//! Block/inline layout: turning the style-resolved DOM into a tree of
//! positioned [`LayoutBox`]es.
//!
//! [§4.5 Layout engine] "Inputs: viewport `(W, H)` in pixels, the document,
//! and an optional image fetcher capability ... Produces a list of root
//! boxes (one per top-level element)." This engine's document always has a
//! single synthetic root element, so [`layout_document`] returns that one
//! root box rather than a list.

pub mod box_model;
pub mod float;
pub mod image_size;
pub mod inline;
pub mod layout_box;
pub mod text;

use wisp_common::Fetcher;
use wisp_dom::{DomTree, NodeId, NodeType};

use box_model::{resolve_border_edges, resolve_edges};
use float::FloatContext;
use inline::layout_inline_run;
use layout_box::{BoxContent, LayoutBox};
use text::TextMeasure;

use crate::cascade::{Clear, ComputedStyle, Display, Float, Position};

/// Bundles the read-only inputs every layout call needs, so the recursive
/// block/inline layout functions don't thread four parameters by hand.
pub struct LayoutContext<'a> {
    /// The document tree being laid out.
    pub tree: &'a DomTree,
    /// The resolved style for every element in the tree.
    pub style: &'a ComputedStyle,
    /// Glyph metrics capability used for inline line breaking.
    pub text_measure: &'a dyn TextMeasure,
    /// Resource-loading capability used for `<img>` intrinsic sizing.
    /// `None` disables fetching (declared dimensions and the HTML default
    /// replaced size are still honored).
    pub fetcher: Option<&'a dyn Fetcher>,
}

/// An axis-aligned rectangle in viewport pixels, used to resolve
/// `position: absolute|fixed` against a containing block.
#[derive(Debug, Clone, Copy)]
struct Rect {
    x: f32,
    y: f32,
    width: f32,
    height: f32,
}

impl Rect {
    const fn from_box(b: &LayoutBox) -> Self {
        let (x, y, width, height) = b.padding_box();
        Self { x, y, width, height }
    }
}

/// Lay out `root`'s subtree against a `viewport_width` x `viewport_height`
/// viewport, returning the single top-level box with every descendant
/// positioned in viewport coordinates (including the
/// `position: relative|absolute|fixed` fixup pass).
#[must_use]
pub fn layout_document(ctx: &LayoutContext<'_>, root: NodeId, viewport_width: f32, viewport_height: f32) -> LayoutBox {
    let mut root_box = layout_block_container(ctx, root, 0.0, 0.0, viewport_width);
    let viewport = Rect {
        x: 0.0,
        y: 0.0,
        width: viewport_width,
        height: viewport_height,
    };
    apply_positioning(ctx, &mut root_box, viewport, viewport);
    root_box
}

fn is_auto(ctx: &LayoutContext<'_>, node: NodeId, prop: &str) -> bool {
    ctx.style.get(ctx.tree, node, prop).is_some_and(|v| v.eq_ignore_ascii_case("auto"))
}

/// Lay out `node` (and its children) as a block container whose content box
/// sits at `(x, y)` and is `containing_width` wide, returning the fully
/// assembled box (natural-flow position; `position: relative|absolute|fixed`
/// offsets are applied afterward by [`apply_positioning`]).
fn layout_block_container(ctx: &LayoutContext<'_>, node: NodeId, x: f32, y: f32, containing_width: f32) -> LayoutBox {
    let (tree, style) = (ctx.tree, ctx.style);

    let mut margin = resolve_edges(style, tree, node, "margin", containing_width);
    let border = resolve_border_edges(style, tree, node);
    let padding = resolve_edges(style, tree, node, "padding", containing_width);

    let explicit_width = style.length(tree, node, "width", containing_width);
    let width = explicit_width.unwrap_or_else(|| (containing_width - margin.horizontal() - border.horizontal() - padding.horizontal()).max(0.0));

    if explicit_width.is_some() && is_auto(ctx, node, "margin-left") && is_auto(ctx, node, "margin-right") {
        let available = (containing_width - width - border.horizontal() - padding.horizontal()).max(0.0);
        margin.left = available / 2.0;
        margin.right = available / 2.0;
    }

    let content_x = x + margin.left + border.left + padding.left;
    let content_y = y + margin.top + border.top + padding.top;

    let (children, content_height) = layout_children(ctx, node, content_x, content_y, width);

    let height = style.length(tree, node, "height", 0.0).unwrap_or(content_height);

    LayoutBox {
        node: Some(node),
        content: BoxContent::Element,
        x: content_x,
        y: content_y,
        width,
        height,
        padding,
        border,
        margin,
        children,
        position: style.position(tree, node),
        z_index: style.z_index(tree, node),
        creates_stacking_context: style.creates_stacking_context(tree, node),
        is_float: style.float(tree, node) != Float::None,
    }
}

/// How one direct child of a block container participates in its parent's
/// layout.
enum ChildKind {
    /// Generates no box (`display: none`, a comment, or whitespace-only
    /// text between block-level siblings).
    Skip,
    /// Joins the pending inline run (text, or an inline-level element still
    /// in normal flow).
    Inline,
    /// Laid out as its own block-level box: a block/inline-block element,
    /// or any element floated or taken out of flow regardless of its
    /// `display`.
    Block,
}

fn classify_child(ctx: &LayoutContext<'_>, child: NodeId) -> ChildKind {
    match &ctx.tree.get(child).unwrap().node_type {
        NodeType::Text(text) => {
            if text.trim().is_empty() {
                ChildKind::Skip
            } else {
                ChildKind::Inline
            }
        }
        NodeType::Comment(_) => ChildKind::Skip,
        NodeType::Element(_) => {
            if ctx.style.display(ctx.tree, child) == Display::None {
                return ChildKind::Skip;
            }
            let position = ctx.style.position(ctx.tree, child);
            let floated = ctx.style.float(ctx.tree, child) != Float::None;
            if matches!(position, Position::Absolute | Position::Fixed) || floated {
                return ChildKind::Block;
            }
            match ctx.style.display(ctx.tree, child) {
                Display::Inline => ChildKind::Inline,
                Display::Block | Display::InlineBlock => ChildKind::Block,
                Display::None => ChildKind::Skip,
            }
        }
    }
}

/// Lay out all of `node`'s children: block-level children stack vertically;
/// runs of inline-level children are wrapped into an anonymous block of
/// line boxes ([§4.5] "block-in-inline splitting"). Returns the assembled
/// children (in document order, as required for stacking-context paint
/// order's "document order" tie-break) and the total content height used.
fn layout_children(ctx: &LayoutContext<'_>, node: NodeId, content_x: f32, content_y: f32, content_width: f32) -> (Vec<LayoutBox>, f32) {
    let mut boxes = Vec::new();
    let mut run: Vec<NodeId> = Vec::new();
    let mut cursor_y = content_y;
    let mut float_ctx = FloatContext::default();

    for &child in ctx.tree.children(node) {
        match classify_child(ctx, child) {
            ChildKind::Skip => {}
            ChildKind::Inline => run.push(child),
            ChildKind::Block => {
                if !run.is_empty() {
                    cursor_y = flush_inline_run(ctx, node, &run, content_x, cursor_y, content_width, &float_ctx, &mut boxes);
                    run.clear();
                }
                cursor_y = layout_block_level_child(ctx, child, content_x, cursor_y, content_width, &mut float_ctx, &mut boxes);
            }
        }
    }
    if !run.is_empty() {
        cursor_y = flush_inline_run(ctx, node, &run, content_x, cursor_y, content_width, &float_ctx, &mut boxes);
    }

    let float_bottom = float_ctx.clear_y(Clear::Both);
    let used_height = (cursor_y.max(content_y + float_bottom) - content_y).max(0.0);
    (boxes, used_height)
}

#[allow(clippy::too_many_arguments)]
fn flush_inline_run(
    ctx: &LayoutContext<'_>,
    node: NodeId,
    run: &[NodeId],
    content_x: f32,
    cursor_y: f32,
    content_width: f32,
    float_ctx: &FloatContext,
    boxes: &mut Vec<LayoutBox>,
) -> f32 {
    let left = float_ctx.left_offset_at(cursor_y);
    let right = float_ctx.right_offset_at(cursor_y);
    let effective_width = (content_width - left - right).max(0.0);

    let (lines, total_height) = layout_inline_run(
        ctx.tree,
        ctx.style,
        node,
        run,
        content_x + left,
        cursor_y,
        effective_width,
        ctx.text_measure,
        ctx.fetcher,
    );

    let mut wrapper = LayoutBox::anonymous(BoxContent::AnonymousBlock);
    wrapper.x = content_x + left;
    wrapper.y = cursor_y;
    wrapper.width = effective_width;
    wrapper.height = total_height;
    wrapper.children = lines;
    boxes.push(wrapper);

    cursor_y + total_height
}

/// A floated box's width is shrink-to-fit per CSS 2.1 §10.3.5; this engine
/// approximates that with a fixed fallback when no explicit width is
/// declared, rather than a full shrink-to-fit measurement pass.
const FLOAT_SHRINK_TO_FIT_FALLBACK: f32 = 200.0;

#[allow(clippy::too_many_arguments)]
fn layout_block_level_child(
    ctx: &LayoutContext<'_>,
    child: NodeId,
    content_x: f32,
    cursor_y: f32,
    content_width: f32,
    float_ctx: &mut FloatContext,
    boxes: &mut Vec<LayoutBox>,
) -> f32 {
    let position = ctx.style.position(ctx.tree, child);
    let float = ctx.style.float(ctx.tree, child);

    if matches!(position, Position::Absolute | Position::Fixed) {
        // Out of flow: laid out at the current flow cursor as its static
        // position, true geometry resolved later by `apply_positioning`.
        let child_box = layout_block_container(ctx, child, content_x, cursor_y, content_width);
        boxes.push(child_box);
        return cursor_y;
    }

    if float != Float::None {
        let clear = ctx.style.clear(ctx.tree, child);
        let cursor_y = if clear == Clear::None { cursor_y } else { cursor_y.max(float_ctx.clear_y(clear)) };
        let explicit_width = ctx.style.length(ctx.tree, child, "width", content_width);
        let float_width = explicit_width.unwrap_or_else(|| FLOAT_SHRINK_TO_FIT_FALLBACK.min(content_width));
        let left_offset = float_ctx.left_offset_at(cursor_y);
        let right_offset = float_ctx.right_offset_at(cursor_y);
        let x = match float {
            Float::Left => content_x + left_offset,
            _ => content_x + content_width - right_offset - float_width,
        };
        let child_box = layout_block_container(ctx, child, x, cursor_y, float_width);
        let outer_width = child_box.outer_width();
        let outer_height = child_box.outer_height();
        match float {
            Float::Left => float_ctx.add_left(cursor_y, cursor_y + outer_height, outer_width),
            _ => float_ctx.add_right(cursor_y, cursor_y + outer_height, outer_width),
        }
        boxes.push(child_box);
        return cursor_y;
    }

    let cursor_y = {
        let clear = ctx.style.clear(ctx.tree, child);
        if clear == Clear::None { cursor_y } else { cursor_y.max(float_ctx.clear_y(clear)) }
    };
    let left_offset = float_ctx.left_offset_at(cursor_y);
    let right_offset = float_ctx.right_offset_at(cursor_y);
    let effective_width = (content_width - left_offset - right_offset).max(0.0);
    let child_box = layout_block_container(ctx, child, content_x + left_offset, cursor_y, effective_width);
    let next_y = cursor_y + child_box.outer_height();
    boxes.push(child_box);
    next_y
}

/// Top-down positioning fixup pass. `viewport` never changes; `containing_block`
/// is the nearest positioned ancestor's padding box (or the viewport, for a
/// box with no positioned ancestor).
///
/// [§4.5] "`position: relative` offsets the box ... after normal-flow
/// layout ... `position: absolute` ... positions it relative to the nearest
/// positioned ancestor's padding edge; `position: fixed` positions relative
/// to the viewport ... if both `left` and `right` are specified with an
/// auto `width`, the width stretches to fill between them."
fn apply_positioning(ctx: &LayoutContext<'_>, b: &mut LayoutBox, viewport: Rect, containing_block: Rect) {
    if let Some(node) = b.node {
        match b.position {
            Position::Static => {}
            Position::Relative => apply_relative_offset(ctx, b, node, containing_block),
            Position::Absolute => apply_absolute_geometry(ctx, b, node, containing_block),
            Position::Fixed => apply_absolute_geometry(ctx, b, node, viewport),
        }
    }

    let child_containing_block = if matches!(b.position, Position::Static) { containing_block } else { Rect::from_box(b) };

    for child in &mut b.children {
        apply_positioning(ctx, child, viewport, child_containing_block);
    }
}

fn apply_relative_offset(ctx: &LayoutContext<'_>, b: &mut LayoutBox, node: NodeId, cb: Rect) {
    let left = ctx.style.length(ctx.tree, node, "left", cb.width);
    let right = ctx.style.length(ctx.tree, node, "right", cb.width);
    let top = ctx.style.length(ctx.tree, node, "top", cb.height);
    let bottom = ctx.style.length(ctx.tree, node, "bottom", cb.height);

    let dx = left.or(right.map(|r| -r)).unwrap_or(0.0);
    let dy = top.or(bottom.map(|bo| -bo)).unwrap_or(0.0);
    translate(b, dx, dy);
}

fn apply_absolute_geometry(ctx: &LayoutContext<'_>, b: &mut LayoutBox, node: NodeId, cb: Rect) {
    let left = ctx.style.length(ctx.tree, node, "left", cb.width);
    let right = ctx.style.length(ctx.tree, node, "right", cb.width);
    let top = ctx.style.length(ctx.tree, node, "top", cb.height);
    let bottom = ctx.style.length(ctx.tree, node, "bottom", cb.height);
    let width_auto = left.is_some() && right.is_some() && ctx.style.length(ctx.tree, node, "width", cb.width).is_none();
    let height_auto = top.is_some() && bottom.is_some() && ctx.style.length(ctx.tree, node, "height", cb.height).is_none();

    if width_auto {
        b.width = (cb.width - left.unwrap() - right.unwrap() - b.border.horizontal() - b.padding.horizontal()).max(0.0);
    }
    if height_auto {
        b.height = (cb.height - top.unwrap() - bottom.unwrap() - b.border.vertical() - b.padding.vertical()).max(0.0);
    }

    let new_x = match (left, right) {
        (Some(l), _) => cb.x + l,
        (None, Some(r)) => cb.x + cb.width - r - b.outer_width(),
        (None, None) => b.x,
    };
    let new_y = match (top, bottom) {
        (Some(t), _) => cb.y + t,
        (None, Some(bo)) => cb.y + cb.height - bo - b.outer_height(),
        (None, None) => b.y,
    };
    translate(b, new_x - b.x, new_y - b.y);
}

fn translate(b: &mut LayoutBox, dx: f32, dy: f32) {
    b.x += dx;
    b.y += dy;
    for child in &mut b.children {
        translate(child, dx, dy);
    }
}
