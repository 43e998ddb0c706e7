//! The layout output tree.
//!
//! [§3 Data model] "Box. A layout output node carrying: position (x, y in
//! viewport pixels), content size (width, height), padding/border/margin
//! edge widths ..., the source element's computed style (by reference), a
//! list of child boxes, and optional attributes for image source path and
//! resolved z-index/position enums."

use wisp_dom::NodeId;

use super::box_model::Edges;
use crate::cascade::Position;

/// What kind of content a box carries. Element-generated boxes carry a
/// [`NodeId`]; anonymous boxes (inline wrappers, block splits, line boxes,
/// and the text runs inside them) do not.
#[derive(Debug, Clone, PartialEq)]
pub enum BoxContent {
    /// A box generated by an element (block, inline, or inline-block).
    Element,
    /// An anonymous block wrapping inline content split around a nested
    /// block, or the top-level inline-formatting-context wrapper.
    AnonymousBlock,
    /// One line of an inline formatting context.
    LineBox,
    /// A run of text within a line box.
    Text(String),
    /// An `<img>` element's replaced content.
    Image {
        /// The (already URL-resolved) image source.
        src: String,
    },
}

/// A positioned, sized node in the layout tree.
#[derive(Debug, Clone)]
pub struct LayoutBox {
    /// The source element, if this box was generated by one.
    pub node: Option<NodeId>,
    /// What this box contains.
    pub content: BoxContent,
    /// Content-box X in viewport pixels (post block/inline/float/positioned
    /// layout, pre-scroll-adjustment; the painter applies scroll).
    pub x: f32,
    /// Content-box Y in viewport pixels.
    pub y: f32,
    /// Content-box width.
    pub width: f32,
    /// Content-box height.
    pub height: f32,
    /// Padding edge widths.
    pub padding: Edges,
    /// Border edge widths.
    pub border: Edges,
    /// Margin edge widths.
    pub margin: Edges,
    /// Child boxes, in paint/document order.
    pub children: Vec<LayoutBox>,
    /// Resolved `position` enum.
    pub position: Position,
    /// Resolved `z-index`, `None` for the `auto` sentinel.
    pub z_index: Option<i32>,
    /// Whether this box establishes a new stacking context.
    pub creates_stacking_context: bool,
    /// Whether this box is a float (`float: left|right`), painted as its
    /// own atomic paint-order subtree.
    pub is_float: bool,
}

impl LayoutBox {
    /// A zero-sized anonymous box of `content`, everything else default.
    #[must_use]
    pub fn anonymous(content: BoxContent) -> Self {
        Self {
            node: None,
            content,
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            padding: Edges::default(),
            border: Edges::default(),
            margin: Edges::default(),
            children: Vec::new(),
            position: Position::Static,
            z_index: None,
            creates_stacking_context: false,
            is_float: false,
        }
    }

    /// The padding-box rectangle (content plus padding), `(x, y, w, h)`.
    #[must_use]
    pub const fn padding_box(&self) -> (f32, f32, f32, f32) {
        (
            self.x - self.padding.left,
            self.y - self.padding.top,
            self.width + self.padding.horizontal(),
            self.height + self.padding.vertical(),
        )
    }

    /// The border-box rectangle (content, padding, and border).
    #[must_use]
    pub const fn border_box(&self) -> (f32, f32, f32, f32) {
        let (px, py, pw, ph) = self.padding_box();
        (
            px - self.border.left,
            py - self.border.top,
            pw + self.border.horizontal(),
            ph + self.border.vertical(),
        )
    }

    /// The margin-box rectangle (the full box including margins).
    #[must_use]
    pub const fn margin_box(&self) -> (f32, f32, f32, f32) {
        let (bx, by, bw, bh) = self.border_box();
        (
            bx - self.margin.left,
            by - self.margin.top,
            bw + self.margin.horizontal(),
            bh + self.margin.vertical(),
        )
    }

    /// Outer height: content height plus padding, border, and margin.
    #[must_use]
    pub const fn outer_height(&self) -> f32 {
        self.height + self.padding.vertical() + self.border.vertical() + self.margin.vertical()
    }

    /// Outer width: content width plus padding, border, and margin.
    #[must_use]
    pub const fn outer_width(&self) -> f32 {
        self.width + self.padding.horizontal() + self.border.horizontal() + self.margin.horizontal()
    }
}
