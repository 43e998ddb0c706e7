//! Painting: converting a laid-out box tree into drawing commands against a
//! 2D graphics context.
//!
//! [§4.6 Painter] "Produces pixels by driving a 2D graphics context that
//! supports: set color, draw/stroke rectangle (with optional border
//! radius), draw line, draw text at baseline, draw image (with affine
//! transform), push/pop state, clip to current path, translate/scale/rotate."
//!
//! This module only depends on the [`GraphicsContext`] trait; a concrete
//! rasterizer (`wisp-browser`'s `image`/`fontdue`-backed one) sits below it,
//! the same way the layout engine depends on `TextMeasure` without embedding
//! a font backend.

pub mod painter;

pub use painter::{PaintContext, paint_document};

use crate::color::Color;

/// A 2D immediate-mode graphics context the painter drives.
///
/// Implementations own a coordinate-transform and clip stack; `push_state`/
/// `pop_state` save and restore it (along with the current color), matching
/// the "push/pop state" capability [§4.6] requires for transform and clip
/// scoping.
pub trait GraphicsContext {
    /// Set the color used by subsequent fill/stroke/text/line operations.
    fn set_color(&mut self, color: Color);

    /// Fill a rectangle at `(x, y)` sized `(width, height)` in the current
    /// transform space. `radius` rounds all four corners; `0.0` is a plain
    /// rectangle.
    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32);

    /// Stroke a rectangle's outline `line_width` wide, `radius`-rounded.
    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, radius: f32);

    /// Draw a line segment `width` pixels wide.
    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32);

    /// Draw `text` with its baseline at `(x, y)`.
    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, bold: bool, italic: bool);

    /// Draw the image at `src` into the rectangle `(x, y, width, height)`.
    /// Affine placement (rotation, scale) is achieved by the caller wrapping
    /// this call in `translate`/`rotate`/`scale` within a `push_state`/
    /// `pop_state` pair.
    fn draw_image(&mut self, src: &str, x: f32, y: f32, width: f32, height: f32);

    /// Save the current transform, clip, and color.
    fn push_state(&mut self);

    /// Restore the transform, clip, and color saved by the matching
    /// `push_state`.
    fn pop_state(&mut self);

    /// Intersect the current clip region with `(x, y, width, height)`.
    fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32);

    /// Translate the coordinate space.
    fn translate(&mut self, dx: f32, dy: f32);

    /// Scale the coordinate space.
    fn scale(&mut self, sx: f32, sy: f32);

    /// Rotate the coordinate space by `radians`.
    fn rotate(&mut self, radians: f32);
}
