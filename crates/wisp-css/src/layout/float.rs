//! Tracks floats active within one block formatting context.
//!
//! [§4.5 Layout engine] "`float: left|right` removes the box from normal
//! flow and attaches it to the left or right edge of its containing block's
//! current line; following in-flow content flows around it until the
//! block's cursor clears the float."

use crate::cascade::Clear;

#[derive(Debug, Clone, Copy)]
struct ActiveFloat {
    y_top: f32,
    y_bottom: f32,
    /// Outer width occupied from the containing block's edge (left edge for
    /// a left float, right edge for a right float).
    outer_width: f32,
}

/// The left- and right-floated boxes active within one containing block,
/// used to narrow the available inline space at a given `y` and to resolve
/// `clear`.
#[derive(Debug, Clone, Default)]
pub struct FloatContext {
    left: Vec<ActiveFloat>,
    right: Vec<ActiveFloat>,
}

impl FloatContext {
    /// Register a left float occupying vertical span `[y_top, y_bottom)`
    /// and `outer_width` from the left edge.
    pub fn add_left(&mut self, y_top: f32, y_bottom: f32, outer_width: f32) {
        self.left.push(ActiveFloat { y_top, y_bottom, outer_width });
    }

    /// Register a right float occupying vertical span `[y_top, y_bottom)`
    /// and `outer_width` from the right edge.
    pub fn add_right(&mut self, y_top: f32, y_bottom: f32, outer_width: f32) {
        self.right.push(ActiveFloat { y_top, y_bottom, outer_width });
    }

    /// How much the left edge is intruded upon by active left floats at `y`.
    #[must_use]
    pub fn left_offset_at(&self, y: f32) -> f32 {
        self.left
            .iter()
            .filter(|f| f.y_top <= y && y < f.y_bottom)
            .map(|f| f.outer_width)
            .fold(0.0, f32::max)
    }

    /// How much the right edge is intruded upon by active right floats at
    /// `y`.
    #[must_use]
    pub fn right_offset_at(&self, y: f32) -> f32 {
        self.right
            .iter()
            .filter(|f| f.y_top <= y && y < f.y_bottom)
            .map(|f| f.outer_width)
            .fold(0.0, f32::max)
    }

    /// The Y below which no float of the sides named by `clear` remains
    /// active. Returns `0.0` for `Clear::None` (the caller ignores it then).
    #[must_use]
    pub fn clear_y(&self, clear: Clear) -> f32 {
        let left_bottom = || self.left.iter().map(|f| f.y_bottom).fold(0.0_f32, f32::max);
        let right_bottom = || self.right.iter().map(|f| f.y_bottom).fold(0.0_f32, f32::max);
        match clear {
            Clear::None => 0.0,
            Clear::Left => left_bottom(),
            Clear::Right => right_bottom(),
            Clear::Both => left_bottom().max(right_bottom()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn left_offset_only_applies_within_float_vertical_span() {
        let mut ctx = FloatContext::default();
        ctx.add_left(0.0, 100.0, 50.0);
        assert_eq!(ctx.left_offset_at(50.0), 50.0);
        assert_eq!(ctx.left_offset_at(150.0), 0.0);
    }

    #[test]
    fn clear_both_is_the_max_of_either_side() {
        let mut ctx = FloatContext::default();
        ctx.add_left(0.0, 40.0, 20.0);
        ctx.add_right(0.0, 90.0, 30.0);
        assert_eq!(ctx.clear_y(Clear::Left), 40.0);
        assert_eq!(ctx.clear_y(Clear::Right), 90.0);
        assert_eq!(ctx.clear_y(Clear::Both), 90.0);
    }
}
