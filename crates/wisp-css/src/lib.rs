//! CSS model, style resolution, layout, and painting: everything downstream
//! of a parsed DOM tree ([§4.3]-[§4.6]).
//!
//! Pipeline: [`stylesheet::parse_stylesheet`] and the inline `style`
//! attribute feed [`cascade::ComputedStyle::resolve`]; [`layout::layout_document`]
//! turns the styled tree into a [`layout::layout_box::LayoutBox`] tree;
//! [`paint::paint_document`] drives a [`paint::GraphicsContext`] over it.

pub mod cascade;
pub mod color;
pub mod declarations;
pub mod layout;
pub mod length;
pub mod paint;
pub mod selector;
pub mod stylesheet;

pub use cascade::{Clear, ComputedStyle, Display, Float, Position};
pub use color::Color;
pub use declarations::{Declarations, parse_declarations, serialize_declarations};
pub use layout::image_size::resolve_with_fetcher as resolve_image_size;
pub use layout::layout_box::{BoxContent, LayoutBox};
pub use layout::text::{ApproximateTextMeasure, TextMeasure};
pub use layout::{LayoutContext, layout_document};
pub use length::Length;
pub use paint::{GraphicsContext, PaintContext, paint_document};
pub use selector::{Selector, SelectorGroup, matches_selector};
pub use stylesheet::{Rule, Stylesheet, parse_stylesheet};
