//! Document loading and rendering pipeline for the wisp engine.
//!
//! Ties together [`wisp_html`] (parse), [`wisp_css`] (style/layout/paint),
//! and [`wisp_js`] (scripting) into the one entry point a CLI needs:
//! [`pipeline::render`] takes a [`pipeline::Source`] and viewport size and
//! returns a finished PNG.
//!
//! [§4 Component design] "Pipeline: ... parser and tree operations feed the
//! CSS model and style resolution; layout turns the styled tree into boxes;
//! the painter drives a graphics context over the box tree; the DOM
//! scripting bridge runs between an initial and a final layout+paint pass."

pub mod font;
pub mod pipeline;
pub mod raster;

pub use pipeline::{Source, render};
