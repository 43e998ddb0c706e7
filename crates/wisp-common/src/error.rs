//! The pipeline-wide error taxonomy.
//!
//! [§7 Error handling design] distinguishes parse errors, resource errors,
//! script errors, and render-target errors. Resource and script errors are
//! recoverable (logged via [`crate::warning`] and the pipeline proceeds);
//! parse errors and render-target errors are the only variants that ever
//! propagate out of [`wisp_browser`](../wisp_browser/index.html) as a
//! top-level failure, per the invariant that the pipeline "always produces
//! either a complete rendered image or a top-level error".

use thiserror::Error;

/// Top-level error returned by the rendering pipeline.
#[derive(Debug, Error)]
pub enum Error {
    /// The HTML source could not be tokenized or parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// Writing the rasterized image to its byte sink failed.
    #[error("render target error: {0}")]
    RenderTarget(String),

    /// Reading the input document failed (local file or network fetch).
    #[error("failed to read input: {0}")]
    Input(String),
}
