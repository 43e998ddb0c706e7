//! Common utilities for the wisp browser engine.
//!
//! This crate provides shared infrastructure used by all pipeline components:
//! - **Error taxonomy** - the top-level error enum propagated out of the
//!   pipeline's parse/fetch/render stages.
//! - **Fetch capability** - the `Fetcher` trait that the HTML parser and
//!   layout engine use to resolve stylesheets and images, plus a blocking
//!   `reqwest` implementation for network mode.
//! - **URL resolution** - resolving relative `href`/`src` values against a
//!   base URL.
//! - **Image cache** - a process-wide, lock-protected cache from URI to
//!   decoded image.
//! - **Warning system** - deduplicated, colored terminal diagnostics for
//!   unsupported features and resource failures.

pub mod cache;
pub mod error;
pub mod fetch;
pub mod url;
pub mod warning;

pub use cache::{ImageCache, LoadedImage};
pub use error::Error;
pub use fetch::{ContentKind, FetchError, FetchedResource, Fetcher, FileFetcher, HttpFetcher, NullFetcher};
