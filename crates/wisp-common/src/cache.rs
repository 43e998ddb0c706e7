//! Decoded image data and the process-wide image cache.
//!
//! [§4.8 Image cache] "A process-wide mapping from URI (or filesystem path)
//! to a decoded image, populated lazily; reads are concurrent-safe... Cache
//! has no eviction policy; its scope is a single process run."
//!
//! [§5 Concurrency & resource model] "The image cache is the only
//! shared-resource surface that may be touched by concurrent documents; it
//! uses a read-mostly lock (reader locks on hit, writer lock on miss)."

use std::collections::HashMap;
use std::sync::{Arc, OnceLock, RwLock};

use crate::fetch::{ContentKind, FetchError, Fetcher, decode_data_uri};
use crate::warning::warn_once;

/// Decoded image data for a loaded image resource.
///
/// [§4.8.3 The img element] holds the decoded RGBA pixel data and intrinsic
/// dimensions used by both layout (intrinsic sizing) and the painter
/// (drawing).
#[derive(Clone)]
pub struct LoadedImage {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl LoadedImage {
    /// Create a new `LoadedImage` from decoded RGBA pixel data (`width *
    /// height * 4` bytes, row-major, no padding).
    #[must_use]
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba,
        }
    }

    /// Intrinsic width in pixels.
    #[must_use]
    pub const fn width(&self) -> u32 {
        self.width
    }

    /// Intrinsic height in pixels.
    #[must_use]
    pub const fn height(&self) -> u32 {
        self.height
    }

    /// Intrinsic dimensions as `(width, height)` in `f32`, for layout.
    #[must_use]
    pub fn dimensions_f32(&self) -> (f32, f32) {
        (self.width as f32, self.height as f32)
    }

    /// Raw RGBA pixel data.
    #[must_use]
    pub fn rgba(&self) -> &[u8] {
        &self.rgba
    }

    /// Sample the pixel at `(x, y)`, clamped to the image bounds.
    #[must_use]
    pub fn sample(&self, x: u32, y: u32) -> [u8; 4] {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        let idx = (y as usize * self.width as usize + x as usize) * 4;
        self.rgba
            .get(idx..idx + 4)
            .map_or([0, 0, 0, 0], |s| [s[0], s[1], s[2], s[3]])
    }
}

fn decode_raster(bytes: &[u8]) -> Result<LoadedImage, String> {
    let dynamic = image::load_from_memory(bytes).map_err(|e| format!("could not decode image ({e})"))?;
    let rgba = dynamic.to_rgba8();
    let (w, h) = rgba.dimensions();
    Ok(LoadedImage::new(w, h, rgba.into_raw()))
}

/// A process-wide cache from resolved URI to decoded image.
///
/// Uses a read-mostly lock: readers take a shared lock on a cache hit; a
/// miss upgrades to a fetch-and-decode under the same lock (this rewrite
/// accepts serializing misses, the same simplification the teacher's single
/// global `HashMap` makes — only the lock discipline is generalized to match
/// §5's "reader locks on hit, writer lock on miss" wording).
pub struct ImageCache {
    entries: RwLock<HashMap<String, Arc<LoadedImage>>>,
}

impl ImageCache {
    fn new() -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// The process-wide singleton cache.
    #[must_use]
    pub fn global() -> &'static Self {
        static CACHE: OnceLock<ImageCache> = OnceLock::new();
        CACHE.get_or_init(ImageCache::new)
    }

    /// Fetch, decode and cache the image at `uri`, using `fetcher` on a
    /// cache miss. Returns `None` (and logs a warning) on any failure, per
    /// [§7] "missing image becomes a placeholder".
    #[must_use]
    pub fn get_or_load(&self, uri: &str, fetcher: &dyn Fetcher) -> Option<Arc<LoadedImage>> {
        if let Some(hit) = self.entries.read().unwrap().get(uri) {
            return Some(Arc::clone(hit));
        }

        let bytes = if let Some(resource) = decode_data_uri(uri) {
            Ok(resource.bytes)
        } else {
            fetcher
                .fetch(uri, ContentKind::Image)
                .map(|r| r.bytes)
                .map_err(|e: FetchError| e.to_string())
        };

        let bytes = match bytes {
            Ok(bytes) => bytes,
            Err(err) => {
                warn_once("image", &format!("failed to fetch '{uri}': {err}"));
                return None;
            }
        };

        let image = match decode_raster(&bytes) {
            Ok(image) => Arc::new(image),
            Err(err) => {
                warn_once("image", &format!("failed to decode '{uri}': {err}"));
                return None;
            }
        };

        self.entries
            .write()
            .unwrap()
            .insert(uri.to_string(), Arc::clone(&image));
        Some(image)
    }
}

impl Default for ImageCache {
    fn default() -> Self {
        Self::new()
    }
}
