//! The default [`GraphicsContext`]: rasterizes onto an RGBA pixel buffer
//! using `fontdue` for glyphs and the `image` crate for decoding.
//!
//! [§4.6 Painter] "push/pop state, clip to current path,
//! translate/scale/rotate." This context keeps an affine transform and a
//! clip-rectangle stack; `fill_rect`/`stroke_rect`/`draw_image` rasterize by
//! inverse-mapping each destination pixel back into the shape's local
//! space, so rotation and non-uniform scale apply correctly. Text baselines
//! are translated by the transform but glyphs themselves are drawn
//! axis-aligned: rotated text is a simplification this renderer accepts.

use image::RgbaImage;
use wisp_common::Fetcher;
use wisp_common::cache::ImageCache;
use wisp_css::{Color, GraphicsContext};

use crate::font::FontSet;

#[derive(Clone, Copy, Debug)]
struct Matrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Matrix {
    const IDENTITY: Self = Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: 0.0, f: 0.0 };

    /// Compose `self ∘ other`: map a point through `other` first, then
    /// through `self` (matches the canvas convention where `translate`
    /// after an existing transform moves the *local* origin).
    fn compose(&self, other: &Self) -> Self {
        Self {
            a: self.a * other.a + self.c * other.b,
            b: self.b * other.a + self.d * other.b,
            c: self.a * other.c + self.c * other.d,
            d: self.b * other.c + self.d * other.d,
            e: self.a * other.e + self.c * other.f + self.e,
            f: self.b * other.e + self.d * other.f + self.f,
        }
    }

    const fn translation(dx: f32, dy: f32) -> Self {
        Self { a: 1.0, b: 0.0, c: 0.0, d: 1.0, e: dx, f: dy }
    }

    const fn scaling(sx: f32, sy: f32) -> Self {
        Self { a: sx, b: 0.0, c: 0.0, d: sy, e: 0.0, f: 0.0 }
    }

    fn rotation(radians: f32) -> Self {
        let (sin, cos) = radians.sin_cos();
        Self { a: cos, b: sin, c: -sin, d: cos, e: 0.0, f: 0.0 }
    }

    fn apply(&self, x: f32, y: f32) -> (f32, f32) {
        (self.a * x + self.c * y + self.e, self.b * x + self.d * y + self.f)
    }

    fn invert(&self) -> Option<Self> {
        let det = self.a * self.d - self.b * self.c;
        if det.abs() < 1e-6 {
            return None;
        }
        let inv_det = 1.0 / det;
        let a = self.d * inv_det;
        let b = -self.b * inv_det;
        let c = -self.c * inv_det;
        let d = self.a * inv_det;
        let e = -(a * self.e + c * self.f);
        let f = -(b * self.e + d * self.f);
        Some(Self { a, b, c, d, e, f })
    }

    /// `sqrt(|det|)`, used as a uniform scale estimate for glyph size under
    /// a non-identity transform.
    fn scale_factor(&self) -> f32 {
        (self.a * self.d - self.b * self.c).abs().sqrt()
    }
}

#[derive(Clone, Copy)]
struct ClipRect {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl ClipRect {
    const fn full(width: u32, height: u32) -> Self {
        Self { x0: 0.0, y0: 0.0, x1: width as f32, y1: height as f32 }
    }

    fn intersect(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.max(other.x0),
            y0: self.y0.max(other.y0),
            x1: self.x1.min(other.x1),
            y1: self.y1.min(other.y1),
        }
    }

    fn contains(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x < self.x1 && y >= self.y0 && y < self.y1
    }
}

#[derive(Clone, Copy)]
struct State {
    transform: Matrix,
    clip: ClipRect,
    color: Color,
}

/// Renders a laid-out document to an RGBA pixel buffer.
///
/// Owns the font set used for both measurement and drawing, and the
/// fetcher/cache used to resolve `<img>` and `background-image` sources
/// encountered during paint.
pub struct RasterGraphicsContext<'a> {
    buffer: RgbaImage,
    fonts: &'a FontSet,
    fetcher: &'a dyn Fetcher,
    stack: Vec<State>,
}

impl<'a> RasterGraphicsContext<'a> {
    /// A `width x height` buffer filled white, the initial transform the
    /// identity and the initial clip the whole buffer.
    #[must_use]
    pub fn new(width: u32, height: u32, fonts: &'a FontSet, fetcher: &'a dyn Fetcher) -> Self {
        let buffer = RgbaImage::from_pixel(width, height, image::Rgba([255, 255, 255, 255]));
        Self {
            buffer,
            fonts,
            fetcher,
            stack: vec![State { transform: Matrix::IDENTITY, clip: ClipRect::full(width, height), color: Color::BLACK }],
        }
    }

    /// The finished pixel buffer.
    #[must_use]
    pub fn into_buffer(self) -> RgbaImage {
        self.buffer
    }

    fn state(&self) -> &State {
        self.stack.last().expect("state stack is never empty")
    }

    fn state_mut(&mut self) -> &mut State {
        self.stack.last_mut().expect("state stack is never empty")
    }

    fn blend_pixel(&mut self, px: i32, py: i32, color: Color, coverage: f32) {
        if px < 0 || py < 0 {
            return;
        }
        let (px, py) = (px as u32, py as u32);
        if px >= self.buffer.width() || py >= self.buffer.height() {
            return;
        }
        if !self.state().clip.contains(px as f32, py as f32) {
            return;
        }
        let alpha = color.a * coverage;
        if alpha <= 0.0 {
            return;
        }
        let bg = *self.buffer.get_pixel(px, py);
        let inv = 1.0 - alpha;
        let blended = image::Rgba([
            (f32::from(color.r) * alpha + f32::from(bg[0]) * inv) as u8,
            (f32::from(color.g) * alpha + f32::from(bg[1]) * inv) as u8,
            (f32::from(color.b) * alpha + f32::from(bg[2]) * inv) as u8,
            255,
        ]);
        self.buffer.put_pixel(px, py, blended);
    }

    /// Bounding box (device pixels, clamped to the buffer) of `corners`.
    fn device_bbox(&self, corners: &[(f32, f32)]) -> (i32, i32, i32, i32) {
        let min_x = corners.iter().map(|p| p.0).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let min_y = corners.iter().map(|p| p.1).fold(f32::INFINITY, f32::min).floor().max(0.0);
        let max_x = corners.iter().map(|p| p.0).fold(f32::NEG_INFINITY, f32::max).ceil().min(self.buffer.width() as f32);
        let max_y = corners.iter().map(|p| p.1).fold(f32::NEG_INFINITY, f32::max).ceil().min(self.buffer.height() as f32);
        (min_x as i32, min_y as i32, max_x as i32, max_y as i32)
    }

    /// Rasterize `test(local_x, local_y) -> coverage` over the device-space
    /// bounding box of `local_corners` mapped through the current
    /// transform, inverse-mapping each candidate pixel back to local space.
    fn rasterize_local(&mut self, local_corners: &[(f32, f32)], color: Color, test: impl Fn(f32, f32) -> f32) {
        let transform = self.state().transform;
        let device_corners: Vec<(f32, f32)> = local_corners.iter().map(|&(x, y)| transform.apply(x, y)).collect();
        let Some(inverse) = transform.invert() else { return };
        let (x0, y0, x1, y1) = self.device_bbox(&device_corners);
        for py in y0..y1 {
            for px in x0..x1 {
                let (lx, ly) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                let coverage = test(lx, ly);
                if coverage > 0.0 {
                    self.blend_pixel(px, py, color, coverage);
                }
            }
        }
    }
}

fn rounded_rect_coverage(lx: f32, ly: f32, x: f32, y: f32, w: f32, h: f32, radius: f32) -> f32 {
    if lx < x || lx >= x + w || ly < y || ly >= y + h {
        return 0.0;
    }
    if radius <= 0.0 {
        return 1.0;
    }
    let radius = radius.min(w / 2.0).min(h / 2.0);
    let corners = [(x + radius, y + radius), (x + w - radius, y + radius), (x + radius, y + h - radius), (x + w - radius, y + h - radius)];
    for (cx, cy) in corners {
        let in_corner_band = (lx < x + radius || lx >= x + w - radius) && (ly < y + radius || ly >= y + h - radius);
        if in_corner_band && (lx - cx).hypot(ly - cy) > radius {
            return 0.0;
        }
    }
    1.0
}

impl GraphicsContext for RasterGraphicsContext<'_> {
    fn set_color(&mut self, color: Color) {
        self.state_mut().color = color;
    }

    fn fill_rect(&mut self, x: f32, y: f32, width: f32, height: f32, radius: f32) {
        let color = self.state().color;
        let corners = [(x, y), (x + width, y), (x, y + height), (x + width, y + height)];
        self.rasterize_local(&corners, color, move |lx, ly| rounded_rect_coverage(lx, ly, x, y, width, height, radius));
    }

    fn stroke_rect(&mut self, x: f32, y: f32, width: f32, height: f32, line_width: f32, radius: f32) {
        let color = self.state().color;
        let corners = [(x, y), (x + width, y), (x, y + height), (x + width, y + height)];
        self.rasterize_local(&corners, color, move |lx, ly| {
            let outer = rounded_rect_coverage(lx, ly, x, y, width, height, radius);
            if outer <= 0.0 {
                return 0.0;
            }
            let inner = rounded_rect_coverage(lx, ly, x + line_width, y + line_width, (width - 2.0 * line_width).max(0.0), (height - 2.0 * line_width).max(0.0), (radius - line_width).max(0.0));
            if inner > 0.0 { 0.0 } else { 1.0 }
        });
    }

    fn draw_line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, width: f32) {
        let color = self.state().color;
        let transform = self.state().transform;
        let (dx1, dy1) = transform.apply(x1, y1);
        let (dx2, dy2) = transform.apply(x2, y2);
        let device_width = width * transform.scale_factor();
        let half = (device_width / 2.0).max(0.5);
        let (x0, y0, x1b, y1b) = self.device_bbox(&[(dx1 - half, dy1 - half), (dx1 + half, dy1 + half), (dx2 - half, dy2 - half), (dx2 + half, dy2 + half)]);
        let seg_dx = dx2 - dx1;
        let seg_dy = dy2 - dy1;
        let seg_len_sq = seg_dx.mul_add(seg_dx, seg_dy * seg_dy).max(1e-6);
        for py in y0..y1b {
            for px in x0..x1b {
                let (cx, cy) = (px as f32 + 0.5, py as f32 + 0.5);
                let t = (((cx - dx1) * seg_dx + (cy - dy1) * seg_dy) / seg_len_sq).clamp(0.0, 1.0);
                let (nx, ny) = (dx1 + t * seg_dx, dy1 + t * seg_dy);
                if (cx - nx).hypot(cy - ny) <= half {
                    self.blend_pixel(px, py, color, 1.0);
                }
            }
        }
    }

    fn draw_text(&mut self, text: &str, x: f32, y: f32, font_size: f32, bold: bool, italic: bool) {
        let color = self.state().color;
        let transform = self.state().transform;
        let Some(font) = self.fonts.pick(bold, italic) else { return };
        let scale = transform.scale_factor();
        let scaled_size = font_size * scale;
        let (origin_x, origin_y) = transform.apply(x, y);
        let mut cursor_x = origin_x;
        for ch in text.chars() {
            if ch.is_control() {
                continue;
            }
            let (metrics, bitmap) = font.rasterize(ch, scaled_size);
            let glyph_x = cursor_x as i32 + metrics.xmin;
            let glyph_y = origin_y as i32 - metrics.ymin - metrics.height as i32;
            for gy in 0..metrics.height {
                for gx in 0..metrics.width {
                    let coverage = bitmap[gy * metrics.width + gx];
                    if coverage > 0 {
                        self.blend_pixel(glyph_x + gx as i32, glyph_y + gy as i32, color, f32::from(coverage) / 255.0);
                    }
                }
            }
            cursor_x += metrics.advance_width;
        }
    }

    fn draw_image(&mut self, src: &str, x: f32, y: f32, width: f32, height: f32) {
        if width <= 0.0 || height <= 0.0 {
            return;
        }
        let Some(image) = ImageCache::global().get_or_load(src, self.fetcher) else { return };
        let (iw, ih) = image.dimensions_f32();
        let transform = self.state().transform;
        let corners = [(x, y), (x + width, y), (x, y + height), (x + width, y + height)];
        let device_corners: Vec<(f32, f32)> = corners.iter().map(|&(px, py)| transform.apply(px, py)).collect();
        let Some(inverse) = transform.invert() else { return };
        let (x0, y0, x1, y1) = self.device_bbox(&device_corners);
        for py in y0..y1 {
            for px in x0..x1 {
                let (lx, ly) = inverse.apply(px as f32 + 0.5, py as f32 + 0.5);
                if lx < x || lx >= x + width || ly < y || ly >= y + height {
                    continue;
                }
                let sx = ((lx - x) / width * iw) as u32;
                let sy = ((ly - y) / height * ih) as u32;
                let [r, g, b, a] = image.sample(sx, sy);
                if a == 0 {
                    continue;
                }
                self.blend_pixel(px, py, Color { r, g, b, a: 1.0 }, f32::from(a) / 255.0);
            }
        }
    }

    fn push_state(&mut self) {
        let current = *self.state();
        self.stack.push(current);
    }

    fn pop_state(&mut self) {
        if self.stack.len() > 1 {
            self.stack.pop();
        }
    }

    fn clip_rect(&mut self, x: f32, y: f32, width: f32, height: f32) {
        let transform = self.state().transform;
        let corners = [(x, y), (x + width, y), (x, y + height), (x + width, y + height)];
        let device_corners: Vec<(f32, f32)> = corners.iter().map(|&(px, py)| transform.apply(px, py)).collect();
        let (x0, y0, x1, y1) = self.device_bbox(&device_corners);
        let new_clip = ClipRect { x0: x0 as f32, y0: y0 as f32, x1: x1 as f32, y1: y1 as f32 };
        let state = self.state_mut();
        state.clip = state.clip.intersect(&new_clip);
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        let state = self.state_mut();
        state.transform = state.transform.compose(&Matrix::translation(dx, dy));
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        let state = self.state_mut();
        state.transform = state.transform.compose(&Matrix::scaling(sx, sy));
    }

    fn rotate(&mut self, radians: f32) {
        let state = self.state_mut();
        state.transform = state.transform.compose(&Matrix::rotation(radians));
    }
}
