//! The text-measurement capability [§4.5 Layout engine] depends on.
//!
//! "A text-measurement capability gives `measure(text, font_size, bold) →
//! (width, ascent)`. The layout engine depends on this abstraction and does
//! not embed font logic."

/// Measures text for line breaking and fragment placement. Implementations
/// back this with real glyph metrics (`wisp-browser`'s `fontdue`-backed
/// default); [`ApproximateTextMeasure`] is a fixed-ratio fallback used where
/// no font backend is wired up (layout tests, headless scenarios).
pub trait TextMeasure {
    /// Width and ascent (baseline to top) of `text` set at `font_size`,
    /// `bold` or not, in pixels.
    fn measure(&self, text: &str, font_size: f32, bold: bool) -> (f32, f32);
}

/// A fixed-ratio text measurer: average glyph advance 0.6x font size (bold
/// 0.65x), ascent 0.8x font size. Good enough for layout tests and as a
/// last-resort fallback; not a substitute for real glyph metrics.
#[derive(Debug, Clone, Copy, Default)]
pub struct ApproximateTextMeasure;

impl TextMeasure for ApproximateTextMeasure {
    fn measure(&self, text: &str, font_size: f32, bold: bool) -> (f32, f32) {
        let advance_ratio = if bold { 0.65 } else { 0.6 };
        let width = text.chars().count() as f32 * font_size * advance_ratio;
        (width, font_size * 0.8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn approximate_measure_scales_with_length_and_font_size() {
        let measure = ApproximateTextMeasure;
        let (w1, _) = measure.measure("hello", 16.0, false);
        let (w2, _) = measure.measure("hello world", 16.0, false);
        assert!(w2 > w1);
        let (w_small, _) = measure.measure("hello", 8.0, false);
        assert!(w1 > w_small);
    }

    #[test]
    fn bold_measures_wider_than_regular() {
        let measure = ApproximateTextMeasure;
        let (regular, _) = measure.measure("hello", 16.0, false);
        let (bold, _) = measure.measure("hello", 16.0, true);
        assert!(bold > regular);
    }
}
