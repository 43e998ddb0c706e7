//! Text measurement backed by `fontdue`, and the system fonts the painter
//! rasterizes with.
//!
//! [§4.5 Layout engine] "A text-measurement capability gives `measure(text,
//! font_size, bold) → (width, ascent)`." [§4.6 Painter] requires the same
//! bundled default for `draw_text`.

use fontdue::{Font, FontSettings};
use wisp_css::TextMeasure;

/// Search paths for a default (regular) system font, tried in order.
const FONT_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSans.ttf",
    "/System/Library/Fonts/Helvetica.ttc",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

/// Search paths for the bold variant.
const FONT_BOLD_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Search paths for the italic variant.
const FONT_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Oblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Italic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansOblique.ttf",
    "/System/Library/Fonts/Supplemental/Arial Italic.ttf",
    "C:\\Windows\\Fonts\\ariali.ttf",
];

/// Search paths for the bold-italic variant.
const FONT_BOLD_ITALIC_SEARCH_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-BoldOblique.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-BoldItalic.ttf",
    "/usr/share/fonts/truetype/freefont/FreeSansBoldOblique.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold Italic.ttf",
    "C:\\Windows\\Fonts\\arialbi.ttf",
];

fn load_font_from_paths(paths: &[&str]) -> Option<Font> {
    paths.iter().find_map(|path| {
        let data = std::fs::read(path).ok()?;
        Font::from_bytes(data, FontSettings::default()).ok()
    })
}

/// The four style variants of one font family, loaded once per render and
/// shared by both [`FontdueTextMeasure`] (layout) and the rasterizer
/// (paint), so the two passes measure and draw with the same metrics.
pub struct FontSet {
    /// Regular weight, upright.
    pub regular: Option<Font>,
    /// Bold weight, upright.
    pub bold: Option<Font>,
    /// Regular weight, italic.
    pub italic: Option<Font>,
    /// Bold weight, italic.
    pub bold_italic: Option<Font>,
}

impl FontSet {
    /// Load whichever of the four variants can be found on this system.
    /// Every field may be `None`; callers fall back through the family to
    /// regular, and ultimately render no glyphs at all if even that is
    /// missing.
    #[must_use]
    pub fn load_system() -> Self {
        let set = Self {
            regular: load_font_from_paths(FONT_SEARCH_PATHS),
            bold: load_font_from_paths(FONT_BOLD_SEARCH_PATHS),
            italic: load_font_from_paths(FONT_ITALIC_SEARCH_PATHS),
            bold_italic: load_font_from_paths(FONT_BOLD_ITALIC_SEARCH_PATHS),
        };
        if set.regular.is_none() {
            wisp_common::warning::warn_once("font", "no system font found; text will not be rasterized");
        }
        set
    }

    /// The best available font for `(bold, italic)`, falling back through
    /// the family to the regular face.
    #[must_use]
    pub fn pick(&self, bold: bool, italic: bool) -> Option<&Font> {
        match (bold, italic) {
            (true, true) => self.bold_italic.as_ref().or(self.bold.as_ref()).or(self.regular.as_ref()),
            (true, false) => self.bold.as_ref().or(self.regular.as_ref()),
            (false, true) => self.italic.as_ref().or(self.regular.as_ref()),
            (false, false) => self.regular.as_ref(),
        }
    }
}

/// [`TextMeasure`] backed by `fontdue`'s per-glyph advance widths, so line
/// breaking sees the same widths the rasterizer will draw.
pub struct FontdueTextMeasure<'a> {
    fonts: &'a FontSet,
}

impl<'a> FontdueTextMeasure<'a> {
    /// Measure against `fonts`' regular/bold faces.
    #[must_use]
    pub const fn new(fonts: &'a FontSet) -> Self {
        Self { fonts }
    }
}

impl TextMeasure for FontdueTextMeasure<'_> {
    fn measure(&self, text: &str, font_size: f32, bold: bool) -> (f32, f32) {
        let Some(font) = self.fonts.pick(bold, false) else {
            return (0.0, font_size * 0.8);
        };
        let width: f32 = text.chars().filter(|c| !c.is_control()).map(|c| font.metrics(c, font_size).advance_width).sum();
        let ascent = font.horizontal_line_metrics(font_size).map_or(font_size * 0.8, |m| m.ascent);
        (width, ascent)
    }
}
