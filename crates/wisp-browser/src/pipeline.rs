//! Document loading and the load → style → layout → paint → script →
//! re-layout → re-paint pipeline.
//!
//! [§4.7] "After an initial layout and paint, if the document has any
//! scripts, they run in document order ... following the second pass the
//! image is final." [§7] "the pipeline always produces either a complete
//! rendered image or a top-level error; it never produces a partially
//! rendered image with an error return" — so this module's public
//! functions only ever return a finished PNG or a [`wisp_common::Error`].

use std::cell::RefCell;
use std::io::Cursor;
use std::path::Path;
use std::rc::Rc;

use image::{ImageFormat, RgbaImage};
use wisp_common::Error;
use wisp_common::fetch::{ContentKind, FileFetcher, Fetcher, HttpFetcher};
use wisp_css::{ComputedStyle, LayoutContext, PaintContext, Stylesheet, layout_document, paint_document, parse_stylesheet};
use wisp_dom::DomTree;
use wisp_html::parse_document;

use crate::font::{FontSet, FontdueTextMeasure};
use crate::raster::RasterGraphicsContext;

/// Where to load a document's HTML source from, and how to resolve its
/// relative resource URLs.
///
/// [§6] "CLI (file-in/file-out mode)" vs. "CLI (network mode)".
pub enum Source<'a> {
    /// A local HTML file; relative resources resolve against its directory.
    File(&'a Path),
    /// A URL fetched over HTTP(S); relative resources resolve against it.
    Url(&'a str),
}

/// Load `source`'s HTML, then run it through style resolution, layout,
/// paint, and (if the document has any) scripts, to a finished PNG.
///
/// # Errors
///
/// Returns [`Error::Input`] if the source cannot be read or fetched,
/// [`Error::Parse`] if the HTML cannot be tokenized, and
/// [`Error::RenderTarget`] if PNG encoding fails.
pub fn render(source: &Source<'_>, viewport_width: f32, viewport_height: f32) -> Result<Vec<u8>, Error> {
    wisp_common::warning::clear_warnings();

    let (html, fetcher, base_url): (String, Box<dyn Fetcher>, Option<String>) = match source {
        Source::File(path) => {
            let html = std::fs::read_to_string(path).map_err(|e| Error::Input(format!("{}: {e}", path.display())))?;
            let base_dir = path.parent().map_or_else(|| Path::new(".").to_path_buf(), Path::to_path_buf);
            (html, Box::new(FileFetcher::new(base_dir)), None)
        }
        Source::Url(url) => {
            let fetcher = HttpFetcher;
            let resource = fetcher.fetch(url, ContentKind::Stylesheet).map_err(|e| Error::Input(e.to_string()))?;
            let html = String::from_utf8(resource.bytes).map_err(|e| Error::Input(format!("response was not valid UTF-8: {e}")))?;
            (html, Box::new(fetcher), Some((*url).to_string()))
        }
    };

    let document = parse_document(&html, fetcher.as_ref(), base_url.as_deref()).map_err(|e| Error::Parse(e.to_string()))?;

    let stylesheets: Vec<Stylesheet> = document.stylesheets.iter().map(|css| parse_stylesheet(css)).collect();
    let dom = Rc::new(RefCell::new(document.tree));
    let fonts = FontSet::load_system();

    let mut image = render_pass(&dom, &stylesheets, &fonts, fetcher.as_ref(), viewport_width, viewport_height);

    if !document.scripts.is_empty() {
        wisp_js::run_scripts(&dom, &document.scripts);
        image = render_pass(&dom, &stylesheets, &fonts, fetcher.as_ref(), viewport_width, viewport_height);
    }

    encode_png(&image)
}

/// One full style-layout-paint pass over `dom`'s current state.
fn render_pass(dom: &Rc<RefCell<DomTree>>, stylesheets: &[Stylesheet], fonts: &FontSet, fetcher: &dyn Fetcher, viewport_width: f32, viewport_height: f32) -> RgbaImage {
    let tree_guard = dom.borrow();
    let tree = &*tree_guard;
    let root = tree.root();
    let style = ComputedStyle::resolve(tree, stylesheets, root);
    let text_measure = FontdueTextMeasure::new(fonts);

    let layout_ctx = LayoutContext { tree, style: &style, text_measure: &text_measure, fetcher: Some(fetcher) };
    let layout = layout_document(&layout_ctx, root, viewport_width, viewport_height);

    let paint_ctx = PaintContext { tree, style: &style, text_measure: &text_measure, scroll_y: 0.0 };
    let mut gfx = RasterGraphicsContext::new(viewport_width as u32, viewport_height as u32, fonts, fetcher);
    paint_document(&paint_ctx, &layout, &mut gfx);
    gfx.into_buffer()
}

fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, Error> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| Error::RenderTarget(e.to_string()))?;
    Ok(bytes)
}
