//! Intrinsic and declared sizing for `<img>` replaced content.
//!
//! [§4.5 Layout engine] "A replaced element's box size is its declared
//! `width`/`height` (CSS or HTML attributes) where present, else its
//! intrinsic size from the decoded image, else the HTML default replaced
//! size of 300x150."

use wisp_common::{Fetcher, ImageCache};
use wisp_dom::{DomTree, NodeId};

use crate::cascade::ComputedStyle;

/// HTML's default replaced-element size, used when an image has neither a
/// declared dimension nor (because no fetcher is wired up, or the fetch
/// failed) an intrinsic one.
const DEFAULT_REPLACED_WIDTH: f32 = 300.0;
const DEFAULT_REPLACED_HEIGHT: f32 = 150.0;

fn declared(tree: &DomTree, style: &ComputedStyle, node: NodeId, prop: &str, attr: &str) -> Option<f32> {
    if let Some(v) = style.length(tree, node, prop, 0.0) {
        return Some(v);
    }
    tree.get_attribute(node, attr)?.trim().parse::<f32>().ok()
}

/// Resolve the content-box `(width, height)` of the `<img>` element `node`.
///
/// Declared `width`/`height` (CSS wins over the HTML attribute) are used
/// directly. If only one is declared and a fetcher is available, the
/// intrinsic aspect ratio scales the other. With neither declared and no
/// fetcher (or a failed fetch), falls back to the intrinsic decoded size or
/// finally [`DEFAULT_REPLACED_WIDTH`]x[`DEFAULT_REPLACED_HEIGHT`].
#[must_use]
pub fn resolve_with_fetcher(tree: &DomTree, style: &ComputedStyle, node: NodeId, fetcher: Option<&dyn Fetcher>) -> (f32, f32) {
    let declared_w = declared(tree, style, node, "width", "width");
    let declared_h = declared(tree, style, node, "height", "height");

    let intrinsic = fetcher.and_then(|f| {
        let src = tree.get_attribute(node, "src")?;
        ImageCache::global().get_or_load(src, f).map(|img| img.dimensions_f32())
    });

    match (declared_w, declared_h, intrinsic) {
        (Some(w), Some(h), _) => (w, h),
        (Some(w), None, Some((iw, ih))) if iw > 0.0 => (w, w * ih / iw),
        (Some(w), None, _) => (w, w * DEFAULT_REPLACED_HEIGHT / DEFAULT_REPLACED_WIDTH),
        (None, Some(h), Some((iw, ih))) if ih > 0.0 => (h * iw / ih, h),
        (None, Some(h), _) => (h * DEFAULT_REPLACED_WIDTH / DEFAULT_REPLACED_HEIGHT, h),
        (None, None, Some((iw, ih))) => (iw, ih),
        (None, None, None) => (DEFAULT_REPLACED_WIDTH, DEFAULT_REPLACED_HEIGHT),
    }
}

/// [`resolve_with_fetcher`] with no fetcher, for contexts (tests, fragment
/// layout) without a resource-loading capability: declared size or the
/// default replaced size.
#[must_use]
pub fn resolve(tree: &DomTree, style: &ComputedStyle, node: NodeId) -> (f32, f32) {
    resolve_with_fetcher(tree, style, node, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stylesheet::Stylesheet;

    #[test]
    fn declared_css_dimensions_win() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let img = tree.create_element(root, "img");
        tree.set_attribute(img, "style", "width: 50px; height: 20px");
        tree.set_attribute(img, "width", "999");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(resolve(&tree, &style, img), (50.0, 20.0));
    }

    #[test]
    fn html_attribute_used_when_no_css_declared() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let img = tree.create_element(root, "img");
        tree.set_attribute(img, "width", "40");
        tree.set_attribute(img, "height", "10");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(resolve(&tree, &style, img), (40.0, 10.0));
    }

    #[test]
    fn no_dimensions_and_no_fetcher_falls_back_to_default_size() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let img = tree.create_element(root, "img");
        let sheets: Vec<Stylesheet> = Vec::new();
        let style = ComputedStyle::resolve(&tree, &sheets, root);
        assert_eq!(resolve(&tree, &style, img), (DEFAULT_REPLACED_WIDTH, DEFAULT_REPLACED_HEIGHT));
    }
}
