//! URL resolution utilities.
//!
//! Resolves potentially relative `href`/`src` values against a base URL, for
//! `<link>`, `<img>`, and `background-image` resources. This is a practical
//! subset of URL Standard resolution, not a full implementation: query
//! strings, `.`/`..` path segments, and fragments are not normalized.

/// Resolve a potentially relative URL against a base URL.
///
/// If `href` is already absolute (has a scheme, or is a `data:` URI) it is
/// returned unchanged. Otherwise it is joined against `base`.
#[must_use]
pub fn resolve_url(href: &str, base: Option<&str>) -> String {
    if is_absolute(href) {
        return href.to_string();
    }

    let Some(base) = base else {
        return href.to_string();
    };

    if let Some(rest) = href.strip_prefix("//") {
        let scheme = if base.starts_with("https:") {
            "https:"
        } else {
            "http:"
        };
        return format!("{scheme}//{rest}");
    }

    if href.starts_with('/') {
        return match base.find("://") {
            Some(scheme_end) => {
                let after_scheme = &base[scheme_end + 3..];
                match after_scheme.find('/') {
                    Some(path_start) => {
                        let origin = &base[..scheme_end + 3 + path_start];
                        format!("{origin}{href}")
                    }
                    None => format!("{base}{href}"),
                }
            }
            None => href.to_string(),
        };
    }

    let base_dir = base.rsplit_once('/').map_or(base, |(dir, _)| dir);
    format!("{base_dir}/{href}")
}

/// Whether `href` already names an absolute resource (has a scheme).
#[must_use]
pub fn is_absolute(href: &str) -> bool {
    href.starts_with("http://")
        || href.starts_with("https://")
        || href.starts_with("data:")
        || href.starts_with("file:")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absolute_passes_through() {
        assert_eq!(resolve_url("https://a.test/x.css", Some("https://b.test/")), "https://a.test/x.css");
    }

    #[test]
    fn relative_joins_against_base_directory() {
        assert_eq!(
            resolve_url("style.css", Some("https://example.com/pages/index.html")),
            "https://example.com/pages/style.css"
        );
    }

    #[test]
    fn root_relative_joins_against_origin() {
        assert_eq!(
            resolve_url("/style.css", Some("https://example.com/pages/index.html")),
            "https://example.com/style.css"
        );
    }

    #[test]
    fn no_base_returns_href_unchanged() {
        assert_eq!(resolve_url("style.css", None), "style.css");
    }
}
