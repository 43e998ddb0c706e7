//! The fetcher capability.
//!
//! [§6 External interfaces] defines `fetch(uri) -> (bytes, content_type, error)`
//! as the single abstraction the parser and layout engine use to reach
//! outside the pipeline for stylesheets and images. Concrete fetchers (HTTP,
//! filesystem) live here; `wisp-html` and `wisp-css` depend only on the
//! [`Fetcher`] trait, the way `koala-browser` sits above `koala-common::net`
//! without the lower crates depending on `reqwest` directly.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// A resource successfully retrieved by a [`Fetcher`].
#[derive(Debug, Clone)]
pub struct FetchedResource {
    /// Raw response bytes.
    pub bytes: Vec<u8>,
    /// The response's declared content type, or empty if unknown.
    pub content_type: String,
}

/// Why a fetch failed.
///
/// [§7] "Resource errors: the fetcher returned an error or wrong content
/// type; the parser/layout logs and proceeds with the resource absent."
#[derive(Debug, Clone)]
pub enum FetchError {
    /// The underlying transport (HTTP client, filesystem) failed.
    Transport(String),
    /// The resource was retrieved but its content type was rejected by the
    /// caller (e.g. a non-CSS content type for a `<link rel=stylesheet>`).
    UnacceptableContentType(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Transport(msg) => write!(f, "{msg}"),
            Self::UnacceptableContentType(ct) => write!(f, "unacceptable content type {ct:?}"),
        }
    }
}

/// What kind of resource a fetch is for, used to decide whether the content
/// type returned by the server is acceptable.
///
/// [§6] "For CSS: any content type with `text/` prefix or containing `css`
/// is accepted; else error. For images: content type not validated."
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentKind {
    /// A stylesheet fetched via `<link rel="stylesheet">`.
    Stylesheet,
    /// An image resource (`<img src>`, `background-image`).
    Image,
}

/// A capability the core pipeline invokes to obtain resource bytes.
///
/// Implementations live outside the core (network, filesystem); the parser
/// and layout engine depend only on this trait.
pub trait Fetcher {
    /// Fetch `uri`, optionally resolved against `base`, and return its bytes.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] if the transport fails or (for
    /// [`ContentKind::Stylesheet`]) the content type is unacceptable.
    fn fetch(&self, uri: &str, kind: ContentKind) -> Result<FetchedResource, FetchError>;
}

/// Returns whether `content_type` is acceptable for a stylesheet fetch.
#[must_use]
pub fn is_acceptable_content_type(content_type: &str, kind: ContentKind) -> bool {
    match kind {
        ContentKind::Image => true,
        ContentKind::Stylesheet => {
            let lower = content_type.to_ascii_lowercase();
            lower.is_empty() || lower.starts_with("text/") || lower.contains("css")
        }
    }
}

/// Decode a `data:` URI into its raw bytes and declared media type.
///
/// Supports `data:[<mediatype>][;base64],<data>`. Percent-decoding of
/// non-base64 payloads is not implemented (not needed by any scenario in
/// spec.md); such payloads are returned as raw UTF-8 bytes.
#[must_use]
pub fn decode_data_uri(uri: &str) -> Option<FetchedResource> {
    let rest = uri.strip_prefix("data:")?;
    let (meta, payload) = rest.split_once(',')?;
    let is_base64 = meta.ends_with(";base64");
    let media_type = meta.strip_suffix(";base64").unwrap_or(meta);
    let content_type = if media_type.is_empty() {
        "text/plain".to_string()
    } else {
        media_type.to_string()
    };
    let bytes = if is_base64 {
        BASE64.decode(payload.as_bytes()).ok()?
    } else {
        payload.as_bytes().to_vec()
    };
    Some(FetchedResource {
        bytes,
        content_type,
    })
}

/// User-Agent header sent with all HTTP requests.
const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64) wisp/0.1 rendering-engine";

/// Default request timeout.
const TIMEOUT: Duration = Duration::from_secs(30);

/// A [`Fetcher`] that resolves `data:` URIs inline and otherwise performs a
/// blocking HTTP GET, for the CLI's network mode.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpFetcher;

impl Fetcher for HttpFetcher {
    fn fetch(&self, uri: &str, kind: ContentKind) -> Result<FetchedResource, FetchError> {
        if let Some(resource) = decode_data_uri(uri) {
            return accept(resource, kind);
        }

        let client = reqwest::blocking::Client::builder()
            .timeout(TIMEOUT)
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        let response = client
            .get(uri)
            .header("User-Agent", USER_AGENT)
            .send()
            .map_err(|e| FetchError::Transport(format!("request failed: {e}")))?;

        if !response.status().is_success() {
            return Err(FetchError::Transport(format!(
                "HTTP error: {}",
                response.status()
            )));
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();

        let bytes = response
            .bytes()
            .map(|b| b.to_vec())
            .map_err(|e| FetchError::Transport(format!("failed to read response body: {e}")))?;

        accept(
            FetchedResource {
                bytes,
                content_type,
            },
            kind,
        )
    }
}

/// A [`Fetcher`] that resolves `data:` URIs inline and otherwise reads
/// `file://` URIs and bare paths relative to a base directory, for the CLI's
/// file-in/file-out mode.
#[derive(Debug, Clone)]
pub struct FileFetcher {
    /// Directory that relative paths are resolved against (the directory
    /// containing the input HTML file).
    pub base_dir: PathBuf,
}

impl FileFetcher {
    /// Create a fetcher rooted at `base_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    fn resolve(&self, uri: &str) -> PathBuf {
        let path = uri.strip_prefix("file://").unwrap_or(uri);
        let path = Path::new(path);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

impl Fetcher for FileFetcher {
    fn fetch(&self, uri: &str, kind: ContentKind) -> Result<FetchedResource, FetchError> {
        if let Some(resource) = decode_data_uri(uri) {
            return accept(resource, kind);
        }
        if uri.starts_with("http://") || uri.starts_with("https://") {
            return HttpFetcher.fetch(uri, kind);
        }

        let path = self.resolve(uri);
        let bytes = fs::read(&path)
            .map_err(|e| FetchError::Transport(format!("{}: {e}", path.display())))?;
        let content_type = guess_content_type(&path);
        accept(
            FetchedResource {
                bytes,
                content_type,
            },
            kind,
        )
    }
}

fn guess_content_type(path: &Path) -> String {
    match path.extension().and_then(|e| e.to_str()) {
        Some("css") => "text/css".to_string(),
        Some("png") => "image/png".to_string(),
        Some("jpg" | "jpeg") => "image/jpeg".to_string(),
        Some("gif") => "image/gif".to_string(),
        Some("svg") => "image/svg+xml".to_string(),
        _ => String::new(),
    }
}

fn accept(resource: FetchedResource, kind: ContentKind) -> Result<FetchedResource, FetchError> {
    if is_acceptable_content_type(&resource.content_type, kind) {
        Ok(resource)
    } else {
        Err(FetchError::UnacceptableContentType(resource.content_type))
    }
}

/// A [`Fetcher`] that always fails, for contexts with no fetch capability
/// (e.g. fragment parsing for `innerHTML` assignment).
#[derive(Debug, Default, Clone, Copy)]
pub struct NullFetcher;

impl Fetcher for NullFetcher {
    fn fetch(&self, _uri: &str, _kind: ContentKind) -> Result<FetchedResource, FetchError> {
        Err(FetchError::Transport("no fetch capability available".to_string()))
    }
}
