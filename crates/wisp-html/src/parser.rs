//! HTML tree builder.
//!
//! Consumes the token stream from [`crate::tokenizer`] and builds a
//! [`wisp_dom::DomTree`]. This is a single stack-of-open-elements builder,
//! not the WHATWG insertion-mode state machine: lenient enough for
//! real-world markup, but not a conformant HTML5 parser (an explicit
//! Non-goal).

use wisp_common::fetch::{ContentKind, Fetcher};
use wisp_common::url::resolve_url;
use wisp_common::warning::warn_once;
use wisp_dom::{Document, DomTree, NodeId, NodeType, is_void_element};

pub use crate::tokenizer::ParseError;
use crate::tokenizer::{self, Attribute, Token};

/// Which list a raw-text element's upcoming `Text` token should be diverted
/// into, instead of becoming a DOM child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Diversion {
    Script,
    Stylesheet,
}

struct TreeBuilder<'a> {
    tree: &'a mut DomTree,
    stack: Vec<NodeId>,
    diverting: Option<(NodeId, Diversion)>,
    fetcher: Option<&'a dyn Fetcher>,
    base_url: Option<&'a str>,
    scripts: Option<&'a mut Vec<String>>,
    stylesheets: Option<&'a mut Vec<String>>,
}

impl<'a> TreeBuilder<'a> {
    fn new(tree: &'a mut DomTree, insertion_point: NodeId) -> Self {
        Self {
            tree,
            stack: vec![insertion_point],
            diverting: None,
            fetcher: None,
            base_url: None,
            scripts: None,
            stylesheets: None,
        }
    }

    fn current(&self) -> NodeId {
        *self.stack.last().expect("stack always has the insertion root")
    }

    fn run(&mut self, tokens: &[Token]) {
        for token in tokens {
            match token {
                Token::StartTag {
                    name,
                    attrs,
                    self_closing,
                } => self.start_tag(name, attrs, *self_closing),
                Token::EndTag { name } => self.end_tag(name),
                Token::Text(text) => self.text(text),
                Token::Comment(text) => {
                    let node = self.tree.alloc(NodeType::Comment(text.clone()));
                    self.tree.append_child(self.current(), node);
                }
                Token::Doctype => {}
            }
        }
    }

    fn start_tag(&mut self, name: &str, attrs: &[Attribute], self_closing: bool) {
        let parent = self.current();
        let node = self.tree.create_element(parent, name.to_string());
        for attr in attrs {
            self.tree.set_attribute(node, &attr.name, attr.value.clone());
        }

        if name == "link" {
            self.maybe_fetch_stylesheet_link(node);
        }

        let is_raw = name == "script" || name == "style";
        let pushes = !self_closing && !is_void_element(name);

        if pushes {
            self.stack.push(node);
        }

        if is_raw && self.scripts.is_some() {
            let kind = if name == "script" {
                Diversion::Script
            } else {
                Diversion::Stylesheet
            };
            self.diverting = Some((node, kind));
        }
    }

    fn end_tag(&mut self, name: &str) {
        if let Some((diverted_node, _)) = self.diverting
            && self.stack.last() == Some(&diverted_node)
        {
            self.diverting = None;
        }

        if let Some(pos) = self.stack.iter().enumerate().skip(1).rev().find_map(|(i, &id)| {
            self.tree
                .get(id)
                .and_then(wisp_dom::Node::as_element)
                .is_some_and(|e| e.tag_name == name)
                .then_some(i)
        }) {
            self.stack.truncate(pos);
        }
    }

    fn text(&mut self, text: &str) {
        if let Some((node, kind)) = self.diverting {
            match kind {
                Diversion::Script => {
                    if let Some(scripts) = self.scripts.as_deref_mut() {
                        scripts.push(text.to_string());
                    }
                }
                Diversion::Stylesheet => {
                    if let Some(stylesheets) = self.stylesheets.as_deref_mut() {
                        stylesheets.push(text.to_string());
                    }
                }
            }
            let _ = node;
            return;
        }
        self.tree.append_text(self.current(), text);
    }

    fn maybe_fetch_stylesheet_link(&mut self, node: NodeId) {
        let Some(fetcher) = self.fetcher else { return };
        let rel = self.tree.get_attribute(node, "rel").unwrap_or_default().to_ascii_lowercase();
        if !rel.split_ascii_whitespace().any(|token| token == "stylesheet") {
            return;
        }
        let Some(href) = self.tree.get_attribute(node, "href").map(str::to_string) else {
            return;
        };
        let resolved = resolve_url(&href, self.base_url);
        match fetcher.fetch(&resolved, ContentKind::Stylesheet) {
            Ok(resource) => {
                let text = String::from_utf8_lossy(&resource.bytes).into_owned();
                if let Some(stylesheets) = self.stylesheets.as_deref_mut() {
                    stylesheets.push(text);
                }
            }
            Err(err) => {
                warn_once("html", &format!("failed to fetch stylesheet '{resolved}': {err}"));
            }
        }
    }
}

/// Parse a complete HTML document.
///
/// [§4.1 Parser] extracts `<script>`/`<style>` contents into
/// [`Document::scripts`]/[`Document::stylesheets`], and fetches
/// `<link rel=stylesheet href>` via `fetcher`, appending the fetched text to
/// [`Document::stylesheets`] as well. Fetch failures are logged and do not
/// abort parsing.
///
/// # Errors
///
/// Returns [`ParseError`] for an unterminated tag or attribute value.
pub fn parse_document(html: &str, fetcher: &dyn Fetcher, base_url: Option<&str>) -> Result<Document, ParseError> {
    let tokens = tokenizer::tokenize(html)?;
    let mut doc = Document::new();
    doc.base_url = base_url.map(str::to_string);

    let root = doc.tree.root();
    let mut builder = TreeBuilder::new(&mut doc.tree, root);
    builder.fetcher = Some(fetcher);
    builder.base_url = base_url;
    builder.scripts = Some(&mut doc.scripts);
    builder.stylesheets = Some(&mut doc.stylesheets);
    builder.run(&tokens);

    Ok(doc)
}

/// Parse an HTML fragment, appending its top-level nodes as children of
/// `parent` in `tree`, and returning the ids of those new top-level nodes.
///
/// [§4.1 Parser] "Fragment parsing: a variant accepts an HTML fragment and
/// returns a list of top-level child nodes with no root wrapping; used by
/// `innerHTML` assignment."
///
/// `<script>`/`<style>` tags inside a fragment are *not* diverted into a
/// scripts/stylesheets list (a fragment has no document-level script/sheet
/// lists to divert into) and become ordinary elements with a text child.
///
/// # Errors
///
/// Returns [`ParseError`] for an unterminated tag or attribute value.
pub fn parse_fragment(tree: &mut DomTree, parent: NodeId, html: &str) -> Result<Vec<NodeId>, ParseError> {
    let tokens = tokenizer::tokenize(html)?;
    let before_count = tree.children(parent).len();
    let mut builder = TreeBuilder::new(tree, parent);
    builder.run(&tokens);
    Ok(tree.children(parent)[before_count..].to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use wisp_common::fetch::NullFetcher;

    fn parse(html: &str) -> Document {
        parse_document(html, &NullFetcher, None).unwrap()
    }

    #[test]
    fn parses_nested_elements_and_text() {
        let doc = parse("<div><p>hello</p></div>");
        let root = doc.tree.root();
        let div = doc.tree.children(root)[0];
        assert_eq!(doc.tree.get(div).unwrap().as_element().unwrap().tag_name, "div");
        let p = doc.tree.children(div)[0];
        assert_eq!(doc.tree.text_content(p), "hello");
    }

    #[test]
    fn void_elements_do_not_nest_following_siblings() {
        let doc = parse("<div><br><span>x</span></div>");
        let root = doc.tree.root();
        let div = doc.tree.children(root)[0];
        assert_eq!(doc.tree.children(div).len(), 2);
    }

    #[test]
    fn script_contents_go_to_scripts_list_not_tree() {
        let doc = parse("<p id=\"t\">old</p><script>document.title;</script>");
        assert_eq!(doc.scripts, vec!["document.title;".to_string()]);
        let root = doc.tree.root();
        // Only the <p>; no script element remains as a text-bearing child
        // of the root beyond it (script was consumed, not appended as text).
        assert_eq!(doc.tree.children(root).len(), 2);
    }

    #[test]
    fn style_tag_contents_go_to_stylesheets_list() {
        let doc = parse("<style>div { color: red; }</style>");
        assert_eq!(doc.stylesheets, vec!["div { color: red; }".to_string()]);
    }

    #[test]
    fn fragment_parse_returns_only_top_level_nodes() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        let added = parse_fragment(&mut tree, div, "<p>new</p><span>c</span>").unwrap();
        assert_eq!(added.len(), 2);
        assert_eq!(tree.get(added[0]).unwrap().as_element().unwrap().tag_name, "p");
        assert_eq!(tree.get(added[1]).unwrap().as_element().unwrap().tag_name, "span");
    }

    #[test]
    fn unterminated_tag_is_a_parse_error() {
        assert!(parse_document("<div", &NullFetcher, None).is_err());
    }

    #[test]
    fn round_trip_serialize_outer_reparses_equivalently() {
        let doc = parse(r#"<div class="a"><span id="b">hi</span></div>"#);
        let root = doc.tree.root();
        let div = doc.tree.children(root)[0];
        let serialized = doc.tree.serialize_outer(div);
        let reparsed = parse(&serialized);
        let reroot = reparsed.tree.root();
        assert_eq!(reparsed.tree.serialize_outer(reparsed.tree.children(reroot)[0]), serialized);
    }
}
