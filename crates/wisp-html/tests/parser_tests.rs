//! Integration tests for the HTML tree builder: whole-document shapes that
//! exercise tokenizer and parser together.

use wisp_common::fetch::NullFetcher;
use wisp_dom::DomTree;
use wisp_html::{parse_document, parse_fragment};

#[test]
fn minimal_page_has_expected_structure() {
    let doc = parse_document(
        "<html><head><title>Hi</title></head><body><p>text</p></body></html>",
        &NullFetcher,
        None,
    )
    .unwrap();

    let html = doc.document_element().expect("document element");
    assert_eq!(doc.tree.get(html).unwrap().as_element().unwrap().tag_name, "html");
    let body = doc.body().expect("body");
    let p = doc.tree.children(body)[0];
    assert_eq!(doc.tree.text_content(p), "text");
}

#[test]
fn mismatched_close_tag_is_ignored_leniently() {
    let doc = parse_document("<div><p>a</span></p></div>", &NullFetcher, None).unwrap();
    let root = doc.tree.root();
    let div = doc.tree.children(root)[0];
    let p = doc.tree.children(div)[0];
    assert_eq!(doc.tree.text_content(p), "a");
}

#[test]
fn comments_are_preserved_as_comment_nodes() {
    let doc = parse_document("<div><!-- note --><span>x</span></div>", &NullFetcher, None).unwrap();
    let root = doc.tree.root();
    let div = doc.tree.children(root)[0];
    let children = doc.tree.children(div);
    assert_eq!(children.len(), 2);
    let comment_node = doc.tree.get(children[0]).unwrap();
    assert!(matches!(comment_node.node_type, wisp_dom::NodeType::Comment(ref s) if s == " note "));
}

#[test]
fn empty_document_parses_to_an_empty_root() {
    let doc = parse_document("", &NullFetcher, None).unwrap();
    assert!(doc.tree.children(doc.tree.root()).is_empty());
    assert!(doc.scripts.is_empty());
    assert!(doc.stylesheets.is_empty());
}

#[test]
fn fragment_parse_into_existing_tree_preserves_prior_siblings() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let container = tree.create_element(root, "div");
    tree.create_element(container, "old");

    let added = parse_fragment(&mut tree, container, "<new></new>").unwrap();

    assert_eq!(added.len(), 1);
    let children = tree.children(container);
    assert_eq!(children.len(), 2);
    assert_eq!(tree.get(children[0]).unwrap().as_element().unwrap().tag_name, "old");
    assert_eq!(tree.get(children[1]).unwrap().as_element().unwrap().tag_name, "new");
}

#[test]
fn attribute_values_decode_entities() {
    let doc = parse_document(r#"<a title="A &amp; B">link</a>"#, &NullFetcher, None).unwrap();
    let root = doc.tree.root();
    let a = doc.tree.children(root)[0];
    assert_eq!(doc.tree.get_attribute(a, "title"), Some("A & B"));
}
