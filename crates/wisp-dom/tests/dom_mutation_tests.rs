//! Integration tests for DOM mutation: `insert_before`, `remove_child`,
//! sibling traversal, and `contains`.

use wisp_dom::DomTree;

#[test]
fn insert_before_with_null_reference_appends() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "a");
    let b = tree.create_detached_element("b");
    tree.insert_before(root, b, None);
    assert_eq!(tree.children(root), &[a, b]);
}

#[test]
fn insert_before_existing_reference_splices() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "a");
    let c = tree.create_element(root, "c");
    let b = tree.create_detached_element("b");
    tree.insert_before(root, b, Some(c));
    assert_eq!(tree.children(root), &[a, b, c]);
}

#[test]
fn insert_before_moves_node_already_in_tree() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "a");
    let b = tree.create_element(root, "b");
    let c = tree.create_element(root, "c");
    tree.insert_before(root, c, Some(a));
    assert_eq!(tree.children(root), &[c, a, b]);
}

#[test]
fn remove_child_detaches_subtree_without_dropping_it() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let parent = tree.create_element(root, "div");
    let child = tree.create_element(parent, "span");
    let grandchild = tree.create_element(child, "b");

    tree.remove_child(root, parent);

    assert_eq!(tree.parent(parent), None);
    assert!(!tree.children(root).contains(&parent));
    // the removed subtree survives intact
    assert_eq!(tree.children(parent), &[child]);
    assert_eq!(tree.children(child), &[grandchild]);
}

#[test]
fn sibling_traversal_matches_document_order() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "a");
    let b = tree.create_element(root, "b");
    let c = tree.create_element(root, "c");

    assert_eq!(tree.next_sibling(a), Some(b));
    assert_eq!(tree.next_sibling(b), Some(c));
    assert_eq!(tree.next_sibling(c), None);
    assert_eq!(tree.prev_sibling(c), Some(b));
    assert_eq!(tree.prev_sibling(a), None);
}

#[test]
fn descendants_are_preorder_document_order() {
    let mut tree = DomTree::new();
    let root = tree.root();
    let a = tree.create_element(root, "a");
    let b = tree.create_element(a, "b");
    let c = tree.create_element(a, "c");
    let d = tree.create_element(root, "d");

    let order: Vec<_> = tree.descendants(root).collect();
    assert_eq!(order, vec![a, b, c, d]);
}
