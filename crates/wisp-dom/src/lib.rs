//! Arena-based DOM tree for the wisp rendering engine.
//!
//! # Design
//!
//! The tree uses arena allocation with [`NodeId`] indices for parent/child
//! relationships, so that mutation and traversal never fight the borrow
//! checker: a [`NodeId`] is `Copy` and carries no borrow, only the
//! [`DomTree`] it indexes into is ever borrowed.
//!
//! A node is either a **text node** (a string), a **comment node** (a
//! string, never matched or painted), or an **element node** (a lowercased
//! tag name, an ordered attribute map, and an ordered child list). Every
//! node carries a `parent` back-reference; `remove_child`/`insert_before`
//! keep it in lock-step with the child list in a single logical step so
//! observers never see a stale parent pointer.

use std::fmt::Write as _;

use indexmap::IndexMap;

/// Ordered mapping from attribute name to value, preserving insertion order.
pub type AttributesMap = IndexMap<String, String>;

/// A type-safe index into the arena. Stable for the lifetime of the tree:
/// removing a node never reuses or shifts other nodes' ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The document root is always allocated first, at index 0.
    pub const ROOT: Self = Self(0);
}

/// Element-specific data: tag name and attributes.
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Lowercased tag name (`div`, `span`, the synthetic `document`, ...).
    pub tag_name: String,
    /// Ordered attribute name → value map.
    pub attrs: AttributesMap,
}

impl ElementData {
    /// Create element data for `tag_name` with no attributes.
    #[must_use]
    pub fn new(tag_name: impl Into<String>) -> Self {
        Self {
            tag_name: tag_name.into(),
            attrs: AttributesMap::new(),
        }
    }

    /// The element's `id` attribute, if present.
    #[must_use]
    pub fn id(&self) -> Option<&str> {
        self.attrs.get("id").map(String::as_str)
    }

    /// The space-separated tokens of the `class` attribute, in source order,
    /// duplicates included (callers that want a set should `collect` into
    /// one).
    #[must_use]
    pub fn class_list(&self) -> Vec<&str> {
        self.attrs
            .get("class")
            .map(|v| v.split_ascii_whitespace().collect())
            .unwrap_or_default()
    }
}

/// The kind of content a node carries.
#[derive(Debug, Clone)]
pub enum NodeType {
    /// An element: tag name + attributes. The document root is an element
    /// with the synthetic tag name `document`.
    Element(ElementData),
    /// A text node.
    Text(String),
    /// A comment node (`<!-- ... -->`). Never matched by selectors or
    /// painted; kept only so serialization round-trips.
    Comment(String),
}

/// A single tree node: its content plus tree-structure bookkeeping.
#[derive(Debug, Clone)]
pub struct Node {
    /// What kind of node this is and its payload.
    pub node_type: NodeType,
    /// The parent node, or `None` for the root (or a freshly-allocated,
    /// not-yet-attached node, or one detached by `remove_child`).
    pub parent: Option<NodeId>,
    /// Children in document order.
    pub children: Vec<NodeId>,
}

impl Node {
    /// This node's element data, if it is an element.
    #[must_use]
    pub const fn as_element(&self) -> Option<&ElementData> {
        match &self.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) | NodeType::Comment(_) => None,
        }
    }

    /// This node's element data, mutably, if it is an element.
    pub const fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.node_type {
            NodeType::Element(data) => Some(data),
            NodeType::Text(_) | NodeType::Comment(_) => None,
        }
    }

    /// This node's text, if it is a text node.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match &self.node_type {
            NodeType::Text(s) => Some(s.as_str()),
            NodeType::Element(_) | NodeType::Comment(_) => None,
        }
    }

    /// Whether this is a text node.
    #[must_use]
    pub const fn is_text(&self) -> bool {
        matches!(self.node_type, NodeType::Text(_))
    }

    /// Whether this is an element node.
    #[must_use]
    pub const fn is_element(&self) -> bool {
        matches!(self.node_type, NodeType::Element(_))
    }
}

/// Arena-based DOM tree with `O(1)` node access by [`NodeId`].
#[derive(Debug, Clone)]
pub struct DomTree {
    nodes: Vec<Node>,
}

impl DomTree {
    /// Create a tree with a single synthetic root element, tag name
    /// `document`, at [`NodeId::ROOT`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                node_type: NodeType::Element(ElementData::new("document")),
                parent: None,
                children: Vec::new(),
            }],
        }
    }

    /// The root node id.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Number of nodes ever allocated (includes detached/orphaned nodes).
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the arena holds no nodes (never true once constructed via
    /// [`DomTree::new`], which always seeds the root).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Borrow a node by id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.0)
    }

    /// Mutably borrow a node by id.
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.0)
    }

    /// Allocate a new, unattached node and return its id.
    pub fn alloc(&mut self, node_type: NodeType) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            node_type,
            parent: None,
            children: Vec::new(),
        });
        id
    }

    /// Allocate and attach a new element child of `parent` with `tag_name`.
    pub fn create_element(&mut self, parent: NodeId, tag_name: impl Into<String>) -> NodeId {
        let id = self.alloc(NodeType::Element(ElementData::new(tag_name)));
        self.append_child(parent, id);
        id
    }

    /// Allocate a standalone element node (not yet attached to any parent),
    /// as `document.createElement` does.
    pub fn create_detached_element(&mut self, tag_name: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Element(ElementData::new(tag_name)))
    }

    /// Allocate a standalone text node, as `document.createTextNode` does.
    pub fn create_detached_text(&mut self, text: impl Into<String>) -> NodeId {
        self.alloc(NodeType::Text(text.into()))
    }

    /// Re-parent `child` as the last child of `parent`.
    ///
    /// If `child` already has a parent, it is atomically removed from that
    /// parent's child list first, so a node is never a member of two child
    /// lists at once.
    pub fn append_child(&mut self, parent: NodeId, child: NodeId) {
        self.detach(child);
        self.nodes[parent.0].children.push(child);
        self.nodes[child.0].parent = Some(parent);
    }

    /// Insert `child` into `parent`'s children, immediately before
    /// `reference`. `reference = None` appends at the end.
    ///
    /// If `reference` is `Some` but is not actually a child of `parent`,
    /// `child` is appended at the end.
    pub fn insert_before(&mut self, parent: NodeId, child: NodeId, reference: Option<NodeId>) {
        self.detach(child);
        let index = reference
            .and_then(|r| self.nodes[parent.0].children.iter().position(|&c| c == r));
        match index {
            Some(i) => self.nodes[parent.0].children.insert(i, child),
            None => self.nodes[parent.0].children.push(child),
        }
        self.nodes[child.0].parent = Some(parent);
    }

    /// Remove `child` from `parent`'s children and clear its parent pointer.
    /// `child`'s own subtree is untouched (only detached, not deallocated).
    ///
    /// No-op if `child` is not currently a child of `parent`.
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) {
        if let Some(node) = self.nodes.get_mut(parent.0) {
            node.children.retain(|&c| c != child);
        }
        if let Some(node) = self.nodes.get_mut(child.0)
            && node.parent == Some(parent)
        {
            node.parent = None;
        }
    }

    /// Detach `node` from its current parent, if any. No-op if it has none.
    pub fn detach(&mut self, node: NodeId) {
        if let Some(parent) = self.parent(node) {
            self.remove_child(parent, node);
        }
    }

    /// `node`'s position among its parent's children, or `None` if it has no
    /// parent (the root, or a detached node).
    #[must_use]
    pub fn index_in_parent(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).iter().position(|&c| c == node)
    }

    /// The parent of `node`, if any.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// `node`'s children, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map_or(&[], |n| n.children.as_slice())
    }

    /// First child of `node`.
    #[must_use]
    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).first().copied()
    }

    /// Last child of `node`.
    #[must_use]
    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.children(id).last().copied()
    }

    /// Sibling immediately following `node`, in its parent's child list.
    #[must_use]
    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let i = siblings.iter().position(|&c| c == id)?;
        siblings.get(i + 1).copied()
    }

    /// Sibling immediately preceding `node`, in its parent's child list.
    #[must_use]
    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.parent(id)?;
        let siblings = self.children(parent);
        let i = siblings.iter().position(|&c| c == id)?;
        i.checked_sub(1).and_then(|j| siblings.get(j).copied())
    }

    /// Whether `ancestor` is `node` itself or one of its ancestors
    /// (reflexive, per `Node.contains`).
    #[must_use]
    pub fn contains(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.parent(id);
        }
        false
    }

    /// Depth-first, pre-order iterator over all descendants of `id`
    /// (document order), not including `id` itself.
    #[must_use]
    pub fn descendants(&self, id: NodeId) -> DescendantIterator<'_> {
        DescendantIterator {
            tree: self,
            stack: self.children(id).iter().rev().copied().collect(),
        }
    }

    /// `id` followed by all of its descendants, in document order.
    #[must_use]
    pub fn iter_subtree(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::once(id).chain(self.descendants(id))
    }

    /// Get the attribute named `name` on `id`, if it is an element that has
    /// it set.
    #[must_use]
    pub fn get_attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.get(id)?.as_element()?.attrs.get(name).map(String::as_str)
    }

    /// Set the attribute named `name` to `value` on `id`. No-op if `id` is
    /// not an element.
    pub fn set_attribute(&mut self, id: NodeId, name: &str, value: impl Into<String>) {
        if let Some(element) = self.get_mut(id).and_then(Node::as_element_mut) {
            element.attrs.insert(name.to_string(), value.into());
        }
    }

    /// Whether `id` is an element with attribute `name` set.
    #[must_use]
    pub fn has_attribute(&self, id: NodeId, name: &str) -> bool {
        self.get_attribute(id, name).is_some()
    }

    /// Remove the attribute named `name` from `id`. No-op if absent.
    pub fn remove_attribute(&mut self, id: NodeId, name: &str) {
        if let Some(element) = self.get_mut(id).and_then(Node::as_element_mut) {
            element.attrs.shift_remove(name);
        }
    }

    /// Append `text` to `id`'s trailing text child, creating one if the
    /// last child is not already a text node.
    pub fn append_text(&mut self, id: NodeId, text: &str) {
        if let Some(&last) = self.children(id).last()
            && let Some(NodeType::Text(existing)) = self.get_mut(last).map(|n| &mut n.node_type)
        {
            existing.push_str(text);
            return;
        }
        let child = self.alloc(NodeType::Text(text.to_string()));
        self.append_child(id, child);
    }

    /// The concatenated text content of `id`'s subtree, as `textContent`
    /// reads it: every descendant text node's data, in document order, with
    /// no separators.
    #[must_use]
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        for descendant in self.iter_subtree(id) {
            if let Some(text) = self.get(descendant).and_then(Node::as_text) {
                out.push_str(text);
            }
        }
        out
    }

    /// Replace `id`'s children with a single text child containing `text`,
    /// as `textContent = ...` does.
    pub fn set_text_content(&mut self, id: NodeId, text: &str) {
        let children: Vec<NodeId> = self.children(id).to_vec();
        for child in children {
            self.remove_child(id, child);
        }
        if !text.is_empty() {
            let new_text = self.alloc(NodeType::Text(text.to_string()));
            self.append_child(id, new_text);
        }
    }

    /// Deep- or shallow-clone `id` into a newly allocated subtree, returning
    /// the new root's id. A shallow clone (`deep = false`) has no children;
    /// a deep clone shares no nodes with the original.
    pub fn clone_node(&mut self, id: NodeId, deep: bool) -> NodeId {
        let node_type = match &self.get(id).expect("clone_node: id exists").node_type {
            NodeType::Element(data) => NodeType::Element(data.clone()),
            NodeType::Text(s) => NodeType::Text(s.clone()),
            NodeType::Comment(s) => NodeType::Comment(s.clone()),
        };
        let clone = self.alloc(node_type);
        if deep {
            let children: Vec<NodeId> = self.children(id).to_vec();
            for child in children {
                let child_clone = self.clone_node(child, true);
                self.append_child(clone, child_clone);
            }
        }
        clone
    }

    /// Serialize `id`'s children as HTML (not including `id`'s own tag).
    #[must_use]
    pub fn serialize(&self, id: NodeId) -> String {
        let mut out = String::new();
        for &child in self.children(id) {
            self.serialize_outer_into(child, &mut out);
        }
        out
    }

    /// Serialize `id` and its subtree as HTML, including `id`'s own tag.
    #[must_use]
    pub fn serialize_outer(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.serialize_outer_into(id, &mut out);
        out
    }

    fn serialize_outer_into(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.get(id) else { return };
        match &node.node_type {
            NodeType::Text(text) => {
                out.push_str(&escape_text(text));
            }
            NodeType::Comment(text) => {
                let _ = write!(out, "<!--{text}-->");
            }
            NodeType::Element(data) => {
                let _ = write!(out, "<{}", data.tag_name);
                for (name, value) in &data.attrs {
                    let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
                }
                out.push('>');
                if is_void_element(&data.tag_name) {
                    return;
                }
                for &child in &node.children {
                    self.serialize_outer_into(child, out);
                }
                let _ = write!(out, "</{}>", data.tag_name);
            }
        }
    }
}

impl Default for DomTree {
    fn default() -> Self {
        Self::new()
    }
}

/// HTML void elements: self-closing, never carry children or a close tag.
#[must_use]
pub fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    value.replace('&', "&amp;").replace('"', "&quot;")
}

/// Iterator over all descendants of a node in document (pre-order) order.
pub struct DescendantIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for DescendantIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        self.stack.extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// Owns the root node tree plus the scripts and stylesheets extracted while
/// parsing it.
///
/// [§3 Document] "Owns the root node, an ordered list of extracted script
/// source strings, and an ordered list of stylesheet source strings."
#[derive(Debug, Clone)]
pub struct Document {
    /// The node tree; [`DomTree::root`] is the synthetic `document` element.
    pub tree: DomTree,
    /// Extracted `<script>` contents, in document order.
    pub scripts: Vec<String>,
    /// Stylesheet source text, from `<style>` tags and fetched
    /// `<link rel=stylesheet>` hrefs, in document order.
    pub stylesheets: Vec<String>,
    /// The base URL used to resolve relative resource URLs, if known
    /// (set from the CLI's network mode, or a `<base href>` element).
    pub base_url: Option<String>,
}

impl Document {
    /// An empty document: just the synthetic root, no scripts or sheets.
    #[must_use]
    pub fn new() -> Self {
        Self {
            tree: DomTree::new(),
            scripts: Vec::new(),
            stylesheets: Vec::new(),
            base_url: None,
        }
    }

    /// The document element: the first element child of the root whose tag
    /// is `html`, if any.
    #[must_use]
    pub fn document_element(&self) -> Option<NodeId> {
        self.tree
            .children(self.tree.root())
            .iter()
            .copied()
            .find(|&id| self.tree.get(id).and_then(Node::as_element).is_some_and(|e| e.tag_name == "html"))
    }

    /// The `<body>` element, if the document has an `<html>` with one.
    #[must_use]
    pub fn body(&self) -> Option<NodeId> {
        self.find_descendant_tag("body")
    }

    /// The `<head>` element, if the document has an `<html>` with one.
    #[must_use]
    pub fn head(&self) -> Option<NodeId> {
        self.find_descendant_tag("head")
    }

    fn find_descendant_tag(&self, tag: &str) -> Option<NodeId> {
        self.tree.iter_subtree(self.tree.root()).find(|&id| {
            self.tree
                .get(id)
                .and_then(Node::as_element)
                .is_some_and(|e| e.tag_name == tag)
        })
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn append_child_reparents_atomically() {
        let mut tree = DomTree::new();
        let a = tree.create_element(tree.root(), "a");
        let b = tree.create_element(tree.root(), "b");
        let child = tree.create_element(a, "child");

        assert_eq!(tree.parent(child), Some(a));
        tree.append_child(b, child);
        assert_eq!(tree.parent(child), Some(b));
        assert!(!tree.children(a).contains(&child));
        assert!(tree.children(b).contains(&child));
    }

    #[test]
    fn index_in_parent_matches_position() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let a = tree.create_element(root, "a");
        let b = tree.create_element(root, "b");
        let c = tree.create_element(root, "c");
        assert_eq!(tree.index_in_parent(a), Some(0));
        assert_eq!(tree.index_in_parent(b), Some(1));
        assert_eq!(tree.index_in_parent(c), Some(2));
    }

    #[test]
    fn clone_node_shallow_has_no_children() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        tree.set_attribute(div, "id", "x");
        let _child = tree.create_element(div, "span");

        let clone = tree.clone_node(div, false);
        assert!(tree.children(clone).is_empty());
        assert_eq!(tree.get_attribute(clone, "id"), Some("x"));
    }

    #[test]
    fn clone_node_deep_shares_no_nodes() {
        let mut tree = DomTree::new();
        let root = tree.root();
        let div = tree.create_element(root, "div");
        let child = tree.create_element(div, "span");
        tree.set_attribute(child, "id", "inner");

        let clone = tree.clone_node(div, true);
        let clone_child = tree.children(clone)[0];
        assert_ne!(clone_child, child);
        assert_eq!(tree.get_attribute(clone_child, "id"), Some("inner"));
    }

    #[test]
    fn set_then_get_attribute_round_trips() {
        let mut tree = DomTree::new();
        let div = tree.create_element(tree.root(), "div");
        tree.set_attribute(div, "data-x", "hello world");
        assert_eq!(tree.get_attribute(div, "data-x"), Some("hello world"));
    }

    #[test]
    fn contains_is_reflexive() {
        let mut tree = DomTree::new();
        let div = tree.create_element(tree.root(), "div");
        assert!(tree.contains(div, div));
        let child = tree.create_element(div, "span");
        assert!(tree.contains(div, child));
        assert!(!tree.contains(child, div));
    }

    #[test]
    fn serialize_outer_round_trips_simple_element() {
        let mut tree = DomTree::new();
        let div = tree.create_element(tree.root(), "div");
        tree.set_attribute(div, "class", "a");
        tree.append_text(div, "hi");
        assert_eq!(tree.serialize_outer(div), "<div class=\"a\">hi</div>");
    }

    #[test]
    fn void_elements_serialize_without_close_tag() {
        let mut tree = DomTree::new();
        let br = tree.create_element(tree.root(), "br");
        assert_eq!(tree.serialize_outer(br), "<br>");
    }

    #[test]
    fn append_text_extends_trailing_text_node() {
        let mut tree = DomTree::new();
        let div = tree.create_element(tree.root(), "div");
        tree.append_text(div, "a");
        tree.append_text(div, "b");
        assert_eq!(tree.children(div).len(), 1);
        assert_eq!(tree.text_content(div), "ab");
    }
}
