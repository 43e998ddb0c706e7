//! Building the JS proxy object for one DOM node.
//!
//! [§4.7 DOM scripting bridge] "On each element proxy: `tagName` ...
//! `querySelectorAll`." Every node this bridge hands back to script is one
//! of these proxies; [`build_node_proxy`] is the single entry point that
//! enforces the identity-cache invariant, regardless of which accessor or
//! method produced the `NodeId` in the first place.

use boa_engine::object::builtins::{JsArray, JsFunction};
use boa_engine::object::{FunctionObjectBuilder, JsObject};
use boa_engine::property::PropertyDescriptor;
use boa_engine::{Context, JsNativeError, JsResult, JsValue, NativeFunction, js_string};
use wisp_css::SelectorGroup;
use wisp_dom::{DomTree, Node, NodeId, NodeType};

use crate::class_list::build_class_list_proxy;
use crate::host::{Host, NavCtx, NodeBacking, backing_of};
use crate::style_proxy::build_style_proxy;

/// Look up (or build and cache) the proxy for `node`.
///
/// [§4.7] "Identity: two lookups of the same underlying node return the
/// same proxy value for the duration of one script execution."
pub(crate) fn build_node_proxy(context: &mut Context, host: &Host, node: NodeId) -> JsObject {
    if let Some(existing) = host.cache.borrow().get(&node) {
        return existing.clone();
    }
    let is_element = host.dom.borrow().get(node).is_some_and(Node::is_element);
    let obj = if is_element { build_element_object(context, host, node) } else { build_leaf_object(context, host, node) };
    host.cache.borrow_mut().insert(node, obj.clone());
    obj
}

pub(crate) fn to_js(context: &mut Context, host: &Host, node: NodeId) -> JsValue {
    build_node_proxy(context, host, node).into()
}

fn this_node(this: &JsValue) -> JsResult<NodeId> {
    backing_of(this).ok_or_else(|| JsNativeError::typ().with_message("not a wisp node").into())
}

fn native(context: &mut Context, name: &str, len: usize, f: NativeFunction) -> JsFunction {
    FunctionObjectBuilder::new(context.realm(), f).name(js_string!(name)).length(len as u32).build()
}

/// A bare object carrying [`NodeBacking`] as its native data, so any
/// accessor or method can recover `node` from `this` via [`backing_of`].
fn new_node_object(context: &mut Context, node: NodeId) -> JsObject {
    let proto = context.intrinsics().constructors().object().prototype();
    JsObject::from_proto_and_data(proto, NodeBacking(node))
}

fn define_accessor(obj: &JsObject, context: &mut Context, key: &str, get: Option<JsFunction>, set: Option<JsFunction>) {
    let mut builder = PropertyDescriptor::builder().enumerable(true).configurable(true);
    if let Some(g) = get {
        builder = builder.get(g);
    }
    if let Some(s) = set {
        builder = builder.set(s);
    }
    obj.define_property_or_throw(js_string!(key), builder.build(), context).expect("proxy property definition should not fail");
}

fn define_method(obj: &JsObject, context: &mut Context, key: &str, func: JsFunction) {
    obj.set(js_string!(key), func, true, context).expect("proxy method definition should not fail");
}

fn define_value(obj: &JsObject, context: &mut Context, key: &str, value: JsValue) {
    obj.set(js_string!(key), value, true, context).expect("proxy property definition should not fail");
}

fn arg_string(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    args.get(index).map_or_else(|| Ok(String::new()), |v| Ok(v.to_string(context)?.to_std_string_escaped()))
}

fn arg_node(args: &[JsValue], index: usize) -> JsResult<NodeId> {
    args.get(index).and_then(backing_of).ok_or_else(|| JsNativeError::typ().with_message("expected a wisp node argument").into())
}

fn node_list(context: &mut Context, host: &Host, ids: &[NodeId]) -> JsResult<JsValue> {
    let values: Vec<JsValue> = ids.iter().map(|&id| to_js(context, host, id)).collect();
    Ok(JsArray::from_iter(values, context).into())
}

fn is_element(tree: &DomTree, id: NodeId) -> bool {
    tree.get(id).is_some_and(Node::is_element)
}

// ---------------------------------------------------------------------
// Navigation (shared across parentNode/parentElement/firstChild/...).
// ---------------------------------------------------------------------

fn nav_parent(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.parent(node)
}
fn nav_parent_element(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.parent(node).filter(|&p| is_element(tree, p))
}
fn nav_first_child(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.first_child(node)
}
fn nav_last_child(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.last_child(node)
}
fn nav_first_element_child(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.children(node).iter().copied().find(|&c| is_element(tree, c))
}
fn nav_last_element_child(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.children(node).iter().copied().rev().find(|&c| is_element(tree, c))
}
fn nav_next_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.next_sibling(node)
}
fn nav_previous_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    tree.prev_sibling(node)
}
fn nav_next_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut cur = tree.next_sibling(node);
    while let Some(c) = cur {
        if is_element(tree, c) {
            return Some(c);
        }
        cur = tree.next_sibling(c);
    }
    None
}
fn nav_previous_element_sibling(tree: &DomTree, node: NodeId) -> Option<NodeId> {
    let mut cur = tree.prev_sibling(node);
    while let Some(c) = cur {
        if is_element(tree, c) {
            return Some(c);
        }
        cur = tree.prev_sibling(c);
    }
    None
}

fn nav_function(context: &mut Context, host: &Host, key: &str, nav: fn(&DomTree, NodeId) -> Option<NodeId>) -> JsFunction {
    let f = NativeFunction::from_copy_closure_with_captures(
        |this, _args, ctx: &mut NavCtx, context| -> JsResult<JsValue> {
            let node = this_node(this)?;
            let target = {
                let tree = ctx.host.dom.borrow();
                (ctx.nav)(&tree, node)
            };
            Ok(match target {
                Some(id) => to_js(context, &ctx.host, id),
                None => JsValue::null(),
            })
        },
        NavCtx { host: host.clone(), nav },
    );
    native(context, &format!("get {key}"), 0, f)
}

// ---------------------------------------------------------------------
// String accessors computed from the tree.
// ---------------------------------------------------------------------

fn tag_name(tree: &DomTree, node: NodeId) -> String {
    tree.get(node).and_then(Node::as_element).map_or_else(String::new, |e| e.tag_name.to_ascii_uppercase())
}

fn node_name(tree: &DomTree, node: NodeId) -> String {
    match &tree.get(node).unwrap().node_type {
        NodeType::Element(e) => e.tag_name.to_ascii_uppercase(),
        NodeType::Text(_) => "#text".to_string(),
        NodeType::Comment(_) => "#comment".to_string(),
    }
}

fn class_name(tree: &DomTree, node: NodeId) -> String {
    tree.get_attribute(node, "class").unwrap_or_default().to_string()
}

fn string_accessor_function(context: &mut Context, host: &Host, key: &str, get: fn(&DomTree, NodeId) -> String) -> JsFunction {
    let f = NativeFunction::from_copy_closure_with_captures(
        move |this, _args, host: &mut Host, _context| -> JsResult<JsValue> {
            let node = this_node(this)?;
            let tree = host.dom.borrow();
            Ok(JsValue::from(js_string!(get(&tree, node).as_str())))
        },
        host.clone(),
    );
    native(context, &format!("get {key}"), 0, f)
}

fn node_type_code(tree: &DomTree, node: NodeId) -> i32 {
    match &tree.get(node).unwrap().node_type {
        NodeType::Element(_) => 1,
        NodeType::Text(_) => 3,
        NodeType::Comment(_) => 8,
    }
}

fn node_value(tree: &DomTree, node: NodeId) -> JsValue {
    match &tree.get(node).unwrap().node_type {
        NodeType::Text(t) | NodeType::Comment(t) => JsValue::from(js_string!(t.as_str())),
        NodeType::Element(_) => JsValue::null(),
    }
}

fn node_type_function(context: &mut Context, host: &Host) -> JsFunction {
    let f = NativeFunction::from_copy_closure_with_captures(
        |this, _args, host: &mut Host, _context| -> JsResult<JsValue> {
            let node = this_node(this)?;
            Ok(JsValue::from(node_type_code(&host.dom.borrow(), node)))
        },
        host.clone(),
    );
    native(context, "get nodeType", 0, f)
}

fn node_value_function(context: &mut Context, host: &Host) -> JsFunction {
    let f = NativeFunction::from_copy_closure_with_captures(
        |this, _args, host: &mut Host, _context| -> JsResult<JsValue> { Ok(node_value(&host.dom.borrow(), this_node(this)?)) },
        host.clone(),
    );
    native(context, "get nodeValue", 0, f)
}

// ---------------------------------------------------------------------
// Attribute methods.
// ---------------------------------------------------------------------

fn get_attribute(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let name = arg_string(args, 0, context)?;
    let tree = host.dom.borrow();
    Ok(tree.get_attribute(node, &name).map_or_else(JsValue::null, |v| JsValue::from(js_string!(v))))
}

fn set_attribute(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let name = arg_string(args, 0, context)?;
    let value = arg_string(args, 1, context)?;
    host.dom.borrow_mut().set_attribute(node, &name, value);
    Ok(JsValue::undefined())
}

fn has_attribute(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let name = arg_string(args, 0, context)?;
    Ok(JsValue::from(host.dom.borrow().has_attribute(node, &name)))
}

fn remove_attribute(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let name = arg_string(args, 0, context)?;
    host.dom.borrow_mut().remove_attribute(node, &name);
    Ok(JsValue::undefined())
}

// ---------------------------------------------------------------------
// textContent / innerHTML / outerHTML.
// ---------------------------------------------------------------------

fn get_text_content(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(js_string!(host.dom.borrow().text_content(node).as_str())))
}

fn set_text_content(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let text = arg_string(args, 0, context)?;
    host.dom.borrow_mut().set_text_content(node, &text);
    Ok(JsValue::undefined())
}

fn get_inner_html(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let tree = host.dom.borrow();
    let html: String = tree.children(node).iter().map(|&c| tree.serialize_outer(c)).collect();
    Ok(JsValue::from(js_string!(html.as_str())))
}

/// [§4.7] "`innerHTML` set: clears existing children and reparses the
/// supplied string as a fragment, adopting its children."
fn set_inner_html(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let html = arg_string(args, 0, context)?;
    let mut tree = host.dom.borrow_mut();
    for child in tree.children(node).to_vec() {
        tree.remove_child(node, child);
    }
    let _ = wisp_html::parse_fragment(&mut tree, node, &html);
    Ok(JsValue::undefined())
}

fn get_outer_html(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(js_string!(host.dom.borrow().serialize_outer(node).as_str())))
}

// ---------------------------------------------------------------------
// children / childNodes / childElementCount.
// ---------------------------------------------------------------------

fn get_child_nodes(this: &JsValue, _args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let ids = host.dom.borrow().children(node).to_vec();
    node_list(context, host, &ids)
}

fn get_children(this: &JsValue, _args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let ids: Vec<NodeId> = {
        let tree = host.dom.borrow();
        tree.children(node).iter().copied().filter(|&c| is_element(&tree, c)).collect()
    };
    node_list(context, host, &ids)
}

fn get_child_element_count(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let tree = host.dom.borrow();
    let count = tree.children(node).iter().filter(|&&c| is_element(&tree, c)).count();
    Ok(JsValue::from(i32::try_from(count).unwrap_or(i32::MAX)))
}

fn has_child_nodes(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(!host.dom.borrow().children(node).is_empty()))
}

// ---------------------------------------------------------------------
// Tree mutation methods.
// ---------------------------------------------------------------------

fn append_child(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let child = arg_node(args, 0)?;
    host.dom.borrow_mut().append_child(node, child);
    Ok(to_js(context, host, child))
}

fn remove_child(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let child = arg_node(args, 0)?;
    host.dom.borrow_mut().remove_child(node, child);
    Ok(to_js(context, host, child))
}

fn insert_before(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let child = arg_node(args, 0)?;
    let reference = args.get(1).and_then(backing_of);
    host.dom.borrow_mut().insert_before(node, child, reference);
    Ok(to_js(context, host, child))
}

fn append(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    for arg in args {
        if let Some(child) = backing_of(arg) {
            tree.append_child(node, child);
        }
    }
    Ok(JsValue::undefined())
}

fn prepend(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let first = tree.first_child(node);
    for arg in args {
        if let Some(child) = backing_of(arg) {
            tree.insert_before(node, child, first);
        }
    }
    Ok(JsValue::undefined())
}

fn before(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let Some(parent) = tree.parent(node) else { return Ok(JsValue::undefined()) };
    for arg in args {
        if let Some(sibling) = backing_of(arg) {
            tree.insert_before(parent, sibling, Some(node));
        }
    }
    Ok(JsValue::undefined())
}

fn after(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let Some(parent) = tree.parent(node) else { return Ok(JsValue::undefined()) };
    let reference = tree.next_sibling(node);
    for arg in args {
        if let Some(sibling) = backing_of(arg) {
            tree.insert_before(parent, sibling, reference);
        }
    }
    Ok(JsValue::undefined())
}

fn replace_with(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let Some(parent) = tree.parent(node) else { return Ok(JsValue::undefined()) };
    let reference = tree.next_sibling(node);
    for arg in args {
        if let Some(sibling) = backing_of(arg) {
            tree.insert_before(parent, sibling, reference);
        }
    }
    tree.remove_child(parent, node);
    Ok(JsValue::undefined())
}

fn replace_children(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    for child in tree.children(node).to_vec() {
        tree.remove_child(node, child);
    }
    for arg in args {
        if let Some(child) = backing_of(arg) {
            tree.append_child(node, child);
        }
    }
    Ok(JsValue::undefined())
}

fn remove(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    host.dom.borrow_mut().detach(node);
    Ok(JsValue::undefined())
}

fn clone_node_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let deep = args.first().is_some_and(JsValue::to_boolean);
    let clone = host.dom.borrow_mut().clone_node(node, deep);
    Ok(to_js(context, host, clone))
}

fn contains_method(this: &JsValue, args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(arg_node(args, 0).is_ok_and(|other| host.dom.borrow().contains(node, other))))
}

// ---------------------------------------------------------------------
// Selector matching and queries.
// ---------------------------------------------------------------------

pub(crate) fn selector_matches(tree: &DomTree, node: NodeId, selectors: &str) -> bool {
    SelectorGroup::parse(selectors).matches(tree, node)
}

fn matches_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let selectors = arg_string(args, 0, context)?;
    Ok(JsValue::from(selector_matches(&host.dom.borrow(), node, &selectors)))
}

fn closest_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let selectors = arg_string(args, 0, context)?;
    let found = {
        let tree = host.dom.borrow();
        let mut cur = Some(node);
        loop {
            match cur {
                Some(id) if is_element(&tree, id) && selector_matches(&tree, id, &selectors) => break Some(id),
                Some(id) => cur = tree.parent(id),
                None => break None,
            }
        }
    };
    Ok(found.map_or(JsValue::null(), |id| to_js(context, host, id)))
}

pub(crate) fn elements_by_tag_name(tree: &DomTree, root: NodeId, tag: &str) -> Vec<NodeId> {
    tree.descendants(root)
        .filter(|&id| tree.get(id).and_then(Node::as_element).is_some_and(|e| tag == "*" || e.tag_name.eq_ignore_ascii_case(tag)))
        .collect()
}

pub(crate) fn elements_by_class_name(tree: &DomTree, root: NodeId, class_names: &str) -> Vec<NodeId> {
    let wanted: Vec<&str> = class_names.split_ascii_whitespace().collect();
    tree.descendants(root)
        .filter(|&id| tree.get(id).and_then(Node::as_element).is_some_and(|e| wanted.iter().all(|w| e.class_list().contains(w))))
        .collect()
}

pub(crate) fn query_selector_all(tree: &DomTree, root: NodeId, selectors: &str) -> Vec<NodeId> {
    let group = SelectorGroup::parse(selectors);
    tree.descendants(root).filter(|&id| group.matches(tree, id)).collect()
}

fn get_elements_by_tag_name(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let tag = arg_string(args, 0, context)?;
    let ids = elements_by_tag_name(&host.dom.borrow(), node, &tag);
    node_list(context, host, &ids)
}

fn get_elements_by_class_name(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let class_names = arg_string(args, 0, context)?;
    let ids = elements_by_class_name(&host.dom.borrow(), node, &class_names);
    node_list(context, host, &ids)
}

fn query_selector_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let selectors = arg_string(args, 0, context)?;
    let found = query_selector_all(&host.dom.borrow(), node, &selectors).into_iter().next();
    Ok(found.map_or(JsValue::null(), |id| to_js(context, host, id)))
}

fn query_selector_all_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let selectors = arg_string(args, 0, context)?;
    let ids = query_selector_all(&host.dom.borrow(), node, &selectors);
    node_list(context, host, &ids)
}

// ---------------------------------------------------------------------
// Object assembly.
// ---------------------------------------------------------------------

/// A `(name, arity, implementation)` triple for a plain method.
type MethodEntry = (&'static str, usize, fn(&JsValue, &[JsValue], &mut Host, &mut Context) -> JsResult<JsValue>);

const ELEMENT_METHODS: &[MethodEntry] = &[
    ("getAttribute", 1, get_attribute),
    ("setAttribute", 2, set_attribute),
    ("hasAttribute", 1, has_attribute),
    ("removeAttribute", 1, remove_attribute),
    ("appendChild", 1, append_child),
    ("removeChild", 1, remove_child),
    ("insertBefore", 2, insert_before),
    ("append", 0, append),
    ("prepend", 0, prepend),
    ("before", 0, before),
    ("after", 0, after),
    ("replaceWith", 0, replace_with),
    ("replaceChildren", 0, replace_children),
    ("remove", 0, remove),
    ("cloneNode", 0, clone_node_method),
    ("contains", 1, contains_method),
    ("hasChildNodes", 0, has_child_nodes),
    ("matches", 1, matches_method),
    ("closest", 1, closest_method),
    ("getElementsByTagName", 1, get_elements_by_tag_name),
    ("getElementsByClassName", 1, get_elements_by_class_name),
    ("querySelector", 1, query_selector_method),
    ("querySelectorAll", 1, query_selector_all_method),
];

const LEAF_METHODS: &[MethodEntry] = &[("remove", 0, remove), ("cloneNode", 0, clone_node_method)];

fn method_function(context: &mut Context, host: &Host, name: &str, len: usize, f: fn(&JsValue, &[JsValue], &mut Host, &mut Context) -> JsResult<JsValue>) -> JsFunction {
    let native_fn = NativeFunction::from_copy_closure_with_captures(move |this, args, host: &mut Host, context| f(this, args, host, context), host.clone());
    native(context, name, len, native_fn)
}

fn build_element_object(context: &mut Context, host: &Host, node: NodeId) -> JsObject {
    let obj = new_node_object(context, node);

    let tag_name_fn = string_accessor_function(context, host, "tagName", tag_name);
    define_accessor(&obj, context, "tagName", Some(tag_name_fn), None);
    let node_name_fn = string_accessor_function(context, host, "nodeName", node_name);
    define_accessor(&obj, context, "nodeName", Some(node_name_fn), None);
    define_accessor(&obj, context, "nodeType", Some(node_type_function(context, host)), None);
    define_accessor(&obj, context, "nodeValue", Some(node_value_function(context, host)), None);

    let class_name_get = string_accessor_function(context, host, "className", class_name);
    let class_name_set = {
        let f = NativeFunction::from_copy_closure_with_captures(
            |this, args, host: &mut Host, context| -> JsResult<JsValue> {
                let node = this_node(this)?;
                let value = arg_string(args, 0, context)?;
                host.dom.borrow_mut().set_attribute(node, "class", value);
                Ok(JsValue::undefined())
            },
            host.clone(),
        );
        native(context, "set className", 1, f)
    };
    define_accessor(&obj, context, "className", Some(class_name_get), Some(class_name_set));

    let text_content_get = native(context, "get textContent", 0, NativeFunction::from_copy_closure_with_captures(get_text_content, host.clone()));
    let text_content_set = native(context, "set textContent", 1, NativeFunction::from_copy_closure_with_captures(set_text_content, host.clone()));
    define_accessor(&obj, context, "textContent", Some(text_content_get), Some(text_content_set));

    let inner_html_get = native(context, "get innerHTML", 0, NativeFunction::from_copy_closure_with_captures(get_inner_html, host.clone()));
    let inner_html_set = native(context, "set innerHTML", 1, NativeFunction::from_copy_closure_with_captures(set_inner_html, host.clone()));
    define_accessor(&obj, context, "innerHTML", Some(inner_html_get), Some(inner_html_set));

    let outer_html_get = native(context, "get outerHTML", 0, NativeFunction::from_copy_closure_with_captures(get_outer_html, host.clone()));
    define_accessor(&obj, context, "outerHTML", Some(outer_html_get), None);

    let child_nodes_fn = native(context, "get childNodes", 0, NativeFunction::from_copy_closure_with_captures(get_child_nodes, host.clone()));
    define_accessor(&obj, context, "childNodes", Some(child_nodes_fn), None);
    let children_fn = native(context, "get children", 0, NativeFunction::from_copy_closure_with_captures(get_children, host.clone()));
    define_accessor(&obj, context, "children", Some(children_fn), None);
    let child_element_count_fn = native(context, "get childElementCount", 0, NativeFunction::from_copy_closure_with_captures(get_child_element_count, host.clone()));
    define_accessor(&obj, context, "childElementCount", Some(child_element_count_fn), None);

    define_accessor(&obj, context, "parentNode", Some(nav_function(context, host, "parentNode", nav_parent)), None);
    define_accessor(&obj, context, "parentElement", Some(nav_function(context, host, "parentElement", nav_parent_element)), None);
    define_accessor(&obj, context, "firstChild", Some(nav_function(context, host, "firstChild", nav_first_child)), None);
    define_accessor(&obj, context, "lastChild", Some(nav_function(context, host, "lastChild", nav_last_child)), None);
    define_accessor(&obj, context, "firstElementChild", Some(nav_function(context, host, "firstElementChild", nav_first_element_child)), None);
    define_accessor(&obj, context, "lastElementChild", Some(nav_function(context, host, "lastElementChild", nav_last_element_child)), None);
    define_accessor(&obj, context, "nextSibling", Some(nav_function(context, host, "nextSibling", nav_next_sibling)), None);
    define_accessor(&obj, context, "previousSibling", Some(nav_function(context, host, "previousSibling", nav_previous_sibling)), None);
    define_accessor(&obj, context, "nextElementSibling", Some(nav_function(context, host, "nextElementSibling", nav_next_element_sibling)), None);
    define_accessor(&obj, context, "previousElementSibling", Some(nav_function(context, host, "previousElementSibling", nav_previous_element_sibling)), None);

    let style_proxy = build_style_proxy(context, host, node);
    define_value(&obj, context, "style", style_proxy.into());
    let class_list_proxy = build_class_list_proxy(context, host, node);
    define_value(&obj, context, "classList", class_list_proxy.into());

    for &(name, len, f) in ELEMENT_METHODS {
        define_method(&obj, context, name, method_function(context, host, name, len, f));
    }

    obj
}

fn build_leaf_object(context: &mut Context, host: &Host, node: NodeId) -> JsObject {
    let obj = new_node_object(context, node);

    define_accessor(&obj, context, "nodeType", Some(node_type_function(context, host)), None);
    let node_name_fn = string_accessor_function(context, host, "nodeName", node_name);
    define_accessor(&obj, context, "nodeName", Some(node_name_fn), None);
    define_accessor(&obj, context, "nodeValue", Some(node_value_function(context, host)), None);

    let text_content_get = native(context, "get textContent", 0, NativeFunction::from_copy_closure_with_captures(get_text_content, host.clone()));
    let text_content_set = native(context, "set textContent", 1, NativeFunction::from_copy_closure_with_captures(set_text_content, host.clone()));
    define_accessor(&obj, context, "textContent", Some(text_content_get), Some(text_content_set));

    define_accessor(&obj, context, "parentNode", Some(nav_function(context, host, "parentNode", nav_parent)), None);
    define_accessor(&obj, context, "nextSibling", Some(nav_function(context, host, "nextSibling", nav_next_sibling)), None);
    define_accessor(&obj, context, "previousSibling", Some(nav_function(context, host, "previousSibling", nav_previous_sibling)), None);

    for &(name, len, f) in LEAF_METHODS {
        define_method(&obj, context, name, method_function(context, host, name, len, f));
    }

    obj
}
