//! The global `document` object.
//!
//! Supersedes the teacher's unimplemented `globals::register_document`
//! stub: that stub's own TODO comments ("a real implementation would...
//! wrap the dom crate's Node type... expose getElementById etc.") are the
//! grounding for everything built here.

use boa_engine::object::builtins::JsFunction;
use boa_engine::object::{FunctionObjectBuilder, ObjectInitializer};
use boa_engine::property::Attribute;
use boa_engine::{Context, JsResult, JsValue, NativeFunction, js_string};
use wisp_dom::{Node, NodeId};

use crate::host::Host;
use crate::node_proxy::{elements_by_class_name, elements_by_tag_name, query_selector_all, to_js};

fn arg_string(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    args.get(index).map_or_else(|| Ok(String::new()), |v| Ok(v.to_string(context)?.to_std_string_escaped()))
}

fn node_list(context: &mut Context, host: &Host, ids: &[NodeId]) -> JsResult<JsValue> {
    let values: Vec<JsValue> = ids.iter().map(|&id| to_js(context, host, id)).collect();
    Ok(boa_engine::object::builtins::JsArray::from_iter(values, context).into())
}

fn find_by_tag(host: &Host, tag: &str) -> Option<NodeId> {
    let tree = host.dom.borrow();
    let root = tree.root();
    elements_by_tag_name(&tree, root, tag).into_iter().next()
}

fn get_element_by_id(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let id = arg_string(args, 0, context)?;
    let found = {
        let tree = host.dom.borrow();
        let root = tree.root();
        tree.descendants(root).find(|&n| tree.get(n).and_then(Node::as_element).and_then(wisp_dom::ElementData::id) == Some(id.as_str()))
    };
    Ok(found.map_or(JsValue::null(), |id| to_js(context, host, id)))
}

fn get_elements_by_tag_name(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let tag = arg_string(args, 0, context)?;
    let ids = {
        let tree = host.dom.borrow();
        let root = tree.root();
        elements_by_tag_name(&tree, root, &tag)
    };
    node_list(context, host, &ids)
}

fn get_elements_by_class_name(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let class_names = arg_string(args, 0, context)?;
    let ids = {
        let tree = host.dom.borrow();
        let root = tree.root();
        elements_by_class_name(&tree, root, &class_names)
    };
    node_list(context, host, &ids)
}

fn query_selector(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let selectors = arg_string(args, 0, context)?;
    let found = {
        let tree = host.dom.borrow();
        let root = tree.root();
        query_selector_all(&tree, root, &selectors).into_iter().next()
    };
    Ok(found.map_or(JsValue::null(), |id| to_js(context, host, id)))
}

fn query_selector_all_fn(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let selectors = arg_string(args, 0, context)?;
    let ids = {
        let tree = host.dom.borrow();
        let root = tree.root();
        query_selector_all(&tree, root, &selectors)
    };
    node_list(context, host, &ids)
}

fn create_element(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let tag = arg_string(args, 0, context)?;
    let id = host.dom.borrow_mut().create_detached_element(tag);
    Ok(to_js(context, host, id))
}

fn create_text_node(_this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let text = arg_string(args, 0, context)?;
    let id = host.dom.borrow_mut().create_detached_text(text);
    Ok(to_js(context, host, id))
}

fn native(context: &mut Context, name: &str, len: usize, f: NativeFunction) -> JsFunction {
    FunctionObjectBuilder::new(context.realm(), f).name(js_string!(name)).length(len as u32).build()
}

fn property_fn(context: &mut Context, host: &Host, tag: &str) -> JsFunction {
    let tag = tag.to_string();
    let f = NativeFunction::from_copy_closure_with_captures(
        move |_this, _args, host: &mut Host, context| -> JsResult<JsValue> { Ok(find_by_tag(host, &tag).map_or(JsValue::null(), |id| to_js(context, host, id))) },
        host.clone(),
    );
    native(context, &format!("get {tag}"), 0, f)
}

fn document_element_fn(context: &mut Context, host: &Host) -> JsFunction {
    let f = NativeFunction::from_copy_closure_with_captures(
        |_this, _args, host: &mut Host, context| -> JsResult<JsValue> {
            let tree = host.dom.borrow();
            let first = tree.first_child(tree.root());
            drop(tree);
            Ok(first.map_or(JsValue::null(), |id| to_js(context, host, id)))
        },
        host.clone(),
    );
    native(context, "get documentElement", 0, f)
}

/// Register the `document` global on `context`.
pub(crate) fn register_document(context: &mut Context, host: &Host) {
    let get_element_by_id_fn = native(context, "getElementById", 1, NativeFunction::from_copy_closure_with_captures(get_element_by_id, host.clone()));
    let get_elements_by_tag_name_fn = native(context, "getElementsByTagName", 1, NativeFunction::from_copy_closure_with_captures(get_elements_by_tag_name, host.clone()));
    let get_elements_by_class_name_fn = native(context, "getElementsByClassName", 1, NativeFunction::from_copy_closure_with_captures(get_elements_by_class_name, host.clone()));
    let query_selector_fn = native(context, "querySelector", 1, NativeFunction::from_copy_closure_with_captures(query_selector, host.clone()));
    let query_selector_all_fn_native = native(context, "querySelectorAll", 1, NativeFunction::from_copy_closure_with_captures(query_selector_all_fn, host.clone()));
    let create_element_fn = native(context, "createElement", 1, NativeFunction::from_copy_closure_with_captures(create_element, host.clone()));
    let create_text_node_fn = native(context, "createTextNode", 1, NativeFunction::from_copy_closure_with_captures(create_text_node, host.clone()));

    let body_get = property_fn(context, host, "body");
    let head_get = property_fn(context, host, "head");
    let document_element_get = document_element_fn(context, host);

    let document = ObjectInitializer::new(context)
        .function(get_element_by_id_fn, js_string!("getElementById"), 1)
        .function(get_elements_by_tag_name_fn, js_string!("getElementsByTagName"), 1)
        .function(get_elements_by_class_name_fn, js_string!("getElementsByClassName"), 1)
        .function(query_selector_fn, js_string!("querySelector"), 1)
        .function(query_selector_all_fn_native, js_string!("querySelectorAll"), 1)
        .function(create_element_fn, js_string!("createElement"), 1)
        .function(create_text_node_fn, js_string!("createTextNode"), 1)
        .accessor(js_string!("body"), Some(body_get), None, Attribute::ENUMERABLE)
        .accessor(js_string!("head"), Some(head_get), None, Attribute::ENUMERABLE)
        .accessor(js_string!("documentElement"), Some(document_element_get), None, Attribute::ENUMERABLE)
        .build();

    context.register_global_property(js_string!("document"), document, Attribute::all()).expect("document global should not already exist");
}
