//! `element.classList`: a `DOMTokenList` view over the `class` attribute.
//!
//! [§4.7] "`classList` supports `add`, `remove`, `toggle`, `contains`."
//! Tokens live nowhere but the attribute itself, split on ASCII
//! whitespace; every method reads the current token list, mutates it, and
//! re-joins it back into `class`.

use boa_engine::object::builtins::JsFunction;
use boa_engine::object::{FunctionObjectBuilder, JsObject};
use boa_engine::property::PropertyDescriptor;
use boa_engine::{Context, JsNativeError, JsResult, JsValue, NativeFunction, js_string};
use wisp_dom::{DomTree, NodeId};

use crate::host::{Host, NodeBacking, backing_of};

fn tokens(tree: &DomTree, node: NodeId) -> Vec<String> {
    tree.get_attribute(node, "class").map(|v| v.split_ascii_whitespace().map(str::to_string).collect()).unwrap_or_default()
}

fn set_tokens(tree: &mut DomTree, node: NodeId, tokens: &[String]) {
    tree.set_attribute(node, "class", tokens.join(" "));
}

fn this_node(this: &JsValue) -> JsResult<NodeId> {
    backing_of(this).ok_or_else(|| JsNativeError::typ().with_message("not a wisp classList object").into())
}

fn arg_string(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    args.get(index).map_or_else(|| Ok(String::new()), |v| Ok(v.to_string(context)?.to_std_string_escaped()))
}

fn add(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let mut list = tokens(&tree, node);
    for arg in args {
        let token = arg.to_string(context)?.to_std_string_escaped();
        if !list.contains(&token) {
            list.push(token);
        }
    }
    set_tokens(&mut tree, node, &list);
    Ok(JsValue::undefined())
}

fn remove(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let mut tree = host.dom.borrow_mut();
    let mut list = tokens(&tree, node);
    for arg in args {
        let token = arg.to_string(context)?.to_std_string_escaped();
        list.retain(|t| t != &token);
    }
    set_tokens(&mut tree, node, &list);
    Ok(JsValue::undefined())
}

fn contains(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let token = arg_string(args, 0, context)?;
    Ok(JsValue::from(tokens(&host.dom.borrow(), node).iter().any(|t| t == &token)))
}

/// `toggle(token, force?)`: adds when absent (or `force == true`), removes
/// when present (or `force == false`). Returns whether the token is
/// present afterward.
fn toggle(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let token = arg_string(args, 0, context)?;
    let force = args.get(1).filter(|v| !v.is_undefined()).map(JsValue::to_boolean);
    let mut tree = host.dom.borrow_mut();
    let mut list = tokens(&tree, node);
    let present = list.iter().any(|t| t == &token);
    let want_present = force.unwrap_or(!present);
    if want_present && !present {
        list.push(token);
    } else if !want_present && present {
        list.retain(|t| t != &token);
    }
    set_tokens(&mut tree, node, &list);
    Ok(JsValue::from(want_present))
}

fn replace(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let old_token = arg_string(args, 0, context)?;
    let new_token = arg_string(args, 1, context)?;
    let mut tree = host.dom.borrow_mut();
    let mut list = tokens(&tree, node);
    let mut replaced = false;
    for t in &mut list {
        if *t == old_token {
            *t = new_token.clone();
            replaced = true;
        }
    }
    set_tokens(&mut tree, node, &list);
    Ok(JsValue::from(replaced))
}

fn item(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let index = args.first().map(|v| v.to_number(context)).transpose()?.unwrap_or(0.0);
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let index = if index.is_finite() && index >= 0.0 { index as usize } else { usize::MAX };
    Ok(tokens(&host.dom.borrow(), node).get(index).map_or_else(JsValue::null, |t| JsValue::from(js_string!(t.as_str()))))
}

fn to_string_method(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(js_string!(host.dom.borrow().get_attribute(node, "class").unwrap_or_default())))
}

fn get_length(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(i32::try_from(tokens(&host.dom.borrow(), node).len()).unwrap_or(i32::MAX)))
}

fn get_value(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    Ok(JsValue::from(js_string!(host.dom.borrow().get_attribute(node, "class").unwrap_or_default())))
}

fn set_value(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let value = arg_string(args, 0, context)?;
    host.dom.borrow_mut().set_attribute(node, "class", value);
    Ok(JsValue::undefined())
}

fn native(context: &mut Context, name: &str, len: usize, f: NativeFunction) -> JsFunction {
    FunctionObjectBuilder::new(context.realm(), f).name(js_string!(name)).length(len as u32).build()
}

fn define_accessor(obj: &JsObject, context: &mut Context, key: &str, get: JsFunction, set: Option<JsFunction>) {
    let mut builder = PropertyDescriptor::builder().enumerable(true).configurable(true).get(get);
    if let Some(s) = set {
        builder = builder.set(s);
    }
    obj.define_property_or_throw(js_string!(key), builder.build(), context).expect("classList property definition should not fail");
}

fn define_method(obj: &JsObject, context: &mut Context, key: &str, len: usize, f: fn(&JsValue, &[JsValue], &mut Host, &mut Context) -> JsResult<JsValue>, host: &Host) {
    let func = native(context, key, len, NativeFunction::from_copy_closure_with_captures(f, host.clone()));
    obj.set(js_string!(key), func, true, context).expect("classList method definition should not fail");
}

/// Build the `classList` proxy for `node`, backed by [`NodeBacking`].
pub(crate) fn build_class_list_proxy(context: &mut Context, host: &Host, node: NodeId) -> JsObject {
    let proto = context.intrinsics().constructors().object().prototype();
    let obj = JsObject::from_proto_and_data(proto, NodeBacking(node));

    let length_get = native(context, "get length", 0, NativeFunction::from_copy_closure_with_captures(get_length, host.clone()));
    define_accessor(&obj, context, "length", length_get, None);
    let value_get = native(context, "get value", 0, NativeFunction::from_copy_closure_with_captures(get_value, host.clone()));
    let value_set = native(context, "set value", 1, NativeFunction::from_copy_closure_with_captures(set_value, host.clone()));
    define_accessor(&obj, context, "value", value_get, Some(value_set));

    define_method(&obj, context, "add", 0, add, host);
    define_method(&obj, context, "remove", 0, remove, host);
    define_method(&obj, context, "contains", 1, contains, host);
    define_method(&obj, context, "toggle", 1, toggle, host);
    define_method(&obj, context, "replace", 2, replace, host);
    define_method(&obj, context, "item", 1, item, host);
    define_method(&obj, context, "toString", 0, to_string_method, host);

    obj
}
