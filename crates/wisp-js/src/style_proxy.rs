//! `element.style`: a view onto the `style="…"` inline attribute.
//!
//! [§4.7] "`style` get/set properties map camelCase (`backgroundColor`) to
//! the kebab-case CSS property (`background-color`); `cssFloat` maps to
//! `float`." Declarations live nowhere but the attribute itself: every
//! read reparses it, every write re-serializes it back, via
//! [`wisp_css::declarations`].

use boa_engine::object::builtins::JsFunction;
use boa_engine::object::{FunctionObjectBuilder, JsObject};
use boa_engine::property::PropertyDescriptor;
use boa_engine::{Context, JsResult, JsValue, NativeFunction, js_string};
use wisp_css::declarations::{parse_declarations, serialize_declarations};
use wisp_dom::{DomTree, NodeId};

use crate::host::{Host, NodeBacking, backing_of};

/// Common longhand properties exposed as camelCase accessors, beyond the
/// generic `getPropertyValue`/`setProperty` pair every property supports.
/// Each name's kebab-case CSS property is derived by [`kebab_for`]; this
/// list only needs to name which properties get a dot accessor, not spell
/// out both forms.
const CAMEL_PROPERTIES: &[&str] = &[
    "color",
    "backgroundColor",
    "backgroundImage",
    "backgroundRepeat",
    "backgroundAttachment",
    "backgroundPosition",
    "width",
    "height",
    "display",
    "position",
    "top",
    "right",
    "bottom",
    "left",
    "zIndex",
    "opacity",
    "cssFloat",
    "clear",
    "fontSize",
    "fontFamily",
    "fontWeight",
    "textAlign",
    "lineHeight",
    "transform",
    "marginTop",
    "marginRight",
    "marginBottom",
    "marginLeft",
    "paddingTop",
    "paddingRight",
    "paddingBottom",
    "paddingLeft",
    "borderTopWidth",
    "borderRightWidth",
    "borderBottomWidth",
    "borderLeftWidth",
];

/// Exceptions to the generic camelCase-to-kebab-case conversion: properties
/// whose DOM name doesn't just lowercase each capital, like `cssFloat`
/// (reserved because `float` is a JS keyword).
const IRREGULAR_KEBAB: &[(&str, &str)] = &[("cssFloat", "float")];

/// Convert a camelCase property name (`backgroundColor`) to its kebab-case
/// CSS form (`background-color`): each uppercase letter starts a new
/// hyphenated word.
fn camel_to_kebab(camel: &str) -> String {
    let mut out = String::with_capacity(camel.len() + 4);
    for ch in camel.chars() {
        if ch.is_ascii_uppercase() {
            out.push('-');
            out.push(ch.to_ascii_lowercase());
        } else {
            out.push(ch);
        }
    }
    out
}

/// The kebab-case CSS property `camel` maps to: an [`IRREGULAR_KEBAB`]
/// override if one is named, else the generic conversion. Used for every
/// `CAMEL_PROPERTIES` entry, so adding a new regular longhand needs no
/// separate kebab spelling.
fn kebab_for(camel: &str) -> String {
    IRREGULAR_KEBAB.iter().find(|&&(c, _)| c == camel).map_or_else(|| camel_to_kebab(camel), |&(_, kebab)| kebab.to_string())
}

fn get_property(tree: &DomTree, node: NodeId, prop: &str) -> Option<String> {
    let raw = tree.get_attribute(node, "style")?;
    parse_declarations(raw).get(prop).cloned()
}

fn set_property(tree: &mut DomTree, node: NodeId, prop: &str, value: &str) {
    let mut decls = tree.get_attribute(node, "style").map(parse_declarations).unwrap_or_default();
    if value.is_empty() {
        decls.shift_remove(prop);
    } else {
        decls.insert(prop.to_string(), value.to_string());
    }
    tree.set_attribute(node, "style", serialize_declarations(&decls));
}

fn remove_property(tree: &mut DomTree, node: NodeId, prop: &str) -> Option<String> {
    let mut decls = tree.get_attribute(node, "style").map(parse_declarations).unwrap_or_default();
    let removed = decls.shift_remove(prop);
    tree.set_attribute(node, "style", serialize_declarations(&decls));
    removed
}

fn this_node(this: &JsValue) -> JsResult<NodeId> {
    backing_of(this).ok_or_else(|| boa_engine::JsNativeError::typ().with_message("not a wisp style object").into())
}

fn arg_string(args: &[JsValue], index: usize, context: &mut Context) -> JsResult<String> {
    args.get(index).map_or_else(|| Ok(String::new()), |v| Ok(v.to_string(context)?.to_std_string_escaped()))
}

fn get_property_value(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let prop = arg_string(args, 0, context)?;
    let tree = host.dom.borrow();
    Ok(get_property(&tree, node, &prop).map_or_else(|| JsValue::from(js_string!("")), |v| JsValue::from(js_string!(v.as_str()))))
}

fn set_property_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let prop = arg_string(args, 0, context)?;
    let value = arg_string(args, 1, context)?;
    set_property(&mut host.dom.borrow_mut(), node, &prop, &value);
    Ok(JsValue::undefined())
}

fn remove_property_method(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let prop = arg_string(args, 0, context)?;
    let removed = remove_property(&mut host.dom.borrow_mut(), node, &prop);
    Ok(removed.map_or_else(|| JsValue::from(js_string!("")), |v| JsValue::from(js_string!(v.as_str()))))
}

fn get_css_text(this: &JsValue, _args: &[JsValue], host: &mut Host, _context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let tree = host.dom.borrow();
    Ok(JsValue::from(js_string!(tree.get_attribute(node, "style").unwrap_or_default())))
}

fn set_css_text(this: &JsValue, args: &[JsValue], host: &mut Host, context: &mut Context) -> JsResult<JsValue> {
    let node = this_node(this)?;
    let text = arg_string(args, 0, context)?;
    host.dom.borrow_mut().set_attribute(node, "style", text);
    Ok(JsValue::undefined())
}

fn native(context: &mut Context, name: &str, len: usize, f: NativeFunction) -> JsFunction {
    FunctionObjectBuilder::new(context.realm(), f).name(js_string!(name)).length(len as u32).build()
}

fn define_accessor(obj: &JsObject, context: &mut Context, key: &str, get: JsFunction, set: JsFunction) {
    let desc = PropertyDescriptor::builder().enumerable(true).configurable(true).get(get).set(set).build();
    obj.define_property_or_throw(js_string!(key), desc, context).expect("style property definition should not fail");
}

fn define_method(obj: &JsObject, context: &mut Context, key: &str, func: JsFunction) {
    obj.set(js_string!(key), func, true, context).expect("style method definition should not fail");
}

fn known_property_accessors(context: &mut Context, host: &Host, camel: &'static str) -> (JsFunction, JsFunction) {
    let get = native(
        context,
        "get",
        0,
        NativeFunction::from_copy_closure_with_captures(
            move |this, _args, host: &mut Host, _context| -> JsResult<JsValue> {
                let node = this_node(this)?;
                let tree = host.dom.borrow();
                let kebab = kebab_for(camel);
                Ok(get_property(&tree, node, &kebab).map_or_else(|| JsValue::from(js_string!("")), |v| JsValue::from(js_string!(v.as_str()))))
            },
            host.clone(),
        ),
    );
    let set = native(
        context,
        "set",
        1,
        NativeFunction::from_copy_closure_with_captures(
            move |this, args, host: &mut Host, context| -> JsResult<JsValue> {
                let node = this_node(this)?;
                let value = arg_string(args, 0, context)?;
                let kebab = kebab_for(camel);
                set_property(&mut host.dom.borrow_mut(), node, &kebab, &value);
                Ok(JsValue::undefined())
            },
            host.clone(),
        ),
    );
    (get, set)
}

/// Build the `style` proxy for `node`. Backed by [`NodeBacking`] exactly
/// like an element/text proxy, so its native functions recover `node` the
/// same way.
pub(crate) fn build_style_proxy(context: &mut Context, host: &Host, node: NodeId) -> JsObject {
    let proto = context.intrinsics().constructors().object().prototype();
    let obj = JsObject::from_proto_and_data(proto, NodeBacking(node));

    for &camel in CAMEL_PROPERTIES {
        let (get, set) = known_property_accessors(context, host, camel);
        define_accessor(&obj, context, camel, get, set);
    }

    let css_text_get = native(context, "get cssText", 0, NativeFunction::from_copy_closure_with_captures(get_css_text, host.clone()));
    let css_text_set = native(context, "set cssText", 1, NativeFunction::from_copy_closure_with_captures(set_css_text, host.clone()));
    define_accessor(&obj, context, "cssText", css_text_get, css_text_set);

    define_method(&obj, context, "getPropertyValue", native(context, "getPropertyValue", 1, NativeFunction::from_copy_closure_with_captures(get_property_value, host.clone())));
    define_method(&obj, context, "setProperty", native(context, "setProperty", 2, NativeFunction::from_copy_closure_with_captures(set_property_method, host.clone())));
    define_method(&obj, context, "removeProperty", native(context, "removeProperty", 1, NativeFunction::from_copy_closure_with_captures(remove_property_method, host.clone())));

    obj
}
