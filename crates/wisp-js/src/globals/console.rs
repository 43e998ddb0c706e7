//! Console API implementation.
//!
//! [Console Standard](https://console.spec.whatwg.org/)
//!
//! Implements the `console` global object with `log`, `warn`, and `error`
//! methods that output to stdout/stderr.

use boa_engine::{Context, JsResult, JsValue, NativeFunction, js_string, object::ObjectInitializer, property::Attribute};

/// Register the console global object on the context.
///
/// [§ 1.1 Logging](https://console.spec.whatwg.org/#logging)
///
/// - `console.log(...args)` - Logs to stdout
/// - `console.warn(...args)` - Logs to stdout with warning prefix
/// - `console.error(...args)` - Logs to stderr
pub fn register_console(context: &mut Context) {
    let console = ObjectInitializer::new(context)
        .function(NativeFunction::from_copy_closure(console_log), js_string!("log"), 0)
        .function(NativeFunction::from_copy_closure(console_warn), js_string!("warn"), 0)
        .function(NativeFunction::from_copy_closure(console_error), js_string!("error"), 0)
        .build();

    context
        .register_global_property(js_string!("console"), console, Attribute::all())
        .expect("console global should not already exist");
}

/// `console.log(...args)` - Logs arguments to stdout.
fn console_log(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    println!("[JS] {output}");
    Ok(JsValue::undefined())
}

/// `console.warn(...args)` - Logs arguments to stdout with a warning prefix.
fn console_warn(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    println!("[JS WARN] {output}");
    Ok(JsValue::undefined())
}

/// `console.error(...args)` - Logs arguments to stderr.
fn console_error(_this: &JsValue, args: &[JsValue], context: &mut Context) -> JsResult<JsValue> {
    let output = format_console_args(args, context)?;
    eprintln!("[JS ERROR] {output}");
    Ok(JsValue::undefined())
}

/// Converts each argument to a string and joins them with spaces.
fn format_console_args(args: &[JsValue], context: &mut Context) -> JsResult<String> {
    let strings: Result<Vec<String>, _> = args.iter().map(|arg| arg.to_string(context).map(|s| s.to_std_string_escaped())).collect();
    Ok(strings?.join(" "))
}
