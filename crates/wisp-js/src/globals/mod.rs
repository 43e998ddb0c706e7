//! JavaScript global objects.
//!
//! Extends the teacher's `console`-only stub: `document` is no longer a
//! TODO, now backed by a real [`Host`](crate::host::Host).
//!
//! # Implemented
//!
//! - `console` - [Console Standard](https://console.spec.whatwg.org/)
//! - `document` - [§ 4.5 Interface Document](https://dom.spec.whatwg.org/#interface-document)
//!
//! # Not Yet Implemented
//!
//! - `window` - [§ 7.2 The Window object](https://html.spec.whatwg.org/multipage/window-object.html)
//! - `location` - [§ 7.7.1 The Location interface](https://html.spec.whatwg.org/multipage/nav-history-apis.html#the-location-interface)
//! - `setTimeout`/`setInterval` - [§ 8.6 Timers](https://html.spec.whatwg.org/multipage/timers-and-user-prompts.html#timers)
//!   (out of scope: a two-pass render has no event loop to drive them)

mod console;

use boa_engine::Context;

use crate::host::Host;

/// Register all global objects on the context. Called once per
/// [`crate::JsRuntime::new`].
pub fn register_globals(context: &mut Context, host: &Host) {
    console::register_console(context);
    crate::document::register_document(context, host);
}
