//! DOM scripting bridge for the wisp rendering engine.
//!
//! Uses [Boa](https://boajs.dev/) as the JavaScript engine, following the
//! `koala-js` `JsRuntime` + `globals::register_globals` pattern, extended
//! from a `console`-only stub into the `document`/element/`style`/
//! `classList` surface a two-pass render needs.
//!
//! [§4.7 DOM scripting bridge] "After an initial layout and paint, if the
//! document has any scripts, they run in document order against a freshly
//! initialized scripting host; any thrown error aborts that script only
//! (reported, not fatal) and following scripts run."

mod class_list;
mod document;
mod globals;
mod host;
mod node_proxy;
mod style_proxy;

use std::cell::RefCell;
use std::rc::Rc;

use boa_engine::{Context, JsError, JsValue, Source};
use wisp_dom::DomTree;

pub use host::Host;

/// A JavaScript runtime bound to one document.
///
/// [§8.1.6 JavaScript execution context](https://html.spec.whatwg.org/multipage/webappapis.html)
/// Each script run gets a freshly initialized runtime (and so a fresh
/// element-proxy identity cache): "two lookups of the same underlying node
/// return the same proxy value for the duration of one script execution",
/// not across executions.
pub struct JsRuntime {
    context: Context,
}

impl JsRuntime {
    /// Create a runtime with `console` and `document` registered against
    /// `dom`.
    #[must_use]
    pub fn new(dom: Rc<RefCell<DomTree>>) -> Self {
        let mut context = Context::default();
        let host = Host::new(dom);
        globals::register_globals(&mut context, &host);
        Self { context }
    }

    /// Execute JavaScript source code.
    ///
    /// # Errors
    ///
    /// Returns `JsError` if the source has a syntax error or throws an
    /// uncaught exception.
    pub fn execute(&mut self, source: &str) -> Result<JsValue, JsError> {
        self.context.eval(Source::from_bytes(source))
    }
}

/// Run each of `scripts` in document order against a freshly initialized
/// runtime bound to `dom`.
///
/// [§4.7] "any thrown error aborts that script only (reported, not fatal)
/// and following scripts run." Errors are reported via
/// [`wisp_common::warning::warn_once`], matching how resource errors are
/// reported elsewhere in the pipeline.
pub fn run_scripts(dom: &Rc<RefCell<DomTree>>, scripts: &[String]) {
    let mut runtime = JsRuntime::new(Rc::clone(dom));
    for script in scripts {
        if let Err(err) = runtime.execute(script) {
            wisp_common::warning::warn_once("script", &err.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dom_with_paragraph(id: &str, text: &str) -> Rc<RefCell<DomTree>> {
        let mut tree = DomTree::new();
        let root = tree.root();
        let p = tree.create_element(root, "p");
        tree.set_attribute(p, "id", id);
        tree.append_text(p, text);
        Rc::new(RefCell::new(tree))
    }

    #[test]
    fn console_log_does_not_error() {
        let dom = dom_with_paragraph("t", "old");
        let mut runtime = JsRuntime::new(dom);
        assert!(runtime.execute("console.log('hi')").is_ok());
    }

    #[test]
    fn get_element_by_id_mutates_text_content() {
        let dom = dom_with_paragraph("t", "old");
        run_scripts(&dom, &["document.getElementById('t').textContent = 'new';".to_string()]);
        let tree = dom.borrow();
        let root = tree.root();
        let p = tree.children(root)[0];
        assert_eq!(tree.text_content(p), "new");
    }

    #[test]
    fn a_throwing_script_does_not_abort_following_scripts() {
        let dom = dom_with_paragraph("t", "old");
        run_scripts(
            &dom,
            &["undefinedFunctionCall();".to_string(), "document.getElementById('t').textContent = 'recovered';".to_string()],
        );
        let tree = dom.borrow();
        let root = tree.root();
        let p = tree.children(root)[0];
        assert_eq!(tree.text_content(p), "recovered");
    }

    #[test]
    fn repeated_lookups_within_one_script_are_identity_equal() {
        let dom = dom_with_paragraph("t", "old");
        let result = {
            let mut runtime = JsRuntime::new(Rc::clone(&dom));
            runtime
                .execute("document.getElementById('t') === document.getElementById('t');")
                .unwrap()
        };
        assert_eq!(result.as_boolean(), Some(true));
    }
}
