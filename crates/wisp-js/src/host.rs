//! Shared state every native function closure captures: the document tree
//! and the per-execution node-to-proxy identity cache. Also the native
//! backing data that ties a proxy `JsObject` back to the [`NodeId`] it
//! represents.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use boa_engine::JsData;
use boa_engine::object::JsObject;
use boa_gc::{Finalize, Gc, GcRefCell, Trace};
use wisp_dom::{DomTree, NodeId};

/// The node-to-proxy cache, `Gc`-managed because it holds live `JsObject`s.
///
/// [§4.7] "Identity: two lookups of the same underlying node return the
/// same proxy value for the duration of one script execution." One
/// [`Host`] lives exactly as long as one [`crate::JsRuntime`], so the cache
/// naturally resets for each fresh execution.
pub type NodeCache = Gc<GcRefCell<HashMap<NodeId, JsObject>>>;

/// Everything a native function closure needs to act on the document.
///
/// `dom` is plain Rust state holding no JS values, so it is excluded from
/// GC tracing; `cache` holds `JsObject`s and must be traced so the garbage
/// collector can see live proxies reachable only through it.
#[derive(Clone, Trace, Finalize)]
pub struct Host {
    #[unsafe_ignore_trace]
    pub dom: Rc<RefCell<DomTree>>,
    pub cache: NodeCache,
}

impl Host {
    /// A fresh host over `dom`, with an empty identity cache.
    #[must_use]
    pub fn new(dom: Rc<RefCell<DomTree>>) -> Self {
        Self {
            dom,
            cache: Gc::new(GcRefCell::new(HashMap::new())),
        }
    }
}

/// Native backing data attached to every node proxy object, recovered via
/// `JsObject::downcast_ref` so a method can read back which [`NodeId`] its
/// `this` represents without threading it through every closure's
/// captures.
#[derive(Trace, Finalize, JsData)]
pub struct NodeBacking(#[unsafe_ignore_trace] pub NodeId);

impl fmt::Debug for NodeBacking {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NodeBacking").field(&self.0.0).finish()
    }
}

/// Captures for a navigation accessor (`parentNode`, `nextSibling`, ...): a
/// [`Host`] plus the traversal function to apply to `this`'s node.
#[derive(Clone, Trace, Finalize)]
pub struct NavCtx {
    pub host: Host,
    #[unsafe_ignore_trace]
    pub nav: fn(&DomTree, NodeId) -> Option<NodeId>,
}

/// Read the [`NodeId`] backing `value`, if it is a node proxy produced by
/// this bridge.
pub fn backing_of(value: &boa_engine::JsValue) -> Option<NodeId> {
    value.as_object()?.downcast_ref::<NodeBacking>().map(|b| b.0)
}
