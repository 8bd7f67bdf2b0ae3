//! Router - fragment-based route changes dispatched into a [`Store`].
//!
//! The router holds the current fragment (`#/active`) in a signal. An effect on
//! that signal maps the fragment to a route name and dispatches the action built
//! by `to_action`. The effect runs once on creation, so the initial fragment is
//! dispatched before [`Router::new`] returns.

use std::cell::RefCell;
use std::rc::Rc;

use spark_signals::{effect, signal, untrack, Signal};
use tracing::debug;

use super::store::Store;

/// Route name for an empty fragment.
pub const DEFAULT_ROUTE: &str = "all";

/// Route name for a fragment: a leading `#/` is stripped, empty means
/// [`DEFAULT_ROUTE`].
///
/// ```ignore
/// assert_eq!(route_from_hash("#/active"), "active");
/// assert_eq!(route_from_hash(""), "all");
/// ```
pub fn route_from_hash(hash: &str) -> String {
    let route = hash.strip_prefix("#/").unwrap_or(hash);
    if route.is_empty() {
        DEFAULT_ROUTE.to_string()
    } else {
        route.to_string()
    }
}

/// Fragment router bound to a store.
pub struct Router {
    hash: Signal<String>,
    current: Rc<RefCell<String>>,
    stop: Option<Box<dyn FnOnce()>>,
}

impl Router {
    /// Start routing.
    ///
    /// # Arguments
    ///
    /// * `store` - Store that receives route actions
    /// * `initial_hash` - Fragment at startup (may be empty)
    /// * `to_action` - Builds the action for a route name
    pub fn new<S, A>(
        store: &Store<S, A>,
        initial_hash: &str,
        to_action: impl Fn(String) -> A + 'static,
    ) -> Self
    where
        S: 'static,
        A: 'static,
    {
        let hash = signal(initial_hash.to_string());
        let current = Rc::new(RefCell::new(initial_hash.to_string()));
        let dispatch = store.dispatcher();

        let source = hash.clone();
        let stop = effect(move || {
            let route = route_from_hash(&source.get());
            debug!(%route, "route");
            untrack(|| dispatch(to_action(route)));
        });

        Self {
            hash,
            current,
            stop: Some(Box::new(stop)),
        }
    }

    /// Change the fragment. Navigating to the current fragment does nothing.
    pub fn navigate(&self, hash: &str) {
        if self.current.borrow().as_str() == hash {
            return;
        }
        *self.current.borrow_mut() = hash.to_string();
        self.hash.set(hash.to_string());
    }

    /// Current fragment.
    pub fn hash(&self) -> String {
        self.current.borrow().clone()
    }

    /// Current route name.
    pub fn route(&self) -> String {
        route_from_hash(&self.current.borrow())
    }

    /// Stop dispatching on fragment changes.
    pub fn stop(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}

impl Drop for Router {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}
