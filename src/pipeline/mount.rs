//! Mount API - initial mount and the app driver.
//!
//! [`create_app`] renders a describe function once and mounts the result into a
//! target node. [`App::update`] re-runs the describe function and patches the live
//! tree from the previous VNode tree to the new one. The engine never schedules
//! itself: call `update` after state changes, or [`connect`] it to a [`Store`].
//!
//! # Example
//!
//! ```ignore
//! let store = Store::new(State::default(), reduce);
//! let describe = {
//!     let store = store.clone();
//!     move || view(&store.state(), store.dispatcher())
//! };
//!
//! let mut tree = MemoryTree::new();
//! let root = tree.create_root("div");
//! let app = Rc::new(RefCell::new(create_app(tree, describe, root)?));
//! let _subscription = connect(&app, &store);
//!
//! store.dispatch(Action::Add("milk".into())); // app re-rendered
//! ```

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use tracing::{debug, error, warn};

use crate::engine::Host;
use crate::renderer::{patch, render};
use crate::state::{Store, Subscription};
use crate::types::VNode;

// =============================================================================
// Mount Function
// =============================================================================

/// Replace every child of `target` with `node`.
///
/// Returns `node`.
pub fn mount<H: Host>(host: &mut H, node: &H::Node, target: &H::Node) -> Result<H::Node, H::Error> {
    host.clear_children(target)?;
    host.append_child(target, node)?;
    Ok(node.clone())
}

// =============================================================================
// App
// =============================================================================

/// A mounted describe function and the VNode tree last rendered from it.
pub struct App<H: Host, F> {
    host: H,
    describe: F,
    target: H::Node,
    current: VNode<H::Node>,
    cycles: u64,
}

/// Render `describe()` into `target` and return the app driving it.
///
/// # Arguments
///
/// * `host` - Host owning the live tree; the app takes it over
/// * `describe` - Builds the whole VNode tree from current state
/// * `target` - Live node to mount into; its existing children are removed
pub fn create_app<H, F>(mut host: H, mut describe: F, target: H::Node) -> Result<App<H, F>, H::Error>
where
    H: Host,
    F: FnMut() -> VNode<H::Node>,
{
    let current = describe();
    let root = render(&mut host, &current)?;
    mount(&mut host, &root, &target)?;
    debug!(?target, ?root, "app mounted");

    Ok(App {
        host,
        describe,
        target,
        current,
        cycles: 0,
    })
}

impl<H, F> App<H, F>
where
    H: Host,
    F: FnMut() -> VNode<H::Node>,
{
    /// Re-run the describe function and patch the live tree.
    ///
    /// Returns the live root. On error the previous VNode tree stays the
    /// baseline, but the live tree may already be partially patched.
    pub fn update(&mut self) -> Result<H::Node, H::Error> {
        let next = (self.describe)();
        let root = patch(&mut self.host, &self.target, &self.current, &next, 0)?;
        self.current = next;
        self.cycles += 1;
        debug!(cycle = self.cycles, ?root, "app updated");
        Ok(root)
    }

    /// The host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// The host, mutably. Changes made behind the reconciler's back are not
    /// tracked and may be undone or confused by the next update.
    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Node the app is mounted into.
    pub fn target(&self) -> &H::Node {
        &self.target
    }

    /// Last rendered VNode tree.
    pub fn current(&self) -> &VNode<H::Node> {
        &self.current
    }

    /// Live root (first child of the target).
    pub fn root(&self) -> Option<H::Node> {
        self.host.child_at(&self.target, 0)
    }

    /// Completed updates since mount.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Give the host back.
    pub fn into_host(self) -> H {
        self.host
    }
}

// =============================================================================
// Store connection
// =============================================================================

/// Run `app.update()` after every dispatch into `store`.
///
/// The subscription holds the app weakly; once the app is dropped, notifications
/// do nothing. Update failures are logged, not returned. A dispatch made while
/// the app is already updating (from a hook during a patch) is skipped with a
/// warning.
pub fn connect<H, F, S, A>(app: &Rc<RefCell<App<H, F>>>, store: &Store<S, A>) -> Subscription
where
    H: Host + 'static,
    H::Error: fmt::Display,
    F: FnMut() -> VNode<H::Node> + 'static,
    S: 'static,
    A: 'static,
{
    let app = Rc::downgrade(app);
    store.subscribe(move || {
        let Some(app) = app.upgrade() else {
            return;
        };
        let Ok(mut app) = app.try_borrow_mut() else {
            warn!("dispatch during update, re-render skipped");
            return;
        };
        if let Err(err) = app.update() {
            error!(%err, "app update failed");
        }
    })
}
