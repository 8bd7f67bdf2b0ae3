//! Store - reducer-driven application state.
//!
//! A `Store` owns one state value and a reducer `(&S, A) -> S`. Every dispatch
//! replaces the state and bumps a revision signal; subscribers are effects on that
//! signal. Each subscriber counts the dispatches it has delivered, so each dispatch
//! notifies each subscriber exactly once, synchronously outside a `batch`.
//!
//! The store is an explicit handle: components capture a clone (or a
//! [`Dispatch`] from [`Store::dispatcher`]) instead of reaching for a global.
//!
//! # Example
//!
//! ```ignore
//! let store = Store::new(0, |count: &i32, delta: i32| count + delta);
//! let _sub = store.subscribe(|| println!("changed"));
//! store.dispatch(2); // prints "changed"
//! assert_eq!(store.state(), 2);
//! ```

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use spark_signals::{effect, signal, untrack, Signal};
use tracing::debug;

/// Shared action sink handed to components.
pub type Dispatch<A> = Rc<dyn Fn(A)>;

/// Reducer-driven state container.
pub struct Store<S, A> {
    state: Rc<RefCell<S>>,
    reducer: Rc<dyn Fn(&S, A) -> S>,
    dispatched: Rc<Cell<u64>>,
    revision: Signal<u64>,
}

impl<S, A> Clone for Store<S, A> {
    fn clone(&self) -> Self {
        Self {
            state: Rc::clone(&self.state),
            reducer: Rc::clone(&self.reducer),
            dispatched: Rc::clone(&self.dispatched),
            revision: self.revision.clone(),
        }
    }
}

impl<S: 'static, A: 'static> Store<S, A> {
    /// Create a store with an initial state and a reducer.
    pub fn new(initial: S, reducer: impl Fn(&S, A) -> S + 'static) -> Self {
        Self {
            state: Rc::new(RefCell::new(initial)),
            reducer: Rc::new(reducer),
            dispatched: Rc::new(Cell::new(0)),
            revision: signal(0),
        }
    }

    /// Snapshot of the current state.
    pub fn state(&self) -> S
    where
        S: Clone,
    {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it.
    pub fn with_state<R>(&self, f: impl FnOnce(&S) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Number of dispatches so far.
    pub fn revision(&self) -> u64 {
        self.dispatched.get()
    }

    /// Run the reducer, replace the state, notify subscribers.
    ///
    /// Subscribers run before this returns. Dispatching from inside the reducer
    /// is not supported.
    pub fn dispatch(&self, action: A) {
        let next = {
            let state = self.state.borrow();
            (self.reducer)(&state, action)
        };
        *self.state.borrow_mut() = next;

        // Counter kept outside the signal so dispatching never reads (and so
        // never subscribes to) the revision from inside an effect.
        let revision = self.dispatched.get() + 1;
        self.dispatched.set(revision);
        debug!(revision, "dispatch");
        self.revision.set(revision);
    }

    /// Call `listener` after every dispatch until the subscription is dropped.
    ///
    /// Not called for dispatches that happened before subscribing. The listener
    /// runs untracked, so signals it reads never re-run it. Dispatches merged by
    /// a `batch` are still delivered one call each.
    pub fn subscribe(&self, mut listener: impl FnMut() + 'static) -> Subscription {
        let revision = self.revision.clone();
        let dispatched = Rc::clone(&self.dispatched);
        let mut seen = dispatched.get();

        let stop = effect(move || {
            let _ = revision.get();
            while seen < dispatched.get() {
                seen += 1;
                untrack(|| listener());
            }
        });

        Subscription {
            stop: Some(Box::new(stop)),
        }
    }

    /// An action sink that dispatches into this store.
    pub fn dispatcher(&self) -> Dispatch<A> {
        let store = self.clone();
        Rc::new(move |action| store.dispatch(action))
    }
}

// =============================================================================
// Subscription
// =============================================================================

/// Live store subscription. Dropping it unsubscribes.
pub struct Subscription {
    stop: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Stop receiving notifications.
    pub fn unsubscribe(mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }

    /// Whether the subscription is still live.
    pub fn is_active(&self) -> bool {
        self.stop.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(stop) = self.stop.take() {
            stop();
        }
    }
}
