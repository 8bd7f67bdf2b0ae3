//! Host - the capability set the engine uses to touch live nodes.
//!
//! The reconciliation core never reaches past this trait. A browser DOM, a
//! terminal widget tree, or the in-memory [`MemoryTree`](super::MemoryTree) are all
//! just `Host` implementations.
//!
//! Every method that mutates returns `Result<_, Self::Error>`; the engine forwards
//! host failures with `?` and never translates them.

use std::fmt;

use crate::types::{Handler, PropValue};

/// Live-node capability set.
pub trait Host {
    /// Handle to a live node. Compared by identity (two handles are equal iff they
    /// address the same node).
    type Node: Clone + PartialEq + fmt::Debug + 'static;

    /// Failure raised by the host.
    type Error;

    // -------------------------------------------------------------------------
    // Creation
    // -------------------------------------------------------------------------

    /// Create a detached element.
    fn create_element(&mut self, tag: &str) -> Result<Self::Node, Self::Error>;

    /// Create a detached text node.
    fn create_text(&mut self, content: &str) -> Result<Self::Node, Self::Error>;

    // -------------------------------------------------------------------------
    // Attributes, properties, handlers
    // -------------------------------------------------------------------------

    /// Set a string attribute.
    fn set_attribute(&mut self, node: &Self::Node, name: &str, value: &str) -> Result<(), Self::Error>;

    /// Remove an attribute. Removing a missing attribute is not an error.
    fn remove_attribute(&mut self, node: &Self::Node, name: &str) -> Result<(), Self::Error>;

    /// Set a live property to the exact value (no stringification).
    fn set_property(
        &mut self,
        node: &Self::Node,
        name: &str,
        value: &PropValue<Self::Node>,
    ) -> Result<(), Self::Error>;

    /// Fill (`Some`) or clear (`None`) the single handler slot for `event`.
    fn set_handler(
        &mut self,
        node: &Self::Node,
        event: &str,
        handler: Option<Handler<Self::Node>>,
    ) -> Result<(), Self::Error>;

    // -------------------------------------------------------------------------
    // Structure
    // -------------------------------------------------------------------------

    /// Append `child` as the last child of `parent`, detaching it from wherever it was.
    fn append_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Insert `child` before `reference`, or append when `reference` is `None`.
    fn insert_before(
        &mut self,
        parent: &Self::Node,
        child: &Self::Node,
        reference: Option<&Self::Node>,
    ) -> Result<(), Self::Error>;

    /// Detach `child` from `parent`.
    fn remove_child(&mut self, parent: &Self::Node, child: &Self::Node) -> Result<(), Self::Error>;

    /// Put `new_child` where `old_child` is and detach `old_child`.
    fn replace_child(
        &mut self,
        parent: &Self::Node,
        new_child: &Self::Node,
        old_child: &Self::Node,
    ) -> Result<(), Self::Error>;

    /// Child of `parent` at `index`, if any.
    fn child_at(&self, parent: &Self::Node, index: usize) -> Option<Self::Node>;

    /// Number of children of `parent`.
    fn child_count(&self, parent: &Self::Node) -> usize;

    // -------------------------------------------------------------------------
    // Derived
    // -------------------------------------------------------------------------

    /// Current index of `child` under `parent`.
    fn position_of(&self, parent: &Self::Node, child: &Self::Node) -> Option<usize> {
        (0..self.child_count(parent)).find(|&index| self.child_at(parent, index).as_ref() == Some(child))
    }

    /// Remove every child of `parent`, first to last.
    fn clear_children(&mut self, parent: &Self::Node) -> Result<(), Self::Error> {
        while let Some(child) = self.child_at(parent, 0) {
            self.remove_child(parent, &child)?;
        }
        Ok(())
    }
}
