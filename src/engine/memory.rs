//! MemoryTree - an in-memory [`Host`].
//!
//! Nodes live in an arena indexed by [`NodeId`]. Nothing is ever freed: a node
//! removed from the tree simply becomes detached, the way a DOM node does until
//! nothing references it.
//!
//! Besides implementing [`Host`], the tree records:
//! - a [`Mutation`] log of every host call, in order
//! - per-node [`Dirty`] flags, taken with [`MemoryTree::take_dirty`]
//!
//! # Firing events
//!
//! Handlers usually dispatch store actions, which re-render, which mutates this
//! tree. Never call a handler while the tree is borrowed; clone it out first:
//!
//! ```ignore
//! let handler = app.borrow().host().handler(button, "click");
//! if let Some(handler) = handler {
//!     handler(&Event::new("click", button));
//! }
//! ```

use std::fmt;

use indexmap::IndexMap;

use crate::error::MemoryError;
use crate::types::{Event, Handler, PropValue};

use super::dirty::Dirty;
use super::host::Host;

// =============================================================================
// Node handles and data
// =============================================================================

/// Handle to a node of a [`MemoryTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    /// Arena index.
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a node is.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeKind {
    /// Element with a tag.
    Element { tag: String },
    /// Text node with content.
    Text { content: String },
}

struct NodeData {
    kind: NodeKind,
    attributes: IndexMap<String, String>,
    properties: IndexMap<String, PropValue<NodeId>>,
    handlers: IndexMap<String, Handler<NodeId>>,
    children: Vec<NodeId>,
    parent: Option<NodeId>,
    dirty: Dirty,
}

impl NodeData {
    fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            properties: IndexMap::new(),
            handlers: IndexMap::new(),
            children: Vec::new(),
            parent: None,
            dirty: Dirty::CREATED,
        }
    }

    fn is_element(&self) -> bool {
        matches!(self.kind, NodeKind::Element { .. })
    }
}

// =============================================================================
// Mutation log
// =============================================================================

/// One recorded host call.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    CreateElement { node: NodeId, tag: String },
    CreateText { node: NodeId, content: String },
    SetAttribute { node: NodeId, name: String, value: String },
    RemoveAttribute { node: NodeId, name: String },
    SetProperty { node: NodeId, name: String },
    SetHandler { node: NodeId, event: String, installed: bool },
    Append { parent: NodeId, child: NodeId },
    InsertBefore { parent: NodeId, child: NodeId, reference: Option<NodeId> },
    Remove { parent: NodeId, child: NodeId },
    Replace { parent: NodeId, new_child: NodeId, old_child: NodeId },
}

impl Mutation {
    /// Whether this mutation created a node.
    pub fn is_creation(&self) -> bool {
        matches!(self, Mutation::CreateElement { .. } | Mutation::CreateText { .. })
    }

    /// Whether this mutation changed a child list.
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Mutation::Append { .. }
                | Mutation::InsertBefore { .. }
                | Mutation::Remove { .. }
                | Mutation::Replace { .. }
        )
    }
}

// =============================================================================
// MemoryTree
// =============================================================================

/// Arena-backed live tree.
#[derive(Default)]
pub struct MemoryTree {
    nodes: Vec<NodeData>,
    mutations: Vec<Mutation>,
}

impl MemoryTree {
    /// Empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a detached element to mount into. Not recorded as a mutation.
    pub fn create_root(&mut self, tag: &str) -> NodeId {
        let id = self.alloc(NodeKind::Element { tag: tag.to_string() });
        if let Some(node) = self.nodes.get_mut(id.0) {
            node.dirty = Dirty::NONE;
        }
        id
    }

    /// Number of nodes ever created.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether no node was ever created.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // -------------------------------------------------------------------------
    // Inspection
    // -------------------------------------------------------------------------

    /// Kind of a node.
    pub fn kind(&self, id: NodeId) -> Option<&NodeKind> {
        self.nodes.get(id.0).map(|node| &node.kind)
    }

    /// Tag of an element.
    pub fn tag(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Element { tag } => Some(tag),
            NodeKind::Text { .. } => None,
        }
    }

    /// Content of a text node.
    pub fn text(&self, id: NodeId) -> Option<&str> {
        match self.kind(id)? {
            NodeKind::Text { content } => Some(content),
            NodeKind::Element { .. } => None,
        }
    }

    /// Concatenated text of a node and its descendants.
    pub fn text_content(&self, id: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(id, &mut out);
        out
    }

    fn collect_text(&self, id: NodeId, out: &mut String) {
        let Some(node) = self.nodes.get(id.0) else { return };
        match &node.kind {
            NodeKind::Text { content } => out.push_str(content),
            NodeKind::Element { .. } => {
                for &child in &node.children {
                    self.collect_text(child, out);
                }
            }
        }
    }

    /// Attribute value.
    pub fn attribute(&self, id: NodeId, name: &str) -> Option<&str> {
        self.nodes.get(id.0)?.attributes.get(name).map(String::as_str)
    }

    /// All attributes in the order they were first set.
    pub fn attributes(&self, id: NodeId) -> Vec<(&str, &str)> {
        self.nodes
            .get(id.0)
            .map(|node| {
                node.attributes
                    .iter()
                    .map(|(name, value)| (name.as_str(), value.as_str()))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Live property value.
    pub fn property(&self, id: NodeId, name: &str) -> Option<&PropValue<NodeId>> {
        self.nodes.get(id.0)?.properties.get(name)
    }

    /// All live properties.
    pub fn properties(&self, id: NodeId) -> Vec<(&str, &PropValue<NodeId>)> {
        self.nodes
            .get(id.0)
            .map(|node| {
                node.properties
                    .iter()
                    .map(|(name, value)| (name.as_str(), value))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Handler in the slot for `event`, cloned out so it can be called without
    /// holding a borrow of the tree.
    pub fn handler(&self, id: NodeId, event: &str) -> Option<Handler<NodeId>> {
        self.nodes.get(id.0)?.handlers.get(event).cloned()
    }

    /// Names of filled handler slots.
    pub fn handler_names(&self, id: NodeId) -> Vec<&str> {
        self.nodes
            .get(id.0)
            .map(|node| node.handlers.keys().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// Call the handler in `event.name`'s slot of `event.target`.
    ///
    /// Returns whether a handler was installed. The handler is cloned out first,
    /// but `&self` stays borrowed for the call: when the handler re-renders into
    /// this same tree, take it with [`MemoryTree::handler`] and call it after the
    /// borrow ends instead.
    pub fn dispatch_event(&self, event: &Event<NodeId>) -> bool {
        match self.handler(event.target, &event.name) {
            Some(handler) => {
                handler(event);
                true
            }
            None => false,
        }
    }

    /// Children of a node.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(id.0)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    /// Parent of a node, if attached.
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(id.0)?.parent
    }

    /// Pre-order list of `id` and everything below it.
    pub fn descendants(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(next) = stack.pop() {
            if self.nodes.get(next.0).is_none() {
                continue;
            }
            out.push(next);
            stack.extend(self.children(next).iter().rev().copied());
        }
        out
    }

    /// Elements under `id` (inclusive) whose `class` attribute lists `class`.
    pub fn find_by_class(&self, id: NodeId, class: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| {
                self.attribute(node, "class")
                    .is_some_and(|classes| classes.split_whitespace().any(|c| c == class))
            })
            .collect()
    }

    /// Elements under `id` (inclusive) with the given tag.
    pub fn find_by_tag(&self, id: NodeId, tag: &str) -> Vec<NodeId> {
        self.descendants(id)
            .into_iter()
            .filter(|&node| self.tag(node) == Some(tag))
            .collect()
    }

    // -------------------------------------------------------------------------
    // Dirty flags and mutation log
    // -------------------------------------------------------------------------

    /// Dirty flags of a node.
    pub fn dirty(&self, id: NodeId) -> Dirty {
        self.nodes.get(id.0).map_or(Dirty::NONE, |node| node.dirty)
    }

    /// Collect and reset every non-empty set of dirty flags.
    pub fn take_dirty(&mut self) -> Vec<(NodeId, Dirty)> {
        let mut out = Vec::new();
        for (index, node) in self.nodes.iter_mut().enumerate() {
            if !node.dirty.is_empty() {
                out.push((NodeId(index), node.dirty));
                node.dirty = Dirty::NONE;
            }
        }
        out
    }

    /// Every recorded mutation since the last clear.
    pub fn mutations(&self) -> &[Mutation] {
        &self.mutations
    }

    /// Drop the mutation log.
    pub fn clear_mutations(&mut self) {
        self.mutations.clear();
    }

    /// Take the mutation log.
    pub fn take_mutations(&mut self) -> Vec<Mutation> {
        std::mem::take(&mut self.mutations)
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn alloc(&mut self, kind: NodeKind) -> NodeId {
        let id = NodeId(self.nodes.len());
        self.nodes.push(NodeData::new(kind));
        id
    }

    fn node(&self, id: NodeId) -> Result<&NodeData, MemoryError> {
        self.nodes.get(id.0).ok_or(MemoryError::UnknownNode(id))
    }

    fn node_mut(&mut self, id: NodeId) -> Result<&mut NodeData, MemoryError> {
        self.nodes.get_mut(id.0).ok_or(MemoryError::UnknownNode(id))
    }

    fn element_mut(&mut self, id: NodeId) -> Result<&mut NodeData, MemoryError> {
        let node = self.node_mut(id)?;
        if node.is_element() {
            Ok(node)
        } else {
            Err(MemoryError::NotAnElement(id))
        }
    }

    fn is_ancestor(&self, ancestor: NodeId, mut id: NodeId) -> bool {
        loop {
            if id == ancestor {
                return true;
            }
            match self.parent(id) {
                Some(parent) => id = parent,
                None => return false,
            }
        }
    }

    /// Validate that `child` may be placed under `parent`.
    fn check_insert(&self, parent: NodeId, child: NodeId) -> Result<(), MemoryError> {
        if !self.node(parent)?.is_element() {
            return Err(MemoryError::NotAnElement(parent));
        }
        self.node(child)?;
        if self.is_ancestor(child, parent) {
            return Err(MemoryError::Cycle { parent, child });
        }
        Ok(())
    }

    fn check_child(&self, parent: NodeId, child: NodeId) -> Result<(), MemoryError> {
        if self.node(child)?.parent == Some(parent) {
            Ok(())
        } else {
            Err(MemoryError::NotAChild { parent, child })
        }
    }

    /// Detach `child` from its current parent, if any.
    fn detach(&mut self, child: NodeId) -> Result<(), MemoryError> {
        let Some(parent) = self.node(child)?.parent else {
            return Ok(());
        };
        let parent_data = self.node_mut(parent)?;
        parent_data.children.retain(|&c| c != child);
        parent_data.dirty |= Dirty::CHILDREN;
        self.node_mut(child)?.parent = None;
        Ok(())
    }

    fn attach_at(&mut self, parent: NodeId, child: NodeId, index: usize) -> Result<(), MemoryError> {
        let parent_data = self.node_mut(parent)?;
        let index = index.min(parent_data.children.len());
        parent_data.children.insert(index, child);
        parent_data.dirty |= Dirty::CHILDREN;
        self.node_mut(child)?.parent = Some(parent);
        Ok(())
    }
}

impl fmt::Debug for MemoryTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTree")
            .field("nodes", &self.nodes.len())
            .field("mutations", &self.mutations.len())
            .finish()
    }
}

// =============================================================================
// Host implementation
// =============================================================================

impl Host for MemoryTree {
    type Node = NodeId;
    type Error = MemoryError;

    fn create_element(&mut self, tag: &str) -> Result<NodeId, MemoryError> {
        let node = self.alloc(NodeKind::Element { tag: tag.to_string() });
        self.mutations.push(Mutation::CreateElement {
            node,
            tag: tag.to_string(),
        });
        Ok(node)
    }

    fn create_text(&mut self, content: &str) -> Result<NodeId, MemoryError> {
        let node = self.alloc(NodeKind::Text {
            content: content.to_string(),
        });
        self.mutations.push(Mutation::CreateText {
            node,
            content: content.to_string(),
        });
        Ok(node)
    }

    fn set_attribute(&mut self, node: &NodeId, name: &str, value: &str) -> Result<(), MemoryError> {
        let data = self.element_mut(*node)?;
        data.attributes.insert(name.to_string(), value.to_string());
        data.dirty |= Dirty::ATTRIBUTES;
        self.mutations.push(Mutation::SetAttribute {
            node: *node,
            name: name.to_string(),
            value: value.to_string(),
        });
        Ok(())
    }

    fn remove_attribute(&mut self, node: &NodeId, name: &str) -> Result<(), MemoryError> {
        let data = self.element_mut(*node)?;
        data.attributes.shift_remove(name);
        data.dirty |= Dirty::ATTRIBUTES;
        self.mutations.push(Mutation::RemoveAttribute {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_property(
        &mut self,
        node: &NodeId,
        name: &str,
        value: &PropValue<NodeId>,
    ) -> Result<(), MemoryError> {
        let data = self.element_mut(*node)?;
        data.properties.insert(name.to_string(), value.clone());
        data.dirty |= Dirty::PROPERTIES;
        self.mutations.push(Mutation::SetProperty {
            node: *node,
            name: name.to_string(),
        });
        Ok(())
    }

    fn set_handler(
        &mut self,
        node: &NodeId,
        event: &str,
        handler: Option<Handler<NodeId>>,
    ) -> Result<(), MemoryError> {
        let data = self.element_mut(*node)?;
        let installed = handler.is_some();
        match handler {
            Some(handler) => {
                data.handlers.insert(event.to_string(), handler);
            }
            None => {
                data.handlers.shift_remove(event);
            }
        }
        data.dirty |= Dirty::HANDLERS;
        self.mutations.push(Mutation::SetHandler {
            node: *node,
            event: event.to_string(),
            installed,
        });
        Ok(())
    }

    fn append_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
        self.check_insert(*parent, *child)?;
        self.detach(*child)?;
        self.attach_at(*parent, *child, usize::MAX)?;
        self.mutations.push(Mutation::Append {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn insert_before(
        &mut self,
        parent: &NodeId,
        child: &NodeId,
        reference: Option<&NodeId>,
    ) -> Result<(), MemoryError> {
        self.check_insert(*parent, *child)?;
        if let Some(reference) = reference {
            self.check_child(*parent, *reference)?;
        }

        // Inserting a node before itself leaves it where it is.
        if reference != Some(child) {
            self.detach(*child)?;
            let index = match reference {
                Some(reference) => self
                    .children(*parent)
                    .iter()
                    .position(|c| c == reference)
                    .ok_or(MemoryError::NotAChild {
                        parent: *parent,
                        child: *reference,
                    })?,
                None => usize::MAX,
            };
            self.attach_at(*parent, *child, index)?;
        }

        self.mutations.push(Mutation::InsertBefore {
            parent: *parent,
            child: *child,
            reference: reference.copied(),
        });
        Ok(())
    }

    fn remove_child(&mut self, parent: &NodeId, child: &NodeId) -> Result<(), MemoryError> {
        self.check_child(*parent, *child)?;
        self.detach(*child)?;
        self.mutations.push(Mutation::Remove {
            parent: *parent,
            child: *child,
        });
        Ok(())
    }

    fn replace_child(
        &mut self,
        parent: &NodeId,
        new_child: &NodeId,
        old_child: &NodeId,
    ) -> Result<(), MemoryError> {
        self.check_child(*parent, *old_child)?;
        if new_child != old_child {
            self.check_insert(*parent, *new_child)?;
            self.detach(*new_child)?;
            let index = self
                .children(*parent)
                .iter()
                .position(|c| c == old_child)
                .ok_or(MemoryError::NotAChild {
                    parent: *parent,
                    child: *old_child,
                })?;
            self.detach(*old_child)?;
            self.attach_at(*parent, *new_child, index)?;
        }
        self.mutations.push(Mutation::Replace {
            parent: *parent,
            new_child: *new_child,
            old_child: *old_child,
        });
        Ok(())
    }

    fn child_at(&self, parent: &NodeId, index: usize) -> Option<NodeId> {
        self.children(*parent).get(index).copied()
    }

    fn child_count(&self, parent: &NodeId) -> usize {
        self.children(*parent).len()
    }

    fn position_of(&self, parent: &NodeId, child: &NodeId) -> Option<usize> {
        self.children(*parent).iter().position(|c| c == child)
    }
}

// =============================================================================
// Tests
// =============================================================================
