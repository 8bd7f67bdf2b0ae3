//! createElement and the one-level child flatten.

use std::rc::Rc;

use crate::types::{Element, Hooks, Primitive, Props, VNode};

// =============================================================================
// Child
// =============================================================================

/// One argument in a children list.
pub enum Child<N> {
    /// A single node.
    Node(VNode<N>),
    /// A list of nodes, spliced in place.
    List(Vec<VNode<N>>),
}

impl<N> From<VNode<N>> for Child<N> {
    fn from(node: VNode<N>) -> Self {
        Child::Node(node)
    }
}

impl<N> From<Vec<VNode<N>>> for Child<N> {
    fn from(nodes: Vec<VNode<N>>) -> Self {
        Child::List(nodes)
    }
}

impl<N> From<Option<VNode<N>>> for Child<N> {
    fn from(node: Option<VNode<N>>) -> Self {
        Child::Node(node.into())
    }
}

impl<N> From<&str> for Child<N> {
    fn from(value: &str) -> Self {
        Child::Node(value.into())
    }
}

impl<N> From<String> for Child<N> {
    fn from(value: String) -> Self {
        Child::Node(value.into())
    }
}

impl<N> From<f64> for Child<N> {
    fn from(value: f64) -> Self {
        Child::Node(value.into())
    }
}

impl<N> From<i32> for Child<N> {
    fn from(value: i32) -> Self {
        Child::Node(value.into())
    }
}

impl<N> From<usize> for Child<N> {
    fn from(value: usize) -> Self {
        Child::Node(value.into())
    }
}

impl<N> From<bool> for Child<N> {
    fn from(value: bool) -> Self {
        Child::Node(value.into())
    }
}

/// Flatten children one level: lists are spliced, nodes kept as they are.
pub fn flatten_children<N>(children: impl IntoIterator<Item = Child<N>>) -> Vec<VNode<N>> {
    let mut flat = Vec::new();
    for child in children {
        match child {
            Child::Node(node) => flat.push(node),
            Child::List(nodes) => flat.extend(nodes),
        }
    }
    flat
}

// =============================================================================
// Constructors
// =============================================================================

/// Build an element node.
///
/// # Arguments
///
/// * `tag` - Tag name, not validated
/// * `props` - Props, `None` means an empty map
/// * `children` - Children, flattened one level
pub fn create_element<N>(
    tag: impl Into<String>,
    props: Option<Props<N>>,
    children: impl IntoIterator<Item = Child<N>>,
) -> VNode<N> {
    VNode::Element(Rc::new(Element {
        tag: tag.into(),
        props: Rc::new(props.unwrap_or_default()),
        children: flatten_children(children),
        hooks: Hooks::default(),
    }))
}

/// [`create_element`] with props always given.
pub fn h<N>(
    tag: impl Into<String>,
    props: Props<N>,
    children: impl IntoIterator<Item = Child<N>>,
) -> VNode<N> {
    create_element(tag, Some(props), children)
}

/// A primitive text node.
pub fn text<N>(value: impl Into<String>) -> VNode<N> {
    VNode::Text(Primitive::Str(value.into()))
}
