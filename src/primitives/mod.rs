//! VNode construction.
//!
//! This module provides the ways to describe a tree:
//! - [`create_element`] / [`h`] - tag, props and a sequence of [`Child`] values
//! - [`el`] - an [`ElementBuilder`] for when a chain reads better
//! - [`text`] - a primitive text node
//!
//! # Children
//!
//! Children are flattened exactly one level. A [`Child::List`] contributes its
//! items in place; a list cannot hold another list, so the depth is fixed by the
//! type rather than checked at runtime.
//!
//! ```ignore
//! use spark_vtree::{h, Child, Props, VNode, NodeId};
//!
//! let items: Vec<VNode<NodeId>> = vec!["a".into(), "b".into()];
//! let list: VNode<NodeId> = h("ul", Props::new(), [Child::from("head"), Child::from(items)]);
//! // list has three children: "head", "a", "b"
//! ```

mod builder;
mod element;

pub use builder::{el, ElementBuilder};
pub use element::{create_element, flatten_children, h, text, Child};
