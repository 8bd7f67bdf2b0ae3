//! Error types.
//!
//! The reconciliation core has no error type of its own: it is generic over
//! [`Host::Error`](crate::engine::Host::Error) and forwards whatever the host raises.
//! [`MemoryError`] is what the in-memory host raises.

use crate::engine::NodeId;

/// Failure raised by [`MemoryTree`](crate::engine::MemoryTree).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MemoryError {
    /// The handle does not belong to this tree.
    #[error("node {0} does not exist")]
    UnknownNode(NodeId),
    /// Text nodes cannot hold children or attributes.
    #[error("node {0} is a text node")]
    NotAnElement(NodeId),
    /// The reference or removed node is not a child of the given parent.
    #[error("node {child} is not a child of {parent}")]
    NotAChild { parent: NodeId, child: NodeId },
    /// Inserting the node would make it its own ancestor.
    #[error("node {child} cannot be inserted under {parent}: it is an ancestor")]
    Cycle { parent: NodeId, child: NodeId },
}
