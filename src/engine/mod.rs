//! Live-tree engine - the host capability set and the in-memory host.
//!
//! - [`Host`]: everything the reconciler is allowed to do to live nodes
//! - [`MemoryTree`]: arena-backed `Host` with a mutation log
//! - [`Dirty`]: per-node change categories recorded by `MemoryTree`
//!
//! # Architecture
//!
//! The reconciler holds no live nodes of its own. It receives host handles
//! (`Host::Node`), asks the host for children by index, and issues mutations:
//!
//! ```text
//! VNode (old, new) ──► renderer::patch ──► Host::{create_*, set_*, insert_before, ...}
//!                                              │
//!                                              ▼
//!                                         live tree
//! ```

mod dirty;
mod host;
mod memory;

pub use dirty::Dirty;
pub use host::Host;
pub use memory::{MemoryTree, Mutation, NodeId, NodeKind};
