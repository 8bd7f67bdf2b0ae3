//! App Pipeline
//!
//! Connects application state to the live tree.
//!
//! # Pipeline Architecture
//!
//! ```text
//! Store::dispatch → Subscription → App::update → describe() → patch → Host
//! ```
//!
//! ## Data Flow
//!
//! 1. **dispatch** - Reducer replaces the state, revision signal bumps
//! 2. **update** - The connected app re-runs its describe function
//! 3. **patch** - The new VNode tree is diffed against the previous one and the
//!    host is mutated in place
//!
//! Nothing is batched: every dispatch is one full describe-and-patch cycle.

pub mod mount;

pub use mount::{connect, create_app, mount, App};
