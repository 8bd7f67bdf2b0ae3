//! Renderer and reconcilers.
//!
//! Turns VNodes into live nodes and keeps the live tree in step with new VNodes.
//!
//! # Architecture
//!
//! ```text
//! render ◄──────────────── patch ◄──── App::update
//!   │                      │    │
//!   ▼                      ▼    ▼
//! apply_props      patch_props  patch_children ──► patch (per child)
//! ```
//!
//! - [`render`] builds a fresh detached subtree
//! - [`patch`] reuses, replaces or appends one live node
//! - [`patch_props`] shallow per-key prop diff
//! - [`patch_children`] keyed or positional child-list diff
//! - [`write_outline`] prints a `MemoryTree` for humans

pub mod children;
pub mod diff;
pub mod outline;
pub mod props;
pub mod render;

pub use children::patch_children;
pub use diff::patch;
pub use outline::{outline_string, write_outline, OutlineOptions};
pub use props::{event_name, patch_props, PropKind, LIVE_PROPERTIES};
pub use render::render;
