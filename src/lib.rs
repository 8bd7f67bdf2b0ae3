//! # spark-vtree
//!
//! Minimal virtual-tree rendering engine for Rust.
//!
//! Describe a UI as an immutable tree of [`VNode`]s, render it once into a live
//! tree owned by a [`Host`], then on every state change describe it again and let
//! the reconciler apply only the mutations needed to get from the old description
//! to the new one.
//!
//! ## Architecture
//!
//! ```text
//! describe() → VNode tree → render / patch → Host mutations → live tree
//!                                 ▲
//!              Store::dispatch ───┘ (App::update via connect)
//! ```
//!
//! The reconciliation strategy is simple: a shallow per-key prop
//! diff, a keyed child diff that rescans positions (no minimal-move search), and
//! a positional fallback whenever any child in a list lacks a key.
//!
//! ## Modules
//!
//! - [`types`] - VNode model (VNode, Element, Props, PropValue, Key, Event)
//! - [`primitives`] - VNode construction (`create_element`, `h`, `el` builder)
//! - [`engine`] - Host capability trait and the in-memory `MemoryTree`
//! - [`renderer`] - Renderer, prop/node/children reconcilers, outline printer
//! - [`pipeline`] - Mount, `create_app`, store connection
//! - [`state`] - Reducer store, fragment router, terminal key input
//! - [`error`] - Errors raised by `MemoryTree`

pub mod engine;
pub mod error;
pub mod pipeline;
pub mod primitives;
pub mod renderer;
pub mod state;
pub mod types;

// Re-export commonly used items
pub use types::*;

pub use engine::{Dirty, Host, MemoryTree, Mutation, NodeId, NodeKind};

pub use error::MemoryError;

pub use primitives::{create_element, el, flatten_children, h, text, Child, ElementBuilder};

pub use renderer::{
    patch, patch_children, patch_props, render, write_outline, outline_string, OutlineOptions,
    PropKind,
};

pub use pipeline::{connect, create_app, mount, App};

pub use state::{route_from_hash, Dispatch, Router, Store, Subscription};
