//! State Module - application state around the renderer
//!
//! - **Store** - reducer state container, one notification per dispatch
//! - **Router** - fragment routes dispatched into a store
//! - **Input** - crossterm key events converted for event handlers

pub mod input;
pub mod router;
pub mod store;

pub use input::{convert_key_event, poll_event, read_event, InputEvent, KeyInput, ENTER_KEY, ESCAPE_KEY};
pub use router::{route_from_hash, Router, DEFAULT_ROUTE};
pub use store::{Dispatch, Store, Subscription};
