//! Prop classification and the Prop Reconciler.
//!
//! A prop is classified by its key, never by the declared type of its value:
//!
//! | Kind | Key | Applied as |
//! |------|-----|------------|
//! | `Key` | `key` | nothing (reconciliation identity only) |
//! | `Event` | `on*` | handler slot, event name lower-cased |
//! | `Ref` | `ref` with a hook value | hook called with the live node |
//! | `Property` | `checked`, `value`, `disabled`, `autofocus` | exact live property |
//! | `Attribute` | anything else | string attribute |

use std::rc::Rc;

use tracing::{trace, warn};

use crate::engine::Host;
use crate::types::{PropValue, Props};

/// Keys applied as live properties rather than attributes.
pub const LIVE_PROPERTIES: [&str; 4] = ["checked", "value", "disabled", "autofocus"];

/// How a prop is applied to a live node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropKind {
    /// The reserved `key` prop.
    Key,
    /// `on<event>` handler.
    Event,
    /// `ref` callback.
    Ref,
    /// Live property.
    Property,
    /// String attribute.
    Attribute,
}

impl PropKind {
    /// Classify a prop.
    pub fn classify<N>(key: &str, value: &PropValue<N>) -> Self {
        if key == "key" {
            PropKind::Key
        } else if key.starts_with("on") {
            PropKind::Event
        } else if key == "ref" && value.as_hook().is_some() {
            PropKind::Ref
        } else if LIVE_PROPERTIES.contains(&key) {
            PropKind::Property
        } else {
            PropKind::Attribute
        }
    }
}

/// Handler slot name for an `on*` key: `onClick` → `click`.
pub fn event_name(key: &str) -> String {
    key.strip_prefix("on").unwrap_or(key).to_lowercase()
}

/// Set `value` as an attribute if it has a string form.
///
/// Returns whether the attribute was set. `Null` is skipped silently; callbacks
/// under attribute keys are skipped with a warning.
fn set_attribute_value<H: Host>(
    host: &mut H,
    node: &H::Node,
    key: &str,
    value: &PropValue<H::Node>,
) -> Result<bool, H::Error> {
    match value.attribute_string() {
        Some(text) => {
            host.set_attribute(node, key, &text)?;
            Ok(true)
        }
        None => {
            if !value.is_null() {
                warn!(key, ?value, "prop value has no attribute form, skipped");
            }
            Ok(false)
        }
    }
}

// =============================================================================
// First render
// =============================================================================

/// Apply every prop of a freshly created element.
///
/// Handlers go in first, then the remaining props in map order. A `ref` hook is
/// called as soon as its turn comes, before any child exists.
pub(crate) fn apply_props<H: Host>(
    host: &mut H,
    node: &H::Node,
    props: &Props<H::Node>,
) -> Result<(), H::Error> {
    for (key, value) in props.iter() {
        if PropKind::classify(key, value) != PropKind::Event {
            continue;
        }
        if let Some(handler) = value.as_handler() {
            host.set_handler(node, &event_name(key), Some(handler.clone()))?;
        }
    }

    for (key, value) in props.iter() {
        match PropKind::classify(key, value) {
            PropKind::Key | PropKind::Event => {}
            PropKind::Ref => {
                if let Some(hook) = value.as_hook() {
                    hook(node);
                }
            }
            PropKind::Property => host.set_property(node, key, value)?,
            PropKind::Attribute => {
                set_attribute_value(host, node, key, value)?;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Prop Reconciler
// =============================================================================

/// Bring the props of a reused element from `old` to `new`.
///
/// Shallow, per key:
/// - keys in `new` whose value is not strictly equal to the old one are applied
///   (a non-handler value under an event key clears the slot; a `Null` attribute
///   value is skipped, never removed)
/// - keys only in `old` are cleared: event keys empty their slot, `ref` and `key`
///   are left alone, everything else has its attribute removed
///
/// # Returns
///
/// Whether anything on the live node changed. Calling a `ref` hook does not count.
pub fn patch_props<H: Host>(
    host: &mut H,
    node: &H::Node,
    old: &Rc<Props<H::Node>>,
    new: &Rc<Props<H::Node>>,
) -> Result<bool, H::Error> {
    if Rc::ptr_eq(old, new) {
        return Ok(false);
    }

    let mut changed = false;

    for (key, value) in new.iter() {
        if old.get(key).is_some_and(|previous| previous.same(value)) {
            continue;
        }
        trace!(?node, key, "prop changed");

        match PropKind::classify(key, value) {
            PropKind::Key => {}
            PropKind::Event => {
                host.set_handler(node, &event_name(key), value.as_handler().cloned())?;
                changed = true;
            }
            PropKind::Ref => {
                if let Some(hook) = value.as_hook() {
                    hook(node);
                }
            }
            PropKind::Property => {
                host.set_property(node, key, value)?;
                changed = true;
            }
            PropKind::Attribute => {
                changed |= set_attribute_value(host, node, key, value)?;
            }
        }
    }

    for (key, _) in old.iter() {
        if new.contains_key(key) || key == "key" || key == "ref" {
            continue;
        }
        trace!(?node, key, "prop removed");

        if key.starts_with("on") {
            host.set_handler(node, &event_name(key), None)?;
        } else {
            host.remove_attribute(node, key)?;
        }
        changed = true;
    }

    Ok(changed)
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;
    use crate::engine::{MemoryTree, Mutation, NodeId};

    type Map = Props<NodeId>;

    fn element() -> (MemoryTree, NodeId) {
        let mut tree = MemoryTree::new();
        let node = tree.create_element("input").unwrap();
        tree.clear_mutations();
        (tree, node)
    }

    #[test]
    fn test_classify() {
        let hook: PropValue<NodeId> = PropValue::hook(|_| {});
        let text: PropValue<NodeId> = PropValue::from("x");

        assert_eq!(PropKind::classify("key", &text), PropKind::Key);
        assert_eq!(PropKind::classify("onClick", &text), PropKind::Event);
        assert_eq!(PropKind::classify("ref", &hook), PropKind::Ref);
        assert_eq!(PropKind::classify("ref", &text), PropKind::Attribute);
        assert_eq!(PropKind::classify("checked", &text), PropKind::Property);
        assert_eq!(PropKind::classify("class", &text), PropKind::Attribute);
    }

    #[test]
    fn test_event_name() {
        assert_eq!(event_name("onClick"), "click");
        assert_eq!(event_name("onkeyup"), "keyup");
        assert_eq!(event_name("onDblClick"), "dblclick");
    }

    #[test]
    fn test_identical_maps_are_noop() {
        let (mut tree, node) = element();
        let props = Rc::new(Map::new().with("class", "a"));

        let changed = patch_props(&mut tree, &node, &props, &props.clone()).unwrap();
        assert!(!changed);
        assert!(tree.mutations().is_empty());
    }

    #[test]
    fn test_equal_values_are_skipped() {
        let (mut tree, node) = element();
        let old = Rc::new(Map::new().with("class", "a").with("checked", true));
        let new = Rc::new(Map::new().with("class", "a").with("checked", true));

        assert!(!patch_props(&mut tree, &node, &old, &new).unwrap());
        assert!(tree.mutations().is_empty());
    }

    #[test]
    fn test_changed_and_added_values_are_applied() {
        let (mut tree, node) = element();
        let old = Rc::new(Map::new().with("class", "a"));
        let new = Rc::new(Map::new().with("class", "b").with("checked", false));

        assert!(patch_props(&mut tree, &node, &old, &new).unwrap());
        assert_eq!(tree.attribute(node, "class"), Some("b"));
        assert_eq!(
            tree.property(node, "checked").and_then(PropValue::as_bool),
            Some(false)
        );
    }

    #[test]
    fn test_null_attribute_is_skipped_not_removed() {
        let (mut tree, node) = element();
        tree.set_attribute(&node, "title", "kept").unwrap();
        tree.clear_mutations();

        let old = Rc::new(Map::new().with("title", "kept"));
        let new = Rc::new(Map::new().with("title", PropValue::<NodeId>::Null));

        assert!(!patch_props(&mut tree, &node, &old, &new).unwrap());
        assert_eq!(tree.attribute(node, "title"), Some("kept"));
        assert!(tree.mutations().is_empty());
    }

    #[test]
    fn test_missing_keys_are_removed() {
        let (mut tree, node) = element();
        let handler: PropValue<NodeId> = PropValue::handler(|_| {});
        let hook: PropValue<NodeId> = PropValue::hook(|_| {});

        let old = Rc::new(
            Map::new()
                .with("title", "x")
                .with("onclick", handler)
                .with("ref", hook)
                .with("key", "k")
                .with("value", "v"),
        );
        let new = Rc::new(Map::new());

        assert!(patch_props(&mut tree, &node, &old, &new).unwrap());
        assert_eq!(
            tree.mutations(),
            &[
                Mutation::RemoveAttribute {
                    node,
                    name: "title".to_string()
                },
                Mutation::SetHandler {
                    node,
                    event: "click".to_string(),
                    installed: false
                },
                Mutation::RemoveAttribute {
                    node,
                    name: "value".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_ref_called_only_when_changed() {
        let (mut tree, node) = element();
        let calls = Rc::new(Cell::new(0));

        let counter = calls.clone();
        let hook: PropValue<NodeId> = PropValue::hook(move |_| counter.set(counter.get() + 1));

        let old = Rc::new(Map::new().with("ref", hook.clone()));
        let same = Rc::new(Map::new().with("ref", hook));
        patch_props(&mut tree, &node, &old, &same).unwrap();
        assert_eq!(calls.get(), 0);

        let counter = calls.clone();
        let replaced = Rc::new(
            Map::new().with("ref", PropValue::hook(move |_| counter.set(counter.get() + 1))),
        );
        let changed = patch_props(&mut tree, &node, &same, &replaced).unwrap();
        assert_eq!(calls.get(), 1);
        assert!(!changed);
    }

    #[test]
    fn test_event_key_with_non_handler_clears_slot() {
        let (mut tree, node) = element();
        let handler: PropValue<NodeId> = PropValue::handler(|_| {});
        apply_props(&mut tree, &node, &Map::new().with("onclick", handler.clone())).unwrap();
        assert!(tree.handler(node, "click").is_some());

        let old = Rc::new(Map::new().with("onclick", handler));
        let new = Rc::new(Map::new().with("onclick", PropValue::<NodeId>::Null));
        patch_props(&mut tree, &node, &old, &new).unwrap();
        assert!(tree.handler(node, "click").is_none());
    }

    #[test]
    fn test_apply_props_installs_handlers_first() {
        let (mut tree, node) = element();
        let props = Map::new()
            .with("class", "toggle")
            .with("onChange", PropValue::handler(|_| {}))
            .with("key", "a");

        apply_props(&mut tree, &node, &props).unwrap();
        assert_eq!(
            tree.mutations(),
            &[
                Mutation::SetHandler {
                    node,
                    event: "change".to_string(),
                    installed: true
                },
                Mutation::SetAttribute {
                    node,
                    name: "class".to_string(),
                    value: "toggle".to_string()
                },
            ]
        );
        assert_eq!(tree.attribute(node, "key"), None);
    }
}
