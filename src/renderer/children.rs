//! Children Reconciler - keyed and positional child-list patching.
//!
//! Mode is chosen for the whole list: keyed only when every old and every new
//! child is an element carrying a `key`. One unkeyed child anywhere drops the
//! list to positional mode.
//!
//! Keyed mode is a plain rescan, not a minimal-move diff: for each new position
//! it looks at whatever live node currently sits there and moves the matching
//! node in front of it when they differ.

use indexmap::IndexMap;
use tracing::{trace, warn};

use crate::engine::Host;
use crate::types::{Key, VNode};

use super::diff::patch;
use super::render::render;

/// Old child as seen before any mutation of this pass.
struct OldEntry<'a, N> {
    vnode: &'a VNode<N>,
    node: Option<N>,
}

/// Patch the children of `parent` from `old` to `new`.
///
/// The live children of `parent` must mirror `old` on entry; they mirror `new`
/// on return.
pub fn patch_children<H: Host>(
    host: &mut H,
    parent: &H::Node,
    old: &[VNode<H::Node>],
    new: &[VNode<H::Node>],
) -> Result<(), H::Error> {
    let keyed = old.iter().chain(new).all(|child| child.key().is_some());
    trace!(?parent, keyed, old = old.len(), new = new.len(), "patch children");

    if keyed {
        patch_keyed(host, parent, old, new)
    } else {
        patch_positional(host, parent, old, new)
    }
}

// =============================================================================
// Keyed
// =============================================================================

fn patch_keyed<H: Host>(
    host: &mut H,
    parent: &H::Node,
    old: &[VNode<H::Node>],
    new: &[VNode<H::Node>],
) -> Result<(), H::Error> {
    let mut old_map: IndexMap<Key, OldEntry<'_, H::Node>> = IndexMap::with_capacity(old.len());
    for (index, vnode) in old.iter().enumerate() {
        let Some(key) = vnode.key() else { continue };
        let entry = OldEntry {
            vnode,
            node: host.child_at(parent, index),
        };
        if old_map.insert(key.clone(), entry).is_some() {
            warn!(?parent, %key, "duplicate key among old children");
        }
    }

    let mut new_map: IndexMap<Key, usize> = IndexMap::with_capacity(new.len());
    for (index, vnode) in new.iter().enumerate() {
        let Some(key) = vnode.key() else { continue };
        if new_map.insert(key.clone(), index).is_some() {
            warn!(?parent, %key, "duplicate key among new children");
        }
    }

    for (key, entry) in &old_map {
        if new_map.contains_key(key) {
            continue;
        }
        if let Some(node) = &entry.node {
            trace!(?parent, %key, "remove keyed child");
            host.remove_child(parent, node)?;
        }
    }

    for (index, vnode) in new.iter().enumerate() {
        let Some(key) = vnode.key() else { continue };
        let current = host.child_at(parent, index);

        let reused = old_map.get(&key).and_then(|entry| {
            let node = entry.node.clone()?;
            let position = host.position_of(parent, &node)?;
            Some((entry.vnode, node, position))
        });

        match reused {
            Some((old_vnode, old_node, position)) => {
                let node = patch(host, parent, old_vnode, vnode, position)?;
                if current.as_ref() != Some(&old_node) {
                    trace!(?parent, %key, from = position, to = index, "move keyed child");
                    host.insert_before(parent, &node, current.as_ref())?;
                }
            }
            None => {
                trace!(?parent, %key, index, "insert keyed child");
                let node = render(host, vnode)?;
                host.insert_before(parent, &node, current.as_ref())?;
            }
        }
    }

    Ok(())
}

// =============================================================================
// Positional
// =============================================================================

fn patch_positional<H: Host>(
    host: &mut H,
    parent: &H::Node,
    old: &[VNode<H::Node>],
    new: &[VNode<H::Node>],
) -> Result<(), H::Error> {
    let common = old.len().min(new.len());

    for index in 0..common {
        patch(host, parent, &old[index], &new[index], index)?;
    }

    if old.len() > new.len() {
        for index in (new.len()..old.len()).rev() {
            if let Some(node) = host.child_at(parent, index) {
                host.remove_child(parent, &node)?;
            }
        }
    } else {
        for vnode in &new[old.len()..] {
            let node = render(host, vnode)?;
            host.append_child(parent, &node)?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{MemoryTree, Mutation, NodeId};
    use crate::primitives::el;

    fn item(key: &str) -> VNode<NodeId> {
        el("li").key(key).child(key).build()
    }

    fn plain(label: &str) -> VNode<NodeId> {
        el("li").child(label).build()
    }

    fn mount_list(children: &[VNode<NodeId>]) -> (MemoryTree, NodeId) {
        let mut tree = MemoryTree::new();
        let parent = tree.create_root("ul");
        for child in children {
            let node = render(&mut tree, child).unwrap();
            tree.append_child(&parent, &node).unwrap();
        }
        tree.clear_mutations();
        (tree, parent)
    }

    #[test]
    fn test_keyed_reorder_moves_existing_nodes() {
        let old = vec![item("a"), item("b"), item("c")];
        let new = vec![item("c"), item("a"), item("b")];
        let (mut tree, parent) = mount_list(&old);
        let before = tree.children(parent).to_vec();

        patch_children(&mut tree, &parent, &old, &new).unwrap();

        assert_eq!(tree.children(parent), &[before[2], before[0], before[1]]);
        assert!(!tree.mutations().iter().any(Mutation::is_creation));
    }

    #[test]
    fn test_keyed_remove_and_add() {
        let old = vec![item("a"), item("b")];
        let new = vec![item("b"), item("c")];
        let (mut tree, parent) = mount_list(&old);
        let before = tree.children(parent).to_vec();

        patch_children(&mut tree, &parent, &old, &new).unwrap();

        let after = tree.children(parent).to_vec();
        assert_eq!(after.len(), 2);
        assert_eq!(after[0], before[1]);
        assert!(!before.contains(&after[1]));
        assert_eq!(tree.text_content(parent), "bc");
        assert_eq!(tree.parent(before[0]), None);
    }

    #[test]
    fn test_keyed_from_empty_and_to_empty() {
        let (mut tree, parent) = mount_list(&[]);
        let new = vec![item("a"), item("b")];
        patch_children(&mut tree, &parent, &[], &new).unwrap();
        assert_eq!(tree.text_content(parent), "ab");

        patch_children(&mut tree, &parent, &new, &[]).unwrap();
        assert!(tree.children(parent).is_empty());
    }

    #[test]
    fn test_mixed_keys_fall_back_to_positional() {
        let old = vec![item("a"), plain("b")];
        let new = vec![plain("b"), item("a")];
        let (mut tree, parent) = mount_list(&old);
        let before = tree.children(parent).to_vec();

        patch_children(&mut tree, &parent, &old, &new).unwrap();

        // Positional: same element tags at the same indices are reused in place.
        assert_eq!(tree.children(parent), before.as_slice());
        assert_eq!(tree.text_content(parent), "ba");
        assert!(!tree.mutations().iter().any(|m| matches!(m, Mutation::InsertBefore { .. })));
    }

    #[test]
    fn test_positional_truncates_from_the_end() {
        let old = vec![plain("a"), plain("b"), plain("c")];
        let new = vec![plain("a")];
        let (mut tree, parent) = mount_list(&old);
        let before = tree.children(parent).to_vec();

        patch_children(&mut tree, &parent, &old, &new).unwrap();

        assert_eq!(tree.children(parent), &[before[0]]);
        assert_eq!(
            tree.mutations(),
            &[
                Mutation::Remove {
                    parent,
                    child: before[2]
                },
                Mutation::Remove {
                    parent,
                    child: before[1]
                },
            ]
        );
    }

    #[test]
    fn test_positional_appends_surplus() {
        let old = vec![plain("a")];
        let new = vec![plain("a"), plain("b"), VNode::from(3)];
        let (mut tree, parent) = mount_list(&old);

        patch_children(&mut tree, &parent, &old, &new).unwrap();
        assert_eq!(tree.text_content(parent), "ab3");
    }

    #[test]
    fn test_keyed_patch_updates_reused_content() {
        let old = vec![item("a"), item("b")];
        let new = vec![
            el("li").key("b").class("done").child("b!").build(),
            item("a"),
        ];
        let (mut tree, parent) = mount_list(&old);
        let before = tree.children(parent).to_vec();

        patch_children(&mut tree, &parent, &old, &new).unwrap();

        assert_eq!(tree.children(parent), &[before[1], before[0]]);
        assert_eq!(tree.attribute(before[1], "class"), Some("done"));
        assert_eq!(tree.text_content(parent), "b!a");
    }
}
