//! Reconciliation behaviour checked end to end against MemoryTree.
//!
//! Each test mounts a tree, patches it to a new description, then inspects the
//! live nodes and the mutation log.
//!
//! Run with: cargo test --test reconcile

use spark_vtree::{
    el, h, mount, patch, render, Child, Host, MemoryTree, Mutation, NodeId, PropValue, Props,
    VNode,
};

// =============================================================================
// HELPERS
// =============================================================================

/// Render `vnode`, mount it under a fresh root and clear the log.
fn mounted(vnode: &VNode<NodeId>) -> (MemoryTree, NodeId, NodeId) {
    let mut tree = MemoryTree::new();
    let target = tree.create_root("body");
    let node = render(&mut tree, vnode).unwrap();
    mount(&mut tree, &node, &target).unwrap();
    tree.clear_mutations();
    (tree, target, node)
}

fn keyed_list(keys: &[&str]) -> VNode<NodeId> {
    el("ul")
        .children(keys.iter().map(|key| el("li").key(*key).child(*key).build()))
        .build()
}

fn todo_item(title: &str, completed: bool) -> VNode<NodeId> {
    el("li")
        .class(if completed { "completed" } else { "" })
        .child(
            el("input")
                .class("toggle")
                .prop("type", "checkbox")
                .prop("checked", completed),
        )
        .child(el("label").child(title))
        .build()
}

// =============================================================================
// RENDER
// =============================================================================

#[test]
fn test_primitives_render_as_text() {
    let mut tree = MemoryTree::new();

    let number = render(&mut tree, &VNode::<NodeId>::from(42)).unwrap();
    let float = render(&mut tree, &VNode::<NodeId>::from(1.5)).unwrap();
    let nothing = render(&mut tree, &VNode::<NodeId>::from(false)).unwrap();
    let missing = render(&mut tree, &VNode::<NodeId>::from(None::<VNode<NodeId>>)).unwrap();

    assert_eq!(tree.text(number), Some("42"));
    assert_eq!(tree.text(float), Some("1.5"));
    assert_eq!(tree.text(nothing), Some(""));
    assert_eq!(tree.text(missing), Some(""));
}

#[test]
fn test_children_flatten_one_level() {
    let items: Vec<VNode<NodeId>> = vec!["b".into(), "c".into()];
    let vnode: VNode<NodeId> = h(
        "p",
        Props::new(),
        [Child::from("a"), Child::from(items), Child::from("d")],
    );

    let mut tree = MemoryTree::new();
    let node = render(&mut tree, &vnode).unwrap();
    assert_eq!(tree.children(node).len(), 4);
    assert_eq!(tree.text_content(node), "abcd");
}

#[test]
fn test_property_values_stay_exact() {
    let vnode = todo_item("milk", false);
    let (tree, _, li) = mounted(&vnode);

    let input = tree.find_by_class(li, "toggle")[0];
    assert_eq!(
        tree.property(input, "checked").and_then(PropValue::as_bool),
        Some(false)
    );
    assert_eq!(tree.attribute(input, "checked"), None);
}

// =============================================================================
// PATCH
// =============================================================================

#[test]
fn test_repatch_with_equal_tree_mutates_nothing() {
    let old = todo_item("milk", true);
    let new = todo_item("milk", true);
    let (mut tree, target, _) = mounted(&old);

    patch(&mut tree, &target, &old, &new, 0).unwrap();
    assert!(tree.mutations().is_empty(), "{:?}", tree.mutations());
}

#[test]
fn test_leaf_text_change_keeps_parent_identity() {
    let old = todo_item("milk", false);
    let new = todo_item("oat milk", false);
    let (mut tree, target, li) = mounted(&old);
    let label = tree.find_by_tag(li, "label")[0];

    let after = patch(&mut tree, &target, &old, &new, 0).unwrap();

    assert_eq!(after, li);
    assert_eq!(tree.find_by_tag(li, "label"), vec![label]);
    assert_eq!(tree.text_content(label), "oat milk");
    assert!(tree.mutations().iter().all(|m| !matches!(m, Mutation::CreateElement { .. })));
}

#[test]
fn test_toggle_updates_property_and_class_only() {
    let old = todo_item("milk", false);
    let new = todo_item("milk", true);
    let (mut tree, target, li) = mounted(&old);
    let input = tree.find_by_class(li, "toggle")[0];

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    assert_eq!(
        tree.mutations(),
        &[
            Mutation::SetAttribute {
                node: li,
                name: "class".to_string(),
                value: "completed".to_string()
            },
            Mutation::SetProperty {
                node: input,
                name: "checked".to_string()
            },
        ]
    );
}

#[test]
fn test_tag_change_replaces_subtree() {
    let old: VNode<NodeId> = el("div").child(el("span").child("x")).build();
    let new: VNode<NodeId> = el("section").child(el("span").child("x")).build();
    let (mut tree, target, div) = mounted(&old);
    let span = tree.children(div)[0];

    let section = patch(&mut tree, &target, &old, &new, 0).unwrap();

    assert_ne!(section, div);
    assert_eq!(tree.children(target), &[section]);
    assert_ne!(tree.children(section)[0], span);
    assert_eq!(tree.parent(div), None);
}

// =============================================================================
// CHILDREN
// =============================================================================

#[test]
fn test_keyed_reorder_reuses_every_node() {
    let old = keyed_list(&["a", "b", "c"]);
    let new = keyed_list(&["c", "a", "b"]);
    let (mut tree, target, ul) = mounted(&old);
    let [a, b, c] = [0, 1, 2].map(|i| tree.children(ul)[i]);

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    assert_eq!(tree.children(ul), &[c, a, b]);
    assert!(!tree.mutations().iter().any(Mutation::is_creation));
    assert_eq!(tree.text_content(ul), "cab");
}

#[test]
fn test_keyed_remove_and_add() {
    let old = keyed_list(&["a", "b"]);
    let new = keyed_list(&["b", "c"]);
    let (mut tree, target, ul) = mounted(&old);
    let [a, b] = [0, 1].map(|i| tree.children(ul)[i]);

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    let children = tree.children(ul).to_vec();
    assert_eq!(children[0], b);
    assert_ne!(children[1], a);
    assert_eq!(tree.parent(a), None);
    assert_eq!(tree.text_content(ul), "bc");
}

#[test]
fn test_keyed_reverse() {
    let old = keyed_list(&["a", "b", "c", "d"]);
    let new = keyed_list(&["d", "c", "b", "a"]);
    let (mut tree, target, ul) = mounted(&old);
    let before = tree.children(ul).to_vec();

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    let reversed: Vec<NodeId> = before.iter().rev().copied().collect();
    assert_eq!(tree.children(ul), reversed.as_slice());
}

#[test]
fn test_mixed_keying_falls_back_to_positional() {
    let old: VNode<NodeId> = el("ul")
        .child(el("li").key("a").child("a"))
        .child(el("li").child("b"))
        .build();
    let new: VNode<NodeId> = el("ul")
        .child(el("li").child("b"))
        .child(el("li").key("a").child("a"))
        .build();
    let (mut tree, target, ul) = mounted(&old);
    let before = tree.children(ul).to_vec();

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    // Positions are patched in place; no element is moved.
    assert_eq!(tree.children(ul), before.as_slice());
    assert_eq!(tree.text_content(ul), "ba");
    assert!(!tree.mutations().iter().any(|m| matches!(m, Mutation::InsertBefore { .. })));
}

#[test]
fn test_keyed_element_beside_text_is_patched_by_position() {
    let old: VNode<NodeId> = el("div")
        .child(el("span").key("a").child("a"))
        .child("text")
        .build();
    let new: VNode<NodeId> = el("div")
        .child(el("span").key("x").child("x"))
        .child("text2")
        .build();
    let (mut tree, target, div) = mounted(&old);
    let [span, text] = [0, 1].map(|i| tree.children(div)[i]);

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    let children = tree.children(div).to_vec();
    assert_eq!(children[0], span);
    assert_ne!(children[1], text);
    assert_eq!(tree.text(children[1]), Some("text2"));
    assert_eq!(tree.parent(text), None);
    assert_eq!(tree.text_content(div), "xtext2");
    assert!(!tree.mutations().iter().any(|m| matches!(m, Mutation::InsertBefore { .. })));
}

#[test]
fn test_positional_grow_and_shrink() {
    let short: VNode<NodeId> = el("ol").child(el("li").child("1")).build();
    let long: VNode<NodeId> = el("ol")
        .child(el("li").child("1"))
        .child(el("li").child("2"))
        .child(el("li").child("3"))
        .build();
    let (mut tree, target, ol) = mounted(&short);
    let first = tree.children(ol)[0];

    patch(&mut tree, &target, &short, &long, 0).unwrap();
    assert_eq!(tree.children(ol).len(), 3);
    assert_eq!(tree.children(ol)[0], first);

    patch(&mut tree, &target, &long, &short, 0).unwrap();
    assert_eq!(tree.children(ol), &[first]);
    assert_eq!(tree.text_content(ol), "1");
}

#[test]
fn test_conditional_child_toggles_between_element_and_empty() {
    let editing = |on: bool| -> VNode<NodeId> {
        el("li")
            .child(el("label").child("milk"))
            .child(on.then(|| el("input").class("edit").prop("value", "milk").build()))
            .build()
    };

    let (mut tree, target, li) = mounted(&editing(false));
    assert_eq!(tree.children(li).len(), 2);
    assert_eq!(tree.text(tree.children(li)[1]), Some(""));

    patch(&mut tree, &target, &editing(false), &editing(true), 0).unwrap();
    let edit = tree.children(li)[1];
    assert_eq!(tree.tag(edit), Some("input"));
    assert_eq!(tree.property(edit, "value").and_then(PropValue::as_str), Some("milk"));

    patch(&mut tree, &target, &editing(true), &editing(false), 0).unwrap();
    assert_eq!(tree.text(tree.children(li)[1]), Some(""));
}

#[test]
fn test_dirty_flags_follow_patch() {
    let old = todo_item("milk", false);
    let new = todo_item("bread", false);
    let (mut tree, target, li) = mounted(&old);
    tree.take_dirty();

    patch(&mut tree, &target, &old, &new, 0).unwrap();

    let label = tree.find_by_tag(li, "label")[0];
    let dirty = tree.take_dirty();
    assert!(dirty.iter().any(|(id, flags)| *id == label && flags.contains(spark_vtree::Dirty::CHILDREN)));
    assert!(!dirty.iter().any(|(id, _)| *id == li));
}
