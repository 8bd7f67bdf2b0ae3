//! Renderer - build a fresh live subtree from a VNode.

use tracing::trace;

use crate::engine::Host;
use crate::types::VNode;

use super::props::apply_props;

/// Render a VNode into a new, detached live subtree.
///
/// - `Empty` becomes an empty text node
/// - `Text` becomes a text node with the value's string form
/// - `Element` is created, its props applied, its children rendered and appended
///   in order, and finally its `created` hook called
///
/// Nothing is cached: rendering the same VNode twice builds two independent trees.
///
/// # Example
///
/// ```ignore
/// let node = render(&mut tree, &h("p", Props::new(), ["hi".into()]))?;
/// tree.append_child(&root, &node)?;
/// ```
pub fn render<H: Host>(host: &mut H, vnode: &VNode<H::Node>) -> Result<H::Node, H::Error> {
    let element = match vnode {
        VNode::Empty => return host.create_text(""),
        VNode::Text(primitive) => return host.create_text(&primitive.to_text()),
        VNode::Element(element) => element,
    };

    let node = host.create_element(&element.tag)?;
    trace!(?node, tag = %element.tag, "render element");

    apply_props(host, &node, &element.props)?;

    for child in &element.children {
        let child_node = render(host, child)?;
        host.append_child(&node, &child_node)?;
    }

    if let Some(created) = &element.hooks.created {
        created(&node);
    }

    Ok(node)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use super::*;
    use crate::engine::{MemoryTree, NodeId};
    use crate::primitives::{el, h, Child};
    use crate::types::{PropValue, Props};

    #[test]
    fn test_render_primitives() {
        let mut tree = MemoryTree::new();

        let empty = render(&mut tree, &VNode::<NodeId>::Empty).unwrap();
        let number = render(&mut tree, &VNode::<NodeId>::from(42)).unwrap();
        let string = render(&mut tree, &VNode::<NodeId>::from("hi")).unwrap();

        assert_eq!(tree.text(empty), Some(""));
        assert_eq!(tree.text(number), Some("42"));
        assert_eq!(tree.text(string), Some("hi"));
    }

    #[test]
    fn test_render_element_with_children() {
        let mut tree = MemoryTree::new();
        let vnode: VNode<NodeId> = h(
            "ul",
            Props::new().with("class", "list"),
            [
                Child::Node(h("li", Props::new(), ["a".into()])),
                Child::Node(h("li", Props::new(), ["b".into()])),
            ],
        );

        let ul = render(&mut tree, &vnode).unwrap();
        assert_eq!(tree.tag(ul), Some("ul"));
        assert_eq!(tree.attribute(ul, "class"), Some("list"));
        assert_eq!(tree.children(ul).len(), 2);
        assert_eq!(tree.text_content(ul), "ab");
    }

    #[test]
    fn test_properties_keep_exact_values() {
        let mut tree = MemoryTree::new();
        let vnode: VNode<NodeId> = el("input")
            .prop("checked", false)
            .prop("value", "")
            .prop("type", "checkbox")
            .build();

        let input = render(&mut tree, &vnode).unwrap();
        assert_eq!(
            tree.property(input, "checked").and_then(PropValue::as_bool),
            Some(false)
        );
        assert_eq!(tree.property(input, "value").and_then(PropValue::as_str), Some(""));
        assert_eq!(tree.attribute(input, "checked"), None);
        assert_eq!(tree.attribute(input, "type"), Some("checkbox"));
    }

    #[test]
    fn test_ref_runs_before_children_and_created_after() {
        let mut tree = MemoryTree::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let on_ref = seen.clone();
        let on_created = seen.clone();
        let vnode: VNode<NodeId> = el("div")
            .node_ref(move |_| on_ref.borrow_mut().push("ref"))
            .on_created(move |_| on_created.borrow_mut().push("created"))
            .child("x")
            .build();

        let node = render(&mut tree, &vnode).unwrap();
        assert_eq!(*seen.borrow(), vec!["ref", "created"]);
        assert_eq!(tree.children(node).len(), 1);
    }

    #[test]
    fn test_render_twice_builds_independent_trees() {
        let mut tree = MemoryTree::new();
        let vnode: VNode<NodeId> = h("p", Props::new(), ["x".into()]);

        let first = render(&mut tree, &vnode).unwrap();
        let second = render(&mut tree, &vnode).unwrap();
        assert_ne!(first, second);
        assert_ne!(tree.children(first), tree.children(second));
    }
}
