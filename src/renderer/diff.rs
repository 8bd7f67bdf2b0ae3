//! Node Reconciler - patch one live node from an old VNode to a new one.
//!
//! Decision per position:
//!
//! ```text
//! no live node at index ───────────────► render + append
//! either side not an element ──┬─ same string form ─► untouched
//!                              └─ different ────────► replace with fresh render
//! both elements, tag differs ──────────► replace with fresh render
//! both elements, same tag ─────────────► patch_props + patch_children (+ updated hook)
//! ```

use tracing::trace;

use crate::engine::Host;
use crate::types::VNode;

use super::children::patch_children;
use super::props::patch_props;
use super::render::render;

/// Patch the live child of `parent` at `index` from `old` to `new`.
///
/// `old` must be the VNode the live node was last rendered or patched from.
///
/// # Returns
///
/// The live node that now represents `new`: the reused node, its replacement, or
/// a freshly appended node when `index` was past the end.
pub fn patch<H: Host>(
    host: &mut H,
    parent: &H::Node,
    old: &VNode<H::Node>,
    new: &VNode<H::Node>,
    index: usize,
) -> Result<H::Node, H::Error> {
    let Some(node) = host.child_at(parent, index) else {
        trace!(?parent, index, "no live node, appending");
        let fresh = render(host, new)?;
        host.append_child(parent, &fresh)?;
        return Ok(fresh);
    };

    let (old_element, new_element) = match (old, new) {
        (VNode::Element(old_element), VNode::Element(new_element)) => (old_element, new_element),
        _ => {
            // Element vs primitive has no common string form and always replaces.
            let same = match (old.text_form(), new.text_form()) {
                (Some(before), Some(after)) => before == after,
                _ => false,
            };
            if same {
                return Ok(node);
            }
            return replace(host, parent, &node, new);
        }
    };

    if old_element.tag != new_element.tag {
        return replace(host, parent, &node, new);
    }

    let changed = patch_props(host, &node, &old_element.props, &new_element.props)?;
    patch_children(host, &node, &old_element.children, &new_element.children)?;

    if changed {
        if let Some(updated) = &new_element.hooks.updated {
            updated(&node);
        }
    }

    Ok(node)
}

fn replace<H: Host>(
    host: &mut H,
    parent: &H::Node,
    node: &H::Node,
    new: &VNode<H::Node>,
) -> Result<H::Node, H::Error> {
    trace!(?parent, ?node, "replace");
    let fresh = render(host, new)?;
    host.replace_child(parent, &fresh, node)?;
    Ok(fresh)
}
