//! ElementBuilder - chained element construction.

use std::rc::Rc;

use crate::types::{Element, Event, Hooks, PropValue, Props, VNode};

use super::element::Child;

/// Start building an element with the given tag.
///
/// # Example
///
/// ```ignore
/// let input: VNode<NodeId> = el("input")
///     .prop("class", "toggle")
///     .prop("type", "checkbox")
///     .prop("checked", todo.completed)
///     .on("change", move |_| dispatch(Action::Toggle(id)))
///     .build();
/// ```
pub fn el<N>(tag: impl Into<String>) -> ElementBuilder<N> {
    ElementBuilder {
        tag: tag.into(),
        props: Props::new(),
        children: Vec::new(),
        hooks: Hooks::default(),
    }
}

/// Builder returned by [`el`].
pub struct ElementBuilder<N> {
    tag: String,
    props: Props<N>,
    children: Vec<VNode<N>>,
    hooks: Hooks<N>,
}

impl<N: 'static> ElementBuilder<N> {
    /// Set a prop. How it is applied depends on the key.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<PropValue<N>>) -> Self {
        self.props.insert(key, value);
        self
    }

    /// Shorthand for the `class` attribute.
    pub fn class(self, value: impl Into<String>) -> Self {
        self.prop("class", value.into())
    }

    /// Set the reconciliation key.
    pub fn key(self, value: impl Into<PropValue<N>>) -> Self {
        self.prop("key", value)
    }

    /// Install a handler for `event` (stored under the `on<event>` prop key).
    pub fn on(self, event: &str, handler: impl Fn(&Event<N>) + 'static) -> Self {
        self.prop(format!("on{event}"), PropValue::handler(handler))
    }

    /// Set the `ref` prop: called with the live node on creation and whenever the
    /// ref callback itself changes.
    pub fn node_ref(self, hook: impl Fn(&N) + 'static) -> Self {
        self.prop("ref", PropValue::hook(hook))
    }

    /// Fill the element-created slot.
    pub fn on_created(mut self, hook: impl Fn(&N) + 'static) -> Self {
        self.hooks.created = Some(Rc::new(hook));
        self
    }

    /// Fill the element-updated slot.
    pub fn on_updated(mut self, hook: impl Fn(&N) + 'static) -> Self {
        self.hooks.updated = Some(Rc::new(hook));
        self
    }

    /// Append one child (lists are spliced one level).
    pub fn child(mut self, child: impl Into<Child<N>>) -> Self {
        match child.into() {
            Child::Node(node) => self.children.push(node),
            Child::List(nodes) => self.children.extend(nodes),
        }
        self
    }

    /// Append several children.
    pub fn children(mut self, children: impl IntoIterator<Item = VNode<N>>) -> Self {
        self.children.extend(children);
        self
    }

    /// Finish the element.
    pub fn build(self) -> VNode<N> {
        VNode::Element(Rc::new(Element {
            tag: self.tag,
            props: Rc::new(self.props),
            children: self.children,
            hooks: self.hooks,
        }))
    }
}

impl<N: 'static> From<ElementBuilder<N>> for VNode<N> {
    fn from(builder: ElementBuilder<N>) -> Self {
        builder.build()
    }
}

impl<N: 'static> From<ElementBuilder<N>> for Child<N> {
    fn from(builder: ElementBuilder<N>) -> Self {
        Child::Node(builder.build())
    }
}
