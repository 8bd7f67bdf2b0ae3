//! Core types for spark-vtree.
//!
//! These are the data shapes that flow through the whole engine:
//! - [`VNode`] - immutable description of one UI-tree node
//! - [`Element`] - tag, props, children and hook slots of an element node
//! - [`Props`] / [`PropValue`] - insertion-ordered prop map
//! - [`Key`] - per-sibling reconciliation identity
//! - [`Event`], [`Handler`], [`RefHook`] - callbacks that receive live nodes
//!
//! Every type is generic over `N`, the host's live-node handle (see
//! [`crate::engine::Host::Node`]). Hooks and handlers receive that handle, so the
//! description has to know what it will be rendered into.

use std::fmt;
use std::rc::Rc;

use indexmap::IndexMap;

// =============================================================================
// Callbacks
// =============================================================================

/// Event handler installed into a live node's single-slot handler for one event name.
///
/// Rc so the same handler can be shared between renders; reconciliation compares
/// handlers by pointer identity.
pub type Handler<N> = Rc<dyn Fn(&Event<N>)>;

/// Callback that receives a live node (the `ref` prop and the element hook slots).
pub type RefHook<N> = Rc<dyn Fn(&N)>;

/// An event delivered to a [`Handler`].
///
/// Hosts decide what they put in here. The in-memory host fills `value` for
/// input-like events and `key_code` for keyboard events.
#[derive(Debug, Clone, PartialEq)]
pub struct Event<N> {
    /// Lower-case event name (`click`, `keyup`, ...).
    pub name: String,
    /// The live node the event was fired on.
    pub target: N,
    /// Current value of the target, when the host has one.
    pub value: Option<String>,
    /// Key code for keyboard events.
    pub key_code: Option<u32>,
}

impl<N> Event<N> {
    /// Create an event with no value and no key code.
    pub fn new(name: impl Into<String>, target: N) -> Self {
        Self {
            name: name.into(),
            target,
            value: None,
            key_code: None,
        }
    }

    /// Attach the target's current value.
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a key code.
    pub fn with_key_code(mut self, key_code: u32) -> Self {
        self.key_code = Some(key_code);
        self
    }
}

// =============================================================================
// Number formatting
// =============================================================================

/// Format a number the way text content expects it.
///
/// Integral values print without a fraction (`42`, not `42.0`), `-0` prints as `0`,
/// non-finite values print as `NaN` / `Infinity` / `-Infinity`, and very large or
/// very small magnitudes switch to exponent notation (`1e+21`, `1e-7`).
pub fn number_to_string(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (1e-6..1e21).contains(&magnitude) {
        return format!("{value}");
    }

    // LowerExp prints `1e21` / `1.5e-7`; positive exponents carry an explicit sign.
    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}

// =============================================================================
// PropValue
// =============================================================================

/// A single prop value.
///
/// The variant does not decide how a prop is applied; the key does (see
/// [`crate::renderer::PropKind`]). The variant only matters for the `ref` key and
/// for what can be turned into an attribute string.
pub enum PropValue<N> {
    /// String value.
    Str(String),
    /// Numeric value.
    Num(f64),
    /// Boolean value.
    Bool(bool),
    /// Explicit "nothing". Skipped on assignment, never removes anything.
    Null,
    /// Event handler.
    Handler(Handler<N>),
    /// Callback receiving the live node.
    Hook(RefHook<N>),
}

impl<N> PropValue<N> {
    /// Wrap a closure as a handler value.
    pub fn handler(f: impl Fn(&Event<N>) + 'static) -> Self
    where
        N: 'static,
    {
        PropValue::Handler(Rc::new(f))
    }

    /// Wrap a closure as a hook value.
    pub fn hook(f: impl Fn(&N) + 'static) -> Self
    where
        N: 'static,
    {
        PropValue::Hook(Rc::new(f))
    }

    /// Strict equality: scalars by value (so `NaN` never equals itself),
    /// callbacks by pointer identity.
    pub fn same(&self, other: &Self) -> bool {
        match (self, other) {
            (PropValue::Str(a), PropValue::Str(b)) => a == b,
            (PropValue::Num(a), PropValue::Num(b)) => a == b,
            (PropValue::Bool(a), PropValue::Bool(b)) => a == b,
            (PropValue::Null, PropValue::Null) => true,
            (PropValue::Handler(a), PropValue::Handler(b)) => Rc::ptr_eq(a, b),
            (PropValue::Hook(a), PropValue::Hook(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }

    /// The handler, if this value is one.
    pub fn as_handler(&self) -> Option<&Handler<N>> {
        match self {
            PropValue::Handler(handler) => Some(handler),
            _ => None,
        }
    }

    /// The hook, if this value is one.
    pub fn as_hook(&self) -> Option<&RefHook<N>> {
        match self {
            PropValue::Hook(hook) => Some(hook),
            _ => None,
        }
    }

    /// The boolean, if this value is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            PropValue::Bool(value) => Some(*value),
            _ => None,
        }
    }

    /// The string, if this value is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::Str(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this is [`PropValue::Null`].
    pub fn is_null(&self) -> bool {
        matches!(self, PropValue::Null)
    }

    /// String form used when the value is set as an attribute.
    ///
    /// `Null` and callbacks have no string form.
    pub fn attribute_string(&self) -> Option<String> {
        match self {
            PropValue::Str(value) => Some(value.clone()),
            PropValue::Num(value) => Some(number_to_string(*value)),
            PropValue::Bool(value) => Some(value.to_string()),
            PropValue::Null | PropValue::Handler(_) | PropValue::Hook(_) => None,
        }
    }
}

impl<N> Clone for PropValue<N> {
    fn clone(&self) -> Self {
        match self {
            PropValue::Str(value) => PropValue::Str(value.clone()),
            PropValue::Num(value) => PropValue::Num(*value),
            PropValue::Bool(value) => PropValue::Bool(*value),
            PropValue::Null => PropValue::Null,
            PropValue::Handler(handler) => PropValue::Handler(handler.clone()),
            PropValue::Hook(hook) => PropValue::Hook(hook.clone()),
        }
    }
}

impl<N> fmt::Debug for PropValue<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Str(value) => f.debug_tuple("Str").field(value).finish(),
            PropValue::Num(value) => f.debug_tuple("Num").field(value).finish(),
            PropValue::Bool(value) => f.debug_tuple("Bool").field(value).finish(),
            PropValue::Null => f.write_str("Null"),
            PropValue::Handler(_) => f.write_str("Handler(..)"),
            PropValue::Hook(_) => f.write_str("Hook(..)"),
        }
    }
}

impl<N> From<&str> for PropValue<N> {
    fn from(value: &str) -> Self {
        PropValue::Str(value.to_string())
    }
}

impl<N> From<String> for PropValue<N> {
    fn from(value: String) -> Self {
        PropValue::Str(value)
    }
}

impl<N> From<&String> for PropValue<N> {
    fn from(value: &String) -> Self {
        PropValue::Str(value.clone())
    }
}

impl<N> From<bool> for PropValue<N> {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl<N> From<f64> for PropValue<N> {
    fn from(value: f64) -> Self {
        PropValue::Num(value)
    }
}

impl<N> From<i32> for PropValue<N> {
    fn from(value: i32) -> Self {
        PropValue::Num(f64::from(value))
    }
}

impl<N> From<u32> for PropValue<N> {
    fn from(value: u32) -> Self {
        PropValue::Num(f64::from(value))
    }
}

impl<N> From<i64> for PropValue<N> {
    fn from(value: i64) -> Self {
        PropValue::Num(value as f64)
    }
}

impl<N> From<u64> for PropValue<N> {
    fn from(value: u64) -> Self {
        PropValue::Num(value as f64)
    }
}

impl<N> From<usize> for PropValue<N> {
    fn from(value: usize) -> Self {
        PropValue::Num(value as f64)
    }
}

impl<N, T: Into<PropValue<N>>> From<Option<T>> for PropValue<N> {
    fn from(value: Option<T>) -> Self {
        value.map_or(PropValue::Null, Into::into)
    }
}

// =============================================================================
// Key
// =============================================================================

/// Reconciliation identity of a sibling, taken from its `key` prop.
///
/// Strings and numbers never collide (`"1"` and `1` are different keys).
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
    /// String key.
    Str(String),
    /// Numeric key, stored as normalised bits (`-0` folds into `0`, all NaNs are one key).
    Num(u64),
    /// Boolean key.
    Bool(bool),
    /// An explicit `Null` key. Still counts as keyed.
    Null,
}

impl Key {
    /// Key for a `key` prop value. Callbacks cannot be keys.
    pub fn from_prop<N>(value: &PropValue<N>) -> Option<Key> {
        match value {
            PropValue::Str(value) => Some(Key::Str(value.clone())),
            PropValue::Num(value) => {
                let normalised = if *value == 0.0 {
                    0.0
                } else if value.is_nan() {
                    f64::NAN
                } else {
                    *value
                };
                Some(Key::Num(normalised.to_bits()))
            }
            PropValue::Bool(value) => Some(Key::Bool(*value)),
            PropValue::Null => Some(Key::Null),
            PropValue::Handler(_) | PropValue::Hook(_) => None,
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Str(value) => write!(f, "{value:?}"),
            Key::Num(bits) => f.write_str(&number_to_string(f64::from_bits(*bits))),
            Key::Bool(value) => write!(f, "{value}"),
            Key::Null => f.write_str("null"),
        }
    }
}

impl From<&str> for Key {
    fn from(value: &str) -> Self {
        Key::Str(value.to_string())
    }
}

// =============================================================================
// Props
// =============================================================================

/// Insertion-ordered prop map.
///
/// Order is the order props are applied in on first render.
pub struct Props<N> {
    entries: IndexMap<String, PropValue<N>>,
}

impl<N> Props<N> {
    /// Empty prop map.
    pub fn new() -> Self {
        Self {
            entries: IndexMap::new(),
        }
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<PropValue<N>>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert or overwrite a prop. Overwriting keeps the original position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<PropValue<N>>) {
        self.entries.insert(key.into(), value.into());
    }

    /// Look up a prop.
    pub fn get(&self, key: &str) -> Option<&PropValue<N>> {
        self.entries.get(key)
    }

    /// Whether the map has an entry for `key` (even a `Null` one).
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterate entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropValue<N>)> {
        self.entries.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether there are no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Reconciliation key, if the `key` prop holds a keyable value.
    pub fn key(&self) -> Option<Key> {
        self.get("key").and_then(Key::from_prop)
    }
}

impl<N> Default for Props<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N> Clone for Props<N> {
    fn clone(&self) -> Self {
        Self {
            entries: self.entries.clone(),
        }
    }
}

impl<N> fmt::Debug for Props<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.entries.iter()).finish()
    }
}

impl<N, K: Into<String>, V: Into<PropValue<N>>> FromIterator<(K, V)> for Props<N> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut props = Props::new();
        for (key, value) in iter {
            props.insert(key, value);
        }
        props
    }
}

// =============================================================================
// Hooks
// =============================================================================

/// Explicit lifecycle slots of an element.
///
/// - `created` runs once, when the Renderer has built the element and appended
///   its children.
/// - `updated` runs when the element was reused by a patch and its props changed
///   at least one thing on the live node.
pub struct Hooks<N> {
    /// Element-created slot.
    pub created: Option<RefHook<N>>,
    /// Element-props-changed slot.
    pub updated: Option<RefHook<N>>,
}

impl<N> Hooks<N> {
    /// Whether neither slot is filled.
    pub fn is_empty(&self) -> bool {
        self.created.is_none() && self.updated.is_none()
    }
}

impl<N> Default for Hooks<N> {
    fn default() -> Self {
        Self {
            created: None,
            updated: None,
        }
    }
}

impl<N> Clone for Hooks<N> {
    fn clone(&self) -> Self {
        Self {
            created: self.created.clone(),
            updated: self.updated.clone(),
        }
    }
}

impl<N> fmt::Debug for Hooks<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Hooks")
            .field("created", &self.created.is_some())
            .field("updated", &self.updated.is_some())
            .finish()
    }
}

// =============================================================================
// VNode
// =============================================================================

/// A primitive (text) node value.
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    /// Text.
    Str(String),
    /// Number, rendered with [`number_to_string`].
    Num(f64),
}

impl Primitive {
    /// Text content this primitive renders as.
    pub fn to_text(&self) -> String {
        match self {
            Primitive::Str(value) => value.clone(),
            Primitive::Num(value) => number_to_string(*value),
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

/// An element node.
pub struct Element<N> {
    /// Tag name, passed to the host unvalidated.
    pub tag: String,
    /// Props. Shared so an unchanged map can be recognised by identity.
    pub props: Rc<Props<N>>,
    /// Children, already flattened one level.
    pub children: Vec<VNode<N>>,
    /// Lifecycle slots.
    pub hooks: Hooks<N>,
}

impl<N> Element<N> {
    /// Reconciliation key of this element.
    pub fn key(&self) -> Option<Key> {
        self.props.key()
    }
}

impl<N> fmt::Debug for Element<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut debug = f.debug_struct("Element");
        debug
            .field("tag", &self.tag)
            .field("props", &self.props)
            .field("children", &self.children);
        if !self.hooks.is_empty() {
            debug.field("hooks", &self.hooks);
        }
        debug.finish()
    }
}

/// Immutable description of one UI-tree node.
///
/// Cloning is cheap: element nodes are shared behind an `Rc`.
pub enum VNode<N> {
    /// Element with tag, props and children.
    Element(Rc<Element<N>>),
    /// String or number, rendered as a text node.
    Text(Primitive),
    /// Null / undefined / boolean: an empty text node.
    Empty,
}

impl<N> VNode<N> {
    /// The element, if this is an element node.
    pub fn as_element(&self) -> Option<&Element<N>> {
        match self {
            VNode::Element(element) => Some(element),
            _ => None,
        }
    }

    /// Whether this is an element node.
    pub fn is_element(&self) -> bool {
        matches!(self, VNode::Element(_))
    }

    /// Reconciliation key; only element nodes can carry one.
    pub fn key(&self) -> Option<Key> {
        self.as_element().and_then(Element::key)
    }

    /// Normalised string form used to compare non-element nodes.
    ///
    /// `Empty` compares as `""`. Elements have no string form, so an element never
    /// compares equal to a primitive.
    pub fn text_form(&self) -> Option<String> {
        match self {
            VNode::Element(_) => None,
            VNode::Text(primitive) => Some(primitive.to_text()),
            VNode::Empty => Some(String::new()),
        }
    }
}

impl<N> Clone for VNode<N> {
    fn clone(&self) -> Self {
        match self {
            VNode::Element(element) => VNode::Element(element.clone()),
            VNode::Text(primitive) => VNode::Text(primitive.clone()),
            VNode::Empty => VNode::Empty,
        }
    }
}

impl<N> fmt::Debug for VNode<N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VNode::Element(element) => element.fmt(f),
            VNode::Text(primitive) => f.debug_tuple("Text").field(primitive).finish(),
            VNode::Empty => f.write_str("Empty"),
        }
    }
}

impl<N> From<Element<N>> for VNode<N> {
    fn from(element: Element<N>) -> Self {
        VNode::Element(Rc::new(element))
    }
}

impl<N> From<Primitive> for VNode<N> {
    fn from(primitive: Primitive) -> Self {
        VNode::Text(primitive)
    }
}

impl<N> From<&str> for VNode<N> {
    fn from(value: &str) -> Self {
        VNode::Text(Primitive::Str(value.to_string()))
    }
}

impl<N> From<String> for VNode<N> {
    fn from(value: String) -> Self {
        VNode::Text(Primitive::Str(value))
    }
}

impl<N> From<&String> for VNode<N> {
    fn from(value: &String) -> Self {
        VNode::Text(Primitive::Str(value.clone()))
    }
}

impl<N> From<f64> for VNode<N> {
    fn from(value: f64) -> Self {
        VNode::Text(Primitive::Num(value))
    }
}

impl<N> From<i32> for VNode<N> {
    fn from(value: i32) -> Self {
        VNode::Text(Primitive::Num(f64::from(value)))
    }
}

impl<N> From<u32> for VNode<N> {
    fn from(value: u32) -> Self {
        VNode::Text(Primitive::Num(f64::from(value)))
    }
}

impl<N> From<i64> for VNode<N> {
    fn from(value: i64) -> Self {
        VNode::Text(Primitive::Num(value as f64))
    }
}

impl<N> From<usize> for VNode<N> {
    fn from(value: usize) -> Self {
        VNode::Text(Primitive::Num(value as f64))
    }
}

/// Booleans describe nothing (`cond && node` style conditionals).
impl<N> From<bool> for VNode<N> {
    fn from(_: bool) -> Self {
        VNode::Empty
    }
}

impl<N> From<Option<VNode<N>>> for VNode<N> {
    fn from(value: Option<VNode<N>>) -> Self {
        value.unwrap_or(VNode::Empty)
    }
}

// =============================================================================
// Tests
// =============================================================================
