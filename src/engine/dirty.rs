//! Dirty flags for in-memory nodes.
//!
//! Each node of a [`MemoryTree`](super::MemoryTree) records which categories of its
//! state were touched since the flags were last taken. Text nodes are replaced,
//! never edited, so a text change shows up as `CHILDREN` on the parent. The demo
//! rebuilds its outline only when a taken flag [`is_visual`](Dirty::is_visual).

bitflags::bitflags! {
    /// Categories of node state a mutation touched.
    ///
    /// Combine with bitwise OR: `Dirty::ATTRIBUTES | Dirty::CHILDREN`
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Dirty: u8 {
        const NONE = 0;
        /// Node was created since the last take.
        const CREATED = 1 << 0;
        /// An attribute was set or removed.
        const ATTRIBUTES = 1 << 1;
        /// A live property was set.
        const PROPERTIES = 1 << 2;
        /// A handler slot was filled or cleared.
        const HANDLERS = 1 << 3;
        /// The child list changed.
        const CHILDREN = 1 << 4;
    }
}

impl Dirty {
    /// Flags that change what the node looks like, as opposed to how it behaves.
    pub const VISUAL: Dirty = Dirty::ATTRIBUTES
        .union(Dirty::PROPERTIES)
        .union(Dirty::CHILDREN);

    /// Whether any visual flag is set.
    pub fn is_visual(self) -> bool {
        self.intersects(Dirty::VISUAL)
    }
}
