//! Arena slots and the handles that address them.

use std::fmt;

/// Handle to a slot in an [`OrderedMap`](crate::OrderedMap) arena.
///
/// Slot 0 is reserved for the sentinel, so [`NodeId::NIL`] doubles as the
/// "absent" result of a search. A handle stays valid until the map is
/// mutated by `delete`, `remove_where` or `clear`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId(u32);

impl NodeId {
    /// The sentinel slot. Terminates every subtree and the root's parent link.
    pub const NIL: NodeId = NodeId(0);

    /// Check if this handle refers to the sentinel.
    #[must_use]
    pub const fn is_nil(self) -> bool {
        self.0 == 0
    }

    pub(crate) const fn index(self) -> usize {
        self.0 as usize
    }

    pub(crate) const fn from_index(index: usize) -> Self {
        Self(index as u32)
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            write!(f, "NodeId(nil)")
        } else {
            write!(f, "NodeId({})", self.0)
        }
    }
}

/// Node color for red/black balancing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// One arena slot.
///
/// Live slots hold `Some(entry)`. The sentinel and retired slots hold `None`.
pub(crate) struct Node<K, V> {
    pub(crate) entry: Option<(K, V)>,
    pub(crate) left: NodeId,
    pub(crate) right: NodeId,
    pub(crate) parent: NodeId,
    pub(crate) color: Color,
}

impl<K, V> Node<K, V> {
    pub(crate) const fn sentinel() -> Self {
        Self {
            entry: None,
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent: NodeId::NIL,
            color: Color::Black,
        }
    }

    /// Fresh nodes are linked red, as insert-fixup expects.
    pub(crate) const fn new(key: K, value: V) -> Self {
        Self {
            entry: Some((key, value)),
            left: NodeId::NIL,
            right: NodeId::NIL,
            parent: NodeId::NIL,
            color: Color::Red,
        }
    }
}
