//! Structural self-check for [`OrderedMap`].

use thiserror::Error;

use crate::map::OrderedMap;
use crate::node::{Color, NodeId};

/// First structural defect found by [`OrderedMap::check_invariants`].
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum InvariantViolation {
    /// The sentinel slot holds an entry or is not black.
    #[error("sentinel slot was modified")]
    CorruptSentinel,

    /// The root is red.
    #[error("root {0:?} is red")]
    RedRoot(NodeId),

    /// The root's parent link is not the sentinel.
    #[error("root {0:?} has a parent")]
    RootHasParent(NodeId),

    /// A red node has a red child.
    #[error("red node {0:?} has a red child")]
    RedChild(NodeId),

    /// Two sibling subtrees have different black heights.
    #[error("black height differs below {node:?}: left {left}, right {right}")]
    BlackHeight {
        node: NodeId,
        left: usize,
        right: usize,
    },

    /// A child does not point back at its parent.
    #[error("{child:?} does not link back to its parent {parent:?}")]
    BrokenParentLink { parent: NodeId, child: NodeId },

    /// A linked slot holds no entry.
    #[error("linked slot {0:?} holds no entry")]
    EmptySlot(NodeId),

    /// In-order keys are not strictly ascending.
    #[error("keys stop ascending at {0:?}")]
    OutOfOrder(NodeId),

    /// The cached length disagrees with the number of linked nodes.
    #[error("map reports {reported} entries but links {actual}")]
    LengthMismatch { reported: usize, actual: usize },
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Verify the red/black rules, key order, parent links and length.
    ///
    /// Returns the black height of the tree (sentinel excluded).
    pub fn check_invariants(&self) -> Result<usize, InvariantViolation> {
        let sentinel = &self.nodes[0];
        if sentinel.entry.is_some() || sentinel.color != Color::Black {
            return Err(InvariantViolation::CorruptSentinel);
        }

        if !self.root.is_nil() {
            if self.color(self.root) == Color::Red {
                return Err(InvariantViolation::RedRoot(self.root));
            }
            if !self.parent(self.root).is_nil() {
                return Err(InvariantViolation::RootHasParent(self.root));
            }
        }

        let mut linked = 0;
        let black_height = self.check_subtree(self.root, &mut linked)?;
        if linked != self.len {
            return Err(InvariantViolation::LengthMismatch {
                reported: self.len,
                actual: linked,
            });
        }

        let mut previous: Option<&K> = None;
        let mut id = self.min();
        while !id.is_nil() {
            let key = self.key(id).ok_or(InvariantViolation::EmptySlot(id))?;
            if previous.is_some_and(|prev| prev >= key) {
                return Err(InvariantViolation::OutOfOrder(id));
            }
            previous = Some(key);
            id = self.successor(id);
        }

        Ok(black_height)
    }

    fn check_subtree(&self, id: NodeId, linked: &mut usize) -> Result<usize, InvariantViolation> {
        if id.is_nil() {
            return Ok(0);
        }
        if self.key(id).is_none() {
            return Err(InvariantViolation::EmptySlot(id));
        }
        *linked += 1;

        let left = self.left(id);
        let right = self.right(id);
        for child in [left, right] {
            if child.is_nil() {
                continue;
            }
            if self.parent(child) != id {
                return Err(InvariantViolation::BrokenParentLink { parent: id, child });
            }
            if self.color(id) == Color::Red && self.color(child) == Color::Red {
                return Err(InvariantViolation::RedChild(id));
            }
        }

        let left_height = self.check_subtree(left, linked)?;
        let right_height = self.check_subtree(right, linked)?;
        if left_height != right_height {
            return Err(InvariantViolation::BlackHeight {
                node: id,
                left: left_height,
                right: right_height,
            });
        }

        Ok(left_height + usize::from(self.color(id) == Color::Black))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detects_red_root() {
        let mut map = OrderedMap::new();
        map.insert_or_get_with(1u32, || ());
        let root = map.root();
        map.nodes[root.index()].color = Color::Red;
        assert_eq!(map.check_invariants(), Err(InvariantViolation::RedRoot(root)));
    }

    #[test]
    fn test_detects_black_height_mismatch() {
        let mut map = OrderedMap::new();
        for key in [2u32, 1, 3] {
            map.insert_or_get_with(key, || ());
        }
        let left = map.left(map.root());
        map.nodes[left.index()].color = Color::Black;
        assert!(matches!(
            map.check_invariants(),
            Err(InvariantViolation::BlackHeight { .. })
        ));
    }

    #[test]
    fn test_detects_length_mismatch() {
        let mut map = OrderedMap::new();
        map.insert_or_get_with(1u32, || ());
        map.len = 3;
        assert_eq!(
            map.check_invariants(),
            Err(InvariantViolation::LengthMismatch {
                reported: 3,
                actual: 1
            })
        );
    }
}
