//! The ordered map itself.
//!
//! Nodes live in a `Vec` arena and link to each other by [`NodeId`]. Slot 0
//! is the shared black sentinel: every missing child points at it, and so
//! does the root's parent link. Rotations and fixups follow the classic
//! red/black case analysis, written as loops.

use std::borrow::Borrow;
use std::cmp::Ordering;
use std::fmt;
use std::iter::FusedIterator;

use crate::node::{Color, Node, NodeId};
use crate::recycler::NodeRecycler;

/// A red/black balanced ordered map.
///
/// | Operation            | Complexity |
/// |----------------------|------------|
/// | `insert_or_get_with` | O(log N)   |
/// | `search` / `get`     | O(log N)   |
/// | `delete`             | O(log N)   |
/// | `min` / `max`        | O(log N)   |
/// | `successor`          | O(1) amortized over a full walk |
/// | `len`                | O(1)       |
pub struct OrderedMap<K, V> {
    pub(crate) nodes: Vec<Node<K, V>>,
    pub(crate) root: NodeId,
    pub(crate) len: usize,
    recycler: NodeRecycler,
}

impl<K, V> Default for OrderedMap<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> OrderedMap<K, V> {
    /// Create an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty map with room for `capacity` nodes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let mut nodes = Vec::with_capacity(capacity + 1);
        nodes.push(Node::sentinel());
        Self {
            nodes,
            root: NodeId::NIL,
            len: 0,
            recycler: NodeRecycler::new(),
        }
    }

    /// Number of entries.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Check if the map holds no entries.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of node slots the arena can hold without reallocating.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.nodes.capacity() - 1
    }

    /// Number of node slots in use or waiting in the recycler.
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.nodes.len() - 1
    }

    /// The slot recycler backing this map.
    #[must_use]
    pub const fn recycler(&self) -> &NodeRecycler {
        &self.recycler
    }

    /// The root node, or [`NodeId::NIL`] if the map is empty.
    #[must_use]
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Key stored at `id`. `None` for the sentinel or a retired slot.
    #[must_use]
    pub fn key(&self, id: NodeId) -> Option<&K> {
        self.entry_at(id).map(|(key, _)| key)
    }

    /// Payload stored at `id`.
    #[must_use]
    pub fn value(&self, id: NodeId) -> Option<&V> {
        self.entry_at(id).map(|(_, value)| value)
    }

    /// Mutable payload stored at `id`.
    pub fn value_mut(&mut self, id: NodeId) -> Option<&mut V> {
        self.nodes
            .get_mut(id.index())?
            .entry
            .as_mut()
            .map(|(_, value)| value)
    }

    /// Key and payload stored at `id`.
    #[must_use]
    pub fn entry_at(&self, id: NodeId) -> Option<(&K, &V)> {
        self.nodes
            .get(id.index())?
            .entry
            .as_ref()
            .map(|(key, value)| (key, value))
    }

    /// Node holding the smallest key, or the sentinel if empty.
    #[must_use]
    pub fn min(&self) -> NodeId {
        self.subtree_min(self.root)
    }

    /// Node holding the largest key, or the sentinel if empty.
    #[must_use]
    pub fn max(&self) -> NodeId {
        self.subtree_max(self.root)
    }

    /// In-order successor of `id`, or the sentinel if `id` is the last node.
    #[must_use]
    pub fn successor(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            return NodeId::NIL;
        }
        if !self.right(id).is_nil() {
            return self.subtree_min(self.right(id));
        }
        let mut x = id;
        let mut y = self.parent(x);
        while !y.is_nil() && x == self.right(y) {
            x = y;
            y = self.parent(y);
        }
        y
    }

    /// In-order predecessor of `id`, or the sentinel if `id` is the first node.
    #[must_use]
    pub fn predecessor(&self, id: NodeId) -> NodeId {
        if id.is_nil() {
            return NodeId::NIL;
        }
        if !self.left(id).is_nil() {
            return self.subtree_max(self.left(id));
        }
        let mut x = id;
        let mut y = self.parent(x);
        while !y.is_nil() && x == self.left(y) {
            x = y;
            y = self.parent(y);
        }
        y
    }

    /// Ascending iterator over entries.
    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            map: self,
            next: self.min(),
            remaining: self.len,
        }
    }

    /// Ascending iterator over keys.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        self.iter().map(|(key, _)| key)
    }

    /// Ascending iterator over payloads.
    pub fn values(&self) -> impl Iterator<Item = &V> + '_ {
        self.iter().map(|(_, value)| value)
    }

    /// Visit every entry in ascending key order.
    pub fn traverse(&self, mut visit: impl FnMut(&K, &V)) {
        for (key, value) in self {
            visit(key, value);
        }
    }

    /// Visit every entry in ascending key order with a mutable payload.
    ///
    /// The tree shape cannot change during the walk, so handles stay valid.
    pub fn for_each_mut(&mut self, mut visit: impl FnMut(&K, &mut V)) {
        let mut id = self.min();
        while !id.is_nil() {
            let next = self.successor(id);
            let (key, value) = self.entry_mut(id);
            visit(key, value);
            id = next;
        }
    }

    /// Drop every entry. Arena capacity is kept.
    pub fn clear(&mut self) {
        self.nodes.truncate(1);
        self.nodes[0] = Node::sentinel();
        self.root = NodeId::NIL;
        self.len = 0;
        self.recycler.reset();
    }

    // ------------------------------------------------------------------
    // Slot access
    // ------------------------------------------------------------------

    fn entry(&self, id: NodeId) -> &(K, V) {
        self.nodes[id.index()]
            .entry
            .as_ref()
            .expect("linked node holds an entry")
    }

    fn entry_mut(&mut self, id: NodeId) -> (&K, &mut V) {
        let (key, value) = self.nodes[id.index()]
            .entry
            .as_mut()
            .expect("linked node holds an entry");
        (&*key, value)
    }

    pub(crate) fn left(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].left
    }

    pub(crate) fn right(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].right
    }

    pub(crate) fn parent(&self, id: NodeId) -> NodeId {
        self.nodes[id.index()].parent
    }

    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.nodes[id.index()].color
    }

    fn is_red(&self, id: NodeId) -> bool {
        self.color(id) == Color::Red
    }

    fn is_black(&self, id: NodeId) -> bool {
        self.color(id) == Color::Black
    }

    fn set_left(&mut self, id: NodeId, child: NodeId) {
        self.nodes[id.index()].left = child;
    }

    fn set_right(&mut self, id: NodeId, child: NodeId) {
        self.nodes[id.index()].right = child;
    }

    fn set_parent(&mut self, id: NodeId, parent: NodeId) {
        self.nodes[id.index()].parent = parent;
    }

    fn set_color(&mut self, id: NodeId, color: Color) {
        self.nodes[id.index()].color = color;
    }

    fn subtree_min(&self, mut id: NodeId) -> NodeId {
        if id.is_nil() {
            return id;
        }
        while !self.left(id).is_nil() {
            id = self.left(id);
        }
        id
    }

    fn subtree_max(&self, mut id: NodeId) -> NodeId {
        if id.is_nil() {
            return id;
        }
        while !self.right(id).is_nil() {
            id = self.right(id);
        }
        id
    }

    /// Place a new red node in a slot, recycled first.
    fn allocate(&mut self, key: K, value: V) -> NodeId {
        let node = Node::new(key, value);
        if let Some(id) = self.recycler.reuse() {
            self.nodes[id.index()] = node;
            id
        } else {
            let id = NodeId::from_index(self.nodes.len());
            self.nodes.push(node);
            id
        }
    }

    /// Unlinked slot goes back to the recycler; its entry is handed out.
    fn retire(&mut self, id: NodeId) -> (K, V) {
        let slot = &mut self.nodes[id.index()];
        let entry = slot.entry.take().expect("retired node holds an entry");
        slot.left = NodeId::NIL;
        slot.right = NodeId::NIL;
        slot.parent = NodeId::NIL;
        slot.color = Color::Black;
        self.recycler.retire(id);
        entry
    }

    /// Replace `old` with `new` in `old`'s parent (or as root).
    fn replace_child(&mut self, parent: NodeId, old: NodeId, new: NodeId) {
        if parent.is_nil() {
            self.root = new;
        } else if old == self.left(parent) {
            self.set_left(parent, new);
        } else {
            self.set_right(parent, new);
        }
    }

    // ------------------------------------------------------------------
    // Rotations
    // ------------------------------------------------------------------

    fn rotate_left(&mut self, x: NodeId) {
        let y = self.right(x);
        if y.is_nil() {
            return;
        }
        let inner = self.left(y);
        self.set_right(x, inner);
        if !inner.is_nil() {
            self.set_parent(inner, x);
        }
        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);
        self.set_left(y, x);
        self.set_parent(x, y);
    }

    fn rotate_right(&mut self, x: NodeId) {
        let y = self.left(x);
        if y.is_nil() {
            return;
        }
        let inner = self.right(y);
        self.set_left(x, inner);
        if !inner.is_nil() {
            self.set_parent(inner, x);
        }
        let parent = self.parent(x);
        self.set_parent(y, parent);
        self.replace_child(parent, x, y);
        self.set_right(y, x);
        self.set_parent(x, y);
    }

    // ------------------------------------------------------------------
    // Fixups
    // ------------------------------------------------------------------

    fn insert_fixup(&mut self, mut z: NodeId) {
        // The sentinel is black, so the loop stops once z's parent is the root's parent.
        while self.is_red(self.parent(z)) {
            let p = self.parent(z);
            let g = self.parent(p);
            if p == self.left(g) {
                let uncle = self.right(g);
                if self.is_red(uncle) {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.right(p) {
                        z = p;
                        self.rotate_left(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_right(g);
                }
            } else {
                let uncle = self.left(g);
                if self.is_red(uncle) {
                    self.set_color(p, Color::Black);
                    self.set_color(uncle, Color::Black);
                    self.set_color(g, Color::Red);
                    z = g;
                } else {
                    if z == self.left(p) {
                        z = p;
                        self.rotate_right(z);
                    }
                    let p = self.parent(z);
                    let g = self.parent(p);
                    self.set_color(p, Color::Black);
                    self.set_color(g, Color::Red);
                    self.rotate_left(g);
                }
            }
        }
        let root = self.root;
        self.set_color(root, Color::Black);
    }

    fn delete_fixup(&mut self, mut x: NodeId) {
        while x != self.root && self.is_black(x) {
            let p = self.parent(x);
            if x == self.left(p) {
                let mut w = self.right(p);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_left(p);
                    w = self.right(self.parent(x));
                }
                if self.is_black(self.left(w)) && self.is_black(self.right(w)) {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.is_black(self.right(w)) {
                        let near = self.left(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_right(w);
                        w = self.right(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color(p));
                    self.set_color(p, Color::Black);
                    let far = self.right(w);
                    self.set_color(far, Color::Black);
                    self.rotate_left(p);
                    x = self.root;
                }
            } else {
                let mut w = self.left(p);
                if self.is_red(w) {
                    self.set_color(w, Color::Black);
                    self.set_color(p, Color::Red);
                    self.rotate_right(p);
                    w = self.left(self.parent(x));
                }
                if self.is_black(self.right(w)) && self.is_black(self.left(w)) {
                    self.set_color(w, Color::Red);
                    x = self.parent(x);
                } else {
                    if self.is_black(self.left(w)) {
                        let near = self.right(w);
                        self.set_color(near, Color::Black);
                        self.set_color(w, Color::Red);
                        self.rotate_left(w);
                        w = self.left(self.parent(x));
                    }
                    let p = self.parent(x);
                    self.set_color(w, self.color(p));
                    self.set_color(p, Color::Black);
                    let far = self.left(w);
                    self.set_color(far, Color::Black);
                    self.rotate_right(p);
                    x = self.root;
                }
            }
        }
        self.set_color(x, Color::Black);
    }
}

impl<K: Ord, V> OrderedMap<K, V> {
    /// Binary search for `key`. Returns [`NodeId::NIL`] if absent.
    pub fn search<Q>(&self, key: &Q) -> NodeId
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut id = self.root;
        while !id.is_nil() {
            match key.cmp(self.entry(id).0.borrow()) {
                Ordering::Equal => return id,
                Ordering::Less => id = self.left(id),
                Ordering::Greater => id = self.right(id),
            }
        }
        NodeId::NIL
    }

    /// Payload for `key`.
    pub fn get<Q>(&self, key: &Q) -> Option<&V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.value(self.search(key))
    }

    /// Mutable payload for `key`.
    pub fn get_mut<Q>(&mut self, key: &Q) -> Option<&mut V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let id = self.search(key);
        self.value_mut(id)
    }

    /// Check if `key` is present.
    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        !self.search(key).is_nil()
    }

    /// Find `key`, or link a new node for it with the payload from `default`.
    ///
    /// An existing node is returned unchanged. The flag is `true` when the
    /// node was created by this call.
    pub fn insert_or_get_with(&mut self, key: K, default: impl FnOnce() -> V) -> (NodeId, bool) {
        let mut parent = NodeId::NIL;
        let mut id = self.root;
        let mut went_left = false;
        while !id.is_nil() {
            parent = id;
            match key.cmp(&self.entry(id).0) {
                Ordering::Equal => return (id, false),
                Ordering::Less => {
                    went_left = true;
                    id = self.left(id);
                }
                Ordering::Greater => {
                    went_left = false;
                    id = self.right(id);
                }
            }
        }

        let z = self.allocate(key, default());
        self.set_parent(z, parent);
        if parent.is_nil() {
            self.root = z;
        } else if went_left {
            self.set_left(parent, z);
        } else {
            self.set_right(parent, z);
        }
        self.len += 1;
        self.insert_fixup(z);
        (z, true)
    }

    /// Like [`insert_or_get_with`](Self::insert_or_get_with), handing back the payload.
    pub fn get_or_insert_with(&mut self, key: K, default: impl FnOnce() -> V) -> (&mut V, bool) {
        let (id, created) = self.insert_or_get_with(key, default);
        let (_, value) = self.entry_mut(id);
        (value, created)
    }

    /// [`insert_or_get_with`](Self::insert_or_get_with) using `V::default()`.
    pub fn insert_or_get(&mut self, key: K) -> (NodeId, bool)
    where
        V: Default,
    {
        self.insert_or_get_with(key, V::default)
    }

    /// Unlink the node for `key` and hand back its entry.
    ///
    /// Returns `None` if the key is absent; that is a no-op, not an error.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<(K, V)>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let z = self.search(key);
        if z.is_nil() {
            return None;
        }

        // y is the node that is physically spliced out: z itself when it has
        // at most one child, otherwise its in-order successor.
        let y = if self.left(z).is_nil() || self.right(z).is_nil() {
            z
        } else {
            self.subtree_min(self.right(z))
        };
        let x = if self.left(y).is_nil() {
            self.right(y)
        } else {
            self.left(y)
        };

        let y_parent = self.parent(y);
        // x may be the sentinel; its parent link is scratch space for the fixup.
        self.set_parent(x, y_parent);
        self.replace_child(y_parent, y, x);

        if y != z {
            let moved = self.nodes[y.index()].entry.take();
            let removed = std::mem::replace(&mut self.nodes[z.index()].entry, moved);
            self.nodes[y.index()].entry = removed;
        }

        if self.is_black(y) {
            self.delete_fixup(x);
        }
        self.nodes[0] = Node::sentinel();

        self.len -= 1;
        Some(self.retire(y))
    }

    /// Remove every entry for which `select` returns `true`.
    ///
    /// `select` sees entries in ascending order and may mutate them before
    /// deciding. Removed entries are returned in ascending order.
    pub fn remove_where(&mut self, mut select: impl FnMut(&K, &mut V) -> bool) -> Vec<(K, V)>
    where
        K: Clone,
    {
        let mut doomed = Vec::new();
        self.for_each_mut(|key, value| {
            if select(key, value) {
                doomed.push(key.clone());
            }
        });
        doomed
            .iter()
            .filter_map(|key| self.delete(key))
            .collect()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for OrderedMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a OrderedMap<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Ascending iterator over an [`OrderedMap`], driven by `successor`.
pub struct Iter<'a, K, V> {
    map: &'a OrderedMap<K, V>,
    next: NodeId,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.next.is_nil() {
            return None;
        }
        let map = self.map;
        let (key, value) = map.entry(self.next);
        self.next = map.successor(self.next);
        self.remaining -= 1;
        Some((key, value))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<K, V> ExactSizeIterator for Iter<'_, K, V> {}

impl<K, V> FusedIterator for Iter<'_, K, V> {}
