//! Slot and map recycling.
//!
//! Deleted nodes are never shrunk out of the arena. Their slot index goes
//! on a free list and the next insertion pops it before growing the arena.
//! Whole maps that are discarded can be parked in a [`MapPool`] so their
//! arena capacity is reused by the next map that gets created.

use crate::map::OrderedMap;
use crate::node::NodeId;

/// Free list of retired arena slots.
#[derive(Debug, Default)]
pub struct NodeRecycler {
    /// Slots whose entry has been taken out.
    free_list: Vec<NodeId>,
    /// Number of insertions served from the free list.
    reused: u64,
}

impl NodeRecycler {
    /// Create an empty recycler.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            free_list: Vec::new(),
            reused: 0,
        }
    }

    /// Hand a slot back. The caller must already have cleared its entry.
    pub(crate) fn retire(&mut self, id: NodeId) {
        debug_assert!(!id.is_nil(), "the sentinel slot is never retired");
        self.free_list.push(id);
    }

    /// Pop a retired slot, if any.
    pub(crate) fn reuse(&mut self) -> Option<NodeId> {
        let id = self.free_list.pop()?;
        self.reused += 1;
        Some(id)
    }

    /// Forget all retired slots (the arena they pointed into was truncated).
    pub(crate) fn reset(&mut self) {
        self.free_list.clear();
    }

    /// Number of slots currently waiting for reuse.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free_list.len()
    }

    /// Number of insertions that were served from the free list so far.
    #[must_use]
    pub const fn reused(&self) -> u64 {
        self.reused
    }
}

/// Default number of spare maps a [`MapPool`] keeps around.
pub const DEFAULT_POOL_LIMIT: usize = 1024;

/// Pool of retired, cleared maps.
///
/// Nested indexes create and discard small maps constantly. Releasing a map
/// here keeps its arena allocation alive for the next [`MapPool::acquire`].
pub struct MapPool<K, V> {
    spare: Vec<OrderedMap<K, V>>,
    limit: usize,
}

impl<K, V> Default for MapPool<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> MapPool<K, V> {
    /// Create a pool holding at most [`DEFAULT_POOL_LIMIT`] spare maps.
    #[must_use]
    pub const fn new() -> Self {
        Self::with_limit(DEFAULT_POOL_LIMIT)
    }

    /// Create a pool holding at most `limit` spare maps.
    #[must_use]
    pub const fn with_limit(limit: usize) -> Self {
        Self {
            spare: Vec::new(),
            limit,
        }
    }

    /// Take an empty map, reusing a spare one if available.
    pub fn acquire(&mut self) -> OrderedMap<K, V> {
        self.spare.pop().unwrap_or_default()
    }

    /// Clear `map` and keep it for a later [`acquire`](Self::acquire).
    ///
    /// Maps beyond the pool limit are simply dropped.
    pub fn release(&mut self, mut map: OrderedMap<K, V>) {
        if self.spare.len() < self.limit {
            map.clear();
            self.spare.push(map);
        }
    }

    /// Number of spare maps held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spare.len()
    }

    /// Check if the pool holds no spare maps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.spare.is_empty()
    }
}
