//! Arena-backed red/black ordered map.
//!
//! Nodes are stored in a `Vec` and linked by [`NodeId`] instead of pointers.
//! Slot 0 of every arena is the sentinel: black, keyless, and the target of
//! every missing child link. Deleted slots are recycled through a free list,
//! and whole maps can be parked in a [`MapPool`].
//!
//! # Example
//!
//! ```
//! use reltrack_tree::OrderedMap;
//!
//! let mut map = OrderedMap::new();
//! map.insert_or_get_with("b", || 2);
//! map.insert_or_get_with("a", || 1);
//!
//! let keys: Vec<_> = map.keys().copied().collect();
//! assert_eq!(keys, ["a", "b"]);
//!
//! assert_eq!(map.delete("a"), Some(("a", 1)));
//! assert!(map.search("a").is_nil());
//! ```

mod invariants;
mod map;
mod node;
mod recycler;

pub use invariants::InvariantViolation;
pub use map::{Iter, OrderedMap};
pub use node::NodeId;
pub use recycler::{DEFAULT_POOL_LIMIT, MapPool, NodeRecycler};
