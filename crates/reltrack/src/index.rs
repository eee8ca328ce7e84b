//! Three-level relation index with incrementally maintained maxima.
//!
//! ```text
//! relations:     relation type ──► Relation { destinations, maximum }
//! destinations:  destination   ──► Destination { sources, live }
//! sources:       source        ──► ()
//! ```
//!
//! `live` is the size of a destination's source set. `maximum` is the
//! largest `live` among a relation's destinations. Adding an edge can only
//! raise a maximum, so it is bumped in place. Removing an edge from a
//! destination that held the maximum forces a rescan of that relation's
//! destinations, since the old maximum may have been unique.
//!
//! Relation and destination nodes exist only while they hold at least one
//! edge. Emptied inner maps are parked in [`MapPool`]s for reuse.

use reltrack_tree::{MapPool, OrderedMap};
use tracing::{debug, trace};

use crate::name::Name;
use crate::registry::EntityRegistry;

/// Sources with a live edge of one relation type into one destination.
#[derive(Debug)]
pub struct Destination {
    sources: OrderedMap<Name, ()>,
    live: usize,
}

impl Destination {
    fn new(sources: OrderedMap<Name, ()>) -> Self {
        Self { sources, live: 0 }
    }

    /// Number of distinct sources with a live edge into this destination.
    #[must_use]
    pub const fn live(&self) -> usize {
        self.live
    }

    /// Sources in ascending order.
    pub fn sources(&self) -> impl Iterator<Item = &Name> + '_ {
        self.sources.keys()
    }

    /// Check if `source` has a live edge into this destination.
    #[must_use]
    pub fn has_source(&self, source: &Name) -> bool {
        self.sources.contains_key(source)
    }
}

/// All destinations of one relation type, plus their maximum live count.
#[derive(Debug)]
pub struct Relation {
    destinations: OrderedMap<Name, Destination>,
    maximum: usize,
}

impl Relation {
    fn new(destinations: OrderedMap<Name, Destination>) -> Self {
        Self {
            destinations,
            maximum: 0,
        }
    }

    /// Largest live count over this relation's destinations.
    #[must_use]
    pub const fn maximum(&self) -> usize {
        self.maximum
    }

    /// Destinations in ascending order.
    pub fn destinations(&self) -> impl Iterator<Item = (&Name, &Destination)> + '_ {
        self.destinations.iter()
    }

    /// Destinations in ascending order whose live count equals the maximum.
    pub fn leaders(&self) -> impl Iterator<Item = &Name> + '_ {
        let maximum = self.maximum;
        self.destinations
            .iter()
            .filter(move |(_, destination)| destination.live == maximum)
            .map(|(name, _)| name)
    }

    /// Look up one destination.
    #[must_use]
    pub fn destination(&self, name: &Name) -> Option<&Destination> {
        self.destinations.get(name)
    }

    /// Full scan over destination counts.
    fn recompute_maximum(&mut self) {
        self.maximum = self
            .destinations
            .values()
            .map(|destination| destination.live)
            .max()
            .unwrap_or(0);
    }
}

/// Index of typed edges `(source, destination, relation)`.
#[derive(Default)]
pub struct RelationIndex {
    relations: OrderedMap<Name, Relation>,
    spare_sources: MapPool<Name, ()>,
    spare_destinations: MapPool<Name, Destination>,
}

impl RelationIndex {
    /// Create an empty index.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the edge `source → destination` of type `relation`.
    ///
    /// Ignored unless both endpoints are registered. Returns `true` if the
    /// edge was not present before.
    pub fn add_edge(
        &mut self,
        registry: &EntityRegistry,
        source: &Name,
        destination: &Name,
        relation: &Name,
    ) -> bool {
        if !registry.contains(source) || !registry.contains(destination) {
            trace!(%source, %destination, %relation, "edge endpoint not registered");
            return false;
        }

        let Self {
            relations,
            spare_sources,
            spare_destinations,
        } = self;

        let (rel, _) = relations.get_or_insert_with(relation.clone(), || {
            Relation::new(spare_destinations.acquire())
        });
        let (dest, _) = rel
            .destinations
            .get_or_insert_with(destination.clone(), || {
                Destination::new(spare_sources.acquire())
            });

        let (_, created) = dest.sources.insert_or_get(source.clone());
        if !created {
            return false;
        }

        dest.live += 1;
        if dest.live > rel.maximum {
            rel.maximum = dest.live;
        }
        trace!(%source, %destination, %relation, live = dest.live, "edge added");
        true
    }

    /// Remove the edge `source → destination` of type `relation`.
    ///
    /// Missing relation, destination or source is a no-op. Returns `true` if
    /// an edge was removed.
    pub fn remove_edge(&mut self, source: &Name, destination: &Name, relation: &Name) -> bool {
        let Self {
            relations,
            spare_sources,
            spare_destinations,
        } = self;

        let Some(rel) = relations.get_mut(relation) else {
            return false;
        };
        let Some(dest) = rel.destinations.get_mut(destination) else {
            return false;
        };
        if dest.sources.delete(source).is_none() {
            return false;
        }

        let previous = dest.live;
        dest.live -= 1;
        debug_assert_eq!(dest.live, dest.sources.len());

        if dest.live == 0 {
            if let Some((_, emptied)) = rel.destinations.delete(destination) {
                spare_sources.release(emptied.sources);
            }
        }

        if previous == rel.maximum {
            rel.recompute_maximum();
            debug!(%relation, maximum = rel.maximum, "relation maximum recomputed");
        }

        if rel.destinations.is_empty() {
            if let Some((_, emptied)) = relations.delete(relation) {
                spare_destinations.release(emptied.destinations);
            }
        }

        trace!(%source, %destination, %relation, "edge removed");
        true
    }

    /// Drop every edge that has `name` as source or destination.
    ///
    /// Returns the number of edges removed.
    pub fn purge_entity(&mut self, name: &Name) -> usize {
        let Self {
            relations,
            spare_sources,
            spare_destinations,
        } = self;

        let mut removed = 0;
        let emptied = relations.remove_where(|_, rel| {
            // The entity as destination: its whole source set goes at once.
            if let Some((_, dest)) = rel.destinations.delete(name) {
                removed += dest.live;
                spare_sources.release(dest.sources);
            }

            // The entity as source of every remaining destination.
            let drained = rel.destinations.remove_where(|_, dest| {
                if dest.sources.delete(name).is_some() {
                    dest.live -= 1;
                    removed += 1;
                }
                dest.live == 0
            });
            for (_, dest) in drained {
                spare_sources.release(dest.sources);
            }

            rel.recompute_maximum();
            rel.destinations.is_empty()
        });

        let dropped_relations = emptied.len();
        for (_, rel) in emptied {
            spare_destinations.release(rel.destinations);
        }

        debug!(%name, removed, dropped_relations, "entity purged from relation index");
        removed
    }

    /// Maximum live count of `relation`, if it has any edge.
    #[must_use]
    pub fn maximum(&self, relation: &Name) -> Option<usize> {
        self.relations.get(relation).map(Relation::maximum)
    }

    /// Live count of `destination` under `relation`, if it has any edge.
    #[must_use]
    pub fn live_count(&self, relation: &Name, destination: &Name) -> Option<usize> {
        self.relations
            .get(relation)?
            .destination(destination)
            .map(Destination::live)
    }

    /// Check if the edge `source → destination` of type `relation` exists.
    #[must_use]
    pub fn contains_edge(&self, source: &Name, destination: &Name, relation: &Name) -> bool {
        self.relations
            .get(relation)
            .and_then(|rel| rel.destination(destination))
            .is_some_and(|dest| dest.has_source(source))
    }

    /// Number of relation types with at least one edge.
    #[must_use]
    pub fn relation_count(&self) -> usize {
        self.relations.len()
    }

    /// Check if the index holds no edge.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.relations.is_empty()
    }

    /// Relation types in ascending order.
    pub fn relations(&self) -> impl Iterator<Item = (&Name, &Relation)> + '_ {
        self.relations.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(name: &str) -> Name {
        Name::from(name)
    }

    fn registry(names: &[&str]) -> EntityRegistry {
        let mut registry = EntityRegistry::new();
        for name in names {
            registry.add(&n(name));
        }
        registry
    }

    #[test]
    fn test_add_edge_requires_registered_endpoints() {
        let registry = registry(&["a"]);
        let mut index = RelationIndex::new();

        assert!(!index.add_edge(&registry, &n("a"), &n("ghost"), &n("r")));
        assert!(!index.add_edge(&registry, &n("ghost"), &n("a"), &n("r")));
        assert!(index.is_empty());
    }

    #[test]
    fn test_duplicate_edge_keeps_count() {
        let registry = registry(&["a", "b", "c"]);
        let mut index = RelationIndex::new();

        assert!(index.add_edge(&registry, &n("a"), &n("b"), &n("r")));
        assert!(index.add_edge(&registry, &n("c"), &n("b"), &n("r")));
        assert!(!index.add_edge(&registry, &n("a"), &n("b"), &n("r")));

        assert_eq!(index.live_count(&n("r"), &n("b")), Some(2));
        assert_eq!(index.maximum(&n("r")), Some(2));
    }

    #[test]
    fn test_self_edge_counts() {
        let registry = registry(&["a"]);
        let mut index = RelationIndex::new();

        assert!(index.add_edge(&registry, &n("a"), &n("a"), &n("r")));
        assert_eq!(index.maximum(&n("r")), Some(1));

        assert_eq!(index.purge_entity(&n("a")), 1);
        assert!(index.is_empty());
    }

    #[test]
    fn test_remove_edge_recomputes_unique_maximum() {
        let registry = registry(&["a", "b", "c", "x", "y"]);
        let mut index = RelationIndex::new();

        index.add_edge(&registry, &n("a"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("b"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("c"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("a"), &n("y"), &n("r"));
        assert_eq!(index.maximum(&n("r")), Some(3));

        assert!(index.remove_edge(&n("c"), &n("x"), &n("r")));
        assert_eq!(index.maximum(&n("r")), Some(2));

        assert!(index.remove_edge(&n("b"), &n("x"), &n("r")));
        assert_eq!(index.maximum(&n("r")), Some(1));
        let leaders: Vec<&Name> = index.relations().next().unwrap().1.leaders().collect();
        assert_eq!(leaders, vec![&n("x"), &n("y")]);
    }

    #[test]
    fn test_remove_edge_below_maximum_keeps_it() {
        let registry = registry(&["a", "b", "x", "y"]);
        let mut index = RelationIndex::new();

        index.add_edge(&registry, &n("a"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("b"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("a"), &n("y"), &n("r"));

        assert!(index.remove_edge(&n("a"), &n("y"), &n("r")));
        assert_eq!(index.maximum(&n("r")), Some(2));
        assert_eq!(index.live_count(&n("r"), &n("y")), None);
    }

    #[test]
    fn test_remove_missing_edge_is_noop() {
        let registry = registry(&["a", "b"]);
        let mut index = RelationIndex::new();
        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));

        assert!(!index.remove_edge(&n("a"), &n("b"), &n("other")));
        assert!(!index.remove_edge(&n("a"), &n("a"), &n("r")));
        assert!(!index.remove_edge(&n("b"), &n("b"), &n("r")));
        assert!(index.contains_edge(&n("a"), &n("b"), &n("r")));
    }

    #[test]
    fn test_last_edge_removes_relation() {
        let registry = registry(&["a", "b"]);
        let mut index = RelationIndex::new();
        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));

        assert!(index.remove_edge(&n("a"), &n("b"), &n("r")));
        assert!(index.is_empty());
        assert_eq!(index.maximum(&n("r")), None);
    }

    #[test]
    fn test_purge_as_destination_and_source() {
        let registry = registry(&["a", "b", "c", "d"]);
        let mut index = RelationIndex::new();

        // b receives two edges, and sends one to c
        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));
        index.add_edge(&registry, &n("c"), &n("b"), &n("r"));
        index.add_edge(&registry, &n("b"), &n("c"), &n("r"));
        index.add_edge(&registry, &n("d"), &n("c"), &n("s"));
        index.add_edge(&registry, &n("b"), &n("d"), &n("s"));

        assert_eq!(index.purge_entity(&n("b")), 4);

        assert_eq!(index.maximum(&n("r")), None);
        assert_eq!(index.maximum(&n("s")), Some(1));
        assert!(index.contains_edge(&n("d"), &n("c"), &n("s")));
        assert!(!index.contains_edge(&n("b"), &n("d"), &n("s")));
        assert_eq!(index.relation_count(), 1);
    }

    #[test]
    fn test_purge_recomputes_maximum() {
        let registry = registry(&["a", "b", "c", "x", "y"]);
        let mut index = RelationIndex::new();

        index.add_edge(&registry, &n("a"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("b"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("c"), &n("x"), &n("r"));
        index.add_edge(&registry, &n("a"), &n("y"), &n("r"));
        index.add_edge(&registry, &n("b"), &n("y"), &n("r"));

        index.purge_entity(&n("c"));
        assert_eq!(index.maximum(&n("r")), Some(2));

        index.purge_entity(&n("a"));
        assert_eq!(index.maximum(&n("r")), Some(1));
        assert_eq!(index.live_count(&n("r"), &n("x")), Some(1));
        assert_eq!(index.live_count(&n("r"), &n("y")), Some(1));
    }

    #[test]
    fn test_purge_unknown_entity_changes_nothing() {
        let registry = registry(&["a", "b"]);
        let mut index = RelationIndex::new();
        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));

        assert_eq!(index.purge_entity(&n("zzz")), 0);
        assert_eq!(index.maximum(&n("r")), Some(1));
    }

    #[test]
    fn test_emptied_maps_are_pooled() {
        let registry = registry(&["a", "b"]);
        let mut index = RelationIndex::new();

        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));
        index.remove_edge(&n("a"), &n("b"), &n("r"));
        assert_eq!(index.spare_sources.len(), 1);
        assert_eq!(index.spare_destinations.len(), 1);

        index.add_edge(&registry, &n("a"), &n("b"), &n("r"));
        assert!(index.spare_sources.is_empty());
        assert!(index.spare_destinations.is_empty());
        assert_eq!(index.maximum(&n("r")), Some(1));
    }
}
