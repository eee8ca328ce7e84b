//! The graph context: registry and relation index behind one owner.

use tracing::{debug, trace};

use crate::index::RelationIndex;
use crate::name::Name;
use crate::registry::EntityRegistry;
use crate::report::Report;

/// Entities plus the typed edges between them.
///
/// Every operation is total: references to unknown entities, relations or
/// edges are ignored. The boolean results only say whether anything changed.
#[derive(Default)]
pub struct Graph {
    entities: EntityRegistry,
    relations: RelationIndex,
}

impl Graph {
    /// Create an empty graph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an entity.
    pub fn add_entity(&mut self, name: &Name) -> bool {
        let added = self.entities.add(name);
        trace!(%name, added, "addent");
        added
    }

    /// Unregister an entity and drop every edge touching it.
    pub fn remove_entity(&mut self, name: &Name) -> bool {
        if !self.entities.contains(name) {
            trace!(%name, "delent on unknown entity");
            return false;
        }
        let purged = self.relations.purge_entity(name);
        self.entities.remove(name);
        debug!(%name, purged, "entity removed");
        true
    }

    /// Add a typed edge between two registered entities.
    pub fn add_edge(&mut self, source: &Name, destination: &Name, relation: &Name) -> bool {
        self.relations
            .add_edge(&self.entities, source, destination, relation)
    }

    /// Remove a typed edge.
    pub fn remove_edge(&mut self, source: &Name, destination: &Name, relation: &Name) -> bool {
        self.relations.remove_edge(source, destination, relation)
    }

    /// Current per-relation maximum report.
    #[must_use]
    pub fn report(&self) -> Report {
        Report::generate(&self.relations)
    }

    /// The entity registry.
    #[must_use]
    pub const fn entities(&self) -> &EntityRegistry {
        &self.entities
    }

    /// The relation index.
    #[must_use]
    pub const fn relations(&self) -> &RelationIndex {
        &self.relations
    }
}
