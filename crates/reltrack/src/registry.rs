//! Set of currently registered entities.

use reltrack_tree::OrderedMap;

use crate::name::Name;

/// Membership set of entity names.
///
/// Adding twice or removing an unknown name is a no-op. The relation
/// cascade on removal is driven by [`Graph`](crate::Graph), which owns both
/// the registry and the index.
#[derive(Debug, Default)]
pub struct EntityRegistry {
    entities: OrderedMap<Name, ()>,
}

impl EntityRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `name`. Returns `true` if it was not registered before.
    pub fn add(&mut self, name: &Name) -> bool {
        let (_, created) = self.entities.insert_or_get(name.clone());
        created
    }

    /// Unregister `name`. Returns `true` if it was registered.
    pub fn remove(&mut self, name: &Name) -> bool {
        self.entities.delete(name).is_some()
    }

    /// Check if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &Name) -> bool {
        self.entities.contains_key(name)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Check if no entity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }

    /// Registered names in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = &Name> + '_ {
        self.entities.keys()
    }
}
