//! Entity-component cache facade.
//!
//! Convenience borrows for the short-lived collections an entity-component
//! system churns through every frame. Each `push_*` clears the container
//! before handing it back to the underlying [`ObjectCache`].

use std::collections::HashSet;
use std::sync::OnceLock;

use ecscache_core::ObjectCache;

/// Recyclable component lists, integer lists and integer sets.
///
/// Construct one per world and pass it by reference. [`EntityCache::shared`]
/// exists for code that has no way to thread an instance through.
#[derive(Debug, Default)]
pub struct EntityCache {
    objects: ObjectCache,
}

impl EntityCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The process-wide instance, created on first use.
    #[must_use]
    pub fn shared() -> &'static EntityCache {
        static SHARED: OnceLock<EntityCache> = OnceLock::new();
        SHARED.get_or_init(EntityCache::new)
    }

    /// Borrow an empty list of components.
    pub fn component_list<C: Send + 'static>(&self) -> Vec<C> {
        self.objects.get()
    }

    /// Clear `list` and return it for reuse.
    pub fn push_component_list<C: Send + 'static>(&self, mut list: Vec<C>) {
        list.clear();
        self.objects.push(list);
    }

    /// Borrow an empty list of entity indices.
    pub fn int_list(&self) -> Vec<i32> {
        self.objects.get()
    }

    /// Clear `list` and return it for reuse.
    pub fn push_int_list(&self, mut list: Vec<i32>) {
        list.clear();
        self.objects.push(list);
    }

    /// Borrow an empty set of entity indices.
    pub fn int_set(&self) -> HashSet<i32> {
        self.objects.get()
    }

    /// Clear `set` and return it for reuse.
    pub fn push_int_set(&self, mut set: HashSet<i32>) {
        set.clear();
        self.objects.push(set);
    }

    /// Drop every pooled collection.
    pub fn reset(&self) {
        self.objects.reset();
    }

    /// The underlying type-indexed cache.
    #[must_use]
    pub fn objects(&self) -> &ObjectCache {
        &self.objects
    }
}
