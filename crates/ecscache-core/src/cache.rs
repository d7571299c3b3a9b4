//! Type-indexed registry of object pools.
//!
//! [`ObjectCache`] keeps at most one [`TypedPool`] per type, keyed by
//! [`TypeId`]. Pools are created lazily on first demand with `T::default` as
//! the factory, or registered up front with a custom factory and reset hook.
//! Both paths are insert-if-absent: whichever pool lands in the map first
//! stays there until [`ObjectCache::reset`].

use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use serde::Serialize;
use tracing::debug;

use crate::pool::TypedPool;
use crate::stats::PoolStats;

/// Type-erased view of a pool, used for reporting and downcasting.
trait ErasedPool: Send + Sync {
    fn type_name(&self) -> &'static str;
    fn available(&self) -> usize;
    fn stats(&self) -> PoolStats;
    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync>;
}

impl<T: Send + 'static> ErasedPool for TypedPool<T> {
    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }

    fn available(&self) -> usize {
        TypedPool::available(self)
    }

    fn stats(&self) -> PoolStats {
        TypedPool::stats(self)
    }

    fn into_any(self: Arc<Self>) -> Arc<dyn Any + Send + Sync> {
        self
    }
}

/// Point-in-time view of one pool in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PoolReport {
    /// Fully qualified name of the pooled type.
    pub type_name: &'static str,
    /// Objects currently waiting in the free list.
    pub available: usize,
    /// Usage counters since the pool was created or its stats were reset.
    pub stats: PoolStats,
}

/// A thread-safe map from type to its object pool.
#[derive(Default)]
pub struct ObjectCache {
    pools: RwLock<HashMap<TypeId, Arc<dyn ErasedPool>>>,
}

impl ObjectCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the pool for `T`, creating a default one if none exists yet.
    ///
    /// Concurrent first requests for the same type all receive the same pool.
    pub fn pool<T: Default + Send + 'static>(&self) -> Arc<TypedPool<T>> {
        if let Some(pool) = self.existing_pool::<T>() {
            return pool;
        }

        let mut pools = self.pools.write();
        let entry = pools.entry(TypeId::of::<T>()).or_insert_with(|| {
            debug!(pool_type = std::any::type_name::<T>(), "Creating default pool");
            let pool: Arc<dyn ErasedPool> = Arc::new(TypedPool::<T>::default());
            pool
        });
        downcast::<T>(entry)
    }

    /// Get the pool for `T` without creating one.
    #[must_use]
    pub fn existing_pool<T: Send + 'static>(&self) -> Option<Arc<TypedPool<T>>> {
        self.pools.read().get(&TypeId::of::<T>()).map(downcast::<T>)
    }

    /// Borrow an instance of `T` from its pool.
    pub fn get<T: Default + Send + 'static>(&self) -> T {
        self.pool::<T>().get()
    }

    /// Return an instance of `T` to its pool.
    pub fn push<T: Default + Send + 'static>(&self, item: T) {
        self.pool::<T>().push(item);
    }

    /// Register a custom pool for `T` if the type has no pool yet.
    ///
    /// Returns `false`, dropping `pool`, when one already exists. This
    /// includes a default pool created by an earlier `get` or `push`.
    pub fn register_pool<T: Send + 'static>(&self, pool: TypedPool<T>) -> bool {
        let type_name = std::any::type_name::<T>();
        let mut pools = self.pools.write();
        if pools.contains_key(&TypeId::of::<T>()) {
            debug!(pool_type = type_name, "Pool already registered, ignoring");
            return false;
        }
        pools.insert(TypeId::of::<T>(), Arc::new(pool));
        debug!(pool_type = type_name, "Registered custom pool");
        true
    }

    /// Drop every pool together with the objects it holds.
    ///
    /// Not coordinated with concurrent `get`/`push`: an object pushed while
    /// the reset runs may land in a discarded pool or in a fresh one.
    pub fn reset(&self) {
        let dropped = std::mem::take(&mut *self.pools.write());
        debug!(pools = dropped.len(), "Reset object cache");
    }

    /// Number of pools currently registered.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pools.read().len()
    }

    /// Whether no pool has been created or registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pools.read().is_empty()
    }

    /// Snapshot every pool, sorted by type name.
    #[must_use]
    pub fn report(&self) -> Vec<PoolReport> {
        let mut reports: Vec<PoolReport> = self
            .pools
            .read()
            .values()
            .map(|pool| PoolReport {
                type_name: pool.type_name(),
                available: pool.available(),
                stats: pool.stats(),
            })
            .collect();
        reports.sort_unstable_by_key(|r| r.type_name);
        reports
    }
}

impl fmt::Debug for ObjectCache {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObjectCache")
            .field("pools", &self.len())
            .finish()
    }
}

/// Recover the concrete pool. Entries are keyed by `TypeId::of::<T>()`, so
/// the entry for `T` always holds a `TypedPool<T>`.
fn downcast<T: Send + 'static>(pool: &Arc<dyn ErasedPool>) -> Arc<TypedPool<T>> {
    Arc::clone(pool)
        .into_any()
        .downcast::<TypedPool<T>>()
        .unwrap_or_else(|_| {
            unreachable!(
                "pool for {} stored under a foreign TypeId",
                std::any::type_name::<T>()
            )
        })
}
