//! Single-type object pool.
//!
//! A [`TypedPool`] owns a LIFO free list of `T`, a factory used when the free
//! list is empty, and an optional reset hook applied to every object pushed
//! back. Objects sitting in the free list are exclusively owned by the pool;
//! `get` hands ownership to the caller and `push` takes it back.

use std::fmt;

use parking_lot::Mutex;

use crate::stats::{AtomicPoolStats, PoolStats};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;
type ResetHook<T> = Box<dyn Fn(&mut T) + Send + Sync>;

/// A thread-safe free list for one type, backed by a `Mutex<Vec<T>>`.
///
/// The pool never bounds its size: pushing more than was taken grows the
/// free list, and nothing is trimmed until the pool itself is dropped.
pub struct TypedPool<T> {
    factory: Factory<T>,
    reset: Option<ResetHook<T>>,
    free: Mutex<Vec<T>>,
    stats: AtomicPoolStats,
}

impl<T> TypedPool<T> {
    /// Create a pool that builds new objects with `factory` and performs no reset.
    pub fn new(factory: impl Fn() -> T + Send + Sync + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            reset: None,
            free: Mutex::new(Vec::new()),
            stats: AtomicPoolStats::new(),
        }
    }

    /// Set the hook applied to every object on [`TypedPool::push`].
    ///
    /// The hook must bring the object back to the state the factory produces,
    /// because the next `get` may hand it to an unrelated caller.
    #[must_use]
    pub fn with_reset(mut self, reset: impl Fn(&mut T) + Send + Sync + 'static) -> Self {
        self.reset = Some(Box::new(reset));
        self
    }

    /// Take an object from the free list, or build a new one with the factory.
    ///
    /// The factory runs outside the free-list lock. If it panics, the panic
    /// reaches the caller unchanged.
    pub fn get(&self) -> T {
        // Bind first so the guard is released before the factory runs.
        let reused = self.free.lock().pop();
        if let Some(item) = reused {
            self.stats.record_hit();
            item
        } else {
            self.stats.record_miss();
            (self.factory)()
        }
    }

    /// Return an object to the pool, applying the reset hook first.
    pub fn push(&self, mut item: T) {
        if let Some(reset) = &self.reset {
            reset(&mut item);
        }
        self.free.lock().push(item);
        self.stats.record_return();
    }

    /// Number of objects currently waiting in the free list.
    #[must_use]
    pub fn available(&self) -> usize {
        self.free.lock().len()
    }

    /// Whether a reset hook is configured.
    #[must_use]
    pub fn has_reset(&self) -> bool {
        self.reset.is_some()
    }

    /// Pre-populate the free list until it holds at least `count` objects.
    ///
    /// Objects are built before the lock is taken, so a concurrent `push`
    /// may leave the pool slightly above `count`.
    pub fn warm(&self, count: usize) {
        let missing = count.saturating_sub(self.available());
        if missing == 0 {
            return;
        }
        let fresh: Vec<T> = (0..missing).map(|_| (self.factory)()).collect();
        self.free.lock().extend(fresh);
    }

    /// Get a snapshot of pool statistics.
    #[must_use]
    pub fn stats(&self) -> PoolStats {
        self.stats.snapshot()
    }
}

impl<T: Default + 'static> Default for TypedPool<T> {
    fn default() -> Self {
        Self::new(T::default)
    }
}

impl<T> fmt::Debug for TypedPool<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TypedPool")
            .field("type", &std::any::type_name::<T>())
            .field("available", &self.available())
            .field("has_reset", &self.has_reset())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}
