//! # ecscache-core
//!
//! Type-keyed object recycling for allocation-heavy hot loops.
//!
//! [`TypedPool`] is a thread-safe free list for one type with a factory and an
//! optional reset hook. [`ObjectCache`] lazily creates and indexes one pool
//! per requested type.
//!
//! # Example
//! ```
//! use ecscache_core::{ObjectCache, TypedPool};
//!
//! let cache = ObjectCache::new();
//! cache.register_pool(TypedPool::new(Vec::<u32>::new).with_reset(Vec::clear));
//!
//! let mut ids: Vec<u32> = cache.get();
//! ids.extend([1, 2, 3]);
//! cache.push(ids);
//!
//! assert!(cache.get::<Vec<u32>>().is_empty());
//! ```
#![warn(missing_docs)]

pub mod cache;
pub mod pool;
pub mod stats;

pub use cache::{ObjectCache, PoolReport};
pub use pool::TypedPool;
pub use stats::PoolStats;
