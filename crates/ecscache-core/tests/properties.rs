//! Property-based tests for pool free-list behavior.
//!
//! A single-threaded `TypedPool` must behave exactly like a `Vec` stack with
//! a factory fallback when the stack is empty.

use proptest::prelude::*;

use ecscache_core::{ObjectCache, TypedPool};

const FRESH: u64 = u64::MAX;

#[derive(Debug, Clone)]
enum Op {
    Push(u64),
    Get,
}

fn op_strategy() -> impl Strategy<Value = Op> {
    prop_oneof![(0u64..1_000).prop_map(Op::Push), Just(Op::Get)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every `get` returns what a LIFO model predicts, and counters agree.
    #[test]
    fn pool_matches_stack_model(ops in prop::collection::vec(op_strategy(), 0..200)) {
        let pool = TypedPool::new(|| FRESH);
        let mut model: Vec<u64> = Vec::new();
        let (mut hits, mut misses, mut returns) = (0u64, 0u64, 0u64);

        for op in ops {
            match op {
                Op::Push(v) => {
                    pool.push(v);
                    model.push(v);
                    returns += 1;
                }
                Op::Get => {
                    let expected = if let Some(v) = model.pop() {
                        hits += 1;
                        v
                    } else {
                        misses += 1;
                        FRESH
                    };
                    prop_assert_eq!(pool.get(), expected);
                }
            }
            prop_assert_eq!(pool.available(), model.len());
        }

        let stats = pool.stats();
        prop_assert_eq!(stats.hits, hits);
        prop_assert_eq!(stats.misses, misses);
        prop_assert_eq!(stats.returns, returns);
    }

    /// A reset hook leaves every pooled object in the factory state.
    #[test]
    fn reset_hook_always_restores_empty(batches in prop::collection::vec(prop::collection::vec(any::<i32>(), 0..32), 1..20)) {
        let pool = TypedPool::new(Vec::<i32>::new).with_reset(Vec::clear);
        for batch in &batches {
            let mut list = pool.get();
            prop_assert!(list.is_empty());
            list.extend_from_slice(batch);
            pool.push(list);
        }
        prop_assert_eq!(pool.available(), 1);
    }

    /// Objects pushed under one type never surface under another.
    #[test]
    fn types_never_mix(words in prop::collection::vec("[a-z]{1,8}", 1..16), numbers in prop::collection::vec(any::<u32>(), 1..16)) {
        let cache = ObjectCache::new();
        for w in &words {
            cache.push(w.clone());
        }
        for n in &numbers {
            cache.push(*n);
        }

        prop_assert_eq!(cache.pool::<String>().available(), words.len());
        prop_assert_eq!(cache.pool::<u32>().available(), numbers.len());
        prop_assert_eq!(cache.get::<String>(), words.last().cloned().unwrap_or_default());
        prop_assert_eq!(cache.get::<u32>(), numbers.last().copied().unwrap_or_default());
    }
}
