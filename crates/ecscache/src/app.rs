//! Stress harness entry point.
//!
//! Workers borrow an integer list, an integer set and a component list per
//! iteration, fill them, and return them. The cache is reset before every
//! round, so whatever the caller pooled earlier does not count. After the
//! last round every pool must hold exactly the objects it built, warmed or
//! created on demand, since all workers have returned what they borrowed.

use std::collections::HashSet;
use std::time::Instant;

use anyhow::Result;
use ecscache_core::PoolReport;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::StressConfig;
use crate::entity::EntityCache;
use crate::errors::StressError;
use crate::version;

/// Component type stored in the borrowed component lists.
type Position = (i32, i32);

/// Outcome of a stress run.
#[derive(Debug, Serialize)]
pub struct StressReport {
    /// Harness version.
    pub version: &'static str,
    /// Worker threads per round.
    pub threads: usize,
    /// Iterations per worker and round.
    pub iterations: usize,
    /// Rounds run.
    pub rounds: usize,
    /// Values written per borrowed collection.
    pub batch: usize,
    /// Objects pre-built per pool at the start of each round.
    pub warm: usize,
    /// Wall-clock time for all rounds.
    pub elapsed_ms: u128,
    /// Pools alive after the last round.
    pub pools: Vec<PoolReport>,
}

/// Run the application.
pub fn run(config: &StressConfig) -> Result<()> {
    let cache = EntityCache::new();
    let report = stress(&cache, config)?;

    if config.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        present(&report);
    }
    Ok(())
}

/// Drive `cache` from `config.threads` workers for `config.rounds` rounds.
pub fn stress(cache: &EntityCache, config: &StressConfig) -> Result<StressReport, StressError> {
    config.validate()?;
    let started = Instant::now();

    for round in 1..=config.rounds {
        cache.reset();
        warm(cache, config.warm);
        run_round(cache, config)?;
        info!(round, pools = cache.objects().len(), "Round complete");
    }

    let pools = cache.objects().report();
    verify_balanced(&pools, config.warm)?;

    Ok(StressReport {
        version: version::version(),
        threads: config.threads,
        iterations: config.iterations,
        rounds: config.rounds,
        batch: config.batch,
        warm: config.warm,
        elapsed_ms: started.elapsed().as_millis(),
        pools,
    })
}

fn warm(cache: &EntityCache, count: usize) {
    if count == 0 {
        return;
    }
    let objects = cache.objects();
    objects.pool::<Vec<i32>>().warm(count);
    objects.pool::<HashSet<i32>>().warm(count);
    objects.pool::<Vec<Position>>().warm(count);
    debug!(count, "Warmed pools");
}

fn run_round(cache: &EntityCache, config: &StressConfig) -> Result<(), StressError> {
    let outcome = crossbeam::thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|worker| {
                scope.spawn(move |_| {
                    debug!(worker, "Worker started");
                    churn(cache, config)
                })
            })
            .collect();

        let mut panicked = 0;
        let mut first_error = None;
        for handle in handles {
            match handle.join() {
                Ok(Ok(())) => {}
                Ok(Err(err)) => {
                    first_error.get_or_insert(err);
                }
                Err(_) => panicked += 1,
            }
        }

        if panicked > 0 {
            return Err(StressError::WorkerPanicked(panicked));
        }
        first_error.map_or(Ok(()), Err)
    });

    // Every handle is joined above, so the scope only fails if joining itself did.
    outcome.map_err(|_| StressError::WorkerPanicked(config.threads))?
}

#[allow(clippy::cast_possible_truncation, clippy::cast_possible_wrap)]
fn churn(cache: &EntityCache, config: &StressConfig) -> Result<(), StressError> {
    for _ in 0..config.iterations {
        let mut ids = cache.int_list();
        let mut seen = cache.int_set();
        let mut positions = cache.component_list::<Position>();
        expect_len("int list", ids.len(), 0)?;
        expect_len("int set", seen.len(), 0)?;
        expect_len("component list", positions.len(), 0)?;

        // Bounded by MAX_BATCH, so the cast cannot wrap.
        for value in 0..config.batch as i32 {
            ids.push(value);
            seen.insert(value);
            positions.push((value, -value));
        }
        expect_len("int list", ids.len(), config.batch)?;
        expect_len("int set", seen.len(), config.batch)?;
        expect_len("component list", positions.len(), config.batch)?;

        cache.push_int_list(ids);
        cache.push_int_set(seen);
        cache.push_component_list(positions);
    }
    Ok(())
}

fn expect_len(collection: &'static str, found: usize, expected: usize) -> Result<(), StressError> {
    if found == expected {
        Ok(())
    } else {
        Err(StressError::Corrupted {
            collection,
            expected,
            found,
        })
    }
}

fn verify_balanced(pools: &[PoolReport], warmed: usize) -> Result<(), StressError> {
    for pool in pools {
        let created = pool.stats.misses + warmed as u64;
        if pool.available as u64 != created {
            return Err(StressError::Imbalance {
                type_name: pool.type_name,
                available: pool.available,
                created,
            });
        }
    }
    Ok(())
}

fn present(report: &StressReport) {
    println!("{}", version::full_version());
    println!(
        "threads={} iterations={} rounds={} batch={} warm={} elapsed={}ms",
        report.threads,
        report.iterations,
        report.rounds,
        report.batch,
        report.warm,
        report.elapsed_ms
    );
    println!(
        "{:<48} {:>9} {:>10} {:>8} {:>10} {:>8}",
        "type", "available", "hits", "misses", "returns", "hit-rate"
    );
    for pool in &report.pools {
        println!(
            "{:<48} {:>9} {:>10} {:>8} {:>10} {:>7.2}%",
            pool.type_name,
            pool.available,
            pool.stats.hits,
            pool.stats.misses,
            pool.stats.returns,
            pool.stats.hit_rate() * 100.0
        );
    }
}

#[cfg(test)]
mod tests {
    use ecscache_core::PoolStats;

    use super::*;

    fn small_config() -> StressConfig {
        StressConfig {
            threads: 3,
            iterations: 200,
            rounds: 2,
            batch: 8,
            ..Default::default()
        }
    }

    #[test]
    fn stress_reports_three_balanced_pools() {
        let cache = EntityCache::new();
        let report = stress(&cache, &small_config()).unwrap();

        assert_eq!(report.pools.len(), 3);
        for pool in &report.pools {
            assert_eq!(pool.available as u64, pool.stats.misses);
            assert!(pool.stats.misses <= 3, "{pool:?}");
            // Only the last round's counters survive the reset
            assert_eq!(pool.stats.returns, 3 * 200);
        }
    }

    #[test]
    fn stress_single_thread_reuses_one_object_per_type() {
        let cache = EntityCache::new();
        let config = StressConfig {
            threads: 1,
            rounds: 1,
            ..small_config()
        };
        let report = stress(&cache, &config).unwrap();
        for pool in &report.pools {
            assert_eq!(pool.stats.misses, 1);
            assert_eq!(pool.stats.hits, 199);
        }
    }

    #[test]
    fn stress_rejects_invalid_config() {
        let cache = EntityCache::new();
        let config = StressConfig {
            threads: 0,
            ..small_config()
        };
        assert!(matches!(
            stress(&cache, &config),
            Err(StressError::Config(_))
        ));
    }

    #[test]
    fn zero_iterations_leaves_no_pools() {
        let cache = EntityCache::new();
        let config = StressConfig {
            iterations: 0,
            ..small_config()
        };
        let report = stress(&cache, &config).unwrap();
        assert!(report.pools.is_empty());
    }

    #[test]
    fn stress_ignores_objects_pooled_before_the_run() {
        let cache = EntityCache::new();
        cache.push_int_list(Vec::new());
        cache.push_int_set(HashSet::new());
        let config = StressConfig {
            threads: 1,
            iterations: 10,
            rounds: 1,
            batch: 2,
            ..Default::default()
        };

        let report = stress(&cache, &config).unwrap();
        for pool in &report.pools {
            assert_eq!(pool.available, 1);
            assert_eq!(pool.stats.misses, 1);
            assert_eq!(pool.stats.returns, 10);
        }
    }

    #[test]
    fn stress_on_a_previously_used_cache() {
        let cache = EntityCache::new();
        stress(&cache, &small_config()).unwrap();
        let report = stress(&cache, &small_config()).unwrap();
        assert_eq!(report.pools.len(), 3);
    }

    #[test]
    fn warmed_pools_serve_every_borrow() {
        let cache = EntityCache::new();
        let config = StressConfig {
            warm: 4,
            ..small_config()
        };
        let report = stress(&cache, &config).unwrap();

        assert_eq!(report.warm, 4);
        assert_eq!(report.pools.len(), 3);
        for pool in &report.pools {
            // Three workers never need more than the four warmed objects
            assert_eq!(pool.stats.misses, 0, "{pool:?}");
            assert_eq!(pool.available, 4);
            assert_eq!(pool.stats.hits, 3 * 200);
        }
    }

    #[test]
    fn warmed_objects_count_as_created() {
        let pools = vec![PoolReport {
            type_name: "alloc::vec::Vec<i32>",
            available: 5,
            stats: PoolStats {
                hits: 10,
                misses: 1,
                returns: 10,
            },
        }];
        assert!(verify_balanced(&pools, 4).is_ok());
        assert!(verify_balanced(&pools, 0).is_err());
    }

    #[test]
    fn imbalance_is_detected() {
        let pools = vec![PoolReport {
            type_name: "alloc::vec::Vec<i32>",
            available: 1,
            stats: PoolStats {
                hits: 0,
                misses: 2,
                returns: 1,
            },
        }];
        assert!(matches!(
            verify_balanced(&pools, 0),
            Err(StressError::Imbalance { created: 2, .. })
        ));
    }

    #[test]
    fn report_serializes() {
        let cache = EntityCache::new();
        let report = stress(&cache, &small_config()).unwrap();
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["threads"], 3);
        assert_eq!(json["pools"].as_array().unwrap().len(), 3);
    }
}
