//! Stress harness configuration from CLI flags and environment.

use clap::Parser;

use crate::errors::StressError;

/// Largest accepted `--batch`, keeping every written value inside `i32`.
pub const MAX_BATCH: usize = 1_000_000;

/// ecscache: hammer an entity-component object cache from many threads and
/// report pool statistics.
#[derive(Parser, Debug, Clone)]
#[command(name = "ecscache", version, about)]
pub struct StressConfig {
    /// Number of worker threads.
    #[arg(short, long, default_value = "4", env = "ECSCACHE_THREADS")]
    pub threads: usize,

    /// Borrow/return cycles per worker and round.
    #[arg(short, long, default_value = "10000", env = "ECSCACHE_ITERATIONS")]
    pub iterations: usize,

    /// Number of rounds. The cache is reset before each round.
    #[arg(short, long, default_value = "3", env = "ECSCACHE_ROUNDS")]
    pub rounds: usize,

    /// Values written into every borrowed collection.
    #[arg(short, long, default_value = "16", env = "ECSCACHE_BATCH")]
    pub batch: usize,

    /// Objects pre-built in every pool at the start of each round.
    #[arg(short, long, default_value = "0", env = "ECSCACHE_WARM")]
    pub warm: usize,

    /// Print the final report as JSON.
    #[arg(long)]
    pub json: bool,

    /// Verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl StressConfig {
    /// Parse CLI arguments.
    #[must_use]
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }

    /// Reject settings the harness cannot run with.
    pub fn validate(&self) -> Result<(), StressError> {
        if self.threads == 0 {
            return Err(StressError::Config("threads must be at least 1".into()));
        }
        if self.rounds == 0 {
            return Err(StressError::Config("rounds must be at least 1".into()));
        }
        if self.batch > MAX_BATCH {
            return Err(StressError::Config(format!(
                "batch must be at most {MAX_BATCH}"
            )));
        }
        Ok(())
    }
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            threads: 4,
            iterations: 10_000,
            rounds: 3,
            batch: 16,
            warm: 0,
            json: false,
            verbose: false,
        }
    }
}
