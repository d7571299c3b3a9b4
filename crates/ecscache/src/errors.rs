//! Stress harness errors and exit codes.

use thiserror::Error;

/// Process exit codes.
pub mod exit_codes {
    /// Any failure without a more specific code.
    pub const ERROR_GENERIC: u8 = 1;
    /// Pools did not get back every object they created.
    pub const ERROR_IMBALANCE: u8 = 3;
    /// Invalid command-line or environment configuration.
    pub const ERROR_CONFIG: u8 = 4;
    /// A worker thread panicked.
    pub const ERROR_WORKER: u8 = 5;
    /// A borrowed collection was observed in an unexpected state.
    pub const ERROR_CORRUPTED: u8 = 6;
}

/// Failures detected by the stress harness.
#[derive(Debug, Error)]
pub enum StressError {
    /// Configuration error.
    #[error("configuration error: {0}")]
    Config(String),

    /// One or more worker threads panicked.
    #[error("{0} worker thread(s) panicked")]
    WorkerPanicked(usize),

    /// A borrowed collection did not hold what the borrowing worker put in.
    #[error("{collection} held {found} entries, expected {expected}")]
    Corrupted {
        /// Which facade collection was affected.
        collection: &'static str,
        /// Entries the worker expected.
        expected: usize,
        /// Entries actually found.
        found: usize,
    },

    /// A pool ended the run holding fewer objects than it created.
    #[error("pool {type_name} holds {available} objects but created {created}")]
    Imbalance {
        /// The pooled type.
        type_name: &'static str,
        /// Objects in the free list after the run.
        available: usize,
        /// Objects the factory built during the run.
        created: u64,
    },
}

/// Map a harness error to its exit code.
#[must_use]
pub fn exit_code(err: &StressError) -> u8 {
    match err {
        StressError::Config(_) => exit_codes::ERROR_CONFIG,
        StressError::WorkerPanicked(_) => exit_codes::ERROR_WORKER,
        StressError::Corrupted { .. } => exit_codes::ERROR_CORRUPTED,
        StressError::Imbalance { .. } => exit_codes::ERROR_IMBALANCE,
    }
}

/// Map any application error to an exit code, falling back to the generic one.
#[must_use]
pub fn exit_code_for(err: &anyhow::Error) -> u8 {
    err.downcast_ref::<StressError>()
        .map_or(exit_codes::ERROR_GENERIC, exit_code)
}
