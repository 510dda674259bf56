//! Engine error types.

use thiserror::Error;

use crate::barrier::BarrierPoisoned;
use crate::partition::Band;

/// Configuration rejected before any worker is spawned.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    /// Grid size of zero.
    #[error("grid size must be at least 1")]
    ZeroSize,

    /// Worker count of zero.
    #[error("worker count must be at least 1")]
    ZeroWorkers,

    /// More workers than rows; a zero-row band is degenerate.
    #[error("worker count {workers} exceeds the {size} grid rows")]
    TooManyWorkers { workers: usize, size: usize },

    /// Live probability outside `[0, 1]`.
    #[error("live probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

/// Fault reported by a single worker; fatal to the whole run.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum WorkerFailure {
    /// The assigned band does not fit the grid.
    #[error("band {band:?} does not fit a grid of {size} rows")]
    BandOutOfRange { band: Band, size: usize },

    /// A peer poisoned the barrier; this worker exited cleanly.
    #[error("a peer worker failed before the rendezvous")]
    PeerFailed,

    /// The worker thread panicked.
    #[error("worker panicked: {0}")]
    Panicked(String),
}

impl From<BarrierPoisoned> for WorkerFailure {
    fn from(_: BarrierPoisoned) -> Self {
        Self::PeerFailed
    }
}

/// Top-level error surfaced by [`crate::run`] and [`crate::advance`].
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration, raised synchronously before any spawn.
    #[error("invalid configuration: {0}")]
    Configuration(#[from] ConfigError),

    /// A worker failed mid-run.
    #[error("worker {worker} failed: {failure}")]
    Worker { worker: usize, failure: WorkerFailure },

    /// The OS refused a worker thread.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] std::io::Error),
}
