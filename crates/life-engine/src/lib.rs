//! Parallel generation stepping over a shared toroidal grid.
//!
//! A fixed pool of worker threads advances the grid, one thread per
//! contiguous row band, synchronized at generation boundaries by a reusable
//! barrier. Bands are disjoint, so the write phase needs no lock; the
//! barrier keeps the read and write phases apart in time.
//!
//! # Generation Protocol
//!
//! ```text
//! Generation g (every worker, in lockstep):
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Phase 1: Read committed state, compute band into scratch   │
//! │  Phase 2: Barrier (all reads of generation g finished)      │
//! │  Phase 3: Commit scratch into owned band (disjoint writes)  │
//! │  Phase 4: Barrier (all writes of generation g finished)     │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! The second barrier is what makes generation `g`'s writes visible to every
//! worker's generation `g+1` reads: without it a fast worker could re-read a
//! slow peer's band mid-commit.
//!
//! A worker that fails poisons the barrier so its peers wake and exit
//! instead of deadlocking; the coordinator then reports the root cause.

mod barrier;
mod error;
mod partition;
mod sim;
mod worker;

pub use barrier::{Barrier, BarrierPoisoned, BarrierWaitResult};
pub use error::{ConfigError, EngineError, WorkerFailure};
pub use partition::{Band, partition};
pub use sim::{SimConfig, advance, run};
