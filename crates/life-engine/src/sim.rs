//! Coordinator: builds the grid, spawns workers, collects the result.

use std::any::Any;
use std::sync::Arc;
use std::thread;

use crossbeam_channel::bounded;
use life_grid::Grid;
use rand::Rng;
use tracing::{debug, info};

use crate::barrier::{Barrier, PoisonOnPanic};
use crate::error::{ConfigError, EngineError, WorkerFailure};
use crate::partition::{check_dimensions, partition};
use crate::worker::Worker;

/// Parameters for a full simulation run.
#[derive(Clone, Debug)]
pub struct SimConfig {
    /// Grid side length; the grid is `size x size`.
    pub size: usize,
    /// Worker thread count; each owns one row band, so at most `size`.
    pub workers: usize,
    /// Number of generations to advance. Zero returns the initial grid.
    pub generations: u64,
    /// Probability in `[0, 1]` that each initial cell is alive.
    pub live_probability: f64,
}

impl SimConfig {
    /// Validate the configuration without spawning anything.
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_dimensions(self.size, self.workers)?;
        if !(0.0..=1.0).contains(&self.live_probability) {
            return Err(ConfigError::ProbabilityOutOfRange(self.live_probability));
        }
        Ok(())
    }
}

/// Run a full simulation: build a random initial grid from the supplied
/// source, advance it `generations` times, return the final grid.
///
/// Synchronous: does not return until every worker has terminated. The
/// result is deterministic modulo `rng`, and independent of `workers`.
pub fn run<R: Rng>(config: &SimConfig, rng: &mut R) -> Result<Grid, EngineError> {
    config.validate()?;
    let grid = Grid::random(config.size, config.live_probability, rng);
    advance(grid, config.workers, config.generations)
}

/// Advance an existing grid by `generations` using `workers` parallel
/// workers, one per row band.
///
/// Spawns one OS thread per band, all sharing the grid and one barrier.
/// Every worker reports through a result channel and is joined before this
/// returns; a failed worker poisons the barrier so the rest exit instead of
/// deadlocking, and the root-cause failure is surfaced.
pub fn advance(grid: Grid, workers: usize, generations: u64) -> Result<Grid, EngineError> {
    let bands = partition(grid.size(), workers)?;
    if generations == 0 {
        return Ok(grid);
    }

    info!(size = grid.size(), workers, generations, "starting simulation");

    let grid = Arc::new(grid);
    let barrier = Arc::new(Barrier::new(workers));
    let (result_tx, result_rx) = bounded(workers);

    let mut handles = Vec::with_capacity(workers);
    for (index, band) in bands.into_iter().enumerate() {
        let worker = Worker::new(index, band, generations, Arc::clone(&grid), Arc::clone(&barrier));
        let result_tx = result_tx.clone();
        let worker_barrier = Arc::clone(&barrier);
        debug!(index, ?band, "spawning worker");

        let spawned = thread::Builder::new()
            .name(format!("life-worker-{index}"))
            .spawn(move || {
                let _poison = PoisonOnPanic(&worker_barrier);
                let result = worker.run();
                if result.is_err() {
                    worker_barrier.poison();
                }
                let _ = result_tx.send((index, result));
            });

        match spawned {
            Ok(handle) => handles.push(handle),
            Err(err) => {
                // Already-running workers would block at the rendezvous
                // forever waiting for threads that never started.
                barrier.poison();
                for handle in handles {
                    let _ = handle.join();
                }
                return Err(EngineError::Spawn(err));
            }
        }
    }
    drop(result_tx);

    let mut failure: Option<(usize, WorkerFailure)> = None;
    for (index, handle) in handles.into_iter().enumerate() {
        if let Err(payload) = handle.join() {
            record_failure(
                &mut failure,
                index,
                WorkerFailure::Panicked(panic_message(payload.as_ref())),
            );
        }
    }
    for (index, result) in result_rx {
        if let Err(worker_failure) = result {
            record_failure(&mut failure, index, worker_failure);
        }
    }

    if let Some((worker, failure)) = failure {
        return Err(EngineError::Worker { worker, failure });
    }

    let grid = Arc::into_inner(grid).expect("all worker threads were joined");
    info!(live = grid.live_count(), "simulation complete");
    Ok(grid)
}

/// Keep the first root cause; `PeerFailed` is only a symptom, so any direct
/// failure displaces it.
fn record_failure(
    slot: &mut Option<(usize, WorkerFailure)>,
    worker: usize,
    failure: WorkerFailure,
) {
    match slot {
        None => *slot = Some((worker, failure)),
        Some((_, WorkerFailure::PeerFailed))
            if !matches!(failure, WorkerFailure::PeerFailed) =>
        {
            *slot = Some((worker, failure));
        }
        Some(_) => {}
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "unknown panic payload".to_owned()
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    use super::*;

    #[test]
    fn validate_rejects_bad_probability() {
        let config = SimConfig {
            size: 8,
            workers: 2,
            generations: 1,
            live_probability: 1.5,
        };
        assert_eq!(
            config.validate(),
            Err(ConfigError::ProbabilityOutOfRange(1.5))
        );
    }

    #[test]
    fn validate_rejects_bad_dimensions() {
        let config = SimConfig {
            size: 4,
            workers: 0,
            generations: 1,
            live_probability: 0.5,
        };
        assert_eq!(config.validate(), Err(ConfigError::ZeroWorkers));
    }

    #[test]
    fn run_rejects_invalid_config_before_spawning() {
        let config = SimConfig {
            size: 4,
            workers: 9,
            generations: 1,
            live_probability: 0.5,
        };
        let mut rng = SmallRng::seed_from_u64(1);
        let err = run(&config, &mut rng).unwrap_err();
        assert!(matches!(
            err,
            EngineError::Configuration(ConfigError::TooManyWorkers { workers: 9, size: 4 })
        ));
    }

    #[test]
    fn empty_universe_stays_empty() {
        let config = SimConfig {
            size: 8,
            workers: 3,
            generations: 5,
            live_probability: 0.0,
        };
        let mut rng = SmallRng::seed_from_u64(2);
        let grid = run(&config, &mut rng).unwrap();
        assert_eq!(grid.live_count(), 0);
    }

    #[test]
    fn record_failure_prefers_root_causes_over_peer_failures() {
        let mut slot = None;
        record_failure(&mut slot, 1, WorkerFailure::PeerFailed);
        record_failure(&mut slot, 2, WorkerFailure::Panicked("boom".into()));
        record_failure(&mut slot, 3, WorkerFailure::PeerFailed);
        assert_eq!(slot, Some((2, WorkerFailure::Panicked("boom".into()))));
    }
}
