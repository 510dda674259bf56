//! Per-band worker loop.

use std::sync::Arc;

use life_grid::{CellState, Grid};
use tracing::trace;

use crate::barrier::Barrier;
use crate::error::WorkerFailure;
use crate::partition::Band;

/// One worker: owns a row band for writes, shares the grid and barrier.
pub(crate) struct Worker {
    index: usize,
    band: Band,
    generations: u64,
    grid: Arc<Grid>,
    barrier: Arc<Barrier>,
}

impl Worker {
    pub(crate) fn new(
        index: usize,
        band: Band,
        generations: u64,
        grid: Arc<Grid>,
        barrier: Arc<Barrier>,
    ) -> Self {
        Self {
            index,
            band,
            generations,
            grid,
            barrier,
        }
    }

    /// Run the full generation loop for this worker's band.
    ///
    /// Per generation: compute the band's next state into a private scratch
    /// buffer reading only committed cells, rendezvous, commit the scratch
    /// into the shared grid, rendezvous again. The first barrier keeps any
    /// write from overlapping a peer's read of the current generation; the
    /// second keeps any generation-`g+1` read from overlapping a peer's
    /// still-outstanding generation-`g` commit.
    pub(crate) fn run(&self) -> Result<(), WorkerFailure> {
        let size = self.grid.size();
        if self.band.is_empty() || self.band.end > size {
            return Err(WorkerFailure::BandOutOfRange {
                band: self.band,
                size,
            });
        }

        let mut scratch = vec![CellState::Dead; self.band.len() * size];
        for generation in 0..self.generations {
            for (offset, row) in self.band.rows().enumerate() {
                for col in 0..size {
                    let live_neighbors = self.grid.neighbor_count(row, col);
                    scratch[offset * size + col] =
                        next_state(self.grid.get(row, col), live_neighbors);
                }
            }

            // All workers have finished reading generation `g`.
            self.barrier.wait()?;

            for (offset, row) in self.band.rows().enumerate() {
                for col in 0..size {
                    self.grid.set(row, col, scratch[offset * size + col]);
                }
            }

            // All workers have committed generation `g + 1`.
            self.barrier.wait()?;
            trace!(worker = self.index, generation, "generation committed");
        }
        Ok(())
    }
}

/// The standard rule set: a live cell with 2 or 3 live neighbors survives, a
/// dead cell with exactly 3 becomes alive, everything else is dead.
pub(crate) fn next_state(current: CellState, live_neighbors: u8) -> CellState {
    match (current, live_neighbors) {
        (CellState::Alive, 2 | 3) => CellState::Alive,
        (CellState::Dead, 3) => CellState::Alive,
        _ => CellState::Dead,
    }
}
