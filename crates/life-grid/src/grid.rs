//! The shared toroidal grid.

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use rand::Rng;

use crate::CellState;

/// A `size x size` toroidal matrix of cell states.
///
/// Cells are stored row-major in a single flat allocation of atomics so that
/// one shared reference supports concurrent reads of the whole grid plus
/// concurrent writes to disjoint row bands. All accesses are `Relaxed`: the
/// engine's barrier separates the read phase of a generation from the write
/// phase, and the barrier's own lock provides the ordering between them.
///
/// Neighbor indexing wraps toroidally, so edge cells see the opposite edge.
pub struct Grid {
    size: usize,
    cells: Box<[AtomicU8]>,
}

impl Grid {
    /// Create an all-dead grid.
    #[must_use]
    pub fn dead(size: usize) -> Self {
        let cells = (0..size * size).map(|_| AtomicU8::new(0)).collect();
        Self { size, cells }
    }

    /// Create a grid where each cell is independently alive with
    /// `live_probability`, drawn from the supplied random source.
    ///
    /// The source is injected rather than seeded globally so initial-state
    /// generation stays deterministic under test.
    #[must_use]
    pub fn random<R: Rng>(size: usize, live_probability: f64, rng: &mut R) -> Self {
        debug_assert!((0.0..=1.0).contains(&live_probability));
        let cells = (0..size * size)
            .map(|_| AtomicU8::new(u8::from(rng.gen_bool(live_probability))))
            .collect();
        Self { size, cells }
    }

    /// Create an all-dead grid with the given cells set alive.
    #[must_use]
    pub fn from_live_cells(size: usize, live: &[(usize, usize)]) -> Self {
        let grid = Self::dead(size);
        for &(row, col) in live {
            grid.set(row, col, CellState::Alive);
        }
        grid
    }

    /// Grid side length.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Read one cell.
    #[must_use]
    pub fn get(&self, row: usize, col: usize) -> CellState {
        CellState::from_raw(self.cells[self.index(row, col)].load(Ordering::Relaxed))
    }

    /// Write one cell.
    ///
    /// Takes `&self`: during a run the one worker owning `row`'s band is the
    /// only writer of this cell, so no lock is involved.
    pub fn set(&self, row: usize, col: usize, state: CellState) {
        self.cells[self.index(row, col)].store(state.to_raw(), Ordering::Relaxed);
    }

    /// Count the live cells among the 8 toroidally wrapped neighbors.
    #[must_use]
    pub fn neighbor_count(&self, row: usize, col: usize) -> u8 {
        let size = self.size;
        let up = (row + size - 1) % size;
        let down = (row + 1) % size;
        let left = (col + size - 1) % size;
        let right = (col + 1) % size;

        let neighbors = [
            (up, left),
            (up, col),
            (up, right),
            (row, left),
            (row, right),
            (down, left),
            (down, col),
            (down, right),
        ];

        let mut count = 0;
        for (r, c) in neighbors {
            if self.get(r, c).is_alive() {
                count += 1;
            }
        }
        count
    }

    /// Row-major iteration over every `(row, col, state)` triple.
    ///
    /// This is the read-only surface a display collaborator consumes; the
    /// engine itself never renders.
    pub fn cells(&self) -> impl Iterator<Item = (usize, usize, CellState)> + '_ {
        (0..self.size)
            .flat_map(move |row| (0..self.size).map(move |col| (row, col, self.get(row, col))))
    }

    /// Number of live cells in the whole grid.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cells
            .iter()
            .filter(|cell| cell.load(Ordering::Relaxed) != 0)
            .count()
    }

    fn index(&self, row: usize, col: usize) -> usize {
        debug_assert!(row < self.size && col < self.size);
        row * self.size + col
    }
}

impl Clone for Grid {
    fn clone(&self) -> Self {
        let cells = self
            .cells
            .iter()
            .map(|cell| AtomicU8::new(cell.load(Ordering::Relaxed)))
            .collect();
        Self {
            size: self.size,
            cells,
        }
    }
}

impl PartialEq for Grid {
    fn eq(&self, other: &Self) -> bool {
        self.size == other.size
            && self
                .cells
                .iter()
                .zip(other.cells.iter())
                .all(|(a, b)| a.load(Ordering::Relaxed) == b.load(Ordering::Relaxed))
    }
}

impl Eq for Grid {}

impl fmt::Debug for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Grid {}x{}", self.size, self.size)?;
        for row in 0..self.size {
            for col in 0..self.size {
                let glyph = if self.get(row, col).is_alive() { '#' } else { '.' };
                write!(f, "{glyph}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
