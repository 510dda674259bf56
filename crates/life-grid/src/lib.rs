//! Toroidal cell matrix shared by the parallel life engine.
//!
//! One flat allocation holds every cell, so all workers read the same
//! committed generation while each writes only its own row band. The grid
//! performs no synchronization itself; the engine's barrier protocol keeps
//! the read and write phases of a generation apart.

mod cell;
mod grid;

pub use cell::CellState;
pub use grid::Grid;
