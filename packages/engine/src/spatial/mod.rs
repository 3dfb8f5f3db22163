//! Spatial indexing used by the broad phase.

pub mod grid;

pub use grid::{SpatialGrid, DEFAULT_CELL_SIZE};
