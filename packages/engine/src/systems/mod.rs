//! Simulation systems.

pub mod physics;
