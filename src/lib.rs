//! Stable Fluids smoke and fire solver.
//!
//! A fixed N x N grid with a one-cell halo carries velocity, density and
//! temperature. Each [`solver::Solver::step`] applies buoyancy and vorticity
//! confinement, diffuses, projects and advects velocity, then diffuses and
//! advects the scalars and applies per-frame decay.

pub mod config;
pub mod emitter;
pub mod solver;
pub mod state;

pub use solver::{Solver, SolverParams, Stage, StepParams};
pub use state::{FrameSnapshot, Grid, StateError};
