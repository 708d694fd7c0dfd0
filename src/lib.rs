//! tridiag-jacobi: fixed-count Jacobi relaxation over an implicit tridiagonal operator
//!
//! This crate solves A·x = b for the (-1, 2, -1) tridiagonal operator without
//! ever storing A. Each round is a lock-step sequence of data-parallel sweeps
//! (stencil update, delta reduction, overwrite, residual reduction) run on a
//! bounded pool of shared-memory workers, followed by a serial report.

pub mod parallel;

pub mod config;
pub mod context;
pub mod core;
pub mod error;
pub mod matrix;
pub mod solver;
pub mod store;
pub mod utils;

// Re-exports for convenience
pub use config::*;
pub use context::*;
pub use crate::core::*;
pub use error::*;
pub use matrix::*;
pub use parallel::{Exec, Executor};
pub use solver::*;
pub use store::{Buffers, VectorStore};
pub use utils::*;
