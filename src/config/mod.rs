//! Configuration: runtime options for the solver driver.

pub mod options;
pub use options::SolverOptions;
