//! Convergence bookkeeping and text reporting.

pub mod convergence;
pub use convergence::{Convergence, RoundNorms, SolveStats};
pub mod report;
pub use report::{ConvergenceReporter, SamplePolicy};
