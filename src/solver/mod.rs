//! Solver interfaces.

use crate::utils::convergence::SolveStats;

/// Common interface for a linear solver.
pub trait LinearSolver<M, V> {
    type Error;
    type Scalar;
    /// Solve A·x = b, writing result into `x`.
    /// Returns iteration stats (including convergence info).
    fn solve(
        &mut self,
        a: &M,
        b: &V,
        x: &mut V,
    ) -> Result<SolveStats<Self::Scalar>, Self::Error>;
}

pub mod jacobi;
pub use jacobi::JacobiSolver;
