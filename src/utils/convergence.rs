//! Per-round norms, run statistics & the optional tolerance check.

use crate::core::traits::Scalar;

/// Stopping rule: always `max_iters` rounds, unless a tolerance is set and
/// the residual norm falls to it first.
#[derive(Clone, Debug)]
pub struct Convergence<T> {
    pub tol: Option<T>,
    pub max_iters: usize,
}

/// Squared norms produced by one round.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RoundNorms<T> {
    pub it: usize,
    /// ‖xnew − x‖², taken before the overwrite.
    pub d: T,
    /// ‖b − A·x‖², taken after the overwrite.
    pub r: T,
}

impl<T: Scalar> RoundNorms<T> {
    pub fn delta_norm(&self) -> T {
        self.d.sqrt()
    }

    pub fn residual_norm(&self) -> T {
        self.r.sqrt()
    }

    pub fn is_finite(&self) -> bool {
        self.d.is_finite() && self.r.is_finite()
    }
}

#[derive(Clone, Debug)]
pub struct SolveStats<T> {
    pub iterations: usize,
    pub final_delta: T,
    pub final_residual: T,
    /// True only when a tolerance was set and met.
    pub converged: bool,
}

impl<T: Scalar> Convergence<T> {
    pub fn fixed(max_iters: usize) -> Self {
        Self { tol: None, max_iters }
    }

    /// Returns (should_stop, stats) after the round described by `norms`.
    pub fn check(&self, norms: &RoundNorms<T>) -> (bool, SolveStats<T>) {
        let res = norms.residual_norm();
        let converged = self.tol.is_some_and(|tol| res <= tol);
        let iterations = norms.it + 1;
        (
            converged || iterations >= self.max_iters,
            SolveStats {
                iterations,
                final_delta: norms.delta_norm(),
                final_residual: res,
                converged,
            },
        )
    }
}
