//! Runtime options for the Jacobi driver.
//!
//! This module provides the `SolverOptions` struct, which collects the
//! problem size, the iteration budget and the worker count, together with
//! the reporting windows and the optional extensions (tolerance-based early
//! stop, non-finite norm guard). Every field has a default matching the
//! classic fixed-count run: N = 50000, M = 5000, all hardware threads.

use crate::error::RelaxError;

/// Default number of unknowns.
pub const DEFAULT_N: usize = 50_000;
/// Default iteration budget.
pub const DEFAULT_MAX_ITERS: usize = 5_000;

/// Problem size, iteration budget & parallelism.
#[derive(Debug, Clone, PartialEq)]
pub struct SolverOptions {
    /// Number of unknowns N.
    pub n: usize,

    /// Number of relaxation rounds M.
    pub max_iters: usize,

    /// Worker count; `None` uses the detected hardware concurrency.
    pub workers: Option<usize>,

    /// Rounds always reported at the start of the run.
    pub report_head: usize,

    /// Rounds always reported at the end of the run.
    pub report_tail: usize,

    /// Stop once ‖b − A·x‖₂ drops below this value. `None` keeps the fixed count.
    pub tol: Option<f64>,

    /// Log a warning when a round produces a non-finite norm.
    pub check_finite: bool,
}

impl Default for SolverOptions {
    fn default() -> Self {
        Self {
            n: DEFAULT_N,
            max_iters: DEFAULT_MAX_ITERS,
            workers: None,
            report_head: 10,
            report_tail: 10,
            tol: None,
            check_finite: true,
        }
    }
}

impl SolverOptions {
    pub fn new(n: usize, max_iters: usize) -> Self {
        Self { n, max_iters, ..Self::default() }
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = Some(workers);
        self
    }

    pub fn with_tol(mut self, tol: f64) -> Self {
        self.tol = Some(tol);
        self
    }

    pub fn with_report_window(mut self, head: usize, tail: usize) -> Self {
        self.report_head = head;
        self.report_tail = tail;
        self
    }

    pub fn with_check_finite(mut self, check: bool) -> Self {
        self.check_finite = check;
        self
    }

    /// Reject sizes the driver cannot run.
    pub fn validate(&self) -> Result<(), RelaxError> {
        if self.n == 0 {
            return Err(RelaxError::InvalidOption("problem size N must be positive".into()));
        }
        if self.max_iters == 0 {
            return Err(RelaxError::InvalidOption("iteration count M must be positive".into()));
        }
        if self.workers == Some(0) {
            return Err(RelaxError::InvalidOption("worker count must be positive".into()));
        }
        if let Some(tol) = self.tol {
            if !(tol.is_finite() && tol > 0.0) {
                return Err(RelaxError::InvalidOption(format!(
                    "tolerance must be positive and finite, got {tol}"
                )));
            }
        }
        Ok(())
    }
}
