//! Solver driver: initialisation, the round loop, and finalisation.

use std::io::Write;
use std::time::{Duration, Instant};

use crate::config::SolverOptions;
use crate::core::traits::Scalar;
use crate::error::RelaxError;
use crate::matrix::Tridiag;
use crate::parallel::{Exec, Executor};
use crate::solver::JacobiSolver;
use crate::store::VectorStore;
use crate::utils::convergence::SolveStats;
use crate::utils::report::{ConvergenceReporter, SamplePolicy};

/// Outcome of a finished run.
#[derive(Debug, Clone)]
pub struct RunSummary<T> {
    pub stats: SolveStats<T>,
    /// Final iterate, moved out of the store before it was released.
    pub solution: Vec<T>,
    pub workers: usize,
    pub elapsed: Duration,
}

pub struct Driver<T> {
    opts: SolverOptions,
    op: Tridiag,
    store: VectorStore<T>,
    solver: JacobiSolver<T, Executor>,
}

impl<T: Scalar> Driver<T> {
    /// Validate the options, build the worker pool and allocate the vectors.
    pub fn new(opts: SolverOptions) -> Result<Self, RelaxError> {
        opts.validate()?;
        let exec = Executor::new(opts.workers)?;
        Self::with_executor(opts, exec)
    }

    /// Same as [`Driver::new`] with a caller-supplied backend; `opts.workers`
    /// is ignored.
    pub fn with_executor(opts: SolverOptions, exec: Executor) -> Result<Self, RelaxError> {
        opts.validate()?;
        let store = VectorStore::new(opts.n)?;
        let mut solver = JacobiSolver::new(exec, opts.max_iters);
        solver.check_finite = opts.check_finite;
        if let Some(tol) = opts.tol {
            let tol = T::from_f64(tol).ok_or_else(|| {
                RelaxError::InvalidOption(format!("tolerance {tol} is not representable"))
            })?;
            solver = solver.with_tol(tol);
        }
        Ok(Self { op: Tridiag::new(opts.n), opts, store, solver })
    }

    pub fn options(&self) -> &SolverOptions {
        &self.opts
    }

    pub fn workers(&self) -> usize {
        self.solver.exec().workers()
    }

    pub fn store(&self) -> &VectorStore<T> {
        &self.store
    }

    /// Run every round, write the report to `out`, then release the vectors.
    /// A driver runs once; a second call fails with `Released`.
    pub fn run<W: Write>(&mut self, out: W) -> Result<RunSummary<T>, RelaxError> {
        let policy = SamplePolicy::new(
            self.opts.max_iters,
            self.opts.report_head,
            self.opts.report_tail,
        );
        let mut reporter = ConvergenceReporter::new(out, policy);
        let workers = self.workers();
        let bufs = self.store.buffers_mut()?;

        tracing::info!(n = self.opts.n, m = self.opts.max_iters, workers, "starting jacobi run");
        reporter.banner(self.opts.n, workers)?;

        let start = Instant::now();
        let stats = self.solver.solve_observed(
            &self.op,
            &bufs.b,
            &mut bufs.x,
            &mut bufs.xnew,
            |norms| {
                reporter.report(norms)?;
                Ok(())
            },
        )?;
        let elapsed = start.elapsed();
        if stats.converged {
            reporter.early_stop(&stats)?;
        }

        reporter.final_window(&bufs.x)?;
        reporter.closing()?;

        let solution = self.store.take_solution()?;
        self.store.release()?;
        tracing::info!(
            iterations = stats.iterations,
            residual = ?stats.final_residual,
            elapsed_ms = elapsed.as_millis() as u64,
            "jacobi run finished"
        );
        Ok(RunSummary { stats, solution, workers, elapsed })
    }
}
