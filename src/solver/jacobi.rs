//! Jacobi relaxation on the implicit tridiagonal operator.
//!
//! One round is five lock-step phases, each a fork/join over the index range:
//!
//! 1. stencil: `xnew[i] = (b[i] + x[i-1] + x[i+1]) / 2` from the round-start `x`
//! 2. delta: `d = Σ (x[i] − xnew[i])²`, still against the round-start `x`
//! 3. overwrite: `x ← xnew`
//! 4. residual: `r = Σ (b − A·x)[i]²` against the overwritten `x`
//! 5. report (serial, in the caller, after the round has joined)
//!
//! Phases 1 and 3 write disjoint slots per index. Phases 2 and 4 reduce
//! per-worker partial sums, so `d` and `r` are reproducible only up to
//! floating-point rounding when the worker count changes. Rounds never
//! overlap: round `it + 1` starts only after `in_round` for `it` returned.

use crate::core::traits::{Indexing, Scalar};
use crate::error::RelaxError;
use crate::matrix::Tridiag;
use crate::parallel::Exec;
use crate::solver::LinearSolver;
use crate::store::try_filled;
use crate::utils::convergence::{Convergence, RoundNorms, SolveStats};

pub struct JacobiSolver<T, E> {
    pub conv: Convergence<T>,
    pub check_finite: bool,
    exec: E,
}

impl<T: Scalar, E: Exec + Sync> JacobiSolver<T, E> {
    /// Fixed-count solver: exactly `max_iters` rounds.
    pub fn new(exec: E, max_iters: usize) -> Self {
        Self { conv: Convergence::fixed(max_iters), check_finite: true, exec }
    }

    /// Stop early once ‖b − A·x‖₂ ≤ `tol`.
    pub fn with_tol(mut self, tol: T) -> Self {
        self.conv.tol = Some(tol);
        self
    }

    pub fn exec(&self) -> &E {
        &self.exec
    }

    /// Run one round at iteration `it`, leaving the new iterate in `x`.
    pub fn round(
        &self,
        a: &Tridiag,
        b: &[T],
        x: &mut [T],
        xnew: &mut [T],
        it: usize,
    ) -> Result<RoundNorms<T>, RelaxError> {
        check_lengths(a, b, x, xnew)?;
        Ok(self.round_unchecked(a, b, x, xnew, it))
    }

    fn round_unchecked(
        &self,
        a: &Tridiag,
        b: &[T],
        x: &mut [T],
        xnew: &mut [T],
        it: usize,
    ) -> RoundNorms<T> {
        let exec = &self.exec;
        let n = a.n();
        exec.in_round(|| {
            {
                let x: &[T] = x;
                exec.parallel_for(xnew, |i| a.jacobi_update(b, x, i));
            }
            let xnew: &[T] = xnew;
            let d = {
                let x: &[T] = x;
                exec.parallel_reduce(
                    0..n,
                    T::zero(),
                    |i| {
                        let t = x[i] - xnew[i];
                        t * t
                    },
                    |p, q| p + q,
                )
            };
            exec.parallel_for(x, |i| xnew[i]);
            let x: &[T] = x;
            let r = exec.parallel_reduce(
                0..n,
                T::zero(),
                |i| {
                    let t = a.residual(b, x, i);
                    t * t
                },
                |p, q| p + q,
            );
            RoundNorms { it, d, r }
        })
    }

    /// Run the rounds, handing every round's norms to `observe` before the
    /// next round starts. `xnew` is scratch space of the same length.
    pub fn solve_observed<O>(
        &self,
        a: &Tridiag,
        b: &[T],
        x: &mut [T],
        xnew: &mut [T],
        mut observe: O,
    ) -> Result<SolveStats<T>, RelaxError>
    where
        O: FnMut(&RoundNorms<T>) -> Result<(), RelaxError>,
    {
        check_lengths(a, b, x, xnew)?;
        let n = a.nrows();
        let _span = tracing::debug_span!(
            "jacobi_solve",
            n,
            m = self.conv.max_iters,
            workers = self.exec.workers()
        )
        .entered();

        let mut stats = SolveStats {
            iterations: 0,
            final_delta: T::zero(),
            final_residual: T::zero(),
            converged: false,
        };
        for it in 0..self.conv.max_iters {
            let norms = self.round_unchecked(a, b, x, xnew, it);
            tracing::trace!(it, d = ?norms.d, r = ?norms.r, "round done");
            if self.check_finite && !norms.is_finite() {
                tracing::warn!(it, d = ?norms.d, r = ?norms.r, "non-finite norm");
            }
            observe(&norms)?;
            let (stop, s) = self.conv.check(&norms);
            stats = s;
            if stop {
                break;
            }
        }
        if stats.converged {
            tracing::debug!(iterations = stats.iterations, "residual tolerance met");
        }
        Ok(stats)
    }
}

fn check_lengths<T>(a: &Tridiag, b: &[T], x: &[T], xnew: &[T]) -> Result<(), RelaxError> {
    let n = a.nrows();
    for len in [b.len(), x.len(), xnew.len()] {
        if len != n {
            return Err(RelaxError::LengthMismatch { expected: n, found: len });
        }
    }
    Ok(())
}

impl<T: Scalar, E: Exec + Sync> LinearSolver<Tridiag, Vec<T>> for JacobiSolver<T, E> {
    type Error = RelaxError;
    type Scalar = T;

    fn solve(
        &mut self,
        a: &Tridiag,
        b: &Vec<T>,
        x: &mut Vec<T>,
    ) -> Result<SolveStats<T>, RelaxError> {
        let mut xnew = try_filled(a.n(), T::zero())?;
        self.solve_observed(a, b, x, &mut xnew, |_| Ok(()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::traits::MatVec;
    use crate::parallel::SerialExec;
    use approx::assert_abs_diff_eq;
    use std::io;
    use std::sync::{Arc, Mutex};

    fn standard_rhs(n: usize) -> Vec<f64> {
        let mut b = vec![0.0; n];
        b[n - 1] = (n + 1) as f64;
        b
    }

    #[test]
    fn first_round_from_zero() {
        let n = 4;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut xnew = vec![0.0; n];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 1);
        let norms = solver.round(&a, &b, &mut x, &mut xnew, 0).unwrap();
        assert_eq!(x, vec![0.0, 0.0, 0.0, 2.5]);
        assert_abs_diff_eq!(norms.d, 6.25);
        // t = b - A x = [0, 0, 2.5, 5 - 5] → r = 6.25
        assert_abs_diff_eq!(norms.r, 6.25);
    }

    #[test]
    fn uses_round_start_snapshot() {
        // Gauss-Seidel would propagate x[3] into x[2] within a sweep.
        let n = 4;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut xnew = vec![0.0; n];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 2);
        solver.solve_observed(&a, &b, &mut x, &mut xnew, |_| Ok(())).unwrap();
        assert_eq!(x, vec![0.0, 0.0, 1.25, 2.5]);
    }

    #[test]
    fn exact_solution_stays_put() {
        let n = 25;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x: Vec<f64> = a.exact_solution().unwrap();
        let mut xnew = vec![0.0; n];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 3);
        let stats = solver.solve_observed(&a, &b, &mut x, &mut xnew, |_| Ok(())).unwrap();
        for (i, xi) in x.iter().enumerate() {
            assert_abs_diff_eq!(*xi, (i + 1) as f64, epsilon = 1e-12);
        }
        assert_abs_diff_eq!(stats.final_delta, 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(stats.final_residual, 0.0, epsilon = 1e-12);
    }

    #[test]
    fn residual_matches_matvec() {
        let n = 12;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut solver = JacobiSolver::<f64, _>::new(SerialExec, 30);
        let stats = solver.solve(&a, &b, &mut x).unwrap();
        let mut ax = vec![0.0; n];
        a.matvec(&x, &mut ax);
        let res = ax.iter().zip(&b).map(|(axi, bi)| (bi - axi) * (bi - axi)).sum::<f64>().sqrt();
        assert_abs_diff_eq!(stats.final_residual, res, epsilon = 1e-12);
        assert_eq!(stats.iterations, 30);
        assert!(!stats.converged);
    }

    #[test]
    fn observer_sees_every_round_in_order() {
        let n = 8;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut xnew = vec![0.0; n];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 17);
        let mut seen = Vec::new();
        solver
            .solve_observed(&a, &b, &mut x, &mut xnew, |norms| {
                seen.push(norms.it);
                Ok(())
            })
            .unwrap();
        assert_eq!(seen, (0..17).collect::<Vec<_>>());
    }

    #[test]
    fn observer_error_stops_the_run() {
        let n = 8;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut xnew = vec![0.0; n];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 10);
        let mut calls = 0;
        let res = solver.solve_observed(&a, &b, &mut x, &mut xnew, |norms| {
            calls += 1;
            if norms.it == 2 {
                Err(RelaxError::Released)
            } else {
                Ok(())
            }
        });
        assert!(matches!(res, Err(RelaxError::Released)));
        assert_eq!(calls, 3);
    }

    #[test]
    fn tolerance_cuts_the_run_short() {
        let n = 10;
        let a = Tridiag::new(n);
        let b = standard_rhs(n);
        let mut x = vec![0.0; n];
        let mut solver = JacobiSolver::<f64, _>::new(SerialExec, 10_000).with_tol(1e-6);
        let stats = solver.solve(&a, &b, &mut x).unwrap();
        assert!(stats.converged);
        assert!(stats.iterations < 10_000);
        assert!(stats.final_residual <= 1e-6);
    }

    #[test]
    fn single_round_rejects_short_scratch() {
        let a = Tridiag::new(5);
        let b = standard_rhs(5);
        let mut x = vec![0.0; 5];
        let mut xnew = vec![0.0; 3];
        let solver = JacobiSolver::<f64, _>::new(SerialExec, 1);
        assert!(matches!(
            solver.round(&a, &b, &mut x, &mut xnew, 0),
            Err(RelaxError::LengthMismatch { expected: 5, found: 3 })
        ));
        assert_eq!(x, vec![0.0; 5]);
    }

    /// Writer handed to the fmt subscriber so tests can read the log.
    #[derive(Clone, Default)]
    struct LogBuf(Arc<Mutex<Vec<u8>>>);

    impl io::Write for LogBuf {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn solve_with_nan(check_finite: bool) -> (Result<SolveStats<f64>, RelaxError>, usize, String) {
        let n = 4;
        let a = Tridiag::new(n);
        let b = vec![f64::NAN, 0.0, 0.0, 5.0];
        let mut x = vec![0.0; n];
        let mut xnew = vec![0.0; n];
        let mut solver = JacobiSolver::<f64, _>::new(SerialExec, 7);
        solver.check_finite = check_finite;

        let logs = LogBuf::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .finish();
        let mut rounds = 0;
        let res = tracing::subscriber::with_default(subscriber, || {
            solver.solve_observed(&a, &b, &mut x, &mut xnew, |_| {
                rounds += 1;
                Ok(())
            })
        });
        let text = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        (res, rounds, text)
    }

    #[test]
    fn non_finite_norms_warn_but_run_every_round() {
        let (res, rounds, text) = solve_with_nan(true);
        let stats = res.unwrap();
        assert_eq!(rounds, 7);
        assert_eq!(stats.iterations, 7);
        assert!(stats.final_residual.is_nan());
        assert_eq!(text.matches("non-finite norm").count(), 7);
        assert!(text.contains("WARN"));
    }

    #[test]
    fn non_finite_guard_can_be_disabled() {
        let (res, rounds, text) = solve_with_nan(false);
        assert_eq!(res.unwrap().iterations, 7);
        assert_eq!(rounds, 7);
        assert!(!text.contains("non-finite norm"));
    }

    #[test]
    fn rejects_mismatched_lengths() {
        let a = Tridiag::new(5);
        let b = vec![0.0; 4];
        let mut x = vec![0.0; 5];
        let mut solver = JacobiSolver::<f64, _>::new(SerialExec, 1);
        assert!(matches!(
            solver.solve(&a, &b, &mut x),
            Err(RelaxError::LengthMismatch { expected: 5, found: 4 })
        ));
    }
}
