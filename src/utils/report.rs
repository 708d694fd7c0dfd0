//! Text report of a Jacobi run.
//!
//! The reporter is called once per round by the driver after the round's
//! workers have joined, so it only ever sees finished norms. Output goes to
//! any `io::Write` sink; the binary passes a locked stdout, tests pass a
//! `Vec<u8>`.

use std::io::{self, Write};

use crate::core::traits::Scalar;
use crate::utils::convergence::{RoundNorms, SolveStats};

/// Indices printed at each end of the final iterate.
pub const HEAD_WINDOW: usize = 10;
pub const TAIL_WINDOW: usize = 11;

const PROGRAM: &str = "TJACOBI";

/// Which rounds get a line: `it < head` or `it > max_iters - tail`.
/// With the default 10/10 and M = 5000 that is rounds 0..=9 and 4991..=4999.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SamplePolicy {
    pub head: usize,
    pub tail: usize,
    pub max_iters: usize,
}

impl SamplePolicy {
    pub fn new(max_iters: usize, head: usize, tail: usize) -> Self {
        Self { head, tail, max_iters }
    }

    pub fn reports(&self, it: usize) -> bool {
        it < self.head || it + self.tail > self.max_iters
    }

    /// The round after which intermediate lines are omitted.
    pub fn notice_at(&self, it: usize) -> bool {
        self.head > 0 && it + 1 == self.head
    }
}

pub struct ConvergenceReporter<W> {
    out: W,
    policy: SamplePolicy,
    notice_emitted: bool,
}

impl<W: Write> ConvergenceReporter<W> {
    pub fn new(out: W, policy: SamplePolicy) -> Self {
        Self { out, policy, notice_emitted: false }
    }

    pub fn policy(&self) -> &SamplePolicy {
        &self.policy
    }

    pub fn banner(&mut self, n: usize, workers: usize) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{PROGRAM}:")?;
        writeln!(self.out, "  Rust version, {workers} worker(s)")?;
        writeln!(self.out, "  Jacobi iteration to solve A*x=b.")?;
        writeln!(self.out)?;
        writeln!(self.out, "  Number of variables  N = {n}")?;
        writeln!(self.out, "  Number of iterations M = {}", self.policy.max_iters)?;
        writeln!(self.out)?;
        writeln!(self.out, "  IT     l2(dX)    l2(resid)")?;
        writeln!(self.out)
    }

    /// One round. Prints `it, √d, √r` when sampled, plus the omission notice once.
    pub fn report<T: Scalar>(&mut self, norms: &RoundNorms<T>) -> io::Result<()> {
        if self.policy.reports(norms.it) {
            writeln!(
                self.out,
                "  {:>8}  {:>14.6e}  {:>14.6e}",
                norms.it,
                norms.delta_norm(),
                norms.residual_norm()
            )?;
        }
        if !self.notice_emitted && self.policy.notice_at(norms.it) {
            writeln!(self.out, "  Omitting intermediate results.")?;
            self.notice_emitted = true;
        }
        Ok(())
    }

    /// Note that a residual tolerance ended the run before the budget.
    pub fn early_stop<T: Scalar>(&mut self, stats: &SolveStats<T>) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(
            self.out,
            "  Residual tolerance met after {} rounds, l2(resid) = {:.6e}",
            stats.iterations, stats.final_residual
        )
    }

    /// Indices [0, 10) and [N-11, N) of the final iterate, or all of it when
    /// the two windows would overlap.
    pub fn final_window<T: Scalar>(&mut self, x: &[T]) -> io::Result<()> {
        let n = x.len();
        writeln!(self.out)?;
        writeln!(self.out, "  Part of final solution estimate:")?;
        writeln!(self.out)?;
        let tail_start = n.saturating_sub(TAIL_WINDOW);
        if tail_start <= HEAD_WINDOW {
            for (i, xi) in x.iter().enumerate() {
                self.value_line(i, *xi)?;
            }
            return Ok(());
        }
        for (i, xi) in x.iter().enumerate().take(HEAD_WINDOW) {
            self.value_line(i, *xi)?;
        }
        writeln!(self.out, "...")?;
        for (i, xi) in x.iter().enumerate().skip(tail_start) {
            self.value_line(i, *xi)?;
        }
        Ok(())
    }

    pub fn closing(&mut self) -> io::Result<()> {
        writeln!(self.out)?;
        writeln!(self.out, "{PROGRAM}:")?;
        writeln!(self.out, "  Normal end of execution.")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn value_line<T: Scalar>(&mut self, i: usize, v: T) -> io::Result<()> {
        writeln!(self.out, "  {:>8}  {:>14.6}", i, v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report_lines(m: usize) -> String {
        let mut rep = ConvergenceReporter::new(Vec::new(), SamplePolicy::new(m, 10, 10));
        for it in 0..m {
            rep.report(&RoundNorms { it, d: 1.0f64, r: 4.0 }).unwrap();
        }
        String::from_utf8(rep.into_inner()).unwrap()
    }

    fn reported_rounds(text: &str) -> Vec<usize> {
        text.lines()
            .filter_map(|l| l.split_whitespace().next())
            .filter_map(|tok| tok.parse().ok())
            .collect()
    }

    #[test]
    fn samples_head_and_tail() {
        let text = report_lines(5000);
        let rounds = reported_rounds(&text);
        let expected: Vec<usize> = (0..10).chain(4991..5000).collect();
        assert_eq!(rounds, expected);
        assert_eq!(text.matches("Omitting intermediate results.").count(), 1);
    }

    #[test]
    fn first_tail_round_is_m_minus_nine() {
        let policy = SamplePolicy::new(5000, 10, 10);
        assert!(!policy.reports(4990));
        assert!(policy.reports(4991));
        assert!(policy.reports(4999));
        assert!(policy.reports(9));
        assert!(!policy.reports(10));
    }

    #[test]
    fn notice_follows_round_nine() {
        let text = report_lines(100);
        let lines: Vec<&str> = text.lines().collect();
        let pos = lines.iter().position(|l| l.contains("Omitting")).unwrap();
        assert_eq!(lines[pos - 1].split_whitespace().next(), Some("9"));
    }

    #[test]
    fn short_runs_report_every_round() {
        let rounds = reported_rounds(&report_lines(15));
        assert_eq!(rounds, (0..15).collect::<Vec<_>>());
    }

    #[test]
    fn line_carries_square_roots() {
        let text = report_lines(1);
        assert!(text.contains("1.000000e0"));
        assert!(text.contains("2.000000e0"));
    }

    #[test]
    fn early_stop_line() {
        let stats = SolveStats {
            iterations: 42,
            final_delta: 0.0f64,
            final_residual: 1e-7,
            converged: true,
        };
        let mut rep = ConvergenceReporter::new(Vec::new(), SamplePolicy::new(100, 10, 10));
        rep.early_stop(&stats).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert!(text.contains("after 42 rounds"));
        assert!(text.contains("1.000000e-7"));
    }

    #[test]
    fn final_window_skips_middle() {
        let x: Vec<f64> = (1..=50).map(|v| v as f64).collect();
        let mut rep = ConvergenceReporter::new(Vec::new(), SamplePolicy::new(1, 10, 10));
        rep.final_window(&x).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        let idx = reported_rounds(&text);
        let expected: Vec<usize> = (0..10).chain(39..50).collect();
        assert_eq!(idx, expected);
        assert!(text.contains("..."));
    }

    #[test]
    fn final_window_prints_small_vectors_once() {
        let x = vec![1.0f64; 10];
        let mut rep = ConvergenceReporter::new(Vec::new(), SamplePolicy::new(1, 10, 10));
        rep.final_window(&x).unwrap();
        let text = String::from_utf8(rep.into_inner()).unwrap();
        assert_eq!(reported_rounds(&text), (0..10).collect::<Vec<_>>());
        assert!(!text.contains("..."));
    }
}
