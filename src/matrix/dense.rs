//! Dense matrix product on top of Faer.
//!
//! This module provides `matmul`, a row-parallel C = A·B for `faer::Mat<T>`
//! that runs on the same execution backends as the Jacobi rounds, and
//! `hartley_matrix`, the classic timing input for it.

use faer::Mat;

use crate::core::traits::Scalar;
use crate::error::RelaxError;
use crate::parallel::Exec;
use crate::store::try_filled;

/// C = A · B, one output row per task. Rows are written to disjoint slices of
/// a row-major scratch buffer, so no locking or reduction is involved.
pub fn matmul<T, E>(exec: &E, a: &Mat<T>, b: &Mat<T>) -> Result<Mat<T>, RelaxError>
where
    T: Scalar,
    E: Exec,
{
    if a.ncols() != b.nrows() {
        return Err(RelaxError::LengthMismatch { expected: a.ncols(), found: b.nrows() });
    }
    let (m, k, p) = (a.nrows(), a.ncols(), b.ncols());
    let len = m.checked_mul(p).ok_or(RelaxError::Allocation { len: usize::MAX })?;
    let mut rows = try_filled(len, T::zero())?;
    exec.parallel_for_rows(&mut rows, p, |i, row| {
        for (j, c) in row.iter_mut().enumerate() {
            *c = (0..k).fold(T::zero(), |acc, l| acc + a[(i, l)] * b[(l, j)]);
        }
    });
    Ok(Mat::from_fn(m, p, |i, j| rows[i * p + j]))
}

/// A[i][j] = (sin θ + cos θ) / √n with θ = 2π·i·j / n.
///
/// This is the normalised discrete Hartley matrix, which is its own inverse,
/// so `matmul(A, A)` should return the identity up to rounding.
pub fn hartley_matrix(n: usize) -> Mat<f64> {
    let s = 1.0 / (n as f64).sqrt();
    Mat::from_fn(n, n, |i, j| {
        let angle = 2.0 * std::f64::consts::PI * (i * j) as f64 / n as f64;
        s * (angle.sin() + angle.cos())
    })
}
