//! Implicit tridiagonal operator.
//!
//! `A` has 2 on the main diagonal and -1 on both adjacent diagonals; it is
//! never stored. Rows are evaluated on the fly from the neighbouring entries
//! of a vector, with the missing neighbour at row 0 and row N-1 treated as 0.
//!
//! For the right-hand side `b = (0, …, 0, N+1)` the exact solution is
//! `x* = (1, 2, …, N)`.

use crate::core::traits::{Indexing, MatVec, Scalar};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tridiag {
    n: usize,
}

impl Tridiag {
    pub fn new(n: usize) -> Self {
        Self { n }
    }

    pub fn n(&self) -> usize {
        self.n
    }

    /// x[i-1] + x[i+1], skipping neighbours outside [0, N).
    #[inline]
    pub fn neighbour_sum<T: Scalar>(&self, x: &[T], i: usize) -> T {
        let mut s = T::zero();
        if i > 0 {
            s = s + x[i - 1];
        }
        if i + 1 < self.n {
            s = s + x[i + 1];
        }
        s
    }

    /// Jacobi update of row i: (b[i] + x[i-1] + x[i+1]) / 2.
    #[inline]
    pub fn jacobi_update<T: Scalar>(&self, b: &[T], x: &[T], i: usize) -> T {
        (b[i] + self.neighbour_sum(x, i)) / (T::one() + T::one())
    }

    /// Row i of b − A·x.
    #[inline]
    pub fn residual<T: Scalar>(&self, b: &[T], x: &[T], i: usize) -> T {
        b[i] - (T::one() + T::one()) * x[i] + self.neighbour_sum(x, i)
    }

    /// The standard right-hand side: zeros with `N + 1` in the last slot.
    pub fn rhs_last<T: Scalar>(&self) -> Option<T> {
        T::from_usize(self.n + 1)
    }

    /// x* = (1, 2, …, N), the solution for the standard right-hand side.
    pub fn exact_solution<T: Scalar>(&self) -> Option<Vec<T>> {
        (1..=self.n).map(T::from_usize).collect()
    }
}

impl<T: Scalar> MatVec<Vec<T>> for Tridiag {
    fn matvec(&self, x: &Vec<T>, y: &mut Vec<T>) {
        assert_eq!(self.n, x.len(), "Input vector x has incorrect length");
        assert_eq!(self.n, y.len(), "Output vector y has incorrect length");
        for i in 0..self.n {
            y[i] = (T::one() + T::one()) * x[i] - self.neighbour_sum(x, i);
        }
    }
}

impl Indexing for Tridiag {
    fn nrows(&self) -> usize {
        self.n
    }
}
