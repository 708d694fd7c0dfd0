//! Core linear-algebra traits for tridiag-jacobi.

use std::fmt::{Debug, Display, LowerExp};

use num_traits::{Float, FromPrimitive};

/// Floating-point element type the solver runs on (`f32`, `f64`).
pub trait Scalar: Float + FromPrimitive + Send + Sync + Debug + Display + LowerExp + 'static {}

impl<T> Scalar for T where
    T: Float + FromPrimitive + Send + Sync + Debug + Display + LowerExp + 'static
{
}

/// Matrix–vector product: y ← A x.
pub trait MatVec<V> {
    /// Compute y = A · x.
    fn matvec(&self, x: &V, y: &mut V);
}

/// Uniform indexing into operators and vectors.
pub trait Indexing {
    /// Number of rows (or length for a vector).
    fn nrows(&self) -> usize;
}
