//! Matrix module: the implicit tridiagonal operator and the dense product kernel.

pub mod tridiag;
pub use tridiag::Tridiag;
pub mod dense;
pub use dense::{hartley_matrix, matmul};
