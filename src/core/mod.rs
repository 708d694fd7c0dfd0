//! Core traits shared by the operator, the solver and the dense kernel.

pub mod traits;
pub use traits::{Indexing, MatVec, Scalar};
