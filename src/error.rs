use thiserror::Error;

// Unified error type for tridiag-jacobi

#[derive(Error, Debug)]
pub enum RelaxError {
    #[error("failed to allocate a buffer of {len} elements")]
    Allocation { len: usize },
    #[error("invalid option: {0}")]
    InvalidOption(String),
    #[error("length mismatch: expected {expected}, found {found}")]
    LengthMismatch { expected: usize, found: usize },
    #[error("vector store already released")]
    Released,
    #[error("worker pool error: {0}")]
    ThreadPool(String),
    #[error("report output failed: {0}")]
    Io(#[from] std::io::Error),
}
