//! Driver context for a complete Jacobi run.
//!
//! The [`Driver`] owns everything a run needs: the options, the execution
//! backend and the vector store. It walks the run through
//! `Init → Round(0) → … → Round(M-1) → Finalize`, reporting each round as it
//! completes.
//!
//! # Example
//! ```rust,no_run
//! use tridiag_jacobi::{Driver, SolverOptions};
//! let mut driver = Driver::<f64>::new(SolverOptions::new(1000, 200))?;
//! let summary = driver.run(std::io::stdout().lock())?;
//! println!("final residual {}", summary.stats.final_residual);
//! # Ok::<(), tridiag_jacobi::RelaxError>(())
//! ```

pub mod driver;
pub use driver::{Driver, RunSummary};
