//! Shared-memory execution backends.
//!
//! Every primitive here is a fork/join: it returns only after each task it
//! spawned has finished, so consecutive calls are separated by a full barrier.
//! Index ranges are split statically into one contiguous chunk per worker.

use std::ops::Range;

use crate::error::RelaxError;

pub trait Exec {
    /// Number of workers the index ranges are split across.
    fn workers(&self) -> usize;

    /// Run one round body inside the worker pool. Everything spawned by the
    /// body has joined by the time this returns.
    fn in_round<R, F>(&self, body: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send;

    /// `out[i] = f(i)` for every index. Writes are disjoint per index.
    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send;

    /// Hand each `row_len`-long row of `out` to `f(row, slice)`.
    fn parallel_for_rows<T, F>(&self, out: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send;

    /// Sum-like reduction: every worker folds its chunk privately, then the
    /// partials are combined. Combine order is unspecified, so floating-point
    /// results agree across worker counts only up to rounding.
    fn parallel_reduce<A, M, C>(&self, range: Range<usize>, identity: A, map: M, combine: C) -> A
    where
        A: Copy + Send + Sync,
        M: Fn(usize) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send;
}

/// Contiguous chunk length splitting `len` indices across `parts` workers.
pub fn chunk_len(len: usize, parts: usize) -> usize {
    len.div_ceil(parts.max(1)).max(1)
}

pub mod serial;
pub use serial::SerialExec;

#[cfg(feature = "rayon")]
pub mod rayon_exec;
#[cfg(feature = "rayon")]
pub use rayon_exec::RayonExec;

/// Backend picked at runtime from the options and enabled features.
pub enum Executor {
    Serial(SerialExec),
    #[cfg(feature = "rayon")]
    Rayon(RayonExec),
}

impl Executor {
    /// Build a pool with `workers` threads, or one per hardware thread.
    pub fn new(workers: Option<usize>) -> Result<Self, RelaxError> {
        if workers == Some(0) {
            return Err(RelaxError::InvalidOption("worker count must be positive".into()));
        }
        #[cfg(feature = "rayon")]
        {
            let exec = match workers {
                Some(w) => RayonExec::with_workers(w)?,
                None => RayonExec::new()?,
            };
            Ok(Executor::Rayon(exec))
        }
        #[cfg(not(feature = "rayon"))]
        {
            if workers.is_some_and(|w| w > 1) {
                tracing::warn!("built without the `rayon` feature; running on one worker");
            }
            Ok(Executor::Serial(SerialExec))
        }
    }

    pub fn serial() -> Self {
        Executor::Serial(SerialExec)
    }
}

impl Exec for Executor {
    fn workers(&self) -> usize {
        match self {
            Executor::Serial(e) => e.workers(),
            #[cfg(feature = "rayon")]
            Executor::Rayon(e) => e.workers(),
        }
    }

    fn in_round<R, F>(&self, body: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        match self {
            Executor::Serial(e) => e.in_round(body),
            #[cfg(feature = "rayon")]
            Executor::Rayon(e) => e.in_round(body),
        }
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        match self {
            Executor::Serial(e) => e.parallel_for(out, f),
            #[cfg(feature = "rayon")]
            Executor::Rayon(e) => e.parallel_for(out, f),
        }
    }

    fn parallel_for_rows<T, F>(&self, out: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        match self {
            Executor::Serial(e) => e.parallel_for_rows(out, row_len, f),
            #[cfg(feature = "rayon")]
            Executor::Rayon(e) => e.parallel_for_rows(out, row_len, f),
        }
    }

    fn parallel_reduce<A, M, C>(&self, range: Range<usize>, identity: A, map: M, combine: C) -> A
    where
        A: Copy + Send + Sync,
        M: Fn(usize) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        match self {
            Executor::Serial(e) => e.parallel_reduce(range, identity, map, combine),
            #[cfg(feature = "rayon")]
            Executor::Rayon(e) => e.parallel_reduce(range, identity, map, combine),
        }
    }
}
