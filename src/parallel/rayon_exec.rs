// rayon-based parallel execution

use std::ops::Range;

use rayon::prelude::*;

use super::chunk_len;
use crate::error::RelaxError;

/// Dedicated rayon pool. Owning the pool (instead of configuring the global
/// one) lets pools of different sizes live side by side in one process.
pub struct RayonExec {
    pool: rayon::ThreadPool,
}

impl RayonExec {
    /// One worker per logical CPU.
    pub fn new() -> Result<Self, RelaxError> {
        Self::with_workers(num_cpus::get())
    }

    pub fn with_workers(workers: usize) -> Result<Self, RelaxError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(workers)
            .thread_name(|i| format!("jacobi-worker-{i}"))
            .build()
            .map_err(|e| RelaxError::ThreadPool(e.to_string()))?;
        Ok(RayonExec { pool })
    }
}

impl super::Exec for RayonExec {
    fn workers(&self) -> usize {
        self.pool.current_num_threads()
    }

    fn in_round<R, F>(&self, body: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        self.pool.install(body)
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        let chunk = chunk_len(out.len(), self.workers());
        self.pool.install(|| {
            out.par_chunks_mut(chunk).enumerate().for_each(|(c, part)| {
                let base = c * chunk;
                for (j, o) in part.iter_mut().enumerate() {
                    *o = f(base + j);
                }
            });
        });
    }

    fn parallel_for_rows<T, F>(&self, out: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        if row_len == 0 {
            return;
        }
        self.pool.install(|| {
            out.par_chunks_mut(row_len).enumerate().for_each(|(r, row)| f(r, row));
        });
    }

    fn parallel_reduce<A, M, C>(&self, range: Range<usize>, identity: A, map: M, combine: C) -> A
    where
        A: Copy + Send + Sync,
        M: Fn(usize) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        let (start, end) = (range.start, range.end);
        if start >= end {
            return identity;
        }
        let chunk = chunk_len(end - start, self.workers());
        let parts = (end - start).div_ceil(chunk);
        self.pool.install(|| {
            (0..parts)
                .into_par_iter()
                .map(|p| {
                    let lo = start + p * chunk;
                    let hi = (lo + chunk).min(end);
                    (lo..hi).fold(identity, |acc, i| combine(acc, map(i)))
                })
                .reduce(|| identity, |a, b| combine(a, b))
        })
    }
}
