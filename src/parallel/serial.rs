// single-worker backend; same contracts as the pooled one

use std::ops::Range;

#[derive(Debug, Default, Clone, Copy)]
pub struct SerialExec;

impl super::Exec for SerialExec {
    fn workers(&self) -> usize {
        1
    }

    fn in_round<R, F>(&self, body: F) -> R
    where
        R: Send,
        F: FnOnce() -> R + Send,
    {
        body()
    }

    fn parallel_for<T, F>(&self, out: &mut [T], f: F)
    where
        T: Send,
        F: Fn(usize) -> T + Sync + Send,
    {
        for (i, o) in out.iter_mut().enumerate() {
            *o = f(i);
        }
    }

    fn parallel_for_rows<T, F>(&self, out: &mut [T], row_len: usize, f: F)
    where
        T: Send,
        F: Fn(usize, &mut [T]) + Sync + Send,
    {
        if row_len == 0 {
            return;
        }
        for (r, row) in out.chunks_mut(row_len).enumerate() {
            f(r, row);
        }
    }

    fn parallel_reduce<A, M, C>(&self, range: Range<usize>, identity: A, map: M, combine: C) -> A
    where
        A: Copy + Send + Sync,
        M: Fn(usize) -> A + Sync + Send,
        C: Fn(A, A) -> A + Sync + Send,
    {
        range.fold(identity, |acc, i| combine(acc, map(i)))
    }
}
