//! Vector store: the right-hand side, the current iterate and the scratch
//! iterate, allocated together and released together.

use crate::core::traits::Scalar;
use crate::error::RelaxError;
use crate::matrix::Tridiag;

/// `vec![value; len]`, but reporting allocation failure instead of aborting.
pub(crate) fn try_filled<T: Clone>(len: usize, value: T) -> Result<Vec<T>, RelaxError> {
    let mut v = Vec::new();
    v.try_reserve_exact(len).map_err(|_| RelaxError::Allocation { len })?;
    v.resize(len, value);
    Ok(v)
}

/// The three length-N vectors of a run.
#[derive(Debug, Clone)]
pub struct Buffers<T> {
    /// Right-hand side. Never written after setup.
    pub b: Vec<T>,
    /// Current iterate.
    pub x: Vec<T>,
    /// Next iterate; fully rewritten every round.
    pub xnew: Vec<T>,
}

#[derive(Debug)]
pub struct VectorStore<T> {
    n: usize,
    buffers: Option<Buffers<T>>,
}

impl<T: Scalar> VectorStore<T> {
    /// Allocate and initialise: `b = (0, …, 0, N+1)`, `x = 0`.
    pub fn new(n: usize) -> Result<Self, RelaxError> {
        if n == 0 {
            return Err(RelaxError::InvalidOption("problem size N must be positive".into()));
        }
        let last = Tridiag::new(n).rhs_last::<T>().ok_or_else(|| {
            RelaxError::InvalidOption(format!("N + 1 = {} is not representable", n as u128 + 1))
        })?;
        let mut b = try_filled(n, T::zero())?;
        b[n - 1] = last;
        let x = try_filled(n, T::zero())?;
        let xnew = try_filled(n, T::zero())?;
        Ok(Self { n, buffers: Some(Buffers { b, x, xnew }) })
    }

    pub fn len(&self) -> usize {
        self.n
    }

    pub fn is_released(&self) -> bool {
        self.buffers.is_none()
    }

    pub fn buffers(&self) -> Result<&Buffers<T>, RelaxError> {
        self.buffers.as_ref().ok_or(RelaxError::Released)
    }

    pub fn buffers_mut(&mut self) -> Result<&mut Buffers<T>, RelaxError> {
        self.buffers.as_mut().ok_or(RelaxError::Released)
    }

    /// Move the current iterate out, leaving an empty vector behind.
    pub fn take_solution(&mut self) -> Result<Vec<T>, RelaxError> {
        Ok(std::mem::take(&mut self.buffers_mut()?.x))
    }

    /// Drop all three vectors. A second call is rejected with `Released`.
    pub fn release(&mut self) -> Result<(), RelaxError> {
        match self.buffers.take() {
            Some(_) => {
                tracing::debug!(n = self.n, "vector store released");
                Ok(())
            }
            None => Err(RelaxError::Released),
        }
    }
}
