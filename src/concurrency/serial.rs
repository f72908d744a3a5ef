//! The synchronous model: every task runs inline inside `push`.

use std::panic::{catch_unwind, AssertUnwindSafe};

use crate::concurrency::ExecutionModel;
use crate::error::{ExecutionError, ExecutionResult};

/// Runs each task immediately on the calling thread.
///
/// Unlike the other models, task failures do not wait for `get`: a
/// panicking task is reported as [`ExecutionError::TaskPanicked`] by the
/// `push` that ran it, and no result is recorded for it. The model stays
/// usable afterwards, and `get` returns the results of the tasks that
/// completed.
///
/// ```
/// use sylva::{ExecutionError, ExecutionModel, Serial};
///
/// let mut model = Serial::new();
/// model.push(|| 1).unwrap();
/// assert!(matches!(model.push(|| panic!("boom")), Err(ExecutionError::TaskPanicked(_))));
/// model.push(|| 3).unwrap();
/// assert_eq!(model.get().unwrap(), vec![1, 3]);
/// ```
#[derive(Debug)]
pub struct Serial<R> {
    results: Vec<R>,
}

impl<R> Serial<R> {
    /// Creates an empty model.
    pub const fn new() -> Self {
        Self {
            results: Vec::new(),
        }
    }

    /// Number of results collected since the last `get`.
    pub fn pending(&self) -> usize {
        self.results.len()
    }
}

impl<R> Default for Serial<R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'env, R: Send + 'env> ExecutionModel<'env, R> for Serial<R> {
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'env,
    {
        let result = catch_unwind(AssertUnwindSafe(task)).map_err(ExecutionError::from_panic)?;
        self.results.push(result);
        Ok(())
    }

    fn get(&mut self) -> ExecutionResult<Vec<R>> {
        Ok(std::mem::take(&mut self.results))
    }
}
