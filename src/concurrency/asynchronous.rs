//! The future-per-task model.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::thread::{self, JoinHandle};

use serde::{Deserialize, Serialize};

use crate::concurrency::ExecutionModel;
use crate::error::{ExecutionError, ExecutionResult};

/// When an [`Asynchronous`] task starts running.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Launch {
    /// Each task gets its own thread as soon as it is pushed.
    #[default]
    Eager,
    /// Tasks are kept until `get`, which runs them in order on the caller.
    Deferred,
}

enum Pending<R> {
    Running(JoinHandle<R>),
    Deferred(Box<dyn FnOnce() -> R + Send>),
}

impl<R> Pending<R> {
    fn wait(self) -> ExecutionResult<R> {
        match self {
            Pending::Running(handle) => handle.join().map_err(ExecutionError::from_panic),
            Pending::Deferred(task) => {
                catch_unwind(AssertUnwindSafe(task)).map_err(ExecutionError::from_panic)
            }
        }
    }
}

/// Launches every task independently and joins them in `get`.
pub struct Asynchronous<R> {
    launch: Launch,
    pending: Vec<Pending<R>>,
}

impl<R: Send + 'static> Asynchronous<R> {
    /// Creates a model with the given launch policy.
    pub fn new(launch: Launch) -> Self {
        Self {
            launch,
            pending: Vec::new(),
        }
    }

    /// The launch policy.
    pub fn launch(&self) -> Launch {
        self.launch
    }
}

impl<R: Send + 'static> Default for Asynchronous<R> {
    fn default() -> Self {
        Self::new(Launch::default())
    }
}

impl<R: Send + 'static> ExecutionModel<'static, R> for Asynchronous<R> {
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let pending = match self.launch {
            Launch::Eager => Pending::Running(
                thread::Builder::new()
                    .name("sylva-async".to_owned())
                    .spawn(task)?,
            ),
            Launch::Deferred => Pending::Deferred(Box::new(task)),
        };
        self.pending.push(pending);
        Ok(())
    }

    /// Every task is waited for even after one fails; the first failure is
    /// returned.
    fn get(&mut self) -> ExecutionResult<Vec<R>> {
        let mut results = Vec::with_capacity(self.pending.len());
        let mut failure = None;
        for pending in self.pending.drain(..) {
            match pending.wait() {
                Ok(result) => results.push(result),
                Err(err) => {
                    failure.get_or_insert(err);
                }
            }
        }
        match failure {
            Some(err) => Err(err),
            None => Ok(results),
        }
    }
}

impl<R> std::fmt::Debug for Asynchronous<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Asynchronous")
            .field("launch", &self.launch)
            .field("pending", &self.pending.len())
            .finish()
    }
}
