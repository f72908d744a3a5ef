//! Execution models: interchangeable task runners.
//!
//! Every model accepts tasks through [`ExecutionModel::push`] and hands back
//! their results through [`ExecutionModel::get`], in submission order no
//! matter in which order the tasks completed.
//!
//! | Model | Runs a task | Task lifetime |
//! |---|---|---|
//! | [`Serial`] | inline, inside `push` | any `'env` |
//! | [`Asynchronous`] | own thread (`Eager`) or inside `get` (`Deferred`) | `'static` |
//! | [`ThreadPool`] | on one of a fixed set of workers | `'static` |
//! | `RayonModel` (feature `parallel`) | on a dedicated rayon pool | `'static` |
//!
//! A panicking task never tears down the caller: it is caught and reported
//! as [`ExecutionError::TaskPanicked`](crate::error::ExecutionError).

pub mod asynchronous;
pub mod config;
#[cfg(feature = "parallel")]
pub mod rayon_model;
pub mod serial;
pub mod thread_pool;

pub use asynchronous::{Asynchronous, Launch};
pub use config::{Pipeline, PoolConfig};
#[cfg(feature = "parallel")]
pub use rayon_model::RayonModel;
pub use serial::Serial;
pub use thread_pool::{PoolState, ThreadPool};

use crate::error::ExecutionResult;

/// A task runner.
///
/// `'env` bounds what a task may borrow: models that run tasks on other
/// threads without a scope require `'env = 'static`.
pub trait ExecutionModel<'env, R: Send + 'env> {
    /// Submits a task.
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'env;

    /// Waits for every submitted task and returns their results in
    /// submission order.
    fn get(&mut self) -> ExecutionResult<Vec<R>>;
}

impl<'env, R: Send + 'env, M: ExecutionModel<'env, R>> ExecutionModel<'env, R> for &mut M {
    #[inline]
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'env,
    {
        (**self).push(task)
    }

    #[inline]
    fn get(&mut self) -> ExecutionResult<Vec<R>> {
        (**self).get()
    }
}
