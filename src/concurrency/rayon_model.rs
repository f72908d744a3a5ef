//! Execution on a dedicated rayon pool (feature `parallel`).

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

use crossbeam_utils::sync::WaitGroup;
use parking_lot::Mutex;
use rayon::{ThreadPool, ThreadPoolBuilder};

use crate::concurrency::{ExecutionModel, PoolConfig};
use crate::error::{panic_message, ExecutionError, ExecutionResult};

/// Spawns every task onto a rayon pool owned by the model.
///
/// Panics are caught inside the task so that they never reach rayon's
/// panic handler; the first one is reported by `get`.
pub struct RayonModel<R> {
    pool: ThreadPool,
    slots: Vec<Arc<Mutex<Option<R>>>>,
    pending: WaitGroup,
    failure: Arc<Mutex<Option<String>>>,
}

impl<R: Send + 'static> RayonModel<R> {
    /// A model backed by `threads` rayon workers.
    pub fn new(threads: usize) -> ExecutionResult<Self> {
        Self::with_config(&PoolConfig::new(threads))
    }

    /// A model sized and named from `config`; the pipeline setting is
    /// ignored because rayon schedules by work stealing.
    pub fn with_config(config: &PoolConfig) -> ExecutionResult<Self> {
        if config.threads == 0 {
            return Err(ExecutionError::ZeroThreads);
        }
        let prefix = config.thread_name.clone();
        let pool = ThreadPoolBuilder::new()
            .num_threads(config.threads)
            .thread_name(move |i| format!("{prefix}-{i}"))
            .build()?;
        Ok(Self {
            pool,
            slots: Vec::new(),
            pending: WaitGroup::new(),
            failure: Arc::new(Mutex::new(None)),
        })
    }

    /// Number of rayon workers.
    pub fn threads(&self) -> usize {
        self.pool.current_num_threads()
    }
}

impl<R: Send + 'static> ExecutionModel<'static, R> for RayonModel<R> {
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        let slot = Arc::new(Mutex::new(None));
        let out = Arc::clone(&slot);
        let failure = Arc::clone(&self.failure);
        let done = self.pending.clone();
        self.slots.push(slot);
        self.pool.spawn(move || {
            match catch_unwind(AssertUnwindSafe(task)) {
                Ok(result) => *out.lock() = Some(result),
                Err(payload) => {
                    failure.lock().get_or_insert(panic_message(payload.as_ref()));
                }
            }
            drop(done);
        });
        Ok(())
    }

    fn get(&mut self) -> ExecutionResult<Vec<R>> {
        std::mem::replace(&mut self.pending, WaitGroup::new()).wait();
        let slots = std::mem::take(&mut self.slots);
        if let Some(message) = self.failure.lock().take() {
            return Err(ExecutionError::TaskPanicked(message));
        }
        slots
            .into_iter()
            .map(|slot| slot.lock().take().ok_or(ExecutionError::Terminated))
            .collect()
    }
}

impl<R> std::fmt::Debug for RayonModel<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RayonModel")
            .field("threads", &self.pool.current_num_threads())
            .field("pending", &self.slots.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn results_keep_submission_order() {
        let mut model = RayonModel::new(2).unwrap();
        for i in 0..32usize {
            model.push(move || i + 1).unwrap();
        }
        assert_eq!(model.get().unwrap(), (1..=32).collect::<Vec<_>>());
    }

    #[test]
    fn panics_are_reported_by_get() {
        let mut model = RayonModel::new(1).unwrap();
        model.push(|| -> u8 { panic!("rayon boom") }).unwrap();
        assert!(matches!(model.get(), Err(ExecutionError::TaskPanicked(ref m)) if m == "rayon boom"));
        model.push(|| 4).unwrap();
        assert_eq!(model.get().unwrap(), vec![4]);
    }
}
