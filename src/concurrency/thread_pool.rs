//! A bounded worker pool.
//!
//! Workers pull boxed jobs from mutex/condvar guarded lanes:
//! - **single pipeline**: one lane shared by every worker
//! - **multi pipeline**: one lane per worker; pushes round-robin over the
//!   lanes and fall back to non-blocking `try_lock` attempts once every lane
//!   has received work, and idle workers steal from other lanes before
//!   sleeping on their own
//!
//! ### Lifecycle
//!
//! `Running` accepts work. `get`/`join` move the pool to `Finished`: lanes
//! are closed, workers drain them and exit, and are joined. A panicking job
//! moves the pool to `Terminated`: workers stop picking up jobs, and the
//! next `push` or `get` joins them and reports the panic. Any later call
//! reports [`ExecutionError::Terminated`].

use std::collections::VecDeque;
use std::fmt;
use std::io;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use crossbeam_utils::CachePadded;
use parking_lot::{Condvar, Mutex};
use tracing::{debug, warn};

use crate::concurrency::{ExecutionModel, Pipeline, PoolConfig};
use crate::error::{panic_message, ExecutionError, ExecutionResult};

type Job = Box<dyn FnOnce() + Send + 'static>;

/// Where a pool is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PoolState {
    /// Accepting work.
    Running,
    /// Drained and joined; accepts no more work.
    Finished,
    /// Shut down by a panicking job.
    Terminated,
}

struct LaneState {
    jobs: VecDeque<Job>,
    closed: bool,
}

struct Lane {
    state: Mutex<LaneState>,
    ready: Condvar,
}

impl Lane {
    fn new() -> Self {
        Self {
            state: Mutex::new(LaneState {
                jobs: VecDeque::new(),
                closed: false,
            }),
            ready: Condvar::new(),
        }
    }
}

struct Shared {
    lanes: Vec<CachePadded<Lane>>,
    terminated: AtomicBool,
    failure: Mutex<Option<String>>,
}

impl Shared {
    fn new(lanes: usize) -> Self {
        Self {
            lanes: (0..lanes).map(|_| CachePadded::new(Lane::new())).collect(),
            terminated: AtomicBool::new(false),
            failure: Mutex::new(None),
        }
    }

    #[inline]
    fn is_terminated(&self) -> bool {
        self.terminated.load(Ordering::Acquire)
    }

    /// Records the first failure and wakes every sleeping worker.
    fn fail(&self, message: String) {
        self.failure.lock().get_or_insert(message);
        self.terminated.store(true, Ordering::Release);
        for lane in &self.lanes {
            // Taking the lock orders the flag before any waiter's re-check.
            let _state = lane.state.lock();
            lane.ready.notify_all();
        }
    }

    fn close(&self) {
        for lane in &self.lanes {
            lane.state.lock().closed = true;
            lane.ready.notify_all();
        }
    }

    /// Own lane first, then the others, without blocking.
    fn steal(&self, home: usize) -> Option<Job> {
        let n = self.lanes.len();
        (0..n).find_map(|k| {
            self.lanes[(home + k) % n]
                .state
                .try_lock()
                .and_then(|mut state| state.jobs.pop_front())
        })
    }

    /// Blocks on the home lane until it yields a job or shuts down.
    fn wait(&self, home: usize) -> Option<Job> {
        let lane = &self.lanes[home];
        let mut state = lane.state.lock();
        loop {
            if self.is_terminated() {
                return None;
            }
            if let Some(job) = state.jobs.pop_front() {
                return Some(job);
            }
            if state.closed {
                return None;
            }
            lane.ready.wait(&mut state);
        }
    }
}

/// Starts one worker serving lane `home`.
fn spawn_worker(builder: thread::Builder, shared: Arc<Shared>, home: usize) -> io::Result<JoinHandle<()>> {
    builder.spawn(move || work(&shared, home))
}

fn work(shared: &Shared, home: usize) {
    while !shared.is_terminated() {
        let Some(job) = shared.steal(home).or_else(|| shared.wait(home)) else {
            return;
        };
        if let Err(payload) = catch_unwind(AssertUnwindSafe(job)) {
            shared.fail(panic_message(payload.as_ref()));
        }
    }
}

/// A fixed set of worker threads fed through one or more task lanes.
pub struct ThreadPool<R> {
    shared: Arc<Shared>,
    workers: Vec<JoinHandle<()>>,
    slots: Vec<Arc<Mutex<Option<R>>>>,
    pipeline: Pipeline,
    lanes: usize,
    next: usize,
    push_cycles: usize,
    state: PoolState,
}

impl<R: Send + 'static> ThreadPool<R> {
    /// A single-pipeline pool with `threads` workers.
    pub fn new(threads: usize) -> ExecutionResult<Self> {
        Self::with_config(&PoolConfig::new(threads))
    }

    /// A multi-pipeline pool with `threads` workers.
    pub fn multi_pipeline(threads: usize, push_cycles: usize) -> ExecutionResult<Self> {
        Self::with_config(&PoolConfig {
            threads,
            pipeline: Pipeline::Multi,
            push_cycles,
            ..PoolConfig::default()
        })
    }

    /// Builds a pool from `config`.
    ///
    /// Fails with [`ExecutionError::ZeroThreads`] for zero threads and with
    /// [`ExecutionError::Spawn`] if not a single worker could be started. If
    /// only some workers start, the pool runs with those.
    pub fn with_config(config: &PoolConfig) -> ExecutionResult<Self> {
        Self::build(config, |_, builder, shared, home| spawn_worker(builder, shared, home))
    }

    fn build<S>(config: &PoolConfig, mut spawn: S) -> ExecutionResult<Self>
    where
        S: FnMut(usize, thread::Builder, Arc<Shared>, usize) -> io::Result<JoinHandle<()>>,
    {
        if config.threads == 0 {
            return Err(ExecutionError::ZeroThreads);
        }
        let multi = config.pipeline == Pipeline::Multi;
        let shared = Arc::new(Shared::new(if multi { config.threads } else { 1 }));

        let mut workers = Vec::with_capacity(config.threads);
        for index in 0..config.threads {
            let home = if multi { index } else { 0 };
            let builder = thread::Builder::new().name(format!("{}-{index}", config.thread_name));
            match spawn(index, builder, Arc::clone(&shared), home) {
                Ok(handle) => workers.push(handle),
                Err(err) if workers.is_empty() => return Err(ExecutionError::Spawn(err)),
                Err(err) => {
                    warn!(
                        requested = config.threads,
                        started = workers.len(),
                        %err,
                        "thread pool running with fewer workers than requested"
                    );
                    break;
                }
            }
        }

        let lanes = if multi { workers.len() } else { 1 };
        debug!(threads = workers.len(), pipeline = ?config.pipeline, "thread pool started");
        Ok(Self {
            shared,
            workers,
            slots: Vec::new(),
            pipeline: config.pipeline,
            lanes,
            next: 0,
            push_cycles: config.push_cycles.max(1),
            state: PoolState::Running,
        })
    }

    /// Number of live worker threads.
    pub fn threads(&self) -> usize {
        self.workers.len()
    }

    /// The queue layout.
    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    /// The lifecycle state.
    pub fn state(&self) -> PoolState {
        self.state
    }

    /// Waits for every submitted job without collecting results; a later
    /// `get` still returns them.
    pub fn join(&mut self) -> ExecutionResult<()> {
        match self.state {
            PoolState::Running => self.finish(),
            PoolState::Finished => {}
            PoolState::Terminated => return Err(self.take_failure()),
        }
        if self.shared.is_terminated() {
            self.state = PoolState::Terminated;
            debug!("thread pool terminated");
            return Err(self.take_failure());
        }
        Ok(())
    }

    fn ensure_running(&mut self) -> ExecutionResult<()> {
        match self.state {
            PoolState::Running if self.shared.is_terminated() => {
                self.terminate();
                Err(self.take_failure())
            }
            PoolState::Running => Ok(()),
            PoolState::Finished => Err(ExecutionError::Finished),
            PoolState::Terminated => Err(self.take_failure()),
        }
    }

    fn take_failure(&self) -> ExecutionError {
        self.shared
            .failure
            .lock()
            .take()
            .map_or(ExecutionError::Terminated, ExecutionError::TaskPanicked)
    }

    fn finish(&mut self) {
        debug!(jobs = self.slots.len(), "thread pool finishing");
        self.state = PoolState::Finished;
        self.shared.close();
        self.join_workers();
    }

    fn terminate(&mut self) {
        debug!("thread pool terminated");
        self.state = PoolState::Terminated;
        self.shared.close();
        self.join_workers();
    }

    fn join_workers(&mut self) {
        for handle in self.workers.drain(..) {
            if let Err(payload) = handle.join() {
                self.shared.fail(panic_message(payload.as_ref()));
            }
        }
    }

    fn enqueue(&mut self, job: Job) {
        let lanes = self.lanes;
        if lanes > 1 && self.next >= lanes {
            for attempt in 0..lanes * self.push_cycles {
                let lane = &self.shared.lanes[(self.next + attempt) % lanes];
                if let Some(mut state) = lane.state.try_lock() {
                    state.jobs.push_back(job);
                    lane.ready.notify_one();
                    self.next = self.next.wrapping_add(1);
                    return;
                }
            }
        }
        let lane = &self.shared.lanes[self.next % lanes];
        lane.state.lock().jobs.push_back(job);
        lane.ready.notify_one();
        self.next = self.next.wrapping_add(1);
    }
}

impl<R: Send + 'static> ExecutionModel<'static, R> for ThreadPool<R> {
    fn push<F>(&mut self, task: F) -> ExecutionResult<()>
    where
        F: FnOnce() -> R + Send + 'static,
    {
        self.ensure_running()?;
        let slot = Arc::new(Mutex::new(None));
        let out = Arc::clone(&slot);
        self.slots.push(slot);
        self.enqueue(Box::new(move || {
            let result = task();
            *out.lock() = Some(result);
        }));
        Ok(())
    }

    fn get(&mut self) -> ExecutionResult<Vec<R>> {
        self.join()?;
        self.slots
            .drain(..)
            .map(|slot| slot.lock().take().ok_or(ExecutionError::Terminated))
            .collect()
    }
}

impl<R> Drop for ThreadPool<R> {
    fn drop(&mut self) {
        if self.workers.is_empty() {
            return;
        }
        self.shared.close();
        for handle in self.workers.drain(..) {
            let _ = handle.join();
        }
        debug!("thread pool dropped");
    }
}

impl<R> fmt::Debug for ThreadPool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ThreadPool")
            .field("threads", &self.workers.len())
            .field("pipeline", &self.pipeline)
            .field("state", &self.state)
            .field("pending", &self.slots.len())
            .finish()
    }
}
