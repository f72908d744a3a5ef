//! Error types shared by the storage engine and the execution models.
//!
//! Range errors are raised before any state is touched, so a failed call
//! always leaves the storage exactly as it was.

use std::any::Any;
use std::io;

use thiserror::Error;

/// Result alias for storage operations.
pub type StorageResult<T> = std::result::Result<T, StorageError>;

/// Result alias for execution-model operations.
pub type ExecutionResult<T> = std::result::Result<T, ExecutionError>;

/// Range failures reported by the partitioned storage backends.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A partition index was not below `partitions`.
    #[error("{method}: partition index {index} out of range (partitions: {partitions})")]
    PartitionOutOfRange {
        /// Operation that rejected the index.
        method: &'static str,
        /// The offending partition index.
        index: usize,
        /// Number of partitions at the time of the call.
        partitions: usize,
    },
    /// A position inside a partition was out of bounds.
    #[error("{method}: position {position} out of range for partition {partition} (len: {len})")]
    PositionOutOfRange {
        /// Operation that rejected the position.
        method: &'static str,
        /// Partition the position was resolved against.
        partition: usize,
        /// The offending position.
        position: usize,
        /// Length of the partition at the time of the call.
        len: usize,
    },
    /// The storage has no partitions at all.
    #[error("{method}: storage has no partitions")]
    NoPartitions {
        /// Operation that required at least one partition.
        method: &'static str,
    },
    /// A range erase whose ends belong to different partitions.
    #[error("erase range spans partitions [{first}, {last}]")]
    MismatchedPartitions {
        /// Partition of the first position.
        first: usize,
        /// Partition of the last position.
        last: usize,
    },
}

/// Failures reported by the execution models.
#[derive(Debug, Error)]
pub enum ExecutionError {
    /// A worker pool was requested with zero threads.
    #[error("cannot initialize a thread pool with zero threads")]
    ZeroThreads,
    /// Not a single worker thread could be started.
    #[error("failed to spawn worker thread: {0}")]
    Spawn(#[from] io::Error),
    /// A submitted task panicked.
    #[error("task panicked: {0}")]
    TaskPanicked(String),
    /// The model was used again after a task failure was already reported.
    #[error("execution model was terminated by an earlier task failure")]
    Terminated,
    /// Work was pushed after `get`/`join` already shut the workers down.
    #[error("execution model has finished and accepts no more work")]
    Finished,
    /// The dedicated rayon pool could not be built.
    #[cfg(feature = "parallel")]
    #[error("failed to build rayon pool: {0}")]
    RayonBuild(#[from] rayon::ThreadPoolBuildError),
}

impl ExecutionError {
    /// Builds a `TaskPanicked` from a `catch_unwind`/`join` payload.
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        ExecutionError::TaskPanicked(panic_message(payload.as_ref()))
    }
}

/// The message carried by a panic payload.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

/// Failures while loading a [`PoolConfig`](crate::concurrency::PoolConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The document was not valid JSON for the config schema.
    #[error("invalid pool configuration: {0}")]
    Parse(#[from] serde_json::Error),
    /// The document parsed but holds a value the pool cannot honour.
    #[error("invalid pool configuration: {0}")]
    Invalid(&'static str),
}
