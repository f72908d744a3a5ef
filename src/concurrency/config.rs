//! Serializable thread-pool configuration.

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Default number of non-blocking push attempts per worker in
/// multi-pipeline mode.
pub const DEFAULT_PUSH_CYCLES: usize = 46;

/// How tasks are queued inside a [`ThreadPool`](crate::concurrency::ThreadPool).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pipeline {
    /// One queue shared by every worker.
    #[default]
    Single,
    /// One queue per worker; idle workers steal from their neighbours.
    Multi,
}

/// Thread-pool settings.
///
/// ```
/// use sylva::concurrency::{Pipeline, PoolConfig};
///
/// let config = PoolConfig::from_json(r#"{ "threads": 4, "pipeline": "multi" }"#).unwrap();
/// assert_eq!(config.threads, 4);
/// assert_eq!(config.pipeline, Pipeline::Multi);
/// assert_eq!(config.push_cycles, 46);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PoolConfig {
    /// Number of worker threads.
    pub threads: usize,
    /// Queue layout.
    pub pipeline: Pipeline,
    /// Multi-pipeline only: `threads * push_cycles` non-blocking attempts are
    /// made before a push blocks on a queue.
    pub push_cycles: usize,
    /// Worker thread name prefix.
    pub thread_name: String,
}

impl PoolConfig {
    /// A single-pipeline configuration with `threads` workers.
    pub fn new(threads: usize) -> Self {
        Self {
            threads,
            ..Self::default()
        }
    }

    /// Parses and validates a JSON document.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serializes the configuration as pretty JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects values no pool can be built from.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.threads == 0 {
            return Err(ConfigError::Invalid("threads must be at least 1"));
        }
        if self.push_cycles == 0 {
            return Err(ConfigError::Invalid("push_cycles must be at least 1"));
        }
        if self.thread_name.is_empty() {
            return Err(ConfigError::Invalid("thread_name must not be empty"));
        }
        Ok(())
    }
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self {
            threads: std::thread::available_parallelism().map_or(1, NonZeroUsize::get),
            pipeline: Pipeline::Single,
            push_cycles: DEFAULT_PUSH_CYCLES,
            thread_name: "sylva-worker".to_owned(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let config = PoolConfig::from_json(r#"{ "threads": 2 }"#).unwrap();
        assert_eq!(config.pipeline, Pipeline::Single);
        assert_eq!(config.push_cycles, DEFAULT_PUSH_CYCLES);
        assert_eq!(config.thread_name, "sylva-worker");
    }

    #[test]
    fn invalid_documents_are_rejected() {
        assert!(matches!(
            PoolConfig::from_json(r#"{ "threads": 0 }"#),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            PoolConfig::from_json(r#"{ "threads": 2, "workers": 3 }"#),
            Err(ConfigError::Parse(_))
        ));
        assert!(matches!(
            PoolConfig::from_json(r#"{ "pipeline": "diagonal" }"#),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn json_round_trips() {
        let config = PoolConfig {
            threads: 3,
            pipeline: Pipeline::Multi,
            push_cycles: 8,
            thread_name: "walker".to_owned(),
        };
        let json = config.to_json().unwrap();
        assert_eq!(PoolConfig::from_json(&json).unwrap(), config);
    }
}
