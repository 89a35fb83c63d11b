use std::time::Duration;

use thiserror::Error;

/// Tunables for the aggregator. `Default` gives the reference sizing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatsConfig {
    /// Capacity of the "all responses" history.
    pub history_capacity: usize,
    /// Capacity of the failed (status >= 400) history.
    pub failed_capacity: usize,
    /// Capacity of the slow history.
    pub slow_capacity: usize,
    /// Responses taking at least this long are "slow".
    pub slow_threshold: Duration,
    /// Number of consecutive responses spanned by the shortest-window metric.
    pub window_size: usize,
    /// Length of the short "last N" lists in the report.
    pub last_n: usize,
}

impl Default for StatsConfig {
    fn default() -> Self {
        Self {
            history_capacity: 1000,
            failed_capacity: 100,
            slow_capacity: 100,
            slow_threshold: Duration::from_millis(100),
            window_size: 100,
            last_n: 10,
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be greater than zero")]
    Zero(&'static str),

    #[error("window size {window} exceeds history capacity {capacity}")]
    WindowExceedsHistory { window: usize, capacity: usize },

    #[error("stats recorder must be started inside a tokio runtime")]
    NoRuntime,
}

impl StatsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("history_capacity", self.history_capacity),
            ("failed_capacity", self.failed_capacity),
            ("slow_capacity", self.slow_capacity),
            ("window_size", self.window_size),
            ("last_n", self.last_n),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| *v == 0) {
            return Err(ConfigError::Zero(name));
        }

        if self.window_size > self.history_capacity {
            return Err(ConfigError::WindowExceedsHistory {
                window: self.window_size,
                capacity: self.history_capacity,
            });
        }

        Ok(())
    }
}
