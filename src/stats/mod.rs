pub mod config;
pub mod counters;
pub mod format;
pub mod history;
pub mod recorder;
pub mod report;
pub mod responses;
pub mod status;
pub mod stream;
pub mod summary;
pub mod window;
pub mod worker;

use std::time::Duration;

use chrono::{DateTime, Utc};

pub use config::{ConfigError, StatsConfig};
pub use recorder::StatsRecorder;
pub use report::StatsReport;

/// One completed response. Immutable once recorded and shared between
/// every history that accepts it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseRecord {
    /// When handling of the request started.
    pub timestamp: DateTime<Utc>,
    /// Request URI including the query string.
    pub url: String,
    pub status_code: u16,
    pub duration: Duration,
}

impl ResponseRecord {
    pub fn is_failed(&self) -> bool {
        self.status_code >= 400
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration.as_millis() as u64
    }
}
