use std::sync::Arc;

use super::config::StatsConfig;
use super::history::History;
use super::status::StatusHistogram;
use super::window::ShortestWindow;
use super::worker::Domain;
use super::ResponseRecord;

/// Completed-response statistics: three bounded histories sharing the
/// same records, the all-time status histogram and the shortest window.
#[derive(Debug, Clone)]
pub struct ResponseStats {
    all: History<Arc<ResponseRecord>>,
    failed: History<Arc<ResponseRecord>>,
    slow: History<Arc<ResponseRecord>>,
    slow_threshold: std::time::Duration,
    statuses: StatusHistogram,
    shortest_window: ShortestWindow,
}

impl ResponseStats {
    pub fn new(config: &StatsConfig) -> Self {
        Self {
            all: History::with_capacity(config.history_capacity),
            failed: History::with_capacity(config.failed_capacity),
            slow: History::with_capacity(config.slow_capacity),
            slow_threshold: config.slow_threshold,
            statuses: StatusHistogram::new(),
            shortest_window: ShortestWindow::new(config.window_size),
        }
    }

    pub fn record(&mut self, record: ResponseRecord) {
        let record = Arc::new(record);

        if record.is_failed() {
            self.failed.push(Arc::clone(&record));
        }
        if record.duration >= self.slow_threshold {
            self.slow.push(Arc::clone(&record));
        }
        self.statuses.record(record.status_code);

        self.all.push(record);
        self.shortest_window.observe(&self.all);
    }

    pub fn all(&self) -> &History<Arc<ResponseRecord>> {
        &self.all
    }

    pub fn failed(&self) -> &History<Arc<ResponseRecord>> {
        &self.failed
    }

    pub fn slow(&self) -> &History<Arc<ResponseRecord>> {
        &self.slow
    }

    /// All-time counts; never decremented.
    pub fn statuses(&self) -> StatusHistogram {
        self.statuses
    }

    /// Counts over the records currently retained in the "all" history.
    pub fn recent_statuses(&self) -> StatusHistogram {
        self.all.iter().map(|r| r.status_code).collect()
    }

    pub fn shortest_window(&self) -> &ShortestWindow {
        &self.shortest_window
    }
}

impl Domain for ResponseStats {
    type Event = ResponseRecord;

    const NAME: &'static str = "responses";

    fn apply(&mut self, record: ResponseRecord) {
        self.record(record);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use chrono::Utc;

    use super::*;
    use crate::stats::status::StatusClass;

    fn response(status_code: u16, millis: u64) -> ResponseRecord {
        ResponseRecord {
            timestamp: Utc::now(),
            url: format!("/r/{status_code}"),
            status_code,
            duration: Duration::from_millis(millis),
        }
    }

    #[test]
    fn failed_and_slow_membership_is_independent() {
        let mut stats = ResponseStats::new(&StatsConfig::default());

        stats.record(response(500, 5));
        stats.record(response(200, 500));

        assert_eq!(stats.all().len(), 2);
        assert_eq!(stats.failed().len(), 1);
        assert_eq!(stats.failed().snapshot()[0].status_code, 500);
        assert_eq!(stats.slow().len(), 1);
        assert_eq!(stats.slow().snapshot()[0].status_code, 200);
    }

    #[test]
    fn threshold_is_inclusive() {
        let mut stats = ResponseStats::new(&StatsConfig::default());
        stats.record(response(200, 99));
        stats.record(response(200, 100));
        assert_eq!(stats.slow().len(), 1);
    }

    #[test]
    fn buffers_share_records() {
        let mut stats = ResponseStats::new(&StatsConfig::default());
        stats.record(response(503, 250));

        let all = stats.all().snapshot();
        let failed = stats.failed().snapshot();
        let slow = stats.slow().snapshot();
        assert!(Arc::ptr_eq(&all[0], &failed[0]));
        assert!(Arc::ptr_eq(&all[0], &slow[0]));
    }

    #[test]
    fn recent_histogram_forgets_evicted_records() {
        let config = StatsConfig {
            history_capacity: 3,
            window_size: 3,
            ..StatsConfig::default()
        };
        let mut stats = ResponseStats::new(&config);

        for code in [404, 404, 200, 200, 200] {
            stats.record(response(code, 1));
        }

        assert_eq!(stats.statuses().count(StatusClass::ClientError), 2);
        assert_eq!(stats.statuses().count(StatusClass::Success), 3);
        assert_eq!(stats.recent_statuses().count(StatusClass::ClientError), 0);
        assert_eq!(stats.recent_statuses().count(StatusClass::Success), 3);
    }

    #[test]
    fn failed_history_is_bounded_separately() {
        let config = StatsConfig {
            failed_capacity: 2,
            ..StatsConfig::default()
        };
        let mut stats = ResponseStats::new(&config);

        for _ in 0..5 {
            stats.record(response(500, 1));
        }
        stats.record(response(200, 1));

        assert_eq!(stats.all().len(), 6);
        assert_eq!(stats.failed().len(), 2);
    }
}
