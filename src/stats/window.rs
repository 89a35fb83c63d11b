use chrono::Duration;

use super::history::History;
use super::ResponseRecord;

/// Running minimum of the time spanned by `size` consecutive responses.
///
/// Only the newest window of the history is examined on each update, so
/// this is the tightest cadence observed so far, not a rescan.
#[derive(Debug, Clone)]
pub struct ShortestWindow {
    size: usize,
    shortest: Option<Duration>,
}

impl ShortestWindow {
    pub fn new(size: usize) -> Self {
        Self {
            size,
            shortest: None,
        }
    }

    /// Call after every push to `history`.
    pub fn observe<R>(&mut self, history: &History<R>)
    where
        R: AsRef<ResponseRecord>,
    {
        if history.len() < self.size {
            return;
        }
        let (Some(newest), Some(first)) =
            (history.nth_from_back(0), history.nth_from_back(self.size - 1))
        else {
            return;
        };

        // Start timestamps can arrive out of order across producers.
        let span = (newest.as_ref().timestamp - first.as_ref().timestamp).max(Duration::zero());
        if self.shortest.map_or(true, |current| span < current) {
            self.shortest = Some(span);
        }
    }

    /// `None` until `size` responses have been seen.
    pub fn shortest(&self) -> Option<Duration> {
        self.shortest
    }

    pub fn size(&self) -> usize {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use chrono::{TimeZone, Utc};

    use super::*;

    fn record_at(secs: i64) -> Arc<ResponseRecord> {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Arc::new(ResponseRecord {
            timestamp: t0 + Duration::seconds(secs),
            url: "/".into(),
            status_code: 200,
            duration: std::time::Duration::from_millis(1),
        })
    }

    #[test]
    fn tracks_tightest_run_of_three() {
        let mut history = History::with_capacity(10);
        let mut window = ShortestWindow::new(3);
        let mut seen = Vec::new();

        for secs in [0, 1, 2, 3, 10, 11] {
            history.push(record_at(secs));
            window.observe(&history);
            seen.push(window.shortest().map(|d| d.num_seconds()));
        }

        assert_eq!(
            seen,
            vec![None, None, Some(2), Some(2), Some(2), Some(2)]
        );
    }

    #[test]
    fn keeps_updating_after_eviction_starts() {
        let mut history = History::with_capacity(3);
        let mut window = ShortestWindow::new(3);

        for secs in [0, 10, 20, 30, 31, 32] {
            history.push(record_at(secs));
            window.observe(&history);
        }

        assert_eq!(history.len(), 3);
        assert_eq!(window.shortest(), Some(Duration::seconds(2)));
    }

    #[test]
    fn out_of_order_timestamps_clamp_to_zero() {
        let mut history = History::with_capacity(5);
        let mut window = ShortestWindow::new(2);

        history.push(record_at(5));
        history.push(record_at(3));
        window.observe(&history);

        assert_eq!(window.shortest(), Some(Duration::zero()));
    }
}
