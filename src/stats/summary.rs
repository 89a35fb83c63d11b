use std::sync::Arc;

use chrono::{DateTime, Utc};
use hdrhistogram::Histogram;
use serde::Serialize;

use super::format::format_interval;
use super::history::History;
use super::ResponseRecord;

/// HdrHistogram range: 1 μs → 1 h, 3 significant figures
const HIST_LOW: u64 = 1;
const HIST_HIGH: u64 = 3_600_000_000;
const HIST_SIGFIG: u8 = 3;

/// Duration summary over the responses currently retained in the
/// "all" history. Serialized straight into the stats report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowSummary {
    pub count: usize,
    /// Time since the oldest retained response started.
    pub done_within: String,
    pub min_duration_ms: u64,
    pub max_duration_ms: u64,
    pub avg_duration_ms: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
}

impl WindowSummary {
    /// Returns zeroed values if the history is empty.
    pub fn from_history(history: &History<Arc<ResponseRecord>>, now: DateTime<Utc>) -> Self {
        let Some(oldest) = history.oldest() else {
            return Self::empty();
        };

        let mut min = u64::MAX;
        let mut max = 0;
        let mut total = 0;
        let mut hist = new_histogram();

        for record in history.iter() {
            let ms = record.duration_ms();
            min = min.min(ms);
            max = max.max(ms);
            total += ms;
            // Clamp to ≥ 1 μs
            hist.saturating_record((record.duration.as_micros() as u64).max(HIST_LOW));
        }

        Self {
            count: history.len(),
            done_within: format_interval(now - oldest.timestamp),
            min_duration_ms: min,
            max_duration_ms: max,
            avg_duration_ms: total / history.len() as u64,
            p50_us: hist.value_at_quantile(0.50),
            p95_us: hist.value_at_quantile(0.95),
            p99_us: hist.value_at_quantile(0.99),
        }
    }

    /// All-zero placeholder used before any responses are recorded.
    pub fn empty() -> Self {
        Self {
            count: 0,
            done_within: format_interval(chrono::Duration::zero()),
            min_duration_ms: 0,
            max_duration_ms: 0,
            avg_duration_ms: 0,
            p50_us: 0,
            p95_us: 0,
            p99_us: 0,
        }
    }
}

fn new_histogram() -> Histogram<u64> {
    Histogram::<u64>::new_with_bounds(HIST_LOW, HIST_HIGH, HIST_SIGFIG)
        .expect("histogram creation")
}
