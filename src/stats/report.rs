use std::collections::BTreeMap;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::counters::{ArrivalCounters, EndpointCounters};
use super::format::format_interval;
use super::history::History;
use super::responses::ResponseStats;
use super::status::StatusHistogram;
use super::summary::WindowSummary;
use super::ResponseRecord;

/// Shown in place of the shortest window until enough responses arrived.
pub const UNDEFINED: &str = "undefined";

/// Complete snapshot served by `GET /stats` and the SSE stream.
#[derive(Debug, Clone, Serialize)]
pub struct StatsReport {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub uptime: String,

    // Counters
    pub requests_total: u64,
    pub time_since_last_request: String,
    pub requests_by_endpoint: BTreeMap<String, u64>,

    // Rolling window over the "all" history
    pub recent_requests: WindowSummary,
    pub shortest_window: String,
    pub shortest_window_ms: Option<i64>,

    // Status histograms
    pub responses_all: StatusHistogram,
    pub responses_recent: StatusHistogram,

    // Short lists, most recent last
    pub requests_last_n: Vec<ResponseEntry>,
    pub failed_requests_last_n: Vec<ResponseEntry>,
    pub slow_requests_last_n: Vec<ResponseEntry>,
}

/// One row of the short "last N" lists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResponseEntry {
    pub url: String,
    pub status_code: u16,
    pub duration_ms: u64,
}

impl From<&ResponseRecord> for ResponseEntry {
    fn from(record: &ResponseRecord) -> Self {
        Self {
            url: record.url.clone(),
            status_code: record.status_code,
            duration_ms: record.duration_ms(),
        }
    }
}

/// Fixed facts about the recorder that every report carries.
#[derive(Debug, Clone)]
pub struct ReportMeta {
    pub version: String,
    pub started_at: DateTime<Utc>,
    pub last_n: usize,
}

impl StatsReport {
    /// Pure assembly from borrowed domain state; takes no locks itself.
    pub fn build(
        meta: &ReportMeta,
        arrivals: &ArrivalCounters,
        endpoints: &EndpointCounters,
        responses: &ResponseStats,
        now: DateTime<Utc>,
    ) -> Self {
        let shortest = responses.shortest_window().shortest();

        Self {
            version: meta.version.clone(),
            started_at: meta.started_at,
            uptime: format_interval(now - meta.started_at),

            requests_total: arrivals.request_total,
            // The current arrival is usually the stats request itself.
            time_since_last_request: format_interval(now - arrivals.previous_arrival),
            requests_by_endpoint: endpoints
                .iter()
                .map(|(endpoint, hits)| (endpoint.to_owned(), hits))
                .collect(),

            recent_requests: WindowSummary::from_history(responses.all(), now),
            shortest_window: shortest.map_or_else(|| UNDEFINED.to_owned(), format_interval),
            shortest_window_ms: shortest.map(|d| d.num_milliseconds()),

            responses_all: responses.statuses(),
            responses_recent: responses.recent_statuses(),

            requests_last_n: last_entries(responses.all(), meta.last_n),
            failed_requests_last_n: last_entries(responses.failed(), meta.last_n),
            slow_requests_last_n: last_entries(responses.slow(), meta.last_n),
        }
    }
}

fn last_entries(history: &History<Arc<ResponseRecord>>, n: usize) -> Vec<ResponseEntry> {
    history
        .last_n(n)
        .iter()
        .map(|record| ResponseEntry::from(record.as_ref()))
        .collect()
}
