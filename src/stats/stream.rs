use axum::{
    extract::State,
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::Utc;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;
use tokio_stream::wrappers::IntervalStream;
use tokio_stream::StreamExt;

use super::report::StatsReport;
use crate::AppState;

// ─── GET /stats ──────────────────────────────────────────────────
/// Returns a single JSON report.

pub async fn get_stats(State(state): State<Arc<AppState>>) -> Json<StatsReport> {
    Json(state.stats.report(Utc::now()))
}

// ─── GET /stats/stream ───────────────────────────────────────────
/// Server-Sent Events endpoint.
/// Pushes a full `StatsReport` as JSON every `stream_interval` until the
/// server starts shutting down, so open streams never hold shutdown up.

pub async fn stats_stream(
    State(state): State<Arc<AppState>>,
) -> Sse<impl tokio_stream::Stream<Item = Result<Event, Infallible>>> {
    let interval = tokio::time::interval(state.stream_interval);

    let shutdown = Arc::clone(&state);
    let ticks = IntervalStream::new(interval).take_while(move |_| !shutdown.is_shutting_down());

    let stream = ticks.map(move |_| {
        let report = state.stats.report(Utc::now());
        let json = serde_json::to_string(&report).unwrap_or_default();
        Ok(Event::default().event("stats").data(json))
    });

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
