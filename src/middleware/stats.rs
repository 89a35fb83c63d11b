use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use chrono::Utc;
use std::sync::Arc;
use std::time::Instant;

use crate::stats::StatsRecorder;

/// Feeds every request into the stats recorder:
///
///   arrival        — before the handler runs
///   endpoint hit   — matched route template, e.g. `/stats`; unmatched
///                    (404) requests have none and are not counted here
///   response       — request URI, final status, start time, elapsed
///
/// Also adds `X-Response-Time-Us` / `Server-Timing` headers and logs a
/// one-liner per request.
pub async fn track_stats(
    State(stats): State<Arc<StatsRecorder>>,
    req: Request,
    next: Next,
) -> Response {
    stats.record_arrival();

    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let url = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str().to_owned())
        .unwrap_or_else(|| path.clone());
    let endpoint = req
        .extensions()
        .get::<MatchedPath>()
        .map(|m| m.as_str().to_owned());

    let started = Utc::now();
    let start = Instant::now();
    let mut response = next.run(req).await;
    let elapsed = start.elapsed();
    let us = elapsed.as_micros();

    let status = response.status().as_u16();
    if let Some(endpoint) = endpoint {
        stats.record_endpoint_hit(endpoint);
    }
    stats.record_response(url, status, started, elapsed);

    // ── Inject response headers ─────────────────────────────────
    if let Ok(val) = us.to_string().parse() {
        response.headers_mut().insert("X-Response-Time-Us", val);
    }

    let server_timing =
        format!("total;dur={:.3}", elapsed.as_secs_f64() * 1000.0);
    if let Ok(val) = server_timing.parse() {
        response.headers_mut().insert("Server-Timing", val);
    }

    // SSE connections stay open; logging them on close is just noise
    if !path.ends_with("/stream") {
        tracing::info!(status, %method, path = %path, us = us as u64, "request");
    }

    response
}
