use axum::{middleware as axum_mw, routing::get, Router};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::CorsLayer;

use crate::handlers::{fallback, health};
use crate::middleware::stats;
use crate::stats::stream;
use crate::AppState;

/// Builds the full Axum `Router` with all routes and middleware.
pub fn create_router(state: Arc<AppState>, cors: CorsLayer) -> Router {
    let recorder = Arc::clone(&state.stats);

    Router::new()
        // ── Probes ──────────────────────────────────────────────
        .route("/health", get(health::health))
        .route("/liveness", get(health::liveness))
        .route("/readiness", get(health::readiness))
        .route("/error", get(fallback::trigger_panic))
        // ── Stats ───────────────────────────────────────────────
        .route("/stats", get(stream::get_stats))
        .route("/stats/stream", get(stream::stats_stream))
        // ── Unknown routes ──────────────────────────────────────
        .fallback(fallback::not_found)
        // ── Provide shared state to all routes above ────────────
        .with_state(state)
        // ── Middleware (applied bottom-up) ──────────────────────
        // Panics become 500s before the stats layer sees them.
        .layer(CatchPanicLayer::custom(fallback::recover))
        .layer(axum_mw::from_fn_with_state(recorder, stats::track_stats))
        .layer(cors)
}

/// Serves until `AppState::begin_shutdown`, then drains open connections.
pub async fn serve(
    listener: TcpListener,
    state: Arc<AppState>,
    cors: CorsLayer,
) -> std::io::Result<()> {
    let app = create_router(Arc::clone(&state), cors);
    axum::serve(listener, app)
        .with_graceful_shutdown(async move { state.shutdown_requested().await })
        .await
}
