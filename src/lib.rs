//! In-process HTTP request statistics: bounded response histories,
//! status histograms, per-endpoint counters and the shortest time taken
//! by a fixed number of consecutive responses, served as JSON.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod server;
pub mod stats;

/// Shared application state available to every handler via `State<Arc<AppState>>`.
pub struct AppState {
    /// Stats engine — middleware pushes events, `/stats` reads reports.
    pub stats: Arc<stats::StatsRecorder>,

    /// Liveness / readiness flags.
    pub health: handlers::health::HealthState,

    /// How often `/stats/stream` pushes a report.
    pub stream_interval: Duration,

    /// Flipped to `true` once; ends open SSE streams and the server.
    shutdown: watch::Sender<bool>,
}

impl AppState {
    pub fn new(stats: Arc<stats::StatsRecorder>, stream_interval: Duration) -> Self {
        Self {
            stats,
            health: handlers::health::HealthState::default(),
            stream_interval,
            shutdown: watch::Sender::new(false),
        }
    }

    pub fn begin_shutdown(&self) {
        self.health.set_ready(false);
        self.shutdown.send_replace(true);
    }

    pub fn is_shutting_down(&self) -> bool {
        *self.shutdown.borrow()
    }

    /// Resolves once `begin_shutdown` has been called.
    pub async fn shutdown_requested(&self) {
        let mut rx = self.shutdown.subscribe();
        // The sender lives in `self`, so this only returns once the flag flips
        let _ = rx.wait_for(|down| *down).await;
    }
}
