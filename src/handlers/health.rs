use axum::{extract::State, http::StatusCode};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::AppState;

/// Liveness / readiness flags probed by the orchestrator.
#[derive(Debug)]
pub struct HealthState {
    alive: AtomicBool,
    ready: AtomicBool,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            alive: AtomicBool::new(true),
            ready: AtomicBool::new(false),
        }
    }
}

impl HealthState {
    pub fn set_ready(&self, ready: bool) {
        self.ready.store(ready, Ordering::SeqCst);
    }

    pub fn set_alive(&self, alive: bool) {
        self.alive.store(alive, Ordering::SeqCst);
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }
}

// ─── GET /health ─────────────────────────────────────────────────

pub async fn health() -> StatusCode {
    StatusCode::OK
}

// ─── GET /liveness ───────────────────────────────────────────────

pub async fn liveness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.health.is_alive() {
        StatusCode::OK
    } else {
        StatusCode::INTERNAL_SERVER_ERROR
    }
}

// ─── GET /readiness ──────────────────────────────────────────────

pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.health.is_ready() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}
