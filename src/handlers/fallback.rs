use std::any::Any;

use axum::response::{IntoResponse, Response};

use super::AppError;

// ─── Fallback for unknown routes ─────────────────────────────────

pub async fn not_found() -> AppError {
    AppError::NotFound
}

// ─── GET /error ──────────────────────────────────────────────────
/// Panics on purpose so the recovery path can be exercised end to end.

pub async fn trigger_panic() -> &'static str {
    panic!("Test error")
}

/// Turns a caught handler panic into a 500. Runs inside the stats
/// middleware, so the recovered response is still recorded.
pub fn recover(err: Box<dyn Any + Send + 'static>) -> Response {
    let message = if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else {
        "Internal server error".to_owned()
    };

    tracing::error!(error = %message, "handler panicked");
    AppError::Internal(message).into_response()
}
