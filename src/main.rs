use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use reststats::config::{self, Config};
use reststats::stats::StatsRecorder;
use reststats::{server, AppState};

/// How long open connections may take to finish after a shutdown signal.
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env must be applied before clap reads the environment
    let env_file = config::load_env_file(None);
    let config = Config::parse();

    // ── 1. Logging ───────────────────────────────────────────────
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
    match env_file {
        Ok(path) => tracing::info!(path = %path.display(), "loaded environment file"),
        Err(e) if e.not_found() => tracing::debug!("no .env file found"),
        Err(e) => tracing::warn!(error = %e, "cannot load .env file"),
    }

    // ── 2. Stats engine ──────────────────────────────────────────
    let recorder = StatsRecorder::start(config.stats_config(), env!("CARGO_PKG_VERSION"))
        .context("invalid stats configuration")?;

    // ── 3. Build shared state ────────────────────────────────────
    let state = Arc::new(AppState::new(Arc::new(recorder), config.stream_interval()));

    // ── 4. Bind ──────────────────────────────────────────────────
    let cors = config.cors_layer()?;
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind to {addr}"))?;

    tracing::info!(%addr, "server listening");
    state.health.set_ready(true);

    // ── 5. Serve until signalled, then drain with a deadline ─────
    let mut server = tokio::spawn(server::serve(listener, Arc::clone(&state), cors));

    tokio::select! {
        res = &mut server => {
            res.context("server task failed")?
                .context("server exited with error")?;
        }
        _ = shutdown_signal() => {
            state.begin_shutdown();
            match tokio::time::timeout(SHUTDOWN_TIMEOUT, &mut server).await {
                Ok(res) => res
                    .context("server task failed")?
                    .context("server exited with error")?,
                Err(_) => {
                    tracing::warn!(
                        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
                        "connections still open, forcing shutdown"
                    );
                    server.abort();
                }
            }
        }
    }

    // Drain events recorded by the last in-flight requests
    state.stats.flush().await;
    let report = state.stats.report(chrono::Utc::now());
    tracing::info!(
        requests = report.requests_total,
        uptime = %report.uptime,
        "server exiting"
    );
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "cannot listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!(
        timeout_secs = SHUTDOWN_TIMEOUT.as_secs(),
        "shutting down gracefully"
    );
}
