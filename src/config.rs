use std::path::{Path, PathBuf};
use std::time::Duration;

use axum::http::HeaderValue;
use clap::Parser;
use tower_http::cors::{Any, CorsLayer};

use crate::stats::StatsConfig;

/// Loads `KEY=value` lines into the process environment without
/// overriding variables that are already set. `None` searches for `.env`
/// in the current directory and its parents.
pub fn load_env_file(path: Option<&Path>) -> dotenvy::Result<PathBuf> {
    match path {
        Some(path) => dotenvy::from_path(path).map(|()| path.to_path_buf()),
        None => dotenvy::dotenv(),
    }
}

/// Command-line / environment configuration for the server binary.
#[derive(Debug, Clone, Parser)]
#[command(name = "reststats", version, about = "HTTP request statistics service")]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "RESTSTATS_PORT", default_value_t = 8700)]
    pub port: u16,

    /// Allowed CORS origin; any origin when unset
    #[arg(long, env = "RESTSTATS_ALLOW_ORIGIN")]
    pub allow_origin: Option<String>,

    /// Responses kept in the rolling history
    #[arg(long, env = "RESTSTATS_HISTORY_CAPACITY", default_value_t = 1000)]
    pub history_capacity: usize,

    /// Failed (status >= 400) responses kept
    #[arg(long, env = "RESTSTATS_FAILED_CAPACITY", default_value_t = 100)]
    pub failed_capacity: usize,

    /// Slow responses kept
    #[arg(long, env = "RESTSTATS_SLOW_CAPACITY", default_value_t = 100)]
    pub slow_capacity: usize,

    /// Responses at least this slow (ms) count as slow
    #[arg(long, env = "RESTSTATS_SLOW_MS", default_value_t = 100)]
    pub slow_ms: u64,

    /// Consecutive responses covered by the shortest-window metric
    #[arg(long, env = "RESTSTATS_WINDOW_SIZE", default_value_t = 100)]
    pub window_size: usize,

    /// Length of the "last N" lists in the report
    #[arg(long, env = "RESTSTATS_LAST_N", default_value_t = 10)]
    pub last_n: usize,

    /// Interval between reports pushed on /stats/stream (ms)
    #[arg(long, env = "RESTSTATS_STREAM_INTERVAL_MS", default_value_t = 1000)]
    pub stream_interval_ms: u64,

    /// Emit logs as JSON lines
    #[arg(long, env = "RESTSTATS_LOG_JSON")]
    pub log_json: bool,
}

impl Config {
    pub fn stats_config(&self) -> StatsConfig {
        StatsConfig {
            history_capacity: self.history_capacity,
            failed_capacity: self.failed_capacity,
            slow_capacity: self.slow_capacity,
            slow_threshold: Duration::from_millis(self.slow_ms),
            window_size: self.window_size,
            last_n: self.last_n,
        }
    }

    pub fn stream_interval(&self) -> Duration {
        Duration::from_millis(self.stream_interval_ms.max(1))
    }

    pub fn cors_layer(&self) -> anyhow::Result<CorsLayer> {
        let Some(origin) = &self.allow_origin else {
            return Ok(CorsLayer::permissive());
        };
        let origin: HeaderValue = origin
            .parse()
            .map_err(|e| anyhow::anyhow!("invalid allow-origin \"{origin}\": {e}"))?;

        Ok(CorsLayer::new()
            .allow_origin(origin)
            .allow_headers(Any)
            .allow_methods(Any))
    }
}
