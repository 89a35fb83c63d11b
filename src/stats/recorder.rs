use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::runtime::Handle;

use super::config::{ConfigError, StatsConfig};
use super::counters::{ArrivalCounters, EndpointCounters};
use super::report::{ReportMeta, StatsReport};
use super::responses::ResponseStats;
use super::worker::DomainHandle;
use super::ResponseRecord;

// ─── Public types ────────────────────────────────────────────────

/// Request statistics engine.
///
/// Request-handling code pushes events through the `record_*` methods;
/// each kind of event goes to its own worker task, which is the only
/// writer of that piece of state. `report()` reads the three pieces
/// directly, so it never waits behind queued events. A report may
/// therefore be slightly behind (or mixed across pieces), but each piece
/// is observed in a consistent state.
///
/// Construct once at startup and share behind an `Arc`.
pub struct StatsRecorder {
    meta: ReportMeta,
    arrivals: DomainHandle<ArrivalCounters>,
    endpoints: DomainHandle<EndpointCounters>,
    responses: DomainHandle<ResponseStats>,
}

// ─── StatsRecorder impl ──────────────────────────────────────────

impl StatsRecorder {
    /// Validates `config` and spawns the workers on the current tokio
    /// runtime; fails with `ConfigError::NoRuntime` outside of one.
    pub fn start(config: StatsConfig, version: impl Into<String>) -> Result<Self, ConfigError> {
        config.validate()?;
        let runtime = Handle::try_current().map_err(|_| ConfigError::NoRuntime)?;

        let started_at = Utc::now();
        tracing::info!(
            history = config.history_capacity,
            failed = config.failed_capacity,
            slow = config.slow_capacity,
            slow_ms = config.slow_threshold.as_millis() as u64,
            window = config.window_size,
            "starting request stats"
        );

        Ok(Self {
            meta: ReportMeta {
                version: version.into(),
                started_at,
                last_n: config.last_n,
            },
            arrivals: DomainHandle::spawn(&runtime, ArrivalCounters::new(started_at)),
            endpoints: DomainHandle::spawn(&runtime, EndpointCounters::new()),
            responses: DomainHandle::spawn(&runtime, ResponseStats::new(&config)),
        })
    }

    /// Once per inbound request, before handling.
    pub fn record_arrival(&self) {
        self.arrivals.send(Utc::now());
    }

    /// Once per routed request, with the normalized path.
    pub fn record_endpoint_hit(&self, endpoint: impl Into<String>) {
        self.endpoints.send(endpoint.into());
    }

    /// Once per completed (or recovered-from-panic) response.
    pub fn record_response(
        &self,
        url: impl Into<String>,
        status_code: u16,
        started: DateTime<Utc>,
        duration: Duration,
    ) {
        self.responses.send(ResponseRecord {
            timestamp: started,
            url: url.into(),
            status_code,
            duration,
        });
    }

    /// Waits until every event recorded before this call has been applied.
    pub async fn flush(&self) {
        self.arrivals.flush().await;
        self.endpoints.flush().await;
        self.responses.flush().await;
    }

    /// Produce a read-only snapshot as of `now`.
    pub fn report(&self, now: DateTime<Utc>) -> StatsReport {
        let arrivals = self.arrivals.read(ArrivalCounters::clone);
        self.endpoints.read(|endpoints| {
            self.responses.read(|responses| {
                StatsReport::build(&self.meta, &arrivals, endpoints, responses, now)
            })
        })
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.meta.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rejects_invalid_config() {
        let config = StatsConfig {
            last_n: 0,
            ..StatsConfig::default()
        };
        assert!(matches!(
            StatsRecorder::start(config, "test"),
            Err(ConfigError::Zero("last_n"))
        ));
    }

    #[test]
    fn outside_a_runtime_is_an_error() {
        assert!(matches!(
            StatsRecorder::start(StatsConfig::default(), "test"),
            Err(ConfigError::NoRuntime)
        ));
    }

    #[tokio::test]
    async fn events_show_up_after_flush() {
        let recorder = StatsRecorder::start(StatsConfig::default(), "test").unwrap();

        recorder.record_arrival();
        recorder.record_endpoint_hit("/stats");
        recorder.record_response("/stats?x=1", 200, Utc::now(), Duration::from_millis(3));
        recorder.flush().await;

        let report = recorder.report(Utc::now());
        assert_eq!(report.version, "test");
        assert_eq!(report.requests_total, 1);
        assert_eq!(report.requests_by_endpoint.get("/stats"), Some(&1));
        assert_eq!(report.requests_last_n.len(), 1);
        assert_eq!(report.requests_last_n[0].url, "/stats?x=1");
    }
}
