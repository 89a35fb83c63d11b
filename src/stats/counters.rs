use std::collections::HashMap;

use chrono::{DateTime, Utc};

use super::worker::Domain;

// ─── Arrival counters ────────────────────────────────────────────

/// Total request count plus the two most recent arrival timestamps.
#[derive(Debug, Clone)]
pub struct ArrivalCounters {
    pub request_total: u64,
    pub previous_arrival: DateTime<Utc>,
    pub current_arrival: DateTime<Utc>,
}

impl ArrivalCounters {
    /// Both timestamps start at `started` so "time since last request"
    /// reads as uptime until traffic arrives.
    pub fn new(started: DateTime<Utc>) -> Self {
        Self {
            request_total: 0,
            previous_arrival: started,
            current_arrival: started,
        }
    }

    pub fn record_arrival(&mut self, now: DateTime<Utc>) {
        self.request_total += 1;
        self.previous_arrival = self.current_arrival;
        self.current_arrival = now;
    }
}

impl Domain for ArrivalCounters {
    type Event = DateTime<Utc>;

    const NAME: &'static str = "arrivals";

    fn apply(&mut self, arrived_at: DateTime<Utc>) {
        self.record_arrival(arrived_at);
    }
}

// ─── Endpoint counters ───────────────────────────────────────────

/// Hit count per normalized endpoint path.
#[derive(Debug, Clone, Default)]
pub struct EndpointCounters {
    hits: HashMap<String, u64>,
}

impl EndpointCounters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_hit(&mut self, endpoint: String) {
        *self.hits.entry(endpoint).or_insert(0) += 1;
    }

    pub fn hits(&self, endpoint: &str) -> u64 {
        self.hits.get(endpoint).copied().unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.hits.iter().map(|(k, v)| (k.as_str(), *v))
    }
}

impl Domain for EndpointCounters {
    type Event = String;

    const NAME: &'static str = "endpoints";

    fn apply(&mut self, endpoint: String) {
        self.record_hit(endpoint);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn arrival_rotates_timestamps() {
        let t0 = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        let mut counters = ArrivalCounters::new(t0);

        counters.record_arrival(t0 + Duration::seconds(5));
        counters.record_arrival(t0 + Duration::seconds(9));

        assert_eq!(counters.request_total, 2);
        assert_eq!(counters.previous_arrival, t0 + Duration::seconds(5));
        assert_eq!(counters.current_arrival, t0 + Duration::seconds(9));
    }

    #[test]
    fn endpoint_hits_are_aggregated() {
        let mut counters = EndpointCounters::new();
        for _ in 0..3 {
            counters.record_hit("/a".into());
        }
        counters.record_hit("/b".into());

        assert_eq!(counters.hits("/a"), 3);
        assert_eq!(counters.hits("/b"), 1);
        assert_eq!(counters.hits("/c"), 0);
        assert_eq!(counters.iter().count(), 2);
    }
}
