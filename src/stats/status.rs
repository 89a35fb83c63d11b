use serde::ser::{Serialize, SerializeMap, Serializer};

/// Coarse HTTP status class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatusClass {
    Informational,
    Success,
    Redirection,
    ClientError,
    ServerError,
}

impl StatusClass {
    pub const ALL: [StatusClass; 5] = [
        Self::Informational,
        Self::Success,
        Self::Redirection,
        Self::ClientError,
        Self::ServerError,
    ];

    /// Anything below 200 (including nonsense codes) counts as 1XX.
    pub fn of(status_code: u16) -> Self {
        match status_code {
            500..=u16::MAX => Self::ServerError,
            400..=499 => Self::ClientError,
            300..=399 => Self::Redirection,
            200..=299 => Self::Success,
            _ => Self::Informational,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Informational => "1XX",
            Self::Success => "2XX",
            Self::Redirection => "3XX",
            Self::ClientError => "4XX",
            Self::ServerError => "5XX",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

/// Response count per status class. Serializes as
/// `{"1XX": n, "2XX": n, "3XX": n, "4XX": n, "5XX": n}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StatusHistogram {
    counts: [u64; 5],
}

impl StatusHistogram {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, status_code: u16) {
        self.counts[StatusClass::of(status_code).index()] += 1;
    }

    pub fn count(&self, class: StatusClass) -> u64 {
        self.counts[class.index()]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().sum()
    }
}

impl FromIterator<u16> for StatusHistogram {
    fn from_iter<I: IntoIterator<Item = u16>>(codes: I) -> Self {
        let mut histogram = Self::new();
        for code in codes {
            histogram.record(code);
        }
        histogram
    }
}

impl Serialize for StatusHistogram {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(StatusClass::ALL.len()))?;
        for class in StatusClass::ALL {
            map.serialize_entry(class.label(), &self.count(class))?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn buckets_by_class() {
        let histogram: StatusHistogram = [200, 201, 404, 500, 301].into_iter().collect();

        assert_eq!(histogram.count(StatusClass::Informational), 0);
        assert_eq!(histogram.count(StatusClass::Success), 2);
        assert_eq!(histogram.count(StatusClass::Redirection), 1);
        assert_eq!(histogram.count(StatusClass::ClientError), 1);
        assert_eq!(histogram.count(StatusClass::ServerError), 1);
        assert_eq!(histogram.total(), 5);
    }

    #[test]
    fn odd_codes_fall_into_edge_buckets() {
        assert_eq!(StatusClass::of(0), StatusClass::Informational);
        assert_eq!(StatusClass::of(199), StatusClass::Informational);
        assert_eq!(StatusClass::of(599), StatusClass::ServerError);
        assert_eq!(StatusClass::of(999), StatusClass::ServerError);
    }

    #[test]
    fn serializes_every_bucket() {
        let histogram: StatusHistogram = [204, 503].into_iter().collect();
        let json = serde_json::to_value(histogram).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"1XX": 0, "2XX": 1, "3XX": 0, "4XX": 0, "5XX": 1})
        );
    }
}
