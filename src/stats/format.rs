use chrono::Duration;

const SECONDS_IN_DAY: i64 = 86_400;
const SECONDS_IN_HOUR: i64 = 3_600;
const SECONDS_IN_MINUTE: i64 = 60;

/// Formats an interval as `D.H:M:S` with whole seconds, e.g. `1.2:3:4`.
/// Negative intervals format as `0.0:0:0`.
pub fn format_interval(interval: Duration) -> String {
    let mut secs = interval.num_seconds().max(0);

    let days = secs / SECONDS_IN_DAY;
    secs -= days * SECONDS_IN_DAY;
    let hours = secs / SECONDS_IN_HOUR;
    secs -= hours * SECONDS_IN_HOUR;
    let minutes = secs / SECONDS_IN_MINUTE;
    secs -= minutes * SECONDS_IN_MINUTE;

    format!("{days}.{hours}:{minutes}:{secs}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_into_units() {
        let interval = Duration::days(1)
            + Duration::hours(2)
            + Duration::minutes(3)
            + Duration::seconds(4)
            + Duration::milliseconds(999);
        assert_eq!(format_interval(interval), "1.2:3:4");
    }

    #[test]
    fn sub_second_and_negative_are_zero() {
        assert_eq!(format_interval(Duration::milliseconds(450)), "0.0:0:0");
        assert_eq!(format_interval(Duration::seconds(-30)), "0.0:0:0");
    }
}
