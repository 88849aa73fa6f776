//! Formatting utilities for human-readable output
//!
//! Provides consistent formatting functions for the reports.

use chrono::Duration;

const SECS_PER_MINUTE: i64 = 60;
const SECS_PER_HOUR: i64 = 60 * SECS_PER_MINUTE;
const SECS_PER_DAY: i64 = 24 * SECS_PER_HOUR;

/// Split a duration into days, hours, minutes and seconds
///
/// Negative durations (timestamps in the future) come out as all zeros.
pub fn split_duration(duration: Duration) -> (i64, i64, i64, i64) {
    let total = duration.num_seconds().max(0);

    let days = total / SECS_PER_DAY;
    let hours = (total % SECS_PER_DAY) / SECS_PER_HOUR;
    let minutes = (total % SECS_PER_HOUR) / SECS_PER_MINUTE;
    let seconds = total % SECS_PER_MINUTE;

    (days, hours, minutes, seconds)
}

/// Format an image age, e.g. "3 days, 04:05.06"
pub fn format_age(age: Duration) -> String {
    let (days, hours, minutes, seconds) = split_duration(age);
    format!("{} days, {:02}:{:02}.{:02}", days, hours, minutes, seconds)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_duration() {
        let d = Duration::days(3) + Duration::hours(4) + Duration::minutes(5) + Duration::seconds(6);
        assert_eq!(split_duration(d), (3, 4, 5, 6));
        assert_eq!(split_duration(Duration::zero()), (0, 0, 0, 0));
        assert_eq!(split_duration(Duration::hours(-5)), (0, 0, 0, 0));
    }

    #[test]
    fn test_format_age() {
        assert_eq!(format_age(Duration::hours(2) + Duration::seconds(7)), "0 days, 02:00.07");
        assert_eq!(format_age(Duration::days(12)), "12 days, 00:00.00");
    }
}
