//! Day-boundary math shared by the streak engine and the trackers.
//!
//! Timestamps persist as epoch milliseconds (`0` = never). Day identity is
//! the local calendar date, so streak gaps are counted in calendar days
//! rather than fixed 24-hour spans.

use chrono::{DateTime, Local, NaiveDate, TimeZone};

/// Local calendar day of an epoch-millisecond timestamp. `None` for the
/// zero sentinel ("never").
pub fn day_of(timestamp_ms: i64) -> Option<NaiveDate> {
    if timestamp_ms <= 0 {
        return None;
    }
    Local
        .timestamp_millis_opt(timestamp_ms)
        .single()
        .map(|dt| dt.date_naive())
}

/// Epoch milliseconds of a local datetime.
pub fn millis(dt: DateTime<Local>) -> i64 {
    dt.timestamp_millis()
}

/// The `YYYY-MM-DD` key devotionals are stored under.
pub fn date_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    #[test]
    fn zero_is_never() {
        assert_eq!(day_of(0), None);
        assert_eq!(day_of(-1), None);
    }

    #[test]
    fn same_day_regardless_of_time() {
        let morning = Local.with_ymd_and_hms(2024, 3, 10, 6, 0, 0).unwrap();
        let night = Local.with_ymd_and_hms(2024, 3, 10, 23, 59, 59).unwrap();
        assert_eq!(day_of(millis(morning)), day_of(millis(night)));
    }

    #[test]
    fn calendar_day_gap() {
        let late = Local.with_ymd_and_hms(2024, 3, 10, 23, 50, 0).unwrap();
        let early_next = Local.with_ymd_and_hms(2024, 3, 11, 0, 10, 0).unwrap();
        let a = day_of(millis(late)).unwrap();
        let b = day_of(millis(early_next)).unwrap();
        assert_eq!((b - a).num_days(), 1);
    }

    #[test]
    fn date_key_format() {
        let d = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(date_key(d), "2024-01-05");
        let later = d + Duration::days(30);
        assert_eq!(date_key(later), "2024-02-04");
    }
}
