//! Timestamp parsing and calendar-day helpers.
//!
//! Timestamps are stored as `DateTime<Utc>`. Reports work in the caller's
//! time zone: a sale belongs to the local day it happened on, and the weekly
//! window is anchored at local midnight.

use chrono::{
    DateTime, Duration, Local, NaiveDate, NaiveDateTime, NaiveTime, SecondsFormat, TimeZone, Utc,
};

/// Naive layouts accepted when a timestamp carries no offset.
const NAIVE_FORMATS: [&str; 4] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M",
];

/// Parses an ISO-8601 timestamp.
///
/// RFC 3339 text (with `Z` or an offset) is exact. Text without an offset is
/// read as local wall-clock time, and a bare date as local midnight.
/// Returns `None` for anything else.
pub fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    parse_timestamp_in(text, &Local)
}

/// [`parse_timestamp`] with an explicit zone for offset-less text.
pub fn parse_timestamp_in<Tz: TimeZone>(text: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }

    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }

    let naive = NAIVE_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(text, "%Y-%m-%d")
                .ok()
                .map(|date| date.and_time(NaiveTime::MIN))
        })?;

    tz.from_local_datetime(&naive)
        .earliest()
        .map(|local| local.with_timezone(&Utc))
}

/// RFC 3339 in UTC with as many fraction digits as needed to parse back
/// to the same instant.
pub fn format_timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Midnight at the start of `at`'s day, in `at`'s own zone.
pub fn start_of_day<Tz: TimeZone>(at: &DateTime<Tz>) -> DateTime<Tz> {
    midnight(at.date_naive(), &at.timezone()).unwrap_or_else(|| at.clone())
}

/// The first instant of `date` in `tz`.
///
/// When local midnight does not exist (a DST jump at 00:00) the first
/// valid hour of the day is used.
pub fn midnight<Tz: TimeZone>(date: NaiveDate, tz: &Tz) -> Option<DateTime<Tz>> {
    (0..=2)
        .map(|hour| date.and_time(NaiveTime::MIN) + Duration::hours(hour))
        .find_map(|candidate| tz.from_local_datetime(&candidate).earliest())
}

/// The calendar date of `at` as seen from `tz`.
pub fn local_date<Tz: TimeZone>(at: &DateTime<Utc>, tz: &Tz) -> NaiveDate {
    at.with_timezone(tz).date_naive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{FixedOffset, Timelike};

    #[test]
    fn test_parse_rfc3339() {
        let parsed = parse_timestamp("2024-03-10T15:30:00Z").unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap());

        let offset = parse_timestamp("2024-03-10T10:30:00-05:00").unwrap();
        assert_eq!(offset, parsed);
    }

    #[test]
    fn test_parse_naive_uses_zone() {
        let panama = FixedOffset::west_opt(5 * 3600).unwrap();
        let parsed = parse_timestamp_in("2024-03-10 10:30:00", &panama).unwrap();
        assert_eq!(parsed, Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap());

        let date_only = parse_timestamp_in("2024-03-10", &panama).unwrap();
        assert_eq!(date_only, Utc.with_ymd_and_hms(2024, 3, 10, 5, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(parse_timestamp("").is_none());
        assert!(parse_timestamp("yesterday").is_none());
        assert!(parse_timestamp("2024-13-40").is_none());
    }

    #[test]
    fn test_format_round_trips_subsecond() {
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap()
            + Duration::milliseconds(123);
        let text = format_timestamp(&at);
        assert_eq!(text, "2024-03-10T15:30:00.123Z");
        assert_eq!(parse_timestamp(&text), Some(at));

        let whole = Utc.with_ymd_and_hms(2024, 3, 10, 15, 30, 0).unwrap();
        assert_eq!(format_timestamp(&whole), "2024-03-10T15:30:00Z");
    }

    #[test]
    fn test_start_of_day_in_zone() {
        let panama = FixedOffset::west_opt(5 * 3600).unwrap();
        let now = panama.with_ymd_and_hms(2024, 3, 10, 1, 15, 0).unwrap();
        let start = start_of_day(&now);

        assert_eq!(start.date_naive(), now.date_naive());
        assert_eq!(start.hour(), 0);
        assert_eq!(start.minute(), 0);
        assert_eq!(start.with_timezone(&Utc).hour(), 5);
    }

    #[test]
    fn test_local_date_crosses_midnight() {
        let panama = FixedOffset::west_opt(5 * 3600).unwrap();
        // 02:00 UTC is still the previous evening in Panama
        let at = Utc.with_ymd_and_hms(2024, 3, 10, 2, 0, 0).unwrap();
        assert_eq!(local_date(&at, &panama), NaiveDate::from_ymd_opt(2024, 3, 9).unwrap());
        assert_eq!(local_date(&at, &Utc), NaiveDate::from_ymd_opt(2024, 3, 10).unwrap());
    }
}
