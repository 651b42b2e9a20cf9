// ── Timestamp wire format ──
//
// Written as RFC 3339 in UTC with as many fractional digits as needed,
// so a value read back compares equal to the one written. Older stores
// carry naive local timestamps without an offset; those are read as UTC.

use chrono::{DateTime, Datelike, NaiveDateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serializer};

/// Last year RFC 3339 can spell; later dates would not read back.
pub const MAX_YEAR: i32 = 9999;

/// Whether `ts` survives a write and read through the store format.
pub fn is_storable(ts: &DateTime<Utc>) -> bool {
    (0..=MAX_YEAR).contains(&ts.year())
}

/// Format a timestamp the way the ticket store writes it.
pub fn format(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::AutoSi, true)
}

/// Parse an ISO-8601 timestamp, with or without a UTC offset.
pub fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(ts) => Ok(ts.with_timezone(&Utc)),
        Err(err) => raw
            .parse::<NaiveDateTime>()
            .map(|naive| naive.and_utc())
            .map_err(|_| err),
    }
}

pub fn serialize<S: Serializer>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&format(ts))
}

pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
    let raw = String::deserialize(deserializer)?;
    parse(&raw).map_err(|e| serde::de::Error::custom(format!("invalid timestamp '{raw}': {e}")))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn whole_seconds_format_without_fraction() {
        let ts = Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap();
        assert_eq!(format(&ts), "2026-01-01T08:00:00Z");
    }

    #[test]
    fn subsecond_precision_survives_a_round_trip() {
        let ts = Utc.timestamp_opt(1_767_254_400, 123_456_789).unwrap();
        assert_eq!(parse(&format(&ts)).unwrap(), ts);
    }

    #[test]
    fn offsets_are_normalized_to_utc() {
        let ts = parse("2026-01-01T11:00:00+03:00").unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2026, 1, 1, 8, 0, 0).unwrap());
    }

    #[test]
    fn naive_timestamps_are_read_as_utc() {
        let ts = parse("2025-05-14T09:30:15.250000").unwrap();
        assert_eq!(format(&ts), "2025-05-14T09:30:15.250Z");
    }

    #[test]
    fn five_digit_years_are_not_storable() {
        let last = Utc.with_ymd_and_hms(MAX_YEAR, 12, 31, 23, 59, 59).unwrap();
        assert!(is_storable(&last));
        assert_eq!(parse(&format(&last)).unwrap(), last);

        let beyond = Utc.with_ymd_and_hms(MAX_YEAR + 1, 1, 1, 0, 0, 0).unwrap();
        assert!(!is_storable(&beyond));
    }

    #[test]
    fn garbage_is_rejected() {
        assert!(parse("yesterday").is_err());
    }
}
