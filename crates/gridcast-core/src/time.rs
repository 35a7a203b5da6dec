// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridCast.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

//! Lenient timestamp parsing and snapping to the canonical hourly/monthly grid.
//!
//! Parse failures are reported as `None`; callers treat that as a missing point.

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};

pub use gridcast_types::calendar::{
    add_months, clamp_to_grid_range, days_in_month, first_of_month, first_of_next_month,
    floor_to_hour, format_hour, format_month, hours_in_month, latest_grid_start,
};

/// Naive layouts, interpreted as UTC. `%.f` accepts an optional fraction.
const NAIVE_DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%Y/%m/%d %H:%M:%S%.f",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%dT%H:%M:%S%.f",
];

const NAIVE_DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d"];

/// Parse a date-like string into a UTC instant.
pub fn parse_datetime(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if s.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(s) {
        return Some(dt.with_timezone(&Utc));
    }

    // "2025-01-01T10:00Z" and similar: a zulu suffix on an otherwise naive layout.
    let naive = s
        .strip_suffix('Z')
        .or_else(|| s.strip_suffix('z'))
        .unwrap_or(s);

    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(naive, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }
    for format in NAIVE_DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(naive, format) {
            return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
        }
    }

    // Year-month only, e.g. "2025-02"
    if naive.len() == 7 {
        if let Ok(date) = NaiveDate::parse_from_str(&format!("{naive}-01"), "%Y-%m-%d") {
            return date.and_hms_opt(0, 0, 0).map(|ndt| ndt.and_utc());
        }
    }

    None
}

/// Parse and snap to the start of the UTC hour.
pub fn canonicalize_hour(input: &str) -> Option<DateTime<Utc>> {
    parse_datetime(input).map(floor_to_hour)
}

/// Parse and snap to midnight on the first of the UTC month.
pub fn canonicalize_month(input: &str) -> Option<DateTime<Utc>> {
    parse_datetime(input).map(first_of_month)
}

/// Parse a caller-supplied start: epoch milliseconds or any format [`parse_datetime`] accepts.
pub fn parse_start(input: &str) -> Option<DateTime<Utc>> {
    let s = input.trim();
    if let Ok(ms) = s.parse::<i64>() {
        return (ms > 0)
            .then(|| DateTime::from_timestamp_millis(ms))
            .flatten();
    }
    parse_datetime(s)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn utc(y: i32, m: u32, d: u32, h: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(y, m, d, h, 0, 0).unwrap()
    }

    #[test]
    fn test_canonicalize_hour_variants() {
        let expected = utc(2025, 1, 1, 10);
        for input in [
            "2025-01-01T10:00:00Z",
            "2025-01-01T10:37:12.345Z",
            "2025-01-01T12:37:00+02:00",
            "2025-01-01T10:59",
            "2025-01-01T10:15Z",
            "2025-01-01 10:05:00",
            "2025/01/01 10:05",
            "Wed, 01 Jan 2025 10:20:00 +0000",
            "  2025-01-01T10:00:00Z  ",
        ] {
            assert_eq!(canonicalize_hour(input), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn test_canonicalize_hour_date_only() {
        assert_eq!(canonicalize_hour("2025-03-09"), Some(utc(2025, 3, 9, 0)));
    }

    #[test]
    fn test_canonicalize_month() {
        let expected = utc(2025, 2, 1, 0);
        for input in ["2025-02-01T00:00:00Z", "2025-02-17T13:45:00Z", "2025-02", "2025-02-28"] {
            assert_eq!(canonicalize_month(input), Some(expected), "input {input:?}");
        }
    }

    #[test]
    fn test_garbage_is_missing() {
        for input in ["", "   ", "tomorrow", "2025-13-01", "2025-02-30", "12:00", "NaN"] {
            assert_eq!(canonicalize_hour(input), None, "input {input:?}");
            assert_eq!(canonicalize_month(input), None, "input {input:?}");
        }
    }

    #[test]
    fn test_parse_start() {
        assert_eq!(parse_start("1735725600000"), Some(utc(2025, 1, 1, 10)));
        assert_eq!(parse_start("2025-01-01T10:00:00Z"), Some(utc(2025, 1, 1, 10)));
        assert_eq!(parse_start("-5"), None);
        assert_eq!(parse_start("soon"), None);
    }
}
