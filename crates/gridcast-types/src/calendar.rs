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

//! UTC calendar helpers shared by the series constructors and the core pipeline.

use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Timelike, Utc};

/// Room kept before the end of chrono's range so a full hourly and monthly grid still fits.
const GRID_HEADROOM_DAYS: i64 = 400;

/// Latest instant a forecast grid may start at.
pub fn latest_grid_start() -> DateTime<Utc> {
    DateTime::<Utc>::MAX_UTC - Duration::days(GRID_HEADROOM_DAYS)
}

/// Pull `at` back far enough that 48 hours and 13 calendar months after it are representable.
pub fn clamp_to_grid_range(at: DateTime<Utc>) -> DateTime<Utc> {
    at.min(latest_grid_start())
}

/// Drop minutes, seconds and sub-second precision.
pub fn floor_to_hour(at: DateTime<Utc>) -> DateTime<Utc> {
    at.with_nanosecond(0)
        .and_then(|t| t.with_second(0))
        .and_then(|t| t.with_minute(0))
        .unwrap_or(at)
}

/// Midnight on the first day of the UTC month containing `at`.
pub fn first_of_month(at: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(at.year(), at.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(at)
}

/// Midnight on the first day of the UTC month following `at`.
pub fn first_of_next_month(at: DateTime<Utc>) -> DateTime<Utc> {
    add_months(first_of_month(at), 1)
}

/// Shift by whole calendar months. Saturates at the end of chrono's representable range.
pub fn add_months(at: DateTime<Utc>, months: u32) -> DateTime<Utc> {
    at.checked_add_months(Months::new(months)).unwrap_or(at)
}

pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };
    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|d| d.pred_opt())
        .map_or(31, |d| d.day())
}

/// Exact number of hours in the UTC calendar month containing `at` (672..=744).
pub fn hours_in_month(at: DateTime<Utc>) -> u32 {
    days_in_month(at.year(), at.month()) * 24
}

/// `YYYY-MM-DDTHH:00:00Z`
pub fn format_hour(at: DateTime<Utc>) -> String {
    floor_to_hour(at).format("%Y-%m-%dT%H:00:00Z").to_string()
}

/// `YYYY-MM-01T00:00:00Z`
pub fn format_month(at: DateTime<Utc>) -> String {
    first_of_month(at).format("%Y-%m-01T00:00:00Z").to_string()
}
