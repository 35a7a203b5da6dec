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

use crate::calendar::{
    add_months, clamp_to_grid_range, first_of_month, floor_to_hour, format_hour, format_month,
    hours_in_month,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize, Serializer};

/// Points in a canonical hourly series (two days ahead).
pub const HOURLY_POINTS: usize = 48;

/// Points in a canonical monthly series (one year ahead).
pub const MONTHLY_POINTS: usize = 12;

/// Upper plausibility bound for a single hourly value.
pub const HOURLY_VALUE_CEILING: f64 = 50.0;

/// Upper plausibility bound for the monthly value of the month containing `month`.
pub fn monthly_value_ceiling(month: DateTime<Utc>) -> f64 {
    24.0 * f64::from(hours_in_month(month))
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeSeriesPoint {
    pub timestamp: DateTime<Utc>,
    /// Energy per hour, never negative
    pub value: f64,
}

fn non_negative(value: f64) -> f64 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

/// Exactly [`HOURLY_POINTS`] points spaced one hour apart.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlySeries {
    points: Vec<TimeSeriesPoint>,
}

impl HourlySeries {
    /// Build the series on the hourly grid starting at `start` (floored to the hour).
    ///
    /// Starts too close to the end of chrono's range are pulled back by
    /// [`clamp_to_grid_range`].
    ///
    /// `value_at` receives the point index and its grid timestamp. Non-finite or negative
    /// values are stored as 0.
    pub fn from_fn(
        start: DateTime<Utc>,
        mut value_at: impl FnMut(usize, DateTime<Utc>) -> f64,
    ) -> Self {
        let start = floor_to_hour(clamp_to_grid_range(start));
        let points = (0..HOURLY_POINTS)
            .zip(0_i64..)
            .map(|(i, hours)| {
                let timestamp = start + Duration::hours(hours);
                TimeSeriesPoint {
                    timestamp,
                    value: non_negative(value_at(i, timestamp)),
                }
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.points[0].timestamp
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// Exactly [`MONTHLY_POINTS`] points, each at midnight on the first of a UTC month.
#[derive(Debug, Clone, PartialEq)]
pub struct MonthlySeries {
    points: Vec<TimeSeriesPoint>,
}

impl MonthlySeries {
    /// Build the series on the monthly grid starting at the month containing `start_month`
    /// (clamped like [`HourlySeries::from_fn`]).
    pub fn from_fn(
        start_month: DateTime<Utc>,
        mut value_at: impl FnMut(usize, DateTime<Utc>) -> f64,
    ) -> Self {
        let start = first_of_month(clamp_to_grid_range(start_month));
        let points = (0..MONTHLY_POINTS)
            .zip(0_u32..)
            .map(|(i, months)| {
                let timestamp = add_months(start, months);
                TimeSeriesPoint {
                    timestamp,
                    value: non_negative(value_at(i, timestamp)),
                }
            })
            .collect();
        Self { points }
    }

    pub fn points(&self) -> &[TimeSeriesPoint] {
        &self.points
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.points[0].timestamp
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[derive(Serialize)]
struct HourlyEntry {
    time: String,
    value: f64,
}

#[derive(Serialize)]
struct MonthlyEntry {
    month: String,
    value: f64,
}

impl Serialize for HourlySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points.iter().map(|p| HourlyEntry {
            time: format_hour(p.timestamp),
            value: p.value,
        }))
    }
}

impl Serialize for MonthlySeries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.points.iter().map(|p| MonthlyEntry {
            month: format_month(p.timestamp),
            value: p.value,
        }))
    }
}
