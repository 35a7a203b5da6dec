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

//! Deterministic closed-form load curves.
//!
//! Used both for the full fallback forecast and to fill individual gaps. The coefficients only
//! give a plausible diurnal/seasonal shape; what matters is that equal inputs always produce
//! bit-identical output.

use crate::time::{add_months, clamp_to_grid_range, first_of_month, hours_in_month};
use chrono::{DateTime, Datelike, Timelike, Utc};
use gridcast_types::series::{HOURLY_VALUE_CEILING, monthly_value_ceiling};
use gridcast_types::{HourlySeries, MonthlySeries};
use std::f64::consts::PI;

/// Baseline hourly load (energy per hour)
const BASE_LOAD: f64 = 2.0;
/// Amplitude of the daily sine swing
const DIURNAL_AMPLITUDE: f64 = 1.0;
/// Amplitude of the yearly cosine swing (peaks in January)
const SEASONAL_AMPLITUDE: f64 = 0.3;
/// Per-group offset so otherwise identical synthetic groups stay distinguishable
const GROUP_OFFSET_STEP: f64 = 0.02;

fn group_offset(group_index: usize) -> f64 {
    #[expect(clippy::cast_precision_loss)]
    let index = group_index as f64;
    GROUP_OFFSET_STEP * index
}

/// Synthetic value for the hour `hour_offset` hours after `start`.
pub fn hourly_value(hour_offset: usize, start: DateTime<Utc>, group_index: usize) -> f64 {
    let shift = u32::try_from(hour_offset % 24).unwrap_or(0);
    let hour = (clamp_to_grid_range(start).hour() + shift) % 24;
    let diurnal = (2.0 * PI * f64::from(hour) / 24.0).sin();
    (BASE_LOAD + DIURNAL_AMPLITUDE * diurnal + group_offset(group_index))
        .clamp(0.0, HOURLY_VALUE_CEILING)
}

/// Synthetic total for the month `month_offset` months after the month of `start_month`.
pub fn monthly_value(month_offset: usize, start_month: DateTime<Utc>, group_index: usize) -> f64 {
    let month = add_months(
        first_of_month(clamp_to_grid_range(start_month)),
        u32::try_from(month_offset).unwrap_or(u32::MAX),
    );
    let seasonal = (2.0 * PI * f64::from(month.month0()) / 12.0).cos();
    let per_hour =
        (BASE_LOAD + SEASONAL_AMPLITUDE * seasonal + group_offset(group_index)).max(0.0);
    (f64::from(hours_in_month(month)) * per_hour).min(monthly_value_ceiling(month))
}

/// Fully synthetic hourly series for one group.
pub fn hourly_series(start: DateTime<Utc>, group_index: usize) -> HourlySeries {
    HourlySeries::from_fn(start, |i, _| hourly_value(i, start, group_index))
}

/// Fully synthetic monthly series for one group.
pub fn monthly_series(start_month: DateTime<Utc>, group_index: usize) -> MonthlySeries {
    MonthlySeries::from_fn(start_month, |i, _| {
        monthly_value(i, start_month, group_index)
    })
}
