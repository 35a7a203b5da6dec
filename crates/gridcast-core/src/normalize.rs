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

//! Fit raw per-group points onto the fixed hourly and monthly grids.

use crate::schema::{PointTime, RawGroupSeries, RawPoint};
use crate::synthetic;
use crate::time::{canonicalize_hour, canonicalize_month};
use chrono::{DateTime, Utc};
use gridcast_types::series::{HOURLY_VALUE_CEILING, monthly_value_ceiling};
use gridcast_types::{GroupKey, HOURLY_POINTS, HourlySeries, MONTHLY_POINTS, MonthlySeries};
use std::collections::BTreeMap;
use tracing::debug;

/// Value of a raw point if it is usable, clamped into `[0, ceiling]`.
fn accepted_value(
    point: &RawPoint,
    canonicalize: fn(&str) -> Option<DateTime<Utc>>,
    ceiling: f64,
) -> Option<f64> {
    let timestamp_ok = match &point.time {
        PointTime::Text(text) => canonicalize(text).is_some(),
        PointTime::Sequential => true,
        PointTime::Missing => false,
    };
    if !timestamp_ok {
        return None;
    }
    point.value.map(|v| {
        if v.is_finite() && v > 0.0 {
            v.min(ceiling)
        } else {
            0.0
        }
    })
}

/// One hourly series on the grid at `start`, and how many points had to be synthesized.
pub fn normalize_hourly_points(
    points: &[RawPoint],
    start: DateTime<Utc>,
    group_index: usize,
) -> (HourlySeries, usize) {
    let mut synthesized = 0;
    let series = HourlySeries::from_fn(start, |i, _| {
        points
            .get(i)
            .and_then(|p| accepted_value(p, canonicalize_hour, HOURLY_VALUE_CEILING))
            .unwrap_or_else(|| {
                synthesized += 1;
                synthetic::hourly_value(i, start, group_index)
            })
    });
    (series, synthesized)
}

/// One monthly series on the grid at `start_month`, and how many points had to be synthesized.
pub fn normalize_monthly_points(
    points: &[RawPoint],
    start_month: DateTime<Utc>,
    group_index: usize,
) -> (MonthlySeries, usize) {
    let mut synthesized = 0;
    let series = MonthlySeries::from_fn(start_month, |i, month| {
        points
            .get(i)
            .and_then(|p| accepted_value(p, canonicalize_month, monthly_value_ceiling(month)))
            .unwrap_or_else(|| {
                synthesized += 1;
                synthetic::monthly_value(i, start_month, group_index)
            })
    });
    (series, synthesized)
}

fn raw_points<'a>(raw: Option<&'a RawGroupSeries>, key: &GroupKey) -> &'a [RawPoint] {
    raw.and_then(|r| r.get(key)).map_or(&[], Vec::as_slice)
}

/// Complete hourly series for every key in `group_keys`.
pub fn normalize_hourly(
    raw: Option<&RawGroupSeries>,
    group_keys: &[GroupKey],
    start: DateTime<Utc>,
) -> BTreeMap<GroupKey, HourlySeries> {
    let mut total_synthesized = 0;
    let out = group_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let (series, synthesized) =
                normalize_hourly_points(raw_points(raw, key), start, index);
            total_synthesized += synthesized;
            (key.clone(), series)
        })
        .collect();
    debug!(
        groups = group_keys.len(),
        synthesized = total_synthesized,
        "normalized hourly series"
    );
    out
}

/// Complete monthly series for every key in `group_keys`.
pub fn normalize_monthly(
    raw: Option<&RawGroupSeries>,
    group_keys: &[GroupKey],
    start_month: DateTime<Utc>,
) -> BTreeMap<GroupKey, MonthlySeries> {
    let mut total_synthesized = 0;
    let out = group_keys
        .iter()
        .enumerate()
        .map(|(index, key)| {
            let (series, synthesized) =
                normalize_monthly_points(raw_points(raw, key), start_month, index);
            total_synthesized += synthesized;
            (key.clone(), series)
        })
        .collect();
    debug!(
        groups = group_keys.len(),
        synthesized = total_synthesized,
        "normalized monthly series"
    );
    out
}
