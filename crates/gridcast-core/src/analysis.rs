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

//! Repair the summary/drivers/recommendations block of a forecast response.

use crate::aliases::SchemaAliases;
use crate::normalize::normalize_hourly_points;
use crate::schema::series_points;
use crate::synthetic;
use crate::value::{to_display_string, to_number, truncate_chars};
use chrono::{DateTime, Utc};
use gridcast_types::analysis::{
    MAX_DRIVER_CHARS, MAX_LIST_ITEMS, MAX_RECOMMENDATION_CHARS, SUMMARY_VALUE_CEILING,
};
use gridcast_types::{AnalysisSummary, HourlySeries, SummaryStats};
use serde_json::{Map, Value};

fn bounded(value: Option<&Value>, max: f64) -> f64 {
    value.map_or(0.0, to_number).clamp(0.0, max)
}

fn peak_hour(stats: &Map<String, Value>) -> u8 {
    let raw = stats.get("peakHour").or_else(|| stats.get("peak_hour"));
    // Clamped to 0..=23 before the cast, so it always fits.
    #[expect(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let hour = bounded(raw, 23.0).round() as u8;
    hour
}

fn summary_stats(obj: &Map<String, Value>) -> SummaryStats {
    let Some(Value::Object(stats)) = obj.get("summary") else {
        return SummaryStats::default();
    };
    let mut summary = SummaryStats {
        avg: bounded(stats.get("avg"), SUMMARY_VALUE_CEILING),
        min: bounded(stats.get("min"), SUMMARY_VALUE_CEILING),
        max: bounded(stats.get("max"), SUMMARY_VALUE_CEILING),
        peak_hour: peak_hour(stats),
    };
    if summary.min > summary.avg {
        summary.min = summary.avg;
    }
    if summary.avg > summary.max {
        summary.max = summary.avg;
    }
    summary
}

fn string_list(value: Option<&Value>, max_chars: usize) -> Vec<String> {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .take(MAX_LIST_ITEMS)
            .map(|item| truncate_chars(&to_display_string(item), max_chars))
            .collect(),
        _ => Vec::new(),
    }
}

/// Clamp and repair a raw analysis block. Missing or non-object input gives the default summary.
pub fn sanitize(raw: Option<&Value>) -> AnalysisSummary {
    let Some(Value::Object(obj)) = raw else {
        return AnalysisSummary::default();
    };
    AnalysisSummary {
        summary: summary_stats(obj),
        drivers: string_list(obj.get("drivers"), MAX_DRIVER_CHARS),
        recommendations: string_list(obj.get("recommendations"), MAX_RECOMMENDATION_CHARS),
    }
}

/// [`sanitize`] plus the 48-point forecast preview carried in the analysis block.
///
/// The preview is read from the first `preview_keys` alias holding an array and fitted to the
/// hourly grid at `start`; without one it is fully synthetic.
pub fn sanitize_with_preview(
    raw: Option<&Value>,
    aliases: &SchemaAliases,
    start: DateTime<Utc>,
) -> (AnalysisSummary, HourlySeries) {
    let preview = raw
        .and_then(Value::as_object)
        .and_then(|obj| SchemaAliases::lookup(obj, &aliases.preview_keys))
        .filter(|v| v.is_array())
        .map_or_else(
            || synthetic::hourly_series(start, 0),
            |series| normalize_hourly_points(&series_points(series, aliases), start, 0).0,
        );
    (sanitize(raw), preview)
}
