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

use chrono::{DateTime, Datelike, Duration, TimeZone, Timelike, Utc};
use gridcast_core::synthetic;
use gridcast_core::time::hours_in_month;
use gridcast_core::{ForecastBundle, ForecastPipeline, GroupKey, GroupKeys, run};
use serde_json::json;

fn start() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
}

fn keys(names: &[&str]) -> Vec<GroupKey> {
    GroupKeys::new(names.iter().copied()).unwrap().into_inner()
}

const AWKWARD_RESPONSES: &[&str] = &[
    "",
    "   ",
    "null",
    "42",
    "\"just a string\"",
    "[]",
    "{}",
    "{",
    "}{",
    "```json\n{\"hourly\": \n```",
    "Sorry, I can't produce a forecast right now.",
    r#"{"hourly_forecast_groups": null, "monthly_forecast_groups": "soon"}"#,
    r#"{"hourly_forecast_groups": {"a": "n/a", "b": [null, {}, [], "x"]}}"#,
    r#"{"hourly_forecast_groups": {"a": [{"time": "yesterday", "value": -5}]}}"#,
    r#"{"hourlyGroups": [{"group": "a", "data": [1e308, -1e308, "NaN", true]}]}"#,
    r#"{"monthly": {"a": [{"month": "2025-02", "value": 99999999}]}}"#,
    r#"{"analysis": {"summary": {"avg": "lots", "min": {}, "max": [1], "peakHour": -1}}}"#,
    r#"{"data": {"data": {"data": {"hourly": {"a": [1]}}}}}"#,
    r#"{"candidates": [{"content": {"parts": [{"text": "no json here"}]}}]}"#,
];

fn assert_complete(bundle: &ForecastBundle, keys: &[GroupKey]) {
    assert_eq!(bundle.hourly().len(), keys.len());
    assert_eq!(bundle.monthly().len(), keys.len());
    for key in keys {
        let hourly = bundle.hourly_for(key.as_str()).unwrap();
        let monthly = bundle.monthly_for(key.as_str()).unwrap();
        assert_eq!(hourly.len(), 48, "hourly length for {key}");
        assert_eq!(monthly.len(), 12, "monthly length for {key}");
    }
}

fn assert_grid_and_bounds(bundle: &ForecastBundle) {
    for series in bundle.hourly().values() {
        let points = series.points();
        assert_eq!(points[0].timestamp.minute(), 0);
        assert_eq!(points[0].timestamp.second(), 0);
        for pair in points.windows(2) {
            assert_eq!(pair[1].timestamp - pair[0].timestamp, Duration::hours(1));
        }
        assert!(series.values().all(|v| (0.0..=50.0).contains(&v)));
    }
    for series in bundle.monthly().values() {
        let points = series.points();
        for point in points {
            assert_eq!(point.timestamp.day(), 1);
            assert_eq!(point.timestamp.hour(), 0);
            let ceiling = 24.0 * f64::from(hours_in_month(point.timestamp));
            assert!((0.0..=ceiling).contains(&point.value));
        }
        for pair in points.windows(2) {
            let (a, b) = (pair[0].timestamp, pair[1].timestamp);
            let index = |at: DateTime<Utc>| i64::from(at.year()) * 12 + i64::from(at.month());
            assert_eq!(index(b) - index(a), 1);
        }
    }
}

#[test]
fn test_completeness_for_awkward_responses() {
    let keys = keys(&["a", "b", "c"]);
    for response in AWKWARD_RESPONSES.iter().copied() {
        let bundle = run(Some(response), &keys, start());
        assert_complete(&bundle, &keys);
        assert_grid_and_bounds(&bundle);
        assert!(bundle.analysis().is_ordered(), "summary order for {response:?}");
    }
}

#[test]
fn test_completeness_without_response() {
    let keys = keys(&["28", "29", "30", "36"]);
    let bundle = run(None, &keys, Utc.with_ymd_and_hms(2024, 2, 28, 22, 17, 5).unwrap());
    assert_complete(&bundle, &keys);
    assert_grid_and_bounds(&bundle);
}

#[test]
fn test_completeness_at_end_of_time_range() {
    let keys = keys(&["a", "b"]);
    for response in [None, Some("{}")] {
        let bundle = run(response, &keys, DateTime::<Utc>::MAX_UTC);
        assert_complete(&bundle, &keys);
        assert_grid_and_bounds(&bundle);
    }
}

#[test]
fn test_synthesis_is_deterministic() {
    let keys = keys(&["a", "b"]);
    let first = run(None, &keys, start());
    let second = run(None, &keys, start());
    assert_eq!(first, second);
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn test_partial_preservation() {
    let keys = keys(&["a", "b"]);
    let response = json!({
        "hourly_forecast_groups": {"a": [{"time": "2025-01-01T00:00:00Z", "value": 3}]}
    })
    .to_string();
    let bundle = run(Some(&response), &keys, start());

    let a = bundle.hourly_for("a").unwrap();
    assert_eq!(a.points()[0].value, 3.0);
    assert_eq!(a.points()[0].timestamp, start());
    for (i, point) in a.points().iter().enumerate().skip(1) {
        assert_eq!(point.value, synthetic::hourly_value(i, start(), 0));
    }

    assert_eq!(bundle.hourly_for("b").unwrap(), &synthetic::hourly_series(start(), 1));
}

#[test]
fn test_alias_equivalence() {
    let keys = keys(&["a"]);
    let series = json!([{"time": "2025-01-01T00:00:00Z", "value": 4.5}]);
    let aliases = ["hourly_forecast_groups", "hourlyForecastGroups", "hourlyGroups"];
    let bundles: Vec<ForecastBundle> = aliases
        .iter()
        .map(|alias| {
            let response = format!(r#"{{"{alias}": {{"a": {series}}}}}"#);
            run(Some(&response), &keys, start())
        })
        .collect();
    assert_eq!(bundles[0], bundles[1]);
    assert_eq!(bundles[1], bundles[2]);
    assert_eq!(bundles[0].hourly_for("a").unwrap().points()[0].value, 4.5);
}

#[test]
fn test_bare_series_is_shared() {
    let keys = keys(&["a", "b", "c"]);
    let response = json!([
        {"time": "2025-01-01T00:00:00Z", "value": 1.5},
        {"time": "2025-01-01T01:00:00Z", "value": 2.5}
    ])
    .to_string();
    let bundle = run(Some(&response), &keys, start());
    for key in &keys {
        let series = bundle.hourly_for(key.as_str()).unwrap();
        let values: Vec<f64> = series.values().take(2).collect();
        assert_eq!(values, vec![1.5, 2.5]);
    }
}

#[test]
fn test_bare_series_with_point_ids() {
    let keys = keys(&["a", "b"]);
    let response = json!([
        {"id": 1, "time": "2025-01-01T00:00:00Z", "value": 4},
        {"id": 2, "time": "2025-01-01T01:00:00Z", "value": 5}
    ])
    .to_string();
    let bundle = run(Some(&response), &keys, start());
    for key in &keys {
        let series = bundle.hourly_for(key.as_str()).unwrap();
        let values: Vec<f64> = series.values().take(2).collect();
        assert_eq!(values, vec![4.0, 5.0]);
    }
}

#[test]
fn test_salvage_from_unknown_structure() {
    let keys = keys(&["a", "b"]);
    let response = r#"Here you go:
{"status": "ok", "payload": {"points": [{"timestamp": "2025-01-01T00:00:00Z", "val": 6}]}}
Let me know if you need anything else."#;
    let bundle = run(Some(response), &keys, start());
    assert_eq!(bundle.hourly_for("a").unwrap().points()[0].value, 6.0);
    assert_eq!(bundle.hourly_for("b").unwrap().points()[0].value, 6.0);
}

#[test]
fn test_fenced_and_wrapped_response() {
    let keys = keys(&["28", "29"]);
    let body = json!({
        "result": {
            "hourlyForecast": [{"group": 28, "data": [5, 6]}],
            "monthlyForecast": {"29": [{"month": "2025-02-01T00:00:00Z", "value": 1500}]}
        },
        "analysis": {"drivers": ["cold snap"]}
    });
    let response = format!("Forecast below.\n```json\n{body}\n```");
    let bundle = run(Some(&response), &keys, start());

    let hourly: Vec<f64> = bundle.hourly_for("28").unwrap().values().take(2).collect();
    assert_eq!(hourly, vec![5.0, 6.0]);
    assert_eq!(bundle.monthly_for("29").unwrap().points()[0].value, 1500.0);
    assert_eq!(bundle.analysis().drivers, vec!["cold snap".to_owned()]);
}

#[test]
fn test_provider_envelope() {
    let keys = keys(&["a"]);
    let body = json!({
        "hourly_forecast_groups": {"a": [2, 3]},
        "analysis": {"summary": {"avg": 2.5, "min": 2, "max": 3, "peakHour": 1}}
    });
    let inner = format!("```json\n{body}\n```");
    let envelope = json!({
        "candidates": [{"content": {"parts": [{"text": inner}]}}]
    })
    .to_string();
    let bundle = run(Some(&envelope), &keys, start());
    let values: Vec<f64> = bundle.hourly_for("a").unwrap().values().take(2).collect();
    assert_eq!(values, vec![2.0, 3.0]);
    assert_eq!(bundle.analysis().summary.peak_hour, 1);
}

#[test]
fn test_legacy_generated_series() {
    let keys = keys(&["a", "b"]);
    let response = json!({
        "generated": [{"time": "2025-01-01T00:00:00Z", "value": 8}],
        "summary": {"avg": 8, "min": 8, "max": 8, "peakHour": 0}
    })
    .to_string();
    let bundle = run(Some(&response), &keys, start());
    assert_eq!(bundle.hourly_for("a").unwrap().points()[0].value, 8.0);
    assert_eq!(bundle.hourly_for("b").unwrap().points()[0].value, 8.0);
    assert_eq!(bundle.analysis().summary.avg, 8.0);
}

#[test]
fn test_wire_shape() {
    let keys = keys(&["a"]);
    let bundle = ForecastPipeline::default().run(None, &keys, start());
    let json = serde_json::to_value(&bundle).unwrap();

    let hourly = json["hourly_forecast_groups"]["a"].as_array().unwrap();
    assert_eq!(hourly.len(), 48);
    assert_eq!(hourly[0]["time"], "2025-01-01T00:00:00Z");
    assert_eq!(hourly[47]["time"], "2025-01-02T23:00:00Z");

    let monthly = json["monthly_forecast_groups"]["a"].as_array().unwrap();
    assert_eq!(monthly.len(), 12);
    assert_eq!(monthly[0]["month"], "2025-02-01T00:00:00Z");
    assert_eq!(monthly[11]["month"], "2026-01-01T00:00:00Z");

    assert_eq!(json["analysis"]["summary"]["peakHour"], 0);
    assert!(json["analysis"]["drivers"].as_array().unwrap().is_empty());
}

#[test]
fn test_mean_hourly_across_groups() {
    let keys = keys(&["a", "b"]);
    let response = r#"{"hourly": {"a": [1, 2], "b": [3, 4]}}"#;
    let bundle = run(Some(response), &keys, start());
    let mean = bundle.mean_hourly();
    assert_eq!(mean.len(), 48);
    assert_eq!(mean[0].value, 2.0);
    assert_eq!(mean[1].value, 3.0);
    assert_eq!(mean[0].timestamp, start());
}
