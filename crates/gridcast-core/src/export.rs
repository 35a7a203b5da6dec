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

//! Semicolon-separated tables of a forecast bundle, one column per group.
//!
//! Values use three decimals and a decimal comma, the layout the consumption spreadsheets use.

use crate::error::{GridcastError, Result};
use crate::time::{format_hour, format_month};
use chrono::{DateTime, Utc};
use gridcast_types::{ForecastBundle, TimeSeriesPoint};

pub const TIMESTAMP_HEADER: &str = "measured_at";
pub const DELIMITER: u8 = b';';

/// `1234.5` → `"1234,500"`
pub fn format_value(value: f64) -> String {
    format!("{value:.3}").replace('.', ",")
}

fn write_table<'a>(
    groups: impl Iterator<Item = (&'a str, &'a [TimeSeriesPoint])>,
    format_time: fn(DateTime<Utc>) -> String,
) -> Result<String> {
    let (names, columns): (Vec<&str>, Vec<&[TimeSeriesPoint]>) = groups.unzip();

    let mut writer = csv::WriterBuilder::new()
        .delimiter(DELIMITER)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    writer.write_record(std::iter::once(TIMESTAMP_HEADER).chain(names.iter().copied()))?;

    let rows = columns.first().map_or(0, |c| c.len());
    for i in 0..rows {
        let mut record = Vec::with_capacity(columns.len() + 1);
        record.push(format_time(columns[0][i].timestamp));
        record.extend(
            columns
                .iter()
                .map(|c| c.get(i).map_or_else(String::new, |p| format_value(p.value))),
        );
        writer.write_record(&record)?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| GridcastError::Export(e.to_string()))?;
    Ok(String::from_utf8(bytes)?)
}

/// Hourly table: 48 rows, groups in the bundle's caller order.
pub fn hourly_csv(bundle: &ForecastBundle) -> Result<String> {
    write_table(
        bundle.groups().iter().filter_map(|key| {
            bundle
                .hourly_for(key.as_str())
                .map(|series| (key.as_str(), series.points()))
        }),
        format_hour,
    )
}

/// Monthly table: 12 rows, groups in the bundle's caller order.
pub fn monthly_csv(bundle: &ForecastBundle) -> Result<String> {
    write_table(
        bundle.groups().iter().filter_map(|key| {
            bundle
                .monthly_for(key.as_str())
                .map(|series| (key.as_str(), series.points()))
        }),
        format_month,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ForecastPipeline;
    use chrono::TimeZone;
    use gridcast_types::GroupKey;

    fn bundle() -> ForecastBundle {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let keys = vec![GroupKey::from("30"), GroupKey::from("28")];
        ForecastPipeline::default().run(
            Some(concat!(
                r#"{"hourly_forecast_groups": {"28": "#,
                r#"[{"time": "2025-01-01T00:00:00Z", "value": 1.23456}]}}"#,
            )),
            &keys,
            start,
        )
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1234.5), "1234,500");
        assert_eq!(format_value(0.0), "0,000");
        assert_eq!(format_value(1.23456), "1,235");
    }

    #[test]
    fn test_hourly_table() {
        let csv = hourly_csv(&bundle()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 49);
        assert_eq!(lines[0], "measured_at;30;28");
        assert!(lines[1].starts_with("2025-01-01T00:00:00Z;"));
        assert!(lines[1].ends_with(";1,235"));
        assert!(lines[48].starts_with("2025-01-02T23:00:00Z;"));
    }

    #[test]
    fn test_monthly_table() {
        let csv = monthly_csv(&bundle()).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines.len(), 13);
        assert_eq!(lines[0], "measured_at;30;28");
        assert!(lines[1].starts_with("2025-02-01T00:00:00Z;"));
        assert!(lines[12].starts_with("2026-01-01T00:00:00Z;"));
        assert!(lines[1..].iter().all(|l| l.split(';').count() == 3));
    }
}
