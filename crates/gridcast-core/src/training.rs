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

//! Helpers over the consumption table a forecast is trained on.
//!
//! The table has one timestamp column and one column per group. Only its header and per-row
//! totals matter here; loading and storing the table is the caller's job.

use crate::error::Result;
use crate::groups::GroupKeys;
use crate::time::parse_datetime;
use chrono::Timelike;
use csv::StringRecord;
use serde::Serialize;
use std::io::Read;
use tracing::debug;

/// Header fragments that mark the timestamp column (case-insensitive).
const TIMESTAMP_MARKERS: &[&str] = &["measured", "time", "timestamp"];

/// `;` when the line contains one, `,` otherwise.
pub fn detect_delimiter(first_line: &str) -> u8 {
    if first_line.contains(';') { b';' } else { b',' }
}

/// Index of the timestamp column: the first header mentioning a timestamp marker, else column 0.
pub fn timestamp_column(headers: &StringRecord) -> usize {
    headers
        .iter()
        .position(|h| {
            let h = h.to_ascii_lowercase();
            TIMESTAMP_MARKERS.iter().any(|m| h.contains(m))
        })
        .unwrap_or(0)
}

/// Group keys from a table header: every column except the timestamp, at most `max_groups`.
pub fn group_keys_from_header(headers: &StringRecord, max_groups: usize) -> Result<GroupKeys> {
    let ts = timestamp_column(headers);
    GroupKeys::with_limit(
        headers
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != ts)
            .map(|(_, h)| h),
        max_groups,
    )
}

/// Read only the header row of a table.
pub fn read_header(reader: impl Read, delimiter: u8) -> Result<StringRecord> {
    let mut csv = csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .from_reader(reader);
    Ok(csv.headers()?.clone())
}

/// Cell as a number; decimal commas are accepted, anything unreadable is 0.
fn cell_value(cell: &str) -> f64 {
    let cell = cell.trim();
    if cell.is_empty() {
        return 0.0;
    }
    cell.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
        .unwrap_or(0.0)
}

/// Statistics over per-row totals (the sum of all group columns in a row).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ConsumptionAggregates {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    pub count: usize,
    /// Hour of day (UTC) with the highest average total
    #[serde(rename = "peakHour")]
    pub peak_hour: u8,
    /// Average total per hour of day (UTC); 0 for hours without rows
    #[serde(rename = "hourlyAvg")]
    pub hourly_avg: [f64; 24],
}

impl ConsumptionAggregates {
    /// Aggregate a delimited table. `None` when it has no data rows.
    pub fn from_reader(reader: impl Read, delimiter: u8) -> Result<Option<Self>> {
        let mut csv = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .flexible(true)
            .from_reader(reader);
        let ts = timestamp_column(csv.headers()?);

        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        let mut count = 0_usize;
        let mut hourly_sum = [0.0_f64; 24];
        let mut hourly_count = [0_u32; 24];

        for record in csv.records() {
            let record = record?;
            let total: f64 = record
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != ts)
                .map(|(_, cell)| cell_value(cell))
                .sum();

            sum += total;
            min = min.min(total);
            max = max.max(total);
            count += 1;

            if let Some(at) = record.get(ts).and_then(parse_datetime) {
                let hour = at.hour() as usize;
                hourly_sum[hour] += total;
                hourly_count[hour] += 1;
            }
        }

        if count == 0 {
            return Ok(None);
        }

        let mut hourly_avg = [0.0; 24];
        for (avg, (sum, n)) in hourly_avg
            .iter_mut()
            .zip(hourly_sum.iter().zip(hourly_count.iter()))
        {
            if *n > 0 {
                *avg = sum / f64::from(*n);
            }
        }

        // First hour wins on ties.
        let peak_hour = hourly_avg
            .iter()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (h, &v)| {
                if v > best.1 { (h, v) } else { best }
            })
            .0;

        #[expect(clippy::cast_precision_loss)]
        let avg = sum / count as f64;
        debug!(rows = count, peak_hour, "computed consumption aggregates");

        Ok(Some(Self {
            avg,
            min,
            max,
            count,
            peak_hour: u8::try_from(peak_hour).unwrap_or(0),
            hourly_avg,
        }))
    }
}
