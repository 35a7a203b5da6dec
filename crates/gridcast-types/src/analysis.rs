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

use serde::{Deserialize, Serialize};

/// Maximum number of drivers or recommendations kept in a summary.
pub const MAX_LIST_ITEMS: usize = 8;
pub const MAX_DRIVER_CHARS: usize = 80;
pub const MAX_RECOMMENDATION_CHARS: usize = 120;
/// Upper bound for `avg`, `min` and `max`.
pub const SUMMARY_VALUE_CEILING: f64 = 100_000.0;

/// Headline statistics of a forecast.
///
/// Invariant after sanitization: `min <= avg <= max` and `peak_hour` in `0..=23`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SummaryStats {
    pub avg: f64,
    pub min: f64,
    pub max: f64,
    #[serde(rename = "peakHour")]
    pub peak_hour: u8,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AnalysisSummary {
    pub summary: SummaryStats,
    pub drivers: Vec<String>,
    pub recommendations: Vec<String>,
}

impl AnalysisSummary {
    pub fn is_ordered(&self) -> bool {
        let s = &self.summary;
        s.min <= s.avg && s.avg <= s.max && s.peak_hour <= 23
    }
}
