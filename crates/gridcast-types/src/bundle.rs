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

use crate::analysis::AnalysisSummary;
use crate::group::GroupKey;
use crate::series::{HOURLY_POINTS, HourlySeries, MonthlySeries, TimeSeriesPoint};
use serde::Serialize;
use std::collections::BTreeMap;

/// Complete per-group forecast handed to downstream consumers.
///
/// `hourly` and `monthly` hold exactly the keys in `groups`; `groups` keeps the order the
/// caller supplied so tabular exports can follow it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ForecastBundle {
    #[serde(skip)]
    groups: Vec<GroupKey>,
    #[serde(rename = "hourly_forecast_groups")]
    hourly: BTreeMap<GroupKey, HourlySeries>,
    #[serde(rename = "monthly_forecast_groups")]
    monthly: BTreeMap<GroupKey, MonthlySeries>,
    analysis: AnalysisSummary,
}

impl ForecastBundle {
    pub fn new(
        groups: Vec<GroupKey>,
        hourly: BTreeMap<GroupKey, HourlySeries>,
        monthly: BTreeMap<GroupKey, MonthlySeries>,
        analysis: AnalysisSummary,
    ) -> Self {
        debug_assert!(groups.iter().all(|g| hourly.contains_key(g) && monthly.contains_key(g)));
        Self {
            groups,
            hourly,
            monthly,
            analysis,
        }
    }

    pub fn groups(&self) -> &[GroupKey] {
        &self.groups
    }

    pub fn hourly(&self) -> &BTreeMap<GroupKey, HourlySeries> {
        &self.hourly
    }

    pub fn monthly(&self) -> &BTreeMap<GroupKey, MonthlySeries> {
        &self.monthly
    }

    pub fn analysis(&self) -> &AnalysisSummary {
        &self.analysis
    }

    pub fn hourly_for(&self, group: &str) -> Option<&HourlySeries> {
        self.hourly.get(group)
    }

    pub fn monthly_for(&self, group: &str) -> Option<&MonthlySeries> {
        self.monthly.get(group)
    }

    /// Per-hour mean across all groups, rounded to three decimals.
    ///
    /// Empty when the bundle holds no groups.
    pub fn mean_hourly(&self) -> Vec<TimeSeriesPoint> {
        let Some(first) = self.hourly.values().next() else {
            return Vec::new();
        };
        #[expect(clippy::cast_precision_loss)]
        let count = self.hourly.len() as f64;

        (0..HOURLY_POINTS)
            .map(|i| {
                let sum: f64 = self.hourly.values().map(|s| s.points()[i].value).sum();
                TimeSeriesPoint {
                    timestamp: first.points()[i].timestamp,
                    value: (sum / count * 1000.0).round() / 1000.0,
                }
            })
            .collect()
    }
}
