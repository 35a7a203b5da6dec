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

//! Accepted field names for the loosely specified forecast response schema.
//!
//! Model replies drift between snake_case and camelCase and wrap their payload in assorted
//! envelopes, so every name the unwrapper looks for is data here rather than code. Lists are
//! searched in order and the first present, non-null entry wins.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn owned(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| (*n).to_owned()).collect()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaAliases {
    /// Keys whose object value may hold the real payload one level down
    pub wrapper_keys: Vec<String>,
    /// Key fragments that mark an object as forecast-shaped (case-insensitive substring match)
    pub forecast_key_fragments: Vec<String>,
    pub hourly_keys: Vec<String>,
    pub monthly_keys: Vec<String>,
    pub analysis_keys: Vec<String>,
    /// Keys that make an object look like an analysis block itself
    pub analysis_marker_keys: Vec<String>,
    /// Legacy single-series keys applied to every group
    pub shared_series_keys: Vec<String>,
    /// Keys inside an analysis block holding a preview forecast
    pub preview_keys: Vec<String>,
    pub group_id_keys: Vec<String>,
    pub group_data_keys: Vec<String>,
    pub time_keys: Vec<String>,
    pub value_keys: Vec<String>,
}

impl Default for SchemaAliases {
    fn default() -> Self {
        Self {
            wrapper_keys: owned(&["data", "result", "output", "response"]),
            forecast_key_fragments: owned(&["hourly", "monthly", "analysis", "generated"]),
            hourly_keys: owned(&[
                "hourly_forecast_groups",
                "hourlyForecastGroups",
                "hourly_forecast",
                "hourlyForecast",
                "hourly_groups",
                "hourlyGroups",
                "hourly",
                "forecast_hourly",
                "forecastHourly",
            ]),
            monthly_keys: owned(&[
                "monthly_forecast_groups",
                "monthlyForecastGroups",
                "monthly_forecast",
                "monthlyForecast",
                "monthly_groups",
                "monthlyGroups",
                "monthly",
                "forecast_monthly",
                "forecastMonthly",
            ]),
            analysis_keys: owned(&["analysis", "analysis_result", "analysisResult"]),
            analysis_marker_keys: owned(&["summary", "drivers", "recommendations"]),
            shared_series_keys: owned(&["generated"]),
            preview_keys: owned(&["generated_forecast", "generatedForecast", "forecast"]),
            group_id_keys: owned(&["group", "key", "id"]),
            group_data_keys: owned(&["data", "values", "hourly", "monthly", "forecast"]),
            time_keys: owned(&["time", "timestamp", "month", "date", "measured_at"]),
            value_keys: owned(&["value", "val"]),
        }
    }
}

impl SchemaAliases {
    /// First non-null value stored under any of `keys`.
    pub fn lookup<'a>(obj: &'a Map<String, Value>, keys: &[String]) -> Option<&'a Value> {
        keys.iter()
            .filter_map(|k| obj.get(k.as_str()))
            .find(|v| !v.is_null())
    }

    pub fn is_forecast_key(&self, key: &str) -> bool {
        let lower = key.to_lowercase();
        self.forecast_key_fragments
            .iter()
            .any(|fragment| lower.contains(&fragment.to_lowercase()))
    }

    /// Name and list pairs, used by config validation.
    pub(crate) fn lists(&self) -> [(&'static str, &[String]); 12] {
        [
            ("wrapper_keys", self.wrapper_keys.as_slice()),
            ("forecast_key_fragments", self.forecast_key_fragments.as_slice()),
            ("hourly_keys", self.hourly_keys.as_slice()),
            ("monthly_keys", self.monthly_keys.as_slice()),
            ("analysis_keys", self.analysis_keys.as_slice()),
            ("analysis_marker_keys", self.analysis_marker_keys.as_slice()),
            ("shared_series_keys", self.shared_series_keys.as_slice()),
            ("preview_keys", self.preview_keys.as_slice()),
            ("group_id_keys", self.group_id_keys.as_slice()),
            ("group_data_keys", self.group_data_keys.as_slice()),
            ("time_keys", self.time_keys.as_slice()),
            ("value_keys", self.value_keys.as_slice()),
        ]
    }
}
