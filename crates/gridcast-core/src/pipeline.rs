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

//! Untrusted response text in, complete forecast bundle out.

use crate::aliases::SchemaAliases;
use crate::analysis::sanitize;
use crate::config::{GridcastConfig, SalvageSettings};
use crate::extract::extract;
use crate::normalize::{normalize_hourly, normalize_monthly};
use crate::schema::{SchemaUnwrapper, UnwrappedForecast};
use crate::synthetic;
use crate::time::{clamp_to_grid_range, first_of_next_month, floor_to_hour};
use chrono::{DateTime, Utc};
use gridcast_types::{AnalysisSummary, ForecastBundle, GroupKey};
use tracing::{debug, info, warn};

/// Stateless forecast normalizer. Safe to share between threads.
#[derive(Debug, Clone, Default)]
pub struct ForecastPipeline {
    unwrapper: SchemaUnwrapper,
}

impl ForecastPipeline {
    pub fn new(aliases: SchemaAliases, salvage: SalvageSettings) -> Self {
        Self {
            unwrapper: SchemaUnwrapper::new(aliases, salvage),
        }
    }

    pub fn from_config(config: &GridcastConfig) -> Self {
        Self::new(config.aliases.clone(), config.salvage)
    }

    pub fn aliases(&self) -> &SchemaAliases {
        self.unwrapper.aliases()
    }

    /// Normalize `response` into a bundle for `group_keys`.
    ///
    /// `None` (no response, failed or timed-out call) gives a fully synthetic bundle. This never
    /// fails; every unusable part of the response is replaced by synthetic data or defaults.
    /// A `start` too close to the end of chrono's range is pulled back so the grids still fit.
    pub fn run(
        &self,
        response: Option<&str>,
        group_keys: &[GroupKey],
        start: DateTime<Utc>,
    ) -> ForecastBundle {
        if group_keys.is_empty() {
            warn!("forecast requested without group keys");
        }

        let Some(text) = response else {
            info!(groups = group_keys.len(), "no response text, synthesizing forecast");
            return Self::synthesize(group_keys, start);
        };

        let extraction = extract(text);
        let unwrapped = match &extraction.candidate {
            Some(candidate) => self.unwrapper.unwrap(candidate, group_keys),
            None => {
                warn!(
                    bytes = extraction.source_text.len(),
                    "no JSON found in response text"
                );
                UnwrappedForecast::default()
            }
        };
        debug!(
            strategy = extraction.strategy.map(|s| s.as_str()),
            envelope = extraction.from_envelope,
            hourly = ?unwrapped.hourly_origin,
            monthly = unwrapped.monthly.is_some(),
            analysis = unwrapped.analysis.is_some(),
            "unwrapped response"
        );

        let start = floor_to_hour(clamp_to_grid_range(start));
        let start_month = first_of_next_month(start);
        let bundle = ForecastBundle::new(
            group_keys.to_vec(),
            normalize_hourly(unwrapped.hourly.as_ref(), group_keys, start),
            normalize_monthly(unwrapped.monthly.as_ref(), group_keys, start_month),
            sanitize(unwrapped.analysis.as_ref()),
        );
        info!(groups = group_keys.len(), "forecast normalized");
        bundle
    }

    /// Fully synthetic bundle with a default analysis.
    pub fn synthesize(group_keys: &[GroupKey], start: DateTime<Utc>) -> ForecastBundle {
        let start = floor_to_hour(clamp_to_grid_range(start));
        let start_month = first_of_next_month(start);
        ForecastBundle::new(
            group_keys.to_vec(),
            group_keys
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), synthetic::hourly_series(start, i)))
                .collect(),
            group_keys
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), synthetic::monthly_series(start_month, i)))
                .collect(),
            AnalysisSummary::default(),
        )
    }
}

/// [`ForecastPipeline::run`] with the built-in aliases and limits.
pub fn run(
    response: Option<&str>,
    group_keys: &[GroupKey],
    start: DateTime<Utc>,
) -> ForecastBundle {
    ForecastPipeline::default().run(response, group_keys, start)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn keys() -> Vec<GroupKey> {
        vec![GroupKey::from("28"), GroupKey::from("29")]
    }

    #[test]
    fn test_none_matches_garbage() {
        let start = Utc.with_ymd_and_hms(2025, 5, 17, 14, 45, 0).unwrap();
        let none = run(None, &keys(), start);
        let garbage = run(Some("the model is overloaded"), &keys(), start);
        assert_eq!(none, garbage);
        assert_eq!(none, ForecastPipeline::synthesize(&keys(), start));
    }

    #[test]
    fn test_grid_starts() {
        let start = Utc.with_ymd_and_hms(2025, 12, 31, 23, 59, 0).unwrap();
        let bundle = run(None, &keys(), start);
        let hourly = bundle.hourly_for("28").unwrap();
        assert_eq!(hourly.start(), Utc.with_ymd_and_hms(2025, 12, 31, 23, 0, 0).unwrap());
        let monthly = bundle.monthly_for("29").unwrap();
        assert_eq!(monthly.start(), Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_start_at_end_of_time_range() {
        let start = DateTime::<Utc>::MAX_UTC;
        let synthetic = run(None, &keys(), start);
        let empty = run(Some("{}"), &keys(), start);
        assert_eq!(synthetic, empty);

        let expected = floor_to_hour(clamp_to_grid_range(start));
        assert_eq!(synthetic.hourly_for("28").unwrap().start(), expected);
        assert_eq!(
            synthetic.monthly_for("28").unwrap().start(),
            first_of_next_month(expected)
        );
    }

    #[test]
    fn test_analysis_passes_through_sanitizer() {
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let bundle = run(
            Some(r#"{"analysis": {"summary": {"avg": 3, "min": 5, "max": 1, "peakHour": 30}}}"#),
            &keys(),
            start,
        );
        let summary = bundle.analysis().summary;
        assert_eq!(summary.min, 3.0);
        assert_eq!(summary.max, 3.0);
        assert_eq!(summary.peak_hour, 23);
    }

    #[test]
    fn test_custom_aliases() {
        let mut aliases = SchemaAliases::default();
        aliases.hourly_keys.push("prognoza".to_owned());
        let pipeline = ForecastPipeline::new(aliases, SalvageSettings::default());
        let start = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let bundle = pipeline.run(Some(r#"{"prognoza": {"28": [7]}}"#), &keys(), start);
        assert_eq!(bundle.hourly_for("28").unwrap().points()[0].value, 7.0);
    }

    #[test]
    fn test_pipeline_is_shareable() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ForecastPipeline>();
    }
}
