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

pub mod aliases;
pub mod analysis;
pub mod config;
pub mod error;
pub mod export;
pub mod extract;
pub mod groups;
pub mod normalize;
pub mod pipeline;
pub mod schema;
pub mod synthetic;
pub mod time;
pub mod training;
pub mod value;

pub use aliases::SchemaAliases;
pub use analysis::{sanitize, sanitize_with_preview};
pub use config::{ForecastSettings, GridcastConfig, SalvageSettings};
pub use error::{GridcastError, Result};
pub use export::{hourly_csv, monthly_csv};
pub use extract::{ExtractionStrategy, RawExtraction, extract};
pub use groups::GroupKeys;
pub use normalize::{normalize_hourly, normalize_monthly};
pub use pipeline::{ForecastPipeline, run};
pub use schema::{SchemaUnwrapper, SourceShape, UnwrappedForecast};
pub use training::{ConsumptionAggregates, group_keys_from_header};

pub use gridcast_types::{
    AnalysisSummary, ForecastBundle, GroupKey, HourlySeries, MonthlySeries, SummaryStats,
    TimeSeriesPoint,
};
