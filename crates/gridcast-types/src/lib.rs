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

//! GridCast shared data model
//!
//! Canonical forecast series, analysis summary and the bundle handed to downstream consumers.
//! Series types can only be built through their constructors, which lay timestamps on the
//! canonical hourly or monthly grid, so length and spacing invariants hold by construction.

pub mod analysis;
pub mod bundle;
pub mod calendar;
pub mod group;
pub mod series;

pub use analysis::{AnalysisSummary, SummaryStats};
pub use bundle::ForecastBundle;
pub use group::GroupKey;
pub use series::{HOURLY_POINTS, HourlySeries, MONTHLY_POINTS, MonthlySeries, TimeSeriesPoint};
