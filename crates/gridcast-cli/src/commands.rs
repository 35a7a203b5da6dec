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

use crate::args::{
    AggregatesArgs, GroupArgs, NormalizeArgs, OutputArgs, OutputFormat, SynthesizeArgs,
};
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use gridcast_core::time::parse_start;
use gridcast_core::training::{detect_delimiter, group_keys_from_header, read_header};
use gridcast_core::{
    ConsumptionAggregates, ForecastBundle, ForecastPipeline, GridcastConfig, GroupKeys,
    hourly_csv, monthly_csv,
};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

pub fn load_config(path: Option<&Path>) -> Result<GridcastConfig> {
    match path {
        Some(path) => GridcastConfig::from_file(path)
            .with_context(|| format!("Failed to load config from {}", path.display())),
        None => Ok(GridcastConfig::default()),
    }
}

/// Start instant from `--start`; unparseable or absent input means now.
pub fn resolve_start(start: Option<&str>) -> DateTime<Utc> {
    match start {
        Some(raw) => parse_start(raw).unwrap_or_else(|| {
            warn!(start = raw, "unparseable start, using current time");
            Utc::now()
        }),
        None => Utc::now(),
    }
}

/// Group keys from `--groups`, else the training header, else the configured fallback set.
pub fn resolve_groups(args: &GroupArgs, config: &GridcastConfig) -> Result<GroupKeys> {
    let max = config.forecast.max_groups;

    if !args.groups.is_empty() {
        return GroupKeys::with_limit(&args.groups, max).context("Invalid --groups");
    }

    if let Some(path) = &args.training {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read training table {}", path.display()))?;
        let delimiter = detect_delimiter(content.lines().next().unwrap_or_default());
        let header = read_header(content.as_bytes(), delimiter)
            .context("Failed to read training table header")?;
        let keys = group_keys_from_header(&header, max)
            .context("Training table has no group columns")?;
        info!(groups = keys.len(), path = %path.display(), "group keys from training table");
        return Ok(keys);
    }

    GroupKeys::with_limit(&config.forecast.fallback_groups, max)
        .context("No group keys configured")
}

/// Response text from a file or stdin (`-`). Anything unreadable counts as no response.
///
/// Invalid UTF-8 is replaced rather than rejected, so JSON next to a few stray bytes survives.
pub fn read_response(path: Option<&Path>) -> Option<String> {
    let path = path?;
    let result = if path == Path::new("-") {
        let mut bytes = Vec::new();
        std::io::stdin().read_to_end(&mut bytes).map(|_| bytes)
    } else {
        std::fs::read(path)
    };
    match result {
        Ok(bytes) => Some(String::from_utf8_lossy(&bytes).into_owned()),
        Err(err) => {
            warn!(
                path = %path.display(),
                error = %err,
                "response unreadable, treating as absent"
            );
            None
        }
    }
}

fn to_json(value: &impl serde::Serialize, pretty: bool) -> Result<String> {
    let json = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    json.context("Failed to serialize output")
}

pub fn render(bundle: &ForecastBundle, output: &OutputArgs) -> Result<String> {
    match output.format {
        OutputFormat::Json => to_json(bundle, output.pretty),
        OutputFormat::HourlyCsv => hourly_csv(bundle).context("Failed to export hourly table"),
        OutputFormat::MonthlyCsv => monthly_csv(bundle).context("Failed to export monthly table"),
        OutputFormat::Mean => to_json(&bundle.mean_hourly(), output.pretty),
    }
}

pub fn normalize(args: &NormalizeArgs, config: &GridcastConfig) -> Result<String> {
    let keys = resolve_groups(&args.keys, config)?;
    let start = resolve_start(args.output.start.as_deref());
    let response = read_response(args.response.as_deref());

    let pipeline = ForecastPipeline::from_config(config);
    let bundle = pipeline.run(response.as_deref(), &keys, start);
    render(&bundle, &args.output)
}

pub fn synthesize(args: &SynthesizeArgs, config: &GridcastConfig) -> Result<String> {
    let keys = resolve_groups(&args.keys, config)?;
    let start = resolve_start(args.output.start.as_deref());
    render(&ForecastPipeline::synthesize(&keys, start), &args.output)
}

pub fn aggregates(args: &AggregatesArgs) -> Result<String> {
    let content = std::fs::read_to_string(&args.training)
        .with_context(|| format!("Failed to read training table {}", args.training.display()))?;
    let delimiter = detect_delimiter(content.lines().next().unwrap_or_default());
    let Some(aggregates) = ConsumptionAggregates::from_reader(content.as_bytes(), delimiter)
        .context("Failed to aggregate training table")?
    else {
        bail!("Training table {} has no data rows", args.training.display());
    };
    to_json(&aggregates, args.pretty)
}
