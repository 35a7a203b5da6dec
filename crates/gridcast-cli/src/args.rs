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

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "gridcast")]
#[command(author, version, about = "GridCast forecast normalizer")]
#[command(
    long_about = "Turn free-form forecast responses into complete per-group energy forecasts.\n\
    \nEvery group always gets 48 hourly and 12 monthly values; anything the response does not\n\
    provide is filled with a deterministic synthetic profile.\n\
    \nExamples:\n  \
    gridcast normalize --response reply.txt --training consumption.csv\n  \
    cat reply.txt | gridcast normalize --groups 28,29,30 --format hourly-csv\n  \
    gridcast synthesize --groups 28,29 --start 2025-01-01T00:00:00Z\n  \
    gridcast aggregates --training consumption.csv"
)]
pub struct Cli {
    /// Optional TOML configuration (aliases, group limits, salvage limits)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Normalize a response into a forecast bundle
    #[command(
        long_about = "Read response text and normalize it into a forecast bundle.\n\
        \nThe response is read from --response (a file, or '-' for stdin). A missing or\n\
        unreadable response is treated like a failed call and yields a synthetic forecast.\n\
        \nExamples:\n  \
        gridcast normalize --response reply.txt --groups 28,29\n  \
        gridcast normalize --response - --training consumption.csv --format monthly-csv"
    )]
    Normalize(NormalizeArgs),

    /// Produce a fully synthetic forecast bundle
    Synthesize(SynthesizeArgs),

    /// Print aggregate statistics of a training consumption table
    Aggregates(AggregatesArgs),
}

/// Where the group keys come from.
#[derive(Debug, Clone, clap::Args)]
pub struct GroupArgs {
    /// Comma-separated group keys
    #[arg(long, value_delimiter = ',', value_name = "KEYS")]
    pub groups: Vec<String>,

    /// Consumption table whose header supplies the group keys
    #[arg(
        long,
        value_name = "PATH",
        long_help = "Delimited consumption table (';' or ',').\n\
          Every column except the timestamp column (measured_at/time/timestamp, else the first)\n\
          becomes a group key. Ignored when --groups is given."
    )]
    pub training: Option<PathBuf>,
}

#[derive(Debug, Clone, clap::Args)]
pub struct OutputArgs {
    /// Forecast start: RFC 3339 timestamp or epoch milliseconds (defaults to now)
    #[arg(long, value_name = "TIME")]
    pub start: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Parser)]
pub struct NormalizeArgs {
    /// Response text file, or '-' for stdin
    #[arg(long, value_name = "PATH")]
    pub response: Option<PathBuf>,

    #[command(flatten)]
    pub keys: GroupArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct SynthesizeArgs {
    #[command(flatten)]
    pub keys: GroupArgs,

    #[command(flatten)]
    pub output: OutputArgs,
}

#[derive(Debug, Parser)]
pub struct AggregatesArgs {
    /// Consumption table to aggregate
    #[arg(long, value_name = "PATH")]
    pub training: PathBuf,

    /// Pretty-print JSON output
    #[arg(long, default_value_t = false)]
    pub pretty: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Full bundle as JSON
    Json,
    /// Hourly table, ';'-separated
    HourlyCsv,
    /// Monthly table, ';'-separated
    MonthlyCsv,
    /// Per-hour mean across all groups as JSON
    Mean,
}
