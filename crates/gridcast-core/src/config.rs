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

use crate::aliases::SchemaAliases;
use crate::error::{GridcastError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Top-level configuration, loaded from TOML. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GridcastConfig {
    #[serde(default)]
    pub forecast: ForecastSettings,
    #[serde(default)]
    pub aliases: SchemaAliases,
    #[serde(default)]
    pub salvage: SalvageSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastSettings {
    /// Upper bound on the number of group keys taken from a training header
    #[serde(default = "default_max_groups")]
    pub max_groups: usize,
    /// Group keys used when the caller has none
    #[serde(default = "default_fallback_groups")]
    pub fallback_groups: Vec<String>,
}

/// Limits for the last-resort scan over unrecognized response structures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SalvageSettings {
    #[serde(default = "default_max_depth")]
    pub max_depth: usize,
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

fn default_max_groups() -> usize {
    160
}

fn default_fallback_groups() -> Vec<String> {
    ["28", "29", "30", "36", "37", "38", "39", "40", "41", "42", "43"]
        .iter()
        .map(|g| (*g).to_owned())
        .collect()
}

fn default_max_depth() -> usize {
    6
}

fn default_max_nodes() -> usize {
    10_000
}

impl Default for ForecastSettings {
    fn default() -> Self {
        Self {
            max_groups: default_max_groups(),
            fallback_groups: default_fallback_groups(),
        }
    }
}

impl Default for SalvageSettings {
    fn default() -> Self {
        Self {
            max_depth: default_max_depth(),
            max_nodes: default_max_nodes(),
        }
    }
}

impl GridcastConfig {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| GridcastError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.forecast.max_groups == 0 {
            return Err(GridcastError::InvalidConfig(
                "forecast.max_groups must be at least 1".to_owned(),
            ));
        }
        if self.salvage.max_nodes == 0 {
            return Err(GridcastError::InvalidConfig(
                "salvage.max_nodes must be at least 1".to_owned(),
            ));
        }
        for (name, list) in self.aliases.lists() {
            if list.is_empty() {
                return Err(GridcastError::InvalidConfig(format!(
                    "aliases.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = GridcastConfig::from_toml_str("").unwrap();
        assert_eq!(config, GridcastConfig::default());
        assert_eq!(config.forecast.max_groups, 160);
        assert_eq!(config.forecast.fallback_groups.len(), 11);
        assert_eq!(config.salvage.max_depth, 6);
    }

    #[test]
    fn test_alias_override_keeps_other_lists() {
        let config = GridcastConfig::from_toml_str(
            r#"
            [aliases]
            hourly_keys = ["per_hour", "hourly_forecast_groups"]

            [salvage]
            max_depth = 3
            "#,
        )
        .unwrap();
        assert_eq!(config.aliases.hourly_keys, vec!["per_hour", "hourly_forecast_groups"]);
        assert_eq!(config.aliases.monthly_keys, SchemaAliases::default().monthly_keys);
        assert_eq!(config.salvage.max_depth, 3);
        assert_eq!(config.salvage.max_nodes, 10_000);
    }

    #[test]
    fn test_rejects_empty_alias_list() {
        let err = GridcastConfig::from_toml_str("[aliases]\nvalue_keys = []\n").unwrap_err();
        assert!(matches!(err, GridcastError::InvalidConfig(msg) if msg.contains("value_keys")));
    }

    #[test]
    fn test_rejects_zero_groups() {
        let err = GridcastConfig::from_toml_str("[forecast]\nmax_groups = 0\n").unwrap_err();
        assert!(matches!(err, GridcastError::InvalidConfig(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[forecast]\nfallback_groups = [\"north\", \"south\"]").unwrap();
        let config = GridcastConfig::from_file(file.path()).unwrap();
        assert_eq!(config.forecast.fallback_groups, vec!["north", "south"]);
    }

    #[test]
    fn test_missing_file() {
        let err = GridcastConfig::from_file("/nonexistent/gridcast.toml").unwrap_err();
        assert!(matches!(err, GridcastError::ConfigRead { .. }));
    }
}
