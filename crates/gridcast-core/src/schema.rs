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

//! Map an arbitrary JSON candidate onto per-group raw point lists.
//!
//! Containers are resolved through [`SchemaAliases`], classified into a [`SourceShape`] and
//! converted with one function per shape. Anything unrecognized is simply absent.

use crate::aliases::SchemaAliases;
use crate::config::SalvageSettings;
use crate::value::present_number;
use gridcast_types::GroupKey;
use serde_json::{Map, Value};
use std::collections::BTreeMap;
use tracing::debug;

/// Timestamp carried by a raw point.
#[derive(Debug, Clone, PartialEq)]
pub enum PointTime {
    /// Timestamp text as supplied, still to be canonicalized
    Text(String),
    /// No timestamp of its own; the point sits at its index on the grid
    Sequential,
    /// Timestamp absent or not a string
    Missing,
}

/// One untrusted series entry.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPoint {
    pub time: PointTime,
    /// `None` when the value is absent or null; non-numeric values read as 0
    pub value: Option<f64>,
}

pub type RawGroupSeries = BTreeMap<GroupKey, Vec<RawPoint>>;

/// Where the hourly data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeriesOrigin {
    /// A recognized per-group container
    Container,
    /// A single series shared by all groups, found under a known key or as the whole candidate
    Shared,
    /// A single series found by the bounded structure scan
    Salvaged,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UnwrappedForecast {
    pub hourly: Option<RawGroupSeries>,
    pub hourly_origin: Option<SeriesOrigin>,
    pub monthly: Option<RawGroupSeries>,
    pub analysis: Option<Value>,
}

/// Recognized representations of a forecast container or per-group series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceShape<'a> {
    /// `{ "<group>": [...] }`
    MapOfArrays(&'a Map<String, Value>),
    /// `[ { "group": "<group>", "data": [...] } ]`
    ArrayOfGroupRecords(&'a [Value]),
    /// `[ { "time": ..., "value": ... } ]`
    PointArray(&'a [Value]),
    /// `[ 1.2, 3.4, ... ]`
    FlatNumberArray(&'a [Value]),
    Unknown,
}

impl<'a> SourceShape<'a> {
    pub fn classify(value: &'a Value, aliases: &SchemaAliases) -> Self {
        match value {
            Value::Object(map) => Self::MapOfArrays(map),
            Value::Array(items) => match items.first() {
                Some(Value::Number(_)) => Self::FlatNumberArray(items),
                _ if items.iter().any(|item| is_group_record(item, aliases)) => {
                    Self::ArrayOfGroupRecords(items)
                }
                _ if items.iter().any(|item| is_point(item, aliases)) => Self::PointArray(items),
                _ => Self::Unknown,
            },
            _ => Self::Unknown,
        }
    }
}

fn group_id(item: &Value, aliases: &SchemaAliases) -> Option<String> {
    let obj = item.as_object()?;
    match SchemaAliases::lookup(obj, &aliases.group_id_keys)? {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A group id alone is not enough: points may carry an `id` too. A record also needs a data key.
fn is_group_record(item: &Value, aliases: &SchemaAliases) -> bool {
    group_id(item, aliases).is_some()
        && item
            .as_object()
            .and_then(|obj| SchemaAliases::lookup(obj, &aliases.group_data_keys))
            .is_some()
}

fn is_point(item: &Value, aliases: &SchemaAliases) -> bool {
    item.as_object().is_some_and(|obj| {
        SchemaAliases::lookup(obj, &aliases.time_keys).is_some()
            || SchemaAliases::lookup(obj, &aliases.value_keys).is_some()
    })
}

/// Salvage requires both a timestamp and a value on the first element.
fn is_salvage_series(items: &[Value], aliases: &SchemaAliases) -> bool {
    items.first().and_then(Value::as_object).is_some_and(|obj| {
        SchemaAliases::lookup(obj, &aliases.time_keys).is_some()
            && SchemaAliases::lookup(obj, &aliases.value_keys).is_some()
    })
}

fn raw_point(item: &Value, aliases: &SchemaAliases) -> RawPoint {
    match item {
        Value::Object(obj) => RawPoint {
            time: match SchemaAliases::lookup(obj, &aliases.time_keys) {
                Some(Value::String(s)) => PointTime::Text(s.clone()),
                _ => PointTime::Missing,
            },
            value: present_number(SchemaAliases::lookup(obj, &aliases.value_keys)),
        },
        Value::Null => RawPoint {
            time: PointTime::Missing,
            value: None,
        },
        scalar => RawPoint {
            time: PointTime::Sequential,
            value: present_number(Some(scalar)),
        },
    }
}

/// Convert one group's series value into raw points.
///
/// Flat numeric arrays get sequential timestamps; an object holding a data alias is looked
/// through once. Anything else yields no points.
pub fn series_points(value: &Value, aliases: &SchemaAliases) -> Vec<RawPoint> {
    series_points_inner(value, aliases, true)
}

fn series_points_inner(value: &Value, aliases: &SchemaAliases, descend: bool) -> Vec<RawPoint> {
    match value {
        Value::Array(items) => items.iter().map(|item| raw_point(item, aliases)).collect(),
        Value::Object(obj) if descend => SchemaAliases::lookup(obj, &aliases.group_data_keys)
            .map(|inner| series_points_inner(inner, aliases, false))
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

fn shared_for_all(points: &[RawPoint], group_keys: &[GroupKey]) -> RawGroupSeries {
    group_keys
        .iter()
        .map(|key| (key.clone(), points.to_vec()))
        .collect()
}

/// Container value → per-group raw points for the requested keys. `None` for unknown shapes.
fn container_series(
    container: &Value,
    group_keys: &[GroupKey],
    aliases: &SchemaAliases,
) -> Option<RawGroupSeries> {
    match SourceShape::classify(container, aliases) {
        SourceShape::MapOfArrays(map) => Some(map_series(map, group_keys, aliases)),
        SourceShape::ArrayOfGroupRecords(records) => {
            let mut map = Map::new();
            for record in records.iter().filter(|r| is_group_record(r, aliases)) {
                let Some(id) = group_id(record, aliases) else {
                    continue;
                };
                let data = record
                    .as_object()
                    .and_then(|obj| SchemaAliases::lookup(obj, &aliases.group_data_keys))
                    .cloned()
                    .unwrap_or(Value::Array(Vec::new()));
                map.insert(id, data);
            }
            Some(map_series(&map, group_keys, aliases))
        }
        SourceShape::PointArray(items) | SourceShape::FlatNumberArray(items) => {
            let points: Vec<RawPoint> = items.iter().map(|i| raw_point(i, aliases)).collect();
            Some(shared_for_all(&points, group_keys))
        }
        SourceShape::Unknown => None,
    }
}

fn map_series(
    map: &Map<String, Value>,
    group_keys: &[GroupKey],
    aliases: &SchemaAliases,
) -> RawGroupSeries {
    group_keys
        .iter()
        .map(|key| {
            let points = map
                .get(key.as_str())
                .map(|v| series_points(v, aliases))
                .unwrap_or_default();
            (key.clone(), points)
        })
        .collect()
}

/// Depth- and node-bounded search for the first array that looks like a time series.
struct SalvageScan<'s> {
    aliases: &'s SchemaAliases,
    max_depth: usize,
    nodes_left: usize,
}

impl SalvageScan<'_> {
    fn find<'v>(&mut self, value: &'v Value, depth: usize) -> Option<&'v [Value]> {
        if self.nodes_left == 0 {
            return None;
        }
        self.nodes_left -= 1;

        if let Value::Array(items) = value {
            if is_salvage_series(items, self.aliases) {
                return Some(items);
            }
        }
        if depth >= self.max_depth {
            return None;
        }
        match value {
            Value::Array(items) => items.iter().find_map(|v| self.find(v, depth + 1)),
            Value::Object(obj) => obj.values().find_map(|v| self.find(v, depth + 1)),
            _ => None,
        }
    }
}

/// Locates forecast containers in a JSON candidate.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SchemaUnwrapper {
    aliases: SchemaAliases,
    salvage: SalvageSettings,
}

impl SchemaUnwrapper {
    pub fn new(aliases: SchemaAliases, salvage: SalvageSettings) -> Self {
        Self { aliases, salvage }
    }

    pub fn aliases(&self) -> &SchemaAliases {
        &self.aliases
    }

    /// One level of wrapper: the first wrapper key holding a forecast-shaped object.
    ///
    /// Returns the effective object and the outer analysis block, if any. The outer block takes
    /// precedence over one inside the wrapper.
    fn peel<'a>(
        &self,
        root: &'a Map<String, Value>,
    ) -> (&'a Map<String, Value>, Option<&'a Value>) {
        for key in &self.aliases.wrapper_keys {
            if let Some(Value::Object(inner)) = root.get(key.as_str()) {
                if inner.keys().any(|k| self.aliases.is_forecast_key(k)) {
                    debug!(wrapper = %key, "unwrapped forecast payload");
                    return (
                        inner,
                        SchemaAliases::lookup(root, &self.aliases.analysis_keys),
                    );
                }
            }
        }
        (root, None)
    }

    fn salvage(&self, candidate: &Value) -> Option<Vec<RawPoint>> {
        let mut scan = SalvageScan {
            aliases: &self.aliases,
            max_depth: self.salvage.max_depth,
            nodes_left: self.salvage.max_nodes,
        };
        scan.find(candidate, 0).map(|items| {
            items
                .iter()
                .map(|item| raw_point(item, &self.aliases))
                .collect()
        })
    }

    pub fn unwrap(&self, candidate: &Value, group_keys: &[GroupKey]) -> UnwrappedForecast {
        let aliases = &self.aliases;
        let mut out = UnwrappedForecast::default();

        match candidate {
            Value::Object(root) => {
                let (obj, outer_analysis) = self.peel(root);

                if let Some(container) = SchemaAliases::lookup(obj, &aliases.hourly_keys) {
                    out.hourly = container_series(container, group_keys, aliases);
                    out.hourly_origin = out.hourly.as_ref().map(|_| SeriesOrigin::Container);
                }
                if out.hourly.is_none() {
                    if let Some(shared) = SchemaAliases::lookup(obj, &aliases.shared_series_keys)
                        .filter(|v| v.is_array())
                    {
                        out.hourly = Some(shared_for_all(
                            &series_points(shared, aliases),
                            group_keys,
                        ));
                        out.hourly_origin = Some(SeriesOrigin::Shared);
                    }
                }
                if let Some(container) = SchemaAliases::lookup(obj, &aliases.monthly_keys) {
                    out.monthly = container_series(container, group_keys, aliases);
                }

                out.analysis = outer_analysis
                    .or_else(|| SchemaAliases::lookup(obj, &aliases.analysis_keys))
                    .cloned()
                    .or_else(|| {
                        aliases
                            .analysis_marker_keys
                            .iter()
                            .any(|k| obj.contains_key(k.as_str()))
                            .then(|| Value::Object(obj.clone()))
                    });
            }
            Value::Array(_) => match SourceShape::classify(candidate, aliases) {
                SourceShape::ArrayOfGroupRecords(_) => {
                    out.hourly = container_series(candidate, group_keys, aliases);
                    out.hourly_origin = Some(SeriesOrigin::Container);
                }
                SourceShape::PointArray(_) | SourceShape::FlatNumberArray(_) => {
                    out.hourly = container_series(candidate, group_keys, aliases);
                    out.hourly_origin = Some(SeriesOrigin::Shared);
                }
                SourceShape::MapOfArrays(_) | SourceShape::Unknown => {}
            },
            _ => {}
        }

        if out.hourly.is_none() {
            if let Some(points) = self.salvage(candidate) {
                debug!(points = points.len(), "salvaged shared hourly series");
                out.hourly = Some(shared_for_all(&points, group_keys));
                out.hourly_origin = Some(SeriesOrigin::Salvaged);
            }
        }

        out
    }
}
