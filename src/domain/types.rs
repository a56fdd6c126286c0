//! Shared domain types.
//!
//! These types are kept small and serializable so they can be:
//!
//! - sent to the QuickStats API as query parameters
//! - written to / read back from the metadata JSON and CSV files
//! - flattened into the collated metadata table

use std::collections::BTreeMap;
use std::fmt;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// Filter fields sent alongside a QuickStats request.
///
/// Keys follow the remote vocabulary (`sector_desc`, `commodity_desc`,
/// `statisticcat_desc`, `unit_desc`, `year`, ...). Nothing is validated
/// locally; the remote rejects what it does not understand.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryFilter(BTreeMap<String, String>);

impl QueryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_pairs<K, V, I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self(pairs.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }

    /// Return a copy with `key` set to `value` (replacing any previous value).
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.0.insert(key.into(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.0.remove(key)
    }

    /// Base filter extended by `overrides`; keys in `overrides` win.
    pub fn merge(&self, overrides: &QueryFilter) -> QueryFilter {
        let mut merged = self.0.clone();
        merged.extend(overrides.0.iter().map(|(k, v)| (k.clone(), v.clone())));
        Self(merged)
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for QueryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return write!(f, "None");
        }
        let parts: Vec<String> = self.iter().map(|(k, v)| format!("{k}={v}")).collect();
        write!(f, "{}", parts.join(", "))
    }
}

/// One valid value for a parameter, as returned by `get_param_values`.
///
/// Most parameters come back as strings; `year` comes back as integers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    Int(i64),
    Text(String),
}

impl fmt::Display for ParamValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamValue::Int(v) => write!(f, "{v}"),
            ParamValue::Text(s) => write!(f, "{s}"),
        }
    }
}

/// Statistic name → valid unit strings, for one commodity.
pub type StatisticUnits = BTreeMap<String, Vec<String>>;

/// Which units exist for which (commodity, statistic) pair.
///
/// Serialized as a JSON object of objects of string arrays:
///
/// ```json
/// { "CORN": { "YIELD": ["BU / ACRE"] } }
/// ```
///
/// Commodities or statistics the remote did not return are absent, never null.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionsReport(BTreeMap<String, StatisticUnits>);

impl OptionsReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a commodity with no statistics yet.
    pub fn insert_commodity(&mut self, commodity: impl Into<String>) {
        self.0.entry(commodity.into()).or_default();
    }

    pub fn insert_statistic(
        &mut self,
        commodity: impl Into<String>,
        statistic: impl Into<String>,
        units: Vec<String>,
    ) {
        self.0
            .entry(commodity.into())
            .or_default()
            .insert(statistic.into(), units);
    }

    pub fn commodity(&self, commodity: &str) -> Option<&StatisticUnits> {
        self.0.get(commodity)
    }

    pub fn units(&self, commodity: &str, statistic: &str) -> Option<&[String]> {
        self.0
            .get(commodity)
            .and_then(|stats| stats.get(statistic))
            .map(Vec::as_slice)
    }

    pub fn commodities(&self) -> impl Iterator<Item = (&str, &StatisticUnits)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Every (commodity, statistic, unit) triple in map order.
    pub fn triples(&self) -> impl Iterator<Item = (&str, &str, &str)> {
        self.0.iter().flat_map(|(commodity, stats)| {
            stats.iter().flat_map(move |(statistic, units)| {
                units
                    .iter()
                    .map(move |unit| (commodity.as_str(), statistic.as_str(), unit.as_str()))
            })
        })
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// One row of the collated metadata table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct MetadataRecord {
    pub sector: String,
    pub group: String,
    pub commodity: String,
    pub statistic: String,
    pub unit: String,
}

/// How a fetch treats an on-disk cache file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum CachePolicy {
    /// Ignore the cache: never read it, never write it.
    Never,
    /// Use the file when it exists (no request); otherwise fetch and write it.
    #[default]
    IfAbsent,
    /// Always fetch and overwrite the file.
    Always,
}

impl CachePolicy {
    /// Map the `overwrite` flag used by the report commands.
    pub fn from_overwrite(overwrite: bool) -> Self {
        if overwrite {
            CachePolicy::Always
        } else {
            CachePolicy::IfAbsent
        }
    }

    pub fn reads_existing(self) -> bool {
        matches!(self, CachePolicy::IfAbsent)
    }

    pub fn writes(self) -> bool {
        !matches!(self, CachePolicy::Never)
    }
}

/// Result of a "write unless it already exists" operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    /// The file was (re)written.
    Written,
    /// The file already existed and was left untouched.
    Skipped,
    /// The cache policy forbids writing; nothing touched disk.
    NotSaved,
}
