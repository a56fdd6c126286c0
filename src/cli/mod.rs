//! Command-line parsing for the QuickStats metadata client.
//!
//! Argument parsing and command dispatch stay separate from the fetch/report
//! code; `app` turns these structs into calls.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::data::presets::Preset;
use crate::domain::{CachePolicy, QueryFilter};
use crate::io::ParamFormat;

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "nass", version, about = "USDA NASS QuickStats metadata client")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// List the valid values of one QuickStats parameter.
    Params(ParamsArgs),
    /// Save per-commodity unit reports over a preset's core statistics.
    Units(UnitsArgs),
    /// Discover statistics and units for commodities and save one report.
    Options(OptionsArgs),
    /// Flatten saved option reports into a single metadata CSV.
    Collate(CollateArgs),
    /// Download observations from the full-data endpoint.
    Data(DataArgs),
}

/// Filter selection shared by every command that hits the API.
#[derive(Debug, Args, Clone)]
pub struct FilterArgs {
    /// Start from a named base filter.
    #[arg(long, value_enum)]
    pub preset: Option<Preset>,

    /// Extra filter field, e.g. `-f commodity_desc=CORN` (repeatable; overrides the preset).
    ///
    /// An empty value (`-f agg_level_desc=`) drops that field from the preset.
    #[arg(short = 'f', long = "filter", value_name = "KEY=VALUE", value_parser = parse_filter_pair)]
    pub filters: Vec<(String, String)>,
}

impl FilterArgs {
    pub fn to_filter(&self) -> QueryFilter {
        self.apply(self.preset.map(Preset::filter).unwrap_or_default())
    }

    /// Like [`to_filter`](Self::to_filter) but starting from `default` when no preset was given.
    pub fn to_filter_or(&self, default: Preset) -> QueryFilter {
        self.apply(self.preset_or(default).filter())
    }

    pub fn preset_or(&self, default: Preset) -> Preset {
        self.preset.unwrap_or(default)
    }

    fn apply(&self, base: QueryFilter) -> QueryFilter {
        let mut filter = base;
        for (key, value) in &self.filters {
            if value.is_empty() {
                filter.remove(key);
            } else {
                filter.insert(key.as_str(), value.as_str());
            }
        }
        filter
    }
}

#[derive(Debug, Args)]
pub struct ParamsArgs {
    /// Parameter to list (e.g. `commodity_desc`, `unit_desc`, `year`).
    pub param: String,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Also save the list under the metadata directory.
    #[arg(long)]
    pub save: bool,

    #[arg(long, value_enum, default_value_t = ParamFormat::Json)]
    pub format: ParamFormat,

    /// Replace an existing saved list.
    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Args)]
pub struct UnitsArgs {
    /// Commodities to report on (defaults to the preset's core list).
    pub commodities: Vec<String>,

    /// Filter fields; the preset defaults to `crops`.
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Statistic to check (repeatable; defaults to the preset's core statistics).
    #[arg(short = 's', long = "stat")]
    pub stats: Vec<String>,

    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Args)]
pub struct OptionsArgs {
    /// Commodities to crawl (defaults to the preset's core list).
    pub commodities: Vec<String>,

    #[command(flatten)]
    pub filter: FilterArgs,

    /// Output JSON (default: `<metadata>/options/options_report.json`).
    #[arg(long, value_name = "JSON")]
    pub out: Option<PathBuf>,

    #[arg(long)]
    pub overwrite: bool,
}

#[derive(Debug, Args)]
pub struct CollateArgs {
    /// Directory with option report JSON files (default: `<metadata>/options`).
    #[arg(long)]
    pub dir: Option<PathBuf>,

    /// Output CSV (default: `<metadata>/unit_options_collated.csv`).
    #[arg(long, value_name = "CSV")]
    pub out: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct DataArgs {
    #[command(flatten)]
    pub filter: FilterArgs,

    /// Cache file name under the raw data directory.
    #[arg(long, value_name = "NAME")]
    pub cache: Option<String>,

    #[arg(long, value_enum, default_value_t = CachePolicy::IfAbsent)]
    pub cache_policy: CachePolicy,

    /// Rows to print.
    #[arg(long, default_value_t = 10)]
    pub preview: usize,
}

fn parse_filter_pair(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("empty filter key in '{raw}'"));
    }
    Ok((key.to_string(), value.trim().to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_pairs_parse() {
        assert_eq!(
            parse_filter_pair("commodity_desc=SWEET CORN").unwrap(),
            ("commodity_desc".to_string(), "SWEET CORN".to_string())
        );
        assert!(parse_filter_pair("commodity_desc").is_err());
        assert!(parse_filter_pair("=CORN").is_err());
    }

    #[test]
    fn explicit_filters_override_preset() {
        let cli = Cli::parse_from([
            "nass",
            "data",
            "--preset",
            "crops",
            "-f",
            "agg_level_desc=STATE",
            "-f",
            "year=2022",
            "--cache",
            "corn.csv",
        ]);
        let Command::Data(args) = cli.command else {
            panic!("expected data command");
        };
        let filter = args.filter.to_filter();
        assert_eq!(filter.get("sector_desc"), Some("CROPS"));
        assert_eq!(filter.get("agg_level_desc"), Some("STATE"));
        assert_eq!(filter.get("year"), Some("2022"));
        assert_eq!(args.cache_policy, CachePolicy::IfAbsent);
    }

    #[test]
    fn cache_policy_values() {
        let cli = Cli::parse_from(["nass", "data", "--cache-policy", "always"]);
        let Command::Data(args) = cli.command else {
            panic!("expected data command");
        };
        assert_eq!(args.cache_policy, CachePolicy::Always);
    }

    #[test]
    fn units_defaults_to_crops() {
        let cli = Cli::parse_from(["nass", "units"]);
        let Command::Units(args) = cli.command else {
            panic!("expected units command");
        };
        assert_eq!(args.filter.preset_or(Preset::Crops), Preset::Crops);
        assert_eq!(args.filter.to_filter_or(Preset::Crops), Preset::Crops.filter());
        assert!(args.commodities.is_empty());
    }

    #[test]
    fn empty_value_drops_preset_field() {
        let cli = Cli::parse_from([
            "nass",
            "units",
            "CORN",
            "-f",
            "agg_level_desc=",
            "-f",
            "source_desc=",
        ]);
        let Command::Units(args) = cli.command else {
            panic!("expected units command");
        };
        let filter = args.filter.to_filter_or(Preset::Crops);
        assert_eq!(filter.get("sector_desc"), Some("CROPS"));
        assert_eq!(filter.get("group_desc"), Some("FIELD CROPS"));
        assert!(filter.get("agg_level_desc").is_none());
        assert!(filter.get("source_desc").is_none());
    }
}
