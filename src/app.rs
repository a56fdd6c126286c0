//! Top-level application orchestration.
//!
//! `src/main.rs` stays tiny; this module is the "real main" that:
//! - parses CLI arguments
//! - installs logging
//! - loads configuration and builds the client
//! - dispatches to the command handlers and prints their output

use std::path::{Component, Path};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use crate::cli::{CollateArgs, Command, DataArgs, OptionsArgs, ParamsArgs, UnitsArgs};
use crate::data::bulk::fetch_data;
use crate::data::presets::{CommodityLookup, Preset};
use crate::data::transport::Transport;
use crate::domain::{CachePolicy, QueryFilter};
use crate::error::AppError;
use crate::io::{default_param_path, format_param_filename, save_parameter_values};
use crate::report::collate::{COLLATED_FILENAME, collate_option_files, write_metadata_csv};
use crate::report::format;
use crate::report::options::{save_options_report, save_unit_options_report};

pub mod pipeline;

pub use pipeline::Session;

pub const OPTIONS_REPORT_FILENAME: &str = "options_report.json";

/// Entry point for the `nass` binary.
pub fn run() -> Result<(), AppError> {
    let cli = crate::cli::Cli::parse();
    init_logging();

    let session = Session::start()?;
    let output = execute(&session, cli.command)?;
    print!("{output}");
    Ok(())
}

/// Log to stderr; `RUST_LOG` overrides the default `info` level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A second init (e.g. in tests) is harmless.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Run one command and return the text to print.
pub fn execute<T: Transport>(session: &Session<T>, command: Command) -> Result<String, AppError> {
    match command {
        Command::Params(args) => handle_params(session, args),
        Command::Units(args) => handle_units(session, args),
        Command::Options(args) => handle_options(session, args),
        Command::Collate(args) => handle_collate(session, args),
        Command::Data(args) => handle_data(session, args),
    }
}

fn handle_params<T: Transport>(session: &Session<T>, args: ParamsArgs) -> Result<String, AppError> {
    let filter = args.filter.to_filter();
    let values = session.client.get_param_values(&args.param, &filter)?;
    let mut out = format::format_param_values(&args.param, &values);

    if args.save {
        let stem = format_param_filename(&args.param, &filter);
        let path = default_param_path(session.config.metadata_dir(), &stem, args.format);
        let outcome = save_parameter_values(
            &args.param,
            &values,
            args.format,
            &path,
            CachePolicy::from_overwrite(args.overwrite),
        )?;
        out.push_str(&format::format_save_outcome(&path, &outcome));
        out.push('\n');
    }
    Ok(out)
}

fn handle_units<T: Transport>(session: &Session<T>, args: UnitsArgs) -> Result<String, AppError> {
    let preset = args.filter.preset_or(Preset::Crops);
    let commodities = or_preset(args.commodities, preset.commodities());
    let stats = or_preset(args.stats, preset.core_stats());
    if commodities.is_empty() || stats.is_empty() {
        return Err(AppError::config(
            "No commodities or statistics to report on; name them explicitly for this preset.",
        ));
    }

    let filter = args.filter.to_filter_or(Preset::Crops);
    let policy = CachePolicy::from_overwrite(args.overwrite);
    let mut out = String::new();
    for commodity in &commodities {
        let run = save_unit_options_report(
            &session.client,
            commodity,
            &stats,
            &filter,
            session.config.options_dir(),
            policy,
        )?;
        out.push_str(&format::format_save_outcome(&run.path, &run.outcome));
        out.push('\n');
    }
    Ok(out)
}

fn handle_options<T: Transport>(session: &Session<T>, args: OptionsArgs) -> Result<String, AppError> {
    let preset_commodities = args.filter.preset.map(|p| p.commodities()).unwrap_or_default();
    let commodities = or_preset(args.commodities, preset_commodities);
    if commodities.is_empty() {
        return Err(AppError::config("No commodities given and the preset has no default list."));
    }

    let filter: QueryFilter = args.filter.to_filter();
    let path = args
        .out
        .unwrap_or_else(|| session.config.options_dir().join(OPTIONS_REPORT_FILENAME));
    let run = save_options_report(
        &session.client,
        &commodities,
        &filter,
        &path,
        CachePolicy::from_overwrite(args.overwrite),
    )?;

    let mut out = String::new();
    if let Some(report) = &run.report {
        out.push_str(&format::format_report_summary(report));
    }
    out.push_str(&format::format_save_outcome(&run.path, &run.outcome));
    out.push('\n');
    Ok(out)
}

fn handle_collate<T: Transport>(session: &Session<T>, args: CollateArgs) -> Result<String, AppError> {
    let dir = args.dir.unwrap_or_else(|| session.config.options_dir().to_path_buf());
    let path = args
        .out
        .unwrap_or_else(|| session.config.metadata_dir().join(COLLATED_FILENAME));

    let records = collate_option_files(&dir, &CommodityLookup::from_presets())?;
    write_metadata_csv(&path, &records)?;

    let mut out = format::format_collation_summary(&records);
    out.push_str(&format!("Saved {}\n", path.display()));
    Ok(out)
}

fn handle_data<T: Transport>(session: &Session<T>, args: DataArgs) -> Result<String, AppError> {
    let filter = args.filter.to_filter();
    let cache = match &args.cache {
        Some(name) => Some(session.config.raw_dir().join(cache_file_name(name)?)),
        None => None,
    };
    let table = fetch_data(&session.client, &filter, cache.as_deref(), args.cache_policy)?;
    Ok(format::format_table_preview(&table, args.preview))
}

/// Cache names are plain file names; anything that could leave the raw directory is refused.
fn cache_file_name(name: &str) -> Result<&str, AppError> {
    let mut components = Path::new(name).components();
    match (components.next(), components.next()) {
        (Some(Component::Normal(_)), None) if !name.contains(['/', '\\']) => Ok(name),
        _ => Err(AppError::config(format!(
            "Cache name '{name}' must be a plain file name inside the raw data directory."
        ))),
    }
}

fn or_preset(explicit: Vec<String>, preset: &[&str]) -> Vec<String> {
    if explicit.is_empty() {
        preset.iter().map(|s| s.to_string()).collect()
    } else {
        explicit
    }
}
