//! Saved parameter-value lists.
//!
//! Used when exploring which values a QuickStats field accepts: the list is
//! written once under the metadata directory and reused afterwards.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use clap::ValueEnum;
use tracing::info;

use crate::domain::{CachePolicy, ParamValue, QueryFilter, SaveOutcome};
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ParamFormat {
    Json,
    Csv,
}

impl ParamFormat {
    pub fn extension(self) -> &'static str {
        match self {
            ParamFormat::Json => "json",
            ParamFormat::Csv => "csv",
        }
    }
}

/// `unit_desc_sector_desc-CROPS_group_desc-FIELD_CROPS` style stem.
pub fn format_param_filename(param: &str, filters: &QueryFilter) -> String {
    let mut parts = vec![param.to_string()];
    parts.extend(filters.iter().map(|(k, v)| format!("{k}-{}", v.replace(' ', "_"))));
    parts.join("_")
}

/// Default location: `<metadata>/<stem>_values.<ext>`.
pub fn default_param_path(metadata_dir: &Path, stem: &str, format: ParamFormat) -> PathBuf {
    metadata_dir.join(format!("{stem}_values.{}", format.extension()))
}

/// Write `values` as a JSON array or a one-column CSV headed by `param`.
pub fn save_parameter_values(
    param: &str,
    values: &[ParamValue],
    format: ParamFormat,
    destination: &Path,
    policy: CachePolicy,
) -> Result<SaveOutcome, AppError> {
    if !policy.writes() {
        return Ok(SaveOutcome::NotSaved);
    }
    if policy.reads_existing() && destination.exists() {
        info!("File already exists: {}", destination.display());
        return Ok(SaveOutcome::Skipped);
    }

    if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }

    match format {
        ParamFormat::Json => {
            let file = File::create(destination).map_err(|e| {
                AppError::io(format!("Failed to create '{}': {e}", destination.display()))
            })?;
            serde_json::to_writer_pretty(file, values)
                .map_err(|e| AppError::io(format!("Failed to write parameter JSON: {e}")))?;
        }
        ParamFormat::Csv => {
            let mut writer = csv::Writer::from_path(destination).map_err(|e| {
                AppError::io(format!("Failed to create '{}': {e}", destination.display()))
            })?;
            writer
                .write_record([param])
                .map_err(|e| AppError::io(format!("Failed to write parameter CSV header: {e}")))?;
            for value in values {
                writer
                    .write_record([value.to_string()])
                    .map_err(|e| AppError::io(format!("Failed to write parameter CSV row: {e}")))?;
            }
            writer
                .flush()
                .map_err(|e| AppError::io(format!("Failed to write parameter CSV: {e}")))?;
        }
    }

    info!("Saved {} '{}' values to: {}", values.len(), param, destination.display());
    Ok(SaveOutcome::Written)
}
