//! Read/write options-report JSON files.
//!
//! The schema is defined by `domain::OptionsReport`: an object keyed by
//! commodity whose values map statistic name to a list of unit strings.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use crate::domain::OptionsReport;
use crate::error::AppError;

/// Write a report as pretty-printed JSON, replacing any existing file.
pub fn write_report_json(path: &Path, report: &OptionsReport) -> Result<(), AppError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| {
            AppError::io(format!("Failed to create directory '{}': {e}", parent.display()))
        })?;
    }

    let file = File::create(path)
        .map_err(|e| AppError::io(format!("Failed to create report JSON '{}': {e}", path.display())))?;
    let mut writer = BufWriter::new(file);

    serde_json::to_writer_pretty(&mut writer, report)
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write report JSON: {e}")))?;

    Ok(())
}

/// Read a report JSON file; anything but the two-level shape is a `Parse` error.
pub fn read_report_json(path: &Path) -> Result<OptionsReport, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::io(format!("Failed to open report JSON '{}': {e}", path.display())))?;
    serde_json::from_reader(file)
        .map_err(|e| AppError::parse(format!("Invalid options report '{}': {e}", path.display())))
}
