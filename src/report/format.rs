//! Formatted terminal output for the `nass` commands.
//!
//! Kept apart from the fetch/report code so output changes stay local.

use std::collections::BTreeMap;
use std::path::Path;

use crate::domain::{MetadataRecord, OptionsReport, ParamValue, SaveOutcome};
use crate::io::DataTable;

/// One value per line under a `param (n)` heading.
pub fn format_param_values(param: &str, values: &[ParamValue]) -> String {
    let mut out = format!("{param} ({} values)\n", values.len());
    for value in values {
        out.push_str(&format!("  {value}\n"));
    }
    out
}

/// Per-commodity statistic/unit counts.
pub fn format_report_summary(report: &OptionsReport) -> String {
    let mut out = String::new();
    out.push_str(&format!("{:<24} {:>10} {:>8}\n", "COMMODITY", "STATISTICS", "UNITS"));
    for (commodity, stats) in report.commodities() {
        let units: usize = stats.values().map(Vec::len).sum();
        out.push_str(&format!("{:<24} {:>10} {:>8}\n", commodity, stats.len(), units));
    }
    out
}

pub fn format_save_outcome(path: &Path, outcome: &SaveOutcome) -> String {
    match outcome {
        SaveOutcome::Written => format!("Saved {}", path.display()),
        SaveOutcome::Skipped => format!("Exists, skipped {} (use --overwrite to refresh)", path.display()),
        SaveOutcome::NotSaved => "Not saved (cache policy: never)".to_string(),
    }
}

/// Record counts grouped by sector/group.
pub fn format_collation_summary(records: &[MetadataRecord]) -> String {
    let mut counts: BTreeMap<(&str, &str), usize> = BTreeMap::new();
    for r in records {
        *counts.entry((r.sector.as_str(), r.group.as_str())).or_default() += 1;
    }

    let mut out = format!("{} records\n", records.len());
    for ((sector, group), n) in counts {
        out.push_str(&format!("  {sector} / {group}: {n}\n"));
    }
    out
}

/// Header line, row count and up to `preview` rows.
pub fn format_table_preview(table: &DataTable, preview: usize) -> String {
    let mut out = format!("{} rows x {} columns\n", table.len(), table.headers.len());
    out.push_str(&table.headers.join(","));
    out.push('\n');
    for row in table.rows.iter().take(preview) {
        out.push_str(&row.join(","));
        out.push('\n');
    }
    if table.len() > preview {
        out.push_str(&format!("... {} more\n", table.len() - preview));
    }
    out
}
