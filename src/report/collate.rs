//! Flatten saved options reports into one long-form metadata table.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::presets::CommodityLookup;
use crate::domain::{MetadataRecord, OptionsReport};
use crate::error::AppError;
use crate::io::read_report_json;

pub const COLLATED_FILENAME: &str = "unit_options_collated.csv";

/// `*.json` files directly inside `dir`, sorted by file name.
pub fn list_report_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    let entries = fs::read_dir(dir)
        .map_err(|e| AppError::io(format!("Failed to read directory '{}': {e}", dir.display())))?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| AppError::io(format!("Failed to read directory entry: {e}")))?;
        let path = entry.path();
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json && path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// One record per (commodity, statistic, unit) in `report`.
pub fn flatten_report(report: &OptionsReport, lookup: &CommodityLookup) -> Vec<MetadataRecord> {
    report
        .triples()
        .map(|(commodity, statistic, unit)| {
            let class = lookup.classify(commodity);
            MetadataRecord {
                sector: class.sector,
                group: class.group,
                commodity: commodity.to_string(),
                statistic: statistic.to_string(),
                unit: unit.to_string(),
            }
        })
        .collect()
}

/// Read every report in `dir` and flatten them.
///
/// A single malformed file fails the whole collation.
pub fn collate_option_files(dir: &Path, lookup: &CommodityLookup) -> Result<Vec<MetadataRecord>, AppError> {
    let files = list_report_files(dir)?;
    let mut records = Vec::new();
    for path in &files {
        let report = read_report_json(path)?;
        records.extend(flatten_report(&report, lookup));
    }
    info!("Collated {} records from {} files in {}", records.len(), files.len(), dir.display());
    Ok(records)
}

/// Write records as CSV with header `SECTOR,GROUP,COMMODITY,STATISTIC,UNIT`.
pub fn write_metadata_csv(path: &Path, records: &[MetadataRecord]) -> Result<(), AppError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| AppError::io(format!("Failed to create metadata CSV '{}': {e}", path.display())))?;

    // Written explicitly so an empty table still has its header.
    writer
        .write_record(["SECTOR", "GROUP", "COMMODITY", "STATISTIC", "UNIT"])
        .map_err(|e| AppError::io(format!("Failed to write metadata CSV header: {e}")))?;
    for record in records {
        writer
            .serialize(record)
            .map_err(|e| AppError::io(format!("Failed to write metadata CSV row: {e}")))?;
    }
    writer
        .flush()
        .map_err(|e| AppError::io(format!("Failed to write metadata CSV: {e}")))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::presets::UNKNOWN;
    use crate::error::ErrorKind;

    fn write(dir: &Path, name: &str, body: &str) {
        std::fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn single_file_round_trip() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "CORN__unit_options.json", r#"{"CORN": {"YIELD": ["BU/ACRE"]}}"#);
        let mut lookup = CommodityLookup::empty();
        lookup.insert("CORN", "CROPS", "FIELD CROPS");

        let records = collate_option_files(tmp.path(), &lookup).unwrap();
        assert_eq!(
            records,
            vec![MetadataRecord {
                sector: "CROPS".into(),
                group: "FIELD CROPS".into(),
                commodity: "CORN".into(),
                statistic: "YIELD".into(),
                unit: "BU/ACRE".into(),
            }]
        );
    }

    #[test]
    fn unmapped_commodity_falls_back_to_unknown() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.json", r#"{"KALE": {"PRODUCTION": ["TONS"]}}"#);
        let records = collate_option_files(tmp.path(), &CommodityLookup::from_presets()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].sector, UNKNOWN);
        assert_eq!(records[0].group, UNKNOWN);
    }

    #[test]
    fn files_are_read_in_name_order_and_non_json_ignored() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b.json", r#"{"WHEAT": {"YIELD": ["BU / ACRE"]}}"#);
        write(tmp.path(), "a.json", r#"{"OATS": {"YIELD": ["BU / ACRE"]}}"#);
        write(tmp.path(), "notes.txt", "not json");
        std::fs::create_dir(tmp.path().join("nested.json")).unwrap();

        let records = collate_option_files(tmp.path(), &CommodityLookup::from_presets()).unwrap();
        let commodities: Vec<_> = records.iter().map(|r| r.commodity.as_str()).collect();
        assert_eq!(commodities, vec!["OATS", "WHEAT"]);
    }

    #[test]
    fn malformed_file_fails_collation() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "a.json", r#"{"CORN": {"YIELD": ["BU / ACRE"]}}"#);
        write(tmp.path(), "b.json", r#"{"YIELD": ["BU / ACRE"]}"#);
        let err = collate_option_files(tmp.path(), &CommodityLookup::from_presets()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Parse);
        assert!(err.message().contains("b.json"));
    }

    #[test]
    fn csv_has_uppercase_header() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("out.csv");
        let records = vec![MetadataRecord {
            sector: "CROPS".into(),
            group: "FIELD CROPS".into(),
            commodity: "CORN".into(),
            statistic: "YIELD".into(),
            unit: "BU / ACRE".into(),
        }];
        write_metadata_csv(&path, &records).unwrap();
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "SECTOR,GROUP,COMMODITY,STATISTIC,UNIT\nCROPS,FIELD CROPS,CORN,YIELD,BU / ACRE\n"
        );

        write_metadata_csv(&path, &[]).unwrap();
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "SECTOR,GROUP,COMMODITY,STATISTIC,UNIT\n");
    }
}
