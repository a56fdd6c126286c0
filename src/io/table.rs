//! Minimal in-memory table for QuickStats CSV responses.
//!
//! Values are kept as strings; this crate never interprets the statistics
//! themselves, only passes them through.

use std::fs::File;
use std::path::Path;

use crate::error::AppError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl DataTable {
    /// Parse a CSV body (header row required).
    ///
    /// Errors are reported as `Decode` since the body came from the network.
    pub fn from_csv_str(body: &str) -> Result<Self, AppError> {
        read_table(csv::ReaderBuilder::new().from_reader(body.as_bytes()))
            .map_err(|e| AppError::decode(format!("Failed to parse QuickStats CSV: {e}")))
    }

    /// Parse a cached CSV file. Errors are reported as `Parse`.
    pub fn from_csv_file(path: &Path) -> Result<Self, AppError> {
        let file = File::open(path)
            .map_err(|e| AppError::io(format!("Failed to open CSV '{}': {e}", path.display())))?;
        read_table(csv::ReaderBuilder::new().from_reader(file))
            .map_err(|e| AppError::parse(format!("Invalid CSV '{}': {e}", path.display())))
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// All values of one column, in row order.
    pub fn column(&self, name: &str) -> Option<Vec<&str>> {
        let idx = self.column_index(name)?;
        Some(
            self.rows
                .iter()
                .map(|row| row.get(idx).map(String::as_str).unwrap_or(""))
                .collect(),
        )
    }
}

fn read_table<R: std::io::Read>(mut reader: csv::Reader<R>) -> Result<DataTable, csv::Error> {
    let headers = reader
        .headers()?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').to_string())
        .collect();

    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }

    Ok(DataTable { headers, rows })
}
