//! Full-data (`api_GET`) downloads with an optional CSV cache file.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::data::quickstats::QuickStatsClient;
use crate::data::transport::Transport;
use crate::domain::{CachePolicy, QueryFilter};
use crate::error::AppError;
use crate::io::DataTable;

/// Fetch observations matching `filter` as a table.
///
/// With a cache path and [`CachePolicy::IfAbsent`], an existing file is parsed
/// and returned without touching the network. A fresh response is written
/// verbatim to the cache path (unless the policy is `Never`) only after it has
/// parsed successfully.
pub fn fetch_data<T: Transport>(
    client: &QuickStatsClient<T>,
    filter: &QueryFilter,
    cache: Option<&Path>,
    policy: CachePolicy,
) -> Result<DataTable, AppError> {
    if let Some(path) = cache {
        if policy.reads_existing() && path.exists() {
            info!("Loading cached file: {}", path.display());
            return DataTable::from_csv_file(path);
        }
    }

    let body = client.get_data_csv(filter)?;
    let table = DataTable::from_csv_str(&body)?;

    if let Some(path) = cache.filter(|_| policy.writes()) {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| {
                AppError::io(format!("Failed to create cache dir '{}': {e}", parent.display()))
            })?;
        }
        fs::write(path, body.as_bytes()).map_err(|e| {
            AppError::io(format!("Failed to write cache file '{}': {e}", path.display()))
        })?;
        info!("Saved to cache: {} ({} rows)", path.display(), table.len());
    }

    Ok(table)
}
