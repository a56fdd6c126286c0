//! Options reports: which statistics and units exist for which commodities.
//!
//! Two flavors:
//!
//! - [`build_options_report`] discovers statistics per commodity, then units
//!   per (commodity, statistic).
//! - [`build_unit_report`] checks a fixed list of statistics for one commodity.
//!
//! The `save_*` wrappers check the destination before any request is made, so
//! an existing report costs nothing unless the caller asks for a refresh.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::data::quickstats::QuickStatsClient;
use crate::data::transport::Transport;
use crate::domain::{CachePolicy, OptionsReport, QueryFilter, SaveOutcome};
use crate::error::AppError;
use crate::io::write_report_json;

/// What a `save_*` call did, plus the report when one was built.
#[derive(Debug, Clone)]
pub struct ReportRun {
    pub path: PathBuf,
    pub outcome: SaveOutcome,
    pub report: Option<OptionsReport>,
}

pub fn build_options_report<T: Transport, S: AsRef<str>>(
    client: &QuickStatsClient<T>,
    commodities: &[S],
    filter: &QueryFilter,
) -> Result<OptionsReport, AppError> {
    let mut report = OptionsReport::new();
    for commodity in commodities {
        let commodity = commodity.as_ref();
        report.insert_commodity(commodity);

        let statistics = client.get_statistics(commodity, filter)?;
        for statistic in statistics {
            let units = client.get_valid_units(commodity, &statistic, filter)?;
            report.insert_statistic(commodity, statistic, units);
        }
    }
    Ok(report)
}

pub fn build_unit_report<T: Transport, S: AsRef<str>>(
    client: &QuickStatsClient<T>,
    commodity: &str,
    statistics: &[S],
    filter: &QueryFilter,
) -> Result<OptionsReport, AppError> {
    let mut report = OptionsReport::new();
    report.insert_commodity(commodity);
    for statistic in statistics {
        let statistic = statistic.as_ref();
        let units = client.get_valid_units(commodity, statistic, filter)?;
        report.insert_statistic(commodity, statistic, units);
    }
    Ok(report)
}

/// Build and save a multi-commodity options report at `path`.
pub fn save_options_report<T: Transport, S: AsRef<str>>(
    client: &QuickStatsClient<T>,
    commodities: &[S],
    filter: &QueryFilter,
    path: &Path,
    policy: CachePolicy,
) -> Result<ReportRun, AppError> {
    save_with(path, policy, || build_options_report(client, commodities, filter))
}

/// `CORN` → `CORN__unit_options.json`; spaces become underscores.
pub fn unit_report_filename(commodity: &str) -> String {
    format!("{}__unit_options.json", commodity.trim().replace(' ', "_").to_uppercase())
}

/// Build and save a per-commodity unit report under `dir`.
pub fn save_unit_options_report<T: Transport, S: AsRef<str>>(
    client: &QuickStatsClient<T>,
    commodity: &str,
    statistics: &[S],
    filter: &QueryFilter,
    dir: &Path,
    policy: CachePolicy,
) -> Result<ReportRun, AppError> {
    let path = dir.join(unit_report_filename(commodity));
    info!("Running unit report for: {commodity}");
    save_with(&path, policy, || build_unit_report(client, commodity, statistics, filter))
}

fn save_with<F>(path: &Path, policy: CachePolicy, build: F) -> Result<ReportRun, AppError>
where
    F: FnOnce() -> Result<OptionsReport, AppError>,
{
    if policy.reads_existing() && path.exists() {
        info!("File already exists: {}", path.display());
        return Ok(ReportRun {
            path: path.to_path_buf(),
            outcome: SaveOutcome::Skipped,
            report: None,
        });
    }

    let report = build()?;

    let outcome = if policy.writes() {
        write_report_json(path, &report)?;
        info!(
            "Saved options report ({} commodities) to {}",
            report.len(),
            path.display()
        );
        SaveOutcome::Written
    } else {
        SaveOutcome::NotSaved
    };

    Ok(ReportRun {
        path: path.to_path_buf(),
        outcome,
        report: Some(report),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::data::transport::HttpResponse;
    use crate::data::transport::fake::{Call, FakeTransport};
    use crate::error::ErrorKind;

    /// Answers like the remote would for a tiny CORN/OATS universe.
    fn remote(call: &Call) -> Result<HttpResponse, AppError> {
        let body = match (call.param("param"), call.param("commodity_desc"), call.param("statisticcat_desc")) {
            (Some("statisticcat_desc"), Some("CORN"), None) => r#"{"statisticcat_desc": ["YIELD", "AREA PLANTED"]}"#,
            (Some("statisticcat_desc"), Some("OATS"), None) => r#"{"statisticcat_desc": []}"#,
            (Some("unit_desc"), Some("CORN"), Some("YIELD")) => r#"{"unit_desc": ["BU / ACRE"]}"#,
            (Some("unit_desc"), Some("CORN"), Some("AREA PLANTED")) => r#"{"unit_desc": ["ACRES"]}"#,
            (Some("unit_desc"), _, _) => r#"{}"#,
            _ => return Ok(HttpResponse { status: 400, body: "bad request".into() }),
        };
        Ok(HttpResponse::ok(body))
    }

    fn client(fake: FakeTransport) -> QuickStatsClient<FakeTransport> {
        QuickStatsClient::with_transport(&Config::new("k", "."), fake)
    }

    #[test]
    fn builds_nested_report() {
        let c = client(FakeTransport::new(remote));
        let report = build_options_report(&c, &["CORN", "OATS"], &QueryFilter::new()).unwrap();

        assert_eq!(report.units("CORN", "YIELD").unwrap(), ["BU / ACRE"]);
        assert_eq!(report.units("CORN", "AREA PLANTED").unwrap(), ["ACRES"]);
        // Zero statistics is an empty inner map, not an error.
        assert!(report.commodity("OATS").unwrap().is_empty());
        // 2 statistic lookups + 2 unit lookups.
        assert_eq!(c.transport().call_count(), 4);
    }

    #[test]
    fn unit_report_uses_given_statistics() {
        let c = client(FakeTransport::new(remote));
        let report = build_unit_report(&c, "CORN", &["YIELD", "CONDITION"], &QueryFilter::new()).unwrap();
        assert_eq!(report.units("CORN", "YIELD").unwrap(), ["BU / ACRE"]);
        assert_eq!(report.units("CORN", "CONDITION").unwrap(), Vec::<String>::new().as_slice());
        assert_eq!(c.transport().call_count(), 2);
    }

    #[test]
    fn second_save_makes_no_requests_and_keeps_bytes() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("options.json");
        let c = client(FakeTransport::new(remote));

        let first = save_options_report(&c, &["CORN"], &QueryFilter::new(), &path, CachePolicy::IfAbsent).unwrap();
        assert_eq!(first.outcome, SaveOutcome::Written);
        let calls_after_first = c.transport().call_count();
        let bytes = std::fs::read(&path).unwrap();

        let second = save_options_report(&c, &["CORN"], &QueryFilter::new(), &path, CachePolicy::IfAbsent).unwrap();
        assert_eq!(second.outcome, SaveOutcome::Skipped);
        assert!(second.report.is_none());
        assert_eq!(c.transport().call_count(), calls_after_first);
        assert_eq!(std::fs::read(&path).unwrap(), bytes);
    }

    #[test]
    fn failing_request_aborts_without_writing() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("options.json");
        let c = client(FakeTransport::new(remote));

        // WHEAT is unknown to the fake remote and gets a 400.
        let err = save_options_report(&c, &["CORN", "WHEAT"], &QueryFilter::new(), &path, CachePolicy::Always)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Request);
        assert!(!path.exists());
    }

    #[test]
    fn unit_report_lands_in_named_file() {
        let tmp = tempfile::tempdir().unwrap();
        let c = client(FakeTransport::new(remote));
        let run = save_unit_options_report(&c, "CORN", &["YIELD"], &QueryFilter::new(), tmp.path(), CachePolicy::IfAbsent)
            .unwrap();
        assert_eq!(run.path, tmp.path().join("CORN__unit_options.json"));
        assert!(run.path.exists());
    }

    #[test]
    fn unit_filename_is_sanitized() {
        assert_eq!(unit_report_filename("sweet corn"), "SWEET_CORN__unit_options.json");
    }
}
