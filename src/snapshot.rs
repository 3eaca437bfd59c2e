//! Flat JSON snapshots of a month's intermediate data

use crate::pipeline::MonthReport;
use crate::ReportError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Paths of the snapshot files written for one month
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotPaths {
    pub strategy: PathBuf,
    pub metrics: PathBuf,
    pub insights: PathBuf,
}

impl SnapshotPaths {
    /// `{month}_strategy_data.json`, `{month}_metrics_data.json` and
    /// `{month}_insights.json` inside `dir`
    pub fn for_month(dir: &Path, month: &str) -> Self {
        Self {
            strategy: dir.join(format!("{}_strategy_data.json", month)),
            metrics: dir.join(format!("{}_metrics_data.json", month)),
            insights: dir.join(format!("{}_insights.json", month)),
        }
    }
}

/// Write `value` as pretty-printed JSON
pub fn save_json<T: Serialize>(path: &Path, value: &T) -> Result<(), ReportError> {
    let json = serde_json::to_string_pretty(value)?;
    fs::write(path, json)?;
    log::debug!("Wrote snapshot {}", path.display());
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T, ReportError> {
    let json = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&json)?)
}

/// Write the strategy, metrics and insights snapshots of a run, creating
/// `dir` if needed
pub fn write_month(
    dir: &Path,
    month: &str,
    report: &MonthReport,
) -> Result<SnapshotPaths, ReportError> {
    fs::create_dir_all(dir)?;

    let paths = SnapshotPaths::for_month(dir, month);
    save_json(&paths.strategy, &report.strategy)?;
    save_json(&paths.metrics, &report.metrics)?;
    save_json(&paths.insights, &report.insights)?;

    log::info!("Saved snapshots for {} in {}", month, dir.display());
    Ok(paths)
}
