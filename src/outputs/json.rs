//! JSON export of a search report.
//!
//! The document carries the run metadata alongside the flat rows so it can be
//! consumed without the HTML:
//!
//! ```text
//! {
//!   "generated_at": "2026-10-16T10:00:00Z",
//!   "since": "2026-10-12T10:00:00Z",
//!   "targets": ["Jane Doe"],
//!   "rows": [{"language": "French", "title": "...", ...}]
//! }
//! ```

use crate::report::ReportRow;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::error::Error;
use tokio::fs;
use tracing::{error, info, instrument};

#[derive(Debug, Serialize, Deserialize)]
pub struct NewsReport {
    pub generated_at: DateTime<Utc>,
    pub since: Option<DateTime<Utc>>,
    pub targets: Vec<String>,
    pub rows: Vec<ReportRow>,
}

/// Write a [`NewsReport`] to a JSON file under `output_dir`.
///
/// Creates the directory if needed and writes the pretty-printed report.
///
/// # Arguments
///
/// * `report` - Run metadata and the flattened report rows
/// * `output_dir` - Directory for exported files
/// * `file_name` - Name of the file, usually from [`export_file_name`](super::export_file_name)
///
/// # Returns
///
/// The path of the written file.
///
/// # Errors
///
/// Returns an error if serialization, directory creation or the write fails.
#[instrument(level = "info", skip_all, fields(%output_dir, %file_name))]
pub async fn write_report(
    report: &NewsReport,
    output_dir: &str,
    file_name: &str,
) -> Result<String, Box<dyn Error>> {
    let json = serde_json::to_string_pretty(report)?;

    if let Err(e) = fs::create_dir_all(output_dir).await {
        error!(error = %e, "Failed to create JSON dir");
        return Err(e.into());
    }

    let path = format!("{}/{}", output_dir.trim_end_matches('/'), file_name);
    fs::write(&path, json).await?;
    info!(%path, rows = report.rows.len(), "Wrote JSON report");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_report_round_trips_rows() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("json");
        let report = NewsReport {
            generated_at: Utc::now(),
            since: None,
            targets: vec!["Jane Doe".to_string()],
            rows: vec![ReportRow {
                language: "French".to_string(),
                title: "Jeanne".to_string(),
                date: "N/A".to_string(),
                description: String::new(),
                link: "https://x".to_string(),
            }],
        };
        let path = write_report(&report, out.to_str().unwrap(), "r.json")
            .await
            .unwrap();
        let back: NewsReport =
            serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
        assert_eq!(back.targets, ["Jane Doe"]);
        assert_eq!(back.rows, report.rows);
    }
}
