//! Export writers — one CSV sheet per prompt variant plus a full JSON snapshot.
//!
//! Column names and order of the CSV sheet are an external contract consumed
//! by the admissions staff and by `find-missing`.

use std::fs::File;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::ExportError;
use crate::evaluation::models::UserEvaluationRecord;

/// Sentinel written for an absent CV score or an unusable interview score.
pub const NOT_AVAILABLE: &str = "N/A";

/// File-name prefix of the per-variant sheets.
pub const VARIANT_EXPORT_PREFIX: &str = "interview_evaluation_";

/// One sheet row. Header names are fixed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExportRow {
    #[serde(rename = "Nombre")]
    pub name: String,
    #[serde(rename = "Email")]
    pub email: String,
    #[serde(rename = "CV Score")]
    pub cv_score: String,
    #[serde(rename = "Interview Score")]
    pub interview_score: String,
}

impl ExportRow {
    fn for_variant(record: &UserEvaluationRecord, prompt_name: &str) -> Self {
        let interview_score = record.result_for(prompt_name).and_then(|r| r.score());
        Self {
            name: record.user_name.clone(),
            email: record.user_email.clone(),
            cv_score: score_cell(record.cv_score),
            interview_score: score_cell(interview_score),
        }
    }
}

fn score_cell<T: ToString>(score: Option<T>) -> String {
    score
        .map(|s| s.to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// `interview_evaluation_<variant>_<YYYYMMDD>.csv`, dated in UTC.
pub fn variant_export_file_name(prompt_name: &str, now: DateTime<Utc>) -> String {
    format!(
        "{VARIANT_EXPORT_PREFIX}{prompt_name}_{}.csv",
        now.format("%Y%m%d")
    )
}

/// `prompt_test_results_<epoch-millis>.json`.
pub fn snapshot_file_name(now: DateTime<Utc>) -> String {
    format!("prompt_test_results_{}.json", now.timestamp_millis())
}

pub fn ensure_output_dir(dir: &Path) -> Result<(), ExportError> {
    std::fs::create_dir_all(dir).map_err(|e| ExportError::io(dir, e))
}

/// Writes the sheet for one variant; one row per evaluated candidate.
pub fn write_variant_export(
    dir: &Path,
    prompt_name: &str,
    records: &[UserEvaluationRecord],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(variant_export_file_name(prompt_name, now));
    let file = File::create(&path).map_err(|e| ExportError::io(&path, e))?;

    let mut writer = csv::Writer::from_writer(file);
    if records.is_empty() {
        writer.write_record(["Nombre", "Email", "CV Score", "Interview Score"])?;
    }
    for record in records {
        writer.serialize(ExportRow::for_variant(record, prompt_name))?;
    }
    writer.flush().map_err(|e| ExportError::io(&path, e))?;

    info!("Sheet written: {}", path.display());
    Ok(path)
}

/// Writes every record with full per-question detail, pretty-printed.
pub fn write_snapshot(
    dir: &Path,
    records: &[UserEvaluationRecord],
    now: DateTime<Utc>,
) -> Result<PathBuf, ExportError> {
    let path = dir.join(snapshot_file_name(now));
    let body = serde_json::to_string_pretty(records)?;
    std::fs::write(&path, body).map_err(|e| ExportError::io(&path, e))?;

    info!("JSON snapshot written: {}", path.display());
    Ok(path)
}

/// Reads back a sheet written by `write_variant_export`.
pub fn read_variant_export(path: &Path) -> Result<Vec<ExportRow>, ExportError> {
    let file = File::open(path).map_err(|e| ExportError::io(path, e))?;
    let mut reader = csv::Reader::from_reader(file);
    let rows = reader
        .deserialize::<ExportRow>()
        .collect::<Result<Vec<_>, _>>()?;
    Ok(rows)
}
