//! Missing-Candidate Finder — reconciles the newest sheet against the store.
//!
//! Writes the list of candidates that still lack an evaluation, and the
//! exclusion file (emails already in the sheet) that the next run reads.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

use crate::config::EXCLUSION_FILE_NAME;
use crate::exclusions::ExclusionSet;
use crate::models::candidate::{normalize_email, Candidate};
use crate::reporting::export::{read_variant_export, VARIANT_EXPORT_PREFIX};
use crate::store::CandidateStore;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MissingCandidate {
    pub name: String,
    pub email: String,
    pub cv_score: Option<i32>,
    pub interview_score: Option<i32>,
}

impl From<&Candidate> for MissingCandidate {
    fn from(c: &Candidate) -> Self {
        Self {
            name: c.name.clone(),
            email: c.email.clone(),
            cv_score: c.cv_score,
            interview_score: c.interview_score,
        }
    }
}

#[derive(Debug, Clone)]
pub struct MissingReport {
    pub sheet: PathBuf,
    pub processed: usize,
    pub eligible: usize,
    pub missing: Vec<MissingCandidate>,
    pub written: Vec<PathBuf>,
}

#[derive(Debug, Clone)]
pub enum MissingStatus {
    /// No sheet for the variant exists yet; nothing to reconcile.
    NoSheet { output_dir: PathBuf },
    Completed(MissingReport),
}

/// Newest `interview_evaluation_<variant>_<YYYYMMDD>.csv` in `dir`, by name.
pub fn latest_sheet(dir: &Path, prompt_name: &str) -> Result<Option<PathBuf>> {
    if !dir.is_dir() {
        return Ok(None);
    }
    let prefix = format!("{VARIANT_EXPORT_PREFIX}{prompt_name}_");

    let mut newest: Option<String> = None;
    for entry in std::fs::read_dir(dir)
        .with_context(|| format!("Failed to list {}", dir.display()))?
    {
        let name = entry?.file_name().to_string_lossy().into_owned();
        let is_sheet = name
            .strip_prefix(&prefix)
            .and_then(|rest| rest.strip_suffix(".csv"))
            .is_some_and(|stamp| stamp.len() == 8 && stamp.bytes().all(|b| b.is_ascii_digit()));
        if is_sheet && newest.as_deref().map_or(true, |n| name.as_str() > n) {
            newest = Some(name);
        }
    }
    Ok(newest.map(|n| dir.join(n)))
}

pub async fn find_missing(
    store: &dyn CandidateStore,
    output_dir: &Path,
    prompt_name: &str,
    now: DateTime<Utc>,
) -> Result<MissingStatus> {
    let Some(sheet) = latest_sheet(output_dir, prompt_name)? else {
        return Ok(MissingStatus::NoSheet {
            output_dir: output_dir.to_path_buf(),
        });
    };
    info!("Reading sheet: {}", sheet.display());

    let rows = read_variant_export(&sheet)
        .with_context(|| format!("Failed to read sheet {}", sheet.display()))?;
    let processed: HashSet<String> = rows
        .iter()
        .map(|r| normalize_email(&r.email))
        .filter(|e| !e.is_empty())
        .collect();
    info!("Candidates already processed: {}", processed.len());

    let candidates = store
        .fetch_eligible()
        .await
        .context("Failed to fetch candidates with completed interviews")?;

    let missing: Vec<MissingCandidate> = candidates
        .iter()
        .filter(|c| !processed.contains(&c.normalized_email()))
        .map(MissingCandidate::from)
        .collect();

    let mut written = Vec::new();
    let millis = now.timestamp_millis();

    if !missing.is_empty() {
        let users_path = output_dir.join(format!("missing_users_{millis}.json"));
        std::fs::write(&users_path, serde_json::to_string_pretty(&missing)?)
            .with_context(|| format!("Failed to write {}", users_path.display()))?;
        written.push(users_path);

        let emails_path = output_dir.join(format!("missing_emails_{millis}.txt"));
        let emails = missing
            .iter()
            .map(|m| m.email.as_str())
            .filter(|e| !e.is_empty())
            .collect::<Vec<_>>()
            .join("\n");
        std::fs::write(&emails_path, emails)
            .with_context(|| format!("Failed to write {}", emails_path.display()))?;
        written.push(emails_path);
    }

    let exclusion_path = output_dir.join(EXCLUSION_FILE_NAME);
    let exclusions = ExclusionSet::from_emails(&processed);
    std::fs::write(&exclusion_path, exclusions.to_file_contents())
        .with_context(|| format!("Failed to write {}", exclusion_path.display()))?;
    written.push(exclusion_path);

    Ok(MissingStatus::Completed(MissingReport {
        sheet,
        processed: processed.len(),
        eligible: candidates.len(),
        missing,
        written,
    }))
}

/// Numbered list of missing candidates for the console.
pub fn render_missing(report: &MissingReport) -> String {
    let mut out = format!(
        "Sheet: {}\nAlready processed: {} | Eligible: {} | Missing: {}\n",
        report.sheet.display(),
        report.processed,
        report.eligible,
        report.missing.len()
    );
    if report.missing.is_empty() {
        out.push_str("All candidates have already been processed.\n");
    }
    for (i, m) in report.missing.iter().enumerate() {
        let cv = m
            .cv_score
            .map(|s| format!("{s}%"))
            .unwrap_or_else(|| "N/A".to_string());
        out.push_str(&format!("{:>3}. {:<40} | {} | CV: {}\n", i + 1, m.name, m.email, cv));
    }
    for path in &report.written {
        out.push_str(&format!("Written: {}\n", path.display()));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::exclusions::load_exclusions;
    use crate::models::candidate::make_candidate;
    use crate::reporting::export::write_variant_export;
    use crate::reporting::summary::fixtures::record;
    use crate::store::memory::InMemoryCandidateStore;
    use chrono::TimeZone;

    fn touch(dir: &Path, name: &str) {
        std::fs::write(dir.join(name), "Nombre,Email,CV Score,Interview Score\n").unwrap();
    }

    #[test]
    fn test_latest_sheet_picks_newest_matching_variant() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "interview_evaluation_original_20260101.csv");
        touch(dir.path(), "interview_evaluation_original_20260215.csv");
        touch(dir.path(), "interview_evaluation_original_v2_20261231.csv");
        touch(dir.path(), "interview_evaluation_skills_focused_20261231.csv");
        touch(dir.path(), "interview_evaluation_original_20261231.json");

        let latest = latest_sheet(dir.path(), "original").unwrap().unwrap();
        assert_eq!(
            latest.file_name().unwrap(),
            "interview_evaluation_original_20260215.csv"
        );
    }

    #[test]
    fn test_latest_sheet_none_without_output_dir() {
        let dir = tempfile::tempdir().unwrap();
        assert!(latest_sheet(&dir.path().join("nope"), "original").unwrap().is_none());
    }

    #[tokio::test]
    async fn test_find_missing_reports_unprocessed_and_writes_exclusions() {
        let dir = tempfile::tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2026, 2, 5, 12, 0, 0).unwrap();
        write_variant_export(
            dir.path(),
            "original",
            &[record("Ana", "Ana@X.com", &[("original", Some(80))])],
            now,
        )
        .unwrap();
        let store = InMemoryCandidateStore::new(vec![
            make_candidate("Ana", "ana@x.com", 1, 3),
            make_candidate("Ben", "ben@x.com", 1, 3),
        ]);

        let status = find_missing(&store, dir.path(), "original", now).await.unwrap();
        let MissingStatus::Completed(report) = status else {
            panic!("expected a completed reconciliation");
        };

        assert_eq!(report.processed, 1);
        assert_eq!(report.eligible, 2);
        assert_eq!(report.missing.len(), 1);
        assert_eq!(report.missing[0].email, "ben@x.com");
        assert_eq!(report.written.len(), 3);

        let exclusions = load_exclusions(&dir.path().join(EXCLUSION_FILE_NAME))
            .unwrap()
            .unwrap();
        assert!(exclusions.contains("ana@x.com"));
        assert!(!exclusions.contains("ben@x.com"));

        let emails = std::fs::read_to_string(
            dir.path()
                .join(format!("missing_emails_{}.txt", now.timestamp_millis())),
        )
        .unwrap();
        assert_eq!(emails, "ben@x.com");
    }

    #[tokio::test]
    async fn test_find_missing_without_sheet() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryCandidateStore::new(vec![]);
        let status = find_missing(&store, dir.path(), "original", Utc::now())
            .await
            .unwrap();
        assert!(matches!(status, MissingStatus::NoSheet { .. }));
    }

    #[test]
    fn test_render_missing_numbers_rows() {
        let report = MissingReport {
            sheet: PathBuf::from("interview_evaluation_original_20260205.csv"),
            processed: 1,
            eligible: 2,
            missing: vec![MissingCandidate {
                name: "Ben".to_string(),
                email: "ben@x.com".to_string(),
                cv_score: None,
                interview_score: Some(60),
            }],
            written: vec![],
        };
        let text = render_missing(&report);
        assert!(text.contains("Missing: 1"));
        assert!(text.contains("  1. Ben"));
        assert!(text.contains("| ben@x.com | CV: N/A"));
    }
}
