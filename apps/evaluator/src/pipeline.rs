//! Evaluation run — orchestrates a full batch.
//!
//! Flow: output dir → exclusion set → fetch eligible candidates → filter →
//!       evaluate (sequential, paced) → per-variant sheets → JSON snapshot →
//!       summaries for the console.
//!
//! Only setup and export-write failures abort the run; per-candidate and
//! per-evaluation problems are counted and carried as data.

use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use chrono::Utc;
use tracing::{info, warn};

use crate::evaluation::engine::Evaluator;
use crate::evaluation::models::UserEvaluationRecord;
use crate::evaluation::registry::PromptRegistry;
use crate::exclusions::load_exclusions;
use crate::reporting::console::RunReport;
use crate::reporting::export::{ensure_output_dir, write_snapshot, write_variant_export};
use crate::reporting::summary::summarize_all;
use crate::store::CandidateStore;

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub exclusion_file: PathBuf,
}

#[derive(Debug, Clone)]
pub enum RunStatus {
    /// Nothing left to evaluate after filtering; not an error.
    NoEligibleCandidates { eligible: usize, excluded: usize },
    Completed(RunReport),
}

pub async fn run_evaluation(
    store: &dyn CandidateStore,
    evaluator: &Evaluator,
    registry: &PromptRegistry,
    options: &RunOptions,
) -> Result<RunStatus> {
    if registry.is_empty() {
        bail!("No prompt variants registered");
    }
    ensure_output_dir(&options.output_dir).context("Output directory could not be created")?;

    let exclusions = load_exclusions(&options.exclusion_file)?;

    let mut candidates = store
        .fetch_eligible()
        .await
        .context("Failed to fetch candidates with completed interviews")?;
    let eligible = candidates.len();
    info!("Found {eligible} candidates with completed interviews");

    let excluded = match &exclusions {
        Some(set) => {
            if set.is_empty() {
                warn!(
                    "Exclusion file {} lists no valid addresses",
                    options.exclusion_file.display()
                );
            }
            let dropped = set.retain_unlisted(&mut candidates);
            info!(
                "Excluding {} already-processed candidates ({} listed in {}); {} to process",
                dropped,
                set.len(),
                options.exclusion_file.display(),
                candidates.len()
            );
            dropped
        }
        None => 0,
    };

    if candidates.is_empty() {
        return Ok(RunStatus::NoEligibleCandidates { eligible, excluded });
    }

    info!(
        "Starting prompt evaluation: {} candidates x {} prompts",
        candidates.len(),
        registry.len()
    );
    let mut outcome = evaluator.run(&candidates, registry).await;
    outcome.counts.excluded = excluded;

    let (sheets, snapshot) = write_exports(&options.output_dir, registry, &outcome.records)?;

    Ok(RunStatus::Completed(RunReport {
        counts: outcome.counts,
        summaries: summarize_all(registry, &outcome.records),
        records: outcome.records,
        sheets,
        snapshot,
        output_dir: options.output_dir.clone(),
    }))
}

type WrittenExports = (Vec<(String, PathBuf)>, PathBuf);

fn write_exports(
    dir: &Path,
    registry: &PromptRegistry,
    records: &[UserEvaluationRecord],
) -> Result<WrittenExports> {
    let now = Utc::now();

    let mut sheets = Vec::with_capacity(registry.len());
    for name in registry.names() {
        let path = write_variant_export(dir, name, records, now)
            .with_context(|| format!("Failed to export sheet for prompt '{name}'"))?;
        sheets.push((name.to_string(), path));
    }

    let snapshot = write_snapshot(dir, records, now).context("Failed to write JSON snapshot")?;
    Ok((sheets, snapshot))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use super::*;
    use crate::config::EXCLUSION_FILE_NAME;
    use crate::evaluation::engine::testing::ScriptedClient;
    use crate::models::candidate::make_candidate;
    use crate::store::memory::InMemoryCandidateStore;

    const GOOD: &str = r#"{"evaluations":[{"score":70,"explanation":"a"},{"score":90,"explanation":"b"},{"score":80,"explanation":"c"}]}"#;

    fn options(dir: &Path) -> RunOptions {
        RunOptions {
            output_dir: dir.to_path_buf(),
            exclusion_file: dir.join(EXCLUSION_FILE_NAME),
        }
    }

    fn files_with_prefix(dir: &Path, prefix: &str) -> Vec<String> {
        std::fs::read_dir(dir)
            .unwrap()
            .filter_map(|e| e.ok())
            .map(|e| e.file_name().to_string_lossy().into_owned())
            .filter(|n| n.starts_with(prefix))
            .collect()
    }

    #[tokio::test]
    async fn test_full_run_writes_sheets_and_snapshot() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryCandidateStore::new(vec![
            make_candidate("Ana", "ana@x.com", 1, 3),
            make_candidate("Ben", "ben@x.com", 0, 3), // mismatch
        ]);
        let evaluator = Evaluator::new(
            Arc::new(ScriptedClient::replying(&[GOOD, "not json"])),
            Duration::ZERO,
        );
        let registry = PromptRegistry::builtin().unwrap();

        let status = run_evaluation(&store, &evaluator, &registry, &options(dir.path()))
            .await
            .unwrap();

        let report = match status {
            RunStatus::Completed(report) => report,
            other => panic!("expected completed run, got {other:?}"),
        };
        assert_eq!(report.counts.candidates, 2);
        assert_eq!(report.counts.processed, 1);
        assert_eq!(report.counts.skipped_mismatch, 1);
        assert_eq!(report.counts.failed_evaluations, 1);
        assert_eq!(report.summaries[0].count, 1);
        assert_eq!(report.summaries[1].count, 0);
        assert_eq!(report.sheets.len(), 2);

        assert_eq!(files_with_prefix(dir.path(), "interview_evaluation_").len(), 2);
        assert_eq!(files_with_prefix(dir.path(), "prompt_test_results_").len(), 1);

        // Mismatched candidate has no row in any sheet
        for (_, path) in &report.sheets {
            let text = std::fs::read_to_string(path).unwrap();
            assert!(!text.contains("ben@x.com"));
            assert!(text.contains("ana@x.com"));
        }
        let skills = std::fs::read_to_string(&report.sheets[1].1).unwrap();
        assert!(skills.contains("Ana,ana@x.com,70,N/A"));
    }

    #[tokio::test]
    async fn test_exclusion_file_filters_candidates() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EXCLUSION_FILE_NAME), "ANA@x.com\n").unwrap();
        let store = InMemoryCandidateStore::new(vec![
            make_candidate("Ana", "ana@x.com", 1, 3),
            make_candidate("Ben", "ben@x.com", 1, 3),
        ]);
        let client = Arc::new(ScriptedClient::replying(&[GOOD, GOOD]));
        let evaluator = Evaluator::new(client.clone(), Duration::ZERO);

        let status = run_evaluation(&store, &evaluator, &PromptRegistry::builtin().unwrap(), &options(dir.path()))
            .await
            .unwrap();

        let RunStatus::Completed(report) = status else {
            panic!("expected completed run");
        };
        assert_eq!(report.counts.excluded, 1);
        assert_eq!(report.records.len(), 1);
        assert_eq!(report.records[0].user_email, "ben@x.com");
        assert_eq!(client.call_count(), 2);
    }

    #[tokio::test]
    async fn test_everything_excluded_is_early_exit() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(EXCLUSION_FILE_NAME), "ana@x.com\n").unwrap();
        let store = InMemoryCandidateStore::new(vec![make_candidate("Ana", "ana@x.com", 1, 3)]);
        let client = Arc::new(ScriptedClient::default());
        let evaluator = Evaluator::new(client.clone(), Duration::ZERO);

        let status = run_evaluation(&store, &evaluator, &PromptRegistry::builtin().unwrap(), &options(dir.path()))
            .await
            .unwrap();

        assert!(matches!(
            status,
            RunStatus::NoEligibleCandidates { eligible: 1, excluded: 1 }
        ));
        assert_eq!(client.call_count(), 0);
        assert!(files_with_prefix(dir.path(), "interview_evaluation_").is_empty());
    }

    #[tokio::test]
    async fn test_empty_registry_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let store = InMemoryCandidateStore::new(vec![make_candidate("Ana", "ana@x.com", 1, 3)]);
        let evaluator = Evaluator::new(Arc::new(ScriptedClient::default()), Duration::ZERO);

        let err = run_evaluation(&store, &evaluator, &PromptRegistry::new(), &options(dir.path()))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("No prompt variants"));
    }

    #[tokio::test]
    async fn test_unreachable_store_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let evaluator = Evaluator::new(Arc::new(ScriptedClient::default()), Duration::ZERO);

        let err = run_evaluation(
            &InMemoryCandidateStore::unreachable(),
            &evaluator,
            &PromptRegistry::builtin().unwrap(),
            &options(dir.path()),
        )
        .await
        .unwrap_err();

        assert!(err.to_string().contains("Failed to fetch candidates"));
    }

    #[tokio::test]
    async fn test_uncreatable_output_dir_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, "a file, not a directory").unwrap();
        let store = InMemoryCandidateStore::new(vec![make_candidate("Ana", "ana@x.com", 1, 3)]);
        let evaluator = Evaluator::new(Arc::new(ScriptedClient::default()), Duration::ZERO);

        let err = run_evaluation(&store, &evaluator, &PromptRegistry::builtin().unwrap(), &options(&blocker))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("Output directory could not be created"));
    }
}
