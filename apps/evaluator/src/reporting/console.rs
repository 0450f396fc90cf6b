//! Operator-facing run report, rendered to a string and printed by `main`.

use std::fmt::Write;
use std::path::PathBuf;

use crate::evaluation::engine::RunCounts;
use crate::evaluation::models::UserEvaluationRecord;
use crate::reporting::summary::RunSummary;

const RULE_WIDTH: usize = 80;

/// Everything a finished run hands to the console.
#[derive(Debug, Clone)]
pub struct RunReport {
    pub counts: RunCounts,
    pub summaries: Vec<RunSummary>,
    pub records: Vec<UserEvaluationRecord>,
    /// (variant, sheet path) in registry order.
    pub sheets: Vec<(String, PathBuf)>,
    pub snapshot: PathBuf,
    pub output_dir: PathBuf,
}

pub fn render_report(report: &RunReport, compare_limit: usize) -> String {
    let mut out = String::new();
    let rule = "-".repeat(RULE_WIDTH);

    // Writing into a String cannot fail.
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(out, "RUN RESULTS\n");
    let _ = writeln!(out, "{}", render_counts(&report.counts));

    let _ = writeln!(out, "\nAVERAGE SCORE PER PROMPT:");
    let _ = writeln!(out, "{rule}");
    for summary in &report.summaries {
        let _ = writeln!(out, "{}", render_summary_line(summary));
    }

    let shown = compare_limit.min(report.records.len());
    let _ = writeln!(out, "\n\nPER-CANDIDATE COMPARISON (first {shown}):");
    let _ = writeln!(out, "{rule}");
    for record in report.records.iter().take(compare_limit) {
        out.push_str(&render_comparison(record));
    }

    let _ = writeln!(out, "\nJSON snapshot: {}", report.snapshot.display());
    let _ = writeln!(out, "\nSHEETS WRITTEN:");
    let _ = writeln!(out, "{rule}");
    for (name, path) in &report.sheets {
        let file_name = path
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let _ = writeln!(out, "  {name}: {file_name}");
    }
    let _ = writeln!(out, "\nAll files are in: {}", report.output_dir.display());

    out
}

pub fn render_counts(counts: &RunCounts) -> String {
    format!(
        "Candidates: {} | Processed: {} | Skipped (mismatch): {} | Failed (evaluation error): {} | Excluded: {}",
        counts.candidates,
        counts.processed,
        counts.skipped_mismatch,
        counts.failed_evaluations,
        counts.excluded
    )
}

pub fn render_summary_line(summary: &RunSummary) -> String {
    match &summary.stats {
        Some(stats) => format!(
            "{:<20} | Mean: {:.1}% | Min: {}% | Max: {}% | StdDev: {:.1}% | Users: {}",
            summary.prompt_name, stats.mean, stats.min, stats.max, stats.std_dev, summary.count
        ),
        None => format!(
            "{:<20} | no successful evaluations | Users: 0",
            summary.prompt_name
        ),
    }
}

/// Each successful variant score with its signed delta from the stored interview score.
pub fn render_comparison(record: &UserEvaluationRecord) -> String {
    let mut out = format!(
        "\n{} (CV: {} | Current interview: {})\n",
        record.user_name,
        percent_or_na(record.cv_score),
        percent_or_na(record.current_interview_score)
    );

    for result in record.prompt_results.iter().filter(|r| r.success) {
        let delta = record
            .current_interview_score
            .map(|current| i64::from(result.total_score) - i64::from(current))
            .map(|d| format!(" ({})", signed_percent(d)))
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "  {:<20}: {}%{}",
            result.prompt_name, result.total_score, delta
        );
    }
    out
}

fn percent_or_na(score: Option<i32>) -> String {
    score
        .map(|s| format!("{s}%"))
        .unwrap_or_else(|| "N/A".to_string())
}

fn signed_percent(delta: i64) -> String {
    if delta > 0 {
        format!("+{delta}%")
    } else {
        format!("{delta}%")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reporting::summary::fixtures::record;
    use crate::reporting::summary::ScoreStats;

    #[test]
    fn test_summary_line_formats_one_decimal() {
        let summary = RunSummary {
            prompt_name: "original".to_string(),
            count: 3,
            stats: Some(ScoreStats {
                mean: 76.666,
                min: 60,
                max: 90,
                std_dev: 12.47,
            }),
        };
        assert_eq!(
            render_summary_line(&summary),
            "original             | Mean: 76.7% | Min: 60% | Max: 90% | StdDev: 12.5% | Users: 3"
        );
    }

    #[test]
    fn test_summary_line_without_successes_has_no_numbers() {
        let summary = RunSummary {
            prompt_name: "skills_focused".to_string(),
            count: 0,
            stats: None,
        };
        let line = render_summary_line(&summary);
        assert!(line.contains("no successful evaluations"));
        assert!(!line.contains("Mean"));
    }

    #[test]
    fn test_comparison_shows_signed_deltas() {
        // current interview score in fixture is 75
        let rec = record(
            "Ana",
            "ana@x.com",
            &[("original", Some(80)), ("skills_focused", Some(70)), ("v3", None)],
        );
        let text = render_comparison(&rec);
        assert!(text.contains("Ana (CV: 70% | Current interview: 75%)"));
        assert!(text.contains("original            : 80% (+5%)"));
        assert!(text.contains("skills_focused      : 70% (-5%)"));
        assert!(!text.contains("v3"));
    }

    #[test]
    fn test_comparison_without_stored_score_has_no_delta() {
        let mut rec = record("Ana", "ana@x.com", &[("original", Some(75))]);
        rec.current_interview_score = None;
        let text = render_comparison(&rec);
        assert!(text.contains("Current interview: N/A"));
        assert!(text.contains("original            : 75%\n"));
    }

    #[test]
    fn test_equal_scores_show_zero_delta() {
        let rec = record("Ana", "ana@x.com", &[("original", Some(75))]);
        assert!(render_comparison(&rec).contains("75% (0%)"));
    }

    #[test]
    fn test_report_limits_comparison_and_lists_counts() {
        let records: Vec<_> = (0..7)
            .map(|i| record(&format!("User{i}"), &format!("u{i}@x.com"), &[("original", Some(50))]))
            .collect();
        let report = RunReport {
            counts: RunCounts {
                candidates: 9,
                processed: 7,
                skipped_mismatch: 2,
                failed_evaluations: 0,
                excluded: 4,
            },
            summaries: vec![],
            records,
            sheets: vec![(
                "original".to_string(),
                PathBuf::from("out/interview_evaluation_original_20260307.csv"),
            )],
            snapshot: PathBuf::from("out/prompt_test_results_1.json"),
            output_dir: PathBuf::from("out"),
        };

        let text = render_report(&report, 5);
        assert!(text.contains("Processed: 7 | Skipped (mismatch): 2 | Failed (evaluation error): 0"));
        assert!(text.contains("PER-CANDIDATE COMPARISON (first 5)"));
        assert!(text.contains("User4 ("));
        assert!(!text.contains("User5 ("));
        assert!(text.contains("  original: interview_evaluation_original_20260307.csv"));
    }
}
