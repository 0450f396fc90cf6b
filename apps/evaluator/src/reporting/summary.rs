use serde::Serialize;

use crate::evaluation::models::UserEvaluationRecord;
use crate::evaluation::registry::PromptRegistry;

/// Descriptive statistics over successful aggregate scores.
/// Mean and standard deviation use population formulas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoreStats {
    pub mean: f64,
    pub min: u32,
    pub max: u32,
    pub std_dev: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub prompt_name: String,
    /// Number of successful evaluations for this variant.
    pub count: usize,
    /// `None` when no evaluation succeeded.
    pub stats: Option<ScoreStats>,
}

/// Summarizes one variant across all records. Pure function of its input.
pub fn summarize(prompt_name: &str, records: &[UserEvaluationRecord]) -> RunSummary {
    let scores: Vec<u32> = records
        .iter()
        .filter_map(|r| r.result_for(prompt_name))
        .filter_map(|r| r.score())
        .collect();

    RunSummary {
        prompt_name: prompt_name.to_string(),
        count: scores.len(),
        stats: compute_stats(&scores),
    }
}

/// One summary per registered variant, in registry order.
pub fn summarize_all(registry: &PromptRegistry, records: &[UserEvaluationRecord]) -> Vec<RunSummary> {
    registry.names().map(|name| summarize(name, records)).collect()
}

fn compute_stats(scores: &[u32]) -> Option<ScoreStats> {
    let min = *scores.iter().min()?;
    let max = *scores.iter().max()?;
    let n = scores.len() as f64;

    let mean = scores.iter().map(|&s| f64::from(s)).sum::<f64>() / n;
    let variance = scores
        .iter()
        .map(|&s| (f64::from(s) - mean).powi(2))
        .sum::<f64>()
        / n;

    Some(ScoreStats {
        mean,
        min,
        max,
        std_dev: variance.sqrt(),
    })
}

#[cfg(test)]
pub(crate) mod fixtures {
    use uuid::Uuid;

    use crate::evaluation::models::{EvaluationResult, QuestionEvaluation, UserEvaluationRecord};

    /// `scores` holds one entry per variant, `None` meaning a failed evaluation.
    pub fn record(name: &str, email: &str, scores: &[(&str, Option<u32>)]) -> UserEvaluationRecord {
        UserEvaluationRecord {
            user_id: Uuid::new_v4(),
            user_name: name.to_string(),
            user_email: email.to_string(),
            cv_score: Some(70),
            current_interview_score: Some(75),
            prompt_results: scores
                .iter()
                .map(|(variant, score)| match score {
                    Some(s) => EvaluationResult::succeeded(
                        variant,
                        vec![QuestionEvaluation {
                            score: *s,
                            explanation: "fixture".to_string(),
                        }],
                    ),
                    None => EvaluationResult::failed(variant, "fixture failure"),
                })
                .collect(),
        }
    }
}
