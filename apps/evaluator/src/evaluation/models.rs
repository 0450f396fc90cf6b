use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::candidate::Candidate;

/// Score and rationale for a single interview answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionEvaluation {
    pub score: u32, // 0 – 100
    pub explanation: String,
}

/// Outcome of scoring one candidate under one prompt variant.
///
/// When `success` is false, `total_score` is 0, `evaluations` is empty and
/// `error` carries the reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationResult {
    pub prompt_name: String,
    pub success: bool,
    pub total_score: u32,
    pub evaluations: Vec<QuestionEvaluation>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl EvaluationResult {
    pub fn succeeded(prompt_name: &str, evaluations: Vec<QuestionEvaluation>) -> Self {
        Self {
            prompt_name: prompt_name.to_string(),
            success: true,
            total_score: aggregate_score(&evaluations),
            evaluations,
            error: None,
        }
    }

    pub fn failed(prompt_name: &str, error: impl Into<String>) -> Self {
        Self {
            prompt_name: prompt_name.to_string(),
            success: false,
            total_score: 0,
            evaluations: vec![],
            error: Some(error.into()),
        }
    }

    /// The aggregate score, only when it is meaningful.
    pub fn score(&self) -> Option<u32> {
        self.success.then_some(self.total_score)
    }
}

/// Rounded arithmetic mean of the per-question scores; 0 for an empty list.
pub fn aggregate_score(evaluations: &[QuestionEvaluation]) -> u32 {
    if evaluations.is_empty() {
        return 0;
    }
    let sum: u64 = evaluations.iter().map(|e| u64::from(e.score)).sum();
    (sum as f64 / evaluations.len() as f64).round() as u32
}

/// All variant results for one candidate, with the scores they are compared against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEvaluationRecord {
    pub user_id: Uuid,
    pub user_name: String,
    pub user_email: String,
    pub cv_score: Option<i32>,
    pub current_interview_score: Option<i32>,
    /// One entry per registered variant, in registry order.
    pub prompt_results: Vec<EvaluationResult>,
}

impl UserEvaluationRecord {
    pub fn new(candidate: &Candidate, prompt_results: Vec<EvaluationResult>) -> Self {
        Self {
            user_id: candidate.id,
            user_name: candidate.name.clone(),
            user_email: candidate.email.clone(),
            cv_score: candidate.cv_score,
            current_interview_score: candidate.interview_score,
            prompt_results,
        }
    }

    pub fn result_for(&self, prompt_name: &str) -> Option<&EvaluationResult> {
        self.prompt_results
            .iter()
            .find(|r| r.prompt_name == prompt_name)
    }
}
