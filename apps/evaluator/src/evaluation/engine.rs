//! Evaluation Engine — scores every candidate under every prompt variant.
//!
//! Flow per (candidate, variant): render prompt → paced scoring call →
//! validate response → aggregate. Failures become unsuccessful results and
//! never abort the batch. Candidates and variants run strictly in order.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{error, info, warn};

use crate::evaluation::models::{EvaluationResult, UserEvaluationRecord};
use crate::evaluation::pacer::Pacer;
use crate::evaluation::parser::parse_evaluations;
use crate::evaluation::registry::{PromptRegistry, PromptVariant};
use crate::llm_client::{CompletionConfig, ScoringClient, SCORING_CONFIG};
use crate::models::candidate::{Candidate, InterviewTranscript};

/// Counters an operator uses to reconcile a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunCounts {
    /// Candidates handed to the engine.
    pub candidates: usize,
    /// Candidates evaluated under every variant.
    pub processed: usize,
    /// Candidates skipped because questions and answers did not line up.
    pub skipped_mismatch: usize,
    /// Unsuccessful (candidate, variant) evaluations.
    pub failed_evaluations: usize,
    /// Candidates filtered out by the exclusion set before the run.
    pub excluded: usize,
}

#[derive(Debug, Clone, Default)]
pub struct RunOutcome {
    pub records: Vec<UserEvaluationRecord>,
    pub counts: RunCounts,
}

pub struct Evaluator {
    client: Arc<dyn ScoringClient>,
    config: CompletionConfig,
    pacer: Pacer,
}

impl Evaluator {
    pub fn new(client: Arc<dyn ScoringClient>, call_interval: Duration) -> Self {
        Self {
            client,
            config: SCORING_CONFIG,
            pacer: Pacer::new(call_interval),
        }
    }

    /// Scores one question/answer set under one variant. Never fails: any
    /// call or parse error is returned as an unsuccessful result.
    pub async fn evaluate(
        &self,
        questions: &[String],
        answers: &[String],
        variant: &PromptVariant,
    ) -> EvaluationResult {
        let prompt = variant.render(questions, answers);

        let response = self
            .pacer
            .run(self.client.complete(&prompt, &self.config))
            .await;

        let outcome = response
            .map_err(|e| format!("Scoring call failed: {e}"))
            .and_then(|text| {
                parse_evaluations(&text).map_err(|e| format!("Invalid scoring response: {e}"))
            });

        match outcome {
            Ok(evaluations) => {
                if evaluations.len() != answers.len() {
                    warn!(
                        "Variant '{}' returned {} evaluations for {} answers",
                        variant.name,
                        evaluations.len(),
                        answers.len()
                    );
                }
                EvaluationResult::succeeded(&variant.name, evaluations)
            }
            Err(message) => {
                error!("Error evaluating with {}: {}", variant.name, message);
                EvaluationResult::failed(&variant.name, message)
            }
        }
    }

    /// Evaluates every candidate under every registered variant, in order.
    pub async fn run(&self, candidates: &[Candidate], registry: &PromptRegistry) -> RunOutcome {
        let mut outcome = RunOutcome {
            records: Vec::with_capacity(candidates.len()),
            counts: RunCounts {
                candidates: candidates.len(),
                ..RunCounts::default()
            },
        };
        let total = candidates.len();

        for (i, candidate) in candidates.iter().enumerate() {
            info!(
                "[{}/{}] Candidate: {} ({})",
                i + 1,
                total,
                candidate.name,
                candidate.email
            );

            let (questions, answers) = match candidate.transcript() {
                InterviewTranscript::Aligned { questions, answers } => (questions, answers),
                InterviewTranscript::Mismatch {
                    question_count,
                    answer_count,
                } => {
                    warn!(
                        "Skipping {}: {} questions but {} answers",
                        candidate.email, question_count, answer_count
                    );
                    outcome.counts.skipped_mismatch += 1;
                    continue;
                }
            };

            let mut prompt_results = Vec::with_capacity(registry.len());
            for variant in registry.iter() {
                info!("Scoring with prompt '{}'", variant.name);
                let result = self.evaluate(&questions, answers, variant).await;
                if result.success {
                    info!("'{}' score: {}%", variant.name, result.total_score);
                } else {
                    outcome.counts.failed_evaluations += 1;
                }
                prompt_results.push(result);
            }

            outcome
                .records
                .push(UserEvaluationRecord::new(candidate, prompt_results));
            outcome.counts.processed += 1;
        }

        outcome
    }
}
