//! Candidate Record Store — read-only access to interviewed candidates.
//!
//! The run never mutates the store. `PgCandidateStore` is the production
//! backend; tests swap in an in-memory implementation of the trait.

use async_trait::async_trait;
use sqlx::PgPool;

use crate::errors::StoreError;
use crate::models::candidate::{Candidate, CandidateRow};

#[async_trait]
pub trait CandidateStore: Send + Sync {
    /// Candidates whose interview is completed and who have at least one
    /// stored response, oldest first.
    async fn fetch_eligible(&self) -> Result<Vec<Candidate>, StoreError>;
}

pub struct PgCandidateStore {
    pool: PgPool,
}

impl PgCandidateStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CandidateStore for PgCandidateStore {
    async fn fetch_eligible(&self) -> Result<Vec<Candidate>, StoreError> {
        let rows = sqlx::query_as::<_, CandidateRow>(
            r#"
            SELECT id, name, email, cv_score, questions, interview_responses,
                   interview_score, program
            FROM candidates
            WHERE interview_completed = TRUE
              AND cardinality(interview_responses) > 0
            ORDER BY created_at ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(Candidate::from).collect())
    }
}
