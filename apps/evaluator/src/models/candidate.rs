use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Program whose final interview question asks for a scholarship justification.
pub const SCHOLARSHIP_PROGRAM: &str = "FUTURE_INNOVATORS_JAPAN";

pub const MOTIVATION_QUESTION: &str = "What is your motivation for applying to this program and joining Mirai Innovation Research Institute?";
pub const SCHOLARSHIP_QUESTION: &str = "Why do you deserve to be awarded this scholarship?";
pub const FINANCING_QUESTION: &str = "What is your plan to finance your tuition, travel expenses, and accommodation during your stay in Japan?";

/// Row as read from `candidates`. Older rows may carry NULLs in any of the
/// text columns.
#[derive(Debug, Clone, FromRow)]
pub struct CandidateRow {
    pub id: Uuid,
    pub name: Option<String>,
    pub email: Option<String>,
    pub cv_score: Option<i32>,
    pub questions: Option<Vec<String>>,
    pub interview_responses: Option<Vec<String>>,
    pub interview_score: Option<i32>,
    pub program: Option<String>,
}

impl From<CandidateRow> for Candidate {
    fn from(row: CandidateRow) -> Self {
        Self {
            id: row.id,
            name: row.name.unwrap_or_default(),
            email: row.email.unwrap_or_default(),
            cv_score: row.cv_score,
            questions: row.questions.unwrap_or_default(),
            interview_responses: row.interview_responses.unwrap_or_default(),
            interview_score: row.interview_score,
            program: row.program,
        }
    }
}

/// A candidate who completed the recorded interview.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candidate {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub cv_score: Option<i32>,
    /// Generated questions, in the order they were asked.
    pub questions: Vec<String>,
    /// Answers aligned with `questions` plus the two fixed trailing questions.
    pub interview_responses: Vec<String>,
    pub interview_score: Option<i32>,
    pub program: Option<String>,
}

/// Full question set as asked during the interview, or the mismatch that
/// disqualifies the candidate from this run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InterviewTranscript<'a> {
    Aligned {
        questions: Vec<String>,
        answers: &'a [String],
    },
    Mismatch {
        question_count: usize,
        answer_count: usize,
    },
}

impl Candidate {
    /// Generated questions followed by the motivation question and the
    /// program-specific closing question.
    pub fn all_questions(&self) -> Vec<String> {
        let closing = if self.program.as_deref() == Some(SCHOLARSHIP_PROGRAM) {
            SCHOLARSHIP_QUESTION
        } else {
            FINANCING_QUESTION
        };

        self.questions
            .iter()
            .cloned()
            .chain([MOTIVATION_QUESTION.to_string(), closing.to_string()])
            .collect()
    }

    pub fn transcript(&self) -> InterviewTranscript<'_> {
        let questions = self.all_questions();
        if questions.len() != self.interview_responses.len() {
            return InterviewTranscript::Mismatch {
                question_count: questions.len(),
                answer_count: self.interview_responses.len(),
            };
        }
        InterviewTranscript::Aligned {
            questions,
            answers: &self.interview_responses,
        }
    }

    /// Lower-cased, trimmed email used for all set membership checks.
    pub fn normalized_email(&self) -> String {
        normalize_email(&self.email)
    }
}

pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

#[cfg(test)]
pub(crate) fn make_candidate(
    name: &str,
    email: &str,
    questions: usize,
    answers: usize,
) -> Candidate {
    Candidate {
        id: Uuid::new_v4(),
        name: name.to_string(),
        email: email.to_string(),
        cv_score: Some(70),
        questions: (1..=questions).map(|i| format!("Generated question {i}?")).collect(),
        interview_responses: (1..=answers).map(|i| format!("Answer number {i}.")).collect(),
        interview_score: Some(75),
        program: None,
    }
}
