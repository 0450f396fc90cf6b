//! Response validator — turns raw model text into typed per-question evaluations.
//!
//! Expected shape: `{"evaluations": [{"score": <0-100>, "explanation": "<text>"}, ...]}`.
//! A missing or null `evaluations` field is read as an empty list. Anything else that
//! deviates from the shape is a `ParseError`.

use serde_json::Value;
use thiserror::Error;

use crate::evaluation::models::QuestionEvaluation;
use crate::llm_client::strip_json_fences;

const MAX_SCORE: f64 = 100.0;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Response is not valid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Response must be a JSON object")]
    NotAnObject,

    #[error("\"evaluations\" must be an array")]
    EvaluationsNotArray,

    #[error("Evaluation {index} must be an object")]
    ItemNotObject { index: usize },

    #[error("Evaluation {index} has a missing or non-numeric score")]
    InvalidScore { index: usize },

    #[error("Evaluation {index} score {score} is outside 0-100")]
    ScoreOutOfRange { index: usize, score: f64 },

    #[error("Evaluation {index} has a missing or non-string explanation")]
    InvalidExplanation { index: usize },
}

/// Strips optional code fences, then validates the `evaluations` schema.
pub fn parse_evaluations(raw: &str) -> Result<Vec<QuestionEvaluation>, ParseError> {
    let value: Value = serde_json::from_str(strip_json_fences(raw))?;
    let object = value.as_object().ok_or(ParseError::NotAnObject)?;

    let items = match object.get("evaluations") {
        None | Some(Value::Null) => return Ok(vec![]),
        Some(Value::Array(items)) => items,
        Some(_) => return Err(ParseError::EvaluationsNotArray),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| parse_item(index, item))
        .collect()
}

fn parse_item(index: usize, item: &Value) -> Result<QuestionEvaluation, ParseError> {
    let item = item.as_object().ok_or(ParseError::ItemNotObject { index })?;

    let score = item
        .get("score")
        .and_then(Value::as_f64)
        .ok_or(ParseError::InvalidScore { index })?;
    if !(0.0..=MAX_SCORE).contains(&score) {
        return Err(ParseError::ScoreOutOfRange { index, score });
    }

    let explanation = item
        .get("explanation")
        .and_then(Value::as_str)
        .ok_or(ParseError::InvalidExplanation { index })?;

    Ok(QuestionEvaluation {
        // Fractional scores are rounded to the integer scale.
        score: score.round() as u32,
        explanation: explanation.to_string(),
    })
}
