// Prompt variant templates for interview scoring.
// Reuses the response contract from llm_client::prompts.
// Replace `{contract}` first and `{qa_pairs}` last so answer text is never rescanned.

use crate::llm_client::prompts::EVALUATIONS_CONTRACT;

/// Generic technical and soft-skill evaluator. Baseline for comparisons.
pub const ORIGINAL_TEMPLATE: &str = r#"You are an expert evaluator of technical interviews and soft skills.
Evaluate the following answers on a scale from 0 to 100 based on their quality, clarity, and relevance to the question.

For each answer, provide:
1. A score between 0 and 100.
2. A brief explanation of the evaluation.

Here are the questions and answers:

{qa_pairs}

Respond ONLY in the following JSON format with an object containing an "evaluations" array:
{
  "evaluations": [
    { "score": 85, "explanation": "Clear and well-founded answer with examples." },
    { "score": 70, "explanation": "Good answer but lacks detail." }
  ]
}

{contract}"#;

/// Weighs diversity and international experience ahead of technical depth.
pub const SKILLS_FOCUSED_TEMPLATE: &str = r#"You are evaluating interview responses for candidates applying to research programs at Mirai Innovation Research Institute.

Focus on assessing, with particular priority:
- Diversity of background, perspectives, and experiences (give higher value to diverse or international experience)
- International experience (study, research, or collaboration in global contexts)
- Technical competence and knowledge

Additionally, also consider:
- Problem-solving abilities
- Communication skills
- Motivation and commitment
- Cultural fit for a diverse, internationally oriented research environment

Score each answer 0-100 based on:
- Evidence of diversity and/or international experience
- Technical accuracy and knowledge depth (if applicable)
- Clarity of expression
- Demonstration of globally relevant skills or experience
- Alignment with the values of diversity, international collaboration, and technical excellence in research

Questions and answers:

{qa_pairs}

Respond in JSON format:
{
  "evaluations": [
    { "score": 85, "explanation": "Demonstrates strong technical knowledge and clear communication." },
    { "score": 70, "explanation": "Shows motivation but lacks technical depth." }
  ]
}

{contract}"#;

pub fn render_original(questions: &[String], answers: &[String]) -> String {
    render_template(ORIGINAL_TEMPLATE, questions, answers)
}

pub fn render_skills_focused(questions: &[String], answers: &[String]) -> String {
    render_template(SKILLS_FOCUSED_TEMPLATE, questions, answers)
}

fn render_template(template: &str, questions: &[String], answers: &[String]) -> String {
    template
        .replace("{contract}", EVALUATIONS_CONTRACT)
        .replace("{qa_pairs}", &format_qa_pairs(questions, answers))
}

/// `Question i: ...\nAnswer i: ...` blocks, 1-based, separated by a blank line.
pub fn format_qa_pairs(questions: &[String], answers: &[String]) -> String {
    questions
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let answer = answers.get(i).map(String::as_str).unwrap_or_default();
            format!("Question {n}: {q}\nAnswer {n}: {answer}\n", n = i + 1)
        })
        .collect::<Vec<_>>()
        .join("\n")
}
