// Interview scoring: prompt variants, paced scoring calls, response validation.
// All model calls go through llm_client::ScoringClient.

pub mod engine;
pub mod models;
pub mod pacer;
pub mod parser;
pub mod prompts;
pub mod registry;
