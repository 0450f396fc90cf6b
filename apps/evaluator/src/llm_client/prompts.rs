// Shared prompt fragments.
// Each prompt variant defines its own framing in evaluation/prompts.rs.
// This file contains the response contract every variant must state.

/// Appended to every scoring prompt so the response can be schema-validated.
pub const EVALUATIONS_CONTRACT: &str = "\
    Return exactly one entry in \"evaluations\" per answer, in the same order as the answers. \
    Each \"score\" MUST be an integer between 0 and 100 and each \"explanation\" a short string. \
    Respond with the JSON object only: no markdown code fences, no text before or after it.";
