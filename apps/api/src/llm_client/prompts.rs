// Shared prompt fragments.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Appended to prompts whose reply is parsed as JSON.
pub const JSON_ONLY_INSTRUCTION: &str = "\
Respond with a single JSON object only. \
Do NOT use markdown code fences. \
Do NOT include explanations or text outside the JSON object.";
