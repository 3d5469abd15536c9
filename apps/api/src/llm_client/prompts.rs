// Shared prompt fragments.
// Each flow defines its own template alongside it; this file holds the
// cross-cutting pieces every flow's system prompt is built from.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Lead-in for the output schema listing appended to the system prompt.
pub const OUTPUT_SCHEMA_HEADER: &str =
    "Return a JSON object with EXACTLY these fields (no extra fields):";
