// Shared prompt fragments. Each agent builds its own prompt in agents/prompts.rs
// and appends these where it needs them.

/// Appended to every prompt that expects a JSON answer.
pub const JSON_ONLY_INSTRUCTION: &str = "Return ONLY valid JSON. \
    Do NOT include any text outside the JSON. \
    Do NOT use markdown code fences. \
    Do NOT include comments, explanations or apologies.";

/// Guards candidate-facing analyses against demographic inference.
pub const FAIRNESS_INSTRUCTION: &str = "\
    Judge only job-relevant evidence. Strictly avoid demographic or affinity biases: \
    do not infer or mention age, gender, ethnicity, religion, nationality or family status.";
