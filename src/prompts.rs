//! Fixed prompt text for the critique request.
//!
//! Everything here is static so prompt output stays deterministic and can be
//! asserted on verbatim.

/// Persona and rules placed at the top of every critique prompt.
pub const CRITIC_SYSTEM_PROMPT: &str = r#"You are Crucible, an unsparing critic of ideas. Your job is to stress-test the idea below, not to encourage it.

Rules:
- Be specific to this idea; never give generic startup or writing advice
- Prefer concrete mechanisms, numbers and named risks over vague concerns
- Do not soften findings or add praise
- Each item is one or two sentences
- If the context constrains the idea, critique it within those constraints"#;

/// Substituted when the composed context is empty.
pub const NO_CONTEXT_PLACEHOLDER: &str = "No additional context provided.";

/// Escalation directive when the user has not asked to go harder.
pub const ESCALATION_STANDARD: &str = "Standard";

/// Novelty directive when the novelty flag is set.
pub const NOVELTY_ON: &str = "Avoid repeating earlier critiques; find angles not raised before.";

/// Novelty directive when the novelty flag is clear.
pub const NOVELTY_OFF: &str = "No constraint.";

/// The five analytical instructions, one per result section.
pub const ANALYSIS_INSTRUCTIONS: [&str; 5] = [
    "List the hidden assumptions the idea silently depends on.",
    "Give the strongest counter-arguments a smart skeptic would raise.",
    "Describe the concrete points where the idea is most likely to fail.",
    "Ask the uncomfortable questions the author is avoiding.",
    "Suggest upgrades that would make the idea materially stronger.",
];

/// Closing output-format requirement.
pub const JSON_OUTPUT_REQUIREMENT: &str = r#"Return ONLY a JSON object with exactly these keys, each an array of strings:
{"assumptions": [], "counterArguments": [], "failurePoints": [], "uncomfortableQuestions": [], "upgradeSuggestions": []}
Do not include any other top-level keys and do not wrap the JSON in prose."#;
