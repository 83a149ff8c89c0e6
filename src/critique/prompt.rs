use crate::prompts::{
    ANALYSIS_INSTRUCTIONS, CRITIC_SYSTEM_PROMPT, ESCALATION_STANDARD, JSON_OUTPUT_REQUIREMENT,
    NOVELTY_OFF, NOVELTY_ON, NO_CONTEXT_PLACEHOLDER,
};

/// Everything the prompt depends on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptInput<'a> {
    /// Non-empty, already trimmed idea text.
    pub idea: &'a str,
    /// Composed context block; may be empty.
    pub context: &'a str,
    /// Display label of the critique mode
    pub mode_label: &'a str,
    /// Escalation round
    pub escalation: u32,
    /// Whether the novelty directive is on
    pub novelty: bool,
}

/// Escalation directive for a given "go harder" count.
pub fn escalation_directive(escalation: u32) -> String {
    if escalation == 0 {
        ESCALATION_STANDARD.to_string()
    } else {
        format!("Stronger counter (round {})", escalation)
    }
}

/// Build the full instruction string sent to the provider.
///
/// Pure and deterministic: equal inputs produce byte-identical prompts.
pub fn build_prompt(input: &PromptInput<'_>) -> String {
    let context = if input.context.trim().is_empty() {
        NO_CONTEXT_PLACEHOLDER
    } else {
        input.context
    };

    let novelty = if input.novelty { NOVELTY_ON } else { NOVELTY_OFF };

    let instructions = ANALYSIS_INSTRUCTIONS
        .iter()
        .enumerate()
        .map(|(i, line)| format!("{}. {}", i + 1, line))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        "{system}\n\n\
         IDEA:\n{idea}\n\n\
         CONTEXT:\n{context}\n\n\
         CRITIQUE MODE: {mode}\n\
         ESCALATION: {escalation}\n\
         NOVELTY: {novelty}\n\n\
         Instructions:\n{instructions}\n\n\
         {output}",
        system = CRITIC_SYSTEM_PROMPT,
        idea = input.idea,
        context = context,
        mode = input.mode_label,
        escalation = escalation_directive(input.escalation),
        novelty = novelty,
        instructions = instructions,
        output = JSON_OUTPUT_REQUIREMENT,
    )
}
