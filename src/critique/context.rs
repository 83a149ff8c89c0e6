use serde::{Deserialize, Serialize};

/// Label prefix for the goal line of a composed context.
pub const GOAL_LABEL: &str = "Goal";
/// Label prefix for the audience line of a composed context.
pub const AUDIENCE_LABEL: &str = "Audience";
/// Label prefix for the constraints line of a composed context.
pub const CONSTRAINTS_LABEL: &str = "Constraints";

/// The three optional context fields of a draft.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContextFields {
    /// What the idea is meant to achieve
    pub goal: String,
    /// Who the idea is for
    pub audience: String,
    /// Known limits
    pub constraints: String,
}

/// Merge the context fields into one block.
///
/// One `"<Label>: <trimmed value>"` line per non-empty field, in the order goal,
/// audience, constraints. All-empty input gives an empty string.
pub fn compose_context(goal: &str, audience: &str, constraints: &str) -> String {
    [
        (GOAL_LABEL, goal),
        (AUDIENCE_LABEL, audience),
        (CONSTRAINTS_LABEL, constraints),
    ]
    .iter()
    .filter_map(|(label, value)| {
        let value = value.trim();
        (!value.is_empty()).then(|| format!("{}: {}", label, value))
    })
    .collect::<Vec<_>>()
    .join("\n")
}

/// Recover the context fields from a composed block.
///
/// Lines without one of the three known prefixes are dropped, so free-form
/// context does not survive the trip.
pub fn split_context(context: &str) -> ContextFields {
    let mut fields = ContextFields::default();

    for line in context.lines() {
        if let Some(rest) = strip_label(line, GOAL_LABEL) {
            fields.goal = rest;
        } else if let Some(rest) = strip_label(line, AUDIENCE_LABEL) {
            fields.audience = rest;
        } else if let Some(rest) = strip_label(line, CONSTRAINTS_LABEL) {
            fields.constraints = rest;
        }
    }

    fields
}

fn strip_label(line: &str, label: &str) -> Option<String> {
    line.strip_prefix(label)
        .and_then(|rest| rest.strip_prefix(':'))
        .map(|rest| rest.trim().to_string())
}

impl ContextFields {
    /// Compose these fields into a context block
    pub fn compose(&self) -> String {
        compose_context(&self.goal, &self.audience, &self.constraints)
    }
}
