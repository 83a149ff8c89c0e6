use serde::{Deserialize, Serialize};

use crate::critique::{compose_context, CritiqueMode};

/// Maximum idea length in characters.
pub const MAX_IDEA_CHARS: usize = 1200;

/// The user's editable input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Draft {
    /// The idea, at most [`MAX_IDEA_CHARS`] characters
    pub idea: String,
    /// Optional goal
    pub goal: String,
    /// Optional audience
    pub audience: String,
    /// Optional constraints
    pub constraints: String,
    /// Selected critique lens
    pub mode: CritiqueMode,
}

/// Character-count state of the idea field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdeaLimit {
    /// Characters used
    pub count: usize,
    /// Character limit
    pub max: usize,
    /// Characters left
    pub remaining: usize,
    /// Whether the limit is reached
    pub at_limit: bool,
}

/// Cut `text` to at most `max` characters, never splitting a character.
pub fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((byte_idx, _)) => text[..byte_idx].to_string(),
        None => text.to_string(),
    }
}

impl Draft {
    /// Composed context block for the current goal/audience/constraints
    pub fn context(&self) -> String {
        compose_context(&self.goal, &self.audience, &self.constraints)
    }

    /// Character-count state of the idea
    pub fn idea_limit(&self) -> IdeaLimit {
        let count = self.idea.chars().count();
        IdeaLimit {
            count,
            max: MAX_IDEA_CHARS,
            remaining: MAX_IDEA_CHARS.saturating_sub(count),
            at_limit: count >= MAX_IDEA_CHARS,
        }
    }
}
