use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::critique::{split_context, AnalysisOutcome, AnalysisResult, CritiqueMode};
use crate::error::ValidationError;

use super::draft::Draft;

/// Maximum number of revisions kept.
pub const MAX_HISTORY: usize = 8;

/// One recorded analysis. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Revision {
    /// Unique revision identifier.
    pub id: String,
    /// The idea as submitted.
    pub idea: String,
    /// Composed context block.
    #[serde(default)]
    pub context: String,
    /// Mode the critique ran in
    #[serde(default)]
    pub mode: CritiqueMode,
    /// When the analysis finished
    pub created_at: DateTime<Utc>,
    /// Parsed critique; `None` when the response had no usable JSON.
    #[serde(default)]
    pub result: Option<AnalysisResult>,
    /// Raw completion text, kept only when `result` is `None`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

/// A revision projected back into editable state.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedRevision {
    /// Draft fields to restore
    pub draft: Draft,
    /// Critique to display again
    pub outcome: AnalysisOutcome,
}

impl Revision {
    /// Create a revision for a finished analysis
    pub fn new(
        idea: impl Into<String>,
        context: impl Into<String>,
        mode: CritiqueMode,
        outcome: &AnalysisOutcome,
    ) -> Self {
        let (result, raw) = match outcome {
            AnalysisOutcome::Parsed(result) => (Some(result.clone()), None),
            AnalysisOutcome::RawFallback(raw) => (None, Some(raw.clone())),
        };

        Self {
            id: Uuid::new_v4().to_string(),
            idea: idea.into(),
            context: context.into(),
            mode,
            created_at: Utc::now(),
            result,
            raw,
        }
    }

    /// The outcome this revision recorded
    pub fn outcome(&self) -> AnalysisOutcome {
        match &self.result {
            Some(result) => AnalysisOutcome::Parsed(result.clone()),
            None => AnalysisOutcome::RawFallback(self.raw.clone().unwrap_or_default()),
        }
    }

    /// Project back into draft and outcome state for re-editing.
    ///
    /// Context is split on its label prefixes; unlabeled lines are lost.
    pub fn load(&self) -> LoadedRevision {
        let fields = split_context(&self.context);
        LoadedRevision {
            draft: Draft {
                idea: self.idea.clone(),
                goal: fields.goal,
                audience: fields.audience,
                constraints: fields.constraints,
                mode: self.mode,
            },
            outcome: self.outcome(),
        }
    }

    /// First eight characters of the id
    pub fn short_id(&self) -> &str {
        self.id.get(..8).unwrap_or(&self.id)
    }
}

/// Bounded revision history, newest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RevisionHistory {
    entries: Vec<Revision>,
}

impl RevisionHistory {
    /// Create an empty history
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from stored entries, keeping the newest [`MAX_HISTORY`].
    pub fn from_entries(mut entries: Vec<Revision>) -> Self {
        entries.truncate(MAX_HISTORY);
        Self { entries }
    }

    /// Prepend a revision, dropping the oldest beyond [`MAX_HISTORY`].
    pub fn record(&mut self, revision: Revision) {
        self.entries.insert(0, revision);
        self.entries.truncate(MAX_HISTORY);
    }

    /// Most recent revision
    pub fn latest(&self) -> Option<&Revision> {
        self.entries.first()
    }

    /// Find a revision by full id or unique id prefix
    pub fn find(&self, id: &str) -> Result<&Revision, ValidationError> {
        if let Some(exact) = self.entries.iter().find(|r| r.id == id) {
            return Ok(exact);
        }

        let matches: Vec<&Revision> = if id.is_empty() {
            Vec::new()
        } else {
            self.entries.iter().filter(|r| r.id.starts_with(id)).collect()
        };

        match matches.as_slice() {
            [only] => Ok(*only),
            [] => Err(ValidationError::RevisionNotFound { id: id.to_string() }),
            many => Err(ValidationError::AmbiguousRevision {
                prefix: id.to_string(),
                count: many.len(),
            }),
        }
    }

    /// All revisions, newest first
    pub fn entries(&self) -> &[Revision] {
        &self.entries
    }

    /// Number of recorded revisions
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
