use serde::{Deserialize, Serialize};

/// The five-section critique returned by a successful extraction.
///
/// Sections are always present; missing data is an empty list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    /// Hidden assumptions the idea rests on
    #[serde(default)]
    pub assumptions: Vec<String>,
    /// Strongest arguments against the idea
    #[serde(default)]
    pub counter_arguments: Vec<String>,
    /// Where the idea is most likely to break
    #[serde(default)]
    pub failure_points: Vec<String>,
    /// Questions the author would rather not answer
    #[serde(default)]
    pub uncomfortable_questions: Vec<String>,
    /// Ways to make the idea stronger
    #[serde(default)]
    pub upgrade_suggestions: Vec<String>,
}

/// One section of an [`AnalysisResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Section {
    /// `assumptions`
    Assumptions,
    /// `counterArguments`
    CounterArguments,
    /// `failurePoints`
    FailurePoints,
    /// `uncomfortableQuestions`
    UncomfortableQuestions,
    /// `upgradeSuggestions`
    UpgradeSuggestions,
}

impl Section {
    /// Every section, in render order.
    pub const ALL: [Section; 5] = [
        Section::Assumptions,
        Section::CounterArguments,
        Section::FailurePoints,
        Section::UncomfortableQuestions,
        Section::UpgradeSuggestions,
    ];

    /// JSON key used by the provider contract
    pub fn key(&self) -> &'static str {
        match self {
            Section::Assumptions => "assumptions",
            Section::CounterArguments => "counterArguments",
            Section::FailurePoints => "failurePoints",
            Section::UncomfortableQuestions => "uncomfortableQuestions",
            Section::UpgradeSuggestions => "upgradeSuggestions",
        }
    }

    /// Heading shown when rendering
    pub fn title(&self) -> &'static str {
        match self {
            Section::Assumptions => "Hidden assumptions",
            Section::CounterArguments => "Counter-arguments",
            Section::FailurePoints => "Failure points",
            Section::UncomfortableQuestions => "Uncomfortable questions",
            Section::UpgradeSuggestions => "Upgrade suggestions",
        }
    }
}

impl AnalysisResult {
    /// Items of one section
    pub fn section(&self, section: Section) -> &[String] {
        match section {
            Section::Assumptions => &self.assumptions,
            Section::CounterArguments => &self.counter_arguments,
            Section::FailurePoints => &self.failure_points,
            Section::UncomfortableQuestions => &self.uncomfortable_questions,
            Section::UpgradeSuggestions => &self.upgrade_suggestions,
        }
    }

    pub(crate) fn section_mut(&mut self, section: Section) -> &mut Vec<String> {
        match section {
            Section::Assumptions => &mut self.assumptions,
            Section::CounterArguments => &mut self.counter_arguments,
            Section::FailurePoints => &mut self.failure_points,
            Section::UncomfortableQuestions => &mut self.uncomfortable_questions,
            Section::UpgradeSuggestions => &mut self.upgrade_suggestions,
        }
    }

    /// Whether every section is empty
    pub fn is_empty(&self) -> bool {
        Section::ALL.iter().all(|s| self.section(*s).is_empty())
    }

    /// Total number of items across sections
    pub fn item_count(&self) -> usize {
        Section::ALL.iter().map(|s| self.section(*s).len()).sum()
    }
}

/// What a successful completion call produced.
///
/// Parsed sections and raw text are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Structured critique recovered from the response
    Parsed(AnalysisResult),
    /// Response text with no usable JSON, kept verbatim
    RawFallback(String),
}

impl AnalysisOutcome {
    /// The parsed result, if extraction succeeded
    pub fn result(&self) -> Option<&AnalysisResult> {
        match self {
            AnalysisOutcome::Parsed(result) => Some(result),
            AnalysisOutcome::RawFallback(_) => None,
        }
    }

    /// The raw text, if extraction failed
    pub fn raw(&self) -> Option<&str> {
        match self {
            AnalysisOutcome::Parsed(_) => None,
            AnalysisOutcome::RawFallback(raw) => Some(raw),
        }
    }
}
