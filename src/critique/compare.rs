use super::result::{AnalysisResult, Section};

/// How one section changed between the baseline and the current result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionDelta {
    /// Which section this delta covers
    pub section: Section,
    /// Items in the current result that the baseline did not have.
    pub added: Vec<String>,
    /// Baseline items no longer present in the current result.
    pub dropped: Vec<String>,
}

impl SectionDelta {
    /// Whether the section is identical on both sides
    pub fn is_unchanged(&self) -> bool {
        self.added.is_empty() && self.dropped.is_empty()
    }
}

/// Compare two results section by section using exact text matching.
///
/// A missing result on either side compares as five empty sections.
pub fn compare(baseline: Option<&AnalysisResult>, current: Option<&AnalysisResult>) -> Vec<SectionDelta> {
    let empty = AnalysisResult::default();
    let baseline = baseline.unwrap_or(&empty);
    let current = current.unwrap_or(&empty);

    Section::ALL
        .iter()
        .map(|&section| {
            let before = baseline.section(section);
            let after = current.section(section);
            SectionDelta {
                section,
                added: after.iter().filter(|i| !before.contains(*i)).cloned().collect(),
                dropped: before.iter().filter(|i| !after.contains(*i)).cloned().collect(),
            }
        })
        .collect()
}
