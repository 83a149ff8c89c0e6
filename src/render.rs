//! Plain-text rendering for the terminal front end.

use std::fmt::Write;

use crate::critique::{AnalysisOutcome, AnalysisResult, CritiqueMode, Section, SectionDelta};
use crate::session::{Draft, Revision};

/// Shown under a section heading when the model returned nothing for it.
pub const NO_DATA: &str = "no data returned";

/// Heading shown above raw, unstructured output.
pub const RAW_HEADING: &str = "Raw response (could not be parsed into sections)";

/// Render a parsed critique: every section, populated or not.
pub fn render_result(result: &AnalysisResult) -> String {
    let mut out = String::new();
    for section in Section::ALL {
        let items = result.section(section);
        let _ = writeln!(out, "## {}", section.title());
        if items.is_empty() {
            let _ = writeln!(out, "  ({})", NO_DATA);
        } else {
            for item in items {
                let _ = writeln!(out, "  - {}", item);
            }
        }
        out.push('\n');
    }
    out
}

/// Render either outcome. Raw text is shown verbatim, never dropped.
pub fn render_outcome(outcome: &AnalysisOutcome) -> String {
    match outcome {
        AnalysisOutcome::Parsed(result) => render_result(result),
        AnalysisOutcome::RawFallback(raw) => {
            let body = if raw.trim().is_empty() {
                "(the model returned no text)"
            } else {
                raw.as_str()
            };
            format!("## {}\n{}\n", RAW_HEADING, body)
        }
    }
}

/// Render the draft with its limit counter and preferences.
pub fn render_draft(draft: &Draft, novelty: bool, escalation: u32) -> String {
    let limit = draft.idea_limit();
    let mut out = String::new();

    let idea = if draft.idea.is_empty() { "(empty)" } else { draft.idea.as_str() };
    let _ = writeln!(out, "Idea ({}/{}):\n  {}", limit.count, limit.max, idea);
    if limit.at_limit {
        let _ = writeln!(out, "  [character limit reached]");
    }
    for (label, value) in [
        ("Goal", &draft.goal),
        ("Audience", &draft.audience),
        ("Constraints", &draft.constraints),
    ] {
        if !value.trim().is_empty() {
            let _ = writeln!(out, "{}: {}", label, value.trim());
        }
    }
    let _ = writeln!(out, "Mode: {} - {}", draft.mode.label(), draft.mode.description());
    let _ = writeln!(out, "Novelty: {}", if novelty { "on" } else { "off" });
    let _ = writeln!(out, "Escalation: {}", escalation);
    out
}

/// One line per revision, newest first.
pub fn render_history(entries: &[Revision], baseline: Option<&Revision>) -> String {
    if entries.is_empty() {
        return "No revisions yet.\n".to_string();
    }

    let mut out = String::new();
    for revision in entries {
        let marker = if baseline.is_some_and(|b| b.id == revision.id) { "*" } else { " " };
        let status = match &revision.result {
            Some(result) => format!("{} items", result.item_count()),
            None => "raw".to_string(),
        };
        let _ = writeln!(
            out,
            "{} {}  {}  {:<8}  {:<9}  {}",
            marker,
            revision.short_id(),
            revision.created_at.format("%Y-%m-%d %H:%M"),
            revision.mode.as_str(),
            status,
            preview(&revision.idea, 48)
        );
    }
    out
}

/// The five modes with labels and descriptions.
pub fn render_modes(selected: CritiqueMode) -> String {
    let mut out = String::new();
    for mode in CritiqueMode::ALL {
        let marker = if mode == selected { ">" } else { " " };
        let _ = writeln!(out, "{} {:<9} {}", marker, mode.as_str(), mode.description());
    }
    out
}

/// Section differences against the baseline.
pub fn render_comparison(deltas: &[SectionDelta]) -> String {
    let mut out = String::new();
    for delta in deltas {
        let _ = writeln!(out, "## {}", delta.section.title());
        if delta.is_unchanged() {
            let _ = writeln!(out, "  (unchanged)");
        }
        for item in &delta.added {
            let _ = writeln!(out, "  + {}", item);
        }
        for item in &delta.dropped {
            let _ = writeln!(out, "  - {}", item);
        }
        out.push('\n');
    }
    out
}

fn preview(text: &str, max: usize) -> String {
    let line = text.lines().next().unwrap_or_default();
    if line.chars().count() > max || text.lines().nth(1).is_some() {
        let cut: String = line.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", cut)
    } else {
        line.to_string()
    }
}
