//! Critique pipeline.
//!
//! - [`compose_context`] / [`split_context`]: goal, audience and constraints as one block
//! - [`build_prompt`]: deterministic instruction text for the provider
//! - [`extract_analysis`]: best-effort recovery of the five-section result
//! - [`Analyzer`]: validation, prompt, completion call and extraction in one step
//! - [`compare`]: section-by-section difference against a baseline

mod analyzer;
mod compare;
mod context;
mod extract;
mod prompt;
mod result;

pub use analyzer::*;
pub use compare::*;
pub use context::*;
pub use extract::*;
pub use prompt::*;
pub use result::*;

use serde::{Deserialize, Serialize};

/// The critique lens selected for an analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueMode {
    /// No mercy; the harshest reading of the idea.
    #[default]
    Brutal,
    /// Gaps in reasoning and unsupported leaps.
    Logical,
    /// Harms, fairness and second-order consequences.
    Ethical,
    /// Market, moat and money.
    Investor,
    /// Rigor, evidence and prior work.
    Academic,
}

impl CritiqueMode {
    /// Every mode, in display order.
    pub const ALL: [CritiqueMode; 5] = [
        CritiqueMode::Brutal,
        CritiqueMode::Logical,
        CritiqueMode::Ethical,
        CritiqueMode::Investor,
        CritiqueMode::Academic,
    ];

    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            CritiqueMode::Brutal => "brutal",
            CritiqueMode::Logical => "logical",
            CritiqueMode::Ethical => "ethical",
            CritiqueMode::Investor => "investor",
            CritiqueMode::Academic => "academic",
        }
    }

    /// Display label, also used inside the prompt.
    pub fn label(&self) -> &'static str {
        match self {
            CritiqueMode::Brutal => "Brutal",
            CritiqueMode::Logical => "Logical",
            CritiqueMode::Ethical => "Ethical",
            CritiqueMode::Investor => "Investor",
            CritiqueMode::Academic => "Academic",
        }
    }

    /// One-line description shown next to the selector.
    pub fn description(&self) -> &'static str {
        match self {
            CritiqueMode::Brutal => "No mercy. Tears the idea apart and looks for the fatal flaw.",
            CritiqueMode::Logical => "Hunts for gaps in reasoning, circular claims and unsupported leaps.",
            CritiqueMode::Ethical => "Weighs harms, fairness and who pays the hidden costs.",
            CritiqueMode::Investor => "Would anyone fund this? Market size, moat, unit economics.",
            CritiqueMode::Academic => "Demands rigor, evidence and awareness of prior work.",
        }
    }

    /// Sampling temperature: brutal runs hotter than the analytical lenses.
    pub fn temperature(&self) -> f64 {
        match self {
            CritiqueMode::Brutal => 0.9,
            _ => 0.6,
        }
    }
}

impl std::fmt::Display for CritiqueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for CritiqueMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "brutal" => Ok(CritiqueMode::Brutal),
            "logical" => Ok(CritiqueMode::Logical),
            "ethical" => Ok(CritiqueMode::Ethical),
            "investor" => Ok(CritiqueMode::Investor),
            "academic" => Ok(CritiqueMode::Academic),
            _ => Err(format!("Unknown critique mode: {}", s)),
        }
    }
}
