use serde::{Deserialize, Serialize};
use std::time::Instant;
use tracing::{debug, info, warn};

use super::extract::extract_analysis;
use super::prompt::{build_prompt, PromptInput};
use super::result::AnalysisOutcome;
use super::CritiqueMode;
use crate::completion::CompletionClient;
use crate::error::{AppResult, CompletionError, ValidationError};

/// Input for one critique run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// The idea to critique
    pub idea: String,
    /// Composed context block
    #[serde(default)]
    pub context: String,
    /// Critique lens; also picks the temperature
    #[serde(default)]
    pub mode: CritiqueMode,
    /// Escalation round, 0 for a standard critique
    #[serde(default)]
    pub escalation: u32,
    /// Ask for angles not raised before
    #[serde(default)]
    pub novelty: bool,
}

/// Runs one critique: validate, build the prompt, call the provider once, extract.
#[derive(Clone)]
pub struct Analyzer {
    client: CompletionClient,
}

impl Analyzer {
    /// Create a new analyzer
    pub fn new(client: CompletionClient) -> Self {
        Self { client }
    }

    /// Check the preconditions for a network call: a non-blank idea, then a
    /// configured credential.
    pub fn validate(&self, request: &AnalysisRequest) -> AppResult<()> {
        if request.idea.trim().is_empty() {
            return Err(ValidationError::EmptyIdea.into());
        }
        if !self.client.has_credential() {
            return Err(CompletionError::MissingCredential.into());
        }
        Ok(())
    }

    /// Process a critique request.
    ///
    /// Validation failures (empty idea, missing credential) return before any
    /// network call. A response without usable JSON is not an error; it comes
    /// back as [`AnalysisOutcome::RawFallback`].
    pub async fn process(&self, request: &AnalysisRequest) -> AppResult<AnalysisOutcome> {
        let start = Instant::now();

        self.validate(request)?;
        let idea = request.idea.trim();

        let prompt = build_prompt(&PromptInput {
            idea,
            context: &request.context,
            mode_label: request.mode.label(),
            escalation: request.escalation,
            novelty: request.novelty,
        });

        debug!(
            mode = %request.mode,
            escalation = request.escalation,
            novelty = request.novelty,
            "Processing critique"
        );

        let raw = self
            .client
            .generate(&prompt, request.mode.temperature())
            .await?;

        let outcome = match extract_analysis(&raw) {
            Ok(result) => {
                info!(
                    mode = %request.mode,
                    items = result.item_count(),
                    latency_ms = start.elapsed().as_millis(),
                    "Critique completed"
                );
                AnalysisOutcome::Parsed(result)
            }
            Err(e) => {
                warn!(
                    mode = %request.mode,
                    reason = %e,
                    latency_ms = start.elapsed().as_millis(),
                    "No structured critique in response, keeping raw text"
                );
                AnalysisOutcome::RawFallback(raw)
            }
        };

        Ok(outcome)
    }
}

impl AnalysisRequest {
    /// Create a request with just an idea
    pub fn new(idea: impl Into<String>) -> Self {
        Self {
            idea: idea.into(),
            context: String::new(),
            mode: CritiqueMode::default(),
            escalation: 0,
            novelty: false,
        }
    }

    /// Set the composed context
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Set the critique mode
    pub fn with_mode(mut self, mode: CritiqueMode) -> Self {
        self.mode = mode;
        self
    }

    /// Set the escalation round
    pub fn with_escalation(mut self, escalation: u32) -> Self {
        self.escalation = escalation;
        self
    }

    /// Set the novelty flag
    pub fn with_novelty(mut self, novelty: bool) -> Self {
        self.novelty = novelty;
        self
    }
}
