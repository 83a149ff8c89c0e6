//! Command-line actions.
//!
//! Each subcommand is one action of the critique workspace: edit the draft,
//! analyze, go harder, manage history and the baseline.

use clap::{Args, Parser, Subcommand};

use crate::critique::{Analyzer, CritiqueMode};
use crate::error::AppError;
use crate::render;
use crate::session::{AnalysisState, Workspace};
use crate::storage::StateStore;

/// Stress-test an idea with an LLM critic.
#[derive(Parser, Debug)]
#[command(name = "crucible", version, about)]
pub struct Cli {
    /// Action to run
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    /// Show the current draft, preferences and baseline
    Show,

    /// Update draft fields and preferences without analyzing
    Edit(DraftArgs),

    /// Analyze the current draft (after applying any given edits)
    Analyze(DraftArgs),

    /// Ask for a stronger counter-critique of the current draft
    Harder,

    /// List recorded revisions, newest first
    History,

    /// Load a revision back into the draft
    Load {
        /// Revision id or unique prefix
        id: String,
    },

    /// Manage the baseline revision
    Baseline {
        #[command(subcommand)]
        action: BaselineAction,
    },

    /// Clear idea, goal, audience and constraints
    Clear,

    /// List critique modes
    Modes,
}

/// Baseline subcommands.
#[derive(Subcommand, Debug, Clone)]
pub enum BaselineAction {
    /// Pin the last analyzed or loaded revision as the baseline
    Save,
    /// Remove the baseline
    Clear,
    /// Show the baseline critique
    Show,
    /// Compare the last analyzed or loaded revision against the baseline
    Compare,
}

/// Draft fields that can be set from the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct DraftArgs {
    /// The idea to critique
    #[arg(long)]
    pub idea: Option<String>,

    /// What the idea is meant to achieve
    #[arg(long)]
    pub goal: Option<String>,

    /// Who the idea is for
    #[arg(long)]
    pub audience: Option<String>,

    /// Known limits: budget, time, rules
    #[arg(long)]
    pub constraints: Option<String>,

    /// Critique lens: brutal, logical, ethical, investor, academic
    #[arg(long)]
    pub mode: Option<CritiqueMode>,

    /// Ask the model to avoid repeating earlier critiques
    #[arg(long)]
    pub novelty: Option<bool>,
}

/// Result of CLI command execution.
#[derive(Debug)]
pub struct CliResult {
    /// Exit code (0 = success)
    pub exit_code: i32,
    /// Output message
    pub message: String,
}

impl CliResult {
    /// Create a success result with the given message.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            exit_code: 0,
            message: message.into(),
        }
    }

    /// Create an error result with the given message.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            exit_code: 1,
            message: message.into(),
        }
    }
}

impl From<AppError> for CliResult {
    fn from(err: AppError) -> Self {
        CliResult::error(err.user_message())
    }
}

/// Execute one command against the workspace.
pub async fn execute_command<S: StateStore>(
    command: Commands,
    workspace: &mut Workspace<S>,
    analyzer: &Analyzer,
) -> CliResult {
    let result = match command {
        Commands::Show => Ok(execute_show(workspace)),
        Commands::Edit(args) => apply_edits(workspace, &args)
            .await
            .map(|_| execute_show(workspace)),
        Commands::Analyze(args) => match apply_edits(workspace, &args).await {
            Ok(()) => Ok(finish_analysis(workspace.analyze(analyzer).await)),
            Err(e) => Err(e),
        },
        Commands::Harder => Ok(finish_analysis(workspace.go_harder(analyzer).await)),
        Commands::History => Ok(CliResult::success(render::render_history(
            workspace.history().entries(),
            workspace.baseline(),
        ))),
        Commands::Load { id } => execute_load(workspace, &id).await,
        Commands::Baseline { action } => execute_baseline(workspace, action).await,
        Commands::Clear => workspace
            .clear_draft()
            .await
            .map(|_| CliResult::success("Draft cleared.\n"))
            .map_err(AppError::from),
        Commands::Modes => Ok(CliResult::success(render::render_modes(workspace.draft().mode))),
    };

    result.unwrap_or_else(CliResult::from)
}

async fn apply_edits<S: StateStore>(
    workspace: &mut Workspace<S>,
    args: &DraftArgs,
) -> Result<(), AppError> {
    if let Some(idea) = &args.idea {
        workspace.set_idea(idea).await?;
    }
    if let Some(goal) = &args.goal {
        workspace.set_goal(goal).await?;
    }
    if let Some(audience) = &args.audience {
        workspace.set_audience(audience).await?;
    }
    if let Some(constraints) = &args.constraints {
        workspace.set_constraints(constraints).await?;
    }
    if let Some(mode) = args.mode {
        workspace.set_mode(mode).await?;
    }
    if let Some(novelty) = args.novelty {
        workspace.set_novelty(novelty).await?;
    }
    Ok(())
}

fn execute_show<S: StateStore>(workspace: &Workspace<S>) -> CliResult {
    let mut output = render::render_draft(
        workspace.draft(),
        workspace.novelty(),
        workspace.escalation(),
    );
    output.push_str(&format!("Revisions: {}\n", workspace.history().len()));
    match workspace.baseline() {
        Some(baseline) => output.push_str(&format!(
            "Baseline: {} ({})\n",
            baseline.short_id(),
            baseline.created_at.format("%Y-%m-%d %H:%M")
        )),
        None => output.push_str("Baseline: none\n"),
    }
    CliResult::success(output)
}

fn finish_analysis(state: AnalysisState) -> CliResult {
    match state {
        AnalysisState::Succeeded(outcome) => CliResult::success(render::render_outcome(&outcome)),
        AnalysisState::Failed(message) => CliResult::error(message),
        AnalysisState::Idle | AnalysisState::Submitting => {
            CliResult::error("Analysis did not complete.")
        }
    }
}

async fn execute_load<S: StateStore>(
    workspace: &mut Workspace<S>,
    id: &str,
) -> Result<CliResult, AppError> {
    let loaded = workspace.load_revision(id).await?;
    let mut output = render::render_draft(
        &loaded.draft,
        workspace.novelty(),
        workspace.escalation(),
    );
    output.push('\n');
    output.push_str(&render::render_outcome(&loaded.outcome));
    Ok(CliResult::success(output))
}

async fn execute_baseline<S: StateStore>(
    workspace: &mut Workspace<S>,
    action: BaselineAction,
) -> Result<CliResult, AppError> {
    match action {
        BaselineAction::Save => match workspace.save_current_as_baseline().await? {
            Some(revision) => Ok(CliResult::success(format!(
                "Baseline set to {}.\n",
                revision.short_id()
            ))),
            None => Ok(CliResult::error("Nothing to save yet: run an analysis first.")),
        },
        BaselineAction::Clear => {
            workspace.set_baseline(None).await?;
            Ok(CliResult::success("Baseline cleared.\n"))
        }
        BaselineAction::Show => Ok(match workspace.baseline() {
            Some(baseline) => CliResult::success(format!(
                "Baseline {} [{}]\n{}\n\n{}",
                baseline.short_id(),
                baseline.mode,
                baseline.idea,
                render::render_outcome(&baseline.outcome())
            )),
            None => CliResult::success("No baseline saved.\n"),
        }),
        BaselineAction::Compare => Ok(match workspace.compare_with_baseline() {
            Some(deltas) => CliResult::success(render::render_comparison(&deltas)),
            None => CliResult::error("Need both a baseline and at least one revision to compare."),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::completion::CompletionClient;
    use crate::config::{ProviderConfig, RequestConfig};
    use crate::storage::MemoryStateStore;

    fn offline_analyzer() -> Analyzer {
        let config = ProviderConfig::new(None).with_base_url("http://192.0.2.1");
        Analyzer::new(CompletionClient::new(&config, RequestConfig::default()).unwrap())
    }

    #[test]
    fn test_cli_parses_analyze_flags() {
        let cli = Cli::try_parse_from([
            "crucible",
            "analyze",
            "--idea",
            "A bakery",
            "--mode",
            "investor",
            "--novelty",
            "true",
        ])
        .unwrap();

        match cli.command {
            Commands::Analyze(args) => {
                assert_eq!(args.idea.as_deref(), Some("A bakery"));
                assert_eq!(args.mode, Some(CritiqueMode::Investor));
                assert_eq!(args.novelty, Some(true));
                assert!(args.goal.is_none());
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["crucible", "edit", "--mode", "gentle"]).is_err());
    }

    #[tokio::test]
    async fn test_edit_then_show() {
        let mut ws = Workspace::hydrate(MemoryStateStore::new()).await.unwrap();
        let args = DraftArgs {
            idea: Some("A bakery".to_string()),
            goal: Some("Profit".to_string()),
            ..Default::default()
        };

        let result = execute_command(Commands::Edit(args), &mut ws, &offline_analyzer()).await;
        assert_eq!(result.exit_code, 0);
        assert!(result.message.contains("A bakery"));
        assert!(result.message.contains("Goal: Profit"));
    }

    #[tokio::test]
    async fn test_analyze_without_credential_is_error() {
        let mut ws = Workspace::hydrate(MemoryStateStore::new()).await.unwrap();
        let args = DraftArgs {
            idea: Some("A bakery".to_string()),
            ..Default::default()
        };

        let result = execute_command(Commands::Analyze(args), &mut ws, &offline_analyzer()).await;
        assert_eq!(result.exit_code, 1);
        assert!(result.message.contains("GEMINI_API_KEY"));
        assert!(ws.history().is_empty());
    }

    #[tokio::test]
    async fn test_baseline_save_without_history() {
        let mut ws = Workspace::hydrate(MemoryStateStore::new()).await.unwrap();
        let result = execute_command(
            Commands::Baseline {
                action: BaselineAction::Save,
            },
            &mut ws,
            &offline_analyzer(),
        )
        .await;
        assert_eq!(result.exit_code, 1);
        assert!(ws.baseline().is_none());
    }

    #[tokio::test]
    async fn test_load_unknown_revision() {
        let mut ws = Workspace::hydrate(MemoryStateStore::new()).await.unwrap();
        let result = execute_command(
            Commands::Load {
                id: "missing".to_string(),
            },
            &mut ws,
            &offline_analyzer(),
        )
        .await;
        assert_eq!(result.exit_code, 1);
        assert!(result.message.contains("missing"));
    }
}
