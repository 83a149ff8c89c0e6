//! # Idea Crucible
//!
//! A local idea critic. An idea plus optional goal, audience and constraints is
//! turned into a prompt, sent once to an LLM content-generation API, and the
//! reply is recovered into five sections: hidden assumptions, counter-arguments,
//! failure points, uncomfortable questions and upgrade suggestions.
//!
//! ## Architecture
//!
//! ```text
//! Draft → compose_context → build_prompt → CompletionClient → extract_analysis
//!                                                                  ↓
//!                                              render + RevisionHistory (≤ 8)
//!                                                                  ↓
//!                                                     StateStore (SQLite)
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use idea_crucible::{Config, critique::Analyzer, completion::CompletionClient};
//! use idea_crucible::session::Workspace;
//! use idea_crucible::storage::SqliteStateStore;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_env();
//!     let store = SqliteStateStore::new(&config.database).await?;
//!     let mut workspace = Workspace::hydrate(store).await?;
//!     let client = CompletionClient::new(&config.provider, config.request.clone())?;
//!     let analyzer = Analyzer::new(client);
//!
//!     workspace.set_idea("A subscription box for left-handed scissors").await?;
//!     let state = workspace.analyze(&analyzer).await;
//!     println!("{:?}", state);
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]

/// Command-line actions and argument parsing.
pub mod cli;
/// Content-generation API client and wire types.
pub mod completion;
/// Configuration loaded from the environment.
pub mod config;
/// Critique pipeline: context, prompt, extraction, analysis, comparison.
pub mod critique;
/// Error types and result aliases for the application.
pub mod error;
/// Fixed prompt text.
pub mod prompts;
/// Terminal rendering.
pub mod render;
/// Draft, revision history, baseline and the workspace state machine.
pub mod session;
/// Persistence boundary and its backends.
pub mod storage;

pub use config::Config;
pub use error::{AppError, AppResult};
