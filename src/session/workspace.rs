use tracing::{debug, info, warn};

use super::draft::{truncate_chars, Draft, MAX_IDEA_CHARS};
use super::revisions::{LoadedRevision, Revision, RevisionHistory};
use crate::critique::{compare, AnalysisOutcome, AnalysisRequest, Analyzer, CritiqueMode, SectionDelta};
use crate::error::{AppError, AppResult, StorageResult, ValidationError};
use crate::storage::{keys, namespaced, StateStore};

/// Where the analyze action currently stands.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum AnalysisState {
    /// Nothing submitted yet, or the last request was abandoned
    #[default]
    Idle,
    /// A request is in flight
    Submitting,
    /// Last analysis finished, parsed or raw
    Succeeded(AnalysisOutcome),
    /// User-visible error message
    Failed(String),
}

impl AnalysisState {
    /// The error message, if the last action failed
    pub fn error(&self) -> Option<&str> {
        match self {
            AnalysisState::Failed(message) => Some(message),
            _ => None,
        }
    }
}

/// Draft, preferences, history and baseline, mirrored to a [`StateStore`].
///
/// Every mutation writes the changed key through the store before returning.
/// Analysis takes `&mut self`, so at most one request is ever in flight.
pub struct Workspace<S: StateStore> {
    store: S,
    draft: Draft,
    novelty: bool,
    escalation: u32,
    history: RevisionHistory,
    baseline: Option<Revision>,
    /// Id of the revision on display: the last one recorded or loaded
    current: Option<String>,
    state: AnalysisState,
}

impl<S: StateStore> Workspace<S> {
    /// Rebuild the workspace from stored state.
    ///
    /// Values that fail to parse are treated as absent. Only a failure to
    /// read the store at all is an error.
    pub async fn hydrate(store: S) -> StorageResult<Self> {
        let stored = store.load().await?;
        let get = |key: &str| stored.get(&namespaced(key)).map(String::as_str);

        let draft = Draft {
            idea: truncate_chars(get(keys::IDEA).unwrap_or_default(), MAX_IDEA_CHARS),
            goal: get(keys::GOAL).unwrap_or_default().to_string(),
            audience: get(keys::AUDIENCE).unwrap_or_default().to_string(),
            constraints: get(keys::CONSTRAINTS).unwrap_or_default().to_string(),
            mode: parse_or_default(keys::MODE, get(keys::MODE), |v| v.parse::<CritiqueMode>().ok()),
        };

        let novelty = parse_or_default(keys::NOVELTY, get(keys::NOVELTY), |v| v.parse::<bool>().ok());
        let escalation =
            parse_or_default(keys::ESCALATION, get(keys::ESCALATION), |v| v.trim().parse::<u32>().ok());
        let history = parse_or_default(keys::HISTORY, get(keys::HISTORY), |v| {
            serde_json::from_str::<Vec<Revision>>(v)
                .ok()
                .map(RevisionHistory::from_entries)
        });
        let baseline = parse_or_default(keys::BASELINE, get(keys::BASELINE), |v| {
            serde_json::from_str::<Revision>(v).ok().map(Some)
        });

        let current = get(keys::CURRENT).map(str::to_string);

        debug!(
            history = history.len(),
            has_baseline = baseline.is_some(),
            escalation,
            "Workspace hydrated"
        );

        Ok(Self {
            store,
            draft,
            novelty,
            escalation,
            history,
            baseline,
            current,
            state: AnalysisState::Idle,
        })
    }

    // Accessors

    /// Current draft
    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    /// Novelty flag
    pub fn novelty(&self) -> bool {
        self.novelty
    }

    /// Escalation counter
    pub fn escalation(&self) -> u32 {
        self.escalation
    }

    /// Recorded revisions, newest first
    pub fn history(&self) -> &RevisionHistory {
        &self.history
    }

    /// Pinned baseline, if any
    pub fn baseline(&self) -> Option<&Revision> {
        self.baseline.as_ref()
    }

    /// The revision on display, falling back to the newest when none is
    /// tracked or the tracked one has left history.
    pub fn current_revision(&self) -> Option<&Revision> {
        self.current
            .as_deref()
            .and_then(|id| self.history.entries().iter().find(|r| r.id == id))
            .or_else(|| self.history.latest())
    }

    /// State of the analyze action
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    /// Whether an analysis is pending; the trigger should be disabled meanwhile
    pub fn is_busy(&self) -> bool {
        matches!(self.state, AnalysisState::Submitting)
    }

    /// Get a reference to the backing store.
    pub fn store(&self) -> &S {
        &self.store
    }

    // Draft mutations

    /// Replace the idea, truncated to [`MAX_IDEA_CHARS`].
    pub async fn set_idea(&mut self, idea: &str) -> StorageResult<()> {
        let idea = truncate_chars(idea, MAX_IDEA_CHARS);
        self.update_text(keys::IDEA, idea, |d| &mut d.idea).await
    }

    /// Replace the goal
    pub async fn set_goal(&mut self, goal: &str) -> StorageResult<()> {
        self.update_text(keys::GOAL, goal.to_string(), |d| &mut d.goal).await
    }

    /// Replace the audience
    pub async fn set_audience(&mut self, audience: &str) -> StorageResult<()> {
        self.update_text(keys::AUDIENCE, audience.to_string(), |d| &mut d.audience).await
    }

    /// Replace the constraints
    pub async fn set_constraints(&mut self, constraints: &str) -> StorageResult<()> {
        self.update_text(keys::CONSTRAINTS, constraints.to_string(), |d| &mut d.constraints)
            .await
    }

    /// Select a critique mode
    pub async fn set_mode(&mut self, mode: CritiqueMode) -> StorageResult<()> {
        if self.draft.mode == mode {
            return Ok(());
        }
        self.draft.mode = mode;
        self.persist(keys::MODE, mode.as_str()).await
    }

    /// Turn the novelty directive on or off
    pub async fn set_novelty(&mut self, novelty: bool) -> StorageResult<()> {
        if self.novelty == novelty {
            return Ok(());
        }
        self.novelty = novelty;
        self.persist(keys::NOVELTY, if novelty { "true" } else { "false" }).await
    }

    /// Bump the escalation counter and return the new value. It never goes down.
    pub async fn escalate(&mut self) -> StorageResult<u32> {
        self.escalation = self.escalation.saturating_add(1);
        self.persist(keys::ESCALATION, &self.escalation.to_string()).await?;
        Ok(self.escalation)
    }

    /// Empty idea, goal, audience and constraints. Mode, novelty, escalation,
    /// history and baseline are kept.
    pub async fn clear_draft(&mut self) -> StorageResult<()> {
        self.set_idea("").await?;
        self.set_goal("").await?;
        self.set_audience("").await?;
        self.set_constraints("").await?;
        self.set_current(None).await?;
        self.state = AnalysisState::Idle;
        Ok(())
    }

    // Revision store

    /// Prepend a revision to history, make it current and persist both.
    pub async fn record(&mut self, revision: Revision) -> StorageResult<()> {
        let id = revision.id.clone();
        self.history.record(revision);
        let json = serde_json::to_string(&self.history)?;
        self.persist(keys::HISTORY, &json).await?;
        self.set_current(Some(id)).await
    }

    /// Replace the baseline; `None` clears it.
    pub async fn set_baseline(&mut self, baseline: Option<Revision>) -> StorageResult<()> {
        match &baseline {
            Some(revision) => {
                let json = serde_json::to_string(revision)?;
                self.persist(keys::BASELINE, &json).await?;
            }
            None => self.store.remove(&namespaced(keys::BASELINE)).await?,
        }
        self.baseline = baseline;
        Ok(())
    }

    /// Pin the revision on display as the baseline.
    ///
    /// Returns `None` and leaves the baseline alone when history is empty.
    pub async fn save_current_as_baseline(&mut self) -> StorageResult<Option<&Revision>> {
        let Some(current) = self.current_revision().cloned() else {
            return Ok(None);
        };
        info!(revision = %current.id, "Saving baseline");
        self.set_baseline(Some(current)).await?;
        Ok(self.baseline.as_ref())
    }

    /// Load a revision (full id or unique prefix) back into the draft.
    pub async fn load_revision(&mut self, id: &str) -> AppResult<LoadedRevision> {
        let revision = self.history.find(id)?;
        let revision_id = revision.id.clone();
        let loaded = revision.load();

        self.set_idea(&loaded.draft.idea).await?;
        self.set_goal(&loaded.draft.goal).await?;
        self.set_audience(&loaded.draft.audience).await?;
        self.set_constraints(&loaded.draft.constraints).await?;
        self.set_mode(loaded.draft.mode).await?;
        self.set_current(Some(revision_id)).await?;
        self.state = AnalysisState::Succeeded(loaded.outcome.clone());

        Ok(loaded)
    }

    /// Section differences between the baseline and the revision on display.
    pub fn compare_with_baseline(&self) -> Option<Vec<SectionDelta>> {
        let baseline = self.baseline.as_ref()?;
        let current = self.current_revision()?;
        Some(compare(baseline.result.as_ref(), current.result.as_ref()))
    }

    // Analysis

    /// Request for the current draft and preferences
    pub fn analysis_request(&self) -> AnalysisRequest {
        AnalysisRequest {
            idea: self.draft.idea.trim().to_string(),
            context: self.draft.context(),
            mode: self.draft.mode,
            escalation: self.escalation,
            novelty: self.novelty,
        }
    }

    /// Run the analyze action and return the resulting state.
    ///
    /// Errors never escape: they end up as [`AnalysisState::Failed`] with a
    /// user-facing message. Both success outcomes record a revision; failures
    /// leave history untouched.
    pub async fn analyze(&mut self, analyzer: &Analyzer) -> AnalysisState {
        if self.is_busy() {
            return AnalysisState::Failed(ValidationError::Busy.to_string());
        }

        let request = self.analysis_request();
        if let Err(e) = analyzer.validate(&request) {
            debug!(error = %e, "Analyze rejected before submission");
            self.state = AnalysisState::Failed(e.user_message());
            return self.state.clone();
        }

        self.state = AnalysisState::Submitting;

        let result = {
            let mut pending = PendingSubmission::new(&mut self.state);
            let result = analyzer.process(&request).await;
            pending.finish();
            result
        };

        match result {
            Ok(outcome) => {
                let revision =
                    Revision::new(request.idea.clone(), request.context.clone(), request.mode, &outcome);
                let revision_id = revision.id.clone();
                if let Err(e) = self.record(revision).await {
                    warn!(error = %e, "Failed to persist revision history");
                }
                info!(
                    revision = %revision_id,
                    mode = %request.mode,
                    parsed = outcome.result().is_some(),
                    "Analysis recorded"
                );
                self.state = AnalysisState::Succeeded(outcome);
            }
            Err(e) => {
                warn!(error = %e, mode = %request.mode, "Analysis failed");
                self.state = AnalysisState::Failed(e.user_message());
            }
        }

        self.state.clone()
    }

    /// "Go harder": raise the escalation counter, then analyze again.
    pub async fn go_harder(&mut self, analyzer: &Analyzer) -> AnalysisState {
        if self.is_busy() {
            return AnalysisState::Failed(ValidationError::Busy.to_string());
        }
        if let Err(e) = self.escalate().await {
            warn!(error = %e, "Failed to persist escalation counter");
            self.state = AnalysisState::Failed(AppError::from(e).user_message());
            return self.state.clone();
        }
        self.analyze(analyzer).await
    }

    // Persistence helpers

    async fn update_text(
        &mut self,
        key: &'static str,
        value: String,
        field: fn(&mut Draft) -> &mut String,
    ) -> StorageResult<()> {
        let slot = field(&mut self.draft);
        if *slot == value {
            return Ok(());
        }
        slot.clone_from(&value);
        self.persist(key, &value).await
    }

    async fn set_current(&mut self, id: Option<String>) -> StorageResult<()> {
        if self.current == id {
            return Ok(());
        }
        match &id {
            Some(id) => self.persist(keys::CURRENT, id).await?,
            None => self.store.remove(&namespaced(keys::CURRENT)).await?,
        }
        self.current = id;
        Ok(())
    }

    async fn persist(&self, key: &str, value: &str) -> StorageResult<()> {
        self.store.save(&namespaced(key), value).await
    }
}

/// Resets the state to `Idle` if the request future is dropped while
/// `Submitting`, so an abandoned analysis never blocks the next one.
struct PendingSubmission<'a> {
    state: &'a mut AnalysisState,
    done: bool,
}

impl<'a> PendingSubmission<'a> {
    fn new(state: &'a mut AnalysisState) -> Self {
        Self { state, done: false }
    }

    fn finish(&mut self) {
        self.done = true;
    }
}

impl Drop for PendingSubmission<'_> {
    fn drop(&mut self) {
        if !self.done {
            debug!("Analysis dropped before completion, back to idle");
            *self.state = AnalysisState::Idle;
        }
    }
}

/// Parse a stored value, treating absence or garbage as the default.
fn parse_or_default<T: Default>(
    key: &str,
    raw: Option<&str>,
    parse: impl FnOnce(&str) -> Option<T>,
) -> T {
    match raw {
        None => T::default(),
        Some(value) => parse(value).unwrap_or_else(|| {
            debug!(key = %key, "Discarding unreadable stored value");
            T::default()
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    use crate::critique::AnalysisResult;
    use crate::error::StorageError;
    use crate::storage::{MemoryStateStore, MockStateStore};

    async fn workspace() -> Workspace<MemoryStateStore> {
        Workspace::hydrate(MemoryStateStore::new()).await.unwrap()
    }

    fn revision(idea: &str) -> Revision {
        Revision::new(
            idea,
            "",
            CritiqueMode::Brutal,
            &AnalysisOutcome::Parsed(AnalysisResult::default()),
        )
    }

    #[tokio::test]
    async fn test_hydrate_empty_store_uses_defaults() {
        let ws = workspace().await;
        assert_eq!(ws.draft(), &Draft::default());
        assert!(!ws.novelty());
        assert_eq!(ws.escalation(), 0);
        assert!(ws.history().is_empty());
        assert!(ws.baseline().is_none());
        assert_eq!(ws.state(), &AnalysisState::Idle);
    }

    #[tokio::test]
    async fn test_set_idea_truncates() {
        let mut ws = workspace().await;
        ws.set_idea(&"x".repeat(MAX_IDEA_CHARS + 50)).await.unwrap();
        assert_eq!(ws.draft().idea.chars().count(), MAX_IDEA_CHARS);
        assert!(ws.draft().idea_limit().at_limit);
    }

    #[tokio::test]
    async fn test_escalate_persists_decimal() {
        let mut ws = workspace().await;
        assert_eq!(ws.escalate().await.unwrap(), 1);
        assert_eq!(ws.escalate().await.unwrap(), 2);
        assert_eq!(ws.store().get("crucible:escalation").as_deref(), Some("2"));
    }

    #[tokio::test]
    async fn test_clear_draft_keeps_preferences() {
        let mut ws = workspace().await;
        ws.set_idea("idea").await.unwrap();
        ws.set_goal("goal").await.unwrap();
        ws.set_mode(CritiqueMode::Ethical).await.unwrap();
        ws.set_novelty(true).await.unwrap();
        ws.escalate().await.unwrap();
        ws.record(revision("idea")).await.unwrap();

        ws.clear_draft().await.unwrap();

        assert_eq!(ws.draft().idea, "");
        assert_eq!(ws.draft().goal, "");
        assert_eq!(ws.draft().mode, CritiqueMode::Ethical);
        assert!(ws.novelty());
        assert_eq!(ws.escalation(), 1);
        assert_eq!(ws.history().len(), 1);
    }

    #[tokio::test]
    async fn test_unchanged_value_is_not_rewritten() {
        let mut store = MockStateStore::new();
        store.expect_load().returning(|| Ok(HashMap::new()));
        store
            .expect_save()
            .withf(|key, value| key.to_string() == "crucible:mode" && value.to_string() == "investor")
            .times(1)
            .returning(|_, _| Ok(()));

        let mut ws = Workspace::hydrate(store).await.unwrap();
        ws.set_mode(CritiqueMode::Investor).await.unwrap();
        ws.set_mode(CritiqueMode::Investor).await.unwrap();
        ws.set_goal("").await.unwrap();
    }

    #[tokio::test]
    async fn test_hydrate_propagates_store_failure() {
        let mut store = MockStateStore::new();
        store.expect_load().returning(|| {
            Err(StorageError::Connection {
                message: "disk gone".to_string(),
            })
        });

        assert!(Workspace::hydrate(store).await.is_err());
    }

    #[tokio::test]
    async fn test_clear_baseline_removes_key() {
        let mut store = MockStateStore::new();
        store.expect_load().returning(|| Ok(HashMap::new()));
        store
            .expect_remove()
            .withf(|key| key.to_string() == "crucible:baseline")
            .times(1)
            .returning(|_| Ok(()));

        let mut ws = Workspace::hydrate(store).await.unwrap();
        ws.set_baseline(None).await.unwrap();
        assert!(ws.baseline().is_none());
    }

    #[tokio::test]
    async fn test_save_current_as_baseline() {
        let mut ws = workspace().await;
        assert!(ws.save_current_as_baseline().await.unwrap().is_none());

        ws.record(revision("first")).await.unwrap();
        ws.record(revision("second")).await.unwrap();
        let saved = ws.save_current_as_baseline().await.unwrap().cloned().unwrap();
        assert_eq!(saved.idea, "second");
        assert!(ws.store().get("crucible:baseline").is_some());
    }

    #[tokio::test]
    async fn test_load_revision_restores_draft() {
        let mut ws = workspace().await;
        let rev = Revision::new(
            "old idea",
            "Goal: G\nAudience: A\nConstraints: C",
            CritiqueMode::Logical,
            &AnalysisOutcome::RawFallback("raw".to_string()),
        );
        let id = rev.id.clone();
        ws.record(rev).await.unwrap();

        let loaded = ws.load_revision(&id).await.unwrap();
        assert_eq!(loaded.outcome, AnalysisOutcome::RawFallback("raw".to_string()));
        assert_eq!(ws.draft().idea, "old idea");
        assert_eq!(ws.draft().goal, "G");
        assert_eq!(ws.draft().audience, "A");
        assert_eq!(ws.draft().constraints, "C");
        assert_eq!(ws.draft().mode, CritiqueMode::Logical);
        assert_eq!(ws.store().get("crucible:mode").as_deref(), Some("logical"));
    }

    #[tokio::test]
    async fn test_baseline_pins_loaded_revision() {
        let mut ws = workspace().await;
        let older = revision("older");
        let older_id = older.id.clone();
        ws.record(older).await.unwrap();
        ws.record(revision("newer")).await.unwrap();
        assert_eq!(ws.current_revision().unwrap().idea, "newer");

        ws.load_revision(&older_id).await.unwrap();
        assert_eq!(ws.store().get("crucible:current").as_deref(), Some(older_id.as_str()));

        let pinned = ws.save_current_as_baseline().await.unwrap().cloned().unwrap();
        assert_eq!(pinned.id, older_id);
    }

    #[tokio::test]
    async fn test_current_falls_back_to_newest() {
        let store = MemoryStateStore::new();
        store.save("crucible:current", "evicted-id").await.unwrap();
        let mut ws = Workspace::hydrate(store).await.unwrap();
        assert!(ws.current_revision().is_none());

        ws.record(revision("only")).await.unwrap();
        ws.clear_draft().await.unwrap();
        assert!(ws.store().get("crucible:current").is_none());
        assert_eq!(ws.current_revision().unwrap().idea, "only");
    }

    #[tokio::test]
    async fn test_load_unknown_revision_fails() {
        let mut ws = workspace().await;
        assert!(ws.load_revision("nope").await.is_err());
    }

    #[tokio::test]
    async fn test_analysis_request_from_draft() {
        let mut ws = workspace().await;
        ws.set_idea("  padded idea ").await.unwrap();
        ws.set_audience("devs").await.unwrap();
        ws.set_novelty(true).await.unwrap();

        let request = ws.analysis_request();
        assert_eq!(request.idea, "padded idea");
        assert_eq!(request.context, "Audience: devs");
        assert!(request.novelty);
        assert_eq!(request.escalation, 0);
    }
}
