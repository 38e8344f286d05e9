#![forbid(unsafe_code)]

use crate::error::{GatewayError, SyncError};
use crate::feedback::{ADD_SUCCESS_TTL, Feedback, MILESTONE_SUCCESS_TTL};
use crate::gateway::MutationGateway;
use crate::state::{AppliedToggle, ClientState};
use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, MilestoneUpdate, Mission, NewMission, Stats};
use mq_core::policy::{MilestonePolicy, ReconcilePolicy};
use mq_storage::StoreError;
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SyncConfig {
    pub milestone_policy: MilestonePolicy,
    pub reconcile_policy: ReconcilePolicy,
}

/// Result of one remote request issued on behalf of an optimistic update.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "message", rename_all = "snake_case")]
pub enum RemoteStatus {
    Confirmed,
    Failed(String),
    /// No request was needed (e.g. a zero milestone delta).
    Skipped,
}

impl RemoteStatus {
    fn from_result<T>(result: &Result<T, GatewayError>) -> Self {
        match result {
            Ok(_) => Self::Confirmed,
            Err(err) => Self::Failed(err.to_string()),
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Reconciliation {
    /// Every remote request was confirmed.
    NotNeeded,
    /// A request failed and the optimistic state was left in place.
    KeptOptimistic,
    /// The whole toggle (flag, stats, milestone) was undone locally.
    RolledBackToggle,
    /// Only the local milestone delta was undone.
    RolledBackMilestone,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ToggleOutcome {
    pub mission_id: MissionId,
    /// Local completed flag after reconciliation.
    pub completed: bool,
    pub stats_delta: i64,
    pub milestone_delta: i64,
    pub toggle: RemoteStatus,
    pub milestone: RemoteStatus,
    pub reconciliation: Reconciliation,
}

impl ToggleOutcome {
    pub fn is_confirmed(&self) -> bool {
        !self.toggle.is_failed() && !self.milestone.is_failed()
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
pub struct LoadReport {
    /// Fetches that failed and were replaced by defaults.
    pub failed: Vec<&'static str>,
}

impl LoadReport {
    pub fn is_degraded(&self) -> bool {
        !self.failed.is_empty()
    }
}

/// Optimistic mirror of the store for one page session.
///
/// The view counts the writes it issued itself; any further bump of the gateway's
/// invalidation generation came from someone else and marks the view stale.
pub struct Synchronizer {
    gateway: Arc<dyn MutationGateway>,
    config: SyncConfig,
    state: ClientState,
    feedback: Option<Feedback>,
    invalidations: watch::Receiver<u64>,
    seen_generation: u64,
}

impl Synchronizer {
    pub fn new(gateway: Arc<dyn MutationGateway>, config: SyncConfig) -> Self {
        let invalidations = gateway.invalidations();
        let seen_generation = *invalidations.borrow();
        Self {
            gateway,
            config,
            state: ClientState::loading(),
            feedback: None,
            invalidations,
            seen_generation,
        }
    }

    pub fn config(&self) -> SyncConfig {
        self.config
    }

    pub fn state(&self) -> &ClientState {
        &self.state
    }

    pub fn gateway(&self) -> &Arc<dyn MutationGateway> {
        &self.gateway
    }

    /// Current banner, if it has not expired yet.
    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback_at(Instant::now())
    }

    pub fn feedback_at(&self, now: Instant) -> Option<&Feedback> {
        self.feedback
            .as_ref()
            .filter(|feedback| feedback.is_visible_at(now))
    }

    pub fn clear_feedback(&mut self) {
        self.feedback = None;
    }

    fn current_generation(&self) -> u64 {
        *self.invalidations.borrow()
    }

    /// True when a write this view did not issue landed since the last fetch.
    pub fn is_stale(&self) -> bool {
        self.current_generation() > self.seen_generation
    }

    fn note_own_writes(&mut self, confirmed: u64) {
        self.seen_generation += confirmed;
    }

    /// Re-fetches missions, stats and milestone if another writer invalidated the view.
    /// Returns whether anything was fetched.
    pub async fn revalidate(&mut self) -> Result<bool, SyncError> {
        let generation = self.current_generation();
        if generation <= self.seen_generation {
            return Ok(false);
        }
        let (missions, stats, milestone) = tokio::join!(
            self.gateway.list_missions(),
            self.gateway.read_stats(),
            self.gateway.read_milestone(),
        );
        let missions = missions.map_err(|source| SyncError::Remote {
            op: "list_missions",
            source,
        })?;
        let stats = stats.map_err(|source| SyncError::Remote {
            op: "read_stats",
            source,
        })?;
        let milestone = milestone.map_err(|source| SyncError::Remote {
            op: "read_milestone",
            source,
        })?;
        self.state.replace_missions(missions);
        self.state.replace_stats(stats);
        self.state.replace_milestone(milestone);
        self.seen_generation = generation;
        tracing::debug!(generation, "view revalidated after foreign write");
        Ok(true)
    }

    /// Fetches missions, stats and milestone together. Failures are logged and defaulted.
    pub async fn load(&mut self) -> LoadReport {
        self.state = ClientState::loading();
        self.seen_generation = self.current_generation();
        let (missions, stats, milestone) = tokio::join!(
            self.gateway.list_missions(),
            self.gateway.read_stats(),
            self.gateway.read_milestone(),
        );

        let mut report = LoadReport::default();
        let missions = missions.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "error loading missions");
            report.failed.push("missions");
            Vec::new()
        });
        let stats = stats.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "error loading mission stats");
            report.failed.push("stats");
            Stats::degraded()
        });
        let milestone = milestone.unwrap_or_else(|err| {
            tracing::warn!(error = %err, "error loading milestone settings");
            report.failed.push("milestone");
            MilestoneSettings::default()
        });

        self.state
            .finish_load(missions, stats, milestone, report.is_degraded());
        report
    }

    /// Re-fetches the list and stats, as the page does after an add.
    pub async fn refresh(&mut self) -> Result<(), SyncError> {
        let (missions, stats) =
            tokio::join!(self.gateway.list_missions(), self.gateway.read_stats());
        let missions = missions.map_err(|source| SyncError::Remote {
            op: "list_missions",
            source,
        })?;
        let stats = stats.map_err(|source| SyncError::Remote {
            op: "read_stats",
            source,
        })?;
        self.state.replace_missions(missions);
        self.state.replace_stats(stats);
        Ok(())
    }

    /// Flips the mission locally, then sends the toggle and the milestone increment
    /// concurrently. The local view is never re-read from the store afterwards.
    pub async fn toggle(&mut self, id: MissionId) -> Result<ToggleOutcome, SyncError> {
        let Some(applied) = self.state.apply_toggle(id, self.config.milestone_policy) else {
            return Err(SyncError::UnknownMission(id));
        };

        let gateway = &self.gateway;
        let delta = applied.milestone_delta;
        let (toggle_result, milestone_result) = tokio::join!(gateway.toggle_mission(id), async {
            if delta == 0 {
                None
            } else {
                Some(gateway.increment_milestone(delta).await)
            }
        });

        let toggle = RemoteStatus::from_result(&toggle_result);
        let milestone = match &milestone_result {
            Some(result) => RemoteStatus::from_result(result),
            None => RemoteStatus::Skipped,
        };
        if let Err(err) = &toggle_result {
            tracing::warn!(mission_id = %id, error = %err, "failed to toggle mission completion");
        }
        if let Some(Err(err)) = &milestone_result {
            tracing::warn!(mission_id = %id, delta, error = %err, "failed to increment milestone");
        }

        let confirmed = [&toggle, &milestone]
            .into_iter()
            .filter(|status| **status == RemoteStatus::Confirmed)
            .count();
        self.note_own_writes(confirmed as u64);

        let reconciliation = self.reconcile(&applied, &toggle, &milestone);
        if toggle.is_failed() || milestone.is_failed() {
            self.feedback = Some(Feedback::error(
                "Failed to update mission",
                Instant::now(),
            ));
        }

        let completed = self
            .state
            .mission(id)
            .map(|mission| mission.completed)
            .unwrap_or(applied.now_completed);
        Ok(ToggleOutcome {
            mission_id: id,
            completed,
            stats_delta: applied.stats_delta,
            milestone_delta: applied.milestone_delta,
            toggle,
            milestone,
            reconciliation,
        })
    }

    fn reconcile(
        &mut self,
        applied: &AppliedToggle,
        toggle: &RemoteStatus,
        milestone: &RemoteStatus,
    ) -> Reconciliation {
        if !toggle.is_failed() && !milestone.is_failed() {
            return Reconciliation::NotNeeded;
        }
        match self.config.reconcile_policy {
            ReconcilePolicy::KeepOptimistic => Reconciliation::KeptOptimistic,
            ReconcilePolicy::RollbackOnError if toggle.is_failed() => {
                self.state.revert_toggle(applied);
                Reconciliation::RolledBackToggle
            }
            ReconcilePolicy::RollbackOnError => {
                self.state.revert_milestone(applied);
                Reconciliation::RolledBackMilestone
            }
        }
    }

    /// Validates the form, waits for the store, then re-fetches the list. Not optimistic.
    pub async fn add_mission(
        &mut self,
        title: &str,
        description: &str,
        stars: &str,
    ) -> Result<Mission, SyncError> {
        let mission = NewMission::parse_form(title, description, stars)?;
        let added = match self.gateway.add_mission(mission).await {
            Ok(added) => added,
            Err(source) => {
                tracing::warn!(error = %source, "failed to add mission");
                self.feedback = Some(Feedback::error("Failed to add mission", Instant::now()));
                return Err(SyncError::Remote {
                    op: "add_mission",
                    source,
                });
            }
        };
        self.note_own_writes(1);

        if let Err(err) = self.refresh().await {
            tracing::warn!(error = %err, "refresh after add failed");
        }
        self.feedback = Some(Feedback::success(
            "Mission added successfully!",
            ADD_SUCCESS_TTL,
            Instant::now(),
        ));
        Ok(added)
    }

    /// Deletes remotely first; the local list only changes once the store confirmed.
    /// A row that is already gone from the store counts as deleted.
    pub async fn delete_mission(&mut self, id: MissionId) -> Result<Mission, SyncError> {
        if self.state.mission(id).is_none() {
            return Err(SyncError::UnknownMission(id));
        }
        let deleted = self.gateway.delete_mission(id).await;
        match deleted {
            Ok(_) => self.note_own_writes(1),
            Err(GatewayError::Store(StoreError::UnknownId)) => {
                tracing::info!(mission_id = %id, "mission was already deleted in the store");
            }
            Err(source) => {
                tracing::warn!(mission_id = %id, error = %source, "failed to delete mission");
                self.feedback = Some(Feedback::error(
                    "Failed to delete mission",
                    Instant::now(),
                ));
                return Err(SyncError::Remote {
                    op: "delete_mission",
                    source,
                });
            }
        }
        let removed = self
            .state
            .apply_delete(id)
            .ok_or(SyncError::UnknownMission(id))?;
        self.feedback = None;
        Ok(removed)
    }

    pub async fn update_milestone(
        &mut self,
        goal: &str,
        value: &str,
    ) -> Result<MilestoneSettings, SyncError> {
        let update = MilestoneUpdate::parse_form(goal, value)?;
        self.feedback = None;
        match self.gateway.update_milestone(update).await {
            Ok(settings) => {
                self.note_own_writes(1);
                self.state.replace_milestone(settings);
                self.feedback = Some(Feedback::success(
                    "Milestone updated successfully",
                    MILESTONE_SUCCESS_TTL,
                    Instant::now(),
                ));
                Ok(settings)
            }
            Err(source) => {
                tracing::warn!(error = %source, "failed to update milestone");
                self.feedback = Some(Feedback::error(
                    format!("Failed to update milestone: {source}"),
                    Instant::now(),
                ));
                Err(SyncError::Remote {
                    op: "update_milestone",
                    source,
                })
            }
        }
    }
}

impl std::fmt::Debug for Synchronizer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Synchronizer")
            .field("config", &self.config)
            .field("state", &self.state)
            .field("feedback", &self.feedback)
            .field("seen_generation", &self.seen_generation)
            .finish_non_exhaustive()
    }
}
