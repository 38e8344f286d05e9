#![forbid(unsafe_code)]

use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, Mission, Stats};
use mq_core::policy::MilestonePolicy;
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadState {
    Loading,
    Ready,
    /// At least one initial fetch failed and was replaced by an empty default.
    Degraded,
}

/// The session's disposable copy of {missions, stats, milestone}.
///
/// `stats.total` is the fixed bar denominator; the number of missions is a separate
/// quantity read from the list itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientState {
    missions: Vec<Mission>,
    stats: Stats,
    milestone: MilestoneSettings,
    load: LoadState,
}

/// What an optimistic toggle changed locally, kept so it can be reverted exactly.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct AppliedToggle {
    pub(crate) mission_id: MissionId,
    pub(crate) now_completed: bool,
    pub(crate) stats_delta: i64,
    /// Delta the policy asked for; sent to the gateway.
    pub(crate) milestone_delta: i64,
    /// Delta actually applied locally after flooring at zero.
    pub(crate) milestone_applied: i64,
}

impl Default for ClientState {
    fn default() -> Self {
        Self::loading()
    }
}

impl ClientState {
    pub fn loading() -> Self {
        Self {
            missions: Vec::new(),
            stats: Stats::degraded(),
            milestone: MilestoneSettings::default(),
            load: LoadState::Loading,
        }
    }

    pub fn missions(&self) -> &[Mission] {
        &self.missions
    }

    pub fn mission(&self, id: MissionId) -> Option<&Mission> {
        self.missions.iter().find(|mission| mission.id == id)
    }

    pub fn mission_count(&self) -> usize {
        self.missions.len()
    }

    pub fn stats(&self) -> Stats {
        self.stats
    }

    pub fn milestone(&self) -> MilestoneSettings {
        self.milestone
    }

    pub fn load_state(&self) -> LoadState {
        self.load
    }

    pub fn stats_percentage(&self) -> u8 {
        self.stats.percentage()
    }

    pub fn milestone_percentage(&self) -> u8 {
        self.milestone.percentage()
    }

    pub(crate) fn finish_load(
        &mut self,
        missions: Vec<Mission>,
        stats: Stats,
        milestone: MilestoneSettings,
        degraded: bool,
    ) {
        self.missions = missions;
        self.stats = stats;
        self.milestone = milestone;
        self.load = if degraded {
            LoadState::Degraded
        } else {
            LoadState::Ready
        };
    }

    pub(crate) fn replace_missions(&mut self, missions: Vec<Mission>) {
        self.missions = missions;
    }

    pub(crate) fn replace_stats(&mut self, stats: Stats) {
        self.stats = stats;
    }

    pub(crate) fn replace_milestone(&mut self, milestone: MilestoneSettings) {
        self.milestone = milestone;
    }

    /// Flips the mission locally and moves stats and milestone by the star points.
    /// `stats.completed` moves by the full amount even past zero; only the milestone floors.
    pub(crate) fn apply_toggle(
        &mut self,
        id: MissionId,
        policy: MilestonePolicy,
    ) -> Option<AppliedToggle> {
        let mission = self.missions.iter_mut().find(|mission| mission.id == id)?;
        mission.completed = !mission.completed;
        let now_completed = mission.completed;
        let points = mission.points();

        let stats_delta = if now_completed { points } else { -points };
        self.stats.completed = self.stats.completed.saturating_add(stats_delta);

        let milestone_delta = policy.milestone_delta(points, now_completed);
        let milestone_before = self.milestone.value;
        self.milestone = self.milestone.with_delta(milestone_delta);

        Some(AppliedToggle {
            mission_id: id,
            now_completed,
            stats_delta,
            milestone_delta,
            milestone_applied: self.milestone.value - milestone_before,
        })
    }

    pub(crate) fn revert_toggle(&mut self, applied: &AppliedToggle) {
        if let Some(mission) = self
            .missions
            .iter_mut()
            .find(|mission| mission.id == applied.mission_id)
        {
            mission.completed = !applied.now_completed;
        }
        self.stats.completed -= applied.stats_delta;
        self.revert_milestone(applied);
    }

    pub(crate) fn revert_milestone(&mut self, applied: &AppliedToggle) {
        self.milestone.value -= applied.milestone_applied;
    }

    /// Removes the mission; completed points leave the stats, `stats.total` stays.
    pub(crate) fn apply_delete(&mut self, id: MissionId) -> Option<Mission> {
        let index = self.missions.iter().position(|mission| mission.id == id)?;
        let removed = self.missions.remove(index);
        if removed.completed {
            self.stats.completed = self.stats.completed.saturating_sub(removed.points()).max(0);
        }
        Some(removed)
    }
}
