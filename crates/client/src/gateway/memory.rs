#![forbid(unsafe_code)]

use super::{GatewayOp, MutationGateway};
use crate::error::GatewayError;
use async_trait::async_trait;
use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, MilestoneUpdate, Mission, NewMission, Stats};
use mq_core::progress::STAR_POINTS;
use mq_storage::StoreError;
use std::collections::BTreeSet;
use std::sync::{Mutex, MutexGuard};
use tokio::sync::watch;

/// Non-persistent gateway with per-operation failure injection.
#[derive(Debug)]
pub struct MemoryGateway {
    inner: Mutex<MemoryState>,
    generation: watch::Sender<u64>,
}

#[derive(Debug)]
struct MemoryState {
    missions: Vec<Mission>,
    milestone: MilestoneSettings,
    last_id: i64,
    failing: BTreeSet<GatewayOp>,
    calls: Vec<GatewayOp>,
}

impl Default for MemoryGateway {
    fn default() -> Self {
        Self::with_milestone(MilestoneSettings::default())
    }
}

impl MemoryGateway {
    pub fn with_milestone(milestone: MilestoneSettings) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            inner: Mutex::new(MemoryState {
                missions: Vec::new(),
                milestone,
                last_id: 0,
                failing: BTreeSet::new(),
                calls: Vec::new(),
            }),
            generation,
        }
    }

    /// Makes every later call of `op` fail until [`MemoryGateway::heal`] is called.
    pub fn fail(&self, op: GatewayOp) {
        self.lock().failing.insert(op);
    }

    pub fn heal(&self, op: GatewayOp) {
        self.lock().failing.remove(&op);
    }

    /// Operations received so far, in arrival order, including failed ones.
    pub fn calls(&self) -> Vec<GatewayOp> {
        self.lock().calls.clone()
    }

    /// Snapshot of the stored rows, bypassing failure injection.
    pub fn stored_missions(&self) -> Vec<Mission> {
        self.lock().missions.clone()
    }

    pub fn stored_milestone(&self) -> MilestoneSettings {
        self.lock().milestone
    }

    fn lock(&self) -> MutexGuard<'_, MemoryState> {
        // A panic while holding the lock cannot leave the state half-written.
        match self.inner.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn run<T>(
        &self,
        op: GatewayOp,
        f: impl FnOnce(&mut MemoryState) -> Result<T, StoreError>,
    ) -> Result<T, GatewayError> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(&op) {
            return Err(GatewayError::Unavailable(format!(
                "{} is failing",
                op.as_str()
            )));
        }
        let value = f(&mut *state)?;
        drop(state);
        if op.is_write() {
            self.generation.send_modify(|generation| *generation += 1);
        }
        Ok(value)
    }
}

impl MemoryState {
    fn position(&self, id: MissionId) -> Result<usize, StoreError> {
        self.missions
            .iter()
            .position(|mission| mission.id == id)
            .ok_or(StoreError::UnknownId)
    }
}

#[async_trait]
impl MutationGateway for MemoryGateway {
    async fn list_missions(&self) -> Result<Vec<Mission>, GatewayError> {
        self.run(GatewayOp::ListMissions, |state| {
            let mut missions = state.missions.clone();
            missions.sort_by_key(|mission| (mission.stars, mission.id));
            Ok(missions)
        })
    }

    async fn add_mission(&self, mission: NewMission) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::AddMission, |state| {
            state.last_id += 1;
            let id = MissionId::try_new(state.last_id)
                .map_err(|_| StoreError::InvalidInput("id overflow"))?;
            let stored = Mission {
                id,
                title: mission.title().to_string(),
                description: mission.description().to_string(),
                stars: mission.stars(),
                completed: false,
                created_at_ms: state.last_id,
            };
            state.missions.push(stored.clone());
            Ok(stored)
        })
    }

    async fn toggle_mission(&self, id: MissionId) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::ToggleMission, |state| {
            let index = state.position(id)?;
            let mission = &mut state.missions[index];
            mission.completed = !mission.completed;
            Ok(mission.clone())
        })
    }

    async fn delete_mission(&self, id: MissionId) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::DeleteMission, |state| {
            let index = state.position(id)?;
            Ok(state.missions.remove(index))
        })
    }

    async fn read_stats(&self) -> Result<Stats, GatewayError> {
        self.run(GatewayOp::ReadStats, |state| {
            let stars: i64 = state
                .missions
                .iter()
                .filter(|mission| mission.completed)
                .map(|mission| i64::from(mission.stars.get()))
                .sum();
            Ok(Stats::from_completed_points(stars * STAR_POINTS))
        })
    }

    async fn read_milestone(&self) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::ReadMilestone, |state| Ok(state.milestone))
    }

    async fn update_milestone(
        &self,
        update: MilestoneUpdate,
    ) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::UpdateMilestone, |state| {
            state.milestone = update.into_settings();
            Ok(state.milestone)
        })
    }

    async fn increment_milestone(&self, delta: i64) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::IncrementMilestone, |state| {
            state.milestone = state.milestone.with_delta(delta);
            Ok(state.milestone)
        })
    }

    fn invalidations(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}
