#![forbid(unsafe_code)]

use super::{GatewayOp, MutationGateway};
use crate::error::GatewayError;
use async_trait::async_trait;
use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, MilestoneUpdate, Mission, NewMission, Stats};
use mq_storage::{SqliteStore, StoreError};
use std::sync::Mutex;
use tokio::sync::watch;

/// Gateway over a local [`SqliteStore`]. The connection is serialized behind a mutex.
#[derive(Debug)]
pub struct SqliteGateway {
    store: Mutex<SqliteStore>,
    generation: watch::Sender<u64>,
}

impl SqliteGateway {
    pub fn new(store: SqliteStore) -> Self {
        let (generation, _) = watch::channel(0);
        Self {
            store: Mutex::new(store),
            generation,
        }
    }

    fn run<T>(
        &self,
        op: GatewayOp,
        f: impl FnOnce(&mut SqliteStore) -> Result<T, StoreError>,
    ) -> Result<T, GatewayError> {
        let mut store = self
            .store
            .lock()
            .map_err(|_| GatewayError::Unavailable("store lock poisoned".to_string()))?;
        match f(&mut *store) {
            Ok(value) => {
                drop(store);
                if op.is_write() {
                    self.generation.send_modify(|generation| *generation += 1);
                }
                tracing::debug!(op = op.as_str(), "store request ok");
                Ok(value)
            }
            Err(err) => {
                tracing::warn!(op = op.as_str(), code = err.code(), error = %err, "store request failed");
                Err(err.into())
            }
        }
    }
}

#[async_trait]
impl MutationGateway for SqliteGateway {
    async fn list_missions(&self) -> Result<Vec<Mission>, GatewayError> {
        self.run(GatewayOp::ListMissions, |store| store.list_missions())
    }

    async fn add_mission(&self, mission: NewMission) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::AddMission, |store| store.add_mission(&mission))
    }

    async fn toggle_mission(&self, id: MissionId) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::ToggleMission, |store| store.toggle_mission(id))
    }

    async fn delete_mission(&self, id: MissionId) -> Result<Mission, GatewayError> {
        self.run(GatewayOp::DeleteMission, |store| store.delete_mission(id))
    }

    async fn read_stats(&self) -> Result<Stats, GatewayError> {
        self.run(GatewayOp::ReadStats, |store| store.mission_stats())
    }

    async fn read_milestone(&self) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::ReadMilestone, |store| store.milestone_settings())
    }

    async fn update_milestone(
        &self,
        update: MilestoneUpdate,
    ) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::UpdateMilestone, |store| store.update_milestone(update))
    }

    async fn increment_milestone(&self, delta: i64) -> Result<MilestoneSettings, GatewayError> {
        self.run(GatewayOp::IncrementMilestone, |store| {
            store.increment_milestone(delta)
        })
    }

    fn invalidations(&self) -> watch::Receiver<u64> {
        self.generation.subscribe()
    }
}
