#![forbid(unsafe_code)]

#[cfg(any(test, feature = "test-utils"))]
mod memory;
mod sqlite;

#[cfg(any(test, feature = "test-utils"))]
pub use memory::MemoryGateway;
pub use sqlite::SqliteGateway;

use crate::error::GatewayError;
use async_trait::async_trait;
use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, MilestoneUpdate, Mission, NewMission, Stats};
use tokio::sync::watch;

/// Request/response boundary in front of the persisted store.
///
/// Every successful write bumps the generation published by
/// [`MutationGateway::invalidations`] by exactly one, so a view that counts its own
/// writes can tell when someone else changed the store.
#[async_trait]
pub trait MutationGateway: Send + Sync {
    async fn list_missions(&self) -> Result<Vec<Mission>, GatewayError>;
    async fn add_mission(&self, mission: NewMission) -> Result<Mission, GatewayError>;
    async fn toggle_mission(&self, id: MissionId) -> Result<Mission, GatewayError>;
    async fn delete_mission(&self, id: MissionId) -> Result<Mission, GatewayError>;
    async fn read_stats(&self) -> Result<Stats, GatewayError>;
    async fn read_milestone(&self) -> Result<MilestoneSettings, GatewayError>;
    async fn update_milestone(
        &self,
        update: MilestoneUpdate,
    ) -> Result<MilestoneSettings, GatewayError>;
    async fn increment_milestone(&self, delta: i64) -> Result<MilestoneSettings, GatewayError>;

    fn invalidations(&self) -> watch::Receiver<u64>;
}

/// Gateway operations, used for logging and for failure injection in tests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum GatewayOp {
    ListMissions,
    AddMission,
    ToggleMission,
    DeleteMission,
    ReadStats,
    ReadMilestone,
    UpdateMilestone,
    IncrementMilestone,
}

impl GatewayOp {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ListMissions => "list_missions",
            Self::AddMission => "add_mission",
            Self::ToggleMission => "toggle_mission",
            Self::DeleteMission => "delete_mission",
            Self::ReadStats => "read_stats",
            Self::ReadMilestone => "read_milestone",
            Self::UpdateMilestone => "update_milestone",
            Self::IncrementMilestone => "increment_milestone",
        }
    }

    pub fn is_write(self) -> bool {
        !matches!(
            self,
            Self::ListMissions | Self::ReadStats | Self::ReadMilestone
        )
    }
}
