#![forbid(unsafe_code)]

use crate::error::{GateError, SyncError};
use crate::flags::FlagStore;
use crate::gate::ParentModeGate;
use crate::gateway::MutationGateway;
use crate::sync::{LoadReport, SyncConfig, Synchronizer, ToggleOutcome};
use mq_core::ids::MissionId;
use mq_core::model::{MilestoneSettings, Mission};
use mq_core::pin::PinSecret;
use std::sync::Arc;

#[derive(Clone, Debug, Default)]
pub struct SessionConfig {
    pub sync: SyncConfig,
    pub pin: PinSecret,
}

/// One page session: the synchronized view plus the parent-mode gate.
///
/// Toggling is open to everyone; adding, deleting and editing the milestone need
/// parent mode.
#[derive(Debug)]
pub struct Session {
    sync: Synchronizer,
    gate: ParentModeGate,
}

impl Session {
    pub fn new(
        gateway: Arc<dyn MutationGateway>,
        flags: Box<dyn FlagStore>,
        config: SessionConfig,
    ) -> Self {
        Self {
            sync: Synchronizer::new(gateway, config.sync),
            gate: ParentModeGate::restore(config.pin, flags),
        }
    }

    /// Builds the session and runs the initial load.
    pub async fn open(
        gateway: Arc<dyn MutationGateway>,
        flags: Box<dyn FlagStore>,
        config: SessionConfig,
    ) -> (Self, LoadReport) {
        let mut session = Self::new(gateway, flags, config);
        let report = session.sync.load().await;
        (session, report)
    }

    pub fn sync(&self) -> &Synchronizer {
        &self.sync
    }

    pub fn gate(&self) -> &ParentModeGate {
        &self.gate
    }

    pub fn is_parent_mode(&self) -> bool {
        self.gate.is_unlocked()
    }

    pub fn unlock(&mut self, raw_pin: &str) -> Result<(), GateError> {
        self.gate.unlock(raw_pin)
    }

    pub fn exit_parent_mode(&mut self) {
        self.gate.exit();
    }

    /// Picks up writes made through the same gateway by other sessions.
    pub async fn revalidate(&mut self) -> Result<bool, SyncError> {
        self.sync.revalidate().await
    }

    /// Throws away the local copy, re-reads the parent-mode flag and fetches everything again.
    pub async fn reload(&mut self) -> LoadReport {
        self.gate.refresh();
        self.sync.load().await
    }

    pub async fn toggle(&mut self, id: MissionId) -> Result<ToggleOutcome, SyncError> {
        self.sync.toggle(id).await
    }

    pub async fn add_mission(
        &mut self,
        title: &str,
        description: &str,
        stars: &str,
    ) -> Result<Mission, SyncError> {
        self.require_parent_mode()?;
        self.sync.add_mission(title, description, stars).await
    }

    pub async fn delete_mission(&mut self, id: MissionId) -> Result<Mission, SyncError> {
        self.require_parent_mode()?;
        self.sync.delete_mission(id).await
    }

    pub async fn update_milestone(
        &mut self,
        goal: &str,
        value: &str,
    ) -> Result<MilestoneSettings, SyncError> {
        self.require_parent_mode()?;
        self.sync.update_milestone(goal, value).await
    }

    /// Hands back the flag store so a follow-up session can restore from it.
    pub fn into_flags(self) -> Box<dyn FlagStore> {
        self.gate.into_flags()
    }

    fn require_parent_mode(&self) -> Result<(), SyncError> {
        if self.gate.is_unlocked() {
            Ok(())
        } else {
            Err(SyncError::ParentModeRequired)
        }
    }
}
