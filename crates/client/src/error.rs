#![forbid(unsafe_code)]

use mq_core::ids::MissionId;
use mq_core::model::{MilestoneInputError, MissionInputErrors};
use mq_storage::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("gateway unavailable: {0}")]
    Unavailable(String),
}

impl GatewayError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::Store(err) => err.code(),
            Self::Unavailable(_) => "UNAVAILABLE",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SyncError {
    #[error("invalid mission: {0}")]
    InvalidMission(#[from] MissionInputErrors),
    #[error("invalid milestone: {0}")]
    InvalidMilestone(#[from] MilestoneInputError),
    #[error("mission {0} is not in the current list")]
    UnknownMission(MissionId),
    #[error("parent mode is required")]
    ParentModeRequired,
    #[error("{op} failed: {source}")]
    Remote {
        op: &'static str,
        #[source]
        source: GatewayError,
    },
}

impl SyncError {
    pub fn code(&self) -> &'static str {
        match self {
            Self::InvalidMission(_) | Self::InvalidMilestone(_) => "INVALID_INPUT",
            Self::UnknownMission(_) => "UNKNOWN_ID",
            Self::ParentModeRequired => "PARENT_MODE_REQUIRED",
            Self::Remote { source, .. } => source.code(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum GateError {
    #[error("Incorrect PIN. Please try again.")]
    IncorrectPin,
}
