#![forbid(unsafe_code)]

//! Client-side session model: an optimistic in-memory view of missions, stats and the
//! milestone, kept in step with a [`MutationGateway`], plus the parent-mode PIN gate.

mod error;
mod feedback;
mod flags;
mod gate;
mod gateway;
mod session;
mod state;
mod sync;

pub use error::{GateError, GatewayError, SyncError};
pub use feedback::{ADD_SUCCESS_TTL, Feedback, FeedbackKind, MILESTONE_SUCCESS_TTL};
pub use flags::{FileFlagStore, FlagStore, FlagStoreError, MemoryFlagStore};
pub use gate::{GateState, PARENT_MODE_KEY, ParentModeGate};
pub use gateway::{GatewayOp, MutationGateway, SqliteGateway};
#[cfg(any(test, feature = "test-utils"))]
pub use gateway::MemoryGateway;
pub use session::{Session, SessionConfig};
pub use state::{ClientState, LoadState};
pub use sync::{
    LoadReport, Reconciliation, RemoteStatus, SyncConfig, Synchronizer, ToggleOutcome,
};
