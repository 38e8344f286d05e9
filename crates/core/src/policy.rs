#![forbid(unsafe_code)]

/// How un-completing a mission affects the milestone counter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MilestonePolicy {
    /// The milestone only grows: completing adds stars x 10, un-completing adds nothing.
    #[default]
    Ratchet,
    /// Un-completing subtracts what completing added (floored at zero).
    Symmetric,
}

impl MilestonePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Ratchet => "ratchet",
            Self::Symmetric => "symmetric",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "ratchet" => Some(Self::Ratchet),
            "symmetric" => Some(Self::Symmetric),
            _ => None,
        }
    }

    /// Milestone delta for a toggle that leaves the mission `now_completed`.
    pub fn milestone_delta(self, points: i64, now_completed: bool) -> i64 {
        match (self, now_completed) {
            (_, true) => points,
            (Self::Ratchet, false) => 0,
            (Self::Symmetric, false) => -points,
        }
    }
}

/// What an optimistic mutation does when its remote request fails.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReconcilePolicy {
    #[default]
    KeepOptimistic,
    RollbackOnError,
}

impl ReconcilePolicy {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::KeepOptimistic => "keep",
            Self::RollbackOnError => "rollback",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "keep" | "keep_optimistic" => Some(Self::KeepOptimistic),
            "rollback" | "rollback_on_error" => Some(Self::RollbackOnError),
            _ => None,
        }
    }
}
