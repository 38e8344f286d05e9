#![forbid(unsafe_code)]

pub mod model;
pub mod pin;
pub mod policy;
pub mod progress;

pub use model::{
    MilestoneInputError, MilestoneSettings, MilestoneUpdate, Mission, MissionInputError,
    MissionInputErrors, NewMission, StarValue, Stats,
};
pub use pin::{PinSecret, PinSecretError, sanitize_pin_input};
pub use policy::{MilestonePolicy, ReconcilePolicy};
pub use progress::{STAR_POINTS, STATS_TOTAL, percentage, star_points};

pub mod ids {
    use serde::{Deserialize, Serialize};

    /// Store-assigned mission identifier. Always positive; never reused.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    #[serde(try_from = "i64", into = "i64")]
    pub struct MissionId(i64);

    impl MissionId {
        pub fn get(self) -> i64 {
            self.0
        }

        pub fn try_new(value: i64) -> Result<Self, MissionIdError> {
            if value <= 0 {
                return Err(MissionIdError::NotPositive);
            }
            Ok(Self(value))
        }
    }

    impl TryFrom<i64> for MissionId {
        type Error = MissionIdError;

        fn try_from(value: i64) -> Result<Self, Self::Error> {
            Self::try_new(value)
        }
    }

    impl From<MissionId> for i64 {
        fn from(id: MissionId) -> Self {
            id.0
        }
    }

    impl std::fmt::Display for MissionId {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    #[derive(Clone, Debug, PartialEq, Eq)]
    pub enum MissionIdError {
        NotPositive,
    }

    impl MissionIdError {
        pub fn message(&self) -> &'static str {
            match self {
                Self::NotPositive => "mission id must be a positive integer",
            }
        }
    }

    impl std::fmt::Display for MissionIdError {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str(self.message())
        }
    }
}
