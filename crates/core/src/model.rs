#![forbid(unsafe_code)]

use crate::ids::MissionId;
use crate::progress::{STATS_TOTAL, percentage, star_points};
use serde::{Deserialize, Serialize};

pub const MIN_STARS: u8 = 1;
pub const MAX_STARS: u8 = 5;
pub const DEFAULT_MILESTONE_GOAL: i64 = 100;

/// Star reward of a mission, always within `MIN_STARS..=MAX_STARS`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "u8")]
pub struct StarValue(u8);

impl StarValue {
    pub fn get(self) -> u8 {
        self.0
    }

    pub fn try_new(value: i64) -> Result<Self, MissionInputError> {
        if value < i64::from(MIN_STARS) || value > i64::from(MAX_STARS) {
            return Err(MissionInputError::StarsOutOfRange);
        }
        Ok(Self(value as u8))
    }

    /// Stats/milestone points earned by completing a mission with this reward.
    pub fn points(self) -> i64 {
        star_points(self.0)
    }
}

impl TryFrom<i64> for StarValue {
    type Error = MissionInputError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        Self::try_new(value)
    }
}

impl From<StarValue> for u8 {
    fn from(value: StarValue) -> Self {
        value.0
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: MissionId,
    pub title: String,
    pub description: String,
    pub stars: StarValue,
    pub completed: bool,
    pub created_at_ms: i64,
}

impl Mission {
    pub fn points(&self) -> i64 {
        self.stars.points()
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MissionInputError {
    TitleRequired,
    DescriptionRequired,
    StarsNotInteger,
    StarsOutOfRange,
}

impl MissionInputError {
    /// Form field the error belongs to.
    pub fn field(&self) -> &'static str {
        match self {
            Self::TitleRequired => "title",
            Self::DescriptionRequired => "description",
            Self::StarsNotInteger | Self::StarsOutOfRange => "stars",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::TitleRequired => "Mission title is required",
            Self::DescriptionRequired => "Mission description is required",
            Self::StarsNotInteger => "Stars must be a whole number",
            Self::StarsOutOfRange => "Stars must be between 1 and 5",
        }
    }
}

impl std::fmt::Display for MissionInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl std::error::Error for MissionInputError {}

/// Every field error found in one add-mission submission, in field order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MissionInputErrors(Vec<MissionInputError>);

impl MissionInputErrors {
    pub fn as_slice(&self) -> &[MissionInputError] {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn for_field(&self, field: &str) -> Option<MissionInputError> {
        self.0.iter().copied().find(|err| err.field() == field)
    }

    fn push(&mut self, err: MissionInputError) {
        self.0.push(err);
    }
}

impl std::fmt::Display for MissionInputErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut first = true;
        for err in &self.0 {
            if !first {
                f.write_str("; ")?;
            }
            first = false;
            write!(f, "{err}")?;
        }
        Ok(())
    }
}

impl std::error::Error for MissionInputErrors {}

/// A validated add-mission payload. Title and description are stored trimmed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewMission {
    title: String,
    description: String,
    stars: StarValue,
}

impl NewMission {
    pub fn try_new(title: &str, description: &str, stars: i64) -> Result<Self, MissionInputErrors> {
        Self::validate(title, description, StarValue::try_new(stars))
    }

    /// Form-style entry point: `stars` arrives as text and must parse as an integer.
    pub fn parse_form(
        title: &str,
        description: &str,
        stars: &str,
    ) -> Result<Self, MissionInputErrors> {
        let stars = match stars.trim().parse::<i64>() {
            Ok(value) => StarValue::try_new(value),
            Err(_) => Err(MissionInputError::StarsNotInteger),
        };
        Self::validate(title, description, stars)
    }

    fn validate(
        title: &str,
        description: &str,
        stars: Result<StarValue, MissionInputError>,
    ) -> Result<Self, MissionInputErrors> {
        let mut errors = MissionInputErrors::default();
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            errors.push(MissionInputError::TitleRequired);
        }
        if description.is_empty() {
            errors.push(MissionInputError::DescriptionRequired);
        }
        let stars = match stars {
            Ok(stars) => Some(stars),
            Err(err) => {
                errors.push(err);
                None
            }
        };
        match stars {
            Some(stars) if errors.is_empty() => Ok(Self {
                title: title.to_string(),
                description: description.to_string(),
                stars,
            }),
            _ => Err(errors),
        }
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn stars(&self) -> StarValue {
        self.stars
    }
}

/// Aggregate progress over completed missions.
///
/// `completed` is star points (stars x 10) of completed missions and may exceed
/// `total`; only the rendered percentage is clamped.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stats {
    pub completed: i64,
    pub total: i64,
}

impl Stats {
    pub fn from_completed_points(completed: i64) -> Self {
        Self {
            completed,
            total: STATS_TOTAL,
        }
    }

    /// Value shown when stats could not be fetched.
    pub fn degraded() -> Self {
        Self::default()
    }

    pub fn percentage(&self) -> u8 {
        percentage(self.completed, self.total)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct MilestoneSettings {
    pub goal: i64,
    pub value: i64,
}

impl Default for MilestoneSettings {
    fn default() -> Self {
        Self {
            goal: DEFAULT_MILESTONE_GOAL,
            value: 0,
        }
    }
}

impl MilestoneSettings {
    pub fn percentage(&self) -> u8 {
        percentage(self.value, self.goal)
    }

    pub fn is_achieved(&self) -> bool {
        self.percentage() == 100
    }

    /// Applies a signed delta; the value never drops below zero.
    pub fn with_delta(self, delta: i64) -> Self {
        Self {
            goal: self.goal,
            value: self.value.saturating_add(delta).max(0),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MilestoneInputError {
    GoalNotInteger,
    GoalNotPositive,
    ValueNotInteger,
    ValueNegative,
}

impl MilestoneInputError {
    pub fn field(&self) -> &'static str {
        match self {
            Self::GoalNotInteger | Self::GoalNotPositive => "goal",
            Self::ValueNotInteger | Self::ValueNegative => "value",
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            Self::GoalNotInteger => "Goal must be a whole number",
            Self::GoalNotPositive => "Goal must be a positive number",
            Self::ValueNotInteger => "Value must be a whole number",
            Self::ValueNegative => "Value must be a non-negative number",
        }
    }
}

impl std::fmt::Display for MilestoneInputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field(), self.message())
    }
}

impl std::error::Error for MilestoneInputError {}

/// Validated replacement for the milestone row.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MilestoneUpdate {
    goal: i64,
    value: i64,
}

impl MilestoneUpdate {
    pub fn try_new(goal: i64, value: i64) -> Result<Self, MilestoneInputError> {
        if goal <= 0 {
            return Err(MilestoneInputError::GoalNotPositive);
        }
        if value < 0 {
            return Err(MilestoneInputError::ValueNegative);
        }
        Ok(Self { goal, value })
    }

    pub fn parse_form(goal: &str, value: &str) -> Result<Self, MilestoneInputError> {
        let goal = goal
            .trim()
            .parse::<i64>()
            .map_err(|_| MilestoneInputError::GoalNotInteger)?;
        let value = value
            .trim()
            .parse::<i64>()
            .map_err(|_| MilestoneInputError::ValueNotInteger)?;
        Self::try_new(goal, value)
    }

    pub fn goal(&self) -> i64 {
        self.goal
    }

    pub fn value(&self) -> i64 {
        self.value
    }

    pub fn into_settings(self) -> MilestoneSettings {
        MilestoneSettings {
            goal: self.goal,
            value: self.value,
        }
    }
}
