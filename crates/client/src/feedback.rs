#![forbid(unsafe_code)]

use serde::Serialize;
use std::time::{Duration, Instant};

pub const ADD_SUCCESS_TTL: Duration = Duration::from_millis(1000);
pub const MILESTONE_SUCCESS_TTL: Duration = Duration::from_millis(3000);

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FeedbackKind {
    Success,
    Error,
}

/// Transient banner text. Without a TTL it stays until replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Feedback {
    kind: FeedbackKind,
    text: String,
    shown_at: Instant,
    ttl: Option<Duration>,
}

impl Feedback {
    pub fn success(text: impl Into<String>, ttl: Duration, now: Instant) -> Self {
        Self {
            kind: FeedbackKind::Success,
            text: text.into(),
            shown_at: now,
            ttl: Some(ttl),
        }
    }

    pub fn error(text: impl Into<String>, now: Instant) -> Self {
        Self {
            kind: FeedbackKind::Error,
            text: text.into(),
            shown_at: now,
            ttl: None,
        }
    }

    pub fn kind(&self) -> FeedbackKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_visible_at(&self, now: Instant) -> bool {
        match self.ttl {
            Some(ttl) => now.saturating_duration_since(self.shown_at) < ttl,
            None => true,
        }
    }
}
