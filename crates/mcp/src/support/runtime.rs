#![forbid(unsafe_code)]

use mq_core::pin::{PinSecret, PinSecretError};
use mq_core::policy::{MilestonePolicy, ReconcilePolicy};
use std::path::PathBuf;

pub(crate) const DEFAULT_STORAGE_DIR: &str = ".mission_quest";

#[derive(Clone, Debug)]
pub(crate) struct RuntimeConfig {
    pub(crate) storage_dir: PathBuf,
    pub(crate) pin: PinSecret,
    pub(crate) milestone_policy: MilestonePolicy,
    pub(crate) reconcile_policy: ReconcilePolicy,
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum ConfigError {
    MissingValue(&'static str),
    InvalidPin(PinSecretError),
    InvalidMilestonePolicy(String),
    InvalidReconcilePolicy(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingValue(flag) => write!(f, "{flag} requires a value"),
            Self::InvalidPin(err) => write!(f, "invalid --pin: {err}"),
            Self::InvalidMilestonePolicy(value) => write!(
                f,
                "invalid --milestone-policy {value:?} (expected ratchet|symmetric)"
            ),
            Self::InvalidReconcilePolicy(value) => {
                write!(f, "invalid --reconcile {value:?} (expected keep|rollback)")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

impl RuntimeConfig {
    /// CLI flags win over environment variables, which win over defaults.
    pub(crate) fn from_sources(
        args: &[String],
        env: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        let storage_dir = flag_value(args, "--storage-dir")?
            .or_else(|| non_empty(env("MQ_STORAGE_DIR")))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_STORAGE_DIR));

        let pin = match flag_value(args, "--pin")?.or_else(|| non_empty(env("MQ_PARENT_PIN"))) {
            Some(raw) => PinSecret::try_new(raw.trim()).map_err(ConfigError::InvalidPin)?,
            None => PinSecret::default(),
        };

        let milestone_policy = match flag_value(args, "--milestone-policy")?
            .or_else(|| non_empty(env("MQ_MILESTONE_POLICY")))
        {
            Some(raw) => MilestonePolicy::parse(&raw)
                .ok_or(ConfigError::InvalidMilestonePolicy(raw))?,
            None => MilestonePolicy::default(),
        };

        let reconcile_policy =
            match flag_value(args, "--reconcile")?.or_else(|| non_empty(env("MQ_RECONCILE"))) {
                Some(raw) => {
                    ReconcilePolicy::parse(&raw).ok_or(ConfigError::InvalidReconcilePolicy(raw))?
                }
                None => ReconcilePolicy::default(),
            };

        Ok(Self {
            storage_dir,
            pin,
            milestone_policy,
            reconcile_policy,
        })
    }
}

/// Last occurrence of `--flag VALUE` or `--flag=VALUE`.
fn flag_value(args: &[String], flag: &'static str) -> Result<Option<String>, ConfigError> {
    let mut found = None;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        if arg == flag {
            match iter.next() {
                Some(value) => found = Some(value.clone()),
                None => return Err(ConfigError::MissingValue(flag)),
            }
        } else if let Some(value) = arg
            .strip_prefix(flag)
            .and_then(|rest| rest.strip_prefix('='))
        {
            found = Some(value.to_string());
        }
    }
    Ok(found)
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
