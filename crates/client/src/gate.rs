#![forbid(unsafe_code)]

//! Parent mode: a client-side convenience lock, NOT a security boundary. Nothing on the
//! store side checks it; anyone with access to the flag file or the store can bypass it.

use crate::error::GateError;
use crate::flags::FlagStore;
use mq_core::pin::{PinSecret, sanitize_pin_input};

pub const PARENT_MODE_KEY: &str = "kids_mission_parent_mode";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GateState {
    Locked,
    Unlocked,
}

pub struct ParentModeGate {
    state: GateState,
    secret: PinSecret,
    flags: Box<dyn FlagStore>,
    last_error: Option<GateError>,
}

impl ParentModeGate {
    /// Reads the persisted flag; anything but `"true"` (or a read failure) means locked.
    pub fn restore(secret: PinSecret, flags: Box<dyn FlagStore>) -> Self {
        let state = read_flag(&*flags);
        Self {
            state,
            secret,
            flags,
            last_error: None,
        }
    }

    /// Re-reads the persisted flag, as a page reload would.
    pub fn refresh(&mut self) {
        self.state = read_flag(&*self.flags);
        self.last_error = None;
    }

    pub fn state(&self) -> GateState {
        self.state
    }

    pub fn is_unlocked(&self) -> bool {
        self.state == GateState::Unlocked
    }

    pub fn last_error(&self) -> Option<GateError> {
        self.last_error
    }

    pub fn unlock(&mut self, raw_input: &str) -> Result<(), GateError> {
        let candidate = sanitize_pin_input(raw_input);
        if !self.secret.matches(&candidate) {
            self.last_error = Some(GateError::IncorrectPin);
            tracing::debug!("parent mode unlock rejected");
            return Err(GateError::IncorrectPin);
        }
        self.last_error = None;
        self.state = GateState::Unlocked;
        self.persist("true");
        Ok(())
    }

    pub fn exit(&mut self) {
        self.last_error = None;
        self.state = GateState::Locked;
        self.persist("false");
    }

    pub fn into_flags(self) -> Box<dyn FlagStore> {
        self.flags
    }

    fn persist(&mut self, value: &str) {
        if let Err(err) = self.flags.set(PARENT_MODE_KEY, value) {
            tracing::warn!(error = %err, "failed to persist parent mode flag");
        }
    }
}

fn read_flag(flags: &dyn FlagStore) -> GateState {
    match flags.get(PARENT_MODE_KEY) {
        Ok(Some(value)) if value == "true" => GateState::Unlocked,
        Ok(_) => GateState::Locked,
        Err(err) => {
            tracing::warn!(error = %err, "parent mode flag unreadable, starting locked");
            GateState::Locked
        }
    }
}

impl std::fmt::Debug for ParentModeGate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ParentModeGate")
            .field("state", &self.state)
            .field("last_error", &self.last_error)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::MemoryFlagStore;

    fn gate() -> ParentModeGate {
        ParentModeGate::restore(PinSecret::default(), Box::new(MemoryFlagStore::default()))
    }

    #[test]
    fn starts_locked_without_flag() {
        let gate = gate();
        assert_eq!(gate.state(), GateState::Locked);
        assert_eq!(gate.last_error(), None);
    }

    #[test]
    fn correct_pin_unlocks_and_survives_reload() {
        let mut gate = gate();
        gate.unlock("1234").unwrap();
        assert!(gate.is_unlocked());

        let reloaded = ParentModeGate::restore(PinSecret::default(), gate.into_flags());
        assert!(reloaded.is_unlocked());
    }

    #[test]
    fn wrong_inputs_stay_locked_with_error() {
        for input in ["", "12", "4321", "abcd", "9999x", "12-3"] {
            let mut gate = gate();
            let err = gate.unlock(input).unwrap_err();
            assert_eq!(err.to_string(), "Incorrect PIN. Please try again.");
            assert_eq!(gate.state(), GateState::Locked, "input {input:?}");
            assert_eq!(gate.last_error(), Some(GateError::IncorrectPin));
        }
    }

    #[test]
    fn noisy_input_is_filtered_before_compare() {
        let mut gate = gate();
        // "1a2b3c4d" filters down to "1234".
        gate.unlock("1a2b3c4d").unwrap();
        assert!(gate.is_unlocked());
    }

    #[test]
    fn exit_relocks_and_persists() {
        let mut gate = gate();
        gate.unlock("1234").unwrap();
        gate.exit();
        assert!(!gate.is_unlocked());
        let reloaded = ParentModeGate::restore(PinSecret::default(), gate.into_flags());
        assert_eq!(reloaded.state(), GateState::Locked);
    }

    #[test]
    fn success_clears_previous_error() {
        let mut gate = gate();
        let _ = gate.unlock("0000");
        gate.unlock("1234").unwrap();
        assert_eq!(gate.last_error(), None);
    }
}
