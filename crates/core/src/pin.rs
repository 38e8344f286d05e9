#![forbid(unsafe_code)]

pub const PIN_LEN: usize = 4;

/// Mirrors the PIN field: non-digits are dropped and input stops at four digits.
pub fn sanitize_pin_input(raw: &str) -> String {
    raw.chars()
        .filter(|ch| ch.is_ascii_digit())
        .take(PIN_LEN)
        .collect()
}

/// The parent-mode secret. Exactly four ASCII digits.
#[derive(Clone, PartialEq, Eq)]
pub struct PinSecret(String);

impl PinSecret {
    pub fn try_new(value: impl Into<String>) -> Result<Self, PinSecretError> {
        let value = value.into();
        if value.len() != PIN_LEN {
            return Err(PinSecretError::WrongLength);
        }
        if !value.chars().all(|ch| ch.is_ascii_digit()) {
            return Err(PinSecretError::NonDigit);
        }
        Ok(Self(value))
    }

    /// Exact comparison against already-sanitized input.
    pub fn matches(&self, candidate: &str) -> bool {
        self.0 == candidate
    }
}

impl Default for PinSecret {
    fn default() -> Self {
        Self("1234".to_string())
    }
}

// Keep the secret out of logs and debug dumps.
impl std::fmt::Debug for PinSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PinSecret(****)")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum PinSecretError {
    WrongLength,
    NonDigit,
}

impl PinSecretError {
    pub fn message(&self) -> &'static str {
        match self {
            Self::WrongLength => "parent PIN must be exactly 4 digits",
            Self::NonDigit => "parent PIN must contain only digits",
        }
    }
}

impl std::fmt::Display for PinSecretError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

impl std::error::Error for PinSecretError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_filters_and_truncates() {
        assert_eq!(sanitize_pin_input("12a3-4"), "1234");
        assert_eq!(sanitize_pin_input("123456"), "1234");
        assert_eq!(sanitize_pin_input("abc"), "");
        assert_eq!(sanitize_pin_input("٣٤"), "");
    }

    #[test]
    fn secret_validation() {
        assert_eq!(PinSecret::try_new("123").unwrap_err(), PinSecretError::WrongLength);
        assert_eq!(PinSecret::try_new("12a4").unwrap_err(), PinSecretError::NonDigit);
        assert!(PinSecret::try_new("0420").unwrap().matches("0420"));
        assert!(!PinSecret::default().matches("123"));
        assert_eq!(format!("{:?}", PinSecret::default()), "PinSecret(****)");
    }
}
