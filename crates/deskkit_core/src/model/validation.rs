//! Input validation shared by repositories, the timer and import.

use std::error::Error;
use std::fmt::{Display, Formatter};

/// Rejection reason for a mutation or an imported document.
///
/// Every variant renders a human-readable message suitable for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trimming.
    EmptyField(&'static str),
    /// A pomodoro duration is zero.
    NonPositiveDuration(&'static str),
    /// An imported document lacks one of the required top-level keys.
    MissingKey(&'static str),
    /// An imported document has the right keys but the wrong shape.
    Malformed(String),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyField(field) => write!(f, "{field} cannot be empty"),
            Self::NonPositiveDuration(field) => write!(f, "{field} must be greater than zero"),
            Self::MissingKey(key) => write!(f, "required key `{key}` is missing"),
            Self::Malformed(message) => write!(f, "malformed document: {message}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn normalize_required(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(trimmed.to_string())
}

/// Rejects zero-minute durations.
pub fn require_positive(field: &'static str, minutes: u32) -> Result<u32, ValidationError> {
    if minutes == 0 {
        return Err(ValidationError::NonPositiveDuration(field));
    }
    Ok(minutes)
}

#[cfg(test)]
mod tests {
    use super::{normalize_required, require_positive, ValidationError};

    #[test]
    fn normalize_required_trims_and_rejects_blank() {
        assert_eq!(normalize_required("title", "  plan  ").unwrap(), "plan");
        assert_eq!(
            normalize_required("title", " \t\n").unwrap_err(),
            ValidationError::EmptyField("title")
        );
    }

    #[test]
    fn require_positive_rejects_zero() {
        assert_eq!(require_positive("workTime", 25).unwrap(), 25);
        let err = require_positive("workTime", 0).unwrap_err();
        assert_eq!(err.to_string(), "workTime must be greater than zero");
    }
}
