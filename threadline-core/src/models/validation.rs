//! Validation error types

use thiserror::Error;

/// Validation error for domain models
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Field is empty when it shouldn't be
    #[error("{field} cannot be empty")]
    Empty { field: &'static str },

    /// Field exceeds maximum length
    #[error("{field} exceeds maximum length of {max} characters")]
    TooLong { field: &'static str, max: usize },

    /// String doesn't match required format (e.g., username)
    #[error("{field}: {reason}")]
    InvalidFormat { field: &'static str, reason: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = ValidationError::TooLong {
            field: "text",
            max: 10000,
        };
        assert_eq!(
            err.to_string(),
            "text exceeds maximum length of 10000 characters"
        );
    }

    #[test]
    fn format_error_names_field_and_reason() {
        let err = ValidationError::InvalidFormat {
            field: "username",
            reason: "must start with a letter or digit",
        };
        assert_eq!(err.to_string(), "username: must start with a letter or digit");
        assert_eq!(
            ValidationError::Empty { field: "text" }.to_string(),
            "text cannot be empty"
        );
    }
}
