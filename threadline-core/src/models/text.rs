//! Thread text and display name validation

use super::ValidationError;

/// Maximum length for thread text, in characters
pub const MAX_TEXT_LEN: usize = 10_000;

/// Maximum length for user and community display names
const MAX_NAME_LEN: usize = 100;

/// Validated thread body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThreadText(String);

impl ThreadText {
    /// Create new thread text.
    ///
    /// # Rules
    /// - Non-empty (after trimming whitespace)
    /// - Max 10 000 characters
    ///
    /// # Example
    /// ```
    /// use threadline_core::ThreadText;
    ///
    /// assert!(ThreadText::new("hello").is_ok());
    /// assert!(ThreadText::new("   ").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "text" });
        }

        if trimmed.chars().count() > MAX_TEXT_LEN {
            return Err(ValidationError::TooLong {
                field: "text",
                max: MAX_TEXT_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for ThreadText {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validated display name for users and communities
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayName(String);

impl DisplayName {
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let trimmed = s.trim();

        if trimmed.is_empty() {
            return Err(ValidationError::Empty { field: "name" });
        }

        if trimmed.chars().count() > MAX_NAME_LEN {
            return Err(ValidationError::TooLong {
                field: "name",
                max: MAX_NAME_LEN,
            });
        }

        Ok(Self(trimmed.to_owned()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}
