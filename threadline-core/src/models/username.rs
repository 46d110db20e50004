//! Username validation
//!
//! Handle format: lowercase alphanumeric with dots/underscores

use once_cell::sync::Lazy;
use regex::Regex;

use super::ValidationError;

/// Maximum length for usernames
const MAX_USERNAME_LEN: usize = 32;

/// Handle pattern: starts with alphanumeric, allows dots and underscores
static USERNAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-z0-9][a-z0-9._]{0,31}$").expect("invalid username regex")
});

/// Validated username shared by users and communities
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Username(String);

impl Username {
    /// Create a new username, validating handle format.
    ///
    /// Input is lowercased before matching, so `Ada` and `ada` are the same handle.
    ///
    /// # Example
    /// ```
    /// use threadline_core::models::Username;
    ///
    /// assert!(Username::new("ada.lovelace").is_ok());
    /// assert!(Username::new("_hidden").is_err());
    /// ```
    pub fn new(s: &str) -> Result<Self, ValidationError> {
        let lowered = s.trim().to_lowercase();

        if lowered.is_empty() {
            return Err(ValidationError::Empty { field: "username" });
        }

        if lowered.len() > MAX_USERNAME_LEN {
            return Err(ValidationError::TooLong {
                field: "username",
                max: MAX_USERNAME_LEN,
            });
        }

        if !USERNAME_RE.is_match(&lowered) {
            return Err(ValidationError::InvalidFormat {
                field: "username",
                reason: "must be alphanumeric with dots/underscores, starting with alphanumeric",
            });
        }

        Ok(Self(lowered))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("ada").is_ok());
        assert!(Username::new("ada_l").is_ok());
        assert!(Username::new("ada.l").is_ok());
        assert!(Username::new("1ada").is_ok());
    }

    #[test]
    fn lowercases() {
        assert_eq!(Username::new("AdaL").unwrap().as_str(), "adal");
    }

    #[test]
    fn rejects_spaces() {
        let err = Username::new("ada l").unwrap_err();
        assert!(matches!(err, ValidationError::InvalidFormat { .. }));
    }

    #[test]
    fn rejects_empty() {
        let err = Username::new("  ").unwrap_err();
        assert!(matches!(err, ValidationError::Empty { .. }));
    }

    #[test]
    fn max_length() {
        assert!(Username::new(&"a".repeat(32)).is_ok());
        let err = Username::new(&"a".repeat(33)).unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 32, .. }));
    }
}
