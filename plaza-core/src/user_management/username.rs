use serde::{Deserialize, Serialize};
use std::fmt;

pub const MIN_LEN: usize = 3;
pub const MAX_LEN: usize = 30;

/// Username value object with validation
///
/// Represents a validated username that follows the business rules:
/// - 3-30 characters in length after trimming
/// - ASCII letters, digits, dots and underscores only
/// - Cannot start or end with a dot, or contain consecutive dots
///
/// The original casing is kept for display; comparisons go through
/// [`Username::normalized`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Username(String);

impl Username {
    /// Create a new username with validation
    pub fn new(username: impl AsRef<str>) -> Result<Self, UsernameError> {
        let username = username.as_ref().trim();

        if username.is_empty() {
            return Err(UsernameError::Required);
        }

        let len = username.chars().count();
        if len < MIN_LEN {
            return Err(UsernameError::TooShort);
        }

        if len > MAX_LEN {
            return Err(UsernameError::TooLong);
        }

        if !username
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
        {
            return Err(UsernameError::InvalidCharacters);
        }

        if username.starts_with('.') || username.ends_with('.') {
            return Err(UsernameError::InvalidFormat);
        }

        if username.contains("..") {
            return Err(UsernameError::InvalidFormat);
        }

        Ok(Self(username.to_string()))
    }

    /// Get the username as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Lowercased form used for equality against other usernames
    pub fn normalized(&self) -> String {
        self.0.to_ascii_lowercase()
    }

    /// Case-insensitive comparison with another username
    pub fn same_as(&self, other: &Username) -> bool {
        self.0.eq_ignore_ascii_case(&other.0)
    }

    /// Get the username as a String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Username {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for Username {
    type Error = UsernameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Username> for String {
    fn from(value: Username) -> Self {
        value.0
    }
}

/// Errors that can occur when creating a username
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum UsernameError {
    #[error("Username is required")]
    Required,

    #[error("Username too short: minimum 3 characters required")]
    TooShort,

    #[error("Username too long: maximum 30 characters allowed")]
    TooLong,

    #[error(
        "Username contains invalid characters: only letters, numbers, dot and underscore allowed"
    )]
    InvalidCharacters,

    #[error(
        "Username format invalid: cannot start/end with a dot or contain consecutive dots"
    )]
    InvalidFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_usernames() {
        assert!(Username::new("alice").is_ok());
        assert!(Username::new("alice_123").is_ok());
        assert!(Username::new("first.last").is_ok());
        assert!(Username::new("_underscored_").is_ok());
        assert!(Username::new("a".repeat(30)).is_ok());
    }

    #[test]
    fn invalid_usernames() {
        assert_eq!(Username::new("   "), Err(UsernameError::Required));
        assert_eq!(Username::new("ab"), Err(UsernameError::TooShort));
        assert_eq!(Username::new("a".repeat(31)), Err(UsernameError::TooLong));
        assert_eq!(
            Username::new("alice@bob"),
            Err(UsernameError::InvalidCharacters)
        );
        assert_eq!(
            Username::new("jos\u{e9}"),
            Err(UsernameError::InvalidCharacters)
        );
        assert_eq!(Username::new(".alice"), Err(UsernameError::InvalidFormat));
        assert_eq!(Username::new("alice."), Err(UsernameError::InvalidFormat));
        assert_eq!(
            Username::new("alice..bob"),
            Err(UsernameError::InvalidFormat)
        );
    }

    #[test]
    fn trims_but_keeps_casing() {
        let username = Username::new("  Alice  ").unwrap();
        assert_eq!(username.as_str(), "Alice");
        assert_eq!(username.normalized(), "alice");
        assert!(username.same_as(&Username::new("ALICE").unwrap()));
    }

    #[test]
    fn deserialization_validates() {
        let ok: Username = serde_json::from_str(r#""bob.smith""#).unwrap();
        assert_eq!(ok.as_str(), "bob.smith");
        assert!(serde_json::from_str::<Username>(r#""no""#).is_err());
    }
}
