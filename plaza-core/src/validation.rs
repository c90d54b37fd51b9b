//! Local, synchronous format rules applied before any availability lookup.

use once_cell::sync::Lazy;
use regex::Regex;
use thiserror::Error;

use crate::user_management::username::Username;

pub const DEFAULT_USERNAME_PATTERN: &str = r"^[A-Za-z0-9._]{3,30}$";
pub const DEFAULT_USERNAME_MESSAGE: &str =
    "Use 3–30 chars: letters, numbers, dot or underscore";
pub const REQUIRED_MESSAGE: &str = "Username is required";

static DEFAULT_USERNAME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(DEFAULT_USERNAME_PATTERN)
        .expect("default username regex should compile")
});

/// A format rule violation, carrying the message shown next to the input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct FormatViolation(pub String);

impl FormatViolation {
    pub fn message(&self) -> &str {
        &self.0
    }
}

/// Local format rule for a candidate value.
///
/// Implementations receive the trimmed, non-empty candidate.
pub trait CandidateRule: Send + Sync + std::fmt::Debug {
    fn check(&self, trimmed: &str) -> Result<(), FormatViolation>;
}

/// Regular-expression rule with a single user-facing message.
#[derive(Debug, Clone)]
pub struct RegexRule {
    regex: Regex,
    message: String,
}

impl RegexRule {
    pub fn new(
        pattern: &str,
        message: impl Into<String>,
    ) -> Result<Self, regex::Error> {
        Ok(Self {
            regex: Regex::new(pattern)?,
            message: message.into(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.regex.as_str()
    }
}

impl CandidateRule for RegexRule {
    fn check(&self, trimmed: &str) -> Result<(), FormatViolation> {
        if self.regex.is_match(trimmed) {
            Ok(())
        } else {
            Err(FormatViolation(self.message.clone()))
        }
    }
}

/// Configured pattern first, then the structural [`Username`] rules.
#[derive(Debug, Clone)]
pub struct UsernameRule {
    pattern: RegexRule,
}

impl UsernameRule {
    pub fn new(pattern: RegexRule) -> Self {
        Self { pattern }
    }
}

impl Default for UsernameRule {
    fn default() -> Self {
        Self {
            pattern: RegexRule {
                regex: DEFAULT_USERNAME_REGEX.clone(),
                message: DEFAULT_USERNAME_MESSAGE.to_string(),
            },
        }
    }
}

impl CandidateRule for UsernameRule {
    fn check(&self, trimmed: &str) -> Result<(), FormatViolation> {
        self.pattern.check(trimmed)?;
        Username::new(trimmed)
            .map(|_| ())
            .map_err(|err| FormatViolation(err.to_string()))
    }
}
