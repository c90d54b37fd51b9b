//! Plaza core
//!
//! Domain rules shared by every Plaza profile client: the username value
//! object and format rules, profile field constraints, the versioned REST
//! route table, and the error type surfaced by profile operations.

pub mod api;
pub mod error;
pub mod user_management;
pub mod validation;

pub use error::{ProfileError, Result};
pub use user_management::username::{Username, UsernameError};
pub use validation::{
    CandidateRule, FormatViolation, RegexRule, UsernameRule,
    DEFAULT_USERNAME_MESSAGE, DEFAULT_USERNAME_PATTERN, REQUIRED_MESSAGE,
};

pub use plaza_model as model;
