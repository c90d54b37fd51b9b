use plaza_model::{ItemId, ProfileField, ProfileSection};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProfileError {
    #[error("Invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    #[error("{0} is always public and cannot be hidden")]
    FieldNotHideable(ProfileField),

    #[error("No {section} item with id {id}")]
    ItemNotFound { section: ProfileSection, id: ItemId },

    #[error("The {section} section is limited to {limit} items")]
    SectionFull {
        section: ProfileSection,
        limit: usize,
    },

    #[error("Cannot save yet: {0}")]
    SubmitBlocked(String),

    #[error("Nothing to save")]
    NoChanges,

    #[error("Server rejected the request: {0}")]
    Remote(String),

    #[error("Operation cancelled: {0}")]
    Cancelled(String),
}

impl ProfileError {
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, ProfileError>;
