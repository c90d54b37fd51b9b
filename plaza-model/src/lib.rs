//! Core data model definitions shared across Plaza crates.
#![allow(missing_docs)]

pub use ::chrono;

pub mod api;
pub mod ids;
pub mod profile;
pub mod status;
pub mod visibility;

// Intentionally curated re-exports for downstream consumers.
pub use api::{
    ApiResponse, SetItemVisibilityRequest, SetStatusRequest,
    SetVisibilityRequest, UpdateBasicProfileRequest,
    UpdateEnhancedProfileRequest, UsernameAvailability,
};
pub use ids::{ItemId, UserId};
pub use profile::{
    BasicProfile, EducationEntry, EnhancedProfile, InterestEntry,
    LanguageEntry, Profile, ProfileCounts, ProfileLink, ProfileSection,
    WorkEntry,
};
pub use status::StatusMessage;
pub use visibility::{FieldVisibility, ProfileField, Visibility};
