use chrono::NaiveDate;

use crate::ids::ItemId;
use crate::profile::{
    EducationEntry, EnhancedProfile, InterestEntry, LanguageEntry,
    ProfileLink, ProfileSection, WorkEntry,
};
use crate::visibility::{ProfileField, Visibility};

/// Envelope wrapped around every JSON payload the API returns.
#[derive(Debug, Clone)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ApiResponse<T> {
    pub status: String,
    /// A missing field already decodes to `None`; `default` here would
    /// demand `T: Default`.
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub data: Option<T>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub error: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: "success".to_string(),
            data: Some(data),
            error: None,
            message: None,
        }
    }

    pub fn error(error: String) -> Self {
        Self {
            status: "error".to_string(),
            data: None,
            error: Some(error),
            message: None,
        }
    }

    pub fn with_message(mut self, message: String) -> Self {
        self.message = Some(message);
        self
    }

    pub fn is_success(&self) -> bool {
        self.status == "success"
    }

    /// Most specific human readable explanation the server gave, if any.
    pub fn explanation(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

/// Body of `GET /profile/username-availability`.
///
/// This endpoint answers with a bare object rather than the usual envelope:
/// `{ "success": true, "available": false, "message": "Taken" }`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UsernameAvailability {
    #[cfg_attr(feature = "serde", serde(default))]
    pub success: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub available: bool,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub message: Option<String>,
}

impl UsernameAvailability {
    pub fn available() -> Self {
        Self {
            success: true,
            available: true,
            message: None,
        }
    }

    pub fn taken(message: impl Into<String>) -> Self {
        Self {
            success: true,
            available: false,
            message: Some(message.into()),
        }
    }

    pub fn failure(message: Option<String>) -> Self {
        Self {
            success: false,
            available: false,
            message,
        }
    }
}

/// Partial update of the basic profile. Only `Some` fields are sent; an
/// empty string clears an optional field server-side.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateBasicProfileRequest {
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub username: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub display_name: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub bio: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub website: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub birthday: Option<NaiveDate>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub email: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub phone: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub gender: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub pronouns: Option<String>,
}

impl UpdateBasicProfileRequest {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Full replacement of the enhanced-profile arrays.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UpdateEnhancedProfileRequest {
    pub work: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub links: Vec<ProfileLink>,
    pub languages: Vec<LanguageEntry>,
    pub interests: Vec<InterestEntry>,
}

impl From<EnhancedProfile> for UpdateEnhancedProfileRequest {
    fn from(profile: EnhancedProfile) -> Self {
        Self {
            work: profile.work,
            education: profile.education,
            links: profile.links,
            languages: profile.languages,
            interests: profile.interests,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetVisibilityRequest {
    pub field: ProfileField,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetItemVisibilityRequest {
    pub section: ProfileSection,
    pub item_id: ItemId,
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SetStatusRequest {
    pub text: String,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub emoji: Option<String>,
    /// Seconds until the status clears itself; `None` keeps it indefinitely.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub expires_in_seconds: Option<u64>,
}

#[cfg(all(test, feature = "serde"))]
mod tests {
    use super::*;

    #[test]
    fn availability_parses_minimal_success_body() {
        let parsed: UsernameAvailability =
            serde_json::from_str(r#"{"success":true,"available":true}"#)
                .unwrap();
        assert_eq!(parsed, UsernameAvailability::available());
    }

    #[test]
    fn availability_defaults_missing_success_to_false() {
        let parsed: UsernameAvailability =
            serde_json::from_str(r#"{"message":"rate limited"}"#).unwrap();
        assert!(!parsed.success);
        assert_eq!(parsed.message.as_deref(), Some("rate limited"));
    }

    #[test]
    fn partial_update_only_serializes_changed_fields() {
        let request = UpdateBasicProfileRequest {
            bio: Some("hello".into()),
            ..Default::default()
        };
        assert_eq!(
            serde_json::to_string(&request).unwrap(),
            r#"{"bio":"hello"}"#
        );
        assert!(UpdateBasicProfileRequest::default().is_empty());
    }

    #[test]
    fn envelope_prefers_error_over_message() {
        let response = ApiResponse::<()>::error("boom".into())
            .with_message("details".into());
        assert!(!response.is_success());
        assert_eq!(response.explanation(), Some("boom"));
    }

    #[test]
    fn envelope_decodes_payloads_without_default() {
        let body = r#"{
            "status": "success",
            "data": {
                "id": "6f1c1a5e-8a3b-4a51-9d2e-0f3b7c1d2e4f",
                "basic": { "username": "alice", "display_name": "Alice" }
            }
        }"#;
        let parsed: ApiResponse<crate::Profile> =
            serde_json::from_str(body).unwrap();
        assert!(parsed.is_success());
        assert_eq!(parsed.data.unwrap().basic.username, "alice");

        let bare: ApiResponse<crate::Profile> =
            serde_json::from_str(r#"{"status":"error","error":"gone"}"#)
                .unwrap();
        assert!(bare.data.is_none());
        assert_eq!(bare.explanation(), Some("gone"));
    }
}
