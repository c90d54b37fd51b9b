use chrono::NaiveDate;

use crate::ids::{ItemId, UserId};
use crate::status::StatusMessage;
use crate::visibility::{FieldVisibility, Visibility};

/// Editable identity and contact fields of a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct BasicProfile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub website: Option<String>,
    pub location: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub gender: Option<String>,
    pub pronouns: Option<String>,
    pub avatar_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WorkEntry {
    pub id: ItemId,
    pub company: String,
    pub title: String,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub current: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EducationEntry {
    pub id: ItemId,
    pub school: String,
    pub degree: Option<String>,
    pub field: Option<String>,
    pub start_year: Option<i32>,
    pub end_year: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProfileLink {
    pub id: ItemId,
    pub label: String,
    pub url: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LanguageEntry {
    pub id: ItemId,
    pub name: String,
    pub proficiency: Option<String>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct InterestEntry {
    pub id: ItemId,
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: Visibility,
}

/// Array-valued sections of the "about" tab.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EnhancedProfile {
    pub work: Vec<WorkEntry>,
    pub education: Vec<EducationEntry>,
    pub links: Vec<ProfileLink>,
    pub languages: Vec<LanguageEntry>,
    pub interests: Vec<InterestEntry>,
}

/// Names the enhanced-profile array an item lives in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ProfileSection {
    Work,
    Education,
    Links,
    Languages,
    Interests,
}

impl ProfileSection {
    pub const ALL: [Self; 5] = [
        Self::Work,
        Self::Education,
        Self::Links,
        Self::Languages,
        Self::Interests,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Work => "work",
            Self::Education => "education",
            Self::Links => "links",
            Self::Languages => "languages",
            Self::Interests => "interests",
        }
    }
}

impl std::fmt::Display for ProfileSection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl EnhancedProfile {
    pub fn len(&self, section: ProfileSection) -> usize {
        match section {
            ProfileSection::Work => self.work.len(),
            ProfileSection::Education => self.education.len(),
            ProfileSection::Links => self.links.len(),
            ProfileSection::Languages => self.languages.len(),
            ProfileSection::Interests => self.interests.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        ProfileSection::ALL
            .into_iter()
            .all(|section| self.len(section) == 0)
    }

    /// Current visibility of an item, if the item exists in `section`.
    pub fn item_visibility(
        &self,
        section: ProfileSection,
        id: ItemId,
    ) -> Option<Visibility> {
        match section {
            ProfileSection::Work => {
                self.work.iter().find(|e| e.id == id).map(|e| e.visibility)
            }
            ProfileSection::Education => self
                .education
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.visibility),
            ProfileSection::Links => {
                self.links.iter().find(|e| e.id == id).map(|e| e.visibility)
            }
            ProfileSection::Languages => self
                .languages
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.visibility),
            ProfileSection::Interests => self
                .interests
                .iter()
                .find(|e| e.id == id)
                .map(|e| e.visibility),
        }
    }

    /// Overwrite an item's visibility. Returns the previous value, or `None`
    /// when the item does not exist.
    pub fn set_item_visibility(
        &mut self,
        section: ProfileSection,
        id: ItemId,
        visibility: Visibility,
    ) -> Option<Visibility> {
        fn swap(slot: &mut Visibility, next: Visibility) -> Visibility {
            std::mem::replace(slot, next)
        }

        match section {
            ProfileSection::Work => self
                .work
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| swap(&mut e.visibility, visibility)),
            ProfileSection::Education => self
                .education
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| swap(&mut e.visibility, visibility)),
            ProfileSection::Links => self
                .links
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| swap(&mut e.visibility, visibility)),
            ProfileSection::Languages => self
                .languages
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| swap(&mut e.visibility, visibility)),
            ProfileSection::Interests => self
                .interests
                .iter_mut()
                .find(|e| e.id == id)
                .map(|e| swap(&mut e.visibility, visibility)),
        }
    }
}

/// Header counters shown on the profile page.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProfileCounts {
    pub posts: u64,
    pub reels: u64,
    pub followers: u64,
    pub following: u64,
}

/// Full profile as returned by the profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Profile {
    pub id: UserId,
    pub basic: BasicProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub enhanced: EnhancedProfile,
    #[cfg_attr(feature = "serde", serde(default))]
    pub visibility: FieldVisibility,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: Option<StatusMessage>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub counts: ProfileCounts,
}
