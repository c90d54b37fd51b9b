//! Basic-profile form state.
//!
//! A [`ProfileForm`] is an immutable snapshot: the persisted profile it was
//! opened from plus the current draft. [`ProfileForm::apply`] is the single
//! update entry point and returns a new snapshot, so validity and the change
//! set are always derived from one consistent value.

use plaza_core::ProfileError;
use plaza_core::user_management::profile_rules;
use plaza_model::chrono::NaiveDate;
use plaza_model::{BasicProfile, ProfileField, UpdateBasicProfileRequest};
use std::collections::BTreeMap;

use super::username_check::UsernameCheck;

/// One user edit. Text values are stored as typed and trimmed when read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormEdit {
    Username(String),
    DisplayName(String),
    Bio(String),
    Website(String),
    Location(String),
    Birthday(Option<NaiveDate>),
    Email(String),
    Phone(String),
    Gender(String),
    Pronouns(String),
}

impl FormEdit {
    pub fn field(&self) -> ProfileField {
        match self {
            Self::Username(_) => ProfileField::Username,
            Self::DisplayName(_) => ProfileField::DisplayName,
            Self::Bio(_) => ProfileField::Bio,
            Self::Website(_) => ProfileField::Website,
            Self::Location(_) => ProfileField::Location,
            Self::Birthday(_) => ProfileField::Birthday,
            Self::Email(_) => ProfileField::Email,
            Self::Phone(_) => ProfileField::Phone,
            Self::Gender(_) => ProfileField::Gender,
            Self::Pronouns(_) => ProfileField::Pronouns,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileForm {
    baseline: BasicProfile,
    draft: BasicProfile,
}

pub type FormErrors = BTreeMap<ProfileField, ProfileError>;

impl ProfileForm {
    pub fn new(baseline: BasicProfile) -> Self {
        Self {
            draft: baseline.clone(),
            baseline,
        }
    }

    pub fn baseline(&self) -> &BasicProfile {
        &self.baseline
    }

    pub fn draft(&self) -> &BasicProfile {
        &self.draft
    }

    pub fn apply(&self, edit: FormEdit) -> Self {
        let mut draft = self.draft.clone();
        match edit {
            FormEdit::Username(v) => draft.username = v,
            FormEdit::DisplayName(v) => draft.display_name = v,
            FormEdit::Bio(v) => draft.bio = v,
            FormEdit::Website(v) => draft.website = optional(v),
            FormEdit::Location(v) => draft.location = optional(v),
            FormEdit::Birthday(v) => draft.birthday = v,
            FormEdit::Email(v) => draft.email = optional(v),
            FormEdit::Phone(v) => draft.phone = optional(v),
            FormEdit::Gender(v) => draft.gender = optional(v),
            FormEdit::Pronouns(v) => draft.pronouns = optional(v),
        }
        Self {
            baseline: self.baseline.clone(),
            draft,
        }
    }

    /// Field errors for the draft. The username is judged separately by the
    /// availability checker and never appears here.
    pub fn errors(&self, today: NaiveDate) -> FormErrors {
        let draft = &self.draft;
        let mut errors = FormErrors::new();
        let mut record = |field, result: plaza_core::Result<()>| {
            if let Err(err) = result {
                errors.insert(field, err);
            }
        };

        record(
            ProfileField::DisplayName,
            profile_rules::display_name(draft.display_name.trim()),
        );
        record(ProfileField::Bio, profile_rules::bio(draft.bio.trim()));
        record(
            ProfileField::Website,
            profile_rules::website(trimmed(&draft.website)),
        );
        record(
            ProfileField::Email,
            profile_rules::email(trimmed(&draft.email)),
        );
        if let Some(birthday) = draft.birthday {
            record(
                ProfileField::Birthday,
                profile_rules::birthday(birthday, today),
            );
        }
        errors
    }

    pub fn is_valid(&self, today: NaiveDate) -> bool {
        self.errors(today).is_empty()
    }

    /// Partial update holding only fields whose trimmed value differs from
    /// the baseline. Cleared optional fields are sent as empty strings.
    pub fn changes(&self) -> UpdateBasicProfileRequest {
        let (base, draft) = (&self.baseline, &self.draft);
        UpdateBasicProfileRequest {
            username: changed_text(&base.username, &draft.username),
            display_name: changed_text(&base.display_name, &draft.display_name),
            bio: changed_text(&base.bio, &draft.bio),
            website: changed_optional(&base.website, &draft.website),
            location: changed_optional(&base.location, &draft.location),
            birthday: draft.birthday.filter(|d| base.birthday != Some(*d)),
            email: changed_optional(&base.email, &draft.email),
            phone: changed_optional(&base.phone, &draft.phone),
            gender: changed_optional(&base.gender, &draft.gender),
            pronouns: changed_optional(&base.pronouns, &draft.pronouns),
        }
    }

    pub fn is_dirty(&self) -> bool {
        !self.changes().is_empty()
    }

    /// Why the form cannot be submitted right now, if anything blocks it.
    pub fn submit_blocker(
        &self,
        username: &UsernameCheck,
        today: NaiveDate,
    ) -> Option<String> {
        if let Some(err) = self.errors(today).into_values().next() {
            return Some(err.to_string());
        }
        if !username.allows_submit() {
            return Some(match &username.message {
                Some(message) => format!("username is {} ({message})", username.status),
                None => format!("username is {}", username.status),
            });
        }
        if !self.is_dirty() {
            return Some(ProfileError::NoChanges.to_string());
        }
        None
    }

    pub fn can_submit(&self, username: &UsernameCheck, today: NaiveDate) -> bool {
        self.submit_blocker(username, today).is_none()
    }

    /// Start over from a freshly saved profile.
    pub fn rebase(&self, saved: BasicProfile) -> Self {
        Self::new(saved)
    }
}

fn optional(value: String) -> Option<String> {
    (!value.trim().is_empty()).then_some(value)
}

fn trimmed(value: &Option<String>) -> &str {
    value.as_deref().map(str::trim).unwrap_or_default()
}

fn changed_text(base: &str, draft: &str) -> Option<String> {
    let draft = draft.trim();
    (draft != base.trim()).then(|| draft.to_string())
}

fn changed_optional(
    base: &Option<String>,
    draft: &Option<String>,
) -> Option<String> {
    let draft = trimmed(draft);
    (draft != trimmed(base)).then(|| draft.to_string())
}
