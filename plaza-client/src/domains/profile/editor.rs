use chrono::{NaiveDate, Utc};
use plaza_core::{CandidateRule, ProfileError, Result};
use plaza_model::Profile;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, info};

use super::form::{FormEdit, ProfileForm};
use super::username_check::{CheckerSettings, UsernameCheck, UsernameChecker};
use crate::infra::services::{AvailabilityClient, ProfileService};

/// Edit session for the signed-in user's basic profile.
pub struct ProfileEditor {
    service: Arc<dyn ProfileService>,
    availability: Arc<dyn AvailabilityClient>,
    rule: Arc<dyn CandidateRule>,
    settings: CheckerSettings,
    profile: Profile,
    form: ProfileForm,
    username: UsernameChecker,
}

impl std::fmt::Debug for ProfileEditor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProfileEditor")
            .field("profile", &self.profile.id)
            .field("form", &self.form)
            .field("username", &self.username)
            .finish()
    }
}

impl ProfileEditor {
    pub fn new(
        profile: Profile,
        service: Arc<dyn ProfileService>,
        availability: Arc<dyn AvailabilityClient>,
        rule: Arc<dyn CandidateRule>,
        settings: CheckerSettings,
    ) -> Self {
        let username = UsernameChecker::new(
            profile.basic.username.clone(),
            Arc::clone(&rule),
            Arc::clone(&availability),
            settings.clone(),
        );
        Self {
            form: ProfileForm::new(profile.basic.clone()),
            service,
            availability,
            rule,
            settings,
            profile,
            username,
        }
    }

    /// Fetch the signed-in profile and open an editor on it.
    pub async fn load(
        service: Arc<dyn ProfileService>,
        availability: Arc<dyn AvailabilityClient>,
        rule: Arc<dyn CandidateRule>,
        settings: CheckerSettings,
    ) -> Result<Self> {
        let profile = service.fetch_me().await?;
        debug!(user = %profile.id, "loaded profile for editing");
        Ok(Self::new(profile, service, availability, rule, settings))
    }

    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    pub fn form(&self) -> &ProfileForm {
        &self.form
    }

    pub fn username_status(&self) -> UsernameCheck {
        self.username.current()
    }

    pub fn subscribe_username(&self) -> watch::Receiver<UsernameCheck> {
        self.username.subscribe()
    }

    pub fn edit(&mut self, edit: FormEdit) {
        if let FormEdit::Username(candidate) = &edit {
            self.username.on_edit(candidate);
        }
        self.form = self.form.apply(edit);
    }

    pub fn submit_blocker(&self, today: NaiveDate) -> Option<String> {
        self.form.submit_blocker(&self.username.current(), today)
    }

    pub fn can_submit(&self, today: NaiveDate) -> bool {
        self.submit_blocker(today).is_none()
    }

    /// Save the changed basic fields.
    ///
    /// Refused unless the form is valid, dirty, and the username check is
    /// `Unchanged` or `Available`. On success the form is rebased on the
    /// saved profile; a new username becomes the checker's baseline.
    pub async fn submit(&mut self) -> Result<&Profile> {
        let today = Utc::now().date_naive();
        let username = self.username.current();
        if let Some(reason) = self.form.submit_blocker(&username, today) {
            if !self.form.is_dirty() && self.form.is_valid(today) {
                return Err(ProfileError::NoChanges);
            }
            return Err(ProfileError::SubmitBlocked(reason));
        }

        let changes = self.form.changes();
        let saved = self.service.update_basic(changes).await?;
        info!(user = %saved.id, "profile saved");

        if saved.basic.username != self.profile.basic.username {
            self.username.shutdown();
            self.username = UsernameChecker::new(
                saved.basic.username.clone(),
                Arc::clone(&self.rule),
                Arc::clone(&self.availability),
                self.settings.clone(),
            );
        }
        self.form = self.form.rebase(saved.basic.clone());
        self.profile = saved;
        Ok(&self.profile)
    }

    /// Stop the username checker; later responses are ignored.
    pub fn shutdown(&self) {
        self.username.shutdown();
    }
}
