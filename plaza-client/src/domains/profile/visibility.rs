use plaza_core::{ProfileError, Result};
use plaza_model::{
    EnhancedProfile, FieldVisibility, ItemId, ProfileField, ProfileSection,
    SetItemVisibilityRequest, SetVisibilityRequest, Visibility,
};
use std::sync::Arc;
use tracing::{info, warn};

use crate::infra::services::ProfileService;

/// Optimistic visibility updates.
///
/// The local value changes before the request is sent so the toggle feels
/// instant; if the server refuses, the previous value is put back and the
/// error is returned.
pub struct VisibilityController {
    service: Arc<dyn ProfileService>,
    fields: FieldVisibility,
}

impl std::fmt::Debug for VisibilityController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VisibilityController")
            .field("fields", &self.fields)
            .finish()
    }
}

impl VisibilityController {
    pub fn new(service: Arc<dyn ProfileService>, fields: FieldVisibility) -> Self {
        Self { service, fields }
    }

    pub fn fields(&self) -> &FieldVisibility {
        &self.fields
    }

    pub fn get(&self, field: ProfileField) -> Visibility {
        self.fields.get(field)
    }

    pub async fn set_field(
        &mut self,
        field: ProfileField,
        visibility: Visibility,
    ) -> Result<()> {
        if !field.is_hideable() {
            if visibility == Visibility::Public {
                return Ok(());
            }
            return Err(ProfileError::FieldNotHideable(field));
        }

        let previous = self.fields.set(field, visibility);
        if previous == visibility {
            return Ok(());
        }

        let request = SetVisibilityRequest { field, visibility };
        match self.service.set_field_visibility(request).await {
            Ok(()) => {
                info!(%field, %visibility, "field visibility updated");
                Ok(())
            }
            Err(err) => {
                warn!(%field, error = %err, "rolling back field visibility");
                self.fields.set(field, previous);
                Err(err.into())
            }
        }
    }

    /// Eye-icon toggle for a field; returns the value now in effect.
    pub async fn toggle_field(&mut self, field: ProfileField) -> Result<Visibility> {
        let next = self.get(field).toggle();
        self.set_field(field, next).await?;
        Ok(next)
    }

    pub async fn set_item(
        &self,
        profile: &mut EnhancedProfile,
        section: ProfileSection,
        item_id: ItemId,
        visibility: Visibility,
    ) -> Result<()> {
        let previous = profile
            .set_item_visibility(section, item_id, visibility)
            .ok_or(ProfileError::ItemNotFound {
                section,
                id: item_id,
            })?;
        if previous == visibility {
            return Ok(());
        }

        let request = SetItemVisibilityRequest {
            section,
            item_id,
            visibility,
        };
        match self.service.set_item_visibility(request).await {
            Ok(()) => {
                info!(%section, %item_id, %visibility, "item visibility updated");
                Ok(())
            }
            Err(err) => {
                warn!(%section, %item_id, error = %err, "rolling back item visibility");
                profile.set_item_visibility(section, item_id, previous);
                Err(err.into())
            }
        }
    }

    pub async fn toggle_item(
        &self,
        profile: &mut EnhancedProfile,
        section: ProfileSection,
        item_id: ItemId,
    ) -> Result<Visibility> {
        let current = profile.item_visibility(section, item_id).ok_or(
            ProfileError::ItemNotFound {
                section,
                id: item_id,
            },
        )?;
        let next = current.toggle();
        self.set_item(profile, section, item_id, next).await?;
        Ok(next)
    }
}
