use async_trait::async_trait;
use plaza_core::api::routes::{utils, v1};
use plaza_model::{
    EnhancedProfile, Profile, SetItemVisibilityRequest, SetStatusRequest,
    SetVisibilityRequest, StatusMessage, UpdateBasicProfileRequest,
    UpdateEnhancedProfileRequest, UserId, UsernameAvailability,
};
use std::sync::Arc;

use crate::infra::{api_client::ApiClient, error::ClientResult};

#[async_trait]
pub trait ProfileService: Send + Sync {
    /// Profile of the signed-in user
    async fn fetch_me(&self) -> ClientResult<Profile>;

    /// Another user's profile, filtered by the server for the viewer
    async fn fetch_profile(&self, user_id: UserId) -> ClientResult<Profile>;

    async fn update_basic(
        &self,
        req: UpdateBasicProfileRequest,
    ) -> ClientResult<Profile>;

    async fn update_enhanced(
        &self,
        req: UpdateEnhancedProfileRequest,
    ) -> ClientResult<EnhancedProfile>;

    async fn set_field_visibility(
        &self,
        req: SetVisibilityRequest,
    ) -> ClientResult<()>;

    async fn set_item_visibility(
        &self,
        req: SetItemVisibilityRequest,
    ) -> ClientResult<()>;

    async fn set_status(
        &self,
        req: SetStatusRequest,
    ) -> ClientResult<StatusMessage>;

    async fn clear_status(&self) -> ClientResult<()>;
}

/// Remote authority on whether a username is free.
#[async_trait]
pub trait AvailabilityClient: Send + Sync {
    /// Ask the server about `candidate` (already trimmed). Transport failures
    /// are `Err`; a reachable server that declines to answer comes back as
    /// `Ok` with `success == false`.
    async fn check_username(
        &self,
        candidate: &str,
    ) -> ClientResult<UsernameAvailability>;
}

#[derive(Clone, Debug)]
pub struct ProfileApiAdapter {
    client: Arc<ApiClient>,
}

impl ProfileApiAdapter {
    pub fn new(client: Arc<ApiClient>) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ProfileService for ProfileApiAdapter {
    async fn fetch_me(&self) -> ClientResult<Profile> {
        self.client.get(v1::profile::ME).await
    }

    async fn fetch_profile(&self, user_id: UserId) -> ClientResult<Profile> {
        let path = utils::replace_param(
            v1::users::PROFILE,
            "{id}",
            user_id.to_string(),
        );
        self.client.get(&path).await
    }

    async fn update_basic(
        &self,
        req: UpdateBasicProfileRequest,
    ) -> ClientResult<Profile> {
        self.client.put(v1::profile::BASIC, &req).await
    }

    async fn update_enhanced(
        &self,
        req: UpdateEnhancedProfileRequest,
    ) -> ClientResult<EnhancedProfile> {
        self.client.put(v1::profile::ENHANCED, &req).await
    }

    async fn set_field_visibility(
        &self,
        req: SetVisibilityRequest,
    ) -> ClientResult<()> {
        self.client.put_no_content(v1::profile::VISIBILITY, &req).await
    }

    async fn set_item_visibility(
        &self,
        req: SetItemVisibilityRequest,
    ) -> ClientResult<()> {
        self.client
            .put_no_content(v1::profile::ITEM_VISIBILITY, &req)
            .await
    }

    async fn set_status(
        &self,
        req: SetStatusRequest,
    ) -> ClientResult<StatusMessage> {
        self.client.put(v1::profile::STATUS, &req).await
    }

    async fn clear_status(&self) -> ClientResult<()> {
        self.client.delete(v1::profile::STATUS).await
    }
}

#[async_trait]
impl AvailabilityClient for ProfileApiAdapter {
    async fn check_username(
        &self,
        candidate: &str,
    ) -> ClientResult<UsernameAvailability> {
        let path = utils::with_query(
            v1::profile::USERNAME_AVAILABILITY,
            &[("candidate", candidate)],
        );
        self.client.get_raw(&path).await
    }
}
