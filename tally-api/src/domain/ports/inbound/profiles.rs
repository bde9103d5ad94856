use async_trait::async_trait;

use crate::domain::{
    models::{UpsertProfileRequest, UserId, UserProfile},
    ProfileError,
};

#[async_trait]
pub trait ProfileService: Send + Sync + 'static {
    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, ProfileError>;

    async fn upsert_profile(
        &self,
        user_id: UserId,
        request: UpsertProfileRequest,
    ) -> Result<UserProfile, ProfileError>;
}
