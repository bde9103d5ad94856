use async_trait::async_trait;

use crate::domain::{
    models::{Email, UserId, UserProfile},
    ProfileError,
};

#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    async fn upsert(
        &self,
        id: UserId,
        username: &str,
        email: &Email,
    ) -> Result<UserProfile, ProfileError>;

    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, ProfileError>;
}
