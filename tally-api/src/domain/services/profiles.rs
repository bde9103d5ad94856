use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{
    models::{Email, UpsertProfileRequest, UserId, UserProfile},
    ports::{inbound::ProfileService, outbound::UserRepository},
    ProfileError,
};

pub struct ProfileServiceImpl<U> {
    repo: Arc<U>,
}

impl<U: UserRepository> ProfileServiceImpl<U> {
    pub fn new(repo: Arc<U>) -> Self {
        Self { repo }
    }
}

#[async_trait]
impl<U: UserRepository> ProfileService for ProfileServiceImpl<U> {
    async fn get_profile(&self, user_id: UserId) -> Result<UserProfile, ProfileError> {
        self.repo.get(user_id).await?.ok_or(ProfileError::NotFound)
    }

    async fn upsert_profile(
        &self,
        user_id: UserId,
        request: UpsertProfileRequest,
    ) -> Result<UserProfile, ProfileError> {
        let username = request.username.trim();
        if username.is_empty() {
            return Err(ProfileError::Invalid("Username is required".to_string()));
        }
        let email = Email::try_from(request.email)?;

        let profile = self.repo.upsert(user_id, username, &email).await?;
        info!(%user_id, "saved user profile");
        Ok(profile)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{adapters::outbound::memory::MemoryUserRepository, domain::models::EmailError};

    #[tokio::test]
    async fn upsert_normalizes_the_email() {
        let svc = ProfileServiceImpl::new(Arc::new(MemoryUserRepository::new()));
        let user = UserId::new(5);

        let profile = svc
            .upsert_profile(
                user,
                UpsertProfileRequest {
                    username: " ada ".to_string(),
                    email: "Ada@Example.COM".to_string(),
                },
            )
            .await
            .unwrap();
        assert_eq!(profile.username, "ada");
        assert_eq!(&*profile.email, "ada@example.com");
        assert_eq!(svc.get_profile(user).await.unwrap(), profile);
    }

    #[tokio::test]
    async fn invalid_input_is_rejected() {
        let svc = ProfileServiceImpl::new(Arc::new(MemoryUserRepository::new()));

        let result = svc
            .upsert_profile(
                UserId::new(1),
                UpsertProfileRequest {
                    username: "ada".to_string(),
                    email: "not-an-email".to_string(),
                },
            )
            .await;
        assert!(matches!(
            result,
            Err(ProfileError::InvalidEmail(EmailError::InvalidFormat(_)))
        ));
        assert!(matches!(
            svc.get_profile(UserId::new(1)).await,
            Err(ProfileError::NotFound)
        ));
    }
}
