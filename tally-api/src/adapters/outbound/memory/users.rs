use std::{
    collections::HashMap,
    sync::{Arc, Mutex, RwLock},
};

use async_trait::async_trait;
use time::{Date, OffsetDateTime};

use crate::domain::{
    models::{Email, NotificationPayload, UserId, UserProfile},
    ports::outbound::{Clock, HealthProbe, Notifier, UserRepository},
    ProfileError,
};

#[derive(Clone, Default)]
pub struct MemoryUserRepository {
    users: Arc<RwLock<HashMap<UserId, UserProfile>>>,
}

impl MemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_user(self, id: i32, username: &str, email: &str) -> Self {
        let profile = UserProfile {
            id: UserId::new(id),
            username: username.to_string(),
            email: Email::try_from(email).unwrap(),
        };
        self.users.write().unwrap().insert(profile.id, profile);
        self
    }
}

#[async_trait]
impl UserRepository for MemoryUserRepository {
    async fn upsert(
        &self,
        id: UserId,
        username: &str,
        email: &Email,
    ) -> Result<UserProfile, ProfileError> {
        let profile = UserProfile {
            id,
            username: username.to_string(),
            email: email.clone(),
        };
        self.users.write().unwrap().insert(id, profile.clone());
        Ok(profile)
    }

    async fn get(&self, id: UserId) -> Result<Option<UserProfile>, ProfileError> {
        Ok(self.users.read().unwrap().get(&id).cloned())
    }
}

/// Captures every notification instead of sending it.
#[derive(Clone, Default)]
pub struct RecordingNotifier {
    sent: Arc<Mutex<Vec<(Email, NotificationPayload)>>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn sent(&self) -> Vec<(Email, NotificationPayload)> {
        self.sent.lock().unwrap().clone()
    }

    pub fn count_final_column(&self) -> usize {
        self.sent()
            .iter()
            .filter(|(_, p)| matches!(p, NotificationPayload::TaskReachedFinalColumn { .. }))
            .count()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn notify(&self, recipient: &Email, payload: NotificationPayload) {
        self.sent.lock().unwrap().push((recipient.clone(), payload));
    }
}

/// A clock pinned to noon UTC on a fixed date.
#[derive(Clone, Copy)]
pub struct FixedClock(pub Date);

impl Clock for FixedClock {
    fn now(&self) -> OffsetDateTime {
        self.0
            .with_hms(12, 0, 0)
            .unwrap()
            .assume_utc()
    }
}

pub struct AlwaysHealthy;

#[async_trait]
impl HealthProbe for AlwaysHealthy {
    async fn ping(&self) -> Result<(), String> {
        Ok(())
    }
}
