use serde::Serialize;

use super::{Email, UserId};

/// Display name and notification address for a user. Identity itself is
/// asserted upstream; this is only the profile the service keeps.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UserProfile {
    pub id: UserId,
    pub username: String,
    pub email: Email,
}

#[derive(Debug, Clone)]
pub struct UpsertProfileRequest {
    pub username: String,
    pub email: String,
}
