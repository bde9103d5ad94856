//! Caller identity. Authentication happens upstream; the gateway forwards
//! the verified user id in a header.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};

use crate::{app_state::IdentityHeader, domain::models::UserId, routes::ApiError};

/// The authenticated caller. Rejects with 401 when the identity header is
/// missing or not a user id.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: UserId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
    IdentityHeader: FromRef<S>,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let IdentityHeader(header) = IdentityHeader::from_ref(state);
        let id = parts
            .headers
            .get(&header)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i32>().ok())
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::unauthorized("Not authenticated"))?;

        Ok(AuthUser {
            id: UserId::new(id),
        })
    }
}
