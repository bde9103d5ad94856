use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use tracing::instrument;

use super::{extract::Json, ApiError, ApiSuccess};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{UpsertProfileRequest, UserProfile},
};

#[derive(Debug, Deserialize)]
pub struct ProfilePayload {
    username: String,
    email: String,
}

#[instrument(name = "GET /users/me", skip(app_state))]
async fn get_me(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let profile = app_state.profiles.get_profile(user.id).await?;
    Ok(ApiSuccess::ok("user", profile))
}

#[instrument(name = "PUT /users/me", skip(app_state))]
async fn put_me(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<ProfilePayload>,
) -> Result<ApiSuccess<UserProfile>, ApiError> {
    let request = UpsertProfileRequest {
        username: payload.username,
        email: payload.email,
    };
    let profile = app_state.profiles.upsert_profile(user.id, request).await?;
    Ok(ApiSuccess::ok("user", profile))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/me", get(get_me).put(put_me))
}
