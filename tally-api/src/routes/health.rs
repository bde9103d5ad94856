use axum::{extract::State, routing::get, Router};
use serde::Serialize;
use tracing::instrument;

use super::{ApiError, ApiSuccess};
use crate::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthStatus {
    status: &'static str,
}

#[instrument(name = "GET /health", skip(app_state))]
async fn health(State(app_state): State<AppState>) -> Result<ApiSuccess<HealthStatus>, ApiError> {
    app_state.health.ping().await.map_err(|e| {
        ApiError::new(axum::http::StatusCode::SERVICE_UNAVAILABLE, "Database unavailable")
            .with_details(e)
    })?;
    Ok(ApiSuccess::ok("health", HealthStatus { status: "ok" }))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(health))
}
