use axum::{
    extract::State,
    routing::{delete, get},
    Router,
};
use serde::Deserialize;
use tracing::instrument;

use super::{
    extract::{Json, Path},
    ApiError, ApiSuccess,
};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{CategoryId, ExpenseCategory},
};

#[derive(Debug, Deserialize)]
pub struct CreateCategoryPayload {
    name: String,
}

#[instrument(name = "POST /expense-categories", skip(app_state))]
async fn create_category(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<ApiSuccess<ExpenseCategory>, ApiError> {
    let category = app_state
        .budgeting
        .resolve_category(user.id, &payload.name)
        .await?;
    Ok(ApiSuccess::created("category", category))
}

#[instrument(name = "GET /expense-categories", skip(app_state))]
async fn list_categories(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiSuccess<Vec<ExpenseCategory>>, ApiError> {
    let categories = app_state.budgeting.list_categories(user.id).await?;
    Ok(ApiSuccess::ok("categories", categories))
}

#[instrument(name = "DELETE /expense-categories/:id", skip(app_state))]
async fn delete_category(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<CategoryId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.budgeting.delete_category(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Category deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_categories).post(create_category))
        .route("/:id", delete(delete_category))
}
