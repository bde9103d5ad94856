use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{
    extract::{Json, Path, Query},
    ApiError, ApiSuccess,
};
use crate::{
    adapters::inbound::http::BudgetResponse,
    app_state::AppState,
    auth::AuthUser,
    domain::models::{BudgetFilter, BudgetId, CreateBudgetRequest, UpdateBudgetRequest},
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBudgetPayload {
    category_name: String,
    budgeted_amount: f64,
    #[serde(with = "lenient_date")]
    start_date: Date,
    #[serde(with = "lenient_date")]
    end_date: Date,
    #[serde(default)]
    is_fixed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBudgetPayload {
    category_name: Option<String>,
    budgeted_amount: Option<f64>,
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
    is_fixed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BudgetQuery {
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
}

#[instrument(name = "POST /budgets", skip(app_state))]
async fn create_budget(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateBudgetPayload>,
) -> Result<ApiSuccess<BudgetResponse>, ApiError> {
    let request = CreateBudgetRequest {
        category_name: payload.category_name,
        budgeted_amount: payload.budgeted_amount,
        start_date: payload.start_date,
        end_date: payload.end_date,
        is_fixed: payload.is_fixed,
    };
    let budget = app_state.budgeting.create_budget(user.id, request).await?;
    Ok(ApiSuccess::created("budget", budget.into()))
}

#[instrument(name = "GET /budgets", skip(app_state))]
async fn list_budgets(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<BudgetQuery>,
) -> Result<ApiSuccess<Vec<BudgetResponse>>, ApiError> {
    let filter = BudgetFilter {
        start_from: query.start_date,
        start_to: query.end_date,
    };
    let budgets = app_state.budgeting.list_budgets(user.id, filter).await?;
    Ok(ApiSuccess::ok(
        "budgets",
        budgets.into_iter().map(Into::into).collect(),
    ))
}

#[instrument(name = "GET /budgets/:id", skip(app_state))]
async fn get_budget(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<BudgetId>,
) -> Result<ApiSuccess<BudgetResponse>, ApiError> {
    let budget = app_state.budgeting.get_budget(user.id, id).await?;
    Ok(ApiSuccess::ok("budget", budget.into()))
}

#[instrument(name = "PUT /budgets/:id", skip(app_state))]
async fn update_budget(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<BudgetId>,
    Json(payload): Json<UpdateBudgetPayload>,
) -> Result<ApiSuccess<BudgetResponse>, ApiError> {
    let request = UpdateBudgetRequest {
        category_name: payload.category_name,
        budgeted_amount: payload.budgeted_amount,
        start_date: payload.start_date,
        end_date: payload.end_date,
        is_fixed: payload.is_fixed,
    };
    let budget = app_state
        .budgeting
        .update_budget(user.id, id, request)
        .await?;
    Ok(ApiSuccess::ok("budget", budget.into()))
}

#[instrument(name = "DELETE /budgets/:id", skip(app_state))]
async fn delete_budget(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<BudgetId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.budgeting.delete_budget(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Budget deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_budgets).post(create_budget))
        .route(
            "/:id",
            get(get_budget).put(update_budget).delete(delete_budget),
        )
}
