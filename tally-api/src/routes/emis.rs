use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{
    extract::{Json, Path, Query},
    ApiError, ApiSuccess,
};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{CreateEmiRequest, Emi, EmiFilter, EmiId, UpdateEmiRequest},
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEmiPayload {
    loan_name: String,
    principal: f64,
    roi: f64,
    tenure_months: i32,
    #[serde(with = "lenient_date")]
    due_date: Date,
    #[serde(default)]
    is_preclosed: bool,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmiPayload {
    loan_name: Option<String>,
    principal: Option<f64>,
    roi: Option<f64>,
    tenure_months: Option<i32>,
    #[serde(default, with = "lenient_date::option")]
    due_date: Option<Date>,
    is_preclosed: Option<bool>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EmiQuery {
    is_preclosed: Option<bool>,
    #[serde(default, with = "lenient_date::option")]
    due_before: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    due_after: Option<Date>,
}

#[instrument(name = "POST /emis", skip(app_state))]
async fn create_emi(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateEmiPayload>,
) -> Result<ApiSuccess<Emi>, ApiError> {
    let request = CreateEmiRequest {
        loan_name: payload.loan_name,
        principal: payload.principal,
        roi: payload.roi,
        tenure_months: payload.tenure_months,
        due_date: payload.due_date,
        is_preclosed: payload.is_preclosed,
    };
    let emi = app_state.portfolio.create_emi(user.id, request).await?;
    Ok(ApiSuccess::created("emi", emi))
}

#[instrument(name = "GET /emis", skip(app_state))]
async fn list_emis(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<EmiQuery>,
) -> Result<ApiSuccess<Vec<Emi>>, ApiError> {
    let filter = EmiFilter {
        is_preclosed: query.is_preclosed,
        due_before: query.due_before,
        due_after: query.due_after,
    };
    let emis = app_state.portfolio.list_emis(user.id, filter).await?;
    Ok(ApiSuccess::ok("emis", emis))
}

#[instrument(name = "GET /emis/:id", skip(app_state))]
async fn get_emi(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<EmiId>,
) -> Result<ApiSuccess<Emi>, ApiError> {
    let emi = app_state.portfolio.get_emi(user.id, id).await?;
    Ok(ApiSuccess::ok("emi", emi))
}

#[instrument(name = "PUT /emis/:id", skip(app_state))]
async fn update_emi(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<EmiId>,
    Json(payload): Json<UpdateEmiPayload>,
) -> Result<ApiSuccess<Emi>, ApiError> {
    let request = UpdateEmiRequest {
        loan_name: payload.loan_name,
        principal: payload.principal,
        roi: payload.roi,
        tenure_months: payload.tenure_months,
        due_date: payload.due_date,
        is_preclosed: payload.is_preclosed,
    };
    let emi = app_state.portfolio.update_emi(user.id, id, request).await?;
    Ok(ApiSuccess::ok("emi", emi))
}

#[instrument(name = "DELETE /emis/:id", skip(app_state))]
async fn delete_emi(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<EmiId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.portfolio.delete_emi(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "EMI deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_emis).post(create_emi))
        .route("/:id", get(get_emi).put(update_emi).delete(delete_emi))
}
