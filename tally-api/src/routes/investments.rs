use axum::{
    extract::State,
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{
    extract::{Json, Path},
    ApiError, ApiSuccess,
};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{
        CreateInvestmentRequest, Investment, InvestmentId, SipProjection,
        UpdateInvestmentRequest,
    },
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInvestmentPayload {
    #[serde(rename = "type")]
    investment_type: String,
    investment_name: String,
    amount_invested: f64,
    current_value: f64,
    #[serde(with = "lenient_date")]
    start_date: Date,
    roi: f64,
    duration_months: Option<i32>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInvestmentPayload {
    #[serde(rename = "type")]
    investment_type: Option<String>,
    investment_name: Option<String>,
    amount_invested: Option<f64>,
    current_value: Option<f64>,
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    roi: Option<f64>,
    duration_months: Option<i32>,
}

/// Missing fields are rejected by the calculation itself.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SipPayload {
    #[serde(default)]
    monthly_amount: f64,
    #[serde(default)]
    duration_months: i32,
    #[serde(default)]
    roi: f64,
}

#[instrument(name = "POST /investments", skip(app_state))]
async fn create_investment(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateInvestmentPayload>,
) -> Result<ApiSuccess<Investment>, ApiError> {
    let request = CreateInvestmentRequest {
        investment_type: payload.investment_type,
        investment_name: payload.investment_name,
        amount_invested: payload.amount_invested,
        current_value: payload.current_value,
        start_date: payload.start_date,
        roi: payload.roi,
        duration_months: payload.duration_months,
    };
    let investment = app_state
        .portfolio
        .create_investment(user.id, request)
        .await?;
    Ok(ApiSuccess::created("investment", investment))
}

#[instrument(name = "GET /investments", skip(app_state))]
async fn list_investments(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiSuccess<Vec<Investment>>, ApiError> {
    let investments = app_state.portfolio.list_investments(user.id).await?;
    Ok(ApiSuccess::ok("investments", investments))
}

#[instrument(name = "GET /investments/:id", skip(app_state))]
async fn get_investment(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<InvestmentId>,
) -> Result<ApiSuccess<Investment>, ApiError> {
    let investment = app_state.portfolio.get_investment(user.id, id).await?;
    Ok(ApiSuccess::ok("investment", investment))
}

#[instrument(name = "PUT /investments/:id", skip(app_state))]
async fn update_investment(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<InvestmentId>,
    Json(payload): Json<UpdateInvestmentPayload>,
) -> Result<ApiSuccess<Investment>, ApiError> {
    let request = UpdateInvestmentRequest {
        investment_type: payload.investment_type,
        investment_name: payload.investment_name,
        amount_invested: payload.amount_invested,
        current_value: payload.current_value,
        start_date: payload.start_date,
        roi: payload.roi,
        duration_months: payload.duration_months,
    };
    let investment = app_state
        .portfolio
        .update_investment(user.id, id, request)
        .await?;
    Ok(ApiSuccess::ok("investment", investment))
}

#[instrument(name = "DELETE /investments/:id", skip(app_state))]
async fn delete_investment(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<InvestmentId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.portfolio.delete_investment(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Investment deleted successfully"))
}

#[instrument(name = "POST /investments/sip-calculate", skip(app_state))]
async fn calculate_sip(
    _user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<SipPayload>,
) -> Result<ApiSuccess<SipProjection>, ApiError> {
    let projection = app_state.portfolio.calculate_sip(
        payload.monthly_amount,
        payload.duration_months,
        payload.roi,
    )?;
    Ok(ApiSuccess::ok("sip", projection))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_investments).post(create_investment))
        .route("/sip-calculate", post(calculate_sip))
        .route(
            "/:id",
            get(get_investment)
                .put(update_investment)
                .delete(delete_investment),
        )
}
