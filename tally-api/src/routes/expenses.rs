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
    domain::models::{
        CreateExpenseRequest, Expense, ExpenseFilter, ExpenseId, PaymentMethod,
        UpdateExpenseRequest,
    },
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateExpensePayload {
    amount: f64,
    #[serde(default, with = "lenient_date::option")]
    date: Option<Date>,
    category: String,
    payment_method: PaymentMethod,
    bill_no: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExpensePayload {
    amount: Option<f64>,
    #[serde(default, with = "lenient_date::option")]
    date: Option<Date>,
    category: Option<String>,
    payment_method: Option<PaymentMethod>,
    bill_no: Option<String>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseQuery {
    #[serde(default, with = "lenient_date::option")]
    start_date: Option<Date>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
}

#[instrument(name = "POST /expenses", skip(app_state))]
async fn create_expense(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateExpensePayload>,
) -> Result<ApiSuccess<Expense>, ApiError> {
    let request = CreateExpenseRequest {
        amount: payload.amount,
        date: payload.date,
        category_name: payload.category,
        payment_method: payload.payment_method,
        bill_no: payload.bill_no,
        description: payload.description,
    };
    let expense = app_state.budgeting.create_expense(user.id, request).await?;
    Ok(ApiSuccess::created("expense", expense))
}

#[instrument(name = "GET /expenses", skip(app_state))]
async fn list_expenses(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<ExpenseQuery>,
) -> Result<ApiSuccess<Vec<Expense>>, ApiError> {
    let filter = ExpenseFilter {
        start_date: query.start_date,
        end_date: query.end_date,
    };
    let expenses = app_state.budgeting.list_expenses(user.id, filter).await?;
    Ok(ApiSuccess::ok("expenses", expenses))
}

#[instrument(name = "GET /expenses/:id", skip(app_state))]
async fn get_expense(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ExpenseId>,
) -> Result<ApiSuccess<Expense>, ApiError> {
    let expense = app_state.budgeting.get_expense(user.id, id).await?;
    Ok(ApiSuccess::ok("expense", expense))
}

#[instrument(name = "PUT /expenses/:id", skip(app_state))]
async fn update_expense(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ExpenseId>,
    Json(payload): Json<UpdateExpensePayload>,
) -> Result<ApiSuccess<Expense>, ApiError> {
    let request = UpdateExpenseRequest {
        amount: payload.amount,
        date: payload.date,
        category_name: payload.category,
        payment_method: payload.payment_method,
        bill_no: payload.bill_no,
        description: payload.description,
    };
    let expense = app_state
        .budgeting
        .update_expense(user.id, id, request)
        .await?;
    Ok(ApiSuccess::ok("expense", expense))
}

#[instrument(name = "DELETE /expenses/:id", skip(app_state))]
async fn delete_expense(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<ExpenseId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.budgeting.delete_expense(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Expense deleted successfully"))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_expenses).post(create_expense))
        .route(
            "/:id",
            get(get_expense).put(update_expense).delete(delete_expense),
        )
}
