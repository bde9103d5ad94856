use axum::{extract::State, routing::get, Router};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{extract::Query, ApiError, ApiSuccess};
use crate::{
    app_state::AppState,
    auth::AuthUser,
    domain::models::{FinancialOverview, OverviewRange},
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
pub struct OverviewQuery {
    range: Option<String>,
    #[serde(default, with = "lenient_date::option")]
    date: Option<Date>,
}

#[instrument(name = "GET /financial-overview", skip(app_state))]
async fn financial_overview(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<OverviewQuery>,
) -> Result<ApiSuccess<FinancialOverview>, ApiError> {
    let range = match query.range.as_deref() {
        None | Some("") => OverviewRange::default(),
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::bad_request("Invalid range. Use daily, weekly, monthly or yearly")
        })?,
    };

    let overview = app_state
        .overview
        .financial_overview(user.id, range, query.date)
        .await?;
    Ok(ApiSuccess::ok("overview", overview))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(financial_overview))
}
