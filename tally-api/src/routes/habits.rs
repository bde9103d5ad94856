use axum::{
    extract::State,
    routing::{delete, get, post},
    Router,
};
use serde::Deserialize;
use time::Date;
use tracing::instrument;

use super::{
    extract::{Json, Path, Query},
    ApiError, ApiSuccess,
};
use crate::{
    adapters::inbound::http::HabitResponse,
    app_state::AppState,
    auth::AuthUser,
    domain::models::{
        CreateHabitRequest, FrequencyRequest, FrequencyType, GoalRequest, GoalType,
        HabitFilter, HabitId, HabitSort, HabitStatus, UpdateHabitRequest,
    },
    utils::date_format::lenient_date,
};

// ---------------------------------------------------------------------------
// Payloads
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FrequencyPayload {
    #[serde(rename = "type")]
    kind: FrequencyType,
    days_of_week: Option<Vec<u8>>,
    days_of_month: Option<Vec<u8>>,
    times_per_day: Option<i32>,
}

impl From<FrequencyPayload> for FrequencyRequest {
    fn from(payload: FrequencyPayload) -> Self {
        Self {
            kind: payload.kind,
            days_of_week: payload.days_of_week,
            days_of_month: payload.days_of_month,
            times_per_day: payload.times_per_day,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct GoalPayload {
    #[serde(rename = "type")]
    kind: GoalType,
    target: i32,
}

impl From<GoalPayload> for GoalRequest {
    fn from(payload: GoalPayload) -> Self {
        Self {
            kind: payload.kind,
            target: payload.target,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateHabitPayload {
    title: String,
    description: Option<String>,
    category: Option<String>,
    frequency: FrequencyPayload,
    goal: Option<GoalPayload>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateHabitPayload {
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    frequency: Option<FrequencyPayload>,
    goal: Option<GoalPayload>,
    #[serde(default, with = "lenient_date::option")]
    end_date: Option<Date>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HabitQuery {
    category: Option<String>,
    status: Option<HabitStatus>,
    sort_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CompletePayload {
    #[serde(default, with = "lenient_date::option")]
    date: Option<Date>,
    notes: Option<String>,
    count: Option<i32>,
}

#[derive(Debug, Deserialize)]
pub struct CountPayload {
    count: i32,
    #[serde(default, with = "lenient_date::option")]
    date: Option<Date>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PausePayload {
    #[serde(default, with = "lenient_date::option")]
    until: Option<Date>,
    reason: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResumePayload {
    #[serde(default)]
    keep_streak: bool,
}

// ---------------------------------------------------------------------------
// Habit CRUD
// ---------------------------------------------------------------------------

#[instrument(name = "POST /habits", skip(app_state))]
async fn create_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateHabitPayload>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let request = CreateHabitRequest {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        frequency: payload.frequency.into(),
        goal: payload.goal.map(Into::into),
        end_date: payload.end_date,
    };
    let habit = app_state.habits.create_habit(user.id, request).await?;
    Ok(ApiSuccess::created("habit", habit.into()))
}

#[instrument(name = "GET /habits", skip(app_state))]
async fn list_habits(
    user: AuthUser,
    State(app_state): State<AppState>,
    Query(query): Query<HabitQuery>,
) -> Result<ApiSuccess<Vec<HabitResponse>>, ApiError> {
    let sort = match query.sort_by.as_deref() {
        None | Some("") => HabitSort::default(),
        Some(raw) => raw.parse().map_err(|_| {
            ApiError::bad_request("Invalid sortBy. Use streak, created or title")
        })?,
    };
    let filter = HabitFilter {
        category: query.category.filter(|c| !c.trim().is_empty()),
        status: query.status,
        sort,
    };
    let habits = app_state.habits.list_habits(user.id, filter).await?;
    Ok(ApiSuccess::ok(
        "habits",
        habits.into_iter().map(Into::into).collect(),
    ))
}

#[instrument(name = "GET /habits/:id", skip(app_state))]
async fn get_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let habit = app_state.habits.get_habit(user.id, id).await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "PUT /habits/:id", skip(app_state))]
async fn update_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(payload): Json<UpdateHabitPayload>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let request = UpdateHabitRequest {
        title: payload.title,
        description: payload.description,
        category: payload.category,
        frequency: payload.frequency.map(Into::into),
        goal: payload.goal.map(Into::into),
        end_date: payload.end_date,
    };
    let habit = app_state.habits.update_habit(user.id, id, request).await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "DELETE /habits/:id", skip(app_state))]
async fn delete_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.habits.delete_habit(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Habit deleted successfully"))
}

// ---------------------------------------------------------------------------
// Tracking
// ---------------------------------------------------------------------------

#[instrument(name = "POST /habits/:id/complete", skip(app_state))]
async fn complete_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
    payload: Option<Json<CompletePayload>>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let habit = app_state
        .habits
        .record_completion(user.id, id, payload.date, payload.notes, payload.count)
        .await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "DELETE /habits/:id/complete/:date", skip(app_state))]
async fn unmark_completion(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path((id, date)): Path<(HabitId, String)>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let date = crate::utils::date_format::parse_date(&date)
        .ok_or_else(|| ApiError::bad_request("Invalid date"))?;
    let habit = app_state
        .habits
        .unmark_completion(user.id, id, date)
        .await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "POST /habits/:id/count", skip(app_state))]
async fn record_count(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
    Json(payload): Json<CountPayload>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let habit = app_state
        .habits
        .record_count(user.id, id, payload.count, payload.date)
        .await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "POST /habits/:id/pause", skip(app_state))]
async fn pause_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
    payload: Option<Json<PausePayload>>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let habit = app_state
        .habits
        .pause_habit(user.id, id, payload.until, payload.reason)
        .await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

#[instrument(name = "POST /habits/:id/resume", skip(app_state))]
async fn resume_habit(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<HabitId>,
    payload: Option<Json<ResumePayload>>,
) -> Result<ApiSuccess<HabitResponse>, ApiError> {
    let payload = payload.map(|Json(p)| p).unwrap_or_default();
    let habit = app_state
        .habits
        .resume_habit(user.id, id, payload.keep_streak)
        .await?;
    Ok(ApiSuccess::ok("habit", habit.into()))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_habits).post(create_habit))
        .route(
            "/:id",
            get(get_habit).put(update_habit).delete(delete_habit),
        )
        .route("/:id/complete", post(complete_habit))
        .route("/:id/complete/:date", delete(unmark_completion))
        .route("/:id/count", post(record_count))
        .route("/:id/pause", post(pause_habit))
        .route("/:id/resume", post(resume_habit))
}
