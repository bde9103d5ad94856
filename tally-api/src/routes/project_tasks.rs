use axum::{
    extract::State,
    routing::{get, post, put},
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
    adapters::inbound::http::ColumnTasksResponse,
    app_state::AppState,
    auth::AuthUser,
    domain::models::{
        ColumnId, CreateTaskRequest, DueFilter, Estimates, Priority, ProjectId, ProjectTask,
        TaskFilter, TaskId, UpdateTaskRequest, UserId,
    },
    utils::date_format::lenient_date,
};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskPayload {
    title: String,
    description: Option<String>,
    assigned_to: Option<UserId>,
    project_id: ProjectId,
    column_id: ColumnId,
    estimates: Option<Estimates>,
    #[serde(default, with = "lenient_date::option")]
    due_date: Option<Date>,
    priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskPayload {
    title: Option<String>,
    description: Option<String>,
    assigned_to: Option<UserId>,
    column_id: Option<ColumnId>,
    estimates: Option<Estimates>,
    #[serde(default, with = "lenient_date::option")]
    due_date: Option<Date>,
    priority: Option<Priority>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskQuery {
    priority: Option<Priority>,
    assigned_to: Option<UserId>,
    due: Option<String>,
}

impl TaskQuery {
    fn into_filter(self) -> Result<TaskFilter, ApiError> {
        let due = match self.due.as_deref() {
            None | Some("") => None,
            Some(raw) => Some(DueFilter::parse(raw).ok_or_else(|| {
                ApiError::bad_request("Invalid due filter. Use overdue, today, week or a date")
            })?),
        };
        Ok(TaskFilter {
            priority: self.priority,
            assigned_to: self.assigned_to,
            due,
        })
    }
}

#[instrument(name = "POST /project-tasks", skip(app_state))]
async fn create_task(
    user: AuthUser,
    State(app_state): State<AppState>,
    Json(payload): Json<CreateTaskPayload>,
) -> Result<ApiSuccess<ProjectTask>, ApiError> {
    let request = CreateTaskRequest {
        title: payload.title,
        description: payload.description,
        assigned_to: payload.assigned_to,
        project_id: payload.project_id,
        column_id: payload.column_id,
        estimates: payload.estimates,
        due_date: payload.due_date,
        priority: payload.priority,
    };
    let task = app_state.board.create_task(user.id, request).await?;
    Ok(ApiSuccess::created("task", task))
}

#[instrument(name = "GET /project-tasks/:id", skip(app_state))]
async fn get_task(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<ApiSuccess<ProjectTask>, ApiError> {
    let task = app_state.board.get_task(user.id, id).await?;
    Ok(ApiSuccess::ok("task", task))
}

#[instrument(name = "PUT /project-tasks/:id", skip(app_state))]
async fn update_task(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<TaskId>,
    Json(payload): Json<UpdateTaskPayload>,
) -> Result<ApiSuccess<ProjectTask>, ApiError> {
    let request = UpdateTaskRequest {
        title: payload.title,
        description: payload.description,
        assigned_to: payload.assigned_to,
        column_id: payload.column_id,
        estimates: payload.estimates,
        due_date: payload.due_date,
        priority: payload.priority,
    };
    let task = app_state.board.update_task(user.id, id, request).await?;
    Ok(ApiSuccess::ok("task", task))
}

#[instrument(name = "DELETE /project-tasks/:id", skip(app_state))]
async fn delete_task(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(id): Path<TaskId>,
) -> Result<ApiSuccess<&'static str>, ApiError> {
    app_state.board.delete_task(user.id, id).await?;
    Ok(ApiSuccess::ok("message", "Task deleted successfully"))
}

#[instrument(name = "PUT /project-tasks/:id/move/:column_id", skip(app_state))]
async fn move_task(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path((id, column_id)): Path<(TaskId, ColumnId)>,
) -> Result<ApiSuccess<ProjectTask>, ApiError> {
    let task = app_state.board.move_task(user.id, id, column_id).await?;
    Ok(ApiSuccess::ok("task", task))
}

#[instrument(name = "GET /project-tasks/project/:project_id", skip(app_state))]
async fn list_project_tasks(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path(project_id): Path<ProjectId>,
    Query(query): Query<TaskQuery>,
) -> Result<ApiSuccess<Vec<ProjectTask>>, ApiError> {
    let filter = query.into_filter()?;
    let tasks = app_state
        .board
        .list_project_tasks(user.id, project_id, filter)
        .await?;
    Ok(ApiSuccess::ok("tasks", tasks))
}

#[instrument(
    name = "GET /project-tasks/project/:project_id/column/:column_id",
    skip(app_state)
)]
async fn list_column_tasks(
    user: AuthUser,
    State(app_state): State<AppState>,
    Path((project_id, column_id)): Path<(ProjectId, ColumnId)>,
) -> Result<ApiSuccess<ColumnTasksResponse>, ApiError> {
    let column = app_state
        .board
        .list_column_tasks(user.id, project_id, column_id)
        .await?;
    Ok(ApiSuccess::ok("column", column.into()))
}

#[instrument(name = "GET /project-tasks/assigned", skip(app_state))]
async fn list_assigned_tasks(
    user: AuthUser,
    State(app_state): State<AppState>,
) -> Result<ApiSuccess<Vec<ProjectTask>>, ApiError> {
    let tasks = app_state.board.list_assigned_tasks(user.id).await?;
    Ok(ApiSuccess::ok("tasks", tasks))
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", post(create_task))
        .route("/assigned", get(list_assigned_tasks))
        .route("/project/:project_id", get(list_project_tasks))
        .route(
            "/project/:project_id/column/:column_id",
            get(list_column_tasks),
        )
        .route("/:id", get(get_task).put(update_task).delete(delete_task))
        .route("/:id/move/:column_id", put(move_task))
}
